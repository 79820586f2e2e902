// crates/mh_io/src/drivers/memory.rs

//! 内存表
//!
//! 与 netCDF 驱动行为一致的内存实现：同名重复定义、长度不符、类型不符都会报错。
//! 用于测试和不落盘的格式转换。
//!
//! # 示例
//!
//! ```
//! use mh_io::drivers::{MemoryTable, TableSink, TableSource, VarType};
//!
//! let mut table = MemoryTable::new();
//! table.add_dimension("n", 3).unwrap();
//! table.add_variable("x", VarType::Double, &["n"]).unwrap();
//! table.put_f64("x", &[1.0, 2.0, 3.0]).unwrap();
//!
//! assert_eq!(table.dimension_len("n").unwrap(), 3);
//! assert_eq!(table.get_f64("x").unwrap(), vec![1.0, 2.0, 3.0]);
//! ```

use super::table::{AttrValue, TableError, TableResult, TableSink, TableSource, VarType};

#[derive(Debug, Clone, PartialEq)]
enum VarData {
    Int(Vec<i32>),
    Double(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
struct MemoryVariable {
    name: String,
    dims: Vec<String>,
    data: VarData,
    attributes: Vec<(String, AttrValue)>,
}

/// 内存中的维度/变量/属性表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTable {
    dimensions: Vec<(String, usize)>,
    variables: Vec<MemoryVariable>,
    global_attributes: Vec<(String, AttrValue)>,
}

impl MemoryTable {
    /// 创建空表
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 已定义的维度名（按定义顺序）
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|(n, _)| n.as_str())
    }

    /// 已定义的变量名（按定义顺序）
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }

    /// 变量的维度名
    pub fn variable_dims(&self, name: &str) -> TableResult<Vec<String>> {
        Ok(self.variable(name)?.dims.clone())
    }

    /// 变量类型
    pub fn variable_type(&self, name: &str) -> TableResult<VarType> {
        Ok(match self.variable(name)?.data {
            VarData::Int(_) => VarType::Int,
            VarData::Double(_) => VarType::Double,
        })
    }

    fn variable(&self, name: &str) -> TableResult<&MemoryVariable> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| TableError::VariableNotFound(name.to_string()))
    }

    fn variable_mut(&mut self, name: &str) -> TableResult<&mut MemoryVariable> {
        self.variables
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(|| TableError::VariableNotFound(name.to_string()))
    }

    fn expected_len(&self, dims: &[String]) -> TableResult<usize> {
        dims.iter()
            .map(|d| self.dimension_len(d))
            .try_fold(1usize, |acc, len| len.map(|l| acc * l))
    }
}

fn upsert(attributes: &mut Vec<(String, AttrValue)>, name: &str, value: AttrValue) {
    match attributes.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => attributes.push((name.to_string(), value)),
    }
}

impl TableSink for MemoryTable {
    fn add_dimension(&mut self, name: &str, len: usize) -> TableResult<()> {
        if self.dimensions.iter().any(|(n, _)| n == name) {
            return Err(TableError::AlreadyDefined(name.to_string()));
        }
        self.dimensions.push((name.to_string(), len));
        Ok(())
    }

    fn add_variable(&mut self, name: &str, var_type: VarType, dims: &[&str]) -> TableResult<()> {
        if self.variables.iter().any(|v| v.name == name) {
            return Err(TableError::AlreadyDefined(name.to_string()));
        }
        let dims: Vec<String> = dims.iter().map(|d| (*d).to_string()).collect();
        let len = self.expected_len(&dims)?;
        let data = match var_type {
            VarType::Int => VarData::Int(vec![0; len]),
            VarType::Double => VarData::Double(vec![0.0; len]),
        };
        self.variables.push(MemoryVariable {
            name: name.to_string(),
            dims,
            data,
            attributes: Vec::new(),
        });
        Ok(())
    }

    fn put_attribute(
        &mut self,
        variable: Option<&str>,
        name: &str,
        value: AttrValue,
    ) -> TableResult<()> {
        match variable {
            Some(var) => upsert(&mut self.variable_mut(var)?.attributes, name, value),
            None => upsert(&mut self.global_attributes, name, value),
        }
        Ok(())
    }

    fn put_f64(&mut self, variable: &str, data: &[f64]) -> TableResult<()> {
        let expected = self.expected_len(&self.variable(variable)?.dims)?;
        let var = self.variable_mut(variable)?;
        match &mut var.data {
            VarData::Double(slot) => {
                if data.len() != expected {
                    return Err(TableError::SizeMismatch {
                        variable: variable.to_string(),
                        expected,
                        actual: data.len(),
                    });
                }
                slot.copy_from_slice(data);
                Ok(())
            }
            VarData::Int(_) => Err(TableError::TypeMismatch {
                variable: variable.to_string(),
                expected: "int",
            }),
        }
    }

    fn put_i32(&mut self, variable: &str, data: &[i32]) -> TableResult<()> {
        let expected = self.expected_len(&self.variable(variable)?.dims)?;
        let var = self.variable_mut(variable)?;
        match &mut var.data {
            VarData::Int(slot) => {
                if data.len() != expected {
                    return Err(TableError::SizeMismatch {
                        variable: variable.to_string(),
                        expected,
                        actual: data.len(),
                    });
                }
                slot.copy_from_slice(data);
                Ok(())
            }
            VarData::Double(_) => Err(TableError::TypeMismatch {
                variable: variable.to_string(),
                expected: "double",
            }),
        }
    }
}

impl TableSource for MemoryTable {
    fn dimension_len(&self, name: &str) -> TableResult<usize> {
        self.dimensions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, len)| *len)
            .ok_or_else(|| TableError::DimensionNotFound(name.to_string()))
    }

    fn get_f64(&self, variable: &str) -> TableResult<Vec<f64>> {
        Ok(match &self.variable(variable)?.data {
            VarData::Double(d) => d.clone(),
            VarData::Int(d) => d.iter().map(|&v| f64::from(v)).collect(),
        })
    }

    fn get_i32(&self, variable: &str) -> TableResult<Vec<i32>> {
        match &self.variable(variable)?.data {
            VarData::Int(d) => Ok(d.clone()),
            VarData::Double(_) => Err(TableError::TypeMismatch {
                variable: variable.to_string(),
                expected: "int",
            }),
        }
    }

    fn attribute(&self, variable: Option<&str>, name: &str) -> TableResult<Option<AttrValue>> {
        let attributes = match variable {
            Some(var) => &self.variable(var)?.attributes,
            None => &self.global_attributes,
        };
        Ok(attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }
}
