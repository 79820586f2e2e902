// crates/mh_io/src/drivers/netcdf/driver.rs

//! NetCDF 驱动实现

use crate::drivers::table::{AttrValue, TableError, TableResult, TableSink, TableSource, VarType};
use std::path::Path;

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for TableError {
    fn from(e: netcdf::Error) -> Self {
        TableError::Backend(e.to_string())
    }
}

#[cfg(feature = "netcdf")]
fn to_attr_value(value: netcdf::AttributeValue) -> Option<AttrValue> {
    match value {
        netcdf::AttributeValue::Str(s) => Some(AttrValue::Str(s)),
        netcdf::AttributeValue::Int(v) => Some(AttrValue::Int(v)),
        netcdf::AttributeValue::Short(v) => Some(AttrValue::Int(i32::from(v))),
        netcdf::AttributeValue::Double(v) => Some(AttrValue::Double(v)),
        netcdf::AttributeValue::Float(v) => Some(AttrValue::Double(f64::from(v))),
        _ => None,
    }
}

// ============================================================================
// 读取
// ============================================================================

/// NetCDF 只读表
#[cfg(feature = "netcdf")]
pub struct NetCdfReader {
    file: netcdf::File,
}

#[cfg(feature = "netcdf")]
impl NetCdfReader {
    /// 打开 NetCDF 文件
    pub fn open(path: impl AsRef<Path>) -> TableResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TableError::FileNotFound(path.display().to_string()));
        }
        let file = netcdf::open(path)?;
        Ok(Self { file })
    }

    fn variable(&self, name: &str) -> TableResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| TableError::VariableNotFound(name.to_string()))
    }
}

#[cfg(feature = "netcdf")]
impl TableSource for NetCdfReader {
    fn dimension_len(&self, name: &str) -> TableResult<usize> {
        self.file
            .dimension(name)
            .map(|d| d.len())
            .ok_or_else(|| TableError::DimensionNotFound(name.to_string()))
    }

    fn get_f64(&self, variable: &str) -> TableResult<Vec<f64>> {
        Ok(self.variable(variable)?.get_values::<f64, _>(..)?)
    }

    fn get_i32(&self, variable: &str) -> TableResult<Vec<i32>> {
        Ok(self.variable(variable)?.get_values::<i32, _>(..)?)
    }

    fn get_i64(&self, variable: &str) -> TableResult<Vec<i64>> {
        Ok(self.variable(variable)?.get_values::<i64, _>(..)?)
    }

    fn attribute(&self, variable: Option<&str>, name: &str) -> TableResult<Option<AttrValue>> {
        let attr = match variable {
            Some(var) => self.variable(var)?.attribute(name),
            None => self.file.attribute(name),
        };
        match attr {
            Some(a) => Ok(to_attr_value(a.value()?)),
            None => Ok(None),
        }
    }
}

// ============================================================================
// 写入
// ============================================================================

/// NetCDF 可写表
#[cfg(feature = "netcdf")]
pub struct NetCdfWriter {
    file: netcdf::FileMut,
}

#[cfg(feature = "netcdf")]
impl NetCdfWriter {
    /// 创建（覆盖）NetCDF 文件
    pub fn create(path: impl AsRef<Path>) -> TableResult<Self> {
        let file = netcdf::create(path.as_ref())?;
        Ok(Self { file })
    }

    fn variable_mut(&mut self, name: &str) -> TableResult<netcdf::VariableMut<'_>> {
        self.file
            .variable_mut(name)
            .ok_or_else(|| TableError::VariableNotFound(name.to_string()))
    }
}

#[cfg(feature = "netcdf")]
impl TableSink for NetCdfWriter {
    fn add_dimension(&mut self, name: &str, len: usize) -> TableResult<()> {
        self.file.add_dimension(name, len)?;
        Ok(())
    }

    fn add_variable(&mut self, name: &str, var_type: VarType, dims: &[&str]) -> TableResult<()> {
        match var_type {
            VarType::Int => self.file.add_variable::<i32>(name, dims)?,
            VarType::Double => self.file.add_variable::<f64>(name, dims)?,
        };
        Ok(())
    }

    fn put_attribute(
        &mut self,
        variable: Option<&str>,
        name: &str,
        value: AttrValue,
    ) -> TableResult<()> {
        let Some(var_name) = variable else {
            match value {
                AttrValue::Str(s) => self.file.add_attribute(name, s)?,
                AttrValue::Int(v) => self.file.add_attribute(name, v)?,
                AttrValue::Double(v) => self.file.add_attribute(name, v)?,
            };
            return Ok(());
        };

        let mut var = self.variable_mut(var_name)?;
        // _FillValue 必须通过专用接口设置
        if name == "_FillValue" {
            match value {
                AttrValue::Int(v) => var.set_fill_value(v)?,
                AttrValue::Double(v) => var.set_fill_value(v)?,
                AttrValue::Str(_) => {
                    return Err(TableError::TypeMismatch {
                        variable: var_name.to_string(),
                        expected: "numeric _FillValue",
                    })
                }
            }
            return Ok(());
        }
        match value {
            AttrValue::Str(s) => var.put_attribute(name, s)?,
            AttrValue::Int(v) => var.put_attribute(name, v)?,
            AttrValue::Double(v) => var.put_attribute(name, v)?,
        };
        Ok(())
    }

    fn put_f64(&mut self, variable: &str, data: &[f64]) -> TableResult<()> {
        self.variable_mut(variable)?.put_values(data, ..)?;
        Ok(())
    }

    fn put_i32(&mut self, variable: &str, data: &[i32]) -> TableResult<()> {
        self.variable_mut(variable)?.put_values(data, ..)?;
        Ok(())
    }
}

// ============================================================================
// 无 NetCDF 支持时的占位实现
// ============================================================================

/// NetCDF 只读表 (无 NetCDF 支持)
#[cfg(not(feature = "netcdf"))]
pub struct NetCdfReader {
    _private: (),
}

#[cfg(not(feature = "netcdf"))]
impl NetCdfReader {
    /// 打开 NetCDF 文件 (无 NetCDF 支持)
    pub fn open(_path: impl AsRef<Path>) -> TableResult<Self> {
        Err(TableError::NotAvailable)
    }
}

#[cfg(not(feature = "netcdf"))]
impl TableSource for NetCdfReader {
    fn dimension_len(&self, _name: &str) -> TableResult<usize> {
        Err(TableError::NotAvailable)
    }

    fn get_f64(&self, _variable: &str) -> TableResult<Vec<f64>> {
        Err(TableError::NotAvailable)
    }

    fn get_i32(&self, _variable: &str) -> TableResult<Vec<i32>> {
        Err(TableError::NotAvailable)
    }

    fn attribute(&self, _variable: Option<&str>, _name: &str) -> TableResult<Option<AttrValue>> {
        Err(TableError::NotAvailable)
    }
}

/// NetCDF 可写表 (无 NetCDF 支持)
#[cfg(not(feature = "netcdf"))]
pub struct NetCdfWriter {
    _private: (),
}

#[cfg(not(feature = "netcdf"))]
impl NetCdfWriter {
    /// 创建 NetCDF 文件 (无 NetCDF 支持)
    pub fn create(_path: impl AsRef<Path>) -> TableResult<Self> {
        Err(TableError::NotAvailable)
    }
}

#[cfg(not(feature = "netcdf"))]
impl TableSink for NetCdfWriter {
    fn add_dimension(&mut self, _name: &str, _len: usize) -> TableResult<()> {
        Err(TableError::NotAvailable)
    }

    fn add_variable(&mut self, _name: &str, _var_type: VarType, _dims: &[&str]) -> TableResult<()> {
        Err(TableError::NotAvailable)
    }

    fn put_attribute(
        &mut self,
        _variable: Option<&str>,
        _name: &str,
        _value: AttrValue,
    ) -> TableResult<()> {
        Err(TableError::NotAvailable)
    }

    fn put_f64(&mut self, _variable: &str, _data: &[f64]) -> TableResult<()> {
        Err(TableError::NotAvailable)
    }

    fn put_i32(&mut self, _variable: &str, _data: &[i32]) -> TableResult<()> {
        Err(TableError::NotAvailable)
    }
}

#[cfg(all(test, not(feature = "netcdf")))]
mod tests {
    use super::*;

    #[test]
    fn test_stub_reports_not_available() {
        assert!(matches!(
            NetCdfReader::open("mesh_net.nc"),
            Err(TableError::NotAvailable)
        ));
        assert!(matches!(
            NetCdfWriter::create("mesh_net.nc"),
            Err(TableError::NotAvailable)
        ));
    }
}
