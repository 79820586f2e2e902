// crates/mh_io/src/drivers/table.rs

//! 二进制表协作者接口
//!
//! 表格式（netCDF 及其内存替身）只提供"维度 / 变量 / 属性"的创建、写入与读取原语。
//! 数据的含义（填充值判定、UGRID 约定、起始编号）全部由调用方负责。
//!
//! 写入顺序：先定义维度，再定义变量，然后写属性和数据。变量数据按行优先展平，
//! 长度必须等于各维度长度之积（标量变量为 1）。

use thiserror::Error;

/// netCDF 整型默认填充值 (NC_FILL_INT)
pub const NC_FILL_INT: i32 = -2_147_483_647;

/// netCDF 64 位整型默认填充值 (NC_FILL_INT64)
pub const NC_FILL_INT64: i64 = -9_223_372_036_854_775_806;

/// netCDF 双精度默认填充值 (NC_FILL_DOUBLE)
pub const NC_FILL_DOUBLE: f64 = 9.969_209_968_386_869e36;

/// 表操作错误
#[derive(Error, Debug)]
pub enum TableError {
    /// 文件不存在
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    /// 维度不存在
    #[error("维度不存在: {0}")]
    DimensionNotFound(String),

    /// 变量不存在
    #[error("变量不存在: {0}")]
    VariableNotFound(String),

    /// 名称重复定义
    #[error("重复定义: {0}")]
    AlreadyDefined(String),

    /// 写入数据长度与维度不符
    #[error("变量 {variable} 数据长度不符: 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 变量名
        variable: String,
        /// 维度决定的长度
        expected: usize,
        /// 实际提供的长度
        actual: usize,
    },

    /// 数据类型不匹配
    #[error("变量 {variable} 类型不匹配: 期望 {expected}")]
    TypeMismatch {
        /// 变量名
        variable: String,
        /// 期望的类型
        expected: &'static str,
    },

    /// 未启用 netCDF 支持
    #[error("NetCDF 不可用: 需要启用 `netcdf` feature")]
    NotAvailable,

    /// 后端库报告的错误
    #[error("NetCDF 错误: {0}")]
    Backend(String),
}

/// 表结果类型
pub type TableResult<T> = Result<T, TableError>;

/// 变量存储类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    /// 32 位整型
    Int,
    /// 双精度浮点
    Double,
}

/// 属性值
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// 字符串
    Str(String),
    /// 32 位整型
    Int(i32),
    /// 双精度浮点
    Double(f64),
}

impl AttrValue {
    /// 作为整数读取
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Double(v) if v.fract() == 0.0 => Some(*v as i32),
            _ => None,
        }
    }

    /// 作为字符串读取
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

/// 表写入原语
pub trait TableSink {
    /// 定义维度
    fn add_dimension(&mut self, name: &str, len: usize) -> TableResult<()>;

    /// 定义变量，`dims` 为空表示标量
    fn add_variable(&mut self, name: &str, var_type: VarType, dims: &[&str]) -> TableResult<()>;

    /// 写属性，`variable` 为 `None` 时写全局属性
    fn put_attribute(&mut self, variable: Option<&str>, name: &str, value: AttrValue)
        -> TableResult<()>;

    /// 写双精度数据
    fn put_f64(&mut self, variable: &str, data: &[f64]) -> TableResult<()>;

    /// 写整型数据
    fn put_i32(&mut self, variable: &str, data: &[i32]) -> TableResult<()>;
}

/// 表读取原语
pub trait TableSource {
    /// 维度长度
    fn dimension_len(&self, name: &str) -> TableResult<usize>;

    /// 读取变量为双精度（整型变量按值转换）
    fn get_f64(&self, variable: &str) -> TableResult<Vec<f64>>;

    /// 读取整型变量
    fn get_i32(&self, variable: &str) -> TableResult<Vec<i32>>;

    /// 读取整型变量为 64 位整数
    ///
    /// 默认由 [`TableSource::get_i32`] 加宽，能存储 64 位整型的驱动应直接读取。
    fn get_i64(&self, variable: &str) -> TableResult<Vec<i64>> {
        Ok(self.get_i32(variable)?.into_iter().map(i64::from).collect())
    }

    /// 读取属性，不存在时返回 `Ok(None)`；变量本身不存在是错误
    fn attribute(&self, variable: Option<&str>, name: &str) -> TableResult<Option<AttrValue>>;
}
