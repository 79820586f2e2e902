// crates/mh_io/src/error.rs
//! IO 错误类型定义
//!
//! 表驱动错误和要素导出错误都汇总到 `IoError`，最终可转换为 `MhError`。

use crate::drivers::TableError;
use mh_foundation::MhError;
use thiserror::Error;

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 文件读写失败
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Serialization(String),

    /// 要素与图层定义不一致
    #[error("要素与图层定义不一致: {0}")]
    FeatureMismatch(String),

    /// 表驱动错误
    #[error(transparent)]
    Table(#[from] TableError),
}

impl From<IoError> for MhError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => MhError::io_with_source("文件读写失败", e),
            IoError::Serialization(message) => MhError::serialization(message),
            IoError::FeatureMismatch(message) => MhError::invalid_input(message),
            IoError::Table(TableError::NotAvailable) => MhError::not_implemented("NetCDF 支持"),
            IoError::Table(TableError::FileNotFound(path)) => MhError::file_not_found(path),
            IoError::Table(other) => MhError::io(other.to_string()),
        }
    }
}

impl From<TableError> for MhError {
    fn from(err: TableError) -> Self {
        IoError::Table(err).into()
    }
}
