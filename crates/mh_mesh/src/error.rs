// crates/mh_mesh/src/error.rs
//! 网格引擎错误类型
//!
//! 覆盖文件预检、记录解析、格式识别、编号查找、位置越界、外部协作者失败等情况。
//! 所有错误可转换为 `mh_foundation::MhError` 向上传播。

use mh_config::ConfigError;
use mh_foundation::MhError;
use mh_io::{IoError, TableError};
use std::path::PathBuf;
use thiserror::Error;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug)]
pub enum MeshError {
    /// 读写时没有可用的文件名
    #[error("未指定网格文件名")]
    NoFilename,

    /// 文件不存在
    #[error("网格文件不存在: {path}")]
    FileNotFound {
        /// 路径
        path: PathBuf,
    },

    /// 行或记录无法按预期的字段数/类型解析
    #[error("{format} 记录格式错误, 行 {line}: {message}")]
    MalformedRecord {
        /// 格式名
        format: &'static str,
        /// 行号（表格式为 0）
        line: usize,
        /// 说明
        message: String,
    },

    /// 无法识别的格式，或超出支持范围的维度
    #[error("不支持的网格格式: {format}")]
    UnsupportedFormat {
        /// 文件名或维度描述
        format: String,
    },

    /// 外部编号查找失败
    #[error("{entity} 编号 {id} 不存在")]
    IdentityNotFound {
        /// 实体类型
        entity: &'static str,
        /// 外部编号
        id: usize,
    },

    /// 位置越界
    #[error("{entity} 位置 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 实体类型
        entity: &'static str,
        /// 访问的位置
        index: usize,
        /// 集合长度
        len: usize,
    },

    /// 坐标转换或二进制表协作者报告失败
    #[error("外部转换失败: {message}")]
    TransformFailure {
        /// 协作者给出的信息
        message: String,
    },

    /// 未实现的操作
    #[error("功能未实现: {feature}")]
    NotImplemented {
        /// 功能描述
        feature: String,
    },

    /// 修改会破坏引用关系
    #[error("拓扑错误: {operation} 失败, {details}")]
    InvalidTopology {
        /// 操作名
        operation: &'static str,
        /// 详情
        details: String,
    },

    /// 同一集合中出现重复编号
    #[error("{entity} 编号 {id} 重复")]
    DuplicateIdentity {
        /// 实体类型
        entity: &'static str,
        /// 重复的编号
        id: usize,
    },

    /// 数组长度与网格规模不符
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名
        name: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 底层 IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 引擎配置无效
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

// ============================================================================
// 便捷构造函数
// ============================================================================

impl MeshError {
    /// 记录格式错误
    pub fn malformed(format: &'static str, line: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            format,
            line,
            message: message.into(),
        }
    }

    /// 拓扑错误
    pub fn invalid_topology(operation: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidTopology {
            operation,
            details: details.into(),
        }
    }

    /// 不支持的格式
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// 外部转换失败
    pub fn transform_failure(message: impl Into<String>) -> Self {
        Self::TransformFailure {
            message: message.into(),
        }
    }

    /// 位置检查
    #[inline]
    pub fn check_index(entity: &'static str, index: usize, len: usize) -> MeshResult<()> {
        if index >= len {
            Err(Self::IndexOutOfBounds { entity, index, len })
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// 外部错误转换
// ============================================================================

impl From<MhError> for MeshError {
    fn from(err: MhError) -> Self {
        match err {
            MhError::FileNotFound { path } => Self::FileNotFound { path },
            MhError::NotImplemented { feature } => Self::NotImplemented { feature },
            MhError::IndexOutOfBounds {
                index_type,
                index,
                len,
            } => Self::IndexOutOfBounds {
                entity: index_type,
                index,
                len,
            },
            other => Self::transform_failure(other.to_string()),
        }
    }
}

impl From<TableError> for MeshError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::NotAvailable => Self::NotImplemented {
                feature: "NetCDF 支持（需启用 `netcdf` feature）".into(),
            },
            TableError::FileNotFound(path) => Self::FileNotFound { path: path.into() },
            other => Self::transform_failure(other.to_string()),
        }
    }
}

impl From<IoError> for MeshError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => Self::Io(e),
            IoError::Table(t) => t.into(),
            other => Self::transform_failure(other.to_string()),
        }
    }
}

/// 转换到 Foundation 层错误
impl From<MeshError> for MhError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::NoFilename => MhError::invalid_input("未指定网格文件名"),
            MeshError::FileNotFound { path } => MhError::file_not_found(path),
            MeshError::MalformedRecord {
                format,
                line,
                message,
            } => MhError::parse(format, line, message),
            MeshError::UnsupportedFormat { format } => MhError::unsupported_format(
                format,
                vec![
                    ".14".into(),
                    ".grd".into(),
                    ".2dm".into(),
                    "_net.nc".into(),
                ],
            ),
            MeshError::IdentityNotFound { entity, id } => {
                MhError::not_found(format!("{entity} 编号 {id}"))
            }
            MeshError::IndexOutOfBounds { entity, index, len } => {
                MhError::index_out_of_bounds(entity, index, len)
            }
            MeshError::TransformFailure { message } => MhError::projection(message),
            MeshError::NotImplemented { feature } => MhError::not_implemented(feature),
            e @ (MeshError::InvalidTopology { .. } | MeshError::DuplicateIdentity { .. }) => {
                MhError::invalid_mesh(e.to_string())
            }
            MeshError::SizeMismatch {
                name,
                expected,
                actual,
            } => MhError::size_mismatch(name, expected, actual),
            MeshError::Io(e) => e.into(),
            MeshError::Config(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_to_foundation() {
        let mesh_err = MeshError::invalid_topology("delete_node", "节点 3 仍被单元 1 引用");
        let foundation_err: MhError = mesh_err.into();
        assert!(matches!(foundation_err, MhError::InvalidMesh { .. }));
        assert!(foundation_err.to_string().contains("delete_node"));
    }

    #[test]
    fn test_malformed_record_keeps_line() {
        let err: MhError = MeshError::malformed("ADCIRC", 7, "字段不足").into();
        assert!(matches!(err, MhError::ParseError { line: 7, .. }));
    }

    #[test]
    fn test_table_not_available_is_not_implemented() {
        let err: MeshError = TableError::NotAvailable.into();
        assert!(matches!(err, MeshError::NotImplemented { .. }));
    }

    #[test]
    fn test_projection_error_is_transform_failure() {
        let err: MeshError = MhError::projection("bad latitude").into();
        assert!(matches!(err, MeshError::TransformFailure { .. }));
    }

    #[test]
    fn test_check_index() {
        assert!(MeshError::check_index("Node", 2, 3).is_ok());
        assert!(matches!(
            MeshError::check_index("Node", 3, 3),
            Err(MeshError::IndexOutOfBounds { index: 3, len: 3, .. })
        ));
    }
}
