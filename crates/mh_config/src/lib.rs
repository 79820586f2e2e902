// crates/mh_config/src/lib.rs

//! MariHydro 网格引擎配置层
//!
//! 提供网格引擎的可调参数：默认参考系、点定位搜索深度、输出精度和 2dm 默认网格名。
//! 所有字段都有默认值，JSON 配置文件只需写出要覆盖的部分。
//!
//! # 模块概览
//!
//! - [`engine_config`]: `MeshEngineConfig` 及其子配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! mh_mesh        ─> 读取 MeshEngineConfig
//! mh_config      ─> MeshEngineConfig (本层)
//! mh_foundation  ─> MhError
//! ```
//!
//! # 示例
//!
//! ```
//! use mh_config::MeshEngineConfig;
//!
//! let config = MeshEngineConfig::from_json_str(r#"{ "search": { "element_search_depth": 8 } }"#).unwrap();
//! assert_eq!(config.search.element_search_depth, 8);
//! assert_eq!(config.projection.default_epsg, 4326);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine_config;
pub mod error;

// 重导出核心类型
pub use engine_config::{
    MeshEngineConfig, OutputConfig, ProjectionConfig, SearchConfig, Sms2dmConfig,
};
pub use error::ConfigError;
