// crates/mh_config/src/engine_config.rs

//! MeshEngineConfig - 网格引擎配置
//!
//! JSON 表示，缺省字段取默认值：
//!
//! ```json
//! {
//!   "projection": { "default_epsg": 4326, "geographic": true },
//!   "search": { "element_search_depth": 20 },
//!   "output": { "geographic_decimals": 10, "projected_decimals": 4, "attribute_decimals": 6 },
//!   "sms2dm": { "placeholder_name": "Mesh" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// 小数位数上限，超过 f64 的有效位数没有意义
const MAX_DECIMALS: usize = 16;

/// 网格引擎配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshEngineConfig {
    /// 新建网格的参考系
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// 空间查询参数
    #[serde(default)]
    pub search: SearchConfig,

    /// 文本格式输出精度
    #[serde(default)]
    pub output: OutputConfig,

    /// 2dm 格式参数
    #[serde(default)]
    pub sms2dm: Sms2dmConfig,
}

/// 参考系配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// EPSG 代码
    #[serde(default = "default_epsg")]
    pub default_epsg: u32,

    /// 是否为地理坐标
    #[serde(default = "default_geographic")]
    pub geographic: bool,
}

fn default_epsg() -> u32 { 4326 }
fn default_geographic() -> bool { true }

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_epsg: default_epsg(),
            geographic: default_geographic(),
        }
    }
}

/// 空间查询配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// 点定位时检查的最近单元质心数
    #[serde(default = "default_search_depth")]
    pub element_search_depth: usize,
}

fn default_search_depth() -> usize { 20 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            element_search_depth: default_search_depth(),
        }
    }
}

/// 输出精度配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 地理坐标的小数位数
    #[serde(default = "default_geographic_decimals")]
    pub geographic_decimals: usize,

    /// 投影坐标的小数位数
    #[serde(default = "default_projected_decimals")]
    pub projected_decimals: usize,

    /// 边界属性（堰顶高程、流量系数、管道参数）的小数位数
    #[serde(default = "default_attribute_decimals")]
    pub attribute_decimals: usize,
}

fn default_geographic_decimals() -> usize { 10 }
fn default_projected_decimals() -> usize { 4 }
fn default_attribute_decimals() -> usize { 6 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            geographic_decimals: default_geographic_decimals(),
            projected_decimals: default_projected_decimals(),
            attribute_decimals: default_attribute_decimals(),
        }
    }
}

impl OutputConfig {
    /// 按坐标类型选择小数位数
    #[must_use]
    pub fn coordinate_decimals(&self, geographic: bool) -> usize {
        if geographic {
            self.geographic_decimals
        } else {
            self.projected_decimals
        }
    }
}

/// 2dm 格式配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sms2dmConfig {
    /// 文件中没有 MESHNAME 时使用的网格名
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
}

fn default_placeholder_name() -> String { "Mesh".to_string() }

impl Default for Sms2dmConfig {
    fn default() -> Self {
        Self {
            placeholder_name: default_placeholder_name(),
        }
    }
}

impl MeshEngineConfig {
    /// 从 JSON 字符串解析并验证
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: MeshEngineConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.element_search_depth == 0 {
            return Err(ConfigError::invalid_value(
                "search.element_search_depth",
                self.search.element_search_depth,
                "搜索深度必须为正",
            ));
        }

        let decimals = [
            ("output.geographic_decimals", self.output.geographic_decimals),
            ("output.projected_decimals", self.output.projected_decimals),
            ("output.attribute_decimals", self.output.attribute_decimals),
        ];
        for (key, value) in decimals {
            if value > MAX_DECIMALS {
                return Err(ConfigError::invalid_value(
                    key,
                    value,
                    format!("小数位数不能超过 {MAX_DECIMALS}"),
                ));
            }
        }

        if self.sms2dm.placeholder_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "sms2dm.placeholder_name",
                "",
                "默认网格名不能为空",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MeshEngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.element_search_depth, 20);
        assert_eq!(config.output.coordinate_decimals(true), 10);
        assert_eq!(config.output.coordinate_decimals(false), 4);
        assert_eq!(config.sms2dm.placeholder_name, "Mesh");
    }

    #[test]
    fn test_partial_json() {
        let config =
            MeshEngineConfig::from_json_str(r#"{"output": {"projected_decimals": 6}}"#).unwrap();
        assert_eq!(config.output.projected_decimals, 6);
        assert_eq!(config.output.geographic_decimals, 10);
        assert!(config.projection.geographic);
    }

    #[test]
    fn test_invalid_search_depth() {
        let mut config = MeshEngineConfig::default();
        config.search.element_search_depth = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            MeshEngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");

        let mut config = MeshEngineConfig::default();
        config.projection.default_epsg = 32617;
        config.projection.geographic = false;
        config.save_to_file(&path).unwrap();

        let loaded = MeshEngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
