// crates/mh_geo/src/crs.rs

//! 坐标参考系统 (CRS) 描述
//!
//! 网格只关心两件事：当前坐标所在参考系的 EPSG 代码，以及它是否为地理坐标（经纬度）。
//! 后者决定输出的小数位数和 UGRID 坐标轴的元数据。
//!
//! # 示例
//!
//! ```
//! use mh_geo::crs::Crs;
//!
//! let wgs84 = Crs::wgs84();
//! assert!(wgs84.is_geographic());
//!
//! let utm = Crs::from_epsg(32650).unwrap();
//! assert!(!utm.is_geographic());
//! assert_eq!(utm.to_string(), "EPSG:32650");
//!
//! let parsed: Crs = "epsg:4326".parse().unwrap();
//! assert_eq!(parsed, wgs84);
//! ```

use crate::projection::ProjectionType;
use mh_foundation::error::{MhError, MhResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WGS84 的 EPSG 代码
pub const EPSG_WGS84: u32 = 4326;

/// 坐标参考系统描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs {
    epsg: u32,
    geographic: bool,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    /// 直接声明 EPSG 与地理标记，不校验代码是否受内置投影支持
    ///
    /// 用于从文件或调用方登记一个已知的参考系，坐标转换仍需要对应的转换器支持。
    #[must_use]
    pub const fn new(epsg: u32, geographic: bool) -> Self {
        Self { epsg, geographic }
    }

    /// WGS84 经纬度
    #[must_use]
    pub const fn wgs84() -> Self {
        Self::new(EPSG_WGS84, true)
    }

    /// 从 EPSG 代码创建，地理标记由内置投影表推断
    ///
    /// # Errors
    /// EPSG 代码不受支持时返回坐标系错误
    pub fn from_epsg(epsg: u32) -> MhResult<Self> {
        let kind = ProjectionType::from_epsg(epsg)?;
        Ok(Self::new(epsg, kind.is_geographic()))
    }

    /// EPSG 代码
    #[inline]
    #[must_use]
    pub const fn epsg(&self) -> u32 {
        self.epsg
    }

    /// 是否为地理坐标（经纬度）
    #[inline]
    #[must_use]
    pub const fn is_geographic(&self) -> bool {
        self.geographic
    }

    /// 坐标单位名称
    #[must_use]
    pub const fn unit_name(&self) -> &'static str {
        if self.geographic {
            "degree"
        } else {
            "metre"
        }
    }

    /// 从 "EPSG:xxxx" 或纯数字字符串中提取 EPSG 代码
    #[must_use]
    pub fn parse_epsg(definition: &str) -> Option<u32> {
        let trimmed = definition.trim();
        let code = match trimmed.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
            Some(_) => return None,
            None => trimmed,
        };
        code.trim().parse().ok()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

impl FromStr for Crs {
    type Err = MhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = Self::parse_epsg(s)
            .ok_or_else(|| MhError::crs(format!("无法解析坐标系定义: {s}")))?;
        Self::from_epsg(code)
    }
}
