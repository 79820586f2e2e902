// crates/mh_geo/src/projection/mod.rs

//! 纯 Rust 实现的坐标投影
//!
//! 支持的投影类型：
//! - WGS84 地理坐标 (EPSG:4326)
//! - UTM 投影 (EPSG:326xx/327xx)
//! - Web Mercator (EPSG:3857)
//!
//! 另提供 CPP 局部平面投影（[`cpp`]），用于模式内部坐标。
//!
//! # 示例
//!
//! ```
//! use mh_geo::projection::Projection;
//!
//! let proj = Projection::from_epsg(4326, 32650).unwrap();
//! let (x, y) = proj.forward(116.0, 40.0).unwrap();
//! let (lon, lat) = proj.inverse(x, y).unwrap();
//! assert!((lon - 116.0).abs() < 1e-6);
//! assert!((lat - 40.0).abs() < 1e-6);
//! ```

pub mod cpp;
pub mod transverse_mercator;
mod web_mercator;

pub use cpp::{cpp_forward, cpp_inverse, CPP_EARTH_RADIUS};
pub use web_mercator::*;

use mh_foundation::error::{MhError, MhResult};
use transverse_mercator::TransverseMercatorParams;

// ============================================================================
// 投影类型定义
// ============================================================================

/// 支持的投影类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    /// WGS84 地理坐标 (经纬度)
    Geographic,
    /// UTM 投影
    Utm {
        /// UTM 带号 (1-60)
        zone: u8,
        /// 是否为北半球
        north: bool,
    },
    /// Web Mercator (EPSG:3857)
    WebMercator,
}

impl ProjectionType {
    /// 从 EPSG 代码解析投影类型
    ///
    /// # Errors
    /// 不支持的 EPSG 代码返回坐标系错误
    pub fn from_epsg(code: u32) -> MhResult<Self> {
        match code {
            4326 => Ok(Self::Geographic),
            3857 | 900_913 => Ok(Self::WebMercator),
            32601..=32660 => Ok(Self::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(Self::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            _ => Err(MhError::crs(format!(
                "不支持的 EPSG 代码: {code}，支持 4326、3857、32601-32660、32701-32760"
            ))),
        }
    }

    /// 转换为 EPSG 代码
    #[must_use]
    pub fn to_epsg(&self) -> u32 {
        match self {
            Self::Geographic => 4326,
            Self::WebMercator => 3857,
            Self::Utm { zone, north: true } => 32600 + u32::from(*zone),
            Self::Utm { zone, north: false } => 32700 + u32::from(*zone),
        }
    }

    /// 是否为地理坐标（经纬度）
    #[must_use]
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Geographic)
    }

    /// 经纬度 -> 本投影
    fn from_geographic(&self, lon: f64, lat: f64) -> MhResult<(f64, f64)> {
        match self {
            Self::Geographic => check_geographic(lon, lat),
            Self::WebMercator => geographic_to_web_mercator(lon, lat),
            Self::Utm { zone, north } => {
                transverse_mercator::forward(&TransverseMercatorParams::utm(*zone, *north), lon, lat)
            }
        }
    }

    /// 本投影 -> 经纬度
    fn to_geographic(&self, x: f64, y: f64) -> MhResult<(f64, f64)> {
        match self {
            Self::Geographic => check_geographic(x, y),
            Self::WebMercator => web_mercator_to_geographic(x, y),
            Self::Utm { zone, north } => {
                transverse_mercator::inverse(&TransverseMercatorParams::utm(*zone, *north), x, y)
            }
        }
    }
}

fn check_geographic(lon: f64, lat: f64) -> MhResult<(f64, f64)> {
    if lon.is_finite() && lat.is_finite() && lat.abs() <= 90.0 {
        Ok((lon, lat))
    } else {
        Err(MhError::projection(format!(
            "无效的经纬度: lon={lon}, lat={lat}"
        )))
    }
}

// ============================================================================
// 投影转换
// ============================================================================

/// 源投影到目标投影的转换，经由 WGS84 经纬度中转
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    source: ProjectionType,
    target: ProjectionType,
}

impl Projection {
    /// 创建投影转换
    #[must_use]
    pub fn new(source: ProjectionType, target: ProjectionType) -> Self {
        Self { source, target }
    }

    /// 从 EPSG 代码创建
    ///
    /// # Errors
    /// 任一 EPSG 代码不支持时返回错误
    pub fn from_epsg(source_epsg: u32, target_epsg: u32) -> MhResult<Self> {
        Ok(Self::new(
            ProjectionType::from_epsg(source_epsg)?,
            ProjectionType::from_epsg(target_epsg)?,
        ))
    }

    /// 正向转换：源 -> 目标
    ///
    /// # Errors
    /// 坐标超出投影定义域时返回投影错误
    pub fn forward(&self, x: f64, y: f64) -> MhResult<(f64, f64)> {
        if self.is_identity() {
            return Ok((x, y));
        }
        let (lon, lat) = self.source.to_geographic(x, y)?;
        self.target.from_geographic(lon, lat)
    }

    /// 逆向转换：目标 -> 源
    ///
    /// # Errors
    /// 坐标超出投影定义域时返回投影错误
    pub fn inverse(&self, x: f64, y: f64) -> MhResult<(f64, f64)> {
        if self.is_identity() {
            return Ok((x, y));
        }
        let (lon, lat) = self.target.to_geographic(x, y)?;
        self.source.from_geographic(lon, lat)
    }

    /// 源与目标相同
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// 源投影
    #[must_use]
    pub fn source(&self) -> &ProjectionType {
        &self.source
    }

    /// 目标投影
    #[must_use]
    pub fn target(&self) -> &ProjectionType {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_parsing() {
        assert_eq!(ProjectionType::from_epsg(4326).unwrap(), ProjectionType::Geographic);
        assert_eq!(
            ProjectionType::from_epsg(32617).unwrap(),
            ProjectionType::Utm { zone: 17, north: true }
        );
        assert_eq!(
            ProjectionType::from_epsg(32755).unwrap(),
            ProjectionType::Utm { zone: 55, north: false }
        );
        assert!(ProjectionType::from_epsg(12345).is_err());
    }

    #[test]
    fn test_epsg_roundtrip() {
        for code in [4326, 3857, 32601, 32660, 32701, 32760] {
            assert_eq!(ProjectionType::from_epsg(code).unwrap().to_epsg(), code);
        }
    }

    #[test]
    fn test_utm_to_web_mercator_chain() {
        let proj = Projection::from_epsg(32617, 3857).unwrap();
        let utm = Projection::from_epsg(4326, 32617).unwrap();
        let (x, y) = utm.forward(-80.0, 30.0).unwrap();
        let (mx, my) = proj.forward(x, y).unwrap();
        let (wx, wy) = geographic_to_web_mercator(-80.0, 30.0).unwrap();
        assert!((mx - wx).abs() < 1e-3);
        assert!((my - wy).abs() < 1e-3);
    }

    #[test]
    fn test_geographic_rejects_bad_latitude() {
        let proj = Projection::from_epsg(4326, 3857).unwrap();
        assert!(proj.forward(0.0, 120.0).is_err());
    }
}
