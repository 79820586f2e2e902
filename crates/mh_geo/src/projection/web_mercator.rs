// crates/mh_geo/src/projection/web_mercator.rs

//! Web Mercator 投影 (EPSG:3857)
//!
//! 球面墨卡托，半径取 WGS84 长半轴。高纬度形变大，只适合与底图对齐。

use crate::ellipsoid::Ellipsoid;
use mh_foundation::error::{MhError, MhResult};
use std::f64::consts::FRAC_PI_4;

/// Web Mercator 使用的地球半径（等于 WGS84 长半轴）
pub const WEB_MERCATOR_RADIUS: f64 = Ellipsoid::WGS84.a;

/// Web Mercator 最大纬度 (度)
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779;

/// 地理坐标 -> Web Mercator
///
/// 纬度裁剪到 ±85.0511°。
///
/// # Errors
/// 坐标非有限值时返回投影错误
pub fn geographic_to_web_mercator(lon: f64, lat: f64) -> MhResult<(f64, f64)> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(MhError::projection(format!(
            "Web Mercator 正算输入无效: lon={lon}, lat={lat}"
        )));
    }
    let lat = lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT);
    let x = WEB_MERCATOR_RADIUS * lon.to_radians();
    let y = WEB_MERCATOR_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Ok((x, y))
}

/// Web Mercator -> 地理坐标
///
/// # Errors
/// 坐标非有限值时返回投影错误
pub fn web_mercator_to_geographic(x: f64, y: f64) -> MhResult<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return Err(MhError::projection(format!(
            "Web Mercator 反算输入无效: x={x}, y={y}"
        )));
    }
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    Ok((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_mercator_roundtrip() {
        let (x, y) = geographic_to_web_mercator(-75.5, 35.2).unwrap();
        let (lon, lat) = web_mercator_to_geographic(x, y).unwrap();
        assert!((lon + 75.5).abs() < 1e-9);
        assert!((lat - 35.2).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_origin() {
        let (x, y) = geographic_to_web_mercator(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }
}
