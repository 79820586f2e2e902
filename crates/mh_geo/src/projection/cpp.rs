// crates/mh_geo/src/projection/cpp.rs

//! 等距圆柱局部平面投影（CPP, Carte Parallélogrammatique）
//!
//! 海洋模式的原生工作坐标系：以 (λ0, φ0) 为原点，
//!
//! ```text
//! x = R · (λ - λ0) · cos φ0
//! y = R · φ
//! ```
//!
//! 只做坐标对变换，不涉及坐标系登记。

use crate::geometry::Point2D;

/// CPP 使用的地球半径 (m)
pub const CPP_EARTH_RADIUS: f64 = 6_378_206.4;

/// 经纬度 (度) -> CPP 平面坐标 (m)
#[inline]
#[must_use]
pub fn cpp_forward(lambda0: f64, phi0: f64, lon: f64, lat: f64) -> (f64, f64) {
    let x = CPP_EARTH_RADIUS * (lon - lambda0).to_radians() * phi0.to_radians().cos();
    let y = CPP_EARTH_RADIUS * lat.to_radians();
    (x, y)
}

/// CPP 平面坐标 (m) -> 经纬度 (度)
#[inline]
#[must_use]
pub fn cpp_inverse(lambda0: f64, phi0: f64, x: f64, y: f64) -> (f64, f64) {
    let lon = lambda0 + (x / (CPP_EARTH_RADIUS * phi0.to_radians().cos())).to_degrees();
    let lat = (y / CPP_EARTH_RADIUS).to_degrees();
    (lon, lat)
}

/// 批量正算
#[must_use]
pub fn cpp_forward_points(lambda0: f64, phi0: f64, points: &[Point2D]) -> Vec<Point2D> {
    points
        .iter()
        .map(|p| cpp_forward(lambda0, phi0, p.x, p.y).into())
        .collect()
}

/// 批量反算
#[must_use]
pub fn cpp_inverse_points(lambda0: f64, phi0: f64, points: &[Point2D]) -> Vec<Point2D> {
    points
        .iter()
        .map(|p| cpp_inverse(lambda0, phi0, p.x, p.y).into())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpp_origin_maps_to_zero_x() {
        let (x, y) = cpp_forward(-75.0, 35.0, -75.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_cpp_roundtrip() {
        let (x, y) = cpp_forward(-75.0, 35.0, -74.2, 36.1);
        let (lon, lat) = cpp_inverse(-75.0, 35.0, x, y);
        assert!((lon + 74.2).abs() < 1e-10);
        assert!((lat - 36.1).abs() < 1e-10);
    }

    #[test]
    fn test_cpp_scale_by_origin_latitude() {
        // 原点纬度 60° 时经向距离减半
        let (x60, _) = cpp_forward(0.0, 60.0, 1.0, 0.0);
        let (x0, _) = cpp_forward(0.0, 0.0, 1.0, 0.0);
        assert!((x60 / x0 - 0.5).abs() < 1e-12);
    }
}
