// crates/mh_geo/src/ellipsoid.rs

//! 椭球体定义
//!
//! 横轴墨卡托投影所需的地球椭球参数及派生量。
//!
//! # 示例
//!
//! ```
//! use mh_geo::ellipsoid::Ellipsoid;
//!
//! let wgs84 = Ellipsoid::WGS84;
//! assert!((wgs84.e2() - 0.006_694_379_990_14).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// 地球椭球体
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// 长半轴 (m)
    pub a: f64,
    /// 扁率
    pub f: f64,
}

impl Ellipsoid {
    /// WGS84 椭球体
    ///
    /// - 长半轴: 6378137.0 m
    /// - 扁率: 1/298.257223563
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// 短半轴 (m)
    #[inline]
    #[must_use]
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// 第一偏心率平方 e²
    #[inline]
    #[must_use]
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// 第二偏心率平方 e'²
    #[inline]
    #[must_use]
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_derived() {
        let e = Ellipsoid::WGS84;
        assert!((e.b() - 6_356_752.314_245).abs() < 1e-3);
        assert!((e.ep2() - 0.006_739_496_742_28).abs() < 1e-12);
    }
}
