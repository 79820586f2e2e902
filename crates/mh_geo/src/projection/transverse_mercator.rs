// crates/mh_geo/src/projection/transverse_mercator.rs

//! 横轴墨卡托投影（级数展开形式）
//!
//! 采用 USGS Professional Paper 1395 中的级数展开，离中央子午线 ±3° 内（UTM 带宽）
//! 精度在厘米级，足以满足网格坐标转换。
//!
//! # 示例
//!
//! ```
//! use mh_geo::projection::transverse_mercator::{forward, inverse, TransverseMercatorParams};
//!
//! let params = TransverseMercatorParams::utm(50, true);
//! let (x, y) = forward(&params, 117.0, 40.0).unwrap();
//! assert!((x - 500_000.0).abs() < 1e-6);
//!
//! let (lon, lat) = inverse(&params, x, y).unwrap();
//! assert!((lon - 117.0).abs() < 1e-7);
//! assert!((lat - 40.0).abs() < 1e-7);
//! ```

use crate::ellipsoid::Ellipsoid;
use mh_foundation::error::{MhError, MhResult};

/// UTM 比例因子
pub const UTM_SCALE_FACTOR: f64 = 0.9996;

/// UTM 东偏移 (m)
pub const UTM_FALSE_EASTING: f64 = 500_000.0;

/// UTM 南半球北偏移 (m)
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// 横轴墨卡托投影参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercatorParams {
    /// 椭球体
    pub ellipsoid: Ellipsoid,
    /// 中央子午线 (度)
    pub central_meridian: f64,
    /// 中央子午线比例因子
    pub scale_factor: f64,
    /// 东偏移 (m)
    pub false_easting: f64,
    /// 北偏移 (m)
    pub false_northing: f64,
}

impl TransverseMercatorParams {
    /// WGS84 UTM 带参数
    #[must_use]
    pub fn utm(zone: u8, north: bool) -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            central_meridian: utm_central_meridian(zone),
            scale_factor: UTM_SCALE_FACTOR,
            false_easting: UTM_FALSE_EASTING,
            false_northing: if north { 0.0 } else { UTM_FALSE_NORTHING_SOUTH },
        }
    }
}

/// UTM 带的中央子午线 (度)
#[inline]
#[must_use]
pub fn utm_central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

/// 子午线弧长 M(φ)
fn meridian_arc(e: &Ellipsoid, phi: f64) -> f64 {
    let e2 = e.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    e.a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// 经纬度 (度) -> 投影坐标 (m)
///
/// # Errors
/// 坐标非有限值或纬度超出 [-90, 90] 时返回投影错误
pub fn forward(params: &TransverseMercatorParams, lon: f64, lat: f64) -> MhResult<(f64, f64)> {
    if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
        return Err(MhError::projection(format!(
            "横轴墨卡托正算输入无效: lon={lon}, lat={lat}"
        )));
    }

    let ell = &params.ellipsoid;
    let e2 = ell.e2();
    let ep2 = ell.ep2();
    let k0 = params.scale_factor;

    let phi = lat.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = ell.a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = (lon - params.central_meridian).to_radians() * cos_phi;
    let m = meridian_arc(ell, phi);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = k0
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);
    let y = k0
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    Ok((x + params.false_easting, y + params.false_northing))
}

/// 投影坐标 (m) -> 经纬度 (度)
///
/// # Errors
/// 坐标非有限值时返回投影错误
pub fn inverse(params: &TransverseMercatorParams, x: f64, y: f64) -> MhResult<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return Err(MhError::projection(format!(
            "横轴墨卡托反算输入无效: x={x}, y={y}"
        )));
    }

    let ell = &params.ellipsoid;
    let e2 = ell.e2();
    let ep2 = ell.ep2();
    let k0 = params.scale_factor;

    let x = x - params.false_easting;
    let m = (y - params.false_northing) / k0;

    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let mu = m / (ell.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let sq = (1.0 - e2).sqrt();
    let e1 = (1.0 - sq) / (1.0 + sq);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let (sin1, cos1) = phi1.sin_cos();
    let tan1 = phi1.tan();
    let c1 = ep2 * cos1 * cos1;
    let t1 = tan1 * tan1;
    let w = 1.0 - e2 * sin1 * sin1;
    let n1 = ell.a / w.sqrt();
    let r1 = ell.a * (1.0 - e2) / (w * w.sqrt());
    let d = x / (n1 * k0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let phi = phi1
        - (n1 * tan1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);
    let dlon = (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5 / 120.0)
        / cos1;

    Ok((params.central_meridian + dlon.to_degrees(), phi.to_degrees()))
}
