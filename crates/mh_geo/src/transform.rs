// crates/mh_geo/src/transform.rs

//! 坐标转换器
//!
//! 网格重投影通过 [`CoordinateTransform`] 这个窄接口调用坐标转换：
//! 给定源、目标 EPSG 与一批点，返回转换后的点以及目标是否为地理坐标。
//! [`BuiltinTransformer`] 基于本 crate 的纯 Rust 投影实现，也可以接入外部库。
//!
//! # 示例
//!
//! ```
//! use mh_geo::geometry::Point2D;
//! use mh_geo::transform::{BuiltinTransformer, CoordinateTransform, GeoTransformer};
//!
//! let t = GeoTransformer::from_epsg(4326, 32617).unwrap();
//! let (x, _y) = t.transform_point(-81.0, 30.0).unwrap();
//! assert!((x - 500_000.0).abs() < 1e-6);
//!
//! let (pts, geographic) = BuiltinTransformer
//!     .transform(4326, 3857, &[Point2D::new(0.0, 0.0)])
//!     .unwrap();
//! assert!(!geographic);
//! assert!(pts[0].x.abs() < 1e-9);
//! ```

use crate::geometry::Point2D;
use crate::projection::{Projection, ProjectionType};
use mh_foundation::error::MhResult;

// ============================================================================
// 转换接口
// ============================================================================

/// 大地坐标转换协作者
pub trait CoordinateTransform {
    /// 将 `points` 从 `source_epsg` 转换到 `target_epsg`
    ///
    /// 返回转换后的点（与输入一一对应）以及目标参考系是否为地理坐标。
    ///
    /// # Errors
    /// 参考系代码无效或任一点无法转换时返回错误，此时不产生部分结果
    fn transform(
        &self,
        source_epsg: u32,
        target_epsg: u32,
        points: &[Point2D],
    ) -> MhResult<(Vec<Point2D>, bool)>;
}

impl<F> CoordinateTransform for F
where
    F: Fn(u32, u32, &[Point2D]) -> MhResult<(Vec<Point2D>, bool)>,
{
    fn transform(
        &self,
        source_epsg: u32,
        target_epsg: u32,
        points: &[Point2D],
    ) -> MhResult<(Vec<Point2D>, bool)> {
        self(source_epsg, target_epsg, points)
    }
}

/// 内置投影实现的转换器
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTransformer;

impl CoordinateTransform for BuiltinTransformer {
    fn transform(
        &self,
        source_epsg: u32,
        target_epsg: u32,
        points: &[Point2D],
    ) -> MhResult<(Vec<Point2D>, bool)> {
        let transformer = GeoTransformer::from_epsg(source_epsg, target_epsg)?;
        let out = transformer.transform_points(points)?;
        Ok((out, transformer.target().is_geographic()))
    }
}

// ============================================================================
// 固定源/目标的转换器
// ============================================================================

/// 绑定一对参考系的坐标转换器
#[derive(Debug, Clone, Copy)]
pub struct GeoTransformer {
    projection: Projection,
}

impl GeoTransformer {
    /// 从 EPSG 代码创建
    ///
    /// # Errors
    /// 任一 EPSG 代码不受支持时返回错误
    pub fn from_epsg(source_epsg: u32, target_epsg: u32) -> MhResult<Self> {
        Ok(Self {
            projection: Projection::from_epsg(source_epsg, target_epsg)?,
        })
    }

    /// 转换单个点
    ///
    /// # Errors
    /// 坐标超出投影定义域时返回错误
    pub fn transform_point(&self, x: f64, y: f64) -> MhResult<(f64, f64)> {
        self.projection.forward(x, y)
    }

    /// 反向转换单个点
    ///
    /// # Errors
    /// 坐标超出投影定义域时返回错误
    pub fn inverse_transform_point(&self, x: f64, y: f64) -> MhResult<(f64, f64)> {
        self.projection.inverse(x, y)
    }

    /// 批量转换，任一点失败则整体失败
    ///
    /// # Errors
    /// 任一坐标超出投影定义域时返回错误
    pub fn transform_points(&self, points: &[Point2D]) -> MhResult<Vec<Point2D>> {
        if self.is_identity() {
            return Ok(points.to_vec());
        }
        points
            .iter()
            .map(|p| self.transform_point(p.x, p.y).map(Point2D::from))
            .collect()
    }

    /// 目标投影
    #[must_use]
    pub fn target(&self) -> &ProjectionType {
        self.projection.target()
    }

    /// 是否为恒等转换
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.projection.is_identity()
    }
}
