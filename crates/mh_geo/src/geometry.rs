// crates/mh_geo/src/geometry.rs

//! 平面几何类型与多边形工具
//!
//! 提供网格计算使用的 `Point2D`，以及三角形/四边形单元需要的多边形运算：
//! 面积、顶点均值中心、点在多边形内判定、绕中心的角度排序。
//!
//! # 距离计算
//!
//! - `distance_to`: 欧几里得距离（适用于投影坐标）
//! - `geodesic_distance_to`: Haversine 公式（适用于经纬度）

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 地球平均半径 (米) - 用于 Haversine 公式
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

// ============================================================================
// Point2D
// ============================================================================

/// 2D点
///
/// 投影坐标下 `x`/`y` 为米；地理坐标下 `x` 为经度、`y` 为纬度（度）。
///
/// # 示例
///
/// ```
/// use mh_geo::geometry::Point2D;
///
/// let a = Point2D::new(0.0, 0.0);
/// let b = Point2D::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X坐标（或经度）
    pub x: f64,
    /// Y坐标（或纬度）
    pub y: f64,
}

impl Point2D {
    /// 原点
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// 创建新的2D点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 欧几里得距离
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// 欧几里得距离的平方
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// 大圆距离 (米)，将坐标视为经纬度
    #[must_use]
    pub fn geodesic_distance_to(&self, other: &Self) -> f64 {
        self.haversine_distance(other, EARTH_MEAN_RADIUS)
    }

    /// 指定球半径的 Haversine 距离
    #[must_use]
    pub fn haversine_distance(&self, other: &Self, radius: f64) -> f64 {
        let lat1 = self.y.to_radians();
        let lat2 = other.y.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.x - self.x).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * radius * h.sqrt().min(1.0).asin()
    }

    /// 二维叉积 (标量)
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// 检查坐标是否有限
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point2D {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point2D> for (f64, f64) {
    #[inline]
    fn from(p: Point2D) -> Self {
        (p.x, p.y)
    }
}

impl From<[f64; 2]> for Point2D {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

// ============================================================================
// 多边形运算
// ============================================================================

/// 顶点坐标均值
///
/// 网格单元的"中心"取顶点均值而非面积加权形心，与空间索引使用的质心一致。
/// 空切片返回原点。
#[must_use]
pub fn vertex_centroid(vertices: &[Point2D]) -> Point2D {
    if vertices.is_empty() {
        return Point2D::ZERO;
    }
    let n = vertices.len() as f64;
    let sum = vertices.iter().fold(Point2D::ZERO, |acc, p| acc + *p);
    sum * (1.0 / n)
}

/// 有向面积（鞋带公式），逆时针为正
#[must_use]
pub fn signed_area(vertices: &[Point2D]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| vertices[i].cross(&vertices[(i + 1) % n]))
        .sum();
    0.5 * twice
}

/// 多边形面积（与绕向无关）
#[inline]
#[must_use]
pub fn polygon_area(vertices: &[Point2D]) -> f64 {
    signed_area(vertices).abs()
}

/// 射线法判断点是否在多边形内
///
/// 与水平射线相交的边数为奇数即在内部。恰好落在边上的点的结果取决于边的方向，
/// 调用方需要严格内部判定时应自行处理边界情况。
#[must_use]
pub fn point_in_polygon(point: &Point2D, vertices: &[Point2D]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = vertices[i];
        let pj = vertices[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// 按绕顶点均值中心的极角升序排列顶点，返回排列后的原始下标
///
/// 结果为逆时针顺序，起点是极角最小（最接近 -π）的顶点。极角相同的顶点保持原有相对顺序。
#[must_use]
pub fn angular_order(vertices: &[Point2D]) -> Vec<usize> {
    let center = vertex_centroid(vertices);
    let mut order: Vec<usize> = (0..vertices.len()).collect();
    order.sort_by(|&a, &b| {
        let ta = (vertices[a].y - center.y).atan2(vertices[a].x - center.x);
        let tb = (vertices[b].y - center.y).atan2(vertices[b].x - center.x);
        ta.total_cmp(&tb)
    });
    order
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_haversine_one_degree() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(1.0, 0.0);
        let d = a.geodesic_distance_to(&b);
        // 赤道上 1 度约 111.2 km
        assert!((d - 111_195.0).abs() < 10.0);
    }

    #[test]
    fn test_area_and_centroid() {
        let sq = unit_square();
        assert!((polygon_area(&sq) - 1.0).abs() < 1e-12);
        assert!(signed_area(&sq) > 0.0);

        let mut cw = sq.clone();
        cw.reverse();
        assert!(signed_area(&cw) < 0.0);
        assert!((polygon_area(&cw) - 1.0).abs() < 1e-12);

        let c = vertex_centroid(&sq);
        assert!((c.x - 0.5).abs() < 1e-12);
        assert!((c.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = unit_square();
        assert!(point_in_polygon(&Point2D::new(0.5, 0.5), &sq));
        assert!(point_in_polygon(&Point2D::new(0.1, 0.9), &sq));
        assert!(!point_in_polygon(&Point2D::new(1.5, 0.5), &sq));
        assert!(!point_in_polygon(&Point2D::new(-0.1, 0.5), &sq));
        assert!(!point_in_polygon(&Point2D::new(0.5, 0.5), &sq[..2]));
    }

    #[test]
    fn test_angular_order_fixes_bowtie() {
        // 顶点顺序交叉 (0,0) (1,1) (1,0) (0,1)
        let bowtie = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 1.0),
        ];
        let order = angular_order(&bowtie);
        assert_eq!(order, vec![0, 2, 1, 3]);

        let sorted: Vec<Point2D> = order.iter().map(|&i| bowtie[i]).collect();
        assert!((signed_area(&sorted) - 1.0).abs() < 1e-12);
    }
}
