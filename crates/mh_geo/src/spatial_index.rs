// crates/mh_geo/src/spatial_index.rs

//! 点空间索引
//!
//! 基于 R-tree 的最近邻查询，网格用它索引节点坐标和单元质心。
//!
//! # 示例
//!
//! ```
//! use mh_geo::spatial_index::SpatialIndex;
//! use mh_geo::geometry::Point2D;
//!
//! let index = SpatialIndex::bulk_load(vec![
//!     (Point2D::new(0.0, 0.0), 0usize),
//!     (Point2D::new(10.0, 0.0), 1),
//!     (Point2D::new(5.0, 5.0), 2),
//! ]);
//!
//! assert_eq!(index.nearest(&Point2D::new(9.0, 1.0)), Some(&1));
//! let two: Vec<usize> = index
//!     .query_nearest(&Point2D::new(4.0, 4.0), 2)
//!     .into_iter()
//!     .map(|(_, v)| *v)
//!     .collect();
//! assert_eq!(two, vec![2, 0]);
//! ```

use crate::geometry::Point2D;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

// ============================================================================
// R-tree 包装
// ============================================================================

/// 空间索引条目
#[derive(Debug, Clone)]
struct SpatialEntry<T> {
    point: Point2D,
    data: T,
}

impl<T> RTreeObject for SpatialEntry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x, self.point.y])
    }
}

impl<T> PointDistance for SpatialEntry<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point.x - point[0];
        let dy = self.point.y - point[1];
        dx * dx + dy * dy
    }
}

/// 点空间索引
///
/// 每个条目是一个坐标和附带的数据（通常是集合中的位置）。
#[derive(Debug)]
pub struct SpatialIndex<T> {
    tree: RTree<SpatialEntry<T>>,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<T> SpatialIndex<T> {
    /// 创建空的空间索引
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 从点集批量构建
    #[must_use]
    pub fn bulk_load(points: Vec<(Point2D, T)>) -> Self {
        let entries: Vec<SpatialEntry<T>> = points
            .into_iter()
            .map(|(point, data)| SpatialEntry { point, data })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// 插入点
    pub fn insert(&mut self, point: Point2D, data: T) {
        self.tree.insert(SpatialEntry { point, data });
    }

    /// 最近的一个点
    #[must_use]
    pub fn nearest(&self, point: &Point2D) -> Option<&T> {
        self.tree
            .nearest_neighbor(&[point.x, point.y])
            .map(|entry| &entry.data)
    }

    /// 按距离升序返回最近的 k 个点
    #[must_use]
    pub fn query_nearest(&self, point: &Point2D, k: usize) -> Vec<(&Point2D, &T)> {
        self.tree
            .nearest_neighbor_iter(&[point.x, point.y])
            .take(k)
            .map(|entry| (&entry.point, &entry.data))
            .collect()
    }

    /// 返回索引中的点数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// 检查索引是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

// ============================================================================
// 测试
// ============================================================================
