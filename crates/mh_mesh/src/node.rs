// crates/mh_mesh/src/node.rs
//! 网格节点
//!
//! 节点带外部编号（文件中的编号，不一定连续）和三维坐标。

use mh_geo::Point2D;
use serde::{Deserialize, Serialize};

/// 节点外部编号
pub type NodeId = usize;

/// 网格节点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 外部编号
    pub id: NodeId,
    /// x 坐标（经度或东向坐标）
    pub x: f64,
    /// y 坐标（纬度或北向坐标）
    pub y: f64,
    /// 高程 / 水深
    pub z: f64,
}

impl Node {
    /// 创建节点
    #[must_use]
    pub const fn new(id: NodeId, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    /// 平面位置
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// 更新平面位置，高程不变
    #[inline]
    pub fn set_position(&mut self, position: Point2D) {
        self.x = position.x;
        self.y = position.y;
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0, 0.0)
    }
}
