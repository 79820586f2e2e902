// crates/mh_mesh/src/element.rs
//! 网格单元
//!
//! 单元是三角形或四边形，只保存节点的外部编号。顶点坐标通过所属网格解析，
//! 因此节点移动后单元无需更新。
//!
//! # 示例
//!
//! ```
//! use mh_mesh::element::Element;
//!
//! let e = Element::triangle(1, 1, 2, 3);
//! let legs: Vec<_> = e.legs().collect();
//! assert_eq!(legs, vec![(1, 2), (2, 3), (3, 1)]);
//! ```

use crate::error::{MeshError, MeshResult};
use crate::node::NodeId;
use mh_geo::geometry::angular_order;
use mh_geo::Point2D;
use serde::{Deserialize, Serialize};

/// 单元外部编号
pub type ElementId = usize;

/// 单元最大顶点数
pub const MAX_ELEMENT_NODES: usize = 4;

/// 单元形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementShape {
    /// 三角形
    Triangle,
    /// 四边形
    Quadrilateral,
}

impl ElementShape {
    /// 顶点数
    #[must_use]
    pub const fn n_vertices(self) -> usize {
        match self {
            Self::Triangle => 3,
            Self::Quadrilateral => 4,
        }
    }
}

/// 网格单元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ElementRecord", into = "ElementRecord")]
pub struct Element {
    id: ElementId,
    nodes: [NodeId; MAX_ELEMENT_NODES],
    n_vertices: u8,
}

/// 单元的序列化形式，反序列化时经 [`Element::new`] 校验顶点数
#[derive(Serialize, Deserialize)]
struct ElementRecord {
    id: ElementId,
    nodes: Vec<NodeId>,
}

impl TryFrom<ElementRecord> for Element {
    type Error = MeshError;

    fn try_from(record: ElementRecord) -> MeshResult<Self> {
        Self::new(record.id, &record.nodes)
    }
}

impl From<Element> for ElementRecord {
    fn from(element: Element) -> Self {
        Self {
            id: element.id,
            nodes: element.nodes().to_vec(),
        }
    }
}

impl Element {
    /// 从节点编号切片创建单元
    ///
    /// # Errors
    /// 节点数不是 3 或 4 时返回 [`MeshError::InvalidTopology`]
    pub fn new(id: ElementId, nodes: &[NodeId]) -> MeshResult<Self> {
        match *nodes {
            [a, b, c] => Ok(Self::triangle(id, a, b, c)),
            [a, b, c, d] => Ok(Self::quad(id, a, b, c, d)),
            _ => Err(MeshError::invalid_topology(
                "create_element",
                format!("单元 {id} 有 {} 个节点，只支持 3 或 4", nodes.len()),
            )),
        }
    }

    /// 三角形单元
    #[must_use]
    pub const fn triangle(id: ElementId, n1: NodeId, n2: NodeId, n3: NodeId) -> Self {
        Self {
            id,
            nodes: [n1, n2, n3, 0],
            n_vertices: 3,
        }
    }

    /// 四边形单元
    #[must_use]
    pub const fn quad(id: ElementId, n1: NodeId, n2: NodeId, n3: NodeId, n4: NodeId) -> Self {
        Self {
            id,
            nodes: [n1, n2, n3, n4],
            n_vertices: 4,
        }
    }

    /// 外部编号
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// 修改外部编号
    #[inline]
    pub fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    /// 节点编号（按存储顺序）
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes[..self.n_vertices as usize]
    }

    /// 顶点数
    #[inline]
    #[must_use]
    pub const fn n_vertices(&self) -> usize {
        self.n_vertices as usize
    }

    /// 单元形状
    #[must_use]
    pub const fn shape(&self) -> ElementShape {
        if self.n_vertices == 3 {
            ElementShape::Triangle
        } else {
            ElementShape::Quadrilateral
        }
    }

    /// 是否引用了给定节点
    #[inline]
    #[must_use]
    pub fn references(&self, node: NodeId) -> bool {
        self.nodes().contains(&node)
    }

    /// 将引用的节点编号 `from` 替换为 `to`
    pub(crate) fn renumber_node(&mut self, from: NodeId, to: NodeId) {
        let n = self.n_vertices();
        for slot in &mut self.nodes[..n] {
            if *slot == from {
                *slot = to;
            }
        }
    }

    /// 边：按存储顺序的相邻节点对，最后一个节点连回第一个
    pub fn legs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        let nodes = self.nodes();
        let n = nodes.len();
        (0..n).map(move |j| (nodes[j], nodes[(j + 1) % n]))
    }

    /// 按绕顶点中心的极角重新排列节点
    ///
    /// `vertices` 是与 [`Element::nodes`] 一一对应的顶点坐标。
    ///
    /// # Errors
    /// 坐标个数与顶点数不符时返回 [`MeshError::SizeMismatch`]
    pub fn sort_about_center(&mut self, vertices: &[Point2D]) -> MeshResult<()> {
        let n = self.n_vertices();
        if vertices.len() != n {
            return Err(MeshError::SizeMismatch {
                name: "element_vertices",
                expected: n,
                actual: vertices.len(),
            });
        }
        let order = angular_order(vertices);
        let original = self.nodes;
        for (slot, &k) in self.nodes.iter_mut().zip(&order) {
            *slot = original[k];
        }
        Ok(())
    }
}
