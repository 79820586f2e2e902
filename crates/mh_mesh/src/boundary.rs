// crates/mh_mesh/src/boundary.rs
//! 边界串
//!
//! 边界由边界代码和一串节点段组成。代码决定每个段携带的属性：
//!
//! | 代码 | 类型 | 每行字段 |
//! |------|------|----------|
//! | -1 | 开边界 | 节点 |
//! | 3 / 13 / 23 | 简单堰 | 节点、堰顶高程、超临界系数 |
//! | 4 / 24 | 溢流堰（节点对） | 节点、配对节点、堰顶高程、亚临界系数、超临界系数 |
//! | 5 / 25 | 涵洞堰（节点对） | 上述 5 项 + 管顶高程、管流系数、管径 |
//! | 其他 | 普通陆地边界 | 节点 |
//!
//! # 示例
//!
//! ```
//! use mh_mesh::boundary::{Boundary, BoundaryCode, BoundaryKind, BoundarySegment};
//!
//! let mut weir = Boundary::new(BoundaryCode::new(24));
//! assert_eq!(weir.kind(), BoundaryKind::OverflowWeir);
//! weir.push(BoundarySegment::OverflowWeir {
//!     node: 10,
//!     paired_node: 20,
//!     crest: 1.5,
//!     subcritical: 1.0,
//!     supercritical: 1.0,
//! }).unwrap();
//! assert!(weir.push(BoundarySegment::Single { node: 11 }).is_err());
//! assert_eq!(weir.node_ids().collect::<Vec<_>>(), vec![10, 20]);
//! ```

use crate::error::{MeshError, MeshResult};
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// 边界代码
// ============================================================================

/// 边界代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryCode(i32);

/// 边界类型（由代码决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// 开边界
    Open,
    /// 普通陆地边界（单节点）
    Generic,
    /// 简单堰
    SimpleWeir,
    /// 溢流堰（节点对）
    OverflowWeir,
    /// 涵洞堰（节点对）
    CulvertWeir,
}

impl BoundaryCode {
    /// 开边界代码
    pub const OPEN: Self = Self(-1);

    /// 创建边界代码
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// 代码值
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// 边界类型
    #[must_use]
    pub const fn kind(self) -> BoundaryKind {
        match self.0 {
            -1 => BoundaryKind::Open,
            3 | 13 | 23 => BoundaryKind::SimpleWeir,
            4 | 24 => BoundaryKind::OverflowWeir,
            5 | 25 => BoundaryKind::CulvertWeir,
            _ => BoundaryKind::Generic,
        }
    }

    /// 每个段在 ADCIRC 文件中的字段数
    #[must_use]
    pub const fn field_count(self) -> usize {
        self.kind().field_count()
    }
}

impl fmt::Display for BoundaryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BoundaryKind {
    /// 每个段的字段数
    #[must_use]
    pub const fn field_count(self) -> usize {
        match self {
            Self::Open | Self::Generic => 1,
            Self::SimpleWeir => 3,
            Self::OverflowWeir => 5,
            Self::CulvertWeir => 8,
        }
    }

    /// 是否为节点对边界
    #[must_use]
    pub const fn is_paired(self) -> bool {
        matches!(self, Self::OverflowWeir | Self::CulvertWeir)
    }
}

// ============================================================================
// 边界段
// ============================================================================

/// 涵洞管道参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeGeometry {
    /// 管顶高程
    pub height: f64,
    /// 管流系数
    pub coefficient: f64,
    /// 管径
    pub diameter: f64,
}

/// 边界上的一个段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundarySegment {
    /// 单节点（开边界 / 普通陆地边界）
    Single {
        /// 节点编号
        node: NodeId,
    },
    /// 简单堰
    SimpleWeir {
        /// 节点编号
        node: NodeId,
        /// 堰顶高程
        crest: f64,
        /// 超临界流量系数
        supercritical: f64,
    },
    /// 溢流堰
    OverflowWeir {
        /// 前侧节点
        node: NodeId,
        /// 后侧配对节点
        paired_node: NodeId,
        /// 堰顶高程
        crest: f64,
        /// 亚临界流量系数
        subcritical: f64,
        /// 超临界流量系数
        supercritical: f64,
    },
    /// 涵洞堰
    Culvert {
        /// 前侧节点
        node: NodeId,
        /// 后侧配对节点
        paired_node: NodeId,
        /// 堰顶高程
        crest: f64,
        /// 亚临界流量系数
        subcritical: f64,
        /// 超临界流量系数
        supercritical: f64,
        /// 管道参数
        pipe: PipeGeometry,
    },
}

impl BoundarySegment {
    /// 主节点
    #[must_use]
    pub const fn node(&self) -> NodeId {
        match *self {
            Self::Single { node }
            | Self::SimpleWeir { node, .. }
            | Self::OverflowWeir { node, .. }
            | Self::Culvert { node, .. } => node,
        }
    }

    /// 配对节点（仅节点对边界）
    #[must_use]
    pub const fn paired_node(&self) -> Option<NodeId> {
        match *self {
            Self::OverflowWeir { paired_node, .. } | Self::Culvert { paired_node, .. } => {
                Some(paired_node)
            }
            _ => None,
        }
    }

    /// 该段可以属于哪类边界
    ///
    /// 单节点段对开边界和普通陆地边界都适用，此处返回 `Generic`。
    #[must_use]
    pub const fn kind(&self) -> BoundaryKind {
        match self {
            Self::Single { .. } => BoundaryKind::Generic,
            Self::SimpleWeir { .. } => BoundaryKind::SimpleWeir,
            Self::OverflowWeir { .. } => BoundaryKind::OverflowWeir,
            Self::Culvert { .. } => BoundaryKind::CulvertWeir,
        }
    }

    /// 堰顶高程
    #[must_use]
    pub const fn crest(&self) -> Option<f64> {
        match *self {
            Self::Single { .. } => None,
            Self::SimpleWeir { crest, .. }
            | Self::OverflowWeir { crest, .. }
            | Self::Culvert { crest, .. } => Some(crest),
        }
    }

    /// 段引用的全部节点
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        std::iter::once(self.node()).chain(self.paired_node())
    }

    fn fits(&self, kind: BoundaryKind) -> bool {
        match kind {
            BoundaryKind::Open | BoundaryKind::Generic => self.kind() == BoundaryKind::Generic,
            other => self.kind() == other,
        }
    }

    pub(crate) fn renumber_node(&mut self, from: NodeId, to: NodeId) {
        match self {
            Self::Single { node } | Self::SimpleWeir { node, .. } => {
                if *node == from {
                    *node = to;
                }
            }
            Self::OverflowWeir {
                node, paired_node, ..
            }
            | Self::Culvert {
                node, paired_node, ..
            } => {
                if *node == from {
                    *node = to;
                }
                if *paired_node == from {
                    *paired_node = to;
                }
            }
        }
    }
}

// ============================================================================
// 边界
// ============================================================================

/// 边界串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    code: BoundaryCode,
    segments: Vec<BoundarySegment>,
}

impl Boundary {
    /// 创建空边界
    #[must_use]
    pub fn new(code: BoundaryCode) -> Self {
        Self {
            code,
            segments: Vec::new(),
        }
    }

    /// 由节点列表创建开边界
    #[must_use]
    pub fn open(nodes: &[NodeId]) -> Self {
        Self {
            code: BoundaryCode::OPEN,
            segments: nodes
                .iter()
                .map(|&node| BoundarySegment::Single { node })
                .collect(),
        }
    }

    /// 由段列表创建边界
    ///
    /// # Errors
    /// 任一段的类型与代码不符时返回 [`MeshError::InvalidTopology`]
    pub fn with_segments(code: BoundaryCode, segments: Vec<BoundarySegment>) -> MeshResult<Self> {
        let mut boundary = Self::new(code);
        boundary.segments.reserve(segments.len());
        for segment in segments {
            boundary.push(segment)?;
        }
        Ok(boundary)
    }

    /// 追加一个段
    ///
    /// # Errors
    /// 段的类型与边界代码不符时返回 [`MeshError::InvalidTopology`]
    pub fn push(&mut self, segment: BoundarySegment) -> MeshResult<()> {
        if !segment.fits(self.kind()) {
            return Err(MeshError::invalid_topology(
                "push_boundary_segment",
                format!("{:?} 段不能用于代码为 {} 的边界", segment.kind(), self.code),
            ));
        }
        self.segments.push(segment);
        Ok(())
    }

    /// 边界代码
    #[inline]
    #[must_use]
    pub fn code(&self) -> BoundaryCode {
        self.code
    }

    /// 边界类型
    #[inline]
    #[must_use]
    pub fn kind(&self) -> BoundaryKind {
        self.code.kind()
    }

    /// 全部段
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[BoundarySegment] {
        &self.segments
    }

    /// 段数（即 ADCIRC 文件中的行数）
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// 是否为空
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 引用的全部节点，节点对边界两侧都包含
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.segments.iter().flat_map(BoundarySegment::node_ids)
    }

    /// 是否引用了给定节点
    #[must_use]
    pub fn references(&self, node: NodeId) -> bool {
        self.node_ids().any(|n| n == node)
    }

    pub(crate) fn renumber_node(&mut self, from: NodeId, to: NodeId) {
        for segment in &mut self.segments {
            segment.renumber_node(from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_kinds() {
        assert_eq!(BoundaryCode::OPEN.kind(), BoundaryKind::Open);
        assert_eq!(BoundaryCode::new(0).kind(), BoundaryKind::Generic);
        assert_eq!(BoundaryCode::new(20).kind(), BoundaryKind::Generic);
        for code in [3, 13, 23] {
            assert_eq!(BoundaryCode::new(code).field_count(), 3);
        }
        for code in [4, 24] {
            assert_eq!(BoundaryCode::new(code).field_count(), 5);
        }
        for code in [5, 25] {
            assert_eq!(BoundaryCode::new(code).field_count(), 8);
        }
        assert_eq!(BoundaryCode::new(1).field_count(), 1);
    }

    #[test]
    fn test_open_boundary() {
        let b = Boundary::open(&[1, 2, 3]);
        assert_eq!(b.kind(), BoundaryKind::Open);
        assert_eq!(b.len(), 3);
        assert!(b.references(2));
    }

    #[test]
    fn test_culvert_segment_nodes() {
        let segment = BoundarySegment::Culvert {
            node: 4,
            paired_node: 9,
            crest: 2.0,
            subcritical: 0.8,
            supercritical: 0.9,
            pipe: PipeGeometry {
                height: 1.0,
                coefficient: 0.6,
                diameter: 0.5,
            },
        };
        let b = Boundary::with_segments(BoundaryCode::new(25), vec![segment]).unwrap();
        assert_eq!(b.node_ids().collect::<Vec<_>>(), vec![4, 9]);
        assert_eq!(b.segments()[0].crest(), Some(2.0));
    }

    #[test]
    fn test_segment_kind_mismatch() {
        let weir = BoundarySegment::SimpleWeir {
            node: 1,
            crest: 0.0,
            supercritical: 1.0,
        };
        assert!(Boundary::with_segments(BoundaryCode::new(0), vec![weir]).is_err());
        assert!(Boundary::with_segments(BoundaryCode::OPEN, vec![weir]).is_err());
        assert!(Boundary::with_segments(BoundaryCode::new(13), vec![weir]).is_ok());
    }

    #[test]
    fn test_renumber_paired() {
        let mut b = Boundary::with_segments(
            BoundaryCode::new(4),
            vec![BoundarySegment::OverflowWeir {
                node: 1,
                paired_node: 2,
                crest: 0.0,
                subcritical: 1.0,
                supercritical: 1.0,
            }],
        )
        .unwrap();
        b.renumber_node(2, 22);
        assert_eq!(b.segments()[0].paired_node(), Some(22));
    }
}
