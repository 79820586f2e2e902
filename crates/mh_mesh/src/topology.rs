// crates/mh_mesh/src/topology.rs

//! 网格拓扑
//!
//! - [`CsrConnectivity`]: 紧凑行存储的连接关系
//! - [`ElementTable`]: 节点到相邻单元的反向连接
//! - [`Link`]: 唯一无向边
//!
//! # CSR 格式
//!
//! `offsets[i]..offsets[i+1]` 是第 i 行在 `indices` 中的范围，适合只读迭代。
//!
//! ```
//! use mh_mesh::topology::CsrConnectivity;
//!
//! let csr = CsrConnectivity::<u32>::from_rows(&[&[0, 1, 2], &[1, 2, 3, 4], &[2, 3]]);
//! assert_eq!(csr.row(1), &[1, 2, 3, 4]);
//! assert_eq!(csr.n_rows(), 3);
//! ```

use crate::element::Element;
use crate::error::MeshResult;
use crate::mesh::{mean_leg_length, Mesh};
use crate::node::NodeId;
use mh_foundation::{ElementIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

// ============================================================================
// CSR
// ============================================================================

/// CSR (Compressed Sparse Row) 格式连接性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrConnectivity<I: Copy> {
    offsets: Vec<usize>,
    indices: Vec<I>,
}

impl<I: Copy> Default for CsrConnectivity<I> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<I: Copy> CsrConnectivity<I> {
    /// 创建空的 CSR 结构（0 行）
    pub fn empty() -> Self {
        Self {
            offsets: vec![0],
            indices: Vec::new(),
        }
    }

    /// 从行列表构建
    pub fn from_rows(rows: &[&[I]]) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();

        offsets.push(0);
        for row in rows {
            indices.extend_from_slice(row);
            offsets.push(indices.len());
        }

        Self { offsets, indices }
    }

    /// 由 (行, 值) 对构建，行内保持输入顺序
    ///
    /// 先统计每行长度，再按偏移填入。
    pub fn from_pairs(n_rows: usize, pairs: &[(usize, I)]) -> Self {
        let mut offsets = vec![0usize; n_rows + 1];
        for &(row, _) in pairs {
            offsets[row + 1] += 1;
        }
        for i in 0..n_rows {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor: Vec<usize> = offsets[..n_rows].to_vec();
        let mut slots: Vec<Option<I>> = vec![None; pairs.len()];
        for &(row, value) in pairs {
            slots[cursor[row]] = Some(value);
            cursor[row] += 1;
        }

        Self {
            offsets,
            indices: slots.into_iter().flatten().collect(),
        }
    }

    /// 第 row 行
    #[inline]
    pub fn row(&self, row: usize) -> &[I] {
        let start = self.offsets[row];
        let end = self.offsets[row + 1];
        &self.indices[start..end]
    }

    /// 行数
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// 非零元素总数
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// 是否没有行
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// 第 row 行的元素个数
    #[inline]
    pub fn row_len(&self, row: usize) -> usize {
        self.offsets[row + 1] - self.offsets[row]
    }

    /// 迭代所有行
    pub fn iter_rows(&self) -> impl Iterator<Item = &[I]> {
        (0..self.n_rows()).map(move |i| self.row(i))
    }
}

// ============================================================================
// 节点 -> 单元
// ============================================================================

/// 节点到相邻单元的反向连接表
///
/// 行号是节点位置，行内是按单元位置升序的相邻单元。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTable {
    csr: CsrConnectivity<ElementIndex>,
}

impl ElementTable {
    /// 节点的相邻单元
    #[inline]
    pub fn elements_around(&self, node: NodeIndex) -> &[ElementIndex] {
        self.csr.row(node.get())
    }

    /// 节点数
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.csr.n_rows()
    }

    /// 底层 CSR
    #[inline]
    pub fn connectivity(&self) -> &CsrConnectivity<ElementIndex> {
        &self.csr
    }
}

// ============================================================================
// 边
// ============================================================================

/// 无向边，`node1 < node2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    /// 较小的节点编号
    pub node1: NodeId,
    /// 较大的节点编号
    pub node2: NodeId,
}

impl Link {
    /// 由任意顺序的两个节点创建
    #[must_use]
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self {
            node1: a.min(b),
            node2: a.max(b),
        }
    }
}

// ============================================================================
// 网格拓扑操作
// ============================================================================

impl Mesh {
    /// 节点到相邻单元的连接表
    pub fn element_table(&self) -> MeshResult<ElementTable> {
        let mut pairs = Vec::with_capacity(self.elements.len() * 4);
        for (pos, element) in self.elements.iter().enumerate() {
            for &id in element.nodes() {
                let node = self.node_identity.position("Node", id)?;
                pairs.push((node, ElementIndex::new(pos)));
            }
        }
        Ok(ElementTable {
            csr: CsrConnectivity::from_pairs(self.nodes.len(), &pairs),
        })
    }

    /// 唯一无向边列表，按 (node1, node2) 升序
    ///
    /// 每个单元先按绕中心的极角排列顶点，再取相邻顶点对，因此顶点顺序错乱的
    /// 四边形也不会产生对角线。网格本身不被修改。
    pub fn link_table(&self) -> MeshResult<Vec<Link>> {
        let mut links = BTreeSet::new();
        for element in &self.elements {
            let sorted = self.sorted_about_center(element)?;
            links.extend(sorted.legs().map(|(a, b)| Link::new(a, b)));
        }
        debug!("边表: {} 个单元, {} 条边", self.elements.len(), links.len());
        Ok(links.into_iter().collect())
    }

    /// 按极角排列顶点后的单元副本
    pub(crate) fn sorted_about_center(&self, element: &Element) -> MeshResult<Element> {
        let mut sorted = *element;
        let vertices = self.resolve_vertices(element)?;
        sorted.sort_about_center(&vertices)?;
        Ok(sorted)
    }

    /// 每个节点的网格尺度：相邻单元特征尺寸的均值，孤立节点为 0
    ///
    /// 单元顶点先按中心排序再取边长，地理坐标的网格使用大圆距离（米）。
    pub fn compute_mesh_size(&self) -> MeshResult<Vec<f64>> {
        let geodesic = self.crs.is_geographic();
        let sizes = self
            .elements
            .iter()
            .map(|e| {
                let sorted = self.sorted_about_center(e)?;
                Ok(mean_leg_length(&self.resolve_vertices(&sorted)?, geodesic))
            })
            .collect::<MeshResult<Vec<f64>>>()?;

        let table = self.element_table()?;
        Ok((0..table.n_nodes())
            .map(|node| {
                let around = table.elements_around(NodeIndex::new(node));
                if around.is_empty() {
                    0.0
                } else {
                    around.iter().map(|e| sizes[e.get()]).sum::<f64>() / around.len() as f64
                }
            })
            .collect())
    }
}
