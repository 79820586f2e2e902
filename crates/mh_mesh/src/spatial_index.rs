// crates/mh_mesh/src/spatial_index.rs

//! 网格空间索引
//!
//! 节点坐标和单元质心各有一棵 R-Tree，按需构建：
//!
//! - 首次查询前为 `Absent`
//! - 查询时构建，变为 `Present`
//! - 网格被修改后变为 `Stale`，下次查询时重建
//!
//! 点定位先按质心距离取若干候选单元，再逐个做点在多边形内判断，
//! 候选数由 `SearchConfig::element_search_depth` 决定，不做扩展搜索。
//!
//! # 示例
//!
//! ```
//! use mh_mesh::{CacheState, Element, Mesh, Node};
//! use mh_geo::Point2D;
//!
//! let mut mesh = Mesh::new();
//! mesh.add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
//! mesh.add_node(Node::new(2, 1.0, 0.0, 0.0)).unwrap();
//! mesh.add_node(Node::new(3, 0.0, 1.0, 0.0)).unwrap();
//! mesh.add_element(Element::triangle(1, 1, 2, 3)).unwrap();
//!
//! assert_eq!(mesh.element_tree_state(), CacheState::Absent);
//! let found = mesh.find_element(Point2D::new(0.2, 0.2)).unwrap();
//! assert_eq!(found.map(|e| e.get()), Some(0));
//! assert_eq!(mesh.element_tree_state(), CacheState::Present);
//! ```

use crate::element::Element;
use crate::error::MeshResult;
use crate::identity::IdentityIndex;
use crate::mesh::Mesh;
use crate::node::Node;
use mh_foundation::{ElementIndex, NodeIndex};
use mh_geo::geometry::{point_in_polygon, vertex_centroid};
use mh_geo::{Point2D, SpatialIndex};
use tracing::debug;

// ============================================================================
// 缓存状态
// ============================================================================

/// 空间索引的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheState {
    /// 尚未构建
    Absent,
    /// 网格已修改，需要重建
    Stale,
    /// 可直接使用
    Present,
}

/// 惰性构建的索引
#[derive(Debug)]
pub(crate) struct LazyTree<T> {
    state: CacheState,
    tree: Option<SpatialIndex<T>>,
}

impl<T> Default for LazyTree<T> {
    fn default() -> Self {
        Self {
            state: CacheState::Absent,
            tree: None,
        }
    }
}

impl<T> LazyTree<T> {
    fn state(&self) -> CacheState {
        self.state
    }

    fn invalidate(&mut self) {
        if self.state == CacheState::Present {
            self.state = CacheState::Stale;
        }
    }

    /// 确保索引可用，必要时调用 `build` 构建
    fn ensure<F>(&mut self, build: F) -> MeshResult<()>
    where
        F: FnOnce() -> MeshResult<SpatialIndex<T>>,
    {
        if self.state != CacheState::Present {
            self.tree = Some(build()?);
            self.state = CacheState::Present;
        }
        Ok(())
    }

    fn get(&self) -> Option<&SpatialIndex<T>> {
        self.tree.as_ref()
    }
}

/// 网格持有的两棵搜索树
#[derive(Debug, Default)]
pub(crate) struct SearchTrees {
    nodes: LazyTree<usize>,
    centroids: LazyTree<usize>,
}

impl SearchTrees {
    /// 节点变化影响两棵树
    pub(crate) fn invalidate_all(&mut self) {
        self.nodes.invalidate();
        self.centroids.invalidate();
    }

    pub(crate) fn invalidate_elements(&mut self) {
        self.centroids.invalidate();
    }
}

fn build_node_tree(nodes: &[Node]) -> MeshResult<SpatialIndex<usize>> {
    debug!("构建节点搜索树: {} 个节点", nodes.len());
    Ok(SpatialIndex::bulk_load(
        nodes
            .iter()
            .enumerate()
            .map(|(pos, n)| (n.position(), pos))
            .collect(),
    ))
}

fn build_centroid_tree(
    nodes: &[Node],
    elements: &[Element],
    identity: &IdentityIndex,
) -> MeshResult<SpatialIndex<usize>> {
    debug!("构建单元质心搜索树: {} 个单元", elements.len());
    let mut points = Vec::with_capacity(elements.len());
    for (pos, element) in elements.iter().enumerate() {
        let vertices = element
            .nodes()
            .iter()
            .map(|&id| identity.position("Node", id).map(|p| nodes[p].position()))
            .collect::<MeshResult<Vec<_>>>()?;
        points.push((vertex_centroid(&vertices), pos));
    }
    Ok(SpatialIndex::bulk_load(points))
}

// ============================================================================
// 查询
// ============================================================================

impl Mesh {
    /// 节点搜索树的状态
    #[must_use]
    pub fn node_tree_state(&self) -> CacheState {
        self.search.nodes.state()
    }

    /// 单元质心搜索树的状态
    #[must_use]
    pub fn element_tree_state(&self) -> CacheState {
        self.search.centroids.state()
    }

    /// 标记两棵搜索树过期，下次查询时重建
    pub fn invalidate_search_trees(&mut self) {
        self.search.invalidate_all();
    }

    /// 立即（重新）构建两棵搜索树
    pub fn build_search_trees(&mut self) -> MeshResult<()> {
        self.search.nodes.state = CacheState::Stale;
        self.search.centroids.state = CacheState::Stale;
        self.ensure_node_tree()?;
        self.ensure_centroid_tree()
    }

    fn ensure_node_tree(&mut self) -> MeshResult<()> {
        let nodes = &self.nodes;
        self.search.nodes.ensure(|| build_node_tree(nodes))
    }

    fn ensure_centroid_tree(&mut self) -> MeshResult<()> {
        let (nodes, elements, identity) = (&self.nodes, &self.elements, &self.node_identity);
        self.search
            .centroids
            .ensure(|| build_centroid_tree(nodes, elements, identity))
    }

    /// 距离给定点最近的节点
    ///
    /// 网格没有节点时返回 `None`。
    pub fn find_nearest_node(&mut self, point: Point2D) -> MeshResult<Option<NodeIndex>> {
        self.ensure_node_tree()?;
        Ok(self
            .search
            .nodes
            .get()
            .and_then(|tree| tree.nearest(&point))
            .map(|&pos| NodeIndex::new(pos)))
    }

    /// 质心距离给定点最近的单元
    pub fn find_nearest_element(&mut self, point: Point2D) -> MeshResult<Option<ElementIndex>> {
        self.ensure_centroid_tree()?;
        Ok(self
            .search
            .centroids
            .get()
            .and_then(|tree| tree.nearest(&point))
            .map(|&pos| ElementIndex::new(pos)))
    }

    /// 质心距离给定点最近的 `k` 个单元，按距离升序
    pub fn find_nearest_elements(
        &mut self,
        point: Point2D,
        k: usize,
    ) -> MeshResult<Vec<ElementIndex>> {
        self.ensure_centroid_tree()?;
        Ok(self
            .search
            .centroids
            .get()
            .map(|tree| {
                tree.query_nearest(&point, k)
                    .into_iter()
                    .map(|(_, &pos)| ElementIndex::new(pos))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// 包含给定点的单元
    ///
    /// 只检查质心最近的 `element_search_depth` 个单元，都不包含时返回 `None`。
    pub fn find_element(&mut self, point: Point2D) -> MeshResult<Option<ElementIndex>> {
        let depth = self.config.search.element_search_depth;
        let candidates = self.find_nearest_elements(point, depth)?;
        for index in candidates {
            let vertices = self.element_vertices(index)?;
            if point_in_polygon(&point, &vertices) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(n: usize) -> Mesh {
        // n 个单位正方形排成一行，每个切成两个三角形
        let mut mesh = Mesh::new();
        let mut id = 1;
        for i in 0..=n {
            mesh.add_node(Node::new(id, i as f64, 0.0, 0.0)).unwrap();
            mesh.add_node(Node::new(id + 1, i as f64, 1.0, 0.0)).unwrap();
            id += 2;
        }
        let mut eid = 1;
        for i in 0..n {
            let (a, b, c, d) = (2 * i + 1, 2 * i + 3, 2 * i + 4, 2 * i + 2);
            mesh.add_element(Element::triangle(eid, a, b, c)).unwrap();
            mesh.add_element(Element::triangle(eid + 1, a, c, d)).unwrap();
            eid += 2;
        }
        mesh
    }

    #[test]
    fn test_empty_mesh_queries() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.find_nearest_node(Point2D::ZERO).unwrap(), None);
        assert_eq!(mesh.find_element(Point2D::ZERO).unwrap(), None);
        assert!(mesh.find_nearest_elements(Point2D::ZERO, 3).unwrap().is_empty());
    }

    #[test]
    fn test_find_nearest_node() {
        let mut mesh = strip(3);
        let found = mesh.find_nearest_node(Point2D::new(2.1, 0.9)).unwrap();
        assert_eq!(mesh.node(found.unwrap()).unwrap().id, 6);
    }

    #[test]
    fn test_find_element_inside_and_outside() {
        let mut mesh = strip(4);
        let inside = mesh.find_element(Point2D::new(2.8, 0.1)).unwrap().unwrap();
        assert_eq!(mesh.element(inside).unwrap().id(), 5);
        let upper = mesh.find_element(Point2D::new(2.1, 0.9)).unwrap().unwrap();
        assert_eq!(mesh.element(upper).unwrap().id(), 6);
        assert_eq!(mesh.find_element(Point2D::new(10.0, 10.0)).unwrap(), None);
    }

    #[test]
    fn test_find_nearest_elements_ordered() {
        let mut mesh = strip(4);
        let found = mesh.find_nearest_elements(Point2D::new(0.0, 0.5), 3).unwrap();
        assert_eq!(found.len(), 3);
        let ids: Vec<_> = found
            .iter()
            .map(|&e| mesh.element(e).unwrap().id())
            .collect();
        // 第一个方块的两个三角形最近
        assert!(ids[..2].contains(&1));
        assert!(ids[..2].contains(&2));
    }

    #[test]
    fn test_cache_lifecycle() {
        let mut mesh = strip(1);
        assert_eq!(mesh.node_tree_state(), CacheState::Absent);
        mesh.find_nearest_node(Point2D::ZERO).unwrap();
        mesh.find_element(Point2D::new(0.5, 0.2)).unwrap();
        assert_eq!(mesh.node_tree_state(), CacheState::Present);
        assert_eq!(mesh.element_tree_state(), CacheState::Present);

        mesh.move_node(NodeIndex::new(0), Point2D::new(-5.0, -5.0)).unwrap();
        assert_eq!(mesh.node_tree_state(), CacheState::Stale);
        assert_eq!(mesh.element_tree_state(), CacheState::Stale);

        let nearest = mesh.find_nearest_node(Point2D::new(-4.0, -4.0)).unwrap();
        assert_eq!(nearest, Some(NodeIndex::new(0)));
        assert_eq!(mesh.node_tree_state(), CacheState::Present);
        assert_eq!(mesh.element_tree_state(), CacheState::Stale);

        mesh.invalidate_search_trees();
        assert_eq!(mesh.node_tree_state(), CacheState::Stale);
    }

    #[test]
    fn test_element_mutation_keeps_node_tree() {
        let mut mesh = strip(1);
        mesh.build_search_trees().unwrap();
        mesh.delete_element(ElementIndex::new(1)).unwrap();
        assert_eq!(mesh.node_tree_state(), CacheState::Present);
        assert_eq!(mesh.element_tree_state(), CacheState::Stale);
        assert_eq!(mesh.find_element(Point2D::new(0.2, 0.8)).unwrap(), None);
    }
}
