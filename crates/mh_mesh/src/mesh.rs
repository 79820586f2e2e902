// crates/mh_mesh/src/mesh.rs
//! 非结构网格容器
//!
//! [`Mesh`] 持有节点、单元、开边界、陆地边界、参考系描述以及编号映射和空间索引缓存。
//! 读写、拓扑、空间查询、投影和要素导出分别在 `io`、`topology`、`spatial_index`、
//! `projection`、`export` 模块中以 `impl Mesh` 的形式提供。
//!
//! # 不变量
//!
//! - 单元和边界引用的节点编号在网格中都存在。修改节点编号会同步更新引用，
//!   删除仍被引用的节点会被拒绝。
//! - 同一集合中的外部编号唯一。
//! - 每次修改后编号映射立即重建，空间索引标记为过期并在下次查询时重建。
//!
//! # 示例
//!
//! ```
//! use mh_mesh::{Element, Mesh, Node};
//! use mh_foundation::NodeIndex;
//!
//! let mut mesh = Mesh::new();
//! mesh.add_node(Node::new(1, 0.0, 0.0, -1.0)).unwrap();
//! mesh.add_node(Node::new(2, 1.0, 0.0, -2.0)).unwrap();
//! mesh.add_node(Node::new(3, 0.0, 1.0, -3.0)).unwrap();
//! mesh.add_element(Element::triangle(1, 1, 2, 3)).unwrap();
//!
//! assert_eq!(mesh.num_elements(), 1);
//! assert!(mesh.delete_node(NodeIndex::new(0)).is_err());
//! ```

use crate::boundary::{Boundary, BoundaryKind};
use crate::element::{Element, ElementId};
use crate::error::{MeshError, MeshResult};
use crate::identity::IdentityIndex;
use crate::node::{Node, NodeId};
use crate::spatial_index::SearchTrees;
use mh_config::MeshEngineConfig;
use mh_foundation::{ensure, ElementIndex, NodeIndex};
use mh_geo::geometry::{point_in_polygon, polygon_area, vertex_centroid};
use mh_geo::{Crs, Point2D};
use std::path::{Path, PathBuf};

const NODE: &str = "Node";
const ELEMENT: &str = "Element";

/// 非结构网格
#[derive(Debug)]
pub struct Mesh {
    pub(crate) filename: Option<PathBuf>,
    pub(crate) header: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) elements: Vec<Element>,
    pub(crate) open_boundaries: Vec<Boundary>,
    pub(crate) land_boundaries: Vec<Boundary>,
    pub(crate) crs: Crs,
    pub(crate) node_identity: IdentityIndex,
    pub(crate) element_identity: IdentityIndex,
    pub(crate) search: SearchTrees,
    pub(crate) config: MeshEngineConfig,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::from_config(MeshEngineConfig::default())
    }
}

/// 克隆不复制空间索引，新网格的索引在首次查询时构建
impl Clone for Mesh {
    fn clone(&self) -> Self {
        Self {
            filename: self.filename.clone(),
            header: self.header.clone(),
            nodes: self.nodes.clone(),
            elements: self.elements.clone(),
            open_boundaries: self.open_boundaries.clone(),
            land_boundaries: self.land_boundaries.clone(),
            crs: self.crs,
            node_identity: self.node_identity.clone(),
            element_identity: self.element_identity.clone(),
            search: SearchTrees::default(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// 构造与基本属性
// ============================================================================

impl Mesh {
    /// 使用默认配置创建空网格
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建绑定文件名的空网格
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let mut mesh = Self::new();
        mesh.filename = Some(path.into());
        mesh
    }

    /// 使用指定配置创建空网格
    ///
    /// # Errors
    /// 配置校验失败时返回 [`MeshError::Config`]
    pub fn with_config(config: MeshEngineConfig) -> MeshResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: MeshEngineConfig) -> Self {
        let crs = Crs::new(config.projection.default_epsg, config.projection.geographic);
        Self {
            filename: None,
            header: String::new(),
            nodes: Vec::new(),
            elements: Vec::new(),
            open_boundaries: Vec::new(),
            land_boundaries: Vec::new(),
            crs,
            node_identity: IdentityIndex::default(),
            element_identity: IdentityIndex::default(),
            search: SearchTrees::default(),
            config,
        }
    }

    /// 引擎配置
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MeshEngineConfig {
        &self.config
    }

    /// 绑定的文件名
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// 设置文件名
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        self.filename = Some(path.into());
    }

    /// 网格标题
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// 设置网格标题
    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    /// 清空网格内容
    ///
    /// 文件名、配置和参考系保留。
    pub fn clear(&mut self) {
        self.header.clear();
        self.nodes.clear();
        self.elements.clear();
        self.open_boundaries.clear();
        self.land_boundaries.clear();
        self.node_identity = IdentityIndex::default();
        self.element_identity = IdentityIndex::default();
        self.search = SearchTrees::default();
    }
}

// ============================================================================
// 计数与访问
// ============================================================================

impl Mesh {
    /// 节点数
    #[inline]
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// 单元数
    #[inline]
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// 开边界数
    #[inline]
    #[must_use]
    pub fn num_open_boundaries(&self) -> usize {
        self.open_boundaries.len()
    }

    /// 陆地边界数
    #[inline]
    #[must_use]
    pub fn num_land_boundaries(&self) -> usize {
        self.land_boundaries.len()
    }

    /// 所有开边界的段数之和
    #[must_use]
    pub fn total_open_boundary_nodes(&self) -> usize {
        self.open_boundaries.iter().map(Boundary::len).sum()
    }

    /// 所有陆地边界的段数之和
    #[must_use]
    pub fn total_land_boundary_nodes(&self) -> usize {
        self.land_boundaries.iter().map(Boundary::len).sum()
    }

    /// 单元的最大顶点数，没有单元时为 0
    #[must_use]
    pub fn max_nodes_per_element(&self) -> usize {
        self.elements
            .iter()
            .map(Element::n_vertices)
            .max()
            .unwrap_or(0)
    }

    /// 全部节点
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// 全部单元
    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// 全部开边界
    #[inline]
    #[must_use]
    pub fn open_boundaries(&self) -> &[Boundary] {
        &self.open_boundaries
    }

    /// 全部陆地边界
    #[inline]
    #[must_use]
    pub fn land_boundaries(&self) -> &[Boundary] {
        &self.land_boundaries
    }

    /// 按位置访问节点
    pub fn node(&self, index: NodeIndex) -> MeshResult<&Node> {
        MeshError::check_index(NODE, index.get(), self.nodes.len())?;
        Ok(&self.nodes[index.get()])
    }

    /// 按位置访问单元
    pub fn element(&self, index: ElementIndex) -> MeshResult<&Element> {
        MeshError::check_index(ELEMENT, index.get(), self.elements.len())?;
        Ok(&self.elements[index.get()])
    }

    /// 按外部编号访问节点
    pub fn node_by_id(&self, id: NodeId) -> MeshResult<&Node> {
        let pos = self.node_identity.position(NODE, id)?;
        Ok(&self.nodes[pos])
    }

    /// 按外部编号访问单元
    pub fn element_by_id(&self, id: ElementId) -> MeshResult<&Element> {
        let pos = self.element_identity.position(ELEMENT, id)?;
        Ok(&self.elements[pos])
    }

    /// 节点编号对应的位置
    pub fn node_index_of(&self, id: NodeId) -> MeshResult<NodeIndex> {
        self.node_identity.position(NODE, id).map(NodeIndex::new)
    }

    /// 单元编号对应的位置
    pub fn element_index_of(&self, id: ElementId) -> MeshResult<ElementIndex> {
        self.element_identity
            .position(ELEMENT, id)
            .map(ElementIndex::new)
    }

    /// 第 `index` 条开边界
    pub fn open_boundary(&self, index: usize) -> MeshResult<&Boundary> {
        MeshError::check_index("OpenBoundary", index, self.open_boundaries.len())?;
        Ok(&self.open_boundaries[index])
    }

    /// 第 `index` 条陆地边界
    pub fn land_boundary(&self, index: usize) -> MeshResult<&Boundary> {
        MeshError::check_index("LandBoundary", index, self.land_boundaries.len())?;
        Ok(&self.land_boundaries[index])
    }

    /// 节点编号是否为 `1..=n`
    #[inline]
    #[must_use]
    pub fn node_ordering_is_logical(&self) -> bool {
        self.node_identity.is_logical()
    }

    /// 单元编号是否为 `1..=n`
    #[inline]
    #[must_use]
    pub fn element_ordering_is_logical(&self) -> bool {
        self.element_identity.is_logical()
    }

    /// 节点 x 坐标
    #[must_use]
    pub fn x(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.x).collect()
    }

    /// 节点 y 坐标
    #[must_use]
    pub fn y(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.y).collect()
    }

    /// 节点高程
    #[must_use]
    pub fn z(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.z).collect()
    }

    /// 节点三维坐标
    #[must_use]
    pub fn xyz(&self) -> Vec<[f64; 3]> {
        self.nodes.iter().map(|n| [n.x, n.y, n.z]).collect()
    }

    /// 每个单元的节点编号
    #[must_use]
    pub fn connectivity(&self) -> Vec<Vec<NodeId>> {
        self.elements.iter().map(|e| e.nodes().to_vec()).collect()
    }

    pub(crate) fn node_position(&self, id: NodeId) -> MeshResult<Point2D> {
        self.node_by_id(id).map(Node::position)
    }
}

// ============================================================================
// 修改
// ============================================================================

impl Mesh {
    /// 追加节点，返回其位置
    ///
    /// # Errors
    /// 编号已存在时返回 [`MeshError::DuplicateIdentity`]
    pub fn add_node(&mut self, node: Node) -> MeshResult<NodeIndex> {
        self.node_identity.push(NODE, node.id)?;
        self.nodes.push(node);
        self.search.invalidate_all();
        Ok(NodeIndex::new(self.nodes.len() - 1))
    }

    /// 替换节点
    ///
    /// 编号改变时，所有单元和边界中对旧编号的引用一并改为新编号。
    ///
    /// # Errors
    /// 位置越界，或新编号已被其他节点占用
    pub fn set_node(&mut self, index: NodeIndex, node: Node) -> MeshResult<()> {
        let old_id = self.node(index)?.id;
        if node.id != old_id {
            if self.node_identity.contains(node.id) {
                return Err(MeshError::DuplicateIdentity {
                    entity: NODE,
                    id: node.id,
                });
            }
            for element in &mut self.elements {
                element.renumber_node(old_id, node.id);
            }
            for boundary in self
                .open_boundaries
                .iter_mut()
                .chain(self.land_boundaries.iter_mut())
            {
                boundary.renumber_node(old_id, node.id);
            }
        }
        self.nodes[index.get()] = node;
        if node.id != old_id {
            self.rebuild_node_identity()?;
        }
        self.search.invalidate_all();
        Ok(())
    }

    /// 移动节点
    pub fn move_node(&mut self, index: NodeIndex, position: Point2D) -> MeshResult<()> {
        MeshError::check_index(NODE, index.get(), self.nodes.len())?;
        self.nodes[index.get()].set_position(position);
        self.search.invalidate_all();
        Ok(())
    }

    /// 删除节点
    ///
    /// # Errors
    /// 节点仍被单元或边界引用时返回 [`MeshError::InvalidTopology`]
    pub fn delete_node(&mut self, index: NodeIndex) -> MeshResult<()> {
        let id = self.node(index)?.id;
        if let Some(e) = self.elements.iter().find(|e| e.references(id)) {
            return Err(MeshError::invalid_topology(
                "delete_node",
                format!("节点 {id} 仍被单元 {} 引用", e.id()),
            ));
        }
        if self
            .open_boundaries
            .iter()
            .chain(&self.land_boundaries)
            .any(|b| b.references(id))
        {
            return Err(MeshError::invalid_topology(
                "delete_node",
                format!("节点 {id} 仍被边界引用"),
            ));
        }
        self.nodes.remove(index.get());
        self.rebuild_node_identity()?;
        self.search.invalidate_all();
        Ok(())
    }

    /// 追加单元，返回其位置
    ///
    /// # Errors
    /// 引用的节点不存在，或单元编号重复
    pub fn add_element(&mut self, element: Element) -> MeshResult<ElementIndex> {
        self.check_element_nodes(&element)?;
        self.element_identity.push(ELEMENT, element.id())?;
        self.elements.push(element);
        self.search.invalidate_elements();
        Ok(ElementIndex::new(self.elements.len() - 1))
    }

    /// 替换单元
    pub fn set_element(&mut self, index: ElementIndex, element: Element) -> MeshResult<()> {
        let old_id = self.element(index)?.id();
        self.check_element_nodes(&element)?;
        if element.id() != old_id && self.element_identity.contains(element.id()) {
            return Err(MeshError::DuplicateIdentity {
                entity: ELEMENT,
                id: element.id(),
            });
        }
        self.elements[index.get()] = element;
        if element.id() != old_id {
            self.rebuild_element_identity()?;
        }
        self.search.invalidate_elements();
        Ok(())
    }

    /// 删除单元
    pub fn delete_element(&mut self, index: ElementIndex) -> MeshResult<()> {
        MeshError::check_index(ELEMENT, index.get(), self.elements.len())?;
        self.elements.remove(index.get());
        self.rebuild_element_identity()?;
        self.search.invalidate_elements();
        Ok(())
    }

    /// 追加开边界
    ///
    /// # Errors
    /// 边界代码不是开边界，或引用了不存在的节点
    pub fn add_open_boundary(&mut self, boundary: Boundary) -> MeshResult<()> {
        if boundary.kind() != BoundaryKind::Open {
            return Err(MeshError::invalid_topology(
                "add_open_boundary",
                format!("边界代码 {} 不是开边界", boundary.code()),
            ));
        }
        self.check_boundary_nodes(&boundary)?;
        self.open_boundaries.push(boundary);
        Ok(())
    }

    /// 追加陆地边界
    ///
    /// # Errors
    /// 边界代码是开边界代码，或引用了不存在的节点
    pub fn add_land_boundary(&mut self, boundary: Boundary) -> MeshResult<()> {
        if boundary.kind() == BoundaryKind::Open {
            return Err(MeshError::invalid_topology(
                "add_land_boundary",
                "开边界代码不能用于陆地边界",
            ));
        }
        self.check_boundary_nodes(&boundary)?;
        self.land_boundaries.push(boundary);
        Ok(())
    }

    /// 按位置整体替换节点高程
    ///
    /// # Errors
    /// 长度与节点数不符时返回 [`MeshError::SizeMismatch`]
    pub fn set_z(&mut self, z: &[f64]) -> MeshResult<()> {
        ensure!(
            z.len() == self.nodes.len(),
            MeshError::SizeMismatch {
                name: "z",
                expected: self.nodes.len(),
                actual: z.len(),
            }
        );
        for (node, &value) in self.nodes.iter_mut().zip(z) {
            node.z = value;
        }
        Ok(())
    }

    fn check_element_nodes(&self, element: &Element) -> MeshResult<()> {
        for &id in element.nodes() {
            self.node_identity.position(NODE, id)?;
        }
        Ok(())
    }

    fn check_boundary_nodes(&self, boundary: &Boundary) -> MeshResult<()> {
        for id in boundary.node_ids() {
            self.node_identity.position(NODE, id)?;
        }
        Ok(())
    }

    fn rebuild_node_identity(&mut self) -> MeshResult<()> {
        self.node_identity = IdentityIndex::build(NODE, self.nodes.iter().map(|n| n.id))?;
        Ok(())
    }

    fn rebuild_element_identity(&mut self) -> MeshResult<()> {
        self.element_identity =
            IdentityIndex::build(ELEMENT, self.elements.iter().map(Element::id))?;
        Ok(())
    }
}

// ============================================================================
// 单元几何
// ============================================================================

impl Mesh {
    /// 单元顶点坐标（按单元存储顺序）
    pub fn element_vertices(&self, index: ElementIndex) -> MeshResult<Vec<Point2D>> {
        let element = self.element(index)?;
        self.resolve_vertices(element)
    }

    pub(crate) fn resolve_vertices(&self, element: &Element) -> MeshResult<Vec<Point2D>> {
        element
            .nodes()
            .iter()
            .map(|&id| self.node_position(id))
            .collect()
    }

    /// 单元顶点均值中心
    pub fn element_centroid(&self, index: ElementIndex) -> MeshResult<Point2D> {
        Ok(vertex_centroid(&self.element_vertices(index)?))
    }

    /// 单元面积（坐标单位的平方）
    pub fn element_area(&self, index: ElementIndex) -> MeshResult<f64> {
        Ok(polygon_area(&self.element_vertices(index)?))
    }

    /// 点是否在单元内
    pub fn element_contains(&self, index: ElementIndex, point: Point2D) -> MeshResult<bool> {
        Ok(point_in_polygon(&point, &self.element_vertices(index)?))
    }

    /// 单元特征尺寸：各边长的均值
    ///
    /// `geodesic` 为真时把坐标视为经纬度，边长取大圆距离（米）。
    pub fn element_size(&self, index: ElementIndex, geodesic: bool) -> MeshResult<f64> {
        let vertices = self.element_vertices(index)?;
        Ok(mean_leg_length(&vertices, geodesic))
    }
}

pub(crate) fn mean_leg_length(vertices: &[Point2D], geodesic: bool) -> f64 {
    let n = vertices.len();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = (0..n)
        .map(|j| {
            let (a, b) = (&vertices[j], &vertices[(j + 1) % n]);
            if geodesic {
                a.geodesic_distance_to(b)
            } else {
                a.distance_to(b)
            }
        })
        .sum();
    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundaryCode, BoundarySegment};

    fn two_triangles() -> Mesh {
        let mut mesh = Mesh::new();
        for (id, x, y) in [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 1.0, 1.0), (4, 0.0, 1.0)] {
            mesh.add_node(Node::new(id, x, y, -(id as f64))).unwrap();
        }
        mesh.add_element(Element::triangle(1, 1, 2, 3)).unwrap();
        mesh.add_element(Element::triangle(2, 1, 3, 4)).unwrap();
        mesh
    }

    #[test]
    fn test_counts_and_accessors() {
        let mesh = two_triangles();
        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.num_elements(), 2);
        assert_eq!(mesh.max_nodes_per_element(), 3);
        assert_eq!(mesh.node_by_id(3).unwrap().z, -3.0);
        assert_eq!(mesh.element_index_of(2).unwrap(), ElementIndex::new(1));
        assert_eq!(mesh.connectivity(), vec![vec![1, 2, 3], vec![1, 3, 4]]);
        assert!(mesh.node_ordering_is_logical());
        assert!(mesh.node(NodeIndex::new(4)).is_err());
        assert!(matches!(
            mesh.node_by_id(9),
            Err(MeshError::IdentityNotFound { id: 9, .. })
        ));
    }

    #[test]
    fn test_add_element_requires_nodes() {
        let mut mesh = two_triangles();
        let err = mesh.add_element(Element::triangle(3, 1, 2, 99)).unwrap_err();
        assert!(matches!(err, MeshError::IdentityNotFound { id: 99, .. }));
        assert_eq!(mesh.num_elements(), 2);

        let err = mesh.add_element(Element::triangle(2, 1, 2, 4)).unwrap_err();
        assert!(matches!(err, MeshError::DuplicateIdentity { id: 2, .. }));
    }

    #[test]
    fn test_delete_node_refused_while_referenced() {
        let mut mesh = two_triangles();
        mesh.add_node(Node::new(5, 2.0, 2.0, 0.0)).unwrap();
        assert!(matches!(
            mesh.delete_node(NodeIndex::new(0)),
            Err(MeshError::InvalidTopology { .. })
        ));
        mesh.delete_node(NodeIndex::new(4)).unwrap();
        assert_eq!(mesh.num_nodes(), 4);
        assert!(mesh.node_by_id(5).is_err());
    }

    #[test]
    fn test_delete_node_refused_for_boundary_reference() {
        let mut mesh = two_triangles();
        mesh.add_node(Node::new(5, 2.0, 2.0, 0.0)).unwrap();
        mesh.add_land_boundary(
            Boundary::with_segments(BoundaryCode::new(0), vec![BoundarySegment::Single { node: 5 }])
                .unwrap(),
        )
        .unwrap();
        assert!(mesh.delete_node(NodeIndex::new(4)).is_err());
    }

    #[test]
    fn test_set_node_renumbers_references() {
        let mut mesh = two_triangles();
        mesh.add_open_boundary(Boundary::open(&[1, 2])).unwrap();
        mesh.set_node(NodeIndex::new(0), Node::new(100, 0.0, 0.0, -1.0))
            .unwrap();
        assert!(!mesh.node_ordering_is_logical());
        assert_eq!(mesh.element_by_id(1).unwrap().nodes(), &[100, 2, 3]);
        assert_eq!(
            mesh.open_boundary(0).unwrap().node_ids().collect::<Vec<_>>(),
            vec![100, 2]
        );
        assert!(mesh
            .set_node(NodeIndex::new(1), Node::new(3, 0.0, 0.0, 0.0))
            .is_err());
    }

    #[test]
    fn test_delete_element_rebuilds_identity() {
        let mut mesh = two_triangles();
        mesh.delete_element(ElementIndex::new(0)).unwrap();
        assert_eq!(mesh.num_elements(), 1);
        assert!(!mesh.element_ordering_is_logical());
        assert_eq!(mesh.element_index_of(2).unwrap(), ElementIndex::new(0));
    }

    #[test]
    fn test_boundary_kind_checks() {
        let mut mesh = two_triangles();
        assert!(mesh.add_land_boundary(Boundary::open(&[1])).is_err());
        assert!(mesh
            .add_open_boundary(Boundary::new(BoundaryCode::new(20)))
            .is_err());
        assert!(mesh.add_open_boundary(Boundary::open(&[42])).is_err());
    }

    #[test]
    fn test_set_z_size_mismatch() {
        let mut mesh = two_triangles();
        assert!(matches!(
            mesh.set_z(&[1.0]),
            Err(MeshError::SizeMismatch { expected: 4, actual: 1, .. })
        ));
        mesh.set_z(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(mesh.z(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_element_geometry() {
        let mesh = two_triangles();
        let e = ElementIndex::new(0);
        assert!((mesh.element_area(e).unwrap() - 0.5).abs() < 1e-12);
        let c = mesh.element_centroid(e).unwrap();
        assert!((c.x - 2.0 / 3.0).abs() < 1e-12);
        assert!((c.y - 1.0 / 3.0).abs() < 1e-12);
        assert!(mesh.element_contains(e, Point2D::new(0.7, 0.2)).unwrap());
        assert!(!mesh.element_contains(e, Point2D::new(0.2, 0.7)).unwrap());

        let size = mesh.element_size(e, false).unwrap();
        assert!((size - (2.0 + 2f64.sqrt()) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_clone_and_clear() {
        let mut mesh = two_triangles();
        mesh.set_header("demo");
        let copy = mesh.clone();
        mesh.clear();
        assert_eq!(mesh.num_nodes(), 0);
        assert_eq!(mesh.header(), "");
        assert_eq!(copy.num_elements(), 2);
        assert_eq!(copy.header(), "demo");
    }
}
