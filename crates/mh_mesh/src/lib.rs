// crates/mh_mesh/src/lib.rs

//! MariHydro 非结构网格引擎
//!
//! 面向海岸/海洋水动力模式的二维三角形/四边形网格：内存模型、三种交换格式的读写、
//! 非连续编号映射、派生拓扑、空间查询与坐标转换。
//!
//! # 核心类型
//!
//! - [`Mesh`]: 网格容器，所有操作的入口
//! - [`Node`] / [`Element`]: 节点与单元（单元只保存节点编号）
//! - [`Boundary`] / [`BoundarySegment`]: 开边界、陆地边界以及堰、涵洞
//!
//! # 模块结构
//!
//! - [`io`]: ADCIRC / 2dm / UGRID 读写
//! - [`identity`]: 外部编号到位置的映射
//! - [`topology`]: 节点-单元表、边表、网格尺度
//! - [`spatial_index`]: 最近邻与点定位
//! - [`projection`]: 重投影与 CPP 局部平面
//! - [`export`]: 矢量要素导出
//!
//! # 示例
//!
//! ```rust
//! use mh_mesh::{Link, Mesh};
//! use mh_geo::Point2D;
//!
//! let text = "\
//! sample
//! 2 4
//! 1 0.0 0.0 -1.0
//! 2 1.0 0.0 -2.0
//! 3 1.0 1.0 -3.0
//! 4 0.0 1.0 -4.0
//! 1 3 1 2 3
//! 2 3 1 3 4
//! 0
//! 0
//! 0
//! 0
//! ";
//! let mut mesh = Mesh::new();
//! mesh.read_adcirc_from(text.as_bytes()).unwrap();
//!
//! let links = mesh.link_table().unwrap();
//! assert_eq!(links.len(), 5);
//! assert_eq!(links[0], Link::new(1, 2));
//!
//! let found = mesh.find_element(Point2D::new(0.75, 0.25)).unwrap();
//! assert_eq!(found.map(|e| e.get()), Some(0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod element;
pub mod error;
pub mod export;
pub mod identity;
pub mod io;
pub mod mesh;
pub mod node;
pub mod projection;
pub mod spatial_index;
pub mod topology;

// 重新导出核心类型
pub use boundary::{Boundary, BoundaryCode, BoundaryKind, BoundarySegment, PipeGeometry};
pub use element::{Element, ElementId, ElementShape};
pub use error::{MeshError, MeshResult};
pub use export::FeatureLayer;
pub use identity::IdentityIndex;
pub use io::{MeshData, MeshFormat};
pub use mesh::Mesh;
pub use node::{Node, NodeId};
pub use spatial_index::CacheState;
pub use topology::{CsrConnectivity, ElementTable, Link};

/// 预导入模块
pub mod prelude {
    pub use crate::boundary::{Boundary, BoundaryCode, BoundarySegment};
    pub use crate::element::Element;
    pub use crate::error::{MeshError, MeshResult};
    pub use crate::io::MeshFormat;
    pub use crate::mesh::Mesh;
    pub use crate::node::Node;
    pub use mh_foundation::{ElementIndex, NodeIndex};
    pub use mh_geo::Point2D;
}
