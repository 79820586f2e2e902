// crates/mh_geo/src/lib.rs

//! MariHydro 地理空间处理模块
//!
//! 为网格引擎提供平面几何、坐标参考系描述、投影转换与点空间索引。
//!
//! # 模块
//!
//! - `geometry`: `Point2D` 与多边形运算（面积、中心、点在多边形内、角度排序）
//! - `crs`: 参考系描述（EPSG + 地理标记）
//! - `projection`: 投影转换（UTM、Web Mercator）与 CPP 局部平面投影
//! - `transform`: 坐标转换协作者接口与内置实现
//! - `spatial_index`: 基于 R-tree 的点索引
//!
//! # 示例
//!
//! ```
//! use mh_geo::prelude::*;
//!
//! let wgs84 = Crs::wgs84();
//! assert!(wgs84.is_geographic());
//!
//! let proj = Projection::from_epsg(4326, 32650).unwrap();
//! let (x, _y) = proj.forward(117.0, 40.0).unwrap();
//! assert!((x - 500_000.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crs;
pub mod ellipsoid;
pub mod geometry;
pub mod projection;
pub mod spatial_index;
pub mod transform;

/// 预导入模块
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::geometry::Point2D;
    pub use crate::projection::{Projection, ProjectionType};
    pub use crate::spatial_index::SpatialIndex;
    pub use crate::transform::{BuiltinTransformer, CoordinateTransform, GeoTransformer};
}

// 重导出常用类型
pub use crs::Crs;
pub use geometry::Point2D;
pub use projection::{Projection, ProjectionType};
pub use spatial_index::SpatialIndex;
pub use transform::{BuiltinTransformer, CoordinateTransform, GeoTransformer};
