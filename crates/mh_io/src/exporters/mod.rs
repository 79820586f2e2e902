// crates/mh_io/src/exporters/mod.rs

//! 数据导出模块
//!
//! 矢量要素模型与导出器。

pub mod features;
pub mod geojson;

// 重导出
pub use features::{
    Feature, FeatureSet, FeatureSink, FieldDef, FieldType, FieldValue, Geometry, GeometryKind,
};
pub use geojson::GeoJsonExporter;
