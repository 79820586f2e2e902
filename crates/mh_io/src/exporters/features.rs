// crates/mh_io/src/exporters/features.rs

//! 矢量要素模型
//!
//! 一个 [`FeatureSet`] 对应一个矢量图层：单一几何类型、固定的属性字段表，
//! 以及与字段表一一对应的属性值。导出器（[`FeatureSink`]）只负责落盘。
//!
//! # 示例
//!
//! ```
//! use mh_geo::Point2D;
//! use mh_io::exporters::{Feature, FeatureSet, FieldDef, FieldValue, Geometry, GeometryKind};
//!
//! let mut layer = FeatureSet::new(GeometryKind::Point, vec![FieldDef::integer("nodeid")]);
//! layer
//!     .push(Feature::new(Geometry::Point(Point2D::new(1.0, 2.0)), vec![FieldValue::Integer(1)]))
//!     .unwrap();
//! assert_eq!(layer.len(), 1);
//! ```

use crate::error::{IoError, IoResult};
use mh_geo::Point2D;
use std::path::Path;

/// 几何类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// 点
    Point,
    /// 折线
    LineString,
    /// 多边形
    Polygon,
}

/// 几何对象
///
/// 多边形只存一圈顶点，首尾不重复，闭合由导出器处理。
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// 点
    Point(Point2D),
    /// 折线
    LineString(Vec<Point2D>),
    /// 多边形外环
    Polygon(Vec<Point2D>),
}

impl Geometry {
    /// 几何类型
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon(_) => GeometryKind::Polygon,
        }
    }
}

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 整数
    Integer,
    /// 浮点
    Double,
}

/// 字段定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// 字段名
    pub name: String,
    /// 字段类型
    pub field_type: FieldType,
}

impl FieldDef {
    /// 整数字段
    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Integer,
        }
    }

    /// 浮点字段
    pub fn double(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Double,
        }
    }
}

/// 属性值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// 整数
    Integer(i64),
    /// 浮点
    Double(f64),
}

impl FieldValue {
    /// 值的类型
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Integer(_) => FieldType::Integer,
            Self::Double(_) => FieldType::Double,
        }
    }
}

/// 单个要素
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// 几何
    pub geometry: Geometry,
    /// 属性值，顺序与图层字段表一致
    pub values: Vec<FieldValue>,
}

impl Feature {
    /// 创建要素
    #[must_use]
    pub fn new(geometry: Geometry, values: Vec<FieldValue>) -> Self {
        Self { geometry, values }
    }
}

/// 矢量图层
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    kind: GeometryKind,
    fields: Vec<FieldDef>,
    features: Vec<Feature>,
}

impl FeatureSet {
    /// 创建空图层
    #[must_use]
    pub fn new(kind: GeometryKind, fields: Vec<FieldDef>) -> Self {
        Self {
            kind,
            fields,
            features: Vec::new(),
        }
    }

    /// 追加要素，几何类型与字段表必须匹配
    pub fn push(&mut self, feature: Feature) -> IoResult<()> {
        if feature.geometry.kind() != self.kind {
            return Err(IoError::FeatureMismatch(format!(
                "图层几何类型为 {:?}，要素为 {:?}",
                self.kind,
                feature.geometry.kind()
            )));
        }
        if feature.values.len() != self.fields.len() {
            return Err(IoError::FeatureMismatch(format!(
                "图层有 {} 个字段，要素提供 {} 个值",
                self.fields.len(),
                feature.values.len()
            )));
        }
        if let Some((field, _)) = self
            .fields
            .iter()
            .zip(&feature.values)
            .find(|(f, v)| f.field_type != v.field_type())
        {
            return Err(IoError::FeatureMismatch(format!(
                "字段 {} 类型不符",
                field.name
            )));
        }
        self.features.push(feature);
        Ok(())
    }

    /// 几何类型
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// 字段表
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// 要素
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// 要素数
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// 是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// 矢量要素导出器
pub trait FeatureSink {
    /// 把图层写到 `path`
    fn write_features(&mut self, layer: &FeatureSet, path: &Path) -> IoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_layer() -> FeatureSet {
        FeatureSet::new(
            GeometryKind::LineString,
            vec![FieldDef::integer("node1"), FieldDef::double("znode1")],
        )
    }

    #[test]
    fn test_push_checks_geometry_kind() {
        let mut layer = line_layer();
        let err = layer
            .push(Feature::new(
                Geometry::Point(Point2D::ZERO),
                vec![FieldValue::Integer(1), FieldValue::Double(0.0)],
            ))
            .unwrap_err();
        assert!(matches!(err, IoError::FeatureMismatch(_)));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_push_checks_field_types() {
        let mut layer = line_layer();
        let line = Geometry::LineString(vec![Point2D::ZERO, Point2D::new(1.0, 0.0)]);
        assert!(layer
            .push(Feature::new(line.clone(), vec![FieldValue::Integer(1)]))
            .is_err());
        assert!(layer
            .push(Feature::new(
                line.clone(),
                vec![FieldValue::Double(1.0), FieldValue::Double(0.0)]
            ))
            .is_err());
        layer
            .push(Feature::new(
                line,
                vec![FieldValue::Integer(1), FieldValue::Double(0.0)],
            ))
            .unwrap();
        assert_eq!(layer.len(), 1);
    }
}
