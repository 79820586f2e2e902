// crates/mh_io/src/exporters/geojson.rs

//! GeoJSON 导出器
//!
//! 把 [`FeatureSet`] 写成 RFC 7946 FeatureCollection。多边形外环自动闭合。

use super::features::{FeatureSet, FeatureSink, FieldValue, Geometry};
use crate::error::{IoError, IoResult};
use mh_geo::Point2D;
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// GeoJSON 导出器
#[derive(Debug, Clone, Default)]
pub struct GeoJsonExporter {
    pretty: bool,
}

impl GeoJsonExporter {
    /// 创建紧凑输出的导出器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置是否缩进输出
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// 转换为 GeoJSON 值
    pub fn to_value(layer: &FeatureSet) -> Value {
        let features: Vec<Value> = layer
            .features()
            .iter()
            .map(|feature| {
                let mut properties = Map::new();
                for (field, value) in layer.fields().iter().zip(&feature.values) {
                    let v = match value {
                        FieldValue::Integer(i) => json!(i),
                        FieldValue::Double(d) => json!(d),
                    };
                    properties.insert(field.name.clone(), v);
                }
                json!({
                    "type": "Feature",
                    "geometry": geometry_value(&feature.geometry),
                    "properties": Value::Object(properties),
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    /// 写入任意 writer
    pub fn write_to<W: Write>(&self, layer: &FeatureSet, writer: W) -> IoResult<()> {
        let value = Self::to_value(layer);
        let result = if self.pretty {
            serde_json::to_writer_pretty(writer, &value)
        } else {
            serde_json::to_writer(writer, &value)
        };
        result.map_err(|e| IoError::Serialization(e.to_string()))
    }
}

fn position(p: &Point2D) -> Value {
    json!([p.x, p.y])
}

fn geometry_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": position(p) }),
        Geometry::LineString(points) => json!({
            "type": "LineString",
            "coordinates": points.iter().map(position).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(ring) => {
            let mut coords: Vec<Value> = ring.iter().map(position).collect();
            if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
                if first != last {
                    coords.push(position(first));
                }
            }
            json!({ "type": "Polygon", "coordinates": [coords] })
        }
    }
}

impl FeatureSink for GeoJsonExporter {
    fn write_features(&mut self, layer: &FeatureSet, path: &Path) -> IoResult<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        self.write_to(layer, &mut w)?;
        w.flush()?;
        tracing::debug!(path = %path.display(), features = layer.len(), "GeoJSON 已写出");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporters::features::{Feature, FieldDef, GeometryKind};

    #[test]
    fn test_polygon_ring_is_closed() {
        let mut layer = FeatureSet::new(GeometryKind::Polygon, vec![FieldDef::integer("elementid")]);
        layer
            .push(Feature::new(
                Geometry::Polygon(vec![
                    Point2D::new(0.0, 0.0),
                    Point2D::new(1.0, 0.0),
                    Point2D::new(0.0, 1.0),
                ]),
                vec![FieldValue::Integer(5)],
            ))
            .unwrap();

        let value = GeoJsonExporter::to_value(&layer);
        let ring = &value["features"][0]["geometry"]["coordinates"][0];
        assert_eq!(ring.as_array().unwrap().len(), 4);
        assert_eq!(ring[0], ring[3]);
        assert_eq!(value["features"][0]["properties"]["elementid"], 5);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.geojson");

        let mut layer = FeatureSet::new(
            GeometryKind::Point,
            vec![FieldDef::integer("nodeid"), FieldDef::double("elevation")],
        );
        layer
            .push(Feature::new(
                Geometry::Point(Point2D::new(-75.0, 35.0)),
                vec![FieldValue::Integer(1), FieldValue::Double(-4.5)],
            ))
            .unwrap();

        GeoJsonExporter::new().pretty(true).write_features(&layer, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
        assert_eq!(value["features"][0]["properties"]["elevation"], -4.5);
    }
}
