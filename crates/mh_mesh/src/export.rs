// crates/mh_mesh/src/export.rs

//! 网格矢量要素导出
//!
//! 把节点、边、单元转为带属性表的点、线、面要素，交给 [`FeatureSink`] 写出。
//!
//! | 图层 | 几何 | 字段 |
//! |------|------|------|
//! | 节点 | 点 | nodeid, longitude, latitude, elevation |
//! | 边 | 线 | node1, node2, znode1, znode2 |
//! | 单元 | 面 | elementid, node1..node4, znode1..znode4, zmean |
//!
//! 三角形单元的第 4 个节点字段填 -1，高程填 -9999。

use crate::error::MeshResult;
use crate::mesh::Mesh;
use mh_io::exporters::{
    Feature, FeatureSet, FeatureSink, FieldDef, FieldValue, Geometry, GeometryKind,
};
use std::path::Path;
use tracing::info;

/// 三角形缺失节点的编号占位
const MISSING_NODE: i64 = -1;
/// 三角形缺失节点的高程占位
const MISSING_Z: f64 = -9999.0;

/// 要导出的图层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureLayer {
    /// 节点（点）
    Nodes,
    /// 边（线）
    Links,
    /// 单元（面）
    Elements,
}

fn id_value(id: usize) -> FieldValue {
    FieldValue::Integer(i64::try_from(id).unwrap_or(i64::MAX))
}

impl Mesh {
    /// 节点图层
    pub fn node_features(&self) -> MeshResult<FeatureSet> {
        let mut layer = FeatureSet::new(
            GeometryKind::Point,
            vec![
                FieldDef::integer("nodeid"),
                FieldDef::double("longitude"),
                FieldDef::double("latitude"),
                FieldDef::double("elevation"),
            ],
        );
        for n in &self.nodes {
            layer.push(Feature::new(
                Geometry::Point(n.position()),
                vec![
                    id_value(n.id),
                    FieldValue::Double(n.x),
                    FieldValue::Double(n.y),
                    FieldValue::Double(n.z),
                ],
            ))?;
        }
        Ok(layer)
    }

    /// 边图层，来自 [`Mesh::link_table`]
    pub fn link_features(&self) -> MeshResult<FeatureSet> {
        let mut layer = FeatureSet::new(
            GeometryKind::LineString,
            vec![
                FieldDef::integer("node1"),
                FieldDef::integer("node2"),
                FieldDef::double("znode1"),
                FieldDef::double("znode2"),
            ],
        );
        for link in self.link_table()? {
            let a = self.node_by_id(link.node1)?;
            let b = self.node_by_id(link.node2)?;
            layer.push(Feature::new(
                Geometry::LineString(vec![a.position(), b.position()]),
                vec![
                    id_value(a.id),
                    id_value(b.id),
                    FieldValue::Double(a.z),
                    FieldValue::Double(b.z),
                ],
            ))?;
        }
        Ok(layer)
    }

    /// 单元图层
    pub fn element_features(&self) -> MeshResult<FeatureSet> {
        let mut fields = vec![FieldDef::integer("elementid")];
        fields.extend((1..=4).map(|i| FieldDef::integer(format!("node{i}"))));
        fields.extend((1..=4).map(|i| FieldDef::double(format!("znode{i}"))));
        fields.push(FieldDef::double("zmean"));
        let mut layer = FeatureSet::new(GeometryKind::Polygon, fields);

        for element in &self.elements {
            let nodes = element
                .nodes()
                .iter()
                .map(|&id| self.node_by_id(id))
                .collect::<MeshResult<Vec<_>>>()?;

            let mut ids = [FieldValue::Integer(MISSING_NODE); 4];
            let mut zs = [FieldValue::Double(MISSING_Z); 4];
            for (k, n) in nodes.iter().enumerate() {
                ids[k] = id_value(n.id);
                zs[k] = FieldValue::Double(n.z);
            }
            let zmean = nodes.iter().map(|n| n.z).sum::<f64>() / nodes.len() as f64;

            let mut values = Vec::with_capacity(10);
            values.push(id_value(element.id()));
            values.extend(ids);
            values.extend(zs);
            values.push(FieldValue::Double(zmean));

            let ring = nodes.iter().map(|n| n.position()).collect();
            layer.push(Feature::new(Geometry::Polygon(ring), values))?;
        }
        Ok(layer)
    }

    /// 生成指定图层并写出
    pub fn write_features<S: FeatureSink + ?Sized>(
        &self,
        layer: FeatureLayer,
        sink: &mut S,
        path: impl AsRef<Path>,
    ) -> MeshResult<()> {
        let features = match layer {
            FeatureLayer::Nodes => self.node_features()?,
            FeatureLayer::Links => self.link_features()?,
            FeatureLayer::Elements => self.element_features()?,
        };
        sink.write_features(&features, path.as_ref())?;
        info!(
            "导出 {layer:?} 图层: {} 个要素 -> {}",
            features.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::node::Node;

    fn mixed_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        for (id, x, y, z) in [
            (1, 0.0, 0.0, -1.0),
            (2, 1.0, 0.0, -2.0),
            (3, 1.0, 1.0, -3.0),
            (4, 0.0, 1.0, -4.0),
            (5, 2.0, 0.0, -5.0),
        ] {
            mesh.add_node(Node::new(id, x, y, z)).unwrap();
        }
        mesh.add_element(Element::quad(1, 1, 2, 3, 4)).unwrap();
        mesh.add_element(Element::triangle(2, 2, 5, 3)).unwrap();
        mesh
    }

    #[test]
    fn test_node_features() {
        let layer = mixed_mesh().node_features().unwrap();
        assert_eq!(layer.len(), 5);
        assert_eq!(layer.fields()[0].name, "nodeid");
        assert_eq!(layer.features()[4].values[3], FieldValue::Double(-5.0));
    }

    #[test]
    fn test_link_features() {
        let layer = mixed_mesh().link_features().unwrap();
        // 四边形 4 条边 + 三角形新增 2 条
        assert_eq!(layer.len(), 6);
        assert_eq!(layer.kind(), GeometryKind::LineString);
    }

    #[test]
    fn test_element_features_placeholders() {
        let layer = mixed_mesh().element_features().unwrap();
        assert_eq!(layer.fields().len(), 10);
        let triangle = &layer.features()[1].values;
        assert_eq!(triangle[0], FieldValue::Integer(2));
        assert_eq!(triangle[4], FieldValue::Integer(-1));
        assert_eq!(triangle[8], FieldValue::Double(-9999.0));
        assert_eq!(triangle[9], FieldValue::Double(-10.0 / 3.0));

        let quad = &layer.features()[0].values;
        assert_eq!(quad[9], FieldValue::Double(-2.5));
    }
}
