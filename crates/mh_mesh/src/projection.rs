// crates/mh_mesh/src/projection.rs

//! 网格参考系与坐标转换
//!
//! 网格记录一个当前参考系（EPSG + 是否地理坐标）。`reproject` 把全部节点交给
//! 转换协作者，拿到完整结果后才一次性写回坐标和参考系；转换失败时网格不变。
//!
//! CPP（等距圆柱局部平面）正反算只改坐标，不改参考系记录。
//!
//! # 示例
//!
//! ```
//! use mh_mesh::{Mesh, Node};
//!
//! let mut mesh = Mesh::new();
//! mesh.add_node(Node::new(1, 117.0, 40.0, -3.0)).unwrap();
//! mesh.reproject(32650).unwrap();
//! assert_eq!(mesh.projection().epsg(), 32650);
//! assert!(!mesh.is_geographic());
//! assert!((mesh.nodes()[0].x - 500_000.0).abs() < 1e-6);
//! ```

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use mh_foundation::ensure;
use mh_geo::projection::cpp::{cpp_forward_points, cpp_inverse_points};
use mh_geo::{BuiltinTransformer, CoordinateTransform, Crs, Point2D};
use tracing::info;

impl Mesh {
    /// 声明网格当前的参考系，不转换坐标
    pub fn define_projection(&mut self, epsg: u32, geographic: bool) {
        self.crs = Crs::new(epsg, geographic);
    }

    /// 当前参考系
    #[inline]
    #[must_use]
    pub fn projection(&self) -> Crs {
        self.crs
    }

    /// 是否为地理坐标（决定文本输出精度）
    #[inline]
    #[must_use]
    pub fn is_geographic(&self) -> bool {
        self.crs.is_geographic()
    }

    /// 使用内置投影把网格转换到 `epsg`
    ///
    /// # Errors
    /// 参考系不受支持或任一节点无法转换时返回 [`MeshError::TransformFailure`]
    pub fn reproject(&mut self, epsg: u32) -> MeshResult<()> {
        self.reproject_with(&BuiltinTransformer, epsg)
    }

    /// 使用给定的转换协作者把网格转换到 `epsg`
    ///
    /// 目标与当前参考系相同时不做任何事。
    pub fn reproject_with(
        &mut self,
        transformer: &dyn CoordinateTransform,
        epsg: u32,
    ) -> MeshResult<()> {
        let source = self.crs.epsg();
        if source == epsg {
            info!("网格已在 EPSG:{epsg}，跳过重投影");
            return Ok(());
        }

        let points: Vec<Point2D> = self.nodes.iter().map(|n| n.position()).collect();
        let (projected, geographic) = transformer.transform(source, epsg, &points)?;
        ensure!(
            projected.len() == points.len(),
            MeshError::transform_failure(format!(
                "转换返回 {} 个点, 期望 {}",
                projected.len(),
                points.len()
            ))
        );

        for (node, p) in self.nodes.iter_mut().zip(projected) {
            node.set_position(p);
        }
        self.crs = Crs::new(epsg, geographic);
        self.search.invalidate_all();
        info!(
            "重投影完成: EPSG:{source} -> EPSG:{epsg}, {} 个节点",
            self.nodes.len()
        );
        Ok(())
    }

    /// 以 (`lambda`, `phi`) 为原点把经纬度转为 CPP 平面坐标（米）
    pub fn cpp(&mut self, lambda: f64, phi: f64) {
        let points: Vec<Point2D> = self.nodes.iter().map(|n| n.position()).collect();
        self.apply_positions(cpp_forward_points(lambda, phi, &points));
    }

    /// CPP 平面坐标转回经纬度
    pub fn inverse_cpp(&mut self, lambda: f64, phi: f64) {
        let points: Vec<Point2D> = self.nodes.iter().map(|n| n.position()).collect();
        self.apply_positions(cpp_inverse_points(lambda, phi, &points));
    }

    fn apply_positions(&mut self, positions: Vec<Point2D>) {
        for (node, p) in self.nodes.iter_mut().zip(positions) {
            node.set_position(p);
        }
        self.search.invalidate_all();
    }
}
