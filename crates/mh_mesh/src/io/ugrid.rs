// crates/mh_mesh/src/io/ugrid.rs

//! DFlow-FM 网络文件（UGRID 约定的 netCDF）读写
//!
//! 读取所需的维度和变量：
//!
//! | 名称 | 说明 |
//! |------|------|
//! | `nNetNode` / `nNetElem` / `nNetElemMaxNode` | 节点数、单元数、单元最大顶点数（3 或 4） |
//! | `NetNode_x` / `NetNode_y` / `NetNode_z` | 节点坐标 |
//! | `NetElemNode` | 单元-节点表（从 1 开始），空位为填充值 |
//!
//! 写出时额外生成边表 `NetLink`、`Mesh2D` 拓扑变量与 `crs` 变量。
//! 读写都经过 [`TableSource`] / [`TableSink`]，测试可使用内存表。

use super::MeshData;
use crate::element::{Element, MAX_ELEMENT_NODES};
use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use crate::node::Node;
use mh_geo::Crs;
use mh_io::drivers::{AttrValue, TableSink, TableSource, VarType, NC_FILL_INT, NC_FILL_INT64};
use tracing::{debug, info};

const FORMAT: &str = "UGRID";

/// 读取后使用的网格标题
pub const DFLOW_HEADER: &str = "DFlowFM-NetNC";

const DIM_NODE: &str = "nNetNode";
const DIM_LINK: &str = "nNetLink";
const DIM_LINK_PTS: &str = "nNetLinkPts";
const DIM_ELEM: &str = "nNetElem";
const DIM_ELEM_MAX: &str = "nNetElemMaxNode";

const VAR_MESH: &str = "Mesh2D";
const VAR_X: &str = "NetNode_x";
const VAR_Y: &str = "NetNode_y";
const VAR_Z: &str = "NetNode_z";
const VAR_LINK: &str = "NetLink";
const VAR_LINK_TYPE: &str = "NetLinkType";
const VAR_ELEM: &str = "NetElemNode";
const VAR_CRS: &str = "crs";

/// 二维网络边类型
const LINK_TYPE_2D: i32 = 2;

// ============================================================================
// 读取
// ============================================================================

/// UGRID 网格加载器
pub struct UgridLoader;

impl UgridLoader {
    /// 从二进制表加载
    ///
    /// # Errors
    /// - `nNetElemMaxNode` 不是 3 或 4: [`MeshError::UnsupportedFormat`]（在读取任何数组之前）
    /// - 某行非填充槽位数不是 3 或 4，或节点引用越界: [`MeshError::MalformedRecord`]
    pub fn load_from_table<T: TableSource + ?Sized>(table: &T) -> MeshResult<MeshData> {
        let n_nodes = table.dimension_len(DIM_NODE)?;
        let n_elements = table.dimension_len(DIM_ELEM)?;
        let max_nodes = table.dimension_len(DIM_ELEM_MAX)?;
        if !(3..=MAX_ELEMENT_NODES).contains(&max_nodes) {
            return Err(MeshError::unsupported_format(format!(
                "{DIM_ELEM_MAX} = {max_nodes}, 只支持 3 或 4"
            )));
        }

        let x = table.get_f64(VAR_X)?;
        let y = table.get_f64(VAR_Y)?;
        let z = table.get_f64(VAR_Z)?;
        for (name, len) in [(VAR_X, x.len()), (VAR_Y, y.len()), (VAR_Z, z.len())] {
            if len != n_nodes {
                return Err(MeshError::malformed(
                    FORMAT,
                    0,
                    format!("{name} 长度 {len} 与 {DIM_NODE} = {n_nodes} 不符"),
                ));
            }
        }
        let nodes: Vec<Node> = (0..n_nodes)
            .map(|i| Node::new(i + 1, x[i], y[i], z[i]))
            .collect();

        // 声明的填充值和两种默认填充值都视为空位
        let declared = table
            .attribute(Some(VAR_ELEM), "_FillValue")?
            .and_then(|v| v.as_i32())
            .map(i64::from);
        let is_fill =
            |v: i64| Some(v) == declared || v == i64::from(NC_FILL_INT) || v == NC_FILL_INT64;
        let table_nodes = table.get_i64(VAR_ELEM)?;
        if table_nodes.len() != n_elements * max_nodes {
            return Err(MeshError::malformed(
                FORMAT,
                0,
                format!(
                    "{VAR_ELEM} 长度 {} 与 {n_elements} x {max_nodes} 不符",
                    table_nodes.len()
                ),
            ));
        }

        let mut elements = Vec::with_capacity(n_elements);
        for (row, slots) in table_nodes.chunks(max_nodes).enumerate() {
            let ids: Vec<usize> = slots
                .iter()
                .filter(|&&v| !is_fill(v))
                .map(|&v| {
                    usize::try_from(v)
                        .ok()
                        .filter(|id| (1..=n_nodes).contains(id))
                        .ok_or_else(|| {
                            MeshError::malformed(
                                FORMAT,
                                0,
                                format!("单元 {} 引用了不存在的节点 {v}", row + 1),
                            )
                        })
                })
                .collect::<MeshResult<_>>()?;
            if !(3..=MAX_ELEMENT_NODES).contains(&ids.len()) {
                return Err(MeshError::malformed(
                    FORMAT,
                    0,
                    format!("单元 {} 有 {} 个有效节点", row + 1, ids.len()),
                ));
            }

            let mut element = Element::new(row + 1, &ids)?;
            let vertices: Vec<_> = ids.iter().map(|&id| nodes[id - 1].position()).collect();
            element.sort_about_center(&vertices)?;
            elements.push(element);
        }

        let crs = read_crs(table);
        debug!("UGRID 读取: 声明填充值 {declared:?}, 参考系 {crs:?}");

        Ok(MeshData {
            header: DFLOW_HEADER.to_string(),
            nodes,
            elements,
            crs,
            ..MeshData::default()
        })
    }
}

/// 从 `crs` 变量和全局 `Spherical` 属性恢复参考系，缺失时返回 `None`
fn read_crs<T: TableSource + ?Sized>(table: &T) -> Option<Crs> {
    let epsg = table
        .attribute(Some(VAR_CRS), "epsg")
        .ok()
        .flatten()
        .and_then(|v| v.as_i32())
        .and_then(|v| u32::try_from(v).ok())
        .filter(|&v| v > 0)?;
    let geographic = table
        .attribute(None, "Spherical")
        .ok()
        .flatten()
        .and_then(|v| v.as_i32())
        .map_or(epsg == mh_geo::crs::EPSG_WGS84, |v| v != 0);
    Some(Crs::new(epsg, geographic))
}

// ============================================================================
// 写出
// ============================================================================

/// UGRID 网格写出器
pub struct UgridWriter;

impl UgridWriter {
    /// 写入二进制表
    ///
    /// 单元和边都以从 1 开始的节点位置存储，变量带 `start_index = 1`。
    pub fn write_to<T: TableSink + ?Sized>(table: &mut T, mesh: &Mesh) -> MeshResult<()> {
        let n_nodes = mesh.num_nodes();
        let n_elements = mesh.num_elements();
        let max_nodes = mesh.max_nodes_per_element().max(3);

        let links = mesh.link_table()?;
        let mut link_nodes = Vec::with_capacity(links.len() * 2);
        for link in &links {
            link_nodes.push(one_based(mesh, link.node1)?);
            link_nodes.push(one_based(mesh, link.node2)?);
        }

        let mut elem_nodes = Vec::with_capacity(n_elements * max_nodes);
        for element in mesh.elements() {
            for &id in element.nodes() {
                elem_nodes.push(one_based(mesh, id)?);
            }
            for _ in element.n_vertices()..max_nodes {
                elem_nodes.push(NC_FILL_INT);
            }
        }

        // 维度
        table.add_dimension(DIM_NODE, n_nodes)?;
        table.add_dimension(DIM_LINK, links.len())?;
        table.add_dimension(DIM_LINK_PTS, 2)?;
        table.add_dimension(DIM_ELEM, n_elements)?;
        table.add_dimension(DIM_ELEM_MAX, max_nodes)?;

        // 变量定义
        define_topology(table)?;
        define_coordinates(table, mesh.is_geographic())?;

        table.add_variable(VAR_LINK, VarType::Int, &[DIM_LINK, DIM_LINK_PTS])?;
        table.put_attribute(Some(VAR_LINK), "long_name", "link between two netnodes".into())?;
        table.put_attribute(Some(VAR_LINK), "start_index", 1i32.into())?;

        table.add_variable(VAR_LINK_TYPE, VarType::Int, &[DIM_LINK])?;
        table.put_attribute(Some(VAR_LINK_TYPE), "long_name", "type of netlink".into())?;

        table.add_variable(VAR_ELEM, VarType::Int, &[DIM_ELEM, DIM_ELEM_MAX])?;
        table.put_attribute(
            Some(VAR_ELEM),
            "long_name",
            "Mapping from net cell to net nodes (counterclockwise)".into(),
        )?;
        table.put_attribute(Some(VAR_ELEM), "start_index", 1i32.into())?;
        table.put_attribute(Some(VAR_ELEM), "_FillValue", NC_FILL_INT.into())?;

        let epsg = i32::try_from(mesh.projection().epsg()).map_err(|_| {
            MeshError::transform_failure(format!("EPSG {} 超出整数范围", mesh.projection().epsg()))
        })?;
        table.add_variable(VAR_CRS, VarType::Int, &[])?;
        table.put_attribute(Some(VAR_CRS), "epsg", epsg.into())?;
        table.put_attribute(Some(VAR_CRS), "EPSG_code", format!("EPSG:{epsg}").into())?;

        table.put_attribute(None, "Conventions", "UGRID-0.9".into())?;
        table.put_attribute(None, "Spherical", i32::from(mesh.is_geographic()).into())?;

        // 数据
        table.put_i32(VAR_MESH, &[0])?;
        table.put_f64(VAR_X, &mesh.x())?;
        table.put_f64(VAR_Y, &mesh.y())?;
        table.put_f64(VAR_Z, &mesh.z())?;
        table.put_i32(VAR_LINK, &link_nodes)?;
        table.put_i32(VAR_LINK_TYPE, &vec![LINK_TYPE_2D; links.len()])?;
        table.put_i32(VAR_ELEM, &elem_nodes)?;
        table.put_i32(VAR_CRS, &[epsg])?;

        info!(
            "UGRID 写出: {n_nodes} 节点, {} 边, {n_elements} 单元",
            links.len()
        );
        Ok(())
    }
}

fn one_based(mesh: &Mesh, id: usize) -> MeshResult<i32> {
    let pos = mesh.node_index_of(id)?.get() + 1;
    i32::try_from(pos)
        .map_err(|_| MeshError::malformed(FORMAT, 0, format!("节点位置 {pos} 超出整数范围")))
}

fn define_topology<T: TableSink + ?Sized>(table: &mut T) -> MeshResult<()> {
    let attrs: [(&str, AttrValue); 9] = [
        ("cf_role", "mesh_topology".into()),
        ("long_name", "Topology data of 2D network".into()),
        ("topology_dimension", 2i32.into()),
        ("node_coordinates", format!("{VAR_X} {VAR_Y}").into()),
        ("node_dimension", DIM_NODE.into()),
        ("face_node_connectivity", VAR_ELEM.into()),
        ("face_dimension", DIM_ELEM.into()),
        ("edge_node_connectivity", VAR_LINK.into()),
        ("edge_dimension", DIM_LINK.into()),
    ];
    table.add_variable(VAR_MESH, VarType::Int, &[])?;
    for (name, value) in attrs {
        table.put_attribute(Some(VAR_MESH), name, value)?;
    }
    Ok(())
}

fn define_coordinates<T: TableSink + ?Sized>(table: &mut T, geographic: bool) -> MeshResult<()> {
    let (x_std, y_std, x_long, y_long, x_units, y_units) = if geographic {
        (
            "longitude",
            "latitude",
            "longitude of vertex",
            "latitude of vertex",
            "degrees_east",
            "degrees_north",
        )
    } else {
        (
            "projection_x_coordinate",
            "projection_y_coordinate",
            "x-coordinate in Cartesian system",
            "y-coordinate in Cartesian system",
            "metre",
            "metre",
        )
    };

    for (var, std_name, long_name, units) in [
        (VAR_X, x_std, x_long, x_units),
        (VAR_Y, y_std, y_long, y_units),
    ] {
        table.add_variable(var, VarType::Double, &[DIM_NODE])?;
        table.put_attribute(Some(var), "standard_name", std_name.into())?;
        table.put_attribute(Some(var), "long_name", long_name.into())?;
        table.put_attribute(Some(var), "units", units.into())?;
    }

    table.add_variable(VAR_Z, VarType::Double, &[DIM_NODE])?;
    table.put_attribute(Some(VAR_Z), "axis", "Z".into())?;
    table.put_attribute(Some(VAR_Z), "long_name", "z-coordinate of vertex".into())?;
    table.put_attribute(Some(VAR_Z), "units", "metre".into())?;
    table.put_attribute(Some(VAR_Z), "standard_name", "projection_z_coordinate".into())?;
    table.put_attribute(Some(VAR_Z), "mesh", VAR_MESH.into())?;
    table.put_attribute(Some(VAR_Z), "location", "node".into())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mh_io::MemoryTable;

    fn dims_only(max_nodes: usize) -> MemoryTable {
        let mut table = MemoryTable::new();
        table.add_dimension(DIM_NODE, 4).unwrap();
        table.add_dimension(DIM_ELEM, 1).unwrap();
        table.add_dimension(DIM_ELEM_MAX, max_nodes).unwrap();
        table
    }

    #[test]
    fn test_max_nodes_checked_before_arrays() {
        for bad in [2, 5] {
            let err = UgridLoader::load_from_table(&dims_only(bad)).unwrap_err();
            assert!(matches!(err, MeshError::UnsupportedFormat { .. }));
        }
        // 合法维度继续读取数组，缺变量时报表错误
        let err = UgridLoader::load_from_table(&dims_only(4)).unwrap_err();
        assert!(matches!(err, MeshError::TransformFailure { .. }));
    }

    fn single_row(row: &[i32], fill: Option<i32>) -> MemoryTable {
        let mut table = dims_only(4);
        for var in [VAR_X, VAR_Y, VAR_Z] {
            table.add_variable(var, VarType::Double, &[DIM_NODE]).unwrap();
        }
        table.put_f64(VAR_X, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        table.put_f64(VAR_Y, &[0.0, 0.0, 1.0, 1.0]).unwrap();
        table.put_f64(VAR_Z, &[-1.0; 4]).unwrap();
        table
            .add_variable(VAR_ELEM, VarType::Int, &[DIM_ELEM, DIM_ELEM_MAX])
            .unwrap();
        if let Some(fill) = fill {
            table
                .put_attribute(Some(VAR_ELEM), "_FillValue", fill.into())
                .unwrap();
        }
        table.put_i32(VAR_ELEM, row).unwrap();
        table
    }

    #[test]
    fn test_default_fill_value() {
        let table = single_row(&[1, 2, 3, NC_FILL_INT], None);
        let data = UgridLoader::load_from_table(&table).unwrap();
        assert_eq!(data.header, DFLOW_HEADER);
        assert_eq!(data.elements[0].n_vertices(), 3);
    }

    #[test]
    fn test_declared_fill_value_and_sorting() {
        // 顶点顺序打乱的四边形
        let table = single_row(&[1, 3, 2, 4], Some(-999));
        let data = UgridLoader::load_from_table(&table).unwrap();
        assert_eq!(data.elements[0].nodes(), &[1, 2, 3, 4]);

        let table = single_row(&[4, 2, 1, -999], Some(-999));
        let data = UgridLoader::load_from_table(&table).unwrap();
        assert_eq!(data.elements[0].n_vertices(), 3);
    }

    #[test]
    fn test_default_fills_accepted_alongside_declared() {
        let table = single_row(&[2, 3, 4, NC_FILL_INT], Some(-999));
        let data = UgridLoader::load_from_table(&table).unwrap();
        assert_eq!(data.elements[0].n_vertices(), 3);

        let table = single_row(&[1, -999, 2, 3], Some(-999));
        let data = UgridLoader::load_from_table(&table).unwrap();
        assert_eq!(data.elements[0].n_vertices(), 3);
    }

    /// 以 64 位整型存储单元表的表
    struct WideTable {
        inner: MemoryTable,
        elem_nodes: Vec<i64>,
    }

    impl TableSource for WideTable {
        fn dimension_len(&self, name: &str) -> mh_io::drivers::TableResult<usize> {
            self.inner.dimension_len(name)
        }

        fn get_f64(&self, variable: &str) -> mh_io::drivers::TableResult<Vec<f64>> {
            self.inner.get_f64(variable)
        }

        fn get_i32(&self, variable: &str) -> mh_io::drivers::TableResult<Vec<i32>> {
            self.inner.get_i32(variable)
        }

        fn get_i64(&self, variable: &str) -> mh_io::drivers::TableResult<Vec<i64>> {
            if variable == VAR_ELEM {
                Ok(self.elem_nodes.clone())
            } else {
                self.inner.get_i64(variable)
            }
        }

        fn attribute(
            &self,
            variable: Option<&str>,
            name: &str,
        ) -> mh_io::drivers::TableResult<Option<AttrValue>> {
            self.inner.attribute(variable, name)
        }
    }

    #[test]
    fn test_int64_default_fill() {
        let table = WideTable {
            inner: single_row(&[0; 4], None),
            elem_nodes: vec![3, 1, 2, NC_FILL_INT64],
        };
        let data = UgridLoader::load_from_table(&table).unwrap();
        assert_eq!(data.elements[0].n_vertices(), 3);
        assert_eq!(data.elements[0].nodes(), &[1, 2, 3]);
    }

    #[test]
    fn test_bad_row_counts() {
        let table = single_row(&[1, 2, NC_FILL_INT, NC_FILL_INT], None);
        let err = UgridLoader::load_from_table(&table).unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { .. }));

        let table = single_row(&[1, 2, 3, 9], None);
        let err = UgridLoader::load_from_table(&table).unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { .. }));
    }
}
