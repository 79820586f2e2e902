// crates/mh_mesh/tests/formats.rs

//! 格式读写集成测试
//!
//! 覆盖 ADCIRC / 2dm / UGRID 三种格式的往返、扩展名分派以及读取失败时的网格状态。

use mh_io::drivers::{MemoryTable, TableSink, TableSource, VarType};
use mh_mesh::{
    Boundary, BoundaryCode, BoundarySegment, Element, Mesh, MeshError, MeshFormat, Node,
    PipeGeometry,
};

const SAMPLE: &str = "\
sample
2 4
1 0.0 0.0 -1.0
2 1.0 0.0 -2.0
3 1.0 1.0 -3.0
4 0.0 1.0 -4.0
1 3 1 2 3
2 3 1 3 4
0
0
0
0
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// 带开边界、普通陆地边界、堰和涵洞的 3x2 网格
fn boundary_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.set_header("weirs and culverts");
    let mut id = 1;
    for j in 0..2 {
        for i in 0..3 {
            mesh.add_node(Node::new(id, f64::from(i), f64::from(j), -(id as f64)))
                .unwrap();
            id += 1;
        }
    }
    mesh.add_element(Element::triangle(1, 1, 2, 5)).unwrap();
    mesh.add_element(Element::triangle(2, 1, 5, 4)).unwrap();
    mesh.add_element(Element::quad(3, 2, 3, 6, 5)).unwrap();

    mesh.add_open_boundary(Boundary::open(&[1, 4])).unwrap();

    let mut land = Boundary::new(BoundaryCode::new(0));
    land.push(BoundarySegment::Single { node: 1 }).unwrap();
    land.push(BoundarySegment::Single { node: 2 }).unwrap();
    land.push(BoundarySegment::Single { node: 3 }).unwrap();
    mesh.add_land_boundary(land).unwrap();

    let weir = Boundary::with_segments(
        BoundaryCode::new(24),
        vec![BoundarySegment::OverflowWeir {
            node: 3,
            paired_node: 6,
            crest: 1.25,
            subcritical: 0.8,
            supercritical: 0.95,
        }],
    )
    .unwrap();
    mesh.add_land_boundary(weir).unwrap();

    let culvert = Boundary::with_segments(
        BoundaryCode::new(5),
        vec![BoundarySegment::Culvert {
            node: 4,
            paired_node: 5,
            crest: 2.0,
            subcritical: 0.7,
            supercritical: 0.9,
            pipe: PipeGeometry {
                height: -1.5,
                coefficient: 0.6,
                diameter: 0.75,
            },
        }],
    )
    .unwrap();
    mesh.add_land_boundary(culvert).unwrap();
    mesh
}

// ============================================================
// ADCIRC
// ============================================================

#[test]
fn test_adcirc_sample_counts() {
    let mut mesh = Mesh::new();
    mesh.read_adcirc_from(SAMPLE.as_bytes()).unwrap();

    assert_eq!(mesh.header(), "sample");
    assert_eq!(mesh.num_nodes(), 4);
    assert_eq!(mesh.num_elements(), 2);
    assert_eq!(mesh.max_nodes_per_element(), 3);
    assert_eq!(mesh.z(), vec![-1.0, -2.0, -3.0, -4.0]);
    assert!(mesh.node_ordering_is_logical());
    assert!(mesh.element_ordering_is_logical());
    assert_eq!(mesh.connectivity(), vec![vec![1, 2, 3], vec![1, 3, 4]]);
}

#[test]
fn test_adcirc_round_trip_with_structures() {
    let mesh = boundary_mesh();
    let mut out = Vec::new();
    mesh.write_adcirc_to(&mut out).unwrap();

    let mut back = Mesh::new();
    back.read_adcirc_from(out.as_slice()).unwrap();

    assert_eq!(back.header(), "weirs and culverts");
    assert_eq!(back.nodes(), mesh.nodes());
    assert_eq!(back.elements(), mesh.elements());
    assert_eq!(back.open_boundaries(), mesh.open_boundaries());
    assert_eq!(back.land_boundaries(), mesh.land_boundaries());
    assert_eq!(back.total_open_boundary_nodes(), 2);
    assert_eq!(back.total_land_boundary_nodes(), 5);
    assert_eq!(back.max_nodes_per_element(), 4);
}

#[test]
fn test_adcirc_non_logical_ids() {
    let text = "\
renumbered
1 3
10 0.0 0.0 -1.0
20 1.0 0.0 -2.0
30 0.0 1.0 -3.0
7 3 10 20 30
";
    let mut mesh = Mesh::new();
    mesh.read_adcirc_from(text.as_bytes()).unwrap();

    assert!(!mesh.node_ordering_is_logical());
    assert!(!mesh.element_ordering_is_logical());
    assert_eq!(mesh.node_index_of(20).unwrap().get(), 1);
    assert_eq!(mesh.element_by_id(7).unwrap().nodes(), &[10, 20, 30]);
    assert!(matches!(
        mesh.node_by_id(2),
        Err(MeshError::IdentityNotFound { id: 2, .. })
    ));
    assert_eq!(mesh.num_open_boundaries(), 0);
}

#[test]
fn test_failed_read_leaves_mesh_empty() {
    init_tracing();
    let mut mesh = Mesh::new();
    mesh.read_adcirc_from(SAMPLE.as_bytes()).unwrap();
    assert_eq!(mesh.num_nodes(), 4);

    let broken = "broken\n1 3\n1 0 0 0\n2 1 0 0\n";
    assert!(mesh.read_adcirc_from(broken.as_bytes()).is_err());
    assert_eq!(mesh.num_nodes(), 0);
    assert_eq!(mesh.num_elements(), 0);
    assert_eq!(mesh.header(), "");
}

#[test]
fn test_huge_declared_node_count_fails_cleanly() {
    let mut mesh = Mesh::new();
    mesh.read_adcirc_from(SAMPLE.as_bytes()).unwrap();

    let result = mesh.read_adcirc_from("h\n0 18446744073709551615\n".as_bytes());
    assert!(matches!(result, Err(MeshError::MalformedRecord { .. })));
    assert_eq!(mesh.num_nodes(), 0);
    assert_eq!(mesh.num_elements(), 0);
}

#[test]
fn test_adcirc_header_round_trip_keeps_spaces() {
    let mut mesh = boundary_mesh();
    mesh.set_header("  padded title ");
    let mut out = Vec::new();
    mesh.write_adcirc_to(&mut out).unwrap();

    let mut back = Mesh::new();
    back.read_adcirc_from(out.as_slice()).unwrap();
    assert_eq!(back.header(), "  padded title ");
}

// ============================================================
// 2dm
// ============================================================

#[test]
fn test_2dm_round_trip_drops_boundaries() {
    let mesh = boundary_mesh();
    let mut out = Vec::new();
    mesh.write_2dm_to(&mut out).unwrap();

    let mut back = Mesh::new();
    back.read_2dm_from(out.as_slice()).unwrap();
    assert_eq!(back.header(), "weirs and culverts");
    assert_eq!(back.nodes(), mesh.nodes());
    assert_eq!(back.elements(), mesh.elements());
    assert_eq!(back.num_open_boundaries(), 0);
    assert_eq!(back.num_land_boundaries(), 0);
}

#[test]
fn test_2dm_placeholder_name_from_config() {
    init_tracing();
    let mut config = mh_config::MeshEngineConfig::default();
    config.sms2dm.placeholder_name = "unnamed".to_string();
    let mut mesh = Mesh::with_config(config).unwrap();
    mesh.read_2dm_from("MESH2D\nND 1 0 0 0\n".as_bytes()).unwrap();
    assert_eq!(mesh.header(), "unnamed");
}

// ============================================================
// UGRID
// ============================================================

#[test]
fn test_ugrid_round_trip_memory_table() {
    let mut mesh = boundary_mesh();
    mesh.define_projection(32618, false);

    let mut table = MemoryTable::new();
    mesh.write_ugrid_to(&mut table).unwrap();
    assert_eq!(table.dimension_len("nNetLink").unwrap(), mesh.link_table().unwrap().len());

    let mut back = Mesh::new();
    back.read_ugrid_from(&table).unwrap();
    assert_eq!(back.num_nodes(), 6);
    assert_eq!(back.num_elements(), 3);
    assert_eq!(back.xyz(), mesh.xyz());
    assert_eq!(back.projection().epsg(), 32618);
    assert!(!back.is_geographic());
    assert_eq!(back.num_land_boundaries(), 0);
    assert_eq!(back.max_nodes_per_element(), 4);
    // 原单元本身已是逆时针，排序后不变
    assert_eq!(back.elements(), mesh.elements());
}

#[test]
fn test_ugrid_rejects_five_node_elements() {
    let mut table = MemoryTable::new();
    table.add_dimension("nNetNode", 1).unwrap();
    table.add_dimension("nNetElem", 1).unwrap();
    table.add_dimension("nNetElemMaxNode", 5).unwrap();
    table
        .add_variable("NetElemNode", VarType::Int, &["nNetElem", "nNetElemMaxNode"])
        .unwrap();

    let mut mesh = Mesh::new();
    let err = mesh.read_ugrid_from(&table).unwrap_err();
    assert!(matches!(err, MeshError::UnsupportedFormat { .. }));
    assert_eq!(mesh.num_nodes(), 0);
}

// ============================================================
// 文件与扩展名分派
// ============================================================

#[test]
fn test_format_from_extension() {
    assert_eq!(MeshFormat::from_path("bay.14").unwrap(), MeshFormat::Adcirc);
    assert_eq!(MeshFormat::from_path("bay.grd").unwrap(), MeshFormat::Adcirc);
    assert_eq!(MeshFormat::from_path("bay.2dm").unwrap(), MeshFormat::Sms2dm);
    assert_eq!(MeshFormat::from_path("bay_net.nc").unwrap(), MeshFormat::Ugrid);
    assert!(matches!(
        MeshFormat::from_path("bay.msh"),
        Err(MeshError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_read_without_filename() {
    let mut mesh = Mesh::new();
    assert!(matches!(mesh.read(None), Err(MeshError::NoFilename)));
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut mesh = Mesh::with_path(dir.path().join("absent.14"));
    assert!(matches!(mesh.read(None), Err(MeshError::FileNotFound { .. })));
}

#[test]
fn test_unknown_extension_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bay.msh");
    std::fs::write(&path, SAMPLE).unwrap();
    let mut mesh = Mesh::with_path(&path);
    assert!(matches!(
        mesh.read(None),
        Err(MeshError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_disk_round_trip_adcirc_and_2dm() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = boundary_mesh();

    let fort14 = dir.path().join("fort.14");
    mesh.write(&fort14, None).unwrap();
    let mut back = Mesh::with_path(&fort14);
    back.read(None).unwrap();
    assert_eq!(back.land_boundaries(), mesh.land_boundaries());
    assert_eq!(back.filename(), Some(fort14.as_path()));

    let sms = dir.path().join("bay.2dm");
    mesh.write(&sms, None).unwrap();
    let mut back = Mesh::with_path(&sms);
    back.read(None).unwrap();
    assert_eq!(back.elements(), mesh.elements());

    // 显式格式优先于扩展名
    let odd = dir.path().join("mesh.txt");
    mesh.write(&odd, Some(MeshFormat::Adcirc)).unwrap();
    let mut back = Mesh::with_path(&odd);
    back.read(Some(MeshFormat::Adcirc)).unwrap();
    assert_eq!(back.num_nodes(), 6);
}
