// crates/mh_mesh/src/io/adcirc.rs

//! ADCIRC 网格格式（fort.14）读写
//!
//! 文件结构：
//!
//! ```text
//! 标题
//! NE NP
//! id x y z                      (NP 行)
//! id n n1 .. nn                 (NE 行, n = 3 或 4)
//! NOPE                          开边界数
//! NETA                          开边界节点总数
//!   NVDLL                       (每条开边界) 节点数, 随后 NVDLL 行节点编号
//! NBOU                          陆地边界数
//! NVEL                          陆地边界段总数
//!   NVELL IBTYPE                (每条陆地边界) 段数与代码, 随后按代码解析段
//! ```
//!
//! 计数行只取行首整数，其后的注释忽略。写出时计数按当前网格重新计算。

use super::records::{capacity_hint, Fields, RecordReader};
use super::MeshData;
use crate::boundary::{Boundary, BoundaryCode, BoundaryKind, BoundarySegment, PipeGeometry};
use crate::element::{Element, MAX_ELEMENT_NODES};
use crate::error::MeshResult;
use crate::identity::IdentityIndex;
use crate::mesh::Mesh;
use crate::node::Node;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, warn};

const FORMAT: &str = "ADCIRC";

// ============================================================================
// 读取
// ============================================================================

/// ADCIRC 网格加载器
pub struct AdcircLoader;

impl AdcircLoader {
    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> MeshResult<MeshData> {
        let file = File::open(path.as_ref())?;
        Self::load_from_reader(BufReader::new(file))
    }

    /// 从文本流加载
    pub fn load_from_reader<R: BufRead>(reader: R) -> MeshResult<MeshData> {
        let mut records = RecordReader::new(reader, FORMAT);

        // 标题保留首尾空格，只去掉行尾的回车
        let header = records
            .expect_line("标题行")?
            .trim_end_matches(['\r', '\n'])
            .to_string();
        let line = records.expect_line("单元数与节点数")?;
        let mut f = records.fields(&line);
        let n_elements = f.next_usize("单元数")?;
        let n_nodes = f.next_usize("节点数")?;

        let nodes = Self::parse_nodes(&mut records, n_nodes)?;
        let node_identity = IdentityIndex::build("Node", nodes.iter().map(|n| n.id))?;
        let elements = Self::parse_elements(&mut records, n_elements, &node_identity)?;

        let mut data = MeshData {
            header,
            nodes,
            elements,
            ..MeshData::default()
        };

        let Some(line) = records.next_line()? else {
            debug!("文件在单元之后结束，没有边界段");
            return Ok(data);
        };
        let n_open = records.fields(&line).next_usize("开边界数")?;
        let total_open = records.leading_usize("开边界节点总数")?;
        data.open_boundaries = Self::parse_open_boundaries(&mut records, n_open, &node_identity)?;
        check_total("开边界", total_open, &data.open_boundaries);

        let n_land = records.leading_usize("陆地边界数")?;
        let total_land = records.leading_usize("陆地边界节点总数")?;
        data.land_boundaries = Self::parse_land_boundaries(&mut records, n_land, &node_identity)?;
        check_total("陆地边界", total_land, &data.land_boundaries);

        Ok(data)
    }

    fn parse_nodes<R: BufRead>(records: &mut RecordReader<R>, count: usize) -> MeshResult<Vec<Node>> {
        let mut nodes = Vec::with_capacity(capacity_hint(count));
        for _ in 0..count {
            let line = records.expect_line("节点记录")?;
            let mut f = records.fields(&line);
            let id = f.next_usize("节点编号")?;
            let x = f.next_f64("x")?;
            let y = f.next_f64("y")?;
            let z = f.next_f64_or("z", 0.0)?;
            nodes.push(Node::new(id, x, y, z));
        }
        Ok(nodes)
    }

    fn parse_elements<R: BufRead>(
        records: &mut RecordReader<R>,
        count: usize,
        nodes: &IdentityIndex,
    ) -> MeshResult<Vec<Element>> {
        let mut elements = Vec::with_capacity(capacity_hint(count));
        for _ in 0..count {
            let line = records.expect_line("单元记录")?;
            let mut f = records.fields(&line);
            let id = f.next_usize("单元编号")?;
            let n = f.next_usize("单元节点数")?;
            if !(3..=MAX_ELEMENT_NODES).contains(&n) {
                return Err(records.error(format!("单元 {id} 的节点数 {n} 不是 3 或 4")));
            }
            let mut ids = [0usize; MAX_ELEMENT_NODES];
            for slot in ids.iter_mut().take(n) {
                let node = f.next_usize("单元节点")?;
                nodes.position("Node", node)?;
                *slot = node;
            }
            elements.push(Element::new(id, &ids[..n])?);
        }
        Ok(elements)
    }

    fn parse_open_boundaries<R: BufRead>(
        records: &mut RecordReader<R>,
        count: usize,
        nodes: &IdentityIndex,
    ) -> MeshResult<Vec<Boundary>> {
        let mut boundaries = Vec::with_capacity(capacity_hint(count));
        for _ in 0..count {
            let len = records.leading_usize("开边界节点数")?;
            let mut boundary = Boundary::new(BoundaryCode::OPEN);
            for _ in 0..len {
                let node = records.leading_usize("开边界节点")?;
                nodes.position("Node", node)?;
                boundary.push(BoundarySegment::Single { node })?;
            }
            boundaries.push(boundary);
        }
        Ok(boundaries)
    }

    fn parse_land_boundaries<R: BufRead>(
        records: &mut RecordReader<R>,
        count: usize,
        nodes: &IdentityIndex,
    ) -> MeshResult<Vec<Boundary>> {
        let mut boundaries = Vec::with_capacity(capacity_hint(count));
        for _ in 0..count {
            let line = records.expect_line("陆地边界段数与代码")?;
            let mut f = records.fields(&line);
            let len = f.next_usize("陆地边界段数")?;
            let code = BoundaryCode::new(f.next_i32("边界代码")?);
            if code.kind() == BoundaryKind::Open {
                return Err(records.error("陆地边界不能使用开边界代码 -1"));
            }

            let mut boundary = Boundary::new(code);
            for _ in 0..len {
                let line = records.expect_line("陆地边界段")?;
                let mut f = records.fields(&line);
                let segment = parse_segment(&mut f, code.kind())?;
                for id in segment.node_ids() {
                    nodes.position("Node", id)?;
                }
                boundary.push(segment)?;
            }
            boundaries.push(boundary);
        }
        Ok(boundaries)
    }
}

fn parse_segment(f: &mut Fields<'_>, kind: BoundaryKind) -> MeshResult<BoundarySegment> {
    let segment = match kind {
        BoundaryKind::Open | BoundaryKind::Generic => BoundarySegment::Single {
            node: f.next_usize("边界节点")?,
        },
        BoundaryKind::SimpleWeir => BoundarySegment::SimpleWeir {
            node: f.next_usize("堰节点")?,
            crest: f.next_f64("堰顶高程")?,
            supercritical: f.next_f64("超临界系数")?,
        },
        BoundaryKind::OverflowWeir => BoundarySegment::OverflowWeir {
            node: f.next_usize("堰前节点")?,
            paired_node: f.next_usize("堰后节点")?,
            crest: f.next_f64("堰顶高程")?,
            subcritical: f.next_f64("亚临界系数")?,
            supercritical: f.next_f64("超临界系数")?,
        },
        BoundaryKind::CulvertWeir => BoundarySegment::Culvert {
            node: f.next_usize("堰前节点")?,
            paired_node: f.next_usize("堰后节点")?,
            crest: f.next_f64("堰顶高程")?,
            subcritical: f.next_f64("亚临界系数")?,
            supercritical: f.next_f64("超临界系数")?,
            pipe: PipeGeometry {
                height: f.next_f64("管顶高程")?,
                coefficient: f.next_f64("管流系数")?,
                diameter: f.next_f64("管径")?,
            },
        },
    };
    Ok(segment)
}

fn check_total(what: &str, declared: usize, boundaries: &[Boundary]) {
    let actual: usize = boundaries.iter().map(Boundary::len).sum();
    if declared != actual {
        warn!("{what}节点总数声明为 {declared}, 实际 {actual}");
    }
}

// ============================================================================
// 写出
// ============================================================================

/// ADCIRC 网格写出器
pub struct AdcircWriter;

impl AdcircWriter {
    /// 写入文本流
    ///
    /// 坐标精度按网格是否为地理坐标选择，边界属性使用固定精度。
    pub fn write_to<W: Write>(mut writer: W, mesh: &Mesh) -> MeshResult<()> {
        let output = &mesh.config().output;
        let p = output.coordinate_decimals(mesh.is_geographic());
        let a = output.attribute_decimals;
        let w = &mut writer;

        writeln!(w, "{}", mesh.header())?;
        writeln!(w, "{:>11} {:>11}", mesh.num_elements(), mesh.num_nodes())?;

        for n in mesh.nodes() {
            writeln!(
                w,
                "{:>11}   {:>14.p$}   {:>14.p$}  {:>14.p$}",
                n.id,
                n.x,
                n.y,
                n.z,
                p = p
            )?;
        }

        for e in mesh.elements() {
            write!(w, "{:>11} {:>3}", e.id(), e.n_vertices())?;
            for id in e.nodes() {
                write!(w, " {:>11}", id)?;
            }
            writeln!(w)?;
        }

        writeln!(w, "{:>11}", mesh.num_open_boundaries())?;
        writeln!(w, "{:>11}", mesh.total_open_boundary_nodes())?;
        for boundary in mesh.open_boundaries() {
            writeln!(w, "{:>11}", boundary.len())?;
            for segment in boundary.segments() {
                writeln!(w, "{:>11}", segment.node())?;
            }
        }

        writeln!(w, "{:>11}", mesh.num_land_boundaries())?;
        writeln!(w, "{:>11}", mesh.total_land_boundary_nodes())?;
        for boundary in mesh.land_boundaries() {
            writeln!(w, "{:>11} {:>11}", boundary.len(), boundary.code().value())?;
            for segment in boundary.segments() {
                write_segment(w, segment, a)?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

fn write_segment<W: Write>(w: &mut W, segment: &BoundarySegment, a: usize) -> MeshResult<()> {
    match *segment {
        BoundarySegment::Single { node } => writeln!(w, "{node:>11}")?,
        BoundarySegment::SimpleWeir {
            node,
            crest,
            supercritical,
        } => writeln!(w, "{node:>11} {crest:>14.a$} {supercritical:>14.a$}")?,
        BoundarySegment::OverflowWeir {
            node,
            paired_node,
            crest,
            subcritical,
            supercritical,
        } => writeln!(
            w,
            "{node:>11} {paired_node:>11} {crest:>14.a$} {subcritical:>14.a$} {supercritical:>14.a$}"
        )?,
        BoundarySegment::Culvert {
            node,
            paired_node,
            crest,
            subcritical,
            supercritical,
            pipe,
        } => writeln!(
            w,
            "{node:>11} {paired_node:>11} {crest:>14.a$} {subcritical:>14.a$} {supercritical:>14.a$} {:>14.a$} {:>14.a$} {:>14.a$}",
            pipe.height, pipe.coefficient, pipe.diameter
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    const SAMPLE: &str = "\
sample
2 4
1 0.0 0.0 -1.0
2 1.0 0.0 -2.0
3 1.0 1.0 -3.0
4 0.0 1.0 -4.0
1 3 1 2 3
2 3 1 3 4
0 ! open
0
0 ! land
0
";

    #[test]
    fn test_load_sample() {
        let data = AdcircLoader::load_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.header, "sample");
        assert_eq!(data.nodes.len(), 4);
        assert_eq!(data.nodes[3], Node::new(4, 0.0, 1.0, -4.0));
        assert_eq!(data.elements[1].nodes(), &[1, 3, 4]);
        assert!(data.open_boundaries.is_empty());
        assert!(data.land_boundaries.is_empty());
    }

    #[test]
    fn test_missing_z_defaults_to_zero() {
        let text = "h\n0 1\n1 5.0 6.0\n";
        let data = AdcircLoader::load_from_reader(text.as_bytes()).unwrap();
        assert_eq!(data.nodes[0].z, 0.0);
    }

    #[test]
    fn test_bad_vertex_count() {
        let text = "h\n1 3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n1 5 1 2 3 1 2\n";
        let err = AdcircLoader::load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 6, .. }));
    }

    #[test]
    fn test_truncated_node_section() {
        let text = "h\n0 3\n1 0 0 0\n";
        let err = AdcircLoader::load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 4, .. }));
    }

    #[test]
    fn test_unknown_node_in_element() {
        let text = "h\n1 3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n1 3 1 2 9\n";
        let err = AdcircLoader::load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::IdentityNotFound { id: 9, .. }));
    }

    #[test]
    fn test_weir_segment_fields() {
        let text = "\
h
0 2
1 0 0 0
2 1 0 0
0
0
1
1
1 24
1 2 1.5 0.8 0.9 extra
";
        let data = AdcircLoader::load_from_reader(text.as_bytes()).unwrap();
        let boundary = &data.land_boundaries[0];
        assert_eq!(boundary.code().value(), 24);
        assert_eq!(
            boundary.segments()[0],
            BoundarySegment::OverflowWeir {
                node: 1,
                paired_node: 2,
                crest: 1.5,
                subcritical: 0.8,
                supercritical: 0.9,
            }
        );
    }

    #[test]
    fn test_culvert_segment_too_short() {
        let text = "h\n0 2\n1 0 0 0\n2 1 0 0\n0\n0\n1\n1\n1 5\n1 2 1.5 0.8 0.9 1.0 0.6\n";
        let err = AdcircLoader::load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 10, .. }));
    }

    #[test]
    fn test_writer_fixed_width() {
        let mut mesh = Mesh::new();
        mesh.read_adcirc_from(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        AdcircWriter::write_to(&mut out, &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "sample");
        assert_eq!(lines[1], format!("{:>11} {:>11}", 2, 4));
        assert_eq!(
            lines[2],
            format!("{:>11}   {:>14.10}   {:>14.10}  {:>14.10}", 1, 0.0, 0.0, -1.0)
        );
        assert_eq!(lines[6], format!("{:>11} {:>3} {:>11} {:>11} {:>11}", 1, 3, 1, 2, 3));
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_header_keeps_surrounding_spaces() {
        let text = "  Delaware Bay grid  \r\n0 1\n1 0 0 0\n";
        let data = AdcircLoader::load_from_reader(text.as_bytes()).unwrap();
        assert_eq!(data.header, "  Delaware Bay grid  ");
    }

    #[test]
    fn test_huge_declared_count_is_malformed() {
        let text = "h\n0 18446744073709551615\n1 0 0 0\n";
        let err = AdcircLoader::load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 4, .. }));
    }
}
