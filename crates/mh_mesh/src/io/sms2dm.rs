// crates/mh_mesh/src/io/sms2dm.rs

//! SMS 2dm 网格格式读写
//!
//! 只识别以下卡片，其余卡片（`NS`、`MAT` 等）跳过：
//!
//! ```text
//! MESH2D
//! MESHNAME "name"
//! E3T id n1 n2 n3 mat
//! E4Q id n1 n2 n3 n4 mat
//! ND  id x y z
//! ```
//!
//! 单元卡可以出现在节点卡之前，因此先收集全部卡片再解析引用。
//! 2dm 不携带边界信息，读取后边界为空。

use super::records::RecordReader;
use super::MeshData;
use crate::element::Element;
use crate::error::MeshResult;
use crate::identity::IdentityIndex;
use crate::mesh::Mesh;
use crate::node::Node;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::warn;

const FORMAT: &str = "2dm";

/// 2dm 网格加载器
pub struct Sms2dmLoader;

impl Sms2dmLoader {
    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P, placeholder_name: &str) -> MeshResult<MeshData> {
        let file = File::open(path.as_ref())?;
        Self::load_from_reader(BufReader::new(file), placeholder_name)
    }

    /// 从文本流加载
    ///
    /// 没有 `MESHNAME` 卡时标题取 `placeholder_name`。
    pub fn load_from_reader<R: BufRead>(reader: R, placeholder_name: &str) -> MeshResult<MeshData> {
        let mut records = RecordReader::new(reader, FORMAT);
        let mut name = None;
        let mut nodes = Vec::new();
        let mut elements = Vec::new();

        while let Some(line) = records.next_line()? {
            let mut f = records.fields(&line);
            let Ok(card) = f.next_str("卡片") else {
                continue;
            };
            match card {
                "MESHNAME" => name = Some(sanitize_name(&line)),
                "ND" => {
                    let id = f.next_usize("节点编号")?;
                    let x = f.next_f64("x")?;
                    let y = f.next_f64("y")?;
                    let z = f.next_f64("z")?;
                    nodes.push(Node::new(id, x, y, z));
                }
                "E3T" | "E4Q" => {
                    let n = if card == "E3T" { 3 } else { 4 };
                    let id = f.next_usize("单元编号")?;
                    let mut ids = [0usize; 4];
                    for slot in ids.iter_mut().take(n) {
                        *slot = f.next_usize("单元节点")?;
                    }
                    elements.push(Element::new(id, &ids[..n])?);
                }
                _ => {}
            }
        }

        let header = match name {
            Some(name) if !name.is_empty() => name,
            _ => {
                warn!("2dm 文件没有 MESHNAME，使用默认名称 '{placeholder_name}'");
                placeholder_name.to_string()
            }
        };

        let node_identity = IdentityIndex::build("Node", nodes.iter().map(|n| n.id))?;
        for element in &elements {
            for &id in element.nodes() {
                node_identity.position("Node", id)?;
            }
        }

        Ok(MeshData {
            header,
            nodes,
            elements,
            ..MeshData::default()
        })
    }
}

/// 去掉卡片名和引号，空白压缩为单个空格
fn sanitize_name(line: &str) -> String {
    let rest = line.trim_start().strip_prefix("MESHNAME").unwrap_or(line);
    rest.replace('"', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 2dm 网格写出器
pub struct Sms2dmWriter;

impl Sms2dmWriter {
    /// 写入文本流：先单元卡（材料号固定为 1），后节点卡
    pub fn write_to<W: Write>(mut writer: W, mesh: &Mesh) -> MeshResult<()> {
        let p = mesh.config().output.coordinate_decimals(mesh.is_geographic());
        let w = &mut writer;

        writeln!(w, "MESH2D")?;
        writeln!(w, "MESHNAME \"{}\"", mesh.header())?;
        for e in mesh.elements() {
            let card = if e.n_vertices() == 3 { "E3T" } else { "E4Q" };
            write!(w, "{card} {:>11}", e.id())?;
            for id in e.nodes() {
                write!(w, " {:>11}", id)?;
            }
            writeln!(w, " 1")?;
        }
        for n in mesh.nodes() {
            writeln!(
                w,
                "ND {:>11} {:>14.p$} {:>14.p$} {:>14.p$}",
                n.id,
                n.x,
                n.y,
                n.z,
                p = p
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    #[test]
    fn test_elements_before_nodes() {
        let text = "\
MESH2D
MESHNAME \"Delaware   Bay\"
E3T 1 1 2 3 1
E4Q 2 2 4 5 3 1
NS 1 2 -3
ND 1 0.0 0.0 -1.0
ND 2 1.0 0.0 -1.0
ND 3 0.0 1.0 -1.0
ND 4 2.0 0.0 -1.0
ND 5 2.0 1.0 -1.0
";
        let data = Sms2dmLoader::load_from_reader(text.as_bytes(), "Mesh").unwrap();
        assert_eq!(data.header, "Delaware Bay");
        assert_eq!(data.nodes.len(), 5);
        assert_eq!(data.elements[1].nodes(), &[2, 4, 5, 3]);
        assert!(data.land_boundaries.is_empty());
    }

    #[test]
    fn test_placeholder_name() {
        let text = "MESH2D\nND 1 0 0 0\n";
        let data = Sms2dmLoader::load_from_reader(text.as_bytes(), "Mesh").unwrap();
        assert_eq!(data.header, "Mesh");
    }

    #[test]
    fn test_unknown_node_reference() {
        let text = "MESH2D\nE3T 1 1 2 3 1\nND 1 0 0 0\nND 2 1 0 0\n";
        let err = Sms2dmLoader::load_from_reader(text.as_bytes(), "Mesh").unwrap_err();
        assert!(matches!(err, MeshError::IdentityNotFound { id: 3, .. }));
    }

    #[test]
    fn test_malformed_node_card() {
        let text = "MESH2D\nND 1 0 zero 0\n";
        let err = Sms2dmLoader::load_from_reader(text.as_bytes(), "Mesh").unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_writer_layout() {
        let mut mesh = Mesh::new();
        mesh.read_2dm_from("MESH2D\nE3T 7 1 2 3 1\nND 1 0 0 0\nND 2 1 0 0\nND 3 0 1 0\n".as_bytes())
            .unwrap();
        mesh.set_header("bay");
        let mut out = Vec::new();
        Sms2dmWriter::write_to(&mut out, &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "MESH2D");
        assert_eq!(lines[1], "MESHNAME \"bay\"");
        assert!(lines[2].starts_with("E3T"));
        assert!(lines[2].ends_with(" 1"));
        assert!(lines[3].starts_with("ND"));
        assert_eq!(lines.len(), 6);
    }
}
