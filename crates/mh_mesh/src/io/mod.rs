// crates/mh_mesh/src/io/mod.rs

//! 网格 IO 模块
//!
//! 三种交换格式的读写：
//!
//! - ADCIRC 文本格式（`.14` / `.grd`）
//! - SMS 2dm 文本格式（`.2dm`）
//! - DFlow-FM UGRID 二进制表（`*_net.nc`）
//!
//! 各格式的加载器把文件解码为 [`MeshData`]，由 [`Mesh`] 校验后整体装入。
//! 读取前网格先被清空，解码失败时保持为空。
//!
//! # 示例
//!
//! ```
//! use mh_mesh::Mesh;
//!
//! let text = "demo\n1 3\n1 0 0 -1\n2 1 0 -1\n3 0 1 -1\n1 3 1 2 3\n0\n0\n0\n0\n";
//! let mut mesh = Mesh::new();
//! mesh.read_adcirc_from(text.as_bytes()).unwrap();
//! assert_eq!(mesh.header(), "demo");
//! assert_eq!(mesh.num_elements(), 1);
//! ```

pub mod adcirc;
mod records;
pub mod sms2dm;
pub mod ugrid;

pub use adcirc::{AdcircLoader, AdcircWriter};
pub use sms2dm::{Sms2dmLoader, Sms2dmWriter};
pub use ugrid::{UgridLoader, UgridWriter};

use crate::boundary::{Boundary, BoundaryKind};
use crate::element::Element;
use crate::error::{MeshError, MeshResult};
use crate::identity::IdentityIndex;
use crate::mesh::Mesh;
use crate::node::Node;
use crate::spatial_index::SearchTrees;
use mh_geo::Crs;
use mh_io::{NetCdfReader, NetCdfWriter, TableSink, TableSource};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

// ============================================================================
// 格式识别
// ============================================================================

/// 网格文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// ADCIRC `.14` / `.grd`
    Adcirc,
    /// SMS `.2dm`
    Sms2dm,
    /// DFlow-FM `*_net.nc`
    Ugrid,
}

impl MeshFormat {
    /// 按文件名推断格式
    ///
    /// # Errors
    /// 无法识别时返回 [`MeshError::UnsupportedFormat`]
    pub fn from_path(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("14" | "grd") => return Ok(Self::Adcirc),
            Some("2dm") => return Ok(Self::Sms2dm),
            _ => {}
        }

        let is_net_nc = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_ascii_lowercase().contains("_net.nc"));
        if is_net_nc {
            return Ok(Self::Ugrid);
        }
        Err(MeshError::unsupported_format(path.display().to_string()))
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Adcirc => "ADCIRC",
            Self::Sms2dm => "2dm",
            Self::Ugrid => "UGRID",
        };
        f.write_str(name)
    }
}

// ============================================================================
// 解码结果
// ============================================================================

/// 加载器产出的网格内容
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// 标题
    pub header: String,
    /// 节点
    pub nodes: Vec<Node>,
    /// 单元
    pub elements: Vec<Element>,
    /// 开边界
    pub open_boundaries: Vec<Boundary>,
    /// 陆地边界
    pub land_boundaries: Vec<Boundary>,
    /// 文件中记录的参考系
    pub crs: Option<Crs>,
}

// ============================================================================
// 网格读写
// ============================================================================

impl Mesh {
    /// 从绑定的文件名读取网格
    ///
    /// `format` 为 `None` 时按文件名推断。读取前网格被清空。
    ///
    /// # Errors
    /// - 未设置文件名: [`MeshError::NoFilename`]
    /// - 文件不存在: [`MeshError::FileNotFound`]
    /// - 无法识别格式: [`MeshError::UnsupportedFormat`]
    /// - 解码失败: 对应的解码错误，网格保持为空
    pub fn read(&mut self, format: Option<MeshFormat>) -> MeshResult<()> {
        let path = match self.filename.clone() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return Err(MeshError::NoFilename),
        };
        if !path.exists() {
            return Err(MeshError::FileNotFound { path });
        }
        let format = match format {
            Some(f) => f,
            None => MeshFormat::from_path(&path)?,
        };

        self.clear();
        info!("读取 {format} 网格: {}", path.display());
        match format {
            MeshFormat::Adcirc => self.read_adcirc_from(BufReader::new(File::open(&path)?)),
            MeshFormat::Sms2dm => self.read_2dm_from(BufReader::new(File::open(&path)?)),
            MeshFormat::Ugrid => {
                let table = NetCdfReader::open(&path)?;
                self.read_ugrid_from(&table)
            }
        }
    }

    /// 把网格写入文件
    ///
    /// `format` 为 `None` 时按文件名推断。
    pub fn write(&self, path: impl AsRef<Path>, format: Option<MeshFormat>) -> MeshResult<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MeshError::NoFilename);
        }
        let format = match format {
            Some(f) => f,
            None => MeshFormat::from_path(path)?,
        };

        match format {
            MeshFormat::Adcirc => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write_adcirc_to(&mut writer)?;
                writer.flush()?;
            }
            MeshFormat::Sms2dm => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write_2dm_to(&mut writer)?;
                writer.flush()?;
            }
            MeshFormat::Ugrid => {
                let mut table = NetCdfWriter::create(path)?;
                self.write_ugrid_to(&mut table)?;
            }
        }
        info!(
            "写出 {format} 网格: {} ({} 节点, {} 单元)",
            path.display(),
            self.num_nodes(),
            self.num_elements()
        );
        Ok(())
    }

    /// 从文本流读取 ADCIRC 网格
    pub fn read_adcirc_from<R: BufRead>(&mut self, reader: R) -> MeshResult<()> {
        self.load_with(|_| AdcircLoader::load_from_reader(reader))
    }

    /// 以 ADCIRC 格式写出
    pub fn write_adcirc_to<W: Write>(&self, writer: W) -> MeshResult<()> {
        AdcircWriter::write_to(writer, self)
    }

    /// 从文本流读取 2dm 网格
    pub fn read_2dm_from<R: BufRead>(&mut self, reader: R) -> MeshResult<()> {
        self.load_with(|config| {
            Sms2dmLoader::load_from_reader(reader, &config.sms2dm.placeholder_name)
        })
    }

    /// 以 2dm 格式写出
    pub fn write_2dm_to<W: Write>(&self, writer: W) -> MeshResult<()> {
        Sms2dmWriter::write_to(writer, self)
    }

    /// 从二进制表读取 UGRID 网格
    pub fn read_ugrid_from<T: TableSource + ?Sized>(&mut self, table: &T) -> MeshResult<()> {
        self.load_with(|_| UgridLoader::load_from_table(table))
    }

    /// 以 UGRID 约定写入二进制表
    pub fn write_ugrid_to<T: TableSink + ?Sized>(&self, table: &mut T) -> MeshResult<()> {
        UgridWriter::write_to(table, self)
    }

    /// 用解码结果整体替换网格内容
    ///
    /// 校验编号唯一和节点引用，失败时网格为空。
    pub fn load_data(&mut self, data: MeshData) -> MeshResult<()> {
        self.load_with(|_| Ok(data))
    }

    fn load_with<F>(&mut self, decode: F) -> MeshResult<()>
    where
        F: FnOnce(&mh_config::MeshEngineConfig) -> MeshResult<MeshData>,
    {
        self.clear();
        let decoded = decode(&self.config);
        let result = decoded.and_then(|data| self.install(data));
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn install(&mut self, data: MeshData) -> MeshResult<()> {
        let node_identity = IdentityIndex::build("Node", data.nodes.iter().map(|n| n.id))?;
        let element_identity =
            IdentityIndex::build("Element", data.elements.iter().map(Element::id))?;

        for element in &data.elements {
            for &id in element.nodes() {
                node_identity.position("Node", id)?;
            }
        }
        for boundary in &data.open_boundaries {
            if boundary.kind() != BoundaryKind::Open {
                return Err(MeshError::invalid_topology(
                    "load_data",
                    format!("开边界代码为 {}", boundary.code()),
                ));
            }
        }
        for boundary in data.open_boundaries.iter().chain(&data.land_boundaries) {
            for id in boundary.node_ids() {
                node_identity.position("Node", id)?;
            }
        }

        self.header = data.header;
        self.nodes = data.nodes;
        self.elements = data.elements;
        self.open_boundaries = data.open_boundaries;
        self.land_boundaries = data.land_boundaries;
        self.node_identity = node_identity;
        self.element_identity = element_identity;
        self.search = SearchTrees::default();
        if let Some(crs) = data.crs {
            self.crs = crs;
        }
        info!(
            "网格载入完成: {} 节点, {} 单元, {} 开边界, {} 陆地边界",
            self.nodes.len(),
            self.elements.len(),
            self.open_boundaries.len(),
            self.land_boundaries.len()
        );
        Ok(())
    }
}
