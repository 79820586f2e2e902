// crates/mh_io/src/lib.rs

//! MariHydro IO 模块
//!
//! 网格引擎对外部存储的两类依赖：
//!
//! - [`drivers`]: 二进制表读写原语（netCDF 驱动、内存表）
//! - [`exporters`]: 矢量要素模型与 GeoJSON 导出器
//!
//! # 可选依赖
//!
//! - `netcdf`: 启用 NetCDF 驱动
//!
//! # 使用示例
//!
//! ```
//! use mh_io::drivers::{MemoryTable, TableSink, TableSource, VarType};
//!
//! let mut table = MemoryTable::new();
//! table.add_dimension("nNetNode", 2).unwrap();
//! table.add_variable("NetNode_z", VarType::Double, &["nNetNode"]).unwrap();
//! table.put_f64("NetNode_z", &[-1.0, -2.0]).unwrap();
//! assert_eq!(table.get_f64("NetNode_z").unwrap()[1], -2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod drivers;
pub mod error;
pub mod exporters;

// 重导出常用类型
pub use drivers::{
    AttrValue, MemoryTable, NetCdfReader, NetCdfWriter, TableError, TableSink, TableSource,
    VarType,
};
pub use error::{IoError, IoResult};
pub use exporters::{FeatureSet, FeatureSink, GeoJsonExporter};
