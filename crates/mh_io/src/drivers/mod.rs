// crates/mh_io/src/drivers/mod.rs

//! 数据驱动模块
//!
//! 二进制表的读写原语及其实现（netCDF、内存）。

pub mod memory;
pub mod netcdf;
pub mod table;

// 重导出
pub use self::memory::MemoryTable;
pub use self::netcdf::{NetCdfReader, NetCdfWriter};
pub use self::table::{
    AttrValue, TableError, TableResult, TableSink, TableSource, VarType, NC_FILL_DOUBLE,
    NC_FILL_INT, NC_FILL_INT64,
};
