// crates/mh_io/src/drivers/netcdf/mod.rs

//! NetCDF 驱动模块
//!
//! 在 netCDF 文件上实现 [`TableSource`](super::TableSource) / [`TableSink`](super::TableSink)。
//!
//! # 依赖
//!
//! 需要启用 `netcdf` feature 并安装 NetCDF 库。未启用时 `open`/`create` 返回
//! [`TableError::NotAvailable`](super::TableError::NotAvailable)。

mod driver;

pub use driver::*;
