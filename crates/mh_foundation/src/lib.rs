// crates/mh_foundation/src/lib.rs

//! MariHydro 网格引擎基础层
//!
//! 提供整个工作空间共享的最小抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型与守卫宏
//! - [`index`]: 强类型位置索引（节点 / 单元）
//!
//! # 示例
//!
//! ```
//! use mh_foundation::{MhError, MhResult, NodeIndex};
//!
//! fn first(len: usize) -> MhResult<NodeIndex> {
//!     MhError::check_index("Node", 0, len)?;
//!     Ok(NodeIndex::new(0))
//! }
//!
//! assert!(first(0).is_err());
//! assert_eq!(first(3).unwrap().get(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;

// 重导出常用类型
pub use error::{MhError, MhResult};
pub use index::{ElementIndex, ElementTag, Idx, IndexTag, NodeIndex, NodeTag};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{MhError, MhResult};
    pub use crate::index::{ElementIndex, Idx, NodeIndex};
    pub use crate::{ensure, require};
}
