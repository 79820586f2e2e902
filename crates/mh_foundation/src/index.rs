// crates/mh_foundation/src/index.rs

//! 强类型位置索引
//!
//! 网格中的节点、单元都有两套编号：文件里给定的外部 ID，以及在集合中的位置。
//! 两者都是整数，混用是最常见的错误来源。`Idx<T>` 用幻影类型把"位置"包装起来，
//! 让编译器区分节点位置和单元位置，外部 ID 则保持为普通整数。
//!
//! # 示例
//!
//! ```
//! use mh_foundation::index::{ElementIndex, NodeIndex};
//!
//! let n = NodeIndex::new(3);
//! assert_eq!(n.get(), 3);
//! assert_eq!(n.to_id(), 4);
//!
//! let e = ElementIndex::from_id(1).unwrap();
//! assert_eq!(e.get(), 0);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

// ============================================================================
// 标记类型
// ============================================================================

/// 节点位置标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeTag;

/// 单元位置标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementTag;

/// 索引标记的显示名称
pub trait IndexTag {
    /// 用于错误信息和调试输出的名称
    const NAME: &'static str;
}

impl IndexTag for NodeTag {
    const NAME: &'static str = "Node";
}

impl IndexTag for ElementTag {
    const NAME: &'static str = "Element";
}

// ============================================================================
// 泛型索引
// ============================================================================

/// 集合中的零基位置
#[repr(transparent)]
pub struct Idx<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

/// 节点位置
pub type NodeIndex = Idx<NodeTag>;

/// 单元位置
pub type ElementIndex = Idx<ElementTag>;

// PhantomData<T> 的派生实现会要求 T 满足同样的 trait，这里手动实现
impl<T> Copy for Idx<T> {}

impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Idx<T> {
    /// 从零基位置创建
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// 由逻辑编号（一基）换算位置，0 没有对应位置
    #[inline]
    #[must_use]
    pub const fn from_id(id: usize) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(Self::new(id - 1))
        }
    }

    /// 零基位置
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.index
    }

    /// 该位置在逻辑编号下对应的外部 ID
    #[inline]
    #[must_use]
    pub const fn to_id(self) -> usize {
        self.index + 1
    }
}

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Idx<T> {}

impl<T> PartialOrd for Idx<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Idx<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Idx<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> From<usize> for Idx<T> {
    #[inline]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T: IndexTag> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Index({})", T::NAME, self.index)
    }
}

impl<T: IndexTag> fmt::Display for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", T::NAME, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let idx = NodeIndex::from_id(7).unwrap();
        assert_eq!(idx.get(), 6);
        assert_eq!(idx.to_id(), 7);
        assert!(NodeIndex::from_id(0).is_none());
    }

    #[test]
    fn test_ordering_and_hash() {
        use std::collections::HashSet;

        let a = ElementIndex::new(1);
        let b = ElementIndex::new(2);
        assert!(a < b);

        let set: HashSet<ElementIndex> = [a, b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_debug_names() {
        assert_eq!(format!("{:?}", NodeIndex::new(2)), "NodeIndex(2)");
        assert_eq!(ElementIndex::new(5).to_string(), "Element#5");
    }
}
