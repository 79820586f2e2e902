// crates/mh_mesh/src/identity.rs
//! 外部编号到位置的映射
//!
//! 编号恰好是 `1..=n` 时直接换算（`id - 1`），否则使用哈希表。
//! 网格每次增删改节点或单元后都会重建对应的映射。

use crate::error::{MeshError, MeshResult};
use std::collections::HashMap;
use tracing::debug;

/// 编号索引
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityIndex {
    /// 编号连续，位置 = 编号 - 1
    Direct {
        /// 条目数
        len: usize,
    },
    /// 编号不连续
    Mapped(HashMap<usize, usize>),
}

impl Default for IdentityIndex {
    fn default() -> Self {
        Self::Direct { len: 0 }
    }
}

impl IdentityIndex {
    /// 由按位置排列的编号构建
    ///
    /// # Errors
    /// 编号重复时返回 [`MeshError::DuplicateIdentity`]
    pub fn build<I>(entity: &'static str, ids: I) -> MeshResult<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let ids: Vec<usize> = ids.into_iter().collect();
        if ids.iter().enumerate().all(|(pos, &id)| id == pos + 1) {
            return Ok(Self::Direct { len: ids.len() });
        }

        debug!("{entity} 编号不连续，使用哈希映射 ({} 项)", ids.len());
        let mut map = HashMap::with_capacity(ids.len());
        for (pos, id) in ids.into_iter().enumerate() {
            if map.insert(id, pos).is_some() {
                return Err(MeshError::DuplicateIdentity { entity, id });
            }
        }
        Ok(Self::Mapped(map))
    }

    /// 编号是否连续
    #[inline]
    #[must_use]
    pub fn is_logical(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }

    /// 条目数
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Direct { len } => *len,
            Self::Mapped(map) => map.len(),
        }
    }

    /// 是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 查找编号对应的位置
    #[must_use]
    pub fn get(&self, id: usize) -> Option<usize> {
        match self {
            Self::Direct { len } => (1..=*len).contains(&id).then(|| id - 1),
            Self::Mapped(map) => map.get(&id).copied(),
        }
    }

    /// 在末尾追加一个编号
    ///
    /// 连续编号追加 `len + 1` 时保持直接换算，其余情况转为哈希映射。
    ///
    /// # Errors
    /// 编号已存在时返回 [`MeshError::DuplicateIdentity`]
    pub fn push(&mut self, entity: &'static str, id: usize) -> MeshResult<()> {
        if self.contains(id) {
            return Err(MeshError::DuplicateIdentity { entity, id });
        }
        let len = self.len();
        match self {
            Self::Direct { len: n } if id == *n + 1 => *n += 1,
            Self::Direct { .. } => {
                debug!("{entity} 编号 {id} 打破连续编号，转为哈希映射");
                let mut map: HashMap<usize, usize> = (1..=len).map(|i| (i, i - 1)).collect();
                map.insert(id, len);
                *self = Self::Mapped(map);
            }
            Self::Mapped(map) => {
                map.insert(id, len);
            }
        }
        Ok(())
    }

    /// 是否包含编号
    #[inline]
    #[must_use]
    pub fn contains(&self, id: usize) -> bool {
        self.get(id).is_some()
    }

    /// 查找编号对应的位置
    ///
    /// # Errors
    /// 编号不存在时返回 [`MeshError::IdentityNotFound`]
    pub fn position(&self, entity: &'static str, id: usize) -> MeshResult<usize> {
        self.get(id)
            .ok_or(MeshError::IdentityNotFound { entity, id })
    }
}
