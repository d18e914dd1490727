//! 实体
//!
//! 实体 = 唯一标识 + 几何数据。

use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 实体唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 模型中的实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub geometry: Geometry,
}

impl Entity {
    pub fn new(id: EntityId, geometry: Geometry) -> Self {
        Self { id, geometry }
    }
}
