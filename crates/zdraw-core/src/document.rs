//! 文档模型
//!
//! 有序的实体集合。命令在提交时一次性写入；每次修改都会排入一个变更事件，
//! 由外部渲染层决定何时重绘。
//!
//! 文档通常放在 `Rc<RefCell<_>>` 里共享，修改时只入队。修改方释放可变借用后调用
//! [`Document::flush_events`]（或对 [`Document::events`] 的句柄调用 `flush`），
//! 订阅者在回调里可以再次借用文档。

use crate::entity::{Entity, EntityId};
use crate::geometry::Geometry;
use crate::math::BoundingBox2;
use crate::observer::{Notifier, SubscriptionId};
use crate::transform::Transform2D;
use thiserror::Error;

/// 文档错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),
}

/// 文档变更事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Added(Vec<EntityId>),
    Removed(Vec<EntityId>),
    Modified(Vec<EntityId>),
}

/// 窗口选择模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// 完全位于窗口内
    Inside,
    /// 与窗口相交即可
    Crossing,
}

/// 文档
#[derive(Debug, Default)]
pub struct Document {
    entities: Vec<Entity>,
    next_id: u64,
    notifier: Notifier<DocumentEvent>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
            notifier: Notifier::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        // Default 构造时 next_id 为 0，跳过以保证 id 从 1 开始
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// 添加单个图元
    pub fn add(&mut self, geometry: Geometry) -> EntityId {
        let id = self.allocate_id();
        tracing::debug!("Document add {} {}", id, geometry.type_name());
        self.entities.push(Entity::new(id, geometry));
        self.notifier.post(DocumentEvent::Added(vec![id]));
        id
    }

    /// 一次性添加多个图元，只产生一个事件
    pub fn add_all(&mut self, geometries: impl IntoIterator<Item = Geometry>) -> Vec<EntityId> {
        let mut ids = Vec::new();
        for geometry in geometries {
            let id = self.allocate_id();
            self.entities.push(Entity::new(id, geometry));
            ids.push(id);
        }
        if !ids.is_empty() {
            tracing::debug!("Document add {} entities", ids.len());
            self.notifier.post(DocumentEvent::Added(ids.clone()));
        }
        ids
    }

    /// 移除实体
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, DocumentError> {
        let index = self
            .entities
            .iter()
            .position(|e| e.id == id)
            .ok_or(DocumentError::EntityNotFound(id))?;
        let entity = self.entities.remove(index);
        tracing::debug!("Document remove {}", id);
        self.notifier.post(DocumentEvent::Removed(vec![id]));
        Ok(entity)
    }

    /// 批量移除；不存在的 id 被忽略
    pub fn remove_all(&mut self, ids: &[EntityId]) -> Vec<Entity> {
        let mut removed = Vec::new();
        self.entities.retain(|e| {
            if ids.contains(&e.id) {
                removed.push(e.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            let removed_ids = removed.iter().map(|e| e.id).collect();
            self.notifier.post(DocumentEvent::Removed(removed_ids));
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// 对一组实体原地应用同一个变换
    ///
    /// 先检查所有 id 都存在，任何一个缺失都不做修改。
    pub fn transform_entities(
        &mut self,
        ids: &[EntityId],
        transform: &Transform2D,
    ) -> Result<(), DocumentError> {
        if let Some(missing) = ids.iter().find(|id| !self.contains(**id)) {
            return Err(DocumentError::EntityNotFound(*missing));
        }
        for entity in self.entities.iter_mut().filter(|e| ids.contains(&e.id)) {
            entity.geometry.transform(transform);
        }
        tracing::debug!("Document transform {} entities", ids.len());
        self.notifier.post(DocumentEvent::Modified(ids.to_vec()));
        Ok(())
    }

    /// 取出一组实体的几何副本（按文档顺序）
    pub fn geometries_of(&self, ids: &[EntityId]) -> Vec<Geometry> {
        self.entities
            .iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| e.geometry.clone())
            .collect()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 所有实体的范围
    pub fn extents(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::empty();
        for entity in &self.entities {
            bbox.add_box(&entity.geometry.bounding_box());
        }
        bbox
    }

    /// 一组实体的范围
    pub fn extents_of(&self, ids: &[EntityId]) -> BoundingBox2 {
        let mut bbox = BoundingBox2::empty();
        for entity in self.entities.iter().filter(|e| ids.contains(&e.id)) {
            bbox.add_box(&entity.geometry.bounding_box());
        }
        bbox
    }

    /// 窗口查询
    pub fn query_window(&self, window: &BoundingBox2, mode: WindowMode) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| {
                let bbox = e.geometry.bounding_box();
                match mode {
                    WindowMode::Inside => window.contains_box(&bbox),
                    WindowMode::Crossing => window.intersects(&bbox),
                }
            })
            .map(|e| e.id)
            .collect()
    }

    /// 订阅变更
    pub fn subscribe(&self, callback: impl FnMut(&DocumentEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// 事件通知器的句柄，可以在不借用文档的情况下分发事件
    pub fn events(&self) -> Notifier<DocumentEvent> {
        self.notifier.clone()
    }

    /// 分发排队的事件；调用时文档不能处于 `RefCell` 可变借用中
    pub fn flush_events(&self) {
        self.notifier.flush();
    }
}
