//! 拾取集
//!
//! 用户拾取的实体 id，有序且不重复。命令可以在请求前后读取或清空。
//!
//! 与文档一样，修改只排入 [`SelectionEvent`]，释放借用后再 `flush_events` 分发。

use std::cell::RefCell;
use std::rc::Rc;
use zdraw_core::document::Document;
use zdraw_core::entity::EntityId;
use zdraw_core::observer::{Notifier, SubscriptionId};

/// 拾取集变更事件，携带变更后的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Changed(Vec<EntityId>),
}

/// 拾取集
#[derive(Debug, Default)]
pub struct PickedSelection {
    ids: Vec<EntityId>,
    notifier: Notifier<SelectionEvent>,
}

/// 共享拾取集
pub type SharedSelection = Rc<RefCell<PickedSelection>>;

impl PickedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSelection {
        Rc::new(RefCell::new(Self::new()))
    }

    /// 添加一个实体，已存在时返回 false
    pub fn add(&mut self, id: EntityId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        self.changed();
        true
    }

    /// 批量添加，返回新增数量
    pub fn extend(&mut self, ids: impl IntoIterator<Item = EntityId>) -> usize {
        let mut added = 0;
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
                added += 1;
            }
        }
        if added > 0 {
            self.changed();
        }
        added
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        let removed = self.ids.len() != before;
        if removed {
            self.changed();
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.ids.is_empty() {
            self.ids.clear();
            self.changed();
        }
    }

    /// 丢弃文档中已不存在的实体
    pub fn retain_existing(&mut self, document: &Document) {
        let before = self.ids.len();
        self.ids.retain(|id| document.contains(*id));
        if self.ids.len() != before {
            self.changed();
        }
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn subscribe(&self, callback: impl FnMut(&SelectionEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn events(&self) -> Notifier<SelectionEvent> {
        self.notifier.clone()
    }

    /// 分发排队的事件；调用时拾取集不能处于可变借用中
    pub fn flush_events(&self) {
        self.notifier.flush();
    }

    fn changed(&mut self) {
        self.notifier.post(SelectionEvent::Changed(self.ids.clone()));
    }
}
