//! 预览容器（Jig）
//!
//! 命令在收集输入期间把临时几何放进 Jig，渲染层订阅变更通知后重绘。
//! Jig 中的对象与文档无关，命令结束时必须全部移除。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use zdraw_core::drawable::Drawable;
use zdraw_core::math::BoundingBox2;
use zdraw_core::observer::{Notifier, SubscriptionId};

/// Jig 中共享的可绘制对象
pub type SharedDrawable = Rc<RefCell<dyn Drawable>>;

/// Jig 变更事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JigEvent {
    Added,
    Removed,
    /// 已有对象的内容变了
    Changed,
    Cleared,
}

#[derive(Default)]
struct JigInner {
    items: RefCell<Vec<SharedDrawable>>,
    notifier: Notifier<JigEvent>,
}

/// 预览容器句柄，克隆后指向同一个容器
#[derive(Clone, Default)]
pub struct Jig {
    inner: Rc<JigInner>,
}

impl Jig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, item: SharedDrawable) {
        self.inner.items.borrow_mut().push(item);
        self.publish(JigEvent::Added);
    }

    /// 按指针身份移除
    pub fn remove(&self, item: &SharedDrawable) -> bool {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            let before = items.len();
            items.retain(|existing| !Rc::ptr_eq(existing, item));
            items.len() != before
        };
        if removed {
            self.publish(JigEvent::Removed);
        }
        removed
    }

    pub fn clear(&self) {
        let had_items = {
            let mut items = self.inner.items.borrow_mut();
            let had_items = !items.is_empty();
            items.clear();
            had_items
        };
        if had_items {
            self.publish(JigEvent::Cleared);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// 当前内容的快照
    pub fn items(&self) -> Vec<SharedDrawable> {
        self.inner.items.borrow().clone()
    }

    /// 所有预览对象的范围
    pub fn extents(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::empty();
        for item in self.inner.items.borrow().iter() {
            bbox.add_box(&item.borrow().extents());
        }
        bbox
    }

    /// 通知订阅者对象内容已更新
    pub fn notify_changed(&self) {
        self.publish(JigEvent::Changed);
    }

    pub fn subscribe(&self, callback: impl FnMut(&JigEvent) + 'static) -> SubscriptionId {
        self.inner.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.notifier.unsubscribe(id)
    }

    /// 创建作用域：作用域内添加的对象在其析构时全部移除
    pub fn scope(&self) -> JigScope {
        JigScope {
            jig: self.clone(),
            items: Vec::new(),
        }
    }

    // 调用时 items 的借用已释放，订阅者可以直接读取 Jig
    fn publish(&self, event: JigEvent) {
        self.inner.notifier.notify(event);
    }
}

impl fmt::Debug for Jig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jig").field("items", &self.len()).finish()
    }
}

/// 一个构造阶段内的 Jig 条目
///
/// 无论命令以何种方式结束，析构时都会移除自己添加的对象。
pub struct JigScope {
    jig: Jig,
    items: Vec<SharedDrawable>,
}

impl JigScope {
    /// 放入一个对象，返回可供预览回调修改的共享句柄
    pub fn add<D: Drawable>(&mut self, drawable: D) -> Rc<RefCell<D>> {
        let shared = Rc::new(RefCell::new(drawable));
        let item: SharedDrawable = shared.clone();
        self.add_shared(item);
        shared
    }

    pub fn add_shared(&mut self, item: SharedDrawable) {
        self.jig.add(item.clone());
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 立即移除本作用域的所有对象
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            self.jig.remove(&item);
        }
    }
}

impl Drop for JigScope {
    fn drop(&mut self) {
        self.clear();
    }
}
