//! 变更通知
//!
//! 单线程的订阅/通知机制。容器只报告"发生了变化"，不持有渲染器。
//!
//! [`Notifier`] 是可克隆的句柄，所有克隆共享同一组订阅者和同一个事件队列。
//! 发出事件分两步：[`Notifier::post`] 只入队，[`Notifier::flush`] 按入队顺序分发。
//! 放在 `RefCell` 里的容器在修改时只 `post`，由持有可变借用的一方释放借用后再
//! `flush`，因此订阅者可以在回调里读取容器本身。[`Notifier::notify`] 等于
//! `post` 之后立即 `flush`，适用于分发时不会被借用的容器。
//!
//! 回调里再次操作同一个通知器：
//! - `subscribe`：新订阅者从下一个事件开始收到通知；
//! - `unsubscribe`：立即生效，本轮还没轮到的该订阅者不再被调用；
//! - `post`、`notify`、`flush`：不会递归进入回调，事件排到队尾，由外层正在进行的
//!   `flush` 在当前事件分发完后继续分发。

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Inner<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<E>)>,
    queue: VecDeque<E>,
    dispatching: bool,
}

/// 事件通知器
pub struct Notifier<E> {
    inner: Rc<RefCell<Inner<E>>>,
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 0,
                subscribers: Vec::new(),
                queue: VecDeque::new(),
                dispatching: false,
            })),
        }
    }

    /// 订阅事件
    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let callback: Callback<E> = Rc::new(RefCell::new(callback));
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, callback));
        id
    }

    /// 取消订阅，返回是否存在该订阅
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    /// 事件入队，不调用任何回调
    pub fn post(&self, event: E) {
        self.inner.borrow_mut().queue.push_back(event);
    }

    /// 按入队顺序把排队的事件分发给订阅者
    ///
    /// 已经在分发中时直接返回，新事件由外层继续分发。
    pub fn flush(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
        }
        let _guard = DispatchGuard(&self.inner);

        loop {
            let (event, subscribers) = {
                let mut inner = self.inner.borrow_mut();
                match inner.queue.pop_front() {
                    Some(event) => (event, inner.subscribers.clone()),
                    None => return,
                }
            };
            for (id, callback) in subscribers {
                if self.is_subscribed(id) {
                    let mut callback = callback.borrow_mut();
                    (&mut *callback)(&event);
                }
            }
        }
    }

    /// 入队并立即分发
    pub fn notify(&self, event: E) {
        self.post(event);
        self.flush();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// 尚未分发的事件数
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().subscribers.iter().any(|(sid, _)| *sid == id)
    }
}

// 回调 panic 时也要复位分发标记
struct DispatchGuard<'a, E>(&'a RefCell<Inner<E>>);

impl<E> Drop for DispatchGuard<'_, E> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.dispatching = false;
        }
    }
}

impl<E> Clone for Notifier<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Notifier")
                .field("subscribers", &inner.subscribers.len())
                .field("pending", &inner.queue.len())
                .finish(),
            Err(_) => f.write_str("Notifier { <dispatching> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<i32>>>, impl FnMut(&i32) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |v: &i32| sink.borrow_mut().push(*v))
    }

    #[test]
    fn test_subscribe_and_notify() {
        let notifier = Notifier::new();
        let (seen, callback) = recorder();
        let id = notifier.subscribe(callback);
        notifier.notify(1);
        notifier.notify(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(3);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_post_waits_for_flush() {
        let notifier = Notifier::new();
        let (seen, callback) = recorder();
        notifier.subscribe(callback);

        notifier.post(1);
        notifier.clone().post(2);
        assert!(seen.borrow().is_empty());
        assert_eq!(notifier.pending(), 2);

        notifier.flush();
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(notifier.pending(), 0);
    }

    #[test]
    fn test_notify_from_callback_is_queued_not_nested() {
        let notifier = Notifier::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let handle = notifier.clone();
        let log = order.clone();
        notifier.subscribe(move |v: &i32| {
            log.borrow_mut().push(format!("a{}", v));
            if *v == 1 {
                handle.notify(2);
            }
        });
        let log = order.clone();
        notifier.subscribe(move |v: &i32| log.borrow_mut().push(format!("b{}", v)));

        notifier.notify(1);
        // 事件 1 先分发给所有订阅者，再轮到事件 2
        assert_eq!(*order.borrow(), vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn test_subscribe_and_unsubscribe_from_callback() {
        let notifier = Notifier::new();
        let (late_seen, late) = recorder();
        let late = Rc::new(RefCell::new(Some(late)));
        let (victim_seen, victim_callback) = recorder();

        let victim = Rc::new(RefCell::new(None));
        let handle = notifier.clone();
        let victim_id = victim.clone();
        notifier.subscribe(move |_: &i32| {
            if let Some(callback) = late.borrow_mut().take() {
                handle.subscribe(callback);
            }
            if let Some(id) = victim_id.borrow_mut().take() {
                handle.unsubscribe(id);
            }
        });
        *victim.borrow_mut() = Some(notifier.subscribe(victim_callback));

        notifier.notify(1);
        assert!(late_seen.borrow().is_empty());
        assert!(victim_seen.borrow().is_empty());

        notifier.notify(2);
        assert_eq!(*late_seen.borrow(), vec![2]);
        assert!(victim_seen.borrow().is_empty());
    }
}
