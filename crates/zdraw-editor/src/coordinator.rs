//! 输入协调器
//!
//! 命令通过 `request_*` 挂起，协调器把输入层的事件分为三类：
//! 确认（点击、有效的文本、关键字、回车、Esc）使挂起的请求得到结果；
//! 临时输入（指针移动、拾取）只调用预览回调并刷新 Jig；
//! 其余输入记录警告后忽略。
//!
//! 同一时刻最多一个请求在等待。每个请求带一个递增的令牌，
//! 请求 future 只接收与自己令牌相同的结果。

use crate::input::{
    FloatOptions, InputEvent, InputOutcome, InputRequest, Keyword, KeywordSet, RawValue,
    RequestKind, RequestValue, UpdateCallback,
};
use crate::jig::Jig;
use crate::selection::SharedSelection;
use std::cell::RefCell;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::marker::PhantomData;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use zdraw_core::entity::EntityId;
use zdraw_core::input_parser::{InputParser, ParseError};
use zdraw_core::math::{angle_between, Point2, EPSILON};

struct PendingRequest {
    token: u64,
    kind: RequestKind,
    prompt: String,
    base_point: Option<Point2>,
    keywords: KeywordSet,
    options: FloatOptions,
    on_update: Option<UpdateCallback<RawValue>>,
    outcome: Option<InputOutcome<RawValue>>,
}

#[derive(Default)]
struct CoordinatorState {
    next_token: u64,
    pending: Option<PendingRequest>,
    last_pointer: Option<Point2>,
}

enum Resolution {
    Resolved(InputOutcome<RawValue>),
    Provisional(RawValue),
    Ignored,
}

/// 输入协调器句柄，克隆后共享同一个等待槽
#[derive(Clone)]
pub struct InputCoordinator {
    state: Rc<RefCell<CoordinatorState>>,
    jig: Jig,
    selection: SharedSelection,
}

impl InputCoordinator {
    pub fn new(jig: Jig, selection: SharedSelection) -> Self {
        Self {
            state: Rc::new(RefCell::new(CoordinatorState::default())),
            jig,
            selection,
        }
    }

    pub fn request_point(&self, prompt: impl Into<String>) -> PendingInput<Point2> {
        PendingInput::new(self.clone(), InputRequest::point(prompt))
    }

    /// 距离请求；设置基点后指针位置换算为到基点的距离
    pub fn request_distance(&self, prompt: impl Into<String>) -> PendingInput<f64> {
        PendingInput::new(self.clone(), InputRequest::distance(prompt, None))
    }

    /// 角度请求（弧度）；设置基点后指针位置换算为方向角
    pub fn request_angle(&self, prompt: impl Into<String>) -> PendingInput<f64> {
        PendingInput::new(self.clone(), InputRequest::angle(prompt, None))
    }

    pub fn request_corner(&self, prompt: impl Into<String>, first: Point2) -> PendingInput<Point2> {
        PendingInput::new(self.clone(), InputRequest::corner(prompt, first))
    }

    pub fn request_text(&self, prompt: impl Into<String>) -> PendingInput<String> {
        PendingInput::new(self.clone(), InputRequest::text(prompt))
    }

    pub fn request_float(&self, prompt: impl Into<String>, options: FloatOptions) -> PendingInput<f64> {
        PendingInput::new(self.clone(), InputRequest::float(prompt, options))
    }

    /// 选择请求；拾取到的实体进入拾取集，回车时以当前拾取集作为结果
    pub fn request_selection(&self, prompt: impl Into<String>) -> PendingInput<Vec<EntityId>> {
        PendingInput::new(self.clone(), InputRequest::selection(prompt))
    }

    /// 登记请求并返回等待其结果的 future
    pub fn submit<T: RequestValue>(&self, request: InputRequest<T>) -> RequestFuture<T> {
        let InputRequest {
            kind,
            prompt,
            base_point,
            keywords,
            options,
            on_update,
        } = request;

        let on_update = on_update.map(|mut callback| -> UpdateCallback<RawValue> {
            Box::new(move |raw: &RawValue| {
                if let Some(value) = T::from_raw(raw) {
                    callback(&value);
                }
            })
        });

        tracing::debug!("Input request {:?}: {}", kind, prompt);

        let (token, replaced) = {
            let mut state = self.state.borrow_mut();
            state.next_token += 1;
            let token = state.next_token;
            let replaced = state.pending.replace(PendingRequest {
                token,
                kind,
                prompt,
                base_point,
                keywords,
                options,
                on_update,
                outcome: None,
            });
            (token, replaced)
        };

        if let Some(previous) = replaced {
            if previous.outcome.is_none() {
                tracing::error!(
                    "Overlapping input request: '{}' (token {}) discarded",
                    previous.prompt,
                    previous.token
                );
            }
        }

        RequestFuture {
            coordinator: self.clone(),
            token,
            finished: false,
            _value: PhantomData,
        }
    }

    /// 分发一个输入事件，返回是否有请求因此得到结果
    pub fn deliver(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Pick(ids) => {
                self.selection.borrow_mut().extend(ids.iter().copied());
                let selection_events = self.selection.borrow().events();
                selection_events.flush();
            }
            InputEvent::PointerMove(p) | InputEvent::Click(p) => {
                self.state.borrow_mut().last_pointer = Some(*p);
            }
            _ => {}
        }

        let resolution = {
            let state = self.state.borrow();
            let Some(pending) = state.pending.as_ref().filter(|p| p.outcome.is_none()) else {
                return false;
            };
            let selection = self.selection.borrow();
            resolve(pending, event, selection.ids())
        };

        match resolution {
            Resolution::Resolved(outcome) => {
                let mut state = self.state.borrow_mut();
                if let Some(pending) = state.pending.as_mut() {
                    tracing::debug!("Input {} resolved: {:?}", pending.token, outcome);
                    pending.outcome = Some(outcome);
                }
                true
            }
            Resolution::Provisional(value) => {
                self.live_update(&value);
                false
            }
            Resolution::Ignored => false,
        }
    }

    /// 调用预览回调；回调执行期间不持有内部借用，回调可以自由修改 Jig 条目
    fn live_update(&self, value: &RawValue) {
        let (token, callback) = {
            let mut state = self.state.borrow_mut();
            let Some(pending) = state.pending.as_mut() else {
                return;
            };
            (pending.token, pending.on_update.take())
        };
        let Some(mut callback) = callback else {
            return;
        };

        callback(value);

        let stale = {
            let mut state = self.state.borrow_mut();
            match state.pending.as_mut() {
                Some(pending) if pending.token == token => {
                    pending.on_update = Some(callback);
                    None
                }
                _ => Some(callback),
            }
        };
        drop(stale);

        self.jig.notify_changed();
    }

    /// 取走已得到结果的请求
    fn take_outcome(&self, token: u64) -> Option<InputOutcome<RawValue>> {
        let finished = {
            let mut state = self.state.borrow_mut();
            let ready = state
                .pending
                .as_ref()
                .is_some_and(|p| p.token == token && p.outcome.is_some());
            if !ready {
                return None;
            }
            state.pending.take()
        };
        finished.and_then(|mut pending| pending.outcome.take())
    }

    /// 请求 future 被提前丢弃时撤销登记
    fn abandon(&self, token: u64) {
        let abandoned = {
            let mut state = self.state.borrow_mut();
            if state.pending.as_ref().is_some_and(|p| p.token == token) {
                state.pending.take()
            } else {
                None
            }
        };
        if abandoned.is_some() {
            tracing::debug!("Input request {} abandoned", token);
        }
    }

    /// 是否有请求正在等待输入
    pub fn is_waiting(&self) -> bool {
        self.state
            .borrow()
            .pending
            .as_ref()
            .is_some_and(|p| p.outcome.is_none())
    }

    /// 当前提示，形如 `指定下一点 [Close/End] <End>:`
    pub fn prompt(&self) -> Option<String> {
        let state = self.state.borrow();
        let pending = state.pending.as_ref()?;
        if pending.keywords.is_empty() {
            Some(format!("{}:", pending.prompt))
        } else {
            Some(format!("{} {}:", pending.prompt, pending.keywords))
        }
    }

    /// 最近一次指针位置
    pub fn last_pointer(&self) -> Option<Point2> {
        self.state.borrow().last_pointer
    }
}

impl fmt::Debug for InputCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("InputCoordinator")
            .field("pending", &state.pending.as_ref().map(|p| (p.token, p.kind)))
            .field("last_pointer", &state.last_pointer)
            .finish()
    }
}

fn resolve(pending: &PendingRequest, event: &InputEvent, picked: &[EntityId]) -> Resolution {
    match event {
        InputEvent::Escape => Resolution::Resolved(InputOutcome::Cancelled),
        InputEvent::Enter => resolve_enter(pending, picked),
        InputEvent::Text(text) if text.trim().is_empty() => resolve_enter(pending, picked),
        InputEvent::Text(text) => resolve_text(pending, text.trim()),
        InputEvent::Keyword(name) => match pending.keywords.find(name) {
            Some(keyword) => keyword_chosen(keyword),
            None => {
                tracing::warn!("Keyword '{}' is not offered here", name);
                Resolution::Ignored
            }
        },
        InputEvent::PointerMove(p) => match pointer_value(pending, p) {
            Some(value) => Resolution::Provisional(value),
            None => Resolution::Ignored,
        },
        InputEvent::Click(p) => match pending.kind {
            RequestKind::Text | RequestKind::Selection => Resolution::Ignored,
            _ => match pointer_value(pending, p) {
                Some(value) => Resolution::Resolved(InputOutcome::Accepted(value)),
                None => {
                    tracing::warn!("Point ({}, {}) is not a valid answer", p.x, p.y);
                    Resolution::Ignored
                }
            },
        },
        InputEvent::Pick(_) => match pending.kind {
            RequestKind::Selection => Resolution::Provisional(RawValue::Selection(picked.to_vec())),
            _ => Resolution::Ignored,
        },
    }
}

fn keyword_chosen(keyword: &Keyword) -> Resolution {
    Resolution::Resolved(InputOutcome::KeywordChosen(keyword.name().to_string()))
}

fn resolve_enter(pending: &PendingRequest, picked: &[EntityId]) -> Resolution {
    if let Some(keyword) = pending.keywords.default_keyword() {
        return keyword_chosen(keyword);
    }
    let outcome = match pending.kind {
        RequestKind::Selection => InputOutcome::Accepted(RawValue::Selection(picked.to_vec())),
        RequestKind::Text => InputOutcome::Accepted(RawValue::Text(String::new())),
        _ => InputOutcome::Cancelled,
    };
    Resolution::Resolved(outcome)
}

fn resolve_text(pending: &PendingRequest, text: &str) -> Resolution {
    if let Some(keyword) = pending.keywords.resolve(text) {
        return keyword_chosen(keyword);
    }

    let base = pending.base_point;
    let parsed = match pending.kind {
        RequestKind::Point | RequestKind::Corner => {
            InputParser::parse_point(text, base).map(RawValue::Point)
        }
        RequestKind::Distance => InputParser::parse_distance(text, base).map(RawValue::Number),
        RequestKind::Angle => InputParser::parse_angle(text, base).map(RawValue::Number),
        RequestKind::Float => text
            .parse::<f64>()
            .map(RawValue::Number)
            .map_err(|_| ParseError::InvalidFormat(format!("Not a number: {}", text))),
        RequestKind::Text => {
            return Resolution::Resolved(InputOutcome::Accepted(RawValue::Text(text.to_string())))
        }
        RequestKind::Selection => {
            tracing::warn!("Unknown option: {}", text);
            return Resolution::Ignored;
        }
    };

    match parsed {
        Ok(RawValue::Number(value)) if !pending.options.admits(value) => {
            tracing::warn!("Value {} is out of range", value);
            Resolution::Ignored
        }
        Ok(value) => Resolution::Resolved(InputOutcome::Accepted(value)),
        Err(err) => {
            tracing::warn!("Invalid input '{}': {}", text, err);
            Resolution::Ignored
        }
    }
}

/// 指针位置换算成请求所需的值
fn pointer_value(pending: &PendingRequest, point: &Point2) -> Option<RawValue> {
    match pending.kind {
        RequestKind::Point | RequestKind::Corner => Some(RawValue::Point(*point)),
        RequestKind::Distance | RequestKind::Float => {
            let base = pending.base_point?;
            let distance = (point - base).norm();
            pending
                .options
                .admits(distance)
                .then_some(RawValue::Number(distance))
        }
        RequestKind::Angle => {
            let base = pending.base_point?;
            if (point - base).norm() < EPSILON {
                return None;
            }
            Some(RawValue::Number(angle_between(&base, point)))
        }
        RequestKind::Text | RequestKind::Selection => None,
    }
}

fn into_typed<T: RequestValue>(outcome: InputOutcome<RawValue>) -> InputOutcome<T> {
    match outcome {
        InputOutcome::Accepted(raw) => match T::from_raw(&raw) {
            Some(value) => InputOutcome::Accepted(value),
            None => {
                tracing::error!("Input value {:?} does not fit the request", raw);
                InputOutcome::Cancelled
            }
        },
        InputOutcome::Cancelled => InputOutcome::Cancelled,
        InputOutcome::KeywordChosen(name) => InputOutcome::KeywordChosen(name),
    }
}

/// 尚未登记的请求，`.await` 时登记
#[must_use = "input requests do nothing unless awaited"]
pub struct PendingInput<T> {
    coordinator: InputCoordinator,
    request: InputRequest<T>,
}

impl<T: RequestValue> PendingInput<T> {
    fn new(coordinator: InputCoordinator, request: InputRequest<T>) -> Self {
        Self {
            coordinator,
            request,
        }
    }

    pub fn base_point(mut self, point: Point2) -> Self {
        self.request = self.request.base_point(point);
        self
    }

    pub fn keyword(mut self, keyword: Keyword) -> Self {
        self.request = self.request.keyword(keyword);
        self
    }

    pub fn default_keyword(mut self, keyword: Keyword) -> Self {
        self.request = self.request.default_keyword(keyword);
        self
    }

    pub fn options(mut self, options: FloatOptions) -> Self {
        self.request = self.request.options(options);
        self
    }

    pub fn on_update(mut self, callback: impl FnMut(&T) + 'static) -> Self {
        self.request = self.request.on_update(callback);
        self
    }
}

impl<T: RequestValue> IntoFuture for PendingInput<T> {
    type Output = InputOutcome<T>;
    type IntoFuture = RequestFuture<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.coordinator.submit(self.request)
    }
}

/// 等待一次请求结果的 future
///
/// 丢弃时撤销尚未完成的登记，同时释放预览回调。
#[must_use = "futures do nothing unless polled"]
pub struct RequestFuture<T> {
    coordinator: InputCoordinator,
    token: u64,
    finished: bool,
    _value: PhantomData<fn() -> T>,
}

impl<T> RequestFuture<T> {
    pub fn token(&self) -> u64 {
        self.token
    }
}

impl<T: RequestValue> Future for RequestFuture<T> {
    type Output = InputOutcome<T>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(InputOutcome::Cancelled);
        }
        match this.coordinator.take_outcome(this.token) {
            Some(outcome) => {
                this.finished = true;
                Poll::Ready(into_typed(outcome))
            }
            None => Poll::Pending,
        }
    }
}

impl<T> Drop for RequestFuture<T> {
    fn drop(&mut self) {
        if !self.finished {
            self.coordinator.abandon(self.token);
        }
    }
}
