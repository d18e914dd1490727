//! 输入请求与输入结果
//!
//! 命令每次挂起时提交一个 [`InputRequest`]，恢复时拿到一个 [`InputOutcome`]。
//! 外部输入层只需要产生 [`InputEvent`]。

use std::fmt;
use zdraw_core::entity::EntityId;
use zdraw_core::math::{Point2, EPSILON};

/// 输入层送来的原始事件
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// 指针移动（世界坐标）
    PointerMove(Point2),
    /// 左键点击（世界坐标）
    Click(Point2),
    /// 命令行输入的文本
    Text(String),
    /// 直接选择的关键字（如点击提示中的选项）
    Keyword(String),
    /// 拾取到的实体
    Pick(Vec<EntityId>),
    /// 回车 / 空格
    Enter,
    /// Esc
    Escape,
}

/// 关键字匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordMatch {
    /// 输入是名称的前缀即可（忽略大小写）
    Prefix,
    /// 必须完整输入名称（忽略大小写）
    Exact,
}

/// 命令选项关键字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    name: String,
    matching: KeywordMatch,
}

impl Keyword {
    /// 前缀匹配的关键字
    pub fn prefix(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matching: KeywordMatch::Prefix,
        }
    }

    /// 完全匹配的关键字
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matching: KeywordMatch::Exact,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 输入是否选中此关键字
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() {
            return false;
        }
        match self.matching {
            KeywordMatch::Exact => self.name.eq_ignore_ascii_case(input),
            KeywordMatch::Prefix => self
                .name
                .to_lowercase()
                .starts_with(&input.to_lowercase()),
        }
    }
}

/// 一次请求可用的关键字集合
///
/// 至多一个默认关键字，回车时选中。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
    default: Option<usize>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加关键字；同名关键字只保留第一个
    pub fn add(&mut self, keyword: Keyword) -> usize {
        if let Some(index) = self.position(keyword.name()) {
            return index;
        }
        self.keywords.push(keyword);
        self.keywords.len() - 1
    }

    /// 添加并设为默认关键字，替换之前的默认值
    pub fn add_default(&mut self, keyword: Keyword) {
        let index = self.add(keyword);
        self.default = Some(index);
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.keywords
            .iter()
            .position(|k| k.name.eq_ignore_ascii_case(name))
    }

    /// 解析文本输入
    ///
    /// 先按名称完全匹配，再按注册顺序尝试前缀匹配。
    pub fn resolve(&self, input: &str) -> Option<&Keyword> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(index) = self.position(input) {
            return self.keywords.get(index);
        }
        self.keywords.iter().find(|k| k.matches(input))
    }

    /// 按名称查找（用于输入层直接送来的关键字）
    pub fn find(&self, name: &str) -> Option<&Keyword> {
        self.position(name).and_then(|index| self.keywords.get(index))
    }

    pub fn default_keyword(&self) -> Option<&Keyword> {
        self.default.and_then(|index| self.keywords.get(index))
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }
}

impl fmt::Display for KeywordSet {
    /// 形如 `[Close/End] <End>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keywords.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = self.keywords.iter().map(|k| k.name()).collect();
        write!(f, "[{}]", names.join("/"))?;
        if let Some(default) = self.default_keyword() {
            write!(f, " <{}>", default.name())?;
        }
        Ok(())
    }
}

/// 数值可接受范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatOptions {
    pub allow_negative: bool,
    pub allow_zero: bool,
}

impl FloatOptions {
    /// 任意数值
    pub const ANY: Self = Self {
        allow_negative: true,
        allow_zero: true,
    };

    /// 非负数
    pub const NON_NEGATIVE: Self = Self {
        allow_negative: false,
        allow_zero: true,
    };

    /// 正数
    pub const POSITIVE: Self = Self {
        allow_negative: false,
        allow_zero: false,
    };

    pub fn admits(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        if !self.allow_zero && value.abs() < EPSILON {
            return false;
        }
        if !self.allow_negative && value < 0.0 {
            return false;
        }
        true
    }
}

impl Default for FloatOptions {
    fn default() -> Self {
        Self::ANY
    }
}

/// 请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Point,
    Distance,
    Angle,
    /// 矩形的对角点
    Corner,
    Text,
    Float,
    Selection,
}

/// 请求在协调器内部流转的值
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Point(Point2),
    Number(f64),
    Text(String),
    Selection(Vec<EntityId>),
}

/// 可以作为请求结果的类型
pub trait RequestValue: Sized + 'static {
    fn from_raw(raw: &RawValue) -> Option<Self>;
}

impl RequestValue for Point2 {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::Point(p) => Some(*p),
            _ => None,
        }
    }
}

impl RequestValue for f64 {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl RequestValue for String {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl RequestValue for Vec<EntityId> {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::Selection(ids) => Some(ids.clone()),
            _ => None,
        }
    }
}

pub(crate) type UpdateCallback<T> = Box<dyn FnMut(&T)>;

/// 一次输入请求
pub struct InputRequest<T> {
    pub(crate) kind: RequestKind,
    pub(crate) prompt: String,
    pub(crate) base_point: Option<Point2>,
    pub(crate) keywords: KeywordSet,
    pub(crate) options: FloatOptions,
    pub(crate) on_update: Option<UpdateCallback<T>>,
}

impl<T> InputRequest<T> {
    fn with_kind(kind: RequestKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            base_point: None,
            keywords: KeywordSet::new(),
            options: FloatOptions::ANY,
            on_update: None,
        }
    }

    pub fn base_point(mut self, point: Point2) -> Self {
        self.base_point = Some(point);
        self
    }

    pub fn keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.add(keyword);
        self
    }

    pub fn default_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.add_default(keyword);
        self
    }

    pub fn options(mut self, options: FloatOptions) -> Self {
        self.options = options;
        self
    }

    /// 预览回调，每次临时输入调用一次
    pub fn on_update(mut self, callback: impl FnMut(&T) + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn base(&self) -> Option<Point2> {
        self.base_point
    }
}

impl InputRequest<Point2> {
    pub fn point(prompt: impl Into<String>) -> Self {
        Self::with_kind(RequestKind::Point, prompt)
    }

    /// 以 `first` 为对角的第二个角点
    pub fn corner(prompt: impl Into<String>, first: Point2) -> Self {
        Self::with_kind(RequestKind::Corner, prompt).base_point(first)
    }
}

impl InputRequest<f64> {
    /// 距离；指针位置换算为到基点的距离
    pub fn distance(prompt: impl Into<String>, base: Option<Point2>) -> Self {
        let mut request =
            Self::with_kind(RequestKind::Distance, prompt).options(FloatOptions::NON_NEGATIVE);
        request.base_point = base;
        request
    }

    /// 角度（弧度）；指针位置换算为基点到该点的方向
    pub fn angle(prompt: impl Into<String>, base: Option<Point2>) -> Self {
        let mut request = Self::with_kind(RequestKind::Angle, prompt);
        request.base_point = base;
        request
    }

    pub fn float(prompt: impl Into<String>, options: FloatOptions) -> Self {
        Self::with_kind(RequestKind::Float, prompt).options(options)
    }
}

impl InputRequest<String> {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self::with_kind(RequestKind::Text, prompt)
    }
}

impl InputRequest<Vec<EntityId>> {
    pub fn selection(prompt: impl Into<String>) -> Self {
        Self::with_kind(RequestKind::Selection, prompt)
    }
}

impl<T> fmt::Debug for InputRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputRequest")
            .field("kind", &self.kind)
            .field("prompt", &self.prompt)
            .field("base_point", &self.base_point)
            .field("keywords", &self.keywords)
            .field("options", &self.options)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

/// 请求结果
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome<T> {
    Accepted(T),
    Cancelled,
    /// 选中的关键字（规范名称）
    KeywordChosen(String),
}

impl<T> InputOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InputOutcome::Cancelled)
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            InputOutcome::Accepted(value) => Some(value),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Option<&str> {
        match self {
            InputOutcome::KeywordChosen(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_keyword(&self, name: &str) -> bool {
        self.keyword()
            .is_some_and(|chosen| chosen.eq_ignore_ascii_case(name))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> InputOutcome<U> {
        match self {
            InputOutcome::Accepted(value) => InputOutcome::Accepted(f(value)),
            InputOutcome::Cancelled => InputOutcome::Cancelled,
            InputOutcome::KeywordChosen(name) => InputOutcome::KeywordChosen(name),
        }
    }
}
