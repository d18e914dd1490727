//! 命令协议
//!
//! 每个命令都是一个 `async fn(CommandContext) -> CommandStatus`：
//! 收集输入期间处于 Gathering，最后要么一次性提交到文档，要么取消。
//! 不论哪种结局，命令放进 Jig 的预览对象都必须在返回前移除。

use crate::coordinator::InputCoordinator;
use crate::input::InputOutcome;
use crate::jig::{Jig, JigScope};
use crate::selection::{PickedSelection, SharedSelection};
use crate::settings::Settings;
use crate::viewport::Viewport;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use zdraw_core::document::Document;
use zdraw_core::drawable::{Composite, Drawable};
use zdraw_core::entity::EntityId;
use zdraw_core::geometry::Geometry;
use zdraw_core::math::BoundingBox2;
use zdraw_core::transform::Transform2D;

/// 命令的最终结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Committed,
    Cancelled,
}

/// 命令运行器对外报告的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    /// 没有命令在运行
    #[default]
    Idle,
    /// 命令挂起，等待输入
    Gathering,
    Committed,
    Cancelled,
}

impl From<CommandStatus> for CommandState {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Committed => CommandState::Committed,
            CommandStatus::Cancelled => CommandState::Cancelled,
        }
    }
}

/// 运行中的命令
pub type CommandFuture = LocalBoxFuture<'static, CommandStatus>;

/// 命令入口
pub type CommandFn = fn(CommandContext) -> CommandFuture;

/// 命令可以访问的全部编辑器状态
///
/// 各字段都是共享句柄，命令持有自己的一份克隆。
/// 不要跨 `.await` 持有 `document` 等 `RefCell` 的借用。
#[derive(Clone)]
pub struct CommandContext {
    pub input: InputCoordinator,
    pub document: Rc<RefCell<Document>>,
    pub jig: Jig,
    pub selection: SharedSelection,
    pub viewport: Rc<RefCell<Viewport>>,
    pub settings: Rc<Settings>,
}

impl CommandContext {
    pub fn new(settings: Settings) -> Self {
        let jig = Jig::new();
        let selection = PickedSelection::shared();
        Self {
            input: InputCoordinator::new(jig.clone(), selection.clone()),
            document: Rc::new(RefCell::new(Document::new())),
            jig,
            selection,
            viewport: Rc::new(RefCell::new(Viewport::default())),
            settings: Rc::new(settings),
        }
    }

    /// 把完成的图元写入文档
    pub fn commit(&self, geometries: Vec<Geometry>) -> Vec<EntityId> {
        let ids = self.document.borrow_mut().add_all(geometries);
        self.flush_events();
        tracing::info!("Committed {} entities", ids.len());
        ids
    }

    /// 分发文档和拾取集里排队的变更事件
    ///
    /// 调用时不能持有二者的借用。
    pub fn flush_events(&self) {
        let document_events = self.document.borrow().events();
        document_events.flush();
        let selection_events = self.selection.borrow().events();
        selection_events.flush();
    }

    /// 拾取集中仍存在于文档的实体
    pub fn existing_selection(&self) -> Vec<EntityId> {
        let document = self.document.borrow();
        self.selection
            .borrow()
            .ids()
            .iter()
            .copied()
            .filter(|id| document.contains(*id))
            .collect()
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("input", &self.input)
            .field("entities", &self.document.borrow().len())
            .field("jig", &self.jig)
            .field("selection", &self.selection.borrow().ids())
            .finish()
    }
}

/// 取得要编辑的对象：有预选时直接使用，否则请求选择
pub async fn acquire_selection(ctx: &CommandContext, prompt: &str) -> Option<Vec<EntityId>> {
    let preselected = ctx.existing_selection();
    if !preselected.is_empty() {
        tracing::debug!("Using {} preselected entities", preselected.len());
        return Some(preselected);
    }

    match ctx.input.request_selection(prompt).await {
        InputOutcome::Accepted(ids) => {
            let document = ctx.document.borrow();
            let ids: Vec<EntityId> = ids.into_iter().filter(|id| document.contains(*id)).collect();
            if ids.is_empty() {
                tracing::info!("Nothing selected");
                None
            } else {
                Some(ids)
            }
        }
        _ => None,
    }
}

/// 变换类命令的预览
///
/// 把选中对象的副本组合成一个 [`Composite`] 放进 Jig。每次更新只对副本施加
/// `目标变换 * 已施加变换的逆` 这一增量，原对象在提交前保持不变。
#[derive(Clone)]
pub struct TransformPreview {
    composite: Rc<RefCell<Composite>>,
    applied: Rc<Cell<Transform2D>>,
}

impl TransformPreview {
    pub fn new(scope: &mut JigScope, geometries: &[Geometry]) -> Self {
        let composite = scope.add(Composite::from_geometries(geometries));
        Self {
            composite,
            applied: Rc::new(Cell::new(Transform2D::identity())),
        }
    }

    /// 把预览推进到 `target` 表示的绝对变换
    pub fn update(&self, target: &Transform2D) {
        let delta = target * &self.applied.get().inverse();
        self.composite.borrow_mut().transform_by(&delta);
        self.applied.set(*target);
    }

    /// 目前累计施加的绝对变换
    pub fn applied(&self) -> Transform2D {
        self.applied.get()
    }

    pub fn extents(&self) -> BoundingBox2 {
        self.composite.borrow().extents()
    }

    /// 预览副本当前的几何
    pub fn geometries(&self) -> Vec<Geometry> {
        self.composite
            .borrow()
            .iter()
            .filter_map(|item| item.to_geometry())
            .collect()
    }
}

/// 按同一变换生成副本
pub fn transformed_copies(geometries: &[Geometry], transform: &Transform2D) -> Vec<Geometry> {
    geometries
        .iter()
        .map(|g| {
            let mut copy = g.clone();
            copy.transform(transform);
            copy
        })
        .collect()
}

/// 把变换应用到原对象或其副本
///
/// `as_copy` 为真时写入变换后的副本，原对象不变。
pub fn apply_transform(
    ctx: &CommandContext,
    ids: &[EntityId],
    transform: &Transform2D,
    as_copy: bool,
) -> CommandStatus {
    if as_copy {
        let copies = transformed_copies(&ctx.document.borrow().geometries_of(ids), transform);
        ctx.commit(copies);
        return CommandStatus::Committed;
    }
    let result = ctx.document.borrow_mut().transform_entities(ids, transform);
    ctx.flush_events();
    match result {
        Ok(()) => {
            tracing::info!("Transformed {} entities", ids.len());
            CommandStatus::Committed
        }
        Err(err) => {
            tracing::warn!("Transform failed: {}", err);
            CommandStatus::Cancelled
        }
    }
}
