//! 命令运行器
//!
//! 同一时刻只运行一个命令。每次送入事件后轮询命令 future，
//! 命令在下一个输入请求处再次挂起，或者结束。

use crate::command::{CommandContext, CommandFn, CommandFuture, CommandState};
use crate::command_registry::CommandRegistry;
use crate::error::EditorError;
use crate::input::InputEvent;
use crate::selection::PickedSelection;
use crate::settings::Settings;
use crate::viewport::Viewport;
use std::cell::Ref;
use std::fmt;
use std::future::Future;
use std::task::{Context, Poll};
use zdraw_core::document::{Document, WindowMode};
use zdraw_core::entity::EntityId;
use zdraw_core::math::{BoundingBox2, Point2};

struct ActiveCommand {
    name: String,
    future: CommandFuture,
}

pub struct Editor {
    ctx: CommandContext,
    registry: CommandRegistry,
    active: Option<ActiveCommand>,
    last_command: Option<String>,
    state: CommandState,
}

impl Editor {
    pub fn new(settings: Settings) -> Self {
        Self {
            ctx: CommandContext::new(settings),
            registry: CommandRegistry::new(),
            active: None,
            last_command: None,
            state: CommandState::Idle,
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.ctx.document.borrow()
    }

    pub fn selection(&self) -> Ref<'_, PickedSelection> {
        self.ctx.selection.borrow()
    }

    pub fn viewport(&self) -> Viewport {
        *self.ctx.viewport.borrow()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// 最近一次报告的状态
    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_command(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    /// 当前提示
    pub fn prompt(&self) -> String {
        match self.ctx.input.prompt() {
            Some(prompt) => prompt,
            None => "命令:".to_string(),
        }
    }

    /// 按名称、快捷键或别名启动命令
    pub fn run_command(&mut self, name: &str) -> Result<CommandState, EditorError> {
        let kind = self
            .registry
            .lookup(name)
            .ok_or_else(|| EditorError::UnknownCommand(name.trim().to_string()))?;
        let full_name = self
            .registry
            .command_name(kind)
            .unwrap_or(kind.name())
            .to_string();
        self.start(full_name, kind.runner())
    }

    /// 启动任意命令入口
    pub fn start(&mut self, name: impl Into<String>, command: CommandFn) -> Result<CommandState, EditorError> {
        let name = name.into();
        if let Some(active) = &self.active {
            tracing::warn!("Cannot start {} while {} is running", name, active.name);
            return Err(EditorError::CommandActive(active.name.clone()));
        }

        tracing::info!("Command {} started", name);
        self.last_command = Some(name.clone());
        self.active = Some(ActiveCommand {
            name,
            future: command(self.ctx.clone()),
        });
        Ok(self.poll_active())
    }

    /// 送入一个输入事件
    ///
    /// 空闲时：文本视为命令名，回车重复上一个命令，Esc 清空拾取集。
    pub fn handle_event(&mut self, event: InputEvent) -> CommandState {
        if self.active.is_none() {
            return self.handle_idle(event);
        }
        if self.ctx.input.deliver(&event) {
            self.poll_active()
        } else {
            self.state
        }
    }

    /// 取消当前命令
    pub fn cancel(&mut self) -> CommandState {
        self.handle_event(InputEvent::Escape)
    }

    /// 拾取框内的实体（与拾取框相交即可）
    pub fn pick_at(&self, point: Point2) -> Vec<EntityId> {
        let half = self.ctx.settings.pick_box;
        let window = BoundingBox2::new(
            Point2::new(point.x - half, point.y - half),
            Point2::new(point.x + half, point.y + half),
        );
        self.ctx.document.borrow().query_window(&window, WindowMode::Crossing)
    }

    fn handle_idle(&mut self, event: InputEvent) -> CommandState {
        match event {
            InputEvent::Text(text) if !text.trim().is_empty() => match self.run_command(&text) {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!("{}", err);
                    self.state
                }
            },
            InputEvent::Text(_) | InputEvent::Enter => match self.last_command.clone() {
                Some(name) => match self.run_command(&name) {
                    Ok(state) => state,
                    Err(err) => {
                        tracing::warn!("{}", err);
                        self.state
                    }
                },
                None => self.state,
            },
            InputEvent::Escape => {
                self.ctx.selection.borrow_mut().clear();
                self.ctx.flush_events();
                self.state
            }
            other => {
                // 拾取和指针位置照常记录
                self.ctx.input.deliver(&other);
                self.state
            }
        }
    }

    fn poll_active(&mut self) -> CommandState {
        let Some(active) = self.active.as_mut() else {
            return self.state;
        };

        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        match active.future.as_mut().poll(&mut cx) {
            Poll::Pending => {
                if !self.ctx.input.is_waiting() {
                    tracing::error!("Command {} suspended without an input request", active.name);
                }
                self.state = CommandState::Gathering;
            }
            Poll::Ready(status) => {
                let name = active.name.clone();
                self.active = None;
                if !self.ctx.jig.is_empty() {
                    tracing::error!(
                        "Command {} left {} items in the jig",
                        name,
                        self.ctx.jig.len()
                    );
                    self.ctx.jig.clear();
                }
                self.ctx
                    .selection
                    .borrow_mut()
                    .retain_existing(&self.ctx.document.borrow());
                tracing::info!("Command {} finished: {:?}", name, status);
                self.state = status.into();
            }
        }
        self.ctx.flush_events();
        self.state
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("active", &self.active_command())
            .field("last_command", &self.last_command)
            .field("state", &self.state)
            .field("ctx", &self.ctx)
            .finish()
    }
}
