//! ZDraw 交互命令引擎
//!
//! 命令是可挂起的 `async` 过程：每次需要一个点、距离、角度、文本或选择时，
//! 通过 [`InputCoordinator`] 挂起，恢复后拿到 [`InputOutcome`]。挂起期间指针移动会调用
//! 预览回调更新 [`Jig`] 中的临时几何。[`Editor`] 负责启动命令并分发输入事件。
//!
//! # 示例
//!
//! ```rust
//! use zdraw_core::math::Point2;
//! use zdraw_editor::{CommandState, Editor, InputEvent};
//!
//! let mut editor = Editor::default();
//! editor.run_command("LINE").unwrap();
//! editor.handle_event(InputEvent::Click(Point2::new(0.0, 0.0)));
//! let state = editor.handle_event(InputEvent::Text("@10,0".into()));
//! assert_eq!(state, CommandState::Committed);
//! assert_eq!(editor.document().len(), 1);
//! ```

pub mod command;
pub mod command_registry;
pub mod commands;
pub mod coordinator;
pub mod editor;
pub mod error;
pub mod input;
pub mod jig;
pub mod selection;
pub mod settings;
pub mod viewport;

pub use command::{CommandContext, CommandFn, CommandState, CommandStatus, TransformPreview};
pub use command_registry::{CommandKind, CommandRegistry};
pub use coordinator::{InputCoordinator, PendingInput, RequestFuture};
pub use editor::Editor;
pub use error::EditorError;
pub use input::{FloatOptions, InputEvent, InputOutcome, InputRequest, Keyword, KeywordMatch, KeywordSet, RequestKind};
pub use jig::{Jig, JigEvent, JigScope, SharedDrawable};
pub use selection::{PickedSelection, SelectionEvent, SharedSelection};
pub use settings::Settings;
pub use viewport::Viewport;
