//! 命令引擎错误定义

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Command already active: {0}")]
    CommandActive(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
