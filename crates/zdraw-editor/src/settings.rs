//! 编辑器设置
//!
//! JSON 文件，缺失的字段取默认值。

use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// TEXT 命令的默认字高
    pub text_height: f64,
    /// HATCH 命令的默认图案
    pub hatch_pattern: String,
    /// 缩放时四周留白，占视图尺寸的比例
    pub zoom_margin: f64,
    /// 拾取框半宽（世界单位）
    pub pick_box: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_height: 2.5,
            hatch_pattern: "ANSI31".to_string(),
            zoom_margin: 0.05,
            pick_box: 0.5,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&content)?;
        tracing::debug!("Settings loaded from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn from_json(content: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
