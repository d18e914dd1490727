//! 输入事件脚本
//!
//! 每行一条指令，`#` 开头为注释：
//!
//! ```text
//! command LINE
//! click 0,0
//! move 3,4
//! text @10,0
//! keyword Close
//! pick 1 2
//! pickat 5,5
//! enter
//! escape
//! ```

use anyhow::{anyhow, bail, Context, Result};
use zdraw_core::entity::EntityId;
use zdraw_core::input_parser::InputParser;
use zdraw_core::math::Point2;
use zdraw_editor::InputEvent;

/// 脚本中的一步
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// 按名称启动命令
    Command(String),
    /// 直接送入的输入事件
    Event(InputEvent),
    /// 用拾取框在该点拾取
    PickAt(Point2),
}

fn parse_point(text: &str) -> Result<Point2> {
    InputParser::parse_point(text, None).map_err(|e| anyhow!("{}", e))
}

fn parse_line(line: &str) -> Result<Option<Step>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let step = match verb.to_lowercase().as_str() {
        "command" | "cmd" => {
            if rest.is_empty() {
                bail!("missing command name");
            }
            Step::Command(rest.to_string())
        }
        "click" => Step::Event(InputEvent::Click(parse_point(rest)?)),
        "move" => Step::Event(InputEvent::PointerMove(parse_point(rest)?)),
        "text" => Step::Event(InputEvent::Text(rest.to_string())),
        "keyword" => Step::Event(InputEvent::Keyword(rest.to_string())),
        "pick" => {
            let ids = rest
                .split_whitespace()
                .map(|s| s.trim_start_matches('#').parse::<u64>().map(EntityId))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("invalid entity id list: {}", rest))?;
            Step::Event(InputEvent::Pick(ids))
        }
        "pickat" => Step::PickAt(parse_point(rest)?),
        "enter" => Step::Event(InputEvent::Enter),
        "escape" | "esc" => Step::Event(InputEvent::Escape),
        other => bail!("unknown directive: {}", other),
    };
    Ok(Some(step))
}

/// 解析整个脚本
pub fn parse(source: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let step = parse_line(line).with_context(|| format!("line {}: {}", index + 1, line.trim()))?;
        steps.extend(step);
    }
    Ok(steps)
}
