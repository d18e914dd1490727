//! 填充命令
//!
//! 逐点输入边界（总是闭合），再选择图案；回车使用设置中的默认图案。

use super::collect_vertices;
use crate::command::{CommandContext, CommandStatus};
use crate::input::InputOutcome;
use zdraw_core::geometry::{Geometry, Hatch};
use zdraw_core::math::EPSILON;

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let Some(vertices) = collect_vertices(&ctx, "指定边界起点").await else {
        return CommandStatus::Cancelled;
    };
    if vertices.points.len() < 3 {
        tracing::info!("Hatch boundary needs at least three vertices");
        return CommandStatus::Cancelled;
    }

    let default_pattern = ctx.settings.hatch_pattern.clone();
    let prompt = format!("输入图案名称 <{}>", default_pattern);
    let pattern = match ctx.input.request_text(prompt).await {
        InputOutcome::Accepted(name) if name.is_empty() => default_pattern,
        InputOutcome::Accepted(name) => name.to_uppercase(),
        _ => return CommandStatus::Cancelled,
    };

    let hatch = Hatch::new(vertices.points, pattern);
    if hatch.area() < EPSILON {
        tracing::warn!("Hatch boundary encloses no area");
        return CommandStatus::Cancelled;
    }
    ctx.commit(vec![Geometry::Hatch(hatch)]);
    CommandStatus::Committed
}
