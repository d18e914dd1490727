//! 多段线命令
//!
//! 连续输入顶点，Close 闭合、End（回车）结束、Undo 撤回上一个顶点。

use super::collect_vertices;
use crate::command::{CommandContext, CommandStatus};
use zdraw_core::geometry::{Geometry, Polyline};

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let Some(vertices) = collect_vertices(&ctx, "指定起点").await else {
        return CommandStatus::Cancelled;
    };
    ctx.commit(vec![Geometry::Polyline(Polyline::from_points(
        vertices.points,
        vertices.closed,
    ))]);
    CommandStatus::Committed
}
