//! 点命令

use crate::command::{CommandContext, CommandStatus};
use crate::input::InputOutcome;
use zdraw_core::geometry::{Geometry, Point};

pub async fn run(ctx: CommandContext) -> CommandStatus {
    match ctx.input.request_point("指定点").await {
        InputOutcome::Accepted(p) => {
            ctx.commit(vec![Geometry::Point(Point::from_point2(p))]);
            CommandStatus::Committed
        }
        _ => CommandStatus::Cancelled,
    }
}
