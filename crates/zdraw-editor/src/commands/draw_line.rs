//! 直线命令

use crate::command::{CommandContext, CommandStatus};
use crate::input::InputOutcome;
use zdraw_core::geometry::{Geometry, Line};

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let InputOutcome::Accepted(start) = ctx.input.request_point("指定第一点").await else {
        return CommandStatus::Cancelled;
    };

    let mut scope = ctx.jig.scope();
    let rubber = scope.add(Line::new(start, start));
    let preview = rubber.clone();
    let outcome = ctx
        .input
        .request_point("指定下一点")
        .base_point(start)
        .on_update(move |p| preview.borrow_mut().end = *p)
        .await;

    let InputOutcome::Accepted(end) = outcome else {
        return CommandStatus::Cancelled;
    };
    drop(scope);

    ctx.commit(vec![Geometry::Line(Line::new(start, end))]);
    CommandStatus::Committed
}
