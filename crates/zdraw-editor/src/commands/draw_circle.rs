//! 圆命令
//!
//! 圆心 + 半径，或通过 Diameter 选项输入直径。

use crate::command::{CommandContext, CommandStatus};
use crate::input::{FloatOptions, InputOutcome, Keyword};
use zdraw_core::geometry::{Circle, Geometry};

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let InputOutcome::Accepted(center) = ctx.input.request_point("指定圆心").await else {
        return CommandStatus::Cancelled;
    };

    let mut scope = ctx.jig.scope();
    let circle = scope.add(Circle::new(center, 0.0));

    let preview = circle.clone();
    let outcome = ctx
        .input
        .request_distance("指定圆的半径")
        .base_point(center)
        .options(FloatOptions::POSITIVE)
        .keyword(Keyword::prefix("Diameter"))
        .on_update(move |r| preview.borrow_mut().radius = *r)
        .await;

    let radius = match outcome {
        InputOutcome::Accepted(r) => r,
        InputOutcome::KeywordChosen(_) => {
            let preview = circle.clone();
            let diameter = ctx
                .input
                .request_distance("指定圆的直径")
                .base_point(center)
                .options(FloatOptions::POSITIVE)
                .on_update(move |d| preview.borrow_mut().radius = *d * 0.5)
                .await;
            match diameter {
                InputOutcome::Accepted(d) => d * 0.5,
                _ => return CommandStatus::Cancelled,
            }
        }
        InputOutcome::Cancelled => return CommandStatus::Cancelled,
    };
    drop(scope);

    ctx.commit(vec![Geometry::Circle(Circle::new(center, radius))]);
    CommandStatus::Committed
}
