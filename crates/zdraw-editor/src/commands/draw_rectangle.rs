//! 矩形命令
//!
//! 两个对角点确定矩形，结果是闭合的四顶点多段线。

use crate::command::{CommandContext, CommandStatus};
use crate::input::InputOutcome;
use zdraw_core::geometry::{Geometry, Polyline};
use zdraw_core::math::{BoundingBox2, Point2, EPSILON};

fn rectangle(a: Point2, b: Point2) -> Polyline {
    Polyline::from_points(BoundingBox2::new(a, b).corners(), true)
}

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let InputOutcome::Accepted(first) = ctx.input.request_point("指定第一个角点").await else {
        return CommandStatus::Cancelled;
    };

    let mut scope = ctx.jig.scope();
    let outline = scope.add(rectangle(first, first));
    let preview = outline.clone();
    let outcome = ctx
        .input
        .request_corner("指定另一个角点", first)
        .on_update(move |p| *preview.borrow_mut() = rectangle(first, *p))
        .await;
    let InputOutcome::Accepted(second) = outcome else {
        return CommandStatus::Cancelled;
    };
    drop(scope);

    if (second.x - first.x).abs() < EPSILON || (second.y - first.y).abs() < EPSILON {
        tracing::warn!("Rectangle has zero width or height");
        return CommandStatus::Cancelled;
    }

    ctx.commit(vec![Geometry::Polyline(rectangle(first, second))]);
    CommandStatus::Committed
}
