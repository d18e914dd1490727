//! 三点圆弧命令

use crate::command::{CommandContext, CommandStatus};
use crate::input::InputOutcome;
use zdraw_core::geometry::{Arc, Geometry, Line, Polyline};

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let InputOutcome::Accepted(start) = ctx.input.request_point("指定圆弧的起点").await else {
        return CommandStatus::Cancelled;
    };

    let mut scope = ctx.jig.scope();
    let chord = scope.add(Line::new(start, start));
    let preview = chord.clone();
    let outcome = ctx
        .input
        .request_point("指定圆弧的第二个点")
        .base_point(start)
        .on_update(move |p| preview.borrow_mut().end = *p)
        .await;
    let InputOutcome::Accepted(middle) = outcome else {
        return CommandStatus::Cancelled;
    };
    scope.clear();

    // 三点共线时退化为折线预览
    let fallback = scope.add(Polyline::from_points([start, middle], false));
    let arc = scope.add(Arc::new(start, 0.0, 0.0, 0.0));
    let (preview_arc, preview_line) = (arc.clone(), fallback.clone());
    let outcome = ctx
        .input
        .request_point("指定圆弧的端点")
        .base_point(middle)
        .on_update(move |p| match Arc::from_three_points(start, middle, *p) {
            Some(candidate) => {
                *preview_arc.borrow_mut() = candidate;
                *preview_line.borrow_mut() = Polyline::from_points([start], false);
            }
            None => {
                *preview_arc.borrow_mut() = Arc::new(start, 0.0, 0.0, 0.0);
                *preview_line.borrow_mut() = Polyline::from_points([start, middle, *p], false);
            }
        })
        .await;
    let InputOutcome::Accepted(end) = outcome else {
        return CommandStatus::Cancelled;
    };
    drop(scope);

    match Arc::from_three_points(start, middle, end) {
        Some(arc) => {
            ctx.commit(vec![Geometry::Arc(arc)]);
            CommandStatus::Committed
        }
        None => {
            tracing::warn!("Arc points are collinear");
            CommandStatus::Cancelled
        }
    }
}
