//! 窗口选择命令
//!
//! 从左向右拉出的窗口只选中完全位于窗口内的对象，从右向左拉出的窗口选中所有与之相交的对象。
//! 结果并入拾取集。

use crate::command::{CommandContext, CommandStatus};
use crate::input::InputOutcome;
use zdraw_core::document::WindowMode;
use zdraw_core::geometry::Polyline;
use zdraw_core::math::{BoundingBox2, Point2};

/// 由两个角点的先后顺序决定选择模式
pub fn window_mode(first: Point2, second: Point2) -> WindowMode {
    if second.x >= first.x {
        WindowMode::Inside
    } else {
        WindowMode::Crossing
    }
}

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let InputOutcome::Accepted(first) = ctx.input.request_point("指定第一个角点").await else {
        return CommandStatus::Cancelled;
    };

    let mut scope = ctx.jig.scope();
    let frame = scope.add(Polyline::from_points([first; 4], true));
    let preview = frame.clone();
    let outcome = ctx
        .input
        .request_corner("指定对角点", first)
        .on_update(move |p| {
            *preview.borrow_mut() = Polyline::from_points(BoundingBox2::new(first, *p).corners(), true);
        })
        .await;
    let InputOutcome::Accepted(second) = outcome else {
        return CommandStatus::Cancelled;
    };
    drop(scope);

    let mode = window_mode(first, second);
    let found = ctx
        .document
        .borrow()
        .query_window(&BoundingBox2::new(first, second), mode);
    let added = ctx.selection.borrow_mut().extend(found.iter().copied());
    ctx.flush_events();
    tracing::info!("{:?} selection found {} entities, {} new", mode, found.len(), added);
    CommandStatus::Committed
}
