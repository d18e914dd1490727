//! 缩放视图命令
//!
//! Extents（默认）：全部对象；Window：两个角点；Object：选中的对象。

use crate::command::{acquire_selection, CommandContext, CommandStatus};
use crate::input::{InputOutcome, Keyword};
use zdraw_core::math::{BoundingBox2, Point2};

async fn window_from(ctx: &CommandContext, first: Point2) -> Option<BoundingBox2> {
    match ctx.input.request_corner("指定对角点", first).await {
        InputOutcome::Accepted(second) => Some(BoundingBox2::new(first, second)),
        _ => None,
    }
}

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let outcome = ctx
        .input
        .request_point("指定窗口的角点")
        .keyword(Keyword::prefix("Window"))
        .keyword(Keyword::prefix("Object"))
        .default_keyword(Keyword::prefix("Extents"))
        .await;

    let target = match outcome {
        InputOutcome::Accepted(first) => window_from(&ctx, first).await,
        InputOutcome::KeywordChosen(keyword) => match keyword.as_str() {
            "Window" => match ctx.input.request_point("指定第一个角点").await {
                InputOutcome::Accepted(first) => window_from(&ctx, first).await,
                _ => None,
            },
            "Object" => acquire_selection(&ctx, "选择对象")
                .await
                .map(|ids| ctx.document.borrow().extents_of(&ids)),
            _ => Some(ctx.document.borrow().extents()),
        },
        InputOutcome::Cancelled => None,
    };

    let Some(extents) = target else {
        return CommandStatus::Cancelled;
    };
    let margin = ctx.settings.zoom_margin;
    if ctx.viewport.borrow_mut().zoom_to(&extents, margin) {
        CommandStatus::Committed
    } else {
        tracing::info!("Nothing to zoom to");
        CommandStatus::Cancelled
    }
}
