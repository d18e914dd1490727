//! 旋转命令
//!
//! 选择对象 → 基点 → 旋转角度。Copy 选项切换为保留原对象。

use crate::command::{acquire_selection, apply_transform, CommandContext, CommandStatus, TransformPreview};
use crate::input::{InputOutcome, Keyword};
use zdraw_core::transform::Transform2D;

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let Some(ids) = acquire_selection(&ctx, "选择要旋转的对象").await else {
        return CommandStatus::Cancelled;
    };
    let InputOutcome::Accepted(base) = ctx.input.request_point("指定基点").await else {
        return CommandStatus::Cancelled;
    };

    let geometries = ctx.document.borrow().geometries_of(&ids);
    let mut scope = ctx.jig.scope();
    let preview = TransformPreview::new(&mut scope, &geometries);
    let mut as_copy = false;

    loop {
        let ghost = preview.clone();
        let outcome = ctx
            .input
            .request_angle("指定旋转角度")
            .base_point(base)
            .keyword(Keyword::prefix("Copy"))
            .on_update(move |angle| ghost.update(&Transform2D::rotation_about(*angle, &base)))
            .await;
        match outcome {
            InputOutcome::Accepted(angle) => {
                drop(scope);
                return apply_transform(&ctx, &ids, &Transform2D::rotation_about(angle, &base), as_copy);
            }
            InputOutcome::KeywordChosen(_) => {
                as_copy = !as_copy;
                tracing::info!("Rotate copy mode: {}", as_copy);
            }
            InputOutcome::Cancelled => return CommandStatus::Cancelled,
        }
    }
}
