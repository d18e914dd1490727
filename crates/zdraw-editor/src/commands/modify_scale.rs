//! 缩放命令
//!
//! 选择对象 → 基点 → 比例因子（指针到基点的距离，或直接输入）。Copy 选项切换为保留原对象。

use crate::command::{acquire_selection, apply_transform, CommandContext, CommandStatus, TransformPreview};
use crate::input::{FloatOptions, InputOutcome, Keyword};
use zdraw_core::math::EPSILON;
use zdraw_core::transform::Transform2D;

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let Some(ids) = acquire_selection(&ctx, "选择要缩放的对象").await else {
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
            .request_distance("指定比例因子")
            .base_point(base)
            .options(FloatOptions::POSITIVE)
            .keyword(Keyword::prefix("Copy"))
            .on_update(move |factor| {
                // 因子趋近零时变换不可逆，跳过这一帧
                if *factor > EPSILON {
                    ghost.update(&Transform2D::scale_about(*factor, *factor, &base));
                }
            })
            .await;
        match outcome {
            InputOutcome::Accepted(factor) if factor > EPSILON => {
                drop(scope);
                let transform = Transform2D::scale_about(factor, factor, &base);
                return apply_transform(&ctx, &ids, &transform, as_copy);
            }
            InputOutcome::Accepted(_) => {
                tracing::warn!("Scale factor must be positive");
                return CommandStatus::Cancelled;
            }
            InputOutcome::KeywordChosen(_) => {
                as_copy = !as_copy;
                tracing::info!("Scale copy mode: {}", as_copy);
            }
            InputOutcome::Cancelled => return CommandStatus::Cancelled,
        }
    }
}
