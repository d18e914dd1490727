//! 镜像命令
//!
//! 选择对象 → 镜像线第一点 → 第二点 → 是否删除源对象。
//! 删除源对象等价于对原对象原地镜像，否则写入镜像后的副本。

use crate::command::{acquire_selection, apply_transform, CommandContext, CommandStatus, TransformPreview};
use crate::input::{InputOutcome, Keyword};
use zdraw_core::geometry::Line;
use zdraw_core::math::EPSILON;
use zdraw_core::transform::Transform2D;

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let Some(ids) = acquire_selection(&ctx, "选择要镜像的对象").await else {
        return CommandStatus::Cancelled;
    };
    let InputOutcome::Accepted(first) = ctx.input.request_point("指定镜像线的第一点").await else {
        return CommandStatus::Cancelled;
    };

    let geometries = ctx.document.borrow().geometries_of(&ids);
    let mut scope = ctx.jig.scope();
    let preview = TransformPreview::new(&mut scope, &geometries);
    let axis = scope.add(Line::new(first, first));

    let (ghost, rubber) = (preview.clone(), axis.clone());
    let outcome = ctx
        .input
        .request_point("指定镜像线的第二点")
        .base_point(first)
        .on_update(move |p| {
            rubber.borrow_mut().end = *p;
            let direction = p - first;
            if direction.norm() > EPSILON {
                ghost.update(&Transform2D::mirror(&first, &direction));
            }
        })
        .await;
    let InputOutcome::Accepted(second) = outcome else {
        return CommandStatus::Cancelled;
    };
    let direction = second - first;
    if direction.norm() < EPSILON {
        tracing::warn!("Mirror line needs two distinct points");
        return CommandStatus::Cancelled;
    }
    let transform = Transform2D::mirror(&first, &direction);
    preview.update(&transform);
    axis.borrow_mut().end = second;
    ctx.jig.notify_changed();

    let erase_source = loop {
        let outcome = ctx
            .input
            .request_text("要删除源对象吗")
            .keyword(Keyword::prefix("Yes"))
            .default_keyword(Keyword::prefix("No"))
            .await;
        match outcome {
            InputOutcome::KeywordChosen(answer) => break answer == "Yes",
            InputOutcome::Accepted(other) => tracing::warn!("Expected Yes or No, got '{}'", other),
            InputOutcome::Cancelled => return CommandStatus::Cancelled,
        }
    };
    drop(scope);

    apply_transform(&ctx, &ids, &transform, !erase_source)
}
