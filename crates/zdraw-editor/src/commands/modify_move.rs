//! 移动命令
//!
//! 选择对象 → 基点 → 第二点。预览移动的是副本，提交时对原对象施加一次平移。

use crate::command::{acquire_selection, apply_transform, CommandContext, CommandStatus, TransformPreview};
use crate::input::InputOutcome;
use zdraw_core::geometry::Line;
use zdraw_core::transform::Transform2D;

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let Some(ids) = acquire_selection(&ctx, "选择要移动的对象").await else {
        return CommandStatus::Cancelled;
    };
    let InputOutcome::Accepted(base) = ctx.input.request_point("指定基点").await else {
        return CommandStatus::Cancelled;
    };

    let geometries = ctx.document.borrow().geometries_of(&ids);
    let mut scope = ctx.jig.scope();
    let preview = TransformPreview::new(&mut scope, &geometries);
    let band = scope.add(Line::new(base, base));

    let (ghost, rubber) = (preview.clone(), band.clone());
    let outcome = ctx
        .input
        .request_point("指定第二个点")
        .base_point(base)
        .on_update(move |p| {
            ghost.update(&Transform2D::translation_by(&(p - base)));
            rubber.borrow_mut().end = *p;
        })
        .await;
    let InputOutcome::Accepted(target) = outcome else {
        return CommandStatus::Cancelled;
    };
    drop(scope);

    apply_transform(&ctx, &ids, &Transform2D::translation_by(&(target - base)), false)
}
