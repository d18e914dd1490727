//! 单行文字命令
//!
//! 插入点 → 字高 → 旋转角度 → 内容。字高和角度回车取默认值。

use crate::command::{CommandContext, CommandStatus};
use crate::input::{FloatOptions, InputOutcome, Keyword};
use zdraw_core::geometry::{Geometry, Text};

const PLACEHOLDER: &str = "Abc";

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let InputOutcome::Accepted(position) = ctx.input.request_point("指定文字的起点").await else {
        return CommandStatus::Cancelled;
    };

    let default_height = ctx.settings.text_height;
    let mut scope = ctx.jig.scope();
    let sample = scope.add(Text::new(position, PLACEHOLDER, default_height));

    let preview = sample.clone();
    let height = match ctx
        .input
        .request_distance(format!("指定高度 <{}>", default_height))
        .base_point(position)
        .options(FloatOptions::POSITIVE)
        .default_keyword(Keyword::exact("Default"))
        .on_update(move |h| preview.borrow_mut().height = *h)
        .await
    {
        InputOutcome::Accepted(h) => h,
        InputOutcome::KeywordChosen(_) => default_height,
        InputOutcome::Cancelled => return CommandStatus::Cancelled,
    };
    sample.borrow_mut().height = height;
    ctx.jig.notify_changed();

    let preview = sample.clone();
    let rotation = match ctx
        .input
        .request_angle("指定文字的旋转角度 <0>")
        .base_point(position)
        .default_keyword(Keyword::exact("Horizontal"))
        .on_update(move |a| preview.borrow_mut().rotation = *a)
        .await
    {
        InputOutcome::Accepted(a) => a,
        InputOutcome::KeywordChosen(_) => 0.0,
        InputOutcome::Cancelled => return CommandStatus::Cancelled,
    };
    sample.borrow_mut().rotation = rotation;
    ctx.jig.notify_changed();

    let content = match ctx.input.request_text("输入文字").await {
        InputOutcome::Accepted(content) if !content.is_empty() => content,
        _ => return CommandStatus::Cancelled,
    };
    drop(scope);

    ctx.commit(vec![Geometry::Text(
        Text::new(position, content, height).with_rotation(rotation),
    )]);
    CommandStatus::Committed
}
