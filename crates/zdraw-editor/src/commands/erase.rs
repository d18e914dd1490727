//! 删除命令

use crate::command::{acquire_selection, CommandContext, CommandStatus};

pub async fn run(ctx: CommandContext) -> CommandStatus {
    let Some(ids) = acquire_selection(&ctx, "选择要删除的对象").await else {
        return CommandStatus::Cancelled;
    };
    let removed = ctx.document.borrow_mut().remove_all(&ids);
    ctx.selection.borrow_mut().clear();
    ctx.flush_events();
    tracing::info!("Erased {} entities", removed.len());
    CommandStatus::Committed
}
