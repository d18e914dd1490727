//! 绘图与编辑命令
//!
//! 每个模块提供一个 `run` 入口，签名统一为 `async fn(CommandContext) -> CommandStatus`。

pub mod draw_arc;
pub mod draw_circle;
pub mod draw_hatch;
pub mod draw_line;
pub mod draw_point;
pub mod draw_polyline;
pub mod draw_rectangle;
pub mod draw_text;
pub mod erase;
pub mod modify_copy;
pub mod modify_mirror;
pub mod modify_move;
pub mod modify_rotate;
pub mod modify_scale;
pub mod select;
pub mod zoom;

use crate::command::CommandContext;
use crate::input::{InputOutcome, Keyword};
use zdraw_core::geometry::Polyline;
use zdraw_core::math::{Point2, EPSILON};

/// 多点输入的结果
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Vertices {
    pub points: Vec<Point2>,
    pub closed: bool,
}

/// 连续收集顶点，直到 Close / End
///
/// 预览为一条随指针延伸的多段线。少于两个点时结束视为取消。
pub(crate) async fn collect_vertices(ctx: &CommandContext, first_prompt: &str) -> Option<Vertices> {
    let first = match ctx.input.request_point(first_prompt).await {
        InputOutcome::Accepted(p) => p,
        _ => return None,
    };

    let mut scope = ctx.jig.scope();
    let preview = scope.add(Polyline::from_points([first, first], false));
    let mut points = vec![first];

    loop {
        let last = points[points.len() - 1];
        let fixed = points.clone();
        let rubber = preview.clone();
        let outcome = ctx
            .input
            .request_point("指定下一点")
            .base_point(last)
            .keyword(Keyword::prefix("Close"))
            .keyword(Keyword::prefix("Undo"))
            .default_keyword(Keyword::prefix("End"))
            .on_update(move |p| {
                *rubber.borrow_mut() =
                    Polyline::from_points(fixed.iter().copied().chain([*p]), false);
            })
            .await;

        match outcome {
            InputOutcome::Accepted(p) => {
                if (p - last).norm() < EPSILON {
                    tracing::warn!("Duplicate vertex ignored");
                    continue;
                }
                points.push(p);
            }
            InputOutcome::KeywordChosen(keyword) if keyword == "Undo" => {
                if points.len() > 1 {
                    points.pop();
                } else {
                    tracing::warn!("Nothing to undo");
                }
            }
            InputOutcome::KeywordChosen(keyword) => {
                if points.len() < 2 {
                    tracing::info!("Not enough vertices");
                    return None;
                }
                return Some(Vertices {
                    points,
                    closed: keyword == "Close",
                });
            }
            InputOutcome::Cancelled => return None,
        }

        *preview.borrow_mut() = Polyline::from_points(points.iter().copied(), false);
        ctx.jig.notify_changed();
    }
}
