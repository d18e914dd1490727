//! 视口
//!
//! 只记录当前可见的世界范围，具体投影由渲染层处理。

use zdraw_core::math::{BoundingBox2, Point2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    view: BoundingBox2,
}

impl Viewport {
    pub fn new(view: BoundingBox2) -> Self {
        Self { view }
    }

    pub fn view(&self) -> BoundingBox2 {
        self.view
    }

    pub fn center(&self) -> Point2 {
        self.view.center()
    }

    /// 缩放到给定范围，`margin` 为留白占范围尺寸的比例
    ///
    /// 范围为空时不做修改并返回 false。退化为线或点的范围按最小尺寸处理。
    pub fn zoom_to(&mut self, extents: &BoundingBox2, margin: f64) -> bool {
        if extents.is_empty() {
            return false;
        }
        let size = extents.width().max(extents.height()).max(1.0);
        let center = extents.center();
        let half_w = extents.width().max(size * 0.5) * 0.5;
        let half_h = extents.height().max(size * 0.5) * 0.5;
        let fitted = BoundingBox2::new(
            Point2::new(center.x - half_w, center.y - half_h),
            Point2::new(center.x + half_w, center.y + half_h),
        );
        self.view = fitted.expanded(size * margin.max(0.0));
        tracing::debug!(
            "Viewport zoomed to ({:.3}, {:.3})-({:.3}, {:.3})",
            self.view.min.x,
            self.view.min.y,
            self.view.max.x,
            self.view.max.y
        );
        true
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(420.0, 297.0)))
    }
}
