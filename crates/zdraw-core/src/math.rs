//! 基础数学类型
//!
//! 点与向量直接使用 nalgebra 的类型，点减点得到向量、点加向量得到点，
//! 由类型系统保证。

use serde::{Deserialize, Serialize};

/// 二维点（位置）
pub type Point2 = nalgebra::Point2<f64>;

/// 二维向量（位移）
pub type Vector2 = nalgebra::Vector2<f64>;

/// 全内核共享的容差
pub const EPSILON: f64 = 1e-10;

/// 容差比较
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 从 `from` 指向 `to` 的方向角（弧度，范围 (-π, π]）
#[inline]
pub fn angle_between(from: &Point2, to: &Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// 极坐标转点
#[inline]
pub fn polar_point(origin: &Point2, distance: f64, angle: f64) -> Point2 {
    Point2::new(
        origin.x + distance * angle.cos(),
        origin.y + distance * angle.sin(),
    )
}

/// 将角度归一化到 [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let a = angle % two_pi;
    if a < 0.0 {
        a + two_pi
    } else {
        a
    }
}

/// 轴对齐包围盒（范围累加器）
///
/// 带有显式的"空"状态：尚未加入任何点时 `min` 为 +∞、`max` 为 -∞。
/// 加入操作只会初始化或扩大盒子，从不缩小。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 由两个角点创建（自动规范化）
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// 空包围盒
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// 从点集创建
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        bbox.add_points(points);
        bbox
    }

    /// 是否从未加入过点
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// 加入一个点
    pub fn add_point(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 加入一组点
    pub fn add_points(&mut self, points: impl IntoIterator<Item = Point2>) {
        for p in points {
            self.add_point(&p);
        }
    }

    /// 合并另一个包围盒（对方为空时忽略）
    pub fn add_box(&mut self, other: &BoundingBox2) {
        if other.is_empty() {
            return;
        }
        self.add_point(&other.min);
        self.add_point(&other.max);
    }

    /// 宽度（空时为 0）
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    /// 高度（空时为 0）
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    /// 中心点（空时为原点）
    pub fn center(&self) -> Point2 {
        if self.is_empty() {
            Point2::origin()
        } else {
            nalgebra::center(&self.min, &self.max)
        }
    }

    /// 点是否在盒内（含边界）
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// 另一个盒子是否完全在本盒内；空盒不被任何盒子包含
    pub fn contains_box(&self, other: &BoundingBox2) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// 两个盒子是否相交（含接触）
    pub fn intersects(&self, other: &BoundingBox2) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// 四周扩展 `margin` 后的新盒子
    pub fn expanded(&self, margin: f64) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// 四个角点（逆时针，从 min 开始）
    pub fn corners(&self) -> [Point2; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }
}

impl Default for BoundingBox2 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_box() {
        let bbox = BoundingBox2::empty();
        assert!(bbox.is_empty());
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 0.0);
        assert_eq!(bbox.center(), Point2::origin());
        assert!(!bbox.contains(&Point2::origin()));
    }

    #[test]
    fn test_add_single_point() {
        let mut bbox = BoundingBox2::empty();
        let p = Point2::new(3.0, -2.0);
        bbox.add_point(&p);

        assert!(!bbox.is_empty());
        assert_eq!(bbox.min, p);
        assert_eq!(bbox.max, p);
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 0.0);
        assert!(bbox.contains(&p));
    }

    #[test]
    fn test_add_empty_box_is_ignored() {
        let mut bbox = BoundingBox2::from_points([Point2::new(0.0, 0.0), Point2::new(2.0, 4.0)]);
        let before = bbox;
        bbox.add_box(&BoundingBox2::empty());
        assert_eq!(bbox, before);
        assert_eq!(bbox.center(), Point2::new(1.0, 2.0));
    }

    #[test]
    fn test_growth_is_monotonic() {
        let mut bbox = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        bbox.add_point(&Point2::new(5.0, 5.0));
        assert_eq!(bbox.width(), 10.0);
        bbox.add_point(&Point2::new(-5.0, 12.0));
        assert_eq!(bbox.min, Point2::new(-5.0, 0.0));
        assert_eq!(bbox.max, Point2::new(10.0, 12.0));
    }

    #[test]
    fn test_contains_and_intersects() {
        let outer = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let inner = BoundingBox2::new(Point2::new(2.0, 2.0), Point2::new(4.0, 4.0));
        let crossing = BoundingBox2::new(Point2::new(8.0, 8.0), Point2::new(12.0, 12.0));
        let apart = BoundingBox2::new(Point2::new(20.0, 20.0), Point2::new(30.0, 30.0));

        assert!(outer.contains_box(&inner));
        assert!(!outer.contains_box(&crossing));
        assert!(outer.intersects(&crossing));
        assert!(!outer.intersects(&apart));
        assert!(!outer.contains_box(&BoundingBox2::empty()));
    }

    #[test]
    fn test_normalize_angle() {
        assert!(approx_eq(normalize_angle(-std::f64::consts::FRAC_PI_2), 1.5 * std::f64::consts::PI));
        assert!(approx_eq(normalize_angle(std::f64::consts::TAU), 0.0));
    }
}
