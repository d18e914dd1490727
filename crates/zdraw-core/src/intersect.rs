//! 曲线求交
//!
//! 纯函数，无共享状态。每个函数返回 `Option<Vec<Intersection>>`：
//! `None` 表示没有交点或退化（平行、同心等），调用方必须先检查。
//! 直线按无限长处理，`param_a` 落在 [0, 1] 之外说明交点位于线段延长线上。
//!
//! 所有退化判断共用 [`EPSILON`]。

use crate::geometry::{Circle, Line};
use crate::math::{normalize_angle, Point2, Vector2, EPSILON};
use std::f64::consts::TAU;

/// 单个交点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// 交点坐标
    pub point: Point2,
    /// 在第一条曲线上的参数
    pub param_a: f64,
    /// 在第二条曲线上的参数
    pub param_b: f64,
}

impl Intersection {
    fn new(point: Point2, param_a: f64, param_b: f64) -> Self {
        Self {
            point,
            param_a,
            param_b,
        }
    }

    /// 交点是否落在第一条线段内
    pub fn on_segment_a(&self) -> bool {
        within_unit(self.param_a)
    }

    /// 交点是否落在第二条线段内
    pub fn on_segment_b(&self) -> bool {
        within_unit(self.param_b)
    }
}

fn within_unit(t: f64) -> bool {
    t >= -EPSILON && t <= 1.0 + EPSILON
}

fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// 圆上一点对应的归一化角度参数（0..1 对应 0..2π）
fn circle_param(center: &Point2, point: &Point2) -> f64 {
    let angle = normalize_angle((point.y - center.y).atan2(point.x - center.x));
    let t = angle / TAU;
    if t >= 1.0 {
        0.0
    } else {
        t
    }
}

/// 直线-直线
///
/// 方向向量平行（叉积在容差内为零）时没有唯一交点，返回 `None`。
pub fn intersect_lines(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> Option<Vec<Intersection>> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;

    let denom = cross(&d1, &d2);
    if denom.abs() < EPSILON {
        return None;
    }

    let d = b0 - a0;
    let t1 = cross(&d, &d2) / denom;
    let t2 = cross(&d, &d1) / denom;

    Some(vec![Intersection::new(a0 + d1 * t1, t1, t2)])
}

/// 直线-圆
///
/// 把直线参数式代入圆方程，按判别式分类：相切（一个交点）、两个交点或无交点。
/// `param_a` 为沿线段的比例位置，`param_b` 为圆上的归一化角度。
pub fn intersect_line_circle(
    p0: Point2,
    p1: Point2,
    center: Point2,
    radius: f64,
) -> Option<Vec<Intersection>> {
    let d = p1 - p0;
    let length = d.norm();
    if length < EPSILON {
        return None;
    }
    let u = d / length;

    // 圆心在直线上的投影与垂距
    let along = (center - p0).dot(&u);
    let foot = p0 + u * along;
    let h2 = (center - foot).norm_squared();
    let discriminant = radius * radius - h2;
    let tolerance = EPSILON * radius.max(1.0).powi(2);

    if discriminant < -tolerance {
        return None;
    }

    if discriminant.abs() <= tolerance {
        let t = along / length;
        return Some(vec![Intersection::new(foot, t, circle_param(&center, &foot))]);
    }

    let half_chord = discriminant.sqrt();
    let hits = [along - half_chord, along + half_chord]
        .into_iter()
        .map(|s| {
            let point = p0 + u * s;
            Intersection::new(point, s / length, circle_param(&center, &point))
        })
        .collect();
    Some(hits)
}

/// 直线-二次贝塞尔曲线
///
/// 将三个控制点变换到以直线为 X 轴的局部坐标系中，求解关于曲线参数 t 的二次方程；
/// 二次项系数接近零时退化为一次方程。只报告 t ∈ [0, 1] 的根。
pub fn intersect_line_quad_bezier(
    p0: Point2,
    p1: Point2,
    c0: Point2,
    c1: Point2,
    c2: Point2,
) -> Option<Vec<Intersection>> {
    let d = p1 - p0;
    let length = d.norm();
    if length < EPSILON {
        return None;
    }
    let u = d / length;

    // 局部坐标系中的 y 分量（到直线的有向距离）
    let y0 = cross(&u, &(c0 - p0));
    let y1 = cross(&u, &(c1 - p0));
    let y2 = cross(&u, &(c2 - p0));

    let a = y0 - 2.0 * y1 + y2;
    let b = 2.0 * (y1 - y0);
    let c = y0;

    let mut roots = Vec::with_capacity(2);
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return None;
        }
        roots.push(-c / b);
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < -EPSILON {
            return None;
        }
        if discriminant.abs() <= EPSILON {
            roots.push(-b / (2.0 * a));
        } else {
            let sqrt_disc = discriminant.sqrt();
            roots.push((-b - sqrt_disc) / (2.0 * a));
            roots.push((-b + sqrt_disc) / (2.0 * a));
        }
    }

    let hits: Vec<Intersection> = roots
        .into_iter()
        .filter(|t| within_unit(*t))
        .map(|t| {
            let t = t.clamp(0.0, 1.0);
            let point = quad_bezier_point(&c0, &c1, &c2, t);
            let s = (point - p0).dot(&d) / (length * length);
            Intersection::new(point, s, t)
        })
        .collect();

    if hits.is_empty() {
        None
    } else {
        Some(hits)
    }
}

/// 二次贝塞尔曲线上参数 t 处的点
pub fn quad_bezier_point(c0: &Point2, c1: &Point2, c2: &Point2, t: f64) -> Point2 {
    let mt = 1.0 - t;
    Point2::from(c0.coords * (mt * mt) + c1.coords * (2.0 * mt * t) + c2.coords * (t * t))
}

/// 圆-圆
///
/// 根轴法求交。同心、相离、内含都返回 `None`；内切或外切返回恰好一个点。
pub fn intersect_circles(
    center_a: Point2,
    radius_a: f64,
    center_b: Point2,
    radius_b: f64,
) -> Option<Vec<Intersection>> {
    let offset = center_b - center_a;
    let d = offset.norm();

    if d < EPSILON {
        return None;
    }

    let outer = radius_a + radius_b;
    let inner = (radius_a - radius_b).abs();
    let tangent = (d - outer).abs() < EPSILON || (d - inner).abs() < EPSILON;

    if !tangent && (d > outer || d < inner) {
        return None;
    }

    let dir = offset / d;
    let a = (radius_a * radius_a - radius_b * radius_b + d * d) / (2.0 * d);
    let base = center_a + dir * a;

    let make = |point: Point2| {
        Intersection::new(
            point,
            circle_param(&center_a, &point),
            circle_param(&center_b, &point),
        )
    };

    if tangent {
        return Some(vec![make(base)]);
    }

    let h = (radius_a * radius_a - a * a).max(0.0).sqrt();
    let perp = Vector2::new(-dir.y, dir.x);
    Some(vec![make(base + perp * h), make(base - perp * h)])
}

impl Line {
    /// 与另一条直线求交
    pub fn intersect_line(&self, other: &Line) -> Option<Vec<Intersection>> {
        intersect_lines(self.start, self.end, other.start, other.end)
    }

    /// 与圆求交
    pub fn intersect_circle(&self, circle: &Circle) -> Option<Vec<Intersection>> {
        intersect_line_circle(self.start, self.end, circle.center, circle.radius)
    }
}

impl Circle {
    /// 与另一个圆求交
    pub fn intersect_circle(&self, other: &Circle) -> Option<Vec<Intersection>> {
        intersect_circles(self.center, self.radius, other.center, other.radius)
    }
}
