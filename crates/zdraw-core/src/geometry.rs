//! 几何图元
//!
//! 点、线段、圆、圆弧、多段线、文本和填充。所有图元只需要两件事：
//! 算出包围盒，以及原地接受一个仿射变换。

use crate::math::{angle_between, normalize_angle, polar_point, BoundingBox2, Point2, Vector2, EPSILON};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// 文档中可保存的图元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Polyline(Polyline),
    Text(Text),
    Hatch(Hatch),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            Geometry::Point($g) => $body,
            Geometry::Line($g) => $body,
            Geometry::Circle($g) => $body,
            Geometry::Arc($g) => $body,
            Geometry::Polyline($g) => $body,
            Geometry::Text($g) => $body,
            Geometry::Hatch($g) => $body,
        }
    };
}

impl Geometry {
    pub fn bounding_box(&self) -> BoundingBox2 {
        dispatch!(self, g => g.bounding_box())
    }

    pub fn transform(&mut self, transform: &Transform2D) {
        dispatch!(self, g => g.transform(transform))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Circle(_) => "Circle",
            Geometry::Arc(_) => "Arc",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Text(_) => "Text",
            Geometry::Hatch(_) => "Hatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Point2,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self::from_point2(Point2::new(x, y))
    }

    pub fn from_point2(position: Point2) -> Self {
        Self { position }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(self.position, self.position)
    }

    pub fn transform(&mut self, transform: &Transform2D) {
        self.position = transform.transform_point(&self.position);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }

    pub fn transform(&mut self, transform: &Transform2D) {
        self.start = transform.transform_point(&self.start);
        self.end = transform.transform_point(&self.end);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let r = Vector2::new(self.radius, self.radius);
        BoundingBox2::new(self.center - r, self.center + r)
    }

    /// 非等比缩放按 √|det| 取近似半径
    pub fn transform(&mut self, transform: &Transform2D) {
        self.center = transform.transform_point(&self.center);
        self.radius *= transform.uniform_scale();
    }
}

/// 圆弧，从 `start_angle` 逆时针扫到 `end_angle`（弧度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// 过起点、途经点、终点的圆弧；三点共线时没有圆弧
    pub fn from_three_points(start: Point2, through: Point2, end: Point2) -> Option<Self> {
        let ab = through - start;
        let ac = end - start;
        let cross = ab.perp(&ac);
        if cross.abs() < EPSILON {
            return None;
        }

        // 外心相对起点的偏移
        let ab2 = ab.norm_squared();
        let ac2 = ac.norm_squared();
        let offset = Vector2::new(ac.y * ab2 - ab.y * ac2, ab.x * ac2 - ac.x * ab2) / (2.0 * cross);
        let center = start + offset;
        let radius = offset.norm();

        let from = angle_between(&center, &start);
        let to = angle_between(&center, &end);
        // 途经点在起点到终点的右侧时，圆弧是顺时针走的
        Some(if cross > 0.0 {
            Self::new(center, radius, from, to)
        } else {
            Self::new(center, radius, to, from)
        })
    }

    /// 扫角，落在 [0, 2π)
    pub fn sweep_angle(&self) -> f64 {
        normalize_angle(self.end_angle - self.start_angle)
    }

    fn point_at(&self, angle: f64) -> Point2 {
        polar_point(&self.center, self.radius, angle)
    }

    pub fn start_point(&self) -> Point2 {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point2 {
        self.point_at(self.end_angle)
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        normalize_angle(angle - self.start_angle) <= self.sweep_angle() + EPSILON
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);
        for quadrant in 0..4 {
            let angle = quadrant as f64 * FRAC_PI_2;
            if self.contains_angle(angle) {
                bbox.add_point(&self.point_at(angle));
            }
        }
        bbox
    }

    /// 端点随变换移动后重算角度；镜像翻转方向，所以起止对调
    pub fn transform(&mut self, transform: &Transform2D) {
        let mut start = transform.transform_point(&self.start_point());
        let mut end = transform.transform_point(&self.end_point());
        if transform.is_mirroring() {
            std::mem::swap(&mut start, &mut end);
        }
        self.center = transform.transform_point(&self.center);
        self.radius *= transform.uniform_scale();
        self.start_angle = angle_between(&self.center, &start);
        self.end_angle = angle_between(&self.center, &end);
    }
}

/// 由直线段连接的多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point2>,
    pub closed: bool,
}

impl Polyline {
    pub fn from_points(points: impl IntoIterator<Item = Point2>, closed: bool) -> Self {
        Self {
            points: points.into_iter().collect(),
            closed,
        }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// 各段的首尾点，闭合时包含收尾段
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 2 => Some((*last, *first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.points.iter().copied())
    }

    pub fn transform(&mut self, transform: &Transform2D) {
        for p in &mut self.points {
            *p = transform.transform_point(p);
        }
    }
}

/// 单行文本，`position` 为左下角插入点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub position: Point2,
    pub content: String,
    pub height: f64,
    /// 基线方向（弧度）
    pub rotation: f64,
}

impl Text {
    pub fn new(position: Point2, content: impl Into<String>, height: f64) -> Self {
        Self {
            position,
            content: content.into(),
            height,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// 粗略宽度：汉字一个字高，其他字符 0.6 个字高
    pub fn estimated_width(&self) -> f64 {
        self.content
            .chars()
            .map(|c| if is_cjk(c) { 1.0 } else { 0.6 })
            .sum::<f64>()
            * self.height
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let place = Transform2D::translation(self.position.x, self.position.y)
            * Transform2D::rotation(self.rotation);
        let local = BoundingBox2::new(
            Point2::origin(),
            Point2::new(self.estimated_width(), self.height),
        );
        BoundingBox2::from_points(local.corners().into_iter().map(|p| place.transform_point(&p)))
    }

    pub fn transform(&mut self, transform: &Transform2D) {
        let baseline = transform.transform_vector(&Vector2::new(self.rotation.cos(), self.rotation.sin()));
        self.position = transform.transform_point(&self.position);
        self.rotation = baseline.y.atan2(baseline.x);
        self.height *= transform.uniform_scale();
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}')
}

/// 填充：闭合边界加图案名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hatch {
    pub boundary: Vec<Point2>,
    pub pattern: String,
}

impl Hatch {
    pub fn new(boundary: Vec<Point2>, pattern: impl Into<String>) -> Self {
        Self {
            boundary,
            pattern: pattern.into(),
        }
    }

    /// 边界围成的面积（鞋带公式），少于三个点为 0
    pub fn area(&self) -> f64 {
        if self.boundary.len() < 3 {
            return 0.0;
        }
        let next = self.boundary.iter().cycle().skip(1);
        let twice: f64 = self
            .boundary
            .iter()
            .zip(next)
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        twice.abs() / 2.0
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.boundary.iter().copied())
    }

    pub fn transform(&mut self, transform: &Transform2D) {
        for p in &mut self.boundary {
            *p = transform.transform_point(p);
        }
    }
}
