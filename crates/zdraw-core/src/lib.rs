//! ZDraw 核心几何内核
//!
//! 提供二维点/向量、仿射变换、包围盒累加、曲线求交，
//! 以及命令引擎依赖的可绘制契约和文档模型。本 crate 不依赖任何 GUI。
//!
//! # 示例
//!
//! ```rust
//! use zdraw_core::prelude::*;
//!
//! let rotate = Transform2D::rotation_about(std::f64::consts::PI, &Point2::new(1.0, 0.0));
//! let p = rotate * Point2::origin();
//! assert!((p.x - 2.0).abs() < 1e-9);
//! ```

pub mod document;
pub mod drawable;
pub mod entity;
pub mod geometry;
pub mod input_parser;
pub mod intersect;
pub mod math;
pub mod observer;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::document::{Document, DocumentError, DocumentEvent, WindowMode};
    pub use crate::drawable::{Composite, Drawable};
    pub use crate::entity::{Entity, EntityId};
    pub use crate::geometry::{
        Arc, Circle, Geometry, Hatch, Line, Point, Polyline, Text,
    };
    pub use crate::input_parser::{InputParser, InputValue, ParseError};
    pub use crate::intersect::{
        intersect_circles, intersect_line_circle, intersect_line_quad_bezier, intersect_lines,
        Intersection,
    };
    pub use crate::math::{BoundingBox2, Point2, Vector2, EPSILON};
    pub use crate::observer::{Notifier, SubscriptionId};
    pub use crate::transform::Transform2D;
}
