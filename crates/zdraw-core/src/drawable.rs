//! 可绘制能力
//!
//! 画布上的任何对象都满足的最小契约：计算包围盒、原地变换、产生独立副本。
//! 永久模型、预览容器和临时组合体都只依赖这个 trait。

use crate::geometry::{Arc, Circle, Geometry, Hatch, Line, Point, Polyline, Text};
use crate::math::BoundingBox2;
use crate::transform::Transform2D;
use std::any::Any;
use std::fmt;

/// 可绘制对象
pub trait Drawable: fmt::Debug + Any {
    /// 包围盒
    fn extents(&self) -> BoundingBox2;

    /// 原地应用变换
    fn transform_by(&mut self, transform: &Transform2D);

    /// 与原对象不共享任何可变状态的副本
    fn clone_drawable(&self) -> Box<dyn Drawable>;

    /// 类型名称
    fn type_name(&self) -> &'static str;

    /// 向下转型
    fn as_any(&self) -> &dyn Any;

    /// 若对象可以表示为模型图元，返回对应的 [`Geometry`]
    fn to_geometry(&self) -> Option<Geometry> {
        None
    }
}

impl Clone for Box<dyn Drawable> {
    fn clone(&self) -> Self {
        self.clone_drawable()
    }
}

impl Drawable for Geometry {
    fn extents(&self) -> BoundingBox2 {
        self.bounding_box()
    }

    fn transform_by(&mut self, transform: &Transform2D) {
        self.transform(transform);
    }

    fn clone_drawable(&self) -> Box<dyn Drawable> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        Geometry::type_name(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_geometry(&self) -> Option<Geometry> {
        Some(self.clone())
    }
}

macro_rules! impl_primitive_drawable {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Drawable for $ty {
                fn extents(&self) -> BoundingBox2 {
                    self.bounding_box()
                }

                fn transform_by(&mut self, transform: &Transform2D) {
                    self.transform(transform);
                }

                fn clone_drawable(&self) -> Box<dyn Drawable> {
                    Box::new(self.clone())
                }

                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn to_geometry(&self) -> Option<Geometry> {
                    Some(Geometry::$ty(self.clone()))
                }
            }
        )*
    };
}

impl_primitive_drawable!(Point, Line, Circle, Arc, Polyline, Text, Hatch);

/// 组合体：一组可绘制对象，整体表现为单个可绘制对象
#[derive(Debug, Clone, Default)]
pub struct Composite {
    items: Vec<Box<dyn Drawable>>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由一组图元创建（复制每个图元）
    pub fn from_geometries<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Self {
        Self {
            items: geometries
                .into_iter()
                .map(|g| g.clone_drawable())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Drawable> {
        self.items.iter().map(|item| item.as_ref())
    }
}

impl Drawable for Composite {
    fn extents(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::empty();
        for item in &self.items {
            bbox.add_box(&item.extents());
        }
        bbox
    }

    fn transform_by(&mut self, transform: &Transform2D) {
        for item in &mut self.items {
            item.transform_by(transform);
        }
    }

    fn clone_drawable(&self) -> Box<dyn Drawable> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        "Composite"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
