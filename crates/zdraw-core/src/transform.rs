//! 二维仿射变换
//!
//! 以齐次 3×3 矩阵存储 2×3 仿射映射（最后一行恒为 `0 0 1`）。
//! 组合遵循矩阵乘法：`a * b` 表示先应用 `b`，再应用 `a`。

use crate::math::{Point2, Vector2, EPSILON};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// 不可变的二维仿射变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    matrix: Matrix3<f64>,
}

impl Transform2D {
    /// 由线性部分和平移部分构造
    ///
    /// ```text
    /// | a  b  tx |
    /// | c  d  ty |
    /// | 0  0  1  |
    /// ```
    pub fn from_parts(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self {
            matrix: Matrix3::new(a, b, tx, c, d, ty, 0.0, 0.0, 1.0),
        }
    }

    /// 单位变换
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// 平移
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_parts(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// 按向量平移
    pub fn translation_by(offset: &Vector2) -> Self {
        Self::translation(offset.x, offset.y)
    }

    /// 绕原点旋转（弧度，逆时针为正）
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_parts(cos, -sin, sin, cos, 0.0, 0.0)
    }

    /// 绕指定点旋转：`T(+p) * R * T(-p)`
    pub fn rotation_about(angle: f64, center: &Point2) -> Self {
        Self::translation(center.x, center.y)
            * Self::rotation(angle)
            * Self::translation(-center.x, -center.y)
    }

    /// 以原点为基点的非等比缩放
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::from_parts(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// 以指定点为基点的非等比缩放：`T(+p) * S * T(-p)`
    pub fn scale_about(sx: f64, sy: f64, center: &Point2) -> Self {
        Self::translation(center.x, center.y)
            * Self::scale(sx, sy)
            * Self::translation(-center.x, -center.y)
    }

    /// 关于过 `base` 且方向为 `direction` 的直线镜像
    ///
    /// 先把方向旋转到 X 轴，再把 Y 缩放 -1，最后旋转回去，全部以 `base` 为基点。
    pub fn mirror(base: &Point2, direction: &Vector2) -> Self {
        let angle = direction.y.atan2(direction.x);
        Self::rotation_about(angle, base)
            * Self::scale_about(1.0, -1.0, base)
            * Self::rotation_about(-angle, base)
    }

    /// 闭式逆矩阵
    ///
    /// 奇异矩阵（行列式为零）的逆没有定义，由调用方保证不会出现。
    pub fn inverse(&self) -> Self {
        let m = &self.matrix;
        let (a, b, tx) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
        let (c, d, ty) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
        let det = a * d - b * c;

        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;

        Self::from_parts(ia, ib, ic, id, -(ia * tx + ib * ty), -(ic * tx + id * ty))
    }

    /// 线性部分的行列式
    pub fn determinant(&self) -> f64 {
        let m = &self.matrix;
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
    }

    /// 是否包含镜像（行列式为负）
    pub fn is_mirroring(&self) -> bool {
        self.determinant() < 0.0
    }

    /// 等效的等比缩放系数 √|det|
    pub fn uniform_scale(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    /// 变换一个点（包含平移）
    pub fn transform_point(&self, point: &Point2) -> Point2 {
        let m = &self.matrix;
        Point2::new(
            m[(0, 0)] * point.x + m[(0, 1)] * point.y + m[(0, 2)],
            m[(1, 0)] * point.x + m[(1, 1)] * point.y + m[(1, 2)],
        )
    }

    /// 变换一个向量（忽略平移）
    pub fn transform_vector(&self, vector: &Vector2) -> Vector2 {
        let m = &self.matrix;
        Vector2::new(
            m[(0, 0)] * vector.x + m[(0, 1)] * vector.y,
            m[(1, 0)] * vector.x + m[(1, 1)] * vector.y,
        )
    }

    /// 是否为单位变换（容差内）
    pub fn is_identity(&self) -> bool {
        self.abs_diff_eq(&Self::identity(), EPSILON)
    }

    /// 逐元素容差比较
    pub fn abs_diff_eq(&self, other: &Transform2D, tolerance: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// 底层齐次矩阵
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: Transform2D) -> Transform2D {
        Transform2D {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

impl Mul<&Transform2D> for &Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: &Transform2D) -> Transform2D {
        Transform2D {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

impl Mul<Point2> for Transform2D {
    type Output = Point2;

    fn mul(self, rhs: Point2) -> Point2 {
        self.transform_point(&rhs)
    }
}

impl Mul<Point2> for &Transform2D {
    type Output = Point2;

    fn mul(self, rhs: Point2) -> Point2 {
        self.transform_point(&rhs)
    }
}
