//! CAD输入解析器
//!
//! 支持多种输入格式：
//! - 绝对坐标: `100,50`
//! - 相对坐标: `@100,50`
//! - 极坐标: `@100<45` (相对) 或 `100<45` (长度+角度)
//! - 长度: `100`
//! - 角度: `<45`
//!
//! 角度输入一律按度数解析，内部以弧度表示。

use crate::math::{angle_between, polar_point, Point2};
use thiserror::Error;

/// 解析后的输入值
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// 点坐标
    Point(Point2),
    /// 长度值
    Length(f64),
    /// 角度值（弧度）
    Angle(f64),
    /// 长度和角度（弧度）
    LengthAngle { length: f64, angle: f64 },
}

/// 解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 无效格式
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// 缺少必需的值
    #[error("Missing value: {0}")]
    MissingValue(String),
}

/// 输入解析器
pub struct InputParser;

impl InputParser {
    /// 解析输入字符串
    ///
    /// `reference_point` 用于相对坐标和相对极坐标。
    pub fn parse(input: &str, reference_point: Option<Point2>) -> Result<InputValue, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::InvalidFormat("Empty input".to_string()));
        }

        let (relative, body) = match input.strip_prefix('@') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, input),
        };

        // 长度<角度
        if let Some((length, angle)) = body.rsplit_once('<') {
            let angle = number(angle, "angle")?.to_radians();
            if length.trim().is_empty() {
                return if relative {
                    Err(ParseError::MissingValue("length before '<'".to_string()))
                } else {
                    Ok(InputValue::Angle(angle))
                };
            }
            let length = number(length, "length")?;
            return if relative {
                let origin = require(reference_point, "relative polar coordinate")?;
                Ok(InputValue::Point(polar_point(&origin, length, angle)))
            } else {
                Ok(InputValue::LengthAngle { length, angle })
            };
        }

        // x,y
        if let Some((x, y)) = body.split_once(',') {
            let offset = Point2::new(number(x, "X coordinate")?, number(y, "Y coordinate")?);
            if relative {
                let origin = require(reference_point, "relative coordinate")?;
                return Ok(InputValue::Point(origin + offset.coords));
            }
            return Ok(InputValue::Point(offset));
        }

        if relative {
            return Err(ParseError::InvalidFormat(format!("Cannot parse input: {}", input)));
        }
        number(body, "number").map(InputValue::Length)
    }

    /// 解析为点坐标
    ///
    /// 长度+角度相对参考点换算；单独的长度沿 0° 方向。
    pub fn parse_point(input: &str, reference_point: Option<Point2>) -> Result<Point2, ParseError> {
        match Self::parse(input, reference_point)? {
            InputValue::Point(p) => Ok(p),
            InputValue::LengthAngle { length, angle } => {
                Ok(polar_point(&require(reference_point, "length<angle input")?, length, angle))
            }
            InputValue::Length(length) => {
                Ok(polar_point(&require(reference_point, "length-only input")?, length, 0.0))
            }
            InputValue::Angle(_) => Err(ParseError::InvalidFormat(format!("Not a point: {}", input.trim()))),
        }
    }

    /// 解析为距离，点坐标按到参考点的距离换算
    pub fn parse_distance(input: &str, reference_point: Option<Point2>) -> Result<f64, ParseError> {
        match Self::parse(input, reference_point)? {
            InputValue::Length(length) | InputValue::LengthAngle { length, .. } => Ok(length),
            InputValue::Point(p) => Ok((p - require(reference_point, "point input")?).norm()),
            InputValue::Angle(_) => Err(ParseError::InvalidFormat(format!("Not a distance: {}", input.trim()))),
        }
    }

    /// 解析为角度（弧度）
    ///
    /// 纯数字视为度数；点坐标按参考点到该点的方向换算。
    pub fn parse_angle(input: &str, reference_point: Option<Point2>) -> Result<f64, ParseError> {
        match Self::parse(input, reference_point)? {
            InputValue::Angle(angle) | InputValue::LengthAngle { angle, .. } => Ok(angle),
            InputValue::Length(degrees) => Ok(degrees.to_radians()),
            InputValue::Point(p) => Ok(angle_between(&require(reference_point, "point input")?, &p)),
        }
    }
}

fn number(text: &str, what: &str) -> Result<f64, ParseError> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidFormat(format!("Invalid {}: {}", what, text)))
}

fn require(reference_point: Option<Point2>, what: &str) -> Result<Point2, ParseError> {
    reference_point.ok_or_else(|| ParseError::MissingValue(format!("Reference point required for {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn point(input: &str, reference: Option<Point2>) -> Point2 {
        InputParser::parse_point(input, reference).unwrap()
    }

    #[test]
    fn test_absolute_and_relative_coordinates() {
        assert_eq!(point("100,50", None), Point2::new(100.0, 50.0));
        assert_eq!(point(" @100, 50 ", Some(Point2::new(10.0, 20.0))), Point2::new(110.0, 70.0));
        assert!(matches!(
            InputParser::parse("@1,1", None),
            Err(ParseError::MissingValue(_))
        ));
    }

    #[test]
    fn test_relative_polar() {
        let p = point("@100<45", Some(Point2::new(1.0, 1.0)));
        assert_abs_diff_eq!(p.x, 1.0 + 100.0 * FRAC_PI_4.cos(), epsilon = 1e-10);
        assert_abs_diff_eq!(p.y, 1.0 + 100.0 * FRAC_PI_4.sin(), epsilon = 1e-10);
        assert!(InputParser::parse("@<45", Some(Point2::origin())).is_err());
    }

    #[test]
    fn test_length_angle_needs_reference_for_point() {
        match InputParser::parse("100<90", None).unwrap() {
            InputValue::LengthAngle { length, angle } => {
                assert_eq!(length, 100.0);
                assert_abs_diff_eq!(angle, FRAC_PI_2, epsilon = 1e-12);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(InputParser::parse_point("100<90", None).is_err());
        let p = point("100<90", Some(Point2::new(5.0, 0.0)));
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-10);
        assert_abs_diff_eq!(p.y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bare_number_and_angle() {
        assert_eq!(InputParser::parse("100", None), Ok(InputValue::Length(100.0)));
        assert_eq!(point("7", Some(Point2::new(1.0, 2.0))), Point2::new(8.0, 2.0));
        assert!(matches!(
            InputParser::parse("<45", None),
            Ok(InputValue::Angle(a)) if (a - FRAC_PI_4).abs() < 1e-12
        ));
        assert!(InputParser::parse_point("<45", Some(Point2::origin())).is_err());
    }

    #[test]
    fn test_parse_distance() {
        let d = InputParser::parse_distance("3,4", Some(Point2::origin())).unwrap();
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
        assert_eq!(InputParser::parse_distance("12.5", None), Ok(12.5));
        assert!(InputParser::parse_distance("<30", None).is_err());
    }

    #[test]
    fn test_parse_angle() {
        assert_abs_diff_eq!(InputParser::parse_angle("90", None).unwrap(), FRAC_PI_2, epsilon = 1e-12);
        let b = InputParser::parse_angle("0,1", Some(Point2::origin())).unwrap();
        assert_abs_diff_eq!(b, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_input() {
        assert!(InputParser::parse("abc", None).is_err());
        assert!(InputParser::parse("", None).is_err());
        assert!(InputParser::parse("1,x", None).is_err());
        assert!(InputParser::parse("inf", None).is_err());
        assert!(InputParser::parse("@", Some(Point2::origin())).is_err());
    }
}
