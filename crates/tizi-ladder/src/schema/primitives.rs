//! 标量字段校验: 正整数、正数、布尔值、分数字符串与有界数值.

use std::fmt;

use serde_json::Value;
use tizi_core::{ErrorList, Rational, Validation};

/// 区间约束 `(min, max, min_inclusive, max_inclusive)`, 端点缺省表示无界
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<Rational>,
    pub max: Option<Rational>,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
}

impl Bounds {
    pub const fn new(
        min: Option<Rational>,
        max: Option<Rational>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Self {
        Self {
            min,
            max,
            min_inclusive,
            max_inclusive,
        }
    }

    /// `(0, +∞)`
    pub const POSITIVE: Self = Self::new(Some(Rational::ZERO), None, false, false);

    /// `[1, +∞)`, 横向宽高比
    pub const LANDSCAPE: Self = Self::new(Some(Rational::ONE), None, true, false);

    /// `(0, 1]`
    pub const UNIT_OPEN_MIN: Self = Self::new(Some(Rational::ZERO), Some(Rational::ONE), false, true);

    /// `[0, 1]`
    pub const UNIT_CLOSED: Self = Self::new(Some(Rational::ZERO), Some(Rational::ONE), true, true);

    /// 判断 `value` 是否落在区间内
    pub fn contains(&self, value: Rational) -> bool {
        let above_min = match self.min {
            Some(min) if self.min_inclusive => value >= min,
            Some(min) => value > min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.max_inclusive => value <= max,
            Some(max) => value < max,
            None => true,
        };
        above_min && below_max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_inclusive { '[' } else { '(' };
        let close = if self.max_inclusive { ']' } else { ')' };
        let min = self.min.map_or_else(|| "-∞".to_string(), |v| v.to_string());
        let max = self.max.map_or_else(|| "+∞".to_string(), |v| v.to_string());
        write!(f, "{open}{min}, {max}{close}")
    }
}

/// 错误消息中的值描述 (JSON 文本)
pub(crate) fn describe(value: &Value) -> String {
    value.to_string()
}

/// JSON 数字按其十进制文本精确转换为有理数
pub fn number_to_rational(value: &serde_json::Number) -> Option<Rational> {
    value.to_string().parse().ok()
}

/// 布尔值
pub fn boolean(path: &str, value: &Value) -> Validation<bool> {
    value.as_bool().ok_or_else(|| {
        ErrorList::single(format!("{path}: 必须为布尔值 (实际值 {})", describe(value)))
    })
}

/// 正整数
pub fn positive_integer(path: &str, value: &Value) -> Validation<u64> {
    match value.as_u64() {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ErrorList::single(format!(
            "{path}: 必须为正整数 (实际值 {})",
            describe(value)
        ))),
    }
}

/// 可放入 u32 的正整数 (像素尺寸、声道数)
pub fn positive_u32(path: &str, value: &Value) -> Validation<u32> {
    let n = positive_integer(path, value)?;
    u32::try_from(n).map_err(|_| {
        ErrorList::single(format!("{path}: 超出允许的最大值 {} (实际值 {n})", u32::MAX))
    })
}

/// 正数 (整数或小数), 转换为精确的有理数
pub fn positive_number(path: &str, value: &Value) -> Validation<Rational> {
    let number = match value {
        Value::Number(n) => number_to_rational(n),
        _ => None,
    };
    match number {
        Some(n) if n.is_positive() => Ok(n),
        _ => Err(ErrorList::single(format!(
            "{path}: 必须为正数 (实际值 {})",
            describe(value)
        ))),
    }
}

/// 分数字符串 (`"16/9"`, `"24"`, `"29.97"`)
///
/// 非字符串属于类型错误, 无法解析属于格式错误, 两者消息不同.
pub fn fraction_string(path: &str, value: &Value) -> Validation<Rational> {
    let Some(text) = value.as_str() else {
        return Err(ErrorList::single(format!(
            "{path}: 必须为分数字符串 (实际值 {})",
            describe(value)
        )));
    };
    text.parse::<Rational>()
        .map_err(|err| ErrorList::single(format!("{path}: {err}")))
}

/// 落在 `bounds` 内的分数字符串
pub fn bounded_fraction(bounds: Bounds) -> impl Fn(&str, &Value) -> Validation<Rational> {
    move |path: &str, value: &Value| {
        let ratio = fraction_string(path, value)?;
        check_bounds(path, ratio, bounds)
    }
}

/// 正的分数字符串
pub fn positive_fraction(path: &str, value: &Value) -> Validation<Rational> {
    bounded_fraction(Bounds::POSITIVE)(path, value)
}

/// 落在 `bounds` 内的数值, 接受 JSON 数字或分数字符串
pub fn bounded_number(bounds: Bounds) -> impl Fn(&str, &Value) -> Validation<Rational> {
    move |path: &str, value: &Value| {
        let number = match value {
            Value::Number(n) => number_to_rational(n).ok_or_else(|| {
                ErrorList::single(format!("{path}: 无法精确表示的数值 {n}"))
            })?,
            Value::String(_) => fraction_string(path, value)?,
            _ => {
                return Err(ErrorList::single(format!(
                    "{path}: 必须为数值 (实际值 {})",
                    describe(value)
                )));
            }
        };
        check_bounds(path, number, bounds)
    }
}

fn check_bounds(path: &str, value: Rational, bounds: Bounds) -> Validation<Rational> {
    if bounds.contains(value) {
        Ok(value)
    } else {
        Err(ErrorList::single(format!(
            "{path}: 必须在区间 {bounds} 内 (实际值 {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounds_inclusivity() {
        assert!(!Bounds::UNIT_OPEN_MIN.contains(Rational::ZERO));
        assert!(Bounds::UNIT_OPEN_MIN.contains(Rational::ONE));
        assert!(Bounds::UNIT_CLOSED.contains(Rational::ZERO));
        assert!(!Bounds::UNIT_CLOSED.contains(Rational::new(11, 10)));
        assert!(Bounds::LANDSCAPE.contains(Rational::ONE));
        assert!(!Bounds::LANDSCAPE.contains(Rational::new(9, 16)));
        assert_eq!(Bounds::UNIT_OPEN_MIN.to_string(), "(0, 1]");
        assert_eq!(Bounds::POSITIVE.to_string(), "(0, +∞)");
    }

    #[test]
    fn test_positive_integer() {
        assert_eq!(positive_integer("x", &json!(1080)), Ok(1080));
        for bad in [json!(0), json!(-3), json!(1.5), json!("1080"), json!(null)] {
            assert!(positive_integer("x", &bad).is_err(), "应拒绝: {bad}");
        }
        assert!(positive_u32("x", &json!(5_000_000_000u64)).is_err());
    }

    #[test]
    fn test_positive_number_accepts_decimals() {
        assert_eq!(
            positive_number("d", &json!(242.875)),
            Ok(Rational::new(1943, 8))
        );
        assert!(positive_number("d", &json!(0)).is_err());
        assert!(positive_number("d", &json!("242")).is_err());
    }

    #[test]
    fn test_fraction_string_distinguishes_type_and_format_errors() {
        assert_eq!(
            fraction_string("f", &json!("30000/1001")),
            Ok(Rational::new(30000, 1001))
        );

        let type_error = fraction_string("f", &json!(24));
        assert_eq!(
            type_error,
            Err(ErrorList::single("f: 必须为分数字符串 (实际值 24)"))
        );

        let format_error = fraction_string("f", &json!("24fps"));
        assert_eq!(
            format_error,
            Err(ErrorList::single("f: 无法解析为分数: \"24fps\""))
        );
    }

    #[test]
    fn test_positive_fraction_bound_error() {
        let errors = positive_fraction("VideoProps.frameRate", &json!("0"));
        assert_eq!(
            errors,
            Err(ErrorList::single(
                "VideoProps.frameRate: 必须在区间 (0, +∞) 内 (实际值 0)"
            ))
        );
    }

    #[test]
    fn test_bounded_number() {
        let check = bounded_number(Bounds::UNIT_OPEN_MIN);
        assert_eq!(check("o", &json!(0.06)), Ok(Rational::new(3, 50)));
        assert_eq!(check("o", &json!("84/100")), Ok(Rational::new(21, 25)));
        assert_eq!(check("o", &json!(1)), Ok(Rational::ONE));
        assert!(check("o", &json!(0)).is_err());
        assert!(check("o", &json!(true)).is_err());
        assert!(bounded_number(Bounds::UNIT_CLOSED)("o", &json!(0)).is_ok());
    }
}
