//! 有理数类型, 用于帧率、宽高比、像素宽高比等场景.
//!
//! 输入数据中的分数以字符串表示 (如 `"16/9"`, `"30000/1001"`, `"24"`, `"1.85"`),
//! 解析后始终保存为约分形式, 比较通过交叉乘法完成, 不经过浮点.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::TiziError;

/// 小数部分允许的最大位数, 防止 10 的幂溢出
const MAX_DECIMAL_DIGITS: usize = 18;

/// 有理数, 由分子和分母组成
///
/// 构造时自动约分并保证分母为正, 因此可以直接派生 `Eq` / `Hash`.
/// 分母为 0 的值表示 "未定义", 参见 [`Rational::UNDEFINED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// 零值
    pub const ZERO: Self = Self { num: 0, den: 1 };

    /// 一
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// 未定义 (分母为 0)
    pub const UNDEFINED: Self = Self { num: 0, den: 0 };

    /// 创建新的有理数, 自动约分
    ///
    /// 分母为 0 时返回 [`Rational::UNDEFINED`].
    pub fn new(num: i64, den: i64) -> Self {
        Self::from_wide(i128::from(num), i128::from(den))
    }

    /// 由整数创建
    pub const fn from_integer(value: i64) -> Self {
        Self { num: value, den: 1 }
    }

    /// 分子
    pub const fn num(&self) -> i64 {
        self.num
    }

    /// 分母
    pub const fn den(&self) -> i64 {
        self.den
    }

    /// 判断是否有效 (分母不为 0)
    pub const fn is_valid(&self) -> bool {
        self.den != 0
    }

    /// 判断是否为正数
    pub const fn is_positive(&self) -> bool {
        self.den != 0 && self.num > 0
    }

    /// 转换为 f64 浮点数
    ///
    /// 如果分母为 0, 返回 `f64::NAN`.
    pub fn to_f64(self) -> f64 {
        if self.den == 0 {
            return f64::NAN;
        }
        self.num as f64 / self.den as f64
    }

    /// 求倒数, 零的倒数为未定义
    pub fn invert(self) -> Self {
        Self::new(self.den, self.num)
    }

    /// 绝对值
    pub fn abs(self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den,
        }
    }

    /// 乘以整数
    pub fn mul_int(self, factor: i64) -> Self {
        self * Self::from_integer(factor)
    }

    /// 在 i128 上完成约分后收窄到 i64, 溢出时返回未定义
    fn from_wide(num: i128, den: i128) -> Self {
        if den == 0 {
            return Self::UNDEFINED;
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        let sign = if den < 0 { -1 } else { 1 };
        let g = g as i128;
        let num = sign * num / g;
        let den = sign * den / g;
        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(num), Ok(den)) => Self { num, den },
            _ => Self::UNDEFINED,
        }
    }

    fn combine(self, other: Self, op: impl FnOnce(i128, i128, i128, i128) -> (i128, i128)) -> Self {
        if !self.is_valid() || !other.is_valid() {
            return Self::UNDEFINED;
        }
        let (num, den) = op(
            i128::from(self.num),
            i128::from(self.den),
            i128::from(other.num),
            i128::from(other.den),
        );
        Self::from_wide(num, den)
    }
}

impl std::ops::Mul for Rational {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.combine(other, |an, ad, bn, bd| (an * bn, ad * bd))
    }
}

impl std::ops::Div for Rational {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        self.combine(other, |an, ad, bn, bd| (an * bd, ad * bn))
    }
}

impl std::ops::Add for Rational {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.combine(other, |an, ad, bn, bd| (an * bd + bn * ad, ad * bd))
    }
}

impl std::ops::Sub for Rational {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.combine(other, |an, ad, bn, bd| (an * bd - bn * ad, ad * bd))
    }
}

impl PartialOrd for Rational {
    /// 未定义的值不可比较
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.is_valid() || !other.is_valid() {
            return None;
        }
        let lhs = i128::from(self.num) * i128::from(other.den);
        let rhs = i128::from(other.num) * i128::from(self.den);
        Some(lhs.cmp(&rhs))
    }
}

impl fmt::Display for Rational {
    /// 整数省略分母, 与输入数据中的写法保持一致 (如 `"24"`, `"16/9"`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Rational {
    type Err = TiziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || TiziError::InvalidFraction(s.to_string());

        let (num, den) = match text.split_once('/') {
            Some((num, den)) => (parse_decimal(num.trim()), parse_decimal(den.trim())),
            None => (parse_decimal(text), Some(Rational::ONE)),
        };
        let (num, den) = match (num, den) {
            (Some(num), Some(den)) => (num, den),
            _ => return Err(invalid()),
        };
        if den.num == 0 {
            return Err(invalid());
        }
        let value = num / den;
        if value.is_valid() {
            Ok(value)
        } else {
            Err(invalid())
        }
    }
}

impl From<i64> for Rational {
    fn from(num: i64) -> Self {
        Self::from_integer(num)
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Self::new(num, den)
    }
}

/// 序列化为分数字符串 (`"24"`, `"30000/1001"`)
impl serde::Serialize for Rational {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Rational {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// 解析 `"-12"`, `"29.97"`, `".5"` 形式的十进制数
fn parse_decimal(text: &str) -> Option<Rational> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if frac_part.len() > MAX_DECIMAL_DIGITS {
        return None;
    }

    let int_value: i64 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
    let scale = 10i64.checked_pow(frac_part.len() as u32)?;
    let frac_value: i64 = if frac_part.is_empty() { 0 } else { frac_part.parse().ok()? };
    let num = int_value.checked_mul(scale)?.checked_add(frac_value)?;
    let num = if negative { -num } else { num };
    let value = Rational::new(num, scale);
    value.is_valid().then_some(value)
}

/// 求最大公约数 (欧几里得算法)
fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    if a == 0 { 1 } else { a }
}
