//! 错误累积式校验.
//!
//! 与 `?` 的 "遇错即停" 不同, 这里的组合方式会先独立校验每一项输入,
//! 再把所有失败消息合并后一次性返回:
//!
//! ```
//! use tizi_core::validation::{Accumulate, ErrorList, Validation};
//!
//! let a: Validation<u32> = Err(ErrorList::single("a 无效"));
//! let b: Validation<u32> = Err(ErrorList::single("b 无效"));
//! let errors = (a, b).accumulate().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

use std::fmt;

use crate::error::TiziError;

/// 有序且去重的错误消息列表
///
/// 多行消息按行拆分为多条, 重复消息只保留第一次出现的位置.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList {
    messages: Vec<String>,
}

/// 校验结果: 成功值或非空的错误列表
pub type Validation<T> = Result<T, ErrorList>;

impl ErrorList {
    /// 创建空列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 仅包含一条消息的列表
    pub fn single(message: impl Into<String>) -> Self {
        let mut list = Self::new();
        list.push(message);
        list
    }

    /// 追加消息
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        for line in message.split('\n').map(str::trim_end) {
            if line.is_empty() || self.messages.iter().any(|m| m == line) {
                continue;
            }
            self.messages.push(line.to_string());
        }
    }

    /// 合并另一个列表
    pub fn extend(&mut self, other: ErrorList) {
        for message in other.messages {
            self.push(message);
        }
    }

    /// 为每条消息添加前缀 (如 `"ParametricLadder.options: "`)
    pub fn prefixed(self, prefix: &str) -> Self {
        let mut list = Self::new();
        for message in self.messages {
            list.push(format!("{prefix}{message}"));
        }
        list
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// 是否存在包含 `needle` 的消息
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }

    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }

    /// 空列表视为成功
    pub fn into_result(self) -> Validation<()> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("\n"))
    }
}

impl std::error::Error for ErrorList {}

impl From<TiziError> for ErrorList {
    fn from(err: TiziError) -> Self {
        Self::single(err.to_string())
    }
}

impl From<String> for ErrorList {
    fn from(message: String) -> Self {
        Self::single(message)
    }
}

impl From<&str> for ErrorList {
    fn from(message: &str) -> Self {
        Self::single(message)
    }
}

impl FromIterator<String> for ErrorList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut list = Self::new();
        for message in iter {
            list.push(message);
        }
        list
    }
}

impl IntoIterator for ErrorList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

/// 条件不成立时返回一条错误
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Validation<()> {
    if condition {
        Ok(())
    } else {
        Err(ErrorList::single(message()))
    }
}

/// 校验序列中的每一项, 收集全部错误
pub fn collect_all<T, I>(items: I) -> Validation<Vec<T>>
where
    I: IntoIterator<Item = Validation<T>>,
{
    let mut values = Vec::new();
    let mut errors = ErrorList::new();
    for item in items {
        match item {
            Ok(value) => values.push(value),
            Err(err) => errors.extend(err),
        }
    }
    if errors.is_empty() { Ok(values) } else { Err(errors) }
}

/// 元组形式的独立校验结果组合 (applicative)
///
/// 所有分量都成功时返回值元组, 否则返回全部分量错误的并集.
pub trait Accumulate {
    type Output;

    fn accumulate(self) -> Validation<Self::Output>;
}

macro_rules! impl_accumulate {
    ($($T:ident $v:ident),+) => {
        impl<$($T),+> Accumulate for ($(Validation<$T>,)+) {
            type Output = ($($T,)+);

            fn accumulate(self) -> Validation<Self::Output> {
                let ($($v,)+) = self;
                let mut errors = ErrorList::new();
                $(
                    let $v = match $v {
                        Ok(value) => Some(value),
                        Err(err) => {
                            errors.extend(err);
                            None
                        }
                    };
                )+
                match ($($v,)+) {
                    ($(Some($v),)+) => Ok(($($v,)+)),
                    _ => Err(errors),
                }
            }
        }
    };
}

impl_accumulate!(A a);
impl_accumulate!(A a, B b);
impl_accumulate!(A a, B b, C c);
impl_accumulate!(A a, B b, C c, D d);
impl_accumulate!(A a, B b, C c, D d, E e);
impl_accumulate!(A a, B b, C c, D d, E e, F f);
impl_accumulate!(A a, B b, C c, D d, E e, F f, G g);
impl_accumulate!(A a, B b, C c, D d, E e, F f, G g, H h);
impl_accumulate!(A a, B b, C c, D d, E e, F f, G g, H h, I i);
impl_accumulate!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j);
impl_accumulate!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k);
impl_accumulate!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l);
