//! 标准宽高比列表 (AspectRatioList).

use std::ops::Deref;

use serde_json::Value;
use tizi_core::validation::{collect_all, ensure};
use tizi_core::{ErrorList, Rational, Validation};

use super::primitives::{Bounds, bounded_fraction};

const LIST: &str = "AspectRatioList";

/// 有序、互不相同的横向宽高比列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectRatioList(Vec<Rational>);

impl AspectRatioList {
    pub fn as_slice(&self) -> &[Rational] {
        &self.0
    }

    pub fn contains(&self, ratio: Rational) -> bool {
        self.0.contains(&ratio)
    }
}

impl Deref for AspectRatioList {
    type Target = [Rational];

    fn deref(&self) -> &[Rational] {
        &self.0
    }
}

/// 校验宽高比列表: 非空数组, 每项为 >= 1 的分数字符串, 且数值互不相同
pub fn validate_aspect_ratio_list(value: &Value) -> Validation<AspectRatioList> {
    let Some(items) = value.as_array() else {
        return Err(ErrorList::single(format!("{LIST}: 必须为数组")));
    };
    ensure(!items.is_empty(), || format!("{LIST}: 至少需要一个宽高比"))?;

    let check = bounded_fraction(Bounds::LANDSCAPE);
    let ratios = collect_all(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| check(format!("{LIST}[{index}]").as_str(), item)),
    )?;

    // "16/9" 与 "32/18" 视为重复
    let duplicates: ErrorList = ratios
        .iter()
        .enumerate()
        .filter_map(|(index, ratio)| {
            ratios[..index].iter().position(|r| r == ratio).map(|first| {
                format!("{LIST}[{index}]: 与 {LIST}[{first}] 重复 ({ratio})")
            })
        })
        .collect();
    duplicates.into_result()?;

    Ok(AspectRatioList(ratios))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_list_keeps_order() {
        let list = validate_aspect_ratio_list(&json!(["4/3", "16/9", "1", "2.39"]));
        let list = match list {
            Ok(list) => list,
            Err(errors) => panic!("校验失败: {errors}"),
        };
        assert_eq!(
            list.as_slice(),
            &[
                Rational::new(4, 3),
                Rational::new(16, 9),
                Rational::ONE,
                Rational::new(239, 100)
            ]
        );
        assert!(list.contains(Rational::new(32, 18)));
    }

    #[test]
    fn test_empty_and_non_array_rejected() {
        assert_eq!(
            validate_aspect_ratio_list(&json!([])),
            Err(ErrorList::single("AspectRatioList: 至少需要一个宽高比"))
        );
        assert!(validate_aspect_ratio_list(&json!("16/9")).is_err());
    }

    #[test]
    fn test_every_bad_entry_reported() {
        let errors = match validate_aspect_ratio_list(&json!(["16/9", "9/16", "x", 4])) {
            Ok(list) => panic!("应当失败: {list:?}"),
            Err(errors) => errors,
        };
        assert_eq!(errors.len(), 3, "{errors}");
        assert!(errors.contains("AspectRatioList[1]: 必须在区间 [1, +∞)"));
        assert!(errors.contains("AspectRatioList[2]: 无法解析为分数"));
        assert!(errors.contains("AspectRatioList[3]: 必须为分数字符串"));
    }

    #[test]
    fn test_duplicates_by_value_rejected() {
        let errors = validate_aspect_ratio_list(&json!(["16/9", "4/3", "32/18"]));
        assert_eq!(
            errors,
            Err(ErrorList::single(
                "AspectRatioList[2]: 与 AspectRatioList[0] 重复 (16/9)"
            ))
        );
    }
}
