//! 宽高比工具: 显示宽高比计算、方向归一化、标准宽高比匹配.

use crate::rational::Rational;

/// 在候选列表中找到的最接近的宽高比
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatioMatch {
    /// 在候选列表中的下标
    pub index: usize,
    /// 候选宽高比 (横向)
    pub ratio: Rational,
    /// 与目标的相对差值 `|target - ratio| / ratio`
    pub difference: f64,
}

/// 计算显示宽高比: `width * sample_aspect_ratio / height`
pub fn display_aspect_ratio(width: u32, height: u32, sample_aspect_ratio: Rational) -> Rational {
    Rational::new(i64::from(width), i64::from(height)) * sample_aspect_ratio
}

/// 是否为竖向 (宽度小于高度)
pub fn is_portrait(ratio: Rational) -> bool {
    ratio < Rational::ONE
}

/// 归一化为横向 (宽 >= 高)
pub fn landscape(ratio: Rational) -> Rational {
    if is_portrait(ratio) {
        ratio.invert()
    } else {
        ratio
    }
}

/// 将横向宽高比转换回 `reference` 的方向
pub fn orient_like(ratio: Rational, reference: Rational) -> Rational {
    if is_portrait(reference) {
        landscape(ratio).invert()
    } else {
        landscape(ratio)
    }
}

/// 相对差值 `|value - reference| / reference`
pub fn relative_difference(value: Rational, reference: Rational) -> f64 {
    ((value - reference) / reference).abs().to_f64()
}

/// 从 `from` 变换到 `to` 的缩放系数 (`to / from`)
pub fn scale_factor(from: Rational, to: Rational) -> Rational {
    to / from
}

/// 在横向候选列表中查找与 `target` 最接近的宽高比
///
/// `target` 先归一化为横向再比较, 差值相同时取列表中靠前的一项.
/// 候选列表为空时返回 `None`.
pub fn closest_match(target: Rational, catalog: &[Rational]) -> Option<AspectRatioMatch> {
    let target = landscape(target);
    let mut best: Option<AspectRatioMatch> = None;
    for (index, &ratio) in catalog.iter().enumerate() {
        let difference = relative_difference(target, ratio);
        if difference.is_nan() {
            continue;
        }
        if best.is_none_or(|b| difference < b.difference) {
            best = Some(AspectRatioMatch {
                index,
                ratio,
                difference,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standards() -> Vec<Rational> {
        vec![
            Rational::ONE,
            Rational::new(4, 3),
            Rational::new(16, 9),
            Rational::new(37, 20),
            Rational::new(239, 100),
        ]
    }

    #[test]
    fn test_display_aspect_ratio_applies_sample_aspect_ratio() {
        assert_eq!(
            display_aspect_ratio(1920, 1080, Rational::ONE),
            Rational::new(16, 9)
        );
        assert_eq!(
            display_aspect_ratio(1440, 1080, Rational::new(4, 3)),
            Rational::new(16, 9)
        );
    }

    #[test]
    fn test_closest_match_exact() {
        let m = closest_match(Rational::new(16, 9), &standards());
        assert_eq!(m.map(|m| (m.index, m.ratio)), Some((2, Rational::new(16, 9))));
        assert_eq!(m.map(|m| m.difference), Some(0.0));
    }

    #[test]
    fn test_closest_match_nearby_and_portrait() {
        // 1920x1040 ≈ 1.846, 更接近 1.85
        let m = closest_match(Rational::new(1920, 1040), &standards());
        assert_eq!(m.map(|m| m.ratio), Some(Rational::new(37, 20)));

        // 竖屏 9:16 与横屏 16:9 匹配同一项
        let m = closest_match(Rational::new(9, 16), &standards());
        assert_eq!(m.map(|m| m.ratio), Some(Rational::new(16, 9)));
    }

    #[test]
    fn test_closest_match_empty_catalog() {
        assert!(closest_match(Rational::new(16, 9), &[]).is_none());
    }

    #[test]
    fn test_orientation_helpers() {
        let portrait = Rational::new(9, 16);
        assert!(is_portrait(portrait));
        assert_eq!(landscape(portrait), Rational::new(16, 9));
        assert_eq!(orient_like(Rational::new(16, 9), portrait), portrait);
        assert_eq!(orient_like(Rational::new(16, 9), Rational::new(4, 3)), Rational::new(16, 9));
    }

    #[test]
    fn test_scale_factor_and_relative_difference() {
        assert_eq!(
            scale_factor(Rational::new(16, 9), Rational::new(4, 3)),
            Rational::new(3, 4)
        );
        let diff = relative_difference(Rational::new(2, 1), Rational::new(16, 10));
        assert!((diff - 0.25).abs() < 1e-12);
    }
}
