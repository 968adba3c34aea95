//! 参数化阶梯计算.
//!
//! 输入均已通过校验. 计算过程:
//! 1. 源属性与阶梯限制比对, 超出范围的属性全部报告;
//! 2. 计算源显示宽高比, 按需吸附到标准宽高比;
//! 3. 每个梯级按基准像素面积换算到目标宽高比, 不允许放大时以源的存储尺寸为界缩小或丢弃;
//! 4. 按像素面积与帧率换算码率, 应用最终码率上限;
//! 5. 按码率降序排列并去除码率相同的梯级.

use std::fmt;

use log::debug;
use tizi_core::aspect_ratio::{closest_match, display_aspect_ratio, orient_like, scale_factor};
use tizi_core::validation::collect_all;
use tizi_core::{Accumulate, ErrorList, Rational, TiziError, Validation};

use crate::schema::{AspectRatioList, LadderLimits, ParametricLadder, RungSpec, VideoProps};

/// 计算得到的梯级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedRung {
    /// 对应模板中 `rungSpecs` 的下标
    pub template_index: usize,
    pub width: u32,
    pub height: u32,
    pub bit_rate: u64,
    pub frame_rate: Rational,
}

/// 计算结果: 最终宽高比与按码率降序排列的梯级
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedLadder {
    pub aspect_ratio: Rational,
    pub rungs: Vec<ComputedRung>,
}

/// 源视频的存储尺寸, 不允许放大时梯级不得超出
///
/// 像素宽高比只影响阶梯的宽高比, 不扩大这个边界.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceBox {
    width: u32,
    height: u32,
}

impl SourceBox {
    fn of(props: &VideoProps) -> Self {
        Self {
            width: props.width,
            height: props.height,
        }
    }

    fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

/// 由宽高比列表、阶梯模板与源属性计算具体梯级
///
/// 宽高比吸附失败与源属性超限属于互相独立的错误, 会一并返回.
pub fn compute_values(
    aspect_ratios: &AspectRatioList,
    ladder: &ParametricLadder,
    props: &VideoProps,
) -> Validation<ComputedLadder> {
    let (aspect_ratio, ()) = (
        resolve_aspect_ratio(aspect_ratios, ladder, props),
        check_source_limits(ladder.limits.as_ref(), props),
    )
        .accumulate()?;

    let source = SourceBox::of(props);
    debug!(
        "源 {}x{} (SAR {}), 阶梯宽高比 {}",
        source.width, source.height, props.sample_aspect_ratio, aspect_ratio
    );

    let options = &ladder.options;
    let frame_rate_factor = frame_rate_factor(
        props.frame_rate,
        ladder.base_frame_rate,
        options.frame_rate_scale_factor,
    );
    let final_bitrate_max = ladder.limits.as_ref().and_then(|l| l.final_bitrate_max);

    let sized: Vec<(usize, Area)> =
        collect_all(ladder.rung_specs.iter().enumerate().map(|(index, spec)| {
            Area::of(spec, ladder.base_aspect_ratio, aspect_ratio)
                .map(|area| (index, area))
                .ok_or_else(|| ErrorList::from(TiziError::RungOutOfRange { index, dim: spec.dim }))
        }))?;

    let mut placed: Vec<(usize, u32, u32)> = sized
        .iter()
        .filter_map(|&(index, area)| {
            if options.upscale || source.fits(area.width, area.height) {
                return Some((index, area.width, area.height));
            }
            let factor = area.fit_factor(source);
            if factor < options.min_dim_stepdown {
                debug!(
                    "梯级 {index}: {}x{} 超出源尺寸, 缩小系数 {factor} 低于 minDimStepdown, 丢弃",
                    area.width, area.height
                );
                return None;
            }
            let Some((width, height)) = area.scaled(factor) else {
                debug!("梯级 {index}: 缩小后不足 2 像素, 丢弃");
                return None;
            };
            debug!(
                "梯级 {index}: {}x{} 缩小为 {width}x{height} (系数 {factor})",
                area.width, area.height
            );
            Some((index, width, height))
        })
        .collect();

    if placed.is_empty() {
        // 所有梯级都被丢弃时, 强制缩小面积最小的梯级
        let smallest = sized
            .iter()
            .min_by(|(_, a), (_, b)| a.pixels.total_cmp(&b.pixels))
            .ok_or_else(|| ErrorList::from(TiziError::EmptyLadder))?;
        let (index, area) = *smallest;
        let (width, height) = area.scaled(area.fit_factor(source)).ok_or_else(|| {
            ErrorList::from(TiziError::SourceTooSmall {
                width: source.width,
                height: source.height,
            })
        })?;
        debug!("梯级 {index}: 强制缩小为 {width}x{height}");
        placed.push((index, width, height));
    }

    let mut rungs: Vec<ComputedRung> = placed
        .into_iter()
        .map(|(index, width, height)| {
            let spec = &ladder.rung_specs[index];
            let base_area = sized[index].1.base_pixels;
            let area_ratio = f64::from(width) * f64::from(height) / base_area;
            let mut bit_rate = round_bitrate(spec.bitrate as f64 * area_ratio * frame_rate_factor);
            if let Some(max) = final_bitrate_max.filter(|&max| bit_rate > max) {
                debug!("梯级 {index}: 码率 {bit_rate} 限制为 finalBitrateMax {max}");
                bit_rate = max;
            }
            ComputedRung {
                template_index: index,
                width,
                height,
                bit_rate,
                frame_rate: props.frame_rate,
            }
        })
        .collect();

    rungs.sort_by(|a, b| b.bit_rate.cmp(&a.bit_rate));
    rungs.dedup_by(|later, kept| later.bit_rate == kept.bit_rate);

    Ok(ComputedLadder {
        aspect_ratio,
        rungs,
    })
}

/// 确定阶梯使用的宽高比
///
/// 关闭吸附时直接使用源显示宽高比. 开启时选取最接近的标准宽高比,
/// 相对差值超过 `maxARSnap` 视为错误; 竖屏源保持竖屏方向.
pub fn resolve_aspect_ratio(
    aspect_ratios: &AspectRatioList,
    ladder: &ParametricLadder,
    props: &VideoProps,
) -> Validation<Rational> {
    let native = display_aspect_ratio(props.width, props.height, props.sample_aspect_ratio);
    if !ladder.options.snap_ar {
        return Ok(native);
    }

    let Some(closest) = closest_match(native, aspect_ratios) else {
        return Err(TiziError::Internal("标准宽高比列表为空".into()).into());
    };
    let max = ladder.options.max_ar_snap;
    if closest.difference > max.to_f64() {
        return Err(TiziError::AspectRatioSnap {
            source_ratio: native.to_string(),
            closest: closest.ratio.to_string(),
            difference: closest.difference,
            max: max.to_string(),
        }
        .into());
    }
    Ok(orient_like(closest.ratio, native))
}

/// 源属性与阶梯限制中输入侧约束的比对, 所有超限项都会报告
pub fn check_source_limits(limits: Option<&LadderLimits>, props: &VideoProps) -> Validation<()> {
    let Some(limits) = limits else {
        return Ok(());
    };
    let aspect_ratio = display_aspect_ratio(props.width, props.height, props.sample_aspect_ratio);
    let file_size = props.estimated_file_size();
    let integer = |n: u64| Rational::from_integer(i64::try_from(n).unwrap_or(i64::MAX));
    let dimension = |n: u32| Rational::from_integer(i64::from(n));

    (
        in_range(
            "aspectRatio",
            aspect_ratio,
            aspect_ratio,
            limits.aspect_ratio_min,
            limits.aspect_ratio_max,
        ),
        in_range(
            "avgBitrate",
            props.avg_bitrate,
            integer(props.avg_bitrate),
            limits.avg_bitrate_min.map(integer),
            limits.avg_bitrate_max.map(integer),
        ),
        in_range(
            "fileSize",
            format!("{:.0}", file_size.to_f64()),
            file_size,
            limits.file_size_min.map(integer),
            limits.file_size_max.map(integer),
        ),
        in_range(
            "duration",
            props.duration,
            props.duration,
            limits.duration_min.map(integer),
            limits.duration_max.map(integer),
        ),
        in_range(
            "frameRate",
            props.frame_rate,
            props.frame_rate,
            limits.frame_rate_min,
            limits.frame_rate_max,
        ),
        in_range(
            "height",
            props.height,
            dimension(props.height),
            limits.height_min.map(dimension),
            limits.height_max.map(dimension),
        ),
        in_range(
            "sampleAspectRatio",
            props.sample_aspect_ratio,
            props.sample_aspect_ratio,
            limits.sample_aspect_ratio_min,
            limits.sample_aspect_ratio_max,
        ),
        in_range(
            "width",
            props.width,
            dimension(props.width),
            limits.width_min.map(dimension),
            limits.width_max.map(dimension),
        ),
    )
        .accumulate()
        .map(|_| ())
}

/// `property` 落在 `[min, max]` 内, 否则给出对应限制名的错误
fn in_range(
    property: &'static str,
    shown: impl fmt::Display,
    value: Rational,
    min: Option<Rational>,
    max: Option<Rational>,
) -> Validation<()> {
    let mut errors = ErrorList::new();
    if let Some(min) = min.filter(|&min| value < min) {
        errors.push(out_of_range(property, &shown, "Min", min));
    }
    if let Some(max) = max.filter(|&max| value > max) {
        errors.push(out_of_range(property, &shown, "Max", max));
    }
    errors.into_result()
}

fn out_of_range(
    property: &'static str,
    shown: &dyn fmt::Display,
    side: &str,
    bound: Rational,
) -> String {
    // 限制名与 limits 中的字段名一致
    TiziError::SourceOutOfRange {
        property,
        value: shown.to_string(),
        limit: format!("{property}{side}"),
        bound: bound.to_string(),
    }
    .to_string()
}

/// 梯级在目标宽高比下的尺寸
#[derive(Debug, Clone, Copy, PartialEq)]
struct Area {
    width: u32,
    height: u32,
    /// 取整后的像素数
    pixels: f64,
    /// 基准宽高比下的像素数 `dim^2 * baseAspectRatio`
    base_pixels: f64,
}

impl Area {
    /// 保持基准像素面积不变, 换算到 `aspect_ratio`
    ///
    /// 宽或高超出 `u32` 时返回 `None`.
    fn of(spec: &RungSpec, base_aspect_ratio: Rational, aspect_ratio: Rational) -> Option<Self> {
        let dim = f64::from(spec.dim);
        let base_pixels = dim * dim * base_aspect_ratio.to_f64();
        let ratio = aspect_ratio.to_f64();
        let width = round_even((base_pixels * ratio).sqrt())?;
        let height = round_even((base_pixels / ratio).sqrt())?;
        Some(Self {
            width,
            height,
            pixels: f64::from(width) * f64::from(height),
            base_pixels,
        })
    }

    /// 恰好放入源尺寸所需的缩放系数
    fn fit_factor(&self, source: SourceBox) -> Rational {
        let dimension = |n: u32| Rational::from_integer(i64::from(n));
        let horizontal = scale_factor(dimension(self.width), dimension(source.width));
        let vertical = scale_factor(dimension(self.height), dimension(source.height));
        if horizontal < vertical { horizontal } else { vertical }
    }

    /// 按 `factor` 缩小, 向下取偶数; 任一边不足 2 时返回 `None`
    fn scaled(&self, factor: Rational) -> Option<(u32, u32)> {
        let scale = |dim: u32| {
            let scaled = Rational::from_integer(i64::from(dim)) * factor;
            if !scaled.is_valid() {
                return None;
            }
            floor_even(scaled.num().div_euclid(scaled.den()))
        };
        Some((scale(self.width)?, scale(self.height)?))
    }
}

/// 帧率对码率的影响: `1 + weight * (source / base - 1)`
fn frame_rate_factor(source: Rational, base: Rational, weight: Rational) -> f64 {
    (Rational::ONE + weight * (source / base - Rational::ONE)).to_f64()
}

/// 四舍五入到最接近的偶数, 至少为 2; 超出 `u32` 时返回 `None`
fn round_even(value: f64) -> Option<u32> {
    let even = ((value / 2.0).round() * 2.0).max(2.0);
    (even <= f64::from(u32::MAX)).then_some(even as u32)
}

/// 向下取偶数, 不足 2 时返回 `None`
fn floor_even(value: i64) -> Option<u32> {
    let even = value - value.rem_euclid(2);
    u32::try_from(even).ok().filter(|&even| even >= 2)
}

/// 码率四舍五入, 至少为 1
fn round_bitrate(value: f64) -> u64 {
    let rounded = value.round();
    if rounded < 1.0 { 1 } else { rounded as u64 }
}
