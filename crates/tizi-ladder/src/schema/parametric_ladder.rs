//! 参数化阶梯模板 (ParametricLadder) 的结构与校验.

use std::fmt;

use serde_json::Value;
use tizi_core::validation::{collect_all, ensure};
use tizi_core::{Accumulate, ErrorList, Rational, Validation};

use super::RecordView;
use super::primitives::{
    Bounds, boolean, bounded_fraction, bounded_number, positive_fraction, positive_integer,
    positive_u32,
};

const LADDER: &str = "ParametricLadder";

const OPTION_FIELDS: &[&str] = &[
    "upscale",
    "snapAR",
    "maxARSnap",
    "minDimStepdown",
    "frameRateScaleFactor",
];

const LIMIT_FIELDS: &[&str] = &[
    "aspectRatioMax",
    "aspectRatioMin",
    "avgBitrateMax",
    "avgBitrateMin",
    "fileSizeMax",
    "fileSizeMin",
    "durationMax",
    "durationMin",
    "finalBitrateMax",
    "frameRateMax",
    "frameRateMin",
    "heightMax",
    "heightMin",
    "sampleAspectRatioMax",
    "sampleAspectRatioMin",
    "widthMax",
    "widthMin",
];

const RUNG_FIELDS: &[&str] = &["dim", "bitrate"];

/// 阶梯模板中的一级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RungSpec {
    /// 基准宽高比下的短边像素数
    pub dim: u32,
    /// 基准宽高比、基准帧率下的目标码率 (bit/s)
    pub bitrate: u64,
}

/// 阶梯策略选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderOptions {
    /// 允许输出尺寸超过源尺寸
    pub upscale: bool,
    /// 将源宽高比吸附到最接近的标准宽高比
    pub snap_ar: bool,
    /// 吸附时允许的最大相对差值, (0, 1]
    pub max_ar_snap: Rational,
    /// 缩小梯级以适配源尺寸时允许的最小缩放系数, (0, 1]
    pub min_dim_stepdown: Rational,
    /// 帧率差异对码率的影响权重, [0, 1]
    pub frame_rate_scale_factor: Rational,
}

/// 阶梯限制, 每个字段都是可选的
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LadderLimits {
    pub aspect_ratio_max: Option<Rational>,
    pub aspect_ratio_min: Option<Rational>,
    pub avg_bitrate_max: Option<u64>,
    pub avg_bitrate_min: Option<u64>,
    pub file_size_max: Option<u64>,
    pub file_size_min: Option<u64>,
    pub duration_max: Option<u64>,
    pub duration_min: Option<u64>,
    pub final_bitrate_max: Option<u64>,
    pub frame_rate_max: Option<Rational>,
    pub frame_rate_min: Option<Rational>,
    pub height_max: Option<u32>,
    pub height_min: Option<u32>,
    pub sample_aspect_ratio_max: Option<Rational>,
    pub sample_aspect_ratio_min: Option<Rational>,
    pub width_max: Option<u32>,
    pub width_min: Option<u32>,
}

/// 参数化阶梯模板
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricLadder {
    pub base_aspect_ratio: Rational,
    pub base_frame_rate: Rational,
    /// 非空, 顺序即优先级
    pub rung_specs: Vec<RungSpec>,
    pub options: LadderOptions,
    pub limits: Option<LadderLimits>,
}

/// 校验参数化阶梯模板
pub fn validate_parametric_ladder(value: &Value) -> Validation<ParametricLadder> {
    let record = RecordView::open(LADDER, value)?;
    let (base_aspect_ratio, base_frame_rate, rung_specs, options, limits) = (
        record.required("baseAspectRatio", bounded_fraction(Bounds::LANDSCAPE)),
        record.required("baseFrameRate", positive_fraction),
        record.required("rungSpecs", validate_rung_specs),
        record.required("options", validate_options),
        record.optional("limits", validate_limits),
    )
        .accumulate()?;

    Ok(ParametricLadder {
        base_aspect_ratio,
        base_frame_rate,
        rung_specs,
        options,
        limits,
    })
}

fn validate_rung_specs(path: &str, value: &Value) -> Validation<Vec<RungSpec>> {
    let Some(items) = value.as_array() else {
        return Err(ErrorList::single(format!("{path}: 必须为数组")));
    };
    ensure(!items.is_empty(), || format!("{path}: 至少需要一个梯级"))?;

    collect_all(items.iter().enumerate().map(|(index, item)| -> Validation<RungSpec> {
        let record = RecordView::open(format!("{path}[{index}]"), item)?;
        let (dim, bitrate, ()) = (
            record.required("dim", positive_u32),
            record.required("bitrate", positive_integer),
            record.sealed(RUNG_FIELDS),
        )
            .accumulate()?;
        Ok(RungSpec { dim, bitrate })
    }))
}

fn validate_options(path: &str, value: &Value) -> Validation<LadderOptions> {
    let record = RecordView::open(path, value)?;
    let (upscale, snap_ar, max_ar_snap, min_dim_stepdown, frame_rate_scale_factor, ()) = (
        record.required("upscale", boolean),
        record.required("snapAR", boolean),
        record.required("maxARSnap", bounded_number(Bounds::UNIT_OPEN_MIN)),
        record.required("minDimStepdown", bounded_number(Bounds::UNIT_OPEN_MIN)),
        record.required("frameRateScaleFactor", bounded_number(Bounds::UNIT_CLOSED)),
        record.sealed(OPTION_FIELDS),
    )
        .accumulate()?;

    Ok(LadderOptions {
        upscale,
        snap_ar,
        max_ar_snap,
        min_dim_stepdown,
        frame_rate_scale_factor,
    })
}

fn validate_limits(path: &str, value: &Value) -> Validation<LadderLimits> {
    let record = RecordView::open(path, value)?;

    let ratios = (
        record.optional("aspectRatioMax", positive_fraction),
        record.optional("aspectRatioMin", positive_fraction),
        record.optional("frameRateMax", positive_fraction),
        record.optional("frameRateMin", positive_fraction),
        record.optional("sampleAspectRatioMax", positive_fraction),
        record.optional("sampleAspectRatioMin", positive_fraction),
    )
        .accumulate();
    let integers = (
        record.optional("avgBitrateMax", positive_integer),
        record.optional("avgBitrateMin", positive_integer),
        record.optional("fileSizeMax", positive_integer),
        record.optional("fileSizeMin", positive_integer),
        record.optional("durationMax", positive_integer),
        record.optional("durationMin", positive_integer),
        record.optional("finalBitrateMax", positive_integer),
    )
        .accumulate();
    let dimensions = (
        record.optional("heightMax", positive_u32),
        record.optional("heightMin", positive_u32),
        record.optional("widthMax", positive_u32),
        record.optional("widthMin", positive_u32),
    )
        .accumulate();

    let (ratios, integers, dimensions, ()) =
        (ratios, integers, dimensions, record.sealed(LIMIT_FIELDS)).accumulate()?;
    let (
        aspect_ratio_max,
        aspect_ratio_min,
        frame_rate_max,
        frame_rate_min,
        sample_aspect_ratio_max,
        sample_aspect_ratio_min,
    ) = ratios;
    let (
        avg_bitrate_max,
        avg_bitrate_min,
        file_size_max,
        file_size_min,
        duration_max,
        duration_min,
        final_bitrate_max,
    ) = integers;
    let (height_max, height_min, width_max, width_min) = dimensions;

    let limits = LadderLimits {
        aspect_ratio_max,
        aspect_ratio_min,
        avg_bitrate_max,
        avg_bitrate_min,
        file_size_max,
        file_size_min,
        duration_max,
        duration_min,
        final_bitrate_max,
        frame_rate_max,
        frame_rate_min,
        height_max,
        height_min,
        sample_aspect_ratio_max,
        sample_aspect_ratio_min,
        width_max,
        width_min,
    };

    let prefix = format!("{path}: ");
    (
        max_gte_min("aspectRatio", limits.aspect_ratio_max, limits.aspect_ratio_min),
        max_gte_min("avgBitrate", limits.avg_bitrate_max, limits.avg_bitrate_min),
        max_gte_min("fileSize", limits.file_size_max, limits.file_size_min),
        max_gte_min("duration", limits.duration_max, limits.duration_min),
        max_gte_min("frameRate", limits.frame_rate_max, limits.frame_rate_min),
        max_gte_min("height", limits.height_max, limits.height_min),
        max_gte_min(
            "sampleAspectRatio",
            limits.sample_aspect_ratio_max,
            limits.sample_aspect_ratio_min,
        ),
        max_gte_min("width", limits.width_max, limits.width_min),
    )
        .accumulate()
        .map_err(|errors| errors.prefixed(&prefix))?;

    Ok(limits)
}

/// `{prefix}Max >= {prefix}Min`, 任一端缺失时视为满足
fn max_gte_min<T: PartialOrd + fmt::Display>(
    prefix: &str,
    max: Option<T>,
    min: Option<T>,
) -> Validation<()> {
    match (max, min) {
        (Some(max), Some(min)) => ensure(max >= min, || {
            format!("{prefix}Max ({max}) 必须大于等于 {prefix}Min ({min})")
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ladder() -> Value {
        json!({
            "baseAspectRatio": "16/9",
            "baseFrameRate": "30",
            "rungSpecs": [
                {"dim": 1080, "bitrate": 14000000},
                {"dim": 720, "bitrate": 7000000}
            ],
            "options": {
                "upscale": false,
                "snapAR": true,
                "maxARSnap": 0.06,
                "minDimStepdown": 0.84,
                "frameRateScaleFactor": 0.5
            }
        })
    }

    fn expect_errors(value: &Value) -> ErrorList {
        match validate_parametric_ladder(value) {
            Ok(ladder) => panic!("应当失败: {ladder:?}"),
            Err(errors) => errors,
        }
    }

    #[test]
    fn test_valid_ladder() {
        let ladder = match validate_parametric_ladder(&ladder()) {
            Ok(ladder) => ladder,
            Err(errors) => panic!("校验失败: {errors}"),
        };
        assert_eq!(ladder.base_aspect_ratio, Rational::new(16, 9));
        assert_eq!(ladder.rung_specs.len(), 2);
        assert_eq!(ladder.options.max_ar_snap, Rational::new(3, 50));
        assert!(ladder.limits.is_none());
    }

    #[test]
    fn test_empty_rung_specs_rejected() {
        let mut value = ladder();
        value["rungSpecs"] = json!([]);
        let errors = expect_errors(&value);
        assert!(errors.contains("ParametricLadder.rungSpecs: 至少需要一个梯级"));
    }

    #[test]
    fn test_rung_spec_is_sealed() {
        let mut value = ladder();
        value["rungSpecs"][1]["label"] = json!("720p");
        value["rungSpecs"][0]["dim"] = json!(0);
        let errors = expect_errors(&value);
        assert_eq!(errors.len(), 2, "{errors}");
        assert!(errors.contains("ParametricLadder.rungSpecs[0].dim"));
        assert!(errors.contains("ParametricLadder.rungSpecs[1]: 不允许的字段 'label'"));
    }

    #[test]
    fn test_options_bounds_and_unknown_fields() {
        let mut value = ladder();
        value["options"]["maxARSnap"] = json!(0);
        value["options"]["frameRateScaleFactor"] = json!(1.5);
        value["options"]["turbo"] = json!(true);
        let errors = expect_errors(&value);
        assert_eq!(errors.len(), 3, "{errors}");
        assert!(errors.contains("options.maxARSnap: 必须在区间 (0, 1]"));
        assert!(errors.contains("options.frameRateScaleFactor: 必须在区间 [0, 1]"));
        assert!(errors.contains("不允许的字段 'turbo'"));
    }

    #[test]
    fn test_portrait_base_aspect_ratio_rejected() {
        let mut value = ladder();
        value["baseAspectRatio"] = json!("9/16");
        let errors = expect_errors(&value);
        assert!(errors.contains("ParametricLadder.baseAspectRatio: 必须在区间 [1, +∞)"));
    }

    #[test]
    fn test_limits_max_must_not_be_below_min() {
        let mut value = ladder();
        value["limits"] = json!({
            "heightMax": 720,
            "heightMin": 1080,
            "frameRateMax": "24",
            "frameRateMin": "30000/1001",
            "durationMax": 600
        });
        let errors = expect_errors(&value);
        assert_eq!(
            errors.into_vec(),
            vec![
                "ParametricLadder.limits: frameRateMax (24) 必须大于等于 frameRateMin (30000/1001)"
                    .to_string(),
                "ParametricLadder.limits: heightMax (720) 必须大于等于 heightMin (1080)".to_string(),
            ]
        );
    }

    #[test]
    fn test_limits_accepted() {
        let mut value = ladder();
        value["limits"] = json!({"finalBitrateMax": 8000000, "widthMin": 320, "widthMax": 7680});
        let ladder = validate_parametric_ladder(&value);
        let limits = ladder.ok().and_then(|l| l.limits);
        assert_eq!(limits.and_then(|l| l.final_bitrate_max), Some(8_000_000));
    }

    #[test]
    fn test_limits_unknown_field_rejected() {
        let mut value = ladder();
        value["limits"] = json!({"bitrateMax": 1});
        let errors = expect_errors(&value);
        assert!(errors.contains("ParametricLadder.limits: 不允许的字段 'bitrateMax'"));
    }
}
