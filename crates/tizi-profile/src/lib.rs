//! # tizi-profile
//!
//! 为母版变体生成完整的 ABR profile.
//!
//! 在变体引用的流中找到第一个视频流, 映射出视频属性后计算视频阶梯,
//! 再合并进基础 profile. 变体没有视频流时只返回基础 profile 中的
//! 音频阶梯. 基础 profile 中的阶梯模板字段不会出现在输出中.

pub mod defaults;
pub mod source;

use log::debug;
use serde_json::{Value, json};
use tizi_core::validation::ensure;
use tizi_core::{Accumulate, ErrorList, Validation};
use tizi_ladder::defaults::{default_aspect_ratios, default_parametric_ladder};
use tizi_ladder::schema::validate_ladder_specs;
use tizi_ladder::{TEMPLATE_FIELD, compute_video_ladder_specs, merge_into_profile, strip_template_fields};

pub use defaults::default_base_profile;
pub use source::{
    STREAM_VIDEO, SourceCatalog, SourceFile, StreamSource, Variant, VariantStream,
    find_first_video_stream, parse_sources, parse_variant, video_props_from_stream,
};

/// 为变体生成 ABR profile
///
/// - `sources`: 源文件目录 (文件路径 -> 流信息)
/// - `variant`: 变体流选择
/// - `base_profile`: 基础 profile, 可在 `video_parametric_ladder` 中携带阶梯模板
/// - `aspect_ratios`: 标准宽高比列表
pub fn compute_profile_for_variant(
    sources: &Value,
    variant: &Value,
    base_profile: &Value,
    aspect_ratios: &Value,
) -> Validation<Value> {
    let (catalog, variant, ()) = (
        parse_sources(sources),
        parse_variant(variant),
        check_base_profile(base_profile),
    )
        .accumulate()?;

    let Some(stream) = find_first_video_stream(&catalog, &variant)? else {
        debug!("变体中没有视频流, 只输出基础 profile 中的阶梯");
        let profile = strip_template_fields(base_profile);
        validate_profile_ladders(&profile)?;
        return Ok(profile);
    };

    let props = video_props_from_stream(stream);
    let template = base_profile
        .get(TEMPLATE_FIELD)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(default_parametric_ladder);
    let specs = compute_video_ladder_specs(&props, &template, aspect_ratios)?;

    let profile = merge_into_profile(base_profile, &specs)?;
    validate_profile_ladders(&profile)?;
    Ok(profile)
}

/// 使用默认基础 profile 与默认标准宽高比列表
pub fn compute_default_profile_for_variant(sources: &Value, variant: &Value) -> Validation<Value> {
    compute_profile_for_variant(
        sources,
        variant,
        &default_base_profile(),
        &default_aspect_ratios(),
    )
}

fn check_base_profile(profile: &Value) -> Validation<()> {
    let Some(fields) = profile.as_object() else {
        return Err(ErrorList::single("Profile: 必须为对象"));
    };
    let ladder_specs = fields.get("ladder_specs").filter(|v| !v.is_null());
    ensure(ladder_specs.is_none_or(Value::is_object), || {
        "Profile.ladder_specs: 必须为对象".to_string()
    })
}

/// 校验 profile 中全部阶梯 (包括原有的音频阶梯)
fn validate_profile_ladders(profile: &Value) -> Validation<()> {
    match profile.get("ladder_specs") {
        Some(ladders) if !ladders.is_null() => {
            validate_ladder_specs(&json!({ "ladder_specs": ladders })).map(|_| ())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_profile_shape_checked() {
        assert!(check_base_profile(&json!({})).is_ok());
        assert!(check_base_profile(&json!({"ladder_specs": null})).is_ok());
        assert_eq!(
            check_base_profile(&json!({"ladder_specs": []})),
            Err(ErrorList::single("Profile.ladder_specs: 必须为对象"))
        );
        assert!(check_base_profile(&json!("profile")).is_err());
    }

    #[test]
    fn test_template_in_base_profile_is_used() {
        let sources = json!({"a.mp4": {"streams": [{
            "type": "StreamVideo", "bit_rate": 5000000, "duration": 60, "frame_rate": "30",
            "height": 720, "width": 1280, "sample_aspect_ratio": "1"
        }]}});
        let variant = json!({"streams": {"video": {"sources": [{"files_api_path": "a.mp4", "stream_index": 0}]}}});
        let mut base = json!({});
        base[TEMPLATE_FIELD] = json!({
            "baseAspectRatio": "16/9",
            "baseFrameRate": "30",
            "rungSpecs": [{"dim": 720, "bitrate": 3000000}],
            "options": {"upscale": false, "snapAR": true, "maxARSnap": 0.06,
                        "minDimStepdown": 0.84, "frameRateScaleFactor": 0.5}
        });

        let profile = compute_profile_for_variant(&sources, &variant, &base, &default_aspect_ratios()).unwrap();
        assert!(profile.get(TEMPLATE_FIELD).is_none());
        let ladders = profile["ladder_specs"].as_object().unwrap();
        assert_eq!(ladders.len(), 1);
        let rungs = ladders.values().next().unwrap()["rung_specs"].as_array().unwrap();
        assert_eq!(rungs.len(), 1);
        assert_eq!(rungs[0]["bit_rate"], json!(3000000));
    }
}
