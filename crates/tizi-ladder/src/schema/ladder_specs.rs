//! 输出结构 (LadderSpecs) 的校验.

use serde_json::Value;
use tizi_core::validation::{collect_all, ensure};
use tizi_core::{Accumulate, ErrorList, MediaType, Validation};

use super::RecordView;
use super::primitives::{positive_fraction, positive_integer, positive_u32};
use crate::ladder_specs::{LadderKey, LadderSpec, LadderSpecs, Rung};

const SPECS: &str = "LadderSpecs";

/// 校验 `{ "ladder_specs": {...} }` 形式的阶梯集合
///
/// 每个键必须是规范形式的阶梯键, 每个阶梯至少一个梯级, 梯级的
/// `media_type` 与键一致, 码率为正且严格递减; 视频梯级另需偶数宽高与正帧率.
pub fn validate_ladder_specs(value: &Value) -> Validation<LadderSpecs> {
    let record = RecordView::open(SPECS, value)?;
    let entries = record.required("ladder_specs", |path, value| {
        value
            .as_object()
            .ok_or_else(|| ErrorList::single(format!("{path}: 必须为对象")))
    })?;
    let path = record.field_path("ladder_specs");

    let specs = collect_all(entries.iter().map(
        |(key_text, entry)| -> Validation<(LadderKey, LadderSpec)> {
            let entry_path = format!("{path}[{key_text}]");
            let key = validate_key(&entry_path, key_text)?;
            let spec = validate_entry(&entry_path, key, entry)?;
            Ok((key, spec))
        },
    ))?;

    Ok(LadderSpecs {
        ladder_specs: specs.into_iter().collect(),
    })
}

fn validate_key(path: &str, text: &str) -> Validation<LadderKey> {
    let key = LadderKey::parse(text).map_err(|err| ErrorList::single(format!("{path}: {err}")))?;
    ensure(key.to_key_string() == text, || {
        format!("{path}: 键不是规范形式, 应为 {key}")
    })?;
    Ok(key)
}

fn validate_entry(path: &str, key: LadderKey, value: &Value) -> Validation<LadderSpec> {
    let record = RecordView::open(path, value)?;
    let rungs = record.required("rung_specs", |path, value| {
        let Some(items) = value.as_array() else {
            return Err(ErrorList::single(format!("{path}: 必须为数组")));
        };
        ensure(!items.is_empty(), || format!("{path}: 至少需要一个梯级"))?;
        collect_all(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| validate_rung(&format!("{path}[{index}]"), key, item)),
        )
    })?;

    let rungs_path = record.field_path("rung_specs");
    collect_all(rungs.windows(2).enumerate().map(|(index, pair)| {
        ensure(pair[0].bit_rate > pair[1].bit_rate, || {
            format!(
                "{rungs_path}: 码率必须严格递减, [{index}] = {} 而 [{}] = {}",
                pair[0].bit_rate,
                index + 1,
                pair[1].bit_rate
            )
        })
    }))?;

    Ok(LadderSpec { rung_specs: rungs })
}

fn validate_rung(path: &str, key: LadderKey, value: &Value) -> Validation<Rung> {
    let record = RecordView::open(path, value)?;
    let expected = key.media_type();
    let (media_type, bit_rate) = (
        record.required("media_type", |path, value| {
            let name = value.as_str().unwrap_or_default();
            match MediaType::from_name(name) {
                Some(media_type) if media_type == expected => Ok(media_type),
                _ => Err(ErrorList::single(format!(
                    "{path}: 必须为 \"{}\" (实际值 {value})",
                    expected.as_str()
                ))),
            }
        }),
        record.required("bit_rate", positive_integer),
    )
        .accumulate()?;

    match expected {
        MediaType::Video => {
            let (width, height, frame_rate) = (
                record.required("width", even_dimension),
                record.required("height", even_dimension),
                record.required("frame_rate", positive_fraction),
            )
                .accumulate()?;
            Ok(Rung {
                media_type,
                bit_rate,
                width: Some(width),
                height: Some(height),
                frame_rate: Some(frame_rate),
            })
        }
        MediaType::Audio => Ok(Rung {
            media_type,
            bit_rate,
            width: None,
            height: None,
            frame_rate: None,
        }),
    }
}

fn even_dimension(path: &str, value: &Value) -> Validation<u32> {
    let dim = positive_u32(path, value)?;
    ensure(dim % 2 == 0, || format!("{path}: 必须为偶数 (实际值 {dim})"))?;
    Ok(dim)
}
