//! 将计算结果组装为 ladder_specs, 并合并进 ABR profile.

use serde_json::{Map, Value};
use tizi_core::TiziResult;

use crate::compute::ComputedLadder;
use crate::ladder_specs::{LadderKey, LadderSpec, LadderSpecs, Rung};

/// profile 中保存参数化阶梯模板的字段, 输出前移除
pub const TEMPLATE_FIELD: &str = "video_parametric_ladder";

/// 只在模板中存在、不应出现在输出 profile 里的字段
const TEMPLATE_ONLY_FIELDS: &[&str] = &[TEMPLATE_FIELD];

/// 由计算结果生成只含一个视频键的 ladder_specs
pub fn from_computed(ladder: &ComputedLadder) -> LadderSpecs {
    let rung_specs = ladder
        .rungs
        .iter()
        .map(|rung| Rung::video(rung.bit_rate, rung.width, rung.height, rung.frame_rate))
        .collect();
    LadderSpecs::single(
        LadderKey::video(ladder.aspect_ratio),
        LadderSpec { rung_specs },
    )
}

/// 递归合并两个 JSON 值, 冲突时以 `right` 为准
///
/// 双方都是对象时逐字段合并, 否则直接取 `right`.
pub fn deep_merge(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Object(left), Value::Object(right)) => {
            let mut merged: Map<String, Value> = left.clone();
            for (key, value) in right {
                let value = match left.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, right) => right.clone(),
    }
}

/// 移除模板专用字段
pub fn strip_template_fields(profile: &Value) -> Value {
    match profile {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(key, _)| !TEMPLATE_ONLY_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// 将 ladder_specs 合并进 profile, 并移除模板专用字段
///
/// profile 中已有的其他阶梯 (如音频) 与其他字段保持不变.
pub fn merge_into_profile(profile: &Value, specs: &LadderSpecs) -> TiziResult<Value> {
    let overlay = specs.to_value()?;
    Ok(strip_template_fields(&deep_merge(profile, &overlay)))
}
