//! 输入/输出结构校验.
//!
//! 每个校验函数接收任意 JSON 值, 返回类型化的记录或全部错误消息.
//! 记录级校验会对每个声明字段分别校验, 再执行跨字段约束, 同一层级的
//! 错误全部收集后一起返回.

pub mod aspect_ratio_list;
pub mod ladder_specs;
pub mod parametric_ladder;
pub mod primitives;
pub mod video_props;

use serde_json::{Map, Value};
use tizi_core::{ErrorList, Validation};

pub use aspect_ratio_list::{AspectRatioList, validate_aspect_ratio_list};
pub use ladder_specs::validate_ladder_specs;
pub use parametric_ladder::{
    LadderLimits, LadderOptions, ParametricLadder, RungSpec, validate_parametric_ladder,
};
pub use primitives::Bounds;
pub use video_props::{AudioProps, VideoProps, validate_audio_props, validate_video_props};

/// JSON 对象的只读视图, 负责字段定位与错误路径
pub struct RecordView<'a> {
    path: String,
    fields: &'a Map<String, Value>,
}

impl<'a> RecordView<'a> {
    /// 要求 `value` 为 JSON 对象
    pub fn open(path: impl Into<String>, value: &'a Value) -> Validation<Self> {
        let path = path.into();
        match value.as_object() {
            Some(fields) => Ok(Self { path, fields }),
            None => Err(ErrorList::single(format!(
                "{path}: 必须为对象 (实际值 {})",
                primitives::describe(value)
            ))),
        }
    }

    /// 字段的完整路径, 如 `ParametricLadder.options.maxARSnap`
    pub fn field_path(&self, key: &str) -> String {
        format!("{}.{}", self.path, key)
    }

    /// 原始字段值, `null` 视为缺失
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// 必填字段
    pub fn required<T>(
        &self,
        key: &str,
        check: impl FnOnce(&str, &'a Value) -> Validation<T>,
    ) -> Validation<T> {
        let path = self.field_path(key);
        match self.get(key) {
            Some(value) => check(&path, value),
            None => Err(ErrorList::single(format!("{path}: 缺少必填字段"))),
        }
    }

    /// 可选字段, 缺失或为 `null` 时返回 `None`
    pub fn optional<T>(
        &self,
        key: &str,
        check: impl FnOnce(&str, &'a Value) -> Validation<T>,
    ) -> Validation<Option<T>> {
        let path = self.field_path(key);
        match self.get(key) {
            Some(value) => check(&path, value).map(Some),
            None => Ok(None),
        }
    }

    /// 封闭结构: 拒绝 `allowed` 以外的字段
    pub fn sealed(&self, allowed: &[&str]) -> Validation<()> {
        self.fields
            .keys()
            .filter(|key| !allowed.contains(&key.as_str()))
            .map(|key| format!("{}: 不允许的字段 '{key}'", self.path))
            .collect::<ErrorList>()
            .into_result()
    }
}
