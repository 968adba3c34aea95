//! 校验 -> 计算 -> 组装 -> 输出校验 的完整流程.
//!
//! 三个输入互相独立地校验, 任一失败时返回全部错误; 全部通过后才进入计算,
//! 计算结果还要经过输出结构校验. 调用方只会看到成功结果或完整的错误列表.

use log::{debug, warn};
use serde::Serialize;
use serde::ser::SerializeStruct;
use serde_json::Value;
use tizi_core::{Accumulate, ErrorList, Validation};

use crate::assemble::from_computed;
use crate::compute::compute_values;
use crate::defaults::{default_aspect_ratios, default_parametric_ladder, example_video_props};
use crate::ladder_specs::LadderSpecs;
use crate::schema::{
    validate_aspect_ratio_list, validate_ladder_specs, validate_parametric_ladder,
    validate_video_props,
};

/// 计算单个视频阶梯
///
/// 成功时返回只含一个键 (源的最终宽高比) 的 ladder_specs.
pub fn compute_video_ladder_specs(
    video_props: &Value,
    parametric_ladder: &Value,
    aspect_ratios: &Value,
) -> Validation<LadderSpecs> {
    let (props, ladder, catalog) = (
        validate_video_props(video_props),
        validate_parametric_ladder(parametric_ladder),
        validate_aspect_ratio_list(aspect_ratios),
    )
        .accumulate()
        .inspect_err(|errors| warn!("阶梯输入校验失败, 共 {} 条错误", errors.len()))?;

    let computed = compute_values(&catalog, &ladder, &props)?;
    debug!(
        "计算得到 {} 个梯级, 宽高比 {}",
        computed.rungs.len(),
        computed.aspect_ratio
    );

    let specs = from_computed(&computed);
    let value = specs.to_value()?;
    validate_ladder_specs(&value)
}

/// 阶梯计算的三个输入, 缺省时使用内置默认值
#[derive(Debug, Clone, PartialEq)]
pub struct LadderInputs {
    pub video_props: Value,
    pub parametric_ladder: Value,
    pub aspect_ratios: Value,
}

impl Default for LadderInputs {
    fn default() -> Self {
        Self {
            video_props: example_video_props(),
            parametric_ladder: default_parametric_ladder(),
            aspect_ratios: default_aspect_ratios(),
        }
    }
}

impl LadderInputs {
    pub fn with_video_props(mut self, video_props: Value) -> Self {
        self.video_props = video_props;
        self
    }

    pub fn with_parametric_ladder(mut self, parametric_ladder: Value) -> Self {
        self.parametric_ladder = parametric_ladder;
        self
    }

    pub fn with_aspect_ratios(mut self, aspect_ratios: Value) -> Self {
        self.aspect_ratios = aspect_ratios;
        self
    }

    pub fn compute(&self) -> Validation<LadderSpecs> {
        compute_video_ladder_specs(
            &self.video_props,
            &self.parametric_ladder,
            &self.aspect_ratios,
        )
    }
}

/// 对外的结果形式: `{ok: true, result}` 或 `{ok: false, errors}`
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Vec<String>),
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure(_) => None,
        }
    }

    /// 转换回 [`Validation`]
    pub fn into_validation(self) -> Validation<T> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure(errors) => Err(errors.into_iter().collect::<ErrorList>()),
        }
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(errors) => errors,
        }
    }
}

impl<T> From<Validation<T>> for Outcome<T> {
    fn from(validation: Validation<T>) -> Self {
        match validation {
            Ok(result) => Self::Success(result),
            Err(errors) => Self::Failure(errors.into_vec()),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Self::Success(result) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("result", result)?;
            }
            Self::Failure(errors) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("errors", errors)?;
            }
        }
        state.end()
    }
}
