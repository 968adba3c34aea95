//! # tizi-ladder
//!
//! 参数化码率阶梯计算.
//!
//! 由参数化阶梯模板、源视频属性与标准宽高比列表计算出具体的
//! ladder_specs 条目. 所有输入先独立校验, 错误全部收集后一起返回;
//! 计算结果在返回前还会经过一次输出结构校验.
//!
//! ```
//! use tizi_ladder::LadderInputs;
//!
//! let specs = LadderInputs::default().compute().unwrap();
//! assert_eq!(specs.len(), 1);
//! ```

pub mod assemble;
pub mod compute;
pub mod defaults;
pub mod ladder_specs;
pub mod pipeline;
pub mod schema;

pub use assemble::{TEMPLATE_FIELD, deep_merge, merge_into_profile, strip_template_fields};
pub use compute::{ComputedLadder, ComputedRung, compute_values};
pub use ladder_specs::{LadderKey, LadderSpec, LadderSpecs, Rung};
pub use pipeline::{LadderInputs, Outcome, compute_video_ladder_specs};
