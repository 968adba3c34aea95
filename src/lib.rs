//! # Tizi (梯子)
//!
//! 参数化 ABR 码率阶梯计算.
//!
//! 由参数化阶梯模板、源视频属性与标准宽高比列表计算出具体的码率阶梯,
//! 并合并进 ABR profile. 计算是纯函数, 不做任何 I/O; 所有输入错误会
//! 一次性全部报告.
//!
//! # 快速开始
//!
//! ```rust
//! use serde_json::json;
//! use tizi::ladder::{LadderInputs, Outcome};
//!
//! let inputs = LadderInputs::default().with_video_props(json!({
//!     "avgBitrate": 8000000,
//!     "duration": 60,
//!     "frameRate": "30000/1001",
//!     "width": 1280,
//!     "height": 720,
//!     "sampleAspectRatio": "1"
//! }));
//! let outcome = Outcome::from(inputs.compute());
//! assert!(outcome.is_ok());
//! println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `tizi-core` | 有理数、宽高比工具、错误累积 |
//! | `tizi-ladder` | 输入校验、阶梯计算、ladder_specs 组装 |
//! | `tizi-profile` | 变体视频流选择与 profile 合并 |

/// 核心类型与工具
pub use tizi_core as core;

/// 参数化阶梯计算
pub use tizi_ladder as ladder;

/// ABR profile 生成
pub use tizi_profile as profile;

pub mod logging;

/// 获取 Tizi 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
