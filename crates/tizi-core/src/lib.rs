//! # tizi-core
//!
//! Tizi 码率阶梯计算的核心库, 提供有理数、宽高比工具、媒体类型
//! 以及错误累积式校验的基础设施.

pub mod aspect_ratio;
pub mod error;
pub mod media_type;
pub mod rational;
pub mod validation;

// 重导出常用类型
pub use aspect_ratio::AspectRatioMatch;
pub use error::{TiziError, TiziResult};
pub use media_type::MediaType;
pub use rational::Rational;
pub use validation::{Accumulate, ErrorList, Validation};
