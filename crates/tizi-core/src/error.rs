//! 统一错误类型定义.
//!
//! 计算阶段产生的错误以 [`TiziError`] 表示, 最终都会转换为
//! [`ErrorList`](crate::validation::ErrorList) 中的一条或多条可读消息.

use thiserror::Error;

/// Tizi 统一错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TiziError {
    /// 无法解析的分数字符串
    #[error("无法解析为分数: {0:?}")]
    InvalidFraction(String),

    /// 标准宽高比列表中没有足够接近的值
    #[error(
        "宽高比 {source_ratio} 与最接近的标准宽高比 {closest} 相差 {difference:.4}, 超过 maxARSnap ({max})"
    )]
    AspectRatioSnap {
        source_ratio: String,
        closest: String,
        difference: f64,
        max: String,
    },

    /// 源属性超出阶梯模板支持的范围
    #[error("源属性 {property} = {value} 超出阶梯限制 {limit} = {bound}")]
    SourceOutOfRange {
        property: &'static str,
        value: String,
        limit: String,
        bound: String,
    },

    /// 无法解析的 ladder_specs 键
    #[error("无效的阶梯键 {key:?}: {reason}")]
    InvalidLadderKey { key: String, reason: String },

    /// 计算后没有剩余的梯级
    #[error("计算后没有可用的梯级")]
    EmptyLadder,

    /// 源尺寸小于最小的偶数梯级 (2x2)
    #[error("源尺寸 {width}x{height} 过小, 无法容纳偶数尺寸的梯级")]
    SourceTooSmall { width: u32, height: u32 },

    /// 梯级换算后的像素尺寸无法表示
    #[error("rungSpecs[{index}] (dim {dim}) 换算后的尺寸超出范围")]
    RungOutOfRange { index: usize, dim: u32 },

    /// 选择中引用的源文件不存在
    #[error("流 '{stream}' 引用的源文件不存在: {path}")]
    SourceFileNotFound { stream: String, path: String },

    /// 选择中引用的流索引越界
    #[error("流 '{stream}' 引用的流索引越界: {path}[{index}] (共 {count} 个流)")]
    StreamNotFound {
        stream: String,
        path: String,
        index: usize,
        count: usize,
    },

    /// 无效数据 (结构不符合预期)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// Tizi 统一 Result 类型
pub type TiziResult<T> = Result<T, TiziError>;
