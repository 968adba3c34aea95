//! 源流属性 (VideoProps / AudioProps).

use serde_json::Value;
use tizi_core::{Accumulate, Rational, Validation};

use super::RecordView;
use super::primitives::{positive_fraction, positive_integer, positive_number, positive_u32};

/// 视频源属性
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProps {
    /// 平均码率 (bit/s)
    pub avg_bitrate: u64,
    /// 时长 (秒)
    pub duration: Rational,
    /// 帧率
    pub frame_rate: Rational,
    /// 高度 (像素)
    pub height: u32,
    /// 宽度 (像素)
    pub width: u32,
    /// 像素宽高比
    pub sample_aspect_ratio: Rational,
}

impl VideoProps {
    /// 估算的文件大小 (字节): 平均码率 * 时长 / 8
    pub fn estimated_file_size(&self) -> Rational {
        let avg_bitrate = i64::try_from(self.avg_bitrate).unwrap_or(i64::MAX);
        Rational::from_integer(avg_bitrate) * self.duration / Rational::from_integer(8)
    }
}

/// 音频源属性
#[derive(Debug, Clone, PartialEq)]
pub struct AudioProps {
    /// 平均码率 (bit/s)
    pub avg_bitrate: u64,
    /// 时长 (秒)
    pub duration: Rational,
    /// 声道数
    pub channels: u32,
}

/// 校验视频源属性
pub fn validate_video_props(value: &Value) -> Validation<VideoProps> {
    let record = RecordView::open("VideoProps", value)?;
    let (avg_bitrate, duration, frame_rate, height, width, sample_aspect_ratio) = (
        record.required("avgBitrate", positive_integer),
        record.required("duration", positive_number),
        record.required("frameRate", positive_fraction),
        record.required("height", positive_u32),
        record.required("width", positive_u32),
        record.required("sampleAspectRatio", positive_fraction),
    )
        .accumulate()?;

    Ok(VideoProps {
        avg_bitrate,
        duration,
        frame_rate,
        height,
        width,
        sample_aspect_ratio,
    })
}

/// 校验音频源属性
pub fn validate_audio_props(value: &Value) -> Validation<AudioProps> {
    let record = RecordView::open("AudioProps", value)?;
    let (avg_bitrate, duration, channels) = (
        record.required("avgBitrate", positive_integer),
        record.required("duration", positive_number),
        record.required("channels", positive_u32),
    )
        .accumulate()?;

    Ok(AudioProps {
        avg_bitrate,
        duration,
        channels,
    })
}
