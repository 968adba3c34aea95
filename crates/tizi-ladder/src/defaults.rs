//! 内置默认数据: 参数化阶梯模板、标准宽高比列表、示例视频属性.

use serde_json::{Value, json};

/// 默认参数化阶梯: 以 16:9、30fps 为基准
pub fn default_parametric_ladder() -> Value {
    json!({
        "baseAspectRatio": "16/9",
        "baseFrameRate": "30",
        "rungSpecs": [
            {"dim": 2160, "bitrate": 26000000},
            {"dim": 1440, "bitrate": 19000000},
            {"dim": 1080, "bitrate": 14000000},
            {"dim": 720, "bitrate": 7000000},
            {"dim": 480, "bitrate": 3200000},
            {"dim": 360, "bitrate": 1600000},
            {"dim": 240, "bitrate": 800000}
        ],
        "options": {
            "upscale": false,
            "snapAR": true,
            "maxARSnap": 0.06,
            "minDimStepdown": 0.84,
            "frameRateScaleFactor": 0.5
        }
    })
}

/// 默认标准宽高比 (横向, 从窄到宽)
pub fn default_aspect_ratios() -> Value {
    json!([
        "1", "5/4", "4/3", "3/2", "16/9", "37/20", "2", "11/5", "47/20", "239/100"
    ])
}

/// 示例视频属性: 1080p24
pub fn example_video_props() -> Value {
    json!({
        "avgBitrate": 2801771,
        "duration": 242.875,
        "frameRate": "24",
        "height": 1080,
        "width": 1920,
        "sampleAspectRatio": "1"
    })
}
