//! 默认 ABR profile 模板.

use serde_json::{Value, json};
use tizi_ladder::TEMPLATE_FIELD;
use tizi_ladder::defaults::default_parametric_ladder;

/// 默认 profile: 立体声与 5.1 音频阶梯、明文 DASH/HLS 输出、分段参数,
/// 以及视频阶梯模板
pub fn default_base_profile() -> Value {
    let mut profile = json!({
        "drm_optional": true,
        "store_clear": true,
        "ladder_specs": {
            "{\"media_type\":\"audio\",\"channels\":2}": {
                "rung_specs": [
                    {"media_type": "audio", "bit_rate": 256000, "pregenerate": true}
                ]
            },
            "{\"media_type\":\"audio\",\"channels\":6}": {
                "rung_specs": [
                    {"media_type": "audio", "bit_rate": 384000, "pregenerate": true}
                ]
            }
        },
        "playout_formats": {
            "dash-clear": {
                "drm": null,
                "protocol": {"min_buffer_length": 2, "type": "ProtoDash"}
            },
            "hls-clear": {
                "drm": null,
                "protocol": {"type": "ProtoHls"}
            }
        },
        "segment_specs": {
            "audio": {"segs_per_chunk": 15, "target_dur": 2},
            "video": {"segs_per_chunk": 15, "target_dur": 2}
        }
    });
    profile[TEMPLATE_FIELD] = default_parametric_ladder();
    profile
}
