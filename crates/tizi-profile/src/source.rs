//! 母版源文件与变体 (variant) 流选择.
//!
//! 源文件目录记录每个文件的流信息, 变体把每个输出流映射到
//! 若干 `(文件, 流下标)`. 这里只负责查找与字段映射.

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use tizi_core::{ErrorList, TiziError, Validation};

/// 视频流的 `type` 字段值
pub const STREAM_VIDEO: &str = "StreamVideo";

/// 一个源文件的流信息
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub streams: Vec<Value>,
}

/// 文件路径 -> 源文件
pub type SourceCatalog = BTreeMap<String, SourceFile>;

/// 变体中某个输出流引用的源
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamSource {
    pub files_api_path: String,
    pub stream_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VariantStream {
    #[serde(default)]
    pub sources: Vec<StreamSource>,
}

/// 变体: 输出流名称 -> 源引用
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub streams: BTreeMap<String, VariantStream>,
}

/// 解析源文件目录
pub fn parse_sources(value: &Value) -> Validation<SourceCatalog> {
    SourceCatalog::deserialize(value)
        .map_err(|err| ErrorList::single(format!("Sources: 结构无效: {err}")))
}

/// 解析变体
pub fn parse_variant(value: &Value) -> Validation<Variant> {
    Variant::deserialize(value).map_err(|err| ErrorList::single(format!("Variant: 结构无效: {err}")))
}

/// 按流名称升序、源列表顺序查找第一个视频流
///
/// 变体的 `streams` 按名称排序而不是按 JSON 中的书写顺序, 同一输入总是
/// 选中同一个流, 与序列化方保留键顺序与否无关. 多个流都引用视频时, 名称
/// 最小的流胜出.
///
/// 所有源引用都会被检查, 失效引用 (文件不存在或下标越界) 全部报告.
/// 没有视频流时返回 `Ok(None)`.
pub fn find_first_video_stream<'a>(
    sources: &'a SourceCatalog,
    variant: &Variant,
) -> Validation<Option<&'a Value>> {
    let mut errors = ErrorList::new();
    let mut found: Option<&'a Value> = None;

    for (name, stream) in &variant.streams {
        for source in &stream.sources {
            let Some(file) = sources.get(&source.files_api_path) else {
                errors.push(
                    TiziError::SourceFileNotFound {
                        stream: name.clone(),
                        path: source.files_api_path.clone(),
                    }
                    .to_string(),
                );
                continue;
            };
            let Some(info) = file.streams.get(source.stream_index) else {
                errors.push(
                    TiziError::StreamNotFound {
                        stream: name.clone(),
                        path: source.files_api_path.clone(),
                        index: source.stream_index,
                        count: file.streams.len(),
                    }
                    .to_string(),
                );
                continue;
            };
            if found.is_none() && stream_type(info) == Some(STREAM_VIDEO) {
                debug!(
                    "使用流 '{name}' 的视频源 {}[{}]",
                    source.files_api_path, source.stream_index
                );
                found = Some(info);
            }
        }
    }

    errors.into_result().map(|()| found)
}

fn stream_type(stream: &Value) -> Option<&str> {
    stream.get("type").and_then(Value::as_str)
}

/// 由流信息字段映射出 VideoProps 输入
///
/// 只做字段改名, 缺失的字段留给 VideoProps 校验报告.
pub fn video_props_from_stream(stream: &Value) -> Value {
    const FIELDS: &[(&str, &str)] = &[
        ("bit_rate", "avgBitrate"),
        ("duration", "duration"),
        ("frame_rate", "frameRate"),
        ("height", "height"),
        ("width", "width"),
        ("sample_aspect_ratio", "sampleAspectRatio"),
    ];
    let props: Map<String, Value> = FIELDS
        .iter()
        .filter_map(|&(from, to)| {
            stream
                .get(from)
                .filter(|v| !v.is_null())
                .map(|v| (to.to_string(), v.clone()))
        })
        .collect();
    Value::Object(props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sources() -> SourceCatalog {
        parse_sources(&json!({
            "test.mp4": {
                "container_format": {"duration": 242.875},
                "streams": [
                    {"type": "StreamVideo", "bit_rate": 2801771, "duration": 242.875, "frame_rate": "24",
                     "height": 1080, "width": 1920, "sample_aspect_ratio": "1", "codec_name": "h264"},
                    {"type": "StreamAudio", "bit_rate": 128013, "channels": 2}
                ]
            }
        }))
        .unwrap()
    }

    fn variant(streams: Value) -> Variant {
        parse_variant(&json!({"log": {"Level": 3}, "streams": streams})).unwrap()
    }

    #[test]
    fn test_finds_video_stream() {
        let sources = sources();
        let variant = variant(json!({
            "audio": {"sources": [{"files_api_path": "test.mp4", "stream_index": 1}]},
            "video": {"label": "", "sources": [{"files_api_path": "test.mp4", "stream_index": 0}]}
        }));
        let stream = find_first_video_stream(&sources, &variant).unwrap().unwrap();
        assert_eq!(stream["codec_name"], json!("h264"));
        assert_eq!(
            video_props_from_stream(stream),
            json!({
                "avgBitrate": 2801771,
                "duration": 242.875,
                "frameRate": "24",
                "height": 1080,
                "width": 1920,
                "sampleAspectRatio": "1"
            })
        );
    }

    #[test]
    fn test_first_video_stream_chosen_by_name_order() {
        let sources = parse_sources(&json!({
            "main.mov": {"streams": [{"type": "StreamVideo", "width": 1920, "height": 1080}]},
            "alt.mov": {"streams": [{"type": "StreamVideo", "width": 1280, "height": 720}]}
        }))
        .unwrap();
        // 书写顺序中 "video" 在前, 但 "angle_2" 按名称排序更靠前
        let variant = variant(json!({
            "video": {"sources": [{"files_api_path": "main.mov", "stream_index": 0}]},
            "angle_2": {"sources": [{"files_api_path": "alt.mov", "stream_index": 0}]}
        }));
        let stream = find_first_video_stream(&sources, &variant).unwrap().unwrap();
        assert_eq!(stream["width"], json!(1280));
    }

    #[test]
    fn test_audio_only_variant_has_no_video() {
        let sources = sources();
        let variant = variant(json!({
            "audio": {"sources": [{"files_api_path": "test.mp4", "stream_index": 1}]}
        }));
        assert_eq!(find_first_video_stream(&sources, &variant), Ok(None));
    }

    #[test]
    fn test_dangling_references_all_reported() {
        let sources = sources();
        let variant = variant(json!({
            "audio": {"sources": [{"files_api_path": "missing.mp4", "stream_index": 0}]},
            "video": {"sources": [
                {"files_api_path": "test.mp4", "stream_index": 5},
                {"files_api_path": "test.mp4", "stream_index": 0}
            ]}
        }));
        let errors = find_first_video_stream(&sources, &variant).unwrap_err();
        assert_eq!(
            errors.into_vec(),
            vec![
                "流 'audio' 引用的源文件不存在: missing.mp4".to_string(),
                "流 'video' 引用的流索引越界: test.mp4[5] (共 2 个流)".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_variant_rejected() {
        let errors = parse_variant(&json!({"streams": {"video": {"sources": [{"stream_index": 0}]}}}));
        assert!(matches!(errors, Err(e) if e.contains("Variant: 结构无效")));
        assert!(parse_sources(&json!([])).is_err());
    }
}
