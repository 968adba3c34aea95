//! ladder_specs 输出结构: 阶梯键、梯级与按键索引的阶梯集合.
//!
//! 阶梯键是一段紧凑 JSON 文本, `media_type` 在前, 其余字段按名称升序,
//! 下游按字符串精确匹配, 因此格式本身属于输出约定的一部分.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tizi_core::{MediaType, Rational, TiziError, TiziResult};

/// ladder_specs 中的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LadderKey {
    /// 视频阶梯, 以显示宽高比区分
    Video {
        aspect_ratio_width: i64,
        aspect_ratio_height: i64,
    },
    /// 音频阶梯, 以声道数区分
    Audio { channels: u32 },
}

impl LadderKey {
    /// 由 (约分后的) 宽高比构造视频键
    pub fn video(aspect_ratio: Rational) -> Self {
        Self::Video {
            aspect_ratio_width: aspect_ratio.num(),
            aspect_ratio_height: aspect_ratio.den(),
        }
    }

    pub fn audio(channels: u32) -> Self {
        Self::Audio { channels }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Video { .. } => MediaType::Video,
            Self::Audio { .. } => MediaType::Audio,
        }
    }

    /// 视频键对应的宽高比
    pub fn aspect_ratio(&self) -> Option<Rational> {
        match *self {
            Self::Video {
                aspect_ratio_width,
                aspect_ratio_height,
            } => Some(Rational::new(aspect_ratio_width, aspect_ratio_height)),
            Self::Audio { .. } => None,
        }
    }

    /// 除 `media_type` 以外的字段, 按名称升序
    fn fields(&self) -> Vec<(&'static str, i64)> {
        match *self {
            Self::Video {
                aspect_ratio_width,
                aspect_ratio_height,
            } => vec![
                ("aspect_ratio_height", aspect_ratio_height),
                ("aspect_ratio_width", aspect_ratio_width),
            ],
            Self::Audio { channels } => vec![("channels", i64::from(channels))],
        }
    }

    /// 规范的键文本, 如 `{"media_type":"video","aspect_ratio_height":9,"aspect_ratio_width":16}`
    pub fn to_key_string(&self) -> String {
        let mut key = format!("{{\"media_type\":\"{}\"", self.media_type().as_str());
        for (name, value) in self.fields() {
            key.push_str(&format!(",\"{name}\":{value}"));
        }
        key.push('}');
        key
    }

    /// 解析键文本, 字段顺序与空白不限
    pub fn parse(text: &str) -> TiziResult<Self> {
        let invalid = |reason: &str| TiziError::InvalidLadderKey {
            key: text.to_string(),
            reason: reason.to_string(),
        };
        let fields: Map<String, Value> =
            serde_json::from_str(text).map_err(|_| invalid("不是 JSON 对象"))?;

        let integer = |name: &str| -> TiziResult<i64> {
            match fields.get(name).and_then(Value::as_i64) {
                Some(n) if n > 0 => Ok(n),
                Some(_) => Err(invalid(&format!("{name} 必须为正整数"))),
                None => Err(invalid(&format!("缺少 {name}"))),
            }
        };
        let expect_fields = |count: usize| {
            if fields.len() == count {
                Ok(())
            } else {
                Err(invalid("包含多余字段"))
            }
        };

        let media_type = fields
            .get("media_type")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("缺少 media_type"))?;
        match MediaType::from_name(media_type) {
            Some(MediaType::Video) => {
                let aspect_ratio_width = integer("aspect_ratio_width")?;
                let aspect_ratio_height = integer("aspect_ratio_height")?;
                expect_fields(3)?;
                Ok(Self::Video {
                    aspect_ratio_width,
                    aspect_ratio_height,
                })
            }
            Some(MediaType::Audio) => {
                let channels = u32::try_from(integer("channels")?)
                    .map_err(|_| invalid("channels 超出范围"))?;
                expect_fields(2)?;
                Ok(Self::Audio { channels })
            }
            None => Err(invalid(&format!("未知的 media_type '{media_type}'"))),
        }
    }
}

impl fmt::Display for LadderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key_string())
    }
}

impl FromStr for LadderKey {
    type Err = TiziError;

    fn from_str(text: &str) -> TiziResult<Self> {
        Self::parse(text)
    }
}

impl Serialize for LadderKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_key_string())
    }
}

impl<'de> Deserialize<'de> for LadderKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// 一个具体的梯级
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rung {
    pub media_type: MediaType,
    pub bit_rate: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<Rational>,
}

impl Rung {
    pub fn video(bit_rate: u64, width: u32, height: u32, frame_rate: Rational) -> Self {
        Self {
            media_type: MediaType::Video,
            bit_rate,
            width: Some(width),
            height: Some(height),
            frame_rate: Some(frame_rate),
        }
    }

    pub fn audio(bit_rate: u64) -> Self {
        Self {
            media_type: MediaType::Audio,
            bit_rate,
            width: None,
            height: None,
            frame_rate: None,
        }
    }
}

/// 同一键下的梯级列表, 按码率从高到低排列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderSpec {
    pub rung_specs: Vec<Rung>,
}

/// `{ "ladder_specs": { <键>: <阶梯> } }`, 可直接合并进 ABR profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderSpecs {
    pub ladder_specs: BTreeMap<LadderKey, LadderSpec>,
}

impl LadderSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: LadderKey, spec: LadderSpec) -> Self {
        let mut specs = Self::new();
        specs.insert(key, spec);
        specs
    }

    pub fn insert(&mut self, key: LadderKey, spec: LadderSpec) -> Option<LadderSpec> {
        self.ladder_specs.insert(key, spec)
    }

    pub fn get(&self, key: &LadderKey) -> Option<&LadderSpec> {
        self.ladder_specs.get(key)
    }

    pub fn len(&self) -> usize {
        self.ladder_specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ladder_specs.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &LadderKey> {
        self.ladder_specs.keys()
    }

    pub fn to_value(&self) -> TiziResult<Value> {
        serde_json::to_value(self).map_err(|err| TiziError::Internal(err.to_string()))
    }
}
