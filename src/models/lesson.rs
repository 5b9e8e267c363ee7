//! 课程计划与幻灯片的结构化数据

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

/// 5E 课程计划
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonPlan {
    pub metadata: LessonMetadata,
    pub sections: Vec<LessonSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonMetadata {
    pub duration: String,
    pub materials: Vec<String>,
    pub vocabulary: Vec<String>,
    pub differentiation: Differentiation,
}

impl Default for LessonMetadata {
    fn default() -> Self {
        Self {
            duration: "60 mins".to_string(),
            materials: Vec::new(),
            vocabulary: Vec::new(),
            differentiation: Differentiation::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Differentiation {
    pub sped: Vec<String>,
    pub ml: Vec<String>,
}

/// 5E 中的一个阶段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonSection {
    pub phase: String,
    pub time: String,
    pub activity: String,
}

impl Default for LessonSection {
    fn default() -> Self {
        Self {
            phase: "Phase".to_string(),
            time: String::new(),
            activity: String::new(),
        }
    }
}

/// 课程计划阶段的产出：PDF 字节 + 模型原始文本（供幻灯片阶段使用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonPlanOutput {
    pub pdf: Vec<u8>,
    pub raw_text: String,
}

/// 单张幻灯片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slide {
    pub title: String,
    pub bullet_points: Vec<String>,
    pub speaker_notes: String,
    pub image_ai_prompt: Option<String>,
}

impl Default for Slide {
    fn default() -> Self {
        Self {
            title: "Untitled Slide".to_string(),
            bullet_points: Vec::new(),
            speaker_notes: String::new(),
            image_ai_prompt: None,
        }
    }
}

/// 模型可能返回的幻灯片结构
#[derive(Debug, Clone, PartialEq)]
pub enum SlideResponse {
    /// 顶层直接是数组
    List(Vec<Slide>),
    /// 顶层是对象，幻灯片数组挂在某个键下
    Keyed(String, Vec<Slide>),
}

/// 依次识别的键名
const SLIDE_KEYS: [&str; 3] = ["slides", "presentation", "content"];

impl SlideResponse {
    /// 在边界处识别一次结构；无法识别时返回 `MalformedOutput`
    pub fn from_value(value: JsonValue) -> AppResult<Self> {
        match value {
            JsonValue::Array(items) => Ok(SlideResponse::List(parse_slides(items)?)),
            JsonValue::Object(mut map) => {
                for key in SLIDE_KEYS {
                    if let Some(JsonValue::Array(items)) = map.remove(key) {
                        return Ok(SlideResponse::Keyed(key.to_string(), parse_slides(items)?));
                    }
                }
                // 只有一个键且值为数组时，也视为幻灯片列表
                if map.len() == 1 {
                    if let Some((key, JsonValue::Array(items))) = map.into_iter().next() {
                        return Ok(SlideResponse::Keyed(key, parse_slides(items)?));
                    }
                }
                Err(AppError::unexpected_shape(
                    "幻灯片数组，或 slides / presentation / content 键下的数组",
                ))
            }
            _ => Err(AppError::unexpected_shape("幻灯片数组或对象")),
        }
    }

    /// 统一成幻灯片列表
    pub fn into_slides(self) -> Vec<Slide> {
        match self {
            SlideResponse::List(slides) | SlideResponse::Keyed(_, slides) => slides,
        }
    }
}

fn parse_slides(items: Vec<JsonValue>) -> AppResult<Vec<Slide>> {
    items
        .into_iter()
        .map(|item| {
            if !item.is_object() {
                return Err(AppError::unexpected_shape("幻灯片对象"));
            }
            serde_json::from_value(item)
                .map_err(|_| AppError::unexpected_shape("包含 title / bullet_points 的幻灯片对象"))
        })
        .collect()
}
