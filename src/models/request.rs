//! 生成请求
//!
//! 所有提示词需要的参数都显式放在请求结构里，不依赖任何全局默认值

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::subject::Subject;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "Multiple Choice", alias = "MultipleChoice")]
    MultipleChoice,
    #[serde(rename = "True/False", alias = "TrueFalse")]
    TrueFalse,
    #[serde(rename = "Short Answer", alias = "ShortAnswer")]
    ShortAnswer,
    #[serde(rename = "Essay")]
    Essay,
    #[serde(rename = "Matching")]
    Matching,
    #[serde(rename = "Multiple Select", alias = "MultipleSelect")]
    MultipleSelect,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::TrueFalse => "True/False",
            QuestionType::ShortAnswer => "Short Answer",
            QuestionType::Essay => "Essay",
            QuestionType::Matching => "Matching",
            QuestionType::MultipleSelect => "Multiple Select",
        };
        f.write_str(name)
    }
}

/// 差异化教学选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accommodations {
    /// 特殊教育
    pub sped: bool,
    /// 资优拓展
    pub gifted: bool,
    /// 多语言学习者
    pub multilingual: bool,
    /// 多语言学习者的母语
    pub language: String,
}

impl Default for Accommodations {
    fn default() -> Self {
        Self {
            sped: false,
            gifted: false,
            multilingual: false,
            language: "Spanish".to_string(),
        }
    }
}

fn default_points_per_question() -> f64 {
    1.0
}

fn default_assignment_points() -> u32 {
    100
}

fn default_strategy() -> String {
    NO_STRATEGY.to_string()
}

pub(crate) fn default_question_types() -> BTreeSet<QuestionType> {
    BTreeSet::from([QuestionType::MultipleChoice])
}

/// 未指定教学策略时的取值
pub const NO_STRATEGY: &str = "None / Standard";

/// 测验生成请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRequest {
    pub topic: String,
    #[serde(default)]
    pub subtopic: String,
    /// 最终题目数量
    pub target_count: usize,
    #[serde(default = "default_points_per_question")]
    pub points_per_question: f64,
    #[serde(default = "default_question_types")]
    pub question_types: BTreeSet<QuestionType>,
    pub grade_level: String,
    pub standard: String,
    #[serde(default)]
    pub accommodations: Accommodations,
    #[serde(default)]
    pub source_text: Option<String>,
    /// 最近讲过的主题（单元模式下由上下文缓冲区传入）
    #[serde(default)]
    pub context_topics: Vec<String>,
    /// 截止时间说明，如 "2025-03-01 23:59"
    #[serde(default)]
    pub due: Option<String>,
}

impl QuizRequest {
    /// 题型列表，用于拼接提示词
    pub fn question_types_label(&self) -> String {
        self.question_types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 单元级别的公共参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitContext {
    pub topic: String,
    #[serde(default)]
    pub subject: Subject,
    pub grade_level: String,
    pub standard: String,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default)]
    pub accommodations: Accommodations,
    #[serde(default)]
    pub source_text: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    /// 作业总分
    #[serde(default = "default_assignment_points")]
    pub assignment_points: u32,
    #[serde(default = "default_points_per_question")]
    pub points_per_question: f64,
    #[serde(default = "default_question_types")]
    pub question_types: BTreeSet<QuestionType>,
    /// 作业中嵌入的互动工具（工具目录中的名称）
    #[serde(default)]
    pub tool: Option<String>,
}

impl UnitContext {
    /// 为单元中的某个测验构建请求
    pub fn quiz_request(
        &self,
        focus_topic: &str,
        count: usize,
        context_topics: &[String],
    ) -> QuizRequest {
        QuizRequest {
            topic: self.topic.clone(),
            subtopic: focus_topic.to_string(),
            target_count: count,
            points_per_question: self.points_per_question,
            question_types: self.question_types.clone(),
            grade_level: self.grade_level.clone(),
            standard: self.standard.clone(),
            accommodations: self.accommodations.clone(),
            source_text: self.source_text.clone(),
            context_topics: context_topics.to_vec(),
            due: self.due.clone(),
        }
    }

    /// 课程计划与幻灯片使用的主题："{topic}: {focus}"
    pub fn lesson_topic(&self, focus_topic: &str) -> String {
        format!("{}: {}", self.topic, focus_topic)
    }

    pub fn has_strategy(&self) -> bool {
        has_strategy(&self.strategy)
    }
}

/// 教学策略是否被指定
pub fn has_strategy(strategy: &str) -> bool {
    !strategy.trim().is_empty() && strategy != NO_STRATEGY
}
