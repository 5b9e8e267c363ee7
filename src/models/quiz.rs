use serde::{Deserialize, Serialize};

use crate::error::SerializationError;

/// 单道选择题
///
/// 字段名与模型返回的 JSON 保持一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 题干（可能包含 HTML）
    pub question_text: String,
    /// 选项（至少 2 个）
    pub options: Vec<String>,
    /// 正确选项的下标（从 0 开始）
    pub correct_answer_index: usize,
}

impl Question {
    /// 检查题目约束
    ///
    /// `number` 为题号（从 1 开始），只用于错误信息
    pub fn validate(&self, number: usize) -> Result<(), SerializationError> {
        if self.options.len() < 2 {
            return Err(SerializationError::TooFewOptions {
                question: number,
                count: self.options.len(),
            });
        }
        if self.correct_answer_index >= self.options.len() {
            return Err(SerializationError::CorrectIndexOutOfRange {
                question: number,
                index: self.correct_answer_index,
                option_count: self.options.len(),
            });
        }
        Ok(())
    }
}

/// 测验
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
    pub title: String,
}

impl Quiz {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            questions,
            title: title.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// 单批次的模型返回结构
#[derive(Debug, Clone, Deserialize)]
pub struct QuizBatch {
    pub questions: Vec<serde_json::Value>,
}
