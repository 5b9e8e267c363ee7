//! 分批生成测验题目 - 业务能力层
//!
//! 模型单次返回的题目数量不可靠，因此按固定批次大小多请求几批，
//! 凑够目标数量后提前停止，最后截断到目标数量。

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, GenerationError};
use crate::infrastructure::{ProgressSink, TextGenerator};
use crate::models::quiz::{Question, Quiz, QuizBatch};
use crate::models::request::QuizRequest;
use crate::services::{json_sanitizer, prompt_builder};

/// 分批策略
///
/// 批次数 = target / batch_size + extra_batches。多出的批次只是经验性的冗余，
/// 并不保证一定能凑够目标数量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// 每批请求的题目数量
    pub batch_size: usize,
    /// 额外尝试的批次数
    pub extra_batches: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: 10,
            extra_batches: 2,
        }
    }
}

impl BatchPolicy {
    /// 至少尝试一批
    pub fn num_batches(&self, target_count: usize) -> usize {
        (target_count / self.batch_size.max(1) + self.extra_batches).max(1)
    }
}

/// 分批生成的结果
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuiz {
    /// 按返回顺序排列，已截断到目标数量
    pub questions: Vec<Question>,
    pub target_count: usize,
    pub batches_attempted: usize,
    pub batches_failed: usize,
}

impl GeneratedQuiz {
    /// 题目数量不足目标
    pub fn is_partial(&self) -> bool {
        self.questions.len() < self.target_count
    }

    pub fn into_quiz(self, title: impl Into<String>) -> Quiz {
        Quiz::new(title, self.questions)
    }
}

/// 按策略分批生成题目
///
/// 单批失败（调用失败、输出无法解析、缺少 questions 字段）只记录日志并跳过；
/// 配置类致命错误立即返回。每次尝试后上报一次进度。
pub async fn generate_questions(
    request: &QuizRequest,
    generator: &dyn TextGenerator,
    policy: BatchPolicy,
    progress: &mut dyn ProgressSink,
) -> AppResult<GeneratedQuiz> {
    let target = request.target_count;
    let num_batches = policy.num_batches(target);
    let mut questions: Vec<Question> = Vec::with_capacity(target);
    let mut attempted = 0;
    let mut failed = 0;

    if target == 0 {
        return Ok(GeneratedQuiz {
            questions,
            target_count: 0,
            batches_attempted: 0,
            batches_failed: 0,
        });
    }

    info!(
        "📝 生成测验 \"{}\": 目标 {} 题，每批 {} 题，最多 {} 批",
        request.topic, target, policy.batch_size, num_batches
    );

    let prompt = prompt_builder::quiz_prompt(request, policy.batch_size);

    for batch_index in 1..=num_batches {
        attempted += 1;

        match request_batch(generator, &prompt).await {
            Ok(batch) => {
                debug!("第 {}/{} 批返回 {} 道有效题目", batch_index, num_batches, batch.len());
                questions.extend(batch);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("第 {}/{} 批生成失败，已跳过: {}", batch_index, num_batches, e);
                failed += 1;
            }
        }

        progress.report(
            batch_index as f64 / num_batches as f64,
            &format!("Generating Batch {}/{}", batch_index, num_batches),
        );

        if questions.len() >= target {
            break;
        }
    }

    questions.truncate(target);

    let result = GeneratedQuiz {
        questions,
        target_count: target,
        batches_attempted: attempted,
        batches_failed: failed,
    };

    if result.is_partial() {
        warn!(
            "⚠️ 测验 \"{}\" 只生成了 {}/{} 道题",
            request.topic,
            result.questions.len(),
            target
        );
    } else {
        info!("✓ 测验 \"{}\" 生成 {} 道题，用了 {} 批", request.topic, target, attempted);
    }

    Ok(result)
}

/// 请求一批题目，丢弃不满足约束的题目
async fn request_batch(generator: &dyn TextGenerator, prompt: &str) -> AppResult<Vec<Question>> {
    let raw = generator.generate(prompt, true).await?;
    let value = json_sanitizer::parse_value(&raw)?;

    if !value.get("questions").is_some_and(JsonValue::is_array) {
        return Err(GenerationError::MissingField {
            field: "questions".to_string(),
        }
        .into());
    }

    let batch: QuizBatch = serde_json::from_value(value)
        .map_err(|_| AppError::unexpected_shape(r#"{"questions": [...]}"#))?;

    let mut accepted = Vec::with_capacity(batch.questions.len());
    for (index, item) in batch.questions.into_iter().enumerate() {
        let number = index + 1;
        let question: Question = match serde_json::from_value(item) {
            Ok(q) => q,
            Err(e) => {
                warn!("丢弃第 {} 题：字段不完整 ({})", number, e);
                continue;
            }
        };
        if let Err(e) = question.validate(number) {
            warn!("丢弃第 {} 题：{}", number, e);
            continue;
        }
        accepted.push(question);
    }

    Ok(accepted)
}
