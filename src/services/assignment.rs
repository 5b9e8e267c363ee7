//! 作业 HTML 生成 - 业务能力层

use crate::error::{AppResult, GenerationError};
use crate::infrastructure::TextGenerator;
use crate::models::request::UnitContext;
use crate::services::{json_sanitizer, prompt_builder};

/// 生成作业页面；模型常把 HTML 包在代码块里，这里统一去掉
pub async fn generate_assignment_html(
    generator: &dyn TextGenerator,
    ctx: &UnitContext,
    focus_topic: &str,
) -> AppResult<String> {
    let prompt = prompt_builder::assignment_prompt(ctx, focus_topic);
    let raw = generator.generate(&prompt, false).await?;

    let html = json_sanitizer::strip_code_fences(&raw);
    if html.is_empty() {
        return Err(GenerationError::MissingField {
            field: "html".to_string(),
        }
        .into());
    }
    Ok(html)
}
