//! 幻灯片生成 - 业务能力层
//!
//! 有课程计划文本时按计划串联生成，否则从头生成。

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::TextGenerator;
use crate::models::lesson::SlideResponse;
use crate::render::pptx::render_slide_deck;
use crate::services::{json_sanitizer, prompt_builder};

pub async fn generate_slide_deck(
    generator: &dyn TextGenerator,
    topic: &str,
    grade: &str,
    strategy: &str,
    lesson_text: &str,
) -> AppResult<Vec<u8>> {
    let prompt = prompt_builder::slide_deck_prompt(topic, grade, strategy, lesson_text);
    let raw = generator.generate(&prompt, true).await?;

    let response = SlideResponse::from_value(json_sanitizer::parse_value(&raw)?)?;
    if let SlideResponse::Keyed(key, _) = &response {
        debug!("幻灯片数组位于键 {}", key);
    }

    let slides = response.into_slides();
    if slides.is_empty() {
        return Err(AppError::unexpected_shape("至少一张幻灯片"));
    }
    debug!("生成 {} 张幻灯片", slides.len());

    render_slide_deck(&slides, topic)
}
