//! 课程计划生成 - 业务能力层
//!
//! 提示词 → JSON 课程计划 → 单页 PDF。原始文本一并返回，供幻灯片阶段串联使用。

use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::TextGenerator;
use crate::models::lesson::{LessonPlan, LessonPlanOutput};
use crate::render::pdf::{render_lesson_plan, LessonHeader};
use crate::services::{json_sanitizer, prompt_builder};
use crate::utils::logging::truncate_text;

pub async fn generate_lesson_plan(
    generator: &dyn TextGenerator,
    header: &LessonHeader<'_>,
) -> AppResult<LessonPlanOutput> {
    let prompt = prompt_builder::lesson_plan_prompt(header.topic, header.standard, header.grade);
    let raw_text = generator.generate(&prompt, true).await?;
    debug!("课程计划原始输出: {}", truncate_text(&raw_text, 200));

    let plan: LessonPlan = json_sanitizer::parse(&raw_text)?;
    debug!("课程计划共 {} 个阶段", plan.sections.len());

    let pdf = render_lesson_plan(&plan, header)?;
    Ok(LessonPlanOutput { pdf, raw_text })
}
