//! 单元生成阶段 - 流程层
//!
//! `StageRunner` 把单元包需要的四类外部生成调用抽象出来，编排层只依赖这个接口。
//! `LlmStageRunner` 是基于 `TextGenerator` 的实现。

use std::fmt;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::infrastructure::{TextGenerator, TracingProgress};
use crate::models::artifact::ArtifactSlot;
use crate::models::lesson::LessonPlanOutput;
use crate::models::quiz::Quiz;
use crate::models::request::UnitContext;
use crate::models::unit::UnitSequenceItem;
use crate::render::pdf::LessonHeader;
use crate::services::{
    generate_assignment_html, generate_lesson_plan, generate_questions, generate_slide_deck,
    BatchPolicy,
};

/// 单元包中的生成阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitStage {
    Assignment,
    LessonPlan,
    Slides,
    Quiz,
}

impl UnitStage {
    /// 文件名中的类型片段
    pub fn file_kind(self) -> &'static str {
        match self {
            UnitStage::Assignment => "Assignment",
            UnitStage::LessonPlan => "LessonPlan",
            UnitStage::Slides => "Slides",
            UnitStage::Quiz => "Quiz",
        }
    }

    pub fn slot(self) -> ArtifactSlot {
        match self {
            UnitStage::Assignment => ArtifactSlot::Html,
            UnitStage::LessonPlan => ArtifactSlot::Pdf,
            UnitStage::Slides => ArtifactSlot::Pptx,
            UnitStage::Quiz => ArtifactSlot::Zip,
        }
    }

    /// 作业的子阶段在进度标签中的名称；测验只有一个阶段，没有名称
    pub fn progress_name(self) -> Option<&'static str> {
        match self {
            UnitStage::Assignment => Some("HTML"),
            UnitStage::LessonPlan => Some("Lesson Plan"),
            UnitStage::Slides => Some("Slides"),
            UnitStage::Quiz => None,
        }
    }
}

impl fmt::Display for UnitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_kind())
    }
}

/// 单元包的外部生成能力
#[async_trait]
pub trait StageRunner: Send + Sync {
    /// 作业页面（已去掉代码块标记）
    async fn assignment_html(&self, ctx: &UnitContext, item: &UnitSequenceItem) -> AppResult<String>;

    /// 课程计划 PDF 与模型原始文本
    async fn lesson_plan(
        &self,
        ctx: &UnitContext,
        item: &UnitSequenceItem,
    ) -> AppResult<LessonPlanOutput>;

    /// 幻灯片；`lesson_text` 为空时从头生成
    async fn slide_deck(
        &self,
        ctx: &UnitContext,
        item: &UnitSequenceItem,
        lesson_text: &str,
    ) -> AppResult<Vec<u8>>;

    /// 测验；`context_topics` 为上一次测验之后讲过的子主题
    async fn quiz(
        &self,
        ctx: &UnitContext,
        item: &UnitSequenceItem,
        context_topics: &[String],
    ) -> AppResult<Quiz>;
}

/// 基于文本生成器的阶段实现
pub struct LlmStageRunner<G> {
    generator: G,
    policy: BatchPolicy,
    quiz_questions: usize,
}

impl<G: TextGenerator> LlmStageRunner<G> {
    pub fn new(generator: G, policy: BatchPolicy, quiz_questions: usize) -> Self {
        Self {
            generator,
            policy,
            quiz_questions,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

#[async_trait]
impl<G: TextGenerator> StageRunner for LlmStageRunner<G> {
    async fn assignment_html(&self, ctx: &UnitContext, item: &UnitSequenceItem) -> AppResult<String> {
        generate_assignment_html(&self.generator, ctx, &item.focus_topic).await
    }

    async fn lesson_plan(
        &self,
        ctx: &UnitContext,
        item: &UnitSequenceItem,
    ) -> AppResult<LessonPlanOutput> {
        let topic = ctx.lesson_topic(&item.focus_topic);
        let header = LessonHeader {
            topic: &topic,
            grade: &ctx.grade_level,
            standard: &ctx.standard,
            strategy: &ctx.strategy,
        };
        generate_lesson_plan(&self.generator, &header).await
    }

    async fn slide_deck(
        &self,
        ctx: &UnitContext,
        item: &UnitSequenceItem,
        lesson_text: &str,
    ) -> AppResult<Vec<u8>> {
        let topic = ctx.lesson_topic(&item.focus_topic);
        generate_slide_deck(&self.generator, &topic, &ctx.grade_level, &ctx.strategy, lesson_text).await
    }

    async fn quiz(
        &self,
        ctx: &UnitContext,
        item: &UnitSequenceItem,
        context_topics: &[String],
    ) -> AppResult<Quiz> {
        let request = ctx.quiz_request(&item.focus_topic, self.quiz_questions, context_topics);
        let mut progress = TracingProgress::new(format!("[测验 {}]", item.title));

        let generated = generate_questions(&request, &self.generator, self.policy, &mut progress).await?;
        if generated.questions.is_empty() {
            return Err(AppError::generation_failed(
                "quiz",
                format!("{} 批次均未返回可用题目", generated.batches_attempted),
            ));
        }
        if generated.is_partial() {
            warn!(
                "[测验 {}] 题目不足: {}/{}",
                item.title,
                generated.questions.len(),
                generated.target_count
            );
        }

        Ok(generated.into_quiz(item.title.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// 记录提示词，每次返回 4 道题
    struct ByPrompt {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for ByPrompt {
        async fn generate(&self, prompt: &str, _want_json: bool) -> AppResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let questions: Vec<_> = (0..4)
                .map(|i| json!({ "question_text": format!("Q{i}"), "options": ["a", "b"], "correct_answer_index": 0 }))
                .collect();
            Ok(json!({ "questions": questions }).to_string())
        }
    }

    fn ctx() -> UnitContext {
        toml::from_str(
            r#"
            topic = "Cells"
            grade_level = "7"
            standard = "MS-LS1-1"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_stage_file_kinds() {
        assert_eq!(UnitStage::LessonPlan.file_kind(), "LessonPlan");
        assert_eq!(UnitStage::Slides.slot(), ArtifactSlot::Pptx);
        assert_eq!(UnitStage::Quiz.progress_name(), None);
    }

    #[tokio::test]
    async fn test_quiz_stage_uses_context_topics_and_title() {
        let runner = LlmStageRunner::new(
            ByPrompt {
                prompts: Mutex::new(Vec::new()),
            },
            BatchPolicy {
                batch_size: 2,
                extra_batches: 0,
            },
            3,
        );
        let item = UnitSequenceItem::quiz("Cell Check", "Organelles");
        let topics = vec!["Membranes".to_string(), "Nucleus".to_string()];

        let quiz = runner.quiz(&ctx(), &item, &topics).await.unwrap();
        assert_eq!(quiz.title, "Cell Check");
        assert_eq!(quiz.len(), 3);

        let prompts = runner.generator().prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Membranes"));
        assert!(prompts[0].contains("Nucleus"));
    }
}
