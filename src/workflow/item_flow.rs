//! 单元条目处理流程 - 流程层
//!
//! 核心职责：定义"单元中的一项"的完整处理流程
//!
//! - 作业：HTML → 课程计划 PDF → 幻灯片（串联课程计划文本）
//! - 测验：生成题目（带上下文主题）→ QTI 压缩包，然后清空上下文
//!
//! 单个阶段失败只记录下来，对应文件缺席；只有致命错误会中断整个单元。

use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::infrastructure::ProgressSink;
use crate::models::artifact::GeneratedArtifact;
use crate::models::request::UnitContext;
use crate::models::unit::{ItemKind, UnitSequenceItem};
use crate::services::serialize_qti;
use crate::workflow::item_ctx::ItemCtx;
use crate::workflow::stage_runner::{StageRunner, UnitStage};

/// 某个阶段的失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// 条目序号（从1开始）
    pub item_index: usize,
    pub title: String,
    pub stage: UnitStage,
    pub message: String,
}

/// 一个条目的处理结果
#[derive(Debug, Default)]
pub struct ItemOutcome {
    /// 按生成顺序排列
    pub artifacts: Vec<GeneratedArtifact>,
    pub failures: Vec<StageFailure>,
}

impl ItemOutcome {
    fn push(&mut self, ctx: &ItemCtx, stage: UnitStage, bytes: Vec<u8>) {
        let file_name = ctx.file_name(stage.file_kind(), stage.slot());
        info!("{} ✓ {}", ctx, file_name);
        self.artifacts
            .push(GeneratedArtifact::new(file_name, stage.slot(), bytes));
    }

    /// 记录可恢复的失败；致命错误原样返回
    fn fail(&mut self, ctx: &ItemCtx, stage: UnitStage, err: AppError) -> AppResult<()> {
        if err.is_fatal() {
            return Err(err);
        }
        error!("{} ❌ {} 生成失败: {}", ctx, stage, err);
        self.failures.push(StageFailure {
            item_index: ctx.index,
            title: ctx.title.clone(),
            stage,
            message: err.to_string(),
        });
        Ok(())
    }
}

/// 单元进度计数：每完成一个子阶段上报 `current / total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCounter {
    current: usize,
    total: usize,
}

impl StepCounter {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// 作业 3 步，测验 1 步
    pub fn for_sequence(sequence: &[UnitSequenceItem]) -> Self {
        Self::new(sequence.iter().map(|item| item.kind.step_count()).sum())
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn advance(&mut self, progress: &mut dyn ProgressSink, label: &str) {
        self.current += 1;
        let fraction = if self.total == 0 {
            1.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        };
        progress.report(fraction, label);
    }
}

/// 单元条目处理流程
///
/// - 不持有上下文缓冲区和压缩包，由编排层传入 / 收集
/// - 只依赖 `StageRunner`
pub struct UnitItemFlow<'a> {
    runner: &'a dyn StageRunner,
    unit: &'a UnitContext,
}

impl<'a> UnitItemFlow<'a> {
    pub fn new(runner: &'a dyn StageRunner, unit: &'a UnitContext) -> Self {
        Self { runner, unit }
    }

    pub async fn run(
        &self,
        item: &UnitSequenceItem,
        ctx: &ItemCtx,
        context_buffer: &mut Vec<String>,
        steps: &mut StepCounter,
        progress: &mut dyn ProgressSink,
    ) -> AppResult<ItemOutcome> {
        match item.kind {
            ItemKind::Assignment => {
                self.run_assignment(item, ctx, context_buffer, steps, progress)
                    .await
            }
            ItemKind::Quiz => {
                self.run_quiz(item, ctx, context_buffer, steps, progress)
                    .await
            }
        }
    }

    async fn run_assignment(
        &self,
        item: &UnitSequenceItem,
        ctx: &ItemCtx,
        context_buffer: &mut Vec<String>,
        steps: &mut StepCounter,
        progress: &mut dyn ProgressSink,
    ) -> AppResult<ItemOutcome> {
        let mut outcome = ItemOutcome::default();

        // ========== 1. 作业页面 ==========
        match self.runner.assignment_html(self.unit, item).await {
            Ok(html) => {
                outcome.push(ctx, UnitStage::Assignment, html.into_bytes());
                context_buffer.push(item.focus_topic.clone());
            }
            Err(e) => outcome.fail(ctx, UnitStage::Assignment, e)?,
        }
        steps.advance(progress, &ctx.progress_label(UnitStage::Assignment.progress_name()));

        // ========== 2. 课程计划 ==========
        let lesson_text = match self.runner.lesson_plan(self.unit, item).await {
            Ok(output) => {
                outcome.push(ctx, UnitStage::LessonPlan, output.pdf);
                output.raw_text
            }
            Err(e) => {
                outcome.fail(ctx, UnitStage::LessonPlan, e)?;
                String::new()
            }
        };
        steps.advance(progress, &ctx.progress_label(UnitStage::LessonPlan.progress_name()));

        // ========== 3. 幻灯片（串联课程计划文本） ==========
        match self.runner.slide_deck(self.unit, item, &lesson_text).await {
            Ok(pptx) => outcome.push(ctx, UnitStage::Slides, pptx),
            Err(e) => outcome.fail(ctx, UnitStage::Slides, e)?,
        }
        steps.advance(progress, &ctx.progress_label(UnitStage::Slides.progress_name()));

        Ok(outcome)
    }

    async fn run_quiz(
        &self,
        item: &UnitSequenceItem,
        ctx: &ItemCtx,
        context_buffer: &mut Vec<String>,
        steps: &mut StepCounter,
        progress: &mut dyn ProgressSink,
    ) -> AppResult<ItemOutcome> {
        let mut outcome = ItemOutcome::default();

        if !context_buffer.is_empty() {
            info!("{} 上下文主题: {}", ctx, context_buffer.join(", "));
        }

        let package = match self.runner.quiz(self.unit, item, context_buffer.as_slice()).await {
            Ok(quiz) => serialize_qti(&quiz, &quiz.title),
            Err(e) => Err(e),
        };
        match package {
            Ok(bytes) => outcome.push(ctx, UnitStage::Quiz, bytes),
            Err(e) => outcome.fail(ctx, UnitStage::Quiz, e)?,
        }

        // 无论成功与否，测验之后上下文重新开始累积
        context_buffer.clear();
        steps.advance(progress, &ctx.progress_label(UnitStage::Quiz.progress_name()));

        Ok(outcome)
    }
}
