//! 单个任务处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **准备输入**：读取参考资料，必要时推荐互动工具、规划单元序列
//! 2. **向下委托**：测验交给 `generate_questions` + `serialize_qti`，
//!    作业交给作业 / 课程计划 / 幻灯片三个生成服务，单元交给 `build_unit_package`
//! 3. **写出结果**：`{topic}_Quiz.zip`、`{topic}_Assignment.html`（及可选的
//!    `{topic}_LessonPlan.pdf`、`{topic}_Slides.pptx`）或 `Unit_{topic}.zip`
//! 4. **结果分级**：题目不足、缺少附带文件或单元缺文件时记为部分完成

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, FileError};
use crate::infrastructure::{TextGenerator, TracingProgress};
use crate::models::job::{AssignmentJob, Job, JobFile, QuizJob, UnitJob};
use crate::models::request::UnitContext;
use crate::models::unit::safe_file_segment;
use crate::orchestrator::unit_orchestrator::build_unit_package;
use crate::render::pdf::LessonHeader;
use crate::services::{
    generate_assignment_html, generate_lesson_plan, generate_questions, generate_slide_deck,
    load_source_text, plan_unit_sequence, recommend_tool, serialize_qti,
};
use crate::workflow::LlmStageRunner;

/// `tool = "auto"` 时由模型从工具目录中挑选
pub const AUTO_TOOL: &str = "auto";

/// 任务完成程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Complete,
    /// 已写出文件，但题目不足或缺少部分单元文件
    Partial,
}

/// 单个任务的结果
#[derive(Debug, Clone)]
pub struct JobReport {
    pub output_path: PathBuf,
    pub status: JobStatus,
}

/// 处理单个任务
///
/// # 参数
/// - `job_file`: 任务数据
/// - `generator`: 文本生成器
/// - `config`: 配置（分批策略、输出目录）
pub async fn process_job(
    job_file: &JobFile,
    generator: Arc<dyn TextGenerator>,
    config: &Config,
) -> Result<JobReport> {
    let prefix = format!("[任务 {}]", job_file.name());
    match &job_file.job {
        Job::Quiz(job) => process_quiz_job(job, generator.as_ref(), config, &prefix).await,
        Job::Assignment(job) => {
            process_assignment_job(job, generator.as_ref(), config, &prefix).await
        }
        Job::Unit(job) => process_unit_job(job, generator, config, &prefix).await,
    }
}

async fn process_quiz_job(
    job: &QuizJob,
    generator: &dyn TextGenerator,
    config: &Config,
    prefix: &str,
) -> Result<JobReport> {
    let mut request = job.request.clone();
    if let Some(path) = &job.source_file {
        request.source_text = Some(read_source(path, prefix).await?);
    }

    info!(
        "{} 测验: {} | 目标 {} 题 | 题型: {}",
        prefix,
        request.topic,
        request.target_count,
        request.question_types_label()
    );

    let mut progress = TracingProgress::new(prefix);
    let generated = generate_questions(&request, generator, config.batch_policy(), &mut progress)
        .await
        .with_context(|| format!("{} 题目生成失败", prefix))?;

    anyhow::ensure!(
        !generated.questions.is_empty(),
        "{} {} 个批次均未返回可用题目",
        prefix,
        generated.batches_attempted
    );

    let status = if generated.is_partial() {
        warn!(
            "{} ⚠️ 题目不足: {}/{}（失败批次 {}）",
            prefix,
            generated.questions.len(),
            generated.target_count,
            generated.batches_failed
        );
        JobStatus::Partial
    } else {
        JobStatus::Complete
    };

    let quiz = generated.into_quiz(job.title());
    let bytes = serialize_qti(&quiz, &quiz.title).with_context(|| format!("{} QTI 打包失败", prefix))?;

    let file_name = format!("{}_Quiz.zip", safe_file_segment(&request.topic));
    let output_path = write_output(&config.output_folder, &file_name, &bytes).await?;
    info!("{} ✓ 已写出 {} ({} 题)", prefix, output_path.display(), quiz.len());

    Ok(JobReport { output_path, status })
}

async fn process_unit_job(
    job: &UnitJob,
    generator: Arc<dyn TextGenerator>,
    config: &Config,
    prefix: &str,
) -> Result<JobReport> {
    let mut ctx = job.context.clone();
    if let Some(path) = &job.source_file {
        ctx.source_text = Some(read_source(path, prefix).await?);
    }

    resolve_tool(&mut ctx, generator.as_ref(), prefix).await?;

    let sequence = match &job.sequence {
        Some(sequence) => sequence.clone(),
        None => plan_unit_sequence(generator.as_ref(), &ctx, job.num_assignments, job.num_quizzes)
            .await
            .with_context(|| format!("{} 单元序列规划失败", prefix))?,
    };

    let runner = LlmStageRunner::new(generator, config.batch_policy(), config.unit_quiz_questions);
    let mut progress = TracingProgress::new(prefix);
    let package = build_unit_package(&sequence, &ctx, &runner, &mut progress)
        .await
        .with_context(|| format!("{} 单元包生成失败", prefix))?;

    let status = if package.is_complete() {
        JobStatus::Complete
    } else {
        JobStatus::Partial
    };

    let file_name = format!("Unit_{}.zip", safe_file_segment(&ctx.topic));
    let output_path = write_output(&config.output_folder, &file_name, &package.bytes).await?;
    info!(
        "{} ✓ 已写出 {} ({} 个文件)",
        prefix,
        output_path.display(),
        package.file_names.len()
    );

    Ok(JobReport { output_path, status })
}

async fn process_assignment_job(
    job: &AssignmentJob,
    generator: &dyn TextGenerator,
    config: &Config,
    prefix: &str,
) -> Result<JobReport> {
    let mut ctx = job.context.clone();
    if let Some(path) = &job.source_file {
        ctx.source_text = Some(read_source(path, prefix).await?);
    }
    resolve_tool(&mut ctx, generator, prefix).await?;

    let focus_topic = job.focus_topic();
    let safe_topic = safe_file_segment(&ctx.topic);
    info!("{} 作业: {} | 子主题: {}", prefix, ctx.topic, focus_topic);

    let html = generate_assignment_html(generator, &ctx, focus_topic)
        .await
        .with_context(|| format!("{} 作业生成失败", prefix))?;
    let output_path = write_output(
        &config.output_folder,
        &format!("{}_Assignment.html", safe_topic),
        html.as_bytes(),
    )
    .await?;
    info!("{} ✓ 已写出 {}", prefix, output_path.display());

    let mut status = JobStatus::Complete;

    // ========== 课程计划（可选） ==========
    let mut lesson_text = String::new();
    if job.include_lesson_plan {
        let header = LessonHeader {
            topic: &ctx.topic,
            grade: &ctx.grade_level,
            standard: &ctx.standard,
            strategy: &ctx.strategy,
        };
        match recover(generate_lesson_plan(generator, &header).await, prefix, "课程计划")? {
            Some(output) => {
                let path = write_output(
                    &config.output_folder,
                    &format!("{}_LessonPlan.pdf", safe_topic),
                    &output.pdf,
                )
                .await?;
                info!("{} ✓ 已写出 {}", prefix, path.display());
                lesson_text = output.raw_text;
            }
            None => status = JobStatus::Partial,
        }
    }

    // ========== 幻灯片（可选，串联课程计划文本） ==========
    if job.include_slides {
        let deck = generate_slide_deck(
            generator,
            &ctx.topic,
            &ctx.grade_level,
            &ctx.strategy,
            &lesson_text,
        )
        .await;
        match recover(deck, prefix, "幻灯片")? {
            Some(pptx) => {
                let path = write_output(
                    &config.output_folder,
                    &format!("{}_Slides.pptx", safe_topic),
                    &pptx,
                )
                .await?;
                info!("{} ✓ 已写出 {}", prefix, path.display());
            }
            None => status = JobStatus::Partial,
        }
    }

    Ok(JobReport { output_path, status })
}

/// `tool = "auto"` 时向模型要推荐；可恢复的失败只记录警告，不嵌入工具
async fn resolve_tool(ctx: &mut UnitContext, generator: &dyn TextGenerator, prefix: &str) -> Result<()> {
    if ctx.tool.as_deref() != Some(AUTO_TOOL) {
        return Ok(());
    }

    let picked = recover(
        recommend_tool(generator, &ctx.topic, &ctx.standard).await,
        prefix,
        "工具推荐",
    )?;
    ctx.tool = picked.flatten().map(str::to_string);
    info!("{} 互动工具: {}", prefix, ctx.tool.as_deref().unwrap_or("None"));
    Ok(())
}

/// 可恢复的失败记为警告并返回 `None`；致命错误向上传递
fn recover<T>(result: AppResult<T>, prefix: &str, stage: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(anyhow::Error::from(e).context(format!("{} {}失败", prefix, stage))),
        Err(e) => {
            warn!("{} ⚠️ {}失败: {}", prefix, stage, e);
            Ok(None)
        }
    }
}

async fn read_source(path: &Path, prefix: &str) -> Result<String> {
    let text = load_source_text(path)
        .await
        .with_context(|| format!("{} 无法读取参考资料", prefix))?;
    info!("{} 📚 参考资料: {} ({} 字符)", prefix, path.display(), text.chars().count());
    Ok(text)
}

async fn write_output(folder: &str, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(folder)
        .await
        .with_context(|| format!("无法创建输出目录: {}", folder))?;

    let path = Path::new(folder).join(file_name);
    fs::write(&path, bytes)
        .await
        .map_err(|source| FileError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
    Ok(path)
}
