//! 单元包编排器 - 编排层
//!
//! ## 职责
//!
//! 按顺序遍历单元序列，把每一项交给 `UnitItemFlow`，
//! 维护上下文缓冲区和进度，并把产物按生成顺序写入压缩包。
//!
//! ## 压缩包布局
//!
//! ```text
//! {idx:02}_Assignment_{safe}.html
//! {idx:02}_LessonPlan_{safe}.pdf
//! {idx:02}_Slides_{safe}.pptx
//! {idx:02}_Quiz_{safe}.zip
//! ```

use tracing::{info, warn};

use crate::error::AppResult;
use crate::infrastructure::progress::Tee;
use crate::infrastructure::{ArchiveWriter, ProgressEntry, ProgressSink, ProgressTrail};
use crate::models::request::UnitContext;
use crate::models::unit::UnitSequenceItem;
use crate::workflow::{ItemCtx, StageFailure, StageRunner, StepCounter, UnitItemFlow};

/// 单元包
#[derive(Debug, Clone)]
pub struct UnitPackage {
    /// 压缩包字节
    pub bytes: Vec<u8>,
    /// 按写入顺序排列的文件名
    pub file_names: Vec<String>,
    pub progress_trail: Vec<ProgressEntry>,
    pub failures: Vec<StageFailure>,
    pub total_steps: usize,
}

impl UnitPackage {
    /// 所有阶段都成功
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 生成整个单元包
///
/// 阶段失败只会让对应文件缺席；致命错误（配置类）直接返回
pub async fn build_unit_package(
    sequence: &[UnitSequenceItem],
    ctx: &UnitContext,
    runner: &dyn StageRunner,
    progress: &mut dyn ProgressSink,
) -> AppResult<UnitPackage> {
    let flow = UnitItemFlow::new(runner, ctx);
    let mut steps = StepCounter::for_sequence(sequence);
    let mut trail = ProgressTrail::new();
    let mut context_buffer: Vec<String> = Vec::new();
    let mut archive = ArchiveWriter::new();
    let mut failures = Vec::new();

    log_unit_start(ctx, sequence, steps.total());

    for (index, item) in sequence.iter().enumerate() {
        let item_ctx = ItemCtx::new(index + 1, sequence.len(), item);
        info!("\n{} {}", item_ctx, "─".repeat(30));
        info!("{} 子主题: {}", item_ctx, item.focus_topic);

        let outcome = {
            let mut sink = Tee::new(progress, &mut trail);
            flow.run(item, &item_ctx, &mut context_buffer, &mut steps, &mut sink)
                .await?
        };

        for artifact in &outcome.artifacts {
            archive.add_file(&artifact.file_name, &artifact.bytes)?;
        }
        failures.extend(outcome.failures);
    }

    let file_names = archive.entry_names().to_vec();
    let bytes = archive.finish()?;

    let package = UnitPackage {
        bytes,
        file_names,
        progress_trail: trail.into_entries(),
        failures,
        total_steps: steps.total(),
    };
    log_unit_complete(ctx, &package);
    Ok(package)
}

// ========== 日志辅助函数 ==========

fn log_unit_start(ctx: &UnitContext, sequence: &[UnitSequenceItem], total_steps: usize) {
    info!("[单元 {}] 开始生成", ctx.topic);
    info!("[单元 {}] 学科: {} | 年级: {}", ctx.topic, ctx.subject, ctx.grade_level);
    info!(
        "[单元 {}] 条目总数: {}，子阶段总数: {}",
        ctx.topic,
        sequence.len(),
        total_steps
    );
}

fn log_unit_complete(ctx: &UnitContext, package: &UnitPackage) {
    info!(
        "[单元 {}] 文件统计: 成功 {}, 失败 {}",
        ctx.topic,
        package.file_names.len(),
        package.failures.len()
    );
    if package.is_complete() {
        info!("[单元 {}] ✅ 单元包生成完成", ctx.topic);
    } else {
        for failure in &package.failures {
            warn!(
                "[单元 {}] ⚠️ 缺少第 {} 项 {} 的 {}: {}",
                ctx.topic, failure.item_index, failure.title, failure.stage, failure.message
            );
        }
    }
}
