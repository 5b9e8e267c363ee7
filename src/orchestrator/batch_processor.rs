//! 批量任务处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量任务的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志表头、校验配置、检查生成服务连通性
//! 2. **批量加载**：扫描并加载所有待处理的任务（`Vec<JobFile>`）
//! 3. **顺序处理**：每个任务完成后再开始下一个
//! 4. **资源管理**：持有唯一的文本生成器
//! 5. **全局统计**：汇总成功 / 部分完成 / 失败
//!
//! 配置类错误（未授权、不可达）会立即终止整个运行，其余错误只影响当前任务。

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::{OpenAiGenerator, TextGenerator};
use crate::models::JobFile;
use crate::orchestrator::job_processor::{process_job, JobStatus};
use crate::utils::logging::{init_log_file, log_job_start, log_jobs_loaded, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    generator: Arc<dyn TextGenerator>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        config.validate().context("配置校验失败")?;

        let generator = OpenAiGenerator::new(&config);
        generator
            .check_connection()
            .await
            .context("生成服务连接检查失败")?;
        info!("✓ 生成服务连接正常 (模型: {})", generator.model_name());

        Ok(Self::with_generator(config, Arc::new(generator)))
    }

    /// 使用指定的生成器创建应用（不做连通性检查）
    pub fn with_generator(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self { config, generator }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let jobs = self.load_jobs().await?;

        if jobs.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_jobs_loaded(jobs.len(), &self.config.jobs_folder);

        let stats = self.process_all_jobs(&jobs).await?;

        print_final_stats(
            stats.success,
            stats.partial,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 加载任务
    async fn load_jobs(&self) -> Result<Vec<JobFile>> {
        info!("\n📁 正在扫描待处理的任务...");
        crate::models::load_all_job_files(&self.config.jobs_folder).await
    }

    /// 依次处理所有任务
    async fn process_all_jobs(&self, jobs: &[JobFile]) -> Result<ProcessingStats> {
        let mut stats = ProcessingStats {
            total: jobs.len(),
            ..Default::default()
        };

        for (index, job) in jobs.iter().enumerate() {
            log_job_start(index + 1, jobs.len(), &job.name());

            match process_job(job, self.generator.clone(), &self.config).await {
                Ok(report) => match report.status {
                    JobStatus::Complete => stats.success += 1,
                    JobStatus::Partial => stats.partial += 1,
                },
                Err(e) if is_fatal(&e) => {
                    error!("[任务 {}] ❌ 致命错误，终止运行: {:#}", job.name(), e);
                    return Err(e);
                }
                Err(e) => {
                    error!("[任务 {}] ❌ 处理失败: {:#}", job.name(), e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<AppError>().is_some_and(AppError::is_fatal)
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub partial: usize,
    pub failed: usize,
    pub total: usize,
}
