//! # Canvas Content Creator
//!
//! 调用文本生成服务，批量生成可导入 LMS 的教学内容：
//! QTI 测验包、课程计划 PDF、幻灯片 PPTX、作业 HTML 以及完整的单元压缩包
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `TextGenerator` - 文本生成接口，`OpenAiGenerator` 为其实现
//! - `ArchiveWriter` - 确定性的 zip 打包
//! - `ProgressSink` - 进度回调
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能生成什么"，只处理单个产物
//! - `json_sanitizer` - 修复模型输出的 JSON
//! - `prompt_builder` - 提示词模板
//! - `quiz_generator` - 分批生成题目
//! - `qti_serializer` - QTI 1.2 测验包
//! - `render/` - 课程计划 PDF 与幻灯片 PPTX
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"单元中的一项"的完整处理流程
//! - `ItemCtx` - 上下文封装（序号 + 标题）
//! - `StageRunner` - 单元各阶段的生成接口
//! - `UnitItemFlow` - 流程编排（HTML → 课程计划 → 幻灯片，或测验）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量任务处理器，管理资源和统计
//! - `orchestrator/job_processor` - 单个任务处理器
//! - `orchestrator/unit_orchestrator` - 单元包编排器，遍历单元序列
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{OpenAiGenerator, ProgressSink, TextGenerator};
pub use models::{Question, Quiz, QuizRequest, UnitContext, UnitSequenceItem};
pub use orchestrator::{build_unit_package, App, UnitPackage};
pub use services::{generate_questions, serialize_qti};
pub use workflow::{ItemCtx, LlmStageRunner, StageRunner};
