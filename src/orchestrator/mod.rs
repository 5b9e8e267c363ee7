//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量任务处理器
//! - 管理应用生命周期（初始化、运行）
//! - 启动前的配置校验和连通性检查
//! - 批量加载任务（Vec<JobFile>）
//! - 输出全局统计信息
//!
//! ### `job_processor` - 单个任务处理器
//! - 读取参考资料、推荐工具、规划单元序列
//! - 测验任务：分批生成 → QTI 压缩包
//! - 单元任务：委托 `unit_orchestrator`
//! - 写出结果文件
//!
//! ### `unit_orchestrator` - 单元包编排器
//! - 遍历单元序列（Vec<UnitSequenceItem>）
//! - 维护上下文缓冲区和进度
//! - 收集产物写入压缩包，记录失败阶段
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<JobFile>)
//!     ↓
//! job_processor (处理单个任务)
//!     ↓
//! unit_orchestrator (处理 Vec<UnitSequenceItem>)
//!     ↓
//! workflow::UnitItemFlow (处理单个条目)
//!     ↓
//! services (能力层：prompt / generate / sanitize / render)
//!     ↓
//! infrastructure (基础设施：TextGenerator / archive / progress)
//! ```

pub mod batch_processor;
pub mod job_processor;
pub mod unit_orchestrator;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use job_processor::{process_job, JobReport, JobStatus};
pub use unit_orchestrator::{build_unit_package, UnitPackage};
