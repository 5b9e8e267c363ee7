//! 基础设施层
//!
//! 持有外部资源（模型客户端、内存中的压缩包），只暴露能力，不关心流程

pub mod archive;
pub mod openai_generator;
pub mod progress;
pub mod text_generator;

pub use archive::{read_entries, ArchiveWriter};
pub use openai_generator::OpenAiGenerator;
pub use progress::{NoProgress, ProgressEntry, ProgressSink, ProgressTrail, TracingProgress};
pub use text_generator::TextGenerator;
