//! 业务能力层（Services）
//!
//! 每个模块只描述"我能生成什么"：构建提示词、调用生成器、解析结果、渲染字节。
//! 不关心单元序列，也不持有进度以外的状态。

pub mod assignment;
pub mod json_sanitizer;
pub mod lesson_plan;
pub mod prompt_builder;
pub mod qti_serializer;
pub mod quiz_generator;
pub mod slide_deck;
pub mod source_material;
pub mod tool_catalog;
pub mod unit_outline;

pub use assignment::generate_assignment_html;
pub use lesson_plan::generate_lesson_plan;
pub use qti_serializer::serialize_qti;
pub use quiz_generator::{generate_questions, BatchPolicy, GeneratedQuiz};
pub use slide_deck::generate_slide_deck;
pub use source_material::load_source_text;
pub use tool_catalog::recommend_tool;
pub use unit_outline::plan_unit_sequence;
