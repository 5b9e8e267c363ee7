//! 文档渲染层：结构化数据 → 文件字节

pub mod pdf;
pub mod pptx;

pub use pdf::{render_lesson_plan, LessonHeader};
pub use pptx::{expand_slides, render_slide_deck};
