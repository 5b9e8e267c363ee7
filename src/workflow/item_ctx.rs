//! 单元条目上下文
//!
//! 封装"我正在处理单元中的第几项"这一信息

use std::fmt::Display;

use crate::models::artifact::{unit_file_name, ArtifactSlot};
use crate::models::unit::{ItemKind, UnitSequenceItem};

/// 单元条目上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 条目在序列中的位置（从1开始）
    pub index: usize,

    /// 序列总长度（仅用于日志显示）
    pub total: usize,

    pub kind: ItemKind,
    pub title: String,
    pub focus_topic: String,
}

impl ItemCtx {
    pub fn new(index: usize, total: usize, item: &UnitSequenceItem) -> Self {
        Self {
            index,
            total,
            kind: item.kind,
            title: item.title.clone(),
            focus_topic: item.focus_topic.clone(),
        }
    }

    /// 进度标签，如 `Generating Assignment 1/3: Intro (HTML)...`
    pub fn progress_label(&self, stage: Option<&str>) -> String {
        match stage {
            Some(stage) => format!(
                "Generating {} {}/{}: {} ({})...",
                self.kind.label(),
                self.index,
                self.total,
                self.title,
                stage
            ),
            None => format!(
                "Generating {} {}/{}: {}...",
                self.kind.label(),
                self.index,
                self.total,
                self.title
            ),
        }
    }

    /// 该条目某个产物在单元包内的文件名
    pub fn file_name(&self, kind: &str, slot: ArtifactSlot) -> String {
        let safe_title = crate::models::unit::safe_file_segment(&self.title);
        unit_file_name(self.index, kind, &safe_title, slot)
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[单元 {} {}/{} {}]",
            self.kind.label(),
            self.index,
            self.total,
            self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_file_names() {
        let item = UnitSequenceItem::assignment("Intro to Cells", "Cell Theory");
        let ctx = ItemCtx::new(3, 7, &item);

        assert_eq!(ctx.to_string(), "[单元 Assignment 3/7 Intro to Cells]");
        assert_eq!(
            ctx.progress_label(Some("HTML")),
            "Generating Assignment 3/7: Intro to Cells (HTML)..."
        );
        assert_eq!(
            ctx.file_name("Slides", ArtifactSlot::Pptx),
            "03_Slides_Intro_to_Cells.pptx"
        );

        let quiz = ItemCtx::new(4, 7, &UnitSequenceItem::quiz("Check", "Cells"));
        assert_eq!(quiz.progress_label(None), "Generating Quiz 4/7: Check...");
    }
}
