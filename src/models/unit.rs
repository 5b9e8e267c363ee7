use serde::{Deserialize, Serialize};

/// 单元条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Assignment,
    Quiz,
}

impl ItemKind {
    /// 解析模型返回的类型字符串（忽略大小写）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "assignment" => Some(ItemKind::Assignment),
            "quiz" => Some(ItemKind::Quiz),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Assignment => "Assignment",
            ItemKind::Quiz => "Quiz",
        }
    }

    /// 该类条目对应的子阶段数量
    pub fn step_count(self) -> usize {
        match self {
            ItemKind::Assignment => 3,
            ItemKind::Quiz => 1,
        }
    }
}

/// 单元序列中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSequenceItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    pub focus_topic: String,
}

impl UnitSequenceItem {
    pub fn new(kind: ItemKind, title: impl Into<String>, focus_topic: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            focus_topic: focus_topic.into(),
        }
    }

    pub fn assignment(title: impl Into<String>, focus_topic: impl Into<String>) -> Self {
        Self::new(ItemKind::Assignment, title, focus_topic)
    }

    pub fn quiz(title: impl Into<String>, focus_topic: impl Into<String>) -> Self {
        Self::new(ItemKind::Quiz, title, focus_topic)
    }

    /// 可以直接作为文件名片段的标题
    pub fn safe_title(&self) -> String {
        safe_file_segment(&self.title)
    }
}

/// 有序的单元序列
pub type UnitSequence = Vec<UnitSequenceItem>;

/// 空格替换为下划线，路径分隔符替换为连字符
pub fn safe_file_segment(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            other => other,
        })
        .collect()
}
