/// 产物的逻辑类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactSlot {
    Html,
    Pdf,
    Pptx,
    Zip,
}

impl ArtifactSlot {
    /// 文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactSlot::Html => "html",
            ArtifactSlot::Pdf => "pdf",
            ArtifactSlot::Pptx => "pptx",
            ArtifactSlot::Zip => "zip",
        }
    }
}

/// 某个阶段产出的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub file_name: String,
    pub slot: ArtifactSlot,
    pub bytes: Vec<u8>,
}

impl GeneratedArtifact {
    pub fn new(file_name: impl Into<String>, slot: ArtifactSlot, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            slot,
            bytes,
        }
    }
}

/// 单元包内的文件名：`{两位序号}_{类型}_{安全标题}.{扩展名}`
pub fn unit_file_name(index: usize, kind: &str, safe_title: &str, slot: ArtifactSlot) -> String {
    format!("{:02}_{}_{}.{}", index, kind, safe_title, slot.extension())
}
