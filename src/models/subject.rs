/// 学科方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    Science,
    Math,
    English,
    #[serde(rename = "Business & Economics")]
    BusinessEconomics,
    #[serde(rename = "Humanities & Arts")]
    HumanitiesArts,
    #[serde(rename = "Technology & CS")]
    TechnologyCs,
    #[default]
    General,
}

impl Subject {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Science => "Science",
            Subject::Math => "Math",
            Subject::English => "English",
            Subject::BusinessEconomics => "Business & Economics",
            Subject::HumanitiesArts => "Humanities & Arts",
            Subject::TechnologyCs => "Technology & CS",
            Subject::General => "General",
        }
    }

    /// 从名称解析学科
    pub fn from_str(name: &str) -> Option<Self> {
        let name = name.trim();
        [
            Subject::Science,
            Subject::Math,
            Subject::English,
            Subject::BusinessEconomics,
            Subject::HumanitiesArts,
            Subject::TechnologyCs,
            Subject::General,
        ]
        .into_iter()
        .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// 作业提示词中的学科侧重点
    pub fn focus_context(self) -> &'static str {
        match self {
            Subject::BusinessEconomics => "Focus on market dynamics, finance, and management scenarios.",
            Subject::HumanitiesArts => "Focus on history, literature, visual arts, and cultural analysis.",
            Subject::TechnologyCs => "Focus on coding, digital literacy, and systems thinking.",
            _ => "",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
