use std::path::PathBuf;

use serde::Deserialize;

use super::request::{QuizRequest, UnitContext};
use super::unit::UnitSequence;

/// 任务文件内容（TOML）
///
/// ```toml
/// kind = "quiz"
/// title = "Photosynthesis Quiz"
///
/// [request]
/// topic = "Photosynthesis"
/// target_count = 15
/// grade_level = "10"
/// standard = "NGSS HS-LS1-5"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Job {
    Quiz(QuizJob),
    Assignment(AssignmentJob),
    Unit(UnitJob),
}

/// 单个测验任务
#[derive(Debug, Clone, Deserialize)]
pub struct QuizJob {
    /// 测验标题，缺省为 "{topic} Quiz"
    #[serde(default)]
    pub title: Option<String>,
    /// 参考资料文件，读取后写入 `request.source_text`
    #[serde(default)]
    pub source_file: Option<PathBuf>,
    pub request: QuizRequest,
}

impl QuizJob {
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} Quiz", self.request.topic))
    }
}

/// 单个作业任务，可附带课程计划 PDF 和幻灯片
///
/// 幻灯片在课程计划生成成功时基于其文本生成，否则从主题直接生成
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentJob {
    #[serde(default)]
    pub source_file: Option<PathBuf>,
    /// 作业子主题，缺省为主题本身
    #[serde(default)]
    pub subtopic: Option<String>,
    #[serde(default)]
    pub include_lesson_plan: bool,
    #[serde(default)]
    pub include_slides: bool,
    pub context: UnitContext,
}

impl AssignmentJob {
    pub fn focus_topic(&self) -> &str {
        self.subtopic
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.context.topic)
    }
}

fn default_num_assignments() -> usize {
    5
}

fn default_num_quizzes() -> usize {
    2
}

/// 整个单元任务
#[derive(Debug, Clone, Deserialize)]
pub struct UnitJob {
    #[serde(default)]
    pub source_file: Option<PathBuf>,
    #[serde(default = "default_num_assignments")]
    pub num_assignments: usize,
    #[serde(default = "default_num_quizzes")]
    pub num_quizzes: usize,
    /// 显式给出的单元序列；缺省时由模型规划
    #[serde(default)]
    pub sequence: Option<UnitSequence>,
    pub context: UnitContext,
}

/// 从磁盘加载的任务
#[derive(Debug, Clone)]
pub struct JobFile {
    pub path: PathBuf,
    pub job: Job,
}

impl JobFile {
    /// 用于日志显示的文件名
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::unit::ItemKind;

    #[test]
    fn test_parse_quiz_job() {
        let job: Job = toml::from_str(
            r#"
            kind = "quiz"

            [request]
            topic = "Photosynthesis"
            subtopic = "Light-dependent reactions"
            target_count = 15
            grade_level = "10"
            standard = "NGSS HS-LS1-5"
            "#,
        )
        .unwrap();

        match job {
            Job::Quiz(quiz) => {
                assert_eq!(quiz.title(), "Photosynthesis Quiz");
                assert_eq!(quiz.request.target_count, 15);
            }
            other => panic!("unexpected job: {other:?}"),
        }
    }

    #[test]
    fn test_parse_assignment_job() {
        let job: Job = toml::from_str(
            r#"
            kind = "assignment"
            include_slides = true

            [context]
            topic = "Fractions"
            subject = "Math"
            grade_level = "4"
            standard = "4.NF.1"
            "#,
        )
        .unwrap();

        match job {
            Job::Assignment(assignment) => {
                assert!(!assignment.include_lesson_plan);
                assert!(assignment.include_slides);
                assert_eq!(assignment.focus_topic(), "Fractions");
            }
            other => panic!("unexpected job: {other:?}"),
        }
    }

    #[test]
    fn test_parse_unit_job_with_sequence() {
        let job: Job = toml::from_str(
            r#"
            kind = "unit"

            [context]
            topic = "Biology"
            subject = "Science"
            grade_level = "9"
            standard = "NGSS HS-LS1-1"

            [[sequence]]
            type = "Assignment"
            title = "Intro to Cells"
            focus_topic = "Cells"

            [[sequence]]
            type = "Quiz"
            title = "Cells Check"
            focus_topic = "Cells"
            "#,
        )
        .unwrap();

        match job {
            Job::Unit(unit) => {
                assert_eq!(unit.num_assignments, 5);
                let sequence = unit.sequence.unwrap();
                assert_eq!(sequence.len(), 2);
                assert_eq!(sequence[1].kind, ItemKind::Quiz);
                assert_eq!(unit.context.strategy, "None / Standard");
            }
            other => panic!("unexpected job: {other:?}"),
        }
    }
}
