mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use canvas_content_creator::error::FileError;
use canvas_content_creator::infrastructure::read_entries;
use canvas_content_creator::models::{Job, JobFile};
use canvas_content_creator::orchestrator::{process_job, JobStatus, ProcessingStats};
use canvas_content_creator::{App, Config};
use common::RoutingGenerator;

/// 每个测试使用独立的临时目录
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("canvas_content_creator_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("jobs")).unwrap();
    dir
}

fn config_for(dir: &Path) -> Config {
    Config {
        jobs_folder: dir.join("jobs").to_string_lossy().to_string(),
        output_folder: dir.join("output").to_string_lossy().to_string(),
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_run_processes_quiz_and_unit_jobs() {
    let dir = scratch_dir("run");
    let source = dir.join("notes.txt");
    std::fs::write(&source, "Chloroplasts capture light energy.").unwrap();

    std::fs::write(
        dir.join("jobs/a_quiz.toml"),
        format!(
            r#"
kind = "quiz"
source_file = "{}"

[request]
topic = "Photosynthesis"
target_count = 12
grade_level = "10"
standard = "HS-LS1-5"
"#,
            source.display()
        ),
    )
    .unwrap();

    std::fs::write(
        dir.join("jobs/b_unit.toml"),
        r#"
kind = "unit"
num_assignments = 1
num_quizzes = 1

[context]
topic = "Cells"
grade_level = "7"
standard = "MS-LS1-1"
tool = "auto"
"#,
    )
    .unwrap();

    std::fs::write(
        dir.join("jobs/c_missing_source.toml"),
        r#"
kind = "quiz"
source_file = "/nonexistent/notes.txt"

[request]
topic = "Osmosis"
target_count = 5
grade_level = "9"
standard = "HS-LS1-3"
"#,
    )
    .unwrap();

    // 无法解析的文件在加载时跳过，不计入统计
    std::fs::write(dir.join("jobs/d_broken.toml"), "kind = ").unwrap();

    let generator = Arc::new(RoutingGenerator::new());
    let app = App::with_generator(config_for(&dir), generator.clone());
    let stats = app.run().await.unwrap();

    assert_eq!(
        stats,
        ProcessingStats {
            success: 2,
            partial: 0,
            failed: 1,
            total: 3,
        }
    );

    let quiz = std::fs::read(dir.join("output/Photosynthesis_Quiz.zip")).unwrap();
    let quiz_entries = read_entries(&quiz).unwrap();
    let quiz_xml = String::from_utf8(quiz_entries[1].1.clone()).unwrap();
    assert!(quiz_xml.contains(r#"title="Photosynthesis Quiz""#));
    assert_eq!(quiz_xml.matches("<item ").count(), 12);

    // 参考资料进入测验提示词
    assert_eq!(
        generator
            .prompts_containing("Chloroplasts capture light energy.")
            .len(),
        2
    );

    let unit = std::fs::read(dir.join("output/Unit_Cells.zip")).unwrap();
    let names: Vec<String> = read_entries(&unit)
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        [
            "01_Assignment_Intro_to_Cells.html",
            "01_LessonPlan_Intro_to_Cells.pdf",
            "01_Slides_Intro_to_Cells.pptx",
            "02_Quiz_Cell_Theory_Check.zip",
        ]
    );

    // 推荐的工具嵌入作业页面提示词
    assert_eq!(generator.prompts_containing("absolute best match").len(), 1);
    assert_eq!(
        generator
            .prompts_containing("https://www.desmos.com/calculator")
            .len(),
        1
    );

    assert!(!dir.join("output/Osmosis_Quiz.zip").exists());
}

fn job_file(name: &str, toml_text: &str) -> JobFile {
    let job: Job = toml::from_str(toml_text).unwrap();
    JobFile {
        path: PathBuf::from(name),
        job,
    }
}

const ASSIGNMENT_JOB: &str = r#"
kind = "assignment"
subtopic = "Cell Theory"
include_lesson_plan = true
include_slides = true

[context]
topic = "Cells"
grade_level = "7"
standard = "MS-LS1-1"
strategy = "Jigsaw"
"#;

#[tokio::test]
async fn test_assignment_job_writes_all_three_files() {
    let dir = scratch_dir("assignment");
    let generator = Arc::new(RoutingGenerator::new());

    let report = process_job(&job_file("a.toml", ASSIGNMENT_JOB), generator.clone(), &config_for(&dir))
        .await
        .unwrap();

    assert_eq!(report.status, JobStatus::Complete);
    assert_eq!(report.output_path, dir.join("output/Cells_Assignment.html"));
    assert_eq!(
        std::fs::read_to_string(&report.output_path).unwrap(),
        "<h1>Assignment</h1>"
    );
    assert!(std::fs::read(dir.join("output/Cells_LessonPlan.pdf"))
        .unwrap()
        .starts_with(b"%PDF"));
    let deck = read_entries(&std::fs::read(dir.join("output/Cells_Slides.pptx")).unwrap()).unwrap();
    assert!(deck.iter().any(|(name, _)| name == "ppt/presentation.xml"));

    // 作业提示词带子主题；幻灯片基于课程计划文本
    assert_eq!(generator.prompts_containing("(Subtopic: Cell Theory)").len(), 1);
    let chained = generator.prompts_containing("NO TEXT OVERLAP RULE");
    assert_eq!(chained.len(), 1);
    assert!(chained[0].contains("Observe onion cells."));
}

#[tokio::test]
async fn test_assignment_job_without_lesson_plan_is_partial() {
    let dir = scratch_dir("assignment_partial");
    let generator = Arc::new(RoutingGenerator::with_broken_lesson_plan());

    let report = process_job(&job_file("a.toml", ASSIGNMENT_JOB), generator.clone(), &config_for(&dir))
        .await
        .unwrap();

    assert_eq!(report.status, JobStatus::Partial);
    assert!(report.output_path.exists());
    assert!(!dir.join("output/Cells_LessonPlan.pdf").exists());
    assert!(dir.join("output/Cells_Slides.pptx").exists());
    assert!(generator.prompts_containing("NO TEXT OVERLAP RULE").is_empty());
    assert_eq!(generator.prompts_containing("Create a 7-slide presentation outline").len(), 1);
}

#[tokio::test]
async fn test_assignment_only_job_skips_optional_files() {
    let dir = scratch_dir("assignment_only");
    let generator = Arc::new(RoutingGenerator::new());
    let job = job_file(
        "a.toml",
        r#"
kind = "assignment"

[context]
topic = "Fractions"
grade_level = "4"
standard = "4.NF.1"
"#,
    );

    let report = process_job(&job, generator.clone(), &config_for(&dir)).await.unwrap();

    assert_eq!(report.status, JobStatus::Complete);
    assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    assert_eq!(generator.prompts_containing("(Subtopic: Fractions)").len(), 1);
    assert!(!dir.join("output/Fractions_LessonPlan.pdf").exists());
    assert!(!dir.join("output/Fractions_Slides.pptx").exists());
}

#[tokio::test]
async fn test_failed_tool_pick_continues_without_tool() {
    let dir = scratch_dir("tool_pick");
    let generator = Arc::new(RoutingGenerator::with_failing_tool_pick());
    let job = job_file(
        "u.toml",
        r#"
kind = "unit"

[context]
topic = "Cells"
grade_level = "7"
standard = "MS-LS1-1"
tool = "auto"

[[sequence]]
type = "Assignment"
title = "Intro to Cells"
focus_topic = "Cell Theory"
"#,
    );

    let report = process_job(&job, generator.clone(), &config_for(&dir)).await.unwrap();

    assert_eq!(report.status, JobStatus::Complete);
    assert_eq!(report.output_path, dir.join("output/Unit_Cells.zip"));
    assert_eq!(generator.prompts_containing("absolute best match").len(), 1);
    assert_eq!(generator.prompts_containing("Embeds: None.").len(), 1);
}

#[tokio::test]
async fn test_unwritable_output_reports_the_path() {
    let dir = scratch_dir("unwritable");
    // 目标文件名被目录占用
    std::fs::create_dir_all(dir.join("output/Cells_Assignment.html")).unwrap();

    let err = process_job(
        &job_file("a.toml", ASSIGNMENT_JOB),
        Arc::new(RoutingGenerator::new()),
        &config_for(&dir),
    )
    .await
    .unwrap_err();

    match err.downcast_ref::<FileError>() {
        Some(FileError::WriteFailed { path, .. }) => assert!(path.ends_with("Cells_Assignment.html")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_run_with_empty_jobs_folder() {
    let dir = scratch_dir("empty");
    let app = App::with_generator(config_for(&dir), Arc::new(RoutingGenerator::new()));

    let stats = app.run().await.unwrap();
    assert_eq!(stats, ProcessingStats::default());
    assert!(!dir.join("output").exists());
}

#[tokio::test]
async fn test_run_fails_when_jobs_folder_is_missing() {
    let dir = scratch_dir("missing");
    let mut config = config_for(&dir);
    config.jobs_folder = dir.join("nope").to_string_lossy().to_string();

    let app = App::with_generator(config, Arc::new(RoutingGenerator::new()));
    assert!(app.run().await.is_err());
}

/// 需要真实的 LLM_API_KEY，手动运行: cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_live_connection() {
    let config = Config::from_env();
    let generator = canvas_content_creator::OpenAiGenerator::new(&config);
    generator.check_connection().await.unwrap();
}
