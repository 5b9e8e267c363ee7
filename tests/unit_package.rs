mod common;

use std::sync::Arc;

use canvas_content_creator::infrastructure::{read_entries, ProgressTrail};
use canvas_content_creator::services::{plan_unit_sequence, BatchPolicy};
use canvas_content_creator::workflow::UnitStage;
use canvas_content_creator::{build_unit_package, LlmStageRunner, UnitContext, UnitSequenceItem};
use common::RoutingGenerator;

fn ctx() -> UnitContext {
    toml::from_str(
        r#"
        topic = "Cells"
        subject = "Science"
        grade_level = "7"
        standard = "MS-LS1-1"
        strategy = "Jigsaw"
        "#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_full_unit_package_with_llm_runner() {
    let generator = Arc::new(RoutingGenerator::new());
    let runner = LlmStageRunner::new(generator.clone(), BatchPolicy::default(), 10);
    let sequence = vec![
        UnitSequenceItem::assignment("Intro to Cells", "Cell Theory"),
        UnitSequenceItem::assignment("Inside the Cell", "Organelles"),
        UnitSequenceItem::quiz("Cells Check", "Cells"),
    ];
    let mut trail = ProgressTrail::new();

    let package = build_unit_package(&sequence, &ctx(), &runner, &mut trail)
        .await
        .unwrap();

    assert!(package.is_complete(), "failures: {:?}", package.failures);
    assert_eq!(
        package.file_names,
        [
            "01_Assignment_Intro_to_Cells.html",
            "01_LessonPlan_Intro_to_Cells.pdf",
            "01_Slides_Intro_to_Cells.pptx",
            "02_Assignment_Inside_the_Cell.html",
            "02_LessonPlan_Inside_the_Cell.pdf",
            "02_Slides_Inside_the_Cell.pptx",
            "03_Quiz_Cells_Check.zip",
        ]
    );
    assert_eq!(trail.entries().len(), 7);

    let entries = read_entries(&package.bytes).unwrap();
    assert_eq!(entries[0].1, b"<h1>Assignment</h1>");
    assert!(entries[1].1.starts_with(b"%PDF"));

    // 7 个要点的幻灯片被拆成两张
    let deck = read_entries(&entries[2].1).unwrap();
    let slide_count = deck
        .iter()
        .filter(|(n, _)| n.starts_with("ppt/slides/slide"))
        .count();
    assert_eq!(slide_count, 3);

    let quiz = read_entries(&entries[6].1).unwrap();
    let quiz_xml = String::from_utf8(quiz[1].1.clone()).unwrap();
    assert_eq!(quiz_xml.matches("<item ").count(), 10);
    assert!(quiz_xml.contains(r#"title="Cells Check""#));

    // 测验提示词带上两次作业的子主题
    let quiz_prompts = generator.prompts_containing("Create a Quiz");
    assert_eq!(quiz_prompts.len(), 1);
    assert!(quiz_prompts[0].contains("covered recently: Cell Theory, Organelles"));

    // 课程计划与幻灯片使用 "{topic}: {focus}"，幻灯片串联课程计划
    assert_eq!(generator.prompts_containing("\"Cells: Organelles\"").len(), 2);
    let chained = generator.prompts_containing("NO TEXT OVERLAP RULE");
    assert_eq!(chained.len(), 2);
    assert!(chained[0].contains("Observe onion cells."));
    assert!(chained[0].contains("Jigsaw Activity Instructions"));
}

#[tokio::test]
async fn test_broken_lesson_plan_falls_back_to_standalone_slides() {
    let generator = Arc::new(RoutingGenerator::with_broken_lesson_plan());
    let runner = LlmStageRunner::new(generator.clone(), BatchPolicy::default(), 10);
    let sequence = vec![UnitSequenceItem::assignment("Intro to Cells", "Cell Theory")];

    let package = build_unit_package(&sequence, &ctx(), &runner, &mut ProgressTrail::new())
        .await
        .unwrap();

    assert_eq!(package.failures.len(), 1);
    assert_eq!(package.failures[0].stage, UnitStage::LessonPlan);
    assert_eq!(
        package.file_names,
        ["01_Assignment_Intro_to_Cells.html", "01_Slides_Intro_to_Cells.pptx"]
    );
    assert!(generator.prompts_containing("NO TEXT OVERLAP RULE").is_empty());
    assert_eq!(generator.prompts_containing("Create a 7-slide presentation outline").len(), 1);
}

#[tokio::test]
async fn test_planned_sequence_drives_package() {
    let generator = Arc::new(RoutingGenerator::new());
    let sequence = plan_unit_sequence(generator.as_ref(), &ctx(), 1, 1).await.unwrap();
    assert_eq!(
        sequence,
        vec![
            UnitSequenceItem::assignment("Intro to Cells", "Cell Theory"),
            UnitSequenceItem::quiz("Cell Theory Check", "Cell Theory"),
        ]
    );

    let runner = LlmStageRunner::new(generator.clone(), BatchPolicy::default(), 5);
    let package = build_unit_package(&sequence, &ctx(), &runner, &mut ProgressTrail::new())
        .await
        .unwrap();
    assert_eq!(package.total_steps, 4);
    assert_eq!(package.file_names.last().unwrap(), "02_Quiz_Cell_Theory_Check.zip");
}
