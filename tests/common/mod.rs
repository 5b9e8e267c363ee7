#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use canvas_content_creator::error::{AppError, AppResult};
use canvas_content_creator::TextGenerator;
use serde_json::json;

/// 按提示词内容分派固定回复的生成器，记录所有收到的提示词
#[derive(Default)]
pub struct RoutingGenerator {
    pub prompts: Mutex<Vec<String>>,
    next_question: Mutex<usize>,
    /// 为 true 时课程计划返回无法解析的文本
    broken_lesson_plan: bool,
    /// 为 true 时工具推荐调用直接失败
    failing_tool_pick: bool,
}

impl RoutingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_broken_lesson_plan() -> Self {
        Self {
            broken_lesson_plan: true,
            ..Self::default()
        }
    }

    pub fn with_failing_tool_pick() -> Self {
        Self {
            failing_tool_pick: true,
            ..Self::default()
        }
    }

    pub fn prompts_containing(&self, needle: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(needle))
            .cloned()
            .collect()
    }

    /// 一批 10 道题，题号全局递增
    fn question_batch(&self) -> String {
        let mut next = self.next_question.lock().unwrap();
        let questions: Vec<_> = (*next..*next + 10)
            .map(|i| {
                json!({
                    "question_text": format!("<p>Q{i}: what is \\(x^{i}\\)?</p>"),
                    "options": ["A", "B", "C", "D"],
                    "correct_answer_index": i % 4,
                })
            })
            .collect();
        *next += 10;
        format!("```json\n{}\n```", json!({ "questions": questions }))
    }
}

#[async_trait]
impl TextGenerator for RoutingGenerator {
    async fn generate(&self, prompt: &str, _want_json: bool) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = if prompt.contains("absolute best match") {
            if self.failing_tool_pick {
                return Err(AppError::generation_failed("tool", "timeout"));
            }
            "\"Desmos: Graphing Calculator\"".to_string()
        } else if prompt.contains("logical unit sequence") {
            json!([
                { "type": "Assignment", "title": "Intro to Cells", "focus_topic": "Cell Theory" },
                { "type": "Quiz", "title": "Cell Theory Check", "focus_topic": "Cell Theory" },
            ])
            .to_string()
        } else if prompt.contains("Create a Quiz") {
            self.question_batch()
        } else if prompt.contains("5E Lesson Plan") {
            if self.broken_lesson_plan {
                "I'm sorry, I can't do that.".to_string()
            } else {
                json!({
                    "metadata": {
                        "duration": "50 mins",
                        "materials": ["Microscopes", "Onion slides"],
                        "vocabulary": ["cell", "membrane"],
                        "differentiation": { "sped": ["Word bank"], "ml": ["Visual glossary"] }
                    },
                    "sections": [
                        { "phase": "Engage", "time": "5 mins", "activity": "Zoom into a leaf photo." },
                        { "phase": "Explore", "time": "15 mins", "activity": "Observe onion cells." }
                    ]
                })
                .to_string()
            }
        } else if prompt.contains("7-slide") {
            json!({
                "slides": [
                    {
                        "title": "What Are We Made Of?",
                        "bullet_points": ["Cells", "Tissues", "Organs", "Systems", "Organisms", "Ecosystems", "Biosphere"],
                        "speaker_notes": "Ask: what is the smallest living thing?",
                        "image_ai_prompt": "A microscope over a leaf"
                    },
                    { "title": "Practice Activity", "bullet_points": ["Sketch a cell"], "speaker_notes": "Give 10 minutes." }
                ]
            })
            .to_string()
        } else {
            "```html\n<h1>Assignment</h1>\n```".to_string()
        };

        Ok(reply)
    }
}
