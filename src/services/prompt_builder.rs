//! 提示词构建 - 业务能力层
//!
//! 纯函数：请求进，提示词文本出。不读取任何全局状态。

use crate::models::request::{has_strategy, Accommodations, QuizRequest, UnitContext};
use crate::models::subject::Subject;
use crate::services::tool_catalog;

/// 参考资料的最大字符数
pub const SOURCE_TEXT_LIMIT: usize = 10_000;

const SOURCE_TRUNCATED_MARKER: &str = "\n\n[Text truncated for prompt limit...]";

/// 参考资料超长时截断并追加提示
pub fn truncate_source(text: &str) -> String {
    if text.chars().count() > SOURCE_TEXT_LIMIT {
        let head: String = text.chars().take(SOURCE_TEXT_LIMIT).collect();
        head + SOURCE_TRUNCATED_MARKER
    } else {
        text.to_string()
    }
}

/// 学生画像中的差异化要求，`extension` 描述资优学生的拓展内容
fn profile_context(accommodations: &Accommodations, extension: &str) -> String {
    let mut parts = Vec::new();
    if accommodations.sped {
        parts.push("Include specific accommodations for Special Education (SPED) students.".to_string());
    }
    if accommodations.gifted {
        parts.push(format!(
            "Include {extension} and advanced challenges for Gifted/Advanced learners."
        ));
    }
    if accommodations.multilingual {
        parts.push(format!(
            "Include language supports for Multilingual Learners (primary language: {}).",
            accommodations.language
        ));
    }
    parts.join(" ")
}

fn source_section(number: usize, source_text: Option<&str>) -> String {
    match source_text.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => format!(
            "\n{number}. SOURCE MATERIAL\nUse the following text as the primary source for content generation: \"\"\" {} \"\"\"\n",
            truncate_source(text)
        ),
        None => String::new(),
    }
}

/// 单批次测验题目的提示词
///
/// `count` 是本批次请求的题目数，与请求的目标数量无关
pub fn quiz_prompt(request: &QuizRequest, count: usize) -> String {
    let accommodations = &request.accommodations;
    let profile = profile_context(accommodations, "extension questions, critical thinking prompts");

    let context_instruction = if request.context_topics.is_empty() {
        String::new()
    } else {
        format!(
            "CRITICAL: Create a distinct Quiz assessing the following topics covered recently: {}. Do not re-test older topics.",
            request.context_topics.join(", ")
        )
    };

    let mut constraints = String::new();
    if accommodations.sped {
        constraints.push_str("Modify reading level to be accessible. Chunk text into smaller sections. ");
    }
    if accommodations.gifted {
        constraints.push_str("Include bonus/challenge questions that require higher-order thinking. ");
    }
    if accommodations.multilingual {
        constraints.push_str(&format!(
            "Provide key vocabulary definitions translated into {}. ",
            accommodations.language
        ));
    }

    let subtopic = if request.subtopic.trim().is_empty() {
        request.topic.as_str()
    } else {
        request.subtopic.as_str()
    };

    let due = request
        .due
        .as_deref()
        .map(|d| format!(" METADATA: Include the Due Date ({d}) in the Quiz Description text."))
        .unwrap_or_default();

    format!(
        r#"
1. ROLE
Act as an expert Curriculum Designer for Grade {grade}.

2. CONTEXT
I am teaching a unit on "{topic}" (Subtopic: {subtopic}). Standard: {standard}. Student Profile: Mixed ability. {profile}

3. TASK
Create a Quiz that aligns perfectly with the standard above. {context_instruction} {constraints}Generate {count} questions.

XML CONFIGURATION: Set the point value for EVERY question to {points}. QUESTION TYPES: Generate a mix of ONLY the following types: {types}. Every question must still be answerable by choosing exactly one option.{due}

4. FORMAT
Return the output as a JSON object matching the following schema: {{ "questions": [ {{ "question_text": "string", "options": ["string", "string", "string", "string"], "correct_answer_index": int }} ] }} correct_answer_index is 0-based.
{source}"#,
        grade = request.grade_level,
        topic = request.topic,
        standard = request.standard,
        points = request.points_per_question,
        types = request.question_types_label(),
        source = source_section(5, request.source_text.as_deref()),
    )
}

/// 学科相关的作业要求与嵌入框高度
fn assignment_subject_context(subject: Subject, tool: Option<&str>) -> (String, u32) {
    let mut context = subject.focus_context().to_string();
    let mut iframe_height = 450;

    if subject == Subject::BusinessEconomics {
        if tool.is_some_and(|t| t.contains("Desmos") || t.contains("EconGraphs")) {
            context.push_str(
                " Create scenarios that require students to shift the curves. Ask them to predict the new Equilibrium Price.",
            );
            iframe_height = 700;
        }
    }

    (context, iframe_height)
}

/// 作业 HTML 的提示词
pub fn assignment_prompt(ctx: &UnitContext, focus_topic: &str) -> String {
    let profile = profile_context(&ctx.accommodations, "extension activities");
    let tool = ctx.tool.as_deref().filter(|t| tool_catalog::tool_url(t).is_some());
    let (subject_context, iframe_height) = assignment_subject_context(ctx.subject, tool);

    let (tool_name, embed) = match tool.and_then(|t| tool_catalog::tool_url(t).map(|url| (t, url))) {
        Some((name, url)) => (
            name.to_string(),
            format!(
                r#"Embeds: Include this tool: <iframe src="{url}" width="100%" height="{iframe_height}" style="border:none;"></iframe>"#
            ),
        ),
        None => ("None".to_string(), "Embeds: None.".to_string()),
    };

    let due = ctx.due.as_deref().unwrap_or("TBD");

    let pedagogy = if ctx.has_strategy() {
        format!("\n5. PEDAGOGY & STRATEGY\nMethod: {}\n", ctx.strategy)
    } else {
        String::new()
    };

    format!(
        r#"
1. ROLE
Act as an expert Curriculum Designer for Grade {grade}.

2. CONTEXT
I am teaching a unit on "{topic}" (Subtopic: {focus_topic}). Subject: {subject}. Standard: {standard}. Student Profile: Mixed ability. {profile}

3. TASK
Create an Assignment that aligns perfectly with the standard above. {subject_context} Tools to embed: {tool_name}

In the HTML output, create a highly visible "Metadata Box" at the top using a styled div that displays: Due Date: {due} | Points: {points}.

4. FORMAT
Return the output as raw HTML code ready for Canvas LMS.

Structure: Title, Introduction, Content, Rubric/Answer Key.

Styling: Use inline CSS for a clean, modern look.

{embed}
{pedagogy}{source}"#,
        grade = ctx.grade_level,
        topic = ctx.topic,
        subject = ctx.subject,
        standard = ctx.standard,
        points = ctx.assignment_points,
        source = source_section(6, ctx.source_text.as_deref()),
    )
}

/// 单元序列规划的提示词
pub fn unit_outline_prompt(ctx: &UnitContext, num_assignments: usize, num_quizzes: usize) -> String {
    let profile = profile_context(&ctx.accommodations, "extension activities");

    format!(
        r#"
1. ROLE
Act as an expert Curriculum Designer for Grade {grade}.

2. CONTEXT
I am planning a comprehensive unit on "{topic}". Subject: {subject}. Standard: {standard}. Student Profile: Mixed ability. {profile}

3. TASK
Create a logical unit sequence mixing {num_assignments} Assignments and {num_quizzes} Quizzes. Instructional Strategy: {strategy} Instruction: Place quizzes after relevant assignments to assess learning. Instruction: Create a mixed sequence (e.g., A, A, Q, A, A, Q). Do NOT group all assignments first.

4. OUTPUT FORMAT
Return the output as a JSON list of objects. Each object must have:

"type": "Assignment" or "Quiz"

"title": string (Creative title)

"focus_topic": string (Specific subtopic covered)

Example: [ {{ "type": "Assignment", "title": "Intro to Cells", "focus_topic": "Cell Theory" }}, {{ "type": "Quiz", "title": "Cell Theory Check", "focus_topic": "Cell Theory" }} ]
{source}"#,
        grade = ctx.grade_level,
        topic = ctx.topic,
        subject = ctx.subject,
        standard = ctx.standard,
        strategy = ctx.strategy,
        source = source_section(5, ctx.source_text.as_deref()),
    )
}

/// 5E 课程计划的提示词
pub fn lesson_plan_prompt(topic: &str, standard: &str, grade: &str) -> String {
    format!(
        r#"
Create a 5E Lesson Plan for Grade {grade} on "{topic}" (Standard: {standard}).
Return a JSON object with this EXACT structure:
{{
    "metadata": {{
        "duration": "e.g., 60 minutes",
        "materials": ["item 1", "item 2"],
        "vocabulary": ["term 1", "term 2"],
        "differentiation": {{
            "sped": ["mod 1", "mod 2"],
            "ml": ["support 1", "support 2"]
        }}
    }},
    "sections": [
        {{"phase": "Engage", "time": "10 mins", "activity": "Brief description..."}},
        {{"phase": "Explore", "time": "15 mins", "activity": "Brief description..."}},
        {{"phase": "Explain", "time": "10 mins", "activity": "Brief description..."}},
        {{"phase": "Elaborate", "time": "15 mins", "activity": "Independent Practice referencing the {topic} Assignment..."}},
        {{"phase": "Evaluate", "time": "10 mins", "activity": "Assessment referencing the {topic} Quiz..."}}
    ]
}}
Keep descriptions concise (bullet points preferred).
"#
    )
}

fn strategy_slide_instruction(strategy: &str) -> String {
    if has_strategy(strategy) {
        format!(
            r#"CRITICAL: Include a specific slide titled "{strategy} Activity Instructions".
On this slide, provide student-facing directions that align exactly with the {strategy} method.
In the Speaker Notes for this slide, provide teacher-facing tips on how to facilitate the activity (e.g., "Set a timer for 10 minutes")."#
        )
    } else {
        r#"Include a slide titled "Practice Activity" with clear student instructions for a standard class activity."#
            .to_string()
    }
}

const SLIDE_OUTPUT_FORMAT: &str = r#"Return a JSON object with:
- 'slides': list of objects, where each slide has:
    - 'title': string (Clear and Action-Oriented)
    - 'bullet_points': list of strings (Max 5 points, Max 8 words each. Keywords only.)
    - 'speaker_notes': string (Detailed, scripted notes. e.g., "Ask the class: Have you ever seen...?")
    - 'image_ai_prompt': string (detailed image generation prompt)"#;

/// 幻灯片的提示词
///
/// `lesson_text` 非空时基于课程计划生成（幻灯片只放关键词，细节放进讲稿），否则从主题直接生成
pub fn slide_deck_prompt(topic: &str, grade: &str, strategy: &str, lesson_text: &str) -> String {
    let strategy_instruction = strategy_slide_instruction(strategy);

    if lesson_text.trim().is_empty() {
        return format!(
            r#"
Create a 7-slide presentation outline for Grade {grade} on "{topic}".
{strategy_instruction}

Constraint: Use MAXIMUM 5 bullet points per slide.
Constraint: Use MAXIMUM 8 words per bullet point. Be extremely concise.
Constraint: Move ALL explanations and details into the speaker_notes. The slide text must be keywords only.

{SLIDE_OUTPUT_FORMAT}
"#
        );
    }

    format!(
        r#"
### 1. ROLE
Act as an Educational Content Creator specializing in visual presentation design.

### 2. TASK
Convert the following Lesson Plan on "{topic}" into a 7-slide PowerPoint presentation for Grade {grade}.

### 3. SOURCE MATERIAL (LESSON PLAN)
"""{lesson}"""

### 4. CRITICAL: NO TEXT OVERLAP RULE
The Lesson Plan above contains DETAILED procedural descriptions and activity explanations.
Your slides must be COMPLEMENTARY, not duplicative:

- Lesson Plan = WHAT students DO (detailed activities, procedures, timing)
- Slides = VISUAL ANCHORS (key terms, diagrams to reference, keywords ONLY)
- Speaker Notes = VERBAL DELIVERY (what the teacher says, questions to ask, transitions)

DO NOT copy or paraphrase text from the lesson plan into the slides.
Instead, extract only the KEY VOCABULARY and CONCEPT NAMES as bullet points.

### 5. REQUIREMENTS
- Create 7 slides based on the lesson plan content.
- {strategy_instruction}
- Constraint: Use MAXIMUM 5 bullet points per slide.
- Constraint: Use MAXIMUM 8 words per bullet point. Be extremely concise.
- Constraint: Move ALL explanations and details into the speaker_notes. The slide text must be keywords only.
- Constraint: Bullet points should be KEYWORDS/PHRASES, not sentences from the lesson plan.

### 6. OUTPUT FORMAT
{SLIDE_OUTPUT_FORMAT}
"#,
        lesson = truncate_source(lesson_text),
    )
}

/// 互动工具推荐的提示词
pub fn tool_recommendation_prompt(topic: &str, standard: &str, options: &[&str]) -> String {
    let options = options
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
Given the topic "{topic}" and standard "{standard}", which ONE of these tools is the absolute best match?
Options: [{options}]

Return ONLY the exact option text. If nothing fits perfectly, return "None".
"#
    )
}
