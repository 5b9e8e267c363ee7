//! 课程计划 PDF（Letter，单页）
//!
//! 先把课程计划排成一组文本行（纯函数，便于测试），再交给 printpdf 输出。
//! 内置字体只覆盖 ASCII，其余字符替换为 `?`。

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, Rgb};

use crate::error::{AppError, AppResult};
use crate::models::lesson::{LessonPlan, LessonSection};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;

const STANDARD_LIMIT: usize = 120;
const ACTIVITY_LIMIT: usize = 400;
const DIFFERENTIATION_LIMIT: usize = 3;

const SIDEBAR_X: f32 = 5.0;
const SIDEBAR_BOTTOM: f32 = 250.0;
const SIDEBAR_WRAP: usize = 36;
const MAIN_X: f32 = 74.0;
const MAIN_BOTTOM: f32 = 260.0;
const MAIN_WRAP: usize = 70;

const HEADER_COLOR: (u8, u8, u8) = (30, 36, 58);
const MUTED_COLOR: (u8, u8, u8) = (110, 110, 110);
const ACCENT_COLOR: (u8, u8, u8) = (13, 148, 136);
const TEXT_COLOR: (u8, u8, u8) = (0, 0, 0);

/// 页眉信息
#[derive(Debug, Clone, Copy)]
pub struct LessonHeader<'a> {
    pub topic: &'a str,
    pub grade: &'a str,
    pub standard: &'a str,
    pub strategy: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// 排好版的一行文字，`top` 为距页面顶部的毫米数
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub top: f32,
    pub size: f32,
    pub style: FontStyle,
    pub color: (u8, u8, u8),
    pub text: String,
}

/// 超过 `limit` 个字符时截断为 `limit - 3` 个字符加 "..."
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit.saturating_sub(3)).collect();
        head + "..."
    } else {
        text.to_string()
    }
}

/// 把内置字体无法显示的字符换成 ASCII
pub fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2022}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\t' => out.push(' '),
            '\n' => out.push('\n'),
            '\r' => {}
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// 按字符数贪心折行，超长单词硬切
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: String = word.to_string();
            while word.chars().count() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(width).collect();
                word = word.chars().skip(width).collect();
                lines.push(head);
            }
            if word.is_empty() {
                continue;
            }
            let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

struct Layout {
    lines: Vec<TextLine>,
}

impl Layout {
    fn push(&mut self, x: f32, top: f32, size: f32, style: FontStyle, color: (u8, u8, u8), text: &str) {
        self.lines.push(TextLine {
            x,
            top,
            size,
            style,
            color,
            text: pdf_safe(text),
        });
    }

    /// 折行输出，返回下一行的位置；超过 `bottom` 的部分丢弃
    fn paragraph(&mut self, x: f32, mut top: f32, size: f32, wrap: usize, bottom: f32, text: &str) -> f32 {
        let leading = size * 0.45;
        for line in wrap_text(&pdf_safe(text), wrap) {
            if top > bottom {
                break;
            }
            self.push(x, top, size, FontStyle::Regular, TEXT_COLOR, &line);
            top += leading;
        }
        top
    }

    fn sidebar_list(&mut self, top: f32, title: &str, items: &[String]) -> f32 {
        if top > SIDEBAR_BOTTOM {
            return top;
        }
        self.push(SIDEBAR_X, top, 9.0, FontStyle::Bold, HEADER_COLOR, &title.to_uppercase());
        let mut top = top + 5.0;
        for item in items {
            top = self.paragraph(SIDEBAR_X, top, 8.0, SIDEBAR_WRAP, SIDEBAR_BOTTOM, &format!("- {item}"));
        }
        top + 6.0
    }
}

/// 排版课程计划
pub fn layout_lesson_plan(plan: &LessonPlan, header: &LessonHeader<'_>) -> Vec<TextLine> {
    let mut layout = Layout { lines: Vec::new() };

    // 页眉
    layout.push(10.0, 16.0, 16.0, FontStyle::Bold, HEADER_COLOR, &format!("Lesson Plan: {}", header.topic));
    layout.push(140.0, 16.0, 10.0, FontStyle::Italic, MUTED_COLOR, &format!("Strategy: {}", header.strategy));
    layout.push(10.0, 24.0, 10.0, FontStyle::Regular, MUTED_COLOR, &format!("Grade: {}", header.grade));
    let standard = format!("Standard: {}", truncate_chars(header.standard, STANDARD_LIMIT));
    let mut top = 29.0;
    for line in wrap_text(&pdf_safe(&standard), 100) {
        layout.push(10.0, top, 9.0, FontStyle::Regular, MUTED_COLOR, &line);
        top += 4.5;
    }

    // 左侧栏
    let metadata = &plan.metadata;
    let mut top = 45.0;
    layout.push(SIDEBAR_X, top, 9.0, FontStyle::Bold, HEADER_COLOR, "DURATION");
    top = layout.paragraph(SIDEBAR_X, top + 5.0, 8.0, SIDEBAR_WRAP, SIDEBAR_BOTTOM, &metadata.duration) + 6.0;
    top = layout.sidebar_list(top, "Materials", &metadata.materials);
    top = layout.sidebar_list(top, "Vocabulary", &metadata.vocabulary);

    let differentiation = &metadata.differentiation;
    if top <= SIDEBAR_BOTTOM && (!differentiation.sped.is_empty() || !differentiation.ml.is_empty()) {
        layout.push(SIDEBAR_X, top, 9.0, FontStyle::Bold, HEADER_COLOR, "DIFFERENTIATION");
        top += 5.0;
        for (label, items) in [("SPED:", &differentiation.sped), ("ML Support:", &differentiation.ml)] {
            if items.is_empty() || top > SIDEBAR_BOTTOM {
                continue;
            }
            layout.push(SIDEBAR_X, top, 8.0, FontStyle::Italic, TEXT_COLOR, label);
            top += 4.0;
            for item in items.iter().take(DIFFERENTIATION_LIMIT) {
                top = layout.paragraph(SIDEBAR_X, top, 8.0, SIDEBAR_WRAP, SIDEBAR_BOTTOM, &format!("- {item}"));
            }
            top += 2.0;
        }
    }

    // 主栏：5E 各阶段
    let mut top = 45.0;
    for section in &plan.sections {
        if top > MAIN_BOTTOM {
            break;
        }
        top = layout_section(&mut layout, top, section);
    }

    layout.lines
}

fn layout_section(layout: &mut Layout, top: f32, section: &LessonSection) -> f32 {
    let heading = if section.time.trim().is_empty() {
        section.phase.clone()
    } else {
        format!("{} ({})", section.phase, section.time)
    };
    layout.push(MAIN_X, top, 11.0, FontStyle::Bold, ACCENT_COLOR, &heading);

    let activity = truncate_chars(&section.activity, ACTIVITY_LIMIT);
    layout.paragraph(MAIN_X, top + 6.0, 10.0, MAIN_WRAP, MAIN_BOTTOM, &activity) + 6.0
}

fn render_error(err: impl std::fmt::Display) -> AppError {
    AppError::Render(format!("PDF: {err}"))
}

/// 生成课程计划 PDF
pub fn render_lesson_plan(plan: &LessonPlan, header: &LessonHeader<'_>) -> AppResult<Vec<u8>> {
    let title = pdf_safe(&format!("Lesson Plan: {}", header.topic));
    let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_error)?;
    let italic = doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(render_error)?;
    for line in layout_lesson_plan(plan, header) {
        let font: &IndirectFontRef = match line.style {
            FontStyle::Regular => &regular,
            FontStyle::Bold => &bold,
            FontStyle::Italic => &italic,
        };
        let (r, g, b) = line.color;
        layer.set_fill_color(Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        )));
        layer.use_text(
            line.text,
            line.size,
            Mm(line.x),
            Mm(PAGE_HEIGHT - line.top),
            font,
        );
    }

    doc.save_to_bytes().map_err(render_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lesson::{Differentiation, LessonMetadata};

    fn header() -> LessonHeader<'static> {
        LessonHeader {
            topic: "Biology: Cells",
            grade: "9",
            standard: "NGSS HS-LS1-1",
            strategy: "Station Rotation",
        }
    }

    fn plan() -> LessonPlan {
        LessonPlan {
            metadata: LessonMetadata {
                duration: "55 mins".to_string(),
                materials: vec!["Microscopes".to_string(), "Onion slides".to_string()],
                vocabulary: vec!["Organelle".to_string()],
                differentiation: Differentiation {
                    sped: (1..=5).map(|i| format!("sped {i}")).collect(),
                    ml: vec!["Sentence frames".to_string()],
                },
            },
            sections: ["Engage", "Explore", "Explain", "Elaborate", "Evaluate"]
                .iter()
                .map(|phase| LessonSection {
                    phase: phase.to_string(),
                    time: "10 mins".to_string(),
                    activity: format!("{phase} activity"),
                })
                .collect(),
        }
    }

    fn texts(lines: &[TextLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_truncate_chars() {
        let long = "s".repeat(130);
        let cut = truncate_chars(&long, 120);
        assert_eq!(cut.chars().count(), 120);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_chars("short", 120), "short");
    }

    #[test]
    fn test_pdf_safe() {
        assert_eq!(pdf_safe("“Cells” – café…"), "\"Cells\" - caf?...");
        assert_eq!(pdf_safe("光合作用"), "????");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("the quick brown fox", 9), ["the quick", "brown fox"]);
        assert_eq!(wrap_text("abcdefghij", 4), ["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), ["a", "b"]);
        assert!(wrap_text("", 10).is_empty());
    }

    #[test]
    fn test_layout_contains_every_part() {
        let lines = layout_lesson_plan(&plan(), &header());
        let texts = texts(&lines);

        assert_eq!(texts[0], "Lesson Plan: Biology: Cells");
        assert!(texts.contains(&"Strategy: Station Rotation"));
        assert!(texts.contains(&"Standard: NGSS HS-LS1-1"));
        assert!(texts.contains(&"MATERIALS"));
        assert!(texts.contains(&"- Onion slides"));
        assert!(texts.contains(&"Evaluate (10 mins)"));
        assert!(texts.contains(&"Evaluate activity"));
        assert!(texts.contains(&"- Sentence frames"));
    }

    #[test]
    fn test_differentiation_limited_to_three() {
        let lines = layout_lesson_plan(&plan(), &header());
        let texts = texts(&lines);
        assert!(texts.contains(&"- sped 3"));
        assert!(!texts.contains(&"- sped 4"));
    }

    #[test]
    fn test_long_standard_and_activity_are_truncated() {
        let standard = "x".repeat(200);
        let mut header = header();
        header.standard = &standard;

        let mut plan = plan();
        plan.sections.truncate(1);
        plan.sections[0].activity = "word ".repeat(200);

        let lines = layout_lesson_plan(&plan, &header);
        let standard_text: String = lines
            .iter()
            .filter(|l| l.top < 40.0 && l.text.contains('x'))
            .map(|l| l.text.as_str())
            .collect();
        assert!(standard_text.ends_with("..."));
        assert_eq!(standard_text.matches('x').count(), 117);

        let activity: usize = lines
            .iter()
            .filter(|l| l.x == MAIN_X && l.size == 10.0)
            .map(|l| l.text.chars().count())
            .sum();
        assert!(activity <= ACTIVITY_LIMIT);
    }

    #[test]
    fn test_lines_stay_on_page() {
        let mut plan = plan();
        plan.sections = (0..40)
            .map(|i| LessonSection {
                phase: format!("Phase {i}"),
                time: String::new(),
                activity: "long ".repeat(60),
            })
            .collect();
        plan.metadata.materials = (0..80).map(|i| format!("material {i}")).collect();

        for line in layout_lesson_plan(&plan, &header()) {
            assert!(line.top <= MAIN_BOTTOM + 12.0, "line off page: {line:?}");
        }
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = render_lesson_plan(&plan(), &header()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
