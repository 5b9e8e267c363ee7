//! QTI 1.2 测验包 - 业务能力层
//!
//! 生成可导入 Canvas 的 zip：`imsmanifest.xml` + `quiz.xml`。
//! 标识符全部由题号推导，压缩包使用固定时间戳，同样的输入得到同样的字节。

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{AppResult, SerializationError};
use crate::infrastructure::ArchiveWriter;
use crate::models::quiz::{Question, Quiz};

pub const MANIFEST_FILE: &str = "imsmanifest.xml";
pub const QUIZ_FILE: &str = "quiz.xml";

const QTI_NAMESPACE: &str = "http://www.imsglobal.org/xsd/ims_qtiasiv1p2";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const QTI_SCHEMA_LOCATION: &str =
    "http://www.imsglobal.org/xsd/ims_qtiasiv1p2 http://www.imsglobal.org/xsd/ims_qtiasiv1p2.xsd";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="man00001" xmlns="http://www.imsglobal.org/xsd/imscp_v1p1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.imsglobal.org/xsd/imscp_v1p1 http://www.imsglobal.org/xsd/imscp_v1p1.xsd">
  <metadata>
    <schema>IMS Content</schema>
    <schemaversion>1.1.3</schemaversion>
  </metadata>
  <organizations/>
  <resources>
    <resource identifier="res00001" type="imsqti_xmlv1p2">
      <file href="quiz.xml"/>
    </resource>
  </resources>
</manifest>"#;

/// 清单文件，内容固定
pub fn build_manifest() -> Vec<u8> {
    MANIFEST.as_bytes().to_vec()
}

fn xml_error(err: impl std::fmt::Display) -> SerializationError {
    SerializationError::Xml(err.to_string())
}

/// 对 quick-xml 写入器的简单封装
struct QtiWriter {
    inner: Writer<Vec<u8>>,
}

impl QtiWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), SerializationError> {
        self.inner.write_event(event).map_err(xml_error)
    }

    fn element(name: &str, attrs: &[(&str, &str)]) -> BytesStart<'static> {
        let mut start = BytesStart::new(name.to_string());
        for &attr in attrs {
            start.push_attribute(attr);
        }
        start
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializationError> {
        self.event(Event::Start(Self::element(name, attrs)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializationError> {
        self.event(Event::Empty(Self::element(name, attrs)))
    }

    fn end(&mut self, name: &str) -> Result<(), SerializationError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), SerializationError> {
        self.start(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// 写入 CDATA；文本中的 `]]>` 拆到相邻的两个 CDATA 段中
    fn cdata(&mut self, text: &str) -> Result<(), SerializationError> {
        let mut rest = text;
        while let Some(pos) = rest.find("]]>") {
            self.event(Event::CData(BytesCData::new(&rest[..pos + 2])))?;
            rest = &rest[pos + 2..];
        }
        self.event(Event::CData(BytesCData::new(rest)))
    }

    /// `<material><mattext texttype="text/html"><![CDATA[...]]></mattext></material>`
    fn html_material(&mut self, html: &str) -> Result<(), SerializationError> {
        self.start("material", &[])?;
        self.start("mattext", &[("texttype", "text/html")])?;
        self.cdata(html)?;
        self.end("mattext")?;
        self.end("material")
    }

    fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

fn write_item(w: &mut QtiWriter, number: usize, question: &Question) -> Result<(), SerializationError> {
    let ident = format!("q{number}");
    let title = format!("Question {number}");
    let response_ident = format!("response_{number}");

    w.start("item", &[("ident", ident.as_str()), ("title", title.as_str())])?;

    w.start("presentation", &[])?;
    w.html_material(&question.question_text)?;
    w.start(
        "response_lid",
        &[("ident", response_ident.as_str()), ("rcardinality", "Single")],
    )?;
    w.start("render_choice", &[])?;
    for (j, option) in question.options.iter().enumerate() {
        let label_ident = option_ident(number, j);
        w.start("response_label", &[("ident", label_ident.as_str())])?;
        w.html_material(option)?;
        w.end("response_label")?;
    }
    w.end("render_choice")?;
    w.end("response_lid")?;
    w.end("presentation")?;

    w.start("resprocessing", &[])?;
    w.start("outcomes", &[])?;
    w.empty(
        "decvar",
        &[("defaultval", "0"), ("varname", "SCORE"), ("vartype", "Integer")],
    )?;
    w.end("outcomes")?;
    w.start("respcondition", &[("continue", "No")])?;
    w.start("conditionvar", &[])?;
    w.text_element(
        "varequal",
        &[("respident", response_ident.as_str())],
        &option_ident(number, question.correct_answer_index),
    )?;
    w.end("conditionvar")?;
    w.text_element("setvar", &[("action", "Set"), ("varname", "SCORE")], "1")?;
    w.end("respcondition")?;
    w.end("resprocessing")?;

    w.end("item")
}

/// 选项标识：题号从 1 开始，选项下标从 0 开始
fn option_ident(number: usize, option_index: usize) -> String {
    format!("opt_{number}_{option_index}")
}

/// 生成 quiz.xml
pub fn build_quiz_xml(questions: &[Question], title: &str) -> Result<Vec<u8>, SerializationError> {
    let mut w = QtiWriter::new();

    w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.start(
        "questestinterop",
        &[
            ("xmlns", QTI_NAMESPACE),
            ("xmlns:xsi", XSI_NAMESPACE),
            ("xsi:schemaLocation", QTI_SCHEMA_LOCATION),
        ],
    )?;
    w.start("assessment", &[("ident", "quiz001"), ("title", title)])?;
    w.start("section", &[("ident", "sec001"), ("title", "Main Section")])?;

    for (index, question) in questions.iter().enumerate() {
        write_item(&mut w, index + 1, question)?;
    }

    w.end("section")?;
    w.end("assessment")?;
    w.end("questestinterop")?;

    Ok(w.into_inner())
}

/// 把测验序列化为 QTI zip 包
///
/// 先校验全部题目，任何一题不满足约束都不会产生输出
pub fn serialize_qti(quiz: &Quiz, title: &str) -> AppResult<Vec<u8>> {
    for (index, question) in quiz.questions.iter().enumerate() {
        question.validate(index + 1)?;
    }

    let quiz_xml = build_quiz_xml(&quiz.questions, title)?;

    let mut archive = ArchiveWriter::new();
    archive.add_file(MANIFEST_FILE, &build_manifest())?;
    archive.add_file(QUIZ_FILE, &quiz_xml)?;
    archive.finish()
}
