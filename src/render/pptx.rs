//! 幻灯片 PPTX
//!
//! 直接拼装 PresentationML 部件再打包：一个母版、一个"标题和内容"版式、
//! 每张幻灯片一个备注页。尺寸 10 x 7.5 英寸。

use quick_xml::escape::escape;

use crate::error::AppResult;
use crate::infrastructure::ArchiveWriter;
use crate::models::lesson::Slide;

/// 单张幻灯片最多显示的要点数，超出部分拆到 "(Part 2)"
pub const MAX_BULLETS_PER_SLIDE: usize = 6;

pub const DESIGN_TIP: &str = "PRO TIP: To style this presentation instantly, click the Design tab and select Designer (or a Theme) to match your classroom style.";

const EMU_PER_INCH: i64 = 914_400;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// 拆分、补默认值之后真正要输出的幻灯片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSlide {
    pub title: String,
    pub bullets: Vec<String>,
    pub notes: String,
    pub image_prompt: String,
    pub is_first: bool,
}

/// 要点过多的幻灯片拆成两张，缺少配图提示时使用 "Image of {topic}"
pub fn expand_slides(slides: &[Slide], topic: &str) -> Vec<RenderedSlide> {
    let mut rendered = Vec::with_capacity(slides.len());

    for (index, slide) in slides.iter().enumerate() {
        let image_prompt = slide
            .image_ai_prompt
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| format!("Image of {topic}"));
        let is_first = index == 0;

        if slide.bullet_points.len() > MAX_BULLETS_PER_SLIDE {
            let (head, tail) = slide.bullet_points.split_at(MAX_BULLETS_PER_SLIDE);
            rendered.push(RenderedSlide {
                title: format!("{} (Part 1)", slide.title),
                bullets: head.to_vec(),
                notes: slide.speaker_notes.clone(),
                image_prompt: image_prompt.clone(),
                is_first,
            });
            rendered.push(RenderedSlide {
                title: format!("{} (Part 2)", slide.title),
                bullets: tail.to_vec(),
                notes: slide.speaker_notes.clone(),
                image_prompt,
                is_first: false,
            });
        } else {
            rendered.push(RenderedSlide {
                title: slide.title.clone(),
                bullets: slide.bullet_points.clone(),
                notes: slide.speaker_notes.clone(),
                image_prompt,
                is_first,
            });
        }
    }

    rendered
}

/// 生成 PPTX 字节
pub fn render_slide_deck(slides: &[Slide], topic: &str) -> AppResult<Vec<u8>> {
    let slides = expand_slides(slides, topic);
    let count = slides.len();

    let mut archive = ArchiveWriter::new();
    archive.add_file("[Content_Types].xml", content_types(count).as_bytes())?;
    archive.add_file("_rels/.rels", root_rels().as_bytes())?;
    archive.add_file("ppt/presentation.xml", presentation(count).as_bytes())?;
    archive.add_file("ppt/_rels/presentation.xml.rels", presentation_rels(count).as_bytes())?;
    archive.add_file("ppt/slideMasters/slideMaster1.xml", slide_master().as_bytes())?;
    archive.add_file(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        relationships(&[("slideLayout", "../slideLayouts/slideLayout1.xml"), ("theme", "../theme/theme1.xml")])
            .as_bytes(),
    )?;
    archive.add_file("ppt/slideLayouts/slideLayout1.xml", slide_layout().as_bytes())?;
    archive.add_file(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        relationships(&[("slideMaster", "../slideMasters/slideMaster1.xml")]).as_bytes(),
    )?;
    archive.add_file("ppt/notesMasters/notesMaster1.xml", notes_master().as_bytes())?;
    archive.add_file(
        "ppt/notesMasters/_rels/notesMaster1.xml.rels",
        relationships(&[("theme", "../theme/theme2.xml")]).as_bytes(),
    )?;
    archive.add_file("ppt/theme/theme1.xml", theme("Office Theme").as_bytes())?;
    archive.add_file("ppt/theme/theme2.xml", theme("Notes Theme").as_bytes())?;

    for (index, slide) in slides.iter().enumerate() {
        let n = index + 1;
        archive.add_file(&format!("ppt/slides/slide{n}.xml"), slide_xml(slide).as_bytes())?;
        archive.add_file(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            relationships(&[
                ("slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("notesSlide", &format!("../notesSlides/notesSlide{n}.xml")),
            ])
            .as_bytes(),
        )?;
        archive.add_file(&format!("ppt/notesSlides/notesSlide{n}.xml"), notes_xml(&slide.notes).as_bytes())?;
        archive.add_file(
            &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
            relationships(&[
                ("notesMaster", "../notesMasters/notesMaster1.xml"),
                ("slide", &format!("../slides/slide{n}.xml")),
            ])
            .as_bytes(),
        )?;
    }

    archive.finish()
}

fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

fn content_types(slide_count: usize) -> String {
    const PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";
    let mut xml = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{PML}.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{PML}.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{PML}.slideLayout+xml"/><Override PartName="/ppt/notesMasters/notesMaster1.xml" ContentType="{PML}.notesMaster+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/ppt/theme/theme2.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#
    );
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{PML}.slide+xml"/><Override PartName="/ppt/notesSlides/notesSlide{n}.xml" ContentType="{PML}.notesSlide+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_REL}"><Relationship Id="rId1" Type="{REL_TYPE}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
    )
}

/// 按顺序编号为 rId1、rId2……
fn relationships(targets: &[(&str, &str)]) -> String {
    let mut xml = format!(r#"{XML_DECL}<Relationships xmlns="{NS_REL}">"#);
    for (index, (kind, target)) in targets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{REL_TYPE}/{kind}" Target="{target}"/>"#,
            index + 1
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// rId1 母版，rId2 备注母版，rId3.. 幻灯片，最后是主题
fn presentation_rels(slide_count: usize) -> String {
    let slide_targets: Vec<String> = (1..=slide_count).map(|n| format!("slides/slide{n}.xml")).collect();
    let mut targets = vec![
        ("slideMaster", "slideMasters/slideMaster1.xml"),
        ("notesMaster", "notesMasters/notesMaster1.xml"),
    ];
    targets.extend(slide_targets.iter().map(|t| ("slide", t.as_str())));
    targets.push(("theme", "theme/theme1.xml"));
    relationships(&targets)
}

fn presentation(slide_count: usize) -> String {
    let slide_ids: String = (0..slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3))
        .collect();
    let slide_list = if slide_ids.is_empty() {
        String::new()
    } else {
        format!("<p:sldIdLst>{slide_ids}</p:sldIdLst>")
    };
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:notesMasterIdLst><p:notesMasterId r:id="rId2"/></p:notesMasterIdLst>{slide_list}<p:sldSz cx="{cx}" cy="{cy}" type="screen4x3"/><p:notesSz cx="{cy}" cy="{cx}"/></p:presentation>"#,
        cx = inches(10.0),
        cy = inches(7.5),
    )
}

const GROUP_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

const COLOR_MAP: &str = r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink""#;

fn xfrm(x: f64, y: f64, w: f64, h: f64) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        inches(x),
        inches(y),
        inches(w),
        inches(h)
    )
}

/// 占位符形状；`ph` 为 `<p:ph .../>` 的属性
fn placeholder(id: usize, name: &str, ph: &str, sp_pr: &str, body: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph}/></p:nvPr></p:nvSpPr><p:spPr>{sp_pr}</p:spPr><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#
    )
}

fn slide_master() -> String {
    let title = placeholder(2, "Title Placeholder 1", r#"type="title""#, &xfrm(0.5, 0.3, 9.0, 1.1), "<a:p/>");
    let body = placeholder(3, "Text Placeholder 2", r#"type="body" idx="1""#, &xfrm(0.5, 1.5, 9.0, 5.0), "<a:p/>");
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{GROUP_PROPS}{title}{body}</p:spTree></p:cSld><p:clrMap {COLOR_MAP}/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="3600" b="1"><a:solidFill><a:schemeClr val="tx2"/></a:solidFill><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="2400"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#
    )
}

fn slide_layout() -> String {
    let title = placeholder(2, "Title 1", r#"type="title""#, "", "<a:p/>");
    let body = placeholder(3, "Content Placeholder 2", r#"idx="1""#, "", "<a:p/>");
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="obj" preserve="1"><p:cSld name="Title and Content"><p:spTree>{GROUP_PROPS}{title}{body}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn notes_master() -> String {
    let image = format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg" idx="2"/></p:nvPr></p:nvSpPr><p:spPr>{}</p:spPr></p:sp>"#,
        xfrm(1.0, 0.75, 5.5, 4.125)
    );
    let body = placeholder(3, "Notes Placeholder 2", r#"type="body" idx="1""#, &xfrm(0.75, 5.2, 6.0, 4.5), "<a:p/>");
    format!(
        r#"{XML_DECL}<p:notesMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{GROUP_PROPS}{image}{body}</p:spTree></p:cSld><p:clrMap {COLOR_MAP}/></p:notesMaster>"#
    )
}

fn theme(name: &str) -> String {
    let accents = ["0D9488", "1E243A", "F59E0B", "6366F1", "EF4444", "10B981"];
    let accent_xml: String = accents
        .iter()
        .enumerate()
        .map(|(i, c)| format!(r#"<a:accent{n}><a:srgbClr val="{c}"/></a:accent{n}>"#, n = i + 1))
        .collect();
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let fills = solid.repeat(3);
    let lines: String = [6350, 12700, 19050]
        .iter()
        .map(|w| format!(r#"<a:ln w="{w}">{solid}</a:ln>"#))
        .collect();
    let effects = "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3);

    format!(
        r#"{XML_DECL}<a:theme xmlns:a="{NS_A}" name="{name}"><a:themeElements><a:clrScheme name="Classroom"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1E243A"/></a:dk2><a:lt2><a:srgbClr val="F0F4F8"/></a:lt2>{accent_xml}<a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Classroom"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Classroom"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effects}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
    )
}

fn run(text: &str, props: &str) -> String {
    format!(
        r#"<a:r><a:rPr lang="en-US" dirty="0"{props}</a:rPr><a:t>{}</a:t></a:r>"#,
        escape(text)
    )
}

fn paragraph(text: &str) -> String {
    format!("<a:p>{}</a:p>", run(text, ">"))
}

/// 多行文本，每行一个段落；空文本输出一个空段落
fn paragraphs<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let xml: String = lines.into_iter().map(paragraph).collect();
    if xml.is_empty() {
        "<a:p/>".to_string()
    } else {
        xml
    }
}

/// 文本框；`props` 接在 `<a:rPr` 的属性之后
fn text_box(id: usize, name: &str, frame: &str, text: &str, props: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{frame}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:spAutoFit/></a:bodyPr><a:lstStyle/><a:p>{}</a:p></p:txBody></p:sp>"#,
        run(text, props)
    )
}

fn slide_xml(slide: &RenderedSlide) -> String {
    let title = placeholder(2, "Title 1", r#"type="title""#, "", &paragraph(&slide.title));
    let body = placeholder(
        3,
        "Content Placeholder 2",
        r#"idx="1""#,
        &xfrm(0.5, 1.5, 4.5, 5.5),
        &paragraphs(slide.bullets.iter().map(String::as_str)),
    );

    let mut shapes = format!("{title}{body}");
    if slide.is_first {
        shapes.push_str(&text_box(
            4,
            "Design Tip",
            &xfrm(0.5, 0.2, 9.0, 0.5),
            DESIGN_TIP,
            r#" sz="1100"><a:solidFill><a:srgbClr val="646464"/></a:solidFill>"#,
        ));
    }
    shapes.push_str(&text_box(
        5,
        "Image Prompt",
        &xfrm(0.5, 7.0, 9.0, 0.5),
        &format!("Nano Banana Image Prompt: {}", slide.image_prompt),
        r#" sz="900" i="1"><a:solidFill><a:srgbClr val="969696"/></a:solidFill>"#,
    ));

    format!(
        r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree>{GROUP_PROPS}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn notes_xml(notes: &str) -> String {
    let image = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#;
    let body = placeholder(
        3,
        "Notes Placeholder 2",
        r#"type="body" idx="1""#,
        "",
        &paragraphs(notes.lines().filter(|l| !l.trim().is_empty())),
    );
    format!(
        r#"{XML_DECL}<p:notes xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree>{GROUP_PROPS}{image}{body}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::read_entries;

    fn slide(title: &str, bullets: usize) -> Slide {
        Slide {
            title: title.to_string(),
            bullet_points: (1..=bullets).map(|i| format!("point {i}")).collect(),
            speaker_notes: format!("Say something about {title}.\nThen ask a question."),
            image_ai_prompt: None,
        }
    }

    fn part(entries: &[(String, Vec<u8>)], name: &str) -> String {
        let (_, bytes) = entries
            .iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("missing part {name}"));
        String::from_utf8(bytes.clone()).unwrap()
    }

    #[test]
    fn test_expand_splits_long_slides() {
        let mut with_prompt = slide("Energy", 2);
        with_prompt.image_ai_prompt = Some("A leaf in sunlight".to_string());
        let slides = vec![slide("Hook", 9), with_prompt];

        let rendered = expand_slides(&slides, "Photosynthesis");
        let titles: Vec<_> = rendered.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Hook (Part 1)", "Hook (Part 2)", "Energy"]);
        assert_eq!(rendered[0].bullets.len(), 6);
        assert_eq!(rendered[1].bullets, ["point 7", "point 8", "point 9"]);
        assert!(rendered[0].is_first);
        assert!(!rendered[1].is_first);
        assert_eq!(rendered[0].image_prompt, "Image of Photosynthesis");
        assert_eq!(rendered[2].image_prompt, "A leaf in sunlight");
    }

    #[test]
    fn test_exactly_six_bullets_is_not_split() {
        let rendered = expand_slides(&[slide("Six", 6)], "t");
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].title, "Six");
    }

    #[test]
    fn test_package_parts() {
        let bytes = render_slide_deck(&[slide("Hook", 7), slide("Wrap & Review", 3)], "Cells").unwrap();
        let entries = read_entries(&bytes).unwrap();

        assert_eq!(entries[0].0, "[Content_Types].xml");
        for name in [
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/notesMasters/notesMaster1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide3.xml",
            "ppt/notesSlides/notesSlide3.xml",
            "ppt/slides/_rels/slide3.xml.rels",
        ] {
            assert!(entries.iter().any(|(n, _)| n == name), "missing {name}");
        }
        let slide_count = entries
            .iter()
            .filter(|(n, _)| n.starts_with("ppt/slides/slide"))
            .count();
        assert_eq!(slide_count, 3);

        let presentation = part(&entries, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 3);

        let types = part(&entries, "[Content_Types].xml");
        assert!(types.contains("/ppt/notesSlides/notesSlide3.xml"));
    }

    #[test]
    fn test_slide_content() {
        let bytes = render_slide_deck(&[slide("Hook", 2), slide("Wrap & Review", 1)], "Cells").unwrap();
        let entries = read_entries(&bytes).unwrap();

        let first = part(&entries, "ppt/slides/slide1.xml");
        assert!(first.contains(DESIGN_TIP));
        assert!(first.contains("<a:t>point 2</a:t>"));
        assert!(first.contains("Nano Banana Image Prompt: Image of Cells"));

        let second = part(&entries, "ppt/slides/slide2.xml");
        assert!(!second.contains("PRO TIP"));
        assert!(second.contains("<a:t>Wrap &amp; Review</a:t>"));

        let notes = part(&entries, "ppt/notesSlides/notesSlide2.xml");
        assert!(notes.contains("<a:t>Say something about Wrap &amp; Review.</a:t>"));
        assert!(notes.contains("<a:t>Then ask a question.</a:t>"));

        let rels = part(&entries, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml""#));
        assert!(rels.contains(r#"Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme""#));
    }

    #[test]
    fn test_empty_deck_is_still_a_package() {
        let bytes = render_slide_deck(&[], "Cells").unwrap();
        let entries = read_entries(&bytes).unwrap();
        let presentation = part(&entries, "ppt/presentation.xml");
        assert!(!presentation.contains("sldIdLst"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let slides = [slide("Hook", 3)];
        assert_eq!(
            render_slide_deck(&slides, "Cells").unwrap(),
            render_slide_deck(&slides, "Cells").unwrap()
        );
    }
}
