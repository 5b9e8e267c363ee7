//! 参考资料读取
//!
//! 支持纯文本（`.txt` `.md` `.html`）、PDF 和 Word（`.docx`）。
//! 抽取出的文本统一截断到提示词上限。

use std::fmt::Display;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tokio::fs;
use tracing::debug;

use crate::error::{AppResult, FileError};
use crate::infrastructure::read_entries;
use crate::services::prompt_builder::truncate_source;

const TEXT_EXTENSIONS: [&str; 4] = ["txt", "md", "html", "htm"];

/// docx 中正文所在的条目
const DOCX_BODY: &str = "word/document.xml";

/// 读取参考资料，超长部分截断
pub async fn load_source_text(path: &Path) -> AppResult<String> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = match extension.as_str() {
        ext if TEXT_EXTENSIONS.contains(&ext) => {
            fs::read_to_string(path)
                .await
                .map_err(|source| read_failed(path, source))?
        }
        "pdf" => {
            let bytes = fs::read(path).await.map_err(|source| read_failed(path, source))?;
            pdf_text(&bytes).map_err(|e| extract_failed(path, e))?
        }
        "docx" => {
            let bytes = fs::read(path).await.map_err(|source| read_failed(path, source))?;
            docx_text(&bytes).map_err(|e| extract_failed(path, e))?
        }
        _ => {
            return Err(FileError::Unsupported {
                path: path.display().to_string(),
            }
            .into())
        }
    };

    debug!("读取参考资料 {}: {} 字符", path.display(), text.chars().count());
    Ok(truncate_source(&text))
}

/// 按页抽取 PDF 文本，每页之后换行
fn pdf_text(bytes: &[u8]) -> Result<String, String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())?;
    Ok(pages.iter().map(|page| format!("{}\n", page.trim_end())).collect())
}

/// 抽取 docx 正文：每个段落一行
fn docx_text(bytes: &[u8]) -> Result<String, String> {
    let entries = read_entries(bytes).map_err(|e| e.to_string())?;
    let (_, body) = entries
        .into_iter()
        .find(|(name, _)| name == DOCX_BODY)
        .ok_or_else(|| format!("缺少 {}", DOCX_BODY))?;
    let xml = std::str::from_utf8(&body).map_err(|e| e.to_string())?;

    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape().map_err(|e| e.to_string())?),
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"p" => text.push('\n'),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn read_failed(path: &Path, source: std::io::Error) -> FileError {
    FileError::ReadFailed {
        path: path.display().to_string(),
        source,
    }
}

fn extract_failed(path: &Path, message: impl Display) -> FileError {
    FileError::ExtractFailed {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}
