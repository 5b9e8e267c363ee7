//! JSON 清洗 - 业务能力层
//!
//! 模型返回的"JSON"经常带有 Markdown 代码块标记，或在字符串里直接写
//! LaTeX 命令（如 `\alpha`、`\sqrt`）导致非法转义。这里负责把它们修成
//! 可以解析的 JSON 文本。

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

/// 开头的代码块标记（可带语言标签，后面不一定换行）
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*(?:\r?\n)?").expect("leading fence regex is invalid"));

/// 结尾的代码块标记，可以与正文同一行
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```\s*$").expect("trailing fence regex is invalid"));

/// 去掉包裹文本的代码块标记
///
/// 只处理首尾，正文中的 ``` 不受影响
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    TRAILING_FENCE.replace(&without_leading, "").trim().to_string()
}

/// 把不构成合法 JSON 转义的反斜杠加倍
///
/// 合法转义（`\n \r \t \b \f \" \\ \/` 以及 `\u` + 4 位十六进制）作为一个整体跳过，
/// 因此对合法 JSON 重复执行不会产生任何变化。
pub fn escape_stray_backslashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some('n' | 'r' | 't' | 'b' | 'f' | '"' | '\\' | '/') => {
                out.push('\\');
                out.push(chars[i + 1]);
                i += 2;
            }
            Some('u') if is_unicode_escape(&chars[i + 2..]) => {
                out.push_str("\\u");
                i += 2;
            }
            _ => {
                out.push_str("\\\\");
                i += 1;
            }
        }
    }

    out
}

fn is_unicode_escape(rest: &[char]) -> bool {
    rest.len() >= 4 && rest[..4].iter().all(char::is_ascii_hexdigit)
}

/// 清洗模型输出，返回可以解析的 JSON 文本
///
/// 清洗后仍无法解析时返回 `MalformedOutput`，带行列和字节偏移
pub fn sanitize(raw: &str) -> AppResult<String> {
    let text = escape_stray_backslashes(&strip_code_fences(raw));
    serde_json::from_str::<JsonValue>(&text).map_err(|e| AppError::malformed(&text, e))?;
    Ok(text)
}

/// 清洗并解析为 JSON 值
pub fn parse_value(raw: &str) -> AppResult<JsonValue> {
    let text = escape_stray_backslashes(&strip_code_fences(raw));
    serde_json::from_str(&text).map_err(|e| AppError::malformed(&text, e))
}

/// 清洗并反序列化为指定类型
pub fn parse<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    let text = escape_stray_backslashes(&strip_code_fences(raw));
    serde_json::from_str(&text).map_err(|e| AppError::malformed(&text, e))
}
