//! 单元序列规划 - 业务能力层
//!
//! 模型返回的序列可能是顶层数组，也可能是 `{ "items": [...] }`。
//! 条目缺少标题时用 `Item {序号}`，缺少子主题时用单元主题，类型无法识别的条目跳过。

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::TextGenerator;
use crate::models::request::UnitContext;
use crate::models::unit::{ItemKind, UnitSequence, UnitSequenceItem};
use crate::services::{json_sanitizer, prompt_builder};

pub async fn plan_unit_sequence(
    generator: &dyn TextGenerator,
    ctx: &UnitContext,
    num_assignments: usize,
    num_quizzes: usize,
) -> AppResult<UnitSequence> {
    let prompt = prompt_builder::unit_outline_prompt(ctx, num_assignments, num_quizzes);
    let raw = generator.generate(&prompt, true).await?;
    let sequence = normalize_outline(json_sanitizer::parse_value(&raw)?, &ctx.topic)?;

    info!(
        "单元序列规划完成: {} 项（作业 {}，测验 {}）",
        sequence.len(),
        sequence.iter().filter(|i| i.kind == ItemKind::Assignment).count(),
        sequence.iter().filter(|i| i.kind == ItemKind::Quiz).count()
    );
    Ok(sequence)
}

/// 把模型返回的 JSON 整理成单元序列
pub fn normalize_outline(value: JsonValue, topic: &str) -> AppResult<UnitSequence> {
    let items = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut map) => match map.remove("items") {
            Some(JsonValue::Array(items)) => items,
            _ => return Err(AppError::unexpected_shape("条目数组，或 items 键下的数组")),
        },
        _ => return Err(AppError::unexpected_shape("条目数组")),
    };

    let mut sequence = UnitSequence::new();
    for (index, item) in items.iter().enumerate() {
        let idx = index + 1;
        let raw_kind = item.get("type").and_then(JsonValue::as_str).unwrap_or_default();
        let Some(kind) = ItemKind::parse(raw_kind) else {
            warn!("跳过第 {} 项：无法识别的类型 {:?}", idx, raw_kind);
            continue;
        };

        let title = non_empty_str(item, "title").unwrap_or_else(|| format!("Item {idx}"));
        let focus_topic = non_empty_str(item, "focus_topic").unwrap_or_else(|| topic.to_string());
        sequence.push(UnitSequenceItem::new(kind, title, focus_topic));
    }

    if sequence.is_empty() {
        return Err(AppError::unexpected_shape("至少一个 Assignment 或 Quiz 条目"));
    }
    Ok(sequence)
}

fn non_empty_str(item: &JsonValue, key: &str) -> Option<String> {
    item.get(key)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
