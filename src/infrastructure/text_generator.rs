use async_trait::async_trait;

use crate::error::AppResult;

/// 文本生成能力
///
/// 给一段提示词，返回一段文本。`want_json` 为 true 时要求对方只返回 JSON，
/// 但调用方仍需自行清洗和校验返回内容。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, want_json: bool) -> AppResult<String>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str, want_json: bool) -> AppResult<String> {
        (**self).generate(prompt, want_json).await
    }
}
