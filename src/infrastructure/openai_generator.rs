//! OpenAI 兼容的文本生成客户端 - 基础设施层
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行对话补全调用
//! - 使用 `reqwest` 做启动前的连通性检查
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, GenerationError};
use crate::infrastructure::TextGenerator;

/// JSON 模式下附加的系统消息
const JSON_SYSTEM_MESSAGE: &str = "You are a JSON API. Respond with exactly one valid JSON value and nothing else. \
Do not wrap the JSON in Markdown code fences. Escape every backslash inside strings.";

/// 基于 async-openai 的生成器
pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model_name: String,
    api_key: String,
    api_base_url: String,
}

impl OpenAiGenerator {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 启动前的连通性检查：`GET {base}/models`
    ///
    /// 401/403 视为未授权，网络错误视为不可达，二者都会终止整个运行
    pub async fn check_connection(&self) -> Result<(), ConfigError> {
        let endpoint = format!("{}/models", self.api_base_url);
        debug!("检查生成服务连接: {}", endpoint);

        let response = reqwest::Client::new()
            .get(&endpoint)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ConfigError::Unreachable {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ConfigError::Unauthorized {
                endpoint,
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ConfigError::Unreachable {
                endpoint,
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        Ok(())
    }

    fn build_messages(
        &self,
        prompt: &str,
        want_json: bool,
    ) -> Result<Vec<ChatCompletionRequestMessage>, async_openai::error::OpenAIError> {
        let mut messages = Vec::new();

        if want_json {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(JSON_SYSTEM_MESSAGE)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        Ok(messages)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, want_json: bool) -> AppResult<String> {
        debug!(
            "调用 LLM API，模型: {}，提示词长度: {} 字符，JSON 模式: {}",
            self.model_name,
            prompt.len(),
            want_json
        );

        let messages = self
            .build_messages(prompt, want_json)
            .map_err(|e| AppError::generation_failed(&self.model_name, e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| AppError::generation_failed(&self.model_name, e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::generation_failed(&self.model_name, e.to_string())
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GenerationError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        debug!("LLM API 调用成功，返回 {} 字符", content.len());
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_else(|_| "sk-test".to_string()),
            llm_api_base_url: "http://127.0.0.1:9/v1/".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_json_mode_adds_system_message() {
        let generator = OpenAiGenerator::new(&test_config());
        assert_eq!(generator.build_messages("hi", true).unwrap().len(), 2);
        assert_eq!(generator.build_messages("hi", false).unwrap().len(), 1);
        assert_eq!(generator.api_base_url, "http://127.0.0.1:9/v1");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_config_error() {
        let generator = OpenAiGenerator::new(&test_config());
        let err = generator.check_connection().await.unwrap_err();
        assert!(matches!(err, ConfigError::Unreachable { .. }));
        assert!(AppError::from(err).is_fatal());
    }

    /// 真实调用，需要 LLM_API_KEY / LLM_API_BASE_URL
    ///
    /// ```bash
    /// cargo test test_live_generation -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_generation() {
        let _ = tracing_subscriber::fmt::try_init();

        let generator = OpenAiGenerator::new(&Config::from_env());
        generator.check_connection().await.unwrap();

        let response = generator
            .generate(r#"Return {"ok": true} as JSON."#, true)
            .await
            .unwrap();
        println!("LLM 响应: {}", response);
        assert!(response.contains("ok"));
    }
}
