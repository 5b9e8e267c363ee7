use crate::error::ConfigError;
use crate::services::quiz_generator::BatchPolicy;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 任务文件（TOML）存放目录
    pub jobs_folder: String,
    /// 生成结果输出目录
    pub output_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 生成策略 ---
    /// 每批请求的题目数量
    pub quiz_batch_size: usize,
    /// 在 target / batch_size 之外额外尝试的批次数
    pub quiz_extra_batches: usize,
    /// 单元包中每个测验的题目数量
    pub unit_quiz_questions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs_folder: "jobs".to_string(),
            output_folder: "output".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            quiz_batch_size: 10,
            quiz_extra_batches: 2,
            unit_quiz_questions: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            jobs_folder: std::env::var("JOBS_FOLDER").unwrap_or(default.jobs_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            quiz_batch_size: std::env::var("QUIZ_BATCH_SIZE").ok().and_then(|v| v.parse().ok()).filter(|v| *v > 0).unwrap_or(default.quiz_batch_size),
            quiz_extra_batches: std::env::var("QUIZ_EXTRA_BATCHES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.quiz_extra_batches),
            unit_quiz_questions: std::env::var("UNIT_QUIZ_QUESTIONS").ok().and_then(|v| v.parse().ok()).filter(|v| *v > 0).unwrap_or(default.unit_quiz_questions),
        }
    }

    /// 检查运行前必须具备的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        if self.quiz_batch_size == 0 {
            return Err(ConfigError::Invalid {
                var_name: "QUIZ_BATCH_SIZE".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.unit_quiz_questions == 0 {
            return Err(ConfigError::Invalid {
                var_name: "UNIT_QUIZ_QUESTIONS".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 题目分批生成策略
    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy {
            batch_size: self.quiz_batch_size,
            extra_batches: self.quiz_extra_batches,
        }
    }
}
