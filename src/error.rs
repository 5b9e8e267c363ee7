use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 外部生成调用失败（可在本批次/本阶段内恢复）
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// 模型输出无法解析，或结构不符合预期
    #[error(transparent)]
    Malformed(#[from] MalformedOutput),

    /// 题目数据违反约束，无法序列化
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// 文档渲染失败
    #[error("渲染错误: {0}")]
    Render(String),

    /// 配置错误（不可重试，直接终止运行）
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 文件操作错误
    #[error(transparent)]
    File(#[from] FileError),

    /// 压缩包写入错误
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),
}

impl AppError {
    /// 是否为致命错误（需要立即终止整个运行）
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_))
    }

    /// 根据 serde_json 的行列信息计算字节偏移，构造 `MalformedOutput::InvalidJson`
    pub fn malformed(text: &str, source: serde_json::Error) -> Self {
        let line = source.line();
        let column = source.column();
        let offset = line_column_to_offset(text, line, column);
        AppError::Malformed(MalformedOutput::InvalidJson {
            line,
            column,
            offset,
            source,
        })
    }

    /// 创建结构不匹配错误
    pub fn unexpected_shape(expected: impl Into<String>) -> Self {
        AppError::Malformed(MalformedOutput::UnexpectedShape {
            expected: expected.into(),
        })
    }

    /// 创建生成失败错误
    pub fn generation_failed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Generation(GenerationError::CallFailed {
            stage: stage.into(),
            message: message.into(),
        })
    }
}

/// serde_json 的行列从 1 开始；列 0 表示错误位于行首之前（如空输入）
fn line_column_to_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

/// 模型输出格式错误
#[derive(Debug, Error)]
pub enum MalformedOutput {
    /// 清洗后仍不是合法 JSON
    #[error("JSON 解析失败 (行 {line}, 列 {column}, 偏移 {offset}): {source}")]
    InvalidJson {
        line: usize,
        column: usize,
        offset: usize,
        #[source]
        source: serde_json::Error,
    },

    /// 合法 JSON，但没有可识别的结构
    #[error("无法识别的结构，期望 {expected}")]
    UnexpectedShape { expected: String },
}

/// 外部生成调用错误
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// API 调用失败
    #[error("调用失败 ({stage}): {message}")]
    CallFailed { stage: String, message: String },

    /// 返回内容为空
    #[error("模型返回内容为空 (模型: {model})")]
    EmptyContent { model: String },

    /// 返回内容缺少期望字段
    #[error("返回内容缺少字段: {field}")]
    MissingField { field: String },
}

/// 题目数据约束错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// 选项数量不足
    #[error("第 {question} 题只有 {count} 个选项，至少需要 2 个")]
    TooFewOptions { question: usize, count: usize },

    /// 正确答案索引越界
    #[error("第 {question} 题的正确答案索引 {index} 超出范围 [0, {option_count})")]
    CorrectIndexOutOfRange {
        question: usize,
        index: usize,
        option_count: usize,
    },

    /// XML 写入失败
    #[error("XML 写入失败: {0}")]
    Xml(String),
}

/// 配置错误
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// 必填配置缺失
    #[error("环境变量 {var_name} 未设置")]
    Missing { var_name: String },

    /// 配置取值不合法
    #[error("环境变量 {var_name} 取值不合法: {message}")]
    Invalid { var_name: String, message: String },

    /// 生成服务未授权
    #[error("生成服务拒绝访问 ({endpoint}): HTTP {status}")]
    Unauthorized { endpoint: String, status: u16 },

    /// 生成服务不可达
    #[error("无法连接生成服务 ({endpoint}): {message}")]
    Unreachable { endpoint: String, message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 无法从文档中抽取文本
    #[error("文本抽取失败 ({path}): {message}")]
    ExtractFailed { path: String, message: String },

    /// 不支持的文件类型
    #[error("不支持的文件类型: {path}")]
    Unsupported { path: String },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
