use thiserror::Error;

/// 应用程序错误类型
///
/// 所有变体都透明地转发内部错误的描述，这样传给窗口的错误文本就是
/// 原始的可读信息，不会被层层加上前缀。
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error(transparent)]
    Api(#[from] ApiError),
    /// 业务逻辑错误
    #[error(transparent)]
    Business(#[from] BusinessError),
    /// 文件操作错误
    #[error(transparent)]
    File(#[from] FileError),
    /// 凭据存储错误
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 调度器错误
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// 其他错误（用于包装第三方库错误）
    #[error("{0}")]
    Other(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 认证失败（用户名或密码错误、token 失效）
    #[error("{message}")]
    Unauthorized { message: String },
    /// API 返回错误响应
    #[error("{endpoint} returned {status}: {message}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// JSON 解析失败
    #[error("failed to parse response from {endpoint}: {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 尚未登录
    #[error("not logged in")]
    NotLoggedIn,
}

/// 业务逻辑错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusinessError {
    /// 题目不存在
    #[error("Question not found")]
    QuestionNotFound,
    /// 小题不存在
    #[error("Sub-question not found")]
    SubQuestionNotFound,
    /// 题目没有小题
    #[error("No sub-questions available")]
    EmptySubQuestions,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 凭据存储错误
#[derive(Debug, Error)]
pub enum CredentialError {
    /// 凭据文件读写失败
    #[error("credential store I/O failed ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 凭据文件格式错误
    #[error("credential store is corrupted ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 凭据序列化失败
    #[error("failed to serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 存储后端不可用
    #[error("credential backend unavailable: {0}")]
    Unavailable(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值不合法
    #[error("invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// 调度器错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// 已有操作正在执行
    #[error("another operation is still running")]
    Busy,
    /// 调用 start() 之前没有 configure()
    #[error("no operation configured")]
    NotConfigured,
    /// 当前线程不在 tokio 运行时中
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}

// ========== 从常见错误类型转换 ==========

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为认证失败
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AppError::Api(ApiError::Unauthorized { .. }) | AppError::Api(ApiError::NotLoggedIn)
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_display_without_prefix() {
        let err: AppError = BusinessError::QuestionNotFound.into();
        assert_eq!(err.to_string(), "Question not found");

        let err: AppError = ApiError::Unauthorized {
            message: "invalid credentials".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid credentials");
        assert!(err.is_unauthorized());
    }
}
