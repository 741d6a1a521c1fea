use crate::error::{AppResult, ConfigError};
use std::path::PathBuf;
use std::time::Duration;

/// 凭据存储使用的服务命名空间
pub const CREDENTIAL_SERVICE: &str = "nanoko-audition";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- nanoko API 配置 ---
    /// API 根地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 界面配置 ---
    /// 题目列表每页行数
    pub page_size: usize,
    /// 提示条显示时长（秒）
    pub notification_secs: u64,
    /// 界面刷新间隔（毫秒）
    pub tick_ms: u64,
    // --- 本地文件 ---
    /// 记住密码时使用的凭据文件
    pub credential_file: PathBuf,
    /// 日志文件
    pub log_file: String,
    /// 日志过滤规则（RUST_LOG 优先）
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:25324".to_string(),
            request_timeout_secs: 30,
            page_size: 20,
            notification_secs: 3,
            tick_ms: 100,
            credential_file: default_credential_file(),
            log_file: "audition_admin.log".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("NANOKO_BASE_URL").unwrap_or(default.api_base_url),
            request_timeout_secs: std::env::var("NANOKO_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            page_size: std::env::var("QUESTION_PAGE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.page_size),
            notification_secs: std::env::var("NOTIFICATION_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.notification_secs),
            tick_ms: std::env::var("UI_TICK_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.tick_ms),
            credential_file: std::env::var("AUDITION_CREDENTIAL_FILE").map(PathBuf::from).unwrap_or(default.credential_file),
            log_file: std::env::var("AUDITION_LOG_FILE").unwrap_or(default.log_file),
            log_filter: std::env::var("AUDITION_LOG_FILTER").unwrap_or(default.log_filter),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "must be at least 1"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::AppError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn default_credential_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CREDENTIAL_SERVICE)
        .join("credentials.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 20);
        assert_eq!(config.api_base_url, "http://localhost:25324");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
