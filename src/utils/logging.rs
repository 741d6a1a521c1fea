/// 日志工具模块
///
/// 终端被界面占用，日志全部写入文件
use crate::config::Config;
use crate::error::{AppError, AppResult};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 写入日志文件头，然后把 tracing 输出重定向到该文件。
/// 过滤规则优先使用 `RUST_LOG`，否则使用配置中的规则。
pub fn init(config: &Config) -> AppResult<()> {
    init_log_file(&config.log_file)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| AppError::file_write_failed(&config.log_file, e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Other(format!("failed to initialize logging: {}", e)))?;

    Ok(())
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n题库审核日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 题库审核客户端");
    info!("🌐 API 地址: {}", config.api_base_url);
    info!("📄 每页题目数: {}", config.page_size);
    info!("🔑 凭据文件: {}", config.credential_file.display());
    info!("{}", "=".repeat(60));
}

/// 记录程序退出信息
pub fn log_shutdown(log_file_path: &str) {
    info!("{}", "─".repeat(60));
    info!(
        "👋 程序退出: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
