//! 应用入口 - 编排层
//!
//! 负责组装 API 客户端、凭据存储和主控制器，然后把终端交给界面循环。

use crate::clients::{NanokoClient, NanokoGateway};
use crate::config::{Config, CREDENTIAL_SERVICE};
use crate::controller::MainController;
use crate::services::{CredentialStore, FileCredentialStore};
use crate::ui::TuiRenderer;
use crate::utils::logging::{log_shutdown, log_startup};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

/// 应用主结构
pub struct App {
    config: Config,
    controller: MainController,
}

impl App {
    /// 初始化应用
    ///
    /// 必须在 tokio 运行时中调用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        log_startup(&config);

        let gateway: Arc<dyn NanokoGateway> =
            Arc::new(NanokoClient::new(&config).context("failed to build API client")?);

        let credentials: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(
            config.credential_file.clone(),
            CREDENTIAL_SERVICE,
        ));

        let controller = MainController::new(config.clone(), gateway, credentials)?;

        info!("✓ 初始化完成");

        Ok(Self { config, controller })
    }

    /// 运行界面直到用户退出
    pub async fn run(self) -> Result<()> {
        let Self { config, controller } = self;

        let renderer = TuiRenderer::new(controller);
        let result = tokio::task::spawn_blocking(move || renderer.run())
            .await
            .context("UI thread panicked")?;

        if let Err(e) = &result {
            error!("❌ 界面异常退出: {:#}", e);
        }

        log_shutdown(&config.log_file);
        result
    }
}
