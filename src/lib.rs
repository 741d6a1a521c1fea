//! # Audition Admin
//!
//! nanoko 题库的终端审核客户端：登录、浏览题目、逐个编辑小题并保存修改。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构，每层只依赖下一层：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 客户端和登录 token，只暴露 API 能力
//! - `NanokoGateway` - API 能力的抽象，测试中可替换
//! - `NanokoClient` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个小题
//! - `save_service` - 以服务端数据为基准逐字段比较并保存
//! - `image_service` - 图片加载和上传
//! - `credentials` - 记住密码的凭据存储
//!
//! ### ③ 调度层（Dispatcher）
//! - `dispatcher/` - 在 tokio 运行时上执行一次操作，只投递一个结果
//! - `Generation` - 窗口代数，用于丢弃过期结果
//!
//! ### ④ 编排层（Controller / Views / UI）
//! - `controller/` - 决定当前窗口，路由意图和结果
//! - `views/` - 登录、题目列表、小题编辑三个窗口的视图模型
//! - `ui/` - ratatui 终端界面和按键映射
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;
pub mod views;

// 重新导出常用类型
pub use app::App;
pub use clients::{NanokoClient, NanokoGateway};
pub use config::Config;
pub use controller::{AppState, MainController, OutcomeDisposition};
pub use dispatcher::{Completion, Dispatcher, Generation, Operation, Outcome, Request};
pub use error::{AppError, AppResult};
pub use models::{Question, SubQuestion, SubQuestionDraft};
