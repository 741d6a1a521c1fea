//! 编排层（Controller Layer）
//!
//! 唯一决定当前窗口的组件，也是窗口意图与调度器之间唯一的路由。

pub mod main_controller;
pub mod state;

pub use main_controller::MainController;
pub use state::{ActiveWindow, AppState, OutcomeDisposition};
