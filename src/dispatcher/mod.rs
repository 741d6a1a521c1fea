//! 调度层（Dispatch Layer）
//!
//! ## 职责
//!
//! 把窗口发出的请求变成一次后台 API 调用，再把结果带着代数投递回 UI 线程。
//!
//! ```text
//! controller (Request: generation + Operation)
//!     ↓ configure / start
//! Dispatcher (tokio 任务)
//!     ↓ execute
//! services / clients
//!     ↓
//! Outcome (generation + Completion) → controller
//! ```

#[allow(clippy::module_inception)]
pub mod dispatcher;
pub mod operation;
pub mod outcome;

pub use dispatcher::{execute, Dispatcher};
pub use operation::{Generation, Operation, OperationKind, Request};
pub use outcome::{Completion, OpResult, Outcome};
