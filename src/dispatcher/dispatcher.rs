//! 操作调度器 - 调度层
//!
//! ## 职责
//!
//! 在 UI 线程之外执行一次 API 操作，并且只投递一个结果。
//!
//! - `execute()` 是无状态的执行函数：输入操作，输出结果
//! - `Dispatcher` 负责在 tokio 运行时上启动执行，并用忙碌标记拒绝并发的 `start()`
//! - 任何错误（包括 panic）都转换为对应操作类型的失败结果，不会让工作线程崩溃

use super::operation::{Operation, OperationKind, Request};
use super::outcome::{Completion, Outcome};
use crate::clients::NanokoGateway;
use crate::error::{AppError, AppResult, BusinessError, DispatchError};
use crate::models::Question;
use crate::services::{image_service, save_service};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

/// 操作调度器
pub struct Dispatcher {
    gateway: Arc<dyn NanokoGateway>,
    runtime: Handle,
    pending: Option<Request>,
    busy: Arc<AtomicBool>,
    outcome_tx: UnboundedSender<Outcome>,
}

impl Dispatcher {
    /// 创建调度器，返回结果接收端
    pub fn new(gateway: Arc<dyn NanokoGateway>, runtime: Handle) -> (Self, UnboundedReceiver<Outcome>) {
        let (outcome_tx, outcome_rx) = unbounded_channel();
        let dispatcher = Self {
            gateway,
            runtime,
            pending: None,
            busy: Arc::new(AtomicBool::new(false)),
            outcome_tx,
        };
        (dispatcher, outcome_rx)
    }

    /// 在当前 tokio 运行时上创建调度器
    pub fn with_current_runtime(
        gateway: Arc<dyn NanokoGateway>,
    ) -> AppResult<(Self, UnboundedReceiver<Outcome>)> {
        let runtime = Handle::try_current()
            .map_err(|e| AppError::from(DispatchError::NoRuntime(e.to_string())))?;
        Ok(Self::new(gateway, runtime))
    }

    /// 设置待执行的请求，覆盖之前未启动的请求
    pub fn configure(&mut self, request: Request) {
        if let Some(previous) = self.pending.replace(request) {
            debug!("覆盖未启动的请求: {}", previous.operation.kind());
        }
    }

    /// 是否有操作正在执行
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// 启动已配置的请求，立即返回
    ///
    /// 正在执行时返回 `Busy`，已配置的请求保留以便稍后再启动
    pub fn start(&mut self) -> Result<OperationKind, DispatchError> {
        if self.is_busy() {
            return Err(DispatchError::Busy);
        }
        let request = self.pending.take().ok_or(DispatchError::NotConfigured)?;
        let kind = request.operation.kind();

        self.busy.store(true, Ordering::SeqCst);

        let gateway = Arc::clone(&self.gateway);
        let busy = Arc::clone(&self.busy);
        let outcome_tx = self.outcome_tx.clone();

        info!("▶ 开始执行操作: {}", kind);

        self.runtime.spawn(async move {
            let generation = request.generation;
            let completion = execute(gateway.as_ref(), request.operation).await;

            match completion.error() {
                None => info!("✓ 操作完成: {}", kind),
                Some(message) => error!("❌ 操作失败: {} - {}", kind, message),
            }

            // 先清除忙碌标记再投递结果，控制器收到结果后可以立刻启动下一个请求
            busy.store(false, Ordering::SeqCst);

            if outcome_tx
                .send(Outcome {
                    generation,
                    completion,
                })
                .is_err()
            {
                debug!("结果接收端已关闭，丢弃 {} 的结果", kind);
            }
        });

        Ok(kind)
    }
}

/// 执行一次操作
///
/// 无状态：每次调用只产生一个结果，panic 也会转换为失败结果
pub async fn execute(gateway: &dyn NanokoGateway, operation: Operation) -> Completion {
    let fallback = operation.clone();

    match AssertUnwindSafe(run(gateway, operation)).catch_unwind().await {
        Ok(completion) => completion,
        Err(panic) => {
            let message = format!("unexpected error: {}", panic_message(panic.as_ref()));
            error!("❌ 操作 {} 发生意外错误: {}", fallback.kind(), message);
            Completion::failure(&fallback, message)
        }
    }
}

async fn run(gateway: &dyn NanokoGateway, operation: Operation) -> Completion {
    match operation {
        Operation::Login { username, password } => {
            Completion::Login(gateway.login(&username, &password).await.map_err(to_message))
        }
        Operation::LoadQuestions => {
            let result = gateway.list_questions(None).await;
            if let Ok(questions) = &result {
                debug!("加载了 {} 道题目", questions.len());
            }
            Completion::QuestionsLoaded(result.map_err(to_message))
        }
        Operation::LoadQuestion { question_id } => Completion::QuestionLoaded {
            question_id,
            result: load_question(gateway, question_id).await.map_err(to_message),
        },
        Operation::ApproveQuestion { question_id } => Completion::QuestionApproved {
            question_id,
            result: gateway.approve_question(question_id).await.map_err(to_message),
        },
        Operation::DeleteQuestion { question_id } => Completion::QuestionDeleted {
            question_id,
            result: gateway.delete_question(question_id).await.map_err(to_message),
        },
        Operation::LoadImage { image_id } => Completion::ImageLoaded {
            image_id,
            result: image_service::load_image(gateway, image_id)
                .await
                .map_err(to_message),
        },
        Operation::UploadImage {
            file_path,
            target,
            sub_question_id,
            description,
        } => Completion::ImageUploaded {
            sub_question_id,
            result: image_service::upload_image(
                gateway,
                &file_path,
                target,
                sub_question_id,
                &description,
            )
            .await
            .map_err(to_message),
        },
        Operation::SaveSubQuestion { draft } => Completion::SubQuestionSaved(
            save_service::save_sub_question(gateway, draft)
                .await
                .map_err(to_message),
        ),
    }
}

/// 加载单个题目，空结果视为不存在
async fn load_question(gateway: &dyn NanokoGateway, question_id: i64) -> AppResult<Question> {
    gateway
        .list_questions(Some(question_id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| BusinessError::QuestionNotFound.into())
}

fn to_message(err: AppError) -> String {
    err.to_string()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        "worker panicked".to_string()
    }
}
