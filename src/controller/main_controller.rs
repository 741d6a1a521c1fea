//! 主控制器 - 编排层
//!
//! ## 职责
//!
//! 决定当前显示哪个窗口，并在窗口意图、调度器请求和调度结果之间路由。
//!
//! ## 核心机制
//!
//! 1. **单窗口**：`ActiveWindow` 只持有一个窗口，切换窗口即销毁旧窗口
//! 2. **窗口代数**：每个新窗口分配新的 `Generation`，请求带上提交时的代数
//! 3. **请求队列**：请求按先进先出排队，调度器空闲时才启动下一个
//! 4. **过期丢弃**：代数不是当前代数的排队请求和结果都会被丢弃
//!
//! ## 状态转换
//!
//! ```text
//! LoggedOut --登录成功--> Listing --编辑--> Editing
//!     ^                     |  ^              |
//!     +-------退出登录------+  +----返回------+
//! ```

use super::state::{ActiveWindow, AppState, OutcomeDisposition};
use crate::clients::NanokoGateway;
use crate::config::Config;
use crate::dispatcher::{Completion, Dispatcher, Generation, Operation, Outcome, Request};
use crate::error::{AppResult, DispatchError};
use crate::models::QuestionId;
use crate::services::CredentialStore;
use crate::views::{
    EditorIntent, ListIntent, LoginIntent, LoginWindow, QuestionListWindow, SubQuestionEditWindow,
    Window,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

pub struct MainController {
    config: Config,
    credentials: Arc<dyn CredentialStore>,
    dispatcher: Dispatcher,
    outcome_rx: UnboundedReceiver<Outcome>,
    window: ActiveWindow,
    generation: Generation,
    queue: VecDeque<Request>,
    should_quit: bool,
}

impl MainController {
    /// 创建控制器
    ///
    /// 必须在 tokio 运行时内调用，调度器在该运行时上执行请求
    pub fn new(
        config: Config,
        gateway: Arc<dyn NanokoGateway>,
        credentials: Arc<dyn CredentialStore>,
    ) -> AppResult<Self> {
        let (dispatcher, outcome_rx) = Dispatcher::with_current_runtime(gateway)?;
        let window = ActiveWindow::Login(LoginWindow::new(
            Arc::clone(&credentials),
            config.notification_duration(),
        ));

        Ok(Self {
            config,
            credentials,
            dispatcher,
            outcome_rx,
            window,
            generation: Generation::default(),
            queue: VecDeque::new(),
            should_quit: false,
        })
    }

    /// 启动流程：显示登录窗口
    pub fn start(&mut self) {
        self.show_login_window();
    }

    // ========== 窗口切换 ==========

    fn replace_window(&mut self, window: ActiveWindow) {
        self.generation = self.generation.next();
        self.window = window;
        debug!("窗口代数更新为 {}", self.generation.0);
    }

    fn show_login_window(&mut self) {
        info!("→ 显示登录窗口");
        let window = LoginWindow::new(
            Arc::clone(&self.credentials),
            self.config.notification_duration(),
        );
        self.replace_window(ActiveWindow::Login(window));
    }

    fn show_question_list_window(&mut self) {
        info!("→ 显示题目列表");
        let window = QuestionListWindow::new(
            self.config.page_size,
            self.config.notification_duration(),
        );
        self.replace_window(ActiveWindow::List(window));
        self.load_questions();
    }

    fn show_sub_question_edit_window(&mut self, question_id: QuestionId, sub_question_index: usize) {
        info!("→ 编辑题目 {} 的第 {} 个小题", question_id, sub_question_index + 1);
        let window = SubQuestionEditWindow::new(
            question_id,
            sub_question_index,
            self.config.notification_duration(),
        );
        self.replace_window(ActiveWindow::Editor(window));
        self.load_question_data(question_id);
    }

    // ========== 请求提交 ==========

    fn load_questions(&mut self) {
        if let ActiveWindow::List(list) = &mut self.window {
            list.show_loading_state();
            self.submit(Operation::LoadQuestions);
        }
    }

    fn load_question_data(&mut self, question_id: QuestionId) {
        if let ActiveWindow::Editor(editor) = &mut self.window {
            editor.show_loading_state();
            self.submit(Operation::LoadQuestion { question_id });
        }
    }

    /// 以当前代数提交请求
    fn submit(&mut self, operation: Operation) {
        debug!("排队请求 {} (代数 {})", operation.kind(), self.generation.0);
        self.queue.push_back(Request::new(self.generation, operation));
        self.pump();
    }

    /// 调度器空闲时启动队首请求，过期请求直接丢弃
    pub fn pump(&mut self) {
        while !self.dispatcher.is_busy() {
            let Some(request) = self.queue.pop_front() else {
                return;
            };

            if request.generation != self.generation {
                debug!(
                    "丢弃过期请求 {} (代数 {}，当前 {})",
                    request.operation.kind(),
                    request.generation.0,
                    self.generation.0
                );
                continue;
            }

            self.dispatcher.configure(request.clone());
            match self.dispatcher.start() {
                Ok(_) => return,
                Err(DispatchError::Busy) => {
                    self.queue.push_front(request);
                    return;
                }
                Err(e) => {
                    error!("❌ 启动请求失败: {}", e);
                    return;
                }
            }
        }
    }

    // ========== 意图处理 ==========

    /// 处理当前窗口积累的意图
    ///
    /// 某个意图切换了窗口后，旧窗口剩余的意图不再处理
    pub fn process_intents(&mut self) {
        loop {
            let generation = self.generation;
            let handled = match &mut self.window {
                ActiveWindow::Login(w) => {
                    let intents = w.take_intents();
                    let count = intents.len();
                    for intent in intents {
                        self.handle_login_intent(intent);
                        if self.generation != generation {
                            break;
                        }
                    }
                    count
                }
                ActiveWindow::List(w) => {
                    let intents = w.take_intents();
                    let count = intents.len();
                    for intent in intents {
                        self.handle_list_intent(intent);
                        if self.generation != generation {
                            break;
                        }
                    }
                    count
                }
                ActiveWindow::Editor(w) => {
                    let intents = w.take_intents();
                    let count = intents.len();
                    for intent in intents {
                        self.handle_editor_intent(intent);
                        if self.generation != generation {
                            break;
                        }
                    }
                    count
                }
            };

            if handled == 0 {
                return;
            }
        }
    }

    fn handle_login_intent(&mut self, intent: LoginIntent) {
        match intent {
            LoginIntent::Login { username, password } => {
                info!("用户 {} 请求登录", username);
                self.submit(Operation::Login { username, password });
            }
            LoginIntent::Quit => self.quit(),
        }
    }

    fn handle_list_intent(&mut self, intent: ListIntent) {
        match intent {
            ListIntent::EditSubQuestion {
                question_id,
                sub_question_index,
            } => self.show_sub_question_edit_window(question_id, sub_question_index),
            ListIntent::Refresh => self.load_questions(),
            ListIntent::Logout => {
                info!("用户退出登录");
                self.show_login_window();
            }
            ListIntent::Quit => self.quit(),
        }
    }

    fn handle_editor_intent(&mut self, intent: EditorIntent) {
        let ActiveWindow::Editor(editor) = &mut self.window else {
            return;
        };

        match intent {
            EditorIntent::Back => self.show_question_list_window(),
            EditorIntent::NavigateQuestion { question_id } => {
                self.show_sub_question_edit_window(question_id, 0)
            }
            EditorIntent::ReloadQuestion { question_id } => self.load_question_data(question_id),
            EditorIntent::LoadImage { image_id } => {
                editor.show_loading_state();
                self.submit(Operation::LoadImage { image_id });
            }
            EditorIntent::UploadImage {
                file_path,
                target,
                sub_question_id,
                description,
            } => {
                editor.show_uploading_state();
                self.submit(Operation::UploadImage {
                    file_path,
                    target,
                    sub_question_id,
                    description,
                });
            }
            EditorIntent::ApproveQuestion { question_id } => {
                editor.show_loading_state();
                self.submit(Operation::ApproveQuestion { question_id });
            }
            EditorIntent::DeleteQuestion { question_id } => {
                editor.show_loading_state();
                self.submit(Operation::DeleteQuestion { question_id });
            }
            EditorIntent::Save { draft } => {
                editor.show_saving_state();
                self.submit(Operation::SaveSubQuestion { draft });
            }
        }
    }

    fn quit(&mut self) {
        info!("用户请求退出");
        self.should_quit = true;
    }

    // ========== 结果处理 ==========

    /// 非阻塞地处理所有已到达的结果
    ///
    /// # 返回
    /// 处理的结果数量（包括丢弃的）
    pub fn poll_outcomes(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.outcome_rx.try_recv() {
                Ok(outcome) => {
                    self.apply_outcome(outcome);
                    count += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("⚠️ 结果通道已关闭");
                    break;
                }
            }
        }
        self.pump();
        count
    }

    /// 等待下一个结果并处理
    pub async fn wait_outcome(&mut self) -> Option<OutcomeDisposition> {
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply_outcome(outcome))
    }

    fn apply_outcome(&mut self, outcome: Outcome) -> OutcomeDisposition {
        let disposition = self.handle_outcome(outcome);
        self.process_intents();
        self.pump();
        disposition
    }

    /// 把结果交给当前窗口，过期结果直接丢弃
    pub fn handle_outcome(&mut self, outcome: Outcome) -> OutcomeDisposition {
        if outcome.generation != self.generation {
            debug!(
                "丢弃过期结果 {} (代数 {}，当前 {})",
                outcome.kind(),
                outcome.generation.0,
                self.generation.0
            );
            return OutcomeDisposition::Dropped;
        }

        let kind = outcome.kind();
        let disposition = match outcome.completion {
            Completion::Login(result) => self.on_login_finished(result),
            Completion::QuestionsLoaded(result) => match &mut self.window {
                ActiveWindow::List(list) => {
                    match result {
                        Ok(questions) => {
                            info!("✓ 加载了 {} 道题目", questions.len());
                            list.populate_list(questions);
                        }
                        Err(message) => list.show_error("Failed to load questions", &message),
                    }
                    OutcomeDisposition::Applied
                }
                _ => OutcomeDisposition::Dropped,
            },
            Completion::QuestionLoaded {
                question_id,
                result,
            } => match &mut self.window {
                ActiveWindow::Editor(editor) if editor.question_id() == question_id => {
                    editor.finish_loading_state();
                    match result {
                        Ok(question) => editor.set_question_data(question),
                        Err(message) => editor.show_error("Failed to load question", &message),
                    }
                    OutcomeDisposition::Applied
                }
                _ => OutcomeDisposition::Dropped,
            },
            Completion::ImageLoaded { image_id, result } => match &mut self.window {
                ActiveWindow::Editor(editor) => {
                    editor.finish_loading_state();
                    match result {
                        Ok(image) => {
                            if editor.set_image(image_id, image.bytes, image.description) {
                                OutcomeDisposition::Applied
                            } else {
                                OutcomeDisposition::Dropped
                            }
                        }
                        Err(message) => {
                            editor.show_error("Failed to load image", &message);
                            OutcomeDisposition::Applied
                        }
                    }
                }
                _ => OutcomeDisposition::Dropped,
            },
            Completion::ImageUploaded {
                sub_question_id,
                result,
            } => match &mut self.window {
                ActiveWindow::Editor(editor) => {
                    editor.finish_loading_state();
                    let current = editor.current_sub_question().map(|s| s.id);
                    match result {
                        Ok(image_id) if current == Some(sub_question_id) => {
                            editor.on_image_uploaded(image_id);
                            OutcomeDisposition::Applied
                        }
                        Ok(image_id) => {
                            debug!("图片 {} 上传完成，但小题 {} 已不在编辑中", image_id, sub_question_id);
                            OutcomeDisposition::Dropped
                        }
                        Err(message) => {
                            editor.show_error("Failed to upload image", &message);
                            OutcomeDisposition::Applied
                        }
                    }
                }
                _ => OutcomeDisposition::Dropped,
            },
            Completion::QuestionApproved {
                question_id,
                result,
            } => match &mut self.window {
                ActiveWindow::Editor(editor) => {
                    match result {
                        Ok(()) => editor.on_question_approved(question_id),
                        Err(message) => editor.show_error("Failed to approve question", &message),
                    }
                    OutcomeDisposition::Applied
                }
                _ => OutcomeDisposition::Dropped,
            },
            Completion::QuestionDeleted {
                question_id,
                result,
            } => match &mut self.window {
                ActiveWindow::Editor(editor) => {
                    match result {
                        Ok(()) => editor.on_question_deleted(question_id),
                        Err(message) => editor.show_error("Failed to delete question", &message),
                    }
                    OutcomeDisposition::Applied
                }
                _ => OutcomeDisposition::Dropped,
            },
            Completion::SubQuestionSaved(result) => match &mut self.window {
                ActiveWindow::Editor(editor) => {
                    match result {
                        Ok(draft) => {
                            info!("✓ 小题 {} 已保存", draft.sub_question_id);
                            editor.on_save_success();
                        }
                        Err(message) => editor.on_save_error(&message),
                    }
                    OutcomeDisposition::Applied
                }
                _ => OutcomeDisposition::Dropped,
            },
        };

        if disposition == OutcomeDisposition::Dropped {
            debug!("结果 {} 与当前窗口无关，已丢弃", kind);
        }
        disposition
    }

    fn on_login_finished(&mut self, result: Result<(), String>) -> OutcomeDisposition {
        let ActiveWindow::Login(login) = &mut self.window else {
            return OutcomeDisposition::Dropped;
        };

        match result {
            Ok(()) => {
                info!("✓ 登录成功");
                self.show_question_list_window();
            }
            Err(message) => {
                warn!("⚠️ 登录失败: {}", message);
                login.on_login_failed(&message);
            }
        }
        OutcomeDisposition::Applied
    }

    // ========== 界面刷新 ==========

    /// 一次界面刷新：处理意图、收取结果、清理过期提示条
    pub fn tick(&mut self, now: Instant) {
        self.process_intents();
        self.poll_outcomes();
        self.window.expire_notification(now);
    }

    // ========== 查询 ==========

    pub fn state(&self) -> AppState {
        self.window.state()
    }

    pub fn window(&self) -> &ActiveWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut ActiveWindow {
        &mut self.window
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    /// 排队中尚未启动的请求数
    pub fn queued_requests(&self) -> usize {
        self.queue.len()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
