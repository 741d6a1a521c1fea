//! 窗口层（View Layer）
//!
//! ## 职责
//!
//! 每个窗口只是一个视图模型：保存表单数据，把用户操作记录为意图（intent），
//! 控制器通过一组固定方法把结果推回窗口。窗口不直接访问 API。
//!
//! ## 公共协议
//!
//! - `show_loading_state()` / `finish_loading_state()`：忙碌提示和表单锁定
//! - `show_error(title, message)`：错误提示条，同时解锁表单
//! - `dismiss_notification()` / `expire_notification()`：提示条的手动和自动关闭
//! - `take_intents()`：控制器取走窗口产生的意图

pub mod login_window;
pub mod question_list_window;
pub mod sub_question_edit_window;

pub use login_window::{LoginField, LoginIntent, LoginWindow};
pub use question_list_window::{ListIntent, QuestionListWindow};
pub use sub_question_edit_window::{EditorField, EditorIntent, SubQuestionEditWindow};

use std::time::{Duration, Instant};

/// 提示条级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 短暂显示的提示条
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    shown_at: Instant,
    lifetime: Duration,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        lifetime: Duration,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            shown_at: Instant::now(),
            lifetime,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.lifetime
    }
}

/// 窗口共用的显示状态
#[derive(Debug, Clone)]
pub struct WindowStatus {
    busy_label: Option<String>,
    form_enabled: bool,
    notification: Option<Notification>,
    notification_lifetime: Duration,
}

impl WindowStatus {
    pub fn new(notification_lifetime: Duration) -> Self {
        Self {
            busy_label: None,
            form_enabled: true,
            notification: None,
            notification_lifetime,
        }
    }

    /// 显示忙碌提示并锁定表单
    pub fn show_loading(&mut self, label: impl Into<String>) {
        self.busy_label = Some(label.into());
        self.form_enabled = false;
    }

    /// 关闭忙碌提示并解锁表单
    pub fn finish_loading(&mut self) {
        self.busy_label = None;
        self.form_enabled = true;
    }

    pub fn notify(
        &mut self,
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.notification = Some(Notification::new(
            level,
            title,
            message,
            self.notification_lifetime,
        ));
    }

    /// 错误提示：关闭忙碌状态，解锁表单以便重试
    pub fn show_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.finish_loading();
        self.notify(NotificationLevel::Error, title, message);
    }

    pub fn dismiss(&mut self) {
        self.notification = None;
    }

    /// 移除已过期的提示条
    pub fn expire(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
        }
    }

    pub fn busy_label(&self) -> Option<&str> {
        self.busy_label.as_deref()
    }

    pub fn form_enabled(&self) -> bool {
        self.form_enabled
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }
}

/// 控制器与窗口之间的公共协议
pub trait Window {
    /// 意图类型
    type Intent;

    fn status(&self) -> &WindowStatus;
    fn status_mut(&mut self) -> &mut WindowStatus;

    /// 取走窗口积累的意图
    fn take_intents(&mut self) -> Vec<Self::Intent>;

    /// 忙碌提示使用的文字
    fn loading_label(&self) -> &'static str {
        "Loading"
    }

    fn show_loading_state(&mut self) {
        let label = self.loading_label();
        self.status_mut().show_loading(label);
    }

    fn finish_loading_state(&mut self) {
        self.status_mut().finish_loading();
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.status_mut().show_error(title, message);
    }

    fn form_enabled(&self) -> bool {
        self.status().form_enabled()
    }

    fn busy_label(&self) -> Option<&str> {
        self.status().busy_label()
    }

    fn notification(&self) -> Option<&Notification> {
        self.status().notification()
    }

    fn dismiss_notification(&mut self) {
        self.status_mut().dismiss();
    }

    fn expire_notification(&mut self, now: Instant) {
        self.status_mut().expire(now);
    }
}
