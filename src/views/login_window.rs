//! 登录窗口

use super::{NotificationLevel, Window, WindowStatus};
use crate::services::credentials::{clear_remembered, load_remembered, save_remembered};
use crate::services::CredentialStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// 登录窗口的输入焦点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
    Remember,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Remember,
            LoginField::Remember => LoginField::Username,
        }
    }

    fn prev(self) -> Self {
        match self {
            LoginField::Username => LoginField::Remember,
            LoginField::Password => LoginField::Username,
            LoginField::Remember => LoginField::Password,
        }
    }
}

/// 登录窗口发出的意图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIntent {
    Login { username: String, password: String },
    Quit,
}

pub struct LoginWindow {
    username: String,
    password: String,
    remember: bool,
    focus: LoginField,
    status: WindowStatus,
    store: Arc<dyn CredentialStore>,
    intents: Vec<LoginIntent>,
}

impl LoginWindow {
    /// 创建登录窗口，并读取记住的凭据（读取失败时忽略）
    pub fn new(store: Arc<dyn CredentialStore>, notification_lifetime: Duration) -> Self {
        let mut window = Self {
            username: String::new(),
            password: String::new(),
            remember: false,
            focus: LoginField::Username,
            status: WindowStatus::new(notification_lifetime),
            store,
            intents: Vec::new(),
        };

        match load_remembered(window.store.as_ref()) {
            Ok(Some(remembered)) => {
                window.username = remembered.username;
                window.password = remembered.password;
                window.remember = true;
                window.focus = LoginField::Password;
            }
            Ok(None) => {}
            Err(e) => debug!("读取记住的凭据失败，忽略: {}", e),
        }

        window
    }

    /// 提交登录
    pub fn submit(&mut self) {
        if !self.form_enabled() {
            return;
        }

        if self.username.is_empty() || self.password.is_empty() {
            self.status.notify(
                NotificationLevel::Error,
                "Error",
                "Please enter both username and password",
            );
            return;
        }

        if self.remember {
            if let Err(e) = save_remembered(self.store.as_ref(), &self.username, &self.password) {
                warn!("⚠️ 保存凭据失败: {}", e);
                self.status.notify(
                    NotificationLevel::Warning,
                    "Warning",
                    "Could not save credentials",
                );
            }
        } else if let Err(e) = clear_remembered(self.store.as_ref()) {
            debug!("清除凭据失败，忽略: {}", e);
        }

        self.show_loading_state();
        self.intents.push(LoginIntent::Login {
            username: self.username.clone(),
            password: self.password.clone(),
        });
    }

    /// 登录失败：显示错误并解锁表单
    pub fn on_login_failed(&mut self, message: &str) {
        self.show_error("Error", message);
    }

    pub fn cancel(&mut self) {
        self.intents.push(LoginIntent::Quit);
    }

    // ========== 表单编辑 ==========

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn input_char(&mut self, c: char) {
        if !self.form_enabled() {
            return;
        }
        match self.focus {
            LoginField::Username => self.username.push(c),
            LoginField::Password => self.password.push(c),
            LoginField::Remember => {
                if c == ' ' {
                    self.remember = !self.remember;
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        if !self.form_enabled() {
            return;
        }
        match self.focus {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
            LoginField::Remember => {}
        }
    }

    pub fn toggle_remember(&mut self) {
        if self.form_enabled() {
            self.remember = !self.remember;
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_remember(&mut self, remember: bool) {
        self.remember = remember;
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn remember(&self) -> bool {
        self.remember
    }

    pub fn focus(&self) -> LoginField {
        self.focus
    }
}

impl Window for LoginWindow {
    type Intent = LoginIntent;

    fn status(&self) -> &WindowStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut WindowStatus {
        &mut self.status
    }

    fn take_intents(&mut self) -> Vec<LoginIntent> {
        std::mem::take(&mut self.intents)
    }

    fn loading_label(&self) -> &'static str {
        "Logging in"
    }
}
