//! 控制器状态

use crate::models::QuestionId;
use crate::views::{LoginWindow, QuestionListWindow, SubQuestionEditWindow, Window};
use std::time::Instant;

/// 应用状态，同一时刻只处于其中一个
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    LoggedOut,
    Listing,
    Editing {
        question_id: QuestionId,
        sub_question_index: usize,
    },
}

/// 当前显示的窗口
///
/// 替换窗口时旧窗口随之销毁
pub enum ActiveWindow {
    Login(LoginWindow),
    List(QuestionListWindow),
    Editor(SubQuestionEditWindow),
}

impl ActiveWindow {
    pub fn state(&self) -> AppState {
        match self {
            ActiveWindow::Login(_) => AppState::LoggedOut,
            ActiveWindow::List(_) => AppState::Listing,
            ActiveWindow::Editor(editor) => AppState::Editing {
                question_id: editor.question_id(),
                sub_question_index: editor.sub_question_index(),
            },
        }
    }

    pub fn expire_notification(&mut self, now: Instant) {
        match self {
            ActiveWindow::Login(w) => w.expire_notification(now),
            ActiveWindow::List(w) => w.expire_notification(now),
            ActiveWindow::Editor(w) => w.expire_notification(now),
        }
    }

    pub fn dismiss_notification(&mut self) {
        match self {
            ActiveWindow::Login(w) => w.dismiss_notification(),
            ActiveWindow::List(w) => w.dismiss_notification(),
            ActiveWindow::Editor(w) => w.dismiss_notification(),
        }
    }

    pub fn as_login(&self) -> Option<&LoginWindow> {
        match self {
            ActiveWindow::Login(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&QuestionListWindow> {
        match self {
            ActiveWindow::List(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_editor(&self) -> Option<&SubQuestionEditWindow> {
        match self {
            ActiveWindow::Editor(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_login_mut(&mut self) -> Option<&mut LoginWindow> {
        match self {
            ActiveWindow::Login(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut QuestionListWindow> {
        match self {
            ActiveWindow::List(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_editor_mut(&mut self) -> Option<&mut SubQuestionEditWindow> {
        match self {
            ActiveWindow::Editor(w) => Some(w),
            _ => None,
        }
    }
}

/// 结果的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeDisposition {
    /// 已交给当前窗口
    Applied,
    /// 过期或与当前窗口无关，已丢弃
    Dropped,
}
