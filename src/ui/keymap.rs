//! 按键映射
//!
//! 把终端按键翻译为窗口方法调用，窗口再产生意图交给控制器

use crate::controller::ActiveWindow;
use crate::views::{EditorField, LoginField, LoginWindow, QuestionListWindow, SubQuestionEditWindow, Window};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// 处理一次按键
pub fn handle_key(window: &mut ActiveWindow, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match window {
        ActiveWindow::Login(w) => handle_login_key(w, key),
        ActiveWindow::List(w) => handle_list_key(w, key),
        ActiveWindow::Editor(w) => handle_editor_key(w, key),
    }
}

fn handle_login_key(w: &mut LoginWindow, key: KeyEvent) {
    match key.code {
        KeyCode::Esc if w.notification().is_some() => w.dismiss_notification(),
        KeyCode::Esc => w.cancel(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => w.cancel(),
        KeyCode::Tab | KeyCode::Down => w.focus_next(),
        KeyCode::BackTab | KeyCode::Up => w.focus_prev(),
        KeyCode::Enter if w.focus() == LoginField::Remember => w.toggle_remember(),
        KeyCode::Enter => w.submit(),
        KeyCode::Backspace => w.backspace(),
        KeyCode::Char(c) => w.input_char(c),
        _ => {}
    }
}

fn handle_list_key(w: &mut QuestionListWindow, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => w.quit(),
            KeyCode::Char('l') => w.logout(),
            KeyCode::Char('r') => w.refresh(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => w.dismiss_notification(),
        KeyCode::F(5) => w.refresh(),
        KeyCode::Up => w.select_prev(),
        KeyCode::Down => w.select_next(),
        KeyCode::Left | KeyCode::PageUp => w.prev_page(),
        KeyCode::Right | KeyCode::PageDown => w.next_page(),
        KeyCode::Enter => w.open_selected(),
        KeyCode::Backspace => w.pop_filter_char(),
        KeyCode::Char(c) => w.push_filter_char(c),
        _ => {}
    }
}

fn handle_editor_key(w: &mut SubQuestionEditWindow, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => w.save(),
            KeyCode::Char('b') | KeyCode::Char('c') => w.back(),
            KeyCode::Char('p') => w.prev_sub_question(),
            KeyCode::Char('n') => w.next_sub_question(),
            KeyCode::Char('a') => w.approve(),
            KeyCode::Char('d') => w.delete(),
            KeyCode::Char('u') => w.submit_upload_path(),
            KeyCode::Char('r') => w.remove_image(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => w.dismiss_notification(),
        KeyCode::Tab => w.focus_next(),
        KeyCode::BackTab => w.focus_prev(),
        KeyCode::PageUp => w.prev_question(),
        KeyCode::PageDown => w.next_question(),
        KeyCode::Left => w.cycle_prev(),
        KeyCode::Right => w.cycle_next(),
        KeyCode::Enter => match w.focus() {
            EditorField::UploadPath => w.submit_upload_path(),
            field if field.is_multiline() => w.input_newline(),
            _ => w.focus_next(),
        },
        KeyCode::Backspace => w.backspace(),
        KeyCode::Char(c) => w.input_char(c),
        _ => {}
    }
}
