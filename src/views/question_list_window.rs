//! 题目列表窗口
//!
//! 本地搜索过滤和固定页大小分页，数据或过滤条件变化时重新计算分页

use super::{Window, WindowStatus};
use crate::models::{Question, QuestionId};
use std::time::Duration;

/// 列表窗口发出的意图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIntent {
    EditSubQuestion {
        question_id: QuestionId,
        sub_question_index: usize,
    },
    Refresh,
    Logout,
    Quit,
}

pub struct QuestionListWindow {
    questions: Vec<Question>,
    /// 过滤后的题目在 `questions` 中的下标
    filtered: Vec<usize>,
    filter: String,
    page_size: usize,
    /// 从 1 开始
    current_page: usize,
    /// 当前页内的选中行
    selected_row: usize,
    status: WindowStatus,
    intents: Vec<ListIntent>,
}

impl QuestionListWindow {
    pub fn new(page_size: usize, notification_lifetime: Duration) -> Self {
        Self {
            questions: Vec::new(),
            filtered: Vec::new(),
            filter: String::new(),
            page_size: page_size.max(1),
            current_page: 1,
            selected_row: 0,
            status: WindowStatus::new(notification_lifetime),
            intents: Vec::new(),
        }
    }

    /// 填充题目列表
    ///
    /// 保留当前过滤条件，页码夹紧到新的总页数内
    pub fn populate_list(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.apply_filter();
        self.clamp_page();
        self.finish_loading_state();
    }

    /// 设置搜索文本，总是回到第一页
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.apply_filter();
        self.current_page = 1;
        self.selected_row = 0;
    }

    pub fn push_filter_char(&mut self, c: char) {
        let mut text = self.filter.clone();
        text.push(c);
        self.set_filter(text);
    }

    pub fn pop_filter_char(&mut self) {
        let mut text = self.filter.clone();
        if text.pop().is_some() {
            self.set_filter(text);
        }
    }

    fn apply_filter(&mut self) {
        let needle = self.filter.trim().to_lowercase();
        self.filtered = self
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| needle.is_empty() || matches_filter(q, &needle))
            .map(|(i, _)| i)
            .collect();
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
        let rows = self.visible_rows().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    // ========== 分页 ==========

    /// 总页数，至少为 1
    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn prev_page(&mut self) {
        if self.has_prev_page() {
            self.current_page -= 1;
            self.selected_row = 0;
        }
    }

    pub fn next_page(&mut self) {
        if self.has_next_page() {
            self.current_page += 1;
            self.selected_row = 0;
        }
    }

    /// 当前页显示的题目
    pub fn visible_rows(&self) -> Vec<&Question> {
        let start = (self.current_page - 1) * self.page_size;
        self.filtered
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.questions[i])
            .collect()
    }

    /// 过滤后的全部题目
    pub fn filtered_questions(&self) -> Vec<&Question> {
        self.filtered.iter().map(|&i| &self.questions[i]).collect()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    // ========== 选择与意图 ==========

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn select_next(&mut self) {
        let rows = self.visible_rows().len();
        if self.selected_row + 1 < rows {
            self.selected_row += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn selected_question(&self) -> Option<&Question> {
        self.visible_rows().get(self.selected_row).copied()
    }

    /// 打开选中的题目，没有小题的题目不会打开
    pub fn open_selected(&mut self) {
        if !self.form_enabled() {
            return;
        }
        let Some(question) = self.selected_question() else {
            return;
        };
        if question.sub_questions.is_empty() {
            return;
        }
        let question_id = question.id;
        self.intents.push(ListIntent::EditSubQuestion {
            question_id,
            sub_question_index: 0,
        });
    }

    pub fn refresh(&mut self) {
        if self.form_enabled() {
            self.intents.push(ListIntent::Refresh);
        }
    }

    pub fn logout(&mut self) {
        self.intents.push(ListIntent::Logout);
    }

    pub fn quit(&mut self) {
        self.intents.push(ListIntent::Quit);
    }
}

impl Window for QuestionListWindow {
    type Intent = ListIntent;

    fn status(&self) -> &WindowStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut WindowStatus {
        &mut self.status
    }

    fn take_intents(&mut self) -> Vec<ListIntent> {
        std::mem::take(&mut self.intents)
    }
}

/// 搜索匹配：来源、题号、审核状态（yes/no），不区分大小写
fn matches_filter(question: &Question, needle: &str) -> bool {
    let audited = if question.is_audited { "yes" } else { "no" };
    question.source.to_lowercase().contains(needle)
        || question.id.to_string().contains(needle)
        || audited.contains(needle)
}
