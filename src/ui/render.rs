//! 窗口绘制
//!
//! 每个窗口一个 Widget，只读取窗口状态，不修改

use crate::controller::ActiveWindow;
use crate::views::{
    EditorField, LoginField, LoginWindow, Notification, NotificationLevel, QuestionListWindow,
    SubQuestionEditWindow, Window,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget, Wrap},
    Frame,
};

/// 绘制当前窗口
pub fn draw(frame: &mut Frame, window: &ActiveWindow) {
    let area = frame.area();
    match window {
        ActiveWindow::Login(w) => frame.render_widget(LoginView::new(w), area),
        ActiveWindow::List(w) => frame.render_widget(QuestionListView::new(w), area),
        ActiveWindow::Editor(w) => frame.render_widget(EditorView::new(w), area),
    }
}

fn level_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => Color::Cyan,
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Warning => Color::Yellow,
        NotificationLevel::Error => Color::Red,
    }
}

fn key_hint<'a>(key: &'a str, action: &'a str) -> Vec<Span<'a>> {
    vec![
        Span::styled(key, Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {}  ", action)),
    ]
}

fn focus_style(focused: bool, enabled: bool) -> Style {
    match (focused, enabled) {
        (_, false) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        (false, true) => Style::default(),
    }
}

/// 顶部提示条和忙碌提示
struct StatusLineView<'a> {
    notification: Option<&'a Notification>,
    busy_label: Option<&'a str>,
}

impl Widget for StatusLineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match (self.notification, self.busy_label) {
            (Some(n), _) => Line::from(vec![
                Span::styled(
                    format!("{}: ", n.title),
                    Style::default()
                        .fg(level_color(n.level))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(n.message.as_str(), Style::default().fg(level_color(n.level))),
                Span::styled("  [Esc]", Style::default().fg(Color::DarkGray)),
            ]),
            (None, Some(label)) => Line::from(Span::styled(
                format!("⏳ {}...", label),
                Style::default().fg(Color::Yellow),
            )),
            (None, None) => Line::default(),
        };
        Paragraph::new(line).render(area, buf);
    }
}

fn status_line<W: Window>(window: &W) -> StatusLineView<'_> {
    StatusLineView {
        notification: window.notification(),
        busy_label: window.busy_label(),
    }
}

// ========== 登录窗口 ==========

pub struct LoginView<'a> {
    window: &'a LoginWindow,
}

impl<'a> LoginView<'a> {
    pub fn new(window: &'a LoginWindow) -> Self {
        Self { window }
    }
}

impl Widget for LoginView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let w = self.window;
        let enabled = w.form_enabled();

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(9),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
        status_line(w).render(rows[0], buf);

        let form_area = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(50),
            Constraint::Min(0),
        ])
        .split(rows[2])[1];

        let block = Block::default()
            .title(" Nanoko Audition Login ")
            .borders(Borders::ALL);
        let inner = block.inner(form_area);
        block.render(form_area, buf);

        let masked = "*".repeat(w.password().chars().count());
        let remember = if w.remember() { "[x]" } else { "[ ]" };
        let lines = vec![
            Line::from(vec![
                Span::raw("Username: "),
                Span::styled(
                    w.username(),
                    focus_style(w.focus() == LoginField::Username, enabled),
                ),
            ]),
            Line::default(),
            Line::from(vec![
                Span::raw("Password: "),
                Span::styled(masked, focus_style(w.focus() == LoginField::Password, enabled)),
            ]),
            Line::default(),
            Line::from(Span::styled(
                format!("{} Remember password", remember),
                focus_style(w.focus() == LoginField::Remember, enabled),
            )),
        ];
        Paragraph::new(lines).render(inner, buf);

        let mut hints = key_hint("Tab", "next field");
        hints.extend(key_hint("Enter", "login"));
        hints.extend(key_hint("Space", "toggle remember"));
        hints.extend(key_hint("Esc", "quit"));
        Paragraph::new(Line::from(hints)).render(rows[4], buf);
    }
}

// ========== 题目列表窗口 ==========

pub struct QuestionListView<'a> {
    window: &'a QuestionListWindow,
}

impl<'a> QuestionListView<'a> {
    pub fn new(window: &'a QuestionListWindow) -> Self {
        Self { window }
    }
}

impl Widget for QuestionListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let w = self.window;

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);
        status_line(w).render(rows[0], buf);

        Paragraph::new(w.filter())
            .block(
                Block::default()
                    .title(" Search (source / id / yes / no) ")
                    .borders(Borders::ALL),
            )
            .render(rows[1], buf);

        let header = Row::new(["ID", "Source", "Audited", "Deleted", "Sub-questions"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let table_rows: Vec<Row> = w
            .visible_rows()
            .into_iter()
            .map(|q| {
                let audited = if q.is_audited {
                    Cell::from("yes").style(Style::default().fg(Color::Green))
                } else {
                    Cell::from("no").style(Style::default().fg(Color::Red))
                };
                let deleted = if q.is_deleted {
                    Cell::from("deleted").style(Style::default().fg(Color::Red))
                } else {
                    Cell::from("-")
                };
                Row::new(vec![
                    Cell::from(q.id.to_string()),
                    Cell::from(q.source.as_str()),
                    audited,
                    deleted,
                    Cell::from(q.sub_question_summary()),
                ])
            })
            .collect();

        let title = format!(
            " Questions - page {} / {} ({} matching) ",
            w.current_page(),
            w.total_pages(),
            w.filtered_questions().len()
        );
        let table = Table::new(
            table_rows,
            [
                Constraint::Length(8),
                Constraint::Min(20),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(w.selected_row()));
        StatefulWidget::render(table, rows[2], buf, &mut state);

        let mut hints = key_hint("↑/↓", "select");
        hints.extend(key_hint("Enter", "edit"));
        if w.has_prev_page() {
            hints.extend(key_hint("←", "prev page"));
        }
        if w.has_next_page() {
            hints.extend(key_hint("→", "next page"));
        }
        hints.extend(key_hint("F5", "refresh"));
        hints.extend(key_hint("Ctrl+L", "logout"));
        hints.extend(key_hint("Ctrl+Q", "quit"));
        Paragraph::new(Line::from(hints)).render(rows[3], buf);
    }
}

// ========== 小题编辑窗口 ==========

pub struct EditorView<'a> {
    window: &'a SubQuestionEditWindow,
}

impl<'a> EditorView<'a> {
    pub fn new(window: &'a SubQuestionEditWindow) -> Self {
        Self { window }
    }

    fn field_block(&self, field: EditorField) -> Block<'static> {
        let w = self.window;
        Block::default()
            .title(format!(" {} ", field.label()))
            .borders(Borders::ALL)
            .border_style(focus_style(w.focus() == field, w.form_enabled()))
    }

    fn text_field(&self, field: EditorField, text: &str, area: Rect, buf: &mut Buffer) {
        Paragraph::new(text.to_string())
            .wrap(Wrap { trim: false })
            .block(self.field_block(field))
            .render(area, buf);
    }
}

impl Widget for EditorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let w = self.window;
        let form = w.form();

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);
        status_line(w).render(rows[0], buf);

        let (source, audited, deleted) = match w.question() {
            Some(q) => (
                q.source.as_str(),
                if q.is_audited { "yes" } else { "no" },
                if q.is_deleted { "yes" } else { "no" },
            ),
            None => ("-", "-", "-"),
        };
        let sub_id = w
            .current_sub_question()
            .map_or("-".to_string(), |s| s.id.to_string());
        let header = vec![
            Line::from(Span::styled(
                w.title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Question #{}  Sub-question #{}  Source: {}  Audited: {}  Deleted: {}",
                w.question_id(),
                sub_id,
                source,
                audited,
                deleted
            )),
        ];
        Paragraph::new(header).render(rows[1], buf);

        if let Some(message) = w.load_error() {
            Paragraph::new(Span::styled(message, Style::default().fg(Color::Red)))
                .block(Block::default().borders(Borders::ALL))
                .render(rows[2], buf);
        } else {
            let columns = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(rows[2]);

            let left = Layout::vertical([
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(columns[0]);
            self.text_field(EditorField::QuestionName, &form.question_name, left[0], buf);
            self.text_field(EditorField::Description, &form.description, left[1], buf);
            self.text_field(EditorField::Answer, &form.answer, left[2], buf);

            let classes = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(left[3]);
            self.text_field(EditorField::Concept, &format!("◂ {} ▸", form.concept.name()), classes[0], buf);
            self.text_field(EditorField::Process, &format!("◂ {} ▸", form.process.name()), classes[1], buf);
            self.text_field(EditorField::Keywords, &form.keywords, left[4], buf);

            let right = Layout::vertical([
                Constraint::Min(4),
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(3),
            ])
            .split(columns[1]);
            self.text_field(EditorField::Options, &form.options, right[0], buf);

            let image = match (form.image_id, &form.image_preview) {
                (None, _) => "no image".to_string(),
                (Some(id), None) => format!("image #{} (loading)", id),
                (Some(id), Some(bytes)) => format!("image #{} ({} bytes)", id, bytes.len()),
            };
            Paragraph::new(image)
                .block(Block::default().title(" Image ").borders(Borders::ALL))
                .render(right[1], buf);
            self.text_field(EditorField::ImageDescription, &form.image_description, right[2], buf);
            self.text_field(EditorField::UploadPath, &form.upload_path, right[3], buf);
        }

        let mut hints = key_hint("Tab", "field");
        hints.extend(key_hint("Ctrl+S", "save"));
        if w.has_prev_sub_question() {
            hints.extend(key_hint("Ctrl+P", "prev sub"));
        }
        if w.has_next_sub_question() {
            hints.extend(key_hint("Ctrl+N", "next sub"));
        }
        if w.has_prev_question() {
            hints.extend(key_hint("PgUp", "prev question"));
        }
        hints.extend(key_hint("PgDn", "next question"));
        if w.can_approve() {
            hints.extend(key_hint("Ctrl+A", "approve"));
        }
        if w.can_delete() {
            hints.extend(key_hint("Ctrl+D", "delete"));
        }
        hints.extend(key_hint("Ctrl+U", "upload"));
        if form.image_id.is_some() {
            hints.extend(key_hint("Ctrl+R", "remove image"));
        }
        hints.extend(key_hint("Ctrl+B", "back"));
        Paragraph::new(Line::from(hints)).render(rows[3], buf);
    }
}
