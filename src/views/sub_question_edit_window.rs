//! 小题编辑窗口
//!
//! ## 状态
//!
//! - `question`: 最近一次加载的题目快照，只有审核/删除的本地翻转会修改它
//! - `form`: 当前小题的可编辑表单，切换小题时丢弃并重新填充
//! - `sub_question_index`: 小题导航游标，始终在快照的小题范围内

use super::{NotificationLevel, Window, WindowStatus};
use crate::error::BusinessError;
use crate::models::{
    join_keywords, join_options, parse_keywords, parse_options, ConceptType, ImageId, ImageTarget,
    ProcessType, Question, QuestionId, SubQuestion, SubQuestionDraft, SubQuestionId,
};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// 编辑窗口的输入焦点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    QuestionName,
    Description,
    Answer,
    Concept,
    Process,
    Keywords,
    Options,
    ImageDescription,
    UploadPath,
}

impl EditorField {
    const ORDER: [EditorField; 9] = [
        EditorField::QuestionName,
        EditorField::Description,
        EditorField::Answer,
        EditorField::Concept,
        EditorField::Process,
        EditorField::Keywords,
        EditorField::Options,
        EditorField::ImageDescription,
        EditorField::UploadPath,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// 是否为多行文本
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            EditorField::Description
                | EditorField::Answer
                | EditorField::Options
                | EditorField::ImageDescription
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            EditorField::QuestionName => "Name",
            EditorField::Description => "Description",
            EditorField::Answer => "Answer",
            EditorField::Concept => "Concept",
            EditorField::Process => "Process",
            EditorField::Keywords => "Keywords",
            EditorField::Options => "Options",
            EditorField::ImageDescription => "Image description",
            EditorField::UploadPath => "Upload image",
        }
    }
}

/// 编辑窗口发出的意图
#[derive(Debug, Clone, PartialEq)]
pub enum EditorIntent {
    Back,
    NavigateQuestion {
        question_id: QuestionId,
    },
    ReloadQuestion {
        question_id: QuestionId,
    },
    LoadImage {
        image_id: ImageId,
    },
    UploadImage {
        file_path: PathBuf,
        target: ImageTarget,
        sub_question_id: SubQuestionId,
        description: String,
    },
    ApproveQuestion {
        question_id: QuestionId,
    },
    DeleteQuestion {
        question_id: QuestionId,
    },
    Save {
        draft: SubQuestionDraft,
    },
}

/// 当前小题的表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorForm {
    pub question_name: String,
    pub description: String,
    pub answer: String,
    pub concept: ConceptType,
    pub process: ProcessType,
    pub keywords: String,
    pub options: String,
    /// 移除图片后为 None
    pub image_id: Option<ImageId>,
    pub image_description: String,
    /// 已加载的图片内容
    pub image_preview: Option<Vec<u8>>,
    pub upload_path: String,
}

pub struct SubQuestionEditWindow {
    question_id: QuestionId,
    sub_question_index: usize,
    question: Option<Question>,
    form: EditorForm,
    /// 图片描述是否已从服务端加载，未加载时草稿不携带描述
    image_description_loaded: bool,
    focus: EditorField,
    load_error: Option<String>,
    status: WindowStatus,
    intents: Vec<EditorIntent>,
}

impl SubQuestionEditWindow {
    pub fn new(question_id: QuestionId, sub_question_index: usize, notification_lifetime: Duration) -> Self {
        Self {
            question_id,
            sub_question_index,
            question: None,
            form: EditorForm::default(),
            image_description_loaded: false,
            focus: EditorField::QuestionName,
            load_error: None,
            status: WindowStatus::new(notification_lifetime),
            intents: Vec::new(),
        }
    }

    pub fn show_saving_state(&mut self) {
        self.status.show_loading("Saving");
    }

    pub fn show_uploading_state(&mut self) {
        self.status.show_loading("Uploading");
    }

    // ========== 数据填充 ==========

    /// 设置题目快照
    ///
    /// 保留导航游标（夹紧到范围内），没有小题时视为加载错误
    pub fn set_question_data(&mut self, question: Question) {
        self.question_id = question.id;
        let count = question.sub_questions.len();
        self.question = Some(question);
        self.finish_loading_state();

        if count == 0 {
            self.sub_question_index = 0;
            self.form = EditorForm::default();
            self.image_description_loaded = false;
            let message = BusinessError::EmptySubQuestions.to_string();
            self.load_error = Some(message.clone());
            self.show_error("Error", &message);
            return;
        }

        self.load_error = None;
        self.sub_question_index = self.sub_question_index.min(count - 1);
        self.populate_form();
    }

    /// 用当前小题重新填充表单，有图片时请求加载
    fn populate_form(&mut self) {
        let Some(question) = &self.question else {
            return;
        };
        let Some(sub) = question.sub_questions.get(self.sub_question_index) else {
            return;
        };

        self.form = EditorForm {
            question_name: question.name.clone(),
            description: sub.description.clone(),
            answer: sub.answer.clone(),
            concept: sub.concept,
            process: sub.process,
            keywords: join_keywords(&sub.keywords),
            options: join_options(sub.options.as_deref().unwrap_or_default()),
            image_id: sub.image_id,
            image_description: String::new(),
            image_preview: None,
            upload_path: String::new(),
        };
        self.image_description_loaded = false;

        if let Some(image_id) = sub.image_id {
            self.intents.push(EditorIntent::LoadImage { image_id });
        }
    }

    /// 设置图片，只在表单仍引用该图片时生效
    ///
    /// # 返回
    /// 是否已应用
    pub fn set_image(&mut self, image_id: ImageId, bytes: Vec<u8>, description: String) -> bool {
        if self.form.image_id != Some(image_id) {
            debug!("图片 {} 已不属于当前表单，忽略", image_id);
            return false;
        }
        self.form.image_preview = Some(bytes);
        self.form.image_description = description;
        self.image_description_loaded = true;
        true
    }

    /// 移除图片：清空预览和引用，保存时发送解绑
    pub fn remove_image(&mut self) {
        if !self.form_enabled() {
            return;
        }
        self.form.image_id = None;
        self.form.image_preview = None;
        self.form.image_description.clear();
        self.image_description_loaded = false;
    }

    // ========== 导航 ==========

    pub fn has_prev_sub_question(&self) -> bool {
        self.current_sub_question().is_some() && self.sub_question_index > 0
    }

    pub fn has_next_sub_question(&self) -> bool {
        self.sub_question_index + 1 < self.sub_question_count()
    }

    /// 切换到上一个小题，丢弃未保存的修改
    pub fn prev_sub_question(&mut self) {
        if self.form_enabled() && self.has_prev_sub_question() {
            self.sub_question_index -= 1;
            self.populate_form();
        }
    }

    /// 切换到下一个小题，丢弃未保存的修改
    pub fn next_sub_question(&mut self) {
        if self.form_enabled() && self.has_next_sub_question() {
            self.sub_question_index += 1;
            self.populate_form();
        }
    }

    pub fn has_prev_question(&self) -> bool {
        self.question_id > 1
    }

    pub fn prev_question(&mut self) {
        if self.form_enabled() && self.has_prev_question() {
            self.intents.push(EditorIntent::NavigateQuestion {
                question_id: self.question_id - 1,
            });
        }
    }

    pub fn next_question(&mut self) {
        if self.form_enabled() {
            self.intents.push(EditorIntent::NavigateQuestion {
                question_id: self.question_id + 1,
            });
        }
    }

    pub fn back(&mut self) {
        if self.form_enabled() {
            self.intents.push(EditorIntent::Back);
        }
    }

    // ========== 图片上传 ==========

    /// 请求上传图片
    ///
    /// 空路径或非 PNG/JPG 文件只显示错误，不发出意图
    pub fn request_upload(&mut self, path: &str) {
        if !self.form_enabled() {
            return;
        }
        let Some(sub_question_id) = self.current_sub_question().map(|s| s.id) else {
            return;
        };

        let path = path.trim();
        if path.is_empty() {
            self.status
                .notify(NotificationLevel::Error, "Error", "Failed to load image");
            return;
        }
        if !is_supported_image(path) {
            self.status.notify(
                NotificationLevel::Error,
                "Error",
                "Only PNG or JPG images are supported",
            );
            return;
        }

        self.intents.push(EditorIntent::UploadImage {
            file_path: PathBuf::from(path),
            target: ImageTarget::from(self.form.image_id),
            sub_question_id,
            description: self.form.image_description.clone(),
        });
        self.form.upload_path.clear();
    }

    /// 上传当前输入框中的路径
    pub fn submit_upload_path(&mut self) {
        let path = self.form.upload_path.clone();
        self.request_upload(&path);
    }

    /// 上传成功：记录新的图片ID并重新加载图片
    pub fn on_image_uploaded(&mut self, image_id: ImageId) {
        self.finish_loading_state();
        self.form.image_id = Some(image_id);
        self.form.image_preview = None;
        self.image_description_loaded = false;
        self.intents.push(EditorIntent::LoadImage { image_id });
        self.status.notify(
            NotificationLevel::Success,
            "Success",
            "Image uploaded successfully",
        );
    }

    // ========== 审核与删除 ==========

    pub fn can_approve(&self) -> bool {
        self.question.as_ref().is_some_and(|q| !q.is_audited)
    }

    pub fn can_delete(&self) -> bool {
        self.question.as_ref().is_some_and(|q| !q.is_deleted)
    }

    pub fn approve(&mut self) {
        if self.form_enabled() && self.can_approve() {
            self.intents.push(EditorIntent::ApproveQuestion {
                question_id: self.question_id,
            });
        }
    }

    pub fn delete(&mut self) {
        if self.form_enabled() && self.can_delete() {
            self.intents.push(EditorIntent::DeleteQuestion {
                question_id: self.question_id,
            });
        }
    }

    /// 审核成功后本地标记，只对同一题目生效
    pub fn on_question_approved(&mut self, question_id: QuestionId) {
        self.finish_loading_state();
        if let Some(question) = self.question.as_mut().filter(|q| q.id == question_id) {
            question.is_audited = true;
        }
    }

    /// 删除成功后本地标记，只对同一题目生效
    pub fn on_question_deleted(&mut self, question_id: QuestionId) {
        self.finish_loading_state();
        if let Some(question) = self.question.as_mut().filter(|q| q.id == question_id) {
            question.is_deleted = true;
        }
    }

    // ========== 保存 ==========

    /// 由表单生成草稿
    ///
    /// 图片描述只在已加载时携带，加载失败的描述不会覆盖服务端的值
    pub fn to_draft(&self) -> Option<SubQuestionDraft> {
        let sub = self.current_sub_question()?;
        let has_description = self.form.image_id.is_some() && self.image_description_loaded;

        Some(SubQuestionDraft {
            question_id: self.question_id,
            sub_question_id: sub.id,
            question_name: self.form.question_name.clone(),
            description: self.form.description.clone(),
            answer: self.form.answer.clone(),
            concept: self.form.concept,
            process: self.form.process,
            keywords: parse_keywords(&self.form.keywords),
            options: parse_options(&self.form.options),
            image_id: self.form.image_id,
            image_description: has_description.then(|| self.form.image_description.clone()),
        })
    }

    pub fn save(&mut self) {
        if !self.form_enabled() {
            return;
        }
        let Some(draft) = self.to_draft() else {
            return;
        };
        self.intents.push(EditorIntent::Save { draft });
    }

    /// 保存成功：提示并重新拉取快照
    pub fn on_save_success(&mut self) {
        self.finish_loading_state();
        self.status
            .notify(NotificationLevel::Success, "Success", "Saved successfully");
        self.intents.push(EditorIntent::ReloadQuestion {
            question_id: self.question_id,
        });
    }

    pub fn on_save_error(&mut self, message: &str) {
        self.show_error("Save Failed", message);
    }

    // ========== 表单编辑 ==========

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn set_focus(&mut self, field: EditorField) {
        self.focus = field;
    }

    pub fn input_char(&mut self, c: char) {
        if !self.form_enabled() {
            return;
        }
        match self.focus {
            EditorField::Concept => {
                if c == ' ' {
                    self.cycle_next();
                }
            }
            EditorField::Process => {
                if c == ' ' {
                    self.cycle_next();
                }
            }
            field => {
                if let Some(text) = self.text_field_mut(field) {
                    text.push(c);
                }
            }
        }
    }

    /// 多行字段插入换行
    pub fn input_newline(&mut self) {
        if self.form_enabled() && self.focus.is_multiline() {
            if let Some(text) = self.text_field_mut(self.focus) {
                text.push('\n');
            }
        }
    }

    pub fn backspace(&mut self) {
        if !self.form_enabled() {
            return;
        }
        if let Some(text) = self.text_field_mut(self.focus) {
            text.pop();
        }
    }

    /// 概念/过程字段切换到下一个值
    pub fn cycle_next(&mut self) {
        if !self.form_enabled() {
            return;
        }
        match self.focus {
            EditorField::Concept => self.form.concept = self.form.concept.next(),
            EditorField::Process => self.form.process = self.form.process.next(),
            _ => {}
        }
    }

    pub fn cycle_prev(&mut self) {
        if !self.form_enabled() {
            return;
        }
        match self.focus {
            EditorField::Concept => self.form.concept = self.form.concept.prev(),
            EditorField::Process => self.form.process = self.form.process.prev(),
            _ => {}
        }
    }

    fn text_field_mut(&mut self, field: EditorField) -> Option<&mut String> {
        match field {
            EditorField::QuestionName => Some(&mut self.form.question_name),
            EditorField::Description => Some(&mut self.form.description),
            EditorField::Answer => Some(&mut self.form.answer),
            EditorField::Keywords => Some(&mut self.form.keywords),
            EditorField::Options => Some(&mut self.form.options),
            EditorField::ImageDescription => {
                // 描述加载前不可编辑
                if self.form.image_id.is_none() || !self.image_description_loaded {
                    return None;
                }
                Some(&mut self.form.image_description)
            }
            EditorField::UploadPath => Some(&mut self.form.upload_path),
            EditorField::Concept | EditorField::Process => None,
        }
    }

    /// 直接修改表单
    pub fn form_mut(&mut self) -> &mut EditorForm {
        &mut self.form
    }

    // ========== 查询 ==========

    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    pub fn sub_question_index(&self) -> usize {
        self.sub_question_index
    }

    pub fn sub_question_count(&self) -> usize {
        self.question.as_ref().map_or(0, |q| q.sub_questions.len())
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn current_sub_question(&self) -> Option<&SubQuestion> {
        self.question
            .as_ref()
            .and_then(|q| q.sub_questions.get(self.sub_question_index))
    }

    pub fn form(&self) -> &EditorForm {
        &self.form
    }

    pub fn focus(&self) -> EditorField {
        self.focus
    }

    pub fn image_description_loaded(&self) -> bool {
        self.image_description_loaded
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// 标题，例如 "Edit Sub-Question 1 of 3"
    pub fn title(&self) -> String {
        match self.sub_question_count() {
            0 => format!("Question {}", self.question_id),
            n => format!("Edit Sub-Question {} of {}", self.sub_question_index + 1, n),
        }
    }
}

impl Window for SubQuestionEditWindow {
    type Intent = EditorIntent;

    fn status(&self) -> &WindowStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut WindowStatus {
        &mut self.status
    }

    fn take_intents(&mut self) -> Vec<EditorIntent> {
        std::mem::take(&mut self.intents)
    }
}

/// 只接受 PNG / JPG / JPEG（不区分大小写）
fn is_supported_image(path: &str) -> bool {
    static IMAGE_EXTENSION: OnceLock<Option<Regex>> = OnceLock::new();
    IMAGE_EXTENSION
        .get_or_init(|| Regex::new(r"(?i)\.(png|jpe?g)$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(path))
}
