#![allow(dead_code)]

use async_trait::async_trait;
use audition_admin::clients::NanokoGateway;
use audition_admin::error::{ApiError, AppError, AppResult};
use audition_admin::models::{
    ConceptType, ImageId, ProcessType, Question, QuestionId, SubQuestion, SubQuestionDraft,
    SubQuestionId,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub const PASSWORD: &str = "secret";
pub const UPLOADED_HASH: &str = "hash-0001";
pub const FIRST_NEW_IMAGE_ID: ImageId = 100;

/// 录制的网关调用
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Login(String),
    ListQuestions(Option<QuestionId>),
    ApproveQuestion(QuestionId),
    DeleteQuestion(QuestionId),
    GetImage(ImageId),
    GetImageDescription(ImageId),
    UploadImageContent(PathBuf),
    SetImageHash(ImageId, String),
    CreateImage(String, String),
    SetImageDescription(ImageId, String),
    AttachImage(SubQuestionId, ImageId),
    DetachImage(SubQuestionId),
    SetQuestionName(QuestionId, String),
    SetDescription(SubQuestionId, String),
    SetAnswer(SubQuestionId, String),
    SetConcept(SubQuestionId, ConceptType),
    SetProcess(SubQuestionId, ProcessType),
    SetKeywords(SubQuestionId, Vec<String>),
    SetOptions(SubQuestionId, Vec<String>),
}

impl GatewayCall {
    /// 是否为修改类调用
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            GatewayCall::Login(_)
                | GatewayCall::ListQuestions(_)
                | GatewayCall::GetImage(_)
                | GatewayCall::GetImageDescription(_)
        )
    }
}

/// 录制调用的假网关
pub struct MockGateway {
    questions: Mutex<Vec<Question>>,
    image_descriptions: Mutex<HashMap<ImageId, String>>,
    calls: Mutex<Vec<GatewayCall>>,
    failures: Mutex<HashMap<&'static str, String>>,
    panic_on: Mutex<Option<&'static str>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    next_image_id: AtomicI64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::with_questions(Vec::new())
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Mutex::new(questions),
            image_descriptions: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            panic_on: Mutex::new(None),
            gate: Mutex::new(None),
            next_image_id: AtomicI64::new(FIRST_NEW_IMAGE_ID),
        }
    }

    /// 指定方法返回错误
    pub fn fail_on(&self, method: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(method, message.to_string());
    }

    /// 指定方法触发 panic
    pub fn panic_on(&self, method: &'static str) {
        *self.panic_on.lock().unwrap() = Some(method);
    }

    pub fn set_image_description_text(&self, image_id: ImageId, description: &str) {
        self.image_descriptions
            .lock()
            .unwrap()
            .insert(image_id, description.to_string());
    }

    /// 之后的每次调用都要等待一个许可
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<GatewayCall> {
        self.calls().into_iter().filter(GatewayCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    async fn enter(&self, method: &'static str, call: GatewayCall) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let should_panic = *self.panic_on.lock().unwrap() == Some(method);
        if should_panic {
            panic!("mock gateway exploded in {}", method);
        }

        let failure = self.failures.lock().unwrap().get(method).cloned();
        match failure {
            Some(message) => Err(AppError::Other(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NanokoGateway for MockGateway {
    async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        self.enter("login", GatewayCall::Login(username.to_string()))
            .await?;
        if password != PASSWORD {
            return Err(ApiError::Unauthorized {
                message: "invalid credentials".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn list_questions(&self, question_id: Option<QuestionId>) -> AppResult<Vec<Question>> {
        self.enter("list_questions", GatewayCall::ListQuestions(question_id))
            .await?;
        let questions = self.questions.lock().unwrap().clone();
        Ok(match question_id {
            Some(id) => questions.into_iter().filter(|q| q.id == id).collect(),
            None => questions,
        })
    }

    async fn approve_question(&self, question_id: QuestionId) -> AppResult<()> {
        self.enter("approve_question", GatewayCall::ApproveQuestion(question_id))
            .await
    }

    async fn delete_question(&self, question_id: QuestionId) -> AppResult<()> {
        self.enter("delete_question", GatewayCall::DeleteQuestion(question_id))
            .await
    }

    async fn get_image(&self, image_id: ImageId) -> AppResult<Vec<u8>> {
        self.enter("get_image", GatewayCall::GetImage(image_id))
            .await?;
        Ok(format!("image-{}", image_id).into_bytes())
    }

    async fn get_image_description(&self, image_id: ImageId) -> AppResult<String> {
        self.enter(
            "get_image_description",
            GatewayCall::GetImageDescription(image_id),
        )
        .await?;
        Ok(self
            .image_descriptions
            .lock()
            .unwrap()
            .get(&image_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_image_content(&self, file_path: &Path) -> AppResult<String> {
        self.enter(
            "upload_image_content",
            GatewayCall::UploadImageContent(file_path.to_path_buf()),
        )
        .await?;
        Ok(UPLOADED_HASH.to_string())
    }

    async fn set_image_hash(&self, image_id: ImageId, hash: &str) -> AppResult<()> {
        self.enter(
            "set_image_hash",
            GatewayCall::SetImageHash(image_id, hash.to_string()),
        )
        .await
    }

    async fn create_image(&self, hash: &str, description: &str) -> AppResult<ImageId> {
        self.enter(
            "create_image",
            GatewayCall::CreateImage(hash.to_string(), description.to_string()),
        )
        .await?;
        Ok(self.next_image_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn set_image_description(&self, image_id: ImageId, description: &str) -> AppResult<()> {
        self.enter(
            "set_image_description",
            GatewayCall::SetImageDescription(image_id, description.to_string()),
        )
        .await
    }

    async fn attach_image_to_sub_question(
        &self,
        sub_question_id: SubQuestionId,
        image_id: ImageId,
    ) -> AppResult<()> {
        self.enter(
            "attach_image_to_sub_question",
            GatewayCall::AttachImage(sub_question_id, image_id),
        )
        .await
    }

    async fn detach_image_from_sub_question(&self, sub_question_id: SubQuestionId) -> AppResult<()> {
        self.enter(
            "detach_image_from_sub_question",
            GatewayCall::DetachImage(sub_question_id),
        )
        .await
    }

    async fn set_question_name(&self, question_id: QuestionId, name: &str) -> AppResult<()> {
        self.enter(
            "set_question_name",
            GatewayCall::SetQuestionName(question_id, name.to_string()),
        )
        .await
    }

    async fn set_sub_question_description(
        &self,
        sub_question_id: SubQuestionId,
        description: &str,
    ) -> AppResult<()> {
        self.enter(
            "set_sub_question_description",
            GatewayCall::SetDescription(sub_question_id, description.to_string()),
        )
        .await
    }

    async fn set_sub_question_answer(&self, sub_question_id: SubQuestionId, answer: &str) -> AppResult<()> {
        self.enter(
            "set_sub_question_answer",
            GatewayCall::SetAnswer(sub_question_id, answer.to_string()),
        )
        .await
    }

    async fn set_sub_question_concept(
        &self,
        sub_question_id: SubQuestionId,
        concept: ConceptType,
    ) -> AppResult<()> {
        self.enter(
            "set_sub_question_concept",
            GatewayCall::SetConcept(sub_question_id, concept),
        )
        .await
    }

    async fn set_sub_question_process(
        &self,
        sub_question_id: SubQuestionId,
        process: ProcessType,
    ) -> AppResult<()> {
        self.enter(
            "set_sub_question_process",
            GatewayCall::SetProcess(sub_question_id, process),
        )
        .await
    }

    async fn set_sub_question_keywords(
        &self,
        sub_question_id: SubQuestionId,
        keywords: &[String],
    ) -> AppResult<()> {
        self.enter(
            "set_sub_question_keywords",
            GatewayCall::SetKeywords(sub_question_id, keywords.to_vec()),
        )
        .await
    }

    async fn set_sub_question_options(
        &self,
        sub_question_id: SubQuestionId,
        options: &[String],
    ) -> AppResult<()> {
        self.enter(
            "set_sub_question_options",
            GatewayCall::SetOptions(sub_question_id, options.to_vec()),
        )
        .await
    }
}

// ========== 测试数据 ==========

pub fn sub_question(id: SubQuestionId, question_id: QuestionId) -> SubQuestion {
    SubQuestion {
        id,
        question_id: Some(question_id),
        description: format!("description {}", id),
        answer: format!("answer {}", id),
        concept: ConceptType::Measurement,
        process: ProcessType::Apply,
        keywords: vec!["area".to_string(), "perimeter".to_string()],
        options: None,
        image_id: None,
    }
}

/// 题目 `id`，小题 ID 为 `id * 10 + 序号`
pub fn question(id: QuestionId, sub_count: usize) -> Question {
    Question {
        id,
        name: format!("Question {}", id),
        source: format!("Source {}", id),
        is_audited: false,
        is_deleted: false,
        sub_questions: (0..sub_count as i64)
            .map(|i| sub_question(id * 10 + i, id))
            .collect(),
    }
}

pub fn questions(count: usize) -> Vec<Question> {
    (1..=count as i64).map(|id| question(id, 2)).collect()
}

/// 与基准完全一致的草稿
pub fn draft_for(question: &Question, sub_index: usize) -> SubQuestionDraft {
    let sub = &question.sub_questions[sub_index];
    SubQuestionDraft {
        question_id: question.id,
        sub_question_id: sub.id,
        question_name: question.name.clone(),
        description: sub.description.clone(),
        answer: sub.answer.clone(),
        concept: sub.concept,
        process: sub.process,
        keywords: sub.keywords.clone(),
        options: sub.options.clone().unwrap_or_default(),
        image_id: sub.image_id,
        image_description: None,
    }
}
