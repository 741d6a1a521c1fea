//! 操作结果
//!
//! 每种操作对应一个变体，失败时携带可读的错误文本

use super::operation::{Generation, Operation, OperationKind};
use crate::models::{ImageData, ImageId, Question, QuestionId, SubQuestionDraft, SubQuestionId};

pub type OpResult<T> = Result<T, String>;

/// 单次操作的完成结果
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Login(OpResult<()>),
    QuestionsLoaded(OpResult<Vec<Question>>),
    QuestionLoaded {
        question_id: QuestionId,
        result: OpResult<Question>,
    },
    QuestionApproved {
        question_id: QuestionId,
        result: OpResult<()>,
    },
    QuestionDeleted {
        question_id: QuestionId,
        result: OpResult<()>,
    },
    ImageLoaded {
        image_id: ImageId,
        result: OpResult<ImageData>,
    },
    ImageUploaded {
        sub_question_id: SubQuestionId,
        result: OpResult<ImageId>,
    },
    SubQuestionSaved(OpResult<SubQuestionDraft>),
}

impl Completion {
    /// 为某个操作构造失败结果
    pub fn failure(operation: &Operation, message: impl Into<String>) -> Self {
        let message = message.into();
        match operation {
            Operation::Login { .. } => Completion::Login(Err(message)),
            Operation::LoadQuestions => Completion::QuestionsLoaded(Err(message)),
            Operation::LoadQuestion { question_id } => Completion::QuestionLoaded {
                question_id: *question_id,
                result: Err(message),
            },
            Operation::ApproveQuestion { question_id } => Completion::QuestionApproved {
                question_id: *question_id,
                result: Err(message),
            },
            Operation::DeleteQuestion { question_id } => Completion::QuestionDeleted {
                question_id: *question_id,
                result: Err(message),
            },
            Operation::LoadImage { image_id } => Completion::ImageLoaded {
                image_id: *image_id,
                result: Err(message),
            },
            Operation::UploadImage {
                sub_question_id, ..
            } => Completion::ImageUploaded {
                sub_question_id: *sub_question_id,
                result: Err(message),
            },
            Operation::SaveSubQuestion { .. } => Completion::SubQuestionSaved(Err(message)),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Completion::Login(_) => OperationKind::Login,
            Completion::QuestionsLoaded(_) => OperationKind::LoadQuestions,
            Completion::QuestionLoaded { .. } => OperationKind::LoadQuestion,
            Completion::QuestionApproved { .. } => OperationKind::ApproveQuestion,
            Completion::QuestionDeleted { .. } => OperationKind::DeleteQuestion,
            Completion::ImageLoaded { .. } => OperationKind::LoadImage,
            Completion::ImageUploaded { .. } => OperationKind::UploadImage,
            Completion::SubQuestionSaved(_) => OperationKind::SaveSubQuestion,
        }
    }

    /// 失败时的错误文本
    pub fn error(&self) -> Option<&str> {
        let error = match self {
            Completion::Login(r) => r.as_ref().err(),
            Completion::QuestionsLoaded(r) => r.as_ref().err(),
            Completion::QuestionLoaded { result, .. } => result.as_ref().err(),
            Completion::QuestionApproved { result, .. } => result.as_ref().err(),
            Completion::QuestionDeleted { result, .. } => result.as_ref().err(),
            Completion::ImageLoaded { result, .. } => result.as_ref().err(),
            Completion::ImageUploaded { result, .. } => result.as_ref().err(),
            Completion::SubQuestionSaved(r) => r.as_ref().err(),
        };
        error.map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.error().is_none()
    }
}

/// 投递给控制器的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub generation: Generation,
    pub completion: Completion,
}

impl Outcome {
    pub fn kind(&self) -> OperationKind {
        self.completion.kind()
    }

    pub fn is_success(&self) -> bool {
        self.completion.is_success()
    }
}
