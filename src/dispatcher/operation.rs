//! 待执行的 API 操作

use crate::models::{ImageId, ImageTarget, QuestionId, SubQuestionDraft, SubQuestionId};
use std::fmt::Display;
use std::path::PathBuf;

/// 窗口代数
///
/// 每个窗口实例一个代数，结果只投递给请求时所在的那一代
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Login,
    LoadQuestions,
    LoadQuestion,
    ApproveQuestion,
    DeleteQuestion,
    LoadImage,
    UploadImage,
    SaveSubQuestion,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationKind::Login => "login",
            OperationKind::LoadQuestions => "load_questions",
            OperationKind::LoadQuestion => "load_question",
            OperationKind::ApproveQuestion => "approve_question",
            OperationKind::DeleteQuestion => "delete_question",
            OperationKind::LoadImage => "load_image",
            OperationKind::UploadImage => "upload_image",
            OperationKind::SaveSubQuestion => "save_sub_question",
        };
        f.write_str(name)
    }
}

/// 一次 API 操作及其参数
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Login {
        username: String,
        password: String,
    },
    LoadQuestions,
    LoadQuestion {
        question_id: QuestionId,
    },
    ApproveQuestion {
        question_id: QuestionId,
    },
    DeleteQuestion {
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
    SaveSubQuestion {
        draft: SubQuestionDraft,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Login { .. } => OperationKind::Login,
            Operation::LoadQuestions => OperationKind::LoadQuestions,
            Operation::LoadQuestion { .. } => OperationKind::LoadQuestion,
            Operation::ApproveQuestion { .. } => OperationKind::ApproveQuestion,
            Operation::DeleteQuestion { .. } => OperationKind::DeleteQuestion,
            Operation::LoadImage { .. } => OperationKind::LoadImage,
            Operation::UploadImage { .. } => OperationKind::UploadImage,
            Operation::SaveSubQuestion { .. } => OperationKind::SaveSubQuestion,
        }
    }
}

/// 带代数的请求
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub generation: Generation,
    pub operation: Operation,
}

impl Request {
    pub fn new(generation: Generation, operation: Operation) -> Self {
        Self {
            generation,
            operation,
        }
    }
}
