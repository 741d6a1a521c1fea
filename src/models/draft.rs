//! 编辑草稿
//!
//! 编辑窗口表单的一份可变拷贝，保存时与服务端快照逐字段比较

use super::question::{ConceptType, ImageId, ProcessType, QuestionId, SubQuestionId};
use serde::{Deserialize, Serialize};

/// 小题编辑草稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestionDraft {
    pub question_id: QuestionId,
    pub sub_question_id: SubQuestionId,
    pub question_name: String,
    pub description: String,
    pub answer: String,
    pub concept: ConceptType,
    pub process: ProcessType,
    pub keywords: Vec<String>,
    pub options: Vec<String>,
    /// 用户移除图片后为 None
    pub image_id: Option<ImageId>,
    /// 没有图片时为 None
    pub image_description: Option<String>,
}

/// 解析关键词输入（逗号分隔）
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析选项输入（每行一个）
pub fn parse_options(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_keywords(keywords: &[String]) -> String {
    keywords.join(", ")
}

pub fn join_options(options: &[String]) -> String {
    options.join("\n")
}
