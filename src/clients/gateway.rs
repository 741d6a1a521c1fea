//! nanoko API 网关接口 - 基础设施层
//!
//! 上层只依赖这个 trait，不关心 HTTP 细节；测试中可以替换为录制调用的实现

use crate::error::AppResult;
use crate::models::{ConceptType, ImageId, ProcessType, Question, QuestionId, SubQuestionId};
use async_trait::async_trait;
use std::path::Path;

/// nanoko API 网关
///
/// 每个方法对应一次远程调用；认证状态由实现自己持有
#[async_trait]
pub trait NanokoGateway: Send + Sync {
    /// 登录并保存认证状态
    async fn login(&self, username: &str, password: &str) -> AppResult<()>;

    /// 获取题目列表；传入 ID 时只返回该题（不存在则为空列表）
    async fn list_questions(&self, question_id: Option<QuestionId>) -> AppResult<Vec<Question>>;

    async fn approve_question(&self, question_id: QuestionId) -> AppResult<()>;

    async fn delete_question(&self, question_id: QuestionId) -> AppResult<()>;

    /// 获取图片二进制内容
    async fn get_image(&self, image_id: ImageId) -> AppResult<Vec<u8>>;

    async fn get_image_description(&self, image_id: ImageId) -> AppResult<String>;

    /// 上传图片文件，返回内容哈希
    async fn upload_image_content(&self, file_path: &Path) -> AppResult<String>;

    async fn set_image_hash(&self, image_id: ImageId, hash: &str) -> AppResult<()>;

    /// 新建图片记录，返回图片 ID
    async fn create_image(&self, hash: &str, description: &str) -> AppResult<ImageId>;

    async fn set_image_description(&self, image_id: ImageId, description: &str) -> AppResult<()>;

    async fn attach_image_to_sub_question(
        &self,
        sub_question_id: SubQuestionId,
        image_id: ImageId,
    ) -> AppResult<()>;

    async fn detach_image_from_sub_question(&self, sub_question_id: SubQuestionId) -> AppResult<()>;

    async fn set_question_name(&self, question_id: QuestionId, name: &str) -> AppResult<()>;

    async fn set_sub_question_description(
        &self,
        sub_question_id: SubQuestionId,
        description: &str,
    ) -> AppResult<()>;

    async fn set_sub_question_answer(&self, sub_question_id: SubQuestionId, answer: &str) -> AppResult<()>;

    async fn set_sub_question_concept(
        &self,
        sub_question_id: SubQuestionId,
        concept: ConceptType,
    ) -> AppResult<()>;

    async fn set_sub_question_process(
        &self,
        sub_question_id: SubQuestionId,
        process: ProcessType,
    ) -> AppResult<()>;

    async fn set_sub_question_keywords(
        &self,
        sub_question_id: SubQuestionId,
        keywords: &[String],
    ) -> AppResult<()>;

    async fn set_sub_question_options(
        &self,
        sub_question_id: SubQuestionId,
        options: &[String],
    ) -> AppResult<()>;
}
