/// nanoko API 客户端
///
/// 通过 HTTP 封装所有与题库 API 相关的调用逻辑
use crate::clients::gateway::NanokoGateway;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{ConceptType, ImageId, ProcessType, Question, QuestionId, SubQuestionId};
use async_trait::async_trait;
use reqwest::{multipart, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

/// 接口路径
mod endpoints {
    pub const LOGIN: &str = "api/v1/user/token";
    pub const QUESTION_GET: &str = "api/v1/bank/question/get";
    pub const QUESTION_APPROVE: &str = "api/v1/bank/question/approve";
    pub const QUESTION_DELETE: &str = "api/v1/bank/question/delete";
    pub const QUESTION_SET_NAME: &str = "api/v1/bank/question/set/name";
    pub const IMAGE_GET: &str = "api/v1/bank/image/get";
    pub const IMAGE_DESCRIPTION: &str = "api/v1/bank/image/description";
    pub const IMAGE_UPLOAD: &str = "api/v1/bank/image/upload";
    pub const IMAGE_ADD: &str = "api/v1/bank/image/add";
    pub const IMAGE_SET_HASH: &str = "api/v1/bank/image/set/hash";
    pub const IMAGE_SET_DESCRIPTION: &str = "api/v1/bank/image/set/description";
    pub const SUB_QUESTION_SET_IMAGE: &str = "api/v1/bank/sub-question/set/image";
    pub const SUB_QUESTION_DELETE_IMAGE: &str = "api/v1/bank/sub-question/delete/image";
    pub const SUB_QUESTION_SET_PREFIX: &str = "api/v1/bank/sub-question/set";
}

/// 登录响应
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// 服务端可能直接返回值，也可能包一层对象
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HashResponse {
    Bare(String),
    Wrapped { hash: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdResponse {
    Bare(ImageId),
    Wrapped { id: ImageId },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionResponse {
    Bare(String),
    Wrapped { description: String },
}

/// nanoko API 客户端
pub struct NanokoClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl NanokoClient {
    /// 创建新的 API 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::api_request_failed(&config.api_base_url, e))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// 附加认证头并发送请求，未登录时直接失败
    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> AppResult<Response> {
        let builder = match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => return Err(ApiError::NotLoggedIn.into()),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        check_status(endpoint, response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let builder = self.http.get(self.url(endpoint)).query(query);
        let response = self.send(endpoint, builder).await?;
        decode(endpoint, response).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> AppResult<Response> {
        debug!("POST {}", endpoint);
        let builder = self.http.post(self.url(endpoint)).json(body);
        self.send(endpoint, builder).await
    }

    /// 只关心是否成功的 POST 调用
    async fn post_unit<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> AppResult<()> {
        self.post_json(endpoint, body).await.map(|_| ())
    }

    /// 设置小题的某个字段
    async fn set_sub_question_field(
        &self,
        sub_question_id: SubQuestionId,
        field: &str,
        value: Value,
    ) -> AppResult<()> {
        let endpoint = format!("{}/{}", endpoints::SUB_QUESTION_SET_PREFIX, field);
        let mut body = json!({ "sub_question_id": sub_question_id });
        body[field] = value;
        self.post_unit(&endpoint, &body).await
    }
}

#[async_trait]
impl NanokoGateway for NanokoClient {
    async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let builder = self
            .http
            .post(self.url(endpoints::LOGIN))
            .form(&[("username", username), ("password", password)]);

        // 登录请求本身不带旧 token
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoints::LOGIN, e))?;
        let response = check_status(endpoints::LOGIN, response).await?;
        let token: TokenResponse = decode(endpoints::LOGIN, response).await?;

        *self.token.write().await = Some(token.access_token);
        debug!("登录成功: {}", username);
        Ok(())
    }

    async fn list_questions(&self, question_id: Option<QuestionId>) -> AppResult<Vec<Question>> {
        let query: Vec<(&str, String)> = question_id
            .map(|id| vec![("question_id", id.to_string())])
            .unwrap_or_default();
        self.get_json(endpoints::QUESTION_GET, &query).await
    }

    async fn approve_question(&self, question_id: QuestionId) -> AppResult<()> {
        self.post_unit(endpoints::QUESTION_APPROVE, &json!({ "question_id": question_id }))
            .await
    }

    async fn delete_question(&self, question_id: QuestionId) -> AppResult<()> {
        self.post_unit(endpoints::QUESTION_DELETE, &json!({ "question_id": question_id }))
            .await
    }

    async fn get_image(&self, image_id: ImageId) -> AppResult<Vec<u8>> {
        let builder = self
            .http
            .get(self.url(endpoints::IMAGE_GET))
            .query(&[("image_id", image_id.to_string())]);
        let response = self.send(endpoints::IMAGE_GET, builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::api_request_failed(endpoints::IMAGE_GET, e))?;
        Ok(bytes.to_vec())
    }

    async fn get_image_description(&self, image_id: ImageId) -> AppResult<String> {
        let response: DescriptionResponse = self
            .get_json(endpoints::IMAGE_DESCRIPTION, &[("image_id", image_id.to_string())])
            .await?;
        Ok(match response {
            DescriptionResponse::Bare(description) => description,
            DescriptionResponse::Wrapped { description } => description,
        })
    }

    async fn upload_image_content(&self, file_path: &Path) -> AppResult<String> {
        let path_text = file_path.display().to_string();
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| AppError::file_read_failed(&path_text, e))?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        debug!("上传图片 {} ({} 字节)", file_name, bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(file_path))
            .map_err(|e| AppError::api_request_failed(endpoints::IMAGE_UPLOAD, e))?;
        let form = multipart::Form::new().part("file", part);

        let builder = self.http.post(self.url(endpoints::IMAGE_UPLOAD)).multipart(form);
        let response = self.send(endpoints::IMAGE_UPLOAD, builder).await?;
        let hash: HashResponse = decode(endpoints::IMAGE_UPLOAD, response).await?;

        Ok(match hash {
            HashResponse::Bare(hash) => hash,
            HashResponse::Wrapped { hash } => hash,
        })
    }

    async fn set_image_hash(&self, image_id: ImageId, hash: &str) -> AppResult<()> {
        self.post_unit(
            endpoints::IMAGE_SET_HASH,
            &json!({ "image_id": image_id, "hash": hash }),
        )
        .await
    }

    async fn create_image(&self, hash: &str, description: &str) -> AppResult<ImageId> {
        let response = self
            .post_json(
                endpoints::IMAGE_ADD,
                &json!({ "hash": hash, "description": description }),
            )
            .await?;
        let id: IdResponse = decode(endpoints::IMAGE_ADD, response).await?;

        Ok(match id {
            IdResponse::Bare(id) => id,
            IdResponse::Wrapped { id } => id,
        })
    }

    async fn set_image_description(&self, image_id: ImageId, description: &str) -> AppResult<()> {
        self.post_unit(
            endpoints::IMAGE_SET_DESCRIPTION,
            &json!({ "image_id": image_id, "description": description }),
        )
        .await
    }

    async fn attach_image_to_sub_question(
        &self,
        sub_question_id: SubQuestionId,
        image_id: ImageId,
    ) -> AppResult<()> {
        self.post_unit(
            endpoints::SUB_QUESTION_SET_IMAGE,
            &json!({ "sub_question_id": sub_question_id, "image_id": image_id }),
        )
        .await
    }

    async fn detach_image_from_sub_question(&self, sub_question_id: SubQuestionId) -> AppResult<()> {
        self.post_unit(
            endpoints::SUB_QUESTION_DELETE_IMAGE,
            &json!({ "sub_question_id": sub_question_id }),
        )
        .await
    }

    async fn set_question_name(&self, question_id: QuestionId, name: &str) -> AppResult<()> {
        self.post_unit(
            endpoints::QUESTION_SET_NAME,
            &json!({ "question_id": question_id, "name": name }),
        )
        .await
    }

    async fn set_sub_question_description(
        &self,
        sub_question_id: SubQuestionId,
        description: &str,
    ) -> AppResult<()> {
        self.set_sub_question_field(sub_question_id, "description", json!(description))
            .await
    }

    async fn set_sub_question_answer(&self, sub_question_id: SubQuestionId, answer: &str) -> AppResult<()> {
        self.set_sub_question_field(sub_question_id, "answer", json!(answer))
            .await
    }

    async fn set_sub_question_concept(
        &self,
        sub_question_id: SubQuestionId,
        concept: ConceptType,
    ) -> AppResult<()> {
        self.set_sub_question_field(sub_question_id, "concept", json!(concept))
            .await
    }

    async fn set_sub_question_process(
        &self,
        sub_question_id: SubQuestionId,
        process: ProcessType,
    ) -> AppResult<()> {
        self.set_sub_question_field(sub_question_id, "process", json!(process))
            .await
    }

    async fn set_sub_question_keywords(
        &self,
        sub_question_id: SubQuestionId,
        keywords: &[String],
    ) -> AppResult<()> {
        self.set_sub_question_field(sub_question_id, "keywords", json!(keywords))
            .await
    }

    async fn set_sub_question_options(
        &self,
        sub_question_id: SubQuestionId,
        options: &[String],
    ) -> AppResult<()> {
        self.set_sub_question_field(sub_question_id, "options", json!(options))
            .await
    }
}

// ========== 辅助函数 ==========

/// 检查响应状态码，把失败响应转换为错误
async fn check_status(endpoint: &str, response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    debug!("{} 返回 {}: {}", endpoint, status, message);

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized { message }.into());
    }

    Err(ApiError::BadResponse {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        message,
    }
    .into())
}

/// 解析响应体
async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> AppResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::api_request_failed(endpoint, e))?;

    serde_json::from_slice(&bytes).map_err(|source| {
        ApiError::JsonParseFailed {
            endpoint: endpoint.to_string(),
            source,
        }
        .into()
    })
}

/// 从错误响应体中提取可读信息
///
/// 优先读取 `detail` / `message` 字段，否则返回原始文本
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }

    Some(crate::utils::logging::truncate_text(trimmed, 200))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
