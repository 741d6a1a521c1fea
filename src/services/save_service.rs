//! 小题保存服务 - 业务能力层
//!
//! 以服务端最新数据为基准，逐字段比较草稿，只为发生变化的字段发起修改请求。
//! 修改请求依次发送，中途失败时已发送的修改不会回滚。

use crate::clients::NanokoGateway;
use crate::error::{AppResult, BusinessError};
use crate::models::{
    ConceptType, ImageId, ProcessType, Question, SubQuestion, SubQuestionDraft,
};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// 单个字段的修改
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch {
    QuestionName(String),
    ImageDescription { image_id: ImageId, description: String },
    DetachImage,
    Description(String),
    Answer(String),
    Concept(ConceptType),
    Process(ProcessType),
    Keywords(Vec<String>),
    Options(Vec<String>),
}

impl FieldPatch {
    /// 日志中显示的字段名
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldPatch::QuestionName(_) => "question_name",
            FieldPatch::ImageDescription { .. } => "image_description",
            FieldPatch::DetachImage => "image",
            FieldPatch::Description(_) => "description",
            FieldPatch::Answer(_) => "answer",
            FieldPatch::Concept(_) => "concept",
            FieldPatch::Process(_) => "process",
            FieldPatch::Keywords(_) => "keywords",
            FieldPatch::Options(_) => "options",
        }
    }
}

/// 保存计划：有序的字段修改列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavePlan {
    pub patches: Vec<FieldPatch>,
}

impl SavePlan {
    /// 比较草稿和基准数据，生成保存计划
    ///
    /// # 参数
    /// - `baseline`: 重新拉取的题目
    /// - `baseline_image_description`: 基准图片的描述（只在需要比较时提供）
    /// - `draft`: 编辑草稿
    ///
    /// # 返回
    /// 基准中找不到小题时返回 `SubQuestionNotFound`
    pub fn diff(
        baseline: &Question,
        baseline_image_description: Option<&str>,
        draft: &SubQuestionDraft,
    ) -> Result<Self, BusinessError> {
        let current = baseline
            .sub_question(draft.sub_question_id)
            .ok_or(BusinessError::SubQuestionNotFound)?;

        let mut patches = Vec::new();

        let new_name = draft.question_name.trim();
        if !new_name.is_empty() && new_name != baseline.name.trim() {
            patches.push(FieldPatch::QuestionName(draft.question_name.clone()));
        }

        if let Some(image_id) = current.image_id {
            match (draft.image_id, draft.image_description.as_deref()) {
                (None, _) => patches.push(FieldPatch::DetachImage),
                (Some(_), Some(description)) => {
                    let unchanged = baseline_image_description
                        .is_some_and(|old| old.trim() == description.trim());
                    if !unchanged {
                        patches.push(FieldPatch::ImageDescription {
                            image_id,
                            description: description.to_string(),
                        });
                    }
                }
                (Some(_), None) => {}
            }
        }

        if current.description.trim() != draft.description.trim() {
            patches.push(FieldPatch::Description(draft.description.clone()));
        }

        if current.answer.trim() != draft.answer.trim() {
            patches.push(FieldPatch::Answer(draft.answer.clone()));
        }

        if current.concept != draft.concept {
            patches.push(FieldPatch::Concept(draft.concept));
        }

        if current.process != draft.process {
            patches.push(FieldPatch::Process(draft.process));
        }

        if !same_keywords(&current.keywords, &draft.keywords) {
            patches.push(FieldPatch::Keywords(draft.keywords.clone()));
        }

        let current_options = current.options.as_deref().unwrap_or_default();
        if !same_options(current_options, &draft.options) {
            patches.push(FieldPatch::Options(draft.options.clone()));
        }

        Ok(Self { patches })
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

/// 是否需要拉取基准图片描述来比较
pub fn needs_image_description(current: &SubQuestion, draft: &SubQuestionDraft) -> Option<ImageId> {
    match (current.image_id, draft.image_id, &draft.image_description) {
        (Some(image_id), Some(_), Some(_)) => Some(image_id),
        _ => None,
    }
}

/// 关键词按集合比较（忽略顺序）
fn same_keywords(current: &[String], draft: &[String]) -> bool {
    let normalize = |items: &[String]| -> BTreeSet<String> {
        items
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    };
    normalize(current) == normalize(draft)
}

/// 选项按顺序比较
fn same_options(current: &[String], draft: &[String]) -> bool {
    current.len() == draft.len()
        && current
            .iter()
            .zip(draft)
            .all(|(a, b)| a.trim() == b.trim())
}

/// 依次发送保存计划中的修改
///
/// 第一个失败的修改会中止整个保存，之前已发送的修改保留在服务端
pub async fn apply_plan(
    gateway: &dyn NanokoGateway,
    draft: &SubQuestionDraft,
    plan: &SavePlan,
) -> AppResult<()> {
    let sub_question_id = draft.sub_question_id;

    for (applied, patch) in plan.patches.iter().enumerate() {
        debug!("更新字段 {} (小题 {})", patch.field_name(), sub_question_id);

        let result = match patch {
            FieldPatch::QuestionName(name) => {
                gateway.set_question_name(draft.question_id, name).await
            }
            FieldPatch::ImageDescription {
                image_id,
                description,
            } => gateway.set_image_description(*image_id, description).await,
            FieldPatch::DetachImage => {
                gateway.detach_image_from_sub_question(sub_question_id).await
            }
            FieldPatch::Description(description) => {
                gateway
                    .set_sub_question_description(sub_question_id, description)
                    .await
            }
            FieldPatch::Answer(answer) => {
                gateway.set_sub_question_answer(sub_question_id, answer).await
            }
            FieldPatch::Concept(concept) => {
                gateway.set_sub_question_concept(sub_question_id, *concept).await
            }
            FieldPatch::Process(process) => {
                gateway.set_sub_question_process(sub_question_id, *process).await
            }
            FieldPatch::Keywords(keywords) => {
                gateway
                    .set_sub_question_keywords(sub_question_id, keywords)
                    .await
            }
            FieldPatch::Options(options) => {
                gateway.set_sub_question_options(sub_question_id, options).await
            }
        };

        if let Err(e) = result {
            if applied > 0 {
                warn!(
                    "⚠️ 小题 {} 保存中断于字段 {}，已写入 {} 个字段且不会回滚",
                    sub_question_id,
                    patch.field_name(),
                    applied
                );
            }
            return Err(e);
        }
    }

    Ok(())
}

/// 保存小题
///
/// 1. 重新拉取题目作为基准
/// 2. 找不到小题时直接失败，不发送任何修改
/// 3. 逐字段比较并发送修改
pub async fn save_sub_question(
    gateway: &dyn NanokoGateway,
    draft: SubQuestionDraft,
) -> AppResult<SubQuestionDraft> {
    let baseline = gateway
        .list_questions(Some(draft.question_id))
        .await?
        .into_iter()
        .next()
        .ok_or(BusinessError::SubQuestionNotFound)?;

    let current = baseline
        .sub_question(draft.sub_question_id)
        .ok_or(BusinessError::SubQuestionNotFound)?;

    let baseline_image_description = match needs_image_description(current, &draft) {
        Some(image_id) => Some(gateway.get_image_description(image_id).await?),
        None => None,
    };

    let plan = SavePlan::diff(&baseline, baseline_image_description.as_deref(), &draft)?;

    if plan.is_empty() {
        info!("小题 {} 没有变化，无需保存", draft.sub_question_id);
        return Ok(draft);
    }

    apply_plan(gateway, &draft, &plan).await?;

    info!(
        "✓ 小题 {} 保存成功，更新了 {} 个字段",
        draft.sub_question_id,
        plan.patches.len()
    );

    Ok(draft)
}
