//! 图片服务 - 业务能力层
//!
//! 负责图片的加载和上传，只处理单个小题的图片

use crate::clients::NanokoGateway;
use crate::error::AppResult;
use crate::models::{ImageData, ImageId, ImageTarget, SubQuestionId, DEFAULT_IMAGE_DESCRIPTION};
use std::path::Path;
use tracing::{debug, info};

/// 加载图片内容和描述
pub async fn load_image(gateway: &dyn NanokoGateway, image_id: ImageId) -> AppResult<ImageData> {
    let bytes = gateway.get_image(image_id).await?;
    let description = gateway.get_image_description(image_id).await?;

    debug!("图片 {} 加载完成: {} 字节", image_id, bytes.len());

    Ok(ImageData { bytes, description })
}

/// 上传图片
///
/// # 参数
/// - `gateway`: API 网关
/// - `file_path`: 本地图片路径
/// - `target`: 已有图片则原地替换内容，否则新建并挂到小题上
/// - `sub_question_id`: 小题ID（仅新建时使用）
/// - `description`: 图片描述（仅新建时使用，空白时使用默认文本）
///
/// # 返回
/// 返回最终的图片ID
pub async fn upload_image(
    gateway: &dyn NanokoGateway,
    file_path: &Path,
    target: ImageTarget,
    sub_question_id: SubQuestionId,
    description: &str,
) -> AppResult<ImageId> {
    let hash = gateway.upload_image_content(file_path).await?;
    debug!("图片内容已上传，哈希: {}", hash);

    match target {
        ImageTarget::Existing(image_id) => {
            gateway.set_image_hash(image_id, &hash).await?;
            info!("✓ 已替换图片 {} 的内容", image_id);
            Ok(image_id)
        }
        ImageTarget::New => {
            let description = if description.trim().is_empty() {
                DEFAULT_IMAGE_DESCRIPTION
            } else {
                description
            };

            let image_id = gateway.create_image(&hash, description).await?;
            gateway
                .attach_image_to_sub_question(sub_question_id, image_id)
                .await?;
            info!("✓ 新建图片 {} 并挂到小题 {}", image_id, sub_question_id);
            Ok(image_id)
        }
    }
}
