use super::question::ImageId;

/// 上传图片时未填写描述使用的默认文本
pub const DEFAULT_IMAGE_DESCRIPTION: &str = "Input the image description here";

/// 已加载的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub description: String,
}

/// 上传图片的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    /// 新建图片记录并挂到小题上
    New,
    /// 原地替换已有图片的内容
    Existing(ImageId),
}

impl From<Option<ImageId>> for ImageTarget {
    fn from(image_id: Option<ImageId>) -> Self {
        image_id.map_or(ImageTarget::New, ImageTarget::Existing)
    }
}
