pub mod draft;
pub mod image;
pub mod question;

pub use draft::{join_keywords, join_options, parse_keywords, parse_options, SubQuestionDraft};
pub use image::{ImageData, ImageTarget, DEFAULT_IMAGE_DESCRIPTION};
pub use question::{
    ConceptType, ImageId, ProcessType, Question, QuestionId, SubQuestion, SubQuestionId,
};
