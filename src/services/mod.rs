pub mod credentials;
pub mod image_service;
pub mod save_service;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use save_service::{FieldPatch, SavePlan};
