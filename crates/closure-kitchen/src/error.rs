// ABOUTME: Errors raised while applying request completions in the controller
// ABOUTME: They are logged and dropped at the completion boundary

use kitchen_core::StoreError;
use kitchen_project::ProjectError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Project update failed: {0}")]
    Project(#[from] ProjectError),

    #[error("Local state update failed: {0}")]
    Store(#[from] StoreError),
}
