use thiserror::Error;

use crate::store::StorageError;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, WizardError>;
