//! Errors surfaced by the profile editor

use thiserror::Error;

use crate::save::SaveError;
use crate::validation::ValidationReport;

/// Why the editor refused or failed to save
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Please fix the highlighted fields.")]
    Invalid(ValidationReport),

    #[error("That handle is already taken.")]
    HandleUnavailable,

    #[error("Still checking handle availability.")]
    HandleCheckPending,

    #[error("Profile is still loading.")]
    NotLoaded,

    #[error(transparent)]
    Save(#[from] SaveError),
}

pub type EditorResult<T> = Result<T, EditorError>;
