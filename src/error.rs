//! # Error Handling
//!
//! [`AppError`] unifies the errors a user action can run into and maps each
//! one onto the notice shown for it.

use thiserror::Error;

use crate::models::ValidationError;
use crate::notifier::NoticeKind;
use crate::repositories::RepositoryError;
use crate::storage::StorageError;
use crate::view::Panel;

/// Errors surfaced to the user through the notifier.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("action '{action}' is already used by '{existing_name}'")]
    DuplicateAction {
        action: String,
        existing_name: String,
    },
    /// The stored entry list could not be parsed.
    #[error("stored entries are corrupt: {0}")]
    CorruptState(#[source] StorageError),
    #[error(transparent)]
    Storage(StorageError),
    #[error("no entry matches '{0}'")]
    UnknownEntry(String),
    #[error("'{event}' is not available while {panel}")]
    InvalidTransition {
        event: &'static str,
        panel: PanelLabel,
    },
}

/// Display wrapper for the visible panel in transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLabel(pub Option<Panel>);

impl std::fmt::Display for PanelLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(Panel::Listing) => f.write_str("listing"),
            Some(Panel::EditForm) => f.write_str("editing"),
            None => f.write_str("starting up"),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        if error.is_corrupt() {
            AppError::CorruptState(error)
        } else {
            AppError::Storage(error)
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateAction {
                action,
                existing_name,
            } => AppError::DuplicateAction {
                action,
                existing_name,
            },
            RepositoryError::Storage(storage) => storage.into(),
        }
    }
}

impl AppError {
    /// Severity of the notice reporting this error.
    pub fn notice_kind(&self) -> NoticeKind {
        match self {
            AppError::Validation(_) | AppError::InvalidTransition { .. } => NoticeKind::Warning,
            AppError::UnknownEntry(_) => NoticeKind::Info,
            AppError::DuplicateAction { .. }
            | AppError::CorruptState(_)
            | AppError::Storage(_) => NoticeKind::Error,
        }
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(err) => err.to_string(),
            AppError::DuplicateAction { .. } => "An item already exists for this action".to_string(),
            AppError::CorruptState(_) => {
                "Stored actions could not be read; showing an empty list".to_string()
            }
            AppError::Storage(err) => format!("Storage is unavailable: {err}"),
            AppError::UnknownEntry(selector) => format!("No action named '{selector}'"),
            AppError::InvalidTransition { .. } => self.to_string(),
        }
    }
}
