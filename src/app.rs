//! # Application Wiring
//!
//! Builds the file-backed repository, the webhook trigger and the notifier
//! from [`AppConfig`], and exposes the one-shot operations used by the CLI.

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{Entry, EntryForm};
use crate::notifier::Notifier;
use crate::repositories::{EntryRepository, UpsertOutcome};
use crate::storage::{FileKeyValueStore, LocalEntryStorage};
use crate::trigger::{ActionTrigger, TriggerError, WebhookTrigger};
use crate::view::ViewController;

pub type FileEntryStorage = LocalEntryStorage<FileKeyValueStore>;
pub type FileController = ViewController<FileEntryStorage, WebhookTrigger>;

/// Errors raised while assembling the application.
#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid webhook base '{value}': {source}")]
    WebhookBase {
        value: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Trigger(#[from] TriggerError),
}

pub struct App {
    repository: EntryRepository<FileEntryStorage>,
    trigger: WebhookTrigger,
    notifier: Notifier,
}

impl App {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let base = config
            .webhook_base_url()
            .map_err(|source| AppInitError::WebhookBase {
                value: config.webhook_base.clone(),
                source,
            })?;
        let trigger = WebhookTrigger::new(base, config.trigger_timeout())?;

        let store = FileKeyValueStore::new(config.data_dir.clone());
        let repository = EntryRepository::new(LocalEntryStorage::new(store, &config.storage_key));

        info!(
            data_dir = %config.data_dir.display(),
            storage_key = %config.storage_key,
            "Application initialized"
        );

        Ok(Self {
            repository,
            trigger,
            notifier: Notifier::new(config.notice_duration()),
        })
    }

    pub fn repository(&self) -> &EntryRepository<FileEntryStorage> {
        &self.repository
    }

    pub fn list(&self) -> Result<Vec<Entry>, AppError> {
        Ok(self.repository.list()?)
    }

    /// Validates `form` and upserts it.
    pub fn save(&self, form: &EntryForm) -> Result<UpsertOutcome, AppError> {
        let entry = form.validate()?;
        Ok(self
            .repository
            .upsert(&entry.name, &entry.key, &entry.action)?)
    }

    pub fn delete(&self, name: &str, key: &str, action: &str) -> Result<usize, AppError> {
        Ok(self.repository.remove(name, key, action)?)
    }

    /// Fires the webhook of the entry named `name`.
    pub fn run(&self, name: &str) -> Result<Option<JoinHandle<()>>, AppError> {
        let entry = self
            .repository
            .find_by_name(name)?
            .ok_or_else(|| AppError::UnknownEntry(name.to_string()))?;
        Ok(self.trigger.trigger(&entry))
    }

    /// Removes the stored collection, including an unreadable one.
    pub fn reset(&self) -> Result<(), AppError> {
        Ok(self.repository.storage().clear()?)
    }

    pub fn into_controller(self) -> FileController {
        ViewController::new(self.repository, self.trigger, self.notifier)
    }
}
