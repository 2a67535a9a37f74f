//! View controller
//!
//! Owns the view model and routes user events through the repository,
//! the trigger and the notifier. Entering the listing always rebuilds the
//! rows from storage.

use tracing::{debug, error};

use crate::error::{AppError, PanelLabel};
use crate::models::{Entry, EntryForm, FormField};
use crate::notifier::Notifier;
use crate::repositories::{EntryRepository, UpsertOutcome};
use crate::storage::EntryStorage;
use crate::trigger::ActionTrigger;

use super::{Panel, RowView, ViewModel};

pub struct ViewController<S, T> {
    repository: EntryRepository<S>,
    trigger: T,
    notifier: Notifier,
    model: ViewModel,
}

impl<S: EntryStorage, T: ActionTrigger> ViewController<S, T> {
    /// Creates a controller with both panels hidden.
    pub fn new(repository: EntryRepository<S>, trigger: T, notifier: Notifier) -> Self {
        Self {
            repository,
            trigger,
            notifier,
            model: ViewModel::default(),
        }
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    pub fn panel(&self) -> Option<Panel> {
        self.model.panel
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn repository(&self) -> &EntryRepository<S> {
        &self.repository
    }

    /// Shows the listing for the first time.
    pub fn initialize(&mut self) {
        self.enter_listing();
    }

    /// Opens a blank form.
    pub fn add(&mut self) -> Result<(), AppError> {
        self.expect_panel(Panel::Listing, "add")?;
        self.model.form.clear();
        self.model.panel = Some(Panel::EditForm);
        Ok(())
    }

    /// Opens the form pre-filled from `entry`.
    pub fn edit(&mut self, entry: Entry) -> Result<(), AppError> {
        self.expect_panel(Panel::Listing, "edit")?;
        self.model.form = EntryForm::from_entry(&entry);
        self.model.panel = Some(Panel::EditForm);
        Ok(())
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), AppError> {
        self.expect_panel(Panel::EditForm, "set field")?;
        self.model.form.set(field, value);
        Ok(())
    }

    /// Validates and saves the form, returning to the listing on success.
    ///
    /// On any failure the form stays open and nothing is written.
    pub fn submit(&mut self) -> Result<UpsertOutcome, AppError> {
        self.expect_panel(Panel::EditForm, "save")?;

        let entry = match self.model.form.validate() {
            Ok(entry) => entry,
            Err(err) => return Err(self.report(err.into())),
        };

        let outcome = match self
            .repository
            .upsert(&entry.name, &entry.key, &entry.action)
        {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.report(err.into())),
        };

        self.notifier.success("Saved successfully!");
        self.enter_listing();
        Ok(outcome)
    }

    /// Leaves the form without saving.
    pub fn cancel(&mut self) -> Result<(), AppError> {
        self.expect_panel(Panel::EditForm, "cancel")?;
        self.enter_listing();
        Ok(())
    }

    /// Removes the entry matching `entry` by value and re-renders in place.
    pub fn delete(&mut self, entry: Entry) -> Result<usize, AppError> {
        self.expect_panel(Panel::Listing, "delete")?;

        let removed = match self
            .repository
            .remove(&entry.name, &entry.key, &entry.action)
        {
            Ok(removed) => removed,
            Err(err) => return Err(self.report(err.into())),
        };

        if removed > 0 {
            self.notifier.success(format!("Deleted '{}'", entry.name));
        } else {
            self.notifier.info(format!("'{}' was already deleted", entry.name));
        }
        self.refresh();
        Ok(removed)
    }

    /// Fires the entry's webhook without waiting for it.
    pub fn run(&self, entry: &Entry) -> Result<(), AppError> {
        self.expect_panel(Panel::Listing, "run")?;

        match self.trigger.trigger(entry) {
            Some(_) => {
                self.notifier.info(format!("Triggered '{}'", entry.name));
            }
            None => debug!(action = %entry.action, "Trigger was not dispatched"),
        }
        Ok(())
    }

    /// Flips row-level edit/delete controls. Returns the new state.
    pub fn toggle_row_actions(&mut self) -> Result<bool, AppError> {
        self.expect_panel(Panel::Listing, "toggle")?;
        self.model.show_row_actions = !self.model.show_row_actions;
        self.model.apply_row_actions();
        Ok(self.model.show_row_actions)
    }

    /// Entry for a listing row selected by name or 1-based position.
    pub fn select(&self, selector: &str) -> Result<Entry, AppError> {
        match self.model.find_row(selector) {
            Some(row) => Ok(row.entry.clone()),
            None => Err(self.report(AppError::UnknownEntry(selector.to_string()))),
        }
    }

    /// Rebuilds the listing rows from storage.
    ///
    /// Unreadable storage renders as an empty list and is reported.
    pub fn refresh(&mut self) {
        let entries = match self.repository.list() {
            Ok(entries) => entries,
            Err(err) => {
                let err = AppError::from(err);
                error!(error = %err, "Failed to load entries for listing");
                self.report(err);
                Vec::new()
            }
        };

        self.model.rows = entries
            .into_iter()
            .map(|entry| RowView {
                entry,
                show_actions: false,
            })
            .collect();
        self.model.apply_row_actions();
    }

    fn enter_listing(&mut self) {
        self.model.panel = Some(Panel::Listing);
        self.refresh();
    }

    fn expect_panel(&self, expected: Panel, event: &'static str) -> Result<(), AppError> {
        if self.model.panel == Some(expected) {
            return Ok(());
        }
        Err(self.report(AppError::InvalidTransition {
            event,
            panel: PanelLabel(self.model.panel),
        }))
    }

    fn report(&self, err: AppError) -> AppError {
        self.notifier.notify(err.user_message(), err.notice_kind());
        err
    }
}
