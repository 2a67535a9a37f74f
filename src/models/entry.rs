//! Entry model
//!
//! An entry ties a display name to a webhook action and the key that
//! authorizes it. The JSON shape (`name`, `action`, `key`) is the on-disk
//! format of the stored list.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A persisted trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Display identifier, also the update key.
    pub name: String,
    /// Webhook event name, unique across entries.
    pub action: String,
    /// Opaque webhook credential.
    pub key: String,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            action: action.into(),
            key: key.into(),
        }
    }

    /// True when all three fields equal the given values.
    pub fn matches(&self, name: &str, key: &str, action: &str) -> bool {
        self.name == name && self.key == key && self.action == action
    }
}

/// The three inputs of the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Key,
    Action,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::Name => "Name",
            FormField::Key => "Key",
            FormField::Action => "Action",
        };
        f.write_str(label)
    }
}

/// Raised when a form field is empty at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} cannot be empty!")]
pub struct ValidationError {
    pub field: FormField,
}

/// Edit form contents. Fields are raw user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub name: String,
    pub key: String,
    pub action: String,
}

impl EntryForm {
    /// Form pre-populated from an existing entry.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            key: entry.key.clone(),
            action: entry.action.clone(),
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Key => self.key = value,
            FormField::Action => self.action = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Presence check in form order: name, then key, then action.
    pub fn validate(&self) -> Result<Entry, ValidationError> {
        for (field, value) in [
            (FormField::Name, &self.name),
            (FormField::Key, &self.key),
            (FormField::Action, &self.action),
        ] {
            if value.is_empty() {
                return Err(ValidationError { field });
            }
        }

        Ok(Entry::new(&self.name, &self.key, &self.action))
    }
}
