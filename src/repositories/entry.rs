//! Entry repository
//!
//! Every operation loads the whole collection, works on it in memory and,
//! for mutations, writes the whole collection back.

use thiserror::Error;
use tracing::{debug, info};

use crate::models::Entry;
use crate::storage::{EntryStorage, StorageError};

/// Errors returned by [`EntryRepository`] operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The action already belongs to an entry with a different name.
    #[error("an entry named '{existing_name}' already uses action '{action}'")]
    DuplicateAction {
        action: String,
        existing_name: String,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What an accepted upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Repository for the persisted entry list
#[derive(Debug, Clone)]
pub struct EntryRepository<S> {
    storage: S,
}

impl<S: EntryStorage> EntryRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All entries in stored order.
    pub fn list(&self) -> Result<Vec<Entry>, RepositoryError> {
        Ok(self.storage.load()?)
    }

    /// Finds the entry that owns `action`
    pub fn find_by_action(&self, action: &str) -> Result<Option<Entry>, RepositoryError> {
        Ok(self
            .storage
            .load()?
            .into_iter()
            .find(|entry| entry.action == action))
    }

    /// Finds the first entry named `name`
    pub fn find_by_name(&self, name: &str) -> Result<Option<Entry>, RepositoryError> {
        Ok(self
            .storage
            .load()?
            .into_iter()
            .find(|entry| entry.name == name))
    }

    /// Creates or updates the entry named `name`.
    ///
    /// Fails with [`RepositoryError::DuplicateAction`] when `action` already
    /// belongs to an entry with another name; nothing is written in that case.
    /// An updated entry moves to the end of the list.
    pub fn upsert(
        &self,
        name: &str,
        key: &str,
        action: &str,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let mut entries = self.storage.load()?;

        if let Some(owner) = entries
            .iter()
            .find(|entry| entry.action == action && entry.name != name)
        {
            debug!(action, owner = %owner.name, "Rejected duplicate action");
            return Err(RepositoryError::DuplicateAction {
                action: action.to_string(),
                existing_name: owner.name.clone(),
            });
        }

        let outcome = match entries.iter().position(|entry| entry.name == name) {
            Some(index) => {
                let mut entry = entries.remove(index);
                entry.key = key.to_string();
                entry.action = action.to_string();
                entries.push(entry);
                UpsertOutcome::Updated
            }
            None => {
                entries.push(Entry::new(name, key, action));
                UpsertOutcome::Created
            }
        };

        self.storage.save(&entries)?;
        info!(entry = name, action, ?outcome, "Saved entry");
        Ok(outcome)
    }

    /// Removes every entry matching all three values. Returns how many were
    /// removed; zero is not an error.
    pub fn remove(&self, name: &str, key: &str, action: &str) -> Result<usize, RepositoryError> {
        let entries = self.storage.load()?;
        let before = entries.len();
        let kept: Vec<Entry> = entries
            .into_iter()
            .filter(|entry| !entry.matches(name, key, action))
            .collect();
        let removed = before - kept.len();

        self.storage.save(&kept)?;
        info!(entry = name, action, removed, "Removed entry");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, LocalEntryStorage, MemoryKeyValueStore};

    type Repo = EntryRepository<LocalEntryStorage<MemoryKeyValueStore>>;

    fn repo() -> Repo {
        EntryRepository::new(LocalEntryStorage::new(
            MemoryKeyValueStore::new(),
            "yeelight",
        ))
    }

    fn raw(repo: &Repo) -> Option<String> {
        repo.storage().raw().unwrap()
    }

    #[test]
    fn upsert_into_empty_storage_creates_entry() {
        let repo = repo();
        let outcome = repo.upsert("lamp", "abc123", "turn_on").unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        assert_eq!(
            repo.list().unwrap(),
            vec![Entry::new("lamp", "abc123", "turn_on")]
        );
    }

    #[test]
    fn upsert_then_find_by_name_returns_fields() {
        let repo = repo();
        for (name, key, action) in [("lamp", "abc", "on"), ("desk", "d", "desk_on"), ("x", "y", "z")]
        {
            repo.upsert(name, key, action).unwrap();
            assert_eq!(
                repo.find_by_name(name).unwrap(),
                Some(Entry::new(name, key, action))
            );
        }
        assert_eq!(
            repo.find_by_action("desk_on").unwrap().map(|e| e.name),
            Some("desk".to_string())
        );
        assert_eq!(repo.find_by_action("missing").unwrap(), None);
    }

    #[test]
    fn upsert_same_name_overwrites_fields() {
        let repo = repo();
        repo.upsert("lamp", "abc123", "turn_on").unwrap();
        let outcome = repo.upsert("lamp", "xyz999", "turn_off").unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(
            repo.list().unwrap(),
            vec![Entry::new("lamp", "xyz999", "turn_off")]
        );
    }

    #[test]
    fn upsert_same_name_keeping_action_is_accepted() {
        let repo = repo();
        repo.upsert("lamp", "abc123", "turn_on").unwrap();
        repo.upsert("lamp", "rotated", "turn_on").unwrap();
        assert_eq!(
            repo.list().unwrap(),
            vec![Entry::new("lamp", "rotated", "turn_on")]
        );
    }

    #[test]
    fn updated_entry_moves_to_end() {
        let repo = repo();
        repo.upsert("lamp", "k1", "turn_on").unwrap();
        repo.upsert("desk", "k2", "desk_on").unwrap();
        repo.upsert("fan", "k3", "fan_on").unwrap();

        repo.upsert("lamp", "k9", "lamp_on").unwrap();

        let names: Vec<String> = repo.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["desk", "fan", "lamp"]);
    }

    #[test]
    fn duplicate_action_is_rejected_without_writing() {
        let repo = repo();
        repo.upsert("lamp", "abc123", "turn_on").unwrap();
        let before = raw(&repo);

        let err = repo.upsert("lamp2", "k2", "turn_on").unwrap_err();
        match err {
            RepositoryError::DuplicateAction {
                action,
                existing_name,
            } => {
                assert_eq!(action, "turn_on");
                assert_eq!(existing_name, "lamp");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(raw(&repo), before);
    }

    #[test]
    fn renaming_onto_another_entrys_action_is_rejected() {
        let repo = repo();
        repo.upsert("lamp", "k1", "turn_on").unwrap();
        repo.upsert("desk", "k2", "desk_on").unwrap();
        let before = raw(&repo);

        assert!(matches!(
            repo.upsert("lamp", "k1", "desk_on"),
            Err(RepositoryError::DuplicateAction { .. })
        ));
        assert_eq!(raw(&repo), before);
    }

    #[test]
    fn remove_is_idempotent() {
        let repo = repo();
        repo.upsert("lamp", "abc123", "turn_on").unwrap();
        repo.upsert("desk", "k2", "desk_on").unwrap();

        assert_eq!(repo.remove("lamp", "abc123", "turn_on").unwrap(), 1);
        let once = raw(&repo);
        assert_eq!(repo.remove("lamp", "abc123", "turn_on").unwrap(), 0);
        assert_eq!(raw(&repo), once);
        assert_eq!(
            repo.list().unwrap(),
            vec![Entry::new("desk", "k2", "desk_on")]
        );
    }

    #[test]
    fn remove_requires_exact_triple() {
        let repo = repo();
        repo.upsert("lamp", "abc123", "turn_on").unwrap();
        let before = repo.list().unwrap();

        assert_eq!(repo.remove("lamp", "wrong", "turn_on").unwrap(), 0);
        assert_eq!(repo.remove("lamp", "abc123", "turn_off").unwrap(), 0);
        assert_eq!(repo.list().unwrap(), before);
    }

    #[test]
    fn corrupt_storage_surfaces_as_storage_error() {
        let repo = repo();
        repo.storage()
            .store()
            .set_item("yeelight", "[oops")
            .unwrap();

        let err = repo.upsert("lamp", "k", "a").unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(ref e) if e.is_corrupt()));
        assert_eq!(raw(&repo).as_deref(), Some("[oops"));
    }
}
