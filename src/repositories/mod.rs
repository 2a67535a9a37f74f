//! # Repository Layer
//!
//! Entry operations layered over an injected [`EntryStorage`](crate::storage::EntryStorage).

pub mod entry;

pub use entry::{EntryRepository, RepositoryError, UpsertOutcome};
