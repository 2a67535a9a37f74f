//! # Data Models
//!
//! The persisted [`Entry`] record and the edit form that produces it.

pub mod entry;

pub use entry::{Entry, EntryForm, FormField, ValidationError};
