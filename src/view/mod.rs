//! # View Layer
//!
//! The view model behind the two panels and the controller that moves
//! between them. Presentation (terminal text) lives in [`render`].

pub mod controller;
pub mod render;

pub use controller::ViewController;

use crate::models::{Entry, EntryForm};

/// The two mutually exclusive panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Listing,
    EditForm,
}

/// One rendered listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub entry: Entry,
    /// Whether edit/delete controls are shown next to run.
    pub show_actions: bool,
}

/// Everything the presentation layer needs to draw the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    /// Visible panel; `None` until initialized.
    pub panel: Option<Panel>,
    pub form: EntryForm,
    /// Row-level edit/delete controls toggle, kept across re-renders.
    pub show_row_actions: bool,
    pub rows: Vec<RowView>,
}

impl ViewModel {
    /// Row by exact name, falling back to a 1-based position.
    pub fn find_row(&self, selector: &str) -> Option<&RowView> {
        self.rows
            .iter()
            .find(|row| row.entry.name == selector)
            .or_else(|| {
                selector
                    .parse::<usize>()
                    .ok()
                    .and_then(|position| position.checked_sub(1))
                    .and_then(|index| self.rows.get(index))
            })
    }

    pub(crate) fn apply_row_actions(&mut self) {
        let show = self.show_row_actions;
        for row in &mut self.rows {
            row.show_actions = show;
        }
    }
}
