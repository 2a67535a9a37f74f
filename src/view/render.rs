//! Plain-text rendering of the view model for the terminal shell.

use crate::notifier::Notice;

use super::{Panel, ViewModel};

const LISTING_HELP: &str = "commands: add | run <name> | toggle | edit <name> | delete <name> | list | quit";
const FORM_HELP: &str = "commands: name <value> | key <value> | action <value> | save | cancel";

/// Draws the notice (if any) and the visible panel.
pub fn render(model: &ViewModel, notice: Option<&Notice>) -> String {
    let mut out = String::new();

    if let Some(notice) = notice {
        out.push_str(&format!("[{}] {}\n", notice.kind.title(), notice.message));
    }

    match model.panel {
        Some(Panel::Listing) => render_listing(model, &mut out),
        Some(Panel::EditForm) => render_form(model, &mut out),
        None => {}
    }

    out
}

fn render_listing(model: &ViewModel, out: &mut String) {
    if model.show_row_actions {
        out.push_str("Actions (editing)\n");
    } else {
        out.push_str("Actions\n");
    }

    if model.rows.is_empty() {
        out.push_str("  (no actions saved)\n");
    }

    let width = model
        .rows
        .iter()
        .map(|row| row.entry.name.chars().count())
        .max()
        .unwrap_or(0);

    for (index, row) in model.rows.iter().enumerate() {
        let controls = if row.show_actions {
            "[run] [edit] [delete]"
        } else {
            "[run]"
        };
        out.push_str(&format!(
            "  {:>2}. {:<width$}  {}\n",
            index + 1,
            row.entry.name,
            controls,
            width = width
        ));
    }

    out.push_str(LISTING_HELP);
    out.push('\n');
}

fn render_form(model: &ViewModel, out: &mut String) {
    let form = &model.form;
    out.push_str("Edit action\n");
    out.push_str(&format!("  name:   {}\n", form.name));
    out.push_str(&format!("  key:    {}\n", form.key));
    out.push_str(&format!("  action: {}\n", form.action));
    out.push_str(FORM_HELP);
    out.push('\n');
}
