//! Scripted sessions through the terminal shell against a file-backed store.

use tempfile::TempDir;
use yeelight_remote::app::App;
use yeelight_remote::config::AppConfig;
use yeelight_remote::models::Entry;
use yeelight_remote::shell::run_shell;
use yeelight_remote::view::Panel;

fn app(dir: &TempDir) -> App {
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        webhook_base: "http://127.0.0.1:9".to_string(),
        ..AppConfig::default()
    };
    App::from_config(&config).unwrap()
}

async fn session(app: App, script: &str) -> (String, Option<Panel>, bool) {
    let mut controller = app.into_controller();
    let mut output = Vec::new();
    run_shell(&mut controller, script.as_bytes(), &mut output)
        .await
        .unwrap();
    (
        String::from_utf8(output).unwrap(),
        controller.panel(),
        controller.model().show_row_actions,
    )
}

#[tokio::test]
async fn add_and_reject_duplicate_action() {
    let dir = TempDir::new().unwrap();
    let script = "add\nname lamp\nkey abc123\naction turn_on\nsave\n\
                  add\nname desk\nkey k2\naction turn_on\nsave\ncancel\nquit\n";

    let (output, panel, _) = session(app(&dir), script).await;

    assert!(output.contains("[Success] Saved successfully!"));
    assert!(output.contains("[Error] An item already exists for this action"));
    assert_eq!(panel, Some(Panel::Listing));
    assert_eq!(
        app(&dir).list().unwrap(),
        vec![Entry::new("lamp", "abc123", "turn_on")]
    );
}

#[tokio::test]
async fn empty_field_warns_and_stays_on_form() {
    let dir = TempDir::new().unwrap();
    let script = "add\nname lamp\naction turn_on\nsave\n";

    let (output, panel, _) = session(app(&dir), script).await;

    assert!(output.contains("[Warning] Key cannot be empty!"));
    assert_eq!(panel, Some(Panel::EditForm));
    assert!(app(&dir).list().unwrap().is_empty());
}

#[tokio::test]
async fn edit_mode_toggle_persists_through_delete() {
    let dir = TempDir::new().unwrap();
    let seeded = app(&dir);
    seeded.repository().upsert("lamp", "k1", "turn_on").unwrap();
    seeded.repository().upsert("desk", "k2", "desk_on").unwrap();

    let (output, panel, show_row_actions) =
        session(app(&dir), "toggle\ndelete desk\nquit\n").await;

    assert_eq!(panel, Some(Panel::Listing));
    assert!(show_row_actions);
    let last_screen = output.rsplit("> ").nth(1).unwrap_or_default();
    assert!(last_screen.contains("Actions (editing)"));
    assert!(last_screen.contains("lamp  [run] [edit] [delete]"));
    assert!(!last_screen.contains(". desk"));
    assert_eq!(
        app(&dir).list().unwrap(),
        vec![Entry::new("lamp", "k1", "turn_on")]
    );
}

#[tokio::test]
async fn edit_prefills_and_updates() {
    let dir = TempDir::new().unwrap();
    let seeded = app(&dir);
    seeded.repository().upsert("lamp", "k1", "turn_on").unwrap();
    seeded.repository().upsert("desk", "k2", "desk_on").unwrap();

    let (output, _, _) = session(app(&dir), "edit lamp\nkey rotated\nsave\nquit\n").await;

    assert!(output.contains("  key:    k1\n"));
    assert_eq!(
        app(&dir).list().unwrap(),
        vec![
            Entry::new("desk", "k2", "desk_on"),
            Entry::new("lamp", "rotated", "turn_on"),
        ]
    );
}

#[tokio::test]
async fn unknown_command_is_reported() {
    let dir = TempDir::new().unwrap();
    let (output, _, _) = session(app(&dir), "dance\n").await;
    assert!(output.contains("[Warning] unknown command 'dance'"));
}
