//! Preference persistence tests
//!
//! Theme and motion changes made with keys survive a save and reload; nothing
//! else in the app state is written.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ponto::config::Config;
use ponto::ui::app::Action;
use ponto::ui::theme::Theme;
use ponto::ui::App;
use std::time::Instant;
use tempfile::TempDir;

fn press(app: &mut App, c: char) -> Action {
    app.handle_key(
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()),
        Instant::now(),
    )
}

#[test]
fn test_key_changes_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ponto").join("config.json");

    let mut app = App::from_config(&Config::default(), false);
    assert!(!app.is_reduced_motion());
    assert_eq!(press(&mut app, 'm'), Action::PersistConfig);
    assert_eq!(press(&mut app, 't'), Action::PersistConfig);
    let theme = app.theme.name;
    assert_ne!(theme, Theme::default_theme().name);

    app.to_config().save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.theme, theme);
    assert_eq!(loaded.reduced_motion, Some(true));

    let restored = App::from_config(&loaded, false);
    assert_eq!(restored.theme.name, theme);
    assert!(restored.is_reduced_motion());
}

#[test]
fn test_forced_reduced_motion_overrides_stored_preference() {
    let config = Config {
        theme: "Nord".to_string(),
        reduced_motion: Some(false),
    };
    let app = App::from_config(&config, true);
    assert!(app.is_reduced_motion());
    assert_eq!(app.theme.name, "Nord");
}

#[test]
fn test_unknown_stored_theme_uses_default() {
    let config = Config {
        theme: "Solarized".to_string(),
        reduced_motion: None,
    };
    let app = App::from_config(&config, false);
    assert_eq!(app.theme.name, Theme::default_theme().name);
    assert!(!app.is_reduced_motion());
}

#[test]
fn test_saved_file_holds_only_preferences() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let app = App::from_config(&Config::default(), true);
    app.to_config().save_to(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["reduced_motion", "theme"]);
}
