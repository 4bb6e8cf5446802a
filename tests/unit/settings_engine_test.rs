use tempfile::TempDir;

use tabswitch::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabswitch::types::settings::SwitcherSettings;

fn setup() -> (SettingsEngine, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("settings.json").to_string_lossy().to_string();
    (SettingsEngine::new(Some(path)), tmp)
}

#[test]
fn test_defaults_applied_when_file_missing() {
    let (mut engine, _tmp) = setup();
    let settings = engine.load().unwrap();
    assert_eq!(settings, SwitcherSettings::default());
    assert_eq!(settings.behavior.number_of_tabs_to_show, 7);
}

#[test]
fn test_partial_file_fills_missing_keys_with_defaults() {
    let (mut engine, _tmp) = setup();
    std::fs::write(
        engine.get_config_path(),
        r#"{"appearance":{"dark_theme":true,"popup_width":500,"tab_height":40,"font_size":16,"icon_size":24,"opacity":90,"text_scroll_delay_ms":1000,"text_scroll_coefficient":2.5}}"#,
    )
    .unwrap();

    let settings = engine.load().unwrap();
    assert!(settings.appearance.dark_theme);
    assert_eq!(settings.appearance.popup_width, 500);
    // Behavior section absent from the file — defaults apply
    assert_eq!(settings.behavior.number_of_tabs_to_show, 7);
}

#[test]
fn test_set_value_by_dot_notation_persists() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();

    engine
        .set_value("behavior.number_of_tabs_to_show", serde_json::json!(12))
        .unwrap();
    engine
        .set_value("appearance.opacity", serde_json::json!(80))
        .unwrap();

    let path = engine.get_config_path().to_string();
    let mut reread = SettingsEngine::new(Some(path));
    let loaded = reread.load().unwrap();
    assert_eq!(loaded.behavior.number_of_tabs_to_show, 12);
    assert_eq!(loaded.appearance.opacity, 80);
}

#[test]
fn test_set_value_rejects_unknown_and_mistyped_keys() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();

    assert!(engine.set_value("behavior.unknown", serde_json::json!(1)).is_err());
    assert!(engine
        .set_value("behavior.number_of_tabs_to_show", serde_json::json!("seven"))
        .is_err());
    // Failed updates leave the settings untouched
    assert_eq!(*engine.get_settings(), SwitcherSettings::default());
}

#[test]
fn test_replace_then_reset() {
    let (mut engine, _tmp) = setup();
    engine.load().unwrap();

    let mut settings = SwitcherSettings::default();
    settings.behavior.switch_to_previously_used_on_close = false;
    engine.replace(settings.clone()).unwrap();
    assert_eq!(*engine.get_settings(), settings);

    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), SwitcherSettings::default());
}
