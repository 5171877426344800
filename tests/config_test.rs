//! Integration tests for Settings loading and merging.
//!
//! `load_file` tests read explicit files only. `Settings::load` tests point
//! XDG_CONFIG_HOME at a TempDir and hold ENV_LOCK while they touch TODOTREE_*
//! variables, since the process environment is shared between test threads.

use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use todotree::config::{RawSettings, Settings};
use todotree::{ApplicationError, DomainError, TodoListStore, VisibilityFilter, DEMO_TODOS};

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("todotree.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_defaults_then_demo_seed_and_show_all() {
    let settings = Settings::default();
    assert_eq!(settings.visibility_filter, VisibilityFilter::ShowAll);
    assert!(settings.demo_mode);
    assert!(settings.seed_demo);
    assert_eq!(settings.demo_todos, DEMO_TODOS.to_vec());
}

#[test]
fn given_config_file_when_loading_then_overrides_specified_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
visibility_filter = "SHOW_ACTIVE"
demo_todos = ["one", "two"]
"#,
    );

    let settings = Settings::load_file(&path).expect("load settings");

    assert_eq!(settings.visibility_filter, VisibilityFilter::ShowActive);
    assert_eq!(settings.demo_todos, vec!["one", "two"]);
    // not specified: defaults kept
    assert!(settings.demo_mode);
    assert!(settings.seed_demo);
}

#[test]
fn given_short_filter_name_in_config_when_loading_then_accepted() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "visibility_filter = \"completed\"\n");
    let settings = Settings::load_file(&path).unwrap();
    assert_eq!(settings.visibility_filter, VisibilityFilter::ShowCompleted);
}

#[test]
fn given_invalid_filter_in_config_when_loading_then_invalid_filter_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "visibility_filter = \"SHOW_SOME\"\n");

    let err = Settings::load_file(&path).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidFilter(ref name)) if name == "SHOW_SOME"
    ));
}

#[test]
fn given_malformed_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "visibility_filter = [\n");
    let err = Settings::load_file(&path).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("parse"));
}

#[test]
fn given_missing_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_empty_overlay_when_merging_then_unchanged() {
    let base = Settings::default();
    let merged = base.merge_with(&RawSettings::default()).unwrap();
    assert_eq!(merged, base);
}

#[test]
fn given_settings_without_seed_when_building_store_then_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
seed_demo = false
demo_mode = false
visibility_filter = "SHOW_COMPLETED"
"#,
    );
    let settings = Settings::load_file(&path).unwrap();

    let store = TodoListStore::from_settings(&settings);

    assert!(store.is_empty());
    assert!(!store.demo_mode());
    assert_eq!(store.visibility_filter(), VisibilityFilter::ShowCompleted);
}

#[test]
fn given_custom_seed_when_building_store_then_todos_follow_seed() {
    let settings = Settings {
        demo_todos: vec!["a".into(), "b".into()],
        ..Settings::default()
    };
    let store = TodoListStore::from_settings(&settings);
    let texts: Vec<String> = store.filtered_nodes().iter().map(|n| n.text.clone()).collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn given_settings_when_rendering_toml_then_canonical_filter_name() {
    let settings = Settings {
        visibility_filter: VisibilityFilter::ShowActive,
        ..Settings::default()
    };
    let rendered = settings.to_toml().unwrap();
    assert!(rendered.contains("visibility_filter = \"SHOW_ACTIVE\""));
    assert!(rendered.contains("Todo number 1!"));
}

// ============================================================
// Settings::load: global file, --config file and env layers
// ============================================================

static ENV_LOCK: Mutex<()> = Mutex::new(());

const ENV_VARS: [&str; 4] = [
    "TODOTREE_VISIBILITY_FILTER",
    "TODOTREE_DEMO_MODE",
    "TODOTREE_SEED_DEMO",
    "TODOTREE_DEMO_TODOS",
];

/// Isolated XDG home with no TODOTREE_* variables; clears them again on drop.
struct EnvScope {
    _lock: MutexGuard<'static, ()>,
    home: TempDir,
}

impl EnvScope {
    fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let home = TempDir::new().unwrap();
        std::env::set_var("HOME", home.path());
        std::env::set_var("XDG_CONFIG_HOME", home.path().join(".config"));
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        Self { _lock: lock, home }
    }

    fn write_global(&self, content: &str) {
        let dir = self.home.path().join(".config").join("todotree");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("todotree.toml"), content).unwrap();
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }
}

#[test]
fn given_nothing_configured_when_loading_then_defaults() {
    let _env = EnvScope::new();
    let settings = Settings::load(None).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_global_file_when_loading_then_applied() {
    let env = EnvScope::new();
    env.write_global("visibility_filter = \"SHOW_ACTIVE\"\nseed_demo = false\n");

    let settings = Settings::load(None).unwrap();

    assert_eq!(settings.visibility_filter, VisibilityFilter::ShowActive);
    assert!(!settings.seed_demo);
    assert!(settings.demo_mode);
}

#[test]
fn given_env_var_when_loading_then_overrides_file() {
    let _env = EnvScope::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "visibility_filter = \"SHOW_ACTIVE\"\n");
    std::env::set_var("TODOTREE_VISIBILITY_FILTER", "SHOW_COMPLETED");

    let settings = Settings::load(Some(&path)).unwrap();

    assert_eq!(settings.visibility_filter, VisibilityFilter::ShowCompleted);
}

#[test]
fn given_all_layers_when_loading_then_global_config_env_precedence() {
    let env = EnvScope::new();
    env.write_global(
        r#"
visibility_filter = "SHOW_ACTIVE"
demo_mode = false
seed_demo = false
demo_todos = ["global"]
"#,
    );
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
visibility_filter = "SHOW_COMPLETED"
seed_demo = true
demo_todos = ["file"]
"#,
    );
    std::env::set_var("TODOTREE_DEMO_TODOS", "env one,env two");

    let settings = Settings::load(Some(&path)).unwrap();

    // only the global file sets demo_mode
    assert!(!settings.demo_mode);
    // --config beats the global file
    assert_eq!(settings.visibility_filter, VisibilityFilter::ShowCompleted);
    assert!(settings.seed_demo);
    // env beats both
    assert_eq!(settings.demo_todos, vec!["env one", "env two"]);
}

#[test]
fn given_bool_env_vars_when_loading_then_parsed() {
    let _env = EnvScope::new();
    std::env::set_var("TODOTREE_DEMO_MODE", "false");
    std::env::set_var("TODOTREE_SEED_DEMO", "false");

    let settings = Settings::load(None).unwrap();

    assert!(!settings.demo_mode);
    assert!(!settings.seed_demo);
}

#[test]
fn given_malformed_bool_env_var_when_loading_then_config_error() {
    let _env = EnvScope::new();
    std::env::set_var("TODOTREE_DEMO_MODE", "maybe");

    let err = Settings::load(None).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_invalid_filter_env_var_when_loading_then_invalid_filter_error() {
    let _env = EnvScope::new();
    std::env::set_var("TODOTREE_VISIBILITY_FILTER", "SHOW_SOME");

    let err = Settings::load(None).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidFilter(ref name)) if name == "SHOW_SOME"
    ));
}
