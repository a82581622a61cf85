use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;
use trellis_core::config::{ConfigError, ConfigValue, ScanConfig, TrellisConfig};
use trellis_core::Classifier;

#[test]
fn test_empty_config_uses_default_root() {
    let scan = ScanConfig::from_config(&TrellisConfig::empty()).unwrap();
    assert_eq!(scan.root, PathBuf::from("src/controllers"));
    assert!(scan.pattern.is_none());
    assert!(matches!(scan.classifier(), Classifier::Suffix(ref s) if s == "_controller.rs"));
}

#[test]
fn test_scan_section_from_yaml() {
    let yaml = r#"
trellis:
  controllers:
    root: "app/http/controllers"
    pattern: "^.*Controller\\.rs$"
"#;
    let config = TrellisConfig::from_yaml_str(yaml, "test").unwrap();
    let scan = ScanConfig::from_config(&config).unwrap();
    assert_eq!(scan.root, PathBuf::from("app/http/controllers"));
    let classifier = scan.classifier();
    assert!(classifier.is_controller("UsersController.rs"));
    assert!(!classifier.is_controller("users_controller.rs"));
}

#[test]
fn test_invalid_pattern_is_rejected() {
    let mut config = TrellisConfig::empty();
    config.set(ScanConfig::PATTERN_KEY, ConfigValue::String("(".into()));
    let err = ScanConfig::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == ScanConfig::PATTERN_KEY));
}

#[test]
fn test_get_or_default() {
    let config = TrellisConfig::empty();
    assert_eq!(config.get_or("missing", 42i64), 42);
    assert!(matches!(config.get::<String>("missing"), Err(ConfigError::NotFound(_))));
}

#[test]
fn test_type_mismatch() {
    let mut config = TrellisConfig::empty();
    config.set("flag", ConfigValue::String("maybe".into()));
    assert!(matches!(
        config.get::<bool>("flag"),
        Err(ConfigError::TypeMismatch { expected: "bool", .. })
    ));
}

#[test]
#[serial]
fn test_profile_file_overrides_base() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("application.yaml"),
        "trellis:\n  controllers:\n    root: base\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("application-prod.yaml"),
        "trellis:\n  controllers:\n    root: prod\n",
    )
    .unwrap();

    std::env::remove_var(TrellisConfig::PROFILE_ENV);
    let config = TrellisConfig::load_from(dir.path(), "prod").unwrap();
    assert_eq!(config.profile(), "prod");
    assert_eq!(config.get::<String>("trellis.controllers.root").unwrap(), "prod");
}

#[test]
#[serial]
fn test_env_var_overrides_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("application.yaml"),
        "trellis:\n  controllers:\n    root: from-file\n",
    )
    .unwrap();

    std::env::set_var("TRELLIS_CONTROLLERS_ROOT", "from-env");
    let config = TrellisConfig::load_from(dir.path(), "dev").unwrap();
    std::env::remove_var("TRELLIS_CONTROLLERS_ROOT");

    let scan = ScanConfig::from_config(&config).unwrap();
    assert_eq!(scan.root, PathBuf::from("from-env"));
}

#[test]
#[serial]
fn test_broken_yaml_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("application.yaml"), "trellis: [").unwrap();
    std::env::remove_var(TrellisConfig::PROFILE_ENV);
    let err = TrellisConfig::load_from(dir.path(), "dev").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}
