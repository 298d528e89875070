//! Loading kernel configuration from files.

use std::io::Write;

use chatcmd_kernel::{ConfigError, Kernel, KernelConfig};
use tempfile::NamedTempFile;

#[test]
fn loads_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "name": "radio",
            "complexity_budget": 8,
            "aliases": {{ "np": "!print now playing" }}
        }}"#
    )
    .unwrap();

    let config = KernelConfig::from_file(file.path()).unwrap();
    assert_eq!(config.name, "radio");
    assert_eq!(config.complexity_budget, 8);
    assert!(config.builtins);

    let kernel = Kernel::new(config).unwrap();
    assert_eq!(
        kernel.execute_command(&mut kernel.context(), "!np").unwrap(),
        Some("nowplaying".to_string())
    );
    assert!(kernel
        .execute_command(&mut kernel.context(), "!help")
        .unwrap()
        .unwrap_or_default()
        .contains("Welcome to radio"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = KernelConfig::from_file(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn unknown_alias_target_is_accepted_until_called() {
    let config = KernelConfig::bare().with_alias("later", "!not yet registered");
    let kernel = Kernel::new(config).unwrap();
    assert!(kernel.execute_command(&mut kernel.context(), "!later").is_err());
}
