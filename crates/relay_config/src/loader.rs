//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::ProjectConfig;

/// Loads and validates a `relay.toml` from a project directory.
///
/// Reads `<project_dir>/relay.toml`, parses it, and validates required
/// fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("relay.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `relay.toml` from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are usable.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.circuit.is_empty() {
        return Err(ConfigError::MissingField("project.circuit".to_string()));
    }
    if config.simulation.max_call_depth == Some(0) {
        return Err(ConfigError::Validation(
            "simulation.max_call_depth must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "blinky"
circuit = "blinky.json"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "blinky");
        assert_eq!(config.project.circuit, "blinky.json");
    }

    #[test]
    fn empty_name_errors() {
        let toml = r#"
[project]
name = ""
circuit = "c.json"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(field) if field == "project.name"));
    }

    #[test]
    fn empty_circuit_errors() {
        let toml = r#"
[project]
name = "c"
circuit = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(field) if field == "project.circuit"));
    }

    #[test]
    fn zero_call_depth_errors() {
        let toml = r#"
[project]
name = "c"
circuit = "c.json"

[simulation]
max_call_depth = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not toml {{{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
