use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional config file; every value can also come from the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub labels: LabelsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: Option<String>,
    /// ADIF tag holding the QSL manager's callsign.
    pub manager_field: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub qsos_per_label: Option<i64>,
    pub via_manager: Option<bool>,
}

impl TomlConfig {
    /// Loads and parses a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of environment variable `VAR`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.input.path {
            crate::utils::validation::validate_path("input.path", path)?;
        }
        if let Some(path) = &self.output.path {
            crate::utils::validation::validate_path("output.path", path)?;
        }
        if let Some(tag) = &self.input.manager_field {
            crate::utils::validation::validate_tag_name("input.manager_field", tag)?;
        }
        if let Some(k) = self.labels.qsos_per_label {
            crate::domain::model::LabelCapacity::try_from(k)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[input]
path = "log.adi"
manager_field = "QSL_MGR"

[output]
path = "labels.csv"

[labels]
qsos_per_label = 4
via_manager = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input.path.as_deref(), Some("log.adi"));
        assert_eq!(config.input.manager_field.as_deref(), Some("QSL_MGR"));
        assert_eq!(config.output.path.as_deref(), Some("labels.csv"));
        assert_eq!(config.labels.qsos_per_label, Some(4));
        assert_eq!(config.labels.via_manager, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("[labels]\nqsos_per_label = 2\n").unwrap();
        assert!(config.input.path.is_none());
        assert_eq!(config.labels.qsos_per_label, Some(2));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("QSL_LABELS_TEST_OUTPUT", "/tmp/labels.csv");

        let toml_content = r#"
[output]
path = "${QSL_LABELS_TEST_OUTPUT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.path.as_deref(), Some("/tmp/labels.csv"));

        std::env::remove_var("QSL_LABELS_TEST_OUTPUT");
    }

    #[test]
    fn test_out_of_range_capacity_fails_validation() {
        let config = TomlConfig::from_toml_str("[labels]\nqsos_per_label = 7\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[labels\nqsos_per_label = 2"),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[input]\npath = \"contest.adi\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.input.path.as_deref(), Some("contest.adi"));
    }
}
