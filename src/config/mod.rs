#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

use crate::core::extractor::DEFAULT_MANAGER_TAG;
use crate::domain::model::LabelCapacity;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::TomlConfig;

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub qsos_per_label: Option<i64>,
    /// `None` leaves the choice to the config file.
    pub via_manager: Option<bool>,
    pub manager_field: Option<String>,
}

/// Settings for one run, resolved and validated before any QSO is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConfig {
    pub input_path: String,
    pub output_path: String,
    pub capacity: LabelCapacity,
    pub via_manager: bool,
    pub manager_field: String,
}

impl LabelConfig {
    pub fn new(
        input_path: impl Into<String>,
        output_path: impl Into<String>,
        capacity: LabelCapacity,
        via_manager: bool,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            capacity,
            via_manager,
            manager_field: DEFAULT_MANAGER_TAG.to_string(),
        }
    }

    pub fn resolve(overrides: &ConfigOverrides, file: Option<&TomlConfig>) -> Result<Self> {
        let file = file.cloned().unwrap_or_default();

        let input_path = overrides.input_path.clone().or(file.input.path);
        let output_path = overrides.output_path.clone().or(file.output.path);
        let qsos_per_label = overrides.qsos_per_label.or(file.labels.qsos_per_label);

        let input_path = validation::validate_required_field("input.path", &input_path)?;
        let output_path = validation::validate_required_field("output.path", &output_path)?;
        let qsos_per_label =
            validation::validate_required_field("labels.qsos_per_label", &qsos_per_label)?;

        let config = Self {
            input_path: input_path.clone(),
            output_path: output_path.clone(),
            capacity: LabelCapacity::try_from(*qsos_per_label)?,
            via_manager: overrides
                .via_manager
                .or(file.labels.via_manager)
                .unwrap_or(false),
            manager_field: overrides
                .manager_field
                .clone()
                .or(file.input.manager_field)
                .unwrap_or_else(|| DEFAULT_MANAGER_TAG.to_string()),
        };
        config.validate()?;

        Ok(config)
    }
}

impl Validate for LabelConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.path", &self.input_path)?;
        validation::validate_path("output.path", &self.output_path)?;
        validation::validate_tag_name("input.manager_field", &self.manager_field)?;
        Ok(())
    }
}

impl ConfigProvider for LabelConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn capacity(&self) -> LabelCapacity {
        self.capacity
    }

    fn via_manager(&self) -> bool {
        self.via_manager
    }

    fn manager_field(&self) -> &str {
        &self.manager_field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    fn overrides(k: Option<i64>) -> ConfigOverrides {
        ConfigOverrides {
            input_path: Some("log.adi".to_string()),
            output_path: Some("labels.csv".to_string()),
            qsos_per_label: k,
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_from_command_line_only() {
        let config = LabelConfig::resolve(&overrides(Some(3)), None).unwrap();

        assert_eq!(config.input_path, "log.adi");
        assert_eq!(config.capacity.get(), 3);
        assert!(!config.via_manager);
        assert_eq!(config.manager_field, "QSL_VIA");
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let file = TomlConfig::from_toml_str(
            "[input]\npath = \"file.adi\"\nmanager_field = \"QSL_MGR\"\n[labels]\nqsos_per_label = 5\nvia_manager = true\n",
        )
        .unwrap();

        let config = LabelConfig::resolve(&overrides(None), Some(&file)).unwrap();

        assert_eq!(config.input_path, "log.adi");
        assert_eq!(config.capacity.get(), 5);
        assert!(config.via_manager);
        assert_eq!(config.manager_field, "QSL_MGR");
    }

    #[test]
    fn test_command_line_can_switch_off_manager_mode() {
        let file = TomlConfig::from_toml_str("[labels]\nqsos_per_label = 2\nvia_manager = true\n")
            .unwrap();
        let direct = ConfigOverrides {
            via_manager: Some(false),
            ..overrides(None)
        };

        let config = LabelConfig::resolve(&direct, Some(&file)).unwrap();

        assert!(!config.via_manager);
    }

    #[test]
    fn test_capacity_out_of_range() {
        for k in [0, 7, -3] {
            assert!(matches!(
                LabelConfig::resolve(&overrides(Some(k)), None),
                Err(EtlError::InvalidConfigValueError { .. })
            ));
        }
    }

    #[test]
    fn test_missing_capacity() {
        assert!(matches!(
            LabelConfig::resolve(&overrides(None), None),
            Err(EtlError::MissingConfigError { ref field }) if field == "labels.qsos_per_label"
        ));
    }
}
