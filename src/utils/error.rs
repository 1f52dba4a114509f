use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Line {line}: required field {field} is missing")]
    MissingFieldError { line: usize, field: String },

    #[error("Line {line}: field {field} has invalid value '{value}': {reason}")]
    InvalidFieldError {
        line: usize,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Rendering error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    InputData,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::MissingFieldError { .. } | EtlError::InvalidFieldError { .. } => {
                ErrorCategory::InputData
            }
            EtlError::RenderError { .. } | EtlError::CsvError(_) => ErrorCategory::Rendering,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::InputData => ErrorSeverity::High,
            ErrorCategory::Rendering => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::InvalidConfigValueError { field, .. } if field.contains("qsos_per_label") => {
                format!(
                    "Choose between {} and {} QSOs per label",
                    crate::domain::model::MIN_QSOS_PER_LABEL,
                    crate::domain::model::MAX_QSOS_PER_LABEL
                )
            }
            EtlError::InvalidConfigValueError { field, .. }
            | EtlError::MissingConfigError { field }
            | EtlError::ConfigValidationError { field, .. } => {
                format!("Check the '{}' setting on the command line or in the config file", field)
            }
            EtlError::ConfigError { .. } => "Check the command line and config file".to_string(),
            EtlError::MissingFieldError { line, field } => format!(
                "Add a <{}:n> tag to line {} of the log, or remove the QSO",
                field, line
            ),
            EtlError::InvalidFieldError { line, field, .. } => {
                format!("Fix the {} value on line {} of the log", field, line)
            }
            EtlError::RenderError { .. } => {
                "Re-run with --verbose and report the label that failed".to_string()
            }
            EtlError::CsvError(_) => "Check that the output location is writable".to_string(),
            EtlError::IoError(_) => {
                "Check that the input file exists and the output location is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::InputData => format!("Malformed QSO in log: {}", self),
            ErrorCategory::Rendering => format!("Could not build labels: {}", self),
            ErrorCategory::System => format!("File access failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
