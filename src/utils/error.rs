use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodemodError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Io,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CodemodError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CodemodError::NotFound { .. } => ErrorCategory::Input,
            CodemodError::IoError(_) => ErrorCategory::Io,
            CodemodError::ConfigError { .. }
            | CodemodError::MissingConfigError { .. }
            | CodemodError::InvalidConfigValueError { .. }
            | CodemodError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CodemodError::SerializationError(_) | CodemodError::PatternError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// A missing file only skips that file; everything else stops the run.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            CodemodError::NotFound { .. } => true,
            CodemodError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CodemodError::NotFound { .. } => {
                "Check the file list in the manifest and the --root directory"
            }
            CodemodError::IoError(_) => "Check file permissions and available disk space",
            CodemodError::PatternError(_) => {
                "Check that param_name, wrapper and methods contain plain identifiers"
            }
            CodemodError::SerializationError(_) => "Re-run without --report-json",
            CodemodError::ConfigError { .. }
            | CodemodError::MissingConfigError { .. }
            | CodemodError::InvalidConfigValueError { .. }
            | CodemodError::ConfigValidationError { .. } => {
                "Fix the manifest (TOML) or the command line arguments and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CodemodError::NotFound { path } => format!("{} does not exist", path),
            CodemodError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            CodemodError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodemodError>;
