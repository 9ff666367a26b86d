use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceMapError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{capability} is not supported")]
    UnsupportedError { capability: String },

    #[error("Position unavailable: {reason}")]
    PositionError { reason: String },

    #[error("{operation} timed out after {seconds}s")]
    TimeoutError { operation: String, seconds: u64 },

    #[error("Geocoding failed: {message}")]
    GeocodingError { message: String },

    #[error("Invalid command pattern '{pattern}': {message}")]
    PatternError { pattern: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Capability,
    Position,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VoiceMapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VoiceMapError::HttpError(_)
            | VoiceMapError::GeocodingError { .. }
            | VoiceMapError::TimeoutError { .. } => ErrorCategory::Network,
            VoiceMapError::ConfigError { .. }
            | VoiceMapError::ConfigValidationError { .. }
            | VoiceMapError::InvalidConfigValueError { .. }
            | VoiceMapError::MissingConfigError { .. }
            | VoiceMapError::PatternError { .. } => ErrorCategory::Configuration,
            VoiceMapError::UnsupportedError { .. } => ErrorCategory::Capability,
            VoiceMapError::PositionError { .. } => ErrorCategory::Position,
            VoiceMapError::IoError(_) | VoiceMapError::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// 嚴重程度決定 CLI 的退出碼；執行期的錯誤都只會降級成狀態訊息
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Position | ErrorCategory::Capability => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            VoiceMapError::UnsupportedError { capability } => {
                format!("{} is not available on this system", capability)
            }
            VoiceMapError::TimeoutError { operation, .. } => {
                format!("{} took too long to respond", operation)
            }
            VoiceMapError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            VoiceMapError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the geocoder endpoint",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::Capability => "Pick another location provider in the [location] section",
            ErrorCategory::Position => "Try 'update location' again in a moment",
            ErrorCategory::Internal => "Re-run with --verbose and report the log",
        }
    }
}

pub type Result<T> = std::result::Result<T, VoiceMapError>;
