use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UmbrellaError {
    #[error("Forecast request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Unexpected status code {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to parse forecast document: {message}")]
    ParseError { message: String },

    #[error("Failed to parse forecast XML: {0}")]
    XmlError(#[from] quick_xml::DeError),

    #[error("{area_code} area not found")]
    AreaNotFound { area_code: String },

    #[error("Forecast for {area_code} not found for date {date}")]
    PeriodNotFound { area_code: String, date: NaiveDate },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Document,
    NotFound,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UmbrellaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchError(_) | Self::HttpStatus { .. } => ErrorCategory::Network,
            Self::ParseError { .. } | Self::XmlError(_) => ErrorCategory::Document,
            Self::AreaNotFound { .. } | Self::PeriodNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 上游暫時性問題，稍後重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Document | ErrorCategory::NotFound => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Stable machine-readable identifier, used in JSON error bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FetchError(_) => "fetch_failed",
            Self::HttpStatus { .. } => "upstream_status",
            Self::ParseError { .. } | Self::XmlError(_) => "parse_failed",
            Self::AreaNotFound { .. } => "area_not_found",
            Self::PeriodNotFound { .. } => "forecast_not_found",
            Self::IoError(_) => "io_error",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "config_error",
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::FetchError(_) => {
                "Check network connectivity and that the feed URL is reachable".to_string()
            }
            Self::HttpStatus { status, .. } => {
                format!("The feed server answered {status}; try again later or verify the feed URL")
            }
            Self::ParseError { .. } | Self::XmlError(_) => {
                "Verify the feed URL points at a forecast XML product".to_string()
            }
            Self::AreaNotFound { area_code } => {
                format!("Check that area code '{area_code}' exists in this forecast product")
            }
            Self::PeriodNotFound { date, .. } => {
                format!("The product has no forecast period starting on {date}; it may not be issued yet")
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the configuration values and command line arguments".to_string()
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Document | ErrorCategory::NotFound => {
                "Failed to fetch weather data".to_string()
            }
            ErrorCategory::Configuration => format!("Invalid configuration: {self}"),
            ErrorCategory::System => format!("Internal error: {self}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, UmbrellaError>;
