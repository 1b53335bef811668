use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Fetch from {url} failed with HTTP status {status}")]
    FetchError { url: String, status: u16 },

    #[error("Schema error{}: {message}", record_suffix(.index))]
    SchemaError {
        index: Option<usize>,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Workbook error: {message}")]
    WorkbookError { message: String },

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

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Schema,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn schema(index: Option<usize>, message: impl Into<String>) -> Self {
        EtlError::SchemaError {
            index,
            message: message.into(),
        }
    }

    pub fn workbook(message: impl Into<String>) -> Self {
        EtlError::WorkbookError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::FetchError { .. } => ErrorCategory::Fetch,
            EtlError::SchemaError { .. } => ErrorCategory::Schema,
            EtlError::IoError(_) | EtlError::WorkbookError { .. } => ErrorCategory::Output,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 遠端服務問題，稍後重跑即可
            ErrorCategory::Fetch => ErrorSeverity::Medium,
            ErrorCategory::Schema | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => match self {
                EtlError::WorkbookError { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Critical,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(e) if e.is_timeout() => {
                "The request timed out; raise --timeout-seconds or try again later".to_string()
            }
            EtlError::ApiError(_) => {
                "Check network connectivity and that the API endpoint is reachable".to_string()
            }
            EtlError::FetchError { status, .. } if *status >= 500 => {
                "The API server reported an internal error; try again later".to_string()
            }
            EtlError::FetchError { .. } => {
                "Check the API endpoint URL and its query parameters".to_string()
            }
            EtlError::SchemaError { .. } => {
                "The API response does not match the expected record layout; inspect the response body"
                    .to_string()
            }
            EtlError::IoError(_) => {
                "Make sure the output path is writable and the disk is not full".to_string()
            }
            EtlError::WorkbookError { .. } => {
                "Narrow the query so the result fits in a single sheet".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Fetch => format!("Could not download trade data: {}", self),
            ErrorCategory::Schema => format!("Unexpected trade data: {}", self),
            ErrorCategory::Output => format!("Could not write the spreadsheet: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

fn record_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" at record {}", i)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, EtlError>;
