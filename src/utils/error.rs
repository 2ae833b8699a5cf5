use thiserror::Error;

/// 單一上游來源的失敗（網路、逾時、格式不符）
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to {url} failed: {source}")]
    RequestError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    StatusError { url: String, status: u16 },

    #[error("Malformed payload from {url}: {message}")]
    MalformedPayload { url: String, message: String },

    #[error("Provider '{provider}' timed out after {timeout_ms} ms")]
    Timeout { provider: String, timeout_ms: u64 },
}

impl ProviderError {
    pub fn malformed(url: &str, message: impl Into<String>) -> Self {
        ProviderError::MalformedPayload {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct ProviderFailure {
    pub provenance: String,
    pub error: ProviderError,
}

/// 所有來源在同一次 refresh 中皆失敗
#[derive(Error, Debug)]
#[error("All {} providers failed: {}", .failures.len(), summarize(.failures))]
pub struct AggregationError {
    pub failures: Vec<ProviderFailure>,
}

fn summarize(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.provenance, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum PetError {
    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("Catalog refresh failed: {0}")]
    AggregationError(#[from] AggregationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl PetError {
    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PetError::ProviderError(_) | PetError::AggregationError(_) => {
                "Could not load pets from any provider right now.".to_string()
            }
            PetError::IoError(e) => format!("Could not read a local file: {}", e),
            PetError::SerializationError(_) => "Could not format the pet listing.".to_string(),
            PetError::ConfigError { message } | PetError::ValidationError { message } => {
                format!("Invalid settings: {}", message)
            }
            PetError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            PetError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PetError::ProviderError(_) | PetError::AggregationError(_) => {
                "Check your network connection and try again; the last loaded catalog stays available."
            }
            PetError::IoError(_) => "Verify the file path exists and is readable.",
            PetError::SerializationError(_) => "Retry without --json.",
            PetError::ConfigError { .. }
            | PetError::InvalidConfigValueError { .. }
            | PetError::MissingConfigError { .. }
            | PetError::ValidationError { .. } => "Fix the configuration and run again.",
        }
    }

    /// 對應 CLI 的結束代碼
    pub fn exit_code(&self) -> i32 {
        match self {
            PetError::ProviderError(_) | PetError::AggregationError(_) => 2,
            PetError::ConfigError { .. }
            | PetError::InvalidConfigValueError { .. }
            | PetError::MissingConfigError { .. }
            | PetError::ValidationError { .. } => 1,
            PetError::IoError(_) | PetError::SerializationError(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PetError>;
