use thiserror::Error;

use crate::domain::model::WEEK_LENGTH;

#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Background task failed: {message}")]
    TaskError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid clothing type: {0}")]
    InvalidClothingType(String),

    #[error("Upload failed: {message}")]
    UploadError { message: String },

    #[error("Upload too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Need at least one shirt and one pair of pants")]
    EmptyInput,

    #[error("Need at least 7 liked combinations (have {count})")]
    InsufficientLikedCombinations { count: usize },

    #[error(
        "Could not generate 7 unique outfits (best partial plan: {best_partial} of 7, after {attempts} search attempts)"
    )]
    NoFeasiblePlanFound { attempts: usize, best_partial: usize },
}

pub type Result<T> = std::result::Result<T, WardrobeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Configuration,
    Input,
    Planning,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WardrobeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WardrobeError::IoError(_)
            | WardrobeError::SerializationError(_)
            | WardrobeError::CsvError(_) => ErrorCategory::Storage,
            WardrobeError::ConfigError { .. }
            | WardrobeError::ConfigValidationError { .. }
            | WardrobeError::InvalidConfigValueError { .. }
            | WardrobeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            WardrobeError::ValidationError { .. }
            | WardrobeError::InvalidClothingType(_)
            | WardrobeError::UploadError { .. }
            | WardrobeError::PayloadTooLarge { .. }
            | WardrobeError::EmptyInput => ErrorCategory::Input,
            WardrobeError::InsufficientLikedCombinations { .. }
            | WardrobeError::NoFeasiblePlanFound { .. } => ErrorCategory::Planning,
            WardrobeError::TaskError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Planning => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 呼叫端輸入不足或不正確 (對應 HTTP 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WardrobeError::ValidationError { .. }
                | WardrobeError::InvalidClothingType(_)
                | WardrobeError::UploadError { .. }
                | WardrobeError::PayloadTooLarge { .. }
                | WardrobeError::EmptyInput
                | WardrobeError::InsufficientLikedCombinations { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            WardrobeError::IoError(_) => {
                "Check that the data directory exists and is writable".to_string()
            }
            WardrobeError::SerializationError(_) => {
                "The data file may be corrupted; restore it from a backup or remove it".to_string()
            }
            WardrobeError::CsvError(_) => "Check the export destination".to_string(),
            WardrobeError::TaskError { .. } => "Retry the request".to_string(),
            WardrobeError::ConfigError { .. }
            | WardrobeError::ConfigValidationError { .. }
            | WardrobeError::InvalidConfigValueError { .. }
            | WardrobeError::MissingConfigError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            WardrobeError::ValidationError { .. } => "Correct the request and retry".to_string(),
            WardrobeError::InvalidClothingType(_) => {
                "Use 'shirts' or 'pants' as the clothing type".to_string()
            }
            WardrobeError::UploadError { .. } => {
                "Upload png, jpg, jpeg, gif, heic or webp images".to_string()
            }
            WardrobeError::PayloadTooLarge { .. } => {
                "Upload fewer or smaller images per request".to_string()
            }
            WardrobeError::EmptyInput => {
                "Upload at least one shirt and one pair of pants first".to_string()
            }
            WardrobeError::InsufficientLikedCombinations { count } => format!(
                "Like {} more combination(s)",
                WEEK_LENGTH.saturating_sub(*count)
            ),
            WardrobeError::NoFeasiblePlanFound { .. } => format!(
                "Like combinations covering at least {} different shirts and {} different pants",
                WEEK_LENGTH, WEEK_LENGTH
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WardrobeError::IoError(_) | WardrobeError::SerializationError(_) => {
                "Could not access the wardrobe data".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_likes_message_reports_count() {
        let err = WardrobeError::InsufficientLikedCombinations { count: 4 };
        assert_eq!(
            err.to_string(),
            "Need at least 7 liked combinations (have 4)"
        );
        assert_eq!(err.recovery_suggestion(), "Like 3 more combination(s)");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Planning);
    }

    #[test]
    fn test_no_feasible_plan_is_not_client_error() {
        let err = WardrobeError::NoFeasiblePlanFound {
            attempts: 1000,
            best_partial: 3,
        };
        assert!(!err.is_client_error());
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("best partial plan: 3 of 7"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: WardrobeError = std::io::Error::other("disk full").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.user_friendly_message(), "Could not access the wardrobe data");
    }
}
