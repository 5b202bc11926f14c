use crate::core::gate::SaveRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' failed validation: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No {track} row with id {id}")]
    UnknownRow { track: String, id: String },

    #[error("Unknown centre '{centre_id}' for work order {work_order_id}")]
    UnknownCentre {
        work_order_id: String,
        centre_id: String,
    },

    #[error("Month {month} is outside the planning window {first}..={last}")]
    MonthOutOfWindow {
        month: String,
        first: String,
        last: String,
    },

    #[error("Month {month} is frozen for enrolment")]
    MonthFrozen { month: String },

    #[error("Save rejected: {0}")]
    SaveRejected(SaveRejection),

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("Persisting targets failed with status {status}: {body}")]
    PersistenceError { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Configuration,
    Planning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlannerError::ApiError(_) | PlannerError::PersistenceError { .. } => {
                ErrorCategory::Network
            }
            PlannerError::IoError(_) => ErrorCategory::Io,
            PlannerError::CsvError(_) | PlannerError::SerializationError(_) => ErrorCategory::Data,
            PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PlannerError::ValidationError { .. }
            | PlannerError::UnknownRow { .. }
            | PlannerError::UnknownCentre { .. }
            | PlannerError::MonthOutOfWindow { .. }
            | PlannerError::MonthFrozen { .. }
            | PlannerError::SaveRejected(_)
            | PlannerError::SaveInFlight => ErrorCategory::Planning,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlannerError::SaveInFlight
            | PlannerError::ApiError(_)
            | PlannerError::PersistenceError { .. } => ErrorSeverity::Medium,
            PlannerError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    /// Process exit status for the CLI. Never 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PlannerError::ApiError(_) => {
                "Check the API base URL and network connectivity, then retry".to_string()
            }
            PlannerError::PersistenceError { .. } => {
                "The backend refused the targets; retry the save or inspect the server logs"
                    .to_string()
            }
            PlannerError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            PlannerError::CsvError(_) | PlannerError::SerializationError(_) => {
                "Check that the plan file is valid JSON in the expected shape".to_string()
            }
            PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags".to_string()
            }
            PlannerError::UnknownCentre { .. } => {
                "Pick one of the centres listed for the work order".to_string()
            }
            PlannerError::MonthOutOfWindow { .. } => {
                "Choose a month within the 24-month planning window".to_string()
            }
            PlannerError::MonthFrozen { .. } => {
                "Choose a month outside the frozen range or lower earlier enrolment targets"
                    .to_string()
            }
            PlannerError::SaveRejected(rejection) => rejection.hint().to_string(),
            PlannerError::SaveInFlight => "Wait for the current save to finish".to_string(),
            PlannerError::ValidationError { .. } | PlannerError::UnknownRow { .. } => {
                "Review the plan rows and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlannerError::ApiError(_) => "Could not reach the planning API".to_string(),
            PlannerError::PersistenceError { status, .. } => {
                format!("Saving targets failed (HTTP {})", status)
            }
            PlannerError::SaveRejected(rejection) => rejection.to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
