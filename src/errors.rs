use serde::Serialize;

use crate::store::Dataset;

/// Errors surfaced by every shop operation.
///
/// None of these are fatal: the caller reports the message and the user
/// corrects the input and resubmits.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(
        "Insufficient stock for {tyre_name}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        tyre_name: String,
        requested: u32,
        available: u32,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected columns in {dataset} table: expected {expected:?}, found {found:?}")]
    Schema {
        dataset: Dataset,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(
        #[from]
        #[serde(skip)]
        std::io::Error,
    ),

    #[error("CSV error: {0}")]
    Csv(
        #[from]
        #[serde(skip)]
        csv::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    pub fn not_found_tyre(tyre_name: &str) -> Self {
        ServiceError::NotFound(format!("tyre '{}' is not in stock", tyre_name))
    }

    /// Stable machine-readable code, used by the CLI's JSON output.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::InsufficientStock { .. } => "insufficient_stock",
            ServiceError::ValidationError(_) => "validation_error",
            ServiceError::Schema { .. } => "schema_mismatch",
            ServiceError::Io(_) => "io_error",
            ServiceError::Csv(_) => "csv_error",
        }
    }

    /// Whether the user can fix this by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ServiceError::NotFound(_)
                | ServiceError::InsufficientStock { .. }
                | ServiceError::ValidationError(_)
        )
    }
}
