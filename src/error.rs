//! Error type shared by the calculators, loaders and session store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Units must be at least 1, got {0}")]
    InvalidUnits(u32),

    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{field} of {years} years exceeds the {max}-year limit")]
    HorizonTooLong { field: &'static str, years: f64, max: u32 },

    #[error("Net withdrawal would be negative: {0:.2}")]
    NegativeNetWithdrawal(f64),

    #[error("Remote returns calculation failed: {0}")]
    Remote(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl CalcError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CalcError::Io { path: path.into(), source }
    }
}

/// Reject NaN/infinite inputs before they reach the arithmetic
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::InvalidAmount { field, value })
    }
}
