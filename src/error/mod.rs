use thiserror::Error;

/// Errors produced while resolving parameters or simulating a concentration trace
#[derive(Error, Debug)]
pub enum PharmsimError {
    /// A field could not be coerced to a finite number, or lies outside its domain
    #[error("Invalid numeric input for '{field}': {value}")]
    InvalidNumericInput { field: String, value: String },

    /// A required parameter is absent or zero
    #[error("{parameter} is missing")]
    MissingParameter { parameter: String },

    /// Unrecognized unit attached to a numeric field
    #[error("Unknown unit '{unit}' for '{field}'")]
    UnknownUnit { field: String, unit: String },

    /// Dosing schedule label that is neither a number nor a known label
    #[error("Unknown dosing schedule '{label}'")]
    UnknownSchedule { label: String },

    /// The dosing interval is so short that the schedule exceeds the dose limit
    #[error("Dosing interval of {interval} h is too short ({doses} doses, limit {max_doses})")]
    TooManyDoses {
        interval: f64,
        doses: f64,
        max_doses: usize,
    },

    /// The request body is not a valid JSON object
    #[error("Invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// Any failure inside the simulator
    #[error("Computation failed: {0}")]
    ComputationFailure(String),

    /// Failed to write a trace
    #[error("Failed to export trace: {0}")]
    Export(#[from] csv::Error),
}

impl From<diffsol::error::DiffsolError> for PharmsimError {
    fn from(error: diffsol::error::DiffsolError) -> Self {
        Self::ComputationFailure(format!("ODE solver error: {error}"))
    }
}

impl PharmsimError {
    pub fn invalid_numeric(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidNumericInput {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub fn missing(parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            parameter: parameter.into(),
        }
    }

    /// HTTP status code for this error at the request boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ComputationFailure(_) | Self::Export(_) => 500,
            _ => 400,
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_user_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_half_life_message() {
        let err = PharmsimError::missing("Half-life");
        assert_eq!(err.to_string(), "Half-life is missing");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn computation_failures_are_server_errors() {
        let err = PharmsimError::ComputationFailure("step budget exceeded".to_string());
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("step budget exceeded"));
    }

    #[test]
    fn too_many_doses_is_user_error() {
        let err = PharmsimError::TooManyDoses {
            interval: 0.001,
            doses: 168_001.0,
            max_doses: 10_000,
        };
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn invalid_numeric_is_user_error() {
        let err = PharmsimError::invalid_numeric("dose", "\"abc\"");
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Invalid numeric input for 'dose': \"abc\"");
    }
}
