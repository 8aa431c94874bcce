//! Error types and handling for the itinerary planner

use thiserror::Error;

/// Main error type for the itinerary planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A provider could not be reached or answered with something unreadable
    #[error("{service} unavailable: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// A provider answered, but the answer held nothing usable
    #[error("{service} returned no data: {message}")]
    NoData {
        service: &'static str,
        message: String,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new upstream error for the named provider
    pub fn upstream<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Create a new no-data error for the named provider
    pub fn no_data<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::NoData {
            service,
            message: message.into(),
        }
    }

    /// True when the provider was reachable but had nothing to offer
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, PlannerError::NoData { .. })
    }

    /// True when the provider itself failed
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, PlannerError::Upstream { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            PlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PlannerError::Upstream { service, .. } => {
                format!("Unable to reach the {service} service. Please try again later.")
            }
            PlannerError::NoData { service, .. } => {
                format!("The {service} service had no data for this request.")
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
