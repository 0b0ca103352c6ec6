//! Planner error taxonomy.

use thiserror::Error;

use crate::traffic::Hour;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("vehicle count must be positive")]
    InvalidVehicleCount,
    #[error("at least one mandatory stop is required")]
    NoStops,
    #[error("vehicle count {vehicles} exceeds stop count {stops}")]
    TooManyVehicles { vehicles: usize, stops: usize },
    #[error("hour {0} is outside 0..24")]
    InvalidHour(Hour),
    #[error("penalty weight {0} is outside [0, 1]")]
    InvalidPenaltyWeight(f64),
    #[error("imbalance threshold {0} must be finite and at least 1.0")]
    InvalidThreshold(f64),

    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("invalid link {id}: {reason}")]
    InvalidLink { id: String, reason: String },

    #[error("no cached path from {from} to {to}")]
    MissingPath { from: String, to: String },
    #[error("no traffic multiplier for link {link} at hour {hour}")]
    MissingTraffic { link: String, hour: Hour },
}

impl PlannerError {
    pub(crate) fn missing_path(from: &str, to: &str) -> Self {
        PlannerError::MissingPath {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// True for errors caused by the caller's request rather than by an
    /// inconsistent graph or cache.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PlannerError::InvalidVehicleCount
                | PlannerError::NoStops
                | PlannerError::TooManyVehicles { .. }
                | PlannerError::InvalidHour(_)
                | PlannerError::InvalidPenaltyWeight(_)
                | PlannerError::InvalidThreshold(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
