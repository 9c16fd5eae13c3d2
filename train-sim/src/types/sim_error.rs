use std::fmt;

use store::StoreError;

/// Represents errors that can occur in the train simulator application.
#[derive(Debug)]
pub enum SimError {
    InvalidInput,
    TrainNotFound(String),     // If the train number is unknown
    StationNotFound(String),   // If the station id or code is unknown
    InvalidTimeFormat(String), // When a timetable string is not HH:MM
    NoTrainSelected,           // Tracking was started without a route
    TrackingFinished,          // The route was already played to the end
    AlertAlreadyActive,        // Only one alert session is supported
    LockError(String),
    ThreadStartError(String),
    Store(StoreError),
    Other(String), // Generic error case with a custom message
}

/// Implement the Display trait for user-friendly error messages
impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidInput => {
                write!(f, "Invalid input. Please check your input and try again.")
            }
            SimError::TrainNotFound(ref number) => {
                write!(f, "No train found with number {}", number)
            }
            SimError::StationNotFound(ref station) => {
                write!(f, "Station not found: {}", station)
            }
            SimError::InvalidTimeFormat(ref time_str) => {
                write!(f, "Invalid time format (expected HH:MM): {}", time_str)
            }
            SimError::NoTrainSelected => {
                write!(f, "No train selected. Search for a train to begin tracking.")
            }
            SimError::TrackingFinished => {
                write!(
                    f,
                    "Tracking already finished for this route. Search again to restart."
                )
            }
            SimError::AlertAlreadyActive => {
                write!(f, "An alert is already active. Cancel it first.")
            }
            SimError::LockError(msg) => write!(f, "Lock error: {}", msg),
            SimError::ThreadStartError(msg) => write!(f, "Thread start error: {}", msg),
            SimError::Store(e) => write!(f, "Store error: {}", e),
            SimError::Other(ref message) => write!(f, "Error: {}", message),
        }
    }
}

impl From<StoreError> for SimError {
    fn from(err: StoreError) -> Self {
        SimError::Store(err)
    }
}
