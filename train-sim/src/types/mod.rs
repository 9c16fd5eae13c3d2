/// Simulated seconds of travel represented by each route point.
pub const SECONDS_PER_POINT: u64 = 2;

/// Milliseconds between animator steps during live tracking.
pub const STEP_INTERVAL_MILLIS: u64 = 2000;

pub mod alert;

pub mod notify;

pub mod registry;

pub mod route;

pub mod sim_error;

pub mod station;

pub mod tracker;

pub mod train;
