//! Train search, booking, and destination-alert simulator: an in-memory
//! station/train registry, a route interpolator for map-style animation,
//! a fixed-cadence tracking animator, and a cancelable destination alert.

pub mod types;
