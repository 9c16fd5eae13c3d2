use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use super::route::{generate_route, RoutePoint};
use super::sim_error::SimError;
use super::train::Train;
use super::{SECONDS_PER_POINT, STEP_INTERVAL_MILLIS};

/// Lifecycle of a tracking run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackerStatus {
    Idle,
    Ready,
    Tracking,
    Stopped,
}

impl TrackerStatus {
    /// Converts the `TrackerStatus` variant to its string representation.
    pub fn as_str(&self) -> &str {
        match self {
            TrackerStatus::Idle => "idle",
            TrackerStatus::Ready => "ready",
            TrackerStatus::Tracking => "tracking",
            TrackerStatus::Stopped => "stopped",
        }
    }
}

/// Replays a generated route point by point to simulate train movement.
///
/// The tracker itself is a pure state machine; `TrackingSession` drives it on
/// the fixed step cadence. A run is over once `Stopped` is reached, whether
/// by playing the route to the end or by explicit cancellation; restarting
/// requires a fresh tracker.
pub struct Tracker {
    train_number: String,
    route: Vec<RoutePoint>,
    index: usize,
    status: TrackerStatus,
}

impl Tracker {
    /// A tracker with no train selected.
    pub fn idle() -> Self {
        Tracker {
            train_number: String::new(),
            route: Vec::new(),
            index: 0,
            status: TrackerStatus::Idle,
        }
    }

    /// Builds a ready tracker for `train`: route generated, positioned at
    /// the source station.
    pub fn new(train: &Train) -> Self {
        Tracker {
            train_number: train.number.clone(),
            route: generate_route(train),
            index: 0,
            status: TrackerStatus::Ready,
        }
    }

    pub fn train_number(&self) -> &str {
        &self.train_number
    }

    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    pub fn route(&self) -> &[RoutePoint] {
        &self.route
    }

    /// The current position along the route, if a train is selected.
    pub fn position(&self) -> Option<RoutePoint> {
        self.route.get(self.index).copied()
    }

    /// Estimated seconds until the destination at the simulated cadence.
    pub fn remaining_secs(&self) -> u64 {
        let points_remaining = self.route.len().saturating_sub(self.index + 1);
        points_remaining as u64 * SECONDS_PER_POINT
    }

    /// Transitions into `Tracking`. Starting an already tracking run is
    /// a no-op; a finished run cannot be restarted.
    pub fn begin(&mut self) -> Result<(), SimError> {
        match self.status {
            TrackerStatus::Ready | TrackerStatus::Tracking => {
                self.status = TrackerStatus::Tracking;
                Ok(())
            }
            TrackerStatus::Idle => Err(SimError::NoTrainSelected),
            TrackerStatus::Stopped => Err(SimError::TrackingFinished),
        }
    }

    /// Advances one route point, returning the new position. Returns `None`
    /// once the run is over; reaching the final point transitions to
    /// `Stopped`.
    pub fn step(&mut self) -> Option<RoutePoint> {
        if self.status != TrackerStatus::Tracking {
            return None;
        }
        if self.index + 1 >= self.route.len() {
            self.status = TrackerStatus::Stopped;
            return None;
        }

        self.index += 1;
        if self.index == self.route.len() - 1 {
            self.status = TrackerStatus::Stopped;
        }
        self.position()
    }

    /// Explicit cancellation; terminal for this run.
    pub fn stop(&mut self) {
        self.status = TrackerStatus::Stopped;
    }

    pub fn is_finished(&self) -> bool {
        self.status == TrackerStatus::Stopped
    }
}

/// Drives a `Tracker` on a background thread, one step per fixed interval.
///
/// Steps fire strictly in sequence: the next step is only scheduled after
/// the previous one completed, so positions advance monotonically through
/// the route. `stop` clears the running flag before the next step is taken;
/// the pending sleep wakes, observes the flag, and exits without stepping.
pub struct TrackingSession {
    tracker: Arc<RwLock<Tracker>>,
    running: Arc<AtomicBool>,
}

impl TrackingSession {
    /// Starts live tracking, invoking `on_step` with each new position and
    /// the recomputed remaining seconds.
    pub fn start(
        mut tracker: Tracker,
        on_step: impl Fn(RoutePoint, u64) + Send + 'static,
    ) -> Result<Self, SimError> {
        tracker.begin()?;

        let tracker = Arc::new(RwLock::new(tracker));
        let running = Arc::new(AtomicBool::new(true));

        let thread_tracker = Arc::clone(&tracker);
        let thread_running = Arc::clone(&running);

        thread::Builder::new()
            .name("tracker-thread".to_string())
            .spawn(move || {
                loop {
                    thread::sleep(Duration::from_millis(STEP_INTERVAL_MILLIS));

                    if !thread_running.load(Ordering::SeqCst) {
                        break;
                    }

                    let stepped = {
                        let mut tracker_lock = match thread_tracker.write() {
                            Ok(lock) => lock,
                            Err(_) => {
                                eprintln!("Failed to lock tracker for stepping. Stopping.");
                                break;
                            }
                        };
                        tracker_lock
                            .step()
                            .map(|position| (position, tracker_lock.remaining_secs()))
                    };

                    match stepped {
                        Some((position, remaining_secs)) => on_step(position, remaining_secs),
                        None => {
                            // Route played to the end (or canceled underneath us)
                            thread_running.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                }
            })
            .map_err(|_| {
                SimError::ThreadStartError("Failed to start the tracker thread.".to_string())
            })?;

        Ok(TrackingSession { tracker, running })
    }

    /// Stops the session; no step fires after this returns.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Ok(mut tracker_lock) = self.tracker.write() {
            tracker_lock.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Shared view of the tracked state, for live display.
    pub fn tracker(&self) -> Arc<RwLock<Tracker>> {
        Arc::clone(&self.tracker)
    }
}
