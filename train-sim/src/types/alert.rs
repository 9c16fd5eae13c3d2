use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::notify::Notifier;
use super::sim_error::SimError;

// Cancellation re-check cadence while the countdown runs
const COUNTDOWN_POLL_MILLIS: u64 = 100;

/// A single pending destination alert.
///
/// The session fires once (notification side effects, then the callback) or
/// is canceled before that, whichever happens first; either way it becomes
/// inactive. Cancel after firing is a no-op. The surrounding interface
/// tracks at most one session at a time; this type does not guard stacking.
pub struct AlertSession {
    pub train_number: String,
    pub station_name: String,
    pub minutes_before: u32,
    canceled: Arc<AtomicBool>,
    fired: Arc<AtomicBool>,
    remaining_secs: Arc<Mutex<u64>>,
}

impl AlertSession {
    /// Cancels the pending alert. Guarantees that neither the notification
    /// nor the callback runs afterwards if the alert had not yet fired.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        !self.canceled.load(Ordering::SeqCst) && !self.fired.load(Ordering::SeqCst)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Seconds left on the countdown, for display.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs.lock().map(|secs| *secs).unwrap_or(0)
    }
}

/// Schedules a destination alert `minutes_before` minutes ahead of arrival.
///
/// The configured value is honored as true minutes. On expiry the notifier
/// side effects run best-effort (failures are logged by the notifier and
/// otherwise swallowed), then `on_fire` is invoked exactly once.
pub fn setup_alert(
    train_number: &str,
    station_name: &str,
    minutes_before: u32,
    notifier: Arc<dyn Notifier>,
    on_fire: impl FnOnce() + Send + 'static,
) -> Result<AlertSession, SimError> {
    schedule_alert(
        train_number,
        station_name,
        minutes_before,
        Duration::from_secs(u64::from(minutes_before) * 60),
        notifier,
        on_fire,
    )
}

/// Lower-level entry point taking the raw delay, for tests and demo flows
/// that want a compressed timeline.
pub fn schedule_alert(
    train_number: &str,
    station_name: &str,
    minutes_before: u32,
    delay: Duration,
    notifier: Arc<dyn Notifier>,
    on_fire: impl FnOnce() + Send + 'static,
) -> Result<AlertSession, SimError> {
    let canceled = Arc::new(AtomicBool::new(false));
    let fired = Arc::new(AtomicBool::new(false));
    let remaining_secs = Arc::new(Mutex::new(delay.as_secs()));

    let thread_canceled = Arc::clone(&canceled);
    let thread_fired = Arc::clone(&fired);
    let thread_remaining = Arc::clone(&remaining_secs);
    let thread_train_number = train_number.to_string();
    let thread_station_name = station_name.to_string();

    thread::Builder::new()
        .name("alert-thread".to_string())
        .spawn(move || {
            let mut remaining = delay;
            while !remaining.is_zero() {
                if thread_canceled.load(Ordering::SeqCst) {
                    return;
                }

                let slice = remaining.min(Duration::from_millis(COUNTDOWN_POLL_MILLIS));
                thread::sleep(slice);
                remaining = remaining.saturating_sub(slice);

                if let Ok(mut secs) = thread_remaining.lock() {
                    *secs = remaining.as_secs();
                }
            }

            if thread_canceled.load(Ordering::SeqCst) {
                return;
            }
            thread_fired.store(true, Ordering::SeqCst);

            let title = format!("Train {} Approaching!", thread_train_number);
            let body = format!(
                "Your train will arrive at {} in approximately {} minutes. Please get ready.",
                thread_station_name, minutes_before
            );

            // Best-effort side effects; the callback fires regardless
            let _ = notifier.notify(&title, &body);
            let _ = notifier.play_sound();
            let _ = notifier.vibrate();

            on_fire();
        })
        .map_err(|_| SimError::ThreadStartError("Failed to start the alert thread.".to_string()))?;

    Ok(AlertSession {
        train_number: train_number.to_string(),
        station_name: station_name.to_string(),
        minutes_before,
        canceled,
        fired,
        remaining_secs,
    })
}
