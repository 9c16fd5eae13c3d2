use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use logger::Logger;
use store::{KeyValueStore, NewUser, PaymentStatus, SessionManager, TicketDraft, TicketStore};
use train_sim::types::alert::schedule_alert;
use train_sim::types::notify::Notifier;
use train_sim::types::registry::Registry;
use train_sim::types::sim_error::SimError;
use train_sim::types::tracker::{Tracker, TrackerStatus};

fn open_kv(dir: &Path) -> KeyValueStore {
    fs::create_dir_all(dir).expect("Failed to create test directory");
    let logger = Logger::new(dir, "integration-test").expect("Failed to create logger");
    KeyValueStore::open(dir, logger).expect("Failed to open store")
}

struct RecordingNotifier {
    deliveries: AtomicUsize,
}

impl RecordingNotifier {
    fn new() -> Arc<Self> {
        Arc::new(RecordingNotifier {
            deliveries: AtomicUsize::new(0),
        })
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), SimError> {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn play_sound(&self) -> Result<(), SimError> {
        Ok(())
    }

    fn vibrate(&self) -> Result<(), SimError> {
        Ok(())
    }
}

#[test]
fn searching_by_number_finds_the_rajdhani() {
    let registry = Registry::with_demo_data().expect("Demo data should load");

    let results = registry.search(None, None, None, Some("12301"));
    assert_eq!(results.len(), 1);

    let train = results[0];
    assert_eq!(train.name, "Rajdhani Express");
    assert_eq!(train.source.code, "NDLS");
    assert_eq!(train.destination.code, "MMCT");
    assert_eq!(train.duration, "15h 50m");
}

#[test]
fn booking_a_ticket_end_to_end() {
    let dir = Path::new("/tmp/rustic_railways_e2e_booking");
    let store = TicketStore::new(open_kv(dir));
    let registry = Registry::with_demo_data().expect("Demo data should load");

    let train = registry
        .train_by_number("12259")
        .expect("Train 12259 should exist");

    let ticket = store
        .book(TicketDraft {
            train_number: train.number.clone(),
            train_name: train.name.clone(),
            source: train.source.name.clone(),
            destination: train.destination.name.clone(),
            passenger_name: "Asha Verma".to_string(),
            passenger_age: 34,
            departure_time: train.departure_time.format("%H:%M").to_string(),
            arrival_time: train.arrival_time.format("%H:%M").to_string(),
            phone_number: "+919876543210".to_string(),
            payment_status: PaymentStatus::Paid,
            additional_passengers: Vec::new(),
        })
        .expect("Booking should succeed");

    assert_eq!(ticket.number_of_tickets, 1);
    assert_eq!(ticket.payment_status, PaymentStatus::Paid);
    assert_eq!(ticket.source, "New Delhi Railway Station");
    assert_eq!(ticket.destination, "Jaipur Junction");
    assert_eq!(ticket.departure_time, "06:05");
    assert!(ticket.ticket_number.starts_with("TRN"));
    assert_eq!(ticket.ticket_number.len(), 9);
    assert!(ticket.ticket_number[3..].chars().all(|c| c.is_ascii_digit()));

    let mine = store
        .tickets_by_phone("+919876543210")
        .expect("Filter should succeed");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0], ticket);

    fs::remove_dir_all(dir).expect("Failed to remove test directory");
}

#[test]
fn canceled_alert_never_reaches_the_notifier() {
    let notifier = RecordingNotifier::new();
    let fired = Arc::new(AtomicBool::new(false));
    let on_fire_flag = Arc::clone(&fired);

    // Ten configured minutes, compressed to a short delay for the test
    let session = schedule_alert(
        "12301",
        "Mumbai Central",
        10,
        Duration::from_millis(400),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        move || {
            on_fire_flag.store(true, Ordering::SeqCst);
        },
    )
    .expect("Alert should schedule");

    thread::sleep(Duration::from_millis(50));
    session.cancel();

    thread::sleep(Duration::from_millis(700));

    assert!(!session.has_fired());
    assert!(!fired.load(Ordering::SeqCst), "Callback must never run");
    assert_eq!(notifier.deliveries.load(Ordering::SeqCst), 0);
}

#[test]
fn tracking_a_direct_train_plays_the_route_to_the_end() {
    let registry = Registry::with_demo_data().expect("Demo data should load");
    let train = registry
        .train_by_number("12259")
        .expect("Train 12259 should exist");

    let mut tracker = Tracker::new(train);
    // Direct service: one station pair, seven route points
    assert_eq!(tracker.route().len(), 7);

    tracker.begin().expect("Begin should succeed");
    let mut steps = 0;
    while tracker.step().is_some() {
        steps += 1;
    }

    assert_eq!(steps, 6);
    assert_eq!(tracker.status(), TrackerStatus::Stopped);
    assert_eq!(tracker.remaining_secs(), 0);

    let final_position = tracker.position().expect("Position must exist");
    assert_eq!(final_position.lat, train.destination.latitude);
    assert_eq!(final_position.lng, train.destination.longitude);
}

#[test]
fn store_state_survives_a_reopen() {
    let dir = Path::new("/tmp/rustic_railways_e2e_persistence");

    {
        let kv = open_kv(dir);
        let sessions = SessionManager::new(kv);
        sessions
            .signup(NewUser {
                name: "Asha Verma".to_string(),
                email: "asha@example.com".to_string(),
                gender: "female".to_string(),
                phone: "+919876543210".to_string(),
                age: 34,
                password: "secret".to_string(),
            })
            .expect("Signup should succeed");
    }

    // A fresh handle over the same directory sees the persisted session
    let sessions = SessionManager::new(open_kv(dir));
    let current = sessions
        .current_user()
        .expect("Current-user read should succeed")
        .expect("Expected a logged-in user");
    assert_eq!(current.email, "asha@example.com");

    let relogged = sessions
        .login("asha@example.com", "secret")
        .expect("Login should succeed");
    assert_eq!(relogged, current);

    fs::remove_dir_all(dir).expect("Failed to remove test directory");
}
