use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::timestamped_id;
use crate::kv::KeyValueStore;

/// Key the booked-ticket list is persisted under.
pub const TICKETS_KEY: &str = "tickets";

const TICKET_NUMBER_PREFIX: &str = "TRN";

/// A passenger travelling on a booked ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub age: u32,
}

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl PaymentStatus {
    /// Converts the `PaymentStatus` variant to its string representation.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
        }
    }

    /// Creates a `PaymentStatus` variant from a string slice.
    pub fn from_str(status: &str) -> Result<PaymentStatus, StoreError> {
        match status.to_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            _ => Err(StoreError::InvalidDraft(format!(
                "unknown payment status '{}'",
                status
            ))),
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// An immutable booking record. Tickets are appended to the persisted list
/// at booking time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub train_number: String,
    pub train_name: String,
    pub source: String,
    pub destination: String,
    pub passenger_name: String,
    pub passenger_age: u32,
    pub departure_time: String,
    pub arrival_time: String,
    pub ticket_number: String,
    pub payment_status: PaymentStatus,
    pub phone_number: String,
    pub passengers: Vec<Passenger>,
    pub number_of_tickets: u32,
}

/// Booking request as collected from the user, validated before any ticket
/// is created. The lead passenger is the booking contact; everyone else
/// travels as an additional passenger.
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    pub train_number: String,
    pub train_name: String,
    pub source: String,
    pub destination: String,
    pub passenger_name: String,
    pub passenger_age: u32,
    pub departure_time: String,
    pub arrival_time: String,
    pub phone_number: String,
    pub payment_status: PaymentStatus,
    pub additional_passengers: Vec<Passenger>,
}

impl TicketDraft {
    /// Checks every required field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.train_number.trim().is_empty() {
            return Err(StoreError::InvalidDraft("train number is required".into()));
        }
        if self.source.trim().is_empty() {
            return Err(StoreError::InvalidDraft("source station is required".into()));
        }
        if self.destination.trim().is_empty() {
            return Err(StoreError::InvalidDraft(
                "destination station is required".into(),
            ));
        }
        if self.passenger_name.trim().is_empty() {
            return Err(StoreError::InvalidDraft("passenger name is required".into()));
        }
        if self.passenger_age == 0 {
            return Err(StoreError::InvalidDraft("passenger age is required".into()));
        }
        if self.phone_number.trim().is_empty() {
            return Err(StoreError::InvalidDraft("phone number is required".into()));
        }

        // Additional passengers are numbered from 2, after the lead passenger
        for (i, passenger) in self.additional_passengers.iter().enumerate() {
            if passenger.name.trim().is_empty() || passenger.age == 0 {
                return Err(StoreError::InvalidDraft(format!(
                    "details for passenger {} are incomplete",
                    i + 2
                )));
            }
        }

        Ok(())
    }
}

/// Append-only repository of booked tickets on top of the key-value store.
pub struct TicketStore {
    kv: KeyValueStore,
}

impl TicketStore {
    pub fn new(kv: KeyValueStore) -> Self {
        TicketStore { kv }
    }

    /// Books a ticket: validates the draft, generates the identifiers, and
    /// appends the new ticket to the persisted list.
    pub fn book(&self, draft: TicketDraft) -> Result<Ticket, StoreError> {
        draft.validate()?;

        let mut tickets = self.all_tickets()?;
        let ticket_number = generate_ticket_number(&tickets, &mut rand::thread_rng());

        let mut passengers = vec![Passenger {
            name: draft.passenger_name.clone(),
            age: draft.passenger_age,
        }];
        passengers.extend(draft.additional_passengers.iter().cloned());

        let ticket = Ticket {
            id: timestamped_id("ticket"),
            train_number: draft.train_number,
            train_name: draft.train_name,
            source: draft.source,
            destination: draft.destination,
            passenger_name: draft.passenger_name,
            passenger_age: draft.passenger_age,
            departure_time: draft.departure_time,
            arrival_time: draft.arrival_time,
            ticket_number,
            payment_status: draft.payment_status,
            phone_number: draft.phone_number,
            number_of_tickets: passengers.len() as u32,
            passengers,
        };

        tickets.push(ticket.clone());
        self.kv.set(TICKETS_KEY, &tickets)?;

        Ok(ticket)
    }

    /// Returns every booked ticket, oldest first.
    pub fn all_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        Ok(self.kv.get(TICKETS_KEY)?.unwrap_or_default())
    }

    /// Returns the tickets booked under `phone` (exact match).
    pub fn tickets_by_phone(&self, phone: &str) -> Result<Vec<Ticket>, StoreError> {
        let tickets = self.all_tickets()?;
        Ok(tickets
            .into_iter()
            .filter(|ticket| ticket.phone_number == phone)
            .collect())
    }
}

/// Draws display ticket numbers until one is unused by the existing tickets.
fn generate_ticket_number(existing: &[Ticket], rng: &mut impl Rng) -> String {
    loop {
        let candidate = format!(
            "{}{}",
            TICKET_NUMBER_PREFIX,
            rng.gen_range(100_000..1_000_000)
        );
        if !existing
            .iter()
            .any(|ticket| ticket.ticket_number == candidate)
        {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logger::Logger;
    use std::fs;
    use std::path::Path;

    fn open_ticket_store(dir: &Path) -> TicketStore {
        fs::create_dir_all(dir).expect("Failed to create test directory");
        let logger = Logger::new(dir, "ticket-test").expect("Failed to create logger");
        let kv = KeyValueStore::open(dir, logger).expect("Failed to open store");
        TicketStore::new(kv)
    }

    fn valid_draft() -> TicketDraft {
        TicketDraft {
            train_number: "12259".to_string(),
            train_name: "Shatabdi Express".to_string(),
            source: "New Delhi Railway Station".to_string(),
            destination: "Jaipur Junction".to_string(),
            passenger_name: "Asha Verma".to_string(),
            passenger_age: 34,
            departure_time: "06:05".to_string(),
            arrival_time: "10:35".to_string(),
            phone_number: "+919876543210".to_string(),
            payment_status: PaymentStatus::Paid,
            additional_passengers: Vec::new(),
        }
    }

    #[test]
    fn test_booking_appends_and_assigns_ticket_number() {
        let dir = Path::new("/tmp/rustic_railways_ticket_book_test");
        let store = open_ticket_store(dir);

        let ticket = store.book(valid_draft()).expect("Booking failed");
        assert_eq!(ticket.number_of_tickets, 1);
        assert_eq!(ticket.payment_status, PaymentStatus::Paid);
        assert!(ticket.ticket_number.starts_with("TRN"));
        assert_eq!(ticket.ticket_number.len(), 9);
        assert!(ticket.ticket_number[3..].chars().all(|c| c.is_ascii_digit()));

        let all = store.all_tickets().expect("Listing failed");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], ticket);

        fs::remove_dir_all(dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_validation_reports_first_invalid_field() {
        let mut draft = valid_draft();
        draft.train_number.clear();
        draft.phone_number.clear();

        match draft.validate() {
            Err(StoreError::InvalidDraft(msg)) => {
                assert!(msg.contains("train number"), "unexpected message: {}", msg)
            }
            other => panic!("Expected InvalidDraft, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_additional_passenger_is_rejected() {
        let dir = Path::new("/tmp/rustic_railways_ticket_passenger_test");
        let store = open_ticket_store(dir);

        let mut draft = valid_draft();
        draft.additional_passengers = vec![
            Passenger {
                name: "Ravi Verma".to_string(),
                age: 36,
            },
            Passenger {
                name: String::new(),
                age: 12,
            },
        ];

        match store.book(draft) {
            Err(StoreError::InvalidDraft(msg)) => {
                assert!(msg.contains("passenger 3"), "unexpected message: {}", msg)
            }
            other => panic!("Expected InvalidDraft, got {:?}", other),
        }

        // No partial booking may be left behind
        assert!(store.all_tickets().expect("Listing failed").is_empty());

        fs::remove_dir_all(dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_phone_filter_is_exact() {
        let dir = Path::new("/tmp/rustic_railways_ticket_phone_test");
        let store = open_ticket_store(dir);

        store.book(valid_draft()).expect("Booking failed");
        let mut other = valid_draft();
        other.phone_number = "+911112223334".to_string();
        store.book(other).expect("Booking failed");

        let mine = store
            .tickets_by_phone("+919876543210")
            .expect("Filter failed");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].phone_number, "+919876543210");

        // Prefixes must not match
        assert!(store
            .tickets_by_phone("+9198765")
            .expect("Filter failed")
            .is_empty());

        fs::remove_dir_all(dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_colliding_ticket_number_is_redrawn() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        // Two RNGs from the same seed draw the same first candidate, so
        // planting that candidate as an existing ticket forces a collision
        let mut peek_rng = StdRng::seed_from_u64(42);
        let taken = format!(
            "{}{}",
            TICKET_NUMBER_PREFIX,
            peek_rng.gen_range(100_000..1_000_000)
        );

        let existing = vec![Ticket {
            id: "ticket_0_aaaaaaa".to_string(),
            train_number: "12259".to_string(),
            train_name: "Shatabdi Express".to_string(),
            source: "New Delhi Railway Station".to_string(),
            destination: "Jaipur Junction".to_string(),
            passenger_name: "Asha Verma".to_string(),
            passenger_age: 34,
            departure_time: "06:05".to_string(),
            arrival_time: "10:35".to_string(),
            ticket_number: taken.clone(),
            payment_status: PaymentStatus::Paid,
            phone_number: "+919876543210".to_string(),
            passengers: vec![Passenger {
                name: "Asha Verma".to_string(),
                age: 34,
            }],
            number_of_tickets: 1,
        }];

        let mut rng = StdRng::seed_from_u64(42);
        let number = generate_ticket_number(&existing, &mut rng);

        assert_ne!(number, taken, "Colliding draw must be redrawn");
        assert!(number.starts_with(TICKET_NUMBER_PREFIX));
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
        assert!(!existing.iter().any(|t| t.ticket_number == number));
    }

    #[test]
    fn test_multi_passenger_booking_counts_everyone() {
        let dir = Path::new("/tmp/rustic_railways_ticket_multi_test");
        let store = open_ticket_store(dir);

        let mut draft = valid_draft();
        draft.additional_passengers = vec![Passenger {
            name: "Ravi Verma".to_string(),
            age: 36,
        }];

        let ticket = store.book(draft).expect("Booking failed");
        assert_eq!(ticket.number_of_tickets, 2);
        assert_eq!(ticket.passengers.len(), 2);
        assert_eq!(ticket.passengers[0].name, "Asha Verma");
        assert_eq!(ticket.passengers[1].name, "Ravi Verma");

        fs::remove_dir_all(dir).expect("Failed to remove test directory");
    }
}
