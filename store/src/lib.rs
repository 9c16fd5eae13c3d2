//! Persisted local state for the railway application: a string-keyed JSON
//! key-value store and the typed repositories layered on top of it
//! (booked tickets, registered users, current-user session).

pub mod error;
mod ids;
pub mod kv;
pub mod session;
pub mod ticket;
pub mod user;

pub use error::StoreError;
pub use kv::KeyValueStore;
pub use session::SessionManager;
pub use ticket::{Passenger, PaymentStatus, Ticket, TicketDraft, TicketStore};
pub use user::{NewUser, StoredUser, UserRecord};
