use serde::{Deserialize, Serialize};

/// Public profile of a registered user, as exposed to the rest of the
/// application and persisted as the current-user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub phone: String,
    pub age: u32,
}

/// A user as kept in the persisted users list. The password travels with the
/// stored record but never with the public profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub phone: String,
    pub age: u32,
    pub password: String,
}

impl StoredUser {
    /// The password-free view of this user.
    pub fn profile(&self) -> UserRecord {
        UserRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            phone: self.phone.clone(),
            age: self.age,
        }
    }
}

/// Signup request, before an id has been assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub phone: String,
    pub age: u32,
    pub password: String,
}
