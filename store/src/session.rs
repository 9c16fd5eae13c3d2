use crate::error::StoreError;
use crate::ids::timestamped_id;
use crate::kv::KeyValueStore;
use crate::user::{NewUser, StoredUser, UserRecord};

/// Key the registered-users list is persisted under.
pub const USERS_KEY: &str = "users";
/// Key the current-user record is persisted under.
pub const CURRENT_USER_KEY: &str = "current_user";

/// Stored-record session handling: signup, login, logout, and the persisted
/// current-user record. Credential checks are plain record matching; this is
/// a local demo surface, not an authentication system.
pub struct SessionManager {
    kv: KeyValueStore,
}

impl SessionManager {
    pub fn new(kv: KeyValueStore) -> Self {
        SessionManager { kv }
    }

    fn users(&self) -> Result<Vec<StoredUser>, StoreError> {
        Ok(self.kv.get(USERS_KEY)?.unwrap_or_default())
    }

    /// Registers a new user and logs them in. Fails if the email is taken.
    pub fn signup(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users()?;

        if users.iter().any(|user| user.email == new_user.email) {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }

        let stored = StoredUser {
            id: timestamped_id("user"),
            name: new_user.name,
            email: new_user.email,
            gender: new_user.gender,
            phone: new_user.phone,
            age: new_user.age,
            password: new_user.password,
        };

        let profile = stored.profile();
        users.push(stored);
        self.kv.set(USERS_KEY, &users)?;
        self.kv.set(CURRENT_USER_KEY, &profile)?;

        Ok(profile)
    }

    /// Logs in against the stored users list and persists the current user.
    pub fn login(&self, email: &str, password: &str) -> Result<UserRecord, StoreError> {
        let users = self.users()?;
        let found = users
            .iter()
            .find(|user| user.email == email && user.password == password)
            .ok_or(StoreError::InvalidCredentials)?;

        let profile = found.profile();
        self.kv.set(CURRENT_USER_KEY, &profile)?;

        Ok(profile)
    }

    /// Clears the persisted current-user record.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.kv.remove(CURRENT_USER_KEY)
    }

    /// The persisted current user, if anyone is logged in.
    pub fn current_user(&self) -> Result<Option<UserRecord>, StoreError> {
        self.kv.get(CURRENT_USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logger::Logger;
    use std::fs;
    use std::path::Path;

    fn open_session_manager(dir: &Path) -> SessionManager {
        fs::create_dir_all(dir).expect("Failed to create test directory");
        let logger = Logger::new(dir, "session-test").expect("Failed to create logger");
        let kv = KeyValueStore::open(dir, logger).expect("Failed to open store");
        SessionManager::new(kv)
    }

    fn sample_user() -> NewUser {
        NewUser {
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            gender: "female".to_string(),
            phone: "+919876543210".to_string(),
            age: 34,
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_signup_logs_the_user_in() {
        let dir = Path::new("/tmp/rustic_railways_session_signup_test");
        let sessions = open_session_manager(dir);

        let profile = sessions.signup(sample_user()).expect("Signup failed");
        assert_eq!(profile.email, "asha@example.com");

        let current = sessions
            .current_user()
            .expect("Current-user read failed")
            .expect("Expected a logged-in user");
        assert_eq!(current, profile);

        fs::remove_dir_all(dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let dir = Path::new("/tmp/rustic_railways_session_duplicate_test");
        let sessions = open_session_manager(dir);

        sessions.signup(sample_user()).expect("Signup failed");
        match sessions.signup(sample_user()) {
            Err(StoreError::DuplicateEmail(email)) => assert_eq!(email, "asha@example.com"),
            other => panic!("Expected DuplicateEmail, got {:?}", other),
        }

        fs::remove_dir_all(dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_login_checks_both_email_and_password() {
        let dir = Path::new("/tmp/rustic_railways_session_login_test");
        let sessions = open_session_manager(dir);

        sessions.signup(sample_user()).expect("Signup failed");
        sessions.logout().expect("Logout failed");
        assert!(sessions
            .current_user()
            .expect("Current-user read failed")
            .is_none());

        assert!(matches!(
            sessions.login("asha@example.com", "wrong"),
            Err(StoreError::InvalidCredentials)
        ));

        let profile = sessions
            .login("asha@example.com", "secret")
            .expect("Login failed");
        assert_eq!(profile.name, "Asha Verma");

        fs::remove_dir_all(dir).expect("Failed to remove test directory");
    }
}
