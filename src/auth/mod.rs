//! Mock authentication
//!
//! Credentials are checked against a fixed table. A successful login stores
//! the user record under [`SESSION_KEY`]; logout removes it. There are no
//! tokens, no expiry and no password hashing.

use crate::error::KeuanganError;
use crate::models::User;
use crate::state::LocalStorage;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Storage key holding the serialized session user
pub const SESSION_KEY: &str = "keuanganku-user";

struct Credential {
    email: &'static str,
    password: &'static str,
    id: &'static str,
    name: &'static str,
}

const CREDENTIALS: &[Credential] = &[
    Credential {
        email: "akuntamu@gmail.com",
        password: "tamu123",
        id: "1",
        name: "Tamu",
    },
    Credential {
        email: "admin@gmail.com",
        password: "admin123",
        id: "2",
        name: "Pengguna Admin",
    },
    Credential {
        email: "swandarutirtasandhika1@gmail.com",
        password: "tamu123",
        id: "3",
        name: "Swandaru T S",
    },
];

/// Look up an exact email/password pair
fn find_user(email: &str, password: &str) -> Option<User> {
    CREDENTIALS
        .iter()
        .find(|c| c.email == email && c.password == password)
        .map(|c| User {
            id: c.id.to_string(),
            email: c.email.to_string(),
            name: c.name.to_string(),
        })
}

pub struct AuthService {
    storage: Arc<dyn LocalStorage>,
    login_delay: Duration,
}

impl AuthService {
    pub fn new(storage: Arc<dyn LocalStorage>, login_delay: Duration) -> Self {
        Self {
            storage,
            login_delay,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }

        let Some(user) = find_user(email, password) else {
            warn!(email = %email, "Login rejected");
            return Err(KeuanganError::InvalidCredentials);
        };

        let record = serde_json::to_string(&user)?;
        self.storage.set_item(SESSION_KEY, record).await?;

        info!(user_id = %user.id, "Login successful");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<()> {
        self.storage.remove_item(SESSION_KEY).await?;
        info!("Session cleared");
        Ok(())
    }

    /// Restore the session user, if any
    pub async fn current_user(&self) -> Result<Option<User>> {
        let Some(raw) = self.storage.get_item(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Ignoring unreadable session record: {}", e);
                Ok(None)
            }
        }
    }

    /// Like [`current_user`](Self::current_user) but fails when logged out
    pub async fn require_user(&self) -> Result<User> {
        self.current_user()
            .await?
            .ok_or(KeuanganError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::InMemoryStorage;
    use tokio_test::{assert_err, assert_ok};

    fn service() -> (AuthService, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let auth = AuthService::new(storage.clone(), Duration::ZERO);
        (auth, storage)
    }

    #[tokio::test]
    async fn test_each_credential_pair_logs_in() {
        for (email, password, id) in [
            ("akuntamu@gmail.com", "tamu123", "1"),
            ("admin@gmail.com", "admin123", "2"),
            ("swandarutirtasandhika1@gmail.com", "tamu123", "3"),
        ] {
            let (auth, storage) = service();
            let user = assert_ok!(auth.login(email, password).await);
            assert_eq!(user.id, id);

            let stored = storage.get_item(SESSION_KEY).await.unwrap().unwrap();
            let restored: User = serde_json::from_str(&stored).unwrap();
            assert_eq!(restored, user);
        }
    }

    #[tokio::test]
    async fn test_mismatched_pairs_store_nothing() {
        let cases = [
            ("admin@gmail.com", "tamu123"),
            ("akuntamu@gmail.com", "admin123"),
            ("ADMIN@gmail.com", "admin123"),
            ("admin@gmail.com ", "admin123"),
            ("", ""),
            ("someone@example.com", "secret"),
        ];

        for (email, password) in cases {
            let (auth, storage) = service();
            let result = auth.login(email, password).await;
            assert!(matches!(result, Err(KeuanganError::InvalidCredentials)));
            assert_eq!(storage.get_item(SESSION_KEY).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (auth, _) = service();
        assert_ok!(auth.login("admin@gmail.com", "admin123").await);
        assert!(auth.current_user().await.unwrap().is_some());

        assert_ok!(auth.logout().await);
        assert!(auth.current_user().await.unwrap().is_none());
        assert_err!(auth.require_user().await);
    }

    #[tokio::test]
    async fn test_corrupt_session_is_logged_out() {
        let (auth, storage) = service();
        storage
            .set_item(SESSION_KEY, "{broken".to_string())
            .await
            .unwrap();
        assert!(auth.current_user().await.unwrap().is_none());
    }
}
