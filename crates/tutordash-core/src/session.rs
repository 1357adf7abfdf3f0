//! Session record contract.
//!
//! A session record is the persisted [`SessionToken`] plus its lifetime and
//! transport attributes. Its presence is the only signal of being logged in.
//! There is no revocation list: deleting the record is the only way to end a
//! session.

use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

use crate::SessionToken;

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// How long a session record stays valid after creation.
pub const SESSION_LIFETIME: Duration = Duration::days(7);

/// Path scope of the session record (the whole application).
pub const SESSION_PATH: &str = "/";

/// Holds zero or one session record for a single agent.
///
/// Implementations must make `create` replace any previous record, `read`
/// report expired records as absent, and `delete` a no-op when nothing is
/// stored.
pub trait SessionStore {
    fn create(&self, token: SessionToken);

    fn read(&self) -> Option<SessionToken>;

    fn delete(&self);
}

struct SessionRecord {
    token: SessionToken,
    expires_at: OffsetDateTime,
}

/// In-process [`SessionStore`], enforcing expiry lazily on `read`.
pub struct MemorySessionStore {
    lifetime: Duration,
    record: Mutex<Option<SessionRecord>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_lifetime(SESSION_LIFETIME)
    }
}

impl MemorySessionStore {
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            lifetime,
            record: Mutex::new(None),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, token: SessionToken) {
        let expires_at = OffsetDateTime::now_utc() + self.lifetime;
        *self.record.lock().expect("Locking failed") = Some(SessionRecord { token, expires_at });
    }

    fn read(&self) -> Option<SessionToken> {
        let mut lock = self.record.lock().expect("Locking failed");
        let expired = lock
            .as_ref()
            .is_some_and(|record| record.expires_at <= OffsetDateTime::now_utc());
        if expired {
            *lock = None;
        }
        lock.as_ref().map(|record| record.token.clone())
    }

    fn delete(&self) {
        self.record.lock().expect("Locking failed").take();
    }
}
