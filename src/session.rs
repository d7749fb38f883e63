//! Guest session identity.

use std::sync::Arc;

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};
use tracing::info;

use crate::{
    ids::TypedId,
    storage::{DurableStorage, StorageError},
};

/// Storage key holding the guest session identifier.
pub const SESSION_STORAGE_KEY: &str = "sessionId";

/// Prefix of generated session identifiers.
pub const SESSION_ID_PREFIX: &str = "guest";

const SESSION_TOKEN_CHARS: usize = 12;

/// Marker for guest session identifiers.
#[derive(Debug)]
pub struct GuestSession;

/// Opaque identifier correlating a guest's cart across requests.
pub type SessionId = TypedId<GuestSession>;

/// Hands out the stable anonymous identifier for this client profile.
#[derive(Clone)]
pub struct SessionIdentity {
    storage: Arc<dyn DurableStorage>,
}

impl std::fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentity").finish_non_exhaustive()
    }
}

impl SessionIdentity {
    /// Create an identity provider over the given storage.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self { storage }
    }

    /// Return the persisted identifier, generating and persisting one first
    /// if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be read or written.
    pub fn get_or_create(&self) -> Result<SessionId, StorageError> {
        if let Some(existing) = self.current()? {
            return Ok(existing);
        }

        let session = generate_session_id(Timestamp::now());

        self.storage.set(SESSION_STORAGE_KEY, session.as_str())?;

        info!(session_id = %session, "created guest session");

        Ok(session)
    }

    /// Return the persisted identifier without creating one.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be read.
    pub fn current(&self) -> Result<Option<SessionId>, StorageError> {
        Ok(self
            .storage
            .get(SESSION_STORAGE_KEY)?
            .filter(|value| !value.trim().is_empty())
            .map(SessionId::new))
    }

    /// Delete the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be written.
    pub fn forget(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_STORAGE_KEY)
    }
}

fn generate_session_id(now: Timestamp) -> SessionId {
    let token: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_CHARS)
        .map(char::from)
        .collect();

    SessionId::new(format!(
        "{SESSION_ID_PREFIX}_{}_{token}",
        now.as_millisecond()
    ))
}
