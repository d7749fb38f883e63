//! Signed-in user credentials.
//!
//! The store treats "has an access token" as "authenticated"; everything
//! else is a guest.

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

/// Bearer token issued to a signed-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(**redacted**)")
    }
}

/// Shared, cloneable holder for the current access token.
///
/// Clones observe the same token, so signing in through one handle is seen
/// by the HTTP client and the cart store alike.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Credentials {
    /// Credentials with nobody signed in.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// Credentials already holding `token`.
    #[must_use]
    pub fn signed_in(token: AccessToken) -> Self {
        let credentials = Self::default();
        credentials.sign_in(token);
        credentials
    }

    /// Replace the current token.
    pub fn sign_in(&self, token: AccessToken) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the current token.
    pub fn sign_out(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_sign_in_state() {
        let credentials = Credentials::guest();
        let observer = credentials.clone();

        assert!(!observer.is_authenticated());

        credentials.sign_in(AccessToken::new("secret"));

        assert!(observer.is_authenticated());
        assert_eq!(observer.token().as_ref().map(AccessToken::expose), Some("secret"));

        observer.sign_out();

        assert!(!credentials.is_authenticated());
    }

    #[test]
    fn debug_output_redacts_token() {
        let token = AccessToken::new("super-secret");

        assert!(!format!("{token:?}").contains("super-secret"));
        assert!(!format!("{:?}", Credentials::signed_in(token)).contains("super-secret"));
    }
}
