//! Session tokens and expiry checks
//!
//! The session is an explicit object shared between the HTTP client and the
//! application instead of ambient global state. Expiry is read from the
//! access token's JWT `exp` claim and compared against an injectable clock.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Source of "now" for token expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Access and refresh token as returned by the login and refresh endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying its signature.
///
/// Returns `None` for anything that is not a three-part token with a JSON
/// payload carrying a numeric `exp`.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Utc.timestamp_opt(claims.exp?, 0).single()
}

/// Current session tokens, shared between the client and the UI
pub struct Session {
    tokens: RwLock<Option<TokenPair>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Session {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: RwLock::new(None),
            clock,
        }
    }

    /// Replace both tokens (login or successful refresh)
    pub fn store(&self, tokens: TokenPair) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = Some(tokens);
    }

    /// Drop both tokens (logout or forced expiry)
    pub fn clear(&self) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.refresh_token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether the held access token is still time-valid.
    ///
    /// A token whose expiry cannot be read counts as expired, so the client
    /// goes through the refresh path rather than reporting a privilege error.
    pub fn is_access_token_active(&self) -> bool {
        self.access_token()
            .and_then(|token| token_expiry(&token))
            .is_some_and(|exp| self.clock.now() < exp)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Clock pinned to a settable instant
    pub struct FixedClock(pub Mutex<DateTime<Utc>>);

    impl FixedClock {
        pub fn at(ts: i64) -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc.timestamp_opt(ts, 0).unwrap())))
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Build an unsigned JWT with the given expiry
    pub fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"admin","exp":{}}}"#, exp));
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_token_expiry_reads_exp_claim() {
        let token = jwt_with_exp(1_700_000_000);
        let exp = token_expiry(&token).unwrap();
        assert_eq!(exp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_token_expiry_rejects_garbage() {
        assert!(token_expiry("not-a-jwt").is_none());
        assert!(token_expiry("a.b.c").is_none());
    }

    #[test]
    fn test_active_token_before_expiry() {
        let session = Session::new(FixedClock::at(1_000));
        session.store(TokenPair {
            access_token: jwt_with_exp(2_000),
            refresh_token: "refresh".to_string(),
        });
        assert!(session.is_access_token_active());
    }

    #[test]
    fn test_expired_token_after_expiry() {
        let clock = FixedClock::at(1_000);
        let session = Session::new(clock.clone());
        session.store(TokenPair {
            access_token: jwt_with_exp(2_000),
            refresh_token: "refresh".to_string(),
        });
        *clock.0.lock().unwrap() = Utc.timestamp_opt(2_000, 0).unwrap();
        assert!(!session.is_access_token_active());
    }

    #[test]
    fn test_unreadable_token_counts_as_expired() {
        let session = Session::new(FixedClock::at(0));
        session.store(TokenPair {
            access_token: "opaque".to_string(),
            refresh_token: "refresh".to_string(),
        });
        assert!(session.is_logged_in());
        assert!(!session.is_access_token_active());
    }

    #[test]
    fn test_clear_drops_both_tokens() {
        let session = Session::default();
        session.store(TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        });
        session.clear();
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }
}
