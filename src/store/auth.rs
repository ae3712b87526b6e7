//! Who is logged in, as seen by the UI

use super::{Reducer, StoreAction};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    LoginStarted,
    LoggedIn { email: String },
    LoginFailed { message: String },
    LoggedOut,
    /// Forced logout after the refresh token expired
    SessionExpired { message: String },
}

impl AuthAction {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthAction::LoginStarted => "LOGIN_STARTED",
            AuthAction::LoggedIn { .. } => "LOGIN_SUCCESS",
            AuthAction::LoginFailed { .. } => "LOGIN_FAILED",
            AuthAction::LoggedOut => "LOGOUT",
            AuthAction::SessionExpired { .. } => "SESSION_EXPIRED",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub logged_in: bool,
    pub user_email: Option<String>,
    pub pending: bool,
    /// Shown on the login screen
    pub error: Option<String>,
}

impl Reducer for AuthState {
    fn reduce(self, action: &StoreAction) -> Self {
        let StoreAction::Auth(action) = action else {
            return self;
        };

        match action {
            AuthAction::LoginStarted => Self {
                pending: true,
                error: None,
                ..self
            },
            AuthAction::LoggedIn { email } => Self {
                logged_in: true,
                user_email: Some(email.clone()),
                pending: false,
                error: None,
            },
            AuthAction::LoginFailed { message } => Self {
                logged_in: false,
                pending: false,
                error: Some(message.clone()),
                ..self
            },
            AuthAction::LoggedOut => Self::default(),
            AuthAction::SessionExpired { message } => Self {
                error: Some(message.clone()),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(action: AuthAction) -> StoreAction {
        StoreAction::Auth(action)
    }

    #[test]
    fn test_login_flow() {
        let state = AuthState::default().reduce(&auth(AuthAction::LoginStarted));
        assert!(state.pending);

        let state = state.reduce(&auth(AuthAction::LoggedIn {
            email: "admin@example.org".to_string(),
        }));
        assert!(state.logged_in);
        assert!(!state.pending);
        assert_eq!(state.user_email.as_deref(), Some("admin@example.org"));
    }

    #[test]
    fn test_failed_login_keeps_message() {
        let state = AuthState::default()
            .reduce(&auth(AuthAction::LoginStarted))
            .reduce(&auth(AuthAction::LoginFailed {
                message: "Invalid credentials".to_string(),
            }));
        assert!(!state.logged_in);
        assert!(!state.pending);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_session_expired_logs_out_with_reason() {
        let state = AuthState {
            logged_in: true,
            user_email: Some("admin@example.org".to_string()),
            ..AuthState::default()
        };
        let next = state.reduce(&auth(AuthAction::SessionExpired {
            message: "Error 401: session expired, please login again".to_string(),
        }));
        assert!(!next.logged_in);
        assert!(next.user_email.is_none());
        assert!(next.error.is_some());
    }
}
