//! Login, logout and password change

use super::{report, Effect};
use crate::api::endpoints::{AUTH_TOKEN, UPDATE_PASSWORD};
use crate::api::{ApiClient, ApiError, TokenPair};
use crate::model::route::Route;
use crate::store::{AuthAction, StoreAction};
use serde_json::{json, Value};

pub const PASSWORD_CHANGED_MESSAGE: &str = "Password has been successfully changed.";

pub async fn login(api: ApiClient, email: String, password: String) -> Vec<Effect> {
    let body = json!({ "email": email, "password": password });

    match api.post::<TokenPair>(AUTH_TOKEN, body).await {
        Ok(tokens) => {
            api.session().store(tokens);
            tracing::info!(%email, "logged in");
            vec![
                Effect::Dispatch(StoreAction::Auth(AuthAction::LoggedIn { email })),
                Effect::Restart(Route::Datasets),
            ]
        }
        Err(err) => {
            tracing::warn!(%email, error = %err, "login failed");
            let message = match &err {
                ApiError::Transport(_) | ApiError::Timeout(_) => err.to_string(),
                _ => err.user_message(),
            };
            vec![Effect::Dispatch(StoreAction::Auth(AuthAction::LoginFailed {
                message,
            }))]
        }
    }
}

/// Forget the tokens and return to the login page
pub fn logout(api: &ApiClient) -> Vec<Effect> {
    api.session().clear();
    tracing::info!("logged out");
    vec![
        Effect::Dispatch(StoreAction::Auth(AuthAction::LoggedOut)),
        Effect::Restart(Route::Login),
    ]
}

/// Password form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub email: String,
    pub old_password: String,
    pub password: String,
    pub confirm: String,
}

pub async fn update_password(api: ApiClient, change: PasswordChange) -> Vec<Effect> {
    let body = json!({
        "email": change.email,
        "old_password": change.old_password,
        "password": change.password,
        "confirm": change.confirm,
    });

    match api.post::<Value>(UPDATE_PASSWORD, body).await {
        Ok(_) => vec![Effect::PasswordUpdated(Ok(PASSWORD_CHANGED_MESSAGE.to_string()))],
        Err(err) if err.is_reported() => report(&err),
        Err(err) => vec![Effect::PasswordUpdated(Err(err.user_message()))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tests::{client_for, envelope, error_envelope};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_stores_tokens_and_restarts_at_datasets() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AUTH_TOKEN))
            .and(body_partial_json(json!({"email": "admin@example.org"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "access_token": "access-9",
                "refresh_token": "refresh-9"
            }))))
            .expect(1)
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);
        api.session().clear();

        let effects = login(api.clone(), "admin@example.org".to_string(), "pw".to_string()).await;

        assert_eq!(api.session().access_token().as_deref(), Some("access-9"));
        assert_eq!(effects[1], Effect::Restart(Route::Datasets));
    }

    #[tokio::test]
    async fn test_login_rejected_reports_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AUTH_TOKEN))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(error_envelope("Invalid credentials")),
            )
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);
        api.session().clear();

        let effects = login(api, "admin@example.org".to_string(), "bad".to_string()).await;

        assert_eq!(
            effects,
            vec![Effect::Dispatch(StoreAction::Auth(AuthAction::LoginFailed {
                message: "Invalid credentials".to_string()
            }))]
        );
    }

    #[tokio::test]
    async fn test_password_update_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(UPDATE_PASSWORD))
            .and(body_partial_json(json!({"old_password": "right"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(UPDATE_PASSWORD))
            .and(body_partial_json(json!({"old_password": "wrong"})))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(error_envelope("Old password is wrong")),
            )
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let change = |old: &str| PasswordChange {
            email: "admin@example.org".to_string(),
            old_password: old.to_string(),
            password: "N3w-password".to_string(),
            confirm: "N3w-password".to_string(),
        };

        assert_eq!(
            update_password(api.clone(), change("right")).await,
            vec![Effect::PasswordUpdated(Ok(PASSWORD_CHANGED_MESSAGE.to_string()))]
        );
        assert_eq!(
            update_password(api, change("wrong")).await,
            vec![Effect::PasswordUpdated(Err("Old password is wrong".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let server = MockServer::start().await;
        let (api, _) = client_for(&server);

        let effects = logout(&api);

        assert!(!api.session().is_logged_in());
        assert_eq!(effects[1], Effect::Restart(Route::Login));
    }
}
