//! Account management for administrators: accounts, sign-up requests

use super::{report, Effect};
use crate::api::endpoints::{
    ADMIN_REQUESTS_APPROVE, ADMIN_REQUESTS_LIST, ADMIN_REQUESTS_REJECT, ADMIN_USERS_CREATE,
    ADMIN_USERS_LIST,
};
use crate::api::{ApiClient, ApiError};
use crate::model::admin::{User, UserRequest};
use crate::store::{AdminAction, StoreAction};
use serde_json::{json, Value};

fn dispatch(action: AdminAction) -> Effect {
    Effect::Dispatch(StoreAction::Admin(action))
}

fn failed(err: &ApiError) -> Vec<Effect> {
    let mut effects = vec![dispatch(AdminAction::Error {
        message: err.user_message(),
    })];
    effects.extend(report(err));
    effects
}

async fn list_users(api: &ApiClient) -> Result<Effect, ApiError> {
    let users = api.get::<Vec<User>>(ADMIN_USERS_LIST).await?;
    tracing::debug!(count = users.len(), "users listed");
    Ok(dispatch(AdminAction::UsersListed(users)))
}

/// Accounts, then pending requests
pub async fn load(api: ApiClient) -> Vec<Effect> {
    let mut effects = match list_users(&api).await {
        Ok(listed) => vec![listed],
        // a privilege failure already sent the user back
        Err(err) => return failed(&err),
    };
    match api.get::<Vec<UserRequest>>(ADMIN_REQUESTS_LIST).await {
        Ok(requests) => effects.push(dispatch(AdminAction::RequestsListed(requests))),
        Err(err) => effects.extend(failed(&err)),
    }
    effects
}

/// Account form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

pub async fn create_user(api: ApiClient, user: NewUser) -> Vec<Effect> {
    let body = json!({
        "name": user.name,
        "surname": user.surname,
        "email": user.email,
        "password": user.password,
        "confirm": user.confirm,
    });

    match api.post::<User>(ADMIN_USERS_CREATE, body).await {
        Ok(created) => {
            tracing::info!(email = %created.user_email, "user created");
            vec![
                dispatch(AdminAction::UserCreated(created)),
                Effect::Notice("User has been created".to_string()),
            ]
        }
        Err(err) => {
            tracing::warn!(email = %user.email, error = %err, "user creation failed");
            vec![dispatch(AdminAction::CreateFailed {
                message: err.user_message(),
            })]
        }
    }
}

/// Approve a sign-up request; the node creates the account
pub async fn approve(api: ApiClient, request_id: String) -> Vec<Effect> {
    let body = json!({ "request_id": request_id });
    if let Err(err) = api.post::<Value>(ADMIN_REQUESTS_APPROVE, body).await {
        return report(&err);
    }
    tracing::info!(%request_id, "request approved");

    let mut effects = vec![
        dispatch(AdminAction::RequestApproved { request_id }),
        Effect::Notice("Request has been approved".to_string()),
    ];
    match list_users(&api).await {
        Ok(listed) => effects.push(listed),
        Err(err) => effects.extend(report(&err)),
    }
    effects
}

pub async fn reject(api: ApiClient, request_id: String) -> Vec<Effect> {
    match api
        .post::<UserRequest>(ADMIN_REQUESTS_REJECT, json!({ "request_id": request_id }))
        .await
    {
        Ok(request) => {
            tracing::info!(%request_id, "request rejected");
            vec![
                dispatch(AdminAction::RequestRejected(request)),
                Effect::Notice("Request has been rejected".to_string()),
            ]
        }
        Err(err) => report(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::NavEvent;
    use crate::api::client::INSUFFICIENT_PRIVILEGES_MESSAGE;
    use crate::services::tests::{client_for, envelope, error_envelope};
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json(id: &str, email: &str) -> Value {
        json!({
            "user_id": id,
            "user_email": email,
            "user_name": "Jane",
            "user_surname": "Doe",
            "user_role": 2,
            "password_hash": "hash",
            "creation_date": "Mon Oct 19 10:00:00 2026"
        })
    }

    #[tokio::test]
    async fn test_load_lists_users_then_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ADMIN_USERS_LIST))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                user_json("user_1", "jane@example.org")
            ]))))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ADMIN_REQUESTS_LIST))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
                "request_id": "request_1",
                "user_email": "john@example.org",
                "request_status": "NEW"
            }]))))
            .expect(1)
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = load(api).await;

        let [Effect::Dispatch(StoreAction::Admin(AdminAction::UsersListed(users))), Effect::Dispatch(StoreAction::Admin(AdminAction::RequestsListed(requests)))] =
            effects.as_slice()
        else {
            panic!("unexpected effects: {:?}", effects);
        };
        assert_eq!(users[0].user_email, "jane@example.org");
        assert_eq!(requests[0].request_id, "request_1");
    }

    #[tokio::test]
    async fn test_load_without_admin_role_goes_back_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ADMIN_USERS_LIST))
            .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope("Admin only")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ADMIN_REQUESTS_LIST))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
            .expect(0)
            .mount(&server)
            .await;
        let (api, navigator) = client_for(&server);

        let effects = load(api).await;

        // the client alerted already; only the slice hears about it
        assert_eq!(
            effects,
            vec![dispatch(AdminAction::Error {
                message: ApiError::InsufficientPrivileges.user_message()
            })]
        );
        assert_eq!(
            navigator.events(),
            vec![
                NavEvent::Alert(INSUFFICIENT_PRIVILEGES_MESSAGE.to_string()),
                NavEvent::Back
            ]
        );
    }

    #[tokio::test]
    async fn test_create_user_sends_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ADMIN_USERS_CREATE))
            .and(body_json(json!({
                "name": "Jane",
                "surname": "Doe",
                "email": "jane@example.org",
                "password": "S3cret-pass",
                "confirm": "S3cret-pass"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(envelope(user_json("user_9", "jane@example.org"))),
            )
            .expect(1)
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = create_user(
            api,
            NewUser {
                name: "Jane".to_string(),
                surname: "Doe".to_string(),
                email: "jane@example.org".to_string(),
                password: "S3cret-pass".to_string(),
                confirm: "S3cret-pass".to_string(),
            },
        )
        .await;

        assert!(matches!(
            &effects[0],
            Effect::Dispatch(StoreAction::Admin(AdminAction::UserCreated(user)))
                if user.user_id == "user_9"
        ));
        assert_eq!(effects[1], Effect::Notice("User has been created".to_string()));
    }

    #[tokio::test]
    async fn test_create_user_rejection_stays_on_the_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ADMIN_USERS_CREATE))
            .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope(
                "Password confirmation does not match to the password",
            )))
            .mount(&server)
            .await;
        let (api, navigator) = client_for(&server);

        let effects = create_user(api, NewUser::default()).await;

        assert_eq!(
            effects,
            vec![dispatch(AdminAction::CreateFailed {
                message: "Password confirmation does not match to the password".to_string()
            })]
        );
        assert!(navigator.events().is_empty());
    }

    #[tokio::test]
    async fn test_approve_reloads_users() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ADMIN_REQUESTS_APPROVE))
            .and(body_partial_json(json!({"request_id": "request_1"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
                "user_id": "user_2",
                "user_email": "john@example.org"
            }))))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ADMIN_USERS_LIST))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                user_json("user_2", "john@example.org")
            ]))))
            .expect(1)
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        let effects = approve(api, "request_1".to_string()).await;

        assert_eq!(
            effects[0],
            dispatch(AdminAction::RequestApproved {
                request_id: "request_1".to_string()
            })
        );
        assert!(matches!(
            &effects[2],
            Effect::Dispatch(StoreAction::Admin(AdminAction::UsersListed(users))) if users.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_reject_unknown_request_alerts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ADMIN_REQUESTS_REJECT))
            .and(body_partial_json(json!({"request_id": "request_7"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope(
                "Request with id request_7 not found",
            )))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ADMIN_REQUESTS_REJECT))
            .and(body_partial_json(json!({"request_id": "request_1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "request_id": "request_1",
                "request_status": "REJECTED"
            }))))
            .mount(&server)
            .await;
        let (api, _) = client_for(&server);

        assert_eq!(
            reject(api.clone(), "request_7".to_string()).await,
            vec![Effect::Alert("Request with id request_7 not found".to_string())]
        );

        let effects = reject(api, "request_1".to_string()).await;
        assert!(matches!(
            &effects[0],
            Effect::Dispatch(StoreAction::Admin(AdminAction::RequestRejected(request)))
                if request.status_label() == "REJECTED"
        ));
    }
}
