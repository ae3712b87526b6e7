//! Console accounts and sign-up requests, for administrators

use super::{Reducer, StoreAction};
use crate::model::admin::{User, UserRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    Loading,
    UsersListed(Vec<User>),
    RequestsListed(Vec<UserRequest>),
    CreateStarted,
    UserCreated(User),
    CreateFailed { message: String },
    /// The node turned the request into an account and dropped it
    RequestApproved { request_id: String },
    RequestRejected(UserRequest),
    Error { message: String },
}

impl AdminAction {
    pub fn kind(&self) -> &'static str {
        match self {
            AdminAction::Loading => "LIST_USERS_PENDING",
            AdminAction::UsersListed(_) => "LIST_USERS",
            AdminAction::RequestsListed(_) => "LIST_REQUESTS",
            AdminAction::CreateStarted => "CREATE_USER_PENDING",
            AdminAction::UserCreated(_) => "CREATE_USER",
            AdminAction::CreateFailed { .. } => "CREATE_USER_FAILED",
            AdminAction::RequestApproved { .. } => "APPROVE_REQUEST",
            AdminAction::RequestRejected(_) => "REJECT_REQUEST",
            AdminAction::Error { .. } => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    pub users: Vec<User>,
    pub requests: Vec<UserRequest>,
    pub loading: bool,
    pub creating: bool,
    /// Email of the account created last
    pub created: Option<String>,
    pub create_error: Option<String>,
    pub error: Option<String>,
}

impl Reducer for AdminState {
    fn reduce(self, action: &StoreAction) -> Self {
        let StoreAction::Admin(action) = action else {
            return self;
        };

        match action {
            AdminAction::Loading => Self {
                loading: true,
                ..self
            },
            AdminAction::UsersListed(users) => Self {
                users: users.clone(),
                loading: false,
                error: None,
                ..self
            },
            AdminAction::RequestsListed(requests) => Self {
                requests: requests.clone(),
                loading: false,
                ..self
            },
            AdminAction::CreateStarted => Self {
                creating: true,
                created: None,
                create_error: None,
                ..self
            },
            AdminAction::UserCreated(user) => {
                let mut users: Vec<User> = self
                    .users
                    .into_iter()
                    .filter(|u| u.user_id != user.user_id)
                    .collect();
                users.push(user.clone());
                Self {
                    users,
                    creating: false,
                    created: Some(user.user_email.clone()),
                    ..self
                }
            }
            AdminAction::CreateFailed { message } => Self {
                creating: false,
                create_error: Some(message.clone()),
                ..self
            },
            AdminAction::RequestApproved { request_id } => Self {
                requests: self
                    .requests
                    .into_iter()
                    .filter(|r| &r.request_id != request_id)
                    .collect(),
                ..self
            },
            AdminAction::RequestRejected(request) => Self {
                requests: self
                    .requests
                    .into_iter()
                    .map(|r| {
                        if r.request_id == request.request_id {
                            request.clone()
                        } else {
                            r
                        }
                    })
                    .collect(),
                ..self
            },
            AdminAction::Error { message } => Self {
                loading: false,
                error: Some(message.clone()),
                ..self
            },
        }
    }
}
