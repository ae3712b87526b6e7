//! Action creators and the runner that executes them
//!
//! Each action creator is an async function that calls the node API and
//! turns the outcome into [`Effect`]s. The [`ApiRunner`] executes them off
//! the UI thread; the app drains the resulting effects on every tick.

pub mod admin;
pub mod auth;
pub mod bids;
pub mod datasets;
pub mod medical_folder;
pub mod node;
pub mod repository;
pub mod runner;

pub use runner::{ApiRunner, ChannelNavigator};

use crate::api::ApiError;
use crate::model::route::Route;
use crate::store::StoreAction;
use serde::Deserialize;

/// Something the UI must do as the result of an API call
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Dispatch(StoreAction),
    /// Blocking error dialog
    Alert(String),
    /// Transient status-bar message
    Notice(String),
    /// Push a screen onto the history
    Navigate(Route),
    /// Drop the history and start over at a screen
    Restart(Route),
    /// One step back in history
    Back,
    /// Tokens are gone; back to the login page with this message
    SessionExpired(String),
    /// Outcome of a password change, success text or error text
    PasswordUpdated(Result<String, String>),
}

/// Alert for a failed call, unless the client already told the user
pub(crate) fn report(err: &ApiError) -> Vec<Effect> {
    if err.is_reported() {
        tracing::debug!(error = %err, "api error already reported");
        Vec::new()
    } else {
        tracing::warn!(error = %err, "api call failed");
        vec![Effect::Alert(err.user_message())]
    }
}

/// `{valid: false, message}` answer some validation endpoints give with a 200
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Verdict {
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Verdict {
    /// The rejection message when the node said `valid: false`
    pub fn rejection(&self, fallback: &str) -> Option<String> {
        (self.valid == Some(false)).then(|| {
            self.message
                .clone()
                .unwrap_or_else(|| fallback.to_string())
        })
    }
}
