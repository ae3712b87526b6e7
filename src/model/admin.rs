//! Console accounts and pending account requests

use crate::model::dataset::cell_to_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered console account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_surname: String,
    /// Numeric role code
    #[serde(default)]
    pub user_role: Value,
    #[serde(default)]
    pub creation_date: String,
}

impl User {
    pub fn full_name(&self) -> String {
        full_name(&self.user_name, &self.user_surname)
    }

    pub fn role_label(&self) -> String {
        role_label(&self.user_role)
    }
}

/// Sign-up request waiting for an administrator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRequest {
    pub request_id: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_surname: String,
    #[serde(default)]
    pub user_role: Value,
    #[serde(default)]
    pub request_status: Value,
    #[serde(default)]
    pub creation_date: String,
}

impl UserRequest {
    pub fn full_name(&self) -> String {
        full_name(&self.user_name, &self.user_surname)
    }

    pub fn status_label(&self) -> String {
        cell_to_string(&self.request_status)
    }
}

fn full_name(name: &str, surname: &str) -> String {
    format!("{} {}", name, surname).trim().to_string()
}

fn role_label(role: &Value) -> String {
    match role.as_i64() {
        Some(1) => "Admin".to_string(),
        Some(2) => "User".to_string(),
        _ => cell_to_string(role),
    }
}
