//! Screens and navigation history
//!
//! The router keeps a history stack so "go back one step" has a meaning,
//! which the API client relies on after a privilege failure.

use std::fmt;

/// A screen of the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Datasets,
    DatasetPreview { dataset_id: String },
    AddDataset,
    MedicalFolderWizard,
    BidsWizard,
    NodeConfig,
    PasswordChange,
    Admin,
}

impl Route {
    pub fn title(&self) -> &str {
        match self {
            Route::Login => "Login",
            Route::Datasets => "Datasets",
            Route::DatasetPreview { .. } => "Dataset Preview",
            Route::AddDataset => "Add Dataset",
            Route::MedicalFolderWizard => "Add MedicalFolder Dataset",
            Route::BidsWizard => "Add BIDS Dataset",
            Route::NodeConfig => "Node Configuration",
            Route::PasswordChange => "Change Password",
            Route::Admin => "User Management",
        }
    }

    /// Entries of the navigation menu, in display order
    pub fn menu() -> Vec<Route> {
        vec![
            Route::Datasets,
            Route::AddDataset,
            Route::MedicalFolderWizard,
            Route::BidsWizard,
            Route::NodeConfig,
            Route::PasswordChange,
            Route::Admin,
        ]
    }

    pub fn requires_login(&self) -> bool {
        *self != Route::Login
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::DatasetPreview { dataset_id } => write!(f, "{} ({})", self.title(), dataset_id),
            other => write!(f, "{}", other.title()),
        }
    }
}

/// Navigation history; the last entry is the current screen
#[derive(Debug)]
pub struct Router {
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
        }
    }

    pub fn current(&self) -> &Route {
        // history is never empty: `back` keeps the first entry
        &self.history[self.history.len() - 1]
    }

    /// Go to `route`, unless it is already the current screen
    pub fn navigate(&mut self, route: Route) {
        if *self.current() != route {
            self.history.push(route);
        }
    }

    /// Go back one step; stays put on the first screen
    pub fn back(&mut self) -> &Route {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.current()
    }

    /// Drop all history and start over at `route` (login, logout)
    pub fn reset(&mut self, route: Route) {
        self.history.clear();
        self.history.push(route);
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}
