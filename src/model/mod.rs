//! Model layer - plain data shared by the store, services and components
//!
//! - `admin` - console accounts and sign-up requests
//! - `dataset` - registered datasets and their previews
//! - `draft` - pieces of an in-progress dataset registration
//! - `repository` - node data-path listings
//! - `route` - screens and navigation history
//! - `modal` - modal overlay management

pub mod admin;
pub mod dataset;
pub mod draft;
pub mod modal;
pub mod repository;
pub mod route;
