//! Node API access
//!
//! - `session` - access/refresh tokens and expiry checks
//! - `transport` - raw HTTP exchange (reqwest)
//! - `client` - credential injection and 401 recovery
//! - `endpoints` - API paths

pub mod client;
pub mod endpoints;
pub mod error;
pub mod session;
pub mod transport;

pub use client::{ApiClient, Navigator};
pub use error::ApiError;
pub use session::{Session, SystemClock, TokenPair};
pub use transport::HttpTransport;
