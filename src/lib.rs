//! # flightdesk - back-office API client
//!
//! A Rust client for the flight-ticketing back-office REST API. The library
//! attaches the current session's bearer token to every request, serializes
//! query parameters and request bodies in the canonical form the backend
//! expects, and transparently recovers from an expired access token with a
//! single coordinated refresh-and-retry.
//!
//! ## Features
//!
//! - Typed wrappers for the auth, profile, airline and ticket endpoints
//! - Bearer token read from a pluggable session store at send time
//! - One-shot token refresh and retry on session-invalid errors; a rejected
//!   refresh credential wipes the session and navigates to the landing page
//! - Bracket-notation query serialization (`tags[]=a&tags[]=b`) and
//!   form-encoded request bodies, matching the backend's wire format
//! - Multipart uploads for airline thumbnails
//!
//! ## Basic usage
//!
//! ```no_run
//! use flightdesk::{ApiClient, Config, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), flightdesk::ApiError> {
//!     let client = ApiClient::with_config(Config::new("https://api.example.test"));
//!
//!     let credentials = Credentials {
//!         email: "admin@example.test".to_string(),
//!         password: "hunter2".to_string(),
//!     };
//!     client.login(&credentials).await?;
//!
//!     // the login response's access token is now attached automatically
//!     let airlines = client.airlines(None).await?;
//!     println!("{:?}", airlines.raw());
//!     Ok(())
//! }
//! ```
//!
//! ## Session persistence
//!
//! The session lives in a single named slot behind the [`SessionStore`]
//! trait. The default is in-memory; [`FileSessionStore`] persists the slot to
//! disk the way the web console keeps it in local storage.
//!
//! ```no_run
//! use std::sync::Arc;
//! use flightdesk::{ApiClient, FileSessionStore};
//!
//! let client = ApiClient::new()
//!     .with_session_store(Arc::new(FileSessionStore::new("session.json")));
//! ```

pub mod api;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod session;

// Re-export main types for convenience
pub use api::{ApiClient, ADMIN_ROLE};
pub use client::{Config, Navigator, NoopNavigator};
pub use endpoints::HOME_PATH;
pub use error::{classify, ApiError, Outcome, Result};
pub use models::{AirlineForm, Credentials, TicketForm};
pub use request::{Body, FilePart, QueryValue, Request};
pub use response::ApiResponse;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

// Re-export serde_json for convenience
pub use serde_json::json;
