//! Common library for the Amiglot client
//!
//! This crate provides the pieces every client flow shares: configuration,
//! the error taxonomy, the JSON API client, session storage, locale helpers
//! and tracing setup.
//!
//! ```rust,no_run
//! use common::{ApiClient, ClientConfig, SessionManager};
//! use common::session::FileSessionStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let session = SessionManager::new(Arc::new(FileSessionStore::new(&config.session_path)));
//!     let client = ApiClient::new(&config, session);
//!     let health: serde_json::Value = client.get_json("/healthz").await?;
//!     println!("API health: {}", health);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod locale;
pub mod session;
pub mod telemetry;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use http::ApiClient;
pub use session::{SessionManager, SessionStore};
