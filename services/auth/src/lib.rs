//! Authentication flow for the Amiglot client
//!
//! Sign-in is passwordless: the user requests a magic link by email, the link
//! carries a one-time token, and verifying that token yields an access token
//! and user id that are kept in the session store.

pub mod error;
pub mod magic_link;
pub mod models;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use magic_link::MagicLinkService;
pub use models::{AuthUser, MagicLinkResponse};
