//! Authentication flow models

pub mod magic_link;
pub mod user;

// Re-export for convenience
pub use magic_link::{MagicLinkRequest, MagicLinkResponse, VerifyRequest, VerifyResponse};
pub use user::AuthUser;
