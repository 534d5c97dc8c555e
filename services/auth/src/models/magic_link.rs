//! Magic link request and verification payloads

use serde::{Deserialize, Serialize};

use super::AuthUser;

/// Body of `POST /auth/magic-link`
#[derive(Debug, Clone, Serialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

/// Answer to a magic link request
///
/// `dev_login_url` is only present when the backend runs outside production.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MagicLinkResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub dev_login_url: Option<String>,
}

/// Body of `POST /auth/verify`
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Answer to a successful verification
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub access_token: String,
    pub user: AuthUser,
}
