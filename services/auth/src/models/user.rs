//! Signed-in user as reported by the API

use serde::{Deserialize, Serialize};

/// User returned by magic link verification and profile fetches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
}
