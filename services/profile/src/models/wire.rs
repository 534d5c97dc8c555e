//! Request and response bodies of the profile endpoints

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `PUT /profile`
///
/// Optional values are sent as explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub handle: String,
    pub birth_year: Option<i32>,
    pub birth_month: Option<u32>,
    pub country_code: Option<String>,
    pub timezone: String,
}

/// One language as stored by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePayload {
    pub language_code: String,
    pub level: u8,
    #[serde(default)]
    pub is_native: bool,
    #[serde(default)]
    pub is_target: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// One weekday's resolved time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub weekday: u8,
    pub start_local_time: String,
    pub end_local_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timezone: String,
}

/// Body of `PUT /profile/languages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagesUpdate {
    pub languages: Vec<LanguagePayload>,
}

/// Body of `PUT /profile/availability`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityUpdate {
    pub availability: Vec<AvailabilityRecord>,
}

/// Account the profile belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
}

/// Profile fields as returned by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub handle: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub birth_month: Option<u32>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Server-computed: complete enough to be matched
    #[serde(default)]
    pub discoverable: Option<bool>,
}

/// Body of `GET /profile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user: AccountSummary,
    #[serde(default)]
    pub profile: ProfileRecord,
    #[serde(default)]
    pub languages: Vec<LanguagePayload>,
    #[serde(default)]
    pub availability: Vec<AvailabilityRecord>,
}

/// Body of `GET /profile/handle/check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HandleCheckResponse {
    pub available: bool,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
