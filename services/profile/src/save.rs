//! Sequencing of the profile save
//!
//! A save is three independent writes followed by a refresh:
//! `PUT /profile`, `PUT /profile/languages`, `PUT /profile/availability`,
//! then `GET /profile`. Steps run strictly in order and the first failure
//! stops the sequence. Earlier writes are not rolled back, so a failure on
//! the languages step leaves the profile fields saved. Nothing is retried.

use std::fmt;

use common::ApiError;
use thiserror::Error;
use tracing::{error, info};

use crate::api::ProfileApi;
use crate::models::ProfileResponse;
use crate::normalize::NormalizedProfile;

/// One request of the save sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    Profile,
    Languages,
    Availability,
    Refresh,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaveStep::Profile => "profile",
            SaveStep::Languages => "languages",
            SaveStep::Availability => "availability",
            SaveStep::Refresh => "refresh",
        })
    }
}

/// The step that failed and why; displays as the server's message
#[derive(Error, Debug)]
#[error("{source}")]
pub struct SaveError {
    pub step: SaveStep,
    #[source]
    pub source: ApiError,
}

impl SaveError {
    fn at(step: SaveStep) -> impl FnOnce(ApiError) -> Self {
        move |source| {
            error!("Profile save failed at {} step: {}", step, source);
            SaveError { step, source }
        }
    }
}

/// Server state after a successful save
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Server-computed matchability, if reported
    pub discoverable: Option<bool>,
    pub profile: ProfileResponse,
}

/// Run the save sequence for an already validated and normalized draft
pub async fn run_save<A: ProfileApi>(
    api: &A,
    payload: &NormalizedProfile,
) -> Result<SaveOutcome, SaveError> {
    info!("Saving profile");

    api.save_profile(&payload.profile)
        .await
        .map_err(SaveError::at(SaveStep::Profile))?;

    api.save_languages(&payload.languages)
        .await
        .map_err(SaveError::at(SaveStep::Languages))?;

    api.save_availability(&payload.availability)
        .await
        .map_err(SaveError::at(SaveStep::Availability))?;

    let profile = api
        .fetch_profile()
        .await
        .map_err(SaveError::at(SaveStep::Refresh))?;

    info!(
        "Profile saved, discoverable: {:?}",
        profile.profile.discoverable
    );

    Ok(SaveOutcome {
        discoverable: profile.profile.discoverable,
        profile,
    })
}
