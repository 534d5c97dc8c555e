//! Profile endpoints of the backend API

use std::future::Future;

use common::{ApiClient, error::ApiResult};
use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::info;

use crate::handle_check::HandleLookup;
use crate::models::{
    AvailabilityUpdate, HandleCheckResponse, LanguagesUpdate, ProfileResponse, ProfileUpdate,
};

pub const PROFILE_PATH: &str = "/profile";
pub const PROFILE_LANGUAGES_PATH: &str = "/profile/languages";
pub const PROFILE_AVAILABILITY_PATH: &str = "/profile/availability";
pub const HANDLE_CHECK_PATH: &str = "/profile/handle/check";

/// Remote operations the profile editor depends on
pub trait ProfileApi: HandleLookup {
    /// `GET /profile`
    fn fetch_profile(&self) -> impl Future<Output = ApiResult<ProfileResponse>> + Send;

    /// `PUT /profile`
    fn save_profile(&self, update: &ProfileUpdate) -> impl Future<Output = ApiResult<()>> + Send;

    /// `PUT /profile/languages`
    fn save_languages(
        &self,
        update: &LanguagesUpdate,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// `PUT /profile/availability`
    fn save_availability(
        &self,
        update: &AvailabilityUpdate,
    ) -> impl Future<Output = ApiResult<()>> + Send;
}

/// [`ProfileApi`] over HTTP
#[derive(Clone)]
pub struct HttpProfileApi {
    client: ApiClient,
}

#[derive(Serialize)]
struct HandleQuery<'a> {
    handle: &'a str,
}

impl HttpProfileApi {
    /// Create a new profile API
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn put(&self, path: &str, body: &(impl Serialize + Sync)) -> ApiResult<()> {
        // Only the status matters; the body is ignored.
        let _: IgnoredAny = self.client.put_json(path, body).await?;
        Ok(())
    }
}

impl HandleLookup for HttpProfileApi {
    async fn check_handle(&self, handle: &str) -> ApiResult<bool> {
        let response: HandleCheckResponse = self
            .client
            .get_json_with_query(HANDLE_CHECK_PATH, &HandleQuery { handle })
            .await?;
        Ok(response.available)
    }
}

impl ProfileApi for HttpProfileApi {
    async fn fetch_profile(&self) -> ApiResult<ProfileResponse> {
        self.client.get_json(PROFILE_PATH).await
    }

    async fn save_profile(&self, update: &ProfileUpdate) -> ApiResult<()> {
        info!("Saving profile fields for {}", update.handle);
        self.put(PROFILE_PATH, update).await
    }

    async fn save_languages(&self, update: &LanguagesUpdate) -> ApiResult<()> {
        info!("Saving {} languages", update.languages.len());
        self.put(PROFILE_LANGUAGES_PATH, update).await
    }

    async fn save_availability(&self, update: &AvailabilityUpdate) -> ApiResult<()> {
        info!("Saving {} availability records", update.availability.len());
        self.put(PROFILE_AVAILABILITY_PATH, update).await
    }
}
