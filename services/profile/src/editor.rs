//! Profile editor controller
//!
//! Owns the draft for one editing session and ties together hydration,
//! live validation, the handle availability checker and the save sequence.
//! Callers are expected to hold a signed-in session before constructing it.

use std::sync::Arc;
use std::time::Duration;

use common::{ClientConfig, error::user_message};
use tracing::{info, warn};

use crate::api::ProfileApi;
use crate::error::{EditorError, EditorResult};
use crate::handle_check::{HandleAvailabilityChecker, HandleStatus};
use crate::models::{AvailabilitySlot, BirthField, LanguageEntry, ProfileDraft, draft::NATIVE_LEVEL};
use crate::normalize::NormalizedProfile;
use crate::save::{SaveOutcome, run_save};
use crate::validation::{FieldError, ProfileField, Section, ValidationReport, validate};

pub const PROFILE_SAVED: &str = "Profile saved.";
pub const PROFILE_SAVE_FAILED: &str = "Could not save profile.";
pub const PROFILE_LOAD_FAILED: &str = "Could not load your profile yet.";

/// Level a native entry drops to when it is marked as a target
const DEMOTED_TARGET_LEVEL: u8 = NATIVE_LEVEL - 1;

pub struct ProfileEditor<A: ProfileApi> {
    api: Arc<A>,
    checker: HandleAvailabilityChecker<A>,
    draft: ProfileDraft,
    email: String,
    discoverable: Option<bool>,
    message: Option<String>,
    loaded: bool,
    exists: bool,
}

impl<A: ProfileApi> ProfileEditor<A> {
    pub fn new(api: Arc<A>, default_timezone: &str, debounce: Duration) -> Self {
        let checker = HandleAvailabilityChecker::new(Arc::clone(&api), debounce);
        Self {
            api,
            checker,
            draft: ProfileDraft::empty(default_timezone),
            email: String::new(),
            discoverable: None,
            message: None,
            loaded: false,
            exists: false,
        }
    }

    pub fn from_config(api: Arc<A>, config: &ClientConfig) -> Self {
        Self::new(api, &config.default_timezone, config.handle_check_debounce())
    }

    /// Fetch the profile and hydrate the draft
    ///
    /// A 404 means the user has no profile yet: the default draft stays and
    /// no message is shown. Other failures keep the default draft and set a
    /// message. Either way the editor counts as loaded afterwards.
    pub async fn load(&mut self) {
        self.loaded = false;
        let default_timezone = self.draft.timezone.clone();

        match self.api.fetch_profile().await {
            Ok(response) => {
                info!("Loaded profile for {}", response.user.id);
                self.email = response.user.email.clone();
                self.discoverable = response.profile.discoverable;
                self.checker.set_original_handle(&response.profile.handle);
                self.draft = ProfileDraft::from_response(&response, &default_timezone);
                self.message = None;
                self.exists = true;
            }
            Err(e) if e.is_not_found() => {
                info!("No profile yet, starting from defaults");
                self.message = None;
            }
            Err(e) => {
                warn!("Failed to load profile: {}", e);
                self.message = Some(user_message(&e, PROFILE_LOAD_FAILED));
            }
        }

        self.loaded = true;
        self.checker.set_enabled(true);
        self.checker.on_handle_changed(&self.draft.handle);
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Last known server-computed matchability
    pub fn discoverable(&self) -> Option<bool> {
        self.discoverable
    }

    /// Status line for the last load or save
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// False until the server has returned a profile or a save succeeded
    pub fn has_profile(&self) -> bool {
        self.exists
    }

    /// Swap in a whole draft, e.g. one read from a file
    pub fn replace_draft(&mut self, draft: ProfileDraft) {
        self.draft = draft;
        self.checker.on_handle_changed(&self.draft.handle);
    }

    pub fn set_handle(&mut self, raw: &str) {
        self.draft.handle = raw.trim_start_matches('@').to_string();
        self.checker.on_handle_changed(&self.draft.handle);
    }

    pub fn set_birth_year(&mut self, input: &str) {
        self.draft.birth_year = BirthField::from_input(input);
    }

    pub fn set_birth_month(&mut self, input: &str) {
        self.draft.birth_month = BirthField::from_input(input);
    }

    pub fn set_country_code(&mut self, code: &str) {
        self.draft.country_code = code.to_string();
    }

    pub fn set_timezone(&mut self, timezone: &str) {
        self.draft.timezone = timezone.to_string();
    }

    pub fn set_language_code(&mut self, index: usize, code: &str) {
        if let Some(entry) = self.draft.languages.get_mut(index) {
            entry.language_code = code.to_string();
        }
    }

    /// Native level always clears the target flag
    pub fn set_language_level(&mut self, index: usize, level: u8) {
        if let Some(entry) = self.draft.languages.get_mut(index) {
            entry.level = level;
            if entry.is_native() {
                entry.is_target = false;
            }
        }
    }

    /// Targeting a native entry demotes it below native
    pub fn set_language_target(&mut self, index: usize, is_target: bool) {
        if let Some(entry) = self.draft.languages.get_mut(index) {
            entry.is_target = is_target;
            if is_target && entry.is_native() {
                entry.level = DEMOTED_TARGET_LEVEL;
            }
        }
    }

    pub fn set_language_description(&mut self, index: usize, description: &str) {
        if let Some(entry) = self.draft.languages.get_mut(index) {
            entry.description = Some(description.to_string());
        }
    }

    pub fn add_language(&mut self) {
        self.draft.languages.push(LanguageEntry::blank());
    }

    /// Never removes the last entry; returns whether a row was removed
    pub fn remove_language(&mut self, index: usize) -> bool {
        if self.draft.languages.len() <= 1 || index >= self.draft.languages.len() {
            return false;
        }
        self.draft.languages.remove(index);
        true
    }

    pub fn toggle_weekday(&mut self, slot: usize, weekday: u8) {
        if let Some(slot) = self.draft.availability.get_mut(slot) {
            if !slot.weekdays.remove(&weekday) {
                slot.weekdays.insert(weekday);
            }
        }
    }

    pub fn set_slot_times(&mut self, slot: usize, start: &str, end: &str) {
        if let Some(slot) = self.draft.availability.get_mut(slot) {
            slot.start_local_time = start.to_string();
            slot.end_local_time = end.to_string();
        }
    }

    pub fn set_slot_timezone(&mut self, slot: usize, timezone: &str) {
        if let Some(slot) = self.draft.availability.get_mut(slot) {
            slot.timezone = timezone.to_string();
        }
    }

    /// New slots start in the profile timezone
    pub fn add_slot(&mut self) {
        let slot = AvailabilitySlot::default_for(&self.draft.timezone);
        self.draft.availability.push(slot);
    }

    /// Never removes the last slot; returns whether a slot was removed
    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.draft.availability.len() <= 1 || index >= self.draft.availability.len() {
            return false;
        }
        self.draft.availability.remove(index);
        true
    }

    pub fn validation(&self) -> ValidationReport {
        validate(&self.draft)
    }

    pub fn field_error(&self, field: ProfileField) -> Option<FieldError> {
        self.validation().get(field)
    }

    /// Section indicators stay off until the profile has loaded
    pub fn section_invalid(&self, section: Section) -> bool {
        self.loaded && self.validation().section_invalid(section)
    }

    pub fn handle_status(&self) -> HandleStatus {
        self.checker.status(&self.draft.handle)
    }

    /// Wait for a pending handle check to finish
    pub async fn settle_handle_check(&mut self) -> HandleStatus {
        self.checker.settle().await;
        self.handle_status()
    }

    pub fn can_save(&self) -> bool {
        self.loaded
            && self.validation().is_valid()
            && !matches!(
                self.handle_status(),
                HandleStatus::Unavailable | HandleStatus::Checking
            )
    }

    /// Validate, normalize and run the save sequence
    pub async fn save(&mut self) -> EditorResult<SaveOutcome> {
        self.message = None;

        if let Err(e) = self.check_savable() {
            self.message = Some(e.to_string());
            return Err(e);
        }

        let payload = NormalizedProfile::from_draft(&self.draft);

        match run_save(self.api.as_ref(), &payload).await {
            Ok(outcome) => {
                self.discoverable = outcome.discoverable;
                self.exists = true;
                self.checker
                    .set_original_handle(&outcome.profile.profile.handle);
                self.checker.on_handle_changed(&self.draft.handle);
                self.message = Some(PROFILE_SAVED.to_string());
                Ok(outcome)
            }
            Err(e) => {
                self.message = Some(user_message(&e, PROFILE_SAVE_FAILED));
                Err(e.into())
            }
        }
    }

    fn check_savable(&self) -> EditorResult<()> {
        if !self.loaded {
            return Err(EditorError::NotLoaded);
        }

        let report = self.validation();
        if !report.is_valid() {
            return Err(EditorError::Invalid(report));
        }

        match self.handle_status() {
            HandleStatus::Unavailable => Err(EditorError::HandleUnavailable),
            HandleStatus::Checking => Err(EditorError::HandleCheckPending),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle_check::HandleLookup;
    use crate::models::{
        AvailabilityUpdate, LanguagesUpdate, ProfileResponse, ProfileUpdate,
    };
    use common::ApiError;
    use common::error::ApiResult;

    /// Backend with no profile yet and every handle free
    struct NewUserApi;

    impl HandleLookup for NewUserApi {
        async fn check_handle(&self, _handle: &str) -> ApiResult<bool> {
            Ok(true)
        }
    }

    impl ProfileApi for NewUserApi {
        async fn fetch_profile(&self) -> ApiResult<ProfileResponse> {
            Err(ApiError::Status {
                status: 404,
                message: "Profile not found".to_string(),
            })
        }

        async fn save_profile(&self, _update: &ProfileUpdate) -> ApiResult<()> {
            Ok(())
        }

        async fn save_languages(&self, _update: &LanguagesUpdate) -> ApiResult<()> {
            Ok(())
        }

        async fn save_availability(&self, _update: &AvailabilityUpdate) -> ApiResult<()> {
            Ok(())
        }
    }

    fn editor() -> ProfileEditor<NewUserApi> {
        ProfileEditor::new(Arc::new(NewUserApi), "UTC", Duration::from_millis(500))
    }

    #[tokio::test]
    async fn not_found_load_keeps_defaults_without_message() {
        let mut editor = editor();
        editor.load().await;

        assert!(editor.is_loaded());
        assert_eq!(editor.message(), None);
        assert!(!editor.has_profile());
        assert_eq!(editor.draft(), &ProfileDraft::empty("UTC"));
    }

    #[test]
    fn section_flags_stay_off_before_load() {
        let editor = editor();
        // Empty handle is invalid, but nothing is flagged yet.
        assert!(editor.validation().get(ProfileField::Handle).is_some());
        assert!(!editor.section_invalid(Section::Profile));
        assert!(!editor.can_save());
    }

    #[tokio::test]
    async fn native_and_target_never_coexist() {
        let mut editor = editor();
        editor.load().await;

        editor.set_language_target(0, true);
        let entry = &editor.draft().languages[0];
        assert_eq!(entry.level, 4);
        assert!(entry.is_target);

        editor.set_language_level(0, 5);
        let entry = &editor.draft().languages[0];
        assert!(entry.is_native());
        assert!(!entry.is_target);
    }

    #[tokio::test]
    async fn last_language_and_slot_cannot_be_removed() {
        let mut editor = editor();
        editor.load().await;

        assert!(!editor.remove_language(0));
        assert!(!editor.remove_slot(0));

        editor.add_language();
        assert_eq!(editor.draft().languages[1], LanguageEntry::new("en", 0, false));
        assert!(editor.remove_language(1));

        editor.set_timezone("Asia/Tokyo");
        editor.add_slot();
        assert_eq!(editor.draft().availability[1].timezone, "Asia/Tokyo");
        assert!(editor.remove_slot(0));
        assert_eq!(editor.draft().availability.len(), 1);
    }

    #[tokio::test]
    async fn toggling_weekdays_keeps_them_sorted() {
        let mut editor = editor();
        editor.load().await;

        editor.toggle_weekday(0, 5);
        editor.toggle_weekday(0, 0);
        editor.toggle_weekday(0, 1);
        let days: Vec<u8> = editor.draft().availability[0].weekdays.iter().copied().collect();
        assert_eq!(days, vec![0, 5]);
    }

    #[tokio::test]
    async fn invalid_draft_is_not_sent() {
        let mut editor = editor();
        editor.load().await;

        let err = editor.save().await.unwrap_err();
        assert!(matches!(err, EditorError::Invalid(_)));
        assert_eq!(editor.message(), Some("Please fix the highlighted fields."));
        assert!(editor.section_invalid(Section::Profile));
        assert!(!editor.section_invalid(Section::Languages));
    }

    #[tokio::test(start_paused = true)]
    async fn save_runs_once_the_handle_is_free() {
        let mut editor = editor();
        editor.load().await;

        editor.set_handle("@neo");
        assert_eq!(editor.draft().handle, "neo");
        assert_eq!(editor.settle_handle_check().await, HandleStatus::Available);
        assert!(editor.can_save());

        // Writes succeed, but the refresh still answers 404 here.
        let err = editor.save().await.unwrap_err();
        assert!(matches!(err, EditorError::Save(_)));
        assert_eq!(editor.message(), Some("Profile not found"));
    }
}
