//! Field and cross-field validation of a profile draft
//!
//! Validation runs on every change, not only on submit, and yields at most
//! one message per field. List-level checks (languages, availability) are
//! ordered waterfalls: the first failing condition is the one reported.

use chrono::Datelike;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::models::{
    ProfileDraft,
    draft::{BirthField, LanguageEntry, MAX_WEEKDAY, NATIVE_LEVEL},
};

pub const HANDLE_MIN_LENGTH: usize = 3;
pub const HANDLE_MAX_LENGTH: usize = 20;
pub const BIRTH_YEAR_MIN: i32 = 1900;

/// Validated field, also the key of a [`ValidationReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Handle,
    Timezone,
    BirthYear,
    BirthMonth,
    Languages,
    Availability,
}

impl ProfileField {
    /// Editor section ("tab") the field is shown on
    pub fn section(self) -> Section {
        match self {
            ProfileField::Handle
            | ProfileField::Timezone
            | ProfileField::BirthYear
            | ProfileField::BirthMonth => Section::Profile,
            ProfileField::Languages => Section::Languages,
            ProfileField::Availability => Section::Availability,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::Handle => "handle",
            ProfileField::Timezone => "timezone",
            ProfileField::BirthYear => "birth_year",
            ProfileField::BirthMonth => "birth_month",
            ProfileField::Languages => "languages",
            ProfileField::Availability => "availability",
        }
    }
}

/// Editor sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Profile,
    Languages,
    Availability,
}

/// Validation failure of a single field
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Handle is required.")]
    HandleRequired,
    #[error("Handle can only use letters and numbers.")]
    HandleInvalidCharacters,
    #[error("Handle must be 3-20 characters.")]
    HandleInvalidLength,
    #[error("Timezone is required.")]
    TimezoneRequired,
    #[error("Birth year must be within range.")]
    BirthYearInvalid,
    #[error("Birth month must be between 1 and 12.")]
    BirthMonthInvalid,
    #[error("At least one language is required.")]
    LanguagesRequired,
    #[error("Please fill every language code or remove empty rows.")]
    LanguagesEmpty,
    #[error("Each language can only be listed once.")]
    LanguagesDuplicate,
    #[error("At least one native language is required.")]
    LanguagesNativeRequired,
    #[error("Language level must be between 0 and 5.")]
    LanguageLevelInvalid,
    #[error("Select at least one weekday for every availability slot.")]
    AvailabilityWeekdayRequired,
    #[error("Every availability slot needs a start and end time.")]
    AvailabilityTimeRequired,
    #[error("Weekdays must be between Sunday and Saturday.")]
    AvailabilityWeekdayInvalid,
    #[error("End time must be after start time.")]
    AvailabilityTimeOrder,
}

/// Outcome of validating a whole draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<ProfileField, FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: ProfileField) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }

    pub fn section_invalid(&self, section: Section) -> bool {
        self.errors.keys().any(|field| field.section() == section)
    }

    fn insert(&mut self, field: ProfileField, result: Result<(), FieldError>) {
        if let Err(error) = result {
            self.errors.insert(field, error);
        }
    }
}

/// Outcome of the format-only handle check that gates availability lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleValidity {
    /// Nothing typed yet
    Idle,
    Invalid,
    Valid,
}

/// Trim, then strip any leading `@`
pub fn normalize_handle(raw: &str) -> &str {
    raw.trim().trim_start_matches('@')
}

/// Validate a handle, returning its normalized form
///
/// Checks run in order and stop at the first failure: required, allowed
/// characters (`[A-Za-z0-9]`), then length.
pub fn validate_handle(raw: &str) -> Result<&str, FieldError> {
    let handle = normalize_handle(raw);

    if handle.is_empty() {
        return Err(FieldError::HandleRequired);
    }

    if !handle.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FieldError::HandleInvalidCharacters);
    }

    if !(HANDLE_MIN_LENGTH..=HANDLE_MAX_LENGTH).contains(&handle.len()) {
        return Err(FieldError::HandleInvalidLength);
    }

    Ok(handle)
}

pub fn handle_validity(raw: &str) -> HandleValidity {
    match validate_handle(raw) {
        Ok(_) => HandleValidity::Valid,
        Err(FieldError::HandleRequired) => HandleValidity::Idle,
        Err(_) => HandleValidity::Invalid,
    }
}

pub fn validate_timezone(timezone: &str) -> Result<(), FieldError> {
    if timezone.trim().is_empty() {
        return Err(FieldError::TimezoneRequired);
    }
    Ok(())
}

pub fn validate_birth_year(year: &BirthField, current_year: i32) -> Result<(), FieldError> {
    let Some(value) = year.as_value() else {
        return Ok(());
    };

    match value.trim().parse::<i32>() {
        Ok(year) if (BIRTH_YEAR_MIN..=current_year).contains(&year) => Ok(()),
        _ => Err(FieldError::BirthYearInvalid),
    }
}

pub fn validate_birth_month(month: &BirthField) -> Result<(), FieldError> {
    let Some(value) = month.as_value() else {
        return Ok(());
    };

    match value.trim().parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(()),
        _ => Err(FieldError::BirthMonthInvalid),
    }
}

/// Language list rules: non-empty, every code filled, codes unique after
/// normalization, at least one native language, levels in range
pub fn validate_languages(languages: &[LanguageEntry]) -> Result<(), FieldError> {
    if languages.is_empty() {
        return Err(FieldError::LanguagesRequired);
    }

    let codes: Vec<String> = languages.iter().map(LanguageEntry::normalized_code).collect();

    if codes.iter().any(String::is_empty) {
        return Err(FieldError::LanguagesEmpty);
    }

    let mut seen = HashSet::new();
    if !codes.iter().all(|code| seen.insert(code.as_str())) {
        return Err(FieldError::LanguagesDuplicate);
    }

    if !languages.iter().any(LanguageEntry::is_native) {
        return Err(FieldError::LanguagesNativeRequired);
    }

    if languages.iter().any(|lang| lang.level > NATIVE_LEVEL) {
        return Err(FieldError::LanguageLevelInvalid);
    }

    Ok(())
}

/// Availability rules: weekdays chosen, both times present, weekdays in
/// range, start before end
pub fn validate_availability(draft: &ProfileDraft) -> Result<(), FieldError> {
    let slots = &draft.availability;

    if slots.iter().any(|slot| slot.weekdays.is_empty()) {
        return Err(FieldError::AvailabilityWeekdayRequired);
    }

    if slots.iter().any(|slot| {
        slot.start_local_time.trim().is_empty() || slot.end_local_time.trim().is_empty()
    }) {
        return Err(FieldError::AvailabilityTimeRequired);
    }

    if slots
        .iter()
        .any(|slot| slot.weekdays.iter().any(|day| *day > MAX_WEEKDAY))
    {
        return Err(FieldError::AvailabilityWeekdayInvalid);
    }

    // "HH:MM" strings order the same lexicographically and chronologically.
    if slots
        .iter()
        .any(|slot| slot.start_local_time.trim() >= slot.end_local_time.trim())
    {
        return Err(FieldError::AvailabilityTimeOrder);
    }

    Ok(())
}

/// Validate every field of the draft against a given current year
pub fn validate_draft(draft: &ProfileDraft, current_year: i32) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.insert(ProfileField::Handle, validate_handle(&draft.handle).map(|_| ()));
    report.insert(ProfileField::Timezone, validate_timezone(&draft.timezone));
    report.insert(
        ProfileField::BirthYear,
        validate_birth_year(&draft.birth_year, current_year),
    );
    report.insert(ProfileField::BirthMonth, validate_birth_month(&draft.birth_month));
    report.insert(ProfileField::Languages, validate_languages(&draft.languages));
    report.insert(ProfileField::Availability, validate_availability(draft));

    report
}

/// Validate the draft against the local calendar year
pub fn validate(draft: &ProfileDraft) -> ValidationReport {
    validate_draft(draft, chrono::Local::now().year())
}
