//! Conversion of a validated draft into the three request bodies

use crate::models::{
    AvailabilityRecord, AvailabilityUpdate, BirthField, LanguageEntry, LanguagePayload,
    LanguagesUpdate, ProfileDraft, ProfileUpdate,
};
use crate::validation::normalize_handle;

/// Request bodies of one save, independent of each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProfile {
    pub profile: ProfileUpdate,
    pub languages: LanguagesUpdate,
    pub availability: AvailabilityUpdate,
}

impl NormalizedProfile {
    /// Assumes the draft already passed validation
    pub fn from_draft(draft: &ProfileDraft) -> Self {
        Self {
            profile: profile_payload(draft),
            languages: LanguagesUpdate {
                languages: draft.languages.iter().map(language_payload).collect(),
            },
            availability: AvailabilityUpdate {
                availability: expand_availability(draft),
            },
        }
    }
}

pub fn profile_payload(draft: &ProfileDraft) -> ProfileUpdate {
    let country_code = draft.country_code.trim();

    ProfileUpdate {
        handle: normalize_handle(&draft.handle).to_string(),
        birth_year: parse_birth_field(&draft.birth_year),
        birth_month: parse_birth_field(&draft.birth_month),
        country_code: (!country_code.is_empty()).then(|| country_code.to_string()),
        timezone: draft.timezone.trim().to_string(),
    }
}

/// Per-entry map; order is preserved and duplicates are left to validation
pub fn language_payload(entry: &LanguageEntry) -> LanguagePayload {
    let is_native = entry.is_native();
    let description = entry
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    LanguagePayload {
        language_code: entry.normalized_code(),
        level: entry.level,
        is_native,
        is_target: !is_native && entry.is_target,
        description,
    }
}

/// One record per weekday: slots in draft order, weekdays ascending
///
/// A slot without its own timezone takes the profile timezone.
pub fn expand_availability(draft: &ProfileDraft) -> Vec<AvailabilityRecord> {
    let profile_timezone = draft.timezone.trim();

    draft
        .availability
        .iter()
        .flat_map(|slot| {
            let timezone = match slot.timezone.trim() {
                "" => profile_timezone,
                own => own,
            };
            slot.weekdays.iter().map(move |weekday| AvailabilityRecord {
                weekday: *weekday,
                start_local_time: slot.start_local_time.trim().to_string(),
                end_local_time: slot.end_local_time.trim().to_string(),
                timezone: timezone.to_string(),
            })
        })
        .collect()
}

fn parse_birth_field<T: std::str::FromStr>(field: &BirthField) -> Option<T> {
    field.as_value().and_then(|value| value.trim().parse().ok())
}
