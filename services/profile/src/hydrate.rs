//! Building a draft from defaults or from the server's profile

use std::collections::BTreeSet;

use crate::models::{
    AvailabilityRecord, AvailabilitySlot, BirthField, LanguageEntry, LanguagePayload,
    ProfileDraft, ProfileResponse,
    draft::NATIVE_LEVEL,
};

pub const DEFAULT_LANGUAGE_CODE: &str = "en";
pub const DEFAULT_SLOT_WEEKDAY: u8 = 1;
pub const DEFAULT_START_TIME: &str = "18:00";
pub const DEFAULT_END_TIME: &str = "20:00";

impl LanguageEntry {
    /// Row shown when no language is known yet
    pub fn default_native() -> Self {
        LanguageEntry::new(DEFAULT_LANGUAGE_CODE, NATIVE_LEVEL, false)
    }

    /// Row appended by "add language"
    pub fn blank() -> Self {
        LanguageEntry::new(DEFAULT_LANGUAGE_CODE, 0, false)
    }
}

impl AvailabilitySlot {
    /// Monday evening in the given timezone
    pub fn default_for(timezone: &str) -> Self {
        AvailabilitySlot::new(
            [DEFAULT_SLOT_WEEKDAY],
            DEFAULT_START_TIME,
            DEFAULT_END_TIME,
            timezone,
        )
    }
}

impl From<&LanguagePayload> for LanguageEntry {
    fn from(payload: &LanguagePayload) -> Self {
        let mut entry = LanguageEntry::new(
            payload.language_code.clone(),
            payload.level,
            payload.is_target,
        );
        entry.description = payload.description.clone();
        entry
    }
}

impl ProfileDraft {
    /// Draft shown before the user has a profile
    pub fn empty(default_timezone: &str) -> Self {
        Self {
            handle: String::new(),
            birth_year: BirthField::Unset,
            birth_month: BirthField::Unset,
            country_code: String::new(),
            timezone: default_timezone.to_string(),
            languages: vec![LanguageEntry::default_native()],
            availability: vec![AvailabilitySlot::default_for(default_timezone)],
        }
    }

    /// Hydrate from `GET /profile`
    ///
    /// Missing sections fall back to the same defaults as [`ProfileDraft::empty`],
    /// and availability records are regrouped into slots.
    pub fn from_response(response: &ProfileResponse, fallback_timezone: &str) -> Self {
        let profile = &response.profile;

        let timezone = profile
            .timezone
            .as_deref()
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .unwrap_or(fallback_timezone)
            .to_string();

        let languages = if response.languages.is_empty() {
            vec![LanguageEntry::default_native()]
        } else {
            response.languages.iter().map(LanguageEntry::from).collect()
        };

        let mut availability = regroup_availability(&response.availability, &timezone);
        if availability.is_empty() {
            availability.push(AvailabilitySlot::default_for(&timezone));
        }

        Self {
            handle: profile.handle.clone(),
            birth_year: profile
                .birth_year
                .map_or(BirthField::Unset, |year| BirthField::Value(year.to_string())),
            birth_month: profile
                .birth_month
                .map_or(BirthField::Unset, |month| BirthField::Value(month.to_string())),
            country_code: profile.country_code.clone().unwrap_or_default(),
            timezone,
            languages,
            availability,
        }
    }
}

/// Group per-weekday records into slots keyed by `(start, end, timezone)`
///
/// Groups keep first-seen order. Records without a timezone take
/// `profile_timezone`. Two slots saved separately with the same window come
/// back merged into one.
pub fn regroup_availability(
    records: &[AvailabilityRecord],
    profile_timezone: &str,
) -> Vec<AvailabilitySlot> {
    let mut slots: Vec<AvailabilitySlot> = Vec::new();

    for record in records {
        let timezone = match record.timezone.trim() {
            "" => profile_timezone,
            own => own,
        };

        let existing = slots.iter_mut().find(|slot| {
            slot.start_local_time == record.start_local_time
                && slot.end_local_time == record.end_local_time
                && slot.timezone == timezone
        });

        match existing {
            Some(slot) => {
                slot.weekdays.insert(record.weekday);
            }
            None => slots.push(AvailabilitySlot {
                weekdays: BTreeSet::from([record.weekday]),
                start_local_time: record.start_local_time.clone(),
                end_local_time: record.end_local_time.clone(),
                timezone: timezone.to_string(),
            }),
        }
    }

    slots
}
