//! In-memory shape of a profile being edited

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Proficiency level reserved for native languages
pub const NATIVE_LEVEL: u8 = 5;

/// Highest weekday index (Saturday); Sunday is 0
pub const MAX_WEEKDAY: u8 = 6;

/// Select-box value meaning "nothing chosen"
pub const UNSET_SELECT_VALUE: &str = "__unset__";

/// Optional numeric select (birth year, birth month)
///
/// `Unset` is kept apart from every string value so that it never collides
/// with a real choice such as `"0"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum BirthField {
    #[default]
    Unset,
    Value(String),
}

impl BirthField {
    /// Interpret raw select input; the unset sentinel and blank text are `Unset`
    pub fn from_input(value: &str) -> Self {
        if value == UNSET_SELECT_VALUE || value.trim().is_empty() {
            BirthField::Unset
        } else {
            BirthField::Value(value.to_string())
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, BirthField::Unset)
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            BirthField::Unset => None,
            BirthField::Value(value) => Some(value),
        }
    }
}

impl From<Option<String>> for BirthField {
    fn from(value: Option<String>) -> Self {
        value.map_or(BirthField::Unset, |v| BirthField::from_input(&v))
    }
}

impl From<BirthField> for Option<String> {
    fn from(value: BirthField) -> Self {
        match value {
            BirthField::Unset => None,
            BirthField::Value(value) => Some(value),
        }
    }
}

/// One spoken or learned language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language_code: String,
    /// 0..=5, where 5 means native
    pub level: u8,
    /// Never true while `level` is native
    pub is_target: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl LanguageEntry {
    pub fn new(language_code: impl Into<String>, level: u8, is_target: bool) -> Self {
        Self {
            language_code: language_code.into(),
            level,
            is_target: is_target && level != NATIVE_LEVEL,
            description: None,
        }
    }

    pub fn is_native(&self) -> bool {
        self.level == NATIVE_LEVEL
    }

    /// Lowercase, trimmed code used for comparisons and on the wire
    pub fn normalized_code(&self) -> String {
        self.language_code.trim().to_lowercase()
    }
}

/// A group of weekdays sharing one local time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// Weekday indexes, Sunday = 0; kept sorted and unique by the set
    pub weekdays: BTreeSet<u8>,
    /// "HH:MM"
    pub start_local_time: String,
    /// "HH:MM"
    pub end_local_time: String,
    /// Empty means "use the profile timezone"
    #[serde(default)]
    pub timezone: String,
}

impl AvailabilitySlot {
    pub fn new(
        weekdays: impl IntoIterator<Item = u8>,
        start_local_time: impl Into<String>,
        end_local_time: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            weekdays: weekdays.into_iter().collect(),
            start_local_time: start_local_time.into(),
            end_local_time: end_local_time.into(),
            timezone: timezone.into(),
        }
    }
}

/// Editable profile state
///
/// Created empty or hydrated from `GET /profile`, mutated by user input, and
/// never persisted itself: only the normalized payloads reach the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    /// As typed; may still carry leading `@` or whitespace
    pub handle: String,
    #[serde(default)]
    pub birth_year: BirthField,
    #[serde(default)]
    pub birth_month: BirthField,
    /// ISO region code, empty when not chosen
    #[serde(default)]
    pub country_code: String,
    /// IANA timezone identifier
    pub timezone: String,
    pub languages: Vec<LanguageEntry>,
    pub availability: Vec<AvailabilitySlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_sentinel_is_distinct_from_zero() {
        assert_eq!(BirthField::from_input(UNSET_SELECT_VALUE), BirthField::Unset);
        assert_eq!(BirthField::from_input("  "), BirthField::Unset);
        assert_eq!(
            BirthField::from_input("0"),
            BirthField::Value("0".to_string())
        );
    }

    #[test]
    fn birth_field_serializes_as_nullable_string() {
        let json = serde_json::to_string(&BirthField::Unset).unwrap();
        assert_eq!(json, "null");
        let field: BirthField = serde_json::from_str("\"1990\"").unwrap();
        assert_eq!(field.as_value(), Some("1990"));
    }

    #[test]
    fn native_entry_is_never_a_target() {
        let entry = LanguageEntry::new("EN", NATIVE_LEVEL, true);
        assert!(entry.is_native());
        assert!(!entry.is_target);
        assert_eq!(entry.normalized_code(), "en");
    }

    #[test]
    fn slot_weekdays_are_sorted_and_unique() {
        let slot = AvailabilitySlot::new([5, 1, 3, 1], "18:00", "20:00", "");
        assert_eq!(slot.weekdays.into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }
}
