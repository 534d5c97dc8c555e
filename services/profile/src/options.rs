//! Choice lists offered by the profile editor

use chrono::{DateTime, Datelike, Month, Offset, Utc};
use chrono_tz::{TZ_VARIANTS, Tz};
use std::collections::HashSet;

use crate::models::draft::{NATIVE_LEVEL, UNSET_SELECT_VALUE};
use crate::validation::BIRTH_YEAR_MIN;

pub const DEFAULT_COUNTRY_CODES: &[&str] = &[
    "CA", "US", "GB", "AU", "NZ", "DE", "FR", "ES", "IT", "BR", "MX", "IN", "JP", "KR", "CN",
];

pub const DEFAULT_LANGUAGE_CODES: &[&str] =
    &["en", "es", "fr", "de", "pt", "it", "zh", "ja", "ko", "ar"];

/// Zone areas offered to the user; legacy aliases such as `US/Pacific` and
/// POSIX-style `Etc/GMT+5` ids are left out
const TIMEZONE_AREAS: &[&str] = &[
    "Africa",
    "America",
    "Antarctica",
    "Asia",
    "Atlantic",
    "Australia",
    "Europe",
    "Indian",
    "Pacific",
];

pub const PROFICIENCY_LABELS: [&str; NATIVE_LEVEL as usize + 1] = [
    "Zero",
    "Beginner",
    "Elementary",
    "Intermediate",
    "Advanced",
    "Native",
];

pub const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AU", "Australia"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CN", "China"),
    ("DE", "Germany"),
    ("ES", "Spain"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("IN", "India"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("MX", "Mexico"),
    ("NZ", "New Zealand"),
    ("US", "United States"),
];

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("pt", "Portuguese"),
    ("zh", "Chinese"),
];

/// A value and its display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    fn unset() -> Self {
        Self::new(UNSET_SELECT_VALUE, "Not set")
    }
}

/// Unset entry, then `current_year` down to 1900
pub fn year_options(current_year: i32) -> Vec<SelectOption> {
    std::iter::once(SelectOption::unset())
        .chain(
            (BIRTH_YEAR_MIN..=current_year)
                .rev()
                .map(|year| SelectOption::new(year.to_string(), year.to_string())),
        )
        .collect()
}

pub fn current_year_options() -> Vec<SelectOption> {
    year_options(chrono::Local::now().year())
}

/// Unset entry, then January..December as 1..12
pub fn month_options() -> Vec<SelectOption> {
    std::iter::once(SelectOption::unset())
        .chain(
            (1..=12u8)
                .filter_map(|number| Month::try_from(number).ok())
                .map(|month| {
                    SelectOption::new(month.number_from_month().to_string(), month.name())
                }),
        )
        .collect()
}

/// Two-letter uppercase region codes sorted by label
pub fn country_options(codes: &[&str]) -> Vec<SelectOption> {
    let mut seen = HashSet::new();
    let mut options: Vec<SelectOption> = codes
        .iter()
        .map(|code| code.trim().to_uppercase())
        .filter(|code| code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .filter(|code| seen.insert(code.clone()))
        .map(|code| {
            let label = lookup(COUNTRY_NAMES, &code).unwrap_or(code.as_str()).to_string();
            SelectOption::new(code, label)
        })
        .collect();

    options.sort_by(|a, b| a.label.cmp(&b.label));
    options
}

/// Lowercase language codes, `und` dropped, deduplicated in input order
pub fn language_options(codes: &[&str]) -> Vec<SelectOption> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .map(|code| code.trim().replace('_', "-").to_lowercase())
        .filter(|code| (2..=15).contains(&code.len()) && code != "und")
        .filter(|code| seen.insert(code.clone()))
        .map(|code| {
            let label = lookup(LANGUAGE_NAMES, &code).unwrap_or(code.as_str()).to_string();
            SelectOption::new(code, label)
        })
        .collect()
}

pub fn timezone_options() -> Vec<SelectOption> {
    timezone_options_at(Utc::now())
}

/// Every tz database zone labelled `(UTC±hh:mm) Area/City`, ordered by the
/// offset in effect at `now`, then by label
pub fn timezone_options_at(now: DateTime<Utc>) -> Vec<SelectOption> {
    let mut zones: Vec<(i32, SelectOption)> = TZ_VARIANTS
        .iter()
        .filter(|tz| is_offered_zone(tz.name()))
        .map(|tz| {
            let minutes = utc_offset_minutes(*tz, now);
            let label = format!(
                "({}) {}",
                format_offset(minutes),
                tz.name().replace('_', " ")
            );
            (minutes, SelectOption::new(tz.name(), label))
        })
        .collect();

    zones.sort_by(|(a_offset, a), (b_offset, b)| {
        a_offset.cmp(b_offset).then_with(|| a.label.cmp(&b.label))
    });
    zones.into_iter().map(|(_, option)| option).collect()
}

fn is_offered_zone(name: &str) -> bool {
    name == "UTC"
        || name
            .split_once('/')
            .is_some_and(|(area, _)| TIMEZONE_AREAS.contains(&area))
}

fn utc_offset_minutes(tz: Tz, now: DateTime<Utc>) -> i32 {
    now.with_timezone(&tz).offset().fix().local_minus_utc() / 60
}

/// `UTC+05:30` style offset with zero-padded hours and minutes
fn format_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let minutes = minutes.abs();
    format!("UTC{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

pub fn proficiency_label(level: u8) -> Option<&'static str> {
    PROFICIENCY_LABELS.get(usize::from(level)).copied()
}

pub fn weekday_label(weekday: u8) -> Option<&'static str> {
    WEEKDAY_LABELS.get(usize::from(weekday)).copied()
}

fn lookup<'a>(table: &'a [(&str, &'a str)], code: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, name)| *name)
}
