//! Locale negotiation helpers
//!
//! The message catalog itself lives outside this client; these helpers only
//! decide which locale tag is sent to the API and which catalog applies.

/// Locale used when nothing better is known
pub const DEFAULT_LOCALE: &str = "en";

/// Locales with a translated message catalog
pub const TRANSLATED_LOCALES: [&str; 3] = ["en", "zh", "pt-BR"];

/// Turn POSIX-style tags into BCP 47 separators (`pt_BR` -> `pt-BR`)
pub fn normalize_locale(locale: &str) -> String {
    locale.replace('_', "-")
}

/// Pick the message catalog for an arbitrary locale tag
pub fn resolve_message_locale(locale: &str) -> &'static str {
    catalog_for(locale).unwrap_or(DEFAULT_LOCALE)
}

/// Whether the tag has a catalog of its own rather than the default fallback
pub fn is_translated_locale(locale: &str) -> bool {
    catalog_for(locale).is_some_and(|catalog| TRANSLATED_LOCALES.contains(&catalog))
}

fn catalog_for(locale: &str) -> Option<&'static str> {
    let normalized = normalize_locale(locale.trim()).to_lowercase();

    if normalized.starts_with("zh") {
        Some("zh")
    } else if normalized.starts_with("pt") {
        Some("pt-BR")
    } else if normalized.starts_with("en") {
        Some("en")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_locale_strings() {
        assert_eq!(normalize_locale("pt_BR"), "pt-BR");
        assert_eq!(normalize_locale("en"), "en");
    }

    #[test]
    fn resolves_message_locales() {
        assert_eq!(resolve_message_locale("zh-CN"), "zh");
        assert_eq!(resolve_message_locale("zh-Hant"), "zh");
        assert_eq!(resolve_message_locale("pt-BR"), "pt-BR");
        assert_eq!(resolve_message_locale("pt_BR"), "pt-BR");
        assert_eq!(resolve_message_locale("pt-PT"), "pt-BR");
        assert_eq!(resolve_message_locale("pt"), "pt-BR");
        assert_eq!(resolve_message_locale("en-US"), "en");
        assert_eq!(resolve_message_locale("fr-FR"), "en");
    }

    #[test]
    fn only_catalog_locales_count_as_translated() {
        for locale in ["zh-Hans", "pt-PT", "en-GB", " pt_BR "] {
            assert!(is_translated_locale(locale), "{locale}");
        }
        for locale in ["fr-FR", "de", ""] {
            assert!(!is_translated_locale(locale), "{locale}");
            assert_eq!(resolve_message_locale(locale), DEFAULT_LOCALE);
        }
    }
}
