//! Client configuration
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `amiglot.{toml,json,yaml}` file in the working directory, then
//! `AMIGLOT_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf, time::Duration};
use tracing::{info, warn};

use crate::{
    error::{ConfigError, ConfigResult},
    locale::{is_translated_locale, normalize_locale, resolve_message_locale},
};

/// Base path of every API route
pub const API_BASE: &str = "/api/v1";

/// Fallback when neither the server profile nor the machine names a timezone
pub const DEFAULT_TIMEZONE: &str = "America/Vancouver";

/// Directory prefix under the XDG base directories
pub const XDG_PREFIX: &str = "amiglot";

/// Name of the session file inside the state directory
pub const SESSION_FILE: &str = "session.json";

/// Configuration for the API client and the profile editor
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Origin of the backend (e.g., "http://localhost:3000"), without `/api/v1`
    pub api_base_url: String,
    /// Locale sent as `Accept-Language`
    pub locale: String,
    /// File backing the persistent session store
    pub session_path: PathBuf,
    /// Quiet period before a handle availability check fires
    pub handle_check_debounce_ms: u64,
    /// Timezone used when the loaded profile has none
    pub default_timezone: String,
}

impl ClientConfig {
    /// Load the configuration from defaults, `amiglot.*` and the environment
    ///
    /// # Environment Variables
    /// - `AMIGLOT_API_BASE_URL`: backend origin (default: "http://localhost:3000")
    /// - `AMIGLOT_LOCALE`: request locale (default: derived from `LANG`, else "en")
    /// - `AMIGLOT_SESSION_PATH`: session file (default: "$XDG_STATE_HOME/amiglot/session.json")
    /// - `AMIGLOT_HANDLE_CHECK_DEBOUNCE_MS`: debounce in milliseconds (default: 500)
    /// - `AMIGLOT_DEFAULT_TIMEZONE`: fallback timezone (default: the system
    ///   timezone, else "America/Vancouver")
    pub fn from_env() -> ConfigResult<Self> {
        let settings = Config::builder()
            .set_default("api_base_url", "http://localhost:3000")?
            .set_default("locale", default_locale())?
            .set_default(
                "session_path",
                default_session_path().to_string_lossy().to_string(),
            )?
            .set_default("handle_check_debounce_ms", 500)?
            .set_default("default_timezone", default_timezone())?
            .add_source(File::with_name("amiglot").required(false))
            .add_source(Environment::with_prefix("AMIGLOT").try_parsing(true))
            .build()?;

        let mut config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        config.locale = normalize_locale(config.locale.trim());
        if !is_translated_locale(&config.locale) {
            warn!(
                "No messages translated for {}, falling back to {}",
                config.locale,
                config.message_locale()
            );
        }

        info!("Client configured for API at {}", config.api_url());
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "api_base_url",
                reason: format!("expected an http(s) origin, got {:?}", self.api_base_url),
            });
        }
        if self.default_timezone.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "default_timezone",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Full API root, origin plus [`API_BASE`]
    pub fn api_url(&self) -> String {
        format!("{}{}", self.api_base_url.trim().trim_end_matches('/'), API_BASE)
    }

    /// Catalog used for user-facing messages, see [`resolve_message_locale`]
    pub fn message_locale(&self) -> &'static str {
        resolve_message_locale(&self.locale)
    }

    /// Debounce window for handle availability checks
    pub fn handle_check_debounce(&self) -> Duration {
        Duration::from_millis(self.handle_check_debounce_ms)
    }
}

/// Locale of the process environment, e.g. `en_US.UTF-8` becomes `en-US`
fn default_locale() -> String {
    env::var("LANG")
        .ok()
        .and_then(|lang| {
            let tag = lang.split('.').next().unwrap_or_default().trim().to_string();
            if tag.is_empty() || tag == "C" || tag == "POSIX" {
                None
            } else {
                Some(normalize_locale(&tag))
            }
        })
        .unwrap_or_else(|| "en".to_string())
}

/// Session file under the per-user state directory
///
/// Without a resolvable home, falls back to `.amiglot/session.json` in the
/// working directory.
pub fn default_session_path() -> PathBuf {
    xdg::BaseDirectories::with_prefix(XDG_PREFIX)
        .get_state_home()
        .map(|dir| dir.join(SESSION_FILE))
        .unwrap_or_else(|| PathBuf::from(".amiglot").join(SESSION_FILE))
}

/// IANA name of the system timezone, else [`DEFAULT_TIMEZONE`]
pub fn default_timezone() -> String {
    timezone_or_default(iana_time_zone::get_timezone().ok())
}

fn timezone_or_default(detected: Option<String>) -> String {
    detected
        .map(|tz| tz.trim().to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "AMIGLOT_API_BASE_URL",
            "AMIGLOT_LOCALE",
            "AMIGLOT_SESSION_PATH",
            "AMIGLOT_HANDLE_CHECK_DEBOUNCE_MS",
            "AMIGLOT_DEFAULT_TIMEZONE",
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_client_config_defaults() {
        clear_env();
        let config = ClientConfig::from_env().expect("Failed to load client config");
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.api_url(), "http://localhost:3000/api/v1");
        assert_eq!(config.handle_check_debounce(), Duration::from_millis(500));
        assert_eq!(config.default_timezone, default_timezone());
        assert!(!config.default_timezone.is_empty());
        assert!(config.session_path.ends_with("amiglot/session.json"));
    }

    #[test]
    fn test_timezone_falls_back_when_undetected() {
        assert_eq!(timezone_or_default(None), DEFAULT_TIMEZONE);
        assert_eq!(timezone_or_default(Some("  ".to_string())), DEFAULT_TIMEZONE);
        assert_eq!(
            timezone_or_default(Some("Europe/Paris".to_string())),
            "Europe/Paris"
        );
    }

    #[test]
    #[serial]
    fn test_session_path_follows_xdg_state_home() {
        clear_env();
        let previous = env::var_os("XDG_STATE_HOME");
        unsafe { env::set_var("XDG_STATE_HOME", "/tmp/amiglot-state") };

        assert_eq!(
            default_session_path(),
            PathBuf::from("/tmp/amiglot-state/amiglot/session.json")
        );
        let config = ClientConfig::from_env().expect("Failed to load client config");
        assert_eq!(
            config.session_path,
            PathBuf::from("/tmp/amiglot-state/amiglot/session.json")
        );

        unsafe { env::set_var("AMIGLOT_SESSION_PATH", "/tmp/override/session.json") };
        let config = ClientConfig::from_env().expect("Failed to load client config");
        assert_eq!(config.session_path, PathBuf::from("/tmp/override/session.json"));

        match previous {
            Some(value) => unsafe { env::set_var("XDG_STATE_HOME", value) },
            None => unsafe { env::remove_var("XDG_STATE_HOME") },
        }
        clear_env();
    }

    #[test]
    #[serial]
    fn test_client_config_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("AMIGLOT_API_BASE_URL", "https://api.example.com/");
            env::set_var("AMIGLOT_LOCALE", "pt_BR");
            env::set_var("AMIGLOT_HANDLE_CHECK_DEBOUNCE_MS", "250");
        }

        let config = ClientConfig::from_env().expect("Failed to load client config");
        assert_eq!(config.api_url(), "https://api.example.com/api/v1");
        assert_eq!(config.locale, "pt-BR");
        assert_eq!(config.message_locale(), "pt-BR");
        assert_eq!(config.handle_check_debounce_ms, 250);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_untranslated_locale_uses_default_messages() {
        clear_env();
        unsafe { env::set_var("AMIGLOT_LOCALE", "fr_CA") };

        let config = ClientConfig::from_env().expect("Failed to load client config");
        assert_eq!(config.locale, "fr-CA");
        assert_eq!(config.message_locale(), "en");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_client_config_rejects_non_http_origin() {
        clear_env();
        unsafe { env::set_var("AMIGLOT_API_BASE_URL", "localhost:3000") };

        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "api_base_url",
                ..
            }
        ));

        clear_env();
    }
}
