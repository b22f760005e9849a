use serde::Deserialize;
use std::env;

pub const DEFAULT_LANGUAGE: &str = "en_GB";
pub const DEFAULT_WEB_SERVICE_PLATFORM: &str = "netaxept-rs";

/// Settings applied to every registration request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Terminal language used when the caller does not pick one.
    pub default_language: String,
    /// Reported to the gateway in the request environment.
    pub web_service_platform: String,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            web_service_platform: DEFAULT_WEB_SERVICE_PLATFORM.to_string(),
        }
    }
}

impl RegistrarConfig {
    /// Reads `NETAXEPT_LANGUAGE` and `NETAXEPT_WEB_SERVICE_PLATFORM`, falling
    /// back to the defaults for unset or blank variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            default_language: read("NETAXEPT_LANGUAGE", DEFAULT_LANGUAGE),
            web_service_platform: read(
                "NETAXEPT_WEB_SERVICE_PLATFORM",
                DEFAULT_WEB_SERVICE_PLATFORM,
            ),
        }
    }

    pub(crate) fn language_or_default(&self, language: Option<&str>) -> String {
        language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(&self.default_language)
            .to_string()
    }
}
