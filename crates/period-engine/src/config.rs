//! Resolver configuration.

use serde::{Deserialize, Serialize};

use crate::boundary::{parse_timezone, EndOfDay};
use crate::error::{PeriodError, Result};
use crate::view_mode::ViewMode;

/// Business timezone used when no configuration is supplied.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Settings shared by every resolution.
///
/// Every field has a default, so `{}` is a valid configuration document:
///
/// ```json
/// {
///   "timezone": "America/Sao_Paulo",
///   "default_view_mode": "month",
///   "end_of_day": "last_minute"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// IANA name of the business timezone.
    pub timezone: String,
    /// Preset used when a request names no view mode.
    pub default_view_mode: ViewMode,
    pub end_of_day: EndOfDay,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            default_view_mode: ViewMode::Month,
            end_of_day: EndOfDay::LastMinute,
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidConfig`] for malformed JSON or unknown
    /// fields, and whatever [`ResolverConfig::validate`] reports.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| PeriodError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the timezone name and that the default view mode is a real preset.
    pub fn validate(&self) -> Result<()> {
        parse_timezone(&self.timezone)?;
        if self.default_view_mode == ViewMode::Custom {
            return Err(PeriodError::InvalidConfig(
                "default_view_mode must be a preset, not 'custom'".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_view_mode, ViewMode::Month);
        assert_eq!(config.end_of_day, EndOfDay::LastMinute);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ResolverConfig::from_json("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config = ResolverConfig::from_json(
            r#"{"timezone": "Europe/Lisbon", "default_view_mode": "week", "end_of_day": "last_instant"}"#,
        )
        .unwrap();
        assert_eq!(config.timezone, "Europe/Lisbon");
        assert_eq!(config.default_view_mode, ViewMode::Week);
        assert_eq!(config.end_of_day, EndOfDay::LastInstant);
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let err = ResolverConfig::from_json(r#"{"timezone": "Atlantis/Capital"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_custom_default_mode_rejected() {
        let err = ResolverConfig::from_json(r#"{"default_view_mode": "custom"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid config"), "got: {err}");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ResolverConfig::from_json(r#"{"tz": "UTC"}"#).is_err());
        assert!(ResolverConfig::from_json("not json").is_err());
    }
}
