//! Report settings loaded from the environment.
//!
//! - `LEDGERBOOK_PERIOD`: `day` (default) or `month`
//! - `LEDGERBOOK_DISPLAY_SCALE`: decimal places shown in reports (default 3)

use thiserror::Error;

use ledgerbook_accounting::Granularity;

pub const PERIOD_VAR: &str = "LEDGERBOOK_PERIOD";
pub const DISPLAY_SCALE_VAR: &str = "LEDGERBOOK_DISPLAY_SCALE";

/// Upper bound accepted by `rust_decimal` rounding.
const MAX_DISPLAY_SCALE: u32 = 28;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub granularity: Granularity,
    pub display_scale: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            display_scale: 3,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(raw) = read(PERIOD_VAR) {
            config.granularity = raw.parse().map_err(|e: ledgerbook_core::DomainError| {
                ConfigError::Invalid {
                    var: PERIOD_VAR,
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(raw) = read(DISPLAY_SCALE_VAR) {
            config.display_scale = parse_scale(&raw).map_err(|reason| ConfigError::Invalid {
                var: DISPLAY_SCALE_VAR,
                reason,
            })?;
        }

        tracing::debug!(granularity = %config.granularity, display_scale = config.display_scale, "report config loaded");
        Ok(config)
    }
}

fn parse_scale(raw: &str) -> Result<u32, String> {
    let scale: u32 = raw
        .trim()
        .parse()
        .map_err(|e| format!("expected a whole number of decimal places ({e})"))?;
    if scale > MAX_DISPLAY_SCALE {
        return Err(format!("at most {MAX_DISPLAY_SCALE} decimal places (got {scale})"));
    }
    Ok(scale)
}
