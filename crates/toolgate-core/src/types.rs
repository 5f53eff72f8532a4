use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Family of generation models, each with its own latency budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelTier {
    Pro,
    Flash,
    FlashLite,
    LegacyFlash,
}

impl ModelTier {
    /// Classify a model name such as `gemini-2.5-flash-lite`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModel`] when no tier matches.
    pub fn from_model_name(model: &str) -> Result<Self, Error> {
        let model = model.to_ascii_lowercase();
        if model.contains("flash-lite") {
            Ok(Self::FlashLite)
        } else if model.contains("1.5-flash") || model.contains("1.0-flash") {
            Ok(Self::LegacyFlash)
        } else if model.contains("flash") {
            Ok(Self::Flash)
        } else if model.contains("pro") {
            Ok(Self::Pro)
        } else {
            Err(Error::UnknownModel(model))
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pro => "pro",
            Self::Flash => "flash",
            Self::FlashLite => "flash-lite",
            Self::LegacyFlash => "legacy-flash",
        };
        f.write_str(s)
    }
}

impl FromStr for ModelTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pro" => Ok(Self::Pro),
            "flash" => Ok(Self::Flash),
            "flash-lite" => Ok(Self::FlashLite),
            "legacy-flash" => Ok(Self::LegacyFlash),
            other => Err(Error::UnknownModel(other.to_string())),
        }
    }
}

/// Per-tier request timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTimeouts {
    pub pro_secs: u64,
    pub flash_secs: u64,
    pub flash_lite_secs: u64,
    pub legacy_flash_secs: u64,
}

impl ModelTimeouts {
    #[must_use]
    pub fn for_tier(&self, tier: ModelTier) -> Duration {
        let secs = match tier {
            ModelTier::Pro => self.pro_secs,
            ModelTier::Flash => self.flash_secs,
            ModelTier::FlashLite => self.flash_lite_secs,
            ModelTier::LegacyFlash => self.legacy_flash_secs,
        };
        Duration::from_secs(secs)
    }
}

impl Default for ModelTimeouts {
    fn default() -> Self {
        Self {
            pro_secs: 60,
            flash_secs: 20,
            flash_lite_secs: 10,
            legacy_flash_secs: 15,
        }
    }
}

/// Text produced by a generation model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub model: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_model_names() {
        assert_eq!(ModelTier::from_model_name("gemini-2.5-pro").unwrap(), ModelTier::Pro);
        assert_eq!(ModelTier::from_model_name("gemini-2.5-flash").unwrap(), ModelTier::Flash);
        assert_eq!(
            ModelTier::from_model_name("gemini-2.5-flash-lite").unwrap(),
            ModelTier::FlashLite
        );
        assert_eq!(
            ModelTier::from_model_name("gemini-1.5-flash").unwrap(),
            ModelTier::LegacyFlash
        );
        assert!(ModelTier::from_model_name("gpt-4").is_err());
    }

    #[test]
    fn tier_display_roundtrip() {
        for tier in [
            ModelTier::Pro,
            ModelTier::Flash,
            ModelTier::FlashLite,
            ModelTier::LegacyFlash,
        ] {
            assert_eq!(tier.to_string().parse::<ModelTier>().unwrap(), tier);
        }
    }

    #[test]
    fn default_timeouts() {
        let timeouts = ModelTimeouts::default();
        assert_eq!(timeouts.for_tier(ModelTier::Pro), Duration::from_secs(60));
        assert_eq!(timeouts.for_tier(ModelTier::Flash), Duration::from_secs(20));
        assert_eq!(timeouts.for_tier(ModelTier::FlashLite), Duration::from_secs(10));
        assert_eq!(timeouts.for_tier(ModelTier::LegacyFlash), Duration::from_secs(15));
    }
}
