//! Game settings and preferences
//!
//! The host page hands these over as JSON when a session starts. Missing
//! fields fall back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH};
use crate::sim::{ConversionMode, Difficulty, InputMode, SessionConfig};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // === Session ===
    pub difficulty: Difficulty,
    pub mode: ConversionMode,
    pub input_mode: InputMode,

    // === Visual Effects ===
    /// Screen shake on explosions/impacts
    pub screen_shake: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Play field (CSS pixels) ===
    pub field_width: f32,
    pub field_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Apprentice,
            mode: ConversionMode::BinaryToDecimal,
            input_mode: InputMode::MultipleChoice,

            screen_shake: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,

            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
        }
    }
}

impl Settings {
    /// Parse settings JSON; volumes are clamped into range
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(settings.field_width) || !valid(settings.field_height) {
            log::warn!(
                "Ignoring field size {}x{}",
                settings.field_width,
                settings.field_height
            );
            settings.field_width = DEFAULT_FIELD_WIDTH;
            settings.field_height = DEFAULT_FIELD_HEIGHT;
        }
        Ok(settings)
    }

    /// Parse settings, falling back to defaults on bad input
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("{} - using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective sfx volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Configuration for a new session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            difficulty: self.difficulty,
            mode: self.mode,
            input_mode: self.input_mode,
            field_width: self.field_width,
            field_height: self.field_height,
            screen_shake: self.effective_screen_shake(),
        }
    }
}
