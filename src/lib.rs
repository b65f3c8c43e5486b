//! Binary Blaster - a number-base conversion arcade shooter
//!
//! Core modules:
//! - `sim`: Seeded simulation (conversions, problems, entities, combat, clock)
//! - `session`: A running play session plus the assets it owns
//! - `assets`: Feedback sinks (audio) handed to a session at start
//! - `settings`: Player preferences and session configuration

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod session;
pub mod settings;
pub mod sim;

pub use assets::{AssetContext, AudioSink, Cue, SilentAudio};
pub use session::Session;
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest simulation step; longer frames are clamped to this
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Default play-field dimensions (CSS pixels)
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;
    /// Horizontal spawn margin on either side
    pub const SPAWN_MARGIN_X: f32 = 60.0;
    /// Enemies spawn this far above the top edge
    pub const SPAWN_Y: f32 = -40.0;
    /// Enemies past `height + BOTTOM_MARGIN` are misses
    pub const BOTTOM_MARGIN: f32 = 40.0;

    /// Player ship sits this far above the bottom edge
    pub const PLAYER_OFFSET_Y: f32 = 90.0;
    /// Fraction of the remaining distance covered per second
    pub const PLAYER_FOLLOW_RATE: f32 = 6.0;

    /// Enemy sprite size (square)
    pub const ENEMY_SIZE: f32 = 60.0;
    /// Horizontal drift amplitude (pixels/s)
    pub const ENEMY_DRIFT: f32 = 8.0;

    /// Projectile speed (pixels/s)
    pub const PROJECTILE_SPEED: f32 = 1500.0;
    pub const PROJECTILE_SIZE: f32 = 8.0;
    /// Projectile life lost per second (starts at 1.0)
    pub const PROJECTILE_DECAY: f32 = 2.0;

    /// Spawner cadence (seconds)
    pub const SPAWN_INTERVAL: f32 = 2.5;
    /// Targeting cadence (seconds)
    pub const TARGET_INTERVAL: f32 = 0.22;

    /// Wave length (seconds)
    pub const WAVE_DURATION: f32 = 90.0;
    /// "Wave complete" interstitial (seconds)
    pub const WAVE_INTERSTITIAL: f32 = 0.9;

    /// Starting (and maximum) lives
    pub const START_LIVES: u8 = 3;
    /// Base points per destroyed enemy
    pub const HIT_BASE_SCORE: u64 = 10;
    /// Points lost per wrong answer
    pub const WRONG_ANSWER_PENALTY: u64 = 5;
    /// Level progress gained per hit (percent)
    pub const PROGRESS_PER_HIT: u8 = 5;
    /// Learning log capacity
    pub const LEARNING_LOG_LEN: usize = 8;
    /// Multiple-choice option count (correct answer included)
    pub const CHOICE_COUNT: usize = 4;
}

/// Unit vector for an angle (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Points awarded for a hit that brings the streak to `streak`.
///
/// `10 + floor(10 * (1 + streak / 5))`, computed in integers.
#[inline]
pub fn hit_score(streak: u32) -> u64 {
    consts::HIT_BASE_SCORE + (10 * (5 + streak as u64)) / 5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_score_first_hit() {
        assert_eq!(hit_score(1), 22);
        assert_eq!(hit_score(5), 30);
    }

    #[test]
    fn test_direction_is_unit() {
        let d = direction(1.234);
        assert!((d.length() - 1.0).abs() < 1e-5);
    }
}
