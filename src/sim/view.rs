//! Read-only snapshots handed to the renderer and the HUD

use glam::Vec2;
use serde::Serialize;

use super::problem::ConversionMode;
use super::spawn::Difficulty;
use super::state::{Enemy, Explosion, GamePhase, GameState, InputMode, LogEntry, Particle, Projectile};
use crate::consts::WAVE_DURATION;

/// Everything the renderer needs for one frame. Borrowed; never mutated.
#[derive(Debug, Serialize)]
pub struct FrameView<'a> {
    pub width: f32,
    pub height: f32,
    pub player: Vec2,
    pub shake: Vec2,
    pub target: Option<u32>,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    pub explosions: &'a [Explosion],
}

/// Problem on the current target, as the HUD shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetInfo {
    pub enemy_id: u32,
    pub label: String,
}

/// Session telemetry for the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub mode: ConversionMode,
    pub input_mode: InputMode,
    pub score: u64,
    pub lives: u8,
    pub streak: u32,
    pub wave: u32,
    /// Remaining fraction of the current wave, `[0, 1]`
    pub wave_fraction: f32,
    /// Percent, `[0, 100]`
    pub level_progress: u8,
    pub target: Option<TargetInfo>,
    pub choices: Vec<String>,
    pub learning_log: Vec<LogEntry>,
    pub final_score: Option<u64>,
}

impl GameState {
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            width: self.config.field_width,
            height: self.config.field_height,
            player: self.player_pos(),
            shake: self.shake.offset,
            target: self.current_target,
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            particles: &self.particles,
            explosions: &self.explosions,
        }
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            phase: self.phase,
            difficulty: self.config.difficulty,
            mode: self.config.mode,
            input_mode: self.input_mode,
            score: self.score,
            lives: self.lives,
            streak: self.streak,
            wave: self.wave,
            wave_fraction: (self.wave_timer / WAVE_DURATION).clamp(0.0, 1.0),
            level_progress: self.level_progress,
            target: self.current_target.and_then(|id| {
                self.enemy(id).map(|e| TargetInfo {
                    enemy_id: id,
                    label: e.problem.label.clone(),
                })
            }),
            choices: self.choices.clone(),
            learning_log: self.learning_log.entries().cloned().collect(),
            final_score: self.final_score,
        }
    }
}
