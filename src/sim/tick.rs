//! Frame tick
//!
//! One call per rendered frame. The spawner and targeting timers run on
//! their own cadences but only emit intents; all intents are applied at the
//! start of a tick, before any entity moves, so nothing mutates a collection
//! while something else is iterating it.

use serde::{Deserialize, Serialize};

use super::combat::{self, SubmitOutcome};
use super::spawn::spawn_enemy;
use super::state::{GameEvent, GamePhase, GameState, InputMode};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch x position the ship should follow
    pub target_x: Option<f32>,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - answer every target correctly
    pub autopilot: bool,
}

/// A state transition waiting for the next tick boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Spawner timer fired
    Spawn,
    /// Targeting timer fired
    Retarget,
    /// Answer typed or clicked for a specific enemy
    Submit { enemy_id: u32, answer: String },
    SetInputMode(InputMode),
    TogglePause,
}

/// Repeating timer that fires at most once per advance.
///
/// Missed periods are dropped rather than replayed, so a long stall or a
/// pause never produces a burst of spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    pub period: f32,
    pub elapsed: f32,
}

impl Interval {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.period {
            self.elapsed = (self.elapsed - self.period) % self.period;
            true
        } else {
            false
        }
    }
}

fn toggle_pause(state: &mut GameState) {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::Paused);
            log::info!("Paused");
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::Resumed);
            log::info!("Resumed");
        }
        _ => {}
    }
}

/// Apply one intent. Gameplay intents only take effect while playing.
pub fn apply_intent(state: &mut GameState, intent: Intent) {
    match intent {
        Intent::TogglePause => toggle_pause(state),
        Intent::SetInputMode(mode) => {
            if state.phase != GamePhase::GameOver {
                combat::set_input_mode(state, mode);
            }
        }
        _ if state.phase != GamePhase::Playing => {
            log::debug!("Dropping {:?} while {:?}", intent, state.phase);
        }
        Intent::Spawn => {
            spawn_enemy(state);
        }
        Intent::Retarget => combat::retarget(state),
        Intent::Submit { enemy_id, answer } => {
            combat::submit_answer(state, enemy_id, &answer);
        }
    }
}

/// Answer the current target correctly (demo mode)
fn autopilot(state: &mut GameState) {
    let Some(id) = state.current_target else {
        return;
    };
    let Some(answer) = state.enemy(id).map(|e| e.problem.answer.clone()) else {
        return;
    };
    if combat::submit_answer(state, id, &answer) != SubmitOutcome::Fired {
        log::warn!("Autopilot answer for enemy {} was not accepted", id);
    }
}

/// Advance the game by one frame of `dt` seconds (wall clock)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // UI intents queued since the last frame. Pause requests from any
    // source collapse into a single toggle.
    let pending = std::mem::take(&mut state.pending);
    let (pauses, intents): (Vec<Intent>, Vec<Intent>) = pending
        .into_iter()
        .partition(|i| *i == Intent::TogglePause);
    if input.pause || !pauses.is_empty() {
        toggle_pause(state);
    }
    for intent in intents {
        apply_intent(state, intent);
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::WaveComplete => {
            state.interstitial -= dt;
            if state.interstitial <= 0.0 {
                state.interstitial = 0.0;
                state.phase = GamePhase::Playing;
                log::info!("Wave {} starting", state.wave + 1);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    // Timers run on wall-clock time; they emit intents only
    let mut timed = Vec::new();
    if state.spawn_timer.advance(dt) {
        timed.push(Intent::Spawn);
    }
    if state.target_timer.advance(dt) {
        timed.push(Intent::Retarget);
    }
    for intent in timed {
        apply_intent(state, intent);
    }
    if input.autopilot {
        autopilot(state);
    }

    let dt = dt.min(MAX_FRAME_DT);
    state.time += dt;

    if let Some(x) = input.target_x {
        state.player.target_x = x;
    }
    let width = state.config.field_width;
    state.player.update(dt, width);

    combat::resolve_projectiles(state, dt);
    combat::resolve_enemies(state, dt);

    for particle in &mut state.particles {
        particle.update(dt);
    }
    state.particles.retain(|p| p.life > 0.0);
    for explosion in &mut state.explosions {
        explosion.update(dt);
    }
    state.explosions.retain(|e| e.life > 0.0);

    state.shake.update(dt, &mut state.rng);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.wave_timer -= dt;
    if state.wave_timer <= 0.0 {
        state.wave += 1;
        state.wave_timer = WAVE_DURATION;
        state.interstitial = WAVE_INTERSTITIAL;
        state.phase = GamePhase::WaveComplete;
        log::info!("Wave {} complete (score {})", state.wave, state.score);
        state.events.push(GameEvent::WaveComplete { wave: state.wave });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::problem::{ConversionMode, Problem};
    use crate::sim::state::{Enemy, EnemyKind, SessionConfig};
    use glam::Vec2;

    fn state() -> GameState {
        let config = SessionConfig {
            mode: ConversionMode::DecimalToBinary,
            ..Default::default()
        };
        GameState::new(config, 12345)
    }

    fn run(state: &mut GameState, input: &TickInput, frames: u32, dt: f32) {
        for _ in 0..frames {
            tick(state, input, dt);
        }
    }

    #[test]
    fn test_interval_fires_once_without_replay() {
        let mut t = Interval::new(2.5);
        assert!(!t.advance(2.0));
        assert!(t.advance(0.6));
        assert!((t.elapsed - 0.1).abs() < 1e-5);
        // a long stall fires once and keeps the phase
        assert!(t.advance(10.0));
        assert!(t.elapsed < 2.5);
    }

    #[test]
    fn test_spawner_cadence() {
        let mut s = state();
        let input = TickInput::default();
        run(&mut s, &input, 49, 0.05);
        assert!(s.enemies.is_empty());
        run(&mut s, &input, 2, 0.05);
        assert_eq!(s.enemies.len(), 1);
        run(&mut s, &input, 50, 0.05);
        assert_eq!(s.enemies.len(), 2);
    }

    #[test]
    fn test_targeting_follows_spawn() {
        let mut s = state();
        let input = TickInput::default();
        run(&mut s, &input, 56, 0.05);
        let id = s.enemies[0].id;
        assert_eq!(s.current_target, Some(id));
        assert_eq!(s.choices.len(), CHOICE_COUNT);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut s = state();
        run(&mut s, &TickInput::default(), 60, 0.05);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut s, &pause, 0.05);
        assert_eq!(s.phase, GamePhase::Paused);

        let enemies = s.enemies.len();
        let y = s.enemies[0].pos.y;
        let timer = s.wave_timer;
        let spawn_elapsed = s.spawn_timer.elapsed;
        run(&mut s, &TickInput::default(), 200, 0.05);
        assert_eq!(s.enemies.len(), enemies);
        assert_eq!(s.enemies[0].pos.y, y);
        assert_eq!(s.wave_timer, timer);
        assert_eq!(s.spawn_timer.elapsed, spawn_elapsed);

        tick(&mut s, &pause, 0.05);
        assert_eq!(s.phase, GamePhase::Playing);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_simultaneous_pause_requests_toggle_once() {
        let mut s = state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        s.pending.push(Intent::TogglePause);
        s.pending.push(Intent::TogglePause);
        tick(&mut s, &pause, 0.016);
        assert_eq!(s.phase, GamePhase::Paused);
        assert_eq!(s.drain_events(), vec![GameEvent::Paused]);
    }

    #[test]
    fn test_submission_applied_at_tick_boundary() {
        let mut s = state();
        let id = s.next_entity_id();
        s.enemies.push(Enemy::new(
            id,
            Vec2::new(400.0, 100.0),
            0.0,
            EnemyKind::Basic,
            Problem::new("11", "1011"),
            0.0,
        ));
        combat::retarget(&mut s);
        s.pending.push(Intent::Submit {
            enemy_id: id,
            answer: "1011".into(),
        });
        assert!(s.projectiles.is_empty());
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.projectiles.len(), 1);
    }

    #[test]
    fn test_dt_is_clamped_for_motion() {
        let mut s = state();
        let id = s.next_entity_id();
        s.enemies.push(Enemy::new(
            id,
            Vec2::new(400.0, 0.0),
            100.0,
            EnemyKind::Basic,
            Problem::new("11", "1011"),
            0.0,
        ));
        tick(&mut s, &TickInput::default(), 1.0);
        assert!((s.enemies[0].pos.y - 100.0 * MAX_FRAME_DT).abs() < 1e-3);
    }

    #[test]
    fn test_player_follows_pointer() {
        let mut s = state();
        let input = TickInput {
            target_x: Some(100.0),
            ..Default::default()
        };
        run(&mut s, &input, 120, 0.016);
        assert!((s.player.x - 100.0).abs() < 1.0);
    }

    #[test]
    fn test_wave_complete_interstitial() {
        let mut s = state();
        s.wave_timer = 0.01;
        tick(&mut s, &TickInput::default(), 0.02);
        assert_eq!(s.phase, GamePhase::WaveComplete);
        assert_eq!(s.wave, 1);
        assert_eq!(s.wave_timer, WAVE_DURATION);
        run(&mut s, &TickInput::default(), 10, 0.05);
        assert_eq!(s.phase, GamePhase::WaveComplete);
        run(&mut s, &TickInput::default(), 10, 0.05);
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_autopilot_clears_enemies() {
        let mut s = state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        run(&mut s, &input, 60 * 30, 1.0 / 60.0);
        assert!(s.score > 0);
        assert_eq!(s.lives, START_LIVES);
        assert!(s.learning_log.len() > 0);
    }

    #[test]
    fn test_input_mode_switch_mid_run() {
        let mut s = state();
        run(&mut s, &TickInput::default(), 56, 0.05);
        assert_eq!(s.choices.len(), CHOICE_COUNT);
        s.pending.push(Intent::SetInputMode(InputMode::NumericInput));
        tick(&mut s, &TickInput::default(), 0.016);
        assert!(s.choices.is_empty());
        assert_eq!(s.input_mode, InputMode::NumericInput);
    }

    #[test]
    fn test_game_over_stops_simulation() {
        let mut s = state();
        s.lives = 1;
        let id = s.next_entity_id();
        let y = s.config.field_height + BOTTOM_MARGIN + 1.0;
        s.enemies.push(Enemy::new(
            id,
            Vec2::new(400.0, y),
            0.0,
            EnemyKind::Basic,
            Problem::new("11", "1011"),
            0.0,
        ));
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.phase, GamePhase::GameOver);
        let timer = s.wave_timer;
        run(&mut s, &TickInput::default(), 100, 0.05);
        assert_eq!(s.wave_timer, timer);
        assert!(s.enemies.is_empty());
    }
}
