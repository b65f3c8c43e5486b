//! A running play session
//!
//! Owns the simulation state and the assets handed to it at start. UI calls
//! (`submit`, `toggle_pause`, ...) only queue intents; they land on the next
//! `frame`.

use crate::assets::AssetContext;
use crate::sim::tick::{Intent, TickInput, tick};
use crate::sim::{FrameView, GameEvent, GamePhase, GameState, InputMode, SessionConfig, Telemetry};

#[derive(Debug)]
pub struct Session {
    state: GameState,
    assets: AssetContext,
}

impl Session {
    /// Begin a run with `config`; the session owns `assets` until [`Session::end`]
    pub fn start(config: SessionConfig, assets: AssetContext, seed: u64) -> Self {
        log::info!(
            "Session start: {} / {} / {:?} (seed {})",
            config.difficulty,
            config.mode,
            config.input_mode,
            seed
        );
        Self {
            state: GameState::new(config, seed),
            assets,
        }
    }

    /// Advance one rendered frame and play feedback for what happened
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        tick(&mut self.state, input, dt);
        let events = self.state.drain_events();
        for event in &events {
            self.assets.handle(event);
        }
        events
    }

    /// Queue an answer for `enemy_id`
    pub fn submit(&mut self, enemy_id: u32, answer: impl Into<String>) {
        self.state.pending.push(Intent::Submit {
            enemy_id,
            answer: answer.into(),
        });
    }

    /// Queue an answer for whatever is targeted right now. Returns false when
    /// nothing is targeted.
    pub fn submit_current(&mut self, answer: impl Into<String>) -> bool {
        match self.state.current_target {
            Some(id) => {
                self.submit(id, answer);
                true
            }
            None => false,
        }
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.state.pending.push(Intent::SetInputMode(mode));
    }

    pub fn toggle_pause(&mut self) {
        self.state.pending.push(Intent::TogglePause);
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn telemetry(&self) -> Telemetry {
        self.state.telemetry()
    }

    pub fn frame_view(&self) -> FrameView<'_> {
        self.state.frame_view()
    }

    /// Fresh run with the same configuration
    pub fn restart(&mut self, seed: u64) {
        if self.state.phase == GamePhase::Paused {
            self.assets.audio().resume();
        }
        let config = self.state.config.clone();
        log::info!("Session restart (seed {})", seed);
        self.state = GameState::new(config, seed);
    }

    /// Tear down the assets; returns the final score if the run ended
    pub fn end(self) -> Option<u64> {
        log::info!(
            "Session end: score {} after {} waves",
            self.state.score,
            self.state.wave
        );
        self.assets.close();
        self.state.final_score
    }
}
