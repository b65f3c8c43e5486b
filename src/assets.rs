//! Assets owned by a session
//!
//! The session is handed an [`AssetContext`] when it starts and drops it when
//! it ends; nothing here is global. Audio goes through the [`AudioSink`]
//! trait so the core runs headless in tests and on native.

use crate::sim::GameEvent;

/// Feedback sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Correct answer, shot fired
    Fire,
    /// Enemy destroyed
    Explosion,
    /// Wrong answer buzz
    WrongAnswer,
    /// Enemy reached the bottom
    LifeLost,
    WaveComplete,
    GameOver,
}

impl Cue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::ProjectileFired { .. } => Some(Cue::Fire),
            GameEvent::EnemyDestroyed { .. } => Some(Cue::Explosion),
            GameEvent::WrongAnswer { .. } => Some(Cue::WrongAnswer),
            GameEvent::LifeLost { .. } => Some(Cue::LifeLost),
            GameEvent::WaveComplete { .. } => Some(Cue::WaveComplete),
            GameEvent::GameOver { .. } => Some(Cue::GameOver),
            GameEvent::TargetChanged { .. } | GameEvent::Paused | GameEvent::Resumed => None,
        }
    }
}

/// Something that can play cues and be suspended with the game
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn suspend(&mut self);
    fn resume(&mut self);
    /// Release any platform resources
    fn close(&mut self) {}
}

/// Audio sink that plays nothing
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: Cue) {}
    fn suspend(&mut self) {}
    fn resume(&mut self) {}
}

/// Platform resources a session owns for its lifetime
pub struct AssetContext {
    audio: Box<dyn AudioSink>,
}

impl Default for AssetContext {
    fn default() -> Self {
        Self::silent()
    }
}

impl AssetContext {
    pub fn new(audio: Box<dyn AudioSink>) -> Self {
        Self { audio }
    }

    /// Context with no audio (tests, native demo)
    pub fn silent() -> Self {
        Self::new(Box::new(SilentAudio))
    }

    pub fn audio(&mut self) -> &mut dyn AudioSink {
        self.audio.as_mut()
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Paused => self.audio.suspend(),
            GameEvent::Resumed => self.audio.resume(),
            other => {
                if let Some(cue) = Cue::for_event(other) {
                    self.audio.play(cue);
                }
            }
        }
    }

    /// Tear down at session end
    pub fn close(mut self) {
        self.audio.close();
    }
}

impl std::fmt::Debug for AssetContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetContext").finish_non_exhaustive()
    }
}
