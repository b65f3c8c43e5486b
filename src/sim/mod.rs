//! Simulation module
//!
//! All gameplay logic lives here. It must stay free of platform code:
//! - Randomness only from the seeded RNG in `GameState`
//! - Animation keyed off accumulated simulation time, not the wall clock
//! - Input arrives as intents applied at tick boundaries

pub mod choices;
pub mod combat;
pub mod numeral;
pub mod problem;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod view;

pub use choices::{ChoiceError, make_choices};
pub use combat::SubmitOutcome;
pub use numeral::{NumeralError, Radix, convert, convert_named};
pub use problem::{ConversionMode, Problem, generate_problem};
pub use spawn::{Difficulty, spawn_enemy};
pub use state::{
    CameraShake, Enemy, EnemyKind, Explosion, GameEvent, GamePhase, GameState, InputMode,
    LearningLog, LogEntry, Particle, Player, Projectile, SessionConfig,
};
pub use tick::{Intent, Interval, TickInput, tick};
pub use view::{FrameView, Telemetry};
