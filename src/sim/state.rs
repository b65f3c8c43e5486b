//! Game state and core simulation types
//!
//! Entities are plain structs stored in `Vec`s owned by [`GameState`]; none
//! of them point back at the collection that holds them.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::problem::{ConversionMode, Problem};
use super::spawn::Difficulty;
use super::tick::{Intent, Interval};
use crate::consts::*;
use crate::direction;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// All timers and entities frozen
    Paused,
    /// Short interstitial after the wave timer runs out
    WaveComplete,
    /// Run ended; final score is latched
    GameOver,
}

/// How the player enters answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    #[default]
    MultipleChoice,
    NumericInput,
}

/// Enemy movement/toughness archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Basic,
    Fast,
    Armored,
    Jumper,
}

impl EnemyKind {
    /// Starting health (display only; one hit destroys every kind)
    pub fn health(self) -> u8 {
        match self {
            EnemyKind::Armored => 3,
            _ => 1,
        }
    }

    /// Multiplier applied to the rolled base speed at spawn
    pub fn speed_factor(self) -> f32 {
        match self {
            EnemyKind::Fast => 1.5,
            _ => 1.0,
        }
    }
}

/// A falling enemy carrying a problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Descent speed (pixels/s)
    pub speed: f32,
    pub kind: EnemyKind,
    pub health: u8,
    /// Phase offset for drift and jumper pulsing
    pub sine_offset: f32,
    pub problem: Problem,
    /// A correct answer was submitted and a projectile is inbound
    pub locked: bool,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, speed: f32, kind: EnemyKind, problem: Problem, sine_offset: f32) -> Self {
        Self {
            id,
            pos,
            speed,
            kind,
            health: kind.health(),
            sine_offset,
            problem,
            locked: false,
        }
    }

    pub fn width(&self) -> f32 {
        ENEMY_SIZE
    }

    /// Advance by `dt`; `time` is accumulated simulation time (seconds)
    pub fn update(&mut self, dt: f32, time: f32) {
        let descent = match self.kind {
            EnemyKind::Jumper => self.speed * (1.0 + 0.3 * (time * 5.0 + self.sine_offset).sin()),
            _ => self.speed,
        };
        self.pos.y += descent * dt;
        self.pos.x += (time * 2.5 + self.sine_offset).sin() * ENEMY_DRIFT * dt;
    }
}

/// A shot fired at an enemy's position at fire time (not homing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 1.0 at launch, expires at 0
    pub life: f32,
    /// Enemy this shot was fired at
    pub target_id: u32,
}

impl Projectile {
    pub fn aimed(id: u32, from: Vec2, at: Vec2, target_id: u32) -> Self {
        let to = at - from;
        let angle = to.y.atan2(to.x);
        Self {
            id,
            pos: from,
            vel: direction(angle) * PROJECTILE_SPEED,
            size: PROJECTILE_SIZE,
            life: 1.0,
            target_id,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life = (self.life - dt * PROJECTILE_DECAY).max(0.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    Circle,
    Square,
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub size: f32,
    pub gravity: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub shape: ParticleShape,
    /// HSL hue for sparks, grey level for debris
    pub tint: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;
        self.rotation += self.rotation_speed * dt;
    }
}

/// Expanding flash at a destruction point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub life: f32,
    pub max_radius: f32,
}

/// Flash duration (seconds)
pub const EXPLOSION_LIFE: f32 = 0.2;

impl Explosion {
    pub fn new(pos: Vec2, max_radius: f32) -> Self {
        Self {
            pos,
            life: EXPLOSION_LIFE,
            max_radius,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
    }

    /// Current radius (grows as life runs out)
    pub fn radius(&self) -> f32 {
        self.max_radius * (1.0 - self.life / EXPLOSION_LIFE).clamp(0.0, 1.0)
    }
}

/// Size of a destruction burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstSize {
    /// Enemy destroyed by a projectile
    Hit,
    /// Enemy escaped past the bottom edge
    Boundary,
}

impl BurstSize {
    fn flash_radius(self) -> f32 {
        match self {
            BurstSize::Hit => 60.0,
            BurstSize::Boundary => 36.0,
        }
    }

    fn sparks(self) -> usize {
        match self {
            BurstSize::Hit => 60,
            BurstSize::Boundary => 30,
        }
    }

    fn debris(self) -> usize {
        match self {
            BurstSize::Hit => 10,
            BurstSize::Boundary => 5,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub target_x: f32,
}

impl Player {
    /// Ease toward `target_x`, clamped into `[0, width]`
    pub fn update(&mut self, dt: f32, width: f32) {
        let t = (PLAYER_FOLLOW_RATE * dt).min(1.0);
        self.x += (self.target_x - self.x) * t;
        self.x = self.x.clamp(0.0, width);
    }
}

/// Screen shake applied by the renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraShake {
    pub offset: Vec2,
    pub intensity: f32,
    pub time: f32,
}

impl CameraShake {
    pub fn trigger(&mut self, intensity: f32, time: f32) {
        self.intensity = intensity;
        self.time = time;
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.time > 0.0 {
            self.offset = Vec2::new(
                (rng.random::<f32>() - 0.5) * self.intensity,
                (rng.random::<f32>() - 0.5) * self.intensity,
            );
            self.time -= dt;
            self.intensity *= 0.9;
        } else {
            self.offset = Vec2::ZERO;
        }
    }
}

/// One solved problem in the learning log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub problem: String,
    pub answer: String,
}

/// Most-recent-first record of destroyed enemies' problems
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningLog {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

impl LearningLog {
    pub fn push(&mut self, problem: &Problem) {
        self.next_id += 1;
        self.entries.push_front(LogEntry {
            id: self.next_id,
            problem: problem.label.clone(),
            answer: problem.answer.clone(),
        });
        self.entries.truncate(LEARNING_LOG_LEN);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed for the whole run (input mode excepted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub mode: ConversionMode,
    pub input_mode: InputMode,
    pub field_width: f32,
    pub field_height: f32,
    pub screen_shake: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            mode: ConversionMode::default(),
            input_mode: InputMode::default(),
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            screen_shake: true,
        }
    }
}

/// Things that happened during a tick, for audio and HUD feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Correct answer; a projectile is on its way
    ProjectileFired { enemy_id: u32 },
    /// Wrong answer for the current target
    WrongAnswer { enemy_id: u32 },
    /// Projectile destroyed an enemy
    EnemyDestroyed { enemy_id: u32, points: u64, streak: u32 },
    /// Enemy crossed the bottom edge
    LifeLost { lives: u8 },
    /// New current target (None when the field is empty)
    TargetChanged { enemy_id: Option<u32> },
    WaveComplete { wave: u32 },
    Paused,
    Resumed,
    GameOver { final_score: u64 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SessionConfig,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub input_mode: InputMode,

    pub score: u64,
    pub lives: u8,
    pub streak: u32,
    /// Seconds left in the current wave
    pub wave_timer: f32,
    /// Waves completed so far
    pub wave: u32,
    /// Percent, capped at 100
    pub level_progress: u8,
    /// Latched when the run ends
    pub final_score: Option<u64>,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub explosions: Vec<Explosion>,
    pub shake: CameraShake,

    /// Enemy currently eligible to receive an answer
    pub current_target: Option<u32>,
    /// Options shown in multiple-choice mode
    pub choices: Vec<String>,
    pub learning_log: LearningLog,

    /// Accumulated simulation time (seconds)
    pub time: f32,
    pub spawn_timer: Interval,
    pub target_timer: Interval,
    /// Seconds left in the wave-complete interstitial
    pub interstitial: f32,

    /// Intents waiting for the next tick boundary
    pub pending: Vec<Intent>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start a fresh run in the `Playing` phase
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        let player_x = config.field_width / 2.0;
        Self {
            input_mode: config.input_mode,
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            score: 0,
            lives: START_LIVES,
            streak: 0,
            wave_timer: WAVE_DURATION,
            wave: 0,
            level_progress: 0,
            final_score: None,
            player: Player {
                x: player_x,
                target_x: player_x,
            },
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            explosions: Vec::new(),
            shake: CameraShake::default(),
            current_target: None,
            choices: Vec::new(),
            learning_log: LearningLog::default(),
            time: 0.0,
            spawn_timer: Interval::new(SPAWN_INTERVAL),
            target_timer: Interval::new(TARGET_INTERVAL),
            interstitial: 0.0,
            pending: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Player ship position
    pub fn player_pos(&self) -> Vec2 {
        Vec2::new(self.player.x, self.config.field_height - PLAYER_OFFSET_Y)
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Flash, particle burst and camera shake at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2, size: BurstSize) {
        self.explosions.push(Explosion::new(pos, size.flash_radius()));

        for _ in 0..size.sparks() {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = self.rng.random_range(100.0..300.0);
            self.particles.push(Particle {
                pos,
                vel: direction(angle) * speed,
                life: self.rng.random_range(0.5..1.5),
                size: self.rng.random_range(1.0..6.0),
                gravity: 120.0,
                rotation: self.rng.random_range(0.0..TAU),
                rotation_speed: self.rng.random_range(-TAU / 2.0..TAU / 2.0),
                shape: ParticleShape::Circle,
                tint: self.rng.random_range(20.0..50.0),
            });
        }
        for _ in 0..size.debris() {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = self.rng.random_range(80.0..200.0);
            self.particles.push(Particle {
                pos,
                vel: direction(angle) * speed,
                life: self.rng.random_range(1.0..3.0),
                size: self.rng.random_range(4.0..10.0),
                gravity: 300.0,
                rotation: self.rng.random_range(0.0..TAU),
                rotation_speed: self.rng.random_range(-TAU / 2.0..TAU / 2.0),
                shape: ParticleShape::Square,
                tint: self.rng.random_range(100.0..180.0),
            });
        }

        if self.config.screen_shake {
            match size {
                BurstSize::Hit => self.shake.trigger(10.0, 0.2),
                BurstSize::Boundary => self.shake.trigger(15.0, 0.3),
            }
        }
    }
}
