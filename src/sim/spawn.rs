//! Enemy spawning and difficulty tiers

use std::f32::consts::TAU;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::problem::generate_problem;
use super::state::{Enemy, EnemyKind, GameState};
use crate::consts::{SPAWN_MARGIN_X, SPAWN_Y};

/// Named difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Apprentice,
    #[serde(rename = "Binary Engineer")]
    BinaryEngineer,
    #[serde(rename = "Cybernetic Sage")]
    CyberneticSage,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Apprentice,
        Difficulty::BinaryEngineer,
        Difficulty::CyberneticSage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Apprentice => "Apprentice",
            Difficulty::BinaryEngineer => "Binary Engineer",
            Difficulty::CyberneticSage => "Cybernetic Sage",
        }
    }

    /// Problem size in bits (half-open)
    pub fn bits_range(self) -> Range<u32> {
        match self {
            Difficulty::Apprentice => 3..6,
            Difficulty::BinaryEngineer => 6..10,
            Difficulty::CyberneticSage => 10..14,
        }
    }

    /// Flat bonus added to the rolled base speed
    pub fn speed_bonus(self) -> f32 {
        match self {
            Difficulty::Apprentice => 0.0,
            Difficulty::BinaryEngineer => 15.0,
            Difficulty::CyberneticSage => 30.0,
        }
    }

    /// Roll an enemy kind. Later rolls override earlier ones.
    pub fn pick_kind(self, rng: &mut impl Rng) -> EnemyKind {
        let rolls: &[(EnemyKind, f64)] = match self {
            Difficulty::Apprentice => &[],
            Difficulty::BinaryEngineer => &[(EnemyKind::Fast, 0.1), (EnemyKind::Armored, 0.1)],
            Difficulty::CyberneticSage => &[
                (EnemyKind::Fast, 0.2),
                (EnemyKind::Armored, 0.2),
                (EnemyKind::Jumper, 0.12),
            ],
        };
        let mut kind = EnemyKind::Basic;
        for &(candidate, p) in rolls {
            if rng.random_bool(p) {
                kind = candidate;
            }
        }
        kind
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().replace(' ', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown difficulty '{}'", s))
    }
}

/// Base descent speed range before bonuses (pixels/s)
pub const BASE_SPEED: Range<f32> = 15.0..40.0;

/// Create one enemy at the top of the field and add it to the live set
pub fn spawn_enemy(state: &mut GameState) -> u32 {
    let difficulty = state.config.difficulty;
    let bits = state.rng.random_range(difficulty.bits_range());
    let problem = generate_problem(&mut state.rng, bits, state.config.mode);

    let width = state.config.field_width;
    let x = if width > 2.0 * SPAWN_MARGIN_X {
        state.rng.random_range(SPAWN_MARGIN_X..width - SPAWN_MARGIN_X)
    } else {
        width / 2.0
    };

    let kind = difficulty.pick_kind(&mut state.rng);
    let speed = (state.rng.random_range(BASE_SPEED) + difficulty.speed_bonus()) * kind.speed_factor();
    let sine_offset = state.rng.random_range(0.0..TAU);

    let id = state.next_entity_id();
    log::debug!(
        "Spawned enemy {} ({:?}) '{}' -> '{}' speed {:.1}",
        id,
        kind,
        problem.label,
        problem.answer,
        speed
    );
    state
        .enemies
        .push(Enemy::new(id, Vec2::new(x, SPAWN_Y), speed, kind, problem, sine_offset));
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::problem::ConversionMode;
    use crate::sim::state::SessionConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state(difficulty: Difficulty) -> GameState {
        let config = SessionConfig {
            difficulty,
            mode: ConversionMode::DecimalToBinary,
            ..Default::default()
        };
        GameState::new(config, 99)
    }

    #[test]
    fn test_apprentice_only_basic() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            assert_eq!(Difficulty::Apprentice.pick_kind(&mut rng), EnemyKind::Basic);
        }
    }

    #[test]
    fn test_sage_unlocks_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(Difficulty::CyberneticSage.pick_kind(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_spawned_enemy_in_bounds() {
        for difficulty in Difficulty::ALL {
            let mut s = state(difficulty);
            for _ in 0..100 {
                spawn_enemy(&mut s);
            }
            for e in &s.enemies {
                assert_eq!(e.pos.y, SPAWN_Y);
                assert!(e.pos.x >= SPAWN_MARGIN_X && e.pos.x <= s.config.field_width - SPAWN_MARGIN_X);
                let lo = BASE_SPEED.start + difficulty.speed_bonus();
                let hi = (BASE_SPEED.end + difficulty.speed_bonus()) * 1.5;
                assert!(e.speed >= lo && e.speed <= hi);
                let value: u64 = e.problem.label.parse().unwrap();
                let bits = 64 - value.leading_zeros();
                assert!(difficulty.bits_range().contains(&bits));
            }
        }
    }

    #[test]
    fn test_spawn_ids_are_unique() {
        let mut s = state(Difficulty::Apprentice);
        let a = spawn_enemy(&mut s);
        let b = spawn_enemy(&mut s);
        assert_ne!(a, b);
        assert_eq!(s.enemies.len(), 2);
    }

    #[test]
    fn test_difficulty_names() {
        assert_eq!("Binary Engineer".parse::<Difficulty>(), Ok(Difficulty::BinaryEngineer));
        assert_eq!("cyberneticsage".parse::<Difficulty>(), Ok(Difficulty::CyberneticSage));
        assert_eq!(
            serde_json::to_string(&Difficulty::CyberneticSage).unwrap(),
            "\"Cybernetic Sage\""
        );
    }
}
