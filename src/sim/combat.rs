//! Targeting, answer checking and hit/miss resolution

use glam::Vec2;

use super::choices::{ChoiceError, make_choices};
use super::state::{BurstSize, Enemy, GameEvent, GamePhase, GameState, InputMode, Projectile};
use crate::consts::*;
use crate::hit_score;

/// Result of an answer submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Correct; a projectile was fired at the enemy
    Fired,
    /// Wrong; streak reset and score penalised
    Wrong,
    /// Not aimed at the current target; nothing changed
    Stale,
}

/// Most urgent enemy: lowest on screen, ignoring ones already answered
fn most_urgent(enemies: &[Enemy]) -> Option<u32> {
    enemies
        .iter()
        .filter(|e| !e.locked)
        .fold(None::<&Enemy>, |best, e| match best {
            Some(b) if b.pos.y >= e.pos.y => Some(b),
            _ => Some(e),
        })
        .map(|e| e.id)
}

/// Targeting pass: pick the most urgent enemy, rebuild choices on change.
///
/// Answered (locked) enemies are skipped until their shot resolves.
pub fn retarget(state: &mut GameState) {
    match most_urgent(&state.enemies) {
        Some(id) if state.current_target == Some(id) => {}
        Some(id) => {
            state.current_target = Some(id);
            refresh_choices(state);
            log::debug!("Target -> enemy {}", id);
            state.events.push(GameEvent::TargetChanged { enemy_id: Some(id) });
        }
        None => {
            if state.current_target.take().is_some() {
                state.events.push(GameEvent::TargetChanged { enemy_id: None });
            }
            state.choices.clear();
        }
    }
}

/// Regenerate multiple-choice options for the current target
pub fn refresh_choices(state: &mut GameState) {
    state.choices.clear();
    if state.input_mode != InputMode::MultipleChoice {
        return;
    }
    let Some(problem) = state
        .current_target
        .and_then(|id| state.enemy(id))
        .map(|e| e.problem.clone())
    else {
        return;
    };
    state.choices = match make_choices(&mut state.rng, &problem, state.config.mode) {
        Ok(options) => options,
        Err(ChoiceError::GenerationExhausted { options }) => {
            log::warn!(
                "Only {} options for '{}' ({:?})",
                options.len(),
                problem.label,
                state.config.mode
            );
            options
        }
    };
}

/// Switch input mode mid-run
pub fn set_input_mode(state: &mut GameState, mode: InputMode) {
    if state.input_mode != mode {
        state.input_mode = mode;
        refresh_choices(state);
    }
}

/// Check an answer aimed at `enemy_id`
pub fn submit_answer(state: &mut GameState, enemy_id: u32, answer: &str) -> SubmitOutcome {
    if state.phase != GamePhase::Playing || state.current_target != Some(enemy_id) {
        log::debug!("Ignoring stale answer for enemy {}", enemy_id);
        return SubmitOutcome::Stale;
    }
    let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == enemy_id) else {
        state.current_target = None;
        state.choices.clear();
        return SubmitOutcome::Stale;
    };

    if enemy.problem.is_correct(answer) {
        enemy.locked = true;
        let at = enemy.pos;
        let from = state.player_pos();
        let id = state.next_entity_id();
        state.projectiles.push(Projectile::aimed(id, from, at, enemy_id));
        state.choices.clear();
        state.current_target = None;
        state.events.push(GameEvent::ProjectileFired { enemy_id });
        SubmitOutcome::Fired
    } else {
        state.streak = 0;
        state.score = state.score.saturating_sub(WRONG_ANSWER_PENALTY);
        state.events.push(GameEvent::WrongAnswer { enemy_id });
        SubmitOutcome::Wrong
    }
}

/// Forget the current target if it was `enemy_id`
fn release_target(state: &mut GameState, enemy_id: u32) {
    if state.current_target == Some(enemy_id) {
        state.current_target = None;
        state.choices.clear();
    }
}

/// Distance from `p` to the segment `a..b`
fn segment_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Index of the first enemy (scanning newest first) the path `from..to`
/// passes within hit range of
fn hit_index(from: Vec2, to: Vec2, enemies: &[Enemy]) -> Option<usize> {
    enemies
        .iter()
        .rposition(|e| segment_distance(from, to, e.pos) < e.width() / 2.0)
}

/// The shot at `enemy_id` is gone without hitting it; it can be targeted again
fn unlock(state: &mut GameState, enemy_id: u32) {
    if let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == enemy_id) {
        enemy.locked = false;
    }
}

/// Move projectiles and resolve hits; a projectile stops at its first hit
pub fn resolve_projectiles(state: &mut GameState, dt: f32) {
    let projectiles = std::mem::take(&mut state.projectiles);
    let mut survivors = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        let from = projectile.pos;
        projectile.update(dt);
        if let Some(idx) = hit_index(from, projectile.pos, &state.enemies) {
            let enemy = state.enemies.remove(idx);
            let intended = enemy.id == projectile.target_id;
            on_hit(state, enemy);
            if !intended {
                unlock(state, projectile.target_id);
            }
            continue;
        }
        if projectile.life > 0.0 {
            survivors.push(projectile);
        } else {
            unlock(state, projectile.target_id);
        }
    }

    state.projectiles = survivors;
}

fn on_hit(state: &mut GameState, enemy: Enemy) {
    release_target(state, enemy.id);
    state.spawn_explosion(enemy.pos, BurstSize::Hit);
    state.streak += 1;
    let points = hit_score(state.streak);
    state.score += points;
    state.learning_log.push(&enemy.problem);
    state.level_progress = (state.level_progress + PROGRESS_PER_HIT).min(100);
    state.events.push(GameEvent::EnemyDestroyed {
        enemy_id: enemy.id,
        points,
        streak: state.streak,
    });
}

/// Move enemies and remove those past the bottom edge (costs a life each)
pub fn resolve_enemies(state: &mut GameState, dt: f32) {
    let time = state.time;
    let limit = state.config.field_height + BOTTOM_MARGIN;
    for enemy in &mut state.enemies {
        enemy.update(dt, time);
    }

    let (escaped, alive): (Vec<Enemy>, Vec<Enemy>) =
        std::mem::take(&mut state.enemies).into_iter().partition(|e| e.pos.y > limit);
    state.enemies = alive;

    for enemy in escaped {
        on_escape(state, enemy);
    }
}

fn on_escape(state: &mut GameState, enemy: Enemy) {
    release_target(state, enemy.id);
    let at = Vec2::new(enemy.pos.x, state.config.field_height - 60.0);
    state.spawn_explosion(at, BurstSize::Boundary);
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.streak = 0;
    state.events.push(GameEvent::LifeLost { lives: state.lives });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.final_score = Some(state.score);
        log::info!("Game over - final score {}", state.score);
        state.events.push(GameEvent::GameOver {
            final_score: state.score,
        });
    }
}
