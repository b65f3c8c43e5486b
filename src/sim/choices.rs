//! Multiple-choice option generation
//!
//! Wrong options are built by nudging the underlying value by a small
//! non-zero offset and re-formatting it in the answer's base.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::numeral::{self, Radix};
use super::problem::{ConversionMode, Problem};
use crate::consts::CHOICE_COUNT;

/// Draws per round before widening the offset range
pub const DRAWS_PER_ROUND: u32 = 64;
/// Offset ranges tried in order
const OFFSET_RANGES: [i64; 2] = [8, 32];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    /// Not enough distinct distractors were found; `options` holds the
    /// correct answer plus whatever was found, shuffled.
    #[error("only {} distinct options could be generated", options.len())]
    GenerationExhausted { options: Vec<String> },
}

/// Non-zero offset in `[-range, range]`
fn draw_offset(rng: &mut impl Rng, range: i64) -> i64 {
    let delta = rng.random_range(-range..=range);
    if delta == 0 { rng.random_range(1..=range) } else { delta }
}

/// One candidate distractor, or `None` if the offset lands out of range
fn candidate(problem: &Problem, mode: ConversionMode, delta: i64) -> Option<String> {
    let target = mode.target_radix();
    // Decimal answers are nudged directly; other bases nudge the label's value.
    let base = if target == Radix::Decimal {
        numeral::parse(&problem.answer, Radix::Decimal).ok()?
    } else {
        numeral::parse(&problem.label, mode.source_radix()).ok()?
    };
    let value = base.checked_add_signed(delta)?;
    match mode {
        ConversionMode::BinaryToDecimal
        | ConversionMode::HexToDecimal
        | ConversionMode::OctalToDecimal => (value > 0).then(|| value.to_string()),
        // Keep the padded width so length doesn't give the answer away
        ConversionMode::HexToBinary => Some(numeral::pad_binary(value, problem.answer.len())),
        _ => Some(numeral::format(value, target)),
    }
}

/// Build the shuffled option list for a problem.
///
/// On success the result has exactly [`CHOICE_COUNT`] distinct entries, one
/// of which is the correct answer.
pub fn make_choices(
    rng: &mut impl Rng,
    problem: &Problem,
    mode: ConversionMode,
) -> Result<Vec<String>, ChoiceError> {
    choices_with_ranges(rng, problem, mode, &OFFSET_RANGES)
}

/// One round of [`DRAWS_PER_ROUND`] draws per entry of `ranges`, widest last
fn choices_with_ranges(
    rng: &mut impl Rng,
    problem: &Problem,
    mode: ConversionMode,
    ranges: &[i64],
) -> Result<Vec<String>, ChoiceError> {
    let wanted = CHOICE_COUNT - 1;
    let mut wrong: Vec<String> = Vec::with_capacity(wanted);

    'rounds: for &range in ranges {
        for _ in 0..DRAWS_PER_ROUND {
            if wrong.len() == wanted {
                break 'rounds;
            }
            let delta = draw_offset(rng, range);
            if let Some(cand) = candidate(problem, mode, delta) {
                if !cand.eq_ignore_ascii_case(&problem.answer) && !wrong.contains(&cand) {
                    wrong.push(cand);
                }
            }
        }
    }

    let complete = wrong.len() == wanted;
    let mut options = Vec::with_capacity(CHOICE_COUNT);
    options.push(problem.answer.clone());
    options.extend(wrong);
    options.shuffle(rng);

    if complete {
        Ok(options)
    } else {
        Err(ChoiceError::GenerationExhausted { options })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::problem::generate_problem;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_valid(options: &[String], answer: &str) {
        assert_eq!(options.len(), CHOICE_COUNT);
        assert_eq!(options.iter().filter(|o| o.as_str() == answer).count(), 1);
        for (i, a) in options.iter().enumerate() {
            for b in &options[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_decimal_target_options() {
        let mut rng = Pcg32::seed_from_u64(1);
        let problem = Problem::new("1011", "11");
        let options = make_choices(&mut rng, &problem, ConversionMode::BinaryToDecimal).unwrap();
        assert_valid(&options, "11");
        for o in &options {
            assert!(o.parse::<u64>().unwrap() > 0);
        }
    }

    #[test]
    fn test_hex_to_binary_options_keep_width() {
        let mut rng = Pcg32::seed_from_u64(2);
        let problem = Problem::new("D6", "11010110");
        let options = make_choices(&mut rng, &problem, ConversionMode::HexToBinary).unwrap();
        assert_valid(&options, "11010110");
        assert!(options.iter().all(|o| o.len() == 8));
    }

    #[test]
    fn test_degenerate_zero_label_still_completes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let problem = Problem::new("0", "0");
        let options = make_choices(&mut rng, &problem, ConversionMode::DecimalToBinary).unwrap();
        assert_valid(&options, "0");
    }

    #[test]
    fn test_unparseable_label_degrades_instead_of_hanging() {
        let mut rng = Pcg32::seed_from_u64(4);
        let problem = Problem::new("zz", "??");
        match make_choices(&mut rng, &problem, ConversionMode::DecimalToHex) {
            Err(ChoiceError::GenerationExhausted { options }) => {
                assert_eq!(options, vec!["??".to_string()]);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_wider_round_fills_missing_distractors() {
        let problem = Problem::new("101", "5");
        let mode = ConversionMode::BinaryToDecimal;

        // Offsets of +-1 only reach 4 and 6
        let mut rng = Pcg32::seed_from_u64(6);
        match choices_with_ranges(&mut rng, &problem, mode, &[1]) {
            Err(ChoiceError::GenerationExhausted { options }) => {
                let mut sorted = options.clone();
                sorted.sort();
                assert_eq!(sorted, vec!["4", "5", "6"]);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }

        let mut rng = Pcg32::seed_from_u64(6);
        let options = choices_with_ranges(&mut rng, &problem, mode, &[1, 32]).unwrap();
        assert_valid(&options, "5");
        assert!(options.contains(&"4".to_string()));
        assert!(options.contains(&"6".to_string()));
    }

    #[test]
    fn test_answer_position_varies() {
        let mut rng = Pcg32::seed_from_u64(5);
        let problem = Problem::new("11", "1011");
        let mut seen = [false; CHOICE_COUNT];
        for _ in 0..200 {
            let options = make_choices(&mut rng, &problem, ConversionMode::DecimalToBinary).unwrap();
            let pos = options.iter().position(|o| o == "1011").unwrap();
            seen[pos] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    proptest! {
        #[test]
        fn prop_options_distinct_with_one_answer(seed in any::<u64>(), bits in 3u32..14, mode_idx in 0usize..8) {
            let mode = ConversionMode::ALL[mode_idx];
            let mut rng = Pcg32::seed_from_u64(seed);
            let problem = generate_problem(&mut rng, bits, mode);
            let options = make_choices(&mut rng, &problem, mode).unwrap();
            prop_assert_eq!(options.len(), CHOICE_COUNT);
            prop_assert_eq!(options.iter().filter(|o| **o == problem.answer).count(), 1);
            let mut sorted = options.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), CHOICE_COUNT);
        }
    }
}
