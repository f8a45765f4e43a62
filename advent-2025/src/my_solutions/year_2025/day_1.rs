use anyhow::anyhow;
use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::trace;

/// Safe dial: positions 0..=99, starting at 50
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 1, tags = ["simulation", "modular"])]
pub struct Solver;

const EXAMPLES: &[Example] = &[
    Example::new(1, "L68 L30 R48 L5 R60 L55 L1 L99 R14 L82", "3"),
    Example::new(2, "L68 L30 R48 L5 R60 L55 L1 L99 R14 L82 R1000", "16"),
];

const DIAL_SIZE: i64 = 100;
const DIAL_START: i64 = 50;

#[derive(Debug)]
pub struct SharedData {
    rotations: Vec<i64>,
    common_result: Option<CommonResult>,
}

#[derive(Debug)]
pub struct CommonResult {
    zero_counts: u64,
    pass_zero_counts: u64,
}

fn parse_rotation(token: &str) -> Result<i64, anyhow::Error> {
    let negative = match token.as_bytes().first() {
        Some(b'L') => true,
        Some(b'R') => false,
        _ => return Err(anyhow!("rotation must start with 'L' or 'R'")),
    };
    let clicks: u32 = token[1..].parse()?;
    Ok(if negative {
        -i64::from(clicks)
    } else {
        i64::from(clicks)
    })
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let rotations = input
            .split_whitespace()
            .enumerate()
            .map(|(idx, token)| {
                parse_rotation(token).map_err(|e| {
                    ParseError::InvalidFormat(format!("(rotation {} {:?}) {}", idx + 1, token, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SharedData {
            rotations,
            common_result: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(solve_once_for_both(shared).zero_counts.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(solve_once_for_both(shared).pass_zero_counts.to_string())
    }
}

fn solve_once_for_both(shared: &mut SharedData) -> &CommonResult {
    shared.common_result.get_or_insert_with(|| {
        let (_, zero_counts, pass_zero_counts) = shared.rotations.iter().fold(
            (DIAL_START, 0u64, 0u64),
            |(dial, mut zero_counts, mut pass_zero_counts), &rotation| {
                let unwrapped = dial + rotation;
                // Going left onto or past 0 from a non-zero position hits 0 once
                // before the full turns counted below.
                if unwrapped <= 0 && dial != 0 {
                    pass_zero_counts += 1;
                }
                pass_zero_counts += (unwrapped / DIAL_SIZE).unsigned_abs();

                let dial = unwrapped.rem_euclid(DIAL_SIZE);
                if dial == 0 {
                    zero_counts += 1;
                }
                trace!(rotation, dial, pass_zero_counts, "rotated dial");
                (dial, zero_counts, pass_zero_counts)
            },
        );

        CommonResult {
            zero_counts,
            pass_zero_counts,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn solve(input: &str, part: u8) -> String {
        let mut shared = <Solver as AocParser>::parse(input).unwrap();
        <Solver as aoc_solver::Solver>::solve_part(&mut shared, part).unwrap()
    }

    fn click_by_click(rotations: &[i64]) -> (u64, u64) {
        let mut dial = DIAL_START;
        let (mut at_rest, mut clicks) = (0, 0);
        for &rotation in rotations {
            for _ in 0..rotation.unsigned_abs() {
                dial = (dial + rotation.signum()).rem_euclid(DIAL_SIZE);
                if dial == 0 {
                    clicks += 1;
                }
            }
            if dial == 0 {
                at_rest += 1;
            }
        }
        (at_rest, clicks)
    }

    #[test]
    fn test_example_without_long_rotation() {
        let input = EXAMPLES[0].input;
        assert_eq!(solve(input, 1), "3");
        assert_eq!(solve(input, 2), "6");
    }

    #[test]
    fn test_newline_separated_input() {
        assert_eq!(solve("L68\r\nL30\r\nR48\r\nL5\r\nR60\r\nL55\r\nL1\r\nL99\r\nR14\r\nL82\r\n", 1), "3");
    }

    #[test]
    fn test_full_turns_from_zero() {
        // 50 -> 0 (one hit), then two full turns left from 0
        assert_eq!(solve("L50 L200", 2), "3");
        assert_eq!(solve("L50 L200", 1), "2");
        assert_eq!(solve("R0", 2), "0");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(<Solver as AocParser>::parse("L10 X5"), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(<Solver as AocParser>::parse("R-5"), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(<Solver as AocParser>::parse("L"), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(solve("", 1), "0");
        assert_eq!(solve("\n", 2), "0");
    }

    proptest! {
        #[test]
        fn prop_matches_click_simulation(rotations in prop::collection::vec(-350i64..350, 0..40)) {
            let input = rotations
                .iter()
                .map(|r| if *r < 0 { format!("L{}", -r) } else { format!("R{}", r) })
                .collect::<Vec<_>>()
                .join(" ");
            let (at_rest, clicks) = click_by_click(&rotations);
            prop_assert_eq!(solve(&input, 1), at_rest.to_string());
            prop_assert_eq!(solve(&input, 2), clicks.to_string());
        }
    }
}
