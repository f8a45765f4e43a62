use anyhow::anyhow;
use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::trace;

/// Battery banks: pick digits in order to form the largest joltage
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 3, tags = ["greedy"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "987654321111111
811111111111119
234234234234278
818181911112111
";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "357"),
    Example::new(2, EXAMPLE_INPUT, "3121910778619"),
];

impl AocParser for Solver {
    type SharedData<'a> = Vec<Vec<u8>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(idx, line)| {
                line.bytes()
                    .map(|b| match b {
                        b'0'..=b'9' => Ok(b - b'0'),
                        _ => Err(ParseError::InvalidFormat(format!(
                            "(line {}) unexpected character {:?}",
                            idx + 1,
                            b as char
                        ))),
                    })
                    .collect::<Result<Vec<u8>, _>>()
            })
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        total_joltage(shared, 2)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        total_joltage(shared, 12)
    }
}

fn total_joltage(banks: &[Vec<u8>], picks: usize) -> Result<String, SolveError> {
    banks
        .iter()
        .enumerate()
        .map(|(idx, bank)| {
            max_joltage(bank, picks).ok_or_else(|| {
                SolveError::failed(anyhow!(
                    "bank {} has {} batteries, need {}",
                    idx + 1,
                    bank.len(),
                    picks
                ))
            })
        })
        .sum::<Result<u64, _>>()
        .map(|total| total.to_string())
}

/// Largest number formed by `picks` digits of `bank` kept in order.
///
/// Each pick takes the leftmost maximum among the digits that still leave
/// enough room for the remaining picks.
fn max_joltage(bank: &[u8], picks: usize) -> Option<u64> {
    if bank.len() < picks {
        return None;
    }

    let mut start = 0;
    let mut value = 0u64;
    for remaining in (0..picks).rev() {
        let window = &bank[start..bank.len() - remaining];
        let (offset, digit) = window
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, d)| *d)?;
        value = value * 10 + u64::from(*digit);
        start += offset + 1;
    }
    trace!(value, picks, "bank joltage");
    Some(value)
}
