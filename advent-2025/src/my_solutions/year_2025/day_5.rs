use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

/// Fresh ingredient id ranges
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 5, tags = ["ranges", "intervals"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "3-5
10-14
16-20
12-18

1
5
8
11
17
32
";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "3"),
    Example::new(2, EXAMPLE_INPUT, "14"),
];

#[derive(Debug)]
pub struct SharedData {
    ranges: Vec<(u64, u64)>,
    ids: Vec<u64>,
    merged: Option<Vec<(u64, u64)>>,
}

/// Disjoint, sorted, non-adjacent union of the fresh ranges
fn merge_ranges(ranges: &[(u64, u64)]) -> Vec<(u64, u64)> {
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable();

    let mut merged: Vec<(u64, u64)> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some((_, last_end)) if start <= last_end.saturating_add(1) => {
                *last_end = (*last_end).max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    debug!(ranges = ranges.len(), merged = merged.len(), "merged fresh ranges");
    merged
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut lines = input.lines().map(str::trim).enumerate().skip_while(|(_, l)| l.is_empty());

        let mut ranges = Vec::new();
        for (idx, line) in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            let range = line
                .split_once('-')
                .and_then(|(a, b)| Some((a.parse::<u64>().ok()?, b.parse::<u64>().ok()?)))
                .filter(|(a, b)| a <= b)
                .ok_or_else(|| {
                    ParseError::InvalidFormat(format!("(line {}) expected range 'a-b', got {:?}", idx + 1, line))
                })?;
            ranges.push(range);
        }

        let ids = lines
            .filter(|(_, l)| !l.is_empty())
            .map(|(idx, line)| {
                line.parse::<u64>().map_err(|_| {
                    ParseError::InvalidFormat(format!("(line {}) expected ingredient id, got {:?}", idx + 1, line))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SharedData {
            ranges,
            ids,
            merged: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let SharedData { ranges, ids, merged } = shared;
        let merged = merged.get_or_insert_with(|| merge_ranges(ranges));
        let fresh = ids
            .iter()
            .filter(|&&id| {
                let idx = merged.partition_point(|&(start, _)| start <= id);
                idx > 0 && id <= merged[idx - 1].1
            })
            .count();
        Ok(fresh.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let covered: u128 = shared
            .merged
            .get_or_insert_with(|| merge_ranges(&shared.ranges))
            .iter()
            .map(|&(start, end)| u128::from(end - start) + 1)
            .sum();
        Ok(covered.to_string())
    }
}
