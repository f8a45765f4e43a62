use std::collections::HashSet;
use std::ops::RangeInclusive;

use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

/// Gift shop product ids made of a repeated digit block
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 2, tags = ["math", "ranges"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "11-22,95-115,998-1012,1188511880-1188511890,222220-222224,\
1698522-1698528,446443-446449,38593856-38593862,565653-565659,\
824824821-824824827,2121212118-2121212124";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "1227775554"),
    Example::new(2, EXAMPLE_INPUT, "4174379265"),
];

const MAX_DIGITS: u32 = 20;

impl AocParser for Solver {
    type SharedData<'a> = Vec<RangeInclusive<u64>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|range| {
                let invalid = |reason: &str| {
                    ParseError::InvalidFormat(format!("range {:?}: {}", range, reason))
                };
                let (start, end) = range
                    .split_once('-')
                    .ok_or_else(|| invalid("expected 'start-end'"))?;
                let start: u64 = start.parse().map_err(|_| invalid("bad start"))?;
                let end: u64 = end.parse().map_err(|_| invalid("bad end"))?;
                if start > end {
                    return Err(invalid("start exceeds end"));
                }
                Ok(start..=end)
            })
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(sum_repeated_ids(shared, Repeats::Exactly(2)).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(sum_repeated_ids(shared, Repeats::AtLeast(2)).to_string())
    }
}

#[derive(Debug, Clone, Copy)]
enum Repeats {
    Exactly(u32),
    AtLeast(u32),
}

impl Repeats {
    fn accepts(self, count: u32) -> bool {
        match self {
            Repeats::Exactly(n) => count == n,
            Repeats::AtLeast(n) => count >= n,
        }
    }
}

fn digit_count(n: u64) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}

/// Sum of distinct ids in any range whose digits are one block repeated
/// an accepted number of times.
fn sum_repeated_ids(ranges: &[RangeInclusive<u64>], repeats: Repeats) -> u128 {
    let mut ids: HashSet<u128> = HashSet::new();

    for range in ranges {
        let (start, end) = (u128::from(*range.start()), u128::from(*range.end()));
        for digits in digit_count(*range.start())..=digit_count(*range.end()).min(MAX_DIGITS) {
            let lo = start.max(10u128.pow(digits - 1));
            let hi = end.min(10u128.pow(digits) - 1);
            if lo > hi {
                continue;
            }

            let blocks = (1..digits).filter(|&b| digits.is_multiple_of(b) && repeats.accepts(digits / b));
            for block in blocks {
                // block * multiplier spells the block `digits / block` times
                let multiplier = (10u128.pow(digits) - 1) / (10u128.pow(block) - 1);
                let first = lo.div_ceil(multiplier).max(10u128.pow(block - 1));
                let last = (hi / multiplier).min(10u128.pow(block) - 1);
                ids.extend((first..=last).map(|b| b * multiplier));
            }
        }
    }

    debug!(count = ids.len(), ?repeats, "generated repeated ids");
    ids.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_repeated(id: u64, repeats: Repeats) -> bool {
        let s = id.to_string();
        let len = s.len() as u32;
        (1..len).any(|block| {
            len.is_multiple_of(block)
                && repeats.accepts(len / block)
                && s.as_bytes()
                    .chunks(block as usize)
                    .all(|chunk| chunk == &s.as_bytes()[..block as usize])
        })
    }

    #[test]
    fn test_single_ranges() {
        let ranges = <Solver as AocParser>::parse("11-22").unwrap();
        assert_eq!(sum_repeated_ids(&ranges, Repeats::Exactly(2)), 33);

        let ranges = <Solver as AocParser>::parse("95-115").unwrap();
        assert_eq!(sum_repeated_ids(&ranges, Repeats::Exactly(2)), 99);
        assert_eq!(sum_repeated_ids(&ranges, Repeats::AtLeast(2)), 99 + 111);
    }

    #[test]
    fn test_overlapping_ranges_count_once() {
        let ranges = <Solver as AocParser>::parse("10-30,20-25").unwrap();
        assert_eq!(sum_repeated_ids(&ranges, Repeats::Exactly(2)), 11 + 22);
    }

    #[test]
    fn test_parse_errors() {
        assert!(<Solver as AocParser>::parse("5-1").is_err());
        assert!(<Solver as AocParser>::parse("12").is_err());
        assert!(<Solver as AocParser>::parse("a-b").is_err());
        assert_eq!(<Solver as AocParser>::parse("1-2,\n").unwrap(), vec![1..=2]);
    }

    #[test]
    fn test_largest_u64_digits() {
        let ranges = vec![u64::MAX - 10..=u64::MAX];
        assert_eq!(sum_repeated_ids(&ranges, Repeats::AtLeast(2)), 0);
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(bounds in prop::collection::vec((0u64..20_000, 0u64..3_000), 1..5)) {
            let ranges: Vec<_> = bounds.iter().map(|&(s, len)| s..=s + len).collect();
            for repeats in [Repeats::Exactly(2), Repeats::AtLeast(2)] {
                let expected: u128 = ranges
                    .iter()
                    .flat_map(|r| r.clone())
                    .filter(|&id| is_repeated(id, repeats))
                    .collect::<HashSet<_>>()
                    .into_iter()
                    .map(u128::from)
                    .sum();
                prop_assert_eq!(sum_repeated_ids(&ranges, repeats), expected);
            }
        }
    }
}
