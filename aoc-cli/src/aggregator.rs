//! Result aggregator for ordering parallel solver results
//!
//! Workers finish in any order; output is streamed in (year, day, part)
//! order by parking each result until every smaller expected key has been
//! emitted.

use crate::executor::{SolverResult, WorkItem};
use std::collections::{BTreeMap, BTreeSet};

/// Key for ordering results (year, day, part) - ordered ascending
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

/// What is left once the channel closes
pub struct Leftovers {
    /// Results that arrived while an earlier key never did, in key order
    pub results: Vec<SolverResult>,
    /// Keys no worker reported
    pub missing: Vec<ResultKey>,
}

pub struct ResultAggregator {
    expected: BTreeSet<ResultKey>,
    parked: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    /// Expect one result per selected part of every work item
    pub fn for_work_items(work_items: &[WorkItem]) -> Self {
        let expected = work_items
            .iter()
            .flat_map(|w| {
                w.parts.clone().map(move |part| ResultKey {
                    year: w.year,
                    day: w.day,
                    part,
                })
            })
            .collect();
        Self {
            expected,
            parked: BTreeMap::new(),
        }
    }

    /// Results not yet emitted
    pub fn pending(&self) -> usize {
        self.expected.len()
    }

    /// Park a result and return every result now ready, in order
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.parked.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(&next) = self.expected.first() {
            let Some(result) = self.parked.remove(&next) else {
                break;
            };
            self.expected.pop_first();
            ready.push(result);
        }
        ready
    }

    /// Release parked results and report keys that never arrived
    pub fn finish(self) -> Leftovers {
        let missing = self
            .expected
            .into_iter()
            .filter(|key| !self.parked.contains_key(key))
            .collect();
        Leftovers {
            results: self.parked.into_values().collect(),
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    /// Sorted keys together with a random permutation of them
    fn keys_and_arrival_order() -> impl Strategy<Value = (Vec<(u8, u8)>, Vec<(u8, u8)>)> {
        proptest::collection::btree_set((1u8..=12, 1u8..=2), 1..20).prop_flat_map(|set| {
            let sorted: Vec<(u8, u8)> = set.into_iter().collect();
            (Just(sorted.clone()), Just(sorted).prop_shuffle())
        })
    }

    fn make_result(day: u8, part: u8) -> SolverResult {
        SolverResult {
            year: 2025,
            day,
            part,
            answer: Ok(format!("{}_{}", day, part)),
            solve_duration: TimeDelta::milliseconds(10),
            parse_duration: (part == 1).then(|| TimeDelta::milliseconds(5)),
            examples_checked: 1,
        }
    }

    fn work(day: u8, parts: std::ops::RangeInclusive<u8>) -> WorkItem {
        WorkItem {
            year: 2025,
            day,
            parts,
        }
    }

    fn keys(results: &[SolverResult]) -> Vec<(u8, u8)> {
        results.iter().map(|r| (r.day, r.part)).collect()
    }

    #[test]
    fn test_expected_keys_follow_part_ranges() {
        let agg = ResultAggregator::for_work_items(&[work(1, 1..=2), work(12, 1..=1), work(3, 2..=2)]);
        assert_eq!(agg.pending(), 4);
    }

    #[test]
    fn test_out_of_order_results() {
        let mut agg = ResultAggregator::for_work_items(&[work(1, 1..=2), work(2, 1..=1)]);

        assert!(agg.add(make_result(1, 2)).is_empty());
        assert!(agg.add(make_result(2, 1)).is_empty());

        let ready = agg.add(make_result(1, 1));
        assert_eq!(keys(&ready), vec![(1, 1), (1, 2), (2, 1)]);

        let leftovers = agg.finish();
        assert!(leftovers.results.is_empty());
        assert!(leftovers.missing.is_empty());
    }

    #[test]
    fn test_finish_with_a_gap() {
        let mut agg = ResultAggregator::for_work_items(&[work(4, 1..=2), work(5, 1..=2)]);

        assert!(agg.add(make_result(5, 2)).is_empty());
        assert!(agg.add(make_result(4, 2)).is_empty());
        assert_eq!(agg.pending(), 4);

        let leftovers = agg.finish();
        assert_eq!(keys(&leftovers.results), vec![(4, 2), (5, 2)]);
        let missing: Vec<(u8, u8)> = leftovers.missing.iter().map(|k| (k.day, k.part)).collect();
        assert_eq!(missing, vec![(4, 1), (5, 1)]);
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_emits_sorted(
            (sorted, shuffled) in keys_and_arrival_order()
        ) {
            let items: Vec<WorkItem> = sorted.iter().map(|&(day, part)| work(day, part..=part)).collect();
            let mut agg = ResultAggregator::for_work_items(&items);

            let mut emitted = Vec::new();
            for (day, part) in shuffled {
                emitted.extend(keys(&agg.add(make_result(day, part))));
            }

            let leftovers = agg.finish();
            prop_assert!(leftovers.results.is_empty());
            prop_assert!(leftovers.missing.is_empty());
            prop_assert_eq!(emitted, sorted);
        }
    }
}
