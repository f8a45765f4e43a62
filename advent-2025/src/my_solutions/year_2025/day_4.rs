use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

use crate::utils::grid::Grid;

/// Paper rolls a forklift can reach
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 4, tags = ["grid", "simulation"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "..@@.@@@@.
@@@.@.@.@@
@@@@@.@.@@
@.@@@@..@.
@@.@@@@.@@
.@@@@@@@.@
.@.@.@.@@@
@.@@@.@@@@
.@@@@@@@@.
@.@.@@@.@.
";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "13"),
    Example::new(2, EXAMPLE_INPUT, "43"),
];

/// A roll is accessible when fewer than this many rolls surround it
const CROWDED: u8 = 4;

impl AocParser for Solver {
    type SharedData<'a> = Grid<bool>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Grid::parse(input, |b| match b {
            b'@' => Some(true),
            b'.' => Some(false),
            _ => None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let counts = neighbour_counts(shared);
        let accessible = shared
            .positions()
            .filter(|&(r, c)| is_accessible(shared, &counts, r, c))
            .count();
        Ok(accessible.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(remove_all_accessible(shared).to_string())
    }
}

fn neighbour_counts(rolls: &Grid<bool>) -> Grid<u8> {
    let mut counts = rolls.map(|_| 0u8);
    for (r, c) in rolls.positions() {
        let around = rolls
            .neighbours(r, c)
            .filter(|&(nr, nc)| rolls.get(nr, nc) == Some(&true))
            .count() as u8;
        counts.set(r, c, around);
    }
    counts
}

fn is_accessible(rolls: &Grid<bool>, counts: &Grid<u8>, r: usize, c: usize) -> bool {
    rolls.get(r, c) == Some(&true) && counts.get(r, c).is_some_and(|&n| n < CROWDED)
}

/// Removes accessible rolls until none is left, returning how many went.
///
/// Neighbour counts only decrease, so a roll becomes accessible at most
/// once and the order of removal does not change the total.
fn remove_all_accessible(rolls: &Grid<bool>) -> usize {
    let mut rolls = rolls.clone();
    let mut counts = neighbour_counts(&rolls);
    let mut queued = rolls.map(|_| false);
    let mut worklist: Vec<(usize, usize)> = rolls
        .positions()
        .filter(|&(r, c)| is_accessible(&rolls, &counts, r, c))
        .collect();
    for &(r, c) in &worklist {
        queued.set(r, c, true);
    }

    let mut removed = 0;
    while let Some((r, c)) = worklist.pop() {
        rolls.set(r, c, false);
        removed += 1;

        for (nr, nc) in rolls.neighbours(r, c) {
            if rolls.get(nr, nc) != Some(&true) {
                continue;
            }
            if let Some(&n) = counts.get(nr, nc) {
                counts.set(nr, nc, n - 1);
            }
            if queued.get(nr, nc) == Some(&false) && is_accessible(&rolls, &counts, nr, nc) {
                queued.set(nr, nc, true);
                worklist.push((nr, nc));
            }
        }
    }

    debug!(removed, "no accessible rolls left");
    removed
}
