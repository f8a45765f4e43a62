use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

use crate::utils::grid::Grid;

/// Tachyon manifold: beams falling through splitters
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 7, tags = ["grid", "dp"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = ".......S.......
...............
.......^.......
...............
......^.^......
...............
.....^.^.^.....
...............
....^.^...^....
...............
...^.^...^.^...
...............
..^...^.....^..
...............
.^.^.^.^.^...^.
...............
";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "21"),
    Example::new(2, EXAMPLE_INPUT, "40"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Start,
    Splitter,
}

#[derive(Debug)]
pub struct SharedData {
    grid: Grid<Cell>,
    start: (usize, usize),
    common_result: Option<CommonResult>,
}

#[derive(Debug)]
pub struct CommonResult {
    splits: u64,
    timelines: u128,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse(input, |b| match b {
            b'.' | b'|' => Some(Cell::Empty),
            b'S' => Some(Cell::Start),
            b'^' => Some(Cell::Splitter),
            _ => None,
        })?;

        let mut starts = grid
            .positions()
            .filter(|&(r, c)| grid.get(r, c) == Some(&Cell::Start));
        let start = starts
            .next()
            .ok_or_else(|| ParseError::MissingData("no 'S' in the manifold".to_string()))?;
        if starts.next().is_some() {
            return Err(ParseError::InvalidFormat("more than one 'S' in the manifold".to_string()));
        }

        Ok(SharedData {
            grid,
            start,
            common_result: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(solve_once_for_both(shared).splits.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(solve_once_for_both(shared).timelines.to_string())
    }
}

/// Sweeps the manifold row by row, tracking how many timelines carry a
/// beam in each column. Beams split off past the edges are lost.
fn solve_once_for_both(shared: &mut SharedData) -> &CommonResult {
    shared.common_result.get_or_insert_with(|| {
        let grid = &shared.grid;
        let (start_row, start_col) = shared.start;

        let mut beams = vec![0u128; grid.width()];
        beams[start_col] = 1;
        let mut splits = 0u64;

        for row in start_row + 1..grid.height() {
            let cells = grid.row(row);
            let mut next = vec![0u128; grid.width()];
            for (col, &count) in beams.iter().enumerate().filter(|(_, n)| **n > 0) {
                if cells[col] == Cell::Splitter {
                    splits += 1;
                    if let Some(left) = col.checked_sub(1) {
                        next[left] += count;
                    }
                    if let Some(right) = next.get_mut(col + 1) {
                        *right += count;
                    }
                } else {
                    next[col] += count;
                }
            }
            beams = next;
        }

        let timelines: u128 = beams.iter().sum();
        debug!(splits, %timelines, "beams reached the bottom");
        CommonResult { splits, timelines }
    })
}
