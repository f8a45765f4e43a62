use anyhow::anyhow;
use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

/// Cephalopod math worksheet
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 6, tags = ["parsing", "columns"])]
pub struct Solver;

// Trailing spaces are significant
const EXAMPLE_INPUT: &str = "123 328  51 64 \n 45 64  387 23 \n  6 98  215 314\n*   +   *   +  \n";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "4277556"),
    Example::new(2, EXAMPLE_INPUT, "3263827"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Multiply,
}

/// One problem: the slice of every number row under its operator.
///
/// Slices may be shorter than `width` when an input line ends early; the
/// missing cells are blank.
#[derive(Debug)]
pub struct Problem<'a> {
    op: Operation,
    width: usize,
    rows: Vec<&'a str>,
}

impl Problem<'_> {
    /// Numbers read left to right, one per row
    fn row_numbers(&self) -> impl Iterator<Item = Result<u128, anyhow::Error>> + '_ {
        self.rows
            .iter()
            .map(|row| row.trim())
            .filter(|row| !row.is_empty())
            .map(|row| {
                row.parse::<u128>()
                    .map_err(|_| anyhow!("{:?} is not a single number", row))
            })
    }

    /// Numbers read top to bottom, one per column
    fn column_numbers(&self) -> impl Iterator<Item = Result<u128, anyhow::Error>> + '_ {
        (0..self.width).filter_map(|col| {
            let digits: String = self
                .rows
                .iter()
                .filter_map(|row| row.as_bytes().get(col))
                .filter(|b| b.is_ascii_digit())
                .map(|&b| b as char)
                .collect();
            (!digits.is_empty()).then(|| digits.parse::<u128>().map_err(anyhow::Error::from))
        })
    }
}

fn evaluate(
    op: Operation,
    numbers: impl Iterator<Item = Result<u128, anyhow::Error>>,
) -> Result<u128, anyhow::Error> {
    let mut numbers = numbers.peekable();
    if numbers.peek().is_none() {
        return Err(anyhow!("problem has no numbers"));
    }
    numbers.try_fold(
        match op {
            Operation::Add => 0u128,
            Operation::Multiply => 1u128,
        },
        |acc, n| {
            let n = n?;
            match op {
                Operation::Add => acc.checked_add(n),
                Operation::Multiply => acc.checked_mul(n),
            }
            .ok_or_else(|| anyhow!("result overflows"))
        },
    )
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Problem<'a>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let lines: Vec<&str> = input
            .lines()
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .filter(|l| !l.trim().is_empty())
            .collect();
        let (op_line, number_lines) = lines
            .split_last()
            .ok_or_else(|| ParseError::MissingData("worksheet is empty".to_string()))?;

        for (idx, line) in lines.iter().enumerate() {
            let is_op_line = idx + 1 == lines.len();
            let allowed = |b: u8| match b {
                b' ' => true,
                b'+' | b'*' => is_op_line,
                _ => !is_op_line && b.is_ascii_digit(),
            };
            if let Some(bad) = line.bytes().find(|&b| !allowed(b)) {
                return Err(ParseError::InvalidFormat(format!(
                    "(line {}) unexpected character {:?}",
                    idx + 1,
                    bad as char
                )));
            }
        }

        let width = lines.iter().map(|l| l.len()).max().unwrap_or(0);
        let is_blank_column =
            |col: usize| lines.iter().all(|l| l.as_bytes().get(col).is_none_or(|&b| b == b' '));

        let mut problems = Vec::new();
        let mut col = 0;
        while col < width {
            if is_blank_column(col) {
                col += 1;
                continue;
            }
            let start = col;
            while col < width && !is_blank_column(col) {
                col += 1;
            }

            let slice = |line: &'a str| line.get(start.min(line.len())..col.min(line.len())).unwrap_or("");
            let ops: Vec<u8> = slice(op_line).bytes().filter(|&b| b != b' ').collect();
            let op = match ops.as_slice() {
                [b'+'] => Operation::Add,
                [b'*'] => Operation::Multiply,
                _ => {
                    return Err(ParseError::InvalidFormat(format!(
                        "problem at columns {}..{} needs exactly one operator",
                        start + 1,
                        col
                    )));
                }
            };
            problems.push(Problem {
                op,
                width: col - start,
                rows: number_lines.iter().map(|&l| slice(l)).collect(),
            });
        }

        debug!(problems = problems.len(), "parsed worksheet");
        Ok(problems)
    }
}

fn grand_total<'p, 'a, F, I>(problems: &'p [Problem<'a>], numbers: F) -> Result<String, SolveError>
where
    F: Fn(&'p Problem<'a>) -> I,
    I: Iterator<Item = Result<u128, anyhow::Error>>,
{
    problems
        .iter()
        .enumerate()
        .map(|(idx, problem)| {
            evaluate(problem.op, numbers(problem))
                .map_err(|e| SolveError::failed(e.context(format!("problem {}", idx + 1))))
        })
        .sum::<Result<u128, _>>()
        .map(|total| total.to_string())
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        grand_total(shared, Problem::row_numbers)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        grand_total(shared, Problem::column_numbers)
    }
}
