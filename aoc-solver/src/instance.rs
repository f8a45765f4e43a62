//! Parsed solver instances and their type-erased interface

use crate::error::{ParseError, SolveError, SolverError};
use crate::example::Example;
use crate::solver::{Solver, SolverExt};
use chrono::{DateTime, TimeDelta, Utc};

/// Wall-clock span of one parse or solve step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Timing {
    /// Run `f` and record how long it took
    pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Timing) {
        let start = Utc::now();
        let value = f();
        let end = Utc::now();
        (value, Timing { start, end })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Answer for one part plus the time spent producing it
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub part: u8,
    pub answer: String,
    pub timing: Timing,
}

impl SolveResult {
    pub fn duration(&self) -> TimeDelta {
        self.timing.duration()
    }
}

/// Parsed input for one year/day, ready to answer any of its parts.
///
/// Parts share `S::SharedData`, so a part may reuse work a previous part
/// cached there.
pub struct SolverInstance<'a, S: Solver> {
    year: u16,
    day: u8,
    shared: S::SharedData<'a>,
    parse_timing: Timing,
}

impl<'a, S: Solver> SolverInstance<'a, S> {
    /// Parse `input`, recording parse timing
    pub fn new(year: u16, day: u8, input: &'a str) -> Result<Self, ParseError> {
        let (shared, parse_timing) = Timing::measure(|| S::parse(input));
        Ok(Self {
            year,
            day,
            shared: shared?,
            parse_timing,
        })
    }
}

/// Type-erased interface the registry hands out for any solver type.
///
/// ```no_run
/// use aoc_solver::DynSolver;
///
/// fn run(mut solver: Box<dyn DynSolver>) -> Result<(), Box<dyn std::error::Error>> {
///     for part in 1..=solver.parts() {
///         let result = solver.solve(part)?;
///         println!("Part {}: {} ({:?})", part, result.answer, result.duration());
///     }
///     println!("Parse took {:?}", solver.parse_timing().duration());
///     Ok(())
/// }
/// ```
pub trait DynSolver {
    /// Solve one part; parts outside `1..=parts()` yield `PartOutOfRange`
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError>;

    fn parse_timing(&self) -> Timing;

    /// Forward `parameter` to the solver's `AocParser::configure`
    fn configure(&mut self, parameter: u64) -> Result<(), ParseError>;

    fn year(&self) -> u16;

    fn day(&self) -> u8;

    fn parts(&self) -> u8;

    fn parse_duration(&self) -> TimeDelta {
        self.parse_timing().duration()
    }

    /// Solve `example.part` and compare against the expected answer.
    ///
    /// The instance must have been created from `example.input`.
    fn verify(&mut self, example: &Example) -> Result<SolveResult, SolverError> {
        let result = self.solve(example.part)?;
        if result.answer != example.expected {
            return Err(SolverError::ExampleMismatch {
                year: self.year(),
                day: self.day(),
                part: example.part,
                expected: example.expected.to_string(),
                actual: result.answer,
            });
        }
        Ok(result)
    }
}

impl<'a, S: SolverExt> DynSolver for SolverInstance<'a, S> {
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError> {
        let (answer, timing) =
            Timing::measure(|| S::solve_part_checked_range(&mut self.shared, part));
        Ok(SolveResult {
            part,
            answer: answer?,
            timing,
        })
    }

    fn parse_timing(&self) -> Timing {
        self.parse_timing
    }

    fn configure(&mut self, parameter: u64) -> Result<(), ParseError> {
        S::configure(&mut self.shared, parameter)
    }

    fn year(&self) -> u16 {
        self.year
    }

    fn day(&self) -> u8 {
        self.day
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }
}
