//! Advent of Code Solver Library
//!
//! A type-safe framework for solving Advent of Code puzzles. Each puzzle is a
//! solver with its own input parser and one or more parts; solvers carry the
//! sample inputs from the puzzle text so their answers can be checked before
//! the real input is solved.
//!
//! # Quick Example
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, Example, ParseError, PartSolver, SolveError,
//!     SolverRegistryBuilder, register_solver};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2, examples = EXAMPLES)]
//! pub struct Day1;
//!
//! const EXAMPLES: &[Example] = &[Example::new(1, "1\n2\n3", "6")];
//!
//! impl AocParser for Day1 {
//!     type SharedData<'a> = Vec<i32>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input.lines()
//!             .map(|line| line.parse().map_err(|_|
//!                 ParseError::InvalidFormat("Expected integer".to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Day1 {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i32>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Day1 {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().product::<i32>().to_string())
//!     }
//! }
//!
//! let mut builder = SolverRegistryBuilder::new();
//! register_solver!(builder, Day1, 2025, 1);
//! let registry = builder.build();
//!
//! assert_eq!(registry.check_examples(2025, 1, 1).unwrap(), 1);
//! let mut solver = registry.create_solver(2025, 1, "1\n2\n3").unwrap();
//! assert_eq!(solver.solve(2).unwrap().answer, "6");
//! ```
//!
//! # Key Concepts
//!
//! - [`AocParser`] turns raw input into `SharedData`, which every part of the
//!   puzzle can read and use to cache intermediate work.
//! - [`PartSolver<N>`] answers part `N`; [`Solver`] dispatches a runtime part
//!   number to those impls and lists the bundled [`Example`]s.
//! - [`DynSolver`] is the object-safe view the registry hands out.
//! - [`SolverPlugin`]s are collected with `inventory`, usually through
//!   `#[derive(AutoRegisterSolver)]`.

mod error;
mod example;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use example::Example;
pub use instance::{DynSolver, SolveResult, SolverInstance, Timing};
pub use registry::{
    FactoryInfo, RegisterableSolver, SolverFactory, SolverFactoryStorage, SolverPlugin,
    SolverRegistry, SolverRegistryBuilder,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Re-export inventory for use by the derive macro
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
