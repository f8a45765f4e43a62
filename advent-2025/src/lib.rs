//! Advent of Code 2025 puzzle solutions with automatic registration
//!
//! Each solution derives `AocSolver` and `AutoRegisterSolver`, so linking
//! this crate is enough to make every day available through
//! `SolverRegistryBuilder::register_all_plugins`.

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
