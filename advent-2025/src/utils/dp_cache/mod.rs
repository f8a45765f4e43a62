//! Memoisation for recursive problems whose sub-problems form a DAG.
//!
//! Implement [`DpProblem`] to describe the dependencies and how to combine
//! them, then ask a [`DpCache`] for values; each index is computed once.
//!
//! Backends:
//! - [`VecBackend`]: dense `usize` indices (auto-growing)
//! - [`HashMapBackend`]: any hashable index
//!
//! **The cache does not detect cycles.** A cyclic dependency graph overflows
//! the stack; validate acyclicity before building the problem.
//!
//! ```rust
//! use advent_2025::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};
//!
//! /// Lattice paths from (r, c) to (0, 0)
//! struct GridPaths;
//!
//! impl DpProblem<(usize, usize), u64> for GridPaths {
//!     fn deps(&self, &(r, c): &(usize, usize)) -> Vec<(usize, usize)> {
//!         let mut deps = Vec::new();
//!         if r > 0 { deps.push((r - 1, c)); }
//!         if c > 0 { deps.push((r, c - 1)); }
//!         deps
//!     }
//!     fn compute(&self, _pos: &(usize, usize), deps: Vec<u64>) -> u64 {
//!         if deps.is_empty() { 1 } else { deps.iter().sum() }
//!     }
//! }
//!
//! let cache = DpCache::new(HashMapBackend::new(), GridPaths);
//! assert_eq!(cache.get(&(4, 4)), 70);
//! ```

mod backend;
mod cache;
mod problem;

pub use backend::{Backend, HashMapBackend, VecBackend};
pub use cache::DpCache;
pub use problem::DpProblem;

#[cfg(test)]
mod tests;
