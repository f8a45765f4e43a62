//! Error types for the CLI

use std::path::PathBuf;

use thiserror::Error;
use thiserror_ext::Arc as ArcDerive;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] aoc_solver::RegistrationError),

    /// Executor error (wraps Arc for cheap cloning)
    #[error("{0}")]
    Executor(#[from] ArcExecutorError),

    /// Some parts produced no answer
    #[error("{failed} of {total} part(s) failed")]
    PartsFailed { failed: usize, total: usize },
}

/// Reading a puzzle input failed
#[derive(Error, Debug)]
pub enum InputError {
    #[error("input file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Executor-specific errors
#[derive(Error, Debug, ArcDerive)]
#[thiserror_ext(newtype(name = ArcExecutorError))]
pub enum ExecutorError {
    /// Input could not be read
    #[error("Input unavailable for {year}/{day:02}: {source}")]
    Input {
        year: u16,
        day: u8,
        #[source]
        source: InputError,
    },

    /// Solver execution failed
    #[error("{0}")]
    Solver(#[from] aoc_solver::SolverError),

    /// Channel send error
    #[error("Channel send error")]
    ChannelSend,

    /// Thread pool creation failed
    #[error("Thread pool creation failed: {0}")]
    ThreadPool(String),

    /// Multiple errors collected during parallel execution
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<ArcExecutorError>),
}

impl ArcExecutorError {
    /// Combine two Arc-wrapped errors into one flat `Multiple`, keeping order
    pub fn combine(first: ArcExecutorError, second: ArcExecutorError) -> ArcExecutorError {
        let errors = match (first.inner(), second.inner()) {
            (ExecutorError::Multiple(v1), ExecutorError::Multiple(v2)) => {
                let mut combined = v1.clone();
                combined.extend(v2.iter().cloned());
                combined
            }
            (_, ExecutorError::Multiple(v)) => {
                let mut combined = vec![first];
                combined.extend(v.iter().cloned());
                combined
            }
            (ExecutorError::Multiple(v), _) => {
                let mut combined = v.clone();
                combined.push(second);
                combined
            }
            _ => vec![first, second],
        };
        ExecutorError::Multiple(errors).into()
    }

    /// Combine an optional error with a new error
    pub fn combine_opt(
        existing: Option<ArcExecutorError>,
        new: ArcExecutorError,
    ) -> ArcExecutorError {
        match existing {
            Some(e) => Self::combine(e, new),
            None => new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leaf(n: usize) -> ArcExecutorError {
        ExecutorError::ThreadPool(n.to_string()).into()
    }

    fn leaves(err: &ArcExecutorError) -> Vec<String> {
        match err.inner() {
            ExecutorError::Multiple(v) => v.iter().flat_map(leaves).collect(),
            ExecutorError::ThreadPool(s) => vec![s.clone()],
            other => vec![other.to_string()],
        }
    }

    #[test]
    fn test_combine_two_singles() {
        let combined = ArcExecutorError::combine(leaf(1), leaf(2));
        assert_eq!(combined.to_string(), "Multiple errors occurred (2 total)");
    }

    proptest! {
        #[test]
        fn prop_combine_flattens_in_order(n in 1usize..12) {
            let combined = (0..n)
                .map(leaf)
                .fold(None, |acc, e| Some(ArcExecutorError::combine_opt(acc, e)))
                .unwrap();
            let expected: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            prop_assert_eq!(leaves(&combined), expected);
            if let ExecutorError::Multiple(v) = combined.inner() {
                prop_assert!(v.iter().all(|e| !matches!(e.inner(), ExecutorError::Multiple(_))));
            }
        }
    }
}
