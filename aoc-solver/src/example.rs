//! Bundled puzzle examples and their expected answers

/// A sample input together with the answer one part must produce for it.
///
/// Solvers list these through `Solver::EXAMPLES`; the registry runs them
/// before the real input so a regression fails fast on known data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    /// Part the expected answer belongs to
    pub part: u8,
    /// Raw sample input, exactly as it would appear in an input file
    pub input: &'static str,
    /// Expected answer, formatted like `PartSolver::solve` formats it
    pub expected: &'static str,
    /// Setting passed to `AocParser::configure` before solving, for samples
    /// the puzzle runs with different constants than the real input
    pub parameter: Option<u64>,
}

impl Example {
    pub const fn new(part: u8, input: &'static str, expected: &'static str) -> Self {
        Self {
            part,
            input,
            expected,
            parameter: None,
        }
    }

    /// Same example, solved after `configure(parameter)`
    pub const fn with_parameter(self, parameter: u64) -> Self {
        Self {
            parameter: Some(parameter),
            ..self
        }
    }
}

/// Examples that apply to one part
pub fn for_part(examples: &'static [Example], part: u8) -> impl Iterator<Item = &'static Example> {
    examples.iter().filter(move |e| e.part == part)
}
