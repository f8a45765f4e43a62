//! Solver registry for managing and creating solver instances

use crate::error::{ParseError, RegistrationError, SolverError};
use crate::example::{self, Example};
use crate::instance::{DynSolver, SolverInstance};
use crate::solver::Solver;

// ============================================================================
// Storage Constants and Index Calculation
// ============================================================================

/// Base year for AoC (first year of Advent of Code)
pub const BASE_YEAR: u16 = 2015;
/// Maximum number of years supported (2015-2034)
pub const MAX_YEARS: usize = 20;
/// Days per year in AoC (1-25)
pub const DAYS_PER_YEAR: usize = 25;
/// Total capacity of the flat storage
pub const CAPACITY: usize = MAX_YEARS * DAYS_PER_YEAR;

/// Calculate flat index from year/day, returning None if out of bounds
#[inline]
fn calc_index(year: u16, day: u8) -> Option<usize> {
    if year < BASE_YEAR || year >= BASE_YEAR + MAX_YEARS as u16 {
        return None;
    }
    if day == 0 || day > DAYS_PER_YEAR as u8 {
        return None;
    }
    let y = (year - BASE_YEAR) as usize;
    let d = (day - 1) as usize;
    Some(y * DAYS_PER_YEAR + d)
}

/// Reconstruct year/day from flat index
#[inline]
fn from_index(index: usize) -> (u16, u8) {
    let year = BASE_YEAR + (index / DAYS_PER_YEAR) as u16;
    let day = (index % DAYS_PER_YEAR) as u8 + 1;
    (year, day)
}

// ============================================================================
// Factory Types
// ============================================================================

/// Thread-safe factory that parses input into a ready-to-solve instance
pub type SolverFactory =
    Box<dyn for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync>;

/// Metadata about a registered solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryInfo {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// Number of parts this solver supports
    pub parts: u8,
    /// Bundled examples with known answers
    pub examples: &'static [Example],
}

struct SolverFactoryEntry {
    factory: SolverFactory,
    parts: u8,
    examples: &'static [Example],
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for constructing a [`SolverRegistry`]
///
/// The registry is immutable once built; the builder rejects duplicates and
/// out-of-range year/day pairs at registration time.
///
/// ```
/// use aoc_solver::{AocParser, ParseError, SolveError, Solver, SolverRegistryBuilder, register_solver};
///
/// struct Sum;
///
/// impl AocParser for Sum {
///     type SharedData<'a> = Vec<u32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input.split_whitespace()
///             .map(|t| t.parse().map_err(|_| ParseError::InvalidFormat(t.to_string())))
///             .collect()
///     }
/// }
///
/// impl Solver for Sum {
///     const PARTS: u8 = 1;
///
///     fn solve_part(shared: &mut Self::SharedData<'_>, _part: u8) -> Result<String, SolveError> {
///         Ok(shared.iter().sum::<u32>().to_string())
///     }
/// }
///
/// let mut builder = SolverRegistryBuilder::new();
/// register_solver!(builder, Sum, 2025, 1);
/// let registry = builder.build();
///
/// let mut solver = registry.create_solver(2025, 1, "1 2 3").unwrap();
/// assert_eq!(solver.solve(1).unwrap().answer, "6");
/// ```
pub struct SolverRegistryBuilder {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl SolverRegistryBuilder {
    /// Create a new empty registry builder with pre-allocated storage
    pub fn new() -> Self {
        Self {
            entries: (0..CAPACITY).map(|_| None).collect(),
        }
    }

    /// Register a solver factory for a specific year and day
    ///
    /// # Returns
    /// * `Ok(Self)` - Builder with the solver registered, ready for chaining
    /// * `Err(RegistrationError)` - Duplicate or out-of-range year/day
    pub fn register<F>(
        mut self,
        year: u16,
        day: u8,
        parts: u8,
        examples: &'static [Example],
        factory: F,
    ) -> Result<Self, RegistrationError>
    where
        F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        let index = calc_index(year, day).ok_or(RegistrationError::InvalidYearDay(year, day))?;

        if self.entries[index].is_some() {
            return Err(RegistrationError::DuplicateSolver(year, day));
        }

        self.entries[index] = Some(SolverFactoryEntry {
            factory: Box::new(factory),
            parts,
            examples,
        });
        Ok(self)
    }

    /// Register all collected solver plugins
    ///
    /// Iterates through all plugins submitted via `inventory::submit!`.
    ///
    /// ```no_run
    /// # use aoc_solver::SolverRegistryBuilder;
    /// let registry = SolverRegistryBuilder::new()
    ///     .register_all_plugins()
    ///     .unwrap()
    ///     .build();
    /// ```
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_solver_plugins(|_| true)
    }

    /// Register solver plugins that match the given filter predicate
    ///
    /// ```no_run
    /// # use aoc_solver::SolverRegistryBuilder;
    /// // Only solvers tagged "grid"
    /// let registry = SolverRegistryBuilder::new()
    ///     .register_solver_plugins(|plugin| plugin.tags.contains(&"grid"))
    ///     .unwrap()
    ///     .build();
    /// ```
    pub fn register_solver_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolverPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolverPlugin>() {
            if filter(plugin) {
                tracing::trace!(year = plugin.year, day = plugin.day, "registering plugin");
                self = plugin.solver.register_with(self, plugin.year, plugin.day)?;
            }
        }
        Ok(self)
    }

    /// Finalize the builder and create an immutable registry
    pub fn build(self) -> SolverRegistry {
        SolverRegistry {
            storage: SolverFactoryStorage {
                entries: self.entries,
            },
        }
    }
}

impl Default for SolverRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Storage and Registry
// ============================================================================

/// Immutable storage for solver factories with O(1) access
///
/// Uses a flat Vec with index math. Supports years 2015-2034 and days 1-25.
pub struct SolverFactoryStorage {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl SolverFactoryStorage {
    /// Iterate over metadata for all registered factories, ordered by year then day
    pub fn iter_info(&self) -> impl Iterator<Item = FactoryInfo> + '_ {
        self.entries.iter().enumerate().filter_map(|(i, entry)| {
            entry.as_ref().map(|e| {
                let (year, day) = from_index(i);
                FactoryInfo {
                    year,
                    day,
                    parts: e.parts,
                    examples: e.examples,
                }
            })
        })
    }

    /// Get metadata for a specific factory
    pub fn get_info(&self, year: u16, day: u8) -> Option<FactoryInfo> {
        self.entry(year, day).map(|e| FactoryInfo {
            year,
            day,
            parts: e.parts,
            examples: e.examples,
        })
    }

    /// Check if a factory exists for year/day
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.entry(year, day).is_some()
    }

    /// Get the number of registered factories
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.is_none())
    }

    fn entry(&self, year: u16, day: u8) -> Option<&SolverFactoryEntry> {
        calc_index(year, day).and_then(|i| self.entries.get(i)?.as_ref())
    }
}

/// Immutable registry for looking up and creating solvers
pub struct SolverRegistry {
    storage: SolverFactoryStorage,
}

impl SolverRegistry {
    /// Get readonly access to the factory storage for iteration/lookup
    pub fn storage(&self) -> &SolverFactoryStorage {
        &self.storage
    }

    /// Parse `input` with the solver registered for year/day
    ///
    /// # Returns
    /// * `Ok(Box<dyn DynSolver>)` - Successfully created solver
    /// * `Err(SolverError)` - Unsupported year/day, solver not found, or parsing failed
    pub fn create_solver<'a>(
        &self,
        year: u16,
        day: u8,
        input: &'a str,
    ) -> Result<Box<dyn DynSolver + 'a>, SolverError> {
        calc_index(year, day).ok_or(SolverError::InvalidYearDay(year, day))?;
        let entry = self
            .storage
            .entry(year, day)
            .ok_or(SolverError::NotFound(year, day))?;

        (entry.factory)(input).map_err(SolverError::ParseError)
    }

    /// Run every bundled example for one part and compare the answers
    ///
    /// Each example is parsed into its own instance, configured with the
    /// example's parameter if it has one. Returns how many examples
    /// were checked; a solver without examples for `part` checks zero.
    ///
    /// # Returns
    /// * `Ok(usize)` - All examples for the part produced their expected answer
    /// * `Err(SolverError::ExampleMismatch)` - An example produced a different answer
    /// * `Err(SolverError)` - Lookup, parse or solve failure on example input
    pub fn check_examples(&self, year: u16, day: u8, part: u8) -> Result<usize, SolverError> {
        let info = self
            .storage
            .get_info(year, day)
            .ok_or(SolverError::NotFound(year, day))?;

        let mut checked = 0;
        for example in example::for_part(info.examples, part) {
            let mut solver = self.create_solver(year, day, example.input)?;
            if let Some(parameter) = example.parameter {
                solver.configure(parameter)?;
            }
            let result = solver.verify(example)?;
            tracing::debug!(
                year,
                day,
                part,
                answer = %result.answer,
                "example answer matches"
            );
            checked += 1;
        }
        Ok(checked)
    }
}

// ============================================================================
// Plugins
// ============================================================================

/// Type-erased hook that lets a solver type register itself
///
/// `Solver` has associated types, so plugins hold `&dyn RegisterableSolver`
/// instead. Every `Solver + Sync + 'static` gets this through a blanket impl.
pub trait RegisterableSolver: Sync {
    /// Register this solver type with the builder for a specific year and day
    fn register_with(
        &self,
        builder: SolverRegistryBuilder,
        year: u16,
        day: u8,
    ) -> Result<SolverRegistryBuilder, RegistrationError>;

    /// Number of parts this solver supports
    fn parts(&self) -> u8;

    /// Bundled examples with known answers
    fn examples(&self) -> &'static [Example];
}

impl<S> RegisterableSolver for S
where
    S: Solver + Sync + 'static,
{
    fn register_with(
        &self,
        builder: SolverRegistryBuilder,
        year: u16,
        day: u8,
    ) -> Result<SolverRegistryBuilder, RegistrationError> {
        builder.register(year, day, S::PARTS, S::EXAMPLES, move |input: &str| {
            Ok(Box::new(SolverInstance::<S>::new(year, day, input)?))
        })
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }

    fn examples(&self) -> &'static [Example] {
        S::EXAMPLES
    }
}

/// Plugin information for automatic solver registration
///
/// Usually submitted by `#[derive(AutoRegisterSolver)]`, but can be written by hand:
///
/// ```no_run
/// use aoc_solver::{AocParser, ParseError, SolveError, Solver, SolverPlugin};
///
/// struct Day1Solver;
///
/// impl AocParser for Day1Solver {
///     type SharedData<'a> = ();
///
///     fn parse(_: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(())
///     }
/// }
///
/// impl Solver for Day1Solver {
///     const PARTS: u8 = 1;
///
///     fn solve_part(_: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
///         Err(SolveError::PartNotImplemented(part))
///     }
/// }
///
/// aoc_solver::inventory::submit! {
///     SolverPlugin {
///         year: 2025,
///         day: 1,
///         solver: &Day1Solver,
///         tags: &["easy"],
///     }
/// }
/// ```
pub struct SolverPlugin {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// The solver instance (type-erased)
    pub solver: &'static dyn RegisterableSolver,
    /// Optional tags for filtering (e.g., "grid", "graph", "parsing")
    pub tags: &'static [&'static str],
}

inventory::collect!(SolverPlugin);

/// Register a solver type with a builder variable, panicking on duplicates
///
/// Convenient in tests and examples where registration cannot fail.
#[macro_export]
macro_rules! register_solver {
    ($builder:expr, $solver:ty, $year:expr, $day:expr) => {
        $builder = $builder
            .register(
                $year,
                $day,
                <$solver as $crate::Solver>::PARTS,
                <$solver as $crate::Solver>::EXAMPLES,
                |input: &str| {
                    Ok(Box::new($crate::SolverInstance::<$solver>::new(
                        $year, $day, input,
                    )?))
                },
            )
            .expect("Failed to register solver");
    };
}
