//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::inputs::InputStore;
use aoc_solver::{DynSolver, SolverRegistry};
use chrono::TimeDelta;
use itertools::Itertools;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;

/// Result from a single solver part
#[derive(Debug)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, ArcExecutorError>,
    pub solve_duration: TimeDelta,
    /// Set on the first part solved from each parsed instance
    pub parse_duration: Option<TimeDelta>,
    pub examples_checked: usize,
}

impl SolverResult {
    fn failed(year: u16, day: u8, part: u8, error: ArcExecutorError) -> Self {
        Self {
            year,
            day,
            part,
            answer: Err(error),
            solve_duration: TimeDelta::zero(),
            parse_duration: None,
            examples_checked: 0,
        }
    }
}

/// Work item representing a solver to execute
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    sync_executor_config: SyncExecutorConfig,
    thread_pool: rayon::ThreadPool,
}

/// Read-only state shared by every worker thread
pub struct SyncExecutorConfig {
    registry: SolverRegistry,
    inputs: InputStore,
    check_examples: bool,
    parallelize_by: ParallelizeBy,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            sync_executor_config: SyncExecutorConfig {
                registry,
                inputs: InputStore::new(config.input_dir.clone()),
                check_examples: config.check_examples,
                parallelize_by: config.parallelize_by,
                year_filter: config.year_filter,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        })
    }

    pub fn inputs(&self) -> &InputStore {
        &self.sync_executor_config.inputs
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let cfg = &self.sync_executor_config;
        cfg.registry
            .storage()
            .iter_info()
            .filter(|info| cfg.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| cfg.day_filter.is_none_or(|d| info.day == d))
            .filter_map(|info| {
                Some(WorkItem {
                    year: info.year,
                    day: info.day,
                    parts: self.filter_parts(info.parts)?,
                })
            })
            .collect()
    }

    /// Parts to run given the part filter; `None` when the solver lacks the part
    fn filter_parts(&self, max_parts: u8) -> Option<RangeInclusive<u8>> {
        match self.sync_executor_config.part_filter {
            Some(p) if (1..=max_parts).contains(&p) => Some(p..=p),
            Some(_) => None,
            None => Some(1..=max_parts),
        }
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        tracing::debug!(
            solvers = work_items.len(),
            mode = ?self.sync_executor_config.parallelize_by,
            "executing"
        );

        match self.sync_executor_config.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in work_items {
                    if let Err(e) = run_solver(&work, &tx, &self.sync_executor_config) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.execute_parallel_grouped(by_year, &tx)
            }
            // Part additionally splits each work item in run_solver
            ParallelizeBy::Day | ParallelizeBy::Part => self.execute_parallel(work_items, &tx),
        }
    }

    /// Execute work items in parallel, collecting errors
    fn execute_parallel(
        &self,
        work_items: Vec<WorkItem>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            work_items
                .into_par_iter()
                .map_with(tx.clone(), |tx, work| {
                    run_solver(&work, tx, sync_executor_config).err()
                })
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(e1), e2) => Some(ArcExecutorError::combine_opt(e2, e1)),
                    (None, e2) => e2,
                })
                .flatten()
                .map_or(Ok(()), Err)
        })
    }

    /// Execute grouped work items in parallel (for year-level parallelism)
    fn execute_parallel_grouped(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .map_with(tx.clone(), |tx, items| {
                    let mut err = None;
                    for work in items {
                        if let Err(e) = run_solver(&work, tx, sync_executor_config) {
                            err = Some(ArcExecutorError::combine_opt(err, e))
                        }
                    }
                    err
                })
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(e1), e2) => Some(ArcExecutorError::combine_opt(e2, e1)),
                    (None, e2) => e2,
                })
                .flatten()
                .map_or(Ok(()), Err)
        })
    }
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ExecutorError::ChannelSend.into())
}

/// Run one work item: check examples, read input, parse, solve
fn run_solver(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    cfg: &SyncExecutorConfig,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);

    // Parts whose examples failed are reported now and not solved
    let mut verified = Vec::new();
    for part in work.parts.clone() {
        match check_examples(cfg, year, day, part) {
            Ok(checked) => verified.push((part, checked)),
            Err(e) => send(tx, SolverResult::failed(year, day, part, e))?,
        }
    }
    if verified.is_empty() {
        return Ok(());
    }

    let input = match cfg.inputs.read(year, day) {
        Ok(input) => input,
        Err(source) => {
            let error: ArcExecutorError = ExecutorError::Input { year, day, source }.into();
            for (part, _) in verified {
                send(tx, SolverResult::failed(year, day, part, error.clone()))?;
            }
            return Ok(());
        }
    };

    if matches!(cfg.parallelize_by, ParallelizeBy::Part) && verified.len() > 1 {
        // Each part parses its own instance; collect keeps part order
        let results: Vec<Vec<SolverResult>> = verified
            .into_par_iter()
            .map(|verified_part| solve_parts(cfg, year, day, &input, &[verified_part]))
            .collect();
        results.into_iter().flatten().try_for_each(|r| send(tx, r))
    } else {
        solve_parts(cfg, year, day, &input, &verified)
            .into_iter()
            .try_for_each(|r| send(tx, r))
    }
}

fn check_examples(
    cfg: &SyncExecutorConfig,
    year: u16,
    day: u8,
    part: u8,
) -> Result<usize, ArcExecutorError> {
    if !cfg.check_examples {
        return Ok(0);
    }
    cfg.registry
        .check_examples(year, day, part)
        .inspect(|checked| tracing::debug!(year, day, part, checked, "examples passed"))
        .map_err(|e| {
            tracing::warn!(year, day, part, error = %e, "example check failed");
            ExecutorError::Solver(e).into()
        })
}

/// Parse `input` once and solve each `(part, examples_checked)` in order
fn solve_parts(
    cfg: &SyncExecutorConfig,
    year: u16,
    day: u8,
    input: &str,
    parts: &[(u8, usize)],
) -> Vec<SolverResult> {
    let mut solver = match cfg.registry.create_solver(year, day, input) {
        Ok(solver) => solver,
        Err(e) => {
            let error: ArcExecutorError = ExecutorError::Solver(e).into();
            return parts
                .iter()
                .map(|&(part, _)| SolverResult::failed(year, day, part, error.clone()))
                .collect();
        }
    };

    let mut parse_duration = Some(solver.parse_duration());
    parts
        .iter()
        .map(|&(part, examples_checked)| SolverResult {
            parse_duration: parse_duration.take(),
            examples_checked,
            ..solve_part(year, day, part, &mut *solver)
        })
        .collect()
}

fn solve_part(year: u16, day: u8, part: u8, solver: &mut dyn DynSolver) -> SolverResult {
    match solver.solve(part) {
        Ok(result) => SolverResult {
            year,
            day,
            part,
            solve_duration: result.duration(),
            answer: Ok(result.answer),
            parse_duration: None,
            examples_checked: 0,
        },
        Err(e) => SolverResult::failed(
            year,
            day,
            part,
            ExecutorError::Solver(e.into()).into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::{
        AocParser, AocSolver, Example, ParseError, PartSolver, RegisterableSolver, SolveError,
        SolverError, SolverRegistryBuilder,
    };
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(AocSolver)]
    #[aoc_solver(max_parts = 2, examples = SUM_EXAMPLES)]
    struct SumProduct;

    const SUM_EXAMPLES: &[Example] = &[
        Example::new(1, "1\n2", "3"),
        Example::new(2, "1\n2", "2"),
    ];

    fn parse_numbers(input: &str) -> Result<Vec<u64>, ParseError> {
        input
            .lines()
            .map(|line| {
                line.trim()
                    .parse()
                    .map_err(|_| ParseError::InvalidFormat(line.to_string()))
            })
            .collect()
    }

    impl AocParser for SumProduct {
        type SharedData<'a> = Vec<u64>;

        fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
            parse_numbers(input)
        }
    }

    impl PartSolver<1> for SumProduct {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().sum::<u64>().to_string())
        }
    }

    impl PartSolver<2> for SumProduct {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().product::<u64>().to_string())
        }
    }

    /// Answers correctly but carries a wrong expected answer
    #[derive(AocSolver)]
    #[aoc_solver(max_parts = 1, examples = WRONG_EXAMPLES)]
    struct WrongExample;

    const WRONG_EXAMPLES: &[Example] = &[Example::new(1, "1\n2", "4")];

    impl AocParser for WrongExample {
        type SharedData<'a> = Vec<u64>;

        fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
            parse_numbers(input)
        }
    }

    impl PartSolver<1> for WrongExample {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().sum::<u64>().to_string())
        }
    }

    fn registry() -> SolverRegistry {
        let builder = SumProduct
            .register_with(SolverRegistryBuilder::new(), 2025, 1)
            .unwrap();
        WrongExample.register_with(builder, 2025, 2).unwrap().build()
    }

    fn config(input_dir: &Path, parallelize_by: ParallelizeBy) -> Config {
        Config {
            year_filter: None,
            day_filter: None,
            part_filter: None,
            tags: Vec::new(),
            input_dir: input_dir.to_path_buf(),
            thread_count: 2,
            parallelize_by,
            check_examples: true,
            quiet: true,
            verbosity: 0,
        }
    }

    fn write_input(dir: &Path, day: u8, content: &str) {
        let year_dir = dir.join("2025");
        std::fs::create_dir_all(&year_dir).unwrap();
        std::fs::write(year_dir.join(format!("day{:02}.txt", day)), content).unwrap();
    }

    fn run(config: &Config) -> Vec<SolverResult> {
        let executor = Executor::new(registry(), config).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        executor.execute(tx).unwrap();
        let mut results: Vec<SolverResult> = rx.iter().collect();
        results.sort_by_key(|r| (r.year, r.day, r.part));
        results
    }

    fn answer(result: &SolverResult) -> Option<&str> {
        result.answer.as_deref().ok()
    }

    #[test]
    fn test_collect_work_items_with_part_filter() {
        let temp = TempDir::new().unwrap();
        let mut config = config(temp.path(), ParallelizeBy::Sequential);

        let executor = Executor::new(registry(), &config).unwrap();
        let items = executor.collect_work_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].parts, 1..=2);
        assert_eq!(items[1].parts, 1..=1);

        config.part_filter = Some(2);
        let executor = Executor::new(registry(), &config).unwrap();
        let items = executor.collect_work_items();
        assert_eq!(items.len(), 1);
        assert_eq!((items[0].day, items[0].parts.clone()), (1, 2..=2));
    }

    #[test]
    fn test_solves_after_examples_pass() {
        let temp = TempDir::new().unwrap();
        write_input(temp.path(), 1, "2\n3\n4\n");
        write_input(temp.path(), 2, "5\n");

        for mode in [
            ParallelizeBy::Sequential,
            ParallelizeBy::Year,
            ParallelizeBy::Day,
            ParallelizeBy::Part,
        ] {
            let results = run(&config(temp.path(), mode));
            assert_eq!(results.len(), 3);
            assert_eq!(answer(&results[0]), Some("9"));
            assert_eq!(answer(&results[1]), Some("24"));
            assert_eq!(results[0].examples_checked, 1);
            assert!(results[0].parse_duration.is_some());
        }
    }

    #[test]
    fn test_example_mismatch_skips_production() {
        let temp = TempDir::new().unwrap();
        write_input(temp.path(), 2, "5\n");

        let mut config = config(temp.path(), ParallelizeBy::Sequential);
        config.day_filter = Some(2);
        let results = run(&config);
        assert_eq!(results.len(), 1);
        match &results[0].answer {
            Err(e) => assert!(matches!(
                e.inner(),
                ExecutorError::Solver(SolverError::ExampleMismatch { part: 1, .. })
            )),
            Ok(answer) => panic!("expected mismatch, got {}", answer),
        }
        assert!(results[0].parse_duration.is_none());

        config.check_examples = false;
        let results = run(&config);
        assert_eq!(answer(&results[0]), Some("5"));
        assert_eq!(results[0].examples_checked, 0);
    }

    #[test]
    fn test_missing_input_fails_each_part() {
        let temp = TempDir::new().unwrap();
        let mut config = config(temp.path(), ParallelizeBy::Day);
        config.day_filter = Some(1);

        let results = run(&config);
        assert_eq!(results.len(), 2);
        for result in &results {
            match &result.answer {
                Err(e) => assert!(matches!(e.inner(), ExecutorError::Input { day: 1, .. })),
                Ok(answer) => panic!("expected input error, got {}", answer),
            }
        }
    }

    #[test]
    fn test_parse_error_is_reported() {
        let temp = TempDir::new().unwrap();
        write_input(temp.path(), 1, "2\nthree\n");
        let mut config = config(temp.path(), ParallelizeBy::Part);
        config.day_filter = Some(1);

        let results = run(&config);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| matches!(
            r.answer.as_ref().map_err(|e| e.inner()),
            Err(ExecutorError::Solver(SolverError::ParseError(_)))
        )));
    }
}
