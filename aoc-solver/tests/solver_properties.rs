//! Property-based tests for derived solvers, part bounds and example checks

use aoc_solver::{
    AocParser, AocSolver, Example, ParseError, PartSolver, SolveError, Solver,
    SolverError, SolverExt, SolverRegistryBuilder, register_solver,
};
use proptest::prelude::*;

fn parse_numbers(input: &str) -> Result<Vec<i64>, ParseError> {
    input
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| {
            l.parse()
                .map_err(|_| ParseError::InvalidFormat(format!("bad int {:?}", l)))
        })
        .collect()
}

#[derive(AocSolver)]
#[aoc_solver(max_parts = 2, examples = SUM_PRODUCT_EXAMPLES)]
struct SumProduct;

const SUM_PRODUCT_EXAMPLES: &[Example] = &[
    Example::new(1, "1\n2\n3\n4", "10"),
    Example::new(2, "1\n2\n3\n4", "24"),
];

impl AocParser for SumProduct {
    type SharedData<'a> = Vec<i64>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_numbers(input)
    }
}

impl PartSolver<1> for SumProduct {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().sum::<i64>().to_string())
    }
}

impl PartSolver<2> for SumProduct {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().product::<i64>().to_string())
    }
}

/// Part 2 reads what part 1 cached in the shared data
#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct CachingSolver;

struct Cached {
    numbers: Vec<i64>,
    max: Option<i64>,
}

impl AocParser for CachingSolver {
    type SharedData<'a> = Cached;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(Cached {
            numbers: parse_numbers(input)?,
            max: None,
        })
    }
}

impl PartSolver<1> for CachingSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let max = shared
            .numbers
            .iter()
            .copied()
            .max()
            .ok_or_else(|| SolveError::failed("no numbers"))?;
        shared.max = Some(max);
        Ok(max.to_string())
    }
}

impl PartSolver<2> for CachingSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .max
            .map(|m| (m * 2).to_string())
            .ok_or(SolveError::PartNotImplemented(2))
    }
}

/// Sums the first `take` numbers; the sample uses a smaller `take`
#[derive(AocSolver)]
#[aoc_solver(max_parts = 1, examples = PREFIX_EXAMPLES)]
struct PrefixSum;

const PREFIX_EXAMPLES: &[Example] = &[Example::new(1, "1\n2\n3\n4", "3").with_parameter(2)];

struct Prefix {
    numbers: Vec<i64>,
    take: usize,
}

impl AocParser for PrefixSum {
    type SharedData<'a> = Prefix;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(Prefix {
            numbers: parse_numbers(input)?,
            take: 3,
        })
    }

    fn configure(shared: &mut Self::SharedData<'_>, parameter: u64) -> Result<(), ParseError> {
        shared.take = usize::try_from(parameter)
            .map_err(|_| ParseError::Other(format!("take {} too large", parameter)))?;
        Ok(())
    }
}

impl PartSolver<1> for PrefixSum {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.numbers.iter().take(shared.take).sum::<i64>().to_string())
    }
}

fn lines(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The derived `solve_part` gives the same answer as calling the part impl directly
    #[test]
    fn derived_dispatch_matches_part_solver(
        numbers in prop::collection::vec(-50i64..50, 1..6),
        part in 1u8..=2
    ) {
        let input = lines(&numbers);
        let mut shared1 = SumProduct::parse(&input).unwrap();
        let mut shared2 = SumProduct::parse(&input).unwrap();

        let dispatched = <SumProduct as Solver>::solve_part(&mut shared1, part).unwrap();
        let direct = match part {
            1 => <SumProduct as PartSolver<1>>::solve(&mut shared2),
            _ => <SumProduct as PartSolver<2>>::solve(&mut shared2),
        }.unwrap();

        prop_assert_eq!(dispatched, direct);
    }

    /// Part 0 and parts beyond `PARTS` are rejected before reaching a part impl
    #[test]
    fn out_of_range_parts_rejected(part in prop_oneof![Just(0u8), 3u8..=255]) {
        let mut shared = SumProduct::parse("1\n2").unwrap();

        match SumProduct::solve_part_checked_range(&mut shared, part) {
            Err(SolveError::PartOutOfRange(p)) => prop_assert_eq!(p, part),
            other => prop_assert!(false, "expected PartOutOfRange, got {:?}", other),
        }
        match <SumProduct as Solver>::solve_part(&mut shared, part) {
            Err(SolveError::PartOutOfRange(p)) => prop_assert_eq!(p, part),
            other => prop_assert!(false, "expected PartOutOfRange, got {:?}", other),
        }
    }

    /// A solver instance keeps its shared data between parts
    #[test]
    fn instance_shares_data_between_parts(numbers in prop::collection::vec(0i64..1000, 1..8)) {
        let mut builder = SolverRegistryBuilder::new();
        register_solver!(builder, CachingSolver, 2025, 7);
        let registry = builder.build();

        let input = lines(&numbers);
        let mut solver = registry.create_solver(2025, 7, &input).unwrap();
        let max = *numbers.iter().max().unwrap();

        prop_assert_eq!(solver.solve(1).unwrap().answer, max.to_string());
        prop_assert_eq!(solver.solve(2).unwrap().answer, (max * 2).to_string());
    }
}

#[test]
fn derived_constants() {
    assert_eq!(SumProduct::PARTS, 2);
    assert_eq!(SumProduct::EXAMPLES.len(), 2);
    assert_eq!(CachingSolver::EXAMPLES.len(), 0);
}

#[test]
fn examples_checked_through_registry() {
    let mut builder = SolverRegistryBuilder::new();
    register_solver!(builder, SumProduct, 2025, 1);
    let registry = builder.build();

    assert_eq!(registry.check_examples(2025, 1, 1).unwrap(), 1);
    assert_eq!(registry.check_examples(2025, 1, 2).unwrap(), 1);
    assert!(matches!(
        registry.check_examples(2025, 2, 1),
        Err(SolverError::NotFound(2025, 2))
    ));
}

#[test]
fn verify_reports_wrong_answer() {
    let mut builder = SolverRegistryBuilder::new();
    register_solver!(builder, SumProduct, 2025, 1);
    let registry = builder.build();

    let wrong = Example::new(1, "2\n2", "5");
    let mut solver = registry.create_solver(2025, 1, wrong.input).unwrap();
    match solver.verify(&wrong) {
        Err(SolverError::ExampleMismatch {
            year,
            day,
            expected,
            actual,
            ..
        }) => {
            assert_eq!((year, day), (2025, 1));
            assert_eq!(expected, "5");
            assert_eq!(actual, "4");
        }
        other => panic!("expected mismatch, got {:?}", other.map(|r| r.answer)),
    }
}

#[test]
fn failing_part_surfaces_solve_error() {
    let mut builder = SolverRegistryBuilder::new();
    register_solver!(builder, CachingSolver, 2025, 7);
    let registry = builder.build();

    let mut solver = registry.create_solver(2025, 7, "").unwrap();
    assert!(matches!(solver.solve(1), Err(SolveError::SolveFailed(_))));
    assert!(matches!(solver.solve(2), Err(SolveError::PartNotImplemented(2))));
    assert!(matches!(solver.solve(3), Err(SolveError::PartOutOfRange(3))));
}

#[test]
fn example_parameter_configures_instance() {
    let mut builder = SolverRegistryBuilder::new();
    register_solver!(builder, PrefixSum, 2025, 9);
    let registry = builder.build();

    assert_eq!(registry.check_examples(2025, 9, 1).unwrap(), 1);

    // Real input keeps the parsed default
    let mut solver = registry.create_solver(2025, 9, "1\n2\n3\n4").unwrap();
    assert_eq!(solver.solve(1).unwrap().answer, "6");
    solver.configure(4).unwrap();
    assert_eq!(solver.solve(1).unwrap().answer, "10");
}

#[test]
fn parameter_rejected_by_solver_without_settings() {
    let mut builder = SolverRegistryBuilder::new();
    register_solver!(builder, SumProduct, 2025, 1);
    let registry = builder.build();

    let mut solver = registry.create_solver(2025, 1, "1\n2").unwrap();
    assert!(matches!(solver.configure(5), Err(ParseError::Other(_))));
    assert_eq!(
        Example::new(1, "1", "1").with_parameter(5).parameter,
        Some(5)
    );
}
