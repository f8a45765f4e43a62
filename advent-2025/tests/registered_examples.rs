//! Every 2025 solver is registered through inventory and answers the
//! examples it bundles.

use advent_2025 as _;
use aoc_solver::{SolverError, SolverRegistry, SolverRegistryBuilder};

fn registry_2025() -> SolverRegistry {
    SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.year == 2025)
        .expect("plugins register without duplicates")
        .build()
}

#[test]
fn test_all_twelve_days_registered() {
    let registry = registry_2025();
    let days: Vec<u8> = registry.storage().iter_info().map(|info| info.day).collect();
    assert_eq!(days, (1..=12).collect::<Vec<_>>());

    let single_part: Vec<u8> = registry
        .storage()
        .iter_info()
        .filter(|info| info.parts == 1)
        .map(|info| info.day)
        .collect();
    assert_eq!(single_part, vec![12]);
}

#[test]
fn test_bundled_examples_pass() {
    let registry = registry_2025();
    for info in registry.storage().iter_info() {
        for part in 1..=info.parts {
            match registry.check_examples(info.year, info.day, part) {
                Ok(_) => {}
                Err(SolverError::ExampleMismatch {
                    day,
                    part,
                    expected,
                    actual,
                    ..
                }) => panic!("day {} part {}: expected {}, got {}", day, part, expected, actual),
                Err(e) => panic!("day {} part {}: {}", info.day, part, e),
            }
        }
    }
}

#[test]
fn test_every_part_has_an_example() {
    let registry = registry_2025();
    for info in registry.storage().iter_info() {
        for part in 1..=info.parts {
            let checked = registry.check_examples(info.year, info.day, part).unwrap();
            assert!(checked > 0, "day {} part {} has no example", info.day, part);
        }
    }
}

#[test]
fn test_solvers_reject_garbage_input() {
    let registry = registry_2025();
    for day in 1..=12 {
        assert!(
            matches!(registry.create_solver(2025, day, "#?!"), Err(SolverError::ParseError(_))),
            "day {} accepted garbage",
            day
        );
    }
}
