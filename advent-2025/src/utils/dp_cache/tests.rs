//! Tests for the DP cache module.

use std::cell::Cell;
use std::rc::Rc;

use super::*;

struct Fibonacci;

impl DpProblem<usize, u64> for Fibonacci {
    fn deps(&self, n: &usize) -> Vec<usize> {
        if *n <= 1 { vec![] } else { vec![n - 1, n - 2] }
    }

    fn compute(&self, n: &usize, deps: Vec<u64>) -> u64 {
        if *n <= 1 { *n as u64 } else { deps[0] + deps[1] }
    }
}

#[test]
fn test_fibonacci_linear_dependency_chain() {
    let cache = DpCache::new(VecBackend::new(), Fibonacci);

    assert_eq!(cache.get(&0), 0);
    assert_eq!(cache.get(&1), 1);
    assert_eq!(cache.get(&10), 55);
    assert_eq!(cache.get(&90), 2_880_067_194_370_816_120);
}

/// Diamond: A(0) depends on B(1) and C(2), both depend on D(3)
struct Diamond {
    count: Rc<Cell<i32>>,
}

impl DpProblem<usize, i32> for Diamond {
    fn deps(&self, n: &usize) -> Vec<usize> {
        match *n {
            0 => vec![1, 2],
            1 | 2 => vec![3],
            _ => vec![],
        }
    }

    fn compute(&self, n: &usize, deps: Vec<i32>) -> i32 {
        self.count.set(self.count.get() + 1);
        match *n {
            0 => deps[0] + deps[1],
            1 => deps[0] * 2,
            2 => deps[0] * 3,
            _ => 10,
        }
    }
}

#[test]
fn test_diamond_dependency_memoization() {
    let count = Rc::new(Cell::new(0));
    let cache = DpCache::new(
        HashMapBackend::new(),
        Diamond {
            count: count.clone(),
        },
    );

    assert_eq!(cache.get(&0), 50);
    assert_eq!(count.get(), 4);

    // Cached: no recomputation
    assert_eq!(cache.get(&0), 50);
    assert_eq!(cache.get(&3), 10);
    assert_eq!(count.get(), 4);
    assert_eq!(cache.into_backend().len(), 4);
}

#[test]
fn test_vec_backend_keeps_first_value() {
    let mut backend: VecBackend<i32> = VecBackend::new();

    assert_eq!(*backend.get_or_insert(5, 42), 42);
    assert_eq!(*backend.get_or_insert(5, 999), 42);
    assert_eq!(backend.get(&5), Some(&42));
    assert_eq!(backend.get(&4), None);
    assert_eq!(backend.get(&10), None);
}

#[test]
fn test_vec_backend_with_capacity_starts_empty() {
    let backend: VecBackend<u8> = VecBackend::with_capacity(8);
    assert!((0..8).all(|i| backend.get(&i).is_none()));
}

#[test]
fn test_hashmap_backend_tuple_keys() {
    let mut backend: HashMapBackend<(usize, u8), u64> = HashMapBackend::new();
    assert!(backend.is_empty());
    backend.get_or_insert((3, 1), 7);
    assert_eq!(backend.get(&(3, 1)), Some(&7));
    assert_eq!(backend.get(&(3, 0)), None);
}
