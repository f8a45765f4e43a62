//! Single-threaded DP cache implementation.

use std::cell::RefCell;
use std::marker::PhantomData;

use super::backend::Backend;
use super::problem::DpProblem;

/// Memoises a [`DpProblem`], resolving dependencies recursively on demand.
///
/// # Warning: No Cycle Detection
///
/// A cyclic dependency graph recurses until the stack overflows. Callers
/// must guarantee the dependencies form a DAG.
///
/// # Example
///
/// ```rust
/// use advent_2025::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};
///
/// struct Factorial;
///
/// impl DpProblem<u64, u64> for Factorial {
///     fn deps(&self, n: &u64) -> Vec<u64> {
///         if *n == 0 { vec![] } else { vec![n - 1] }
///     }
///     fn compute(&self, n: &u64, deps: Vec<u64>) -> u64 {
///         if *n == 0 { 1 } else { n * deps[0] }
///     }
/// }
///
/// let cache = DpCache::new(HashMapBackend::new(), Factorial);
/// assert_eq!(cache.get(&5), 120);
/// ```
pub struct DpCache<I, K, B, P>
where
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    backend: RefCell<B>,
    problem: P,
    _phantom: PhantomData<(I, K)>,
}

impl<I, K, B, P> DpCache<I, K, B, P>
where
    I: Clone,
    K: Clone,
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    pub fn new(backend: B, problem: P) -> Self {
        Self {
            backend: RefCell::new(backend),
            problem,
            _phantom: PhantomData,
        }
    }

    /// Returns the value for `index`, computing it and its dependencies if needed.
    pub fn get(&self, index: &I) -> K {
        if let Some(value) = self.backend.borrow().get(index) {
            return value.clone();
        }

        // No borrow is held while dependencies recurse into the cache
        let dep_values: Vec<K> = self
            .problem
            .deps(index)
            .iter()
            .map(|dep| self.get(dep))
            .collect();
        let value = self.problem.compute(index, dep_values);

        self.backend
            .borrow_mut()
            .get_or_insert(index.clone(), value)
            .clone()
    }

    /// Consumes the cache, returning the backend with every computed value.
    pub fn into_backend(self) -> B {
        self.backend.into_inner()
    }
}
