use std::collections::HashMap;

use anyhow::anyhow;
use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

use crate::utils::dp_cache::{DpCache, DpProblem, VecBackend};

/// Reactor wiring: count paths through a device DAG
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 11, tags = ["graph", "dp"])]
pub struct Solver;

const EXAMPLES: &[Example] = &[
    Example::new(
        1,
        "aaa: you hhh
you: bbb ccc
bbb: ddd eee
ccc: ddd eee fff
ddd: ggg
eee: out
fff: out
ggg: out
hhh: ccc fff iii
iii: out
",
        "5",
    ),
    Example::new(
        2,
        "svr: aaa bbb
aaa: fft
fft: ccc
bbb: tty
tty: ccc
ccc: ddd eee
ddd: hub
hub: fff
eee: dac
dac: fff
fff: ggg hhh
ggg: out
hhh: out
",
        "2",
    ),
];

const SINK: &str = "out";

/// Devices and their outputs, names borrowed from the input
#[derive(Debug)]
pub struct Graph<'a> {
    names: Vec<&'a str>,
    ids: HashMap<&'a str, usize>,
    outputs: Vec<Vec<usize>>,
}

impl<'a> Graph<'a> {
    fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    fn intern(&mut self, name: &'a str) -> usize {
        *self.ids.entry(name).or_insert_with(|| {
            self.names.push(name);
            self.outputs.push(Vec::new());
            self.names.len() - 1
        })
    }

    /// Kahn's algorithm; returns a device on a cycle if there is one
    fn find_cycle_member(&self) -> Option<usize> {
        let mut indegree = vec![0usize; self.names.len()];
        for &to in self.outputs.iter().flatten() {
            indegree[to] += 1;
        }
        let mut ready: Vec<usize> = (0..indegree.len()).filter(|&n| indegree[n] == 0).collect();
        let mut visited = 0;
        while let Some(node) = ready.pop() {
            visited += 1;
            for &to in &self.outputs[node] {
                indegree[to] -= 1;
                if indegree[to] == 0 {
                    ready.push(to);
                }
            }
        }
        (visited < self.names.len()).then(|| indegree.iter().position(|&d| d > 0)).flatten()
    }

    /// Paths from `from` to the sink that pass through every `via` device.
    ///
    /// `via` devices missing from the graph can never be visited.
    fn count_paths(&self, from: &str, via: &[&str]) -> Result<u128, SolveError> {
        let start = self
            .id(from)
            .ok_or_else(|| SolveError::failed(anyhow!("device {:?} not found", from)))?;
        let Some(sink) = self.id(SINK) else {
            return Ok(0);
        };
        let Some(required) = via.iter().map(|name| self.id(name)).collect::<Option<Vec<_>>>() else {
            return Ok(0);
        };

        let masks = 1usize << required.len();
        let cache = DpCache::new(
            VecBackend::with_capacity(self.names.len() * masks),
            PathCount {
                graph: self,
                required,
                sink,
            },
        );
        let paths = cache.get(&(start * masks));
        debug!(from, ?via, %paths, "counted paths");
        Ok(paths)
    }
}

/// State `node * 2^k + mask`: paths from `node` to the sink, given the
/// required devices in `mask` were already passed.
struct PathCount<'g, 'a> {
    graph: &'g Graph<'a>,
    required: Vec<usize>,
    sink: usize,
}

impl PathCount<'_, '_> {
    fn split(&self, state: usize) -> (usize, usize) {
        let masks = 1 << self.required.len();
        let (node, mask) = (state / masks, state % masks);
        let seen = self
            .required
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r == node)
            .fold(mask, |m, (bit, _)| m | 1 << bit);
        (node, seen)
    }
}

impl DpProblem<usize, u128> for PathCount<'_, '_> {
    fn deps(&self, state: &usize) -> Vec<usize> {
        let (node, seen) = self.split(*state);
        if node == self.sink {
            return vec![];
        }
        let masks = 1 << self.required.len();
        self.graph.outputs[node].iter().map(|&next| next * masks + seen).collect()
    }

    fn compute(&self, state: &usize, deps: Vec<u128>) -> u128 {
        let (node, seen) = self.split(*state);
        if node == self.sink {
            u128::from(seen == (1 << self.required.len()) - 1)
        } else {
            deps.iter().sum()
        }
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Graph<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut graph = Graph {
            names: Vec::new(),
            ids: HashMap::new(),
            outputs: Vec::new(),
        };
        graph.intern(SINK);

        let mut declared = vec![false; 1];
        let mut edges: Vec<(usize, &'a str)> = Vec::new();
        for (idx, line) in input.lines().map(str::trim).enumerate().filter(|(_, l)| !l.is_empty()) {
            let invalid = |reason: String| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, reason));
            let (name, targets) = line
                .split_once(':')
                .ok_or_else(|| invalid("expected 'name: outputs...'".to_string()))?;
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(invalid(format!("bad device name {:?}", name)));
            }

            let id = graph.intern(name);
            declared.resize(graph.names.len(), false);
            if std::mem::replace(&mut declared[id], true) {
                return Err(invalid(format!("device {:?} declared twice", name)));
            }
            for target in targets.split_whitespace() {
                if target == name {
                    return Err(invalid(format!("device {:?} feeds itself", name)));
                }
                edges.push((id, target));
            }
        }

        for (from, target) in edges {
            let to = graph.id(target).ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "device {:?} outputs to undeclared {:?}",
                    graph.names[from], target
                ))
            })?;
            graph.outputs[from].push(to);
        }

        if let Some(node) = graph.find_cycle_member() {
            return Err(ParseError::InvalidFormat(format!(
                "wiring loops through {:?}",
                graph.names[node]
            )));
        }
        Ok(graph)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.count_paths("you", &[])?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.count_paths("svr", &["dac", "fft"])?.to_string())
    }
}
