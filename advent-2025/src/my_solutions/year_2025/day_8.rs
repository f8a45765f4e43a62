use anyhow::anyhow;
use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use tracing::debug;

/// Junction boxes wired into circuits, closest pairs first
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 8, tags = ["graph", "union-find"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "162,817,812
57,618,57
906,360,560
592,479,940
352,342,300
466,668,158
542,29,236
431,825,988
739,650,466
52,470,668
216,146,977
819,987,18
117,168,530
805,96,715
346,949,466
970,615,88
941,993,340
862,61,35
984,92,344
425,690,689
";

// The sample connects 10 pairs in part 1 instead of 1000
const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "40").with_parameter(10),
    Example::new(2, EXAMPLE_INPUT, "25272"),
];

const CONNECTIONS: usize = 1000;

#[derive(Debug)]
pub struct SharedData {
    boxes: Vec<[i32; 3]>,
    pairs: Option<Vec<(i128, usize, usize)>>,
    connections: usize,
}

/// All pairs `(squared distance, i, j)` with `i < j`, closest first
fn sorted_pairs(boxes: &[[i32; 3]]) -> Vec<(i128, usize, usize)> {
    let mut pairs: Vec<_> = (0..boxes.len())
        .tuple_combinations()
        .map(|(i, j)| {
            let d: i128 = (0..3)
                .map(|k| (i128::from(boxes[i][k]) - i128::from(boxes[j][k])).pow(2))
                .sum();
            (d, i, j)
        })
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Disjoint sets with path halving and union by size
struct Circuits {
    parent: Vec<usize>,
    size: Vec<usize>,
    count: usize,
}

impl Circuits {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            count: n,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Joins the circuits of `a` and `b`; false if they were already one
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        self.count -= 1;
        true
    }

    fn sizes(&mut self) -> Vec<usize> {
        let roots: Vec<usize> = (0..self.parent.len()).filter(|&x| self.find(x) == x).collect();
        roots.into_iter().map(|root| self.size[root]).collect()
    }
}

/// Product of the three largest circuits after processing the first
/// `connections` closest pairs, joined or not.
pub fn circuit_product(boxes: &[[i32; 3]], pairs: &[(i128, usize, usize)], connections: usize) -> u64 {
    let mut circuits = Circuits::new(boxes.len());
    for &(_, i, j) in pairs.iter().take(connections) {
        circuits.union(i, j);
    }

    let sizes = circuits.sizes();
    debug!(circuits = sizes.len(), connections, "connected closest pairs");
    sizes
        .into_iter()
        .sorted_unstable_by(|a, b| b.cmp(a))
        .take(3)
        .map(|s| s as u64)
        .product()
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let boxes = input
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(idx, line)| {
                line.split(',')
                    .map(|v| v.trim().parse::<i32>())
                    .collect::<Result<Vec<_>, _>>()
                    .ok()
                    .and_then(|coords| <[i32; 3]>::try_from(coords).ok())
                    .ok_or_else(|| {
                        ParseError::InvalidFormat(format!("(line {}) expected 'x,y,z', got {:?}", idx + 1, line))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SharedData {
            boxes,
            pairs: None,
            connections: CONNECTIONS,
        })
    }

    /// Number of closest pairs part 1 connects
    fn configure(shared: &mut Self::SharedData<'_>, parameter: u64) -> Result<(), ParseError> {
        shared.connections = usize::try_from(parameter)
            .map_err(|_| ParseError::Other(format!("{} connections do not fit in usize", parameter)))?;
        Ok(())
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let SharedData {
            boxes,
            pairs,
            connections,
        } = shared;
        let pairs = pairs.get_or_insert_with(|| sorted_pairs(boxes));
        Ok(circuit_product(boxes, pairs, *connections).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let SharedData { boxes, pairs, .. } = shared;
        if boxes.len() < 2 {
            return Err(SolveError::failed(anyhow!(
                "need at least two junction boxes, got {}",
                boxes.len()
            )));
        }

        let mut circuits = Circuits::new(boxes.len());
        for &(_, i, j) in pairs.get_or_insert_with(|| sorted_pairs(boxes)).iter() {
            if circuits.union(i, j) && circuits.count == 1 {
                debug!(i, j, "last pair joins everything");
                return Ok((i64::from(boxes[i][0]) * i64::from(boxes[j][0])).to_string());
            }
        }
        Err(SolveError::failed(anyhow!("boxes never formed a single circuit")))
    }
}
