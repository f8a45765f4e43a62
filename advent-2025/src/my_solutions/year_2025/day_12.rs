use std::collections::HashSet;

use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use tracing::{debug, warn};

/// Christmas tree farm: which regions hold their presents
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1, examples = EXAMPLES)]
#[aoc(year = 2025, day = 12, tags = ["packing", "backtracking"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "0:
###
##.
##.

1:
###
##.
.##

2:
.##
###
##.

3:
##.
###
##.

4:
###
#..
###

5:
###
.#.
###

4x4: 0 0 0 0 2 0
12x5: 1 0 1 0 2 2
12x5: 1 0 1 0 3 2
";

const EXAMPLES: &[Example] = &[Example::new(1, EXAMPLE_INPUT, "2")];

/// Search nodes per region before falling back to comparing areas
const NODE_BUDGET: usize = 2_000_000;

/// A present's occupied cells as `(row, col)`, normalised to the origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<(usize, usize)>,
}

impl Shape {
    fn from_cells(cells: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let cells: Vec<(i64, i64)> = cells.into_iter().collect();
        let min_r = cells.iter().map(|c| c.0).min().unwrap_or(0);
        let min_c = cells.iter().map(|c| c.1).min().unwrap_or(0);
        let cells = cells
            .iter()
            .map(|&(r, c)| ((r - min_r).unsigned_abs() as usize, (c - min_c).unsigned_abs() as usize))
            .sorted()
            .collect();
        Shape { cells }
    }

    fn height(&self) -> usize {
        self.cells.iter().map(|c| c.0 + 1).max().unwrap_or(0)
    }

    fn width(&self) -> usize {
        self.cells.iter().map(|c| c.1 + 1).max().unwrap_or(0)
    }

    /// Distinct rotations and reflections
    fn orientations(&self) -> Vec<Shape> {
        let base: Vec<(i64, i64)> = self.cells.iter().map(|&(r, c)| (r as i64, c as i64)).collect();
        let mut seen = Vec::new();
        for flip in [false, true] {
            let mut cells: Vec<(i64, i64)> = base.iter().map(|&(r, c)| if flip { (r, -c) } else { (r, c) }).collect();
            for _ in 0..4 {
                let shape = Shape::from_cells(cells.iter().copied());
                if !seen.contains(&shape) {
                    seen.push(shape);
                }
                cells = cells.iter().map(|&(r, c)| (c, -r)).collect();
            }
        }
        seen
    }
}

#[derive(Debug, Clone)]
pub struct Region {
    width: usize,
    height: usize,
    counts: Vec<usize>,
}

#[derive(Debug)]
pub struct Farm {
    shapes: Vec<Shape>,
    regions: Vec<Region>,
}

fn parse_region(line: &str, shapes: usize) -> Result<Region, String> {
    let (size, counts) = line.split_once(':').ok_or("expected 'WxH: counts'")?;
    let (width, height) = size
        .trim()
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
        .ok_or_else(|| format!("bad region size {:?}", size))?;
    let counts = counts
        .split_whitespace()
        .map(|c| c.parse::<usize>().map_err(|_| format!("bad present count {:?}", c)))
        .collect::<Result<Vec<_>, _>>()?;
    if counts.len() > shapes {
        return Err(format!("{} present counts for {} shapes", counts.len(), shapes));
    }
    Ok(Region {
        width,
        height,
        counts,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Farm;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut shapes: Vec<Shape> = Vec::new();
        let mut regions = Vec::new();
        let mut current: Option<Vec<(i64, i64)>> = None;
        let mut row = 0;

        for (idx, line) in input.lines().map(str::trim).enumerate() {
            let invalid = |reason: String| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, reason));

            if line.is_empty() {
                if let Some(cells) = current.take() {
                    shapes.push(Shape::from_cells(cells));
                }
            } else if let Some(cells) = current.as_mut() {
                for (col, b) in line.bytes().enumerate() {
                    match b {
                        b'#' => cells.push((row, col as i64)),
                        b'.' => {}
                        _ => return Err(invalid(format!("unexpected {:?} in shape", b as char))),
                    }
                }
                row += 1;
            } else if let Some(index) = line.strip_suffix(':').and_then(|i| i.parse::<usize>().ok()) {
                if index != shapes.len() {
                    return Err(invalid(format!("shape {} out of order, expected {}", index, shapes.len())));
                }
                current = Some(Vec::new());
                row = 0;
            } else {
                regions.push(parse_region(line, shapes.len()).map_err(invalid)?);
            }
        }
        if let Some(cells) = current {
            shapes.push(Shape::from_cells(cells));
        }

        if let Some(index) = shapes.iter().position(|s| s.cells.is_empty()) {
            return Err(ParseError::InvalidFormat(format!("shape {} has no cells", index)));
        }
        Ok(Farm { shapes, regions })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Every present gets its own bounding-box tile
    Tiled,
    /// More occupied cells than the region has
    TooSmall,
    Packed,
    Unpackable,
    /// Search gave up; the cells fit, so the region is counted
    AreaFallback,
}

impl Verdict {
    fn fits(self) -> bool {
        match self {
            Verdict::Tiled | Verdict::Packed | Verdict::AreaFallback => true,
            Verdict::TooSmall | Verdict::Unpackable => false,
        }
    }
}

fn classify(farm: &Farm, region: &Region) -> Verdict {
    let used = || region.counts.iter().enumerate().filter(|&(_, &n)| n > 0);
    let presents: usize = region.counts.iter().sum();
    let needed: usize = used().map(|(i, &n)| farm.shapes[i].cells.len() * n).sum();
    let area = region.width * region.height;

    let tile_h = used().map(|(i, _)| farm.shapes[i].height()).max().unwrap_or(1);
    let tile_w = used().map(|(i, _)| farm.shapes[i].width()).max().unwrap_or(1);
    let tiles = ((region.width / tile_w) * (region.height / tile_h))
        .max((region.width / tile_h) * (region.height / tile_w));

    if tiles >= presents {
        Verdict::Tiled
    } else if needed > area {
        Verdict::TooSmall
    } else {
        let packed = Packer::new(farm, region, NODE_BUDGET)
            .and_then(|mut packer| packer.fits(area - needed, presents));
        match packed {
            Ok(true) => Verdict::Packed,
            Ok(false) => Verdict::Unpackable,
            Err(giving_up) => {
                warn!(
                    width = region.width,
                    height = region.height,
                    %giving_up,
                    "packing search gave up, comparing areas"
                );
                Verdict::AreaFallback
            }
        }
    }
}

/// Why the packer could not decide a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GivingUp {
    BudgetExhausted,
    WindowTooWide,
}

impl std::fmt::Display for GivingUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GivingUp::BudgetExhausted => write!(f, "node budget exhausted"),
            GivingUp::WindowTooWide => write!(f, "region too wide for the occupancy window"),
        }
    }
}

/// Backtracking packer over cells in scan order.
///
/// Cells are numbered `along * short + across`, scanning the short side
/// first. The first free cell is either covered by a present whose first
/// cell (in scan order) lands there, or left empty while slack remains.
/// `occupied` holds the cells from the current one onwards as bits, so a
/// failed `(cell, occupied, slack, counts)` state is never searched twice.
struct Packer {
    short: usize,
    long: usize,
    /// Per shape: each orientation as `(along, across)` offsets from its first cell
    placements: Vec<Vec<Vec<(usize, isize)>>>,
    counts: Vec<usize>,
    failed: HashSet<(usize, u128, usize, Vec<usize>)>,
    nodes: usize,
    budget: usize,
}

impl Packer {
    fn new(farm: &Farm, region: &Region, budget: usize) -> Result<Self, GivingUp> {
        let short = region.width.min(region.height);
        let long = region.width.max(region.height);

        let placements: Vec<Vec<Vec<(usize, isize)>>> = farm
            .shapes
            .iter()
            .map(|shape| {
                shape
                    .orientations()
                    .into_iter()
                    .filter(|o| o.height() <= short && o.width() <= long)
                    .map(|o| {
                        let cells: Vec<(usize, usize)> =
                            o.cells.iter().map(|&(r, c)| (c, r)).sorted().collect();
                        let (a0, b0) = cells[0];
                        cells
                            .iter()
                            .map(|&(a, b)| (a - a0, b as isize - b0 as isize))
                            .collect()
                    })
                    .collect()
            })
            .collect();

        let window = placements
            .iter()
            .flatten()
            .flatten()
            .filter_map(|&(along, across)| (along * short).checked_add_signed(across))
            .map(|bit| bit + 1)
            .max()
            .unwrap_or(1);
        if window > u128::BITS as usize {
            return Err(GivingUp::WindowTooWide);
        }

        let mut counts = region.counts.clone();
        counts.resize(farm.shapes.len(), 0);
        Ok(Packer {
            short,
            long,
            placements,
            counts,
            failed: HashSet::new(),
            nodes: 0,
            budget,
        })
    }

    fn fits(&mut self, slack: usize, presents: usize) -> Result<bool, GivingUp> {
        self.search(0, 0, slack, presents)
    }

    fn search(&mut self, mut cell: usize, mut occupied: u128, slack: usize, left: usize) -> Result<bool, GivingUp> {
        if left == 0 {
            return Ok(true);
        }
        let cells = self.short * self.long;
        while cell < cells && occupied & 1 == 1 {
            cell += 1;
            occupied >>= 1;
        }
        if cell == cells {
            return Ok(false);
        }

        let state = (cell, occupied, slack, self.counts.clone());
        if self.failed.contains(&state) {
            return Ok(false);
        }
        self.nodes += 1;
        if self.nodes > self.budget {
            return Err(GivingUp::BudgetExhausted);
        }

        let (along, across) = (cell / self.short, cell % self.short);
        for shape in 0..self.counts.len() {
            if self.counts[shape] == 0 {
                continue;
            }
            for orientation in 0..self.placements[shape].len() {
                let Some(mask) = self.placement_mask(shape, orientation, along, across, occupied) else {
                    continue;
                };
                self.counts[shape] -= 1;
                let found = self.search(cell + 1, (occupied | mask) >> 1, slack, left - 1);
                self.counts[shape] += 1;
                if found? {
                    return Ok(true);
                }
            }
        }

        if slack > 0 && self.search(cell + 1, occupied >> 1, slack - 1, left)? {
            return Ok(true);
        }

        self.failed.insert(state);
        Ok(false)
    }

    /// Bits a placement covers relative to the current cell, if it fits
    fn placement_mask(
        &self,
        shape: usize,
        orientation: usize,
        along: usize,
        across: usize,
        occupied: u128,
    ) -> Option<u128> {
        let mut mask = 0u128;
        for &(d_along, d_across) in &self.placements[shape][orientation] {
            let a = along + d_along;
            let b = across.checked_add_signed(d_across)?;
            if a >= self.long || b >= self.short {
                return None;
            }
            let bit = 1u128 << (d_along * self.short).checked_add_signed(d_across)?;
            if occupied & bit != 0 {
                return None;
            }
            mask |= bit;
        }
        Some(mask)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let fitting = shared
            .regions
            .iter()
            .enumerate()
            .filter(|(idx, region)| {
                let verdict = classify(shared, region);
                debug!(region = idx + 1, ?verdict, "classified region");
                verdict.fits()
            })
            .count();
        Ok(fitting.to_string())
    }
}
