use anyhow::anyhow;
use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use tracing::debug;

/// Movie theater floor: rectangles between red tiles
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 9, tags = ["geometry"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "7,1
11,1
11,7
9,7
9,5
2,5
2,3
7,3
";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "50"),
    Example::new(2, EXAMPLE_INPUT, "24"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    min_x: i64,
    max_x: i64,
    min_y: i64,
    max_y: i64,
}

impl Rect {
    fn spanning(a: (i64, i64), b: (i64, i64)) -> Self {
        Rect {
            min_x: a.0.min(b.0),
            max_x: a.0.max(b.0),
            min_y: a.1.min(b.1),
            max_y: a.1.max(b.1),
        }
    }

    /// Tiles covered, borders included
    fn area(&self) -> u64 {
        (self.max_x - self.min_x + 1).unsigned_abs() * (self.max_y - self.min_y + 1).unsigned_abs()
    }

    /// True when the open interiors of both boxes overlap
    fn interiors_overlap(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}

/// Red tiles in loop order
#[derive(Debug)]
pub struct Tiles {
    corners: Vec<(i64, i64)>,
}

impl Tiles {
    /// Loop edges as (start, end) pairs, closing back to the first tile
    fn edges(&self) -> impl Iterator<Item = ((i64, i64), (i64, i64))> + '_ {
        self.corners.iter().copied().circular_tuple_windows()
    }

    /// Candidate rectangles, largest first
    fn rectangles(&self) -> Vec<Rect> {
        self.corners
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| Rect::spanning(a, b))
            .sorted_unstable_by_key(|r| std::cmp::Reverse(r.area()))
            .collect()
    }

    /// Point-in-loop test on doubled coordinates, boundary counting as inside
    fn contains_doubled(&self, (px, py): (i64, i64)) -> bool {
        let mut inside = false;
        for ((x1, y1), (x2, y2)) in self.edges() {
            let (x1, y1, x2, y2) = (2 * x1, 2 * y1, 2 * x2, 2 * y2);
            let on_segment = (x1.min(x2)..=x1.max(x2)).contains(&px)
                && (y1.min(y2)..=y1.max(y2)).contains(&py);
            if on_segment {
                return true;
            }
            // Rays go towards +x; only vertical edges can cross them
            if x1 == x2 && x1 > px && (y1.min(y2)..y1.max(y2)).contains(&py) {
                inside = !inside;
            }
        }
        inside
    }

    fn fits_inside(&self, rect: &Rect) -> bool {
        let crossed = self
            .edges()
            .any(|(a, b)| rect.interiors_overlap(&Rect::spanning(a, b)));
        !crossed && self.contains_doubled((rect.min_x + rect.max_x, rect.min_y + rect.max_y))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Tiles;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let corners = input
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(idx, line)| {
                line.split_once(',')
                    .and_then(|(x, y)| Some((x.trim().parse().ok()?, y.trim().parse().ok()?)))
                    .ok_or_else(|| {
                        ParseError::InvalidFormat(format!("(line {}) expected 'x,y', got {:?}", idx + 1, line))
                    })
            })
            .collect::<Result<Vec<(i64, i64)>, _>>()?;

        let tiles = Tiles { corners };
        if let Some((a, b)) = tiles.edges().find(|(a, b)| a.0 != b.0 && a.1 != b.1) {
            return Err(ParseError::InvalidFormat(format!(
                "tiles {:?} and {:?} are not on a shared row or column",
                a, b
            )));
        }
        Ok(tiles)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .rectangles()
            .first()
            .map(|rect| rect.area().to_string())
            .ok_or_else(|| SolveError::failed(anyhow!("need at least two red tiles")))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let rectangles = shared.rectangles();
        let (checked, best) = rectangles
            .iter()
            .find_position(|rect| shared.fits_inside(rect))
            .ok_or_else(|| SolveError::failed(anyhow!("no rectangle fits inside the loop")))?;
        debug!(checked, candidates = rectangles.len(), ?best, "largest enclosed rectangle");
        Ok(best.area().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(input: &str) -> Tiles {
        <Solver as AocParser>::parse(input).unwrap()
    }

    #[test]
    fn test_area_includes_borders() {
        assert_eq!(Rect::spanning((2, 5), (11, 1)).area(), 50);
        assert_eq!(Rect::spanning((7, 3), (7, 3)).area(), 1);
    }

    #[test]
    fn test_point_in_loop() {
        let loop_tiles = tiles(EXAMPLE_INPUT);
        assert!(loop_tiles.contains_doubled((2 * 8, 2 * 4)));
        assert!(loop_tiles.contains_doubled((2 * 2, 2 * 4)));
        assert!(!loop_tiles.contains_doubled((2 * 3, 2 * 2)));
        assert!(!loop_tiles.contains_doubled((2 * 12, 2 * 4)));
    }

    #[test]
    fn test_l_shape_excludes_outer_corner() {
        // L-shaped loop: the bounding rectangle of the two arm tips is half outside
        let l_shape = tiles("0,0\n4,0\n4,2\n2,2\n2,4\n0,4\n");
        let outer = Rect::spanning((4, 2), (2, 4));
        assert!(!l_shape.fits_inside(&outer));

        let mut shared = l_shape;
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "15");
    }

    #[test]
    fn test_rejects_diagonal_edges() {
        assert!(<Solver as AocParser>::parse("0,0\n3,3\n").is_err());
        assert!(<Solver as AocParser>::parse("0,0\n3\n").is_err());
    }

    #[test]
    fn test_single_tile_has_no_rectangle() {
        let mut single = tiles("3,3\n");
        assert!(<Solver as PartSolver<1>>::solve(&mut single).is_err());
    }
}
