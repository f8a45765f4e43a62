//! Rectangular character grids

use aoc_solver::ParseError;

/// Row-major rectangular grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Parses one row per non-empty line, mapping each byte with `cell`.
    ///
    /// All rows must have the same width.
    pub fn parse<F>(input: &str, mut cell: F) -> Result<Self, ParseError>
    where
        F: FnMut(u8) -> Option<T>,
    {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::new();

        for (row, line) in input.lines().map(str::trim_end).filter(|l| !l.is_empty()).enumerate() {
            match width {
                None => width = Some(line.len()),
                Some(w) if w != line.len() => {
                    return Err(ParseError::InvalidFormat(format!(
                        "row {} has width {}, expected {}",
                        row + 1,
                        line.len(),
                        w
                    )));
                }
                Some(_) => {}
            }
            for (col, byte) in line.bytes().enumerate() {
                let value = cell(byte).ok_or_else(|| {
                    ParseError::InvalidFormat(format!(
                        "unexpected character {:?} at row {}, column {}",
                        byte as char,
                        row + 1,
                        col + 1
                    ))
                })?;
                cells.push(value);
            }
            height += 1;
        }

        Ok(Self {
            width: width.unwrap_or(0),
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col] = value;
        }
    }

    /// Same-shaped grid with every cell mapped through `f`.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// All `(row, col)` positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + use<T> {
        let width = self.width;
        (0..self.height).flat_map(move |r| (0..width).map(move |c| (r, c)))
    }

    /// In-bounds positions of the up to eight cells around `(row, col)`.
    pub fn neighbours(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + use<T> {
        let (height, width) = (self.height, self.width);
        (-1isize..=1)
            .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
            .filter(|&d| d != (0, 0))
            .filter_map(move |(dr, dc)| {
                let r = row.checked_add_signed(dr)?;
                let c = col.checked_add_signed(dc)?;
                (r < height && c < width).then_some((r, c))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bool_grid(input: &str) -> Result<Grid<bool>, ParseError> {
        Grid::parse(input, |b| match b {
            b'@' => Some(true),
            b'.' => Some(false),
            _ => None,
        })
    }

    #[test]
    fn test_parse_dimensions() {
        let grid = bool_grid("@..\n.@.\n").unwrap();
        assert_eq!((grid.height(), grid.width()), (2, 3));
        assert_eq!(grid.get(1, 1), Some(&true));
        assert_eq!(grid.get(1, 3), None);
        assert_eq!(grid.row(0), &[true, false, false]);
    }

    #[test]
    fn test_parse_rejects_ragged_rows_and_unknown_bytes() {
        assert!(matches!(bool_grid("@..\n.@\n"), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(bool_grid("@x.\n"), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_neighbours_clipped_at_edges() {
        let grid = bool_grid("...\n...\n...").unwrap();
        assert_eq!(grid.neighbours(0, 0).count(), 3);
        assert_eq!(grid.neighbours(0, 1).count(), 5);
        assert_eq!(grid.neighbours(1, 1).count(), 8);
        assert!(!grid.neighbours(1, 1).any(|p| p == (1, 1)));
    }
}
