use std::fmt;
use std::ops::Index;

use log::debug;

use crate::{AlignerError, MAX_SEQUENCE_SIZE};

/// Which neighbour produced a cell's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Boundary cell, nothing to trace back to.
    #[default]
    None,
    Diagonal,
    /// Gap in the row sequence.
    FromLeft,
    /// Gap in the column sequence.
    FromUp,
}

impl Origin {
    pub fn symbol(self) -> char {
        match self {
            Origin::None => '.',
            Origin::Diagonal => '\\',
            Origin::FromLeft => '-',
            Origin::FromUp => '|',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub score: i32,
    pub origin: Origin,
}

/// Score/origin grid of `(m + 1) x (n + 1)` cells stored row-major in one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Allocates the grid for a row sequence of length `m` and a column sequence of
    /// length `n`, seeding the first row and column with cumulative gap penalties.
    /// Interior cells are left at `Cell::default()` until the fill phase writes them.
    ///
    /// Fails with `ScoreOverflow` if a boundary score leaves the `i32` range.
    pub fn with_boundary(
        m: usize,
        n: usize,
        gap_penalty: i32,
        max_cells: Option<usize>,
    ) -> Result<Self, AlignerError> {
        if m > MAX_SEQUENCE_SIZE || n > MAX_SEQUENCE_SIZE {
            return Err(AlignerError::SequenceTooLarge(m.max(n)));
        }

        let rows = m + 1;
        let cols = n + 1;
        let len = rows
            .checked_mul(cols)
            .ok_or(AlignerError::SequenceTooLarge(m.max(n)))?;

        if let Some(limit) = max_cells {
            if len > limit {
                return Err(AlignerError::GridTooLarge { cells: len, limit });
            }
        }

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|err| AlignerError::MemoryError(format!("{len} cells: {err}")))?;
        cells.resize(len, Cell::default());

        let mut grid = Self { cells, rows, cols };
        for i in 1..rows {
            grid.set(i, 0, boundary(i, gap_penalty, (i, 0))?);
        }
        for j in 1..cols {
            grid.set(0, j, boundary(j, gap_penalty, (0, j))?);
        }

        debug!("allocated {rows}x{cols} grid ({len} cells)");
        Ok(grid)
    }

    /// Number of rows, `m + 1`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, `n + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.offset(row, col).map(|at| &self.cells[at])
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let at = self
            .offset(row, col)
            .unwrap_or_else(|| out_of_bounds(row, col, self.rows, self.cols));
        self.cells[at] = cell;
    }

    #[inline]
    pub fn score(&self, row: usize, col: usize) -> i32 {
        self[(row, col)].score
    }

    #[inline]
    pub fn origin(&self, row: usize, col: usize) -> Origin {
        self[(row, col)].origin
    }

    /// Score of the bottom-right cell, the global alignment score.
    pub fn final_score(&self) -> i32 {
        self.score(self.rows - 1, self.cols - 1)
    }

    /// Textual dump of one layer of the grid. `row_seq` labels the rows and
    /// `col_seq` the columns; they are expected to be the sequences the grid was
    /// built from.
    pub fn render<'a>(&'a self, row_seq: &'a [u8], col_seq: &'a [u8], layer: Layer) -> GridView<'a> {
        GridView {
            grid: self,
            row_seq,
            col_seq,
            layer,
        }
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (row, col): (usize, usize)) -> &Cell {
        self.get(row, col)
            .unwrap_or_else(|| out_of_bounds(row, col, self.rows, self.cols))
    }
}

fn boundary(steps: usize, gap_penalty: i32, at: (usize, usize)) -> Result<Cell, AlignerError> {
    // steps <= MAX_SEQUENCE_SIZE, so the product fits in i64.
    let score = steps as i64 * gap_penalty as i64;
    Ok(Cell {
        score: narrow_score(score, at)?,
        origin: Origin::None,
    })
}

/// Converts a score computed in `i64` back to the stored `i32`.
#[inline]
pub(crate) fn narrow_score(score: i64, (row, col): (usize, usize)) -> Result<i32, AlignerError> {
    i32::try_from(score).map_err(|_| AlignerError::ScoreOverflow { row, col, score })
}

#[cold]
fn out_of_bounds(row: usize, col: usize, rows: usize, cols: usize) -> ! {
    panic!("cell ({row}, {col}) outside {rows}x{cols} grid")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Score,
    Origin,
}

pub struct GridView<'a> {
    grid: &'a Grid,
    row_seq: &'a [u8],
    col_seq: &'a [u8],
    layer: Layer,
}

impl fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:8}", "")?;
        for &symbol in self.col_seq {
            write!(f, "{:>4}", symbol as char)?;
        }
        writeln!(f)?;

        for i in 0..self.grid.rows() {
            match i.checked_sub(1).and_then(|k| self.row_seq.get(k)) {
                Some(&symbol) => write!(f, "{:>4}", symbol as char)?,
                None => write!(f, "{:4}", "")?,
            }
            for j in 0..self.grid.cols() {
                let cell = &self.grid[(i, j)];
                match self.layer {
                    Layer::Score => write!(f, "{:>4}", cell.score)?,
                    Layer::Origin => write!(f, "{:>4}", cell.origin.symbol())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_cumulative_gap() {
        let grid = Grid::with_boundary(3, 5, -2, None).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 6);
        for i in 0..grid.rows() {
            assert_eq!(grid.score(i, 0), -2 * i as i32);
            assert_eq!(grid.origin(i, 0), Origin::None);
        }
        for j in 0..grid.cols() {
            assert_eq!(grid.score(0, j), -2 * j as i32);
            assert_eq!(grid.origin(0, j), Origin::None);
        }
    }

    #[test]
    fn positive_gap_boundary() {
        let grid = Grid::with_boundary(2, 0, 7, None).unwrap();
        assert_eq!(grid.cols(), 1);
        assert_eq!(grid.score(2, 0), 14);
        assert_eq!(grid.final_score(), 14);
    }

    #[test]
    fn empty_sequences() {
        let grid = Grid::with_boundary(0, 0, -2, None).unwrap();
        assert_eq!(grid[(0, 0)], Cell::default());
        assert_eq!(grid.final_score(), 0);
    }

    #[test]
    fn accessors_are_bounds_checked() {
        let grid = Grid::with_boundary(1, 2, -1, None).unwrap();
        assert!(grid.get(1, 2).is_some());
        assert!(grid.get(2, 0).is_none());
        // Would alias (1, 0) with unchecked row-major arithmetic.
        assert!(grid.get(0, 3).is_none());
    }

    #[test]
    #[should_panic(expected = "outside 2x3 grid")]
    fn index_out_of_bounds_panics() {
        let grid = Grid::with_boundary(1, 2, -1, None).unwrap();
        let _cell = grid[(0, 3)];
    }

    #[test]
    fn cell_limit() {
        let err = Grid::with_boundary(9, 9, -1, Some(99)).unwrap_err();
        assert!(matches!(
            err,
            AlignerError::GridTooLarge {
                cells: 100,
                limit: 99
            }
        ));
        assert!(Grid::with_boundary(9, 9, -1, Some(100)).is_ok());
    }

    #[test]
    fn boundary_overflow_is_an_error() {
        let err = Grid::with_boundary(3, 0, -1_000_000_000, None).unwrap_err();
        assert!(matches!(
            err,
            AlignerError::ScoreOverflow {
                row: 3,
                col: 0,
                score: -3_000_000_000
            }
        ));
        let grid = Grid::with_boundary(2, 0, -1_000_000_000, None).unwrap();
        assert_eq!(grid.final_score(), -2_000_000_000);
    }

    #[test]
    fn oversized_sequence() {
        let err = Grid::with_boundary(MAX_SEQUENCE_SIZE + 1, 0, -1, None).unwrap_err();
        assert!(matches!(err, AlignerError::SequenceTooLarge(_)));
    }

    #[test]
    fn render_boundary() {
        let grid = Grid::with_boundary(1, 2, -2, None).unwrap();
        let scores = grid.render(b"A", b"CG", Layer::Score).to_string();
        assert_eq!(
            scores,
            "           C   G\n       0  -2  -4\n   A  -2   0   0\n"
        );
        let origins = grid.render(b"A", b"CG", Layer::Origin).to_string();
        assert_eq!(
            origins,
            "           C   G\n       .   .   .\n   A   .   .   .\n"
        );
    }
}
