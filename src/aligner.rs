use std::time::Instant;

use log::debug;

use crate::config::AlignerConfig;
use crate::grid::{narrow_score, Cell, Grid, Origin};
use crate::scoring::ScoringScheme;
use crate::traceback::{traceback_with_gap, Alignment};
use crate::AlignerError;

/// Builds the grid for `row_seq` x `col_seq` and fills it.
pub fn build_and_fill(
    row_seq: &[u8],
    col_seq: &[u8],
    scoring: &ScoringScheme,
) -> Result<Grid, AlignerError> {
    let mut grid = Grid::with_boundary(row_seq.len(), col_seq.len(), scoring.gap_penalty, None)?;
    fill(&mut grid, row_seq, col_seq, scoring)?;
    Ok(grid)
}

/// Writes every interior cell in row-major order, so `(i-1, j-1)`, `(i, j-1)` and
/// `(i-1, j)` are final before `(i, j)` is computed.
///
/// Ties resolve Diagonal, then FromLeft, then FromUp.
///
/// Candidates are compared in `i64`; only the chosen score has to fit in `i32`,
/// otherwise the fill stops with `ScoreOverflow`.
pub(crate) fn fill(
    grid: &mut Grid,
    row_seq: &[u8],
    col_seq: &[u8],
    scoring: &ScoringScheme,
) -> Result<(), AlignerError> {
    debug_assert_eq!(grid.rows(), row_seq.len() + 1);
    debug_assert_eq!(grid.cols(), col_seq.len() + 1);

    let gap = scoring.gap_penalty as i64;
    for (i, &a) in row_seq.iter().enumerate().map(|(k, a)| (k + 1, a)) {
        for (j, &b) in col_seq.iter().enumerate().map(|(k, b)| (k + 1, b)) {
            let diagonal = grid.score(i - 1, j - 1) as i64 + scoring.substitution(a, b) as i64;
            let left = grid.score(i, j - 1) as i64 + gap;
            let up = grid.score(i - 1, j) as i64 + gap;

            let (score, origin) = if diagonal >= left && diagonal >= up {
                (diagonal, Origin::Diagonal)
            } else if left >= diagonal && left >= up {
                (left, Origin::FromLeft)
            } else {
                (up, Origin::FromUp)
            };
            grid.set(
                i,
                j,
                Cell {
                    score: narrow_score(score, (i, j))?,
                    origin,
                },
            );
        }
    }
    Ok(())
}

/// Global aligner with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct NeedlemanWunsch {
    config: AlignerConfig,
}

impl NeedlemanWunsch {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    pub fn with_scoring(mut self, scoring: ScoringScheme) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// The marker should not occur in the sequences being aligned, or the gaps in
    /// the output become indistinguishable from symbols.
    pub fn with_gap_symbol(mut self, gap_symbol: u8) -> Result<Self, AlignerError> {
        if !gap_symbol.is_ascii_graphic() {
            return Err(AlignerError::InvalidInput(format!(
                "gap symbol must be a printable ASCII character, got {gap_symbol:#04x}"
            )));
        }
        self.config.gap_symbol = gap_symbol;
        Ok(self)
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.config.max_cells = Some(max_cells);
        self
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn scoring(&self) -> &ScoringScheme {
        &self.config.scoring
    }

    /// Allocates and fills the grid, honouring the configured cell limit.
    pub fn fill(&self, row_seq: &[u8], col_seq: &[u8]) -> Result<Grid, AlignerError> {
        let scoring = &self.config.scoring;
        let start_time = Instant::now();

        let mut grid = Grid::with_boundary(
            row_seq.len(),
            col_seq.len(),
            scoring.gap_penalty,
            self.config.max_cells,
        )?;
        fill(&mut grid, row_seq, col_seq, scoring)?;

        debug!(
            "filled {}x{} grid in {:?}, score {}",
            grid.rows(),
            grid.cols(),
            start_time.elapsed(),
            grid.final_score()
        );
        Ok(grid)
    }

    /// Fills the grid and traces back one optimal alignment.
    pub fn align(&self, row_seq: &[u8], col_seq: &[u8]) -> Result<Alignment, AlignerError> {
        let grid = self.fill(row_seq, col_seq)?;
        Ok(traceback_with_gap(
            &grid,
            row_seq,
            col_seq,
            self.config.gap_symbol,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(grid: &Grid) -> Vec<Vec<i32>> {
        (0..grid.rows())
            .map(|i| (0..grid.cols()).map(|j| grid.score(i, j)).collect())
            .collect()
    }

    #[test]
    fn gattaca_score_table() {
        let grid = build_and_fill(b"GATTACA", b"GCATGCU", &ScoringScheme::default()).unwrap();
        let expected = vec![
            vec![0, -2, -4, -6, -8, -10, -12, -14],
            vec![-2, 1, -1, -3, -5, -7, -9, -11],
            vec![-4, -1, 0, 0, -2, -4, -6, -8],
            vec![-6, -3, -2, -1, 1, -1, -3, -5],
            vec![-8, -5, -4, -3, 0, 0, -2, -4],
            vec![-10, -7, -6, -3, -2, -1, -1, -3],
            vec![-12, -9, -6, -5, -4, -3, 0, -2],
            vec![-14, -11, -8, -5, -6, -5, -2, -1],
        ];
        assert_eq!(scores(&grid), expected);
        assert_eq!(grid.final_score(), -1);
    }

    #[test]
    fn diagonal_wins_ties() {
        // Every candidate for (1, 1) scores 0.
        let scoring = ScoringScheme::new(0, 0, 0);
        let grid = build_and_fill(b"A", b"A", &scoring).unwrap();
        assert_eq!(grid.origin(1, 1), Origin::Diagonal);
    }

    #[test]
    fn left_beats_up_on_ties() {
        // (1, 1): diag = 0 - 5, left = -1 - 1, up = -1 - 1.
        let scoring = ScoringScheme::new(-1, 1, -5);
        let grid = build_and_fill(b"A", b"C", &scoring).unwrap();
        assert_eq!(
            grid[(1, 1)],
            Cell {
                score: -2,
                origin: Origin::FromLeft
            }
        );
    }

    #[test]
    fn up_when_strictly_best() {
        // (2, 1): diag = -1 - 1, left = -2 - 1, up = 1 - 1.
        let scoring = ScoringScheme::new(-1, 1, -1);
        let grid = build_and_fill(b"AC", b"A", &scoring).unwrap();
        assert_eq!(
            grid[(2, 1)],
            Cell {
                score: 0,
                origin: Origin::FromUp
            }
        );
    }

    #[test]
    fn gap_penalty_overflow_is_an_error() {
        let scoring = ScoringScheme::new(-1_000_000_000, 1, -1);
        assert!(matches!(
            build_and_fill(b"AAA", b"", &scoring),
            Err(AlignerError::ScoreOverflow { row: 3, col: 0, .. })
        ));
        // Two gaps still fit, and the interior never has to pay for a third.
        let grid = build_and_fill(b"AA", b"AA", &scoring).unwrap();
        assert_eq!(grid.score(2, 0), -2_000_000_000);
        assert_eq!(grid.final_score(), 2);
    }

    #[test]
    fn match_score_overflow_is_an_error() {
        let scoring = ScoringScheme::new(-1, i32::MAX, -1);
        let err = build_and_fill(b"AA", b"AA", &scoring).unwrap_err();
        assert!(matches!(
            err,
            AlignerError::ScoreOverflow {
                row: 2,
                col: 2,
                ..
            }
        ));
    }

    #[test]
    fn overflowing_candidate_that_loses_is_fine() {
        // left and up for (1, 1) are i32::MIN * 2, far outside i32, but diagonal wins.
        let scoring = ScoringScheme::new(i32::MIN, 1, -1);
        let grid = build_and_fill(b"A", b"A", &scoring).unwrap();
        assert_eq!(
            grid[(1, 1)],
            Cell {
                score: 1,
                origin: Origin::Diagonal
            }
        );
    }

    #[test]
    fn empty_inputs() {
        let grid = build_and_fill(b"", b"ABC", &ScoringScheme::default()).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (1, 4));
        assert_eq!(grid.final_score(), -6);

        let grid = build_and_fill(b"", b"", &ScoringScheme::default()).unwrap();
        assert_eq!(grid.final_score(), 0);
    }

    #[test]
    fn aligner_respects_cell_limit() {
        let aligner = NeedlemanWunsch::default().with_max_cells(8);
        assert!(matches!(
            aligner.align(b"ACG", b"ACG"),
            Err(AlignerError::GridTooLarge { cells: 16, limit: 8 })
        ));
        assert!(aligner.align(b"A", b"ACG").is_ok());
    }

    #[test]
    fn rejects_unprintable_gap_symbol() {
        assert!(NeedlemanWunsch::default().with_gap_symbol(b'\n').is_err());
        assert!(NeedlemanWunsch::default().with_gap_symbol(b' ').is_err());
        let aligner = NeedlemanWunsch::default().with_gap_symbol(b'_').unwrap();
        assert_eq!(aligner.config().gap_symbol, b'_');
    }
}
