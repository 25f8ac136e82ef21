use log::trace;

use crate::config::DEFAULT_GAP_SYMBOL;
use crate::grid::{Grid, Origin};
use crate::scoring::AlignmentStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Column symbol against a gap in the row output.
    Insertion,
    /// Row symbol against a gap in the column output.
    Deletion,
}

impl TracebackOperation {
    pub fn symbol(self) -> char {
        match self {
            TracebackOperation::Match => '=',
            TracebackOperation::Mismatch => 'X',
            TracebackOperation::Insertion => 'I',
            TracebackOperation::Deletion => 'D',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub score: i32,
    pub aligned_row: Vec<u8>,
    pub aligned_col: Vec<u8>,
    pub operations: Vec<TracebackOperation>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn stats(&self) -> AlignmentStats {
        self.operations
            .iter()
            .fold(AlignmentStats::default(), |mut acc, op| {
                match op {
                    TracebackOperation::Match => acc.matches += 1,
                    TracebackOperation::Mismatch => acc.mismatches += 1,
                    TracebackOperation::Insertion | TracebackOperation::Deletion => acc.gaps += 1,
                }
                acc
            })
    }

    /// Run-length encoded operations, e.g. `3=1X2I`.
    pub fn cigar(&self) -> String {
        let mut out = String::new();
        let mut ops = self.operations.iter().peekable();
        while let Some(&op) = ops.next() {
            let mut run = 1;
            while ops.next_if_eq(&&op).is_some() {
                run += 1;
            }
            out.push_str(&run.to_string());
            out.push(op.symbol());
        }
        out
    }

    pub fn aligned_row_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_row).into_owned()
    }

    pub fn aligned_col_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_col).into_owned()
    }
}

/// Walks a filled grid from `(m, n)` back to `(0, 0)` and returns one optimal
/// alignment, using `-` as the gap marker.
///
/// `grid` must have been filled from exactly `row_seq` and `col_seq`.
///
/// # Panics
///
/// If the grid is not `(row_seq.len() + 1) x (col_seq.len() + 1)`.
pub fn traceback(grid: &Grid, row_seq: &[u8], col_seq: &[u8]) -> Alignment {
    traceback_with_gap(grid, row_seq, col_seq, DEFAULT_GAP_SYMBOL)
}

/// Same as [`traceback`] with a caller-chosen gap marker. If `gap` also occurs in
/// either sequence, stripping it from the output no longer recovers the input.
pub fn traceback_with_gap(grid: &Grid, row_seq: &[u8], col_seq: &[u8], gap: u8) -> Alignment {
    assert!(
        grid.rows() == row_seq.len() + 1 && grid.cols() == col_seq.len() + 1,
        "grid is {}x{} but the sequences need {}x{}",
        grid.rows(),
        grid.cols(),
        row_seq.len() + 1,
        col_seq.len() + 1
    );

    let mut i = row_seq.len();
    let mut j = col_seq.len();

    let capacity = i + j;
    let mut aligned_row = Vec::with_capacity(capacity);
    let mut aligned_col = Vec::with_capacity(capacity);
    let mut operations = Vec::with_capacity(capacity);

    loop {
        match grid.origin(i, j) {
            Origin::Diagonal => {
                let (a, b) = (row_seq[i - 1], col_seq[j - 1]);
                aligned_row.push(a);
                aligned_col.push(b);
                operations.push(if a == b {
                    TracebackOperation::Match
                } else {
                    TracebackOperation::Mismatch
                });
                i -= 1;
                j -= 1;
            }
            Origin::FromLeft => {
                aligned_row.push(gap);
                aligned_col.push(col_seq[j - 1]);
                operations.push(TracebackOperation::Insertion);
                j -= 1;
            }
            Origin::FromUp => {
                aligned_row.push(row_seq[i - 1]);
                aligned_col.push(gap);
                operations.push(TracebackOperation::Deletion);
                i -= 1;
            }
            Origin::None => break,
        }
    }

    // Stopped on the boundary: whatever is left of either sequence aligns to gaps.
    if i > 0 || j > 0 {
        trace!("flushing boundary from ({i}, {j})");
    }
    while i > 0 {
        aligned_row.push(row_seq[i - 1]);
        aligned_col.push(gap);
        operations.push(TracebackOperation::Deletion);
        i -= 1;
    }
    while j > 0 {
        aligned_row.push(gap);
        aligned_col.push(col_seq[j - 1]);
        operations.push(TracebackOperation::Insertion);
        j -= 1;
    }

    aligned_row.reverse();
    aligned_col.reverse();
    operations.reverse();

    Alignment {
        score: grid.final_score(),
        aligned_row,
        aligned_col,
        operations,
    }
}
