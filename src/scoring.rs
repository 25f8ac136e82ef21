use crate::{DEFAULT_GAP, DEFAULT_MATCH, DEFAULT_MISMATCH};

/// Linear gap scoring: every symbol aligned against a gap costs `gap_penalty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringScheme {
    pub gap_penalty: i32,
    pub match_score: i32,
    pub mismatch_score: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            gap_penalty: DEFAULT_GAP,
            match_score: DEFAULT_MATCH,
            mismatch_score: DEFAULT_MISMATCH,
        }
    }
}

impl ScoringScheme {
    pub fn new(gap_penalty: i32, match_score: i32, mismatch_score: i32) -> Self {
        Self {
            gap_penalty,
            match_score,
            mismatch_score,
        }
    }

    /// Score for aligning `a` against `b`.
    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub gaps: u32,
}

impl AlignmentStats {
    /// Columns of the alignment, gaps included.
    pub fn length(&self) -> u32 {
        self.matches + self.mismatches + self.gaps
    }

    /// Fraction of alignment columns that are matches. An empty alignment has identity 0.
    pub fn identity(&self) -> f64 {
        match self.length() {
            0 => 0.0,
            len => self.matches as f64 / len as f64,
        }
    }

    /// Recomputes the score these operations earn under `scoring`.
    pub fn score(&self, scoring: &ScoringScheme) -> i64 {
        self.matches as i64 * scoring.match_score as i64
            + self.mismatches as i64 * scoring.mismatch_score as i64
            + self.gaps as i64 * scoring.gap_penalty as i64
    }
}
