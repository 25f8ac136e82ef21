use crate::scoring::ScoringScheme;

pub const DEFAULT_GAP_SYMBOL: u8 = b'-';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignerConfig {
    pub scoring: ScoringScheme,
    /// Marker written opposite a symbol that is aligned to nothing.
    pub gap_symbol: u8,
    /// Upper bound on `(m + 1) * (n + 1)`; `None` leaves it to the allocator.
    pub max_cells: Option<usize>,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringScheme::default(),
            gap_symbol: DEFAULT_GAP_SYMBOL,
            max_cells: None,
        }
    }
}
