use std::io::{self, BufRead, Write};

use clap::Parser;
use log::info;
use nw_aligner::{
    traceback_with_gap, AlignerError, Alignment, Grid, Layer, NeedlemanWunsch, ScoringScheme,
    DEFAULT_GAP, DEFAULT_GAP_SYMBOL, DEFAULT_MATCH, DEFAULT_MISMATCH,
};

/// Global pairwise alignment with linear gap penalties (Needleman-Wunsch).
#[derive(Parser, Debug)]
#[command(name = "nw-align", version)]
struct Args {
    /// First sequence, laid out across the grid columns. Read from stdin when omitted.
    seq1: Option<String>,

    /// Second sequence, laid out down the grid rows. Read from stdin when omitted.
    seq2: Option<String>,

    /// Score for aligning a symbol against a gap.
    #[arg(long, default_value_t = DEFAULT_GAP, allow_negative_numbers = true)]
    gap: i32,

    /// Score for two equal symbols.
    #[arg(long = "match", default_value_t = DEFAULT_MATCH, allow_negative_numbers = true)]
    match_score: i32,

    /// Score for two different symbols.
    #[arg(long, default_value_t = DEFAULT_MISMATCH, allow_negative_numbers = true)]
    mismatch: i32,

    /// Gap marker used in the printed alignment. Must not occur in either sequence.
    #[arg(long, default_value_t = DEFAULT_GAP_SYMBOL as char)]
    gap_symbol: char,

    /// Refuse to allocate grids with more cells than this.
    #[arg(long)]
    max_cells: Option<usize>,

    /// Print the score and direction grids. Not recommended for long sequences.
    #[arg(long)]
    show_grid: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (seq1, seq2) = match (args.seq1, args.seq2) {
        (Some(seq1), Some(seq2)) => (seq1, seq2),
        (seq1, seq2) => {
            let stdin = io::stdin();
            read_sequences(stdin.lock(), &mut io::stdout(), seq1, seq2)?
        }
    };

    let gap_symbol = u8::try_from(args.gap_symbol).map_err(|_| {
        AlignerError::InvalidInput(format!("gap symbol {:?} is not ASCII", args.gap_symbol))
    })?;
    let scoring = ScoringScheme::new(args.gap, args.match_score, args.mismatch);
    let mut aligner = NeedlemanWunsch::default()
        .with_scoring(scoring)
        .with_gap_symbol(gap_symbol)?;
    if let Some(max_cells) = args.max_cells {
        aligner = aligner.with_max_cells(max_cells);
    }

    let stdout = io::stdout();
    run(&aligner, &seq1, &seq2, args.show_grid, &mut stdout.lock())?;
    Ok(())
}

/// Aligns `seq1` (grid columns) against `seq2` (grid rows) and writes the report.
fn run(
    aligner: &NeedlemanWunsch,
    seq1: &str,
    seq2: &str,
    show_grid: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let col_seq = ascii_sequence(seq1)?;
    let row_seq = ascii_sequence(seq2)?;

    let gap_symbol = aligner.config().gap_symbol;
    if col_seq.contains(&gap_symbol) || row_seq.contains(&gap_symbol) {
        return Err(AlignerError::InvalidInput(format!(
            "gap symbol {:?} occurs in the input sequences",
            gap_symbol as char
        ))
        .into());
    }

    let scoring = aligner.scoring();
    info!(
        "aligning {} x {} symbols, gap = {}, match = {}, mismatch = {}",
        row_seq.len(),
        col_seq.len(),
        scoring.gap_penalty,
        scoring.match_score,
        scoring.mismatch_score
    );

    let grid = aligner.fill(row_seq, col_seq)?;
    let alignment = traceback_with_gap(&grid, row_seq, col_seq, gap_symbol);
    info!("alignment {}", alignment.cigar());

    let grid = show_grid.then_some((&grid, row_seq, col_seq));
    write_report(out, grid, &alignment)?;
    Ok(())
}

/// Writes the optional grid dump followed by the alignment and its score.
fn write_report(
    out: &mut impl Write,
    grid: Option<(&Grid, &[u8], &[u8])>,
    alignment: &Alignment,
) -> io::Result<()> {
    if let Some((grid, row_seq, col_seq)) = grid {
        write!(out, "{}", grid.render(row_seq, col_seq, Layer::Score))?;
        writeln!(out, "{}", "-".repeat(40))?;
        write!(out, "{}", grid.render(row_seq, col_seq, Layer::Origin))?;
    }

    writeln!(out)?;
    writeln!(out, "ALIGNMENT:")?;
    writeln!(out, "{}", alignment.aligned_row_str())?;
    writeln!(out, "{}", alignment.aligned_col_str())?;
    writeln!(out, "FINAL SCORE: {}", alignment.score)?;
    out.flush()
}

fn ascii_sequence(seq: &str) -> Result<&[u8], AlignerError> {
    if !seq.is_ascii() {
        return Err(AlignerError::InvalidInput(format!(
            "sequence {seq:?} contains non-ASCII symbols"
        )));
    }
    Ok(seq.as_bytes())
}

/// Prompts for whichever sequence was not given on the command line. Each answer
/// is the first whitespace-separated token of the next non-blank line.
fn read_sequences(
    input: impl BufRead,
    prompts: &mut impl Write,
    seq1: Option<String>,
    seq2: Option<String>,
) -> io::Result<(String, String)> {
    let mut lines = input.lines();
    let mut prompt = |label: &str| -> io::Result<String> {
        write!(prompts, "Enter {label}: ")?;
        prompts.flush()?;
        for line in lines.by_ref() {
            if let Some(token) = line?.split_whitespace().next() {
                return Ok(token.to_string());
            }
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("stdin closed before {label} was read"),
        ))
    };

    let seq1 = match seq1 {
        Some(seq) => seq,
        None => prompt("sequence 1")?,
    };
    let seq2 = match seq2 {
        Some(seq) => seq,
        None => prompt("sequence 2")?,
    };
    Ok((seq1, seq2))
}
