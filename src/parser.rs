/**
This module parses the per-fold transcript report into paired ground-truth/predicted label
sequences. The report starts with a single summary line carrying the word error counts, followed
by repeating four-line utterance blocks: a header line, a ground-truth line, a separator line and
a predicted line. The truth and predicted lines are `;`-separated word tokens.
*/
use crate::config::EvalConfig;
use crate::labels::{Label, LabelParsingError, LabelSeq, UnknownTokenPolicy};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// An utterance header starts with this marker and has exactly `HEADER_FIELD_COUNT` whitespace
/// delimited fields. A line matching only one of the two conditions is treated as content.
const UTTERANCE_MARKER: char = 'P';
const HEADER_FIELD_COUNT: usize = 14;

/// Separator between word tokens on the truth and predicted lines.
const TOKEN_SEPARATOR: char = ';';

/// Positions of the word-error fields on the summary line. The total field carries one trailing
/// punctuation character that must be stripped.
const SUMMARY_WER_FIELD: usize = 1;
const SUMMARY_ERRORS_FIELD: usize = 3;
const SUMMARY_TOTAL_FIELD: usize = 5;

/// The word-error counts of a single fold, read from the first line of its report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WerSummary {
    /// Word error rate as reported upstream. Carried through but recomputed from the counts when
    /// aggregating over folds.
    pub wer: f64,
    /// Number of erroneous reference words.
    pub errors: u64,
    /// Total number of reference words.
    pub total: u64,
}

/// The parse result of one fold report: the word-error counts and the paired label sequences, one
/// entry per utterance in file order. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldResult {
    pub summary: WerSummary,
    pub true_sequences: Vec<LabelSeq>,
    pub pred_sequences: Vec<LabelSeq>,
}

/// Error type for a fold report that could not be parsed. Any of these aborts the fold: a fold
/// with no usable result would corrupt the corpus aggregates.
#[derive(Debug)]
pub enum ParseError {
    /// The report is empty. The summary line is mandatory.
    MissingSummary,
    /// The summary line exists but its error/total fields could not be read.
    MalformedSummary(String),
    /// A word token carried an unknown tag and the policy is `UnknownTokenPolicy::Error`.
    UnknownTag(LabelParsingError),
    Io(io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSummary => write!(f, "The report contains no summary line"),
            Self::MalformedSummary(line) => {
                write!(f, "Could not read the error counts from the summary line ({})", line)
            }
            Self::UnknownTag(err) => Display::fmt(err, f),
            Self::Io(err) => Display::fmt(err, f),
        }
    }
}
impl Error for ParseError {}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LabelParsingError> for ParseError {
    fn from(value: LabelParsingError) -> Self {
        Self::UnknownTag(value)
    }
}

/// Parses the fold report at `path`. The file handle is released before returning, so folds can
/// be processed one after the other without holding more than one handle.
pub fn parse_fold_report<P: AsRef<Path>>(
    path: P,
    config: &EvalConfig,
) -> Result<FoldResult, ParseError> {
    let file = File::open(path)?;
    parse_fold_reader(BufReader::new(file), config)
}

/// Parses a fold report from any buffered reader. See the module documentation for the layout.
pub fn parse_fold_reader<R: BufRead>(
    reader: R,
    config: &EvalConfig,
) -> Result<FoldResult, ParseError> {
    let policy = config.unknown_tokens();
    let mut lines = reader.lines();
    let summary_line = lines.next().ok_or(ParseError::MissingSummary)??;
    let summary = parse_summary_line(&summary_line)?;

    let mut true_sequences = Vec::new();
    let mut pred_sequences = Vec::new();
    let mut state = BlockState::AwaitingHeader;
    for line in lines {
        let line = line?;
        let (next_state, completed) = state.advance(line.trim(), policy)?;
        if let Some((truth, pred)) = completed {
            true_sequences.push(truth);
            pred_sequences.push(pred);
        }
        state = next_state;
    }
    if !matches!(state, BlockState::AwaitingHeader) {
        warn!("fold report ended inside an utterance block; the partial block was dropped");
    }
    Ok(FoldResult {
        summary,
        true_sequences,
        pred_sequences,
    })
}

/// Cursor over the four-line utterance blocks. The ground-truth labels of a partially read block
/// live inside the state itself, so a block can only be emitted once both lines were seen.
#[derive(Debug, Clone, PartialEq)]
enum BlockState {
    AwaitingHeader,
    ExpectTruth,
    ExpectSeparator(LabelSeq),
    ExpectPred(LabelSeq),
}

type Transition = (BlockState, Option<(LabelSeq, LabelSeq)>);

impl BlockState {
    /// Consumes one line of the report. Returns the next state and, when a block just finished,
    /// its completed (truth, predicted) pair. A header encountered mid-block abandons the partial
    /// block with a warning and restarts from that header; label sequences are independent per
    /// utterance, so one malformed block never aborts the fold.
    fn advance(self, line: &str, policy: UnknownTokenPolicy) -> Result<Transition, ParseError> {
        let header = is_utterance_header(line);
        let next = match self {
            BlockState::AwaitingHeader => {
                if header {
                    (BlockState::ExpectTruth, None)
                } else {
                    (BlockState::AwaitingHeader, None)
                }
            }
            BlockState::ExpectTruth => {
                if header {
                    warn!("utterance header found where a ground-truth line was expected; skipping the previous block");
                    (BlockState::ExpectTruth, None)
                } else {
                    (
                        BlockState::ExpectSeparator(parse_label_line(line, policy)?),
                        None,
                    )
                }
            }
            BlockState::ExpectSeparator(truth) => {
                if header {
                    warn!("utterance header found where a separator line was expected; skipping the previous block");
                    (BlockState::ExpectTruth, None)
                } else {
                    // The separator content itself is ignored.
                    (BlockState::ExpectPred(truth), None)
                }
            }
            BlockState::ExpectPred(truth) => {
                if header {
                    warn!("utterance header found where a predicted line was expected; skipping the previous block");
                    (BlockState::ExpectTruth, None)
                } else {
                    let pred = parse_label_line(line, policy)?;
                    (BlockState::AwaitingHeader, Some((truth, pred)))
                }
            }
        };
        Ok(next)
    }
}

fn is_utterance_header(line: &str) -> bool {
    line.starts_with(UTTERANCE_MARKER) && line.split_whitespace().count() == HEADER_FIELD_COUNT
}

fn parse_summary_line(line: &str) -> Result<WerSummary, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let malformed = || ParseError::MalformedSummary(String::from(line));
    let wer = fields
        .get(SUMMARY_WER_FIELD)
        .and_then(|f| f.parse::<f64>().ok())
        .ok_or_else(malformed)?;
    let errors = fields
        .get(SUMMARY_ERRORS_FIELD)
        .and_then(|f| f.parse::<u64>().ok())
        .ok_or_else(malformed)?;
    let total = fields
        .get(SUMMARY_TOTAL_FIELD)
        .and_then(|f| strip_last_char(f))
        .and_then(|f| f.parse::<u64>().ok())
        .ok_or_else(malformed)?;
    Ok(WerSummary { wer, errors, total })
}

/// The total field of the summary line ends with a unit marker that is not part of the number.
fn strip_last_char(field: &str) -> Option<&str> {
    let mut chars = field.chars();
    chars.next_back()?;
    Some(chars.as_str())
}

fn parse_label_line(line: &str, policy: UnknownTokenPolicy) -> Result<LabelSeq, ParseError> {
    line.split(TOKEN_SEPARATOR)
        .map(|token| Label::from_token(token.trim(), policy).map_err(ParseError::from))
        .collect()
}
