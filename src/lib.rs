/*!
This library scores the output of a speech recognition model that jointly transcribes speech and
tags words with paraphasia types (clinically meaningful speech errors). It consumes the per-fold
text reports pairing ground-truth and predicted word sequences, and computes position-tolerant
precision/recall/F1 together with a temporal-distance metric over the full cross-validation
corpus.

# LABELS
Each word position carries exactly one label from a small closed vocabulary:
* `c`: a correctly produced word (also used for the `<eps>` alignment placeholder and for
    untagged words).
* `p`: phonemic paraphasia.
* `n`: neologistic paraphasia.
* `s`: semantic paraphasia.

Labels are case-insensitive on input and normalized at parse time.

# Terminology
* An utterance is one transcribed sentence; its label sequence has one label per word position.
* Ground-truth and predicted sequences of the same utterance are positionally aligned by the
    upstream aligner; the scorers trust that correspondence and never re-align.
* A fold is one partition of leave-one-subject-out cross-validation, with its own report file.
* The tolerance `n` is the half-width of the neighborhood within which a label match is accepted
    despite positional misalignment; `n = 0` is exact matching.
* The temporal distance sums, in both the true-to-predicted and predicted-to-true directions, the
    distance from each error label to its nearest identical label in the opposite sequence.
*/

mod config;
mod corpus;
mod labels;
mod metrics;
mod parser;
mod reporter;

// The public api starts here
pub use config::{EvalConfig, EvalConfigBuilder, DEFAULT_TOLERANCES};

pub use corpus::CorpusResult;

pub use labels::{
    Label, LabelParsingError, LabelSeq, ParaphasiaTag, UnknownTokenPolicy, ALIGNMENT_PLACEHOLDER,
};

pub use metrics::{
    temporal_distance, time_tolerant_scores, utterance_temporal_distance, worst_case_distance,
    ComputationError, FloatExt, InconsistentLengthError, TolerantScores,
};

pub use parser::{parse_fold_report, parse_fold_reader, FoldResult, ParseError, WerSummary};

pub use reporter::{Reporter, ToleranceEntry};

use std::error::Error;
use std::fmt::Display;
use std::path::Path;

/// Error type of the whole evaluation run: either a fold report could not be parsed or a score
/// could not be computed. Both are fatal; a partial summary would be worse than none.
#[derive(Debug)]
pub enum EvaluationError {
    Parse(ParseError),
    Computation(ComputationError),
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => Display::fmt(err, f),
            Self::Computation(err) => Display::fmt(err, f),
        }
    }
}
impl Error for EvaluationError {}

impl From<ParseError> for EvaluationError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<ComputationError> for EvaluationError {
    fn from(value: ComputationError) -> Self {
        Self::Computation(value)
    }
}

/// Main entrypoint of the paraev library. Parses every fold report in the given order (callers
/// pass the paths in increasing fold index for reproducible output), reduces them into a single
/// corpus and scores it. Any unreadable or malformed report aborts the run.
///
/// * `paths`: one report path per fold
/// * `config`: tolerances and parsing policy
pub fn evaluate_reports<P: AsRef<Path>>(
    paths: &[P],
    config: &EvalConfig,
) -> Result<Reporter, EvaluationError> {
    let folds = paths
        .iter()
        .map(|path| parse_fold_report(path, config))
        .collect::<Result<Vec<_>, _>>()?;
    let corpus: CorpusResult = folds.into_iter().collect();
    evaluate_corpus(&corpus, config)
}

/// Scores an already assembled corpus: the tolerant scores at every configured tolerance and the
/// temporal distance once.
///
/// # Example
/// ```rust
/// use paraev::{evaluate_corpus, CorpusResult, EvalConfig, FoldResult, Label, ParaphasiaTag, WerSummary};
///
/// let labels = vec![vec![
///     Label::Correct,
///     Label::Paraphasia(ParaphasiaTag::Phonemic),
///     Label::Correct,
/// ]];
/// let fold = FoldResult {
///     summary: WerSummary { wer: 10.0, errors: 1, total: 10 },
///     true_sequences: labels.clone(),
///     pred_sequences: labels,
/// };
/// let corpus: CorpusResult = vec![fold].into_iter().collect();
///
/// let reporter = evaluate_corpus(&corpus, &EvalConfig::default()).unwrap();
/// let expected_report = "wer: 0.1
/// Time Tolerant Recall:
/// 0: 1
/// 1: 1
/// 2: 1
///
/// Time Tolerant F1:
/// 0: 1
/// 1: 1
/// 2: 1
///
/// TD per utt: 0\n";
///
/// assert_eq!(expected_report, reporter.to_string());
/// ```
pub fn evaluate_corpus(
    corpus: &CorpusResult,
    config: &EvalConfig,
) -> Result<Reporter, EvaluationError> {
    let mut entries = Vec::with_capacity(config.tolerances().len());
    for &tolerance in config.tolerances() {
        let scores: TolerantScores<f64> =
            time_tolerant_scores(corpus.true_sequences(), corpus.pred_sequences(), tolerance)?;
        entries.push(ToleranceEntry {
            tolerance,
            recall: scores.recall,
            f1: scores.f1,
        });
    }
    let td_per_utt = temporal_distance(corpus.true_sequences(), corpus.pred_sequences())?;
    Ok(Reporter::new(corpus.wer(), entries, td_per_utt))
}
