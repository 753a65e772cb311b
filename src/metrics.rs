/**
This module computes the two scores of the evaluation: the time tolerant precision/recall/F1 of a
ground-truth corpus against a predicted corpus, and the temporal distance, a positional-mismatch
penalty summed over both matching directions.

Both scorers trust the positional correspondence produced by the upstream aligner: index `i` of a
ground-truth sequence corresponds to index `i` of its paired predicted sequence. They never
re-align.
*/
use crate::labels::{error_label_set, Label, LabelSeq};
use itertools::izip;
use ndarray::Array1;
use num::{Float, NumCast};
use std::cmp;
use std::error::Error;
use std::fmt::{Debug, Display};

/// Internal extension trait for Num's Float trait.
pub trait FloatExt: Float + Debug {}

impl<T: Float + Debug> FloatExt for T {}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Error type to represent when the two corpora do not hold the same number of utterances.
pub struct InconsistentLengthError(usize, usize);

impl Display for InconsistentLengthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Inconsistent number of utterances. The true corpus has {}, the predicted corpus has {}",
            self.0, self.1
        )
    }
}
impl Error for InconsistentLengthError {}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Enum error encompassing the failures that can happen when computing the scores.
pub enum ComputationError {
    InconsistentLength(InconsistentLengthError),
    /// The corpus holds no utterance at all. A mean over zero utterances is undefined and an
    /// empty corpus indicates an upstream pipeline failure, so this fails loudly.
    EmptyCorpus,
}

impl Display for ComputationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InconsistentLength(err) => Display::fmt(err, f),
            Self::EmptyCorpus => write!(f, "The corpus contains no utterance"),
        }
    }
}
impl Error for ComputationError {}

impl From<InconsistentLengthError> for ComputationError {
    fn from(value: InconsistentLengthError) -> Self {
        Self::InconsistentLength(value)
    }
}

fn check_consistent_length(
    true_corpus: &[LabelSeq],
    pred_corpus: &[LabelSeq],
) -> Result<(), InconsistentLengthError> {
    if true_corpus.len() != pred_corpus.len() {
        return Err(InconsistentLengthError(
            true_corpus.len(),
            pred_corpus.len(),
        ));
    }
    Ok(())
}

/// The time tolerant scores of a corpus at a single tolerance, with the raw counts they were
/// computed from. All three metrics are in [0, 1] and are exactly 0 when every count is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TolerantScores<F: FloatExt> {
    pub tolerance: usize,
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub precision: F,
    pub recall: F,
    pub f1: F,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct MatchCounts {
    true_positives: u64,
    false_positives: u64,
    false_negatives: u64,
}

/// Computes the time tolerant precision, recall and F1 of the paired corpora at the given
/// tolerance. A ground-truth error label counts as a true positive if the same label appears
/// anywhere in the predicted window `[i - n, i + n]`; the position of the match within the window
/// is irrelevant (the temporal distance scores that separately). A tolerance of 0 is exact
/// positional matching.
///
/// * `true_corpus`: ground-truth label sequences, one per utterance
/// * `pred_corpus`: predicted label sequences, positionally paired with `true_corpus`
/// * `tolerance`: the neighborhood half-width `n`
pub fn time_tolerant_scores<F: FloatExt>(
    true_corpus: &[LabelSeq],
    pred_corpus: &[LabelSeq],
    tolerance: usize,
) -> Result<TolerantScores<F>, ComputationError> {
    check_consistent_length(true_corpus, pred_corpus)?;
    let counts = count_tolerant_matches(true_corpus, pred_corpus, tolerance);
    let tp = cast_count::<F>(counts.true_positives);
    let precision = zero_safe_divide(
        tp,
        cast_count::<F>(counts.true_positives + counts.false_positives),
    );
    let recall = zero_safe_divide(
        tp,
        cast_count::<F>(counts.true_positives + counts.false_negatives),
    );
    let two = F::one() + F::one();
    let f1 = zero_safe_divide(two * precision * recall, precision + recall);
    Ok(TolerantScores {
        tolerance,
        true_positives: counts.true_positives,
        false_positives: counts.false_positives,
        false_negatives: counts.false_negatives,
        precision,
        recall,
        f1,
    })
}

fn count_tolerant_matches(
    true_corpus: &[LabelSeq],
    pred_corpus: &[LabelSeq],
    tolerance: usize,
) -> MatchCounts {
    let error_labels = error_label_set();
    let mut counts = MatchCounts::default();
    for (utt_true, utt_pred) in izip!(true_corpus, pred_corpus) {
        // Paired positions only; a trailing surplus on either side has no counterpart.
        let span = cmp::min(utt_true.len(), utt_pred.len());
        for (i, true_label) in utt_true.iter().take(span).enumerate() {
            let lower = i.saturating_sub(tolerance);
            let upper = cmp::min(i + tolerance + 1, utt_pred.len());
            let neighborhood = &utt_pred[lower..upper];
            if true_label.is_paraphasia() {
                if neighborhood.contains(true_label) {
                    counts.true_positives += 1;
                } else {
                    counts.false_negatives += 1;
                }
            } else if neighborhood.iter().any(|l| error_labels.contains(l)) {
                counts.false_positives += 1;
            }
        }
    }
    counts
}

/// Division where a zero denominator yields 0 instead of NaN or infinity. A metric of 0 is the
/// "no signal" convention of this crate; consumers must treat it as genuinely zero.
fn zero_safe_divide<F: FloatExt>(numerator: F, denominator: F) -> F {
    if denominator == F::zero() {
        F::zero()
    } else {
        numerator / denominator
    }
}

fn cast_count<F: FloatExt>(count: u64) -> F {
    <F as NumCast>::from(count).expect("Casting a count to a float should always be possible")
}

/// The fallback cost of an error label at `position` with no same-label match in the opposite
/// sequence: the maximum distance reachable from `position` inside a sequence of `length`
/// positions. A penalty, not an infinity. `position` must be smaller than `length`.
pub fn worst_case_distance(position: usize, length: usize) -> usize {
    debug_assert!(position < length);
    cmp::max(position, length - position)
}

/// The temporal distance of a single utterance: for every error label of the ground-truth
/// sequence, the distance to the nearest identical label in the predicted sequence (true to
/// predicted cost), plus the symmetric predicted to true cost. Unmatched labels cost
/// `worst_case_distance`. The two sequences may differ in length.
///
/// The score is not normalized by utterance length or error count: longer utterances and
/// utterances with more errors structurally produce larger scores.
pub fn utterance_temporal_distance(true_labels: &[Label], predicted_labels: &[Label]) -> u64 {
    directed_cost(true_labels, predicted_labels) + directed_cost(predicted_labels, true_labels)
}

fn directed_cost(from: &[Label], to: &[Label]) -> u64 {
    let mut cost = 0u64;
    for (i, label) in from.iter().enumerate() {
        if !label.is_paraphasia() {
            continue;
        }
        let mut min_distance = worst_case_distance(i, from.len());
        for (j, other) in to.iter().enumerate() {
            if other == label {
                min_distance = cmp::min(min_distance, i.abs_diff(j));
            }
        }
        cost += min_distance as u64;
    }
    cost
}

/// Computes the corpus temporal distance: the arithmetic mean of the per-utterance temporal
/// distances. Utterances, not folds, are the unit of averaging. An empty corpus is an error.
pub fn temporal_distance(
    true_corpus: &[LabelSeq],
    pred_corpus: &[LabelSeq],
) -> Result<f64, ComputationError> {
    check_consistent_length(true_corpus, pred_corpus)?;
    let per_utterance: Array1<f64> = izip!(true_corpus, pred_corpus)
        .map(|(truth, pred)| utterance_temporal_distance(truth, pred) as f64)
        .collect();
    per_utterance.mean().ok_or(ComputationError::EmptyCorpus)
}
