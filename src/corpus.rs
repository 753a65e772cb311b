/**
This module holds the corpus-level aggregate of the per-fold parse results. Aggregation is a pure
reduce: each fold contributes its utterance sequences (order preserved) and its word-error counts
(summed). Each utterance belongs to exactly one fold, so the counts are never double counted.
*/
use crate::labels::LabelSeq;
use crate::parser::FoldResult;

/// The concatenation of every fold's label-sequence pairs, in fold order then utterance order,
/// plus the summed word-error counts. Assembled once per evaluation run, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorpusResult {
    true_sequences: Vec<LabelSeq>,
    pred_sequences: Vec<LabelSeq>,
    word_errors: u64,
    word_total: u64,
}

impl CorpusResult {
    pub fn true_sequences(&self) -> &[LabelSeq] {
        &self.true_sequences
    }

    pub fn pred_sequences(&self) -> &[LabelSeq] {
        &self.pred_sequences
    }

    pub fn word_errors(&self) -> u64 {
        self.word_errors
    }

    pub fn word_total(&self) -> u64 {
        self.word_total
    }

    /// The corpus word error rate, recomputed from the summed counts rather than averaged over
    /// the per-fold rates. 0 when the corpus holds no reference word.
    pub fn wer(&self) -> f64 {
        if self.word_total == 0 {
            0.0
        } else {
            self.word_errors as f64 / self.word_total as f64
        }
    }

    /// Number of utterances in the corpus.
    pub fn len(&self) -> usize {
        self.true_sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.true_sequences.is_empty()
    }
}

impl FromIterator<FoldResult> for CorpusResult {
    fn from_iter<T: IntoIterator<Item = FoldResult>>(iter: T) -> Self {
        let mut corpus = CorpusResult::default();
        for fold in iter {
            corpus.true_sequences.extend(fold.true_sequences);
            corpus.pred_sequences.extend(fold.pred_sequences);
            corpus.word_errors += fold.summary.errors;
            corpus.word_total += fold.summary.total;
        }
        corpus
    }
}
