use paraev::{evaluate_reports, EvalConfig, EvaluationError, Reporter, ToleranceEntry};

pub trait CloseEnough {
    fn are_close(&self, other: &Self, eps: f64) -> bool;
}

impl CloseEnough for ToleranceEntry {
    fn are_close(&self, other: &Self, eps: f64) -> bool {
        self.tolerance == other.tolerance
            && f64::abs(self.recall - other.recall) < eps
            && f64::abs(self.f1 - other.f1) < eps
    }
}

impl CloseEnough for Reporter {
    fn are_close(&self, other: &Self, eps: f64) -> bool {
        if f64::abs(self.wer() - other.wer()) >= eps
            || f64::abs(self.td_per_utt() - other.td_per_utt()) >= eps
        {
            return false;
        }
        self.tolerant().len() == other.tolerant().len()
            && self
                .tolerant()
                .iter()
                .zip(other.tolerant())
                .all(|(left, right)| left.are_close(right, eps))
    }
}

#[test]
fn two_fold_evaluation() {
    // Fold 1 holds two utterances with one shifted and one unmatched error each, fold 2 a single
    // perfectly predicted utterance. Counts worked out by hand.
    let paths = ["tests/awer_fold1.txt", "tests/awer_fold2.txt"];
    let actual = evaluate_reports(&paths, &EvalConfig::default()).unwrap();
    let expected = Reporter::new(
        4.0 / 15.0,
        vec![
            ToleranceEntry {
                tolerance: 0,
                recall: 0.5,
                f1: 4.0 / 7.0,
            },
            ToleranceEntry {
                tolerance: 1,
                recall: 0.75,
                f1: 6.0 / 11.0,
            },
            ToleranceEntry {
                tolerance: 2,
                recall: 0.75,
                f1: 0.5,
            },
        ],
        8.0 / 3.0,
    );
    assert!(actual.are_close(&expected, 1e-9), "{actual:?}");
}

#[test]
fn single_fold_report_rendering() {
    let paths = ["tests/awer_fold2.txt"];
    let reporter = evaluate_reports(&paths, &EvalConfig::default()).unwrap();
    let expected = "wer: 0.2
Time Tolerant Recall:
0: 1
1: 1
2: 1

Time Tolerant F1:
0: 1
1: 1
2: 1

TD per utt: 0\n";
    assert_eq!(reporter.to_string(), expected);
}

#[test]
fn missing_fold_report_is_fatal() {
    // One unreadable fold aborts the whole run; no partial summary comes back.
    let paths = ["tests/awer_fold1.txt", "tests/no_such_fold.txt"];
    let actual = evaluate_reports(&paths, &EvalConfig::default());
    assert!(matches!(actual, Err(EvaluationError::Parse(_))));
}

#[test]
fn empty_corpus_is_fatal() {
    // A report with a summary line but no utterance blocks parses, but scoring it must fail
    // loudly instead of dividing by zero.
    let paths: [&str; 0] = [];
    let actual = evaluate_reports(&paths, &EvalConfig::default());
    assert!(matches!(actual, Err(EvaluationError::Computation(_))));
}
