/**
This module renders the corpus-level summary report. The layout is fixed: the word error rate,
the per-tolerance recalls, the per-tolerance F1 scores and the mean temporal distance, each on
its own labeled line.
*/
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Recall and F1 of the corpus at a single tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceEntry {
    pub tolerance: usize,
    pub recall: f64,
    pub f1: f64,
}

/// The full result of one evaluation run. Can be prettyprinted into the fixed-format text
/// summary through its `Display` implementation, or consumed field by field.
///
/// # Example
///
/// ```rust
/// use paraev::{Reporter, ToleranceEntry};
///
/// let reporter = Reporter::new(
///     0.1,
///     vec![ToleranceEntry { tolerance: 0, recall: 0.5, f1: 0.5 }],
///     2.0,
/// );
/// let expected = "wer: 0.1\n\
///                 Time Tolerant Recall:\n\
///                 0: 0.5\n\
///                 \n\
///                 Time Tolerant F1:\n\
///                 0: 0.5\n\
///                 \n\
///                 TD per utt: 2\n";
/// assert_eq!(reporter.to_string(), expected);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Reporter {
    wer: f64,
    tolerant: Vec<ToleranceEntry>,
    td_per_utt: f64,
}

impl Reporter {
    pub fn new(wer: f64, tolerant: Vec<ToleranceEntry>, td_per_utt: f64) -> Self {
        Self {
            wer,
            tolerant,
            td_per_utt,
        }
    }

    pub fn wer(&self) -> f64 {
        self.wer
    }

    /// The per-tolerance scores, in the order the tolerances were configured.
    pub fn tolerant(&self) -> &[ToleranceEntry] {
        &self.tolerant
    }

    pub fn td_per_utt(&self) -> f64 {
        self.td_per_utt
    }
}

impl Display for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "wer: {}", self.wer)?;
        writeln!(f, "Time Tolerant Recall:")?;
        for entry in &self.tolerant {
            writeln!(f, "{}: {}", entry.tolerance, entry.recall)?;
        }
        writeln!(f)?;
        writeln!(f, "Time Tolerant F1:")?;
        for entry in &self.tolerant {
            writeln!(f, "{}: {}", entry.tolerance, entry.f1)?;
        }
        writeln!(f)?;
        writeln!(f, "TD per utt: {}", self.td_per_utt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_output() {
        let reporter = Reporter::new(
            0.25,
            vec![
                ToleranceEntry {
                    tolerance: 0,
                    recall: 0.5,
                    f1: 0.25,
                },
                ToleranceEntry {
                    tolerance: 1,
                    recall: 0.75,
                    f1: 0.5,
                },
                ToleranceEntry {
                    tolerance: 2,
                    recall: 1.0,
                    f1: 0.75,
                },
            ],
            1.5,
        );
        // NOTE: Do not change the indentation
        let expected = "wer: 0.25
Time Tolerant Recall:
0: 0.5
1: 0.75
2: 1

Time Tolerant F1:
0: 0.25
1: 0.5
2: 0.75

TD per utt: 1.5\n";
        assert_eq!(reporter.to_string(), expected);
    }
}
