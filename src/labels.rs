/**
This module gives the tooling necessary to parse the word tokens of a transcript report into
paraphasia labels. A token is a transcript word optionally suffixed with `/<tag>`, where the tag
identifies the type of paraphasia. Untagged words and the alignment placeholder `<eps>` both carry
the `c` (no error) label.
*/
use enum_iterator::{all, Sequence};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The literal emitted by the upstream aligner for a position with no corresponding word. It is
/// scored as the `c` class.
pub const ALIGNMENT_PLACEHOLDER: &str = "<eps>";

/// Character separating a transcript word from its paraphasia tag.
const TAG_SEPARATOR: char = '/';

/// The closed vocabulary of paraphasia types used by the annotation scheme. Each variant is
/// represented in the reports by a single lowercase letter.
#[derive(
    Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Sequence, Serialize, Deserialize,
)]
pub enum ParaphasiaTag {
    /// Phonemic paraphasia (`p`): a sound substitution or rearrangement within the word.
    Phonemic,
    /// Neologistic paraphasia (`n`): a non-word production.
    Neologistic,
    /// Semantic paraphasia (`s`): substitution of a semantically related word.
    Semantic,
}

impl ParaphasiaTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParaphasiaTag::Phonemic => "p",
            ParaphasiaTag::Neologistic => "n",
            ParaphasiaTag::Semantic => "s",
        }
    }
}

impl Display for ParaphasiaTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParaphasiaTag {
    type Err = LabelParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "p" => Ok(Self::Phonemic),
            "n" => Ok(Self::Neologistic),
            "s" => Ok(Self::Semantic),
            _ => Err(LabelParsingError(String::from(s))),
        }
    }
}

/// A single position of an utterance label sequence: either no error or one of the paraphasia
/// types. Labels are immutable once parsed; the scorers only ever read them.
#[derive(
    Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Label {
    /// The `c` class: a correctly produced word or an alignment placeholder.
    Correct,
    Paraphasia(ParaphasiaTag),
}

/// The labels of a single utterance, one per word position.
pub type LabelSeq = Vec<Label>;

impl Label {
    pub fn is_paraphasia(&self) -> bool {
        matches!(self, Label::Paraphasia(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Correct => "c",
            Label::Paraphasia(tag) => tag.as_str(),
        }
    }

    /// Parses a single word token from a report line. A token containing a `/` takes the
    /// substring after the *final* `/`, lowercased, as its label code. The literal `<eps>`
    /// placeholder and bare words are both the `c` class. An unknown code after the `/` is
    /// resolved by `policy`.
    pub fn from_token(token: &str, policy: UnknownTokenPolicy) -> Result<Self, LabelParsingError> {
        if token == ALIGNMENT_PLACEHOLDER {
            return Ok(Label::Correct);
        }
        match token.rsplit_once(TAG_SEPARATOR) {
            Some((_, code)) => match Label::from_str(code) {
                Ok(label) => Ok(label),
                Err(err) => match policy {
                    UnknownTokenPolicy::DefaultToCorrect => Ok(Label::Correct),
                    UnknownTokenPolicy::Error => Err(err),
                },
            },
            None => Ok(Label::Correct),
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = LabelParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "c" => Ok(Self::Correct),
            other => ParaphasiaTag::from_str(other).map(Self::Paraphasia),
        }
    }
}

impl From<ParaphasiaTag> for Label {
    fn from(value: ParaphasiaTag) -> Self {
        Label::Paraphasia(value)
    }
}

/// The full set of error labels, i.e. every label except `c`. The tolerant scorer uses this set
/// to decide whether a neighborhood contains any error at all.
pub(crate) fn error_label_set() -> ahash::AHashSet<Label> {
    all::<ParaphasiaTag>().map(Label::Paraphasia).collect()
}

/// What to do with a token whose tag code is not part of the paraphasia vocabulary. The report
/// format does not pin this case down, so it is a configuration decision.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnknownTokenPolicy {
    /// Score the token as the `c` class. This is the default.
    DefaultToCorrect,
    /// Fail the parse of the whole fold report.
    Error,
}

impl Default for UnknownTokenPolicy {
    fn default() -> Self {
        Self::DefaultToCorrect
    }
}

impl FromStr for UnknownTokenPolicy {
    type Err = LabelParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "defaulttocorrect" | "correct" => Ok(Self::DefaultToCorrect),
            "error" | "returnerror" => Ok(Self::Error),
            _ => Err(LabelParsingError(String::from(s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error type returned when a string cannot be parsed into a `Label`, a `ParaphasiaTag` or an
/// `UnknownTokenPolicy`.
pub struct LabelParsingError(pub(crate) String);

impl Display for LabelParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse the string ({}) into a paraphasia label",
            self.0
        )
    }
}
impl Error for LabelParsingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ball/p", Label::Paraphasia(ParaphasiaTag::Phonemic))]
    #[case("Ball/P", Label::Paraphasia(ParaphasiaTag::Phonemic))]
    #[case("thing/n", Label::Paraphasia(ParaphasiaTag::Neologistic))]
    #[case("chair/S", Label::Paraphasia(ParaphasiaTag::Semantic))]
    #[case("word/c", Label::Correct)]
    #[case("<eps>", Label::Correct)]
    #[case("dog", Label::Correct)]
    #[case("a/b/p", Label::Paraphasia(ParaphasiaTag::Phonemic))]
    fn test_from_token(#[case] token: &str, #[case] expected: Label) {
        let actual = Label::from_token(token, UnknownTokenPolicy::DefaultToCorrect).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_from_token_unknown_code_lenient() {
        let actual = Label::from_token("word/x", UnknownTokenPolicy::DefaultToCorrect).unwrap();
        assert_eq!(actual, Label::Correct);
    }

    #[test]
    fn test_from_token_unknown_code_strict() {
        let actual = Label::from_token("word/x", UnknownTokenPolicy::Error);
        assert_eq!(actual, Err(LabelParsingError(String::from("x"))));
    }

    #[rstest]
    #[case("c", Ok(Label::Correct))]
    #[case("C", Ok(Label::Correct))]
    #[case("p", Ok(Label::Paraphasia(ParaphasiaTag::Phonemic)))]
    #[case("q", Err(LabelParsingError(String::from("q"))))]
    fn test_label_from_str(#[case] code: &str, #[case] expected: Result<Label, LabelParsingError>) {
        assert_eq!(Label::from_str(code), expected);
    }

    #[test]
    fn test_error_label_set_excludes_correct() {
        let set = error_label_set();
        assert_eq!(set.len(), 3);
        assert!(!set.contains(&Label::Correct));
        assert!(set.contains(&Label::Paraphasia(ParaphasiaTag::Semantic)));
    }

    #[rstest]
    #[case("correct", Ok(UnknownTokenPolicy::DefaultToCorrect))]
    #[case("Error", Ok(UnknownTokenPolicy::Error))]
    #[case("panic", Err(LabelParsingError(String::from("panic"))))]
    fn test_policy_from_str(
        #[case] input: &str,
        #[case] expected: Result<UnknownTokenPolicy, LabelParsingError>,
    ) {
        assert_eq!(UnknownTokenPolicy::from_str(input), expected);
    }
}
