/*
 * This module contains some quality of life structs for the evaluation. Most importantly, it
 * contains the `EvalConfig` struct, which implements the default trait. This config can be passed
 * to the `evaluate_reports` and `evaluate_corpus` functions and to the report parser.
*/
use crate::labels::UnknownTokenPolicy;
use std::fmt::Display;

/// The tolerances of the standard reporting contract.
pub const DEFAULT_TOLERANCES: [usize; 3] = [0, 1, 2];

/// Config struct used to simplify the inputs of parameters to the main functions of `paraev`. It
/// implements the default trait.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EvalConfig {
    /// The neighborhood half-widths at which the tolerant scores are computed, in reporting
    /// order. The default is `[0, 1, 2]`.
    tolerances: Vec<usize>,
    /// What to do with a word token whose tag code is not part of the paraphasia vocabulary.
    unknown_tokens: UnknownTokenPolicy,
}

impl EvalConfig {
    pub fn tolerances(&self) -> &[usize] {
        &self.tolerances
    }

    pub fn unknown_tokens(&self) -> UnknownTokenPolicy {
        self.unknown_tokens
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            tolerances: DEFAULT_TOLERANCES.to_vec(),
            unknown_tokens: UnknownTokenPolicy::default(),
        }
    }
}

impl Display for EvalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = format!(
            "Tolerances: {:?}\n Policy for unknown tag codes: {:?}",
            self.tolerances, self.unknown_tokens
        );
        write!(f, "{}", string)
    }
}

/// This builder can be used to build and customize an `EvalConfig` structure.
pub struct EvalConfigBuilder {
    tolerances: Vec<usize>,
    unknown_tokens: UnknownTokenPolicy,
}

impl Default for EvalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalConfigBuilder {
    pub fn new() -> Self {
        Self {
            tolerances: DEFAULT_TOLERANCES.to_vec(),
            unknown_tokens: UnknownTokenPolicy::DefaultToCorrect,
        }
    }

    pub fn tolerances(mut self, tolerances: Vec<usize>) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn unknown_tokens(mut self, policy: UnknownTokenPolicy) -> Self {
        self.unknown_tokens = policy;
        self
    }

    pub fn build(self) -> EvalConfig {
        EvalConfig {
            tolerances: self.tolerances,
            unknown_tokens: self.unknown_tokens,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = EvalConfig::default();
        assert_eq!(config.tolerances(), DEFAULT_TOLERANCES.as_slice());
        assert_eq!(config.unknown_tokens(), UnknownTokenPolicy::DefaultToCorrect);
    }

    #[rstest]
    #[case(vec![0])]
    #[case(vec![0, 1, 2, 3])]
    #[case(vec![5])]
    fn test_builder_setters_tolerances(#[case] tolerances: Vec<usize>) {
        let builder = EvalConfigBuilder::default();
        let config = builder.tolerances(tolerances.clone()).build();
        assert_eq!(config.tolerances(), tolerances)
    }

    #[rstest]
    #[case(UnknownTokenPolicy::DefaultToCorrect)]
    #[case(UnknownTokenPolicy::Error)]
    fn test_builder_setters_unknown_tokens(#[case] policy: UnknownTokenPolicy) {
        let builder = EvalConfigBuilder::default();
        let config = builder.unknown_tokens(policy).build();
        assert_eq!(config.unknown_tokens(), policy)
    }
}
