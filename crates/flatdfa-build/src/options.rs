// Build options: word shape and duplicate handling.

use flatdfa_core::{Sample, Shape, WordError};

/// What to do when a word is inserted again with a different value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the insert with [`BuildError::Conflict`](crate::BuildError::Conflict).
    #[default]
    Reject,
    /// Keep the value inserted first and log the ignored one.
    FirstWins,
}

/// Options controlling one build.
///
/// Shape fields left as `None` are inferred from the sample batch by
/// [`BuildOptions::resolve_shape`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Number of symbols in the alphabet.
    pub alphabet_size: Option<usize>,
    /// Number of symbols in every word.
    pub word_length: Option<usize>,
    /// Handling of conflicting re-insertions.
    pub duplicates: DuplicatePolicy,
}

impl BuildOptions {
    pub fn with_alphabet_size(mut self, alphabet_size: usize) -> Self {
        self.alphabet_size = Some(alphabet_size);
        self
    }

    pub fn with_word_length(mut self, word_length: usize) -> Self {
        self.word_length = Some(word_length);
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Fix the shape of a build, inferring whatever the options leave open.
    pub fn resolve_shape(&self, samples: &[Sample]) -> Result<Shape, WordError> {
        match (self.alphabet_size, self.word_length) {
            (Some(alphabet_size), Some(word_length)) => Shape::new(alphabet_size, word_length),
            (alphabet_size, word_length) => {
                let inferred = Shape::infer(samples)?;
                Shape::new(
                    alphabet_size.unwrap_or(inferred.alphabet_size()),
                    word_length.unwrap_or(inferred.word_length()),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        vec![Sample::new(vec![0, 3, 1], 1), Sample::new(vec![2, 2, 2], 0)]
    }

    #[test]
    fn default_rejects_conflicts() {
        assert_eq!(BuildOptions::default().duplicates, DuplicatePolicy::Reject);
    }

    #[test]
    fn explicit_shape_ignores_samples() {
        let options = BuildOptions::default()
            .with_alphabet_size(8)
            .with_word_length(5);
        let shape = options.resolve_shape(&[]).unwrap();
        assert_eq!(shape.alphabet_size(), 8);
        assert_eq!(shape.word_length(), 5);
    }

    #[test]
    fn inferred_shape() {
        let shape = BuildOptions::default().resolve_shape(&samples()).unwrap();
        assert_eq!(shape.alphabet_size(), 4);
        assert_eq!(shape.word_length(), 3);
    }

    #[test]
    fn partially_inferred_shape() {
        let options = BuildOptions::default().with_alphabet_size(10);
        let shape = options.resolve_shape(&samples()).unwrap();
        assert_eq!(shape.alphabet_size(), 10);
        assert_eq!(shape.word_length(), 3);
    }

    #[test]
    fn nothing_to_infer_from() {
        let options = BuildOptions::default().with_word_length(3);
        assert_eq!(options.resolve_shape(&[]), Err(WordError::NoSamples));
    }
}
