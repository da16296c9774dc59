// JSON document form of a table, for inspection and interchange.

use bit_set::BitSet;
use flatdfa_core::Shape;
use serde::{Deserialize, Serialize};

use crate::{TableError, TransitionTable};

/// Serializable view of a [`TransitionTable`].
///
/// `results` lists the result indexes in ascending order. It is redundant for
/// every final slot except those whose value equals the null sentinel, but
/// keeping the full list makes the document self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    pub alphabet_size: usize,
    pub word_length: usize,
    pub transitions: Vec<i32>,
    pub results: Vec<usize>,
}

impl From<&TransitionTable> for TableDocument {
    fn from(table: &TransitionTable) -> Self {
        Self {
            alphabet_size: table.alphabet_size(),
            word_length: table.word_length(),
            transitions: table.transitions().to_vec(),
            results: table.results().iter().collect(),
        }
    }
}

impl TransitionTable {
    /// Rebuild a table from its document form, with the same checks as
    /// [`TransitionTable::new`].
    pub fn from_document(doc: TableDocument) -> Result<Self, TableError> {
        let shape = Shape::new(doc.alphabet_size, doc.word_length)?;
        let slots = doc.transitions.len();
        // Indexes are bounded before the bit set grows to hold them.
        if let Some(&index) = doc.results.iter().find(|&&i| i >= slots) {
            return Err(TableError::MisplacedResult { index });
        }
        let mut results = BitSet::with_capacity(slots);
        for index in doc.results {
            results.insert(index);
        }
        Self::new(shape, doc.transitions, results)
    }

    pub fn to_document(&self) -> TableDocument {
        TableDocument::from(self)
    }
}
