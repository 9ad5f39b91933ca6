//! Error types for Project Nemesis.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Nemesis operations.
#[derive(Debug, Error)]
pub enum NemesisError {
    /// Recipe book errors
    #[error("Recipe book error: {0}")]
    Book(#[from] BookError),

    /// Planning errors
    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    /// Inventory snapshot errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Recipe book loading and validation errors.
///
/// Every variant is recoverable: a failed reload leaves the previously
/// loaded book in place.
#[derive(Debug, Error)]
pub enum BookError {
    /// One or more entries have no `Name`
    #[error("Recipe entries without a name at positions: {}", join_positions(.0))]
    MalformedEntry(Vec<usize>),

    /// Two or more entries share a `Name`
    #[error("Duplicate recipe names: {}", .0.join(", "))]
    DuplicateName(Vec<String>),

    /// Two or more entries share a non-null `Result`
    #[error("Duplicate recipe results: {}", .0.join(", "))]
    DuplicateResult(Vec<String>),

    /// One or more entries have an empty `Recipe`
    #[error("Recipes without ingredients: {}", .0.join(", "))]
    EmptyRecipe(Vec<String>),

    /// Recipe book document is absent
    #[error("Recipe book not found: {}", .0.display())]
    MissingDocument(PathBuf),

    /// Recipe book document is not valid JSON
    #[error("Failed to parse recipe book {}: {source}", path.display())]
    ParseError {
        /// Document path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BookError {
    /// Returns true if the error came from validating entries rather than
    /// reading documents.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MalformedEntry(_)
                | Self::DuplicateName(_)
                | Self::DuplicateResult(_)
                | Self::EmptyRecipe(_)
        )
    }
}

fn join_positions(positions: &[usize]) -> String {
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Next-step planning errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Target recipe is not in the active book
    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),

    /// The book contains a recipe that (transitively) requires its own result
    #[error("Cyclic recipe chain: {}", .chain.join(" -> "))]
    CyclicRecipe {
        /// Recipe names from the first repeated recipe back to itself
        chain: Vec<String>,
    },
}

/// Inventory snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// More committed items than crafting slots
    #[error("Committed {committed} items but only {capacity} slots exist")]
    OverCapacity {
        /// Number of committed items
        committed: usize,
        /// Slot capacity
        capacity: usize,
    },

    /// Snapshot document is not valid JSON
    #[error("Failed to parse snapshot {}: {source}", path.display())]
    ParseError {
        /// Document path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Nemesis operations.
pub type NemesisResult<T> = Result<T, NemesisError>;

/// Result type alias for recipe book operations.
pub type BookResult<T> = Result<T, BookError>;

/// Result type alias for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Result type alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_message_lists_names() {
        let err = BookError::DuplicateName(vec!["Assassin".into(), "Trickster".into()]);
        assert_eq!(err.to_string(), "Duplicate recipe names: Assassin, Trickster");
        assert!(err.is_validation());
    }

    #[test]
    fn test_malformed_entry_message_lists_positions() {
        let err = BookError::MalformedEntry(vec![0, 3]);
        assert_eq!(
            err.to_string(),
            "Recipe entries without a name at positions: 0, 3"
        );
    }

    #[test]
    fn test_missing_document_is_not_validation() {
        let err = BookError::MissingDocument(PathBuf::from("customRecipeBook.json"));
        assert!(!err.is_validation());
        assert!(err.to_string().contains("customRecipeBook.json"));
    }

    #[test]
    fn test_cyclic_chain_message() {
        let err = PlanError::CyclicRecipe {
            chain: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "Cyclic recipe chain: A -> B -> A");
    }

    #[test]
    fn test_wrapping_into_top_level() {
        let err: NemesisError = PlanError::UnknownRecipe("Ghost".into()).into();
        assert!(matches!(err, NemesisError::Plan(PlanError::UnknownRecipe(_))));
    }
}
