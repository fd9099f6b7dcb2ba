//! Error types for table lookups and table loading.

/// Alias for `Result<T, TableError>`.
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised when game tables are missing data or are malformed.
///
/// Every variant is a configuration problem: an encounter must never be
/// started against data that produces one of these.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// No creature archetype is mapped to the given material.
    #[error("no creature is mapped to material \"{0}\"")]
    UnmappedMaterial(String),

    /// The companion is not in the catalog.
    #[error("unknown companion \"{0}\"")]
    UnknownCompanion(String),

    /// The same companion appears twice in one party.
    #[error("companion \"{0}\" appears more than once in the party")]
    DuplicateCompanion(String),

    /// The party exceeds the number of companion slots.
    #[error("party has {got} companions, at most {max} may join")]
    PartyTooLarge {
        /// Maximum allowed companions.
        max: usize,
        /// Companions supplied.
        got: usize,
    },

    /// A table failed validation.
    #[error("invalid table: {0}")]
    Invalid(String),

    /// Table data could not be decoded.
    #[error("failed to decode tables: {0}")]
    Decode(#[from] serde_json::Error),

    /// Table file could not be read.
    #[error("failed to read tables: {0}")]
    Io(#[from] std::io::Error),
}
