use thiserror::Error;

/// Error type for property mutations.
///
/// Returned from: `ListProperty::remove_at`, `ListProperty::insert`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// A positional mutation addressed an index outside the list. Nothing was mutated or emitted.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
