use thiserror::Error;

/// Errors reported by fallible list operations. Whenever an operation fails
/// the list is left exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The node handle is stale, belongs to another list, or names a
    /// detached node where a linked one was required.
    #[error("node is not linked into this list")]
    NodeNotFound,

    #[error("node is already linked into the list")]
    NodeAlreadyLinked,

    #[error("node is still linked into the list")]
    NodeStillLinked,

    /// The operation needs a behavior hook the list was built without.
    #[error("list was created without an `{0}` hook")]
    MissingHook(&'static str),
}
