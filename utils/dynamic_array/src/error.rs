use thiserror::Error;

/// Caller-correctable failures reported by the containers in this workspace.
///
/// The taxonomy is shared: `ordered_map` re-exports this type instead of
/// defining its own. `DynamicArray` itself only raises
/// [`Error::IndexOutOfRange`], while [`Error::InvalidArgument`] and
/// [`Error::EmptyCollection`] come from the map layered on top of it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An operation was given an absent argument where one is required
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An operation that needs at least one element was called on an empty collection
    #[error("collection is empty")]
    EmptyCollection,

    /// A positional operation was given an index outside its valid bound
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Shorthand for results carrying an [`Error`]
pub type Result<T> = core::result::Result<T, Error>;
