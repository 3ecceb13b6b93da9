use thiserror::Error as ThisError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions surfaced to the caller.
///
/// Degenerate-but-recoverable conditions (cluster underflow, hitting the
/// k-means iteration cap) are not errors; they are absorbed internally and
/// reported through status accessors instead.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Classification or assessment was requested with no stored examples.
    #[error("no examples available for classification")]
    EmptyModel,

    /// A plurality label was requested from a histogram that was never bumped.
    #[error("histogram has no entries")]
    EmptyHistogram,

    /// A random pick was requested from a distribution with zero total weight.
    #[error("distribution has no weight")]
    EmptyDistribution,

    /// Failure while loading training examples from a backing store.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
