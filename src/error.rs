use thiserror::Error;

/// All possible errors that this library can return.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("unable to parse reference: {0}")]
    UnknownReference(String),

    #[error("empty reference where one was required")]
    EmptyReference,

    #[error("ranges differ by more than one verse and cannot be aligned: left has {left} verse(s), pivot has {pivot}")]
    CardinalityMismatch { left: usize, pivot: usize },

    #[error("offset entry ('+N'/'-N') has no usable left-side basis")]
    OffsetWithoutBasis,

    #[error("a lookup that requires a single verse received a reference spanning {0} verses")]
    UnsupportedMultiVerseLookup(usize),

    #[error("'?' is only supported as the sole left-hand side of an absent-in-left entry")]
    UnsupportedAbsentLeftPosition,

    #[error("unrecognized flag: {0}")]
    UnknownFlag(String),
}
