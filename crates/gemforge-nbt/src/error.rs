//! Codec errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("root tag must be a compound (10), got {got}")]
    ExpectedCompound { got: u8 },

    #[error("unknown tag type: {0}")]
    UnknownTagType(u8),

    #[error("invalid UTF-8 in string tag")]
    InvalidUtf8,

    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("VarInt longer than {max_bytes} bytes")]
    VarIntTooLong { max_bytes: usize },

    #[error("string of {len} bytes exceeds the {max} byte limit")]
    StringTooLong { len: usize, max: usize },

    #[error("{0} elements do not fit an i32 length")]
    LengthOverflow(usize),

    #[error("list of tag type {expected} holds a tag of type {got}")]
    MixedList { expected: u8, got: u8 },
}
