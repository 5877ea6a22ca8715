//! Error types shared by the codec, the allocator and the sequence adapters.
//!
//! None of these are transient. Each one means caller-supplied data broke an
//! invariant, so nothing here is retried and no fallback identifier is ever
//! fabricated in place of an error.

use std::fmt;

use thiserror::Error;

/// Result type for every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the codec, the allocator and the sequences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The lower bound does not sort strictly below the upper bound.
    #[error("bounds out of order: {lo} is not below {hi}")]
    OrderViolation { lo: Hex, hi: Hex },

    /// A compact byte stream could not be decoded (or a dense one held a
    /// byte outside `0..=0x7f`).
    #[error("malformed identifier at byte {offset}: {kind}")]
    MalformedEncoding { offset: usize, kind: Malformed },

    /// A sequence position outside the valid range for the operation.
    #[error("position {position} out of bounds for sequence of length {len}")]
    PositionOutOfBounds { position: usize, len: usize },

    /// The bounds are ordered but adjacent: `hi` is `lo` followed by a
    /// single zero byte, so nothing sorts between them.
    #[error("no identifier exists between {lo} and {hi}")]
    NoRoom { lo: Hex, hi: Hex },
}

/// Why a byte stream was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// Identifiers are at least one byte long.
    Empty,
    /// A run count whose leading digit is zero.
    ZeroRun,
    /// A run count that does not fit in `usize`.
    RunOverflow,
    /// Expansion past the configured dense length limit.
    TooLong,
    /// A byte above `0x7f` where only dense bytes are allowed.
    NotDense,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Malformed::Empty => "empty identifier",
            Malformed::ZeroRun => "run count with a zero leading digit",
            Malformed::RunOverflow => "run count overflows",
            Malformed::TooLong => "expanded identifier exceeds the length limit",
            Malformed::NotDense => "byte above 0x7f in dense identifier",
        };
        return f.write_str(text);
    }
}

/// Bytes rendered as space-separated hex, for error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct Hex(pub Vec<u8>);

impl Hex {
    /// Copy `bytes` for display.
    pub fn new(bytes: &[u8]) -> Hex {
        return Hex(bytes.to_vec());
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        return f.write_str("]");
    }
}

impl fmt::Debug for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return fmt::Display::fmt(self, f);
    }
}
