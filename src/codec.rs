//! Run-length codec between dense and compact identifiers.
//!
//! Repeated appends at the end of a sequence pile up `0x7f` bytes, so the
//! compact form replaces every maximal run of `0x7f` with its length written
//! as big-endian base-128 digits, each digit tagged with the high bit:
//!
//! ```text
//! dense:   03 7f 7f .. (128 times) .. 7f 21
//! compact: 03 81 80 21
//! ```
//!
//! Bytes below `0x80` are literal. Any `0x7f` is coded, even a lone one, so
//! a single `0x7f` becomes the single digit `0x81` and the length is
//! unchanged. A run of `k >= 2` always shrinks.
//!
//! The sentinel `[0x80]` is not a compact identifier (it would be a run of
//! zero) and never passes through here; see [`crate::id::Bound`].

use crate::config::DEFAULT_MAX_DENSE_LEN;
use crate::error::Error;
use crate::error::Malformed;
use crate::error::Result;
use crate::id::Bytes;
use crate::id::Identifier;
use crate::id::MAX_DIGIT;

/// High bit marking a run-count digit.
const RUN_FLAG: u8 = 0x80;

/// Bits carried by each run-count digit.
const DIGIT_BITS: u32 = 7;

/// Number of base-128 digits needed to write `count`. Zero for zero.
pub fn run_digits(count: usize) -> usize {
    let mut digits = 0;
    let mut rest = count;
    while rest > 0 {
        digits += 1;
        rest >>= DIGIT_BITS;
    }
    return digits;
}

fn write_run(out: &mut Bytes, count: usize) {
    for k in (0..run_digits(count)).rev() {
        let digit = (count >> (DIGIT_BITS as usize * k)) & MAX_DIGIT as usize;
        out.push(digit as u8 | RUN_FLAG);
    }
}

fn malformed(offset: usize, kind: Malformed) -> Error {
    return Error::MalformedEncoding { offset, kind };
}

/// Encode a dense identifier.
///
/// Fails if the input is empty or holds a byte above `0x7f`.
pub fn compress(dense: &[u8]) -> Result<Identifier> {
    if dense.is_empty() {
        return Err(malformed(0, Malformed::Empty));
    }

    let mut out = Bytes::with_capacity(dense.len());
    let mut i = 0;
    while i < dense.len() {
        let byte = dense[i];
        if byte > MAX_DIGIT {
            return Err(malformed(i, Malformed::NotDense));
        }
        if byte < MAX_DIGIT {
            out.push(byte);
            i += 1;
            continue;
        }

        let start = i;
        while i < dense.len() && dense[i] == MAX_DIGIT {
            i += 1;
        }
        write_run(&mut out, i - start);
    }

    return Ok(Identifier::from_vec(out));
}

/// Decode a compact identifier, refusing to expand past
/// [`DEFAULT_MAX_DENSE_LEN`] bytes.
pub fn decompress(compact: &[u8]) -> Result<Identifier> {
    return decompress_bounded(compact, DEFAULT_MAX_DENSE_LEN);
}

/// Decode a compact identifier into at most `max_len` dense bytes.
pub fn decompress_bounded(compact: &[u8], max_len: usize) -> Result<Identifier> {
    if compact.is_empty() {
        return Err(malformed(0, Malformed::Empty));
    }

    let mut out = Bytes::with_capacity(compact.len());
    let mut i = 0;
    while i < compact.len() {
        let byte = compact[i];
        if byte < RUN_FLAG {
            if out.len() >= max_len {
                return Err(malformed(i, Malformed::TooLong));
            }
            out.push(byte);
            i += 1;
            continue;
        }

        // A zero leading digit is either an empty run or a padded count.
        // Neither is produced by `compress`.
        if byte == RUN_FLAG {
            return Err(malformed(i, Malformed::ZeroRun));
        }

        let start = i;
        let mut count: usize = 0;
        while i < compact.len() && compact[i] >= RUN_FLAG {
            let digit = (compact[i] - RUN_FLAG) as usize;
            count = count
                .checked_mul(1 << DIGIT_BITS)
                .and_then(|c| c.checked_add(digit))
                .ok_or_else(|| malformed(start, Malformed::RunOverflow))?;
            i += 1;
        }

        if count > max_len - out.len() {
            return Err(malformed(start, Malformed::TooLong));
        }
        out.extend(std::iter::repeat_n(MAX_DIGIT, count));
    }

    return Ok(Identifier::from_vec(out));
}
