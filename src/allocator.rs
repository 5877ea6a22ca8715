//! Allocation of a new identifier strictly between two others.
//!
//! # Algorithm
//!
//! Both bounds are brought to dense form, then scanned together. The longest
//! common prefix is kept, and the first position where they diverge decides
//! how to build the result:
//!
//! | Gap at first divergence | Lower bound ends there | Result |
//! |---|---|---|
//! | none (lower bound exhausted) | yes | `Extend`: prefix of `hi` plus a digit below `hi`'s next |
//! | exactly one | depends | `Increment`, `Truncate` to `hi[..=i]`, or `Append` `0x40` |
//! | more than one | no | `Divide`: prefix plus the rounded-up mean |
//! | more than one | yes | `Increment` the last byte of `lo` |
//!
//! Each branch picks the smallest extension available at that depth, so a
//! region that keeps receiving inserts grows by about one byte per 127
//! inserts. Those bytes are mostly `0x7f`, which the codec then collapses.
//!
//! The result is always checked against both bounds before it is returned.
//! The allocator is deterministic: the same bounds always give the same
//! identifier, on every replica.

use std::borrow::Cow;

use tracing::debug;
use tracing::trace;

use crate::codec;
use crate::config::Compression;
use crate::config::Config;
use crate::error::Error;
use crate::error::Hex;
use crate::error::Malformed;
use crate::error::Result;
use crate::id::Bound;
use crate::id::Bytes;
use crate::id::INFINITY_BYTE;
use crate::id::Identifier;
use crate::id::MAX_DIGIT;
use crate::id::MIN_BYTE;
use crate::id::less_than;

/// Digit placed in a fresh position: the middle of `1..=0x7f`.
const MIDPOINT: u8 = 0x40;

/// Spacer placed before `MIDPOINT` when the next digit of `hi` is 1.
const SPACER: u8 = 0x00;

/// Which construction produced an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `lo` is a prefix of `hi`; continue with a digit below `hi`'s next.
    Extend,
    /// Bump the last byte of `lo`, or append `0x01` if it is `0x7f`.
    Increment,
    /// Cut `hi` just after the first differing byte.
    Truncate,
    /// Keep `lo` through the differing byte and append `0x40`.
    Append,
    /// Replace the differing byte with the mean of both bounds.
    Divide,
}

/// A generated identifier and how it was built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// The new identifier, in the configured form.
    pub id: Identifier,
    /// The branch that built it.
    pub strategy: Strategy,
    /// Index of the byte where the bounds first diverged.
    pub depth: usize,
}

/// Generates identifiers between bounds according to a [`Config`].
#[derive(Clone, Debug, Default)]
pub struct Allocator {
    config: Config,
}

impl Allocator {
    /// An allocator with the default configuration.
    pub fn new() -> Allocator {
        return Allocator { config: Config::new() };
    }

    /// An allocator using `config`.
    pub fn with_config(config: Config) -> Allocator {
        return Allocator { config };
    }

    /// The configuration this allocator was built with.
    pub fn config(&self) -> &Config {
        return &self.config;
    }

    /// A new identifier `r` with `lo < r < hi`, in the configured form.
    pub fn between(&self, lo: Bound<'_>, hi: Bound<'_>) -> Result<Identifier> {
        return Ok(self.allocate(lo, hi)?.id);
    }

    /// Like [`Allocator::between`], also reporting the strategy used.
    pub fn allocate(&self, lo: Bound<'_>, hi: Bound<'_>) -> Result<Allocation> {
        let lo_dense = self.dense(lo)?;
        let hi_dense = self.dense(hi)?;

        if !less_than(&lo_dense, &hi_dense) {
            debug!(lo = %Hex::new(&lo_dense), hi = %Hex::new(&hi_dense), "bounds out of order");
            return Err(Error::OrderViolation {
                lo: Hex::new(&lo_dense),
                hi: Hex::new(&hi_dense),
            });
        }

        let (dense, strategy, depth) = split(&lo_dense, &hi_dense)?;

        if !less_than(&lo_dense, &dense) || !less_than(&dense, &hi_dense) {
            debug!(
                lo = %Hex::new(&lo_dense),
                hi = %Hex::new(&hi_dense),
                result = %Hex::new(&dense),
                ?strategy,
                "generated identifier escaped its bounds"
            );
            return Err(no_room(&lo_dense, &hi_dense));
        }

        trace!(
            ?strategy,
            depth,
            lo_len = lo_dense.len(),
            hi_len = hi_dense.len(),
            len = dense.len(),
            "generated identifier"
        );

        let id = match self.config.compression {
            Compression::Enabled => codec::compress(&dense)?,
            Compression::Disabled => Identifier::from_vec(dense),
        };
        return Ok(Allocation { id, strategy, depth });
    }

    /// The dense bytes a bound stands for. Sentinels bypass the codec.
    fn dense<'a>(&self, bound: Bound<'a>) -> Result<Cow<'a, [u8]>> {
        let id = match bound {
            Bound::Id(id) => id,
            Bound::Min => return Ok(Cow::Borrowed(&[MIN_BYTE])),
            Bound::Infinity => return Ok(Cow::Borrowed(&[INFINITY_BYTE])),
        };

        match self.config.compression {
            Compression::Enabled => {
                let dense = codec::decompress_bounded(id.as_bytes(), self.config.max_dense_len)?;
                return Ok(Cow::Owned(dense.into_bytes()));
            }
            Compression::Disabled => {
                check_dense(id.as_bytes())?;
                return Ok(Cow::Borrowed(id.as_bytes()));
            }
        }
    }
}

/// Generate an identifier between two bounds with default limits.
///
/// With [`Compression::Enabled`] the bounds are compact and so is the
/// result; with [`Compression::Disabled`] everything is dense.
pub fn generate_between(lo: Bound<'_>, hi: Bound<'_>, compression: Compression) -> Result<Identifier> {
    let config = Config::new().with_compression(compression);
    return Allocator::with_config(config).between(lo, hi);
}

/// The smallest dense successor of `dense` that differs only in its last
/// byte, or grows by a trailing `0x01` if that byte is already `0x7f`.
pub fn increment(dense: &[u8]) -> Result<Identifier> {
    check_dense(dense)?;
    return Ok(Identifier::from_vec(bump(dense)));
}

fn check_dense(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(Error::MalformedEncoding {
            offset: 0,
            kind: Malformed::Empty,
        });
    }
    if let Some(offset) = bytes.iter().position(|b| *b > MAX_DIGIT) {
        return Err(Error::MalformedEncoding {
            offset,
            kind: Malformed::NotDense,
        });
    }
    return Ok(());
}

fn no_room(lo: &[u8], hi: &[u8]) -> Error {
    return Error::NoRoom {
        lo: Hex::new(lo),
        hi: Hex::new(hi),
    };
}

fn bump(dense: &[u8]) -> Bytes {
    let mut out = Bytes::from_slice(dense);
    match dense.last() {
        Some(&last) if last < MAX_DIGIT => {
            let end = out.len() - 1;
            out[end] = last + 1;
        }
        _ => out.push(MIN_BYTE),
    }
    return out;
}

/// Every byte of `lo` from `start` up to, not including, its last is `0x7f`.
/// The last byte is free because incrementing only touches it.
fn is_full(lo: &[u8], start: usize) -> bool {
    let end = lo.len().saturating_sub(1);
    return lo.get(start..end).is_none_or(|tail| tail.iter().all(|b| *b == MAX_DIGIT));
}

fn mean(lo: u8, hi: u8) -> u8 {
    return ((lo as u16 + hi as u16 + 1) / 2) as u8;
}

/// Core of the allocator on dense bytes, with `lo < hi` already checked.
fn split(lo: &[u8], hi: &[u8]) -> Result<(Bytes, Strategy, usize)> {
    for (i, &lo_byte) in lo.iter().enumerate() {
        // `lo < hi` means `hi` cannot run out while the prefix is shared.
        let Some(&hi_byte) = hi.get(i) else {
            break;
        };
        let lo_ends = lo.len() == i + 1;
        let hi_ends = hi.len() == i + 1;

        match hi_byte.wrapping_sub(lo_byte) {
            0 => {
                if !lo_ends {
                    continue;
                }
                let out = extend(lo, hi, i)?;
                return Ok((out, Strategy::Extend, i));
            }
            1 => {
                let lo_short = lo_ends && !hi_ends;
                let lo_full = hi_ends && !lo_ends && is_full(lo, i + 1);
                if lo_short || lo_full {
                    return Ok((bump(lo), Strategy::Increment, i));
                }
                if !hi_ends {
                    return Ok((Bytes::from_slice(&hi[..=i]), Strategy::Truncate, i));
                }

                let mut out = Bytes::from_slice(&lo[..=i]);
                out.push(MIDPOINT);
                if less_than(lo, &out) {
                    return Ok((out, Strategy::Append, i));
                }
                // `lo` continues above 0x40 here; anything keeping lo[..=i]
                // is still below `hi`, so its successor fits.
                return Ok((bump(lo), Strategy::Increment, i));
            }
            _ => {
                if lo_ends {
                    return Ok((bump(lo), Strategy::Increment, i));
                }
                let mut out = Bytes::from_slice(&lo[..i]);
                out.push(mean(lo_byte, hi_byte));
                return Ok((out, Strategy::Divide, i));
            }
        }
    }
    return Err(no_room(lo, hi));
}

/// `lo` is `hi[..=i]`: continue below `hi`'s next significant digit.
///
/// Zero digits of `hi` are carried over first, so `hi = [01 00 40]` above
/// `lo = [01]` gives `[01 00 20]` rather than `[01 00]`. A result ending in
/// `0x00` would leave no room below it for the next insert.
///
/// When only zeros follow, `hi` minus its last zero still sorts above `lo`
/// as long as at least two zeros follow. With a single zero the bounds are
/// adjacent.
fn extend(lo: &[u8], hi: &[u8], i: usize) -> Result<Bytes> {
    let tail = hi.get(i + 1..).unwrap_or_default();
    let Some(offset) = tail.iter().position(|b| *b != 0) else {
        if tail.len() < 2 {
            return Err(no_room(lo, hi));
        }
        return Ok(Bytes::from_slice(&hi[..hi.len() - 1]));
    };
    let j = i + 1 + offset;
    let next = hi[j];

    let mut out = Bytes::from_slice(&hi[..j]);
    if next == 1 {
        out.push(SPACER);
        out.push(MIDPOINT);
    } else {
        out.push(mean(0, next));
    }
    return Ok(out);
}
