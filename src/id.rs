//! Identifiers and the bounds they are allocated between.
//!
//! # Ordering
//!
//! Identifiers compare byte by byte. When one is a strict prefix of the
//! other, the shorter one sorts first. This is a total order and is the same
//! order `[u8]` already has, so `Identifier` derives nothing clever: it
//! delegates to the byte slice.
//!
//! # Representations
//!
//! The same type carries both the dense form (every byte in `0..=0x7f`, used
//! for generation) and the compact form (runs of `0x7f` replaced by base-128
//! counts, used for storage). Comparisons are only meaningful when both sides
//! are in the same form; see [`crate::codec`].

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::error::Hex;

/// The byte of the lower sentinel, `MIN`.
pub const MIN_BYTE: u8 = 0x01;

/// The byte of the upper sentinel, `INFINITY`. No real identifier reaches it.
pub const INFINITY_BYTE: u8 = 0x80;

/// The largest byte a dense identifier may hold.
pub const MAX_DIGIT: u8 = 0x7f;

/// Storage for identifier bytes. Compact identifiers are short, so most stay
/// inline.
pub type Bytes = SmallVec<[u8; 8]>;

/// An ordered byte string used as a sortable position marker.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identifier(Bytes);

impl Identifier {
    /// Wrap raw bytes. No form is checked here; the codec and allocator
    /// validate when they consume an identifier.
    pub fn from_bytes(bytes: &[u8]) -> Identifier {
        return Identifier(Bytes::from_slice(bytes));
    }

    pub(crate) fn from_vec(bytes: Bytes) -> Identifier {
        return Identifier(bytes);
    }

    /// The raw bytes, in whatever form this identifier was built in.
    pub fn as_bytes(&self) -> &[u8] {
        return &self.0;
    }

    /// Consume the identifier, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        return self.0.into_vec();
    }

    /// Number of bytes in this form. For a compact identifier this is the
    /// stored length, not the dense one.
    pub fn len(&self) -> usize {
        return self.0.len();
    }

    /// True only for a hand-built empty identifier; generated ones never are.
    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }

    /// Whether `self` sorts strictly before `other`.
    pub fn less_than(&self, other: &Identifier) -> bool {
        return less_than(self.as_bytes(), other.as_bytes());
    }

    /// Whether `self` sorts strictly after `other`.
    pub fn greater_than(&self, other: &Identifier) -> bool {
        return greater_than(self.as_bytes(), other.as_bytes());
    }

    /// Whether both hold the same bytes.
    pub fn equal_to(&self, other: &Identifier) -> bool {
        return equal_to(self.as_bytes(), other.as_bytes());
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        return compare(self.as_bytes(), other.as_bytes());
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        return self.as_bytes();
    }
}

impl From<&[u8]> for Identifier {
    fn from(bytes: &[u8]) -> Identifier {
        return Identifier::from_bytes(bytes);
    }
}

impl<const N: usize> From<[u8; N]> for Identifier {
    fn from(bytes: [u8; N]) -> Identifier {
        return Identifier::from_bytes(&bytes);
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "Identifier{}", Hex::new(self.as_bytes()));
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return fmt::Display::fmt(&Hex::new(self.as_bytes()), f);
    }
}

/// Compare two identifiers in the same representation.
///
/// Bytes are compared up to the shorter length; on a tie over the common
/// prefix the shorter side is smaller.
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    return a.len().cmp(&b.len());
}

/// `compare(a, b)` is `Less`.
pub fn less_than(a: &[u8], b: &[u8]) -> bool {
    return compare(a, b) == Ordering::Less;
}

/// `compare(a, b)` is `Greater`.
pub fn greater_than(a: &[u8], b: &[u8]) -> bool {
    return compare(a, b) == Ordering::Greater;
}

/// `compare(a, b)` is `Equal`.
pub fn equal_to(a: &[u8], b: &[u8]) -> bool {
    return compare(a, b) == Ordering::Equal;
}

/// One side of a generation request.
///
/// The sentinels are their own variants rather than magic byte strings, so
/// they can never be fed to the codec by accident.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound<'a> {
    /// The synthetic left bound, dense `[0x01]`.
    Min,
    /// The synthetic right bound, `[0x80]`. Above every real identifier.
    Infinity,
    /// A stored identifier.
    Id(&'a Identifier),
}

impl<'a> Bound<'a> {
    /// The sentinel's fixed bytes, or `None` for a real identifier.
    pub fn sentinel_bytes(&self) -> Option<&'static [u8]> {
        return match self {
            Bound::Min => Some(&[MIN_BYTE]),
            Bound::Infinity => Some(&[INFINITY_BYTE]),
            Bound::Id(_) => None,
        };
    }

    /// Whether this is `Min` or `Infinity`.
    pub fn is_sentinel(&self) -> bool {
        return !matches!(self, Bound::Id(_));
    }
}

impl<'a> From<&'a Identifier> for Bound<'a> {
    fn from(id: &'a Identifier) -> Bound<'a> {
        return Bound::Id(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order() {
        assert_eq!(compare(&[1, 2], &[1, 3]), Ordering::Less);
        assert_eq!(compare(&[2], &[1, 127]), Ordering::Greater);
        assert_eq!(compare(&[5, 5], &[5, 5]), Ordering::Equal);
    }

    #[test]
    fn prefix_sorts_first() {
        assert!(less_than(&[1], &[1, 0]));
        assert!(greater_than(&[1, 0], &[1]));
        assert!(less_than(&[1, 64], &[1, 64, 0]));
    }

    #[test]
    fn derived_predicates_agree() {
        let a = Identifier::from([0x01, 0x41]);
        let b = Identifier::from([0x01, 0x41, 0x40]);

        assert!(a.less_than(&b));
        assert!(b.greater_than(&a));
        assert!(!a.equal_to(&b));
        assert!(a.equal_to(&a.clone()));
        assert!(a < b);
    }

    #[test]
    fn ord_matches_slice_order() {
        let samples: [&[u8]; 6] = [&[0], &[0, 0], &[1], &[1, 127, 3], &[2], &[127, 127]];
        for x in samples {
            for y in samples {
                let ix = Identifier::from_bytes(x);
                let iy = Identifier::from_bytes(y);
                assert_eq!(ix.cmp(&iy), x.cmp(y));
            }
        }
    }

    #[test]
    fn sentinels_are_variants() {
        let id = Identifier::from([0x80]);
        assert_eq!(Bound::Infinity.sentinel_bytes(), Some(&[0x80][..]));
        assert_eq!(Bound::Min.sentinel_bytes(), Some(&[0x01][..]));
        assert_eq!(Bound::Id(&id).sentinel_bytes(), None);
        assert!(!Bound::from(&id).is_sentinel());
    }

    #[test]
    fn debug_is_hex() {
        let id = Identifier::from([0x03, 0x81, 0x80, 0x21]);
        assert_eq!(format!("{id:?}"), "Identifier[03 81 80 21]");
        assert_eq!(id.to_string(), "[03 81 80 21]");
    }
}
