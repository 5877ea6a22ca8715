//! Ordered sequences that allocate identifiers for their own positions.
//!
//! Both adapters keep identifiers sorted and ask the [`Allocator`] for a new
//! one between the neighbors of the insertion point. Position 0 uses the
//! `Min` sentinel as its left neighbor and the end position uses `Infinity`
//! as its right neighbor.
//!
//! | Adapter | Storage | Insert | Delete |
//! |---------|---------|--------|--------|
//! | [`IdArray`] | growable array | shift right | by position |
//! | [`IdList`] | singly linked list with sentinels | relink | by position or by value |
//!
//! Neither adapter is synchronized. Callers that share one across threads
//! must serialize access to it.
//!
//! [`Allocator`]: crate::allocator::Allocator

use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::error::Result;
use crate::id::Bound;
use crate::id::Identifier;

pub mod array;
pub mod list;

pub use array::IdArray;
pub use list::IdList;

/// The operations callers need from an identifier sequence.
pub trait Sequence {
    /// Identifier that would be stored at `position` if inserted there now.
    ///
    /// Fails if `position > len()`.
    fn generate_id_at(&self, position: usize) -> Result<Identifier>;

    /// Allocate an identifier for `position` and store it there, moving the
    /// element previously at `position` (and all after it) one place right.
    fn insert_at(&mut self, position: usize) -> Result<Identifier>;

    /// Remove and return the identifier at `position`.
    fn delete_at(&mut self, position: usize) -> Result<Identifier>;

    fn get_at(&self, position: usize) -> Result<&Identifier>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Stored identifiers in order.
    fn iter(&self) -> impl Iterator<Item = &Identifier>;

    /// Count of stored identifiers per byte length.
    fn length_histogram(&self) -> FxHashMap<usize, usize> {
        return length_histogram(self.iter());
    }
}

/// Count identifiers by their byte length.
pub fn length_histogram<'a>(ids: impl IntoIterator<Item = &'a Identifier>) -> FxHashMap<usize, usize> {
    let mut counts = FxHashMap::default();
    for id in ids {
        *counts.entry(id.len()).or_insert(0) += 1;
    }
    return counts;
}

/// Allocation bounds for a slot between `prev` and `next`.
pub(crate) fn bounds<'a>(prev: Option<&'a Identifier>, next: Option<&'a Identifier>) -> (Bound<'a>, Bound<'a>) {
    let lo = prev.map_or(Bound::Min, Bound::Id);
    let hi = next.map_or(Bound::Infinity, Bound::Id);
    return (lo, hi);
}

pub(crate) fn out_of_bounds(position: usize, len: usize) -> Error {
    return Error::PositionOutOfBounds { position, len };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_lengths() {
        let ids = [
            Identifier::from([0x02]),
            Identifier::from([0x03]),
            Identifier::from([0x03, 0x40]),
            Identifier::from([0x81, 0x82, 0x42]),
        ];
        let counts = length_histogram(&ids);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), Some(&1));
        assert_eq!(counts.get(&4), None);
    }

    #[test]
    fn missing_neighbors_become_sentinels() {
        let id = Identifier::from([0x05]);
        assert_eq!(bounds(None, None), (Bound::Min, Bound::Infinity));
        assert_eq!(bounds(Some(&id), None), (Bound::Id(&id), Bound::Infinity));
        assert_eq!(bounds(None, Some(&id)), (Bound::Min, Bound::Id(&id)));
    }
}
