//! Identifier sequence backed by a growable array.
//!
//! Lookups are O(1); inserts and deletes shift the tail, O(n). The identifier
//! for a slot is always generated from the current neighbors before the slot
//! is opened.

use tracing::trace;

use super::Sequence;
use super::bounds;
use super::out_of_bounds;
use crate::allocator::Allocator;
use crate::config::Config;
use crate::error::Result;
use crate::id::Identifier;

/// A sorted array of identifiers.
#[derive(Clone, Debug)]
pub struct IdArray {
    ids: Vec<Identifier>,
    allocator: Allocator,
}

impl IdArray {
    /// Create an empty array with the default configuration.
    pub fn new() -> IdArray {
        return IdArray::with_config(Config::default());
    }

    /// Create an empty array reserving `config.initial_capacity` slots.
    pub fn with_config(config: Config) -> IdArray {
        return IdArray {
            ids: Vec::with_capacity(config.initial_capacity.max(1)),
            allocator: Allocator::with_config(config),
        };
    }

    /// The allocator used for inserts.
    pub fn allocator(&self) -> &Allocator {
        return &self.allocator;
    }

    /// Slots available before the backing store must grow.
    pub fn capacity(&self) -> usize {
        return self.ids.capacity();
    }

    /// The stored identifiers, in order.
    pub fn as_slice(&self) -> &[Identifier] {
        return &self.ids;
    }

    /// Double the backing store if it is full.
    fn reserve_slot(&mut self) {
        let capacity = self.ids.capacity();
        if self.ids.len() < capacity {
            return;
        }
        self.ids.reserve_exact(capacity.max(1));
        trace!(from = capacity, to = self.ids.capacity(), "grew identifier array");
    }
}

impl Default for IdArray {
    fn default() -> Self {
        return Self::new();
    }
}

impl Sequence for IdArray {
    fn generate_id_at(&self, position: usize) -> Result<Identifier> {
        if position > self.ids.len() {
            return Err(out_of_bounds(position, self.ids.len()));
        }
        let prev = position.checked_sub(1).and_then(|i| self.ids.get(i));
        let next = self.ids.get(position);
        let (lo, hi) = bounds(prev, next);
        return self.allocator.between(lo, hi);
    }

    fn insert_at(&mut self, position: usize) -> Result<Identifier> {
        let id = self.generate_id_at(position)?;
        self.reserve_slot();
        self.ids.insert(position, id.clone());
        trace!(position, len = self.ids.len(), id = %id, "inserted identifier");
        return Ok(id);
    }

    fn delete_at(&mut self, position: usize) -> Result<Identifier> {
        if position >= self.ids.len() {
            return Err(out_of_bounds(position, self.ids.len()));
        }
        let id = self.ids.remove(position);
        trace!(position, len = self.ids.len(), id = %id, "deleted identifier");
        return Ok(id);
    }

    fn get_at(&self, position: usize) -> Result<&Identifier> {
        return self
            .ids
            .get(position)
            .ok_or_else(|| out_of_bounds(position, self.ids.len()));
    }

    fn len(&self) -> usize {
        return self.ids.len();
    }

    fn iter(&self) -> impl Iterator<Item = &Identifier> {
        return self.ids.iter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::generate_between;
    use crate::codec::decompress;
    use crate::config::Compression;
    use crate::error::Error;
    use crate::id::Bound;

    #[test]
    fn first_insert_matches_direct_allocation() {
        let mut seq = IdArray::new();
        let id = seq.insert_at(0).unwrap();

        let direct = generate_between(Bound::Min, Bound::Infinity, Compression::Enabled).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(id, direct);
        assert_eq!(seq.get_at(0).unwrap(), &direct);
    }

    #[test]
    fn front_inserts_shift_elements() {
        let mut seq = IdArray::new();
        let last = seq.insert_at(0).unwrap();
        let first = seq.insert_at(0).unwrap();

        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get_at(0).unwrap(), &first);
        assert_eq!(seq.get_at(1).unwrap(), &last);
        assert_eq!(first.as_bytes(), &[0x01, 0x40]);
    }

    #[test]
    fn grows_by_doubling() {
        let config = Config::new().with_initial_capacity(4);
        let mut seq = IdArray::with_config(config);
        assert!(seq.capacity() >= 4);

        let before = seq.capacity();
        for i in 0..=before {
            seq.insert_at(i).unwrap();
        }
        assert!(seq.capacity() >= before * 2);
        assert_eq!(seq.len(), before + 1);
    }

    #[test]
    fn zero_capacity_still_grows() {
        let mut seq = IdArray::with_config(Config::new().with_initial_capacity(0));
        seq.insert_at(0).unwrap();
        seq.insert_at(1).unwrap();
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn dense_storage() {
        let config = Config::new().with_compression(Compression::Disabled);
        let mut seq = IdArray::with_config(config);
        for i in 0..200 {
            seq.insert_at(i).unwrap();
        }
        // Dense ids keep their 0x7f bytes.
        assert!(seq.iter().any(|id| id.as_bytes().contains(&0x7f)));
        for pair in seq.as_slice().windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn compact_storage_is_sorted_when_decoded() {
        let mut seq = IdArray::new();
        for i in 0..300 {
            seq.insert_at(i / 2).unwrap();
        }
        let dense: Vec<_> = seq.iter().map(|id| decompress(id.as_bytes()).unwrap()).collect();
        for pair in dense.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn out_of_range_positions() {
        let mut seq = IdArray::new();
        assert_eq!(
            seq.insert_at(1).unwrap_err(),
            Error::PositionOutOfBounds { position: 1, len: 0 }
        );
        assert!(seq.get_at(0).is_err());
        assert!(seq.delete_at(0).is_err());

        seq.insert_at(0).unwrap();
        assert!(seq.get_at(1).is_err());
        assert!(seq.delete_at(1).is_err());
        assert!(seq.generate_id_at(2).is_err());
        assert!(seq.generate_id_at(1).is_ok());
    }

    #[test]
    fn delete_returns_identifier() {
        let mut seq = IdArray::new();
        let a = seq.insert_at(0).unwrap();
        let b = seq.insert_at(1).unwrap();
        assert_eq!(seq.delete_at(0).unwrap(), a);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get_at(0).unwrap(), &b);
    }
}
