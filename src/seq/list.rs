//! Identifier sequence backed by a singly linked list.
//!
//! The chain always starts with a head sentinel (byte `0x00`, below `MIN`)
//! and ends with a tail sentinel (`INFINITY`). Real identifiers live strictly
//! between them. The sentinels are never returned, counted or removed.
//!
//! ```text
//! [00] -> [02] -> [03 40] -> [04] -> [80]
//! ```
//!
//! This is also the list's `Debug` form.
//!
//! Every positional operation walks from the head, so all of them are O(n).

use std::fmt;

use tracing::trace;

use super::Sequence;
use super::bounds;
use super::out_of_bounds;
use crate::allocator::Allocator;
use crate::config::Config;
use crate::error::Hex;
use crate::error::Result;
use crate::id::INFINITY_BYTE;
use crate::id::Identifier;

/// Byte the head sentinel sorts as.
const HEAD_BYTE: u8 = 0x00;

enum Slot {
    Head,
    Item(Identifier),
    Tail,
}

struct Node {
    slot: Slot,
    next: Option<Box<Node>>,
}

impl Slot {
    fn bytes(&self) -> &[u8] {
        return match self {
            Slot::Head => &[HEAD_BYTE],
            Slot::Item(id) => id.as_bytes(),
            Slot::Tail => &[INFINITY_BYTE],
        };
    }
}

impl Node {
    fn item(&self) -> Option<&Identifier> {
        return match &self.slot {
            Slot::Item(id) => Some(id),
            Slot::Head | Slot::Tail => None,
        };
    }
}

/// A sorted singly linked list of identifiers.
pub struct IdList {
    head: Box<Node>,
    len: usize,
    allocator: Allocator,
}

impl IdList {
    /// Create a list holding only the two sentinels.
    pub fn new() -> IdList {
        return IdList::with_config(Config::default());
    }

    /// Like [`IdList::new`], allocating with `config`.
    pub fn with_config(config: Config) -> IdList {
        let tail = Box::new(Node {
            slot: Slot::Tail,
            next: None,
        });
        let head = Box::new(Node {
            slot: Slot::Head,
            next: Some(tail),
        });
        return IdList {
            head,
            len: 0,
            allocator: Allocator::with_config(config),
        };
    }

    /// The allocator used for inserts.
    pub fn allocator(&self) -> &Allocator {
        return &self.allocator;
    }

    /// Whether an identifier equal to `id` is stored.
    pub fn contains(&self, id: &Identifier) -> bool {
        return self.iter().any(|item| item == id);
    }

    /// Remove the first identifier equal to `id`, scanning from the head.
    /// Returns false if there is none.
    pub fn remove(&mut self, id: &Identifier) -> bool {
        let mut node: &mut Node = &mut self.head;
        loop {
            let found = match node.next.as_deref() {
                Some(next) => match next.item() {
                    Some(item) => item == id,
                    None => return false,
                },
                None => return false,
            };
            if found {
                let removed = unlink_after(node).is_some();
                if removed {
                    self.len -= 1;
                    trace!(len = self.len, id = %id, "removed identifier");
                }
                return removed;
            }
            node = match node.next.as_deref_mut() {
                Some(next) => next,
                None => return false,
            };
        }
    }

    /// The node `position` steps after the head. Position 0 is the head.
    fn node_before(&self, position: usize) -> Option<&Node> {
        let mut node: &Node = &self.head;
        for _ in 0..position {
            node = node.next.as_deref()?;
        }
        return Some(node);
    }

    fn node_before_mut(&mut self, position: usize) -> Option<&mut Node> {
        let mut node: &mut Node = &mut self.head;
        for _ in 0..position {
            node = node.next.as_deref_mut()?;
        }
        return Some(node);
    }
}

/// Detach the node after `node` if it holds an identifier.
fn unlink_after(node: &mut Node) -> Option<Identifier> {
    let removed = node.next.take()?;
    let Node { slot, next } = *removed;
    match slot {
        Slot::Item(id) => {
            node.next = next;
            return Some(id);
        }
        sentinel => {
            node.next = Some(Box::new(Node { slot: sentinel, next }));
            return None;
        }
    }
}

impl Default for IdList {
    fn default() -> Self {
        return Self::new();
    }
}

impl Drop for IdList {
    // Unlink iteratively; the default drop recurses once per node.
    fn drop(&mut self) {
        let mut next = self.head.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

impl fmt::Debug for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node = Some(&*self.head);
        let mut first = true;
        while let Some(current) = node {
            if !first {
                f.write_str(" -> ")?;
            }
            first = false;
            write!(f, "{}", Hex::new(current.slot.bytes()))?;
            node = current.next.as_deref();
        }
        return Ok(());
    }
}

impl Sequence for IdList {
    fn generate_id_at(&self, position: usize) -> Result<Identifier> {
        if position > self.len {
            return Err(out_of_bounds(position, self.len));
        }
        let prev = self
            .node_before(position)
            .ok_or_else(|| out_of_bounds(position, self.len))?;
        let next = prev.next.as_deref().and_then(Node::item);
        let (lo, hi) = bounds(prev.item(), next);
        return self.allocator.between(lo, hi);
    }

    fn insert_at(&mut self, position: usize) -> Result<Identifier> {
        let id = self.generate_id_at(position)?;
        let len = self.len;
        let prev = self
            .node_before_mut(position)
            .ok_or_else(|| out_of_bounds(position, len))?;
        let next = prev.next.take();
        prev.next = Some(Box::new(Node {
            slot: Slot::Item(id.clone()),
            next,
        }));
        self.len += 1;
        trace!(position, len = self.len, id = %id, "inserted identifier");
        return Ok(id);
    }

    fn delete_at(&mut self, position: usize) -> Result<Identifier> {
        let len = self.len;
        if position >= len {
            return Err(out_of_bounds(position, len));
        }
        let prev = self
            .node_before_mut(position)
            .ok_or_else(|| out_of_bounds(position, len))?;
        let id = unlink_after(prev).ok_or_else(|| out_of_bounds(position, len))?;
        self.len -= 1;
        trace!(position, len = self.len, id = %id, "deleted identifier");
        return Ok(id);
    }

    fn get_at(&self, position: usize) -> Result<&Identifier> {
        if position >= self.len {
            return Err(out_of_bounds(position, self.len));
        }
        return self
            .node_before(position + 1)
            .and_then(Node::item)
            .ok_or_else(|| out_of_bounds(position, self.len));
    }

    fn len(&self) -> usize {
        return self.len;
    }

    fn iter(&self) -> impl Iterator<Item = &Identifier> {
        return Iter {
            node: self.head.next.as_deref(),
        };
    }
}

struct Iter<'a> {
    node: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Identifier;

    fn next(&mut self) -> Option<&'a Identifier> {
        while let Some(node) = self.node {
            self.node = node.next.as_deref();
            if let Some(id) = node.item() {
                return Some(id);
            }
        }
        return None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_list_has_only_sentinels() {
        let seq = IdList::new();
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.iter().count(), 0);
        assert!(seq.get_at(0).is_err());
    }

    #[test]
    fn inserts_stay_between_sentinels() {
        let mut seq = IdList::new();
        let a = seq.insert_at(0).unwrap();
        let c = seq.insert_at(1).unwrap();
        let b = seq.insert_at(1).unwrap();

        assert_eq!(a.as_bytes(), &[0x02]);
        assert_eq!(c.as_bytes(), &[0x03]);
        assert_eq!(b.as_bytes(), &[0x02, 0x40]);

        let ids: Vec<_> = seq.iter().cloned().collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn remove_by_value() {
        let mut seq = IdList::new();
        let a = seq.insert_at(0).unwrap();
        let b = seq.insert_at(1).unwrap();

        assert!(seq.contains(&a));
        assert!(seq.remove(&a));
        assert!(!seq.contains(&a));
        assert!(!seq.remove(&a));
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get_at(0).unwrap(), &b);
    }

    #[test]
    fn sentinel_bytes_are_never_removed() {
        let mut seq = IdList::new();
        seq.insert_at(0).unwrap();
        assert!(!seq.remove(&Identifier::from([HEAD_BYTE])));
        assert!(!seq.remove(&Identifier::from([0x80])));
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn delete_by_position() {
        let mut seq = IdList::new();
        for i in 0..5 {
            seq.insert_at(i).unwrap();
        }
        let third = seq.get_at(2).unwrap().clone();
        assert_eq!(seq.delete_at(2).unwrap(), third);
        assert_eq!(seq.len(), 4);
        assert!(!seq.contains(&third));
        assert_eq!(
            seq.delete_at(4).unwrap_err(),
            Error::PositionOutOfBounds { position: 4, len: 4 }
        );
    }

    #[test]
    fn long_list_drops() {
        let mut seq = IdList::new();
        for _ in 0..10_000 {
            let end = seq.len();
            seq.insert_at(end).unwrap();
        }
        assert_eq!(seq.len(), 10_000);
        drop(seq);
    }

    #[test]
    fn debug_shows_chain_with_sentinels() {
        let mut seq = IdList::new();
        assert_eq!(format!("{seq:?}"), "[00] -> [80]");

        seq.insert_at(0).unwrap();
        seq.insert_at(1).unwrap();
        assert_eq!(format!("{seq:?}"), "[00] -> [02] -> [03] -> [80]");
    }
}
