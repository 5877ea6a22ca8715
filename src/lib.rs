//! Interpose - order-preserving identifier allocation for replicated sequences.
//!
//! Given two identifiers already in sorted order, the allocator builds a new
//! one that sorts strictly between them, so any replica can insert anywhere in
//! a shared ordered list using only its local neighbors and without ever
//! renumbering other elements.
//!
//! # Quick Start
//!
//! ```
//! use interpose::allocator::generate_between;
//! use interpose::config::Compression;
//! use interpose::id::Bound;
//! use interpose::seq::IdArray;
//! use interpose::seq::Sequence;
//!
//! // Directly between two bounds.
//! let first = generate_between(Bound::Min, Bound::Infinity, Compression::Enabled).unwrap();
//! let second = generate_between(Bound::Id(&first), Bound::Infinity, Compression::Enabled).unwrap();
//! assert!(first < second);
//!
//! // Or let a sequence pick the neighbors.
//! let mut seq = IdArray::new();
//! let a = seq.insert_at(0).unwrap();
//! let b = seq.insert_at(0).unwrap();
//! assert_eq!(seq.get_at(0).unwrap(), &b);
//! assert_eq!(seq.get_at(1).unwrap(), &a);
//! ```
//!
//! # Modules
//!
//! - [`id`]: identifiers, their total order, and the `Min`/`Infinity` bounds
//! - [`codec`]: run-length compression of `0x7f` runs
//! - [`allocator`]: the between-two-identifiers algorithm
//! - [`seq`]: array and linked-list sequences built on the allocator
//! - [`config`], [`error`]: configuration and error types
//!
//! Identifiers are deterministic in their bounds. Two replicas allocating
//! between the same neighbors get the same identifier; telling those apart
//! is left to the embedding system.

pub mod allocator;
pub mod codec;
pub mod config;
pub mod error;
pub mod id;
pub mod seq;

pub use allocator::Allocator;
pub use allocator::generate_between;
pub use config::Compression;
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use id::Bound;
pub use id::Identifier;
