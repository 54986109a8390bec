//! Forward lists that own their storage.
//!
//! [`OwnedForwardList`] bundles a [`ForwardList`](crate::ForwardList) with
//! the storage its nodes live in. It behaves like a standard collection:
//! cloning deep-copies, dropping releases every node, and no method takes a
//! storage argument.
//!
//! # When to use the owned variant
//!
//! - One list per storage pool
//! - Value semantics (`Clone`, `PartialEq`, `Hash`, `FromIterator`)
//! - Mutable iteration (`iter_mut`)
//!
//! # When to use the raw variant
//!
//! Use [`ForwardList`](crate::ForwardList) with external storage when:
//! - Several lists share one storage pool
//! - You move chains between lists with `split_after` / `splice_after`
//!
//! # Example
//!
//! ```
//! use nexus_forward_list::{BoundedForwardList, OwnedForwardList};
//!
//! // Growable
//! let mut list: OwnedForwardList<u64> = OwnedForwardList::new();
//! list.push_front(2);
//! list.push_front(1);
//! assert_eq!(list.pop_front(), Some(1));
//!
//! // Fixed capacity
//! let mut bounded: BoundedForwardList<u64> = BoundedForwardList::with_capacity(1);
//! bounded.try_push_front(1).unwrap();
//! assert!(bounded.try_push_front(2).is_err());
//! ```

mod forward_list;

pub use forward_list::{BoundedForwardList, IntoIter, IterMut, OwnedForwardList};
