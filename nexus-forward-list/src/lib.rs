//! Singly-linked "insert-after" lists over slab storage.
//!
//! A forward list only links forward, so every edit is phrased relative to
//! the node *before* the change: `insert_after`, `erase_after`,
//! `remove_after`. A virtual before-begin position makes the front of the
//! list just another "after" target, even when the list is empty.
//!
//! # Design
//!
//! Nodes are not heap-allocated one by one. They live in slab storage and
//! link to each other by key:
//!
//! ```text
//! Storage (Slab)          - owns nodes, provides stable keys
//! ForwardList             - one head key, walks node.next keys
//! OwnedForwardList        - ForwardList + its own storage, value semantics
//! ```
//!
//! Benefits:
//! - **Stable positions**: erasing one node never moves another
//! - **No per-node allocation**: pre-size the slab, or cap it with [`BoundedSlab`]
//! - **Shared storage**: several raw lists can draw from one pool and trade
//!   chains with `split_after` / `splice_after`
//!
//! # Quick Start
//!
//! ```
//! use nexus_forward_list::OwnedForwardList;
//!
//! let mut list: OwnedForwardList<u64> = OwnedForwardList::new();
//! list.push_front(3);
//! list.push_front(1);
//!
//! let one = list.begin();
//! list.insert_after(one, 2);
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(list.pop_front(), Some(1));
//! ```
//!
//! # Positions
//!
//! A [`Position`] is `BeforeBegin`, `End`, or `Node(key)`. It is plain data:
//! it stays valid while its node is linked and goes stale once that node is
//! erased.
//!
//! # Error Contract
//!
//! The same rules apply to every operation:
//!
//! - **Nothing to read is `None`.** `front`, `get`, `pop_front`,
//!   `remove_after` and cursor `current` return `Option`. Reading
//!   `BeforeBegin` or `End` gives `None`.
//! - **Unusable positions panic.** Inserting after `End`, `erase_after` on a
//!   position with no successor, advancing past `End`, an `erase_range_after`
//!   whose end is unreachable, and any position naming a vacant key all panic
//!   with a message.
//! - **Foreign or stale positions are not detected** when their key happens
//!   to be live. The operation stays memory safe but acts on whichever node
//!   holds the key. Don't do this.
//! - **Full bounded storage is an error value.** `try_*` methods return
//!   [`Full<T>`] carrying the rejected value. Multi-element inserts stop at
//!   the first failure and keep what they already linked.
//!
//! # Storage Traits
//!
//! ```text
//! Storage<T>           - try_insert, get, remove, len
//!     │
//!     ├── BoundedStorage<T>   - fixed capacity, try_insert may fail
//!     │
//!     └── UnboundedStorage<T> - growable, insert -> Key (infallible)
//! ```
//!
//! Every list offers `try_*` insertion. Lists over unbounded storage also
//! get the infallible `push_front` / `insert_after` family.
//!
//! | Storage | Capacity | Key | Alias |
//! |---------|----------|-----|-------|
//! | `slab::Slab` | Growable | `usize` | [`SlabListStorage`] |
//! | [`BoundedSlab`] | Fixed | `u32` (configurable) | [`BoundedListStorage`] |
//!
//! # Feature Flags
//!
//! - `tracing` - emit `trace`-level events on cold paths (clear, truncate,
//!   range erase, full storage)

#![warn(missing_docs)]

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

pub mod forward_list;
pub mod key;
pub mod owned;
pub mod storage;

pub use forward_list::{
    BoundedListStorage, Cursor, CursorMut, Drain, ForwardList, Iter, Keys, Node, Position,
    SlabListStorage,
};
pub use key::Key;
pub use owned::{BoundedForwardList, IntoIter, IterMut, OwnedForwardList};
pub use storage::{BoundedSlab, BoundedStorage, Full, Storage, UnboundedStorage};
