//! Slab-like node storage with stable keys.
//!
//! The list never allocates nodes itself. It asks a [`Storage`] for a slot,
//! links the returned key into its chain, and hands the slot back when the
//! node is erased. Keys stay valid until explicitly removed, which is what
//! lets a [`Position`](crate::Position) keep pointing at the same node while
//! other nodes come and go.
//!
//! ```text
//! Storage<T>              - try_insert, get, get_mut, remove, len
//!     │
//!     ├── BoundedStorage<T>   - fixed capacity, try_insert can fail with Full<T>
//!     │
//!     └── UnboundedStorage<T> - growable, insert -> K (infallible)
//! ```
//!
//! `slab::Slab` is the growable backend. [`BoundedSlab`] puts a hard cap on
//! it for callers that must not allocate past a budget.
//!
//! The traits are sealed. The owned list hands out `&mut` references to
//! several nodes at once and relies on distinct keys mapping to distinct
//! slots, which only the storages in this module promise.

use std::marker::PhantomData;

use crate::Key;

mod sealed {
    pub trait Sealed {}

    impl<T> Sealed for slab::Slab<T> {}
    impl<T, K: crate::Key> Sealed for super::BoundedSlab<T, K> {}
}

/// Slab-like storage with stable keys.
///
/// Guarantees:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **Distinct slots**: two live keys never share a value
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
pub trait Storage<T>: sealed::Sealed {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the storage cannot take another value.
    /// Growable storage never fails.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a new, empty storage configured like this one.
    fn empty_like(&self) -> Self
    where
        Self: Sized;
}

/// Storage with a fixed number of slots.
///
/// [`Storage::try_insert`] fails with [`Full`] once every slot is occupied.
pub trait BoundedStorage<T>: Storage<T> {
    /// Returns the maximum number of occupied slots.
    fn capacity(&self) -> usize;
}

/// Storage that grows on demand.
///
/// Allocation failure aborts, as it does for any standard collection.
pub trait UnboundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable key.
    fn insert(&mut self, value: T) -> Self::Key;
}

/// Error returned when fixed-capacity storage is full.
///
/// Carries the rejected value back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// slab::Slab - growable
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(slab::Slab::insert(self, value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    fn empty_like(&self) -> Self {
        slab::Slab::new()
    }
}

impl<T> UnboundedStorage<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> usize {
        slab::Slab::insert(self, value)
    }
}

// =============================================================================
// BoundedSlab - slab with a hard capacity
// =============================================================================

/// Fixed-capacity storage on top of `slab::Slab`.
///
/// All slots are reserved up front, so inserting never reallocates. Once
/// `capacity` slots are occupied, inserts fail with [`Full`] until something
/// is removed. Keys are narrowed to `K` (default `u32`) to keep list nodes
/// small.
///
/// # Example
///
/// ```
/// use nexus_forward_list::{BoundedSlab, Storage};
///
/// let mut storage: BoundedSlab<u64> = BoundedSlab::with_capacity(2);
/// let a = storage.try_insert(1).unwrap();
/// storage.try_insert(2).unwrap();
///
/// assert_eq!(storage.try_insert(3).unwrap_err().into_inner(), 3);
///
/// storage.remove(a);
/// assert!(storage.try_insert(3).is_ok());
/// ```
#[derive(Debug)]
pub struct BoundedSlab<T, K: Key = u32> {
    slots: slab::Slab<T>,
    capacity: usize,
    _marker: PhantomData<K>,
}

impl<T, K: Key> BoundedSlab<T, K> {
    /// Creates storage holding at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or not representable by the key type.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        Self {
            slots: slab::Slab::with_capacity(capacity),
            capacity,
            _marker: PhantomData,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Drops every stored value.
    ///
    /// Lists that still hold keys into this storage are left dangling; clear
    /// them first.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T, K: Key> Storage<T> for BoundedSlab<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.is_full() {
            trace!(capacity = self.capacity, "bounded storage rejected insert");
            return Err(Full(value));
        }

        // Vacant slots are reused before the slab grows, so the slot index
        // stays below `capacity`.
        Ok(K::from_usize(self.slots.insert(value)))
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        self.slots.try_remove(key.as_usize())
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key.as_usize())
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key.as_usize())
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn empty_like(&self) -> Self {
        Self::with_capacity(self.capacity)
    }
}

impl<T, K: Key> BoundedStorage<T> for BoundedSlab<T, K> {
    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}
