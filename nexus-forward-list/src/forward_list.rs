//! Singly-linked list over external node storage.
//!
//! Nodes live in a user-provided [`Storage`]; the list itself is a single
//! head key. Every node stores its payload and the key of its successor, so
//! the list can only walk forward. Modifications happen *after* a known
//! [`Position`], which makes them O(1) without a back link.
//!
//! # Before-Begin
//!
//! [`Position::BeforeBegin`] is a virtual position in front of the first
//! element. Inserting or erasing "after" it touches the front of the list,
//! which is how [`push_front`](ForwardList::push_front) and
//! [`pop_front`](ForwardList::pop_front) are built, and it works on an empty
//! list too. Before-begin is never dereferenceable.
//!
//! # Storage Invariant
//!
//! A list instance must always be used with the same storage instance.
//! Passing a different storage is a logic error: operations stay memory safe
//! but will panic or act on unrelated nodes.
//!
//! # Example
//!
//! ```
//! use nexus_forward_list::{ForwardList, Position, SlabListStorage};
//!
//! let mut storage: SlabListStorage<u64> = slab::Slab::new();
//! let mut list: ForwardList<u64, SlabListStorage<u64>> = ForwardList::new();
//!
//! list.push_front(&mut storage, 3);
//! list.push_front(&mut storage, 1);
//!
//! // Insert between 1 and 3
//! let one = list.begin();
//! let two = list.insert_after(&mut storage, one, 2);
//! assert_eq!(list.get(&storage, two), Some(&2));
//!
//! let values: Vec<_> = list.iter(&storage).copied().collect();
//! assert_eq!(values, vec![1, 2, 3]);
//!
//! // Erase everything between 1 and the end
//! list.erase_range_after(&mut storage, one, Position::End);
//! assert_eq!(list.front(&storage), Some(&1));
//! ```
//!
//! # Sharing Storage
//!
//! Several lists can share one storage pool. [`split_after`](ForwardList::split_after)
//! and [`splice_after`](ForwardList::splice_after) move whole chains between
//! them by relinking keys, without touching the payloads.
//!
//! ```
//! use nexus_forward_list::{ForwardList, SlabListStorage};
//!
//! let mut storage: SlabListStorage<&str> = slab::Slab::new();
//! let mut ready: ForwardList<&str, SlabListStorage<&str>> = ForwardList::new();
//! let mut parked: ForwardList<&str, SlabListStorage<&str>> = ForwardList::new();
//!
//! ready.assign(&mut storage, ["a", "b", "c"]);
//!
//! // Park everything after "a"
//! let mut tail = ready.split_after(&mut storage, ready.begin());
//! parked.splice_after(&mut storage, parked.before_begin(), &mut tail);
//!
//! assert_eq!(ready.iter(&storage).copied().collect::<Vec<_>>(), vec!["a"]);
//! assert_eq!(parked.iter(&storage).copied().collect::<Vec<_>>(), vec!["b", "c"]);
//! ```

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::{BoundedSlab, Full, Key, Storage, UnboundedStorage};

/// Growable list storage backed by `slab::Slab`.
pub type SlabListStorage<T> = slab::Slab<Node<T, usize>>;

/// Fixed-capacity list storage backed by [`BoundedSlab`].
pub type BoundedListStorage<T, K = u32> = BoundedSlab<Node<T, K>, K>;

/// A node in the forward list.
///
/// Wraps user data with a successor link. The link is owned by the list:
/// users only ever see `&T` / `&mut T` through the list's accessors.
#[derive(Debug)]
pub struct Node<T, K: Key = usize> {
    pub(crate) data: T,
    pub(crate) next: K,
}

impl<T, K: Key> Node<T, K> {
    #[inline]
    fn new(data: T, next: K) -> Self {
        Self { data, next }
    }
}

/// A position in a forward list.
///
/// Positions are plain handles: copying one is free, and it stays valid
/// until the node it names is erased. Two positions are equal iff they name
/// the same node, or are both `BeforeBegin`, or both `End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position<K: Key = usize> {
    /// The virtual position in front of the first element.
    BeforeBegin,
    /// The element stored under this key.
    Node(K),
    /// One past the last element.
    End,
}

impl<K: Key> Position<K> {
    /// Converts a successor link to a position (`NONE` is `End`).
    #[inline]
    pub(crate) fn from_link(link: K) -> Self {
        if link.is_none() {
            Self::End
        } else {
            Self::Node(link)
        }
    }

    /// Returns the node key, if this position names a node.
    #[inline]
    pub fn key(&self) -> Option<K> {
        match *self {
            Self::Node(key) => Some(key),
            _ => None,
        }
    }

    /// Returns `true` for `BeforeBegin`.
    #[inline]
    pub fn is_before_begin(&self) -> bool {
        matches!(self, Self::BeforeBegin)
    }

    /// Returns `true` for `End`.
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

/// A singly-linked list over external storage.
///
/// The list only tracks its head. Nodes live in user-provided storage,
/// wrapped in [`Node`]. There is no cached length: counting is an O(n) walk
/// (`iter(..).count()`).
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `S`: Storage type (e.g., [`SlabListStorage<T>`])
/// - `K`: Key type (default `usize`)
///
/// # Contract
///
/// - Reads (`get`, `front`, `pop_front`, `remove_after`) return `None` when
///   there is nothing to read.
/// - Structural operations panic when handed a position they cannot act on:
///   inserting after `End`, erasing after a position with no successor,
///   advancing past `End`, or naming a key that is vacant in storage.
/// - A position from another list, or a stale one whose key has been reused,
///   is not detected. The call stays memory safe but operates on whichever
///   node holds that key.
#[derive(Debug)]
pub struct ForwardList<T, S, K: Key = usize>
where
    S: Storage<Node<T, K>, Key = K>,
{
    head: K,
    _marker: PhantomData<(T, S)>,
}

impl<T, S, K: Key> Default for ForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Base impl - works with any Storage
// =============================================================================

impl<T, S, K: Key> ForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: K::NONE,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the head node's key, or `None` if empty.
    #[inline]
    pub fn front_key(&self) -> Option<K> {
        self.head.into_option()
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Returns the position in front of the first element.
    #[inline]
    pub fn before_begin(&self) -> Position<K> {
        Position::BeforeBegin
    }

    /// Returns the position of the first element (`End` if empty).
    #[inline]
    pub fn begin(&self) -> Position<K> {
        Position::from_link(self.head)
    }

    /// Returns the position one past the last element.
    #[inline]
    pub fn end(&self) -> Position<K> {
        Position::End
    }

    /// Returns the position following `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn next(&self, storage: &S, pos: Position<K>) -> Position<K> {
        assert!(!pos.is_end(), "cannot advance past end");
        Position::from_link(self.link(storage, pos))
    }

    /// Returns the position of the last element, or `BeforeBegin` if empty.
    ///
    /// This is an O(n) walk.
    pub fn last_position(&self, storage: &S) -> Position<K> {
        let mut pos = Position::BeforeBegin;
        let mut key = self.head;
        while key.is_some() {
            pos = Position::Node(key);
            key = Self::node(storage, key).next;
        }
        pos
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns a reference to the element at `pos`.
    ///
    /// Returns `None` for `BeforeBegin`, `End`, or a vacant key.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, pos: Position<K>) -> Option<&'a T> {
        let key = pos.key()?;
        storage.get(key).map(|node| &node.data)
    }

    /// Returns a mutable reference to the element at `pos`.
    ///
    /// Returns `None` for `BeforeBegin`, `End`, or a vacant key.
    #[inline]
    pub fn get_mut<'a>(&mut self, storage: &'a mut S, pos: Position<K>) -> Option<&'a mut T> {
        let key = pos.key()?;
        storage.get_mut(key).map(|node| &mut node.data)
    }

    /// Returns a reference to the front element.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a T> {
        self.get(storage, self.begin())
    }

    /// Returns a mutable reference to the front element.
    #[inline]
    pub fn front_mut<'a>(&mut self, storage: &'a mut S) -> Option<&'a mut T> {
        let begin = self.begin();
        self.get_mut(storage, begin)
    }

    // ========================================================================
    // Fallible insertion (any storage)
    // ========================================================================

    /// Pushes a value to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_push_front(&mut self, storage: &mut S, value: T) -> Result<Position<K>, Full<T>> {
        self.try_insert_after(storage, Position::BeforeBegin, value)
    }

    /// Pushes a value built by `f` to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_emplace_front_with<F>(&mut self, storage: &mut S, f: F) -> Result<Position<K>, Full<T>>
    where
        F: FnOnce() -> T,
    {
        self.try_insert_after(storage, Position::BeforeBegin, f())
    }

    /// Inserts a value directly after `pos`.
    ///
    /// Returns the position of the new element.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full. The list is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn try_insert_after(
        &mut self,
        storage: &mut S,
        pos: Position<K>,
        value: T,
    ) -> Result<Position<K>, Full<T>> {
        let next = self.link(storage, pos);
        let key = storage
            .try_insert(Node::new(value, next))
            .map_err(|Full(node)| Full(node.data))?;
        self.set_link(storage, pos, key);
        Ok(Position::Node(key))
    }

    /// Inserts a value built by `f` directly after `pos`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn try_emplace_after_with<F>(
        &mut self,
        storage: &mut S,
        pos: Position<K>,
        f: F,
    ) -> Result<Position<K>, Full<T>>
    where
        F: FnOnce() -> T,
    {
        self.try_insert_after(storage, pos, f())
    }

    /// Inserts `count` copies of `value` directly after `pos`.
    ///
    /// Returns the position now directly after `pos` (the last node created),
    /// or `pos`'s old successor when `count` is 0.
    ///
    /// # Errors
    ///
    /// Stops at the first failed insert and returns `Err(Full(value))`.
    /// Copies inserted before the failure stay in the list.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    pub fn try_insert_n_after(
        &mut self,
        storage: &mut S,
        pos: Position<K>,
        count: usize,
        value: T,
    ) -> Result<Position<K>, Full<T>>
    where
        T: Clone,
    {
        let successor = self.link(storage, pos);
        if count == 0 {
            return Ok(Position::from_link(successor));
        }

        for _ in 1..count {
            self.try_insert_after(storage, pos, value.clone())?;
        }
        self.try_insert_after(storage, pos, value)
    }

    /// Inserts every value of `iter` after `pos`, preserving their order.
    ///
    /// Returns the position of the last inserted element, or `pos` if `iter`
    /// was empty.
    ///
    /// # Errors
    ///
    /// Stops at the first failed insert and returns `Err(Full(value))`.
    /// Values inserted before the failure stay in the list; the rest of
    /// `iter` is not consumed.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    pub fn try_insert_range_after<I>(
        &mut self,
        storage: &mut S,
        pos: Position<K>,
        iter: I,
    ) -> Result<Position<K>, Full<T>>
    where
        I: IntoIterator<Item = T>,
    {
        self.link(storage, pos);

        let mut last = pos;
        for value in iter {
            last = self.try_insert_after(storage, last, value)?;
        }
        Ok(last)
    }

    /// Resizes the list to `len` elements, filling new tail slots with `f()`.
    ///
    /// Shrinking drops the excess tail in chain order.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up while growing; the
    /// elements appended so far stay in the list.
    pub fn try_resize_with<F>(&mut self, storage: &mut S, len: usize, mut f: F) -> Result<(), Full<T>>
    where
        F: FnMut() -> T,
    {
        let (mut tail, missing) = self.seek_or_truncate(storage, len);
        for _ in 0..missing {
            tail = self.try_insert_after(storage, tail, f())?;
        }
        Ok(())
    }

    /// Resizes the list to `len` elements, filling new tail slots with
    /// copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up while growing.
    #[inline]
    pub fn try_resize(&mut self, storage: &mut S, len: usize, value: T) -> Result<(), Full<T>>
    where
        T: Clone,
    {
        self.try_resize_with(storage, len, || value.clone())
    }

    /// Resizes the list to `len` elements, filling new tail slots with
    /// `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up while growing.
    #[inline]
    pub fn try_resize_default(&mut self, storage: &mut S, len: usize) -> Result<(), Full<T>>
    where
        T: Default,
    {
        self.try_resize_with(storage, len, T::default)
    }

    /// Replaces the contents of the list with `iter`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up; the list then holds
    /// the values inserted before the failure.
    #[inline]
    pub fn try_assign<I>(&mut self, storage: &mut S, iter: I) -> Result<(), Full<T>>
    where
        I: IntoIterator<Item = T>,
    {
        self.clear(storage);
        self.try_insert_range_after(storage, Position::BeforeBegin, iter)
            .map(|_| ())
    }

    /// Replaces the contents of the list with `count` copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up.
    #[inline]
    pub fn try_assign_n(&mut self, storage: &mut S, count: usize, value: T) -> Result<(), Full<T>>
    where
        T: Clone,
    {
        self.clear(storage);
        self.try_insert_n_after(storage, Position::BeforeBegin, count, value)
            .map(|_| ())
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes and returns the front element.
    ///
    /// Returns `None` if the list is empty.
    #[inline]
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        self.remove_after(storage, Position::BeforeBegin)
    }

    /// Removes and returns the element directly after `pos`.
    ///
    /// Returns `None` if `pos` is the last element.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn remove_after(&mut self, storage: &mut S, pos: Position<K>) -> Option<T> {
        let victim = self.link(storage, pos).into_option()?;
        let next = Self::node(storage, victim).next;
        self.set_link(storage, pos, next);
        storage.remove(victim).map(|node| node.data)
    }

    /// Erases the element directly after `pos`.
    ///
    /// Returns the position that now follows `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` has no successor, is `End`, or names a vacant key.
    #[inline]
    pub fn erase_after(&mut self, storage: &mut S, pos: Position<K>) -> Position<K> {
        let victim = self.link(storage, pos);
        assert!(victim.is_some(), "no element after position");

        let next = Self::node(storage, victim).next;
        self.set_link(storage, pos, next);
        storage.remove(victim);
        Position::from_link(next)
    }

    /// Erases every element strictly between `first` and `last`.
    ///
    /// `first` is relinked directly to `last`. Returns `last`.
    ///
    /// # Panics
    ///
    /// Panics if `last` is not reachable from `first`, if `last` is
    /// `BeforeBegin`, or if `first` is `End`. When `last` turns out to be
    /// unreachable, everything after `first` has already been erased; the
    /// list is still well formed.
    pub fn erase_range_after(
        &mut self,
        storage: &mut S,
        first: Position<K>,
        last: Position<K>,
    ) -> Position<K> {
        let stop = match last {
            Position::Node(key) => key,
            Position::End => K::NONE,
            Position::BeforeBegin => panic!("range cannot end at before-begin"),
        };

        loop {
            let victim = self.link(storage, first);
            if victim == stop {
                break;
            }
            assert!(victim.is_some(), "range end is not reachable from range start");

            let next = Self::node(storage, victim).next;
            self.set_link(storage, first, next);
            storage.remove(victim);
        }

        trace!(?first, ?last, "erased range");
        last
    }

    /// Shortens the list to at most `len` elements.
    ///
    /// Has no effect if the list is already shorter.
    #[inline]
    pub fn truncate(&mut self, storage: &mut S, len: usize) {
        self.seek_or_truncate(storage, len);
    }

    /// Removes every element, dropping them front to back.
    pub fn clear(&mut self, storage: &mut S) {
        let head = core::mem::replace(&mut self.head, K::NONE);
        Self::drop_chain(storage, head);
        trace!("cleared list");
    }

    // ========================================================================
    // Whole-list operations
    // ========================================================================

    /// Exchanges the chains of two lists sharing the same storage.
    ///
    /// O(1); no node is touched. Positions keep naming the same nodes, which
    /// now belong to the other list.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.head, &mut other.head);
    }

    /// Moves the chain out, leaving this list empty.
    ///
    /// O(1); no node is touched.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            head: core::mem::replace(&mut self.head, K::NONE),
            _marker: PhantomData,
        }
    }

    /// Detaches every element after `pos` into a new list.
    ///
    /// The new list uses the same storage.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn split_after(&mut self, storage: &mut S, pos: Position<K>) -> Self {
        let rest = self.link(storage, pos);
        self.set_link(storage, pos, K::NONE);
        Self {
            head: rest,
            _marker: PhantomData,
        }
    }

    /// Moves every element of `other` to directly after `pos`, in order.
    ///
    /// `other` must use the same storage and is left empty. This walks
    /// `other` once to find its last node. Returns the position of the last
    /// moved element, or `pos` if `other` was empty.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End`, names a vacant key, or belongs to `other`.
    pub fn splice_after(&mut self, storage: &mut S, pos: Position<K>, other: &mut Self) -> Position<K> {
        let after = self.link(storage, pos);
        if other.is_empty() {
            return pos;
        }

        let mut last = other.head;
        loop {
            assert!(
                pos.key() != Some(last),
                "splice position belongs to the spliced list"
            );
            let next = Self::node(storage, last).next;
            if next.is_none() {
                break;
            }
            last = next;
        }

        Self::node_mut(storage, last).next = after;
        let first = core::mem::replace(&mut other.head, K::NONE);
        self.set_link(storage, pos, first);
        Position::Node(last)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over references to elements, front to back.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, T, S, K> {
        Iter {
            storage,
            current: self.head,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over node keys, front to back.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, T, S, K> {
        Keys {
            storage,
            current: self.head,
            _marker: PhantomData,
        }
    }

    /// Calls `f` on every element, front to back, with mutable access.
    pub fn for_each_mut<F>(&mut self, storage: &mut S, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut key = self.head;
        while key.is_some() {
            let node = Self::node_mut(storage, key);
            f(&mut node.data);
            key = node.next;
        }
    }

    /// Clears the list, returning an iterator over the removed elements.
    ///
    /// The list is empty after this call. Elements are released from storage
    /// as the iterator is consumed; dropping the iterator releases the rest.
    #[inline]
    pub fn drain<'a>(&mut self, storage: &'a mut S) -> Drain<'a, T, S, K> {
        Drain {
            storage,
            current: core::mem::replace(&mut self.head, K::NONE),
            _marker: PhantomData,
        }
    }

    /// Returns a read-only cursor at the first element.
    #[inline]
    pub fn cursor_front<'a>(&'a self, storage: &'a S) -> Cursor<'a, T, S, K> {
        self.cursor_at(storage, self.begin())
    }

    /// Returns a read-only cursor at before-begin.
    #[inline]
    pub fn cursor_before_begin<'a>(&'a self, storage: &'a S) -> Cursor<'a, T, S, K> {
        self.cursor_at(storage, Position::BeforeBegin)
    }

    /// Returns a read-only cursor at `pos`.
    #[inline]
    pub fn cursor_at<'a>(&'a self, storage: &'a S, pos: Position<K>) -> Cursor<'a, T, S, K> {
        Cursor {
            list: self,
            storage,
            pos,
        }
    }

    /// Returns a mutable cursor at the first element.
    #[inline]
    pub fn cursor_front_mut<'a>(&'a mut self, storage: &'a mut S) -> CursorMut<'a, T, S, K> {
        let pos = self.begin();
        CursorMut {
            list: self,
            storage,
            pos,
        }
    }

    /// Returns a mutable cursor at before-begin.
    ///
    /// Useful for editing from the front: `insert_after` and `remove_after`
    /// work on the head from here.
    #[inline]
    pub fn cursor_before_begin_mut<'a>(&'a mut self, storage: &'a mut S) -> CursorMut<'a, T, S, K> {
        CursorMut {
            list: self,
            storage,
            pos: Position::BeforeBegin,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    #[inline]
    fn node(storage: &S, key: K) -> &Node<T, K> {
        storage.get(key).expect("position does not name a live node")
    }

    #[inline]
    fn node_mut(storage: &mut S, key: K) -> &mut Node<T, K> {
        storage
            .get_mut(key)
            .expect("position does not name a live node")
    }

    /// Successor link of `pos`. Before-begin's successor is the head.
    #[inline]
    fn link(&self, storage: &S, pos: Position<K>) -> K {
        match pos {
            Position::BeforeBegin => self.head,
            Position::Node(key) => Self::node(storage, key).next,
            Position::End => panic!("end position has no successor"),
        }
    }

    #[inline]
    fn set_link(&mut self, storage: &mut S, pos: Position<K>, link: K) {
        match pos {
            Position::BeforeBegin => self.head = link,
            Position::Node(key) => Self::node_mut(storage, key).next = link,
            Position::End => panic!("end position has no successor"),
        }
    }

    /// Releases a detached chain starting at `key`, front to back.
    fn drop_chain(storage: &mut S, mut key: K) {
        while key.is_some() {
            let node = storage
                .remove(key)
                .expect("position does not name a live node");
            key = node.next;
        }
    }

    /// Walks `len` elements in. If the list is longer, the excess tail is
    /// dropped. Returns the last kept position and how many elements are
    /// missing to reach `len`.
    fn seek_or_truncate(&mut self, storage: &mut S, len: usize) -> (Position<K>, usize) {
        let mut prev = Position::BeforeBegin;
        let mut remaining = len;

        loop {
            let curr = self.link(storage, prev);
            if curr.is_none() {
                return (prev, remaining);
            }

            if remaining == 0 {
                self.set_link(storage, prev, K::NONE);
                Self::drop_chain(storage, curr);
                trace!(len, "truncated list");
                return (prev, 0);
            }

            prev = Position::Node(curr);
            remaining -= 1;
        }
    }
}

// =============================================================================
// Unbounded storage impl - infallible insertion
// =============================================================================

impl<T, S, K: Key> ForwardList<T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K>,
{
    /// Pushes a value to the front of the list.
    ///
    /// Returns the position of the new element.
    #[inline]
    pub fn push_front(&mut self, storage: &mut S, value: T) -> Position<K> {
        self.insert_after(storage, Position::BeforeBegin, value)
    }

    /// Pushes a value built by `f` to the front of the list.
    #[inline]
    pub fn emplace_front_with<F>(&mut self, storage: &mut S, f: F) -> Position<K>
    where
        F: FnOnce() -> T,
    {
        self.insert_after(storage, Position::BeforeBegin, f())
    }

    /// Inserts a value directly after `pos`.
    ///
    /// Returns the position of the new element.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn insert_after(&mut self, storage: &mut S, pos: Position<K>, value: T) -> Position<K> {
        let next = self.link(storage, pos);
        let key = storage.insert(Node::new(value, next));
        self.set_link(storage, pos, key);
        Position::Node(key)
    }

    /// Inserts a value built by `f` directly after `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn emplace_after_with<F>(&mut self, storage: &mut S, pos: Position<K>, f: F) -> Position<K>
    where
        F: FnOnce() -> T,
    {
        self.insert_after(storage, pos, f())
    }

    /// Inserts `count` copies of `value` directly after `pos`.
    ///
    /// Returns the position now directly after `pos` (the last node created),
    /// or `pos`'s old successor when `count` is 0.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    pub fn insert_n_after(
        &mut self,
        storage: &mut S,
        pos: Position<K>,
        count: usize,
        value: T,
    ) -> Position<K>
    where
        T: Clone,
    {
        let successor = self.link(storage, pos);
        if count == 0 {
            return Position::from_link(successor);
        }

        for _ in 1..count {
            self.insert_after(storage, pos, value.clone());
        }
        self.insert_after(storage, pos, value)
    }

    /// Inserts every value of `iter` after `pos`, preserving their order.
    ///
    /// Returns the position of the last inserted element, or `pos` if `iter`
    /// was empty.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    pub fn insert_range_after<I>(&mut self, storage: &mut S, pos: Position<K>, iter: I) -> Position<K>
    where
        I: IntoIterator<Item = T>,
    {
        self.link(storage, pos);

        let mut last = pos;
        for value in iter {
            last = self.insert_after(storage, last, value);
        }
        last
    }

    /// Resizes the list to `len` elements, filling new tail slots with `f()`.
    pub fn resize_with<F>(&mut self, storage: &mut S, len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        let (mut tail, missing) = self.seek_or_truncate(storage, len);
        for _ in 0..missing {
            tail = self.insert_after(storage, tail, f());
        }
    }

    /// Resizes the list to `len` elements, filling new tail slots with
    /// copies of `value`.
    #[inline]
    pub fn resize(&mut self, storage: &mut S, len: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with(storage, len, || value.clone());
    }

    /// Resizes the list to `len` elements, filling new tail slots with
    /// `T::default()`.
    #[inline]
    pub fn resize_default(&mut self, storage: &mut S, len: usize)
    where
        T: Default,
    {
        self.resize_with(storage, len, T::default);
    }

    /// Replaces the contents of the list with `iter`.
    #[inline]
    pub fn assign<I>(&mut self, storage: &mut S, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear(storage);
        self.insert_range_after(storage, Position::BeforeBegin, iter);
    }

    /// Replaces the contents of the list with `count` copies of `value`.
    #[inline]
    pub fn assign_n(&mut self, storage: &mut S, count: usize, value: T)
    where
        T: Clone,
    {
        self.clear(storage);
        self.insert_n_after(storage, Position::BeforeBegin, count, value);
    }
}

// =============================================================================
// Cursors
// =============================================================================

/// A read-only cursor over a list.
///
/// Tracks a [`Position`] and reads through the storage. The cursor borrows
/// the list, so before-begin always leads to the list's current head.
/// Cursors compare equal when they sit at the same position.
///
/// # Example
///
/// ```
/// use nexus_forward_list::{ForwardList, SlabListStorage};
///
/// let mut storage: SlabListStorage<u64> = slab::Slab::new();
/// let mut list: ForwardList<u64, SlabListStorage<u64>> = ForwardList::new();
/// list.assign(&mut storage, [1, 2, 3]);
///
/// let mut cursor = list.cursor_front(&storage);
/// let mut seen = Vec::new();
/// while let Some(&value) = cursor.current() {
///     seen.push(value);
///     cursor.move_next();
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// assert!(cursor.is_end());
/// ```
pub struct Cursor<'a, T, S, K: Key>
where
    S: Storage<Node<T, K>, Key = K>,
{
    list: &'a ForwardList<T, S, K>,
    storage: &'a S,
    pos: Position<K>,
}

impl<T, S, K: Key> Clone for Cursor<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S, K: Key> Copy for Cursor<'_, T, S, K> where S: Storage<Node<T, K>, Key = K> {}

impl<T, S, K: Key> PartialEq for Cursor<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<T, S, K: Key> Eq for Cursor<'_, T, S, K> where S: Storage<Node<T, K>, Key = K> {}

impl<T, S, K: Key> core::fmt::Debug for Cursor<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor").field("pos", &self.pos).finish()
    }
}

impl<'a, T, S, K: Key> Cursor<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Returns the cursor's position.
    #[inline]
    pub fn position(&self) -> Position<K> {
        self.pos
    }

    /// Returns `true` if the cursor is past the last element.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    /// Returns the element under the cursor.
    ///
    /// Returns `None` at before-begin and at end.
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        let key = self.pos.key()?;
        self.storage.get(key).map(|node| &node.data)
    }

    /// Returns the element after the cursor without moving.
    #[inline]
    pub fn peek_next(&self) -> Option<&'a T> {
        let next = self.successor();
        if next.is_none() {
            return None;
        }
        self.storage.get(next).map(|node| &node.data)
    }

    /// Advances to the next position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at end.
    #[inline]
    pub fn move_next(&mut self) {
        assert!(!self.pos.is_end(), "cannot advance past end");
        self.pos = Position::from_link(self.successor());
    }

    #[inline]
    fn successor(&self) -> K {
        match self.pos {
            Position::BeforeBegin => self.list.head,
            Position::Node(key) => self
                .storage
                .get(key)
                .expect("position does not name a live node")
                .next,
            Position::End => K::NONE,
        }
    }
}

/// A cursor with mutable access and editing.
///
/// Holds the same position state as [`Cursor`] plus exclusive access to the
/// list and its storage. Edits happen after the cursor, so the cursor itself
/// never moves on insert or remove.
///
/// # Example
///
/// ```
/// use nexus_forward_list::{ForwardList, SlabListStorage};
///
/// let mut storage: SlabListStorage<u64> = slab::Slab::new();
/// let mut list: ForwardList<u64, SlabListStorage<u64>> = ForwardList::new();
/// list.assign(&mut storage, [1, 2, 3, 4]);
///
/// // Drop every even element
/// let mut cursor = list.cursor_before_begin_mut(&mut storage);
/// while let Some(&next) = cursor.peek_next() {
///     if next % 2 == 0 {
///         cursor.remove_after();
///     } else {
///         cursor.move_next();
///     }
/// }
///
/// assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![1, 3]);
/// ```
pub struct CursorMut<'a, T, S, K: Key>
where
    S: Storage<Node<T, K>, Key = K>,
{
    list: &'a mut ForwardList<T, S, K>,
    storage: &'a mut S,
    pos: Position<K>,
}

impl<'a, T, S, K: Key> CursorMut<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Returns a read-only view at the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T, S, K> {
        self.list.cursor_at(&*self.storage, self.pos)
    }

    /// Returns the cursor's position.
    #[inline]
    pub fn position(&self) -> Position<K> {
        self.pos
    }

    /// Returns `true` if the cursor is past the last element.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    /// Returns the element under the cursor.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.list.get(&*self.storage, self.pos)
    }

    /// Returns the element under the cursor mutably.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.list.get_mut(self.storage, self.pos)
    }

    /// Returns the element after the cursor without moving.
    #[inline]
    pub fn peek_next(&self) -> Option<&T> {
        self.as_cursor().peek_next()
    }

    /// Advances to the next position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at end.
    #[inline]
    pub fn move_next(&mut self) {
        self.pos = self.list.next(&*self.storage, self.pos);
    }

    /// Inserts a value after the cursor. The cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at end.
    #[inline]
    pub fn try_insert_after(&mut self, value: T) -> Result<Position<K>, Full<T>> {
        self.list.try_insert_after(self.storage, self.pos, value)
    }

    /// Removes and returns the element after the cursor.
    ///
    /// Returns `None` if the cursor is at the last element.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at end.
    #[inline]
    pub fn remove_after(&mut self) -> Option<T> {
        self.list.remove_after(self.storage, self.pos)
    }
}

impl<'a, T, S, K: Key> CursorMut<'a, T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K>,
{
    /// Inserts a value after the cursor. The cursor does not move.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at end.
    #[inline]
    pub fn insert_after(&mut self, value: T) -> Position<K> {
        self.list.insert_after(self.storage, self.pos, value)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to list elements.
pub struct Iter<'a, T, S, K: Key> {
    storage: &'a S,
    current: K,
    _marker: PhantomData<T>,
}

impl<T, S, K: Key> Clone for Iter<'_, T, S, K> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            current: self.current,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, S, K: Key> Iterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        let node = self
            .storage
            .get(self.current)
            .expect("list chain names a vacant key");
        self.current = node.next;
        Some(&node.data)
    }
}

impl<'a, T: 'a, S, K: Key> FusedIterator for Iter<'a, T, S, K> where
    S: Storage<Node<T, K>, Key = K>
{
}

/// Iterator over node keys in the list.
pub struct Keys<'a, T, S, K: Key> {
    storage: &'a S,
    current: K,
    _marker: PhantomData<T>,
}

impl<T, S, K: Key> Iterator for Keys<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        let key = self.current;
        self.current = self
            .storage
            .get(key)
            .expect("list chain names a vacant key")
            .next;
        Some(key)
    }
}

impl<T, S, K: Key> FusedIterator for Keys<'_, T, S, K> where S: Storage<Node<T, K>, Key = K> {}

/// Iterator that removes and returns elements from a list.
pub struct Drain<'a, T, S, K: Key>
where
    S: Storage<Node<T, K>, Key = K>,
{
    storage: &'a mut S,
    current: K,
    _marker: PhantomData<T>,
}

impl<T, S, K: Key> Iterator for Drain<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        let node = self
            .storage
            .remove(self.current)
            .expect("list chain names a vacant key");
        self.current = node.next;
        Some(node.data)
    }
}

impl<T, S, K: Key> FusedIterator for Drain<'_, T, S, K> where S: Storage<Node<T, K>, Key = K> {}

impl<T, S, K: Key> Drop for Drain<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn drop(&mut self) {
        // Exhaust remaining elements to ensure cleanup
        for _ in self.by_ref() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundedStorage;

    type List = ForwardList<u64, SlabListStorage<u64>>;

    fn values(list: &List, storage: &SlabListStorage<u64>) -> Vec<u64> {
        list.iter(storage).copied().collect()
    }

    fn list_of(storage: &mut SlabListStorage<u64>, items: &[u64]) -> List {
        let mut list = List::new();
        list.assign(storage, items.iter().copied());
        list
    }

    #[test]
    fn new_list_is_empty() {
        let storage: SlabListStorage<u64> = slab::Slab::new();
        let list = List::new();

        assert!(list.is_empty());
        assert!(list.front_key().is_none());
        assert_eq!(list.begin(), list.end());
        assert_eq!(list.front(&storage), None);
        assert_eq!(list.iter(&storage).next(), None);
    }

    #[test]
    fn push_front_reverses_call_order() {
        let mut storage = slab::Slab::new();
        let mut list = List::new();

        for v in 1..=5 {
            list.push_front(&mut storage, v);
        }

        assert_eq!(values(&list, &storage), vec![5, 4, 3, 2, 1]);
        assert_eq!(list.front(&storage), Some(&5));
    }

    #[test]
    fn insert_after_before_begin_matches_push_front() {
        let mut storage_a = slab::Slab::new();
        let mut storage_b = slab::Slab::new();
        let mut a = list_of(&mut storage_a, &[2, 3]);
        let mut b = list_of(&mut storage_b, &[2, 3]);

        let pa = a.push_front(&mut storage_a, 1);
        let pb = b.insert_after(&mut storage_b, Position::BeforeBegin, 1);

        assert_eq!(values(&a, &storage_a), values(&b, &storage_b));
        assert_eq!(pa, a.begin());
        assert_eq!(pb, b.begin());
    }

    #[test]
    fn insert_after_on_empty_list() {
        let mut storage = slab::Slab::new();
        let mut list = List::new();

        let pos = list.insert_after(&mut storage, list.before_begin(), 7);

        assert_eq!(pos, list.begin());
        assert_eq!(list.next(&storage, pos), Position::End);
        assert_eq!(values(&list, &storage), vec![7]);
    }

    #[test]
    fn insert_after_middle() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 3]);

        let two = list.insert_after(&mut storage, list.begin(), 2);

        assert_eq!(list.get(&storage, two), Some(&2));
        assert_eq!(values(&list, &storage), vec![1, 2, 3]);
    }

    #[test]
    fn emplace_variants() {
        let mut storage = slab::Slab::new();
        let mut list = List::new();

        let front = list.emplace_front_with(&mut storage, || 10);
        list.emplace_after_with(&mut storage, front, || 20);

        assert_eq!(values(&list, &storage), vec![10, 20]);
    }

    #[test]
    #[should_panic(expected = "end position has no successor")]
    fn insert_after_end_panics() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1]);
        list.insert_after(&mut storage, Position::End, 2);
    }

    #[test]
    fn insert_n_after_returns_node_after_pos() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 9]);

        let pos = list.insert_n_after(&mut storage, list.begin(), 3, 5);

        assert_eq!(values(&list, &storage), vec![1, 5, 5, 5, 9]);
        assert_eq!(pos, list.next(&storage, list.begin()));
    }

    #[test]
    fn insert_n_after_zero_returns_old_successor() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 9]);
        let nine = list.next(&storage, list.begin());

        let pos = list.insert_n_after(&mut storage, list.begin(), 0, 5);
        assert_eq!(pos, nine);

        let last = list.last_position(&storage);
        assert_eq!(list.insert_n_after(&mut storage, last, 0, 5), Position::End);
        assert_eq!(values(&list, &storage), vec![1, 9]);
    }

    #[test]
    fn insert_range_after_preserves_order() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 5]);

        let last = list.insert_range_after(&mut storage, list.begin(), [2, 3, 4]);

        assert_eq!(values(&list, &storage), vec![1, 2, 3, 4, 5]);
        assert_eq!(list.get(&storage, last), Some(&4));
    }

    #[test]
    fn insert_range_after_empty_returns_pos() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1]);
        let begin = list.begin();

        assert_eq!(
            list.insert_range_after(&mut storage, begin, core::iter::empty()),
            begin
        );
        assert_eq!(
            list.insert_range_after(&mut storage, Position::BeforeBegin, core::iter::empty()),
            Position::BeforeBegin
        );
    }

    #[test]
    fn pop_front() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        assert_eq!(list.pop_front(&mut storage), Some(1));
        assert_eq!(list.pop_front(&mut storage), Some(2));
        assert_eq!(list.pop_front(&mut storage), Some(3));
        assert_eq!(list.pop_front(&mut storage), None);
        assert!(list.is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn remove_after_last_is_none() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2]);
        let last = list.last_position(&storage);

        assert_eq!(list.remove_after(&mut storage, last), None);
        assert_eq!(list.remove_after(&mut storage, list.begin()), Some(2));
        assert_eq!(values(&list, &storage), vec![1]);
    }

    #[test]
    fn erase_after_returns_new_successor() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        let pos = list.erase_after(&mut storage, list.begin());

        assert_eq!(list.get(&storage, pos), Some(&3));
        assert_eq!(values(&list, &storage), vec![1, 3]);

        let pos = list.erase_after(&mut storage, list.begin());
        assert_eq!(pos, Position::End);
    }

    #[test]
    #[should_panic(expected = "no element after position")]
    fn erase_after_last_panics() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1]);
        list.erase_after(&mut storage, list.begin());
    }

    #[test]
    fn erase_range_after_middle() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3, 4, 5]);

        let first = list.begin();
        let mut last = first;
        for _ in 0..3 {
            last = list.next(&storage, last);
        }

        let ret = list.erase_range_after(&mut storage, first, last);

        assert_eq!(ret, last);
        assert_eq!(list.get(&storage, ret), Some(&4));
        assert_eq!(values(&list, &storage), vec![1, 4, 5]);
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn erase_range_after_to_end_and_empty_range() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        let begin = list.begin();
        let second = list.next(&storage, begin);
        list.erase_range_after(&mut storage, begin, second);
        assert_eq!(values(&list, &storage), vec![1, 2, 3]);

        list.erase_range_after(&mut storage, Position::BeforeBegin, Position::End);
        assert!(list.is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn erase_range_after_from_before_begin() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3, 4]);
        let third = list.next(&storage, list.next(&storage, list.begin()));

        let ret = list.erase_range_after(&mut storage, Position::BeforeBegin, third);

        assert_eq!(ret, third);
        assert_eq!(list.begin(), third);
        assert_eq!(list.front(&storage), Some(&3));
        assert_eq!(values(&list, &storage), vec![3, 4]);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    #[should_panic(expected = "range end is not reachable from range start")]
    fn erase_range_after_unreachable_panics() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);
        let second = list.next(&storage, list.begin());
        list.erase_range_after(&mut storage, second, list.begin());
    }

    #[test]
    fn next_walks_to_end() {
        let mut storage = slab::Slab::new();
        let list = list_of(&mut storage, &[1, 2]);

        let a = list.next(&storage, Position::BeforeBegin);
        let b = list.next(&storage, a);
        let end = list.next(&storage, b);

        assert_eq!(a, list.begin());
        assert_eq!(list.get(&storage, b), Some(&2));
        assert_eq!(end, list.end());
    }

    #[test]
    #[should_panic(expected = "cannot advance past end")]
    fn next_past_end_panics() {
        let storage: SlabListStorage<u64> = slab::Slab::new();
        let list = List::new();
        list.next(&storage, Position::End);
    }

    #[test]
    fn get_is_none_for_sentinels() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1]);

        assert_eq!(list.get(&storage, Position::BeforeBegin), None);
        assert_eq!(list.get(&storage, Position::End), None);
        assert_eq!(list.get_mut(&mut storage, Position::End), None);
    }

    #[test]
    fn front_mut() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2]);

        *list.front_mut(&mut storage).unwrap() = 10;

        assert_eq!(values(&list, &storage), vec![10, 2]);
    }

    #[test]
    fn resize_grow_shrink() {
        let mut storage = slab::Slab::new();
        let mut list = List::new();

        list.resize_default(&mut storage, 3);
        assert_eq!(values(&list, &storage), vec![0, 0, 0]);

        list.resize(&mut storage, 5, 7);
        assert_eq!(values(&list, &storage), vec![0, 0, 0, 7, 7]);

        list.resize_default(&mut storage, 1);
        assert_eq!(values(&list, &storage), vec![0]);

        list.resize_default(&mut storage, 1);
        assert_eq!(values(&list, &storage), vec![0]);

        list.resize_default(&mut storage, 0);
        assert!(list.is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn resize_with_counter() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[100]);

        let mut n = 0;
        list.resize_with(&mut storage, 4, || {
            n += 1;
            n
        });

        assert_eq!(values(&list, &storage), vec![100, 1, 2, 3]);
    }

    #[test]
    fn truncate() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        list.truncate(&mut storage, 5);
        assert_eq!(values(&list, &storage), vec![1, 2, 3]);

        list.truncate(&mut storage, 2);
        assert_eq!(values(&list, &storage), vec![1, 2]);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn assign_replaces_contents() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        list.assign_n(&mut storage, 2, 8);
        assert_eq!(values(&list, &storage), vec![8, 8]);

        list.assign(&mut storage, [4, 5]);
        assert_eq!(values(&list, &storage), vec![4, 5]);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn clear() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        list.clear(&mut storage);

        assert!(list.is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn swap_touches_no_node() {
        let mut storage = slab::Slab::new();
        let mut a = list_of(&mut storage, &[1, 2]);
        let mut b = list_of(&mut storage, &[9]);
        let a_begin = a.begin();

        a.swap(&mut b);

        assert_eq!(values(&a, &storage), vec![9]);
        assert_eq!(values(&b, &storage), vec![1, 2]);
        assert_eq!(b.begin(), a_begin);
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn take_leaves_empty() {
        let mut storage = slab::Slab::new();
        let mut a = list_of(&mut storage, &[1, 2]);
        let keys: Vec<_> = a.keys(&storage).collect();

        let b = a.take();

        assert!(a.is_empty());
        assert_eq!(b.keys(&storage).collect::<Vec<_>>(), keys);
    }

    #[test]
    fn split_after_and_splice_after() {
        let mut storage = slab::Slab::new();
        let mut a = list_of(&mut storage, &[1, 2, 3, 4]);
        let mut b = list_of(&mut storage, &[10, 20]);

        let second = a.next(&storage, a.begin());
        let mut tail = a.split_after(&mut storage, second);
        assert_eq!(values(&a, &storage), vec![1, 2]);
        assert_eq!(values(&tail, &storage), vec![3, 4]);

        let last = b.splice_after(&mut storage, b.begin(), &mut tail);
        assert!(tail.is_empty());
        assert_eq!(b.get(&storage, last), Some(&4));
        assert_eq!(values(&b, &storage), vec![10, 3, 4, 20]);
        assert_eq!(storage.len(), 6);
    }

    #[test]
    fn splice_after_empty_returns_pos() {
        let mut storage = slab::Slab::new();
        let mut a = list_of(&mut storage, &[1]);
        let mut empty = List::new();

        let pos = a.splice_after(&mut storage, a.begin(), &mut empty);
        assert_eq!(pos, a.begin());
    }

    #[test]
    #[should_panic(expected = "splice position belongs to the spliced list")]
    fn splice_into_own_chain_panics() {
        let mut storage = slab::Slab::new();
        let mut a = list_of(&mut storage, &[1]);
        let mut b = list_of(&mut storage, &[2, 3]);
        let inside_b = b.begin();

        a.splice_after(&mut storage, inside_b, &mut b);
    }

    #[test]
    fn for_each_mut() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        list.for_each_mut(&mut storage, |v| *v *= 10);

        assert_eq!(values(&list, &storage), vec![10, 20, 30]);
    }

    #[test]
    fn iter_is_restartable() {
        let mut storage = slab::Slab::new();
        let list = list_of(&mut storage, &[1, 2, 3]);

        let mut iter = list.iter(&storage);
        iter.next();
        let copy = iter.clone();

        assert_eq!(iter.copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(copy.copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(list.iter(&storage).count(), 3);
    }

    #[test]
    fn keys_match_positions() {
        let mut storage = slab::Slab::new();
        let list = list_of(&mut storage, &[1, 2]);

        let keys: Vec<_> = list.keys(&storage).collect();

        assert_eq!(Position::Node(keys[0]), list.begin());
        assert_eq!(list.get(&storage, Position::Node(keys[1])), Some(&2));
    }

    #[test]
    fn drain_all() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        let drained: Vec<_> = list.drain(&mut storage).collect();

        assert_eq!(drained, vec![1, 2, 3]);
        assert!(list.is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn drain_partial_then_drop() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2, 3]);

        {
            let mut drain = list.drain(&mut storage);
            assert_eq!(drain.next(), Some(1));
        }

        assert!(list.is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn cursor_walk_and_compare() {
        let mut storage = slab::Slab::new();
        let list = list_of(&mut storage, &[1, 2]);

        let mut a = list.cursor_before_begin(&storage);
        let b = list.cursor_front(&storage);
        assert_eq!(a.current(), None);
        assert_eq!(a.peek_next(), Some(&1));
        assert_ne!(a, b);

        a.move_next();
        assert_eq!(a, b);
        assert_eq!(a.current(), Some(&1));

        a.move_next();
        a.move_next();
        assert!(a.is_end());
        assert_eq!(a.current(), None);
        assert_eq!(a.peek_next(), None);
    }

    #[test]
    #[should_panic(expected = "cannot advance past end")]
    fn cursor_past_end_panics() {
        let storage: SlabListStorage<u64> = slab::Slab::new();
        let list = List::new();
        let mut cursor = list.cursor_front(&storage);
        cursor.move_next();
    }

    #[test]
    fn cursor_mut_edit_in_place() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 3]);

        let mut cursor = list.cursor_front_mut(&mut storage);
        *cursor.current_mut().unwrap() = 100;
        cursor.insert_after(2);
        assert_eq!(cursor.current(), Some(&100));
        assert_eq!(cursor.peek_next(), Some(&2));

        cursor.move_next();
        let view = cursor.as_cursor();
        assert_eq!(view.current(), Some(&2));
        assert_eq!(view.position(), cursor.position());

        assert_eq!(cursor.remove_after(), Some(3));
        assert_eq!(cursor.remove_after(), None);

        assert_eq!(values(&list, &storage), vec![100, 2]);
    }

    #[test]
    fn cursor_mut_from_before_begin() {
        let mut storage = slab::Slab::new();
        let mut list = List::new();

        let mut cursor = list.cursor_before_begin_mut(&mut storage);
        cursor.insert_after(2);
        cursor.insert_after(1);
        assert_eq!(cursor.remove_after(), Some(1));

        assert_eq!(values(&list, &storage), vec![2]);
    }

    #[test]
    fn cursor_follows_head_after_take() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2]);

        let moved = list.take();

        assert_eq!(list.cursor_before_begin(&storage).peek_next(), None);
        assert!(list.cursor_front(&storage).is_end());
        assert_eq!(moved.cursor_before_begin(&storage).peek_next(), Some(&1));
    }

    #[test]
    fn cursor_follows_head_after_swap() {
        let mut storage = slab::Slab::new();
        let mut a = list_of(&mut storage, &[1, 2]);
        let mut b = list_of(&mut storage, &[9]);

        a.swap(&mut b);

        let mut cursor = a.cursor_before_begin(&storage);
        cursor.move_next();
        assert_eq!(cursor.current(), a.front(&storage));
        assert_eq!(cursor.current(), Some(&9));
        cursor.move_next();
        assert!(cursor.is_end());

        assert_eq!(b.cursor_front(&storage).current(), Some(&1));
    }

    #[test]
    fn stale_position_of_vacant_key_reads_none() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2]);
        let second = list.next(&storage, list.begin());

        list.erase_after(&mut storage, list.begin());

        assert_eq!(list.get(&storage, second), None);
    }

    #[test]
    #[should_panic(expected = "position does not name a live node")]
    fn stale_position_of_vacant_key_panics_on_insert() {
        let mut storage = slab::Slab::new();
        let mut list = list_of(&mut storage, &[1, 2]);
        let second = list.next(&storage, list.begin());

        list.erase_after(&mut storage, list.begin());
        list.insert_after(&mut storage, second, 5);
    }

    // ========================================================================
    // Bounded storage
    // ========================================================================

    type Bounded = ForwardList<u64, BoundedListStorage<u64>, u32>;

    #[test]
    fn bounded_try_push_front_full() {
        let mut storage: BoundedListStorage<u64> = BoundedSlab::with_capacity(2);
        let mut list = Bounded::new();

        list.try_push_front(&mut storage, 1).unwrap();
        list.try_push_front(&mut storage, 2).unwrap();

        let Full(rejected) = list.try_push_front(&mut storage, 3).unwrap_err();
        assert_eq!(rejected, 3);
        assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn bounded_range_insert_keeps_partial_progress() {
        let mut storage: BoundedListStorage<u64> = BoundedSlab::with_capacity(3);
        let mut list = Bounded::new();
        list.try_push_front(&mut storage, 0).unwrap();

        let err = list
            .try_insert_range_after(&mut storage, list.begin(), [1, 2, 3, 4])
            .unwrap_err();

        assert_eq!(err.into_inner(), 3);
        assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(storage.is_full());
    }

    #[test]
    fn bounded_insert_n_partial() {
        let mut storage: BoundedListStorage<u64> = BoundedSlab::with_capacity(2);
        let mut list = Bounded::new();

        let result = list.try_insert_n_after(&mut storage, Position::BeforeBegin, 5, 9);

        assert!(result.is_err());
        assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![9, 9]);
    }

    #[test]
    fn bounded_resize_and_reuse() {
        let mut storage: BoundedListStorage<u64> = BoundedSlab::with_capacity(4);
        let mut list = Bounded::new();

        list.try_resize_default(&mut storage, 4).unwrap();
        assert!(list.try_resize(&mut storage, 5, 1).is_err());

        list.try_resize_default(&mut storage, 1).unwrap();
        assert_eq!(storage.len(), 1);

        list.try_assign(&mut storage, [1, 2, 3, 4]).unwrap();
        assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        list.try_assign_n(&mut storage, 2, 6).unwrap();
        assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![6, 6]);
        assert_eq!(BoundedStorage::capacity(&storage), 4);
    }

    #[test]
    fn bounded_cursor_try_insert() {
        let mut storage: BoundedListStorage<u64> = BoundedSlab::with_capacity(1);
        let mut list = Bounded::new();

        let mut cursor = list.cursor_before_begin_mut(&mut storage);
        cursor.try_insert_after(1).unwrap();
        assert_eq!(cursor.try_insert_after(2), Err(Full(2)));
    }

    #[test]
    fn bounded_emplace() {
        let mut storage: BoundedListStorage<u64> = BoundedSlab::with_capacity(2);
        let mut list = Bounded::new();

        let front = list.try_emplace_front_with(&mut storage, || 1).unwrap();
        list.try_emplace_after_with(&mut storage, front, || 2).unwrap();

        assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![1, 2]);
    }
}
