//! OwnedForwardList - a singly-linked list that owns its storage.

use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::forward_list::{Cursor, CursorMut, Drain, Iter, Keys};
use crate::{
    BoundedListStorage, BoundedSlab, BoundedStorage, ForwardList, Full, Key, Node, Position,
    SlabListStorage, Storage, UnboundedStorage,
};

/// An owned forward list with fixed capacity.
pub type BoundedForwardList<T, K = u32> = OwnedForwardList<T, BoundedListStorage<T, K>, K>;

/// A singly-linked list that owns its storage.
///
/// Wraps a [`ForwardList`] and its storage. The storage holds exactly the
/// nodes of this one chain, so the list can offer value semantics: `Clone`
/// copies every element into fresh storage, and `Drop` releases the nodes
/// front to back.
///
/// Positions work as they do on [`ForwardList`], minus the storage argument.
///
/// # Example
///
/// ```
/// use nexus_forward_list::OwnedForwardList;
///
/// let mut list: OwnedForwardList<&str> = ["b", "d"].into();
///
/// let b = list.begin();
/// list.insert_after(b, "c");
/// list.push_front("a");
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
///
/// // Erase everything after "b"
/// list.erase_range_after(b, list.end());
/// assert_eq!(list, ["a", "b"].into());
/// ```
pub struct OwnedForwardList<T, S = SlabListStorage<T>, K: Key = usize>
where
    S: Storage<Node<T, K>, Key = K>,
{
    storage: S,
    list: ForwardList<T, S, K>,
}

// =============================================================================
// Construction
// =============================================================================

impl<T> OwnedForwardList<T, SlabListStorage<T>, usize> {
    /// Creates an empty, growable list. Does not allocate.
    ///
    /// Use [`with_storage`](Self::with_storage) with
    /// `slab::Slab::with_capacity` to pre-size.
    #[inline]
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }
}

impl<T, K: Key> OwnedForwardList<T, BoundedListStorage<T, K>, K> {
    /// Creates an empty list holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or not representable by the key type.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(BoundedSlab::with_capacity(capacity))
    }

    /// Returns the maximum number of elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        BoundedStorage::capacity(&self.storage)
    }

    /// Returns `true` if no more elements fit.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.storage.is_full()
    }
}

impl<T, S, K: Key> OwnedForwardList<T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K> + Default,
{
    /// Creates a list of `count` copies of `value`.
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut list = Self::default();
        list.insert_n_after(Position::BeforeBegin, count, value);
        list
    }

    /// Creates a list of `count` default values.
    pub fn with_default(count: usize) -> Self
    where
        T: Default,
    {
        let mut list = Self::default();
        list.resize_default(count);
        list
    }
}

// =============================================================================
// Base impl - works with any Storage
// =============================================================================

impl<T, S, K: Key> OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty list over `storage`.
    ///
    /// # Panics
    ///
    /// Panics if `storage` already holds nodes.
    pub fn with_storage(storage: S) -> Self {
        assert!(storage.is_empty(), "storage must be empty");
        Self {
            storage,
            list: ForwardList::new(),
        }
    }

    /// Returns the backing storage.
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the number of elements.
    ///
    /// O(1): every node in the backing storage belongs to this list. Leaking
    /// a [`Drain`] (e.g. with `mem::forget`) strands its remaining nodes in
    /// storage, and they keep counting here until the list is dropped.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns the position in front of the first element.
    #[inline]
    pub fn before_begin(&self) -> Position<K> {
        self.list.before_begin()
    }

    /// Returns the position of the first element (`End` if empty).
    #[inline]
    pub fn begin(&self) -> Position<K> {
        self.list.begin()
    }

    /// Returns the position one past the last element.
    #[inline]
    pub fn end(&self) -> Position<K> {
        self.list.end()
    }

    /// Returns the position following `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn next(&self, pos: Position<K>) -> Position<K> {
        self.list.next(&self.storage, pos)
    }

    /// Returns the position of the last element, or `BeforeBegin` if empty.
    #[inline]
    pub fn last_position(&self) -> Position<K> {
        self.list.last_position(&self.storage)
    }

    /// Returns a reference to the element at `pos`.
    #[inline]
    pub fn get(&self, pos: Position<K>) -> Option<&T> {
        self.list.get(&self.storage, pos)
    }

    /// Returns a mutable reference to the element at `pos`.
    #[inline]
    pub fn get_mut(&mut self, pos: Position<K>) -> Option<&mut T> {
        self.list.get_mut(&mut self.storage, pos)
    }

    /// Returns a reference to the front element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.list.front(&self.storage)
    }

    /// Returns a mutable reference to the front element.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.list.front_mut(&mut self.storage)
    }

    // ========================================================================
    // Fallible insertion
    // ========================================================================

    /// Pushes a value to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_push_front(&mut self, value: T) -> Result<Position<K>, Full<T>> {
        self.list.try_push_front(&mut self.storage, value)
    }

    /// Pushes a value built by `f` to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_emplace_front_with<F>(&mut self, f: F) -> Result<Position<K>, Full<T>>
    where
        F: FnOnce() -> T,
    {
        self.list.try_emplace_front_with(&mut self.storage, f)
    }

    /// Inserts a value directly after `pos`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn try_insert_after(&mut self, pos: Position<K>, value: T) -> Result<Position<K>, Full<T>> {
        self.list.try_insert_after(&mut self.storage, pos, value)
    }

    /// Inserts a value built by `f` directly after `pos`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_emplace_after_with<F>(&mut self, pos: Position<K>, f: F) -> Result<Position<K>, Full<T>>
    where
        F: FnOnce() -> T,
    {
        self.list.try_emplace_after_with(&mut self.storage, pos, f)
    }

    /// Inserts `count` copies of `value` directly after `pos`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` at the first failed insert; earlier copies
    /// stay in the list.
    #[inline]
    pub fn try_insert_n_after(
        &mut self,
        pos: Position<K>,
        count: usize,
        value: T,
    ) -> Result<Position<K>, Full<T>>
    where
        T: Clone,
    {
        self.list.try_insert_n_after(&mut self.storage, pos, count, value)
    }

    /// Inserts every value of `iter` after `pos`, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` at the first failed insert; earlier values
    /// stay in the list.
    #[inline]
    pub fn try_insert_range_after<I>(&mut self, pos: Position<K>, iter: I) -> Result<Position<K>, Full<T>>
    where
        I: IntoIterator<Item = T>,
    {
        self.list.try_insert_range_after(&mut self.storage, pos, iter)
    }

    /// Resizes the list to `len` elements, filling new tail slots with `f()`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up while growing.
    #[inline]
    pub fn try_resize_with<F>(&mut self, len: usize, f: F) -> Result<(), Full<T>>
    where
        F: FnMut() -> T,
    {
        self.list.try_resize_with(&mut self.storage, len, f)
    }

    /// Resizes the list to `len` elements, filling with copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up while growing.
    #[inline]
    pub fn try_resize(&mut self, len: usize, value: T) -> Result<(), Full<T>>
    where
        T: Clone,
    {
        self.list.try_resize(&mut self.storage, len, value)
    }

    /// Resizes the list to `len` elements, filling with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up while growing.
    #[inline]
    pub fn try_resize_default(&mut self, len: usize) -> Result<(), Full<T>>
    where
        T: Default,
    {
        self.list.try_resize_default(&mut self.storage, len)
    }

    /// Replaces the contents with `iter`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up.
    #[inline]
    pub fn try_assign<I>(&mut self, iter: I) -> Result<(), Full<T>>
    where
        I: IntoIterator<Item = T>,
    {
        self.list.try_assign(&mut self.storage, iter)
    }

    /// Replaces the contents with `count` copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage fills up.
    #[inline]
    pub fn try_assign_n(&mut self, count: usize, value: T) -> Result<(), Full<T>>
    where
        T: Clone,
    {
        self.list.try_assign_n(&mut self.storage, count, value)
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes and returns the front element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.list.pop_front(&mut self.storage)
    }

    /// Removes and returns the element directly after `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn remove_after(&mut self, pos: Position<K>) -> Option<T> {
        self.list.remove_after(&mut self.storage, pos)
    }

    /// Erases the element directly after `pos`, returning the new successor.
    ///
    /// # Panics
    ///
    /// Panics if `pos` has no successor, is `End`, or names a vacant key.
    #[inline]
    pub fn erase_after(&mut self, pos: Position<K>) -> Position<K> {
        self.list.erase_after(&mut self.storage, pos)
    }

    /// Erases every element strictly between `first` and `last`.
    ///
    /// # Panics
    ///
    /// Panics if `last` is not reachable from `first`.
    #[inline]
    pub fn erase_range_after(&mut self, first: Position<K>, last: Position<K>) -> Position<K> {
        self.list.erase_range_after(&mut self.storage, first, last)
    }

    /// Shortens the list to at most `len` elements.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.list.truncate(&mut self.storage, len);
    }

    /// Removes every element, dropping them front to back.
    #[inline]
    pub fn clear(&mut self) {
        self.list.clear(&mut self.storage);
    }

    // ========================================================================
    // Whole-list operations
    // ========================================================================

    /// Exchanges the contents of two lists in O(1).
    ///
    /// Storage travels with its chain, so positions taken from `self` now
    /// address `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Moves the contents out, leaving an empty list behind.
    ///
    /// No element is touched. The empty list gets fresh storage configured
    /// like the old one.
    #[inline]
    pub fn take(&mut self) -> Self {
        let empty = Self::with_storage(self.storage.empty_like());
        core::mem::replace(self, empty)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over references to elements, front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, S, K> {
        self.list.iter(&self.storage)
    }

    /// Returns an iterator over mutable references to elements.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, S, K> {
        IterMut {
            current: self.list.front_key().unwrap_or(K::NONE),
            storage: &mut self.storage,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over node keys, front to back.
    #[inline]
    pub fn keys(&self) -> Keys<'_, T, S, K> {
        self.list.keys(&self.storage)
    }

    /// Clears the list, returning an iterator over the removed elements.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T, S, K> {
        self.list.drain(&mut self.storage)
    }

    /// Returns a read-only cursor at the first element.
    #[inline]
    pub fn cursor_front(&self) -> Cursor<'_, T, S, K> {
        self.list.cursor_front(&self.storage)
    }

    /// Returns a read-only cursor at before-begin.
    #[inline]
    pub fn cursor_before_begin(&self) -> Cursor<'_, T, S, K> {
        self.list.cursor_before_begin(&self.storage)
    }

    /// Returns a mutable cursor at the first element.
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, S, K> {
        self.list.cursor_front_mut(&mut self.storage)
    }

    /// Returns a mutable cursor at before-begin.
    #[inline]
    pub fn cursor_before_begin_mut(&mut self) -> CursorMut<'_, T, S, K> {
        self.list.cursor_before_begin_mut(&mut self.storage)
    }
}

// =============================================================================
// Unbounded storage impl - infallible insertion
// =============================================================================

impl<T, S, K: Key> OwnedForwardList<T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K>,
{
    /// Pushes a value to the front of the list.
    #[inline]
    pub fn push_front(&mut self, value: T) -> Position<K> {
        self.list.push_front(&mut self.storage, value)
    }

    /// Pushes a value built by `f` to the front of the list.
    #[inline]
    pub fn emplace_front_with<F>(&mut self, f: F) -> Position<K>
    where
        F: FnOnce() -> T,
    {
        self.list.emplace_front_with(&mut self.storage, f)
    }

    /// Inserts a value directly after `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn insert_after(&mut self, pos: Position<K>, value: T) -> Position<K> {
        self.list.insert_after(&mut self.storage, pos, value)
    }

    /// Inserts a value built by `f` directly after `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `End` or names a vacant key.
    #[inline]
    pub fn emplace_after_with<F>(&mut self, pos: Position<K>, f: F) -> Position<K>
    where
        F: FnOnce() -> T,
    {
        self.list.emplace_after_with(&mut self.storage, pos, f)
    }

    /// Inserts `count` copies of `value` directly after `pos`.
    ///
    /// Returns the position now directly after `pos`, or `pos`'s old
    /// successor when `count` is 0.
    #[inline]
    pub fn insert_n_after(&mut self, pos: Position<K>, count: usize, value: T) -> Position<K>
    where
        T: Clone,
    {
        self.list.insert_n_after(&mut self.storage, pos, count, value)
    }

    /// Inserts every value of `iter` after `pos`, preserving their order.
    ///
    /// Returns the last inserted position, or `pos` if `iter` was empty.
    #[inline]
    pub fn insert_range_after<I>(&mut self, pos: Position<K>, iter: I) -> Position<K>
    where
        I: IntoIterator<Item = T>,
    {
        self.list.insert_range_after(&mut self.storage, pos, iter)
    }

    /// Resizes the list to `len` elements, filling new tail slots with `f()`.
    #[inline]
    pub fn resize_with<F>(&mut self, len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        self.list.resize_with(&mut self.storage, len, f);
    }

    /// Resizes the list to `len` elements, filling with copies of `value`.
    #[inline]
    pub fn resize(&mut self, len: usize, value: T)
    where
        T: Clone,
    {
        self.list.resize(&mut self.storage, len, value);
    }

    /// Resizes the list to `len` elements, filling with `T::default()`.
    #[inline]
    pub fn resize_default(&mut self, len: usize)
    where
        T: Default,
    {
        self.list.resize_default(&mut self.storage, len);
    }

    /// Replaces the contents with `iter`.
    #[inline]
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.list.assign(&mut self.storage, iter);
    }

    /// Replaces the contents with `count` copies of `value`.
    #[inline]
    pub fn assign_n(&mut self, count: usize, value: T)
    where
        T: Clone,
    {
        self.list.assign_n(&mut self.storage, count, value);
    }
}

// =============================================================================
// Standard traits
// =============================================================================

impl<T, S, K: Key> Drop for OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn drop(&mut self) {
        self.list.clear(&mut self.storage);
    }
}

impl<T, S, K: Key> Default for OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K> + Default,
{
    fn default() -> Self {
        Self::with_storage(S::default())
    }
}

impl<T: Clone, S, K: Key> Clone for OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn clone(&self) -> Self {
        let mut copy = Self::with_storage(self.storage.empty_like());
        copy.list
            .try_insert_range_after(&mut copy.storage, Position::BeforeBegin, self.iter().cloned())
            .map_err(drop)
            .expect("fresh storage holds as many nodes as its source");
        copy
    }

    /// Reuses this list's storage when it can hold every element of `source`.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        let copied = self.list.try_insert_range_after(
            &mut self.storage,
            Position::BeforeBegin,
            source.iter().cloned(),
        );
        if copied.is_err() {
            *self = source.clone();
        }
    }
}

impl<T: core::fmt::Debug, S, K: Key> core::fmt::Debug for OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, S, K: Key> PartialEq for OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq, S, K: Key> Eq for OwnedForwardList<T, S, K> where S: Storage<Node<T, K>, Key = K> {}

impl<T: Hash, S, K: Key> Hash for OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut count = 0;
        for value in self.iter() {
            value.hash(state);
            count += 1;
        }
        state.write_usize(count);
    }
}

impl<T, S, K: Key> Extend<T> for OwnedForwardList<T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K>,
{
    /// Appends every value at the tail, in order.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let tail = self.last_position();
        self.insert_range_after(tail, iter);
    }
}

impl<T, S, K: Key> FromIterator<T> for OwnedForwardList<T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.insert_range_after(Position::BeforeBegin, iter);
        list
    }
}

impl<T, S, K: Key, const N: usize> From<[T; N]> for OwnedForwardList<T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K> + Default,
{
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, S, K: Key> IntoIterator for OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = T;
    type IntoIter = IntoIter<T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'a, T, S, K: Key> IntoIterator for &'a OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, S, K: Key> IntoIterator for &'a mut OwnedForwardList<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over mutable references to list elements.
pub struct IterMut<'a, T, S, K: Key> {
    storage: &'a mut S,
    current: K,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T: 'a, S, K: Key> Iterator for IterMut<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        let node = self
            .storage
            .get_mut(self.current)
            .expect("list chain names a vacant key");
        self.current = node.next;

        let data: *mut T = &mut node.data;
        // SAFETY: an owned chain is only ever edited by inserting fresh nodes
        // or unlinking existing ones, so it is acyclic and each key is visited
        // once. Distinct keys address distinct slots (sealed `Storage`), and
        // nothing can insert or remove while `storage` is borrowed for 'a.
        Some(unsafe { &mut *data })
    }
}

impl<'a, T: 'a, S, K: Key> FusedIterator for IterMut<'a, T, S, K> where
    S: Storage<Node<T, K>, Key = K>
{
}

/// Owning iterator, yielding elements front to back.
pub struct IntoIter<T, S, K: Key>
where
    S: Storage<Node<T, K>, Key = K>,
{
    list: OwnedForwardList<T, S, K>,
}

impl<T, S, K: Key> Iterator for IntoIter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }
}

impl<T, S, K: Key> FusedIterator for IntoIter<T, S, K> where S: Storage<Node<T, K>, Key = K> {}
