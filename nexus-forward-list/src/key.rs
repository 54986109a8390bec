//! Node handles for the forward list.
//!
//! Links between nodes are plain integer keys into storage. A reserved
//! sentinel (`NONE`) stands in for the null successor, so a node's link is
//! the size of the key rather than an `Option<K>`.

/// Trait for key types that address nodes in storage.
///
/// # Example
///
/// ```
/// use nexus_forward_list::Key;
///
/// let key: u32 = 7;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::from_usize(7), key);
/// ```
///
/// # Custom Key Types
///
/// ```
/// use nexus_forward_list::Key;
///
/// #[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
/// struct SymbolId(u32);
///
/// impl Key for SymbolId {
///     const NONE: Self = SymbolId(u32::MAX);
///
///     fn from_usize(val: usize) -> Self {
///         SymbolId(val as u32)
///     }
///
///     fn as_usize(&self) -> usize {
///         self.0 as usize
///     }
/// }
///
/// assert!(SymbolId::NONE.is_none());
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug + 'static {
    /// Sentinel value meaning "no node".
    ///
    /// A node whose successor is `NONE` is the last node of its chain.
    const NONE: Self;

    /// Creates a key from a storage slot index.
    fn from_usize(val: usize) -> Self;

    /// Returns the storage slot index for this key.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Converts the sentinel to `None` and anything else to `Some(self)`.
    #[inline]
    fn into_option(self) -> Option<Self> {
        if self.is_none() { None } else { Some(self) }
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val < <$ty>::MAX as usize, "slot index overflows key type");
                    val as $ty
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u16, u32, u64, usize);
