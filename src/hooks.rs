use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};

/// Total order over element values. Reserved for ordered insertion; no
/// current operation consumes it.
pub type CompareHook<T> = fn(&T, &T) -> Ordering;

/// Value equivalence, consulted by search and remove-by-value.
pub type EqualHook<T> = fn(&T, &T) -> bool;

/// Produces an independent value equivalent to the argument. Consulted by
/// deep copy and by `remove_all_matches` for its probe copy.
pub type CopyHook<T> = fn(&T) -> T;

/// Releases a value's resources. Consulted by the deep clear/destroy paths
/// and by remove-by-value; when absent, removed values are simply dropped.
pub type FreeHook<T> = fn(T);

/// Per-list behavior hooks, all optional. Operations that need an absent
/// hook fail with [`ListError::MissingHook`](crate::ListError::MissingHook)
/// instead of guessing.
///
/// Hooks are plain function pointers, so a hook cannot capture state; tests
/// that observe hook calls do so through statics.
pub struct Hooks<T> {
    pub compare: Option<CompareHook<T>>,
    pub equal: Option<EqualHook<T>>,
    pub copy: Option<CopyHook<T>>,
    pub free: Option<FreeHook<T>>,
}

impl<T> Hooks<T> {
    pub const fn new() -> Self {
        Self {
            compare: None,
            equal: None,
            copy: None,
            free: None,
        }
    }

    pub fn compare(mut self, f: CompareHook<T>) -> Self {
        self.compare = Some(f);
        self
    }

    pub fn equal(mut self, f: EqualHook<T>) -> Self {
        self.equal = Some(f);
        self
    }

    pub fn copy(mut self, f: CopyHook<T>) -> Self {
        self.copy = Some(f);
        self
    }

    pub fn free(mut self, f: FreeHook<T>) -> Self {
        self.free = Some(f);
        self
    }
}

impl<T: PartialEq + Clone> Hooks<T> {
    /// Hooks derived from the element's own trait impls: `equal` from
    /// `PartialEq`, `copy` from `Clone`. `compare` and `free` stay unset.
    pub fn derived() -> Self {
        Self::new().equal(|a, b| a == b).copy(T::clone)
    }
}

impl<T> Clone for Hooks<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Hooks<T> {}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Hooks<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("compare", &self.compare.is_some())
            .field("equal", &self.equal.is_some())
            .field("copy", &self.copy.is_some())
            .field("free", &self.free.is_some())
            .finish()
    }
}
