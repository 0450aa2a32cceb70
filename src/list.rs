use core::fmt::{self, Debug, Formatter};
use core::iter::{Extend, FromIterator};
use core::ops::{Index, IndexMut};

use crate::arena::{Arena, NodeId};
use crate::error::ListError;
use crate::hooks::Hooks;

/// Singly linked list with a sentinel head slot, a cached tail handle, and
/// optional per-list behavior hooks.
///
/// Nodes live in a slot arena owned by the list and are addressed through
/// [`NodeId`] handles. A node is either *linked* (part of the chain) or
/// *detached* (allocated but unlinked, e.g. after [`detach_at`]); detached
/// nodes can be relinked with the `attach_*` family without reallocating.
///
/// The tail handle exists so that [`last`] and [`push_back`] are O(1)
/// despite the single link direction; every mutating operation maintains it.
///
/// [`detach_at`]: SinglyLinkedList::detach_at
/// [`last`]: SinglyLinkedList::last
/// [`push_back`]: SinglyLinkedList::push_back
pub struct SinglyLinkedList<T> {
    arena: Arena<T>,
    tail: Option<NodeId>,
    len: usize,
    hooks: Hooks<T>,
}

impl<T> SinglyLinkedList<T> {
    /// Empty list without hooks. Hook-dependent operations on it fail with
    /// [`ListError::MissingHook`].
    pub fn new() -> Self {
        Self::with_hooks(Hooks::new())
    }

    pub fn with_hooks(hooks: Hooks<T>) -> Self {
        Self {
            arena: Arena::new(),
            tail: None,
            len: 0,
            hooks,
        }
    }

    pub fn hooks(&self) -> &Hooks<T> {
        &self.hooks
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // --- internal link plumbing -------------------------------------------

    /// Position (sentinel or node index) whose `next` is the slot at `index`.
    /// Caller guarantees `index <= len`.
    fn pos_before(&self, index: usize) -> usize {
        let mut pos = Arena::<T>::HEAD;
        for _ in 0..index {
            pos = self
                .arena
                .next_at(pos)
                .expect("list shorter than its recorded length")
                .index();
        }
        pos
    }

    /// Position whose `next` is `anchor`, found by scanning from the
    /// sentinel. `None` when `anchor` is not linked here.
    fn pos_of_pred(&self, anchor: NodeId) -> Option<usize> {
        let mut pos = Arena::<T>::HEAD;
        while let Some(next) = self.arena.next_at(pos) {
            if next == anchor {
                return Some(pos);
            }
            pos = next.index();
        }
        None
    }

    /// O(n) membership scan. A positive `is_linked` flag alone is not
    /// enough: a stale handle from another list can alias a live slot.
    fn is_member(&self, id: NodeId) -> bool {
        let mut cur = self.arena.head();
        while let Some(node) = cur {
            if node == id {
                return true;
            }
            cur = self.arena.next(node);
        }
        false
    }

    /// Splices the detached slot `id` in right after `pos`, maintaining the
    /// cached tail and the count.
    fn link_after_pos(&mut self, pos: usize, id: NodeId) {
        let next = self.arena.next_at(pos);
        self.arena.set_next(id, next);
        self.arena.set_next_at(pos, Some(id));
        self.arena.mark_linked(id);
        self.len += 1;
        if next.is_none() {
            // spliced in behind the last node (or into an empty list)
            self.tail = Some(id);
        }
    }

    /// Unlinks the slot after `pos` and returns it, detached. Caller
    /// guarantees a successor exists.
    fn unlink_after_pos(&mut self, pos: usize) -> NodeId {
        let id = self
            .arena
            .next_at(pos)
            .expect("unlink position has no successor");
        let next = self.arena.next(id);
        self.arena.set_next_at(pos, next);
        self.arena.set_next(id, None);
        self.arena.mark_detached(id);
        self.len -= 1;
        if self.tail == Some(id) {
            // removed the last node, the predecessor becomes the tail
            self.tail = if pos == Arena::<T>::HEAD {
                None
            } else {
                Some(NodeId::new(pos))
            };
        }
        id
    }

    fn value_of(&self, id: NodeId) -> &T {
        self.arena.value(id).expect("linked slot holds a value")
    }

    /// Routes a removed value through the `free` hook when one is set.
    fn free_value(&self, value: T) {
        match self.hooks.free {
            Some(free) => free(value),
            None => drop(value),
        }
    }

    fn ensure_detached(&self, id: NodeId) -> Result<(), ListError> {
        if !self.arena.contains(id) {
            return Err(ListError::NodeNotFound);
        }
        if self.arena.is_linked(id) {
            return Err(ListError::NodeAlreadyLinked);
        }
        Ok(())
    }

    // --- insertion, data level --------------------------------------------

    /// Prepends `value`. O(1).
    pub fn push_front(&mut self, value: T) -> NodeId {
        let id = self.arena.alloc(value);
        self.link_after_pos(Arena::<T>::HEAD, id);
        id
    }

    /// Appends `value` through the cached tail. O(1).
    pub fn push_back(&mut self, value: T) -> NodeId {
        let id = self.arena.alloc(value);
        let pos = self.tail.map_or(Arena::<T>::HEAD, NodeId::index);
        self.link_after_pos(pos, id);
        id
    }

    /// Inserts `value` so that it ends up at `index`. `index == len`
    /// appends. O(index).
    pub fn insert(&mut self, index: usize, value: T) -> Result<NodeId, ListError> {
        if index > self.len {
            return Err(ListError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let pos = self.pos_before(index);
        let id = self.arena.alloc(value);
        self.link_after_pos(pos, id);
        Ok(id)
    }

    /// Inserts `value` in front of `anchor`. O(n): singly linked, so the
    /// predecessor has to be found by scanning.
    pub fn insert_before(&mut self, anchor: NodeId, value: T) -> Result<NodeId, ListError> {
        let pos = self.pos_of_pred(anchor).ok_or(ListError::NodeNotFound)?;
        let id = self.arena.alloc(value);
        self.link_after_pos(pos, id);
        Ok(id)
    }

    /// Inserts `value` behind `anchor`, verifying first that `anchor` is
    /// linked in this list. O(n) for the verification, O(1) for the splice.
    pub fn insert_after(&mut self, anchor: NodeId, value: T) -> Result<NodeId, ListError> {
        if !self.is_member(anchor) {
            return Err(ListError::NodeNotFound);
        }
        Ok(self.insert_after_unchecked(anchor, value))
    }

    /// Inserts `value` behind `anchor` without the membership scan. O(1).
    ///
    /// The caller must guarantee `anchor` is linked in *this* list; the
    /// precondition is checked only in debug builds. An anchor from another
    /// list silently corrupts the count and the cached tail.
    pub fn insert_after_unchecked(&mut self, anchor: NodeId, value: T) -> NodeId {
        debug_assert!(self.arena.is_linked(anchor), "anchor is not linked");
        let id = self.arena.alloc(value);
        self.link_after_pos(anchor.index(), id);
        id
    }

    // --- insertion, node level --------------------------------------------

    /// Relinks a detached node at the front.
    pub fn attach_front(&mut self, node: NodeId) -> Result<(), ListError> {
        self.ensure_detached(node)?;
        self.link_after_pos(Arena::<T>::HEAD, node);
        Ok(())
    }

    /// Relinks a detached node at the back.
    pub fn attach_back(&mut self, node: NodeId) -> Result<(), ListError> {
        self.ensure_detached(node)?;
        let pos = self.tail.map_or(Arena::<T>::HEAD, NodeId::index);
        self.link_after_pos(pos, node);
        Ok(())
    }

    /// Relinks a detached node in front of `anchor`. O(n).
    pub fn attach_before(&mut self, anchor: NodeId, node: NodeId) -> Result<(), ListError> {
        self.ensure_detached(node)?;
        let pos = self.pos_of_pred(anchor).ok_or(ListError::NodeNotFound)?;
        self.link_after_pos(pos, node);
        Ok(())
    }

    /// Relinks a detached node behind `anchor`, verifying membership. O(n).
    pub fn attach_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), ListError> {
        self.ensure_detached(node)?;
        if !self.is_member(anchor) {
            return Err(ListError::NodeNotFound);
        }
        self.link_after_pos(anchor.index(), node);
        Ok(())
    }

    /// Relinks a detached node behind `anchor` without the membership scan.
    /// O(1); same precondition as [`insert_after_unchecked`].
    ///
    /// [`insert_after_unchecked`]: SinglyLinkedList::insert_after_unchecked
    pub fn attach_after_unchecked(&mut self, anchor: NodeId, node: NodeId) -> Result<(), ListError> {
        self.ensure_detached(node)?;
        debug_assert!(self.arena.is_linked(anchor), "anchor is not linked");
        self.link_after_pos(anchor.index(), node);
        Ok(())
    }

    /// Frees a detached node's slot and hands its value back to the caller.
    pub fn release_node(&mut self, node: NodeId) -> Result<T, ListError> {
        if !self.arena.contains(node) {
            return Err(ListError::NodeNotFound);
        }
        if self.arena.is_linked(node) {
            return Err(ListError::NodeStillLinked);
        }
        Ok(self.arena.release(node))
    }

    // --- removal ----------------------------------------------------------

    /// Removes the first element the `equal` hook matches against `value`.
    /// The matched value goes through the `free` hook. Returns whether a
    /// match was removed.
    pub fn remove_first_match(&mut self, value: &T) -> Result<bool, ListError> {
        let equal = self.hooks.equal.ok_or(ListError::MissingHook("equal"))?;
        let mut pos = Arena::<T>::HEAD;
        while let Some(next) = self.arena.next_at(pos) {
            if equal(self.value_of(next), value) {
                let id = self.unlink_after_pos(pos);
                let removed = self.arena.release(id);
                self.free_value(removed);
                return Ok(true);
            }
            pos = next.index();
        }
        Ok(false)
    }

    /// Removes every element the `equal` hook matches. The scan compares
    /// against a `copy`-hook duplicate of `value` made up front, so that a
    /// probe aliasing an element cannot be freed mid-scan; the duplicate is
    /// released through the `free` hook at the end. Returns the number of
    /// elements removed.
    pub fn remove_all_matches(&mut self, value: &T) -> Result<usize, ListError> {
        let equal = self.hooks.equal.ok_or(ListError::MissingHook("equal"))?;
        let copy = self.hooks.copy.ok_or(ListError::MissingHook("copy"))?;
        let probe = copy(value);
        let mut removed = 0;
        let mut pos = Arena::<T>::HEAD;
        while let Some(next) = self.arena.next_at(pos) {
            if equal(self.value_of(next), &probe) {
                let id = self.unlink_after_pos(pos);
                let matched = self.arena.release(id);
                self.free_value(matched);
                removed += 1;
                // pos is unchanged, its new successor is the old next.next
                continue;
            }
            pos = next.index();
        }
        self.free_value(probe);
        Ok(removed)
    }

    /// Unlinks `node` and frees it, routing the value through the `free`
    /// hook. O(n) predecessor scan.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), ListError> {
        let pos = self.pos_of_pred(node).ok_or(ListError::NodeNotFound)?;
        let id = self.unlink_after_pos(pos);
        let removed = self.arena.release(id);
        self.free_value(removed);
        Ok(())
    }

    /// Unlinks the node at `index` but keeps it allocated; the returned
    /// handle can be relinked with the `attach_*` family or freed with
    /// [`release_node`].
    ///
    /// [`release_node`]: SinglyLinkedList::release_node
    pub fn detach_at(&mut self, index: usize) -> Option<NodeId> {
        if index >= self.len {
            return None;
        }
        let pos = self.pos_before(index);
        Some(self.unlink_after_pos(pos))
    }

    /// Removes the node at `index` and returns its value to the caller.
    /// Ownership transfers out, so the `free` hook is not consulted.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        let id = self.detach_at(index)?;
        Some(self.arena.release(id))
    }

    /// Removes and returns the first element. O(1).
    pub fn pop_front(&mut self) -> Option<T> {
        self.arena.head()?;
        let id = self.unlink_after_pos(Arena::<T>::HEAD);
        Some(self.arena.release(id))
    }

    // --- search and access ------------------------------------------------

    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        if index >= self.len {
            return None;
        }
        let mut cur = self.arena.head();
        for _ in 0..index {
            cur = self.arena.next(cur?);
        }
        cur
    }

    /// First node the `equal` hook matches against `value`.
    pub fn find_node(&self, value: &T) -> Result<Option<NodeId>, ListError> {
        let equal = self.hooks.equal.ok_or(ListError::MissingHook("equal"))?;
        Ok(self.find_node_by(|v| equal(v, value)))
    }

    /// First node matching an ad-hoc predicate; no hook required.
    pub fn find_node_by<F: FnMut(&T) -> bool>(&self, mut pred: F) -> Option<NodeId> {
        let mut cur = self.arena.head();
        while let Some(id) = cur {
            if pred(self.value_of(id)) {
                return Some(id);
            }
            cur = self.arena.next(id);
        }
        None
    }

    /// Index of the first element the `equal` hook matches.
    pub fn index_of(&self, value: &T) -> Result<Option<usize>, ListError> {
        let equal = self.hooks.equal.ok_or(ListError::MissingHook("equal"))?;
        let mut index = 0;
        let mut cur = self.arena.head();
        while let Some(id) = cur {
            if equal(self.value_of(id), value) {
                return Ok(Some(index));
            }
            cur = self.arena.next(id);
            index += 1;
        }
        Ok(None)
    }

    pub fn index_of_node(&self, node: NodeId) -> Option<usize> {
        let mut index = 0;
        let mut cur = self.arena.head();
        while let Some(id) = cur {
            if id == node {
                return Some(index);
            }
            cur = self.arena.next(id);
            index += 1;
        }
        None
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        let id = self.node_at(index)?;
        self.arena.value(id)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let id = self.node_at(index)?;
        self.arena.value_mut(id)
    }

    /// Value carried by a node, linked or detached.
    pub fn node_value(&self, node: NodeId) -> Option<&T> {
        self.arena.value(node)
    }

    pub fn node_value_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.arena.value_mut(node)
    }

    pub fn first(&self) -> Option<&T> {
        self.arena.head().map(|id| self.value_of(id))
    }

    /// O(1) through the cached tail.
    pub fn last(&self) -> Option<&T> {
        self.tail.map(|id| self.value_of(id))
    }

    pub fn first_node(&self) -> Option<NodeId> {
        self.arena.head()
    }

    pub fn last_node(&self) -> Option<NodeId> {
        self.tail
    }

    // --- whole-list operations --------------------------------------------

    /// In-place reversal: the old first node stays put as the new tail while
    /// every following node is moved to the front. O(n).
    pub fn reverse(&mut self) {
        let Some(first) = self.arena.head() else {
            return;
        };
        self.tail = Some(first);
        while let Some(moved) = self.arena.next(first) {
            let after = self.arena.next(moved);
            self.arena.set_next(first, after);
            let head = self.arena.head();
            self.arena.set_next(moved, head);
            self.arena.set_head(Some(moved));
        }
    }

    /// Appends every element of `source` in order. `source` is consumed;
    /// node handles into it do not survive the move.
    pub fn concat(&mut self, mut source: Self) {
        while let Some(value) = source.pop_front() {
            self.push_back(value);
        }
    }

    /// Element-by-element copy through the `copy` hook, hooks carried over.
    pub fn duplicate_deep(&self) -> Result<Self, ListError> {
        let copy = self.hooks.copy.ok_or(ListError::MissingHook("copy"))?;
        let mut out = Self::with_hooks(self.hooks);
        for value in self.iter() {
            out.push_back(copy(value));
        }
        Ok(out)
    }

    /// Unlinks and drops every element. Detached nodes are untouched.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Unlinks every element and releases each value through the `free`
    /// hook.
    pub fn clear_deep(&mut self) -> Result<(), ListError> {
        let free = self.hooks.free.ok_or(ListError::MissingHook("free"))?;
        while let Some(value) = self.pop_front() {
            free(value);
        }
        Ok(())
    }

    /// Consumes an already-emptied list.
    ///
    /// # Panics
    ///
    /// Panics if the list still holds elements; emptying it first is part
    /// of the contract.
    pub fn destroy(self) {
        assert!(
            self.is_empty(),
            "destroy called on a list that still holds {} elements",
            self.len
        );
    }

    /// Releases every element through the `free` hook, then consumes the
    /// shell. Without a `free` hook the list is handed back untouched.
    pub fn destroy_deep(mut self) -> Result<(), (Self, ListError)> {
        match self.clear_deep() {
            Ok(()) => {
                self.destroy();
                Ok(())
            }
            Err(err) => Err((self, err)),
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.arena)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.arena)
    }
}

impl<T: Clone> SinglyLinkedList<T> {
    /// Shallow copy: elements are reproduced with their own `Clone` impl,
    /// hooks carried over. For shared-handle elements such as `Rc<U>` this
    /// yields a copy aliasing the same underlying values.
    pub fn duplicate(&self) -> Self {
        let mut out = Self::with_hooks(self.hooks);
        for value in self.iter() {
            out.push_back(value.clone());
        }
        out
    }
}

impl<T> Drop for SinglyLinkedList<T> {
    fn drop(&mut self) {
        if let Some(free) = self.hooks.free {
            for value in self.arena.take_all() {
                free(value);
            }
            self.tail = None;
            self.len = 0;
        }
    }
}

impl<T> Default for SinglyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for SinglyLinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SinglyLinkedList {{ len: {}, items: [", self.len)?;
        let mut iter = self.iter();
        if let Some(value) = iter.next() {
            write!(f, "{value:?}")?;
        }
        for value in iter {
            write!(f, ", {value:?}")?;
        }
        write!(f, "] }}")
    }
}

impl<T: PartialEq> PartialEq for SinglyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for SinglyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SinglyLinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for SinglyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> Index<usize> for SinglyLinkedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for list of length {}", self.len),
        }
    }
}

impl<T> IndexMut<usize> for SinglyLinkedList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for list of length {len}"),
        }
    }
}

mod iters {
    use core::marker::PhantomData;

    use super::SinglyLinkedList;
    use crate::arena::{Arena, NodeId, Slot};

    pub struct Iter<'a, T> {
        arena: &'a Arena<T>,
        cur: Option<NodeId>,
    }

    impl<'a, T> Iter<'a, T> {
        pub(super) fn new(arena: &'a Arena<T>) -> Self {
            Self {
                cur: arena.head(),
                arena,
            }
        }
    }

    impl<'a, T> Iterator for Iter<'a, T> {
        type Item = &'a T;

        fn next(&mut self) -> Option<Self::Item> {
            let id = self.cur?;
            self.cur = self.arena.next(id);
            Some(self.arena.value(id).expect("linked slot holds a value"))
        }
    }

    pub struct IterMut<'a, T> {
        slots: *mut Slot<T>,
        cur: Option<NodeId>,
        _marker: PhantomData<&'a mut Arena<T>>,
    }

    impl<'a, T> IterMut<'a, T> {
        pub(super) fn new(arena: &'a mut Arena<T>) -> Self {
            Self {
                cur: arena.head(),
                slots: arena.slots_ptr(),
                _marker: PhantomData,
            }
        }
    }

    impl<'a, T> Iterator for IterMut<'a, T> {
        type Item = &'a mut T;

        fn next(&mut self) -> Option<Self::Item> {
            let id = self.cur?;
            // SAFETY: `id` names a linked slot inside the buffer the list's
            // borrow pins, the chain visits each slot exactly once, and the
            // reborrow covers this slot alone, so references handed out on
            // earlier steps stay valid.
            let slot = unsafe { &mut *self.slots.add(id.index()) };
            self.cur = slot.next;
            Some(slot.value.as_mut().expect("linked slot holds a value"))
        }
    }

    pub struct IntoIter<T> {
        pub(super) list: SinglyLinkedList<T>,
    }

    impl<T> Iterator for IntoIter<T> {
        type Item = T;

        fn next(&mut self) -> Option<Self::Item> {
            self.list.pop_front()
        }
    }

    impl<T> IntoIterator for SinglyLinkedList<T> {
        type Item = T;
        type IntoIter = IntoIter<T>;

        fn into_iter(self) -> Self::IntoIter {
            IntoIter { list: self }
        }
    }

    impl<'a, T> IntoIterator for &'a SinglyLinkedList<T> {
        type Item = &'a T;
        type IntoIter = Iter<'a, T>;

        fn into_iter(self) -> Self::IntoIter {
            self.iter()
        }
    }

    impl<'a, T> IntoIterator for &'a mut SinglyLinkedList<T> {
        type Item = &'a mut T;
        type IntoIter = IterMut<'a, T>;

        fn into_iter(self) -> Self::IntoIter {
            self.iter_mut()
        }
    }
}

pub use iters::{IntoIter, Iter, IterMut};
