use core::num::NonZeroUsize;

/// Handle to a node slot. Handles are only meaningful for the list that
/// produced them; a handle from another list may collide with a live slot
/// here and is not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(NonZeroUsize::new(index).expect("slot 0 is reserved for the sentinel"))
    }

    pub(crate) fn index(self) -> usize {
        self.0.get()
    }
}

pub(crate) struct Slot<T> {
    /// Chain link for occupied slots; free-list link for reclaimed ones.
    /// For the sentinel this is the first-element link.
    pub(crate) next: Option<NodeId>,
    pub(crate) value: Option<T>,
    linked: bool,
}

/// Slab of node slots. Slot 0 is the sentinel head: permanently reserved,
/// never carries a value, its `next` is the head of the chain.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Option<NodeId>,
}

impl<T> Arena<T> {
    /// Position of the sentinel. Predecessor scans start here.
    pub const HEAD: usize = 0;

    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                next: None,
                value: None,
                linked: false,
            }],
            free: None,
        }
    }

    /// Allocates a detached slot for `value`, reusing a reclaimed slot when
    /// one is available.
    pub fn alloc(&mut self, value: T) -> NodeId {
        match self.free.take() {
            Some(id) => {
                let slot = &mut self.slots[id.index()];
                self.free = slot.next.take();
                slot.value = Some(value);
                slot.linked = false;
                id
            }
            None => {
                let id = NodeId::new(self.slots.len());
                self.slots.push(Slot {
                    next: None,
                    value: Some(value),
                    linked: false,
                });
                id
            }
        }
    }

    /// Reclaims a slot, returning its value. The slot joins the free list
    /// and `id` becomes stale.
    pub fn release(&mut self, id: NodeId) -> T {
        let slot = &mut self.slots[id.index()];
        let value = slot.value.take().expect("release of an empty slot");
        slot.linked = false;
        slot.next = self.free.take();
        self.free = Some(id);
        value
    }

    /// Whether `id` names a live (linked or detached) slot.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .map_or(false, |slot| slot.value.is_some())
    }

    pub fn is_linked(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .map_or(false, |slot| slot.value.is_some() && slot.linked)
    }

    pub fn mark_linked(&mut self, id: NodeId) {
        self.slots[id.index()].linked = true;
    }

    pub fn mark_detached(&mut self, id: NodeId) {
        self.slots[id.index()].linked = false;
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.index()).and_then(|slot| slot.value.as_ref())
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Link following by raw position, where position 0 is the sentinel.
    pub fn next_at(&self, pos: usize) -> Option<NodeId> {
        self.slots[pos].next
    }

    pub fn set_next_at(&mut self, pos: usize, to: Option<NodeId>) {
        self.slots[pos].next = to;
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.next_at(id.index())
    }

    pub fn set_next(&mut self, id: NodeId, to: Option<NodeId>) {
        self.set_next_at(id.index(), to);
    }

    pub fn head(&self) -> Option<NodeId> {
        self.next_at(Self::HEAD)
    }

    pub fn set_head(&mut self, to: Option<NodeId>) {
        self.set_next_at(Self::HEAD, to);
    }

    /// Base pointer into the slot buffer, for iterators that must hand out
    /// element references outliving their own `next` calls. A reference
    /// derived from this pointer covers a single slot, so it does not
    /// invalidate references into other slots.
    pub fn slots_ptr(&mut self) -> *mut Slot<T> {
        self.slots.as_mut_ptr()
    }

    /// Empties every slot (linked and detached alike) and resets the arena
    /// to its sentinel-only state. Used on teardown.
    pub fn take_all(&mut self) -> Vec<T> {
        self.free = None;
        self.slots[Self::HEAD].next = None;
        self.slots.drain(1..).filter_map(|slot| slot.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_release_reuse_slots() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_ne!(a, b);
        assert_eq!(arena.release(a), 1);
        assert!(!arena.contains(a));

        // the reclaimed slot comes back before the vec grows
        let c = arena.alloc(3);
        assert_eq!(c, a);
        assert_eq!(arena.value(c), Some(&3));
        assert_eq!(arena.value(b), Some(&2));
    }

    #[test]
    fn free_list_is_lifo() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        arena.release(a);
        arena.release(b);
        assert_eq!(arena.alloc(10), b);
        assert_eq!(arena.alloc(20), a);
    }

    #[test]
    fn linked_flag_tracks_state() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.alloc(1);
        assert!(arena.contains(a));
        assert!(!arena.is_linked(a));
        arena.mark_linked(a);
        assert!(arena.is_linked(a));
        arena.mark_detached(a);
        assert!(!arena.is_linked(a));
    }

    #[test]
    fn take_all_resets_to_sentinel() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.alloc(1);
        arena.alloc(2);
        arena.set_head(Some(a));
        let mut values = arena.take_all();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
        assert_eq!(arena.head(), None);
        assert!(!arena.contains(a));
    }
}
