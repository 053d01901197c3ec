//! Generational arena with linked traversal
//!
//! Backing store for both entities and component pools. Each slot carries a
//! generation counter so stale handles are detected instead of aliasing a
//! reused slot, and live slots are threaded on an intrusive doubly-linked
//! list in insertion order.
//!
//! Removal is two-phase:
//! - `destroy()` flags the slot. It stays linked, so a traversal that is
//!   currently sitting on it can still step to its successor, but every
//!   lookup and traversal step skips it from then on.
//! - `flush()` unlinks flagged slots, drops their values and recycles the
//!   indices with a bumped generation.

struct Slot<T> {
    generation: u32,
    value: Option<T>,
    destroyed: bool,
    prev: Option<u32>,
    next: Option<u32>,
}

pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Freed slots available for reuse (LIFO)
    free_indices: Vec<u32>,
    /// Flagged slots waiting for `flush()`
    pending: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    alive_count: u32,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_indices: Vec::new(),
            pending: Vec::new(),
            head: None,
            tail: None,
            alive_count: 0,
        }
    }

    /// Insert a value at the end of the traversal order.
    /// Returns (index, generation).
    pub fn insert(&mut self, value: T) -> (u32, u32) {
        let index = if let Some(index) = self.free_indices.pop() {
            // Generation was already bumped when the slot was freed
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            slot.destroyed = false;
            index
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
                destroyed: false,
                prev: None,
                next: None,
            });
            index
        };

        // Link at tail
        let slot = &mut self.slots[index as usize];
        slot.prev = self.tail;
        slot.next = None;
        match self.tail {
            Some(tail) => self.slots[tail as usize].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.alive_count += 1;

        (index, self.slots[index as usize].generation)
    }

    /// Live means: slot occupied, generation matches, not flagged.
    pub fn is_alive(&self, index: u32, generation: u32) -> bool {
        self.slots
            .get(index as usize)
            .map(|s| s.generation == generation && s.value.is_some() && !s.destroyed)
            .unwrap_or(false)
    }

    pub fn get(&self, index: u32, generation: u32) -> Option<&T> {
        if !self.is_alive(index, generation) {
            return None;
        }
        self.slots[index as usize].value.as_ref()
    }

    pub fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        if !self.is_alive(index, generation) {
            return None;
        }
        self.slots[index as usize].value.as_mut()
    }

    /// Like `get`, but also reaches flagged slots that are not flushed yet.
    pub fn get_flagged(&self, index: u32, generation: u32) -> Option<&T> {
        let slot = self.slots.get(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut_flagged(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Flag a slot for removal. Returns false if it was already dead.
    pub fn destroy(&mut self, index: u32, generation: u32) -> bool {
        if !self.is_alive(index, generation) {
            return false;
        }
        self.slots[index as usize].destroyed = true;
        self.pending.push(index);
        self.alive_count -= 1;
        true
    }

    /// Reclaim every flagged slot.
    pub fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for index in pending {
            self.unlink(index);
            let slot = &mut self.slots[index as usize];
            slot.value = None;
            slot.destroyed = false;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_indices.push(index);
        }
    }

    fn unlink(&mut self, index: u32) {
        let (prev, next) = {
            let slot = &self.slots[index as usize];
            (slot.prev, slot.next)
        };
        match prev {
            Some(p) => self.slots[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n as usize].prev = prev,
            None => self.tail = prev,
        }
        let slot = &mut self.slots[index as usize];
        slot.prev = None;
        slot.next = None;
    }

    /// Follow links from `from` until a non-flagged slot is found.
    fn skip_destroyed(&self, mut from: Option<u32>) -> Option<(u32, u32)> {
        while let Some(index) = from {
            let slot = &self.slots[index as usize];
            if !slot.destroyed && slot.value.is_some() {
                return Some((index, slot.generation));
            }
            from = slot.next;
        }
        None
    }

    /// First live slot in insertion order.
    pub fn first(&self) -> Option<(u32, u32)> {
        self.skip_destroyed(self.head)
    }

    /// Live successor of a slot. Works from a flagged slot as long as it has
    /// not been flushed yet.
    pub fn next(&self, index: u32, generation: u32) -> Option<(u32, u32)> {
        let slot = self.slots.get(index as usize)?;
        if slot.generation != generation || slot.value.is_none() {
            return None;
        }
        self.skip_destroyed(slot.next)
    }

    /// Iterate live values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> + '_ {
        let mut cursor = self.first();
        std::iter::from_fn(move || {
            let (index, generation) = cursor?;
            cursor = self.next(index, generation);
            self.slots[index as usize]
                .value
                .as_ref()
                .map(|v| (index, generation, v))
        })
    }

    /// Drop everything immediately and invalidate every handle.
    pub fn clear(&mut self) {
        self.free_indices.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.is_some() {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
            }
            slot.destroyed = false;
            slot.prev = None;
            slot.next = None;
            self.free_indices.push(index as u32);
        }
        // Pop order reuses low indices first
        self.free_indices.reverse();
        self.pending.clear();
        self.head = None;
        self.tail = None;
        self.alive_count = 0;
    }

    /// Number of live (non-flagged) values.
    pub fn len(&self) -> usize {
        self.alive_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.alive_count == 0
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
