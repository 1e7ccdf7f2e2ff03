//! Generational handles
//!
//! Enemies are addressed by handles instead of references so the spawn/death
//! system can remove them between ticks without invalidating anything held
//! by the caller: a handle to a removed enemy simply stops resolving.
//!
//! A handle is a slot number plus the generation the slot had when the handle
//! was issued. Freeing a slot bumps its generation, so every handle issued
//! before the free goes stale even after the slot is reused.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::error::{CoreError, Result};

/// Address of a value of type T in a [`HandleMap`]
pub struct Handle<T> {
    slot: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self {
            slot,
            generation,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.slot
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Packed form: generation in the high word, slot in the low word.
    /// Unique among all handles a map ever issues.
    #[inline]
    pub const fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | self.slot as u64
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self::new(bits as u32, (bits >> 32) as u32)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.to_bits());
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.slot).field(&self.generation).finish()
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.slot, self.generation)
    }
}

#[derive(Debug, Clone, Copy)]
struct SlotState {
    generation: u32,
    live: bool,
}

/// Hands out slots and tracks which handles are still current
pub struct HandleAllocator<T> {
    slots: Vec<SlotState>,
    /// Dead slots, reused most recent first
    vacant: Vec<u32>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HandleAllocator<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn allocate(&mut self) -> Result<Handle<T>> {
        if let Some(slot) = self.vacant.pop() {
            let state = &mut self.slots[slot as usize];
            state.live = true;
            return Ok(Handle::new(slot, state.generation));
        }

        let slot = u32::try_from(self.slots.len()).map_err(|_| CoreError::HandlesExhausted)?;
        self.slots.push(SlotState {
            generation: 0,
            live: true,
        });
        Ok(Handle::new(slot, 0))
    }

    /// Retire a handle. Its slot becomes reusable under a new generation.
    pub fn free(&mut self, handle: Handle<T>) -> Result<()> {
        if !self.is_valid(handle) {
            return Err(CoreError::StaleHandle);
        }

        let state = &mut self.slots[handle.index() as usize];
        state.live = false;
        state.generation = state.generation.wrapping_add(1);
        self.vacant.push(handle.index());
        Ok(())
    }

    pub fn is_valid(&self, handle: Handle<T>) -> bool {
        self.slots
            .get(handle.index() as usize)
            .map_or(false, |s| s.live && s.generation == handle.generation())
    }

    /// Current handle for a live slot
    fn current(&self, slot: usize) -> Option<Handle<T>> {
        let state = self.slots.get(slot)?;
        state.live.then(|| Handle::new(slot as u32, state.generation))
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for HandleAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena of values addressed by generational handles
pub struct HandleMap<T> {
    allocator: HandleAllocator<T>,
    values: Vec<Option<T>>,
}

impl<T> HandleMap<T> {
    pub fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            values: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> Result<Handle<T>> {
        let handle = self.allocator.allocate()?;
        let slot = handle.index() as usize;
        match self.values.get_mut(slot) {
            Some(entry) => *entry = Some(value),
            None => self.values.push(Some(value)),
        }
        Ok(handle)
    }

    /// Take a value out. Returns None for stale handles.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        self.allocator.free(handle).ok()?;
        self.values.get_mut(handle.index() as usize)?.take()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if self.allocator.is_valid(handle) {
            self.values.get(handle.index() as usize)?.as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if self.allocator.is_valid(handle) {
            self.values.get_mut(handle.index() as usize)?.as_mut()
        } else {
            None
        }
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.allocator.is_valid(handle)
    }

    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live handles in slot order
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let allocator = &self.allocator;
        self.values
            .iter()
            .enumerate()
            .filter_map(move |(slot, value)| Some((allocator.current(slot)?, value.as_ref()?)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> {
        let allocator = &self.allocator;
        self.values
            .iter_mut()
            .enumerate()
            .filter_map(move |(slot, value)| Some((allocator.current(slot)?, value.as_mut()?)))
    }
}

impl<T> Default for HandleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freed_slot_reused_with_new_generation() {
        let mut slots: HandleAllocator<()> = HandleAllocator::new();
        let first = slots.allocate().unwrap();
        let second = slots.allocate().unwrap();
        assert_ne!(first, second);
        assert_eq!(slots.len(), 2);

        slots.free(first).unwrap();
        assert!(!slots.is_valid(first));
        assert!(slots.is_valid(second));
        assert_eq!(slots.free(first), Err(CoreError::StaleHandle));

        let reused = slots.allocate().unwrap();
        assert_eq!(reused.index(), first.index());
        assert_eq!(reused.generation(), first.generation() + 1);
        assert!(!slots.is_valid(first));
    }

    #[test]
    fn test_stale_handles_stop_resolving() {
        let mut map: HandleMap<&str> = HandleMap::new();
        let wolf = map.insert("wolf").unwrap();
        let bear = map.insert("bear").unwrap();

        assert_eq!(map.remove(wolf), Some("wolf"));
        assert_eq!(map.remove(wolf), None);
        assert_eq!(map.get(wolf), None);
        assert_eq!(map.len(), 1);

        let boar = map.insert("boar").unwrap();
        assert_eq!(boar.index(), wolf.index());
        assert!(map.get_mut(wolf).is_none());
        assert_eq!(map.get(boar), Some(&"boar"));
        assert_eq!(map.handles(), vec![boar, bear]);
    }

    #[test]
    fn test_iter_mut_skips_removed() {
        let mut map: HandleMap<u32> = HandleMap::new();
        let handles: Vec<_> = (0..4).map(|n| map.insert(n).unwrap()).collect();
        map.remove(handles[1]);

        for (_, value) in map.iter_mut() {
            *value *= 10;
        }
        let values: Vec<u32> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 20, 30]);
    }

    #[test]
    fn test_bits_are_unique_across_generations() {
        let h: Handle<u8> = Handle::new(1234, 7);
        assert_eq!(Handle::<u8>::from_bits(h.to_bits()), h);
        assert_ne!(Handle::<u8>::new(1234, 8).to_bits(), h.to_bits());
        assert_eq!(h.to_string(), "#1234v7");
    }
}
