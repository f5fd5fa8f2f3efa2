use serde::{Deserialize, Serialize};

/// Slot index plus generation, so a handle to a removed item never aliases its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct SlotId {
    pub index: u32,
    pub generation: u32,
}

impl SlotId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Generational arena backing the sandbox backend's body and joint storage.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> SlotId {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(item);
            return SlotId::new(index, self.generations[index as usize]);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Some(item));
        self.generations.push(0);
        SlotId::new(index, 0)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        if !self.is_live(id) {
            return None;
        }
        self.slots.get(id.index as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        if !self.is_live(id) {
            return None;
        }
        self.slots.get_mut(id.index as usize).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        let index = id.index as usize;
        let item = self.slots[index].take()?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free.push(id.index);
        Some(item)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Live items together with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|item| (SlotId::new(index as u32, self.generations[index]), item))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> + '_ {
        let generations = &self.generations;
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, slot)| {
                slot.as_mut()
                    .map(|item| (SlotId::new(index as u32, generations[index]), item))
            })
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_live(&self, id: SlotId) -> bool {
        self.generations
            .get(id.index as usize)
            .is_some_and(|generation| *generation == id.generation)
    }
}
