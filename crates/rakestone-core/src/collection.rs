//! Ordered stone collection with change notifications.

use crate::stone::{Stone, StoneId};

/// A change to the collection, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    /// A stone was appended.
    Added(Stone),
    /// A stone was removed.
    Removed(Stone),
    /// The whole contents were replaced.
    Reset,
}

/// Ordered stones in insertion order.
///
/// The same stone may be added more than once; each insertion is its own
/// entry. Every mutation queues a [`CollectionEvent`] which the owner picks
/// up with [`StoneCollection::drain_events`] before handling the next input.
#[derive(Debug, Clone, Default)]
pub struct StoneCollection {
    stones: Vec<Stone>,
    pending: Vec<CollectionEvent>,
}

impl StoneCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stone.
    pub fn add(&mut self, stone: Stone) {
        self.stones.push(stone);
        self.pending.push(CollectionEvent::Added(stone));
    }

    /// Remove the first entry with the given identity.
    ///
    /// Returns `None` and emits nothing if no such stone exists.
    pub fn remove(&mut self, id: StoneId) -> Option<Stone> {
        let index = self.stones.iter().position(|s| s.id() == id)?;
        let stone = self.stones.remove(index);
        self.pending.push(CollectionEvent::Removed(stone));
        Some(stone)
    }

    /// Replace the entire contents, emitting a single reset event.
    pub fn reset(&mut self, stones: impl IntoIterator<Item = Stone>) {
        self.stones = stones.into_iter().collect();
        self.pending.push(CollectionEvent::Reset);
    }

    /// Iterate in insertion order.
    ///
    /// The collection is borrowed for the whole traversal, so it cannot be
    /// mutated mid-iteration.
    pub fn iter(&self) -> std::slice::Iter<'_, Stone> {
        self.stones.iter()
    }

    /// Visit every stone in insertion order.
    pub fn for_each(&self, mut visitor: impl FnMut(&Stone)) {
        for stone in &self.stones {
            visitor(stone);
        }
    }

    /// Stone at an insertion index.
    pub fn get(&self, index: usize) -> Option<&Stone> {
        self.stones.get(index)
    }

    /// Whether any entry has the given identity.
    pub fn contains(&self, id: StoneId) -> bool {
        self.stones.iter().any(|s| s.id() == id)
    }

    /// Number of entries with the given identity.
    pub fn count_of(&self, id: StoneId) -> usize {
        self.stones.iter().filter(|s| s.id() == id).count()
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Whether events are waiting to be drained.
    pub fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl<'a> IntoIterator for &'a StoneCollection {
    type Item = &'a Stone;
    type IntoIter = std::slice::Iter<'a, Stone>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
