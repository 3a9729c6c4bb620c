//! Ordered id sequences with pure move/insert/remove.
//!
//! Every operation returns a new collection and leaves the input untouched;
//! the engine snapshots by simply keeping the old `Vec`.

use thiserror::Error;

/// Errors from ordered-collection operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Index outside the valid range for the operation
    #[error("index {index} out of range for length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Item is not in the collection
    #[error("item not in collection")]
    NotFound,

    /// Item is already in the collection
    #[error("item already in collection")]
    DuplicateId,
}

/// A strictly ordered sequence of unique ids.
///
/// Index semantics: an index names the position an item occupies *after* the
/// operation, 0-based. Moving an item onto its own index is an idempotent
/// success.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderedCollection<T> {
    items: Vec<T>,
}

impl<T: Clone + Eq> OrderedCollection<T> {
    /// Wrap an existing sequence. The caller guarantees uniqueness; state
    /// construction validates it once (`BoardState::new`).
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The current position of an item
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    /// True when the item is present
    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// The sequence as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume into the underlying `Vec`
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Move an item to `new_index` within this collection.
    ///
    /// Fails with `InvalidIndex` when `new_index > len - 1` and `NotFound`
    /// when the item is absent.
    pub fn move_item(&self, item: &T, new_index: usize) -> Result<Self, OrderError> {
        let current = self.index_of(item).ok_or(OrderError::NotFound)?;
        if new_index >= self.items.len() {
            return Err(OrderError::InvalidIndex {
                index: new_index,
                len: self.items.len(),
            });
        }
        if new_index == current {
            return Ok(self.clone());
        }
        let mut items = self.items.clone();
        let moved = items.remove(current);
        items.insert(new_index, moved);
        Ok(Self { items })
    }

    /// Remove an item, failing with `NotFound` when absent
    pub fn remove_item(&self, item: &T) -> Result<Self, OrderError> {
        let current = self.index_of(item).ok_or(OrderError::NotFound)?;
        let mut items = self.items.clone();
        items.remove(current);
        Ok(Self { items })
    }

    /// Insert an item at `index`.
    ///
    /// Fails with `InvalidIndex` when `index > len` (insertion may append)
    /// and `DuplicateId` when the item is already present.
    pub fn insert_item(&self, item: T, index: usize) -> Result<Self, OrderError> {
        if self.contains(&item) {
            return Err(OrderError::DuplicateId);
        }
        if index > self.items.len() {
            return Err(OrderError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        let mut items = self.items.clone();
        items.insert(index, item);
        Ok(Self { items })
    }
}
