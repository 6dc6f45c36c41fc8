use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any record must implement to live in a [`PagedCollection`].
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;
}

// =============================================================================
// 2. THE PAGED COLLECTION
// =============================================================================

/// Records in fetch arrival order, plus the pagination cursor and the
/// rollback snapshots of entries that were edited optimistically.
///
/// Pages are appended as received. Ids already present are not deduplicated.
#[derive(Debug, Clone)]
pub struct PagedCollection<T: Entity> {
    items: Vec<T>,
    offset: usize,
    has_more: bool,
    originals: HashMap<T::Id, T>,
}

impl<T: Entity> Default for PagedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> PagedCollection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            has_more: true,
            originals: HashMap::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the sizes of every page appended so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Appends a page and advances the cursor by its length. A page shorter
    /// than `page_size` ends pagination for good.
    pub fn append_page(&mut self, page: Vec<T>, page_size: usize) -> usize {
        let received = page.len();
        if received < page_size {
            self.has_more = false;
        }
        self.items.extend(page);
        self.offset += received;
        received
    }

    /// Replaces the first entry with a matching id, returning the previous value.
    /// Absent ids are left alone.
    pub fn replace(&mut self, item: T) -> Option<T> {
        let slot = self.items.iter_mut().find(|existing| existing.id() == item.id())?;
        Some(std::mem::replace(slot, item))
    }

    /// Replaces an entry ahead of its remote write. The first optimistic edit
    /// of a committed entry keeps the committed value for rollback.
    pub fn apply_optimistic(&mut self, item: T) -> bool {
        let id = item.id().clone();
        match self.replace(item) {
            Some(previous) => {
                self.originals.entry(id).or_insert(previous);
                true
            }
            None => false,
        }
    }

    /// Takes the value to restore if the remote write for `id` fails: the
    /// committed value kept by [`Self::apply_optimistic`], else the current entry.
    pub fn take_snapshot(&mut self, id: &T::Id) -> Option<T> {
        self.originals
            .remove(id)
            .or_else(|| self.get(id).cloned())
    }

    /// Number of entries currently carrying an unconfirmed optimistic edit.
    pub fn pending_originals(&self) -> usize {
        self.originals.len()
    }
}
