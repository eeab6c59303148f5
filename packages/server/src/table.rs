//! Bounded connection table.
//!
//! The table is an arena of `capacity` slots. A new connection always takes
//! the lowest free index, so a freed index is the next one handed out. The
//! table is owned by the reactor and never shared between tasks.

use crate::error::TableError;

/// Maximum number of simultaneously connected clients
pub const MAX_CLIENTS: usize = 50;

/// Stable index of a slot in the table (`0..capacity`)
pub type SlotIndex = usize;

/// One active connection
#[derive(Debug)]
pub struct ClientSlot<W> {
    /// Index of this slot in the table
    pub index: SlotIndex,
    /// Write side of the connection
    pub connection: W,
    /// Number of records received from this client
    pub messages_received: u64,
}

/// Fixed-capacity table of client slots
#[derive(Debug)]
pub struct ConnectionTable<W> {
    slots: Vec<Option<ClientSlot<W>>>,
    len: usize,
}

impl<W> ConnectionTable<W> {
    /// Create a table with room for `MAX_CLIENTS` connections
    pub fn new() -> Self {
        Self::with_capacity(MAX_CLIENTS)
    }

    /// Create a table with room for `capacity` connections
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, len: 0 }
    }

    /// Store `connection` in the lowest free slot.
    ///
    /// # Returns
    ///
    /// * `Ok(SlotIndex)` - Index of the slot now holding the connection
    /// * `Err(TableError::TableFull)` - Every slot is occupied; `connection` is dropped
    pub fn allocate_slot(&mut self, connection: W) -> Result<SlotIndex, TableError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(TableError::TableFull {
                capacity: self.capacity(),
            })?;

        self.slots[index] = Some(ClientSlot {
            index,
            connection,
            messages_received: 0,
        });
        self.len += 1;
        Ok(index)
    }

    /// Release the slot at `index` and make the index reusable.
    ///
    /// Returns the released slot, or `None` if the index was free or out of
    /// range. Dropping the returned slot closes its connection.
    pub fn free_slot(&mut self, index: SlotIndex) -> Option<ClientSlot<W>> {
        let slot = self.slots.get_mut(index)?.take()?;
        self.len -= 1;
        Some(slot)
    }

    /// Get the slot at `index` if it is occupied
    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut ClientSlot<W>> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Whether the slot at `index` is occupied
    pub fn is_occupied(&self, index: SlotIndex) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Iterate over occupied slots in index order
    pub fn iter(&self) -> impl Iterator<Item = &ClientSlot<W>> {
        self.slots.iter().flatten()
    }

    /// Iterate mutably over occupied slots in index order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClientSlot<W>> {
        self.slots.iter_mut().flatten()
    }

    /// Release every slot, returning how many were occupied
    pub fn clear(&mut self) -> usize {
        let released = self.len;
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
        released
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<W> Default for ConnectionTable<W> {
    fn default() -> Self {
        Self::new()
    }
}
