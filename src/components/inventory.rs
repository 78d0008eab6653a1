//! Fixed-size inventory slots.
//!
//! An [`Inventory`] maps slot indices to optional stored values. Storing
//! into a full inventory is a hard error; nothing is mutated in that case.
//! Shrinking the inventory drops the truncated slots first and hands their
//! contents back to the caller.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InventoryError {
    #[error("inventory is full ({capacity} slots)")]
    Full { capacity: usize },
    #[error("slot {index} is out of range ({capacity} slots)")]
    SlotOutOfRange { index: usize, capacity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory<T> {
    slots: Vec<Option<T>>,
}

impl<T: Copy + PartialEq> Inventory<T> {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.slots.get(index).copied().flatten()
    }

    pub fn contains(&self, item: T) -> bool {
        self.slots.contains(&Some(item))
    }

    /// Put `item` into the first free slot and return that slot's index.
    pub fn store(&mut self, item: T) -> Result<usize, InventoryError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(InventoryError::Full {
                capacity: self.size(),
            })?;
        self.slots[index] = Some(item);
        Ok(index)
    }

    /// Remove `item` wherever it is stored. Returns it if it was present.
    pub fn drop_item(&mut self, item: T) -> Option<T> {
        let slot = self.slots.iter_mut().find(|s| **s == Some(item))?;
        slot.take()
    }

    /// Empty the slot at `index`, returning whatever it held.
    pub fn drop_slot(&mut self, index: usize) -> Result<Option<T>, InventoryError> {
        let capacity = self.size();
        self.slots
            .get_mut(index)
            .map(Option::take)
            .ok_or(InventoryError::SlotOutOfRange { index, capacity })
    }

    /// Change the number of slots.
    ///
    /// Growing keeps every stored item in place. Shrinking drops the
    /// truncated slots first and returns their contents in slot order.
    pub fn resize(&mut self, size: usize) -> Vec<T> {
        if size >= self.slots.len() {
            self.slots.resize(size, None);
            return Vec::new();
        }
        self.slots.drain(size..).flatten().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|item| (i, item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_inventory_is_empty() {
        let inv: Inventory<u32> = Inventory::new(3);
        assert_eq!(inv.size(), 3);
        assert!(inv.is_empty());
        assert!(!inv.is_full());
    }

    #[test]
    fn test_store_uses_first_free_slot_only() {
        let mut inv = Inventory::new(3);
        assert_eq!(inv.store(10), Ok(0));
        assert_eq!(inv.store(11), Ok(1));
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.get(2), None);
    }

    #[test]
    fn test_store_refills_gaps() {
        let mut inv = Inventory::new(3);
        inv.store(1).unwrap();
        inv.store(2).unwrap();
        inv.drop_item(1);
        assert_eq!(inv.store(3), Ok(0));
    }

    #[test]
    fn test_store_into_full_inventory_fails_without_mutation() {
        let mut inv = Inventory::new(2);
        inv.store(1).unwrap();
        inv.store(2).unwrap();
        let before = inv.clone();
        assert_eq!(inv.store(3), Err(InventoryError::Full { capacity: 2 }));
        assert_eq!(inv, before);
    }

    #[test]
    fn test_drop_slot() {
        let mut inv = Inventory::new(2);
        inv.store(7).unwrap();
        assert_eq!(inv.drop_slot(0), Ok(Some(7)));
        assert_eq!(inv.drop_slot(0), Ok(None));
        assert_eq!(
            inv.drop_slot(5),
            Err(InventoryError::SlotOutOfRange {
                index: 5,
                capacity: 2
            })
        );
    }

    #[test]
    fn test_grow_preserves_items() {
        let mut inv = Inventory::new(2);
        inv.store(1).unwrap();
        inv.store(2).unwrap();
        assert!(inv.resize(4).is_empty());
        assert_eq!(inv.size(), 4);
        assert_eq!(inv.get(0), Some(1));
        assert_eq!(inv.get(1), Some(2));
        assert!(!inv.is_full());
    }

    #[test]
    fn test_shrink_drops_truncated_slots() {
        let mut inv = Inventory::new(4);
        for item in [1, 2, 3, 4] {
            inv.store(item).unwrap();
        }
        inv.drop_slot(2).unwrap();
        let dropped = inv.resize(1);
        assert_eq!(dropped, vec![2, 4]);
        assert_eq!(inv.size(), 1);
        assert_eq!(inv.get(0), Some(1));
    }
}
