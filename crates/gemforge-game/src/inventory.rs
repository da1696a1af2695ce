//! Fixed-size slot storage for block entities.
//!
//! Two write paths exist: [`SlotInventory::set`] is the container-facing one
//! and clamps to the slot limit, [`SlotInventory::replace`] is the raw handler
//! write used by the device's own merge and by loading saved data.

use gemforge_nbt::{NbtCompound, NbtTag};
use tracing::warn;

use crate::error::ForgeError;
use crate::item::{ItemRegistry, ItemStack};

/// Ordered slots plus a "contents changed" flag for the owner to poll.
#[derive(Debug, Clone)]
pub struct SlotInventory {
    slots: Vec<ItemStack>,
    slot_limit: u32,
    changed: bool,
}

impl SlotInventory {
    pub fn new(size: usize, slot_limit: u32) -> Self {
        Self {
            slots: vec![ItemStack::empty(); size],
            slot_limit,
            changed: false,
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Result<&ItemStack, ForgeError> {
        self.slots.get(index).ok_or(ForgeError::IndexOutOfRange {
            index,
            size: self.slots.len(),
        })
    }

    /// Replace a slot, clamping the count to the slot limit.
    pub fn set(&mut self, index: usize, stack: ItemStack) -> Result<(), ForgeError> {
        let stack = if stack.count() > self.slot_limit {
            stack.with_count(self.slot_limit)
        } else {
            stack
        };
        self.replace(index, stack)
    }

    /// Replace a slot as-is.
    pub fn replace(&mut self, index: usize, stack: ItemStack) -> Result<(), ForgeError> {
        let size = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ForgeError::IndexOutOfRange { index, size })?;
        *slot = stack;
        self.changed = true;
        Ok(())
    }

    /// Remove up to `count` items from a slot and return them.
    pub fn split(&mut self, index: usize, count: u32) -> Result<ItemStack, ForgeError> {
        let current = self.get(index)?;
        if current.is_empty() || count == 0 {
            return Ok(ItemStack::empty());
        }
        let (taken, rest) = current.split(count);
        self.replace(index, rest)?;
        Ok(taken)
    }

    /// Empty a slot, returning what it held.
    pub fn take_all(&mut self, index: usize) -> Result<ItemStack, ForgeError> {
        let taken = self.get(index)?.clone();
        self.replace(index, ItemStack::empty())?;
        Ok(taken)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(ItemStack::is_empty)
    }

    pub fn clear(&mut self) {
        self.slots.fill(ItemStack::empty());
        self.changed = true;
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter()
    }

    /// Return and reset the "contents changed" flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Save form: `{ Size, Items: [{ Slot, id, Count }] }`, empty slots omitted.
    pub fn to_nbt(&self) -> NbtCompound {
        let items = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, stack)| {
                let mut c = stack.to_nbt()?;
                c.put_int("Slot", index as i32);
                Some(NbtTag::Compound(c))
            })
            .collect();

        let mut c = NbtCompound::new();
        c.put_int("Size", self.slots.len() as i32);
        c.put("Items", NbtTag::List(items));
        c
    }

    /// Replace every slot from a saved compound. Slots not listed become empty.
    pub fn load_nbt(&mut self, c: &NbtCompound, items: &ItemRegistry) {
        if let Some(size) = c.get_int("Size") {
            if size as usize != self.slots.len() {
                warn!(
                    "saved inventory has {size} slots, keeping {}",
                    self.slots.len()
                );
            }
        }

        self.slots.fill(ItemStack::empty());
        for entry in c.get_list("Items").unwrap_or_default() {
            let Some(entry) = entry.as_compound() else {
                continue;
            };
            let index = entry.get_int("Slot").unwrap_or(-1);
            match usize::try_from(index).ok().filter(|i| *i < self.slots.len()) {
                Some(index) => self.slots[index] = ItemStack::from_nbt(entry, items),
                None => warn!("skipping saved stack in out-of-range slot {index}"),
            }
        }
        self.changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    fn ore() -> Item {
        Item::new("miningmaster:fire_ruby_ore".parse().unwrap(), 64)
    }

    fn registry() -> ItemRegistry {
        let mut items = ItemRegistry::new();
        items.register("miningmaster:fire_ruby_ore".parse().unwrap(), 64);
        items
    }

    #[test]
    fn get_out_of_range_fails() {
        let inv = SlotInventory::new(9, 1);
        assert!(inv.get(8).unwrap().is_empty());
        assert!(matches!(
            inv.get(9),
            Err(ForgeError::IndexOutOfRange { index: 9, size: 9 })
        ));
    }

    #[test]
    fn set_clamps_to_slot_limit() {
        let mut inv = SlotInventory::new(9, 1);
        inv.set(0, ItemStack::new(ore(), 5)).unwrap();
        assert_eq!(inv.get(0).unwrap().count(), 1);
    }

    #[test]
    fn replace_does_not_clamp() {
        let mut inv = SlotInventory::new(9, 1);
        inv.replace(0, ItemStack::new(ore(), 5)).unwrap();
        assert_eq!(inv.get(0).unwrap().count(), 5);
    }

    #[test]
    fn writes_raise_changed_flag_once() {
        let mut inv = SlotInventory::new(9, 1);
        assert!(!inv.take_changed());
        inv.set(3, ItemStack::new(ore(), 1)).unwrap();
        inv.set(4, ItemStack::new(ore(), 1)).unwrap();
        assert!(inv.take_changed());
        assert!(!inv.take_changed());
    }

    #[test]
    fn split_of_empty_or_zero_is_empty() {
        let mut inv = SlotInventory::new(9, 1);
        assert!(inv.split(0, 3).unwrap().is_empty());
        inv.replace(0, ItemStack::new(ore(), 2)).unwrap();
        assert!(inv.split(0, 0).unwrap().is_empty());
        assert_eq!(inv.get(0).unwrap().count(), 2);
    }

    #[test]
    fn repeated_split_conserves_count() {
        let mut inv = SlotInventory::new(9, 1);
        inv.replace(0, ItemStack::new(ore(), 7)).unwrap();

        let mut total = 0;
        while !inv.get(0).unwrap().is_empty() {
            let before = inv.get(0).unwrap().count();
            let taken = inv.split(0, 3).unwrap();
            assert!(taken.count() <= before);
            total += taken.count();
        }
        assert_eq!(total, 7);
    }

    #[test]
    fn take_all_empties_slot() {
        let mut inv = SlotInventory::new(9, 1);
        inv.replace(2, ItemStack::new(ore(), 4)).unwrap();
        assert_eq!(inv.take_all(2).unwrap().count(), 4);
        assert!(inv.get(2).unwrap().is_empty());
        assert!(inv.is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut inv = SlotInventory::new(9, 1);
        inv.replace(0, ItemStack::new(ore(), 1)).unwrap();
        inv.replace(8, ItemStack::new(ore(), 1)).unwrap();
        assert!(!inv.is_empty());
        inv.clear();
        assert!(inv.is_empty());
    }

    #[test]
    fn nbt_reload_replaces_previous_contents() {
        let mut saved = SlotInventory::new(9, 1);
        saved.replace(0, ItemStack::new(ore(), 4)).unwrap();
        saved.replace(2, ItemStack::new(ore(), 2)).unwrap();
        let c = saved.to_nbt();
        assert_eq!(c.get_list("Items").unwrap().len(), 2);

        let mut loaded = SlotInventory::new(9, 1);
        loaded.replace(5, ItemStack::new(ore(), 1)).unwrap();
        loaded.load_nbt(&c, &registry());

        assert_eq!(loaded.get(0).unwrap().count(), 4);
        assert_eq!(loaded.get(2).unwrap().count(), 2);
        assert!(loaded.get(5).unwrap().is_empty());
    }

    #[test]
    fn nbt_reload_skips_out_of_range_slots() {
        let mut entry = ItemStack::new(ore(), 1).to_nbt().unwrap();
        entry.put_int("Slot", 40);
        let mut c = NbtCompound::new();
        c.put("Items", NbtTag::List(vec![NbtTag::Compound(entry)]));

        let mut inv = SlotInventory::new(9, 1);
        inv.load_nbt(&c, &registry());
        assert!(inv.is_empty());
    }
}
