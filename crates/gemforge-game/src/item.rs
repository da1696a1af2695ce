//! Item kinds and item stacks.
//!
//! `ItemStack` is a plain value: every operation that changes a count returns
//! a new stack, so slot contents only ever change through the inventory.

use std::collections::HashMap;

use gemforge_nbt::NbtCompound;
use tracing::warn;

use crate::identifier::Identifier;

/// Max stack size for kinds that do not declare one.
pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;

/// An item kind as registered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: Identifier,
    pub max_stack_size: u32,
}

impl Item {
    pub fn new(id: Identifier, max_stack_size: u32) -> Self {
        Self { id, max_stack_size }
    }
}

/// A count of one item kind. The empty stack has no kind and count 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStack {
    item: Option<Item>,
    count: u32,
}

impl ItemStack {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A stack of `count` items; zero collapses to the empty stack.
    pub fn new(item: Item, count: u32) -> Self {
        if count == 0 {
            return Self::empty();
        }
        Self {
            item: Some(item),
            count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn id(&self) -> Option<&Identifier> {
        self.item.as_ref().map(|item| &item.id)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max_stack_size(&self) -> u32 {
        self.item
            .as_ref()
            .map_or(DEFAULT_MAX_STACK_SIZE, |item| item.max_stack_size)
    }

    /// Same kind, ignoring counts.
    pub fn is_same_item(&self, other: &ItemStack) -> bool {
        self.id() == other.id()
    }

    pub fn is_item(&self, id: &Identifier) -> bool {
        self.id() == Some(id)
    }

    pub fn with_count(&self, count: u32) -> ItemStack {
        match &self.item {
            Some(item) => ItemStack::new(item.clone(), count),
            None => ItemStack::empty(),
        }
    }

    pub fn grow(&self, by: u32) -> ItemStack {
        self.with_count(self.count.saturating_add(by))
    }

    pub fn shrink(&self, by: u32) -> ItemStack {
        self.with_count(self.count.saturating_sub(by))
    }

    /// Split off up to `count` items: `(taken, remainder)`.
    pub fn split(&self, count: u32) -> (ItemStack, ItemStack) {
        let taken = count.min(self.count);
        (self.with_count(taken), self.shrink(taken))
    }

    /// Save form: `{ id, Count }`. `None` for the empty stack.
    ///
    /// `Count` is a Byte like vanilla stacks, widened to an Int for counts
    /// past 127.
    pub fn to_nbt(&self) -> Option<NbtCompound> {
        let item = self.item.as_ref()?;
        let mut c = NbtCompound::new();
        c.put_string("id", item.id.to_string());
        match i8::try_from(self.count) {
            Ok(count) => c.put_byte("Count", count),
            Err(_) => c.put_int("Count", i32::try_from(self.count).unwrap_or(i32::MAX)),
        }
        Some(c)
    }

    /// Inverse of [`ItemStack::to_nbt`]. Unknown or malformed ids load as empty.
    pub fn from_nbt(c: &NbtCompound, items: &ItemRegistry) -> ItemStack {
        let Some(raw_id) = c.get_str("id") else {
            return ItemStack::empty();
        };
        let count = c.get_int("Count").unwrap_or(0).max(0) as u32;
        let item = raw_id
            .parse::<Identifier>()
            .ok()
            .and_then(|id| items.get(&id).cloned());
        match item {
            Some(item) => ItemStack::new(item, count),
            None => {
                warn!("dropping saved stack of unknown item {raw_id}");
                ItemStack::empty()
            }
        }
    }
}

/// Item kinds known to the host, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<Identifier, Item>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind. An existing entry with the same id is kept.
    pub fn register(&mut self, id: Identifier, max_stack_size: u32) -> &Item {
        self.items
            .entry(id.clone())
            .or_insert_with(|| Item::new(id, max_stack_size))
    }

    pub fn get(&self, id: &Identifier) -> Option<&Item> {
        self.items.get(id)
    }

    /// Convenience: a stack of a registered kind.
    pub fn stack(&self, id: &Identifier, count: u32) -> Option<ItemStack> {
        self.get(id).map(|item| ItemStack::new(item.clone(), count))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
