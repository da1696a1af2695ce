//! The gem forge block entity.
//!
//! A 9-slot container that forges the stack in slot 0 into slot 2, one input
//! item per firing, and remembers how often each recipe fired so the host can
//! award experience later. The host drives everything: it calls [`GemForge::tick`]
//! once per game tick, forwards container and hopper access through the
//! inventory accessors, and persists [`GemForge::write`] whenever
//! [`GemForge::take_dirty`] reports a change.

use std::collections::HashMap;

use gemforge_nbt::{
    read_nbt_le, write_nbt_le, write_nbt_network, NbtCompound, NbtRoot,
};
use tracing::{debug, trace, warn};

use crate::error::ForgeError;
use crate::identifier::Identifier;
use crate::inventory::SlotInventory;
use crate::item::{ItemRegistry, ItemStack};
use crate::ledger::RecipeLedger;
use crate::position::{BlockPos, Face, Vec3};
use crate::recipe::{RecipeBook, TransformationRule};

/// Block entity type id written into save data.
pub const BLOCK_ENTITY_ID: &str = "miningmaster:gem_forge";
/// Translation key used when no custom name is set.
pub const DEFAULT_NAME_KEY: &str = "miningmaster:container.gem_forge";

pub const FORGE_SLOTS: usize = 9;
pub const INPUT_SLOT: usize = 0;
pub const OUTPUT_SLOT: usize = 2;
/// Side/bottom extraction port. It sits past the 9 real slots, so the
/// inventory itself rejects access to it.
pub const SIDE_PORT_SLOT: usize = 9;
/// Container-facing stack limit, independent of item max stack sizes.
pub const SLOT_LIMIT: u32 = 1;
pub const MAX_USE_DISTANCE_SQ: f64 = 64.0;

const SLOTS_UP: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7];
const SLOTS_DOWN: &[usize] = &[SIDE_PORT_SLOT];
const SLOTS_HORIZONTAL: &[usize] = &[SIDE_PORT_SLOT];

/// Host-assigned identity of one block entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForgeHandle(pub u64);

/// Whether this copy of the device is the simulation's own or a client mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Authoritative,
    Mirror,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayName {
    Custom(String),
    Translatable(&'static str),
}

/// The host's view of which block entity currently occupies a position.
pub trait BlockEntityLookup {
    fn block_entity_at(&self, pos: BlockPos) -> Option<ForgeHandle>;
}

#[derive(Debug, Clone)]
pub struct GemForge {
    handle: ForgeHandle,
    pos: BlockPos,
    side: Side,
    custom_name: Option<String>,
    inventory: SlotInventory,
    recipes_used: RecipeLedger,
    cook_time: u32,
    /// Recipe the current `cook_time` was accumulated for.
    cooking: Option<Identifier>,
    dirty: bool,
}

impl GemForge {
    pub fn new(handle: ForgeHandle, pos: BlockPos) -> Self {
        Self::with_side(handle, pos, Side::Authoritative)
    }

    /// A read-only replica; it never records recipe use or advances on tick.
    pub fn mirror(handle: ForgeHandle, pos: BlockPos) -> Self {
        Self::with_side(handle, pos, Side::Mirror)
    }

    fn with_side(handle: ForgeHandle, pos: BlockPos, side: Side) -> Self {
        Self {
            handle,
            pos,
            side,
            custom_name: None,
            inventory: SlotInventory::new(FORGE_SLOTS, SLOT_LIMIT),
            recipes_used: RecipeLedger::new(),
            cook_time: 0,
            cooking: None,
            dirty: false,
        }
    }

    pub fn handle(&self) -> ForgeHandle {
        self.handle
    }

    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn recipes_used(&self) -> &RecipeLedger {
        &self.recipes_used
    }

    /// Ticks spent on the current input so far.
    pub fn cook_progress(&self) -> u32 {
        self.cook_time
    }

    /// The raw slot handler, as handed to container menus.
    pub fn inventory(&self) -> &SlotInventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut SlotInventory {
        &mut self.inventory
    }

    /// Return and clear the "needs saving" state.
    pub fn take_dirty(&mut self) -> bool {
        let changed = self.inventory.take_changed();
        std::mem::take(&mut self.dirty) || changed
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // -- naming ------------------------------------------------------------

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    pub fn set_custom_name(&mut self, name: Option<String>) {
        self.custom_name = name;
        self.mark_dirty();
    }

    pub fn display_name(&self) -> DisplayName {
        match &self.custom_name {
            Some(name) => DisplayName::Custom(name.clone()),
            None => DisplayName::Translatable(DEFAULT_NAME_KEY),
        }
    }

    // -- container surface -------------------------------------------------

    pub fn size(&self) -> usize {
        self.inventory.size()
    }

    pub fn get_item(&self, index: usize) -> Result<&ItemStack, ForgeError> {
        self.inventory.get(index)
    }

    /// Put a stack into a slot, clamped to [`SLOT_LIMIT`].
    pub fn set_item(&mut self, index: usize, stack: ItemStack) -> Result<(), ForgeError> {
        self.inventory.set(index, stack)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn split_item(&mut self, index: usize, count: u32) -> Result<ItemStack, ForgeError> {
        self.inventory.split(index, count)
    }

    pub fn remove_item(&mut self, index: usize) -> Result<ItemStack, ForgeError> {
        self.inventory.take_all(index)
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.iter().take(FORGE_SLOTS).all(ItemStack::is_empty)
    }

    pub fn clear(&mut self) {
        self.inventory.clear();
    }

    /// Per-kind totals over the forge slots, for recipe-book autofill.
    pub fn stacked_contents(&self) -> HashMap<Identifier, u32> {
        let mut totals = HashMap::new();
        for stack in self.inventory.iter().take(FORGE_SLOTS) {
            if let Some(id) = stack.id() {
                *totals.entry(id.clone()).or_insert(0) += stack.count();
            }
        }
        totals
    }

    // -- sided access ------------------------------------------------------

    pub fn exposed_slots(&self, face: Face) -> &'static [usize] {
        match face {
            Face::Down => SLOTS_DOWN,
            Face::Up => SLOTS_UP,
            _ => SLOTS_HORIZONTAL,
        }
    }

    pub fn is_item_valid_for_slot(&self, _index: usize, _stack: &ItemStack) -> bool {
        true
    }

    pub fn can_insert(&self, index: usize, stack: &ItemStack, _face: Option<Face>) -> bool {
        self.is_item_valid_for_slot(index, stack)
    }

    /// Fire rubies never leave through automation.
    pub fn can_extract(&self, _index: usize, stack: &ItemStack, _face: Face) -> bool {
        !stack
            .id()
            .is_some_and(|id| id.is("miningmaster", "fire_ruby"))
    }

    pub fn is_usable_by(&self, world: &impl BlockEntityLookup, requester: Vec3) -> bool {
        if world.block_entity_at(self.pos) != Some(self.handle) {
            trace!("forge at {:?} no longer registered", self.pos);
            return false;
        }
        let usable = requester.distance_sq(self.pos.center()) <= MAX_USE_DISTANCE_SQ;
        trace!("forge at {:?} usable by {:?}: {usable}", self.pos, requester);
        usable
    }

    // -- forging -------------------------------------------------------------

    /// Whether `rule` could fire against the current input and output slots.
    pub fn can_transform<R>(&self, rule: Option<&R>) -> bool
    where
        R: TransformationRule + ?Sized,
    {
        let input = &self.inventory_slot(INPUT_SLOT);
        let Some(rule) = rule.filter(|_| !input.is_empty()) else {
            return false;
        };
        let Some(result) = rule.apply(input).filter(|r| !r.is_empty()) else {
            return false;
        };

        let output = self.inventory_slot(OUTPUT_SLOT);
        if output.is_empty() {
            return true;
        }
        if !output.is_same_item(&result) {
            return false;
        }
        let merged = output.count() + result.count();
        if merged <= SLOT_LIMIT && merged <= output.max_stack_size() {
            return true;
        }
        // The result's own max stack size still allows the merge.
        merged <= result.max_stack_size()
    }

    /// Consume one input item and produce `rule`'s result into the output slot.
    ///
    /// Returns `false` without touching anything if the rule cannot fire.
    pub fn fire<R>(&mut self, rule: Option<&R>) -> Result<bool, ForgeError>
    where
        R: TransformationRule + ?Sized,
    {
        let Some(rule) = rule.filter(|r| self.can_transform(Some(*r))) else {
            return Ok(false);
        };
        let input = self.inventory_slot(INPUT_SLOT);
        let Some(result) = rule.apply(&input) else {
            return Ok(false);
        };

        let output = self.inventory_slot(OUTPUT_SLOT);
        if output.is_empty() {
            self.inventory.replace(OUTPUT_SLOT, result.clone())?;
        } else if output.is_same_item(&result) {
            self.inventory
                .replace(OUTPUT_SLOT, output.grow(result.count()))?;
        }

        if self.side == Side::Authoritative {
            self.recipes_used.record_use(Some(rule.id()));
        }

        self.inventory.replace(INPUT_SLOT, input.shrink(1))?;
        self.mark_dirty();
        debug!(
            "forge at {:?} fired {} -> {} x{}",
            self.pos,
            rule.id(),
            result.id().map(ToString::to_string).unwrap_or_default(),
            result.count()
        );
        Ok(true)
    }

    /// Advance cooking by one tick. Returns whether an item was forged.
    pub fn tick(&mut self, book: &RecipeBook) -> Result<bool, ForgeError> {
        if self.side == Side::Mirror {
            return Ok(false);
        }
        let input = self.inventory_slot(INPUT_SLOT);
        let recipe = book
            .find(&input)
            .filter(|r| self.can_transform(Some(*r)));

        let Some(recipe) = recipe else {
            self.cooking = None;
            if self.cook_time > 0 {
                self.cook_time = 0;
                self.mark_dirty();
            }
            return Ok(false);
        };

        if self.cooking.as_ref() != Some(&recipe.id) {
            // Progress loaded from save data carries no recipe; keep it.
            if self.cooking.is_some() {
                self.cook_time = 0;
            }
            self.cooking = Some(recipe.id.clone());
        }
        self.cook_time += 1;
        self.mark_dirty();
        if self.cook_time < recipe.cook_time {
            return Ok(false);
        }
        self.cook_time = 0;
        self.fire(Some(recipe))
    }

    fn inventory_slot(&self, index: usize) -> ItemStack {
        self.inventory.get(index).cloned().unwrap_or_default()
    }

    // -- persistence ---------------------------------------------------------

    /// Full state as a compound, for saving and for update packets alike.
    pub fn write(&self) -> NbtCompound {
        let mut c = NbtCompound::new();
        c.put_string("id", BLOCK_ENTITY_ID);
        c.put_int("x", self.pos.x);
        c.put_int("y", self.pos.y);
        c.put_int("z", self.pos.z);
        c.put("inv", self.inventory.to_nbt());
        c.put("RecipesUsed", self.recipes_used.to_nbt());
        c.put_int("CookTime", i32::try_from(self.cook_time).unwrap_or(i32::MAX));
        if let Some(name) = &self.custom_name {
            c.put_string("CustomName", name.clone());
        }
        c
    }

    /// Replace all state from a compound produced by [`GemForge::write`].
    ///
    /// Missing parts load as their empty defaults. The position is owned by
    /// the host and is not taken from the record.
    pub fn read(&mut self, c: &NbtCompound, items: &ItemRegistry) {
        if let Some(id) = c.get_str("id").filter(|id| *id != BLOCK_ENTITY_ID) {
            warn!("loading {id} data into a gem forge");
        }

        let empty = NbtCompound::new();
        self.inventory
            .load_nbt(c.get_compound("inv").unwrap_or(&empty), items);
        match c.get_compound("RecipesUsed") {
            Some(used) => self.recipes_used.load_nbt(used),
            None => self.recipes_used = RecipeLedger::new(),
        }
        self.cook_time = c.get_int("CookTime").unwrap_or(0).max(0) as u32;
        self.cooking = None;
        self.custom_name = c.get_str("CustomName").map(str::to_owned);
        self.mark_dirty();
    }

    pub fn update_record(&self) -> NbtCompound {
        self.write()
    }

    /// [`GemForge::update_record`] in network NBT, for block-entity update packets.
    pub fn update_packet(&self) -> Result<Vec<u8>, ForgeError> {
        let mut buf = Vec::new();
        write_nbt_network(&mut buf, &NbtRoot::new("", self.update_record()))?;
        Ok(buf)
    }

    /// Little-endian NBT save data.
    ///
    /// Fails if a custom name is longer than the format's 65535-byte strings.
    pub fn save_bytes(&self) -> Result<Vec<u8>, ForgeError> {
        let mut buf = Vec::new();
        write_nbt_le(&mut buf, &NbtRoot::new("", self.write()))?;
        Ok(buf)
    }

    pub fn load_bytes(&mut self, data: &[u8], items: &ItemRegistry) -> Result<(), ForgeError> {
        let root = read_nbt_le(&mut &data[..])?;
        self.read(&root.compound, items);
        Ok(())
    }
}
