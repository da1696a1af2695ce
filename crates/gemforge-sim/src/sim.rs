//! Drives one gem forge the way the host would: place inputs, tick, save.

use gemforge_game::identifier::IdentifierError;
use gemforge_game::position::BlockPos;
use gemforge_game::{
    BlockEntityLookup, ForgeError, ForgeHandle, GemForge, Identifier, ItemRegistry, RecipeBook,
};
use tracing::{debug, warn};

use crate::config::{ItemEntry, SlotEntry};

/// The simulated world holds exactly one forge.
pub struct SimWorld {
    pub pos: BlockPos,
    pub handle: ForgeHandle,
}

impl BlockEntityLookup for SimWorld {
    fn block_entity_at(&self, pos: BlockPos) -> Option<ForgeHandle> {
        (pos == self.pos).then_some(self.handle)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub forged: u32,
    /// Ticks after which the host would have written save data.
    pub saves: u32,
}

pub fn build_registry(entries: &[ItemEntry]) -> Result<ItemRegistry, IdentifierError> {
    let mut items = ItemRegistry::new();
    for entry in entries {
        let id: Identifier = entry.id.parse()?;
        items.register(id, entry.max_stack_size);
    }
    Ok(items)
}

/// Fill slots through the raw handler, as a container menu would.
pub fn place_inputs(
    forge: &mut GemForge,
    slots: &[SlotEntry],
    items: &ItemRegistry,
) -> Result<(), ForgeError> {
    for entry in slots {
        let stack = entry
            .item
            .parse::<Identifier>()
            .ok()
            .and_then(|id| items.stack(&id, entry.count));
        match stack {
            Some(stack) => forge.inventory_mut().replace(entry.slot, stack)?,
            None => warn!("unknown item {} for slot {}", entry.item, entry.slot),
        }
    }
    Ok(())
}

pub fn run_ticks(forge: &mut GemForge, book: &RecipeBook, ticks: u32) -> Result<RunStats, ForgeError> {
    let mut stats = RunStats::default();
    for tick in 0..ticks {
        if forge.tick(book)? {
            stats.forged += 1;
            debug!("tick {tick}: forged item #{}", stats.forged);
        }
        if forge.take_dirty() {
            stats.saves += 1;
        }
    }
    Ok(stats)
}
