//! Per-device record of how many times each recipe has fired.

use std::collections::HashMap;

use gemforge_nbt::NbtCompound;
use rand::Rng;
use tracing::warn;

use crate::identifier::Identifier;
use crate::recipe::RecipeBook;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeLedger {
    used: HashMap<Identifier, u32>,
}

impl RecipeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one firing of `recipe`. `None` is ignored.
    pub fn record_use(&mut self, recipe: Option<&Identifier>) {
        if let Some(id) = recipe {
            *self.used.entry(id.clone()).or_insert(0) += 1;
        }
    }

    pub fn count(&self, recipe: &Identifier) -> u32 {
        self.used.get(recipe).copied().unwrap_or(0)
    }

    /// All entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&Identifier, u32)> {
        self.used.iter().map(|(id, count)| (id, *count))
    }

    /// Replace the whole ledger.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = (Identifier, u32)>) {
        self.used = entries.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Save form: `{ "<recipe id>": Int }`.
    pub fn to_nbt(&self) -> NbtCompound {
        let mut c = NbtCompound::new();
        for (id, count) in &self.used {
            c.put_int(id.to_string(), i32::try_from(*count).unwrap_or(i32::MAX));
        }
        c
    }

    pub fn load_nbt(&mut self, c: &NbtCompound) {
        let entries = c.iter().filter_map(|(key, tag)| {
            let id = match key.parse::<Identifier>() {
                Ok(id) => id,
                Err(e) => {
                    warn!("skipping recipe usage for {key:?}: {e}");
                    return None;
                }
            };
            let Some(count) = tag.as_i32_lossy() else {
                warn!("skipping non-numeric recipe usage for {key:?}");
                return None;
            };
            Some((id, count.max(0) as u32))
        });
        self.used = entries.collect();
    }

    /// Experience owed for every recorded firing, for the host to award.
    ///
    /// A fractional total is rounded up with probability equal to the
    /// fraction. Recipes no longer in `book` contribute nothing.
    pub fn experience(&self, book: &RecipeBook, rng: &mut impl Rng) -> u32 {
        let total: f32 = self
            .used
            .iter()
            .filter_map(|(id, count)| book.get(id).map(|r| r.experience * *count as f32))
            .sum();
        let whole = total.floor();
        let fraction = total - whole;
        let mut xp = whole as u32;
        if fraction > 0.0 && rng.gen::<f32>() < fraction {
            xp += 1;
        }
        xp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, ItemStack};
    use crate::recipe::ForgeRecipe;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    #[test]
    fn record_use_counts_per_recipe() {
        let mut ledger = RecipeLedger::new();
        let ruby = id("miningmaster:fire_ruby");
        let sapphire = id("miningmaster:ice_sapphire");
        for _ in 0..3 {
            ledger.record_use(Some(&ruby));
        }
        ledger.record_use(Some(&sapphire));

        assert_eq!(ledger.count(&ruby), 3);
        assert_eq!(ledger.count(&sapphire), 1);
        assert_eq!(ledger.count(&id("miningmaster:other")), 0);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn record_none_is_noop() {
        let mut ledger = RecipeLedger::new();
        ledger.record_use(None);
        assert!(ledger.is_empty());
    }

    #[test]
    fn restore_overwrites() {
        let mut ledger = RecipeLedger::new();
        ledger.record_use(Some(&id("miningmaster:a")));
        ledger.restore([(id("miningmaster:b"), 4)]);
        assert_eq!(ledger.count(&id("miningmaster:a")), 0);
        assert_eq!(ledger.count(&id("miningmaster:b")), 4);
    }

    #[test]
    fn nbt_keys_are_identifier_strings() {
        let mut ledger = RecipeLedger::new();
        ledger.restore([(id("miningmaster:fire_ruby"), 7)]);
        let c = ledger.to_nbt();
        assert_eq!(c.get_int("miningmaster:fire_ruby"), Some(7));

        let mut loaded = RecipeLedger::new();
        loaded.record_use(Some(&id("miningmaster:stale")));
        loaded.load_nbt(&c);
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn bad_saved_keys_are_skipped() {
        let mut c = NbtCompound::new();
        c.put_int("Not A Key", 3);
        c.put_int("miningmaster:ok", 2);
        let mut ledger = RecipeLedger::new();
        ledger.load_nbt(&c);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.count(&id("miningmaster:ok")), 2);
    }

    #[test]
    fn non_numeric_saved_counts_are_skipped() {
        let mut c = NbtCompound::new();
        c.put_string("miningmaster:fire_ruby", "seven");
        c.put_byte("miningmaster:ok", 4);
        let mut ledger = RecipeLedger::new();
        ledger.load_nbt(&c);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.count(&id("miningmaster:fire_ruby")), 0);
        assert_eq!(ledger.count(&id("miningmaster:ok")), 4);
    }

    #[test]
    fn experience_sums_whole_part() {
        let gem = Item::new(id("miningmaster:fire_ruby"), 64);
        let mut book = RecipeBook::new();
        book.insert(ForgeRecipe {
            id: id("miningmaster:fire_ruby"),
            input: id("miningmaster:fire_ruby_ore"),
            result: ItemStack::new(gem, 1),
            experience: 1.0,
            cook_time: 200,
        });

        let mut ledger = RecipeLedger::new();
        ledger.restore([(id("miningmaster:fire_ruby"), 3), (id("miningmaster:gone"), 9)]);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(ledger.experience(&book, &mut rng), 3);
        // Experience reporting leaves the ledger intact.
        assert_eq!(ledger.count(&id("miningmaster:fire_ruby")), 3);
    }

    #[test]
    fn experience_fraction_rounds_either_way() {
        let gem = Item::new(id("miningmaster:fire_ruby"), 64);
        let mut book = RecipeBook::new();
        book.insert(ForgeRecipe {
            id: id("miningmaster:fire_ruby"),
            input: id("miningmaster:fire_ruby_ore"),
            result: ItemStack::new(gem, 1),
            experience: 0.5,
            cook_time: 200,
        });
        let mut ledger = RecipeLedger::new();
        ledger.restore([(id("miningmaster:fire_ruby"), 3)]);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let xp = ledger.experience(&book, &mut rng);
            assert!(xp == 1 || xp == 2, "got {xp}");
        }
    }
}
