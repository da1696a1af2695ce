//! Gem forge game logic: items, slot storage, forging recipes, the forge
//! block entity, and nether gem ore generation config.

pub mod error;
pub mod feature;
pub mod forge;
pub mod identifier;
pub mod inventory;
pub mod item;
pub mod ledger;
pub mod position;
pub mod recipe;

pub use error::{ForgeError, RecipeError};
pub use forge::{BlockEntityLookup, DisplayName, ForgeHandle, GemForge, Side};
pub use identifier::Identifier;
pub use item::{Item, ItemRegistry, ItemStack};
pub use recipe::{ForgeRecipe, RecipeBook, TransformationRule};
