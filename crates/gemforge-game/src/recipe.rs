//! Forging recipes: one input kind in, one result stack out.
//!
//! Recipes are loaded from JSON files shaped like behavior-pack recipes:
//!
//! ```json
//! {
//!   "format_version": "1.16.0",
//!   "miningmaster:recipe_forging": {
//!     "description": { "identifier": "miningmaster:fire_ruby" },
//!     "input": { "item": "miningmaster:fire_ruby_ore" },
//!     "result": { "item": "miningmaster:fire_ruby", "count": 1 },
//!     "experience": 1.0,
//!     "cooking_time": 200
//!   }
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RecipeError;
use crate::identifier::Identifier;
use crate::item::{ItemRegistry, ItemStack};

/// Ticks a recipe takes when the file does not say.
pub const DEFAULT_COOK_TIME: u32 = 200;

/// Something that turns an input stack into a result stack.
pub trait TransformationRule {
    /// Key under which firings are recorded.
    fn id(&self) -> &Identifier;

    /// The result for `input`, or `None` if the rule does not match it.
    fn apply(&self, input: &ItemStack) -> Option<ItemStack>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForgeRecipe {
    pub id: Identifier,
    pub input: Identifier,
    pub result: ItemStack,
    pub experience: f32,
    pub cook_time: u32,
}

impl TransformationRule for ForgeRecipe {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn apply(&self, input: &ItemStack) -> Option<ItemStack> {
        input.is_item(&self.input).then(|| self.result.clone())
    }
}

impl ForgeRecipe {
    /// Parse a single recipe file, resolving items through `items`.
    pub fn parse_json(json: &str, items: &ItemRegistry) -> Result<Self, RecipeError> {
        let file: RecipeFile = serde_json::from_str(json)?;
        let def = file.forging.ok_or(RecipeError::NotAForgingRecipe)?;
        let id = def.description.identifier;

        let known = |item: &Identifier| {
            items.get(item).cloned().ok_or_else(|| RecipeError::UnknownItem {
                recipe: id.clone(),
                item: item.clone(),
            })
        };
        known(&def.input.item)?;
        let result = ItemStack::new(known(&def.result.item)?, def.result.count);

        Ok(ForgeRecipe {
            id: id.clone(),
            input: def.input.item,
            result,
            experience: def.experience,
            cook_time: def.cooking_time,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecipeFile {
    #[serde(rename = "miningmaster:recipe_forging")]
    forging: Option<ForgingDef>,
}

#[derive(Debug, Deserialize)]
struct ForgingDef {
    description: RecipeDescription,
    input: RecipeInput,
    result: RecipeResult,
    #[serde(default)]
    experience: f32,
    #[serde(default = "default_cooking_time")]
    cooking_time: u32,
}

#[derive(Debug, Deserialize)]
struct RecipeDescription {
    identifier: Identifier,
}

#[derive(Debug, Deserialize)]
struct RecipeInput {
    item: Identifier,
}

#[derive(Debug, Deserialize)]
struct RecipeResult {
    item: Identifier,
    #[serde(default = "default_count")]
    count: u32,
}

fn default_count() -> u32 {
    1
}

fn default_cooking_time() -> u32 {
    DEFAULT_COOK_TIME
}

/// All recipes a forge can use, in registration order.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<ForgeRecipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipe, replacing any recipe with the same id.
    pub fn insert(&mut self, recipe: ForgeRecipe) {
        match self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(existing) => *existing = recipe,
            None => self.recipes.push(recipe),
        }
    }

    /// First recipe whose input matches `input`.
    pub fn find(&self, input: &ItemStack) -> Option<&ForgeRecipe> {
        if input.is_empty() {
            return None;
        }
        self.recipes.iter().find(|r| r.apply(input).is_some())
    }

    pub fn get(&self, id: &Identifier) -> Option<&ForgeRecipe> {
        self.recipes.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Load every `*.json` in `dir`, in file-name order.
    ///
    /// Files that fail to parse are logged and skipped; only an unreadable
    /// directory is an error.
    pub fn load_dir(dir: &Path, items: &ItemRegistry) -> Result<Self, RecipeError> {
        let io_err = |source| RecipeError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut book = RecipeBook::new();
        for path in paths {
            let parsed = std::fs::read_to_string(&path)
                .map_err(|source| RecipeError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|json| ForgeRecipe::parse_json(&json, items));
            match parsed {
                Ok(recipe) => {
                    debug!("loaded recipe {} from {}", recipe.id, path.display());
                    book.insert(recipe);
                }
                Err(e) => warn!("skipping {}: {e}", path.display()),
            }
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRE_RUBY: &str = r#"{
        "format_version": "1.16.0",
        "miningmaster:recipe_forging": {
            "description": { "identifier": "miningmaster:fire_ruby" },
            "input": { "item": "miningmaster:fire_ruby_ore" },
            "result": { "item": "miningmaster:fire_ruby" },
            "experience": 1.0
        }
    }"#;

    fn items() -> ItemRegistry {
        let mut items = ItemRegistry::new();
        items.register("miningmaster:fire_ruby_ore".parse().unwrap(), 64);
        items.register("miningmaster:fire_ruby".parse().unwrap(), 64);
        items
    }

    #[test]
    fn parse_applies_defaults() {
        let r = ForgeRecipe::parse_json(FIRE_RUBY, &items()).unwrap();
        assert_eq!(r.id.to_string(), "miningmaster:fire_ruby");
        assert_eq!(r.result.count(), 1);
        assert_eq!(r.cook_time, DEFAULT_COOK_TIME);
        assert!((r.experience - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_rejects_unknown_result_item() {
        let json = FIRE_RUBY.replace("\"miningmaster:fire_ruby\" }", "\"miningmaster:nope\" }");
        assert!(matches!(
            ForgeRecipe::parse_json(&json, &items()),
            Err(RecipeError::UnknownItem { .. })
        ));
    }

    #[test]
    fn parse_rejects_other_recipe_kinds() {
        let json = r#"{ "format_version": "1.16.0", "minecraft:recipe_shapeless": {} }"#;
        assert!(matches!(
            ForgeRecipe::parse_json(json, &items()),
            Err(RecipeError::NotAForgingRecipe)
        ));
    }

    #[test]
    fn apply_matches_input_kind_only() {
        let items = items();
        let r = ForgeRecipe::parse_json(FIRE_RUBY, &items).unwrap();
        let ore = items
            .stack(&"miningmaster:fire_ruby_ore".parse().unwrap(), 5)
            .unwrap();
        let gem = items
            .stack(&"miningmaster:fire_ruby".parse().unwrap(), 1)
            .unwrap();
        assert_eq!(r.apply(&ore), Some(gem.clone()));
        assert_eq!(r.apply(&gem), None);
        assert_eq!(r.apply(&ItemStack::empty()), None);
    }

    #[test]
    fn book_find_and_replace() {
        let items = items();
        let mut book = RecipeBook::new();
        let mut r = ForgeRecipe::parse_json(FIRE_RUBY, &items).unwrap();
        book.insert(r.clone());
        r.experience = 2.0;
        book.insert(r.clone());
        assert_eq!(book.len(), 1);
        assert!((book.get(&r.id).unwrap().experience - 2.0).abs() < f32::EPSILON);

        let ore = items
            .stack(&"miningmaster:fire_ruby_ore".parse().unwrap(), 1)
            .unwrap();
        assert_eq!(book.find(&ore).map(|r| &r.id), Some(&r.id));
        assert!(book.find(&ItemStack::empty()).is_none());
    }

    #[test]
    fn load_dir_skips_bad_files() {
        let dir = std::env::temp_dir().join(format!("gemforge-recipes-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("fire_ruby.json"), FIRE_RUBY).unwrap();
        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let book = RecipeBook::load_dir(&dir, &items()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(book.len(), 1);
        assert!(book
            .get(&"miningmaster:fire_ruby".parse().unwrap())
            .is_some());
    }

    #[test]
    fn load_dir_missing_directory_is_error() {
        let missing = std::env::temp_dir().join("gemforge-definitely-missing-dir");
        assert!(matches!(
            RecipeBook::load_dir(&missing, &items()),
            Err(RecipeError::Io { .. })
        ));
    }
}
