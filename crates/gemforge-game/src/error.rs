//! Error types for the forge device and recipe loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::identifier::Identifier;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("slot {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("NBT: {0}")]
    Nbt(#[from] gemforge_nbt::NbtError),
}

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("invalid recipe JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("recipe file has no miningmaster:recipe_forging section")]
    NotAForgingRecipe,

    #[error("recipe {recipe} references unknown item {item}")]
    UnknownItem { recipe: Identifier, item: Identifier },
}
