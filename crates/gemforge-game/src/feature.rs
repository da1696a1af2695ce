//! World-generation config for native nether gem ores.
//!
//! The host's ore feature places `state` wherever `target` matches the block
//! being replaced. Only the config and its codec live here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

/// A block plus its property values, in the vanilla codec layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    #[serde(rename = "Name")]
    pub name: Identifier,
    #[serde(rename = "Properties", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn of(name: Identifier) -> Self {
        Self {
            name,
            properties: BTreeMap::new(),
        }
    }
}

/// Predicate over the block an ore would replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "predicate_type")]
pub enum RuleTest {
    #[serde(rename = "minecraft:block_match")]
    BlockMatch { block: Identifier },
    #[serde(rename = "minecraft:always_true")]
    AlwaysTrue,
}

impl RuleTest {
    /// Matches plain netherrack, the host rock for nether gem ores.
    pub fn netherrack() -> Self {
        RuleTest::BlockMatch {
            block: Identifier::new_unchecked("minecraft", "netherrack"),
        }
    }

    pub fn test(&self, state: &BlockState) -> bool {
        match self {
            RuleTest::BlockMatch { block } => &state.name == block,
            RuleTest::AlwaysTrue => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeGemOreConfig {
    pub target: RuleTest,
    pub state: BlockState,
}

impl NativeGemOreConfig {
    pub fn new(target: RuleTest, state: BlockState) -> Self {
        Self { target, state }
    }

    /// The state to place over `existing`, if the target rule accepts it.
    pub fn replacement_for(&self, existing: &BlockState) -> Option<&BlockState> {
        self.target.test(existing).then_some(&self.state)
    }

    pub fn parse_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
