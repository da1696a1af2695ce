use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct SimConfig {
    pub logging: LoggingSection,
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
    #[serde(default)]
    pub worldgen: WorldgenSection,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct SimulationSection {
    /// Directory of forging recipe JSON files.
    #[serde(default = "default_recipes_directory")]
    pub recipes: String,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// Where to write the forge's save data after the run. None = don't.
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub input: Vec<SlotEntry>,
}

fn default_recipes_directory() -> String {
    "recipes".into()
}

fn default_ticks() -> u32 {
    200
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            recipes: default_recipes_directory(),
            ticks: default_ticks(),
            output: None,
            input: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemEntry {
    pub id: String,
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
}

fn default_max_stack_size() -> u32 {
    64
}

/// Initial contents for one forge slot.
#[derive(Debug, Deserialize)]
pub struct SlotEntry {
    pub slot: usize,
    pub item: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Default, Deserialize)]
pub struct WorldgenSection {
    /// Optional native gem ore feature config (JSON) to validate at startup.
    #[serde(default)]
    pub ore_feature: Option<String>,
}

impl SimConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
