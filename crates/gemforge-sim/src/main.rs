mod config;
mod sim;

use std::path::Path;

use config::SimConfig;
use gemforge_game::feature::NativeGemOreConfig;
use gemforge_game::forge::{INPUT_SLOT, OUTPUT_SLOT};
use gemforge_game::position::{BlockPos, Vec3};
use gemforge_game::{ForgeHandle, GemForge, RecipeBook};
use sim::SimWorld;
use tracing::{error, info};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gemforge.toml".to_string());
    let config = match SimConfig::load(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    if let Err(e) = run(&config) {
        error!("simulation failed: {e}");
        std::process::exit(1);
    }
}

fn run(config: &SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("gemforge-sim v{} starting", env!("CARGO_PKG_VERSION"));

    let items = sim::build_registry(&config.items)?;
    let book = RecipeBook::load_dir(Path::new(&config.simulation.recipes), &items)?;
    info!(
        "{} items, {} forging recipes from {}",
        items.len(),
        book.len(),
        config.simulation.recipes
    );

    if let Some(feature_path) = &config.worldgen.ore_feature {
        let feature = NativeGemOreConfig::parse_json(&std::fs::read_to_string(feature_path)?)?;
        info!(
            "ore feature {feature_path}: places {} on {:?}",
            feature.state.name, feature.target
        );
    }

    let world = SimWorld {
        pos: BlockPos::new(0, 64, 0),
        handle: ForgeHandle(1),
    };
    let mut forge = GemForge::new(world.handle, world.pos);
    sim::place_inputs(&mut forge, &config.simulation.input, &items)?;

    let player = Vec3::new(0.5, 65.0, 3.0);
    info!(
        "player at {:?} can use forge: {}",
        player,
        forge.is_usable_by(&world, player)
    );

    let stats = sim::run_ticks(&mut forge, &book, config.simulation.ticks)?;
    let xp = forge
        .recipes_used()
        .experience(&book, &mut rand::thread_rng());
    info!(
        "{} ticks: forged {}, {} saves, {xp} xp owed",
        config.simulation.ticks, stats.forged, stats.saves
    );
    info!(
        "input {:?} x{}, output {:?} x{}",
        forge.get_item(INPUT_SLOT)?.id().map(ToString::to_string),
        forge.get_item(INPUT_SLOT)?.count(),
        forge.get_item(OUTPUT_SLOT)?.id().map(ToString::to_string),
        forge.get_item(OUTPUT_SLOT)?.count(),
    );
    for (recipe, count) in forge.recipes_used().entries() {
        info!("recipe {recipe} used {count} times");
    }

    if let Some(output) = &config.simulation.output {
        std::fs::write(output, forge.save_bytes()?)?;
        info!("saved forge state to {output}");
    }

    Ok(())
}
