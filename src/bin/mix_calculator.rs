// Mix calculator command-line entry point
//
// Usage: mix_calculator <inventory.json>
// The inventory file is a JSON object of ingredient key -> grams in stock.

use anyhow::{bail, Context, Result};
use bird_mix_calculator::{
    Inventory, JsonFormatter, KnowledgeBase, MixCalculator, RecipeCardFormatter, ScoringPolicy, Species,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

enum OutputFormat {
    Json,
    Card,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for the card / JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bird_mix_calculator=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let inventory_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => bail!("Usage: mix_calculator <inventory.json>"),
    };

    // Configuration from environment variables
    let species = std::env::var("MIX_SPECIES").unwrap_or_else(|_| Species::DEFAULT.id().to_string());
    let situation = std::env::var("MIX_SITUATION").ok();
    let target_weight: f64 = match std::env::var("MIX_TARGET_WEIGHT") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("MIX_TARGET_WEIGHT is not a number: {}", raw))?,
        Err(_) => 1000.0,
    };
    let format = match std::env::var("MIX_FORMAT").as_deref() {
        Ok("json") => OutputFormat::Json,
        Ok("card") | Err(_) => OutputFormat::Card,
        Ok(other) => bail!("Unknown MIX_FORMAT '{}' (expected json or card)", other),
    };
    let data_dir = std::env::var("MIX_DATA_DIR").ok();
    let policy_path = std::env::var("MIX_POLICY").ok();

    tracing::info!("Configuration:");
    tracing::info!("  MIX_SPECIES: {}", species);
    tracing::info!("  MIX_SITUATION: {}", situation.as_deref().unwrap_or("(first profile)"));
    tracing::info!("  MIX_TARGET_WEIGHT: {}", target_weight);

    let loaded;
    let kb: &KnowledgeBase = match &data_dir {
        Some(dir) => {
            tracing::info!("  MIX_DATA_DIR: {}", dir);
            loaded = KnowledgeBase::from_dir(Path::new(dir))?;
            &loaded
        }
        None => KnowledgeBase::shared()?,
    };

    let policy = match &policy_path {
        Some(path) => {
            tracing::info!("  MIX_POLICY: {}", path);
            ScoringPolicy::load(Path::new(path))?
        }
        None => ScoringPolicy::default(),
    };

    let inventory = load_inventory(&inventory_path)?;
    tracing::info!("Loaded {} inventory entries from {:?}", inventory.len(), inventory_path);

    let species = Species::resolve(&species);
    let situation = situation.unwrap_or_else(|| {
        kb.profiles_for(species)
            .first()
            .map(|p| p.situation.clone())
            .unwrap_or_default()
    });

    let calculator = MixCalculator::with_species(kb, inventory, &situation, species).with_policy(policy)?;
    let result = calculator.calculate(target_weight)?;

    let output = match format {
        OutputFormat::Json => JsonFormatter::format(&result)?,
        OutputFormat::Card => {
            let date = chrono::Local::now().format("%Y-%m-%d").to_string();
            RecipeCardFormatter::format_dated(&result, calculator.profile(), &date)
        }
    };
    println!("{}", output);

    Ok(())
}

fn load_inventory(path: &Path) -> Result<Inventory> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read inventory: {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid inventory file: {:?}", path))
}
