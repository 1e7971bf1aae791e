// demos/offline.rs
// Run with:
//   cargo run --example offline
//
// Saves to a JSON file, then loads it "two hours later" to show offline
// reconciliation.

use astral_economy::engine::JsonFileStore;
use astral_economy::systems::{GeneratorDef, UpgradeDef, UpgradeKind};
use astral_economy::{EconomyConfig, EconomyEngine, format_amount};
use chrono::{TimeDelta, Utc};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EconomyConfig { starting_stardust: 5_000.0, ..EconomyConfig::default() }
        .with_generator(GeneratorDef::new("STAR_1", 1.0, 10.0, 1.15).named("Nascent Star"))
        .with_generator(GeneratorDef::new("STAR_2", 8.0, 120.0, 1.17).named("Red Giant"))
        .with_upgrade(
            UpgradeDef::new("UPG_OFFLINE_1", UpgradeKind::OfflineGain, 1_000.0, 2.5, 0.5)
                .named("Dark Matter Tap", "+50% offline gains per level")
                .max_level(4),
        );

    let dir = std::env::temp_dir().join("astral_economy_demo");
    let mut store = JsonFileStore::new(dir.join("save.json"));

    let mut engine = EconomyEngine::new(config.clone())?;
    engine.buy_upgrade_level("UPG_OFFLINE_1")?;
    engine.buy_generator_max_levels("STAR_2")?;
    engine.buy_generator_max_levels("STAR_1")?;

    let closed_at = Utc::now();
    engine.save_at(&mut store, closed_at)?;
    println!(
        "saved {}: stardust={} rate={}/s",
        store.path().display(),
        format_amount(engine.stardust()),
        format_amount(engine.production_rate())
    );

    let mut reopened = EconomyEngine::new(config)?;
    let report = reopened.load_at(&store, closed_at + TimeDelta::hours(2));
    println!(
        "loaded after {:.0}s: +{} offline, stardust={}",
        report.offline_secs,
        format_amount(report.offline_gain),
        format_amount(report.stardust)
    );

    reopened.reset_game(&mut store)?;
    println!("reset: stardust={} (save removed: {})", format_amount(reopened.stardust()), !store.path().exists());
    Ok(())
}
