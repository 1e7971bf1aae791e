// demos/idle.rs
// Run with:
//   RUST_LOG=astral_economy=debug cargo run --example idle

use astral_economy::systems::SharedMultiplier;
use astral_economy::{EconomyEngine, PurchaseError, format_amount};
use tracing_subscriber::EnvFilter;

// A small catalog; pick your own numbers.
const CATALOG: &str = r#"
starting_stardust = 10.0
milestone_policy = "compound"

[[generators]]
id = "STAR_1"
name = "Nascent Star"
base_production = 1.0
base_cost = 10.0
cost_growth = 1.15
milestones = { weak = { interval = 25, multiplier = 0.7 }, strong = { interval = 100, multiplier = 3.4 } }

[[generators]]
id = "STAR_2"
name = "Red Giant"
base_production = 8.0
base_cost = 120.0
cost_growth = 1.17
unlock_at = 100.0

[[upgrades]]
id = "UPG_GLOBAL_1"
name = "Stellar Winds"
description = "+25% production per level"
kind = "global_production"
base_cost = 250.0
cost_growth = 3.0
max_level = 5
per_level = 0.25

[[upgrades]]
id = "UPG_SYNERGY_1"
name = "Binary Orbits"
description = "+5% production per unlocked generator"
kind = "generator_synergy"
base_cost = 1000.0
cost_growth = 4.0
max_level = 3
per_level = 0.05
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut engine = match EconomyEngine::from_toml(CATALOG) {
        Ok(e) => e,
        Err(err) => {
            eprintln!("bad catalog: {err}");
            return;
        }
    };

    // Stand-in for the rhythm mini-game: a surge every 60 s.
    let rhythm = SharedMultiplier::new(1.0);
    engine.add_modifier(Box::new(rhythm.clone()));

    // Ten simulated minutes, one tick per second, buying greedily.
    for second in 0..600u32 {
        rhythm.set(if second % 60 < 10 { 2.0 } else { 1.0 });
        engine.tick(1.0);

        for id in ["UPG_GLOBAL_1", "UPG_SYNERGY_1"] {
            match engine.buy_upgrade_level(id) {
                Ok(_) | Err(PurchaseError::InsufficientFunds { .. } | PurchaseError::Maxed { .. }) => {}
                Err(err) => eprintln!("t={second}s: {err}"),
            }
        }
        for id in ["STAR_2", "STAR_1"] {
            if let Err(err) = engine.buy_generator_max_levels(id) {
                eprintln!("t={second}s: {err}");
            }
        }

        if second % 60 == 59 {
            let v = engine.view();
            println!(
                "t={:>3}s  stardust={:>8}  rate={:>8}/s  lifetime={:>8}",
                second + 1,
                format_amount(v.stardust),
                format_amount(v.production.per_second),
                format_amount(v.total_stardust)
            );
        }
    }

    println!("== Final state ==");
    let v = engine.view();
    for g in &v.generators {
        println!(
            "{:<14} lvl {:>4}  tier {}  next {:>8}  {}",
            g.name,
            g.level,
            g.upgrade_tier,
            format_amount(g.next_cost),
            if g.unlocked { "" } else { "(locked)" }
        );
    }
    for u in &v.upgrades {
        println!("{:<14} lvl {:>2}/{}  effect {:.2}  {}", u.name, u.level, u.max_level, u.effect, u.description);
    }
    println!("multipliers -> {:?}", v.multipliers);
}
