// tests/aggregate.rs
use astral_economy::systems::aggregate::production;
use astral_economy::systems::{
    Generator, GeneratorDef, Milestone, MilestonePolicy, MilestoneTiers, Multipliers, Upgrade, UpgradeDef, UpgradeKind,
};

fn bought(def: UpgradeDef, levels: u32) -> Upgrade {
    let mut u = Upgrade::new(def);
    for _ in 0..levels {
        assert!(u.try_buy(|_| true).is_some());
    }
    u
}

fn leveled(def: GeneratorDef, levels: u32) -> Generator {
    let mut g = Generator::new(def, MilestonePolicy::Compound);
    for _ in 0..levels {
        assert!(g.try_buy_level(1.0, |_| true).is_some());
    }
    g
}

fn upg(id: &str, kind: UpgradeKind, per_level: f64) -> UpgradeDef {
    UpgradeDef::new(id, kind, 1.0, 1.5, per_level)
}

/* ──────────────────────────────────────────────────────────────────────────
1) Multipliers from upgrades
────────────────────────────────────────────────────────────────────────── */

#[test]
fn no_upgrades_is_neutral() {
    let none: [Upgrade; 0] = [];
    let m = Multipliers::from_upgrades(&none, 0.01);
    assert_eq!(m, Multipliers::neutral());
}

#[test]
fn global_production_compounds_multiplicatively() {
    let ups = [
        bought(upg("A", UpgradeKind::GlobalProduction, 0.25), 1),
        bought(upg("B", UpgradeKind::GlobalProduction, 0.25), 1),
        bought(upg("C", UpgradeKind::GlobalProduction, 0.25), 1),
    ];
    let m = Multipliers::from_upgrades(&ups, 0.01);
    assert_eq!(m.global_production, 1.953125);
}

#[test]
fn unbought_upgrades_do_not_count() {
    let ups = [bought(upg("A", UpgradeKind::SingularityCore, 5.0), 0)];
    assert_eq!(Multipliers::from_upgrades(&ups, 0.01).singularity, 1.0);
}

#[test]
fn offline_and_singularity_are_independent_products() {
    let ups = [
        bought(upg("OFF", UpgradeKind::OfflineGain, 0.5), 2),
        bought(upg("SING", UpgradeKind::SingularityCore, 1.0), 1),
    ];
    let m = Multipliers::from_upgrades(&ups, 0.01);
    assert_eq!(m.offline_gain, 2.0);
    assert_eq!(m.singularity, 2.0);
    assert_eq!(m.global_production, 1.0);
}

#[test]
fn cost_reduction_composes_and_respects_floor() {
    let ups = [
        bought(upg("R1", UpgradeKind::GeneratorCostReduction, 0.5), 1),
        bought(upg("R2", UpgradeKind::GeneratorCostReduction, 0.5), 1),
    ];
    assert_eq!(Multipliers::from_upgrades(&ups, 0.01).cost_reduction, 0.25);
    assert_eq!(Multipliers::from_upgrades(&ups, 0.3).cost_reduction, 0.3);

    // An effect above 1 would make prices negative without the clamp.
    let ups = [bought(upg("R3", UpgradeKind::GeneratorCostReduction, 0.75), 2)];
    let m = Multipliers::from_upgrades(&ups, 0.0);
    assert_eq!(m.cost_reduction, 0.0);
    assert!(Multipliers::from_upgrades(&ups, 0.05).cost_reduction > 0.0);
}

#[test]
fn nan_cost_floor_counts_as_zero() {
    let ups = [bought(upg("R", UpgradeKind::GeneratorCostReduction, 0.75), 2)];
    assert_eq!(Multipliers::from_upgrades(&ups, f64::NAN).cost_reduction, 0.0);
    let none: [Upgrade; 0] = [];
    assert_eq!(Multipliers::from_upgrades(&none, f64::NAN).cost_reduction, 1.0);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Effective production
────────────────────────────────────────────────────────────────────────── */

#[test]
fn nothing_owned_produces_nothing() {
    let gens = [leveled(GeneratorDef::new("A", 1.0, 10.0, 1.15), 0)];
    let p = production(&gens, &Multipliers::neutral(), 0.0, 1.0);
    assert_eq!(p.per_second, 0.0);
    assert_eq!(p.unlocked_count, 1);
}

#[test]
fn synergy_counts_unlocked_generators() {
    let gens = [
        leveled(GeneratorDef::new("A", 1.0, 10.0, 1.15), 1),
        leveled(GeneratorDef::new("B", 5.0, 100.0, 1.15), 0),
        leveled(GeneratorDef::new("C", 9.0, 1e6, 1.15).unlock_at(1e6), 0),
    ];
    let ups = [bought(upg("SYN", UpgradeKind::GeneratorSynergy, 0.1), 1)];
    let m = Multipliers::from_upgrades(&ups, 0.01);

    let p = production(&gens, &m, 0.0, 1.0);
    assert_eq!(p.unlocked_count, 2);
    assert_eq!(p.synergy_factor, 1.0 + 0.1 * 2.0);
    assert_eq!(p.per_second, 1.0 * (1.0 + 0.1 * 2.0));

    let p = production(&gens, &m, 1e6, 1.0);
    assert_eq!(p.unlocked_count, 3);
}

#[test]
fn constellation_scales_by_strong_tier() {
    let def = GeneratorDef::new("A", 1.0, 1.0, 1.01).milestones(MilestoneTiers {
        strong: Milestone::new(10, 0.0),
        ..MilestoneTiers::none()
    });
    let gens = [leveled(def, 20)];
    assert_eq!(gens[0].upgrade_tier(), 2);

    let ups = [bought(upg("CON", UpgradeKind::ConstellationBoost, 0.5), 1)];
    let m = Multipliers::from_upgrades(&ups, 0.01);
    let p = production(&gens, &m, 0.0, 1.0);
    assert_eq!(p.sum_per_second, 40.0);
}

#[test]
fn transient_scales_final_rate() {
    let gens = [leveled(GeneratorDef::new("A", 2.0, 10.0, 1.15), 1)];
    let m = Multipliers::neutral();
    assert_eq!(production(&gens, &m, 0.0, 3.0).per_second, 6.0);
    assert_eq!(production(&gens, &m, 0.0, -1.0).per_second, 0.0);
    assert_eq!(production(&gens, &m, 0.0, f64::NAN).per_second, 2.0);
}
