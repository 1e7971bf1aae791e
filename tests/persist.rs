// tests/persist.rs
use astral_economy::engine::snapshot::to_ticks;
use astral_economy::systems::{GeneratorDef, UpgradeDef, UpgradeKind};
use astral_economy::{EconomyConfig, EconomyEngine, MemoryStore, SaveStore, Snapshot};
use chrono::{DateTime, TimeDelta, Utc};

fn config() -> EconomyConfig {
    EconomyConfig { starting_stardust: 1000.0, ..EconomyConfig::default() }
        .with_generator(GeneratorDef::new("STAR_1", 2.0, 10.0, 2.0))
        .with_generator(GeneratorDef::new("STAR_2", 8.0, 100.0, 2.0))
        .with_upgrade(UpgradeDef::new("UPG_GLOBAL", UpgradeKind::GlobalProduction, 100.0, 2.0, 0.5).max_level(2))
}

fn fresh() -> EconomyEngine {
    EconomyEngine::new(config()).unwrap()
}

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Engine with some progress: 3 x STAR_1, 1 x UPG_GLOBAL, 25 earned.
fn played() -> EconomyEngine {
    let mut e = fresh();
    e.buy_generator_levels("STAR_1", 3).unwrap();
    e.buy_upgrade_level("UPG_GLOBAL").unwrap();
    e.add_currency(25.0);
    e
}

/* ──────────────────────────────────────────────────────────────────────────
1) Round trip through the in-memory store
────────────────────────────────────────────────────────────────────────── */

#[test]
fn save_then_load_restores_state() {
    let mut a = played();
    let mut store = MemoryStore::new();
    let snap = a.save_at(&mut store, t0()).unwrap();
    assert_eq!(snap.last_save_ticks, Some(to_ticks(t0())));
    assert_eq!(a.last_save(), Some(t0()));

    let mut b = fresh();
    let report = b.load_at(&store, t0());
    assert!(report.restored);
    assert_eq!(report.offline_secs, 0.0);
    assert_eq!(report.offline_gain, 0.0);
    assert_eq!(b.stardust(), a.stardust());
    assert_eq!(b.total_stardust(), a.total_stardust());
    assert_eq!(b.generator("STAR_1").unwrap().level(), 3);
    assert_eq!(b.upgrade("UPG_GLOBAL").unwrap().level(), 1);
    assert_eq!(b.multipliers(), a.multipliers());
    assert_eq!(b.production_rate(), a.production_rate());
    assert_eq!(b.snapshot(), snap);
}

#[test]
fn load_credits_time_since_save() {
    let mut a = played();
    let mut store = MemoryStore::new();
    a.save_at(&mut store, t0()).unwrap();
    let rate = a.production_rate();
    let before = a.stardust();

    let mut b = fresh();
    let report = b.load_at(&store, t0() + TimeDelta::seconds(100));
    assert_eq!(report.offline_secs, 100.0);
    assert_eq!(report.offline_gain, rate * 100.0);
    assert_eq!(b.stardust(), before + rate * 100.0);
}

#[test]
fn clock_going_backwards_credits_nothing() {
    let mut a = played();
    let mut store = MemoryStore::new();
    a.save_at(&mut store, t0()).unwrap();

    let mut b = fresh();
    let report = b.load_at(&store, t0() - TimeDelta::seconds(3600));
    assert!(report.restored);
    assert_eq!(report.offline_gain, 0.0);
}

#[test]
fn empty_store_keeps_fresh_state() {
    let mut e = fresh();
    let report = e.load_at(&MemoryStore::new(), t0());
    assert!(!report.restored);
    assert_eq!(e.stardust(), 1000.0);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Reset
────────────────────────────────────────────────────────────────────────── */

#[test]
fn reset_wipes_progress_and_store() {
    let mut e = played();
    let mut store = MemoryStore::new();
    e.save_at(&mut store, t0()).unwrap();

    let production = e.reset_game(&mut store).unwrap();
    assert_eq!(production.per_second, 0.0);
    assert!(store.raw().is_none());
    assert_eq!(e.stardust(), 1000.0);
    assert_eq!(e.total_stardust(), 0.0);
    assert_eq!(e.last_save(), None);
    assert_eq!(e.generator("STAR_1").unwrap().level(), 0);
    assert_eq!(e.multipliers().global_production, 1.0);

    e.save_at(&mut store, t0()).unwrap();
    let mut b = played();
    let report = b.load_at(&store, t0());
    assert!(report.restored);
    assert_eq!(b.stardust(), 1000.0);
    assert_eq!(b.total_stardust(), 0.0);
    assert_eq!(b.generator("STAR_1").unwrap().level(), 0);
    assert_eq!(b.upgrade("UPG_GLOBAL").unwrap().level(), 0);
}

/* ──────────────────────────────────────────────────────────────────────────
3) Damaged saves: recover what can be read
────────────────────────────────────────────────────────────────────────── */

#[test]
fn unreadable_save_leaves_engine_untouched() {
    for raw in ["not json {", "[1, 2, 3]", "42"] {
        let mut store = MemoryStore::new();
        store.set_raw(raw);
        let mut e = played();
        let before = e.snapshot();
        let report = e.load_at(&store, t0());
        assert!(!report.restored, "{raw} should not restore");
        assert_eq!(e.snapshot(), before);
    }
}

#[test]
fn malformed_fields_default_individually() {
    let mut store = MemoryStore::new();
    store.set_raw(
        r#"{
            "stardust": "lots",
            "total_stardust": 50,
            "generators": { "STAR_1": 3, "STAR_2": -1, "GHOST": 9 },
            "upgrades": { "UPG_GLOBAL": "x" }
        }"#,
    );
    let mut e = played();
    let report = e.load_at(&store, t0());
    assert!(report.restored);
    assert_eq!(report.offline_gain, 0.0);
    assert_eq!(e.stardust(), 0.0);
    assert_eq!(e.total_stardust(), 50.0);
    assert_eq!(e.generator("STAR_1").unwrap().level(), 3);
    assert_eq!(e.generator("STAR_2").unwrap().level(), 0);
    assert_eq!(e.upgrade("UPG_GLOBAL").unwrap().level(), 0);
}

#[test]
fn numeric_strings_and_missing_keys() {
    let snap = Snapshot::decode(r#"{ "stardust": "12.5", "generators": { "STAR_1": "4" } }"#).unwrap();
    assert_eq!(snap.stardust, 12.5);
    assert_eq!(snap.total_stardust, 0.0);
    assert_eq!(snap.last_save_ticks, None);
    assert_eq!(snap.generators["STAR_1"], 4);
    assert!(snap.upgrades.is_empty());
}

#[test]
fn negative_and_non_finite_amounts_read_as_zero() {
    let snap = Snapshot::decode(r#"{ "stardust": -5, "total_stardust": "inf" }"#).unwrap();
    assert_eq!(snap.stardust, 0.0);
    assert_eq!(snap.total_stardust, 0.0);
}

#[test]
fn restored_upgrade_level_is_clamped_to_max() {
    let mut store = MemoryStore::new();
    store.set_raw(r#"{ "upgrades": { "UPG_GLOBAL": 99 } }"#);
    let mut e = fresh();
    e.load_at(&store, t0());
    assert_eq!(e.upgrade("UPG_GLOBAL").unwrap().level(), 2);
    assert_eq!(e.multipliers().global_production, 2.0);
}

#[test]
fn newer_version_still_loads() {
    let mut store = MemoryStore::new();
    store.set_raw(r#"{ "version": 99, "stardust": 7, "extra": true }"#);
    let mut e = fresh();
    let report = e.load_at(&store, t0());
    assert!(report.restored);
    assert_eq!(e.stardust(), 7.0);
}

/* ──────────────────────────────────────────────────────────────────────────
4) JSON file store
────────────────────────────────────────────────────────────────────────── */

#[cfg(feature = "store-file")]
#[test]
fn file_store_round_trip() {
    use astral_economy::engine::JsonFileStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("astral.json");
    let mut store = JsonFileStore::new(&path);
    assert!(store.read().unwrap().is_none());

    let mut a = played();
    let snap = a.save_at(&mut store, t0()).unwrap();
    assert!(path.exists());
    assert!(!dir.path().join("saves").join("astral.json.tmp").exists());
    assert_eq!(store.read().unwrap(), Some(snap));

    let mut b = fresh();
    let report = b.load_at(&store, t0() + TimeDelta::seconds(10));
    assert!(report.restored);
    assert_eq!(report.offline_gain, a.production_rate() * 10.0);

    b.reset_game(&mut store).unwrap();
    assert!(!path.exists());
    store.clear().unwrap();
}

#[cfg(feature = "store-file")]
#[test]
fn corrupt_file_is_an_error_for_the_store_only() {
    use astral_economy::engine::JsonFileStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("astral.json");
    std::fs::write(&path, "{{{").unwrap();
    let store = JsonFileStore::new(&path);
    assert!(store.read().is_err());

    let mut e = fresh();
    assert!(!e.load_at(&store, t0()).restored);
    assert_eq!(e.stardust(), 1000.0);
}
