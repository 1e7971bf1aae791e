// tests/upgrade.rs
use astral_economy::systems::{Upgrade, UpgradeDef, UpgradeKind};

fn global(max_level: u32) -> UpgradeDef {
    UpgradeDef::new("UPG_GLOBAL", UpgradeKind::GlobalProduction, 100.0, 2.0, 0.25).max_level(max_level)
}

/* ──────────────────────────────────────────────────────────────────────────
1) Definition math
────────────────────────────────────────────────────────────────────────── */

#[test]
fn effect_is_linear_in_level() {
    let def = global(0);
    assert_eq!(def.current_effect(0), 0.0);
    assert_eq!(def.current_effect(4), 1.0);
}

#[test]
fn cost_is_geometric() {
    let def = global(0);
    assert_eq!(def.next_cost(0), 100.0);
    assert_eq!(def.next_cost(3), 800.0);
    assert!(def.next_cost(u32::MAX).is_finite());
}

#[test]
fn zero_max_level_is_unbounded() {
    assert!(!global(0).is_maxed(1_000_000));
    assert!(!global(3).is_maxed(2));
    assert!(global(3).is_maxed(3));
    assert_eq!(global(3).clamp_level(9), 3);
    assert_eq!(global(0).clamp_level(9), 9);
}

#[test]
fn unbounded_upgrade_stops_at_top_level() {
    assert!(global(0).is_maxed(u32::MAX));
    assert_eq!(global(0).level_cap(), u32::MAX);
    assert_eq!(global(3).level_cap(), 3);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Purchases on a single upgrade
────────────────────────────────────────────────────────────────────────── */

#[test]
fn try_buy_stops_at_max_level() {
    let mut u = Upgrade::new(global(2));
    assert_eq!(u.try_buy(|_| true), Some(100.0));
    assert_eq!(u.try_buy(|_| true), Some(200.0));
    assert!(u.is_maxed());

    let mut asked = false;
    assert_eq!(u.try_buy(|_| { asked = true; true }), None);
    assert!(!asked, "spend must not be called on a maxed upgrade");
    assert_eq!(u.level(), 2);
    assert_eq!(u.current_effect(), 0.5);
}

#[test]
fn refused_payment_leaves_level() {
    let mut u = Upgrade::new(global(0));
    assert_eq!(u.try_buy(|_| false), None);
    assert_eq!(u.level(), 0);
    assert_eq!(u.kind(), UpgradeKind::GlobalProduction);
}
