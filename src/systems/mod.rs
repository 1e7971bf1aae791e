pub mod aggregate;
pub mod generator;
pub mod sdk;
pub mod upgrade;

pub use aggregate::{Multipliers, Production};
pub use generator::{Generator, GeneratorDef, Milestone, MilestonePolicy, MilestoneTiers};
pub use sdk::{Fixed, Modifier, SharedMultiplier};
pub use upgrade::{Upgrade, UpgradeDef, UpgradeKind};
