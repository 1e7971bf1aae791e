/*!
`astral_economy`: the progression/economy core of an idle game.

What it does
- Turns generator levels and purchased global upgrades into one effective
  stardust-per-second rate.
- Prices purchases on monotonic geometric curves, with overflow clamped to a
  finite sentinel so affordability checks stay well-ordered.
- Executes single, bulk and max purchases atomically through one spend gate.
- Reconciles wall-clock time (including time the game was closed) into
  currency, and saves/loads a versioned snapshot.

How to use (call surface only)
- Describe the catalog in an [`EconomyConfig`] (TOML or builder).
- Build one [`EconomyEngine`] and pass it to whatever needs it.
- Call `load` once at startup, `tick(dt)` once per frame, the `buy_*`
  methods from UI actions, and `save` on exit.
- Register a [`Modifier`](systems::Modifier) for any transient bonus (e.g. a
  rhythm mini-game); the engine only reads its multiplier.

What it does NOT do
- No rendering, audio, input, or rhythm timing. You own those externally.
*/

pub mod config;
pub mod engine;
pub mod error;
pub mod mechanics;
pub mod systems;

pub use config::EconomyConfig;
pub use engine::{EconomyEngine, EconomyView, LoadReport, MemoryStore, Outcome, SaveStore, Snapshot, TickReport};
pub use error::{ConfigError, PurchaseError, StoreError};
pub use mechanics::format::format_amount;
