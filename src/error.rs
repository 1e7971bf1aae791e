//! Error types for the economy core.
//!
//! Nothing here is fatal: purchases report why they did not happen, and
//! persistence errors are recovered by [`EconomyEngine::load`](crate::engine::EconomyEngine::load).

/// Errors raised while loading or validating an [`EconomyConfig`](crate::config::EconomyConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("failed to parse config TOML: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },

    #[error("duplicate generator id: {0}")]
    DuplicateGenerator(String),

    #[error("duplicate upgrade id: {0}")]
    DuplicateUpgrade(String),

    /// A definition carries a value the model cannot work with.
    #[error("invalid definition {id}: {reason}")]
    Invalid { id: String, reason: String },
}

/// Why a purchase did not go through. State is untouched in every case.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PurchaseError {
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(String),

    #[error("insufficient stardust for {id}: cost {cost}, balance {balance}")]
    InsufficientFunds { id: String, cost: f64, balance: f64 },

    /// An upgrade at its `max_level`, or a generator at `u32::MAX`.
    #[error("{id} is already at max level {max_level}")]
    Maxed { id: String, max_level: u32 },
}

/// Errors from a [`SaveStore`](crate::engine::SaveStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to encode snapshot: {source}")]
    Encode {
        #[from]
        source: serde_json::Error,
    },

    /// The stored record could not be read as a snapshot at all.
    #[error("unreadable snapshot: {0}")]
    Corrupt(String),
}
