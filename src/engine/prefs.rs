#![cfg(feature = "store-kv")]

//! Flat key/value layout for hosts that persist through a string-keyed
//! preferences API.
//!
//! | key                       | value                          |
//! |---------------------------|--------------------------------|
//! | `ASTRAL_STARDUST`         | balance, round-trip decimal    |
//! | `ASTRAL_TOTAL_STARDUST`   | lifetime earned                |
//! | `ASTRAL_LAST_SAVE_TIME`   | UTC tick count                 |
//! | `ASTRAL_GEN_{id}_LEVEL`   | generator level                |
//! | `ASTRAL_UPG_{id}_LEVEL`   | upgrade level                  |
//!
//! Absent keys read as zero; a value that fails to parse reads as its default
//! and does not affect any other key.

use std::collections::BTreeMap;

use tracing::warn;

use crate::engine::snapshot::{SNAPSHOT_VERSION, SaveStore, Snapshot};
use crate::error::StoreError;

pub const KEY_PREFIX: &str = "ASTRAL_";
pub const STARDUST_KEY: &str = "ASTRAL_STARDUST";
pub const TOTAL_STARDUST_KEY: &str = "ASTRAL_TOTAL_STARDUST";
pub const LAST_SAVE_KEY: &str = "ASTRAL_LAST_SAVE_TIME";

const GEN_PREFIX: &str = "ASTRAL_GEN_";
const UPG_PREFIX: &str = "ASTRAL_UPG_";
const LEVEL_SUFFIX: &str = "_LEVEL";

pub fn generator_key(id: &str) -> String {
    format!("{GEN_PREFIX}{id}{LEVEL_SUFFIX}")
}

pub fn upgrade_key(id: &str) -> String {
    format!("{UPG_PREFIX}{id}{LEVEL_SUFFIX}")
}

/// String-keyed store; entries outside the `ASTRAL_` namespace are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefsStore {
    entries: BTreeMap<String, String>,
}

impl PrefsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    fn amount(&self, key: &str) -> f64 {
        let Some(raw) = self.get(key) else { return 0.0 };
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => v,
            _ => {
                warn!(key, raw, "malformed amount in prefs, using 0");
                0.0
            }
        }
    }

    fn levels(&self, prefix: &str) -> BTreeMap<String, u32> {
        self.entries
            .iter()
            .filter_map(|(key, raw)| {
                let id = key.strip_prefix(prefix)?.strip_suffix(LEVEL_SUFFIX)?;
                let level = raw.trim().parse::<u32>().unwrap_or_else(|_| {
                    warn!(key = %key, raw = %raw, "malformed level in prefs, using 0");
                    0
                });
                Some((id.to_owned(), level))
            })
            .collect()
    }
}

impl SaveStore for PrefsStore {
    fn write(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut batch = BTreeMap::new();
        batch.insert(STARDUST_KEY.to_owned(), snapshot.stardust.to_string());
        batch.insert(TOTAL_STARDUST_KEY.to_owned(), snapshot.total_stardust.to_string());
        if let Some(ticks) = snapshot.last_save_ticks {
            batch.insert(LAST_SAVE_KEY.to_owned(), ticks.to_string());
        }
        for (id, level) in &snapshot.generators {
            batch.insert(generator_key(id), level.to_string());
        }
        for (id, level) in &snapshot.upgrades {
            batch.insert(upgrade_key(id), level.to_string());
        }
        self.entries.extend(batch);
        Ok(())
    }

    fn read(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.entries.keys().any(|k| k.starts_with(KEY_PREFIX)) {
            return Ok(None);
        }
        let last_save_ticks = self.get(LAST_SAVE_KEY).and_then(|raw| {
            let parsed = raw.trim().parse::<i64>().ok();
            if parsed.is_none() {
                warn!(raw, "malformed save time in prefs, skipping offline gain");
            }
            parsed
        });
        Ok(Some(Snapshot {
            version: SNAPSHOT_VERSION,
            stardust: self.amount(STARDUST_KEY),
            total_stardust: self.amount(TOTAL_STARDUST_KEY),
            last_save_ticks,
            generators: self.levels(GEN_PREFIX),
            upgrades: self.levels(UPG_PREFIX),
        }))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.retain(|k, _| !k.starts_with(KEY_PREFIX));
        Ok(())
    }
}
