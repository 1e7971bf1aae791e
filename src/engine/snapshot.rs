//! Versioned save record and the store protocol.
//!
//! A [`Snapshot`] is written as one record so a save is all-or-nothing.
//! Reading is lenient: a value that is missing or malformed falls back to its
//! default on its own, and only a record that is not an object at all is
//! reported as [`StoreError::Corrupt`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::StoreError;

pub const SNAPSHOT_VERSION: u32 = 1;

const TICKS_PER_SECOND: i64 = 10_000_000;
/// Ticks between 0001-01-01T00:00:00Z and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// UTC instant as a count of 100 ns ticks since 0001-01-01.
pub fn to_ticks(at: DateTime<Utc>) -> i64 {
    let sub = i64::from(at.timestamp_subsec_nanos() / 100);
    at.timestamp()
        .saturating_mul(TICKS_PER_SECOND)
        .saturating_add(UNIX_EPOCH_TICKS)
        .saturating_add(sub)
}

/// Inverse of [`to_ticks`]; `None` outside chrono's range.
pub fn from_ticks(ticks: i64) -> Option<DateTime<Utc>> {
    let rel = ticks.checked_sub(UNIX_EPOCH_TICKS)?;
    let secs = rel.div_euclid(TICKS_PER_SECOND);
    let nanos = u32::try_from(rel.rem_euclid(TICKS_PER_SECOND) * 100).ok()?;
    DateTime::from_timestamp(secs, nanos)
}

/// Seconds from `since` to `now`, never negative.
pub fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let ms = (now - since).num_milliseconds();
    (ms as f64 / 1000.0).max(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub version: u32,
    pub stardust: f64,
    pub total_stardust: f64,
    /// Save instant, see [`to_ticks`].
    pub last_save_ticks: Option<i64>,
    pub generators: BTreeMap<String, u32>,
    pub upgrades: BTreeMap<String, u32>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            stardust: 0.0,
            total_stardust: 0.0,
            last_save_ticks: None,
            generators: BTreeMap::new(),
            upgrades: BTreeMap::new(),
        }
    }
}

impl Snapshot {
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_save_ticks.and_then(from_ticks)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if `text` is not a JSON object.
    pub fn decode(text: &str) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(text).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Field-by-field recovery from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if `value` is not an object.
    pub fn from_value(value: &Value) -> Result<Self, StoreError> {
        let obj = value
            .as_object()
            .ok_or_else(|| StoreError::Corrupt("snapshot is not an object".to_owned()))?;

        let version = match obj.get("version") {
            None => SNAPSHOT_VERSION,
            Some(v) => parse_level(v).unwrap_or_else(|| {
                warn!(value = %v, "malformed snapshot version, assuming current");
                SNAPSHOT_VERSION
            }),
        };
        if version > SNAPSHOT_VERSION {
            warn!(version, supported = SNAPSHOT_VERSION, "snapshot written by a newer version");
        }

        Ok(Self {
            version,
            stardust: amount_field(obj, "stardust"),
            total_stardust: amount_field(obj, "total_stardust"),
            last_save_ticks: ticks_field(obj, "last_save_ticks"),
            generators: level_map(obj, "generators"),
            upgrades: level_map(obj, "upgrades"),
        })
    }
}

/// Finite, non-negative amount from a number or numeric string.
pub(crate) fn parse_amount(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

pub(crate) fn parse_level(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|l| u32::try_from(l).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn amount_field(obj: &Map<String, Value>, key: &str) -> f64 {
    match obj.get(key) {
        None | Some(Value::Null) => 0.0,
        Some(v) => parse_amount(v).unwrap_or_else(|| {
            warn!(key, value = %v, "malformed amount in snapshot, using 0");
            0.0
        }),
    }
}

fn ticks_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    let v = obj.get(key)?;
    let ticks = match v {
        Value::Null => return None,
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if ticks.is_none() {
        warn!(key, value = %v, "malformed save time in snapshot, skipping offline gain");
    }
    ticks
}

fn level_map(obj: &Map<String, Value>, key: &str) -> BTreeMap<String, u32> {
    let Some(v) = obj.get(key) else {
        return BTreeMap::new();
    };
    let Some(entries) = v.as_object() else {
        warn!(key, "level table is not an object, using empty");
        return BTreeMap::new();
    };
    entries
        .iter()
        .map(|(id, lvl)| {
            let level = parse_level(lvl).unwrap_or_else(|| {
                warn!(table = key, id = %id, value = %lvl, "malformed level in snapshot, using 0");
                0
            });
            (id.clone(), level)
        })
        .collect()
}

/// Backend that persists one [`Snapshot`].
pub trait SaveStore {
    /// Replace the stored record as a single batch.
    fn write(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;
    /// `Ok(None)` when nothing has been saved yet.
    fn read(&self) -> Result<Option<Snapshot>, StoreError>;
    /// Forget everything this store holds for the game.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-process store holding the encoded JSON text.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    text: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Overwrite the stored text verbatim (e.g. with a hand-edited save).
    pub fn set_raw(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

impl SaveStore for MemoryStore {
    fn write(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.text = Some(snapshot.encode()?);
        Ok(())
    }

    fn read(&self) -> Result<Option<Snapshot>, StoreError> {
        self.text.as_deref().map(Snapshot::decode).transpose()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.text = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_tick_count() {
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(to_ticks(epoch), UNIX_EPOCH_TICKS);
        assert_eq!(from_ticks(UNIX_EPOCH_TICKS), Some(epoch));
    }

    #[test]
    fn sub_second_precision_is_100ns() {
        let at = DateTime::from_timestamp(1_700_000_000, 123_456_700).unwrap();
        assert_eq!(from_ticks(to_ticks(at)), Some(at));
    }

    #[test]
    fn elapsed_never_negative() {
        let a = DateTime::from_timestamp(100, 0).unwrap();
        let b = DateTime::from_timestamp(40, 0).unwrap();
        assert_eq!(elapsed_secs(a, b), 0.0);
        assert_eq!(elapsed_secs(b, a), 60.0);
    }
}
