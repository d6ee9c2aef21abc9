//! Career progress record
//!
//! One JSON document under a single storage key. Loading never fails: a
//! missing or malformed record yields the default, unknown theme ids are
//! dropped, and the default theme is always owned.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::floor_score;
use crate::platform::{Storage, StorageError};
use crate::sim::RunSummary;
use crate::theme::ThemeId;

/// Storage key for the progress record
pub const STORAGE_KEY: &str = "neonRunnerData";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    /// Finished runs
    pub runs: u32,
    /// Sum of floored final scores
    pub total_dist: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerData {
    /// Cross-run wallet
    pub currency: u32,
    pub high_score: f32,
    #[serde(deserialize_with = "known_themes")]
    pub inventory: BTreeSet<ThemeId>,
    #[serde(deserialize_with = "known_theme")]
    pub equipped_theme: ThemeId,
    pub stats: Stats,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            currency: 0,
            high_score: 0.0,
            inventory: BTreeSet::from([ThemeId::default()]),
            equipped_theme: ThemeId::default(),
            stats: Stats::default(),
        }
    }
}

fn known_themes<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeSet<ThemeId>, D::Error> {
    let raw = Vec::<String>::deserialize(de)?;
    Ok(raw.iter().filter_map(|s| ThemeId::from_str(s)).collect())
}

fn known_theme<'de, D: Deserializer<'de>>(de: D) -> Result<ThemeId, D::Error> {
    let raw = String::deserialize(de)?;
    Ok(ThemeId::from_str(&raw).unwrap_or_default())
}

impl PlayerData {
    /// Parse a stored record, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        let value = match serde_json::from_str::<serde_json::Value>(json) {
            Ok(value) if value.is_object() => value,
            Ok(_) => {
                log::warn!("Discarding progress record that is not a JSON object");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Discarding malformed progress record: {}", e);
                return Self::default();
            }
        };

        match serde_json::from_value::<PlayerData>(value) {
            Ok(mut data) => {
                data.sanitize();
                data
            }
            Err(e) => {
                log::warn!("Discarding malformed progress record: {}", e);
                Self::default()
            }
        }
    }

    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get(STORAGE_KEY) {
            Some(json) => {
                let data = Self::from_json(&json);
                log::info!(
                    "Loaded progress: {} currency, record {}, {} runs",
                    data.currency,
                    floor_score(data.high_score),
                    data.stats.runs
                );
                data
            }
            None => {
                log::info!("No progress record found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        storage.set(STORAGE_KEY, &json)
    }

    /// Repair invariants: default theme owned, equipped theme owned, record non-negative
    pub fn sanitize(&mut self) {
        self.inventory.insert(ThemeId::default());
        if !self.inventory.contains(&self.equipped_theme) {
            self.equipped_theme = ThemeId::default();
        }
        if !self.high_score.is_finite() || self.high_score < 0.0 {
            self.high_score = 0.0;
        }
    }

    pub fn owns(&self, theme: ThemeId) -> bool {
        self.inventory.contains(&theme)
    }

    /// Merge a finished run into the career record
    pub fn record_run(&mut self, score: f32, run_currency: u32) -> RunSummary {
        self.currency = self.currency.saturating_add(run_currency);
        self.stats.runs += 1;
        self.stats.total_dist += u64::from(floor_score(score));
        let new_record = score > self.high_score;
        if new_record {
            self.high_score = score;
        }
        RunSummary {
            score: floor_score(score),
            currency: run_currency,
            new_record,
        }
    }
}
