use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use super::phase::GamePhase;
use crate::api::models::HeroConstants;

/// Hero id string -> accumulated record.
pub type HeroTable = BTreeMap<String, HeroRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryAttribute {
    #[serde(rename = "str")]
    Strength,
    #[serde(rename = "agi")]
    Agility,
    #[serde(rename = "int")]
    Intelligence,
}

impl PrimaryAttribute {
    /// Universal heroes ("all") have no single primary attribute.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Some(PrimaryAttribute::Strength),
            "agi" | "agility" => Some(PrimaryAttribute::Agility),
            "int" | "intelligence" => Some(PrimaryAttribute::Intelligence),
            _ => None,
        }
    }
}

impl fmt::Display for PrimaryAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PrimaryAttribute::Strength => "strength",
            PrimaryAttribute::Agility => "agility",
            PrimaryAttribute::Intelligence => "intelligence",
        };
        f.write_str(label)
    }
}

/// One participant of one match, as written by the fetch stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<i64>,
    #[serde(default)]
    pub hero_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_name: Option<String>,
    #[serde(default)]
    pub win: Option<bool>,
    #[serde(default)]
    pub kills: Option<u32>,
    #[serde(default)]
    pub deaths: Option<u32>,
    #[serde(default)]
    pub assists: Option<u32>,
    #[serde(default)]
    pub gold_per_min: Option<f64>,
    #[serde(default)]
    pub xp_per_min: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>, // seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_attr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub str_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agi_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_gain: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroRecord {
    pub name: String,
    #[serde(default)]
    pub primary_attr: Option<PrimaryAttribute>,
    pub picks: u32,
    pub wins: u32,
    pub total_kills: u64,
    pub total_deaths: u64,
    pub total_assists: u64,
    pub total_gpm: f64,
    pub total_duration: f64,
    pub total_xpm: f64,
    pub str_gain: f64,
    pub agi_gain: f64,
    pub int_gain: f64,

    // Filled by later stages
    #[serde(default)]
    pub avg_kills: f64,
    #[serde(default)]
    pub avg_deaths: f64,
    #[serde(default)]
    pub avg_assists: f64,
    #[serde(default)]
    pub avg_gpm: f64,
    #[serde(default)]
    pub kda_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_phase: Option<GamePhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_rating: Option<u8>,
}

impl HeroRecord {
    pub fn new(name: String) -> Self {
        HeroRecord {
            name,
            ..Default::default()
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.picks == 0 {
            0.0
        } else {
            self.wins as f64 / self.picks as f64 * 100.0
        }
    }

    /// Gain of the declared primary attribute, zero when unknown.
    pub fn primary_gain(&self) -> f64 {
        match self.primary_attr {
            Some(PrimaryAttribute::Strength) => self.str_gain,
            Some(PrimaryAttribute::Agility) => self.agi_gain,
            Some(PrimaryAttribute::Intelligence) => self.int_gain,
            None => 0.0,
        }
    }

    pub fn avg_duration_minutes(&self) -> f64 {
        if self.picks == 0 {
            0.0
        } else {
            self.total_duration / self.picks as f64 / 60.0
        }
    }
}

pub struct HeroStatsAggregator {
    records: HeroTable,
    missing_fields: usize,
    skipped_entries: usize,
}

impl HeroStatsAggregator {
    pub fn new() -> Self {
        HeroStatsAggregator {
            records: HeroTable::new(),
            missing_fields: 0,
            skipped_entries: 0,
        }
    }

    /// Seeds every hero of the static table with all-zero totals.
    pub fn with_constants(constants: &HeroConstants) -> Self {
        let mut aggregator = Self::new();
        for (id, hero) in constants {
            let mut record = HeroRecord::new(hero.display_name().to_string());
            record.primary_attr = PrimaryAttribute::parse(&hero.primary_attr);
            record.str_gain = hero.str_gain.unwrap_or(0.0);
            record.agi_gain = hero.agi_gain.unwrap_or(0.0);
            record.int_gain = hero.int_gain.unwrap_or(0.0);
            aggregator.records.insert(id.clone(), record);
        }
        aggregator
    }

    pub fn add_entry(&mut self, entry: &MatchEntry) {
        let Some(hero_id) = entry.hero_id else {
            warn!(match_id = ?entry.match_id, "entry has no hero_id, skipping");
            self.skipped_entries += 1;
            return;
        };
        let key = hero_id.to_string();

        let mut missing = Vec::new();
        let kills = value_or_zero(entry.kills, "kills", &mut missing);
        let deaths = value_or_zero(entry.deaths, "deaths", &mut missing);
        let assists = value_or_zero(entry.assists, "assists", &mut missing);
        let gpm = value_or_zero(entry.gold_per_min, "gold_per_min", &mut missing);
        let xpm = value_or_zero(entry.xp_per_min, "xp_per_min", &mut missing);
        let duration = value_or_zero(entry.duration, "duration", &mut missing);
        let won = value_or_zero(entry.win, "win", &mut missing);

        if !missing.is_empty() {
            warn!(
                hero_id = %key,
                match_id = ?entry.match_id,
                fields = %missing.join(", "),
                "missing fields treated as zero"
            );
            self.missing_fields += missing.len();
        }

        let record = self.records.entry(key).or_insert_with(|| {
            HeroRecord::new(
                entry
                    .hero_name
                    .clone()
                    .unwrap_or_else(|| format!("Hero {}", hero_id)),
            )
        });

        if record.name.is_empty() {
            if let Some(name) = &entry.hero_name {
                record.name = name.clone();
            }
        }
        if let Some(attr) = entry.primary_attr.as_deref().and_then(PrimaryAttribute::parse) {
            record.primary_attr = Some(attr);
        }
        if let Some(gain) = entry.str_gain {
            record.str_gain = gain;
        }
        if let Some(gain) = entry.agi_gain {
            record.agi_gain = gain;
        }
        if let Some(gain) = entry.int_gain {
            record.int_gain = gain;
        }

        record.picks += 1;
        if won {
            record.wins += 1;
        }
        record.total_kills += kills as u64;
        record.total_deaths += deaths as u64;
        record.total_assists += assists as u64;
        record.total_gpm += gpm;
        record.total_xpm += xpm;
        record.total_duration += duration;
    }

    /// Number of numeric fields substituted with zero so far.
    pub fn missing_fields(&self) -> usize {
        self.missing_fields
    }

    pub fn skipped_entries(&self) -> usize {
        self.skipped_entries
    }

    pub fn into_records(self) -> HeroTable {
        debug!(
            heroes = self.records.len(),
            missing_fields = self.missing_fields,
            skipped = self.skipped_entries,
            "aggregation finished"
        );
        self.records
    }
}

impl Default for HeroStatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn value_or_zero<T: Default>(
    value: Option<T>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> T {
    match value {
        Some(v) => v,
        None => {
            missing.push(field);
            T::default()
        }
    }
}

/// Builds per-hero totals from raw participant entries.
pub fn aggregate(entries: &[MatchEntry], constants: &HeroConstants) -> HeroTable {
    let mut aggregator = HeroStatsAggregator::with_constants(constants);
    for entry in entries {
        aggregator.add_entry(entry);
    }
    aggregator.into_records()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::HeroConstant;

    fn entry(
        hero_id: u32,
        win: bool,
        k: u32,
        d: u32,
        a: u32,
        gpm: f64,
        duration: f64,
    ) -> MatchEntry {
        MatchEntry {
            hero_id: Some(hero_id),
            win: Some(win),
            kills: Some(k),
            deaths: Some(d),
            assists: Some(a),
            gold_per_min: Some(gpm),
            xp_per_min: Some(500.0),
            duration: Some(duration),
            ..Default::default()
        }
    }

    #[test]
    fn sums_totals_per_hero() {
        let entries = vec![
            entry(1, true, 10, 2, 5, 600.0, 1800.0),
            entry(1, false, 4, 6, 3, 500.0, 2200.0),
            entry(2, true, 1, 1, 1, 300.0, 2000.0),
        ];
        let table = aggregate(&entries, &HeroConstants::new());

        let hero = &table["1"];
        assert_eq!(hero.picks, 2);
        assert_eq!(hero.wins, 1);
        assert_eq!(hero.total_kills, 14);
        assert_eq!(hero.total_deaths, 8);
        assert_eq!(hero.total_assists, 8);
        assert_eq!(hero.total_gpm, 1100.0);
        assert_eq!(hero.total_duration, 4000.0);
        assert_eq!(hero.total_xpm, 1000.0);
        assert_eq!(table["2"].picks, 1);
    }

    #[test]
    fn constants_seed_unpicked_heroes() {
        let mut constants = HeroConstants::new();
        constants.insert(
            "5".to_string(),
            HeroConstant {
                id: 5,
                name: "npc_dota_hero_crystal_maiden".to_string(),
                localized_name: "Crystal Maiden".to_string(),
                primary_attr: "int".to_string(),
                str_gain: Some(2.2),
                agi_gain: Some(1.6),
                int_gain: Some(3.3),
            },
        );
        let table = aggregate(&[], &constants);

        let hero = &table["5"];
        assert_eq!(hero.name, "Crystal Maiden");
        assert_eq!(hero.picks, 0);
        assert_eq!(hero.primary_attr, Some(PrimaryAttribute::Intelligence));
        assert_eq!(hero.primary_gain(), 3.3);
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let mut aggregator = HeroStatsAggregator::new();
        aggregator.add_entry(&MatchEntry {
            hero_id: Some(7),
            win: Some(true),
            kills: Some(3),
            ..Default::default()
        });
        assert_eq!(aggregator.missing_fields(), 5);

        let table = aggregator.into_records();
        let hero = &table["7"];
        assert_eq!(hero.picks, 1);
        assert_eq!(hero.wins, 1);
        assert_eq!(hero.total_kills, 3);
        assert_eq!(hero.total_deaths, 0);
        assert_eq!(hero.total_gpm, 0.0);
    }

    #[test]
    fn missing_win_counts_as_loss() {
        let mut e = entry(3, true, 1, 1, 1, 100.0, 100.0);
        e.win = None;
        let table = aggregate(&[e], &HeroConstants::new());
        assert_eq!(table["3"].picks, 1);
        assert_eq!(table["3"].wins, 0);
    }

    #[test]
    fn entry_without_hero_is_skipped() {
        let mut aggregator = HeroStatsAggregator::new();
        aggregator.add_entry(&MatchEntry::default());
        assert_eq!(aggregator.skipped_entries(), 1);
        assert!(aggregator.into_records().is_empty());
    }

    #[test]
    fn universal_attribute_is_unknown() {
        assert_eq!(PrimaryAttribute::parse("all"), None);
        assert_eq!(PrimaryAttribute::parse("STR"), Some(PrimaryAttribute::Strength));
        assert_eq!(PrimaryAttribute::parse("agility"), Some(PrimaryAttribute::Agility));
    }

    #[test]
    fn wins_never_exceed_picks() {
        let entries: Vec<_> = (0..10).map(|i| entry(9, i % 3 == 0, 1, 1, 1, 1.0, 1.0)).collect();
        let table = aggregate(&entries, &HeroConstants::new());
        assert!(table["9"].wins <= table["9"].picks);
        assert_eq!(table["9"].wins, 4);
    }
}
