use clap::ValueEnum;
use std::cmp::Ordering;
use std::fmt;

use super::hero_stats::{HeroRecord, HeroTable};

/// Numeric hero columns that can be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankColumn {
    Picks,
    Wins,
    WinRate,
    AvgKills,
    AvgDeaths,
    AvgAssists,
    AvgGpm,
    KdaRatio,
    StrGain,
    AgiGain,
    IntGain,
    PrimaryGain,
    AvgDuration,
}

impl RankColumn {
    pub fn value(&self, record: &HeroRecord) -> f64 {
        match self {
            RankColumn::Picks => record.picks as f64,
            RankColumn::Wins => record.wins as f64,
            RankColumn::WinRate => record.win_rate(),
            RankColumn::AvgKills => record.avg_kills,
            RankColumn::AvgDeaths => record.avg_deaths,
            RankColumn::AvgAssists => record.avg_assists,
            RankColumn::AvgGpm => record.avg_gpm,
            RankColumn::KdaRatio => record.kda_ratio,
            RankColumn::StrGain => record.str_gain,
            RankColumn::AgiGain => record.agi_gain,
            RankColumn::IntGain => record.int_gain,
            RankColumn::PrimaryGain => record.primary_gain(),
            RankColumn::AvgDuration => record.avg_duration_minutes(),
        }
    }
}

impl fmt::Display for RankColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<K> {
    pub key: K,
    pub value: f64,
    pub rank: usize,
}

/// Descending rank where ties share the lowest eligible rank ("min" method):
/// 10, 10, 8 ranks as 1, 1, 3. NaN values are dropped. Ties keep input order.
pub fn rank_descending<K: Clone>(items: &[(K, f64)]) -> Vec<Ranked<K>> {
    let mut sorted: Vec<&(K, f64)> = items.iter().filter(|(_, v)| !v.is_nan()).collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut ranked: Vec<Ranked<K>> = Vec::with_capacity(sorted.len());
    for (idx, (key, value)) in sorted.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.value == *value => prev.rank,
            _ => idx + 1,
        };
        ranked.push(Ranked {
            key: key.clone(),
            value: *value,
            rank,
        });
    }
    ranked
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedHero {
    pub rank: usize,
    pub hero_id: String,
    pub name: String,
    pub value: f64,
    pub picks: u32,
}

pub struct HeroRanker;

impl HeroRanker {
    /// Ranks every hero of the table on `column`, keeping the first `top_n`.
    pub fn top_heroes(records: &HeroTable, column: RankColumn, top_n: usize) -> Vec<RankedHero> {
        let items: Vec<(&str, f64)> = records
            .iter()
            .map(|(id, record)| (id.as_str(), column.value(record)))
            .collect();

        let mut ranked: Vec<RankedHero> = rank_descending(&items)
            .into_iter()
            .filter_map(|entry| {
                let record = records.get(entry.key)?;
                Some(RankedHero {
                    rank: entry.rank,
                    hero_id: entry.key.to_string(),
                    name: record.name.clone(),
                    value: entry.value,
                    picks: record.picks,
                })
            })
            .collect();

        ranked.truncate(top_n);
        ranked
    }
}
