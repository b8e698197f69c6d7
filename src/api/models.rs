use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analysis::hero_stats::MatchEntry;

// OpenDota /constants/heroes response, keyed by hero id string
pub type HeroConstants = HashMap<String, HeroConstant>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroConstant {
    pub id: u32,
    #[serde(default)]
    pub name: String, // npc_dota_hero_*
    #[serde(default)]
    pub localized_name: String,
    #[serde(default)]
    pub primary_attr: String, // str, agi, int, all
    #[serde(default)]
    pub str_gain: Option<f64>,
    #[serde(default)]
    pub agi_gain: Option<f64>,
    #[serde(default)]
    pub int_gain: Option<f64>,
}

impl HeroConstant {
    pub fn display_name(&self) -> &str {
        if self.localized_name.is_empty() {
            &self.name
        } else {
            &self.localized_name
        }
    }
}

// OpenDota /proMatches response
#[derive(Debug, Clone, Deserialize)]
pub struct ProMatch {
    pub match_id: i64,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub leagueid: Option<i64>,
    #[serde(default)]
    pub league_name: Option<String>,
    #[serde(default)]
    pub radiant_name: Option<String>,
    #[serde(default)]
    pub dire_name: Option<String>,
    #[serde(default)]
    pub radiant_win: Option<bool>,
}

// OpenDota /matches/{id} response
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDetail {
    pub match_id: i64,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub radiant_win: Option<bool>,
    #[serde(default)]
    pub players: Vec<MatchPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchPlayer {
    #[serde(default)]
    pub hero_id: Option<u32>,
    #[serde(default)]
    pub player_slot: Option<u16>,
    #[serde(default)]
    pub win: Option<u8>,
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
}

impl MatchPlayer {
    pub fn is_radiant(&self) -> Option<bool> {
        self.player_slot.map(|slot| slot < 128)
    }
}

impl MatchDetail {
    /// One entry per player, joined with the static hero table.
    pub fn to_entries(&self, constants: &HeroConstants) -> Vec<MatchEntry> {
        self.players
            .iter()
            .map(|player| {
                let hero = player
                    .hero_id
                    .and_then(|id| constants.get(&id.to_string()));

                let win = match player.win {
                    Some(flag) => Some(flag != 0),
                    None => match (player.is_radiant(), self.radiant_win) {
                        (Some(radiant), Some(radiant_win)) => Some(radiant == radiant_win),
                        _ => None,
                    },
                };

                MatchEntry {
                    match_id: Some(self.match_id),
                    hero_id: player.hero_id,
                    hero_name: hero.map(|h| h.display_name().to_string()),
                    win,
                    kills: player.kills,
                    deaths: player.deaths,
                    assists: player.assists,
                    gold_per_min: player.gold_per_min,
                    xp_per_min: player.xp_per_min,
                    duration: self.duration.map(|d| d as f64),
                    primary_attr: hero.map(|h| h.primary_attr.clone()),
                    str_gain: hero.and_then(|h| h.str_gain),
                    agi_gain: hero.and_then(|h| h.agi_gain),
                    int_gain: hero.and_then(|h| h.int_gain),
                }
            })
            .collect()
    }
}

// PandaScore /dota2/matches/running response item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveMatch {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub league_id: Option<i64>,
    #[serde(default)]
    pub league: Option<LiveLeague>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveLeague {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl LiveMatch {
    pub fn league_id(&self) -> Option<i64> {
        self.league_id.or_else(|| self.league.as_ref().map(|l| l.id))
    }
}
