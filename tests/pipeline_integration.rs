use dota_hero_stats::analysis::hero_stats::{HeroTable, MatchEntry};
use dota_hero_stats::analysis::phase::{
    classify, quantile, Band, GamePhase, PhaseThresholds,
};
use dota_hero_stats::analysis::ranking::{rank_descending, HeroRanker, RankColumn};
use dota_hero_stats::analysis::ratings::{PhaseRatings, RatingTable};
use dota_hero_stats::api::models::{HeroConstant, HeroConstants};
use dota_hero_stats::export::{export_rows, ExportFormat, KnowledgeMetadata};
use dota_hero_stats::pipeline::run_pipeline;
use dota_hero_stats::store::{load_json, save_json};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn participant(
    hero_id: u32,
    win: bool,
    kda: (u32, u32, u32),
    gpm: f64,
    duration: f64,
) -> MatchEntry {
    MatchEntry {
        hero_id: Some(hero_id),
        win: Some(win),
        kills: Some(kda.0),
        deaths: Some(kda.1),
        assists: Some(kda.2),
        gold_per_min: Some(gpm),
        xp_per_min: Some(550.0),
        duration: Some(duration),
        ..Default::default()
    }
}

fn constants() -> HeroConstants {
    let mut constants = HeroConstants::new();
    for (id, name, attr, gains) in [
        (1, "Anti-Mage", "agi", (1.6, 2.8, 1.8)),
        (2, "Axe", "str", (2.8, 1.7, 1.6)),
        (5, "Crystal Maiden", "int", (2.2, 1.6, 3.3)),
    ] {
        constants.insert(
            id.to_string(),
            HeroConstant {
                id,
                name: format!("npc_dota_hero_{}", id),
                localized_name: name.to_string(),
                primary_attr: attr.to_string(),
                str_gain: Some(gains.0),
                agi_gain: Some(gains.1),
                int_gain: Some(gains.2),
            },
        );
    }
    constants
}

#[test]
fn two_matches_for_one_hero() {
    let entries = vec![
        participant(1, true, (10, 2, 5), 600.0, 1800.0),
        participant(1, false, (4, 6, 3), 500.0, 2200.0),
    ];
    let output = run_pipeline(&entries, &constants(), &RatingTable::new(), false);

    let hero = &output.records["1"];
    assert_eq!(hero.picks, 2);
    assert_eq!(hero.wins, 1);
    assert_eq!(hero.avg_kills, 7.0);
    assert_eq!(hero.avg_deaths, 4.0);
    assert_eq!(hero.avg_assists, 4.0);
    assert_eq!(hero.avg_gpm, 550.0);
    assert_eq!(hero.kda_ratio, 2.75);

    assert_eq!(output.rows.len(), 1);
    assert_eq!(output.rows[0].name, "Anti-Mage");
    assert_eq!(output.rows[0].win_rate, 50.0);
}

#[test]
fn unpicked_heroes_are_zero_and_not_applicable() {
    let entries = vec![participant(1, true, (3, 3, 3), 450.0, 2000.0)];
    let output = run_pipeline(&entries, &constants(), &RatingTable::new(), false);

    for id in ["2", "5"] {
        let hero = &output.records[id];
        assert_eq!(hero.picks, 0);
        assert_eq!(hero.avg_kills, 0.0);
        assert_eq!(hero.avg_deaths, 0.0);
        assert_eq!(hero.avg_assists, 0.0);
        assert_eq!(hero.avg_gpm, 0.0);
        assert_eq!(hero.kda_ratio, 0.0);
        assert_eq!(hero.game_phase, Some(GamePhase::NotApplicable));
    }
    assert!(output.rows.iter().all(|r| r.picks > 0));
}

#[test]
fn picked_hero_invariants_hold() {
    let entries = vec![
        participant(1, true, (12, 0, 4), 700.0, 2500.0),
        participant(2, false, (1, 9, 14), 320.0, 1900.0),
        participant(2, true, (2, 5, 20), 350.0, 2600.0),
        participant(5, false, (0, 7, 11), 250.0, 3100.0),
    ];
    let output = run_pipeline(&entries, &constants(), &RatingTable::new(), false);

    for hero in output.records.values().filter(|h| h.picks > 0) {
        assert!(hero.wins <= hero.picks);
        let picks = hero.picks as f64;
        assert!((hero.avg_kills - hero.total_kills as f64 / picks).abs() < 1e-9);
        let kda =
            (hero.total_kills + hero.total_assists) as f64 / hero.total_deaths.max(1) as f64;
        assert!((hero.kda_ratio - kda).abs() < 1e-9);
        assert_ne!(hero.game_phase, Some(GamePhase::NotApplicable));
    }
    assert_eq!(output.records["1"].kda_ratio, 16.0);
}

#[test]
fn quantile_thresholds_drive_classification() {
    let durations = [10.0, 20.0, 30.0, 40.0, 50.0];
    let low = quantile(&durations, 0.33).unwrap();
    let high = quantile(&durations, 0.66).unwrap();
    assert!((low - 23.2).abs() < 1e-9);
    assert!((high - 36.4).abs() < 1e-9);

    let thresholds = PhaseThresholds {
        duration: Band { low, high },
        gain: Band { low: 2.0, high: 3.0 },
    };
    assert_eq!(classify(3.5, 50.0, &thresholds), GamePhase::Late);
    assert_eq!(classify(3.5, 10.0, &thresholds), GamePhase::MidLate);
    assert_eq!(classify(2.5, 40.0, &thresholds), GamePhase::MidLate);
    assert_eq!(classify(1.0, 10.0, &thresholds), GamePhase::Early);
    assert_eq!(classify(1.0, 30.0, &thresholds), GamePhase::EarlyMid);
    assert_eq!(classify(2.5, 20.0, &thresholds), GamePhase::EarlyMid);
    assert_eq!(classify(2.5, 30.0, &thresholds), GamePhase::Mid);
}

#[test]
fn ranking_uses_minimum_rank_for_ties() {
    let ranked = rank_descending(&[("A", 10.0), ("B", 10.0), ("C", 8.0)]);
    let ranks: Vec<(&str, usize)> = ranked.iter().map(|r| (r.key, r.rank)).collect();
    assert_eq!(ranks, vec![("A", 1), ("B", 1), ("C", 3)]);
}

#[test]
fn top_heroes_by_primary_gain() {
    let output = run_pipeline(&[], &constants(), &RatingTable::new(), false);
    let top = HeroRanker::top_heroes(&output.records, RankColumn::PrimaryGain, 3);
    let names: Vec<(&str, usize)> = top.iter().map(|h| (h.name.as_str(), h.rank)).collect();
    assert_eq!(names, vec![("Crystal Maiden", 1), ("Anti-Mage", 2), ("Axe", 2)]);
}

#[test]
fn hero_table_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hero_stats.json");

    let entries = vec![
        participant(1, true, (10, 2, 5), 600.0, 1800.0),
        participant(2, false, (3, 7, 9), 333.3, 2111.0),
    ];
    let mut ratings = RatingTable::new();
    ratings.insert(
        "2".to_string(),
        PhaseRatings {
            early: Some(5),
            mid: Some(3),
            late: Some(1),
        },
    );
    let output = run_pipeline(&entries, &constants(), &ratings, false);

    save_json(&path, &output.records).unwrap();
    let back: HeroTable = load_json(&path).unwrap();

    assert_eq!(
        back.keys().collect::<Vec<_>>(),
        output.records.keys().collect::<Vec<_>>()
    );
    assert_eq!(back, output.records);
    assert_eq!(back["2"].early_rating, Some(5));
}

#[test]
fn every_export_format_is_written() {
    let dir = TempDir::new().unwrap();
    let entries = vec![
        participant(1, true, (10, 2, 5), 600.0, 1800.0),
        participant(2, true, (3, 7, 9), 333.0, 2100.0),
        participant(5, false, (1, 8, 17), 280.0, 2500.0),
    ];
    let output = run_pipeline(&entries, &constants(), &RatingTable::new(), false);
    let metadata = KnowledgeMetadata::new(&output.rows, output.thresholds);

    for format in ExportFormat::ALL {
        let path = export_rows(format, &output.rows, &metadata, dir.path()).unwrap();
        assert!(path.exists(), "{:?} export missing", format);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    let jsonl = fs::read_to_string(dir.path().join(ExportFormat::Jsonl.file_name())).unwrap();
    assert_eq!(jsonl.lines().count(), 4);

    let csv = fs::read_to_string(dir.path().join(ExportFormat::Csv.file_name())).unwrap();
    let first_data_line = csv.lines().nth(1).unwrap();
    assert!(first_data_line.starts_with("1,Anti-Mage,agility,"));
    assert!(first_data_line.ends_with("N/A,N/A,N/A"));
}

#[test]
fn entries_file_with_missing_fields_still_aggregates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("match_entries.json");
    fs::write(
        &path,
        r#"[
            {"match_id": 1, "hero_id": 2, "win": true,
             "kills": 6, "deaths": 2, "assists": 8, "duration": 2400},
            {"match_id": 2, "hero_id": 2, "kills": 2, "deaths": 4,
             "gold_per_min": 410.0, "xp_per_min": 480.0, "duration": 1800},
            {"match_id": 3, "kills": 9}
        ]"#,
    )
    .unwrap();

    let entries: Vec<MatchEntry> = load_json(&path).unwrap();
    let output = run_pipeline(&entries, &constants(), &RatingTable::new(), false);

    let axe = &output.records["2"];
    assert_eq!(axe.picks, 2);
    assert_eq!(axe.wins, 1);
    assert_eq!(axe.total_assists, 8);
    assert_eq!(axe.total_gpm, 410.0);
    assert_eq!(axe.avg_gpm, 205.0);
    assert_eq!(axe.kda_ratio, 16.0 / 6.0);
    assert_eq!(output.rows.len(), 1);
}

#[test]
fn partial_ratings_file_does_not_abort_the_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hero_ratings_input.json");
    fs::write(
        &path,
        r#"{
            "1": {"early": 4, "mid": 3},
            "2": {"early": -1, "mid": 300, "late": 2}
        }"#,
    )
    .unwrap();

    let ratings: RatingTable = load_json(&path).unwrap();
    let entries = vec![
        participant(1, true, (10, 2, 5), 600.0, 1800.0),
        participant(2, false, (3, 7, 9), 333.0, 2100.0),
    ];
    let output = run_pipeline(&entries, &constants(), &ratings, false);

    let ratings_of = |name: &str| {
        let row = output.rows.iter().find(|r| r.name == name).unwrap();
        (
            row.early_rating.clone(),
            row.mid_rating.clone(),
            row.late_rating.clone(),
        )
    };
    assert_eq!(
        ratings_of("Anti-Mage"),
        ("4".to_string(), "3".to_string(), "N/A".to_string())
    );
    assert_eq!(
        ratings_of("Axe"),
        ("N/A".to_string(), "N/A".to_string(), "2".to_string())
    );
}
