use crate::analysis::phase::{GamePhase, PhaseThresholds};
use crate::analysis::ranking::{RankColumn, RankedHero};
use crate::analysis::ratings::RatingRow;
use crate::fetch::FetchSummary;
use crate::rate_limit::{RequestLog, MAX_REQUESTS_PER_DAY, MAX_REQUESTS_PER_MINUTE};
use chrono::Utc;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RankRow {
    rank: String,
    hero: String,
    value: String,
    picks: String,
}

#[derive(Tabled)]
struct PhaseRow {
    phase: String,
    heroes: String,
    examples: String,
}

pub fn display_top_heroes(ranked: &[RankedHero], column: RankColumn) {
    println!("\n{}", format!("🏆 Top heroes by {}", column).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if ranked.is_empty() {
        println!("{}", "No heroes to rank (run the pipeline first)".yellow());
        return;
    }

    let rows: Vec<RankRow> = ranked
        .iter()
        .map(|hero| RankRow {
            rank: format!("#{}", hero.rank),
            hero: hero.name.clone(),
            value: format!("{:.2}", hero.value),
            picks: hero.picks.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

/// Heroes per phase label, with a few names each.
pub fn phase_distribution(rows: &[RatingRow]) -> Vec<(GamePhase, Vec<&str>)> {
    GamePhase::ALL
        .iter()
        .map(|phase| {
            let names: Vec<&str> = rows
                .iter()
                .filter(|r| r.game_phase == phase.label())
                .map(|r| r.name.as_str())
                .collect();
            (*phase, names)
        })
        .filter(|(_, names)| !names.is_empty())
        .collect()
}

pub fn display_phase_summary(rows: &[RatingRow], thresholds: Option<&PhaseThresholds>) {
    println!("\n{}", "🕒 GAME PHASE CLASSIFICATION".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    match thresholds {
        Some(t) => {
            println!(
                "{} duration {:.1}-{:.1} min, primary gain {:.2}-{:.2}\n",
                "📐 Thresholds (33%-66%):".bold(),
                t.duration.low,
                t.duration.high,
                t.gain.low,
                t.gain.high
            );
        }
        None => {
            println!("{}", "No picked heroes, nothing to classify".yellow());
            return;
        }
    }

    let table_rows: Vec<PhaseRow> = phase_distribution(rows)
        .into_iter()
        .map(|(phase, names)| PhaseRow {
            phase: phase.to_string(),
            heroes: names.len().to_string(),
            examples: names.iter().take(5).copied().collect::<Vec<_>>().join(", "),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_fetch_summary(summary: &FetchSummary) {
    println!("\n{}", "📥 FETCH SUMMARY".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!("   Listed:           {}", summary.listed);
    println!("   Already archived: {}", summary.already_archived);
    println!("   Fetched:          {}", summary.fetched.to_string().green());
    if summary.failed > 0 {
        println!("   Failed:           {}", summary.failed.to_string().red());
    }
    if summary.budget_exhausted {
        println!("   {}", "Stopped early: request budget exhausted".yellow());
    }
    println!();
}

pub fn display_request_budget(log: &RequestLog) {
    let time_until_reset = log.get_reset_time().signed_duration_since(Utc::now());

    println!("\n📊 API Usage ({})", log.api);
    println!("   Daily:     {}/{} requests", log.requests_today, MAX_REQUESTS_PER_DAY);
    println!("   Minute:    {}/{} requests", log.requests_this_minute, MAX_REQUESTS_PER_MINUTE);
    println!("   Remaining: {} requests today", log.get_remaining());
    println!(
        "   Reset in:  {}m {}s\n",
        time_until_reset.num_minutes(),
        time_until_reset.num_seconds() % 60
    );
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
