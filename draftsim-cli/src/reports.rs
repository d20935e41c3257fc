use anyhow::Result;
use colored::Colorize;
use draftsim_engine::seeder::StoreTables;
use draftsim_engine::{AggregatedPlayerStats, LeagueDocument, PlayerCareer, Position, SeedReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

/// JSON payload written by `draftsim generate --report json`.
#[derive(Debug, Serialize)]
pub struct LeagueReport<'a> {
    pub seed: u64,
    pub current_year: i32,
    pub counts: &'a SeedReport,
    pub tables: &'a StoreTables,
}

pub fn generate_json_report(
    out: &mut dyn Write,
    document: &LeagueDocument,
    report: &SeedReport,
    tables: &StoreTables,
) -> Result<()> {
    let payload = LeagueReport {
        seed: document.seed,
        current_year: document.current_year,
        counts: report,
        tables,
    };
    serde_json::to_writer_pretty(&mut *out, &payload)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    document: &LeagueDocument,
    report: &SeedReport,
    duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 League Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=================".cyan())?;
    writeln!(out, "Seed: {:#x}", document.seed)?;
    writeln!(out, "Season: {}", document.current_year)?;
    writeln!(
        out,
        "Seeded: {} conferences, {} divisions, {} teams, {} players, {} seasons",
        report.conferences, report.divisions, report.teams, report.players, report.seasons
    )?;
    writeln!(out)?;

    let league = &document.league;
    for conference in &league.conferences {
        writeln!(out, "{}", conference.name.bold())?;
        for division in league.divisions_in(conference) {
            let teams: Vec<String> = league
                .teams_in(division)
                .map(|team| format!("{} ({})", team.display_name(), team.abbr))
                .collect();
            writeln!(out, "   {:6} {}", division.name.yellow(), teams.join(", "))?;
        }
    }
    writeln!(out)?;

    writeln!(out, "{}", "Skill by position".bold())?;
    for (position, (count, mean)) in skill_by_position(document) {
        writeln!(out, "   {:3} {count:4} players, mean skill {mean:.3}", position.code())?;
    }

    let rookies = document
        .players()
        .filter(|player| player.years_of_experience == 0)
        .count();
    writeln!(out, "Rookies: {}", rookies.to_string().green())?;
    writeln!(out, "Generated in {duration:?}")?;
    Ok(())
}

fn skill_by_position(document: &LeagueDocument) -> BTreeMap<Position, (usize, f64)> {
    let mut totals: BTreeMap<Position, (usize, f64)> = BTreeMap::new();
    for player in document.players() {
        let entry = totals.entry(player.position).or_default();
        entry.0 += 1;
        entry.1 += player.skill;
    }
    for (count, sum) in totals.values_mut() {
        #[allow(clippy::cast_precision_loss)]
        let n = *count as f64;
        *sum /= n;
    }
    totals
}

pub fn generate_player_report(out: &mut dyn Write, career: &PlayerCareer) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, career)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_stats_report(out: &mut dyn Write, stats: &AggregatedPlayerStats) -> Result<()> {
    writeln!(out, "{}", stats.to_json_pretty()?)?;
    Ok(())
}
