use std::path::{Path, PathBuf};
use std::process::Command;

const CORPUS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/athletes.sample.json");

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "draftsim-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn draftsim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_draftsim"))
}

fn aggregate_sample() -> PathBuf {
    let stats_path = temp_path("stats.json");
    let status = draftsim()
        .args(["aggregate", "--corpus", CORPUS, "--reference-year", "2025", "--output"])
        .arg(&stats_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    stats_path
}

fn pinned_config() -> PathBuf {
    let path = temp_path("config.json");
    std::fs::write(&path, r#"{"current_year": 2025}"#).expect("write config");
    path
}

fn generate_json(stats: &Path, config: &Path, seed: &str) -> serde_json::Value {
    let output_path = temp_path("league.json");
    let output = draftsim()
        .args(["generate", "--report", "json", "--seed", seed, "--stats"])
        .arg(stats)
        .arg("--config")
        .arg(config)
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let content = std::fs::read_to_string(output_path).expect("read output");
    serde_json::from_str(&content).expect("league json")
}

#[test]
fn cli_aggregate_writes_position_profiles() {
    let stats_path = aggregate_sample();
    let content = std::fs::read_to_string(stats_path).expect("read stats");
    let stats: serde_json::Value = serde_json::from_str(&content).expect("stats json");
    for code in ["QB", "RB", "WR", "TE", "PK"] {
        assert!(
            stats["position_profile"][code]["heights"].is_object(),
            "missing {code}"
        );
    }
    assert!(stats["first_names"].as_object().is_some_and(|names| !names.is_empty()));
}

#[test]
fn cli_generate_json_report_is_complete_and_reproducible() {
    let stats_path = aggregate_sample();
    let config_path = pinned_config();

    let first = generate_json(&stats_path, &config_path, "0x2A");
    assert_eq!(first["seed"], 42);
    assert_eq!(first["current_year"], 2025);
    assert_eq!(first["counts"]["conferences"], 2);
    assert_eq!(first["counts"]["divisions"], 8);
    assert_eq!(first["counts"]["teams"], 32);
    assert_eq!(first["counts"]["players"], 544);
    assert_eq!(
        first["tables"]["seasons"].as_array().map(Vec::len),
        first["counts"]["seasons"].as_u64().and_then(|n| usize::try_from(n).ok())
    );

    let second = generate_json(&stats_path, &config_path, "42");
    assert_eq!(first, second);
}

#[test]
fn cli_generate_console_report_names_conferences() {
    let stats_path = aggregate_sample();
    let output = draftsim()
        .args(["generate", "--seed", "7", "--stats"])
        .arg(&stats_path)
        .env("NO_COLOR", "1")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("League Summary"));
    assert!(stdout.contains("Union Conference"));
    assert!(stderr.contains("Draftsim League Generator"));
}

#[test]
fn cli_verbose_logs_stage_summaries() {
    let stats_path = aggregate_sample();
    let config_path = pinned_config();
    let output = draftsim()
        .args(["generate", "--verbose", "--report", "json", "--seed", "3", "--stats"])
        .arg(&stats_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--output")
        .arg(temp_path("verbose-league.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loaded stats from"), "stderr: {stderr}");
    assert!(stderr.contains("seeded league for seed 0x3: 32 teams, 544 players"));
}

#[test]
fn cli_player_prints_career() {
    let stats_path = aggregate_sample();
    let config_path = pinned_config();
    let team = "00000000-0000-0000-0000-00000000002a";
    let output = draftsim()
        .args(["player", "--position", "rb", "--seed", "9", "--team", team, "--stats"])
        .arg(&stats_path)
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("player json");
    assert_eq!(value["player"]["position"], "RB");
    assert_eq!(value["player"]["team_id"], team);
    let draft_year = value["player"]["draft_year"].as_i64().expect("draft year");
    let seasons = value["career"].as_array().expect("career");
    assert_eq!(seasons[0]["year"].as_i64(), Some(draft_year.min(2025)));
    let expected = usize::try_from((2025 - draft_year).max(1)).expect("season count");
    assert_eq!(seasons.len(), expected);
}

#[test]
fn cli_rejects_bad_seed_and_missing_stats() {
    let output = draftsim()
        .args(["generate", "--stats", "stats.json", "--seed", "0xNOPE"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("0xNOPE"));

    let output = draftsim()
        .args(["generate", "--stats", "/nonexistent/stats.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read stats"));
}
