//! Integration tests for season and career aggregation.
//!
//! Rows are loaded from `tests/fixtures/player_rows.jsonl` the same way the
//! command line tool loads them.

use std::fs::File;
use std::io::BufReader;

use ulti_events::read_jsonl;
use ulti_stats::{
    Granularity, LeaderQuery, PlayerGameRow, PlayerTotals, StatKey, StatsCollector,
};

fn load_rows() -> Vec<PlayerGameRow> {
    let file = File::open("tests/fixtures/player_rows.jsonl").expect("Failed to open rows");
    read_jsonl(BufReader::new(file)).expect("Failed to parse rows")
}

fn collector() -> StatsCollector {
    let mut collector = StatsCollector::new();
    collector.record_player_rows(load_rows());
    collector
}

fn find<'a>(totals: &'a [PlayerTotals], player: &str, year: u16) -> &'a PlayerTotals {
    totals
        .iter()
        .find(|t| t.player_id == player && t.years.contains(&year))
        .expect("player season present")
}

#[test]
fn test_fixture_loads() {
    let rows = load_rows();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[2].stats.goals, 0);
}

#[test]
fn test_season_totals() {
    let seasons = collector().player_totals(Granularity::Season);
    assert_eq!(seasons.len(), 3);

    let h1 = find(&seasons, "h1", 2024);
    // the empty third row is not a game played
    assert_eq!(h1.games_played, 2);
    assert_eq!(h1.stats.goals, 4);
    assert_eq!(h1.stats.assists, 3);
    assert_eq!(h1.ratios.completion_pct, 88.9);
    assert_eq!(h1.ratios.huck_pct, 66.7);
    assert_eq!(h1.ratios.yards_per_turn, 272.5);
    assert_eq!(h1.ratios.offensive_efficiency, 30.4);
    assert_eq!(h1.ratios.plus_minus, 5);

    let h6 = find(&seasons, "h6", 2024);
    assert_eq!(h6.stats.blocks, 3);
    assert_eq!(h6.stats.callahans, 1);
    assert_eq!(h6.ratios.completion_pct, 90.9);
    assert_eq!(h6.ratios.yards_per_turn, 0.0);
    assert_eq!(h6.ratios.offensive_efficiency, 9.1);
}

#[test]
fn test_career_totals() {
    let careers = collector().player_totals(Granularity::Career);
    assert_eq!(careers.len(), 2);

    let h1 = &careers[0];
    assert_eq!(h1.player_id, "h1");
    assert_eq!(h1.years, vec![2023, 2024]);
    assert_eq!(h1.games_played, 3);
    assert_eq!(h1.stats.goals, 6);
    assert_eq!(h1.ratios.completion_pct, 89.7);
    assert_eq!(h1.ratios.yards_per_turn, 173.0);
    assert_eq!(h1.ratios.offensive_efficiency, 35.1);
}

#[test]
fn test_per_game_summary() {
    let summary = collector().generate_stats(Granularity::Season, true);
    let lines = summary.per_game.expect("per-game lines requested");

    let h1 = lines
        .iter()
        .find(|l| l.player_id == "h1" && l.years == vec![2024])
        .unwrap();
    assert_eq!(h1.get(StatKey::Goals), 2.0);
    assert_eq!(h1.get(StatKey::Assists), 1.5);

    let h6 = lines.iter().find(|l| l.player_id == "h6").unwrap();
    assert_eq!(h6.get(StatKey::Pulls), 5.0);
}

#[test]
fn test_career_leaders() {
    let board = collector().leaders(Granularity::Career, LeaderQuery::new(StatKey::Goals, 5));
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].player_id, "h1");
    assert_eq!(board[0].value, 6.0);
    assert_eq!(board[1].rank, 2);
}

#[test]
fn test_summary_serializes_flat_rows() {
    let summary = collector().generate_stats(Granularity::Career, false);
    let json = serde_json::to_value(&summary).unwrap();
    let first = &json["players"][0];
    assert_eq!(first["player_id"], "h1");
    assert_eq!(first["goals"], 6);
    assert_eq!(first["completion_pct"], 89.7);
    assert!(json.get("per_game").is_none());
}
