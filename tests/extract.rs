use std::fs;
use std::path::PathBuf;

use fbref_harvest::extract::{
    LEAGUE_COLUMN, MatchTableSelector, SEASON_COLUMN, TEAM_COLUMN, parse_season_team,
    select_match_table,
};
use fbref_harvest::squads::TeamEntry;
use fbref_harvest::table::parse_tables;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn atletico() -> TeamEntry {
    TeamEntry::new("Atletico Madrid", "db3b9613")
}

#[test]
fn squad_page_yields_player_and_match_tables() {
    let html = read_fixture("squad_page.html");
    let tables =
        parse_season_team(&html, 2023, &atletico(), "La Liga", MatchTableSelector::DatePattern)
            .expect("fixture should parse");

    let players = &tables.players;
    assert_eq!(players.len(), 3);
    assert_eq!(players.columns()[0], "player");
    assert_eq!(players.cell(0, "player"), Some("Jan Oblak"));
    assert_eq!(players.cell(2, "player"), Some("Álvaro Morata"));
    assert_eq!(players.cell(1, "minutes"), Some("3,820"));

    let matches = &tables.matches;
    assert_eq!(matches.len(), 3);
    assert_eq!(matches.cell(0, "date"), Some("2023-08-14"));
    assert_eq!(matches.cell(2, "opponent"), Some("it Lazio"));

    for table in [players, matches] {
        let n = table.columns().len();
        assert_eq!(&table.columns()[n - 3..], [SEASON_COLUMN, TEAM_COLUMN, LEAGUE_COLUMN]);
        for row in 0..table.len() {
            assert_eq!(table.cell(row, SEASON_COLUMN), Some("2023-2024"));
            assert_eq!(table.cell(row, TEAM_COLUMN), Some("Atletico Madrid"));
            assert_eq!(table.cell(row, LEAGUE_COLUMN), Some("La Liga"));
        }
    }
}

#[test]
fn positional_selector_uses_fixed_index() {
    let html = read_fixture("squad_page.html");
    let tables =
        parse_season_team(&html, 2023, &atletico(), "La Liga", MatchTableSelector::Position(1))
            .expect("fixture should parse");
    assert_eq!(tables.matches.columns()[1], "gk_games");
    assert_eq!(tables.matches.len(), 1);
}

#[test]
fn date_heuristic_matches_fixture_layout() {
    let tables = parse_tables(&read_fixture("squad_page.html"));
    assert_eq!(tables.len(), 3);
    assert_eq!(select_match_table(&tables, MatchTableSelector::DatePattern), Some(2));
}

#[test]
fn missing_match_table_is_an_explicit_error() {
    let html = r#"
        <table><thead><tr><th data-stat="player">Player</th></tr></thead>
        <tbody><tr><th>Koke</th></tr></tbody></table>
    "#;
    let err = parse_season_team(html, 2023, &atletico(), "La Liga", MatchTableSelector::DatePattern)
        .expect_err("no dated table");
    assert!(err.to_string().contains("no match-stats table"));
}

#[test]
fn page_without_tables_is_an_error() {
    let err = parse_season_team(
        "<html><body>Rate limited</body></html>",
        2023,
        &atletico(),
        "La Liga",
        MatchTableSelector::Position(0),
    )
    .expect_err("nothing to parse");
    assert!(err.to_string().contains("no tables"));
}
