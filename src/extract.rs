use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::HarvestConfig;
use crate::http_client::PageSource;
use crate::normalize::url_slug;
use crate::squads::TeamEntry;
use crate::table::{StatTable, parse_tables};

pub const SEASON_COLUMN: &str = "Season";
pub const TEAM_COLUMN: &str = "Team";
pub const LEAGUE_COLUMN: &str = "League";

/// How the match-log table is located among the tables of a squad page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTableSelector {
    /// Fixed index into the page's parsed tables.
    Position(usize),
    /// First table whose first body cell is an ISO date.
    DatePattern,
}

#[derive(Debug, Clone)]
pub struct SeasonTeamTables {
    pub players: StatTable,
    pub matches: StatTable,
}

pub fn season_label(season: i32) -> String {
    format!("{}-{}", season, season + 1)
}

pub fn squad_stats_url(cfg: &HarvestConfig, season: i32, team: &TeamEntry) -> String {
    format!(
        "{}/en/squads/{}/{}/all_comps/{}-Stats-All-Competitions",
        cfg.base_url,
        team.id,
        season_label(season),
        url_slug(&team.name)
    )
}

/// Index of the match-log table, or `None` when nothing qualifies.
pub fn select_match_table(tables: &[StatTable], selector: MatchTableSelector) -> Option<usize> {
    match selector {
        MatchTableSelector::Position(idx) => (idx < tables.len()).then_some(idx),
        MatchTableSelector::DatePattern => tables
            .iter()
            .position(|t| t.first_cell().is_some_and(is_iso_date)),
    }
}

pub fn is_iso_date(raw: &str) -> bool {
    let raw = raw.trim();
    raw.len() == 10 && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

/// Splits a squad page into the player table (always the first one) and the
/// match-log table, tagging both with season, team and league.
pub fn parse_season_team(
    html: &str,
    season: i32,
    team: &TeamEntry,
    league: &str,
    selector: MatchTableSelector,
) -> Result<SeasonTeamTables> {
    let mut tables = parse_tables(html);
    if tables.is_empty() {
        return Err(anyhow!(
            "no tables for {} {}",
            team.name,
            season_label(season)
        ));
    }
    let match_idx = select_match_table(&tables, selector).ok_or_else(|| {
        anyhow!(
            "no match-stats table ({selector:?}) for {} {}",
            team.name,
            season_label(season)
        )
    })?;

    let mut matches = if match_idx == 0 {
        tables[0].clone()
    } else {
        tables.swap_remove(match_idx)
    };
    let mut players = tables.swap_remove(0);

    let label = season_label(season);
    for table in [&mut players, &mut matches] {
        table.set_constant_column(SEASON_COLUMN, &label);
        table.set_constant_column(TEAM_COLUMN, &team.name);
        table.set_constant_column(LEAGUE_COLUMN, league);
    }
    Ok(SeasonTeamTables { players, matches })
}

pub fn fetch_season_team(
    source: &dyn PageSource,
    cfg: &HarvestConfig,
    season: i32,
    team: &TeamEntry,
    league: &str,
) -> Result<SeasonTeamTables> {
    let url = squad_stats_url(cfg, season, team);
    log::debug!("GET {url}");
    let html = source
        .fetch(&url)
        .with_context(|| format!("fetch squad page for {} {}", team.name, season_label(season)))?;
    parse_season_team(&html, season, team, league, cfg.match_table)
}
