use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::config::{HarvestConfig, League};
use crate::http_client::PageSource;
use crate::normalize::{squash_whitespace, strip_diacritics};

static SQUAD_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.stats_table a[href*='/squads/']").expect("static selector must parse")
});

/// Position of the team id in `/en/squads/<id>/<slug>`.
const TEAM_ID_SEGMENT: usize = 3;
const FIXTURE_MARKER: &str = "vs ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamEntry {
    /// Display name with diacritics stripped.
    pub name: String,
    pub id: String,
}

impl TeamEntry {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

pub fn league_index_url(cfg: &HarvestConfig, league: &League) -> String {
    format!("{}{}", cfg.base_url, league.path)
}

/// Team name -> id pairs from a league index page, in first-seen order.
///
/// A repeated name keeps its position but takes the later id.
pub fn parse_squad_links(html: &str) -> Vec<TeamEntry> {
    let document = Html::parse_document(html);
    let mut teams: Vec<TeamEntry> = Vec::new();

    for anchor in document.select(&SQUAD_LINK) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(id) = href
            .split('/')
            .nth(TEAM_ID_SEGMENT)
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            continue;
        };
        let name = strip_diacritics(&squash_whitespace(&anchor.text().collect::<String>()));
        if name.is_empty() || name.contains(FIXTURE_MARKER) {
            continue;
        }

        match teams.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.id = id.to_string(),
            None => teams.push(TeamEntry::new(name, id)),
        }
    }
    teams
}

pub fn fetch_league_teams(
    source: &dyn PageSource,
    cfg: &HarvestConfig,
    league: &League,
) -> Result<Vec<TeamEntry>> {
    let url = league_index_url(cfg, league);
    let html = source
        .fetch(&url)
        .with_context(|| format!("fetch league index for {}", league.name))?;
    Ok(parse_squad_links(&html))
}
