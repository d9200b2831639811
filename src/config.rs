use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::extract::MatchTableSelector;

pub const DEFAULT_BASE_URL: &str = "https://fbref.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_PLAYERS_DIR: &str = "data_ps";
pub const DEFAULT_MATCHES_DIR: &str = "data_ms";
const DEFAULT_DELAY_SECS: u64 = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEASONS: &[i32] = &[2023];
const DEFAULT_LEAGUES: &[(&str, &str)] = &[
    ("Premier League", "/en/comps/9/Premier-League-Stats"),
    ("La Liga", "/en/comps/12/La-Liga-Stats"),
    ("Bundesliga", "/en/comps/20/Bundesliga-Stats"),
    ("Serie A", "/en/comps/11/Serie-A-Stats"),
    ("Ligue 1", "/en/comps/13/Ligue-1-Stats"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    /// Path of the league index page, relative to the base URL.
    pub path: String,
}

impl League {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Everything a harvest run needs. Passed by reference into each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub base_url: String,
    pub user_agent: String,
    pub leagues: Vec<League>,
    pub seasons: Vec<i32>,
    pub match_table: MatchTableSelector,
    pub players_dir: PathBuf,
    pub matches_dir: PathBuf,
    pub delay_secs: u64,
    pub jitter_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            leagues: DEFAULT_LEAGUES
                .iter()
                .map(|(name, path)| League::new(*name, *path))
                .collect(),
            seasons: DEFAULT_SEASONS.to_vec(),
            match_table: MatchTableSelector::DatePattern,
            players_dir: PathBuf::from(DEFAULT_PLAYERS_DIR),
            matches_dir: PathBuf::from(DEFAULT_MATCHES_DIR),
            delay_secs: DEFAULT_DELAY_SECS,
            jitter_secs: 0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HarvestConfig {
    /// Defaults, optionally replaced by the JSON file named in `FBREF_CONFIG`,
    /// then patched by individual `FBREF_*` variables.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match std::env::var("FBREF_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::load_json(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(raw) = get("FBREF_BASE_URL") {
            self.base_url = raw.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get("FBREF_USER_AGENT") {
            self.user_agent = raw;
        }
        if let Some(raw) = get("FBREF_SEASONS") {
            self.seasons = parse_seasons(&raw)?;
        }
        if let Some(raw) = get("FBREF_LEAGUES") {
            self.leagues = filter_leagues(&self.leagues, &raw)?;
        }
        if let Some(raw) = get("FBREF_MATCH_TABLE") {
            self.match_table = parse_match_table(&raw)?;
        }
        if let Some(raw) = get("FBREF_PLAYERS_DIR") {
            self.players_dir = PathBuf::from(raw);
        }
        if let Some(raw) = get("FBREF_MATCHES_DIR") {
            self.matches_dir = PathBuf::from(raw);
        }
        if let Some(raw) = get("FBREF_DELAY_SECS") {
            self.delay_secs = raw
                .parse()
                .with_context(|| format!("FBREF_DELAY_SECS is not a number: {raw}"))?;
        }
        if let Some(raw) = get("FBREF_JITTER_SECS") {
            self.jitter_secs = raw
                .parse()
                .with_context(|| format!("FBREF_JITTER_SECS is not a number: {raw}"))?;
        }
        if let Some(raw) = get("FBREF_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("FBREF_TIMEOUT_SECS is not a number: {raw}"))?;
            if secs == 0 {
                return Err(anyhow!("FBREF_TIMEOUT_SECS must be positive"));
            }
            self.timeout_secs = secs;
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_secs(self.jitter_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Accepts `2017..2024` (end exclusive), `2017..=2023`, or a list like `2019,2021`.
pub fn parse_seasons(raw: &str) -> Result<Vec<i32>> {
    let raw = raw.trim();
    let seasons = if let Some((start, end)) = raw.split_once("..=") {
        let (start, end) = (parse_year(start)?, parse_year(end)?);
        (start..=end).collect::<Vec<_>>()
    } else if let Some((start, end)) = raw.split_once("..") {
        let (start, end) = (parse_year(start)?, parse_year(end)?);
        (start..end).collect::<Vec<_>>()
    } else {
        raw.split([',', ';', ' '])
            .filter(|part| !part.trim().is_empty())
            .map(parse_year)
            .collect::<Result<Vec<_>>>()?
    };
    if seasons.is_empty() {
        return Err(anyhow!("season range `{raw}` is empty"));
    }
    Ok(seasons)
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .with_context(|| format!("invalid season year `{}`", raw.trim()))
}

fn filter_leagues(leagues: &[League], raw: &str) -> Result<Vec<League>> {
    let wanted = raw
        .split([',', ';'])
        .map(|part| part.trim().to_ascii_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    let picked = leagues
        .iter()
        .filter(|league| wanted.contains(&league.name.to_ascii_lowercase()))
        .cloned()
        .collect::<Vec<_>>();
    if picked.is_empty() {
        return Err(anyhow!("no configured league matches `{raw}`"));
    }
    Ok(picked)
}

fn parse_match_table(raw: &str) -> Result<MatchTableSelector> {
    if raw.eq_ignore_ascii_case("date") {
        return Ok(MatchTableSelector::DatePattern);
    }
    raw.parse::<usize>()
        .map(MatchTableSelector::Position)
        .with_context(|| format!("FBREF_MATCH_TABLE must be `date` or an index, got `{raw}`"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_cover_top_five_leagues() {
        let cfg = HarvestConfig::default();
        assert_eq!(cfg.leagues.len(), 5);
        assert_eq!(cfg.seasons, vec![2023]);
        assert_eq!(cfg.delay(), Duration::from_secs(4));
        assert_eq!(cfg.match_table, MatchTableSelector::DatePattern);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn season_ranges_follow_range_semantics() {
        assert_eq!(parse_seasons("2017..2020").unwrap(), vec![2017, 2018, 2019]);
        assert_eq!(parse_seasons("2017..=2018").unwrap(), vec![2017, 2018]);
        assert_eq!(parse_seasons("2019, 2021").unwrap(), vec![2019, 2021]);
        assert!(parse_seasons("2020..2020").is_err());
        assert!(parse_seasons("soon").is_err());
    }

    #[test]
    fn overrides_patch_only_named_fields() {
        let mut cfg = HarvestConfig::default();
        cfg.apply_overrides(lookup(&[
            ("FBREF_LEAGUES", "serie a, la liga"),
            ("FBREF_DELAY_SECS", "0"),
            ("FBREF_MATCH_TABLE", "1"),
            ("FBREF_BASE_URL", "http://localhost:8080/"),
            ("FBREF_PLAYERS_DIR", "  "),
        ]))
        .unwrap();

        let names = cfg.leagues.iter().map(|l| l.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["La Liga", "Serie A"]);
        assert_eq!(cfg.delay_secs, 0);
        assert_eq!(cfg.match_table, MatchTableSelector::Position(1));
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.players_dir, PathBuf::from(DEFAULT_PLAYERS_DIR));
    }

    #[test]
    fn timeout_override_must_be_positive() {
        let mut cfg = HarvestConfig::default();
        cfg.apply_overrides(lookup(&[("FBREF_TIMEOUT_SECS", "12")]))
            .unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(12));

        assert!(cfg.apply_overrides(lookup(&[("FBREF_TIMEOUT_SECS", "0")])).is_err());
        assert!(cfg.apply_overrides(lookup(&[("FBREF_TIMEOUT_SECS", "soon")])).is_err());
        assert_eq!(cfg.timeout_secs, 12);
    }

    #[test]
    fn unknown_league_filter_is_rejected() {
        let mut cfg = HarvestConfig::default();
        let err = cfg
            .apply_overrides(lookup(&[("FBREF_LEAGUES", "Eredivisie")]))
            .unwrap_err();
        assert!(err.to_string().contains("Eredivisie"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: HarvestConfig =
            serde_json::from_str(r#"{"seasons":[2019,2020],"match_table":{"position":2}}"#).unwrap();
        assert_eq!(cfg.seasons, vec![2019, 2020]);
        assert_eq!(cfg.match_table, MatchTableSelector::Position(2));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }
}
