use anyhow::Result;

use crate::config::{HarvestConfig, League};
use crate::delay::Pacer;
use crate::extract::{fetch_season_team, season_label};
use crate::http_client::PageSource;
use crate::squads::{TeamEntry, fetch_league_teams};
use crate::store::OutputStore;

#[derive(Debug, Clone, Default)]
pub struct LeagueRunSummary {
    pub league: String,
    pub teams: usize,
    pub units_written: usize,
    pub units_skipped: usize,
    pub units_failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub leagues_total: usize,
    pub leagues_resolved: usize,
    pub units_total: usize,
    pub units_written: usize,
    pub units_skipped: usize,
    pub units_failed: usize,
    pub requests: usize,
    pub per_league: Vec<LeagueRunSummary>,
    pub errors: Vec<String>,
}

/// Drives resolve -> extract -> write over every configured league, season
/// and team. Only unit failures are recorded; the run itself keeps going.
pub struct Harvester<'a> {
    cfg: &'a HarvestConfig,
    source: &'a dyn PageSource,
    store: OutputStore,
    pacer: Pacer,
    requests: usize,
}

impl<'a> Harvester<'a> {
    pub fn new(cfg: &'a HarvestConfig, source: &'a dyn PageSource) -> Self {
        Self {
            cfg,
            source,
            store: OutputStore::from_config(cfg),
            pacer: Pacer::new(cfg.delay(), cfg.jitter()),
            requests: 0,
        }
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    pub fn run(&mut self) -> RunSummary {
        let cfg = self.cfg;
        let mut summary = RunSummary {
            leagues_total: cfg.leagues.len(),
            ..RunSummary::default()
        };

        for league in &cfg.leagues {
            log::info!("Fetching teams from {}...", league.name);
            let teams = match self.resolve(league) {
                Ok(teams) => teams,
                Err(err) => {
                    log::error!("league {}: {err:#}", league.name);
                    summary.errors.push(format!("league {}: {err:#}", league.name));
                    continue;
                }
            };
            summary.leagues_resolved += 1;
            log::info!("{}: {} teams", league.name, teams.len());

            let league_summary = self.harvest_league(league, &teams, &mut summary.errors);
            summary.units_total +=
                league_summary.units_written + league_summary.units_skipped + league_summary.units_failed;
            summary.units_written += league_summary.units_written;
            summary.units_skipped += league_summary.units_skipped;
            summary.units_failed += league_summary.units_failed;
            summary.per_league.push(league_summary);
        }

        summary.requests = self.requests;
        summary
    }

    fn harvest_league(
        &mut self,
        league: &League,
        teams: &[TeamEntry],
        errors: &mut Vec<String>,
    ) -> LeagueRunSummary {
        let mut out = LeagueRunSummary {
            league: league.name.clone(),
            teams: teams.len(),
            ..LeagueRunSummary::default()
        };

        let cfg = self.cfg;
        for &season in &cfg.seasons {
            for team in teams {
                let label = season_label(season);
                if self.store.is_complete(&team.name, season) {
                    log::info!("Skipping {} {label}: already saved", team.name);
                    out.units_skipped += 1;
                    continue;
                }

                log::info!("Scraping {} {label}", team.name);
                match self.harvest_unit(league, team, season) {
                    Ok(()) => out.units_written += 1,
                    Err(err) => {
                        log::warn!("{} {label}: {err:#}", team.name);
                        errors.push(format!("{} {} {label}: {err:#}", league.name, team.name));
                        out.units_failed += 1;
                    }
                }
            }
        }
        out
    }

    fn harvest_unit(&mut self, league: &League, team: &TeamEntry, season: i32) -> Result<()> {
        self.before_request();
        let tables = fetch_season_team(self.source, self.cfg, season, team, &league.name)?;
        log::info!(
            "{} {}: {} player rows, {} match rows",
            team.name,
            season_label(season),
            tables.players.len(),
            tables.matches.len()
        );
        self.store.write_unit(&tables, &team.name, season)
    }

    fn resolve(&mut self, league: &League) -> Result<Vec<TeamEntry>> {
        self.before_request();
        fetch_league_teams(self.source, self.cfg, league)
    }

    fn before_request(&mut self) {
        if self.requests > 0 {
            self.pacer.pause();
        }
        self.requests += 1;
    }
}
