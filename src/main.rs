use anyhow::{Context, Result};

use fbref_harvest::config::HarvestConfig;
use fbref_harvest::http_client::HttpSource;
use fbref_harvest::logger;
use fbref_harvest::pipeline::Harvester;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logger::init();

    let cfg = HarvestConfig::from_env().context("unable to resolve harvest config")?;
    log::info!(
        "Harvesting {} leagues, seasons {:?}, into {} / {}",
        cfg.leagues.len(),
        cfg.seasons,
        cfg.players_dir.display(),
        cfg.matches_dir.display()
    );

    let source = HttpSource::new(cfg.user_agent.clone(), cfg.timeout())?;
    let summary = Harvester::new(&cfg, &source).run();

    println!("Harvest complete");
    println!(
        "Leagues: {}/{}",
        summary.leagues_resolved, summary.leagues_total
    );
    println!(
        "Units: {} written, {} skipped, {} failed ({} total)",
        summary.units_written, summary.units_skipped, summary.units_failed, summary.units_total
    );
    println!("Requests: {}", summary.requests);
    for league in &summary.per_league {
        println!(
            "{}: teams={} written={} skipped={} failed={}",
            league.league, league.teams, league.units_written, league.units_skipped, league.units_failed
        );
    }
    if !summary.errors.is_empty() {
        println!("Errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(8) {
            println!(" - {err}");
        }
    }

    Ok(())
}
