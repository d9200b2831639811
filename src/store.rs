use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::config::HarvestConfig;
use crate::extract::{SeasonTeamTables, season_label};
use crate::normalize::file_stem;
use crate::table::StatTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Players,
    Matches,
}

impl TableKind {
    pub fn label(self) -> &'static str {
        match self {
            TableKind::Players => "player stats",
            TableKind::Matches => "match stats",
        }
    }
}

/// Per-(kind, team, season) CSV files. A unit is done once its player file exists.
#[derive(Debug, Clone)]
pub struct OutputStore {
    players_dir: PathBuf,
    matches_dir: PathBuf,
}

impl OutputStore {
    pub fn new(players_dir: impl Into<PathBuf>, matches_dir: impl Into<PathBuf>) -> Self {
        Self {
            players_dir: players_dir.into(),
            matches_dir: matches_dir.into(),
        }
    }

    pub fn from_config(cfg: &HarvestConfig) -> Self {
        Self::new(cfg.players_dir.clone(), cfg.matches_dir.clone())
    }

    pub fn dir(&self, kind: TableKind) -> &Path {
        match kind {
            TableKind::Players => &self.players_dir,
            TableKind::Matches => &self.matches_dir,
        }
    }

    pub fn path_for(&self, kind: TableKind, team: &str, season: i32) -> PathBuf {
        self.dir(kind)
            .join(format!("{}_{}.csv", file_stem(team), season_label(season)))
    }

    /// Content is never inspected; a stale or wrong file still counts as done.
    pub fn is_complete(&self, team: &str, season: i32) -> bool {
        self.path_for(TableKind::Players, team, season).exists()
    }

    /// Writes the match file first so the player file, the completion marker,
    /// only appears once both tables are on disk.
    pub fn write_unit(&self, tables: &SeasonTeamTables, team: &str, season: i32) -> Result<()> {
        write_csv(
            &tables.matches,
            &self.path_for(TableKind::Matches, team, season),
        )?;
        write_csv(
            &tables.players,
            &self.path_for(TableKind::Players, team, season),
        )?;
        Ok(())
    }
}

/// Writes through a temp file and renames it into place.
pub fn write_csv(table: &StatTable, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    }
    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)
            .with_context(|| format!("open {}", tmp.display()))?;
        writer
            .write_record(table.columns())
            .context("write csv header")?;
        for row in table.rows() {
            writer.write_record(row).context("write csv row")?;
        }
        writer.flush().context("flush csv")?;
    }
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

/// Short records are padded with empty cells; a record wider than the header
/// fails the whole file.
pub fn read_csv(path: &Path) -> Result<StatTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(anyhow!("{} has no header row", path.display()));
    }

    let width = headers.len();
    let mut table = StatTable::new(headers);
    for (line, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("{} record {}", path.display(), line + 1))?;
        if record.len() > width {
            return Err(anyhow!(
                "{} record {}: expected at most {width} fields, saw {}",
                path.display(),
                line + 1,
                record.len()
            ));
        }
        table.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}
