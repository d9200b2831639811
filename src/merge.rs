use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::store::read_csv;
use crate::table::StatTable;

#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub files_found: Vec<PathBuf>,
    pub loaded: Vec<LoadedFile>,
    pub failed: Vec<(PathBuf, String)>,
    /// `None` when nothing was found or nothing could be loaded.
    pub table: Option<StatTable>,
}

/// Loads every `*.csv` file in `dir` and stacks them into one table.
///
/// Unreadable files are reported and left out. Columns are the union of all
/// loaded headers in first-seen order; cells a file lacks are empty.
pub fn merge_csv_dir(dir: &Path) -> Result<MergeReport> {
    if !dir.is_dir() {
        return Err(anyhow!("folder '{}' does not exist", dir.display()));
    }

    let files_found = list_csv_files(dir)?;
    let mut report = MergeReport {
        files_found,
        ..MergeReport::default()
    };
    if report.files_found.is_empty() {
        log::warn!("No CSV files found in folder '{}'", dir.display());
        return Ok(report);
    }
    log::info!("Found {} CSV files", report.files_found.len());

    let mut tables = Vec::new();
    for path in &report.files_found {
        match read_csv(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} ({} rows, {} columns)",
                    path.display(),
                    table.len(),
                    table.columns().len()
                );
                report.loaded.push(LoadedFile {
                    path: path.clone(),
                    rows: table.len(),
                    columns: table.columns().len(),
                });
                tables.push(table);
            }
            Err(err) => {
                log::warn!("Error loading {}: {err:#}", path.display());
                report.failed.push((path.clone(), format!("{err:#}")));
            }
        }
    }

    if tables.is_empty() {
        log::warn!("Failed to load any CSV files");
        return Ok(report);
    }
    report.table = Some(concat_tables(&tables));
    Ok(report)
}

/// Row-wise concatenation with column union, first-seen column order.
pub fn concat_tables(tables: &[StatTable]) -> StatTable {
    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for table in tables {
        for name in table.columns() {
            if !index.contains_key(name) {
                index.insert(name.clone(), columns.len());
                columns.push(name.clone());
            }
        }
    }

    let mut out = StatTable::new(columns);
    let width = out.columns().len();
    for table in tables {
        let mapping = table
            .columns()
            .iter()
            .map(|name| index[name])
            .collect::<Vec<_>>();
        for row in table.rows() {
            let mut merged = vec![String::new(); width];
            for (cell, &target) in row.iter().zip(&mapping) {
                merged[target] = cell.clone();
            }
            out.push_row(merged);
        }
    }
    out
}

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let entry = entry.with_context(|| format!("list {}", dir.display()))?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> StatTable {
        let mut t = StatTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        t
    }

    #[test]
    fn union_keeps_first_seen_order_and_fills_gaps() {
        let a = table(&["date", "gf"], &[&["2023-08-12", "2"]]);
        let b = table(&["date", "xg", "gf"], &[&["2023-08-19", "1.4", "0"]]);
        let merged = concat_tables(&[a, b]);

        assert_eq!(merged.columns(), ["date", "gf", "xg"]);
        assert_eq!(merged.rows()[0], vec!["2023-08-12", "2", ""]);
        assert_eq!(merged.rows()[1], vec!["2023-08-19", "0", "1.4"]);
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let merged = concat_tables(&[]);
        assert!(merged.columns().is_empty());
        assert!(merged.is_empty());
    }
}
