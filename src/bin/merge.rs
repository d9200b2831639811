use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use fbref_harvest::config::DEFAULT_MATCHES_DIR;
use fbref_harvest::logger;
use fbref_harvest::merge::merge_csv_dir;
use fbref_harvest::store::write_csv;

const DEFAULT_OUTPUT: &str = "match_stats_merged.csv";
const PREVIEW_ROWS: usize = 5;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let dir = parse_path_arg(&args, "dir").unwrap_or_else(|| PathBuf::from(DEFAULT_MATCHES_DIR));
    let out = parse_path_arg(&args, "out").unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let report = merge_csv_dir(&dir)?;

    println!("Found {} CSV files:", report.files_found.len());
    for path in &report.files_found {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("  - {name}");
    }
    for (path, err) in &report.failed {
        println!("Failed: {} ({err})", path.display());
    }

    let Some(table) = report.table else {
        return Err(anyhow!("nothing to merge in {}", dir.display()));
    };

    println!("Merged {} files", report.loaded.len());
    println!(
        "Result: {} rows, {} columns",
        table.len(),
        table.columns().len()
    );
    println!("Preview:");
    println!("  {}", table.columns().join(" | "));
    for row in table.rows().iter().take(PREVIEW_ROWS) {
        println!("  {}", row.join(" | "));
    }

    write_csv(&table, &out).with_context(|| format!("write {}", out.display()))?;
    println!("Saved to {}", out.display());
    Ok(())
}

fn parse_path_arg(args: &[String], name: &str) -> Option<PathBuf> {
    let flag = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
