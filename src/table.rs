use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::squash_whitespace;

static TABLE: Lazy<Selector> = Lazy::new(|| css("table"));
static HEADER_ROW: Lazy<Selector> = Lazy::new(|| css("thead tr"));
static BODY_ROW: Lazy<Selector> = Lazy::new(|| css("tbody tr"));
static CELL: Lazy<Selector> = Lazy::new(|| css("th, td"));

const SKIPPED_ROW_CLASSES: &[&str] = &["thead", "spacer", "over_header"];

fn css(raw: &'static str) -> Selector {
    Selector::parse(raw).expect("static selector must parse")
}

/// Rectangular string table: every row has exactly `columns().len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl StatTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: dedup_columns(columns),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// First cell of the first body row, if any.
    pub fn first_cell(&self) -> Option<&str> {
        self.rows.first().and_then(|r| r.first()).map(String::as_str)
    }

    /// Appends a row, padding short rows with empty cells and truncating long ones.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Sets `name` to `value` on every row, adding the column if needed.
    pub fn set_constant_column(&mut self, name: &str, value: &str) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }
}

/// Every `<table>` in the document, in order. Tables without a header row are skipped.
pub fn parse_tables(html: &str) -> Vec<StatTable> {
    let document = Html::parse_document(html);
    document.select(&TABLE).filter_map(parse_table).collect()
}

fn parse_table(table: ElementRef<'_>) -> Option<StatTable> {
    // Grouped headers ("over_header") sit above the real one, so the last row wins.
    let header = table.select(&HEADER_ROW).last()?;
    let columns = header
        .select(&CELL)
        .enumerate()
        .map(|(idx, cell)| column_name(cell, idx))
        .collect::<Vec<_>>();
    if columns.is_empty() {
        return None;
    }

    let mut out = StatTable::new(columns);
    for row in table.select(&BODY_ROW) {
        if row
            .value()
            .classes()
            .any(|class| SKIPPED_ROW_CLASSES.contains(&class))
        {
            continue;
        }
        let cells = row.select(&CELL).map(cell_text).collect::<Vec<_>>();
        if cells.is_empty() {
            continue;
        }
        out.push_row(cells);
    }
    Some(out)
}

fn column_name(cell: ElementRef<'_>, idx: usize) -> String {
    if let Some(stat) = cell.value().attr("data-stat") {
        let stat = stat.trim();
        if !stat.is_empty() {
            return stat.to_string();
        }
    }
    let text = cell_text(cell);
    if text.is_empty() {
        format!("col{idx}")
    } else {
        text
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    squash_whitespace(&cell.text().collect::<String>())
}

fn dedup_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(columns.len());
    for name in columns {
        let mut candidate = name.clone();
        let mut n = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}
