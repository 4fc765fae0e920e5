//! Domain models for the reservation split pipeline.
//!
//! - [`Cell`] - Tagged cell value produced at the decode boundary
//! - [`Table`] - Ordered labelled columns over rows of cells
//! - [`TablePreview`] - Serializable head of a table for display

use chrono::NaiveDateTime;
use serde::Serialize;

// =============================================================================
// Cell
// =============================================================================

/// A single spreadsheet cell.
///
/// Serializes untagged: `Empty` becomes `null`, dates become ISO-8601
/// date-time strings.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Cell {
    /// Blank or missing.
    #[default]
    Empty,
    /// Boolean cell.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Calendar date with optional time of day.
    Date(NaiveDateTime),
    /// Anything else.
    Text(String),
}

impl Cell {
    /// Infer a typed cell from raw text, the way a spreadsheet reader would
    /// for delimited input. Dates are left as text; the transform parses
    /// them with its own day-first rules.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        if looks_numeric(trimmed) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Cell::Float(f);
            }
        }
        Cell::Text(raw.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Plain-text rendering used for headers and terminal output.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Date(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            Cell::Text(s) => s.clone(),
        }
    }
}

/// Rejects words that `f64::from_str` accepts ("inf", "NaN", "infinity").
fn looks_numeric(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::Date(dt)
    }
}

// =============================================================================
// Table
// =============================================================================

/// Ordered labelled columns over rows.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from labels and rows. Short rows are padded with
    /// [`Cell::Empty`], long rows truncated.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<Cell>>,
    ) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column with this exact label.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of the first column with this label, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Trim leading and trailing whitespace from every label.
    pub fn trim_labels(&mut self) {
        for label in &mut self.columns {
            let trimmed = label.trim();
            if trimmed.len() != label.len() {
                *label = trimmed.to_string();
            }
        }
    }

    /// Replace every cell of every column labelled `name` with `f(cell)`.
    /// Returns whether such a column exists.
    pub fn map_column<F>(&mut self, name: &str, f: F) -> bool
    where
        F: Fn(&Cell) -> Cell,
    {
        let indices: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == name)
            .map(|(i, _)| i)
            .collect();

        for row in &mut self.rows {
            for &idx in &indices {
                row[idx] = f(&row[idx]);
            }
        }
        !indices.is_empty()
    }

    /// Relabel every column called `from`. Returns whether any matched.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        let mut renamed = false;
        for label in &mut self.columns {
            if label == from {
                *label = to.to_string();
                renamed = true;
            }
        }
        renamed
    }

    /// Remove every column labelled `name`.
    pub fn drop_column(&mut self, name: &str) {
        let keep: Vec<bool> = self.columns.iter().map(|c| c != name).collect();
        if keep.iter().all(|k| *k) {
            return;
        }
        self.columns = retain_flagged(std::mem::take(&mut self.columns), &keep);
        for row in &mut self.rows {
            *row = retain_flagged(std::mem::take(row), &keep);
        }
    }

    /// Project onto `names` in the given order, skipping labels that are
    /// absent. Never synthesizes a column.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let picked: Vec<(usize, &str)> = names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.column_index(name).map(|idx| (idx, name))
            })
            .collect();

        Table {
            columns: picked.iter().map(|(_, name)| name.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picked.iter().map(|(idx, _)| row[*idx].clone()).collect())
                .collect(),
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn preview(&self, n: usize) -> TablePreview {
        TablePreview {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            total_rows: self.rows.len(),
        }
    }
}

fn retain_flagged<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, k)| k.then_some(item))
        .collect()
}

// =============================================================================
// Preview
// =============================================================================

/// Head of a table, ready for JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Row count of the full table.
    pub total_rows: usize,
}
