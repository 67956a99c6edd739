//! Minimal numeric CSV reader/writer.
//!
//! The UCI files are `;`-separated with quoted headers; the cached copy is
//! comma-separated. Both are accepted. Header names are trimmed and lowercased.

use std::fs;
use std::path::Path;

use super::{Dataset, DatasetError};

fn detect_delimiter(header: &str) -> char {
    if header.contains(';') {
        ';'
    } else {
        ','
    }
}

fn clean_cell(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim()
}

/// Parse CSV text with a header row into a [`Dataset`]
pub fn parse_dataset(text: &str) -> Result<Dataset, DatasetError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(DatasetError::Empty)?;
    let delimiter = detect_delimiter(header);

    let columns: Vec<String> = header
        .split(delimiter)
        .map(|c| clean_cell(c).to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let cells: Vec<&str> = line.split(delimiter).collect();
        if cells.len() != columns.len() {
            return Err(DatasetError::Parse {
                line: line_no,
                message: format!("expected {} values, found {}", columns.len(), cells.len()),
            });
        }

        let row = cells
            .iter()
            .map(|cell| {
                let cell = clean_cell(cell);
                cell.parse::<f64>().map_err(|_| DatasetError::Parse {
                    line: line_no,
                    message: format!("not a number: {:?}", cell),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    Dataset::new(columns, rows)
}

/// Read and parse a CSV file
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(&text)?;

    let (rows, cols) = dataset.shape();
    log::info!("Loaded dataset {} ({} rows x {} columns)", path.display(), rows, cols);

    Ok(dataset)
}

/// Render as comma-separated text with a header row
pub fn to_csv(dataset: &Dataset) -> String {
    let mut out = dataset.columns().join(",");
    out.push('\n');
    for row in &dataset.rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}
