//! Raw dataset cleaning.
//!
//! Works on untyped CSV records so that it tolerates the gaps and duplicates
//! that make a raw file unsuitable for [`FeatureRow`](crate::dataset::FeatureRow)
//! deserialization.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{csv_reader, DatasetError};

/// Rows missing any of these (when present in the header) are dropped.
pub const REQUIRED_COLUMNS: &[&str] = &["car_model", "moment_of_inertia", "starting_fuel_kWh"];

/// Placeholder for empty text cells.
pub const UNKNOWN: &str = "Unknown";

/// Row counts after each cleaning stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub loaded: usize,
    pub after_dedup: usize,
    pub after_required: usize,
    pub numeric_filled: usize,
    pub text_filled: usize,
}

/// Column kind inferred from the surviving values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    /// Every non-empty value parses as an integer.
    Integer,
    /// Every non-empty value parses as a float.
    Float,
    Text,
    /// No values at all.
    Empty,
}

fn classify(values: impl Iterator<Item = String>) -> ColumnKind {
    let mut kind = ColumnKind::Empty;
    for value in values.filter(|v| !v.is_empty()) {
        kind = match kind {
            ColumnKind::Text => return ColumnKind::Text,
            _ if value.parse::<f64>().is_err() => return ColumnKind::Text,
            ColumnKind::Empty | ColumnKind::Integer if value.parse::<i64>().is_ok() => {
                ColumnKind::Integer
            }
            _ => ColumnKind::Float,
        };
    }
    kind
}

/// Median of `values`; the mean of the two middle values for even lengths.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Fill value for an empty cell of the given column.
fn fill_value(kind: ColumnKind, rows: &[Vec<String>], col: usize) -> Option<String> {
    let present = || -> Vec<f64> {
        rows.iter()
            .filter_map(|r| r[col].parse::<f64>().ok())
            .collect()
    };
    match kind {
        ColumnKind::Integer => median(&mut present()).map(|m| (m.round_ties_even() as i64).to_string()),
        ColumnKind::Float => median(&mut present()).map(|m| m.to_string()),
        ColumnKind::Text => Some(UNKNOWN.to_string()),
        ColumnKind::Empty => None,
    }
}

/// Deduplicate, drop incomplete rows, impute gaps and write the result.
pub fn clean_raw_data(input: &Path, output: &Path) -> Result<CleaningReport, DatasetError> {
    let mut reader = csv_reader(input)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|v| v.trim().to_string()).collect());
    }
    let mut report = CleaningReport {
        loaded: rows.len(),
        ..CleaningReport::default()
    };
    log::info!("loaded raw data: {} rows", report.loaded);

    let mut seen = HashSet::new();
    rows.retain(|r| seen.insert(r.clone()));
    report.after_dedup = rows.len();

    let required: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| REQUIRED_COLUMNS.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();
    rows.retain(|r| required.iter().all(|&i| !r[i].is_empty()));
    report.after_required = rows.len();
    log::info!(
        "after dropping rows missing {:?}: {} rows",
        REQUIRED_COLUMNS,
        report.after_required
    );

    for col in 0..headers.len() {
        let kind = classify(rows.iter().map(|r| r[col].clone()));
        if !rows.iter().any(|r| r[col].is_empty()) {
            continue;
        }
        let Some(fill) = fill_value(kind, &rows, col) else {
            log::debug!("column {} is entirely empty, leaving it", headers[col]);
            continue;
        };
        for row in rows.iter_mut().filter(|r| r[col].is_empty()) {
            row[col] = fill.clone();
            match kind {
                ColumnKind::Text => report.text_filled += 1,
                _ => report.numeric_filled += 1,
            }
        }
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(&headers)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    log::info!("cleaned data saved to {}", output.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn read_back(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_classify() {
        let v = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter();
        assert_eq!(classify(v(&["1", "", "3"])), ColumnKind::Integer);
        assert_eq!(classify(v(&["1", "2.5"])), ColumnKind::Float);
        assert_eq!(classify(v(&["2.5", "1"])), ColumnKind::Float);
        assert_eq!(classify(v(&["1", "abc"])), ColumnKind::Text);
        assert_eq!(classify(v(&["", ""])), ColumnKind::Empty);
    }

    #[test]
    fn test_clean_pipeline_stages() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "raw.csv",
            "car_model,moment_of_inertia,starting_fuel_kWh,engine_weight_kg,FOV_Density,car_color\n\
             Stratos M2,1.2,150.0,200,0.5,red\n\
             Stratos M2,1.2,150.0,200,0.5,red\n\
             ,1.5,120.0,250,0.4,blue\n\
             Vortex R7,1.5,,250,0.4,blue\n\
             Nimbus X1,0.8,200.0,,,\n\
             Vortex R7,1.5,250.0,300,0.9,green\n",
        );
        let output = dir.path().join("clean.csv");

        let report = clean_raw_data(&input, &output).unwrap();
        assert_eq!(report.loaded, 6);
        assert_eq!(report.after_dedup, 5);
        assert_eq!(report.after_required, 3);
        assert_eq!(report.numeric_filled, 2);
        assert_eq!(report.text_filled, 1);

        let rows = read_back(&output);
        assert_eq!(rows.len(), 3);
        // Integer median of 200 and 300, ties to even
        assert_eq!(rows[1][3], "250");
        // Float median of 0.5 and 0.9
        assert_eq!(rows[1][4], "0.7");
        assert_eq!(rows[1][5], UNKNOWN);
    }

    #[test]
    fn test_required_columns_only_checked_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "raw.csv", "car_model,notes\nStratos M2,\nNimbus X1,ok\n");
        let output = dir.path().join("clean.csv");
        let report = clean_raw_data(&input, &output).unwrap();
        assert_eq!(report.after_required, 2);
        assert_eq!(read_back(&output)[0][1], UNKNOWN);
    }

    #[test]
    fn test_all_empty_column_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "raw.csv", "car_model,Zone\nStratos M2,\nNimbus X1,\n");
        let output = dir.path().join("clean.csv");
        clean_raw_data(&input, &output).unwrap();
        assert!(read_back(&output).iter().all(|r| r[1].is_empty()));
    }

    #[test]
    fn test_missing_input_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let err = clean_raw_data(&missing, &dir.path().join("out.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
        assert!(err.to_string().contains("nope.csv"));
    }
}
