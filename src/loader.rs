use crate::error::DashboardError;
use crate::types::{RawRow, Row};
use crate::util::{parse_i32_safe, parse_u64_safe};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// The six columns a dataset must provide, in any order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Year",
    "Specialisation",
    "Female",
    "Male",
    "Diverse",
    "Total_headcount",
];

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub distinct_years: usize,
    pub distinct_specialisations: usize,
}

/// The immutable data source: every parsed row plus load diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub rows: Vec<Row>,
    pub report: LoadReport,
}

// Process-lifetime memo of loaded tables, one entry per canonical path.
// Written once per path on first load, read thereafter; invalidated only by
// process restart.
static TABLE_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<LoadedTable>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Read and parse the dataset at `path`.
///
/// Any defect — missing or unreadable file, absent required column, a cell
/// that does not parse as its required type — is fatal: there is no fallback
/// data and no partial load.
pub fn load(path: &Path) -> Result<LoadedTable, DashboardError> {
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| DashboardError::DatasetRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = rdr
        .headers()
        .map_err(|e| DashboardError::DatasetRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row_no = idx + 1;
        let raw = result.map_err(|e| DashboardError::MalformedRecord {
            path: path.to_path_buf(),
            row: row_no,
            source: e,
        })?;
        rows.push(parse_row(path, row_no, raw)?);
    }

    let years: BTreeSet<i32> = rows.iter().map(|r| r.year).collect();
    let specialisations: BTreeSet<&str> =
        rows.iter().map(|r| r.specialisation.as_str()).collect();
    let report = LoadReport {
        total_rows: rows.len(),
        distinct_years: years.len(),
        distinct_specialisations: specialisations.len(),
    };
    tracing::debug!(
        rows = report.total_rows,
        years = report.distinct_years,
        specialisations = report.distinct_specialisations,
        "dataset parsed"
    );
    Ok(LoadedTable { rows, report })
}

/// Memoized [`load`]: the first call for a path reads the file, later calls
/// return the same shared table.
pub fn load_cached(path: &Path) -> Result<Arc<LoadedTable>, DashboardError> {
    let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut cache = TABLE_CACHE.lock().unwrap();
    if let Some(table) = cache.get(&key) {
        return Ok(Arc::clone(table));
    }
    let table = Arc::new(load(path)?);
    cache.insert(key, Arc::clone(&table));
    Ok(table)
}

fn parse_row(path: &Path, row_no: usize, raw: RawRow) -> Result<Row, DashboardError> {
    let invalid = |column: &'static str, value: &Option<String>| DashboardError::InvalidCell {
        path: path.to_path_buf(),
        row: row_no,
        column,
        value: value.as_deref().unwrap_or("").trim().to_string(),
    };

    let year = parse_i32_safe(raw.year.as_deref()).ok_or_else(|| invalid("Year", &raw.year))?;
    let specialisation = match raw.specialisation.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(invalid("Specialisation", &raw.specialisation)),
    };
    let female =
        parse_u64_safe(raw.female.as_deref()).ok_or_else(|| invalid("Female", &raw.female))?;
    let male = parse_u64_safe(raw.male.as_deref()).ok_or_else(|| invalid("Male", &raw.male))?;
    let diverse =
        parse_u64_safe(raw.diverse.as_deref()).ok_or_else(|| invalid("Diverse", &raw.diverse))?;
    let total_headcount = parse_u64_safe(raw.total_headcount.as_deref())
        .ok_or_else(|| invalid("Total_headcount", &raw.total_headcount))?;

    Ok(Row {
        year,
        specialisation,
        female,
        male,
        diverse,
        total_headcount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_a_valid_dataset() {
        let file = write_csv(
            "Year,Specialisation,Female,Male,Diverse,Total_headcount\n\
             2019,Civil,10,30,2,42\n\
             2020,Civil,12,28,3,43\n",
        );
        let table = load(file.path()).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], Row::new(2019, "Civil", 10, 30, 2, 42));
        assert_eq!(table.report.distinct_years, 2);
        assert_eq!(table.report.distinct_specialisations, 1);
    }

    #[test]
    fn accepts_any_column_order() {
        let file = write_csv(
            "Male,Year,Diverse,Specialisation,Total_headcount,Female\n\
             30,2019,2,Civil,42,10\n",
        );
        let table = load(file.path()).unwrap();
        assert_eq!(table.rows[0], Row::new(2019, "Civil", 10, 30, 2, 42));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DatasetRead { .. }));
        assert!(err.is_data_load());
    }

    #[test]
    fn missing_column_is_rejected() {
        let file = write_csv("Year,Specialisation,Female,Male,Diverse\n2019,Civil,10,30,2\n");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::MissingColumn {
                column: "Total_headcount",
                ..
            }
        ));
    }

    #[test]
    fn bad_cell_is_rejected_with_row_and_column() {
        let file = write_csv(
            "Year,Specialisation,Female,Male,Diverse,Total_headcount\n\
             2019,Civil,10,30,2,42\n\
             2020,Civil,twelve,28,3,43\n",
        );
        let err = load(file.path()).unwrap_err();
        match err {
            DashboardError::InvalidCell {
                row, column, value, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Female");
                assert_eq!(value, "twelve");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_count_is_rejected() {
        let file = write_csv(
            "Year,Specialisation,Female,Male,Diverse,Total_headcount\n\
             2019,Civil,-1,30,2,31\n",
        );
        let err = load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidCell {
                column: "Female",
                ..
            }
        ));
    }

    #[test]
    fn cache_returns_the_same_table_for_the_same_path() {
        let file = write_csv(
            "Year,Specialisation,Female,Male,Diverse,Total_headcount\n\
             2019,Civil,10,30,2,42\n",
        );
        let first = load_cached(file.path()).unwrap();
        let second = load_cached(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
