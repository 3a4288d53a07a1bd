use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use polars::prelude::*;
use tracing::{debug, info, warn};

use super::Datasets;
use crate::error::{AnalyticsError, Result};

/// Load every `.csv` file directly under `dir`, keyed by its file stem.
///
/// The first row is the header; column types are inferred from the first
/// `infer_rows` rows (`None` scans the whole file).
#[tracing::instrument(level = "info", skip(dir), fields(path = %dir.as_ref().display()))]
pub fn load_dir(dir: impl AsRef<Path>, infer_rows: Option<usize>) -> Result<Datasets> {
    let dir = dir.as_ref();
    let io_err = |source| AnalyticsError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if is_csv(&path) {
            files.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-csv entry");
        }
    }
    files.sort();

    let mut datasets = Datasets::new();
    for path in files {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        let df = read_csv(&path, infer_rows)?;
        info!(dataset = %name, rows = df.height(), columns = df.width(), "loaded");
        datasets.insert(name, df)?;
    }

    if datasets.is_empty() {
        warn!("no CSV files found");
    }
    Ok(datasets)
}

/// Read one CSV file with a header row into a `DataFrame`.
pub fn read_csv(path: &Path, infer_rows: Option<usize>) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| AnalyticsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_rows)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|source| AnalyticsError::Parse {
            file: path.to_path_buf(),
            source,
        })
}

fn is_csv(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::Dataset;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_csv_files_keyed_by_stem() -> Result<()> {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Units_use.csv"),
            "CRASH_ID,UNIT_NBR,VEH_MAKE_ID\n1,1,FORD\n2,1,HONDA\n2,2,NA\n",
        )
        .unwrap();
        fs::write(dir.path().join("Charges_use.CSV"), "CRASH_ID,CHARGE\n1,SPEEDING\n").unwrap();
        fs::write(dir.path().join("README.txt"), "not a table").unwrap();
        fs::create_dir(dir.path().join("archive.csv")).unwrap();

        let sets = load_dir(dir.path(), Some(100))?;
        assert_eq!(
            sets.shapes(),
            vec![("Charges_use", 1, 2), ("Units_use", 3, 3)]
        );
        assert!(sets.get(Dataset::Units.name()).is_some());
        Ok(())
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_dir(dir.path().join("nope"), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::Io { .. }), "{err}");
    }

    #[test]
    fn known_dataset_without_crash_id_fails_at_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Damages_use.csv"), "ID,DAMAGED_PROPERTY\n1,FENCE\n").unwrap();

        let err = load_dir(dir.path(), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::SchemaMismatch { .. }), "{err}");
    }

    #[test]
    fn late_null_marker_does_not_break_default_load() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut csv = String::from("CRASH_ID,DRVR_ZIP\n");
        for i in 0..10_500 {
            csv.push_str(&format!("{i},75001\n"));
        }
        csv.push_str("99999,NULL\n");
        fs::write(dir.path().join("Primary_Person_use.csv"), csv).unwrap();

        let sets = load_dir(dir.path(), Config::default().inference_rows())?;
        let people = sets.get(Dataset::PrimaryPerson.name()).unwrap();
        assert_eq!(people.height(), 10_501);
        let zips = people.column("DRVR_ZIP").unwrap().str().unwrap();
        assert_eq!(zips.get(10_500), Some("NULL"));
        assert_eq!(zips.get(0), Some("75001"));
        Ok(())
    }

    #[test]
    fn empty_directory_loads_nothing() -> Result<()> {
        let dir = tempdir().unwrap();
        assert!(load_dir(dir.path(), None)?.is_empty());
        Ok(())
    }
}
