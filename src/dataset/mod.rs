pub mod columns;
pub mod loader;

use std::{collections::BTreeMap, fmt};

use polars::prelude::*;

use crate::error::{AnalyticsError, Result};
use columns::CRASH_ID;

pub use loader::load_dir;

/// The CSV tables the catalog knows how to query, named after their file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    PrimaryPerson,
    Units,
    PrimaryUnits,
    Charges,
    Damages,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::PrimaryPerson,
        Dataset::Units,
        Dataset::PrimaryUnits,
        Dataset::Charges,
        Dataset::Damages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::PrimaryPerson => "Primary_Person_use",
            Dataset::Units => "Units_use",
            Dataset::PrimaryUnits => "Primary_Units_use",
            Dataset::Charges => "Charges_use",
            Dataset::Damages => "Damages_use",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loaded tables keyed by logical name. Immutable once handed to the catalog.
#[derive(Debug, Default, Clone)]
pub struct Datasets {
    tables: BTreeMap<String, DataFrame>,
}

impl Datasets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `df` under `name`. Known datasets must carry the crash key.
    pub fn insert(&mut self, name: impl Into<String>, df: DataFrame) -> Result<()> {
        let name = name.into();
        if Dataset::from_name(&name).is_some() {
            require_column(&name, &df, CRASH_ID)?;
        }
        self.tables.insert(name, df);
        Ok(())
    }

    /// Builder-style [`Datasets::insert`] for a known dataset.
    pub fn with(mut self, dataset: Dataset, df: DataFrame) -> Result<Self> {
        self.insert(dataset.name(), df)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// `(name, rows, columns)` for every loaded table, in name order.
    pub fn shapes(&self) -> Vec<(&str, usize, usize)> {
        self.tables
            .iter()
            .map(|(name, df)| (name.as_str(), df.height(), df.width()))
            .collect()
    }

    /// A lazy projection of `dataset` onto `columns`, each cast to `String`.
    ///
    /// Only the requested columns flow into the plan, so two tables joined on
    /// `CRASH_ID` never collide on any other shared column name.
    pub fn frame(&self, dataset: Dataset, columns: &[&str]) -> Result<LazyFrame> {
        let df = self
            .tables
            .get(dataset.name())
            .ok_or_else(|| AnalyticsError::DatasetNotFound(dataset.name().to_string()))?;
        for column in columns {
            require_column(dataset.name(), df, column)?;
        }
        let projection: Vec<Expr> = columns
            .iter()
            .map(|c| col(*c).cast(DataType::String))
            .collect();
        Ok(df.clone().lazy().select(projection))
    }
}

fn require_column(dataset: &str, df: &DataFrame, column: &str) -> Result<()> {
    if df.get_column_index(column).is_none() {
        return Err(AnalyticsError::SchemaMismatch {
            dataset: dataset.to_string(),
            column: column.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_dataset_without_crash_key_is_rejected() {
        let df = df!("VEH_MAKE_ID" => ["FORD"]).unwrap();
        let err = Datasets::new().with(Dataset::Units, df).unwrap_err();
        match err {
            AnalyticsError::SchemaMismatch { dataset, column } => {
                assert_eq!(dataset, "Units_use");
                assert_eq!(column, CRASH_ID);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_tables_are_kept_as_is() {
        let mut sets = Datasets::new();
        sets.insert("Endorse_use", df!("X" => [1i64, 2]).unwrap()).unwrap();
        assert_eq!(sets.shapes(), vec![("Endorse_use", 2, 1)]);
    }

    #[test]
    fn frame_reports_missing_dataset() {
        let err = Datasets::new()
            .frame(Dataset::Charges, &[CRASH_ID])
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::DatasetNotFound(ref n) if n == "Charges_use"));
    }

    #[test]
    fn frame_projects_and_casts_to_string() {
        let df = df!(
            "CRASH_ID" => [10i64, 11],
            "VEH_MAKE_ID" => ["FORD", "TOYOTA"],
            "UNIT_NBR" => [1i64, 1],
        )
        .unwrap();
        let sets = Datasets::new().with(Dataset::Units, df).unwrap();

        let out = sets
            .frame(Dataset::Units, &[CRASH_ID, columns::VEH_MAKE_ID])
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(out.width(), 2);
        let ids: Vec<Option<&str>> = out
            .column(CRASH_ID)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some("10"), Some("11")]);
    }

    #[test]
    fn frame_reports_missing_column() {
        let df = df!("CRASH_ID" => ["C1"]).unwrap();
        let sets = Datasets::new().with(Dataset::Units, df).unwrap();
        let err = sets
            .frame(Dataset::Units, &[CRASH_ID, columns::VEH_COLOR_ID])
            .map(|_| ())
            .unwrap_err();
        assert!(
            matches!(err, AnalyticsError::SchemaMismatch { ref column, .. } if column == "VEH_COLOR_ID")
        );
    }

    #[test]
    fn dataset_names_round_trip() {
        for d in Dataset::ALL {
            assert_eq!(Dataset::from_name(d.name()), Some(d));
        }
        assert_eq!(Dataset::from_name("df_Units_use"), None);
    }
}
