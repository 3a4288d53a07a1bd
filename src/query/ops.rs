//! Relational building blocks shared by the catalog queries.

use polars::prelude::*;

use crate::dataset::columns::CRASH_ID;
use crate::error::Result;
use crate::report::Tally;

/// Name of the aggregate column produced by the `count_*` helpers.
pub const COUNT: &str = "count";

/// `column` equals any of `values`. An empty list matches nothing; nulls never match.
pub fn one_of<S: AsRef<str>>(column: &str, values: &[S]) -> Expr {
    values.iter().fold(lit(false), |acc, v| {
        acc.or(col(column).eq(lit(v.as_ref())))
    })
}

/// `column` differs from every one of `values`. Nulls never match.
pub fn none_of(column: &str, values: &[&str]) -> Expr {
    values.iter().fold(col(column).is_not_null(), |acc, v| {
        acc.and(col(column).neq(lit(*v)))
    })
}

/// `column` contains `needle` as a literal, case-sensitive substring.
pub fn contains(column: &str, needle: &str) -> Expr {
    col(column).str().contains_literal(lit(needle))
}

/// First row per crash, keeping input order.
pub fn dedup_crashes(lf: LazyFrame) -> LazyFrame {
    lf.unique_stable(Some(vec![CRASH_ID.into()]), UniqueKeepStrategy::First)
}

pub fn join_on_crash(left: LazyFrame, right: LazyFrame) -> LazyFrame {
    left.inner_join(right, col(CRASH_ID), col(CRASH_ID))
}

/// Rows per distinct `key`.
pub fn count_rows_by(lf: LazyFrame, key: &str) -> LazyFrame {
    lf.group_by([col(key)])
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
}

/// Non-null `CRASH_ID` values per distinct `key`. Repeated crashes count again.
pub fn count_crashes_by(lf: LazyFrame, keys: &[&str]) -> LazyFrame {
    let by: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    lf.group_by(by)
        .agg([col(CRASH_ID).count().cast(DataType::UInt64).alias(COUNT)])
}

/// Largest count first; ties go to the smaller key, null keys last.
pub fn ranked(lf: LazyFrame, key: &str) -> LazyFrame {
    lf.sort_by_exprs(
        [col(COUNT), col(key)],
        SortMultipleOptions::default()
            .with_order_descending_multi([true, false])
            .with_nulls_last(true)
            .with_maintain_order(true),
    )
}

pub fn top(lf: LazyFrame, key: &str, n: IdxSize) -> LazyFrame {
    ranked(lf, key).limit(n)
}

/// Number of rows `lf` evaluates to.
pub fn row_count(lf: LazyFrame) -> Result<u64> {
    let df = lf
        .select([len().cast(DataType::UInt64).alias(COUNT)])
        .collect()?;
    Ok(df
        .column(COUNT)?
        .as_materialized_series()
        .u64()?
        .get(0)
        .unwrap_or(0))
}

pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

pub fn count_column(df: &DataFrame) -> Result<Vec<u64>> {
    Ok(df
        .column(COUNT)?
        .as_materialized_series()
        .u64()?
        .into_iter()
        .map(|c| c.unwrap_or(0))
        .collect())
}

/// Collect a `(key, count)` frame into tallies, preserving row order.
pub fn tallies(lf: LazyFrame, key: &str) -> Result<Vec<Tally>> {
    let df = lf.collect()?;
    let keys = string_column(&df, key)?;
    let counts = count_column(&df)?;
    Ok(keys
        .into_iter()
        .zip(counts)
        .map(|(key, count)| Tally { key, count })
        .collect())
}

/// Collect the key column of a ranked frame, dropping counts.
pub fn ranked_keys(lf: LazyFrame, key: &str) -> Result<Vec<Option<String>>> {
    let df = lf.collect()?;
    string_column(&df, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> LazyFrame {
        df!(
            "CRASH_ID" => ["1", "1", "2", "3", "4"],
            "KIND" => [Some("A"), Some("B"), Some("B"), None, Some("C")],
        )
        .unwrap()
        .lazy()
    }

    #[test]
    fn one_of_with_empty_list_matches_nothing() {
        let empty: [&str; 0] = [];
        let out = frame().filter(one_of("KIND", &empty)).collect().unwrap();
        assert_eq!(out.height(), 0);
    }

    #[test]
    fn none_of_drops_nulls_and_listed_values() {
        let out = frame().filter(none_of("KIND", &["A"])).collect().unwrap();
        let kinds = string_column(&out, "KIND").unwrap();
        assert_eq!(kinds, vec![Some("B".into()), Some("B".into()), Some("C".into())]);
    }

    #[test]
    fn dedup_keeps_first_row_per_crash() {
        let out = dedup_crashes(frame()).collect().unwrap();
        assert_eq!(out.height(), 4);
        assert_eq!(string_column(&out, "KIND").unwrap()[0], Some("A".into()));
    }

    #[test]
    fn ranking_breaks_ties_by_key_with_nulls_last() {
        let rows = tallies(ranked(count_rows_by(frame(), "KIND"), "KIND"), "KIND").unwrap();
        assert_eq!(
            rows,
            vec![
                Tally::new("B", 2),
                Tally::new("A", 1),
                Tally::new("C", 1),
                Tally { key: None, count: 1 },
            ]
        );
    }

    #[test]
    fn row_count_counts_rows() {
        assert_eq!(row_count(frame()).unwrap(), 5);
        assert_eq!(row_count(frame().filter(lit(false))).unwrap(), 0);
    }
}
