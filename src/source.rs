//! Loading and normalizing the title catalog from a CSV source.
//!
//! `load` is the only operation in the crate that performs I/O. Everything it
//! returns is treated as immutable afterwards; the derived views in the other
//! modules never write back into the loaded frame.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use color_eyre::eyre::Report;
use color_eyre::Result;
use polars::prelude::*;

/// Columns the source must provide. Row-level absence of a value is tolerated;
/// absence of a column is a load error.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "type",
    "release_year",
    "listed_in",
    "rating",
    "director",
    "duration",
];

pub const COL_TYPE: &str = "type";
pub const COL_RELEASE_YEAR: &str = "release_year";
pub const COL_LISTED_IN: &str = "listed_in";
pub const COL_RATING: &str = "rating";
pub const COL_DIRECTOR: &str = "director";
pub const COL_DURATION: &str = "duration";

/// Original-row identity, attached at load so it survives into derived views
/// (notably the exploded one-row-per-genre frame).
pub const COL_ROW: &str = "row";

/// Minutes parsed from the numeric prefix of `duration`; null when absent or
/// non-numeric.
pub const COL_DURATION_MIN: &str = "duration_min";

/// The source is missing one or more required columns.
#[derive(Debug, Clone)]
pub struct MissingColumnsError {
    pub missing: Vec<String>,
}

impl fmt::Display for MissingColumnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required columns: {}", self.missing.join(", "))
    }
}

impl std::error::Error for MissingColumnsError {}

/// Coerce a raw `release_year` value to an integer. Non-numeric input is
/// absent, not zero; the record stays in the dataset for non-year views.
pub fn normalize_year(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Minutes from the numeric prefix of a free-text `duration` (e.g. "90 min").
/// No prefix means absent.
pub fn duration_minutes(raw: &str) -> Option<u32> {
    let digits: &str = raw
        .trim_start()
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or("");
    digits.parse().ok()
}

/// The full in-memory collection of title records after load. Ordered,
/// duplicates permitted, immutable once constructed.
#[derive(Clone, Debug)]
pub struct Catalog {
    df: DataFrame,
}

impl Catalog {
    /// Scans a CSV source and normalizes it into a `Catalog`.
    ///
    /// Columns are read as strings (no schema inference) so that malformed
    /// per-row values degrade to null instead of poisoning a column dtype.
    /// Fails if the source is unreadable or a required column is missing; the
    /// error is classified for display by [`crate::error_display`].
    pub fn load(path: &Path) -> Result<Self> {
        let pl_path = PlPath::Local(Arc::from(path));
        let mut lf = LazyCsvReader::new(pl_path)
            .with_infer_schema_length(Some(0))
            .finish()?;

        // Validate the header against the schema before materializing rows.
        let schema = lf.collect_schema()?;
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| schema.get(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Report::new(MissingColumnsError { missing }));
        }

        let df = lf.collect()?;
        Self::from_frame(df)
    }

    /// Builds a `Catalog` from an already-materialized frame, applying the
    /// same column validation and normalization as [`Catalog::load`].
    pub fn from_frame(df: DataFrame) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| df.column(name).is_err())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Report::new(MissingColumnsError { missing }));
        }
        Ok(Self {
            df: normalize(df)?,
        })
    }

    /// Wraps a frame derived from an existing `Catalog` (already normalized).
    pub(crate) fn from_normalized(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of title records.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }
}

/// Attach the row-identity column, coerce `release_year` to Int32 (non-numeric
/// becomes null), and derive `duration_min` from the duration prefix.
fn normalize(mut df: DataFrame) -> Result<DataFrame> {
    if df.column(COL_ROW).is_err() {
        df = df.with_row_index(COL_ROW.into(), None)?;
    }

    let year = df.column(COL_RELEASE_YEAR)?;
    let year = match year.dtype() {
        DataType::String => {
            let raw = year.str()?;
            let parsed: Vec<Option<i32>> = (0..raw.len())
                .map(|i| raw.get(i).and_then(normalize_year))
                .collect();
            Series::new(COL_RELEASE_YEAR.into(), parsed).into_column()
        }
        _ => year.cast(&DataType::Int32)?,
    };
    df.with_column(year)?;

    let duration = df.column(COL_DURATION)?.cast(&DataType::String)?;
    let duration = duration.str()?;
    let minutes: Vec<Option<u32>> = (0..duration.len())
        .map(|i| duration.get(i).and_then(duration_minutes))
        .collect();
    df.with_column(Series::new(COL_DURATION_MIN.into(), minutes))?;

    Ok(df)
}
