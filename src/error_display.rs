//! Operator-facing classification of load failures.
//!
//! Uses typed error matching (PolarsError variants, io::ErrorKind) rather than
//! string parsing, so messages stay accurate across library upgrades. Only
//! `load` can fail; every other operation degrades per-field instead of
//! raising.

use color_eyre::eyre::Report;
use polars::prelude::PolarsError;
use std::io;

use crate::source::MissingColumnsError;

/// Stable classification of a load failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Source file or directory does not exist.
    NotFound,
    /// Source exists but cannot be read.
    PermissionDenied,
    /// Header lacks one or more required columns.
    MissingColumns,
    /// Source was read but could not be parsed as tabular data.
    MalformedSource,
    Other,
}

/// Classify an error returned by [`crate::Catalog::load`].
pub fn load_error_kind(report: &Report) -> LoadErrorKind {
    if report.downcast_ref::<MissingColumnsError>().is_some() {
        return LoadErrorKind::MissingColumns;
    }
    if let Some(err) = report.downcast_ref::<PolarsError>() {
        return kind_from_polars(err);
    }
    if let Some(err) = report.downcast_ref::<io::Error>() {
        return kind_from_io(err);
    }
    LoadErrorKind::Other
}

fn kind_from_polars(err: &PolarsError) -> LoadErrorKind {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::IO { error, .. } => kind_from_io(error.as_ref()),
        PE::ColumnNotFound(_) | PE::SchemaFieldNotFound(_) => LoadErrorKind::MissingColumns,
        PE::ComputeError(_) | PE::SchemaMismatch(_) | PE::ShapeMismatch(_) | PE::NoData(_) => {
            LoadErrorKind::MalformedSource
        }
        PE::Context { error, .. } => kind_from_polars(error),
        #[allow(unreachable_patterns)]
        _ => LoadErrorKind::Other,
    }
}

fn kind_from_io(err: &io::Error) -> LoadErrorKind {
    match err.kind() {
        io::ErrorKind::NotFound => LoadErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => LoadErrorKind::PermissionDenied,
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof => {
            LoadErrorKind::MalformedSource
        }
        _ => LoadErrorKind::Other,
    }
}

/// Human-readable message for a load failure. The underlying error text is
/// kept verbatim; the kind only contributes an actionable prefix.
pub fn user_message(report: &Report) -> String {
    match load_error_kind(report) {
        LoadErrorKind::NotFound => {
            format!("Source not found. Check the path. ({})", report)
        }
        LoadErrorKind::PermissionDenied => {
            format!("Permission denied reading the source. Check read access. ({})", report)
        }
        LoadErrorKind::MissingColumns => report.to_string(),
        LoadErrorKind::MalformedSource => {
            format!("Source could not be parsed as tabular data: {}", report)
        }
        LoadErrorKind::Other => report.to_string(),
    }
}
