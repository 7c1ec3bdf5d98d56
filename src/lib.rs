//! catalens: chart-data preparation for streaming-catalog dashboards.
//!
//! Loads a static CSV of catalog titles once, then derives the series each
//! descriptive chart consumes: year and duration histograms, genre/director
//! top-N rankings, the rating count plot, and the year-by-type percentage
//! table. Everything after `load` is a pure function over immutable data, so
//! a reactive UI can re-run the whole pipeline per interaction, from any
//! thread, without coordination. Rendering is a consumer concern; this crate
//! stops at ordered `(label, value)` sequences.

pub mod cache;
pub mod chart_data;
pub mod error_display;
pub mod filter;
pub mod genres;
pub mod source;

pub use cache::FilterCache;
pub use chart_data::{
    director_frequency, duration_histogram, genre_frequency, rating_distribution, top_n,
    year_histogram, year_type_percent, yearly_counts,
};
pub use error_display::{load_error_kind, user_message, LoadErrorKind};
pub use filter::FilterSpec;
pub use genres::{explode, split_genres, COL_GENRE, GENRE_SEPARATOR};
pub use source::{
    duration_minutes, normalize_year, Catalog, MissingColumnsError, REQUIRED_COLUMNS,
};
