//! Genre splitting and the one-row-per-genre exploded view.

use color_eyre::Result;
use polars::prelude::*;

use crate::source::{Catalog, COL_LISTED_IN};

/// Literal separator between genres in `listed_in`. No additional trimming is
/// applied; real data with inconsistent spacing after the comma would need
/// revalidation before changing this.
pub const GENRE_SEPARATOR: &str = ", ";

/// Single-genre column added by [`explode`].
pub const COL_GENRE: &str = "genre";

/// Splits a `listed_in` value into its genres. Case-sensitive, not
/// deduplicated; callers with a missing `listed_in` contribute no genres.
pub fn split_genres(listed_in: &str) -> std::str::Split<'_, &'static str> {
    listed_in.split(GENRE_SEPARATOR)
}

/// Builds the exploded view: a record with N genres becomes N rows, each with
/// one genre in [`COL_GENRE`] and every other field (including the row-identity
/// column) duplicated. Records with a missing `listed_in` are dropped; they
/// cannot appear in any genre-keyed aggregate.
pub fn explode(catalog: &Catalog) -> Result<DataFrame> {
    let df = catalog.frame();
    let listed = df.column(COL_LISTED_IN)?.str()?;

    let mut take: Vec<IdxSize> = Vec::with_capacity(df.height());
    let mut genres: Vec<&str> = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let Some(value) = listed.get(i) {
            for genre in split_genres(value) {
                take.push(i as IdxSize);
                genres.push(genre);
            }
        }
    }

    let mut exploded = df.take(&IdxCa::from_vec("take".into(), take))?;
    exploded.with_column(Series::new(COL_GENRE.into(), genres))?;
    Ok(exploded)
}
