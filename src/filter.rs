//! Declarative record filtering applied ahead of every aggregate.

use color_eyre::Result;
use polars::prelude::*;

use crate::genres::split_genres;
use crate::source::{Catalog, COL_LISTED_IN, COL_RELEASE_YEAR, COL_TYPE};

/// What to keep when filtering a [`Catalog`]. Plain data; building one never
/// touches a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FilterSpec {
    /// Keep a record iff its `type` is in the set. `None` keeps every type;
    /// `Some` with an empty set keeps none.
    pub types: Option<Vec<String>>,
    /// Inclusive `[min, max]` on the normalized release year. While a range is
    /// active, records with an absent year are excluded.
    pub year_range: Option<(i32, i32)>,
    /// Keep a record iff any of its split genres is in the set. Empty means no
    /// genre filtering.
    pub genres: Vec<String>,
}

impl FilterSpec {
    /// True when the spec cannot exclude anything.
    pub fn is_pass_through(&self) -> bool {
        self.types.is_none() && self.year_range.is_none() && self.genres.is_empty()
    }
}

impl Catalog {
    /// Pure, order-preserving selection of the records matching `spec`. The
    /// source catalog is never mutated.
    pub fn filter(&self, spec: &FilterSpec) -> Result<Catalog> {
        let df = self.frame();
        let types = df.column(COL_TYPE)?.str()?;
        let years = df.column(COL_RELEASE_YEAR)?.i32()?;
        let listed = df.column(COL_LISTED_IN)?.str()?;

        let mut keep: Vec<bool> = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let type_ok = match &spec.types {
                None => true,
                Some(kept) => types
                    .get(i)
                    .is_some_and(|t| kept.iter().any(|k| k == t)),
            };
            let year_ok = match spec.year_range {
                None => true,
                Some((min, max)) => years.get(i).is_some_and(|y| (min..=max).contains(&y)),
            };
            let genre_ok = spec.genres.is_empty()
                || listed.get(i).is_some_and(|value| {
                    split_genres(value).any(|g| spec.genres.iter().any(|k| k == g))
                });
            keep.push(type_ok && year_ok && genre_ok);
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(Catalog::from_normalized(df.filter(&mask)?))
    }
}
