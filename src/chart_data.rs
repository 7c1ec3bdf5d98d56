//! Prepare chart input from a catalog: histograms, frequency rankings, and
//! the year-by-type percentage table.
//!
//! Every function here is a pure derivation; nothing mutates the catalog and
//! nothing is remembered between calls. Field-level anomalies (absent year,
//! rating, director, duration) exclude a record from the aggregate that needs
//! that field and nothing else.

use std::collections::HashMap;

use color_eyre::Result;
use polars::prelude::*;

use crate::genres::COL_GENRE;
use crate::source::{
    Catalog, COL_DIRECTOR, COL_DURATION_MIN, COL_RATING, COL_RELEASE_YEAR, COL_TYPE,
};

/// Equal-width bins over `[min, max]` of `values`. Bins are
/// inclusive-lower/exclusive-upper except the last, which includes its upper
/// bound. A degenerate range (all values equal) collapses to one bin.
fn histogram(values: &[f64], bin_count: usize) -> Vec<(f64, u32)> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let width = (max - min) / bin_count as f64;
    if width == 0.0 {
        return vec![(min, values.len() as u32)];
    }

    let mut counts = vec![0u32; bin_count];
    for &v in values {
        // max lands exactly on bin_count; clamping closes the final bin.
        let bin = (((v - min) / width) as usize).min(bin_count - 1);
        counts[bin] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + i as f64 * width, count))
        .collect()
}

/// Titles-by-release-year histogram. Records with an absent year contribute
/// to no bin.
pub fn year_histogram(catalog: &Catalog, bin_count: usize) -> Result<Vec<(f64, u32)>> {
    let years = catalog.frame().column(COL_RELEASE_YEAR)?.i32()?;
    let values: Vec<f64> = years.iter().flatten().map(f64::from).collect();
    Ok(histogram(&values, bin_count))
}

/// Histogram over the parsed minutes of `duration`. Records with an absent or
/// non-numeric duration contribute to no bin.
pub fn duration_histogram(catalog: &Catalog, bin_count: usize) -> Result<Vec<(f64, u32)>> {
    let minutes = catalog.frame().column(COL_DURATION_MIN)?.u32()?;
    let values: Vec<f64> = minutes.iter().flatten().map(f64::from).collect();
    Ok(histogram(&values, bin_count))
}

/// Title count per present year, ascending by year. The trendline series
/// overlaid on the year histogram.
pub fn yearly_counts(catalog: &Catalog) -> Result<Vec<(i32, u32)>> {
    let years = catalog.frame().column(COL_RELEASE_YEAR)?.i32()?;
    let mut counts: HashMap<i32, u32> = HashMap::new();
    for year in years.iter().flatten() {
        *counts.entry(year).or_insert(0) += 1;
    }
    let mut out: Vec<(i32, u32)> = counts.into_iter().collect();
    out.sort_unstable_by_key(|&(year, _)| year);
    Ok(out)
}

/// Frequency table in first-encounter order of the column traversal. The
/// order is part of the contract: it makes [`top_n`] tie-breaks deterministic
/// instead of depending on hash-map iteration.
fn string_frequency(values: &StringChunked) -> Vec<(String, u32)> {
    let mut table: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in values.iter().flatten() {
        match index.get(value) {
            Some(&at) => table[at].1 += 1,
            None => {
                index.insert(value.to_string(), table.len());
                table.push((value.to_string(), 1));
            }
        }
    }
    table
}

/// Genre frequencies over the exploded view (see [`crate::genres::explode`]).
pub fn genre_frequency(exploded: &DataFrame) -> Result<Vec<(String, u32)>> {
    Ok(string_frequency(exploded.column(COL_GENRE)?.str()?))
}

/// Director frequencies; records with an absent director are excluded.
pub fn director_frequency(catalog: &Catalog) -> Result<Vec<(String, u32)>> {
    Ok(string_frequency(
        catalog.frame().column(COL_DIRECTOR)?.str()?,
    ))
}

/// The `n` highest-frequency keys, descending by count. Equal counts keep
/// their relative input order (stable sort), so the result never depends on
/// hash-map iteration order.
pub fn top_n(frequency: &[(String, u32)], n: usize) -> Vec<(String, u32)> {
    let mut ranked = frequency.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// `(rating, count)` ordered by the lexicographic sort of observed ratings.
/// Absent ratings are excluded from both the counts and the ordering.
pub fn rating_distribution(catalog: &Catalog) -> Result<Vec<(String, u32)>> {
    let mut table = string_frequency(catalog.frame().column(COL_RATING)?.str()?);
    table.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(table)
}

/// `(year, type, percent)` for every (year, type) group at or after
/// `min_year`, ordered by year then type. Years below the cutoff are removed
/// before the per-year totals are taken, so the remaining percentages always
/// sum to 100 per year.
pub fn year_type_percent(catalog: &Catalog, min_year: i32) -> Result<Vec<(i32, String, f64)>> {
    let df = catalog.frame();
    let years = df.column(COL_RELEASE_YEAR)?.i32()?;
    let types = df.column(COL_TYPE)?.str()?;

    let mut counts: HashMap<(i32, String), u32> = HashMap::new();
    let mut totals: HashMap<i32, u32> = HashMap::new();
    for i in 0..df.height() {
        let (Some(year), Some(ty)) = (years.get(i), types.get(i)) else {
            continue;
        };
        if year < min_year {
            continue;
        }
        *counts.entry((year, ty.to_string())).or_insert(0) += 1;
        *totals.entry(year).or_insert(0) += 1;
    }

    let mut out: Vec<(i32, String, f64)> = Vec::with_capacity(counts.len());
    for ((year, ty), count) in counts {
        let Some(&total) = totals.get(&year) else {
            continue;
        };
        out.push((year, ty, 100.0 * f64::from(count) / f64::from(total)));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(out)
}
