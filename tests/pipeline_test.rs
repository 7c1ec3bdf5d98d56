use std::io::Write;
use std::path::PathBuf;

use color_eyre::Result;
use polars::prelude::*;

use catalens::chart_data::{
    director_frequency, genre_frequency, rating_distribution, top_n, year_histogram,
    year_type_percent, yearly_counts,
};
use catalens::error_display::{load_error_kind, user_message, LoadErrorKind};
use catalens::genres::explode;
use catalens::source::{Catalog, COL_LISTED_IN};
use catalens::{FilterCache, FilterSpec};

/// A small catalog shaped like the real titles export: extra columns beyond
/// the required six, quoted multi-genre fields, and per-row holes.
fn write_sample_csv(dir: &tempfile::TempDir) -> Result<PathBuf> {
    let path = dir.path().join("titles.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(
        file,
        "show_id,type,title,director,release_year,rating,duration,listed_in"
    )?;
    writeln!(
        file,
        "s1,Movie,The First,Don McKellar,2015,PG,90 min,\"Drama, Comedy\""
    )?;
    writeln!(file, "s2,TV Show,The Second,,2015,TV-MA,2 Seasons,Drama")?;
    writeln!(file, "s3,Movie,The Third,Jay Chapman,N/A,PG,100 min,Horror")?;
    writeln!(file, "s4,Movie,The Fourth,Don McKellar,1975,R,70 min,")?;
    writeln!(file, "s5,Movie,The Fifth,,2019,,110 min,Drama")?;
    Ok(path)
}

fn three_record_scenario() -> Result<Catalog> {
    let df = df!(
        "type" => &["Movie", "TV Show", "Movie"],
        "release_year" => &["2015", "2015", "2015"],
        "listed_in" => &[Some("Drama, Comedy"), Some("Drama"), None],
        "rating" => &[Some("PG"), Some("TV-MA"), Some("R")],
        "director" => &[Some("A"), Some("B"), Some("C")],
        "duration" => &[Some("90 min"), Some("1 Season"), Some("80 min")],
    )?;
    Catalog::from_frame(df)
}

#[test]
fn load_reads_and_normalizes_the_source() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = Catalog::load(&write_sample_csv(&dir)?)?;
    assert_eq!(catalog.height(), 5);

    // The "N/A" year record is excluded from year aggregates...
    let bins = year_histogram(&catalog, 4)?;
    let binned: u32 = bins.iter().map(|&(_, c)| c).sum();
    assert_eq!(binned, 4);

    // ...but still counted wherever its other fields are present.
    let ratings = rating_distribution(&catalog)?;
    assert_eq!(
        ratings,
        vec![
            ("PG".to_string(), 2),
            ("R".to_string(), 1),
            ("TV-MA".to_string(), 1),
        ]
    );
    let directors = director_frequency(&catalog)?;
    assert_eq!(
        directors,
        vec![
            ("Don McKellar".to_string(), 2),
            ("Jay Chapman".to_string(), 1),
        ]
    );
    Ok(())
}

#[test]
fn load_rejects_missing_required_columns() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("no_rating.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "type,release_year,listed_in,director,duration")?;
    writeln!(file, "Movie,2015,Drama,Someone,90 min")?;

    let err = Catalog::load(&path).unwrap_err();
    assert_eq!(load_error_kind(&err), LoadErrorKind::MissingColumns);
    assert!(user_message(&err).contains("rating"));
    Ok(())
}

#[test]
fn load_fails_on_missing_file() {
    let err = Catalog::load(std::path::Path::new("/nonexistent/titles.csv")).unwrap_err();
    assert_ne!(load_error_kind(&err), LoadErrorKind::MissingColumns);
}

#[test]
fn identity_filter_commutes_with_aggregation() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = Catalog::load(&write_sample_csv(&dir)?)?;

    // Covers the full observed domain: every type, the whole year span, no
    // genre filtering. Absent-year records pass because no range is active.
    let spec = FilterSpec {
        types: Some(vec!["Movie".to_string(), "TV Show".to_string()]),
        year_range: None,
        genres: Vec::new(),
    };
    let filtered = catalog.filter(&spec)?;
    assert_eq!(filtered.height(), catalog.height());

    assert_eq!(rating_distribution(&filtered)?, rating_distribution(&catalog)?);
    assert_eq!(yearly_counts(&filtered)?, yearly_counts(&catalog)?);
    assert_eq!(
        year_type_percent(&filtered, 1980)?,
        year_type_percent(&catalog, 1980)?
    );
    Ok(())
}

#[test]
fn full_domain_filter_is_identity_when_all_years_present() -> Result<()> {
    let catalog = three_record_scenario()?;
    let spec = FilterSpec {
        types: Some(vec!["Movie".to_string(), "TV Show".to_string()]),
        year_range: Some((2015, 2015)),
        genres: Vec::new(),
    };
    let filtered = catalog.filter(&spec)?;
    assert_eq!(filtered.height(), catalog.height());
    assert_eq!(rating_distribution(&filtered)?, rating_distribution(&catalog)?);
    Ok(())
}

#[test]
fn empty_type_set_yields_empty_aggregates() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = Catalog::load(&write_sample_csv(&dir)?)?;
    let spec = FilterSpec {
        types: Some(Vec::new()),
        ..FilterSpec::default()
    };
    let filtered = catalog.filter(&spec)?;
    assert_eq!(filtered.height(), 0);

    // Aggregates over an empty catalog degrade to empty output, not errors.
    assert!(year_histogram(&filtered, 10)?.is_empty());
    assert!(rating_distribution(&filtered)?.is_empty());
    assert!(year_type_percent(&filtered, 1980)?.is_empty());
    Ok(())
}

#[test]
fn explode_is_size_additive_over_loaded_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = Catalog::load(&write_sample_csv(&dir)?)?;

    let listed = catalog.frame().column(COL_LISTED_IN)?.str()?;
    let expected: usize = listed
        .iter()
        .flatten()
        .map(|v| catalens::split_genres(v).count())
        .sum();

    let exploded = explode(&catalog)?;
    assert_eq!(exploded.height(), expected);
    // 2 + 1 + 1 + 0 + 1 genres across the five records.
    assert_eq!(exploded.height(), 5);
    Ok(())
}

#[test]
fn genre_filter_selects_by_split_membership() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = Catalog::load(&write_sample_csv(&dir)?)?;
    let spec = FilterSpec {
        genres: vec!["Drama".to_string()],
        ..FilterSpec::default()
    };
    // s1 ("Drama, Comedy"), s2 ("Drama"), s5 ("Drama").
    assert_eq!(catalog.filter(&spec)?.height(), 3);
    Ok(())
}

#[test]
fn three_record_scenario_matches_expected_series() -> Result<()> {
    let catalog = three_record_scenario()?;

    let exploded = explode(&catalog)?;
    assert_eq!(exploded.height(), 3);

    let ranked = top_n(&genre_frequency(&exploded)?, 10);
    assert_eq!(
        ranked,
        vec![("Drama".to_string(), 2), ("Comedy".to_string(), 1)]
    );

    let rows = year_type_percent(&catalog, 1980)?;
    assert_eq!(rows.len(), 2);
    let (year, ty, percent) = &rows[0];
    assert_eq!((*year, ty.as_str()), (2015, "Movie"));
    assert!((percent - 66.67).abs() < 0.01);
    let (year, ty, percent) = &rows[1];
    assert_eq!((*year, ty.as_str()), (2015, "TV Show"));
    assert!((percent - 33.33).abs() < 0.01);

    let total: f64 = rows.iter().map(|(_, _, p)| p).sum();
    assert!((total - 100.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn filter_cache_returns_same_frames_as_direct_filtering() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = Catalog::load(&write_sample_csv(&dir)?)?;
    let spec = FilterSpec {
        types: Some(vec!["Movie".to_string()]),
        year_range: Some((2000, 2020)),
        genres: Vec::new(),
    };

    let direct = catalog.filter(&spec)?;
    let mut cache = FilterCache::new(catalog);
    let cached = cache.filtered(&spec)?;
    assert_eq!(cached.height(), direct.height());
    assert_eq!(rating_distribution(cached)?, rating_distribution(&direct)?);
    Ok(())
}
