//! Data structures for cinefetch
//!
//! - **MovieRecord**: TMDB movie details payload, every field optional
//! - **Formatting**: display helpers that fall back to "N/A"

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback shown for any missing value
pub const NOT_AVAILABLE: &str = "N/A";

/// Separator used when joining genre and company names
pub const NAME_SEPARATOR: &str = " - ";

// =============================================================================
// Movie Models (TMDB)
// =============================================================================

/// Anything TMDB lists by name (genres, production companies)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    pub name: String,
}

impl Named {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Movie details as returned by TMDB `/movie/{id}`
///
/// Fields TMDB leaves out or sends as `null` are `None` (or empty lists).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// ISO date, e.g. "2021-09-15"
    #[serde(default)]
    pub release_date: Option<String>,
    /// Minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// 0.0 - 10.0
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Named>,
    /// Whole currency units
    #[serde(default)]
    pub budget: Option<u64>,
    /// Whole currency units
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub production_companies: Vec<Named>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Named>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Named>>::deserialize(deserializer)?.unwrap_or_default())
}

impl MovieRecord {
    /// Title, or "N/A"
    pub fn title_label(&self) -> String {
        display_or_default(self.title.as_deref(), NOT_AVAILABLE)
    }

    /// Year part of the release date ("2021-09-15" -> "2021")
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }

    /// Runtime in minutes ("155m"); zero counts as missing
    pub fn runtime_label(&self) -> String {
        display_or_default(
            self.runtime.filter(|&m| m > 0).map(|m| format!("{}m", m)),
            NOT_AVAILABLE,
        )
    }

    /// Rounded rating out of ten ("8/10"); missing rating shows as 0
    pub fn rating_label(&self) -> String {
        let rating = self.vote_average.unwrap_or(0.0).round() as i64;
        format!("{}/10", rating)
    }

    /// Vote count in parentheses ("(1234 votes)")
    pub fn votes_label(&self) -> String {
        format!("({} votes)", self.vote_count.unwrap_or(0))
    }

    pub fn overview_label(&self) -> String {
        display_or_default(self.overview.as_deref(), NOT_AVAILABLE)
    }

    pub fn genres_label(&self) -> String {
        join_names(&self.genres)
    }

    pub fn budget_label(&self) -> String {
        display_or_default(self.budget.and_then(millions), NOT_AVAILABLE)
    }

    pub fn revenue_label(&self) -> String {
        display_or_default(self.revenue.and_then(millions), NOT_AVAILABLE)
    }

    pub fn companies_label(&self) -> String {
        join_names(&self.production_companies)
    }

    /// Label/value rows shown under the title, in display order
    pub fn info_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Overview", self.overview_label()),
            ("Genres", self.genres_label()),
            ("Budget", self.budget_label()),
            ("Revenue", self.revenue_label()),
            ("Production Companies", self.companies_label()),
        ]
    }
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self
            .release_year()
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        write!(
            f,
            "{}{} - {} - ★ {}",
            self.title_label(),
            year,
            self.runtime_label(),
            self.rating_label()
        )
    }
}

// =============================================================================
// Formatting Helpers
// =============================================================================

/// Render `value`, or `fallback` when it is missing or renders empty
pub fn display_or_default<T: fmt::Display>(value: Option<T>, fallback: &str) -> String {
    value
        .map(|v| v.to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Names of each item, in order
pub fn pluck_names(items: &[Named]) -> Vec<&str> {
    items.iter().map(|n| n.name.as_str()).collect()
}

/// Names joined with " - ", or "N/A" for an empty list
fn join_names(items: &[Named]) -> String {
    let names = pluck_names(items);
    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(NAME_SEPARATOR)
    }
}

/// "$X.Y million", halves rounded up; zero counts as missing
fn millions(amount: u64) -> Option<String> {
    if amount == 0 {
        return None;
    }
    let tenths = amount.saturating_add(50_000) / 100_000;
    Some(format!("${}.{} million", tenths / 10, tenths % 10))
}

// =============================================================================
// Unit Tests
// =============================================================================
