use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Raw listing (straight off the search page) ────────────────────────────────

/// One result block as scraped, before any cleaning. Every field is optional
/// because the markup gives no guarantees; the cleaner decides what survives.
#[derive(Debug, Clone, Default)]
pub struct RawListing {
    pub title: Option<String>,
    pub price_text: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

// ── Normalized listing ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub title: String,
    pub price: f64,
    pub url: Option<String>,
    pub image_url: Option<String>,
    /// Set by the ranker once a reference average is known; never part of
    /// the listing's identity.
    pub flip_score: Option<u8>,
}

impl Listing {
    pub fn key(&self) -> ListingKey {
        ListingKey {
            title: self.title.clone(),
            price_cents: (self.price * 100.0).round() as i64,
        }
    }
}

/// Deduplication identity: title + price to the cent. The search page exposes
/// no stable item id, so title/price collisions between distinct physical
/// listings are possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey {
    pub title: String,
    pub price_cents: i64,
}

// ── Query parameters ──────────────────────────────────────────────────────────

/// Which result set a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Completed transactions — only used to compute the reference average.
    SoldCompleted,
    /// Live buy-it-now listings — the candidates being ranked.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Descending flip score, ties kept in page order.
    #[default]
    FlipScore,
    PriceAsc,
    PriceDesc,
}

// ── Scan output ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub term: String,
    /// Mean sold price, rounded to 2 decimal places.
    pub average_price: f64,
    pub sold_count: usize,
    /// First few sold listings, for display only.
    pub sold_sample: Vec<Listing>,
    pub clean: Vec<Listing>,
    pub sketchy: Vec<Listing>,
    /// Listings that survived normalization but landed in neither partition.
    pub excluded_count: usize,
    pub fetched_at: NaiveDateTime,
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScanError {
    /// No sold listings came back, so there is no reference average and
    /// scoring must not run.
    #[error("no sold data found for \"{term}\"")]
    NoHistoricalData { term: String },
}
