//! Pipeline orchestrator: ties source → cleaner → filter → ranker together.
//!
//! One scan is two sequential fetches:
//!   1. Sold/completed listings → normalize, deny-filter, average → reference price
//!   2. Active listings → normalize, partition, score, sort → report
//!
//! Fetch and parse failures never escape this module: a failed fetch is an
//! empty listing set, and the only hard failure a scan can report is an empty
//! sold set, which makes the reference average (and therefore scoring)
//! undefined.

use crate::config::AppConfig;
use crate::filter::NoiseFilter;
use crate::models::{Listing, ScanError, ScanReport, SearchMode};
use crate::ranker::{self, RankOptions};
use crate::scraper::cleaner::normalize_listing;
use crate::scraper::{EbaySearchScraper, ListingSource};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Scanner {
    source: Arc<dyn ListingSource>,
    filter: NoiseFilter,
    config: AppConfig,
}

impl Scanner {
    pub fn new(config: AppConfig) -> Result<Self> {
        let source = EbaySearchScraper::new(&config.scraper)
            .context("Failed to build scraper")?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    pub fn with_source(config: AppConfig, source: Arc<dyn ListingSource>) -> Self {
        let filter = NoiseFilter::new(&config.filter);
        Self { source, filter, config }
    }

    pub fn filter(&self) -> &NoiseFilter {
        &self.filter
    }

    /// Run one query end to end. Listings are built fresh on every call;
    /// nothing is cached across scans.
    pub async fn scan(&self, term: &str, opts: &RankOptions) -> Result<ScanReport, ScanError> {
        // ── 1. Reference average from sold listings ───────────────────────────
        let sold = self.fetch_normalized(term, SearchMode::SoldCompleted).await;

        // Sold titles go through the same deny-list: a broken unit's closing
        // price would drag the reference average down.
        let sold: Vec<Listing> = sold
            .into_iter()
            .filter(|l| self.filter.is_clean(&l.title))
            .collect();

        // A zero average (every sold listing at $0.00) is as useless as an
        // empty set: the discount ratio is undefined, so scoring must not run.
        let avg_price = ranker::average_price(&sold)
            .filter(|avg| *avg > 0.0)
            .ok_or_else(|| ScanError::NoHistoricalData { term: term.to_string() })?;

        info!("\"{}\": avg sold price {:.2} over {} listings", term, avg_price, sold.len());

        // ── 2. Partition and score active listings ────────────────────────────
        let active = self.fetch_normalized(term, SearchMode::Active).await;
        let parts = ranker::rank(active, &self.filter, avg_price, &opts);

        info!(
            "\"{}\": {} clean, {} sketchy, {} excluded",
            term,
            parts.clean.len(),
            parts.sketchy.len(),
            parts.excluded.len()
        );

        let sold_count = sold.len();
        let mut sold_sample = sold;
        sold_sample.truncate(self.config.ranker.sold_sample_size);

        Ok(ScanReport {
            term: term.to_string(),
            average_price: avg_price,
            sold_count,
            sold_sample,
            clean: parts.clean,
            sketchy: parts.sketchy,
            excluded_count: parts.excluded.len(),
            fetched_at: Utc::now().naive_utc(),
        })
    }

    /// Fetch one result set and normalize it. Transport errors degrade to an
    /// empty set here; records without a parseable price are dropped
    /// silently.
    async fn fetch_normalized(&self, term: &str, mode: SearchMode) -> Vec<Listing> {
        let raw = match self.source.fetch_listings(term, mode).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("\"{}\" ({:?}): fetch failed: {:#}", term, mode, e);
                Vec::new()
            }
        };

        raw.iter().filter_map(normalize_listing).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
