pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::ScraperConfig;
use crate::models::{RawListing, SearchMode};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use self::http_client::HttpClient;
use self::parsers::parse_search_page;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable listing source abstraction.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self, term: &str, mode: SearchMode) -> Result<Vec<RawListing>>;
}

// ── eBay search scraper ───────────────────────────────────────────────────────

pub struct EbaySearchScraper {
    client: HttpClient,
    base_url: String,
}

impl EbaySearchScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search URL for a term, newest-first (`_sop=12`). Sold mode restricts
    /// to completed transactions; active mode to buy-it-now listings.
    fn search_url(&self, term: &str, mode: SearchMode) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Bad base URL {}", self.base_url))?;

        url.query_pairs_mut()
            .append_pair("_nkw", term)
            .append_pair("_sop", "12");

        match mode {
            SearchMode::SoldCompleted => {
                url.query_pairs_mut()
                    .append_pair("LH_Sold", "1")
                    .append_pair("LH_Complete", "1");
            }
            SearchMode::Active => {
                url.query_pairs_mut().append_pair("LH_BIN", "1");
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl ListingSource for EbaySearchScraper {
    async fn fetch_listings(&self, term: &str, mode: SearchMode) -> Result<Vec<RawListing>> {
        let url = self.search_url(term, mode)?;
        info!("Fetching {:?} results for \"{}\"", mode, term);

        let html = self
            .client
            .get_text(url.as_str())
            .await
            .with_context(|| format!("Failed to fetch search page for \"{}\"", term))?;

        let raw = parse_search_page(&html)?;
        debug!("\"{}\" ({:?}): {} raw records", term, mode, raw.len());

        Ok(raw)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;

    fn scraper() -> EbaySearchScraper {
        let config = ScraperConfig {
            base_url: "https://www.ebay.com/sch/i.html".into(),
            timeout_secs: 5,
            request_delay_ms: 0,
            jitter_ms: 0,
            user_agent: "test".into(),
        };
        EbaySearchScraper::new(&config).unwrap()
    }

    #[test]
    fn test_sold_url_has_completed_flags() {
        let url = scraper()
            .search_url("AirPods 2nd Generation", SearchMode::SoldCompleted)
            .unwrap();
        let q = url.query().unwrap();
        assert!(q.contains("_nkw=AirPods+2nd+Generation"));
        assert!(q.contains("LH_Sold=1"));
        assert!(q.contains("LH_Complete=1"));
    }

    #[test]
    fn test_active_url_has_bin_flag() {
        let url = scraper().search_url("AirPods", SearchMode::Active).unwrap();
        let q = url.query().unwrap();
        assert!(q.contains("LH_BIN=1"));
        assert!(!q.contains("LH_Sold"));
    }
}
