use crate::models::{Listing, RawListing};
use regex::Regex;
use std::sync::LazyLock;

// ── Price parsing ─────────────────────────────────────────────────────────────

/// First run of digits with exactly two decimals, e.g. the "10.00" in
/// "$10.00 to $20.00". Price ranges deliberately resolve to the lower bound.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d{2})([^0-9]|$)").expect("price regex"));

/// The "Shop on eBay" ad tile that the search page injects into results,
/// always carrying the same dummy $20.00 price.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)shop on ebay\s*[-—]?\s*\$?20\.00").expect("placeholder regex")
});

/// Parse a price out of free-form currency text.
/// "$1,234.56" → 1234.56 | "$10.00 to $20.00" → 10.00 | "Free" → None
pub fn parse_price(s: &str) -> Option<f64> {
    let s = s.trim().replace(',', "");
    if s.is_empty() {
        return None;
    }
    let caps = PRICE_RE.captures(&s)?;
    caps.get(1)?.as_str().parse().ok()
}

/// True for the promotional placeholder tile. These never enter any
/// partition, regardless of the configured deny-list.
pub fn is_placeholder(title: &str) -> bool {
    let trimmed = title.trim();
    trimmed.eq_ignore_ascii_case("shop on ebay") || PLACEHOLDER_RE.is_match(trimmed)
}

// ── Raw record → Listing ──────────────────────────────────────────────────────

/// Normalize a raw scraped record. Returns `None` when the record has no
/// parseable price or is a placeholder tile; such records are dropped
/// silently — uncontrolled markup makes that a best-effort call, not an
/// error worth logging.
pub fn normalize_listing(raw: &RawListing) -> Option<Listing> {
    let title = raw.title.as_deref().unwrap_or("").trim().to_string();

    if is_placeholder(&title) {
        return None;
    }

    let price = parse_price(raw.price_text.as_deref()?)?;
    if price < 0.0 {
        return None;
    }

    Some(Listing {
        title,
        price,
        url: raw.url.clone(),
        image_url: raw.image_url.clone(),
        flip_score: None,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
