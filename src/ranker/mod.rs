//! Flip scoring and partitioning.
//!
//! The reference average comes from sold listings and is fixed for the whole
//! ranking run. Active listings are split into three exclusive buckets:
//! clean (passes the deny-list and sits under the discount threshold),
//! sketchy (fails the deny-list but not the narrower packaging/part set),
//! and excluded (everything else that survived normalization).

use crate::filter::NoiseFilter;
use crate::models::{Listing, SortMode};

#[derive(Debug, Clone)]
pub struct RankOptions {
    pub sort: SortMode,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Clean ceiling as a fraction of the average sold price.
    pub discount_threshold: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            sort: SortMode::FlipScore,
            min_price: None,
            max_price: None,
            discount_threshold: 0.85,
        }
    }
}

#[derive(Debug, Default)]
pub struct Partitions {
    pub clean: Vec<Listing>,
    pub sketchy: Vec<Listing>,
    /// Survived normalization but fits neither partition: out of range, over
    /// the clean threshold, or caught by the narrow packaging/part set.
    pub excluded: Vec<Listing>,
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Mean sold price rounded to 2 decimal places. `None` on empty input —
/// callers must treat that as "no data" and skip scoring entirely.
pub fn average_price(sold: &[Listing]) -> Option<f64> {
    if sold.is_empty() {
        return None;
    }
    let sum: f64 = sold.iter().map(|l| l.price).sum();
    Some(round2(sum / sold.len() as f64))
}

/// Bounded discount score: how far `price` sits below `avg_price`, as an
/// integer percentage clamped into [0, 100]. Callers guarantee
/// `avg_price > 0`.
pub fn flip_score(price: f64, avg_price: f64) -> u8 {
    let raw = ((1.0 - price / avg_price) * 100.0).round();
    raw.clamp(0.0, 100.0) as u8
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ── Partitioning ──────────────────────────────────────────────────────────────

/// Partition, score, and sort active listings against a known average.
pub fn rank(
    active: Vec<Listing>,
    filter: &NoiseFilter,
    avg_price: f64,
    opts: &RankOptions,
) -> Partitions {
    let threshold = avg_price * opts.discount_threshold;
    let mut parts = Partitions::default();

    for mut listing in active {
        listing.flip_score = Some(flip_score(listing.price, avg_price));

        if !in_range(listing.price, opts) {
            parts.excluded.push(listing);
        } else if filter.is_clean(&listing.title) {
            if listing.price <= threshold {
                parts.clean.push(listing);
            } else {
                parts.excluded.push(listing);
            }
        } else if filter.is_sketchy_candidate(&listing.title) {
            parts.sketchy.push(listing);
        } else {
            parts.excluded.push(listing);
        }
    }

    sort_listings(&mut parts.clean, opts.sort);
    sort_listings(&mut parts.sketchy, opts.sort);
    parts
}

fn in_range(price: f64, opts: &RankOptions) -> bool {
    if let Some(min) = opts.min_price {
        if price < min {
            return false;
        }
    }
    if let Some(max) = opts.max_price {
        if price > max {
            return false;
        }
    }
    true
}

/// Stable sorts only — flip-score ties keep their page order.
fn sort_listings(listings: &mut [Listing], mode: SortMode) {
    match mode {
        SortMode::FlipScore => {
            listings.sort_by_key(|l| std::cmp::Reverse(l.flip_score.unwrap_or(0)))
        }
        SortMode::PriceAsc => listings.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortMode::PriceDesc => listings.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;

    fn listing(title: &str, price: f64) -> Listing {
        Listing {
            title: title.to_string(),
            price,
            url: None,
            image_url: None,
            flip_score: None,
        }
    }

    fn filter() -> NoiseFilter {
        NoiseFilter::new(&FilterConfig {
            deny_keywords: vec!["broken".into(), "box only".into(), "case".into()],
            sketchy_keywords: vec!["box only".into(), "case".into()],
        })
    }

    #[test]
    fn test_flip_score_scenarios() {
        assert_eq!(flip_score(80.0, 100.0), 20);
        assert_eq!(flip_score(100.0, 100.0), 0);
        assert_eq!(flip_score(150.0, 100.0), 0); // clamped, never negative
        assert_eq!(flip_score(0.0, 100.0), 100);
    }

    #[test]
    fn test_flip_score_bounds() {
        for price in [0.0, 0.01, 5.0, 99.99, 100.0, 1e6] {
            let score = flip_score(price, 42.50);
            assert!(score <= 100);
        }
    }

    #[test]
    fn test_flip_score_monotonic_in_price() {
        let avg = 73.21;
        let mut prev = flip_score(0.0, avg);
        for cents in 1..=20_000u32 {
            let score = flip_score(cents as f64 / 100.0, avg);
            assert!(score <= prev);
            prev = score;
        }
    }

    #[test]
    fn test_average_price_rounds_to_cents() {
        let sold = vec![listing("a", 10.00), listing("b", 10.01), listing("c", 10.01)];
        assert_eq!(average_price(&sold), Some(10.01));
    }

    #[test]
    fn test_average_price_empty_is_none() {
        assert_eq!(average_price(&[]), None);
    }

    #[test]
    fn test_partitions_are_exclusive() {
        let active = vec![
            listing("AirPods sealed", 50.0),
            listing("AirPods broken", 30.0),
            listing("AirPods box only", 10.0),
            listing("AirPods near mint", 95.0),
        ];
        let parts = rank(active, &filter(), 100.0, &RankOptions::default());

        let clean_keys: Vec<_> = parts.clean.iter().map(|l| l.key()).collect();
        for l in &parts.sketchy {
            assert!(!clean_keys.contains(&l.key()));
        }

        assert_eq!(parts.clean.len(), 1); // sealed @ 50 (mint @ 95 over threshold)
        assert_eq!(parts.sketchy.len(), 1); // broken
        assert_eq!(parts.excluded.len(), 2); // box only + over-threshold mint
    }

    #[test]
    fn test_clean_requires_price_under_threshold() {
        let parts = rank(
            vec![listing("AirPods", 85.0), listing("AirPods lot", 85.01)],
            &filter(),
            100.0,
            &RankOptions::default(),
        );
        assert_eq!(parts.clean.len(), 1);
        assert_eq!(parts.clean[0].price, 85.0);
        assert_eq!(parts.excluded.len(), 1);
    }

    #[test]
    fn test_price_range_filters_both_partitions() {
        let opts = RankOptions {
            min_price: Some(20.0),
            max_price: Some(60.0),
            ..Default::default()
        };
        let active = vec![
            listing("AirPods cheap", 10.0),
            listing("AirPods fair", 40.0),
            listing("broken AirPods", 70.0),
        ];
        let parts = rank(active, &filter(), 100.0, &opts);
        assert_eq!(parts.clean.len(), 1);
        assert!(parts.sketchy.is_empty());
        assert_eq!(parts.excluded.len(), 2);
    }

    #[test]
    fn test_scores_attached_to_all_partitions() {
        let parts = rank(
            vec![listing("AirPods", 60.0), listing("broken AirPods", 40.0)],
            &filter(),
            100.0,
            &RankOptions::default(),
        );
        assert_eq!(parts.clean[0].flip_score, Some(40));
        assert_eq!(parts.sketchy[0].flip_score, Some(60));
    }

    #[test]
    fn test_sort_by_score_is_stable() {
        let active = vec![
            listing("first at 50", 50.0),
            listing("second at 50", 50.0),
            listing("deal", 25.0),
        ];
        let parts = rank(active, &filter(), 100.0, &RankOptions::default());
        let titles: Vec<_> = parts.clean.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["deal", "first at 50", "second at 50"]);
    }

    #[test]
    fn test_sort_by_price() {
        let opts = RankOptions { sort: SortMode::PriceAsc, ..Default::default() };
        let parts = rank(
            vec![listing("b", 30.0), listing("a", 10.0), listing("c", 20.0)],
            &filter(),
            100.0,
            &opts,
        );
        let prices: Vec<_> = parts.clean.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0]);
    }
}
