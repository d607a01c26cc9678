//! Title noise heuristics.
//!
//! Two keyword sets, both plain substring matches over the lowercased title:
//! the full deny-list decides what stays out of the clean partition, and the
//! narrower packaging/component subset decides what is too far gone even for
//! the sketchy partition. Recall-favoring on purpose: excluding a good
//! listing is acceptable, admitting a bad one erodes trust in the results.

use crate::config::FilterConfig;
use crate::scraper::cleaner::is_placeholder;

pub struct NoiseFilter {
    deny_keywords: Vec<String>,
    sketchy_keywords: Vec<String>,
}

impl NoiseFilter {
    /// Build from config, lowercasing every keyword once up front.
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            deny_keywords: config.deny_keywords.iter().map(|k| k.to_lowercase()).collect(),
            sketchy_keywords: config
                .sketchy_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// A clean title contains no deny-list keyword and is not a placeholder.
    pub fn is_clean(&self, title: &str) -> bool {
        if is_placeholder(title) {
            return false;
        }
        let lower = title.to_lowercase();
        !self.deny_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// A non-clean title still qualifies for the sketchy partition unless it
    /// trips the narrower packaging/component set or the placeholder check.
    pub fn is_sketchy_candidate(&self, title: &str) -> bool {
        if is_placeholder(title) {
            return false;
        }
        let lower = title.to_lowercase();
        !self.sketchy_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    pub fn deny_keywords(&self) -> &[String] {
        &self.deny_keywords
    }

    pub fn sketchy_keywords(&self) -> &[String] {
        &self.sketchy_keywords
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;

    fn filter() -> NoiseFilter {
        NoiseFilter::new(&FilterConfig {
            deny_keywords: vec![
                "broken".into(),
                "for parts".into(),
                "box only".into(),
                "case".into(),
            ],
            sketchy_keywords: vec!["box only".into(), "case".into()],
        })
    }

    #[test]
    fn test_clean_title_passes() {
        assert!(filter().is_clean("AirPods 2nd Generation sealed"));
    }

    #[test]
    fn test_deny_keyword_is_case_insensitive() {
        let f = filter();
        assert!(!f.is_clean("BROKEN AirPods"));
        assert!(!f.is_clean("airpods For Parts"));
        assert!(!f.is_clean("Airpods BoX OnLy"));
    }

    #[test]
    fn test_failed_clean_can_still_be_sketchy() {
        let f = filter();
        // "broken" fails the deny-list but is not in the narrow set.
        assert!(!f.is_clean("broken AirPods"));
        assert!(f.is_sketchy_candidate("broken AirPods"));
    }

    #[test]
    fn test_narrow_set_bars_sketchy_too() {
        let f = filter();
        assert!(!f.is_clean("AirPods box only"));
        assert!(!f.is_sketchy_candidate("AirPods box only"));
    }

    #[test]
    fn test_placeholder_fails_both() {
        let f = filter();
        assert!(!f.is_clean("Shop on eBay — $20.00"));
        assert!(!f.is_sketchy_candidate("Shop on eBay — $20.00"));
    }

    #[test]
    fn test_empty_title_is_trivially_clean() {
        assert!(filter().is_clean(""));
    }
}
