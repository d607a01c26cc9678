use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub filter: FilterConfig,
    pub ranker: RankerConfig,
}

/// Scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Title noise filtering — both keyword sets are plain data so they can be
/// extended from config without touching filter logic.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Full deny-list: any match excludes a title from the clean partition.
    #[serde(default = "default_deny_keywords")]
    pub deny_keywords: Vec<String>,

    /// Narrow packaging/component subset: a match here also bars a title
    /// from the sketchy partition.
    #[serde(default = "default_sketchy_keywords")]
    pub sketchy_keywords: Vec<String>,
}

/// Ranking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankerConfig {
    /// Clean listings must sit at or below this fraction of the average
    /// sold price.
    #[serde(default = "default_discount_threshold")]
    pub discount_threshold: f64,

    #[serde(default = "default_sold_sample_size")]
    pub sold_sample_size: usize,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://www.ebay.com/sch/i.html".to_string()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_request_delay_ms() -> u64 {
    800
}
fn default_jitter_ms() -> u64 {
    400
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()
}
fn default_discount_threshold() -> f64 {
    0.85
}
fn default_sold_sample_size() -> usize {
    10
}

fn default_deny_keywords() -> Vec<String> {
    [
        "broken",
        "not working",
        "for parts",
        "repair",
        "no sound",
        "empty box",
        "box only",
        "case",
        "charging case",
        "replacement",
        "parts only",
        "read description",
        "as-is",
        "defective",
        "damaged",
        "left only",
        "right only",
        "left ear",
        "right ear",
        "a2031",
        "a2032",
        "shop on ebay",
        "headphones",
        "bluetooth headset",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_sketchy_keywords() -> Vec<String> {
    [
        "empty box",
        "box only",
        "case",
        "charging case",
        "replacement",
        "for parts",
        "parts only",
        "left only",
        "right only",
        "left ear",
        "right ear",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("FLIPSCAN").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());
        Ok(app_cfg)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig {
                base_url: default_base_url(),
                timeout_secs: default_timeout_secs(),
                request_delay_ms: default_request_delay_ms(),
                jitter_ms: default_jitter_ms(),
                user_agent: default_user_agent(),
            },
            filter: FilterConfig {
                deny_keywords: default_deny_keywords(),
                sketchy_keywords: default_sketchy_keywords(),
            },
            ranker: RankerConfig {
                discount_threshold: default_discount_threshold(),
                sold_sample_size: default_sold_sample_size(),
            },
        }
    }
}
