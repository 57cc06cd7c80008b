use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Salvage-Ingest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub lexicon: LexiconConfig,
    /// Category name -> listing page URL, iterated in name order
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of in-flight page fetches
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Minimum time between requests to the same domain (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the random extra delay added per request (milliseconds)
    #[serde(rename = "random-delay-ms", default)]
    pub random_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Domains vehicle links may point at ("example.com" or "*.example.com")
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,
}

fn default_request_timeout() -> u64 {
    30
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    pub agent: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            agent: concat!("salvage-ingest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory holding one JSON snapshot per category
    #[serde(rename = "snapshot-dir")]
    pub snapshot_dir: String,

    /// Read snapshots instead of crawling
    #[serde(rename = "load-from-snapshot", default)]
    pub load_from_snapshot: bool,
}

/// Brand lexicon additions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconConfig {
    #[serde(rename = "extra-brands", default)]
    pub extra_brands: Vec<String>,
}
