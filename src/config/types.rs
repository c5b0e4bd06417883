use serde::Deserialize;

/// Main configuration structure for Edition-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub collection: CollectionConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The collection being harvested
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Collection name, also the name of the on-disk folder
    pub name: String,

    /// URL of any one metadata document; its siblings are derived from it
    #[serde(rename = "sample-metadata-url")]
    pub sample_metadata_url: String,

    /// First edition ID of the primary range (inclusive)
    #[serde(rename = "first-edition-id")]
    pub first_edition_id: u64,

    /// Last edition ID of the primary range (inclusive)
    #[serde(rename = "last-edition-id")]
    pub last_edition_id: u64,

    /// Number of images that make the collection complete
    pub size: u64,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Whole-request timeout (milliseconds)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,

    /// Gateway that image content identifiers are resolved against
    #[serde(rename = "gateway-base", default = "default_gateway_base")]
    pub gateway_base: String,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            page_timeout: default_page_timeout(),
            gateway_base: default_gateway_base(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Retry and divert policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Consecutive failures at one edition before it is diverted
    #[serde(rename = "max-stuck-count", default = "default_max_stuck_count")]
    pub max_stuck_count: u32,

    /// Delay after a failed attempt (milliseconds)
    #[serde(default = "default_retry_delay")]
    pub delay: u64,

    /// How the delay grows with the stuck streak
    #[serde(default)]
    pub strategy: BackoffKind,

    /// Upper bound for the exponential strategy (milliseconds)
    #[serde(rename = "max-delay", default = "default_max_delay")]
    pub max_delay: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_stuck_count: default_max_stuck_count(),
            delay: default_retry_delay(),
            strategy: BackoffKind::default(),
            max_delay: default_max_delay(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that holds the `{collection}/` folder
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

pub const DEFAULT_GATEWAY_BASE: &str = "https://ipfs.io/ipfs";

fn default_page_timeout() -> u64 {
    30_000
}

fn default_gateway_base() -> String {
    DEFAULT_GATEWAY_BASE.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/69.0.3497.100 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_max_stuck_count() -> u32 {
    50
}

fn default_retry_delay() -> u64 {
    100
}

fn default_max_delay() -> u64 {
    30_000
}

fn default_root() -> String {
    ".".to_string()
}
