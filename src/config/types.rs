use serde::Deserialize;

/// Main configuration structure for Dredge
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logic: LogicConfig,
    pub db: DbConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogicConfig {
    /// Seconds to wait between fetches. Raised at runtime when a site
    /// declares a larger Crawl-delay for our user agent.
    pub delay: f64,

    /// Sources to seed discovery from
    #[serde(default)]
    pub sources: Vec<SourceEntry>,

    /// Seconds before a stored document is considered due for a recheck
    #[serde(default = "default_recheck_interval")]
    pub recheck_interval: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// When false, robots.txt rules are ignored (crawl-delay is still read)
    #[serde(default = "default_respect_robots_txt")]
    pub respect_robots_txt: bool,
}

/// A named crawl source
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Short name recorded on every document from this source
    pub name: String,

    /// Base URL used for sitemap discovery
    pub url: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Path to the SQLite database file
    pub path: String,
}

fn default_recheck_interval() -> u64 {
    86400
}

fn default_user_agent() -> String {
    "SearchBot/1.0".to_string()
}

fn default_respect_robots_txt() -> bool {
    true
}
