//! Robots policy module
//!
//! Caches one parsed robots.txt per origin for the lifetime of the
//! process (no TTL, no mid-run refresh) and owns the global politeness
//! delay, which a site's declared Crawl-delay can raise but nothing
//! lowers. The delay being process-wide rather than per-domain is a
//! known imprecision kept from the shipped behavior; a parallel crawler
//! would need per-domain delays and per-domain locking here.

mod parser;

pub use parser::ParsedRobots;

use crate::config::LogicConfig;
use crate::url::origin_of;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Timeout for robots.txt fetches
const ROBOTS_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-origin robots policy cache and politeness-delay owner
pub struct RobotsAuthority {
    client: Client,
    user_agent: String,
    respect_robots_txt: bool,
    delay: f64,
    policies: HashMap<String, ParsedRobots>,
}

impl RobotsAuthority {
    pub fn new(client: Client, logic: &LogicConfig) -> Self {
        Self {
            client,
            user_agent: logic.user_agent.clone(),
            respect_robots_txt: logic.respect_robots_txt,
            delay: logic.delay,
            policies: HashMap::new(),
        }
    }

    /// Current politeness delay in seconds
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Returns the cached policy for an origin, fetching it on first use
    ///
    /// Fetch or read failures cache an allow-all policy: robots problems
    /// must never halt crawling. A declared Crawl-delay for our agent
    /// raises the global delay on this first (and only) fetch.
    pub async fn policy_for(&mut self, origin: &str) -> &ParsedRobots {
        if !self.policies.contains_key(origin) {
            let policy = self.fetch_policy(origin).await;

            if let Some(declared) = policy.crawl_delay() {
                if declared > self.delay {
                    tracing::info!(
                        "Raising politeness delay to {}s (Crawl-delay from {})",
                        declared,
                        origin
                    );
                    self.delay = declared;
                }
            }

            self.policies.insert(origin.to_string(), policy);
        }

        &self.policies[origin]
    }

    /// Whether the URL may be fetched
    ///
    /// When `respect_robots_txt` is disabled this returns true without
    /// consulting (or fetching) any policy.
    pub async fn can_fetch(&mut self, url: &Url) -> bool {
        if !self.respect_robots_txt {
            return true;
        }

        let origin = match origin_of(url) {
            Ok(origin) => origin,
            Err(_) => return true,
        };

        let user_agent = self.user_agent.clone();
        let target = url.as_str().to_string();
        let allowed = self.policy_for(&origin).await.is_allowed(&target, &user_agent);

        if !allowed {
            tracing::debug!("URL disallowed by robots.txt: {}", target);
        }

        allowed
    }

    /// Sitemap URLs declared in the origin's robots.txt
    pub async fn sitemaps_for(&mut self, origin: &str) -> Vec<String> {
        self.policy_for(origin).await.sitemaps().to_vec()
    }

    async fn fetch_policy(&self, origin: &str) -> ParsedRobots {
        let robots_url = format!("{}/robots.txt", origin);

        let response = self
            .client
            .get(&robots_url)
            .timeout(ROBOTS_FETCH_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(content) => {
                    tracing::info!("Loaded robots.txt for {}", origin);
                    ParsedRobots::parse(&content, &self.user_agent)
                }
                Err(e) => {
                    tracing::warn!("Failed to read robots.txt body for {}: {}", origin, e);
                    ParsedRobots::allow_all()
                }
            },
            Ok(resp) => {
                tracing::warn!(
                    "robots.txt for {} returned HTTP {}, treating as allow-all",
                    origin,
                    resp.status()
                );
                ParsedRobots::allow_all()
            }
            Err(e) => {
                tracing::warn!("Failed to fetch robots.txt for {}: {}", origin, e);
                ParsedRobots::allow_all()
            }
        }
    }
}
