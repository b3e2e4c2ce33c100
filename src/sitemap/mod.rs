//! Sitemap discovery and resolution
//!
//! Turns a configured source into frontier entries: robots.txt hints
//! plus conventional-path probes produce candidate sitemaps, sitemap
//! indexes are walked depth-first, and urlset entries are normalized
//! and appended to the frontier under a hard per-source cap.

mod parse;

pub use parse::{maybe_gunzip, parse_lastmod, parse_sitemap_document, SitemapDoc, UrlEntry};

use crate::config::{SourceEntry, SOURCE_URL_LIMIT};
use crate::frontier::{Frontier, FrontierEntry};
use crate::robots::RobotsAuthority;
use crate::url::{normalize_url, origin_of};
use crate::DredgeError;
use reqwest::{Client, StatusCode};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Conventional sitemap locations probed on every source
const SITEMAP_PROBE_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap.xml.gz",
    "/sitemap/sitemap.xml",
];

/// Timeout for HEAD existence probes
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for sitemap document fetches
const SITEMAP_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves sources into frontier entries via their sitemaps
pub struct SitemapResolver {
    /// URLs accepted so far, per source name; enforces the discovery cap
    counts: HashMap<String, usize>,
}

impl Default for SitemapResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SitemapResolver {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Discovers and expands sitemaps for one source, appending entries
    /// to the frontier
    ///
    /// Failures here never abort discovery of sibling sources: sitemap
    /// fetch and parse errors are logged and skipped, and a source with
    /// no discoverable sitemap at all falls back to a single entry for
    /// its own base URL.
    pub async fn discover(
        &mut self,
        client: &Client,
        authority: &mut RobotsAuthority,
        frontier: &mut Frontier,
        source: &SourceEntry,
    ) {
        let base = match normalize_url(&source.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping source {}: bad URL {}: {}", source.name, source.url, e);
                return;
            }
        };

        let origin = match origin_of(&base) {
            Ok(origin) => origin,
            Err(e) => {
                tracing::warn!("Skipping source {}: {}", source.name, e);
                return;
            }
        };

        // Robots hints first, then conventional paths, deduplicated
        let mut candidates = authority.sitemaps_for(&origin).await;
        for url in &candidates {
            tracing::info!("Sitemap from robots.txt: {}", url);
        }

        for path in SITEMAP_PROBE_PATHS {
            let probe_url = format!("{}{}", origin, path);
            if candidates.contains(&probe_url) {
                continue;
            }
            if self.probe(client, &probe_url).await {
                tracing::info!("Sitemap found at conventional path: {}", probe_url);
                candidates.push(probe_url);
            }
        }

        if candidates.is_empty() {
            tracing::warn!(
                "No sitemap found for {}, falling back to its base URL",
                source.url
            );
            frontier.push(FrontierEntry {
                url: base.as_str().to_string(),
                source_name: source.name.clone(),
                lastmod: None,
            });
            return;
        }

        // Depth-first walk: nested sitemaps are fully expanded before
        // their siblings. The visited set terminates cyclic index graphs.
        let mut stack: Vec<String> = candidates.into_iter().rev().collect();
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(sitemap_url) = stack.pop() {
            if self.capped(&source.name) {
                tracing::info!(
                    "Discovery cap ({}) reached for source {}, skipping remaining sitemaps",
                    SOURCE_URL_LIMIT,
                    source.name
                );
                break;
            }

            if !visited.insert(sitemap_url.clone()) {
                tracing::debug!("Already walked sitemap {}, skipping", sitemap_url);
                continue;
            }

            match self.load_sitemap(client, &sitemap_url).await {
                Ok(SitemapDoc::Index(nested)) => {
                    tracing::info!(
                        "Sitemap index with {} nested sitemaps: {}",
                        nested.len(),
                        sitemap_url
                    );
                    for loc in nested.into_iter().rev() {
                        stack.push(loc);
                    }
                }
                Ok(SitemapDoc::UrlSet(entries)) => {
                    self.collect_urls(authority, frontier, entries, source).await;
                }
                Ok(SitemapDoc::Unknown(root)) => {
                    tracing::warn!(
                        "Unknown sitemap document (root element '{}'): {}",
                        root,
                        sitemap_url
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to process sitemap {}: {}", sitemap_url, e);
                }
            }
        }
    }

    /// Whether the source has hit the discovery cap
    pub fn capped(&self, source_name: &str) -> bool {
        self.counts.get(source_name).copied().unwrap_or(0) >= SOURCE_URL_LIMIT
    }

    async fn collect_urls(
        &mut self,
        authority: &mut RobotsAuthority,
        frontier: &mut Frontier,
        entries: Vec<UrlEntry>,
        source: &SourceEntry,
    ) {
        let total = entries.len();
        tracing::info!("Found {} URLs in sitemap", total);

        let mut added = 0usize;
        let mut capped_out = false;

        for entry in entries {
            let count = self.counts.entry(source.name.clone()).or_insert(0);
            if *count >= SOURCE_URL_LIMIT {
                // Immediate stop: remaining entries in this document are
                // abandoned, and the caller stops walking this source.
                capped_out = true;
                break;
            }

            let url = match normalize_url(&entry.loc) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping sitemap entry {}: {}", entry.loc, e);
                    continue;
                }
            };

            if !authority.can_fetch(&url).await {
                continue;
            }

            let lastmod = entry.lastmod.as_deref().and_then(parse_lastmod);

            frontier.push(FrontierEntry {
                url: url.as_str().to_string(),
                source_name: source.name.clone(),
                lastmod,
            });

            *self.counts.entry(source.name.clone()).or_insert(0) += 1;
            added += 1;
        }

        if added == 0 && total > 0 && !capped_out {
            tracing::warn!(
                "All {} URLs in this sitemap were filtered out by robots.txt; \
                 check the domain's robots.txt or set respect_robots_txt = false",
                total
            );
        }

        tracing::info!("Added {} URLs from sitemap", added);
    }

    async fn load_sitemap(
        &self,
        client: &Client,
        sitemap_url: &str,
    ) -> Result<SitemapDoc, DredgeError> {
        tracing::info!("Parsing sitemap: {}", sitemap_url);

        let response = client
            .get(sitemap_url)
            .timeout(SITEMAP_FETCH_TIMEOUT)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| DredgeError::Http {
                url: sitemap_url.to_string(),
                source: e,
            })?;

        let bytes = response.bytes().await.map_err(|e| DredgeError::Http {
            url: sitemap_url.to_string(),
            source: e,
        })?;

        let bytes = maybe_gunzip(sitemap_url, &bytes)?;

        parse_sitemap_document(&bytes).map_err(|e| DredgeError::SitemapParse {
            url: sitemap_url.to_string(),
            message: e.to_string(),
        })
    }

    async fn probe(&self, client: &Client, probe_url: &str) -> bool {
        match client.head(probe_url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }
}
