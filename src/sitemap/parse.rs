//! Sitemap document parsing
//!
//! Pure parsing of sitemap XML bodies, kept free of network concerns so
//! it can be tested against raw documents. The two document shapes are
//! distinguished by the root element, ignoring any namespace prefix.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use flate2::read::GzDecoder;
use std::io::Read;

/// A `<url>` entry from a urlset sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub loc: String,
    /// Raw `<lastmod>` text, if the element was present
    pub lastmod: Option<String>,
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDoc {
    /// `<sitemapindex>`: locations of nested sitemaps
    Index(Vec<String>),
    /// `<urlset>`: page entries
    UrlSet(Vec<UrlEntry>),
    /// Anything else; carries the root element name for logging
    Unknown(String),
}

/// Parses a sitemap XML body into its document shape
pub fn parse_sitemap_document(bytes: &[u8]) -> Result<SitemapDoc, quick_xml::Error> {
    let mut reader = quick_xml::Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut root: Option<String> = None;
    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut current_loc = String::new();
    let mut current_lastmod: Option<String> = None;

    let mut index_locs: Vec<String> = Vec::new();
    let mut url_entries: Vec<UrlEntry> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            quick_xml::events::Event::Start(ref e) => {
                let name = local_name(e.name().as_ref());

                match &root {
                    None => {
                        if name != "sitemapindex" && name != "urlset" {
                            return Ok(SitemapDoc::Unknown(name));
                        }
                        root = Some(name);
                    }
                    Some(root_tag) => {
                        let entry_tag = if root_tag == "sitemapindex" {
                            "sitemap"
                        } else {
                            "url"
                        };

                        if name == entry_tag {
                            in_entry = true;
                            current_loc.clear();
                            current_lastmod = None;
                        }
                        current_tag = name;
                    }
                }
            }
            quick_xml::events::Event::Text(ref e) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default();
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        match current_tag.as_str() {
                            "loc" => current_loc.push_str(trimmed),
                            "lastmod" => current_lastmod = Some(trimmed.to_string()),
                            _ => {}
                        }
                    }
                }
            }
            quick_xml::events::Event::End(ref e) => {
                let name = local_name(e.name().as_ref());

                if in_entry && (name == "sitemap" || name == "url") {
                    if !current_loc.is_empty() {
                        if name == "sitemap" {
                            index_locs.push(current_loc.clone());
                        } else {
                            url_entries.push(UrlEntry {
                                loc: current_loc.clone(),
                                lastmod: current_lastmod.take(),
                            });
                        }
                    }
                    in_entry = false;
                }
            }
            quick_xml::events::Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match root.as_deref() {
        Some("sitemapindex") => Ok(SitemapDoc::Index(index_locs)),
        Some("urlset") => Ok(SitemapDoc::UrlSet(url_entries)),
        // No root element at all: treat as an unknown document
        _ => Ok(SitemapDoc::Unknown(String::new())),
    }
}

/// Decompresses a sitemap body when its URL carries a `.gz` suffix
pub fn maybe_gunzip(sitemap_url: &str, bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    if !sitemap_url.ends_with(".gz") {
        return Ok(bytes.to_vec());
    }

    let mut decoder = GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Parses a `<lastmod>` value as an ISO-8601 timestamp, epoch seconds
///
/// Sitemaps carry anything from bare dates to full RFC 3339 stamps;
/// unparseable values yield None rather than an error.
pub fn parse_lastmod(text: &str) -> Option<i64> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp());
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }

    None
}

fn local_name(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.to_string(),
    }
}
