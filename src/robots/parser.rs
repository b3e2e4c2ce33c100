//! Robots.txt parsing
//!
//! Allow/deny matching is delegated to the robotstxt crate. Crawl-delay
//! and Sitemap directives are not exposed by that crate, so they are
//! scanned out of the raw content here.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data for one origin
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty means allow all)
    content: String,
    /// Explicit allow-all, used when robots.txt could not be fetched
    allow_all: bool,
    /// Crawl-delay declared for the configured user agent, seconds
    crawl_delay: Option<f64>,
    /// Sitemap URLs declared anywhere in the file
    sitemaps: Vec<String>,
}

impl ParsedRobots {
    /// Parses robots.txt content, resolving directives for `user_agent`
    ///
    /// Crawl-delay resolution prefers a group naming the agent over a
    /// wildcard group. Sitemap directives are global and collected from
    /// the whole file.
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let mut current_agents: Vec<String> = Vec::new();
        let mut group_has_directives = false;
        let mut delay_for_agent: Option<f64> = None;
        let mut delay_for_wildcard: Option<f64> = None;
        let mut sitemaps: Vec<String> = Vec::new();

        let normalized_agent = user_agent.to_lowercase();

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A User-agent line after other directives starts a new group
                    if group_has_directives {
                        current_agents.clear();
                        group_has_directives = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_has_directives = true;
                    if let Ok(delay) = value.parse::<f64>() {
                        let names_agent = current_agents
                            .iter()
                            .any(|ua| ua != "*" && normalized_agent.contains(ua.as_str()));
                        let names_wildcard = current_agents.iter().any(|ua| ua == "*");

                        if names_agent {
                            delay_for_agent = Some(delay);
                        } else if names_wildcard {
                            delay_for_wildcard = Some(delay);
                        }
                    }
                }
                "sitemap" => {
                    if !value.is_empty() {
                        sitemaps.push(value.to_string());
                    }
                }
                _ => {
                    group_has_directives = true;
                }
            }
        }

        Self {
            content: content.to_string(),
            allow_all: false,
            crawl_delay: delay_for_agent.or(delay_for_wildcard),
            sitemaps,
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// Used as the fallback when robots.txt cannot be fetched or read.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
            crawl_delay: None,
            sitemaps: Vec::new(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Crawl-delay resolved for the configured user agent, if declared
    pub fn crawl_delay(&self) -> Option<f64> {
        self.crawl_delay
    }

    /// Sitemap URLs declared in the file
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let robots = ParsedRobots::allow_all();
        assert!(robots.is_allowed("https://example.com/any/path", "TestBot"));
        assert!(robots.is_allowed("https://example.com/admin", "TestBot"));
        assert_eq!(robots.crawl_delay(), None);
        assert!(robots.sitemaps().is_empty());
    }

    #[test]
    fn test_parse_disallow_all() {
        let robots = ParsedRobots::parse("User-agent: *\nDisallow: /", "TestBot");
        assert!(!robots.is_allowed("https://example.com/", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/page", "TestBot"));
    }

    #[test]
    fn test_parse_disallow_specific() {
        let robots = ParsedRobots::parse("User-agent: *\nDisallow: /admin", "TestBot");
        assert!(robots.is_allowed("https://example.com/", "TestBot"));
        assert!(robots.is_allowed("https://example.com/page", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/admin", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/admin/users", "TestBot"));
    }

    #[test]
    fn test_parse_specific_user_agent() {
        let content = "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /";
        let robots = ParsedRobots::parse(content, "GoodBot");
        assert!(robots.is_allowed("https://example.com/page", "GoodBot"));
        assert!(!robots.is_allowed("https://example.com/page", "BadBot"));
    }

    #[test]
    fn test_empty_robots_txt() {
        let robots = ParsedRobots::parse("", "TestBot");
        assert!(robots.is_allowed("https://example.com/any", "TestBot"));
    }

    #[test]
    fn test_crawl_delay_wildcard() {
        let robots = ParsedRobots::parse(
            "User-agent: *\nCrawl-delay: 10\nDisallow: /admin",
            "TestBot",
        );
        assert_eq!(robots.crawl_delay(), Some(10.0));
    }

    #[test]
    fn test_crawl_delay_specific_agent_preferred() {
        let content = "User-agent: TestBot\nCrawl-delay: 5\n\nUser-agent: *\nCrawl-delay: 10";
        assert_eq!(ParsedRobots::parse(content, "TestBot").crawl_delay(), Some(5.0));
        assert_eq!(
            ParsedRobots::parse(content, "OtherBot").crawl_delay(),
            Some(10.0)
        );
    }

    #[test]
    fn test_crawl_delay_absent() {
        let robots = ParsedRobots::parse("User-agent: *\nDisallow: /admin", "TestBot");
        assert_eq!(robots.crawl_delay(), None);
    }

    #[test]
    fn test_crawl_delay_decimal() {
        let robots = ParsedRobots::parse("User-agent: *\nCrawl-delay: 2.5", "TestBot");
        assert_eq!(robots.crawl_delay(), Some(2.5));
    }

    #[test]
    fn test_crawl_delay_case_insensitive() {
        let robots = ParsedRobots::parse("User-agent: TestBot\ncrawl-delay: 7", "testbot");
        assert_eq!(robots.crawl_delay(), Some(7.0));
    }

    #[test]
    fn test_crawl_delay_grouped_user_agents() {
        let content = "User-agent: BotA\nUser-agent: BotB\nCrawl-delay: 3";
        assert_eq!(ParsedRobots::parse(content, "BotA").crawl_delay(), Some(3.0));
        assert_eq!(ParsedRobots::parse(content, "BotB").crawl_delay(), Some(3.0));
        assert_eq!(ParsedRobots::parse(content, "BotC").crawl_delay(), None);
    }

    #[test]
    fn test_sitemap_directives_collected() {
        let content = "User-agent: *\nDisallow: /admin\n\nSitemap: https://example.com/sitemap.xml\nSitemap: https://example.com/news.xml";
        let robots = ParsedRobots::parse(content, "TestBot");
        assert_eq!(
            robots.sitemaps(),
            &[
                "https://example.com/sitemap.xml".to_string(),
                "https://example.com/news.xml".to_string()
            ]
        );
    }

    #[test]
    fn test_sitemap_directive_case_insensitive_key() {
        let robots = ParsedRobots::parse("SITEMAP: https://example.com/map.xml", "TestBot");
        assert_eq!(robots.sitemaps(), &["https://example.com/map.xml".to_string()]);
    }

    #[test]
    fn test_invalid_content_falls_back_to_allow() {
        let robots = ParsedRobots::parse("This is not valid robots.txt {{{", "TestBot");
        assert!(robots.is_allowed("https://example.com/any/path", "TestBot"));
    }
}
