//! Robots.txt directive collection
//!
//! The robots file is read as a map of the site rather than as an access
//! policy: every `Disallow` path and `Sitemap` URL is collected, whatever
//! user-agent group it appears in.

use robotstxt::{parse_robotstxt, RobotsParseHandler};

/// Directives harvested from one robots.txt body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsDirectives {
    /// Literal `Disallow` paths, in file order, without duplicates
    pub disallowed: Vec<String>,

    /// `Sitemap` URLs, in file order, without duplicates
    pub sitemaps: Vec<String>,
}

impl RobotsDirectives {
    /// Parses a robots.txt body
    ///
    /// Malformed lines are ignored by the underlying parser, so this never
    /// fails; unparseable input yields empty directives.
    pub fn parse(body: &str) -> Self {
        let mut collector = Collector::default();
        parse_robotstxt(body, &mut collector);
        collector.directives
    }

    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty() && self.sitemaps.is_empty()
    }
}

#[derive(Default)]
struct Collector {
    directives: RobotsDirectives,
}

impl RobotsParseHandler for Collector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, _user_agent: &str) {}

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_disallow(&mut self, _line_num: u32, value: &str) {
        let value = value.trim();
        if is_literal_path(value) && !self.directives.disallowed.iter().any(|p| p == value) {
            self.directives.disallowed.push(value.to_string());
        }
    }

    fn handle_sitemap(&mut self, _line_num: u32, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !self.directives.sitemaps.iter().any(|s| s == value) {
            self.directives.sitemaps.push(value.to_string());
        }
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}

/// Only concrete paths can be turned into URLs to visit
fn is_literal_path(value: &str) -> bool {
    value.starts_with('/') && !value.contains('*') && !value.ends_with('$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_disallow_paths() {
        let body = "User-agent: *\nDisallow: /admin\nDisallow: /private/\nAllow: /public";
        let directives = RobotsDirectives::parse(body);
        assert_eq!(directives.disallowed, vec!["/admin", "/private/"]);
        assert!(directives.sitemaps.is_empty());
    }

    #[test]
    fn test_collects_across_agent_groups() {
        let body = "User-agent: BadBot\nDisallow: /bad\n\nUser-agent: *\nDisallow: /all";
        let directives = RobotsDirectives::parse(body);
        assert_eq!(directives.disallowed, vec!["/bad", "/all"]);
    }

    #[test]
    fn test_skips_empty_and_wildcards() {
        let body = "User-agent: *\nDisallow:\nDisallow: /*.php\nDisallow: /end$\nDisallow: /ok";
        let directives = RobotsDirectives::parse(body);
        assert_eq!(directives.disallowed, vec!["/ok"]);
    }

    #[test]
    fn test_deduplicates() {
        let body = "User-agent: a\nDisallow: /x\n\nUser-agent: b\nDisallow: /x";
        assert_eq!(RobotsDirectives::parse(body).disallowed, vec!["/x"]);
    }

    #[test]
    fn test_collects_sitemaps() {
        let body = "Sitemap: https://example.com/sitemap.xml\nUser-agent: *\nDisallow: /tmp\n\
                    Sitemap: https://example.com/news.xml";
        let directives = RobotsDirectives::parse(body);
        assert_eq!(
            directives.sitemaps,
            vec![
                "https://example.com/sitemap.xml",
                "https://example.com/news.xml"
            ]
        );
        assert_eq!(directives.disallowed, vec!["/tmp"]);
    }

    #[test]
    fn test_garbage_input() {
        let directives = RobotsDirectives::parse("This is not valid robots.txt {{{");
        assert!(directives.is_empty());
    }
}
