//! `link` response header parsing
//!
//! Ory paginates list endpoints with RFC 8288 style headers:
//!
//! ```text
//! </admin/identities?page_size=250&page_token=h9LfEKUi>; rel="first",</admin/identities?page_size=250&page_token=a8Ed2bz1>; rel="next"
//! ```
//!
//! The next page is whichever entry carries `rel="next"`, wherever it sits in
//! the header.

use regex::Regex;
use std::sync::LazyLock;

static LINK_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?P<url>[^>]*)>(?P<params>[^,<]*)").expect("link entry pattern is valid")
});

/// One `<url>; rel=...` entry of a `link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub url: String,
    pub rels: Vec<String>,
}

impl LinkEntry {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Split a raw `link` header into its entries
///
/// Entries without a `rel` parameter are kept with an empty rel list.
pub fn parse_link_header(header: &str) -> Vec<LinkEntry> {
    LINK_ENTRY
        .captures_iter(header)
        .map(|caps| {
            let url = caps["url"].trim().to_string();
            let rels = caps["params"]
                .split(';')
                .filter_map(|param| {
                    let (name, value) = param.split_once('=')?;
                    name.trim()
                        .eq_ignore_ascii_case("rel")
                        .then(|| value.trim().trim_matches('"').to_string())
                })
                .flat_map(|value| {
                    value
                        .split_whitespace()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect();
            LinkEntry { url, rels }
        })
        .collect()
}

/// Find the next-page URL in a raw `link` header
///
/// Returns `None` when no entry has `rel="next"`, which is how the last page
/// is signalled (it only carries `rel="first"`).
pub fn next_page_url(header: &str) -> Option<String> {
    parse_link_header(header)
        .into_iter()
        .find(|entry| entry.has_rel("next"))
        .map(|entry| entry.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_after_first() {
        let header = r#"</admin/identities?page_size=2&page_token=p1>; rel="first",</admin/identities?page_size=2&page_token=p2>; rel="next""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("/admin/identities?page_size=2&page_token=p2")
        );
    }

    #[test]
    fn test_next_not_last_entry() {
        let header = r#"<https://x.example/a?page_token=n>; rel="next", <https://x.example/a?page_token=f>; rel="first""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://x.example/a?page_token=n")
        );
    }

    #[test]
    fn test_single_entry_is_last_page() {
        let header = r#"</admin/identities?page_size=2&page_token=p1>; rel="first""#;
        assert_eq!(next_page_url(header), None);
    }

    #[test]
    fn test_unquoted_and_multi_value_rel() {
        assert_eq!(
            next_page_url("</a?page=2>; rel=next").as_deref(),
            Some("/a?page=2")
        );
        assert_eq!(
            next_page_url(r#"</a?page=2>; title="more"; rel="next last""#).as_deref(),
            Some("/a?page=2")
        );
    }

    #[test]
    fn test_rel_matching_is_exact_token() {
        let header = r#"</a?page=0>; rel="prev-next-ish""#;
        assert_eq!(next_page_url(header), None);
    }

    #[test]
    fn test_empty_and_malformed() {
        assert_eq!(next_page_url(""), None);
        assert_eq!(next_page_url("rel=\"next\""), None);
        assert!(parse_link_header("not a link").is_empty());
    }

    #[test]
    fn test_parse_entries() {
        let entries = parse_link_header(r#"</a>; rel="first", </b>"#);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].has_rel("first"));
        assert_eq!(entries[1].url, "/b");
        assert!(entries[1].rels.is_empty());
    }
}
