use serde::{Deserialize, Serialize};

/// One candidate page found for a face, with its generated snippet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl SearchResult {
    /// Builds a result titled after the page's host name.
    pub fn for_page(link: &str, snippet: String) -> Self {
        Self {
            title: page_title(link),
            link: link.to_string(),
            snippet,
        }
    }
}

/// Host part of a URL (`https://a.example/b` → `a.example`).
pub fn page_title(link: &str) -> String {
    if let Some(host) = reqwest::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
    {
        return host;
    }
    let without_scheme = link.rsplit("//").next().unwrap_or(link);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::https("https://www.example.com/people/jane", "www.example.com")]
    #[case::port("http://example.org:8080/x?y=1", "example.org")]
    #[case::schemeless("example.net/about", "example.net")]
    #[case::bare_host("example.net", "example.net")]
    fn test_page_title_is_host(#[case] link: &str, #[case] expected: &str) {
        assert_eq!(page_title(link), expected);
    }

    #[test]
    fn test_for_page_keeps_link_and_snippet() {
        let r = SearchResult::for_page("https://a.example/b", "Name: A".into());
        assert_eq!(r.title, "a.example");
        assert_eq!(r.link, "https://a.example/b");
        assert_eq!(r.snippet, "Name: A");
    }
}
