use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, AppResult};

const FETCH_TIMEOUT_SECS: u64 = 5;

// Unwrap is fine: the pattern is a compile-time constant
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Absolute URLs literally present in the text, in order of appearance.
pub fn find_urls(text: &str) -> Vec<String> {
    URL_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Check if a hostname resolves to a private/internal IP range (SSRF protection)
fn is_private_host(host: &str) -> bool {
    let host_lower = host.to_lowercase();
    if host_lower == "localhost"
        || host_lower == "127.0.0.1"
        || host_lower == "::1"
        || host_lower == "0.0.0.0"
        || host_lower == "[::1]"
    {
        return true;
    }
    if host_lower.starts_with("10.")
        || host_lower.starts_with("192.168.")
        || host_lower.starts_with("169.254.")
    {
        return true;
    }
    // 172.16.0.0 - 172.31.255.255
    if host_lower.starts_with("172.") {
        if let Some(second) = host_lower.strip_prefix("172.").and_then(|s| s.split('.').next()) {
            if let Ok(n) = second.parse::<u8>() {
                if (16..=31).contains(&n) {
                    return true;
                }
            }
        }
    }
    false
}

/// Visible paragraph text of an HTML page, one `<p>` per line.
fn paragraph_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    // Unwrap is fine: "p" is a valid selector
    let selector = Selector::parse("p").unwrap();
    doc.select(&selector)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fetches pages linked from extracted text.
pub struct LinkFetcher {
    client: reqwest::Client,
}

impl LinkFetcher {
    pub fn new() -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn fetch_paragraphs(&self, raw_url: &str) -> Result<String, String> {
        let parsed = url::Url::parse(raw_url).map_err(|e| e.to_string())?;
        if let Some(host) = parsed.host_str() {
            if is_private_host(host) {
                return Err(format!("private/internal host '{host}' refused"));
            }
        }
        let resp = self.client.get(parsed).send().await.map_err(|e| e.to_string())?;
        let body = resp.text().await.map_err(|e| e.to_string())?;
        Ok(paragraph_text(&body))
    }
}

/// Append the visible paragraph text of every URL found in `text`. A URL
/// that cannot be fetched gets an explicit failure marker instead; link
/// enrichment never fails the extraction that triggered it.
pub async fn enrich_with_links(text: &str, fetcher: &LinkFetcher) -> String {
    let mut enriched = text.to_string();
    for url in find_urls(text) {
        match fetcher.fetch_paragraphs(&url).await {
            Ok(page_text) => {
                eprintln!("[extract] fetched {} ({} chars)", url, page_text.len());
                enriched.push_str(&format!("\n--- Fetched from {url} ---\n{page_text}\n"));
            }
            Err(e) => {
                eprintln!("[extract] fetch failed for {url}: {e}");
                enriched.push_str(&format!("\n[Failed to fetch {url}]\n"));
            }
        }
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_urls() {
        let text = "see https://example.com/a and http://other.org/b?x=1 for details";
        assert_eq!(find_urls(text), vec!["https://example.com/a", "http://other.org/b?x=1"]);
    }

    #[test]
    fn test_find_urls_none() {
        assert!(find_urls("no links in here").is_empty());
        assert!(find_urls("ftp://not-http.example").is_empty());
    }

    #[test]
    fn test_find_urls_order_preserved() {
        let text = "first https://a.example then https://b.example";
        let urls = find_urls(text);
        assert_eq!(urls[0], "https://a.example");
        assert_eq!(urls[1], "https://b.example");
    }

    #[test]
    fn test_private_hosts_blocked() {
        assert!(is_private_host("localhost"));
        assert!(is_private_host("127.0.0.1"));
        assert!(is_private_host("10.0.0.5"));
        assert!(is_private_host("192.168.1.1"));
        assert!(is_private_host("172.20.0.3"));
        assert!(!is_private_host("172.32.0.1"));
        assert!(!is_private_host("example.com"));
    }

    #[test]
    fn test_paragraph_text() {
        let html = "<html><body><nav>menu</nav><p>First para.</p><div><p>Second <b>bold</b> para.</p></div></body></html>";
        assert_eq!(paragraph_text(html), "First para.\nSecond bold para.");
    }

    #[test]
    fn test_paragraph_text_no_paragraphs() {
        assert_eq!(paragraph_text("<html><body><h1>title only</h1></body></html>"), "");
    }

    #[test]
    fn test_fetcher_construction_succeeds() {
        assert!(LinkFetcher::new().is_ok());
    }

    #[tokio::test]
    async fn test_enrich_private_url_gets_failure_marker() {
        let fetcher = LinkFetcher::new().unwrap();
        let text = "internal dashboard at http://127.0.0.1:9999/status here";
        let enriched = enrich_with_links(text, &fetcher).await;
        assert!(enriched.starts_with(text));
        assert!(enriched.contains("[Failed to fetch http://127.0.0.1:9999/status"));
    }

    #[tokio::test]
    async fn test_enrich_without_urls_is_identity() {
        let fetcher = LinkFetcher::new().unwrap();
        let text = "nothing to fetch";
        assert_eq!(enrich_with_links(text, &fetcher).await, text);
    }
}
