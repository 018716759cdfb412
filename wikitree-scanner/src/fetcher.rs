use crate::error::{Result, ScanError};
use crate::keyword::{parse_keyword_from_url, resolve_link_url};
use crate::node::KeywordNode;
use reqwest::Client;
use scraper::{Html, Selector};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const CONTENT_SELECTOR: &str = "div.mw-parser-output";
const PARAGRAPH_SELECTOR: &str = "p";
const WIKI_LINK_SELECTOR: &str = r#"[href*="/wiki/"]"#;

/// Source of the keywords linked from a page's introduction paragraph.
pub trait IntroductionFetcher {
    /// Fetch `url` and return one node per internal wiki link in its
    /// introduction, in document order. Every returned node has the keyword
    /// of `url` as its parent keyword.
    fn fetch_introduction(&self, url: &str) -> impl Future<Output = Result<Vec<KeywordNode>>> + Send;
}

/// Fetches Wikipedia articles over HTTP, optionally through a relay prefix.
pub struct WikiFetcher {
    client: Client,
    proxy_prefix: Option<String>,
}

impl WikiFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("wikitree/0.1 (https://github.com/trapdoorsec/wikitree)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            proxy_prefix: None,
        })
    }

    /// Route every request through a relay, e.g. `http://localhost:8080/`.
    /// The page URL is appended verbatim to the prefix.
    pub fn with_proxy_prefix(mut self, prefix: String) -> Self {
        self.proxy_prefix = Some(prefix);
        self
    }

    fn request_url(&self, url: &str) -> String {
        match &self.proxy_prefix {
            Some(prefix) => format!("{}{}", prefix, url),
            None => url.to_string(),
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let request_url = self.request_url(url);
        debug!("Fetching {}", request_url);

        let response = self.client.get(&request_url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        if let Some(ref ct) = content_type
            && !ct.starts_with("text/")
        {
            return Err(ScanError::UnexpectedContent(format!(
                "{} returned {}",
                url, ct
            )));
        }

        Ok(response.text().await?)
    }
}

impl IntroductionFetcher for WikiFetcher {
    async fn fetch_introduction(&self, url: &str) -> Result<Vec<KeywordNode>> {
        let html = self.fetch_html(url).await?;
        extract_introduction_links(&html, url)
    }
}

/// Collect the internal wiki links of the first paragraph in the article body.
///
/// `page_url` is the address the HTML was fetched from; relative links are
/// resolved against it and its keyword becomes every node's parent keyword.
pub fn extract_introduction_links(html: &str, page_url: &str) -> Result<Vec<KeywordNode>> {
    let parent_keyword = parse_keyword_from_url(page_url)?;
    let document = Html::parse_document(html);

    let content_selector = selector(CONTENT_SELECTOR)?;
    let paragraph_selector = selector(PARAGRAPH_SELECTOR)?;
    let link_selector = selector(WIKI_LINK_SELECTOR)?;

    let content = document.select(&content_selector).next().ok_or_else(|| {
        ScanError::ParseError(format!("{}: no {} element", page_url, CONTENT_SELECTOR))
    })?;
    let paragraph = content.select(&paragraph_selector).next().ok_or_else(|| {
        ScanError::ParseError(format!("{}: no introduction paragraph", page_url))
    })?;

    let mut nodes = Vec::new();
    for element in paragraph.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        // Links without a resolvable keyword are skipped
        let Ok(url) = resolve_link_url(page_url, href) else {
            debug!("Skipping unresolvable link {}", href);
            continue;
        };
        let Ok(keyword) = parse_keyword_from_url(&url) else {
            debug!("Skipping link without keyword {}", url);
            continue;
        };
        debug!("Found keyword {} -> {}", keyword, url);
        nodes.push(KeywordNode::new(keyword, Some(parent_keyword.clone()), url));
    }

    Ok(nodes)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("bad selector {}: {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const FOOBAR_HTML: &str = r##"<html><body>
        <div id="content">
          <p><a href="/wiki/Outside">not in the article body</a></p>
          <div class="mw-parser-output">
            <table><tr><td><a href="/wiki/Infobox">infobox</a></td></tr></table>
            <p><b>foobar</b> is a
              <a href="/wiki/%E3%83%A1%E3%82%BF%E6%A7%8B%E6%96%87%E5%A4%89%E6%95%B0">metasyntactic variable</a>
              used in <a href="/wiki/%E3%83%97%E3%83%AD%E3%82%B0%E3%83%A9%E3%83%9F%E3%83%B3%E3%82%B0%E8%A8%80%E8%AA%9E">programming</a>
              <sup><a href="#cite_note-1">[1]</a></sup>
              <a href="https://en.wikipedia.org/wiki/Foobar">english</a>
              <a href="/w/index.php?title=Edit">edit</a>
            </p>
            <p>Second paragraph with <a href="/wiki/Ignored">another link</a>.</p>
          </div>
        </div>
    </body></html>"##;

    #[test]
    fn test_extract_first_paragraph_links_only() {
        let nodes =
            extract_introduction_links(FOOBAR_HTML, "https://ja.wikipedia.org/wiki/Foobar").unwrap();

        let keywords: Vec<&str> = nodes.iter().map(|n| n.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["メタ構文変数", "プログラミング言語", "Foobar"]);

        assert_eq!(
            nodes[0].url,
            "https://ja.wikipedia.org/wiki/%E3%83%A1%E3%82%BF%E6%A7%8B%E6%96%87%E5%A4%89%E6%95%B0"
        );
        assert_eq!(nodes[2].url, "https://en.wikipedia.org/wiki/Foobar");

        for node in &nodes {
            assert_eq!(node.parent_keyword.as_deref(), Some("Foobar"));
            assert!(node.children.is_none());
        }
    }

    #[test]
    fn test_extract_paragraph_without_links() {
        let html = r#"<div class="mw-parser-output"><p>Plain text.</p></div>"#;
        let nodes = extract_introduction_links(html, "https://ja.wikipedia.org/wiki/Foobar").unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_extract_skips_links_without_keyword() {
        let html = r#"<div class="mw-parser-output"><p>
            <a href="/wiki/A">A</a>
            <a href="mailto:help/wiki/contact">mail</a>
            <a href="/wiki/B">B</a>
        </p></div>"#;
        let nodes = extract_introduction_links(html, "https://ja.wikipedia.org/wiki/Foobar").unwrap();

        let keywords: Vec<&str> = nodes.iter().map(|n| n.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["A", "B"]);
    }

    #[test]
    fn test_extract_missing_content_region() {
        let html = "<html><body><p><a href=\"/wiki/A\">A</a></p></body></html>";
        let result = extract_introduction_links(html, "https://ja.wikipedia.org/wiki/Foobar");
        assert!(matches!(result, Err(ScanError::ParseError(_))));
    }

    #[test]
    fn test_extract_missing_paragraph() {
        let html = r#"<div class="mw-parser-output"><ul><li>no paragraph</li></ul></div>"#;
        let result = extract_introduction_links(html, "https://ja.wikipedia.org/wiki/Foobar");
        assert!(matches!(result, Err(ScanError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_fetch_introduction_from_server() {
        let mock_server = MockServer::start().await;

        let html = r#"<html><body><div class="mw-parser-output">
            <p><a href="/wiki/Bar">Bar</a> and <a href="/wiki/Baz">Baz</a></p>
        </div></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/wiki/Foobar"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=UTF-8")
                    .set_body_bytes(html.as_bytes()),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = WikiFetcher::new().unwrap();
        let page_url = format!("{}/wiki/Foobar", mock_server.uri());
        let nodes = fetcher.fetch_introduction(&page_url).await.unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].keyword, "Bar");
        assert_eq!(nodes[0].url, format!("{}/wiki/Bar", mock_server.uri()));
        assert_eq!(nodes[1].keyword, "Baz");
        assert_eq!(nodes[1].parent_keyword.as_deref(), Some("Foobar"));
    }

    #[tokio::test]
    async fn test_fetch_through_proxy_prefix() {
        let mock_server = MockServer::start().await;

        let html = r#"<div class="mw-parser-output"><p><a href="/wiki/Bar">Bar</a></p></div>"#;

        Mock::given(method("GET"))
            .and(path("/https://example.org/wiki/Foobar"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(html.as_bytes()),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = WikiFetcher::new()
            .unwrap()
            .with_proxy_prefix(format!("{}/", mock_server.uri()));
        let nodes = fetcher
            .fetch_introduction("https://example.org/wiki/Foobar")
            .await
            .unwrap();

        // Links resolve against the article host, not the relay
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].url, "https://example.org/wiki/Bar");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/Missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = WikiFetcher::new().unwrap();
        let result = fetcher
            .fetch_introduction(&format!("{}/wiki/Missing", mock_server.uri()))
            .await;

        assert!(matches!(result, Err(ScanError::HttpError(_))));
    }

    #[tokio::test]
    async fn test_fetch_non_text_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/Logo.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]),
            )
            .mount(&mock_server)
            .await;

        let fetcher = WikiFetcher::new().unwrap();
        let result = fetcher
            .fetch_introduction(&format!("{}/wiki/Logo.png", mock_server.uri()))
            .await;

        assert!(matches!(result, Err(ScanError::UnexpectedContent(_))));
    }
}
