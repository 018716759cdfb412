use crate::error::{Result, ScanError};
use percent_encoding::percent_decode_str;
use url::Url;

/// Trailing characters that mark a keyword as a general language or field of
/// study term ("...語", "...学"). Such pages are never expanded.
const NO_SEARCH_SUFFIXES: [char; 2] = ['語', '学'];

/// Extract the keyword from a wiki URL.
///
/// The keyword is the last path segment, percent-decoded:
/// `https://ja.wikipedia.org/wiki/Foobar` yields `Foobar`.
pub fn parse_keyword_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no path", url)))?;

    Ok(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

pub fn is_no_search_keyword(keyword: &str) -> bool {
    keyword
        .chars()
        .next_back()
        .is_some_and(|last| NO_SEARCH_SUFFIXES.contains(&last))
}

/// Resolve an `href` found on `page_url` to an absolute URL.
///
/// Absolute targets are kept as they are, anything else is resolved against
/// the page's host.
pub fn resolve_link_url(page_url: &str, href: &str) -> Result<String> {
    let base = Url::parse(page_url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", page_url, e)))?;
    let resolved = base
        .join(href)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", href, e)))?;

    Ok(resolved.to_string())
}
