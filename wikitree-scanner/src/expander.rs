use crate::error::Result;
use crate::fetcher::IntroductionFetcher;
use crate::keyword::{is_no_search_keyword, parse_keyword_from_url};
use crate::node::{KeywordNode, TERMINAL_TAG, VISITED_TAG};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Maximum number of successful introduction fetches per expansion.
pub const FETCH_QUOTA: usize = 20;

/// Pause before every fetch so the wiki is not hammered.
pub const PACING_DELAY: Duration = Duration::from_millis(1000);

/// Called before each fetch with the 1-based fetch number and the keyword.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Bounded breadth-first expansion of the keywords reachable from a seed page.
pub struct Expander<F> {
    fetcher: F,
    fetch_quota: usize,
    progress_callback: Option<ProgressCallback>,
}

impl<F: IntroductionFetcher> Expander<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            fetch_quota: FETCH_QUOTA,
            progress_callback: None,
        }
    }

    pub fn with_fetch_quota(mut self, quota: usize) -> Self {
        self.fetch_quota = quota;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Expand from `seed_url` and return the flat, insertion-ordered worklist.
    ///
    /// Nodes are visited strictly in list order and newly found keywords are
    /// appended to the tail, so the walk is breadth first. A visited node is
    /// either fetched, tagged `$` (no-search keyword) or tagged `@` (already
    /// fetched). When the quota is used up, every node not yet visited is
    /// tagged `$`. Any fetch error aborts the whole expansion.
    pub async fn expand(&self, seed_url: &str) -> Result<Vec<KeywordNode>> {
        info!("Starting keyword expansion from {}", seed_url);

        let mut worklist = vec![KeywordNode::root(
            parse_keyword_from_url(seed_url)?,
            seed_url.to_string(),
        )];
        let mut fetched_history: HashSet<String> = HashSet::new();

        let mut cursor = 0;
        while fetched_history.len() < self.fetch_quota {
            let Some(node) = worklist.get_mut(cursor) else {
                debug!("Worklist exhausted after {} nodes", cursor);
                break;
            };

            if is_no_search_keyword(&node.keyword) {
                debug!("Skipping no-search keyword {}", node.keyword);
                node.tag(TERMINAL_TAG);
            } else if fetched_history.contains(&node.keyword) {
                debug!("Already fetched {}", node.keyword);
                node.tag(VISITED_TAG);
            } else {
                let keyword = node.keyword.clone();
                let url = node.url.clone();

                if let Some(ref callback) = self.progress_callback {
                    callback(fetched_history.len() + 1, keyword.clone());
                }

                tokio::time::sleep(PACING_DELAY).await;
                let discovered = self.fetcher.fetch_introduction(&url).await?;
                debug!("{} links to {} keywords", keyword, discovered.len());

                fetched_history.insert(keyword);
                worklist.extend(discovered);
            }

            cursor += 1;
        }

        for node in worklist.iter_mut().skip(cursor) {
            node.tag(TERMINAL_TAG);
        }

        info!(
            "Expansion complete. Fetched {} pages, discovered {} keywords",
            fetched_history.len(),
            worklist.len()
        );
        Ok(worklist)
    }
}
