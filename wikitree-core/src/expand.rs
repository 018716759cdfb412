use crate::error::Result;
use crate::tree::build_tree;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::warn;
use wikitree_scanner::{Expander, IntroductionFetcher, KeywordNode, WikiFetcher};

/// Options for configuring an expansion run
pub struct ExpandOptions {
    pub seed_url: String,
    pub fetch_quota: usize,
    pub show_progress_bar: bool,
}

/// Callback for reporting expansion progress messages
pub type ExpandProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Outcome of an expansion: the rebuilt tree plus run statistics
#[derive(Debug, Clone)]
pub struct Expansion {
    pub tree: KeywordNode,
    pub fetched: usize,
    pub discovered: usize,
}

/// Build the HTTP fetcher, optionally routed through a relay prefix
pub fn build_fetcher(proxy_prefix: Option<String>, timeout_secs: u64) -> Result<WikiFetcher> {
    let fetcher = WikiFetcher::with_timeout(timeout_secs)?;
    Ok(match proxy_prefix {
        Some(prefix) => fetcher.with_proxy_prefix(prefix),
        None => fetcher,
    })
}

/// Expand keywords from the seed page and rebuild them into a tree
pub async fn execute_expansion<F: IntroductionFetcher>(
    fetcher: F,
    options: ExpandOptions,
    progress_callback: Option<ExpandProgressCallback>,
) -> Result<Expansion> {
    let ExpandOptions {
        seed_url,
        fetch_quota,
        show_progress_bar,
    } = options;

    // "Searching in progress" spinner (only if enabled)
    let progress_bar = if show_progress_bar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Searching...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let fetched_count = Arc::new(AtomicUsize::new(0));

    let count_clone = fetched_count.clone();
    let pb_clone = progress_bar.clone();
    let expander = Expander::new(fetcher)
        .with_fetch_quota(fetch_quota)
        .with_progress_callback(Arc::new(move |fetch_number: usize, keyword: String| {
            count_clone.store(fetch_number, Ordering::Relaxed);
            let message = format!("Searching {}/{}: {}", fetch_number, fetch_quota, keyword);
            if let Some(ref pb) = pb_clone {
                pb.set_message(message.clone());
            }
            if let Some(ref callback) = progress_callback {
                callback(message);
            }
        }));

    let outcome = expander.expand(&seed_url).await;

    // Hide the spinner whether or not the run succeeded
    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let nodes = outcome.inspect_err(|e| warn!("Expansion of {} failed: {}", seed_url, e))?;
    let discovered = nodes.len();
    let tree = build_tree(nodes)?;

    Ok(Expansion {
        tree,
        fetched: fetched_count.load(Ordering::Relaxed),
        discovered,
    })
}
