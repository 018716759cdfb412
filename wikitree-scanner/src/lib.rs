pub mod error;
pub mod expander;
pub mod fetcher;
pub mod keyword;
pub mod node;

pub use error::ScanError;
pub use expander::{Expander, FETCH_QUOTA, PACING_DELAY, ProgressCallback};
pub use fetcher::{IntroductionFetcher, WikiFetcher};
pub use node::KeywordNode;
