pub mod error;
pub mod expand;
pub mod render;
pub mod tree;

use colored::Colorize;

pub use error::{Result, WikitreeError};
pub use expand::{ExpandOptions, ExpandProgressCallback, Expansion, build_fetcher, execute_expansion};
pub use render::{RenderFormat, render_tree};
pub use tree::{TreeError, build_tree};
pub use wikitree_scanner::FETCH_QUOTA;

const BANNER: &str = r#"
 __      __ _  _     _  _
 \ \    / /(_)| |__ (_)| |_  _ _  ___  ___
  \ \/\/ / | || / / | ||  _|| '_|/ -_)/ -_)
   \_/\_/  |_||_\_\ |_| \__||_|  \___|\___|
"#;

pub fn print_banner() {
    eprintln!("{}", BANNER.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        "keyword trees from Wikipedia introductions".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
