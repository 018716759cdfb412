use colored::Colorize;
use wikitree::{command_argument_builder, handle_run, handlers::init_tracing, parse_run_config};
use wikitree_core::print_banner;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();

    let config = match parse_run_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(2);
        }
    };

    // Show banner unless --quiet flag is set
    if !config.quiet {
        print_banner();
    }

    init_tracing();

    if let Err(e) = handle_run(config).await {
        eprintln!("{} {:#}", "✗ Search failed:".red().bold(), e);
        std::process::exit(1);
    }
}
