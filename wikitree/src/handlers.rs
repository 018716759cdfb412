use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;
use wikitree_core::{ExpandOptions, FETCH_QUOTA, RenderFormat, build_fetcher, execute_expansion, render_tree};

/// Everything a single run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub url: Url,
    pub proxy: Option<String>,
    pub timeout_secs: u64,
    pub format: RenderFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

pub fn parse_run_config(matches: &ArgMatches) -> Result<RunConfig, String> {
    let url = matches
        .get_one::<Url>("URL")
        .cloned()
        .ok_or_else(|| "An article URL must be provided".to_string())?;

    let format_name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = RenderFormat::from_str(format_name)
        .ok_or_else(|| format!("Unknown output format '{}'", format_name))?;

    Ok(RunConfig {
        url,
        proxy: matches
            .get_one::<String>("proxy")
            .map(|p| normalize_proxy_prefix(p)),
        timeout_secs: *matches.get_one::<u64>("timeout").unwrap_or(&10),
        format,
        output: matches.get_one::<PathBuf>("output").map(|p| expand_output_path(p)),
        quiet: matches.get_flag("quiet"),
    })
}

/// Make sure the relay prefix ends with a slash so the page URL forms a path
pub fn normalize_proxy_prefix(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    }
}

pub fn expand_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}

/// Write the rendered tree to `output`, or to stdout when no path is given
pub fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote result to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn handle_run(config: RunConfig) -> Result<()> {
    let RunConfig {
        url,
        proxy,
        timeout_secs,
        format,
        output,
        quiet,
    } = config;

    if !quiet {
        eprintln!("{} {}", "→".blue(), url.as_str().bright_white());
        if let Some(ref prefix) = proxy {
            eprintln!("{} via {}", "→".blue(), prefix.bright_white());
        }
    }

    let fetcher = build_fetcher(proxy, timeout_secs).context("Failed to set up HTTP client")?;
    let options = ExpandOptions {
        seed_url: url.to_string(),
        fetch_quota: FETCH_QUOTA,
        show_progress_bar: !quiet,
    };

    let expansion = execute_expansion(fetcher, options, None).await?;

    if !quiet {
        eprintln!(
            "{} Fetched {} pages, {} keywords, {} levels deep\n",
            "✓".green().bold(),
            expansion.fetched.to_string().cyan(),
            expansion.discovered.to_string().cyan(),
            expansion.tree.depth().to_string().cyan()
        );
    }

    let rendered = render_tree(&expansion.tree, format).context("Failed to render tree")?;
    write_output(&rendered, output.as_deref())?;

    if let Some(path) = output
        && !quiet
    {
        eprintln!(
            "{} Saved to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    Ok(())
}
