use clap::arg;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikitree")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikitree")
        .about(
            "Follow the keywords linked from a Wikipedia article's introduction and print \
            them as a tree.",
        )
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(
            arg!(<URL>)
                .required(true)
                .help("The Wikipedia article to start from, e.g. https://ja.wikipedia.org/wiki/Foobar")
                .value_parser(clap::value_parser!(Url)),
        )
        .arg(
            arg!(--"proxy" <PREFIX>)
                .required(false)
                .help("Relay prefix prepended to every fetched URL, e.g. http://localhost:8080/"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Output format: text, json, html, markdown")
                .value_parser(["text", "json", "html", "markdown", "md"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save the tree to a file (default: print to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
