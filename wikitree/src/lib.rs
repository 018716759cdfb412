pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{
    RunConfig, expand_output_path, handle_run, normalize_proxy_prefix, parse_run_config,
    write_output,
};
