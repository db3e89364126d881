//! Command-line interface: argument parsing and runtime setup.

pub mod args;
pub mod setup;

pub use args::{parse_args, Cli, Commands, OutputFormat};
pub use setup::{configure_thread_pool, get_worker_count};
