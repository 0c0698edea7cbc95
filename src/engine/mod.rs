//! Engine module: CLI surface and run-side utilities.

pub mod arg_parser;
pub mod cli;
pub mod progress;

pub use arg_parser::{Cli, Commands, CommonArgs};
pub use cli::handle_run;
