pub mod cli;
pub mod fetch;
pub mod load_config;
pub mod neofs_cli;

pub use cli::{run, Cli, Commands};
