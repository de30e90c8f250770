pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::run;
