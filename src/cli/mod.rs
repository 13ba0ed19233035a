//! CLI module
//!
//! Command-line interface for walking a paginated JSON API.
//!
//! # Commands
//!
//! - `fetch` - Load the first page and keep paginating
//! - `validate` - Check a source definition file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
