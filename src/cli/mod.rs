//! CLI layer for texsplice.
//!
//! A thin stand-in for the chat host: it delivers one message, runs one
//! pipeline pass, and prints the transformed text. Commands cover the
//! denylist check, fragment extraction, and a full render pass.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
