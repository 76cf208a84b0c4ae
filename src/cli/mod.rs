//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes defining commands and parsing arguments, the interactive menu used
//! when no subcommand is given, and table rendering of results.

mod commands;
mod interactive;
mod render;

pub use commands::*;
pub use interactive::*;
pub use render::*;
