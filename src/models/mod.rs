//! Defines the data structures and models used throughout the crate.
//!
//! This includes the query parameters sent to the air pollution API and the
//! structures its JSON responses are decoded into.

mod pollution;

pub use pollution::*;
