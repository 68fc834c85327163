//! Word-frequency analysis built on the `ordered_map` symbol table.
//!
//! Text is split on whitespace, each token is normalized (lowercased, stripped
//! of punctuation and accents) and counted. Because the table keeps its keys
//! sorted, listings and prefix queries come straight out of rank lookups.

mod analyzer;
mod config;
mod text;

pub use anyhow::Result;

pub use analyzer::*;
pub use config::*;
pub use text::*;

pub use ordered_map::{Error, OrderedMap};
