//! Command-line front end.
//!
//! Parses flags, loads the text and hands it to the local or Azure engine.

pub mod args;
pub mod input;
pub mod speak;
pub mod voices;

pub use args::Cli;
