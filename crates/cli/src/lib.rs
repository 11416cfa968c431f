//! Library interface for the ghsearch CLI
//!
//! Result rendering lives here so it can be tested without running the binary.

pub mod output;

pub use output::render_results;
