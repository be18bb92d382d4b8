//! Command-line front end for `docscrape`.

pub mod cli;
pub mod logging;
