//! Source strategies.
//!
//! Only the filesystem strategy exists: process arguments are resolved into an
//! ordered list of source files, which are then read with a size bound.

pub mod fs;
