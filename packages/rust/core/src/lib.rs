//! Core pipeline for mdgen.
//!
//! Loads a CSV export, validates its columns, and writes one front-matter
//! Markdown page per row (see [`pipeline::generate`]).

pub mod body;
pub mod frontmatter;
pub mod loader;
pub mod paths;
pub mod pipeline;
pub mod schema;
