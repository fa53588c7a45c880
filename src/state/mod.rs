//! State module
//!
//! This module holds the data the loader and tiler share:
//! - Descriptors, items and their load state (data.rs)
//! - Tiling options and option patches (options.rs)

pub mod data;
pub mod options;
