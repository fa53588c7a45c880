//! Viewer widgets
//!
//! - `gallery.rs` - draws rendered placements as fixed-size image tiles

pub mod gallery;
