//! Layout module
//!
//! - `tiler.rs` - justified-row packing and rate scaling
//! - `surface.rs` - the output seam and an in-memory surface

pub mod surface;
pub mod tiler;

pub use surface::{Canvas, Surface};
pub use tiler::{render, scale_to_base, tile, Placement};
