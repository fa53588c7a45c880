//! Image loading module
//!
//! This module handles:
//! - Probing natural image dimensions (probe.rs)
//! - Tracking outstanding loads and the timeout race (loader.rs)
//! - The resolve-once ready latch (latch.rs)

pub mod latch;
pub mod loader;
pub mod probe;

pub use latch::{Latch, Readiness};
pub use loader::{Items, Loader};
pub use probe::{DimensionProbe, FileProbe};
