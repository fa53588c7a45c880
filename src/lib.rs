//! Arrange images as justified tile rows.
//!
//! A [`ThumbTile`] loads the natural size of every image, waits until all of
//! them are known (or a timeout elapses), then packs them into rows that fill
//! the container width exactly and paints the result into a [`Surface`].

pub mod error;
pub mod layout;
pub mod load;
pub mod registry;
pub mod state;
pub mod thumbtile;

pub use error::{Result, ThumbTileError};
pub use layout::{Canvas, Placement, Surface};
pub use load::{DimensionProbe, FileProbe, Latch, Readiness};
pub use registry::{ContainerId, Invocation, Registry};
pub use state::data::{Data, Dimensions, ImageDescriptor, Item, LoadState};
pub use state::options::{default_config_path, Options, OptionsPatch};
pub use thumbtile::ThumbTile;
