use std::collections::HashMap;
use std::sync::Arc;

use crate::layout::surface::Surface;
use crate::load::probe::{DimensionProbe, FileProbe};
use crate::state::data::ImageDescriptor;
use crate::state::options::OptionsPatch;
use crate::thumbtile::ThumbTile;

/// Identity of a container element
pub type ContainerId = String;

/// What a call on a container asks for
#[derive(Debug, Clone)]
pub enum Invocation {
    /// Re-render the container's existing instance, if any
    Render,
    /// Build a new instance for the container, replacing any previous one
    Build {
        images: Vec<ImageDescriptor>,
        options: OptionsPatch,
    },
}

impl Invocation {
    pub fn build(images: Vec<ImageDescriptor>) -> Self {
        Self::Build {
            images,
            options: OptionsPatch::default(),
        }
    }
}

/// One tile instance per container.
///
/// Building for a container that already has an instance replaces it
/// (last write wins); the old instance is not torn down and still renders
/// once its own loads are ready.
pub struct Registry<S> {
    instances: HashMap<ContainerId, ThumbTile<S>>,
    probe: Arc<dyn DimensionProbe>,
}

impl<S: Surface> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> Registry<S> {
    pub fn new() -> Self {
        Self::with_probe(Arc::new(FileProbe))
    }

    /// Registry whose instances resolve dimensions through `probe`
    pub fn with_probe(probe: Arc<dyn DimensionProbe>) -> Self {
        Self {
            instances: HashMap::new(),
            probe,
        }
    }

    /// Dispatch a call on a container.
    ///
    /// `make_surface` is only called when a new instance is built. Returns the
    /// instance now associated with `id`, or `None` for a render request on a
    /// container that has none.
    pub fn invoke(
        &mut self,
        id: impl Into<ContainerId>,
        make_surface: impl FnOnce() -> S,
        invocation: Invocation,
    ) -> Option<&ThumbTile<S>> {
        let id = id.into();

        match invocation {
            Invocation::Render => {
                let tile = self.instances.get(&id)?;
                tile.render();
                Some(tile)
            }
            Invocation::Build { images, options } => {
                let tile = ThumbTile::with_probe(make_surface(), images, options, Arc::clone(&self.probe));
                Some(self.insert(id, tile))
            }
        }
    }

    /// Associate an already built instance with `id`, replacing any previous one
    pub fn insert(&mut self, id: impl Into<ContainerId>, tile: ThumbTile<S>) -> &ThumbTile<S> {
        let id = id.into();
        if self.instances.contains_key(&id) {
            tracing::debug!("Replacing tile instance for container {}", id);
        }

        self.instances.insert(id.clone(), tile);
        &self.instances[&id]
    }

    pub fn get(&self, id: &str) -> Option<&ThumbTile<S>> {
        self.instances.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<ThumbTile<S>> {
        self.instances.remove(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<S> std::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("containers", &self.instances.keys().collect::<Vec<_>>())
            .finish()
    }
}
