//! Tile instance bound to one container
//!
//! Construction starts loading right away; once the ready latch fires the
//! instance renders itself into its surface. `render` can be called again at
//! any time to pick up images that finished loading later.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::layout::surface::Surface;
use crate::layout::tiler;
use crate::load::latch::{Latch, Readiness};
use crate::load::loader::{lock_items, Items, Loader};
use crate::load::probe::{DimensionProbe, FileProbe};
use crate::state::data::{ImageDescriptor, Item};
use crate::state::options::{Options, OptionsPatch};

struct Inner<S> {
    surface: Mutex<S>,
    options: Mutex<Options>,
    items: Items,
    loader: Loader,
    /// Tiles painted by the first render pass
    rendered: Latch<usize>,
}

/// Justified image tiles for one container
pub struct ThumbTile<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for ThumbTile<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: Surface> ThumbTile<S> {
    /// Load `images` from disk and render into `surface` once ready.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(surface: S, images: Vec<ImageDescriptor>, options: OptionsPatch) -> Self {
        Self::with_probe(surface, images, options, Arc::new(FileProbe))
    }

    /// Like [`ThumbTile::new`] with a custom way of resolving image dimensions
    pub fn with_probe(
        surface: S,
        images: Vec<ImageDescriptor>,
        options: OptionsPatch,
        probe: Arc<dyn DimensionProbe>,
    ) -> Self {
        let options = Options::default().merged(options);
        let items = Items::default();

        tracing::info!("🖼️  Loading {} images", images.len());
        let loader = Loader::start(Arc::clone(&items), images, &options, probe);
        let ready = loader.ready();

        let tile = Self {
            inner: Arc::new(Inner {
                surface: Mutex::new(surface),
                options: Mutex::new(options),
                items,
                loader,
                rendered: Latch::new(),
            }),
        };

        let handle = tile.clone();
        tokio::spawn(async move {
            let readiness = ready.wait().await;
            tracing::info!("Ready ({:?}), rendering", readiness);
            handle.render();
        });

        tile
    }

    /// Deep-merge `patch` into the options. Does not re-render.
    pub fn configure(&self, patch: OptionsPatch) -> &Self {
        lock(&self.inner.options).merge(patch);
        self
    }

    /// Re-derive the layout from the current item state and repaint
    pub fn render(&self) -> &Self {
        let options = self.options();
        let painted = {
            let items = lock_items(&self.inner.items);
            let mut surface = lock(&self.inner.surface);
            tiler::render(&items, &mut *surface, &options)
        };

        self.inner.rendered.resolve(painted);
        self
    }

    /// Latch that fires on all-loaded or timeout
    pub fn ready(&self) -> Latch<Readiness> {
        self.inner.loader.ready()
    }

    /// Wait for the first render pass; returns the number of tiles it painted
    pub async fn rendered(&self) -> usize {
        self.inner.rendered.wait().await
    }

    /// Images whose load has not completed
    pub fn outstanding(&self) -> usize {
        self.inner.loader.outstanding()
    }

    /// Snapshot of every item in descriptor order
    pub fn items(&self) -> Vec<Item> {
        lock_items(&self.inner.items).clone()
    }

    pub fn options(&self) -> Options {
        lock(&self.inner.options).clone()
    }

    /// Read the surface
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.inner.surface))
    }

    /// Modify the surface, e.g. to change its width before a render
    pub fn with_surface_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut lock(&self.inner.surface))
    }
}

impl<S> std::fmt::Debug for ThumbTile<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbTile")
            .field("items", &lock_items(&self.inner.items).len())
            .field("outstanding", &self.inner.loader.outstanding())
            .field("ready", &self.inner.loader.ready().get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ThumbTileError};
    use crate::layout::surface::Canvas;
    use crate::state::data::Dimensions;
    use std::time::Duration;

    /// Sources are "WxH" or "WxH@ms" to delay the load; anything else fails
    fn probe() -> Arc<dyn DimensionProbe> {
        Arc::new(|src: &str| -> Result<Dimensions> {
            let bad = || ThumbTileError::ZeroHeight(src.to_string());
            let (size, delay) = match src.split_once('@') {
                Some((size, delay)) => (size, delay.parse().map_err(|_| bad())?),
                None => (src, 0),
            };
            std::thread::sleep(Duration::from_millis(delay));

            let (w, h) = size.split_once('x').ok_or_else(bad)?;
            Ok(Dimensions::new(
                w.parse().map_err(|_| bad())?,
                h.parse().map_err(|_| bad())?,
            ))
        })
    }

    fn images(srcs: &[&str]) -> Vec<ImageDescriptor> {
        srcs.iter().map(|src| ImageDescriptor::new(*src)).collect()
    }

    fn patch() -> OptionsPatch {
        OptionsPatch::new().gutter(10.0).base(150.0)
    }

    async fn first_render(tile: &ThumbTile<Canvas>) -> usize {
        tokio::time::timeout(Duration::from_secs(5), tile.rendered())
            .await
            .expect("tile never rendered")
    }

    #[tokio::test]
    async fn test_renders_once_all_loaded() {
        let tile = ThumbTile::with_probe(
            Canvas::new(500.0),
            images(&["300x150", "300x150", "300x150"]),
            patch(),
            probe(),
        );

        assert_eq!(first_render(&tile).await, 2);
        assert_eq!(tile.ready().get(), Some(Readiness::AllLoaded));

        tile.with_surface(|canvas| {
            let placements = canvas.placements();
            assert_eq!(placements.len(), 2);
            assert!((placements[0].width - 245.0).abs() < 1e-9);
            assert!((placements[0].height - 122.5).abs() < 1e-9);
        });
    }

    #[tokio::test]
    async fn test_empty_list_still_renders() {
        let tile = ThumbTile::with_probe(Canvas::new(500.0), Vec::new(), patch(), probe());

        assert_eq!(first_render(&tile).await, 0);
        assert!(tile.with_surface(|canvas| canvas.placements().is_empty()));
    }

    #[tokio::test]
    async fn test_timeout_before_any_load_renders_nothing() {
        let tile = ThumbTile::with_probe(
            Canvas::new(500.0),
            images(&["300x150@400", "300x150@400"]),
            patch().timeout(Some(20)),
            probe(),
        );

        assert_eq!(first_render(&tile).await, 0);
        assert_eq!(tile.ready().get(), Some(Readiness::TimedOut));
        assert_eq!(tile.items().len(), 2);
    }

    #[tokio::test]
    async fn test_rerender_picks_up_late_loads() {
        let tile = ThumbTile::with_probe(
            Canvas::new(500.0),
            images(&["300x150", "300x150", "300x150@150", "300x150@150"]),
            patch().timeout(Some(60)),
            probe(),
        );

        assert_eq!(first_render(&tile).await, 2);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(tile.outstanding(), 0);

        tile.render();
        tile.with_surface(|canvas| {
            let indices: Vec<_> = canvas.placements().iter().map(|p| p.index).collect();
            assert_eq!(indices, vec![0, 1, 2, 3]);
            assert_eq!(canvas.row_count(), 2);
        });
    }

    #[tokio::test]
    async fn test_configure_merges_without_rendering() {
        let tile = ThumbTile::with_probe(
            Canvas::new(500.0),
            images(&["300x150", "300x150", "300x150", "300x150"]),
            patch(),
            probe(),
        );
        assert_eq!(first_render(&tile).await, 4);

        tile.configure(OptionsPatch::new().rows(Some(1)).data("group", "a"));
        assert_eq!(tile.options().rows, Some(1));
        assert_eq!(tile.options().gutter, 10.0);
        assert_eq!(tile.with_surface(|canvas| canvas.placements().len()), 4);

        tile.render();
        assert_eq!(tile.with_surface(|canvas| canvas.placements().len()), 2);
    }

    #[tokio::test]
    async fn test_default_data_reaches_placements() {
        let tile = ThumbTile::with_probe(
            Canvas::new(500.0),
            vec![
                ImageDescriptor::new("600x150").with_data("caption", "Wide"),
            ],
            patch().data("group", "gallery"),
            probe(),
        );
        assert_eq!(first_render(&tile).await, 1);

        tile.with_surface(|canvas| {
            let data = &canvas.placements()[0].data;
            assert_eq!(data["caption"], "Wide");
            assert_eq!(data["group"], "gallery");
        });
    }

    #[tokio::test]
    async fn test_reads_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut descriptors = Vec::new();
        for (i, (w, h)) in [(60u32, 30u32), (60, 30), (60, 30)].iter().enumerate() {
            let path = dir.path().join(format!("{i}.png"));
            image::RgbImage::new(*w, *h).save(&path).unwrap();
            descriptors.push(ImageDescriptor::new(path.to_string_lossy()));
        }

        let tile = ThumbTile::new(
            Canvas::new(100.0),
            descriptors,
            OptionsPatch::new().gutter(4.0).base(30.0),
        );

        assert_eq!(first_render(&tile).await, 2);
        tile.with_surface(|canvas| {
            let total: f64 = canvas.placements().iter().map(|p| p.width + p.margin_right).sum();
            assert!((total - 100.0).abs() < 1e-9);
        });
    }
}
