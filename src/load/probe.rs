use std::path::Path;

use crate::error::{Result, ThumbTileError};
use crate::state::data::Dimensions;

/// Resolves the natural size of the image behind a `src`.
///
/// Probes are blocking; the loader runs them on tokio's blocking pool.
pub trait DimensionProbe: Send + Sync + 'static {
    fn probe(&self, src: &str) -> Result<Dimensions>;
}

impl<F> DimensionProbe for F
where
    F: Fn(&str) -> Result<Dimensions> + Send + Sync + 'static,
{
    fn probe(&self, src: &str) -> Result<Dimensions> {
        self(src)
    }
}

/// Reads dimensions from an image file header without decoding pixels
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProbe;

impl DimensionProbe for FileProbe {
    fn probe(&self, src: &str) -> Result<Dimensions> {
        let path = Path::new(src);

        let (width, height) = image::ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()?;

        if height == 0 {
            return Err(ThumbTileError::ZeroHeight(src.to_string()));
        }

        Ok(Dimensions::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reads_png_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(40, 20).save(&path).unwrap();

        let dimensions = FileProbe.probe(path.to_str().unwrap()).unwrap();
        assert_eq!(dimensions, Dimensions::new(40, 20));
    }

    #[test]
    fn test_probe_missing_file_is_io_error() {
        let result = FileProbe.probe("/nonexistent/path.png");
        assert!(matches!(result, Err(ThumbTileError::Io(_))));
    }

    #[test]
    fn test_probe_garbage_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = FileProbe.probe(path.to_str().unwrap());
        assert!(matches!(result, Err(ThumbTileError::Image(_))));
    }
}
