use super::tiler::Placement;

/// Where rendered tiles go.
///
/// A surface reports its current pixel width and accepts placements in
/// row-major order. Tiles float left: a placement carries its size and
/// margins, and its position follows from the ones before it.
pub trait Surface: Send + 'static {
    /// Current inner width of the container in pixels
    fn width(&self) -> f64;

    /// Remove everything rendered so far
    fn clear(&mut self);

    /// Append one tile after the previously appended ones
    fn append(&mut self, placement: Placement);
}

/// In-memory surface that keeps the placements it was given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    width: f64,
    placements: Vec<Placement>,
}

impl Canvas {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            placements: Vec::new(),
        }
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Number of distinct rows currently rendered
    pub fn row_count(&self) -> usize {
        self.placements.last().map_or(0, |placement| placement.row + 1)
    }
}

impl Surface for Canvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn clear(&mut self) {
        self.placements.clear();
    }

    fn append(&mut self, placement: Placement) {
        self.placements.push(placement);
    }
}
