//! Justified-row tiling
//!
//! Items are scaled to the base height and packed left to right. As soon as a
//! row grows wider than the container it is closed: every tile in it is scaled
//! by one shrink rate so that the tiles plus the gutters between them fill the
//! container exactly. A trailing row that never overflows is not emitted.

use super::surface::Surface;
use crate::state::data::{Data, Dimensions, Item};
use crate::state::options::Options;

/// One rendered tile
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Position of the item in the original descriptor list
    pub index: usize,
    pub src: String,
    /// Zero-based row the tile belongs to
    pub row: usize,
    pub width: f64,
    pub height: f64,
    /// Gutter to the next tile; 0 for the last tile of a row
    pub margin_right: f64,
    /// Gutter to the previous row; 0 on the first row
    pub margin_top: f64,
    pub data: Data,
}

/// An item scaled to the base height
#[derive(Debug, Clone, Copy)]
struct Scaled<'a> {
    item: &'a Item,
    width: f64,
    height: f64,
}

/// Scale natural dimensions so the height equals `base`.
///
/// The width is truncated to whole pixels. Returns `None` for a zero height.
pub fn scale_to_base(dimensions: Dimensions, base: f64) -> Option<(f64, f64)> {
    if dimensions.height == 0 {
        return None;
    }

    let width = (dimensions.width as f64 * (base / dimensions.height as f64)).trunc();
    Some((width, base))
}

/// Row under construction
#[derive(Debug, Default)]
struct Row<'a> {
    tiles: Vec<Scaled<'a>>,
    width: f64,
}

impl<'a> Row<'a> {
    fn push(&mut self, tile: Scaled<'a>) {
        self.width += tile.width;
        self.tiles.push(tile);
    }

    fn overflows(&self, container_width: f64) -> bool {
        self.width > container_width
    }

    /// Shrink every tile by one rate and emit them as placements
    fn close(self, row: usize, container_width: f64, gutter: f64, out: &mut Vec<Placement>) {
        let gaps = self.tiles.len().saturating_sub(1) as f64;
        let rate = (container_width - gutter * gaps) / self.width;
        let last = self.tiles.len().saturating_sub(1);
        let margin_top = if row > 0 { gutter } else { 0.0 };

        out.extend(self.tiles.into_iter().enumerate().map(|(i, tile)| Placement {
            index: tile.item.index,
            src: tile.item.src.clone(),
            row,
            width: tile.width * rate,
            height: tile.height * rate,
            margin_right: if i == last { 0.0 } else { gutter },
            margin_top,
            data: tile.item.data.clone(),
        }));
    }
}

/// Lay out `items` for a container `container_width` pixels wide.
///
/// Items that have not finished loading are skipped. Every call derives the
/// layout from scratch.
pub fn tile(items: &[Item], container_width: f64, options: &Options) -> Vec<Placement> {
    let mut placements = Vec::new();
    let mut row = Row::default();
    let mut closed = 0;

    for item in items {
        let Some(dimensions) = item.dimensions() else {
            continue;
        };
        let Some((width, height)) = scale_to_base(dimensions, options.base) else {
            continue;
        };

        row.push(Scaled { item, width, height });

        if row.overflows(container_width) {
            std::mem::take(&mut row).close(closed, container_width, options.gutter, &mut placements);
            closed += 1;
        }

        if options.row_limit().is_some_and(|limit| closed >= limit) {
            break;
        }
    }

    placements
}

/// Clear `surface` and paint the current layout into it.
///
/// Returns the number of tiles painted.
pub fn render<S: Surface + ?Sized>(items: &[Item], surface: &mut S, options: &Options) -> usize {
    surface.clear();

    let placements = tile(items, surface.width(), options);
    let painted = placements.len();
    for placement in placements {
        surface.append(placement);
    }

    tracing::debug!("Rendered {} tiles", painted);
    painted
}
