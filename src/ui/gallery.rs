//! Turns placement records into iced widgets
use iced::widget::image::Handle;
use iced::widget::{container, Column, Image, Row};
use iced::{Element, Length, Padding};
use thumbtile::Placement;

use crate::Message;

/// Build the tiled gallery. Placements arrive row-major, so consecutive
/// placements with the same row index form one `Row`.
pub fn gallery(placements: &[Placement]) -> Element<'static, Message> {
    let rows = placements
        .chunk_by(|a, b| a.row == b.row)
        .map(|tiles| -> Element<'static, Message> {
            Row::with_children(tiles.iter().map(tile)).into()
        });

    Column::with_children(rows).into()
}

/// One floated tile: fixed size, margins expressed as padding
fn tile(placement: &Placement) -> Element<'static, Message> {
    let picture = Image::new(Handle::from_path(placement.src.clone()))
        .width(Length::Fixed(placement.width as f32))
        .height(Length::Fixed(placement.height as f32));

    container(picture)
        .padding(Padding {
            top: placement.margin_top as f32,
            right: placement.margin_right as f32,
            bottom: 0.0,
            left: 0.0,
        })
        .into()
}
