use image::{GenericImage, Rgb};

use crate::{Content, Marker, Object, Region};

impl From<Region> for imageproc::rect::Rect {
    fn from(region: Region) -> Self {
        imageproc::rect::Rect::at(region.left as i32, region.top as i32).of_size(
            (region.width() as u32).max(1),
            (region.height() as u32).max(1),
        )
    }
}

const REGION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draws the region and markers of every object in `content`.
pub fn draw_content<I>(image: &mut I, content: &Content<'_>)
where
    I: GenericImage<Pixel = Rgb<u8>>,
{
    for object in content.objects() {
        draw_object(image, &object);
    }
}

/// Draws the region, markers and parts of one object.
pub fn draw_object<I>(image: &mut I, object: &Object<'_>)
where
    I: GenericImage<Pixel = Rgb<u8>>,
{
    if let Some(region) = object.region() {
        imageproc::drawing::draw_hollow_rect_mut(image, region.into(), REGION_COLOR);
    }
    for (_, Marker { x, y }) in object.markers() {
        imageproc::drawing::draw_cross_mut(image, MARKER_COLOR, x as i32, y as i32);
    }
    for (_, part) in object.parts() {
        draw_object(image, &part);
    }
}
