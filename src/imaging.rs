use std::ops::Deref;

use image::{flat::SampleLayout, ImageBuffer, Luma, Rgb};
use ndarray::{ArrayView, Dimension, Ix2, Ix3, ShapeBuilder};

use crate::{ColorSpace, ShoreError, ShoreResult};

/// Borrows an `image` buffer as an ndarray view, without copying.
pub trait AsArrayView {
    type Dim: Dimension;

    fn as_array_view(&self) -> ShoreResult<ArrayView<'_, u8, Self::Dim>>;

    /// Color space matching the buffer's pixel type.
    fn color_space(&self) -> ColorSpace;
}

fn layout_error(err: ndarray::ShapeError) -> ShoreError {
    ShoreError::UnsupportedLayout(err.to_string())
}

impl<C> AsArrayView for ImageBuffer<Luma<u8>, C>
where
    C: Deref<Target = [u8]> + AsRef<[u8]>,
{
    type Dim = Ix2;

    fn as_array_view(&self) -> ShoreResult<ArrayView<'_, u8, Ix2>> {
        let samples = self.as_flat_samples();
        let SampleLayout {
            height,
            height_stride,
            width,
            width_stride,
            ..
        } = samples.layout;
        let shape = (height as usize, width as usize);
        let strides = (height_stride, width_stride);
        ArrayView::from_shape(shape.strides(strides), samples.samples).map_err(layout_error)
    }

    fn color_space(&self) -> ColorSpace {
        ColorSpace::Grayscale
    }
}

impl<C> AsArrayView for ImageBuffer<Rgb<u8>, C>
where
    C: Deref<Target = [u8]> + AsRef<[u8]>,
{
    type Dim = Ix3;

    fn as_array_view(&self) -> ShoreResult<ArrayView<'_, u8, Ix3>> {
        let samples = self.as_flat_samples();
        let SampleLayout {
            channels,
            channel_stride,
            height,
            height_stride,
            width,
            width_stride,
        } = samples.layout;
        let shape = (height as usize, width as usize, channels as usize);
        let strides = (height_stride, width_stride, channel_stride);
        ArrayView::from_shape(shape.strides(strides), samples.samples).map_err(layout_error)
    }

    fn color_space(&self) -> ColorSpace {
        ColorSpace::Rgb
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, RgbImage};

    use super::*;
    use crate::Frame;

    #[test]
    fn should_view_gray_image_in_place() {
        let mut image = GrayImage::new(7, 3);
        image.put_pixel(5, 2, Luma([99]));

        let view = image.as_array_view().unwrap();
        assert_eq!(view.dim(), (3, 7));
        assert_eq!(view[[2, 5]], 99);
        assert_eq!(view.as_ptr(), image.as_raw().as_ptr());

        let frame = Frame::new(view, image.color_space()).unwrap();
        assert_eq!(frame.layout().line_stride, 7);
    }

    #[test]
    fn should_view_rgb_image_in_place() {
        let mut image = RgbImage::new(4, 2);
        image.put_pixel(3, 1, Rgb([1, 2, 3]));

        let view = image.as_array_view().unwrap();
        assert_eq!(view.dim(), (2, 4, 3));
        assert_eq!(view[[1, 3, 2]], 3);

        let frame = Frame::new(view, image.color_space()).unwrap();
        let layout = frame.layout();
        assert_eq!(layout.color_space, ColorSpace::Rgb);
        assert_eq!(
            (layout.pixel_stride, layout.line_stride, layout.plane_stride),
            (3, 12, 1)
        );
    }
}
