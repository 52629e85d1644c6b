use std::marker::PhantomData;

use ndarray::{ArrayView, ArrayViewD, Dimension};

use crate::{ColorSpace, ShoreError, ShoreResult};

/// Memory layout of a frame as consumed by the engine.
///
/// Strides are in bytes and may be negative for reversed views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub width: usize,
    pub height: usize,
    pub planes: usize,
    /// Offset between two horizontally adjacent pixels.
    pub pixel_stride: isize,
    /// Offset between two vertically adjacent pixels.
    pub line_stride: isize,
    /// Offset between two color planes of the same pixel.
    pub plane_stride: isize,
    pub color_space: ColorSpace,
}

/// A validated, borrowed image ready to be handed to the engine.
///
/// The frame never copies pixel data. It keeps the origin pointer of the
/// caller's buffer and borrows it for `'a`, so the buffer outlives every use
/// of the pointer.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: *const u8,
    layout: FrameLayout,
    _image: PhantomData<&'a [u8]>,
}

impl<'a> Frame<'a> {
    /// Validates `image` against `color_space` and computes its strides.
    ///
    /// # Arguments
    ///
    /// * `image` - `(height, width)` for grayscale, `(height, width, 3)` for RGB/BGR.
    /// * `color_space` - Layout tag forwarded to the engine.
    pub fn new<D: Dimension>(
        image: ArrayView<'a, u8, D>,
        color_space: ColorSpace,
    ) -> ShoreResult<Self> {
        let image = image.into_dyn();
        check_min_axes(&image)?;

        let layout = match color_space {
            ColorSpace::Grayscale => grayscale_layout(&image)?,
            ColorSpace::Rgb | ColorSpace::Bgr => color_layout(&image, color_space)?,
        };

        Ok(Self {
            data: image.as_ptr(),
            layout,
            _image: PhantomData,
        })
    }

    /// Like [`Frame::new`] but parses the color space from its tag.
    ///
    /// The axis count is checked before the tag, so a one-dimensional input
    /// is reported as such even when the tag is unknown.
    pub fn with_tag<D: Dimension>(image: ArrayView<'a, u8, D>, tag: &str) -> ShoreResult<Self> {
        let image = image.into_dyn();
        check_min_axes(&image)?;
        Self::new(image, tag.parse()?)
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Pointer to the pixel at row 0, column 0, plane 0.
    pub fn as_ptr(&self) -> *const u8 {
        self.data
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.layout.color_space
    }

    /// Reads one sample through the computed strides.
    ///
    /// Returns `None` when the coordinates fall outside the frame.
    pub fn sample(&self, x: usize, y: usize, plane: usize) -> Option<u8> {
        let layout = &self.layout;
        if x >= layout.width || y >= layout.height || plane >= layout.planes {
            return None;
        }
        let offset = y as isize * layout.line_stride
            + x as isize * layout.pixel_stride
            + plane as isize * layout.plane_stride;
        // SAFETY: the strides were taken from (or checked against) an ndarray
        // view borrowed for 'a, so every in-bounds index maps into that view.
        Some(unsafe { *self.data.offset(offset) })
    }
}

fn check_min_axes(image: &ArrayViewD<u8>) -> ShoreResult<()> {
    if image.ndim() < 2 {
        return Err(ShoreError::UnsupportedDimensionality {
            expected: "at least 2 axes",
            shape: image.shape().to_vec(),
        });
    }
    Ok(())
}

/// Must follow the shape checks: a misshapen empty image is a dimensionality
/// error.
fn check_not_empty(image: &ArrayViewD<u8>) -> ShoreResult<()> {
    if image.shape()[0] == 0 || image.shape()[1] == 0 {
        return Err(ShoreError::UnsupportedLayout(format!(
            "empty image of shape {:?}",
            image.shape()
        )));
    }
    Ok(())
}

fn grayscale_layout(image: &ArrayViewD<u8>) -> ShoreResult<FrameLayout> {
    if image.ndim() != 2 {
        return Err(ShoreError::UnsupportedDimensionality {
            expected: "2 axes (height, width)",
            shape: image.shape().to_vec(),
        });
    }
    check_not_empty(image)?;
    // The strides below are computed rather than read, which only matches
    // the buffer when it is row-major contiguous.
    if !image.is_standard_layout() {
        return Err(ShoreError::UnsupportedLayout(format!(
            "grayscale image must be row-major contiguous, got strides {:?}",
            image.strides()
        )));
    }

    let (height, width) = (image.shape()[0], image.shape()[1]);
    Ok(FrameLayout {
        width,
        height,
        planes: 1,
        pixel_stride: 1,
        line_stride: width as isize,
        plane_stride: 0,
        color_space: ColorSpace::Grayscale,
    })
}

fn color_layout(image: &ArrayViewD<u8>, color_space: ColorSpace) -> ShoreResult<FrameLayout> {
    if image.ndim() != 3 || image.shape()[2] != color_space.planes() {
        return Err(ShoreError::UnsupportedDimensionality {
            expected: "3 axes (height, width, 3)",
            shape: image.shape().to_vec(),
        });
    }
    check_not_empty(image)?;

    let item_size = std::mem::size_of::<u8>() as isize;
    let strides = image.strides();
    Ok(FrameLayout {
        width: image.shape()[1],
        height: image.shape()[0],
        planes: color_space.planes(),
        pixel_stride: strides[1] * item_size,
        line_stride: strides[0] * item_size,
        plane_stride: strides[2] * item_size,
        color_space,
    })
}
