use ndarray::{ArrayView, Dimension};

use crate::{
    imaging::AsArrayView, native::NativeEngine, Capabilities, ColorSpace, Content, Frame,
    ShoreError, ShoreResult,
};

/// Owned handle to a native engine instance.
///
/// Processing borrows the engine mutably and hands back a [`Content`] that
/// borrows it in turn, so a result graph can never be used after the next
/// frame or after the engine is deleted. The handle is neither `Send` nor
/// `Sync`; one engine serves one thread.
pub struct Engine {
    native: Box<dyn NativeEngine>,
    capabilities: Capabilities,
}

impl Engine {
    /// Wraps an engine created by a [`crate::native::NativeLibrary`].
    pub fn from_native(native: Box<dyn NativeEngine>, capabilities: Capabilities) -> Self {
        Self {
            native,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Processes one image.
    ///
    /// # Arguments
    ///
    /// * `image` - `(height, width)` for grayscale, `(height, width, 3)` for RGB/BGR.
    ///   Borrowed for the duration of the call only.
    /// * `color_space` - Layout of the image channels.
    ///
    /// # Returns
    ///
    /// * `Content` - Engine-owned result graph, valid until the next call.
    pub fn process<D: Dimension>(
        &mut self,
        image: ArrayView<'_, u8, D>,
        color_space: ColorSpace,
    ) -> ShoreResult<Content<'_>> {
        let frame = Frame::new(image, color_space)?;
        self.process_frame(&frame)
    }

    /// Processes one image whose color space is given by its tag
    /// (`GRAYSCALE`, `RGB` or `BGR`).
    pub fn process_tagged<D: Dimension>(
        &mut self,
        image: ArrayView<'_, u8, D>,
        tag: &str,
    ) -> ShoreResult<Content<'_>> {
        let frame = Frame::with_tag(image, tag)?;
        self.process_frame(&frame)
    }

    /// Processes an `image` crate buffer in place.
    pub fn process_image<I: AsArrayView>(&mut self, image: &I) -> ShoreResult<Content<'_>> {
        let frame = Frame::new(image.as_array_view()?, image.color_space())?;
        self.process_frame(&frame)
    }

    /// Processes an already validated frame.
    pub fn process_frame(&mut self, frame: &Frame<'_>) -> ShoreResult<Content<'_>> {
        let color_space = frame.color_space();
        if color_space.is_color() && !self.capabilities.color {
            return Err(ShoreError::UnsupportedColorSpace(
                color_space.as_str().to_string(),
            ));
        }

        log::trace!("Processing frame {:?}", frame.layout());
        match self.native.process(frame) {
            Some(node) => Ok(Content::new(node)),
            None => {
                log::warn!(
                    "Engine returned no content for a {}x{} {} frame",
                    frame.width(),
                    frame.height(),
                    color_space
                );
                Err(ShoreError::ProcessingFailed)
            }
        }
    }

    /// Result graph of the last successful processing call, if any.
    pub fn content(&self) -> Option<Content<'_>> {
        self.native.content().map(Content::new)
    }

    /// Releases the native engine.
    ///
    /// Equivalent to dropping the handle.
    pub fn delete(self) {
        drop(self);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        log::debug!("Deleting engine");
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{s, Array1, Array2, Array3};
    use rstest::rstest;

    use super::*;
    use crate::{
        native::NativeLibrary,
        testing::{blank_image, library, sample_color_image, sample_image, MockLibrary},
        FaceEngineConfig,
    };

    fn engine(library: &MockLibrary) -> Engine {
        let native = library
            .create_face_engine(&FaceEngineConfig::default())
            .unwrap();
        Engine::from_native(native, library.capabilities())
    }

    #[rstest]
    fn should_find_nothing_in_blank_image(library: MockLibrary, blank_image: Array2<u8>) {
        let mut engine = engine(&library);

        let content = engine
            .process(blank_image.view(), ColorSpace::Grayscale)
            .unwrap();
        assert_eq!(content.object_count(), 0);
    }

    #[rstest]
    fn should_forward_grayscale_layout(library: MockLibrary, sample_image: Array2<u8>) {
        let mut engine = engine(&library);

        let content = engine
            .process_tagged(sample_image.view(), "GRAYSCALE")
            .unwrap();
        assert_eq!(content.object_count(), 2);

        let layouts = library.layouts.borrow();
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].pixel_stride, 1);
        assert_eq!(layouts[0].line_stride, 100);
        assert_eq!(layouts[0].plane_stride, 0);
        assert_eq!(layouts[0].planes, 1);
    }

    #[rstest]
    fn should_forward_native_color_strides(library: MockLibrary, sample_color_image: Array3<u8>) {
        let mut engine = engine(&library);
        let cropped = sample_color_image.slice(s![.., 10..40, ..]);

        let content = engine.process(cropped, ColorSpace::Bgr).unwrap();
        assert_eq!(content.object_count(), 2);

        let layout = library.layouts.borrow()[0];
        assert_eq!((layout.width, layout.height), (30, 48));
        assert_eq!(layout.pixel_stride, 3);
        assert_eq!(layout.line_stride, 64 * 3);
        assert_eq!(layout.plane_stride, 1);
        assert_eq!(layout.color_space, ColorSpace::Bgr);
    }

    #[rstest]
    #[case("GRAYSCALE")]
    #[case("RGB")]
    #[case("CMYK")]
    fn should_reject_one_dimensional_input(library: MockLibrary, #[case] tag: &str) {
        let mut engine = engine(&library);
        let image = Array1::<u8>::zeros(100);

        let err = engine.process_tagged(image.view(), tag).unwrap_err();
        assert!(matches!(err, ShoreError::UnsupportedDimensionality { .. }));
        assert!(library.layouts.borrow().is_empty());
    }

    #[rstest]
    fn should_reject_unknown_color_space(library: MockLibrary, blank_image: Array2<u8>) {
        let mut engine = engine(&library);

        let err = engine
            .process_tagged(blank_image.view(), "CMYK")
            .unwrap_err();
        assert!(err.to_string().contains("CMYK"));
    }

    #[rstest]
    fn should_reject_color_without_capability(sample_color_image: Array3<u8>) {
        let library = MockLibrary {
            capabilities: Capabilities::default(),
            ..Default::default()
        };
        let mut engine = engine(&library);

        let err = engine
            .process(sample_color_image.view(), ColorSpace::Rgb)
            .unwrap_err();
        assert!(matches!(err, ShoreError::UnsupportedColorSpace(ref tag) if tag == "RGB"));
    }

    #[rstest]
    fn should_fail_when_engine_returns_nothing(blank_image: Array2<u8>) {
        let library = MockLibrary {
            fail_processing: true,
            ..Default::default()
        };
        let mut engine = engine(&library);

        let err = engine
            .process(blank_image.view(), ColorSpace::Grayscale)
            .unwrap_err();
        assert!(matches!(err, ShoreError::ProcessingFailed));
        assert!(engine.content().is_none());
    }

    #[rstest]
    fn should_keep_last_content(
        library: MockLibrary,
        sample_image: Array2<u8>,
        blank_image: Array2<u8>,
    ) {
        let mut engine = engine(&library);
        assert!(engine.content().is_none());

        engine
            .process(sample_image.view(), ColorSpace::Grayscale)
            .unwrap();
        assert_eq!(engine.content().unwrap().object_count(), 2);

        engine
            .process(blank_image.view(), ColorSpace::Grayscale)
            .unwrap();
        assert_eq!(engine.content().unwrap().object_count(), 0);
    }

    #[rstest]
    fn should_process_image_buffers(library: MockLibrary) {
        let mut engine = engine(&library);
        let mut image = image::RgbImage::new(32, 24);
        image.put_pixel(3, 4, image::Rgb([0, 0, 9]));

        let content = engine.process_image(&image).unwrap();
        assert_eq!(content.object_count(), 2);
        let layout = library.layouts.borrow()[0];
        assert_eq!(layout.color_space, ColorSpace::Rgb);
        assert_eq!(layout.line_stride, 32 * 3);
    }

    #[rstest]
    fn should_release_native_engine_once(library: MockLibrary) {
        let first = engine(&library);
        let second = engine(&library);

        first.delete();
        assert_eq!(library.deleted.get(), 1);
        drop(second);
        assert_eq!(library.deleted.get(), 2);
    }
}
