use std::{ffi::CStr, fmt::Display, str::FromStr};

use crate::{ShoreError, ShoreResult};

/// Pixel layout tag forwarded to the engine with every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// Single 8-bit luminance plane.
    #[default]
    Grayscale,
    /// Interleaved red, green, blue.
    Rgb,
    /// Interleaved blue, green, red (OpenCV order).
    Bgr,
}

impl ColorSpace {
    /// Tag understood by the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Grayscale => "GRAYSCALE",
            ColorSpace::Rgb => "RGB",
            ColorSpace::Bgr => "BGR",
        }
    }

    pub(crate) fn as_c_str(&self) -> &'static CStr {
        match self {
            ColorSpace::Grayscale => c"GRAYSCALE",
            ColorSpace::Rgb => c"RGB",
            ColorSpace::Bgr => c"BGR",
        }
    }

    /// Number of color planes the engine expects.
    pub fn planes(&self) -> usize {
        match self {
            ColorSpace::Grayscale => 1,
            ColorSpace::Rgb | ColorSpace::Bgr => 3,
        }
    }

    pub fn is_color(&self) -> bool {
        !matches!(self, ColorSpace::Grayscale)
    }
}

impl FromStr for ColorSpace {
    type Err = ShoreError;

    fn from_str(tag: &str) -> ShoreResult<Self> {
        match tag {
            "GRAYSCALE" => Ok(ColorSpace::Grayscale),
            "RGB" => Ok(ColorSpace::Rgb),
            "BGR" => Ok(ColorSpace::Bgr),
            _ => Err(ShoreError::UnsupportedColorSpace(tag.to_string())),
        }
    }
}

impl Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
