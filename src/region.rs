use std::fmt::Display;

/// Axis-aligned bounding box of a detected object, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    /// X coordinate of the left edge.
    pub left: f32,
    /// Y coordinate of the top edge.
    pub top: f32,
    /// X coordinate of the right edge.
    pub right: f32,
    /// Y coordinate of the bottom edge.
    pub bottom: f32,
}

impl Region {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point of the region.
    pub fn center(&self) -> Marker {
        Marker {
            x: (self.left + self.right) / 2.0,
            y: (self.top + self.bottom) / 2.0,
        }
    }

    /// Gets the region as a tuple of (left, top, right, bottom).
    pub fn to_ltrb(&self) -> (f32, f32, f32, f32) {
        (self.left, self.top, self.right, self.bottom)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Named point of an object, e.g. a facial landmark.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Marker {
    pub x: f32,
    pub y: f32,
}

impl Marker {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
