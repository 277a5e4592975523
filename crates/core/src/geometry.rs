//! Points, sizes and rectangles in page space (points, origin bottom-left).

use crate::config::Insets;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The same size rotated by 90 degrees.
    pub fn swapped(&self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// Axis-aligned rectangle; `origin` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Shrink every side by the given insets.
    pub fn inset(&self, insets: &Insets) -> Self {
        Self::new(
            self.origin.x + insets.left,
            self.origin.y + insets.bottom,
            self.size.width - insets.left - insets.right,
            self.size.height - insets.top - insets.bottom,
        )
    }

    /// What is left after cutting `distance` off the top edge.
    pub fn remainder_below(&self, distance: f32) -> Self {
        let distance = distance.clamp(0.0, self.size.height.max(0.0));
        Self::new(
            self.origin.x,
            self.origin.y,
            self.size.width,
            self.size.height - distance,
        )
    }

    /// Whether `other` lies within this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPSILON: f32 = 1e-3;
        other.min_x() >= self.min_x() - EPSILON
            && other.min_y() >= self.min_y() - EPSILON
            && other.max_x() <= self.max_x() + EPSILON
            && other.max_y() <= self.max_y() + EPSILON
    }
}
