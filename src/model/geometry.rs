//! Page geometry in PDF points (1 point = 1/72 inch).

use serde::{Deserialize, Serialize};

/// Size of one output page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,
}

impl PageGeometry {
    /// Create a page geometry with the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Standard Letter size (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Standard A4 size (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0) // 210mm * 2.834, 297mm * 2.834
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// A position on the page, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge
    pub x: f32,

    /// Vertical offset from the bottom edge
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_letter() {
        let page = PageGeometry::default();
        assert_eq!(page.width, 612.0);
        assert_eq!(page.height, 792.0);
    }

    #[test]
    fn test_a4() {
        assert_eq!(PageGeometry::a4(), PageGeometry::new(595.0, 842.0));
    }
}
