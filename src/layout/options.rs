//! Layout options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PageGeometry;

/// Constants that drive the page flow.
///
/// Defaults reproduce the classic converter output: first baseline at 725pt,
/// 25pt margins, 10pt text on a 12.5pt leading, and 10pt around images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Baseline of the first text line on the first page
    pub top_offset: f32,

    /// Left, bottom, and top margin
    pub margin: f32,

    /// Vertical advance after each text line
    pub leading: f32,

    /// Text size in points
    pub font_size: f32,

    /// Gap above and below each image
    pub image_spacing: f32,

    /// What to do when text runs past the bottom margin
    pub text_overflow: TextOverflow,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first baseline offset.
    pub fn with_top_offset(mut self, top_offset: f32) -> Self {
        self.top_offset = top_offset;
        self
    }

    /// Set the page margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the line leading.
    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the spacing around images.
    pub fn with_image_spacing(mut self, spacing: f32) -> Self {
        self.image_spacing = spacing;
        self
    }

    /// Set the text overflow policy.
    pub fn with_text_overflow(mut self, overflow: TextOverflow) -> Self {
        self.text_overflow = overflow;
        self
    }

    /// Start a new page when text reaches the bottom margin.
    pub fn paginate_text(mut self) -> Self {
        self.text_overflow = TextOverflow::Paginate;
        self
    }

    /// Check the options against a page size.
    pub fn validate(&self, page: &PageGeometry) -> Result<()> {
        let values = [
            ("top_offset", self.top_offset),
            ("margin", self.margin),
            ("leading", self.leading),
            ("font_size", self.font_size),
            ("image_spacing", self.image_spacing),
            ("page width", page.width),
            ("page height", page.height),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{} must be finite", name)));
            }
        }

        if self.leading <= 0.0 {
            return Err(Error::InvalidConfig("leading must be positive".into()));
        }
        if self.font_size <= 0.0 {
            return Err(Error::InvalidConfig("font_size must be positive".into()));
        }
        if self.margin < 0.0 || self.image_spacing < 0.0 {
            return Err(Error::InvalidConfig(
                "margin and image_spacing must not be negative".into(),
            ));
        }
        if 2.0 * self.margin >= page.width || 2.0 * self.margin >= page.height {
            return Err(Error::InvalidConfig(format!(
                "margin {} leaves no room on a {}x{} page",
                self.margin, page.width, page.height
            )));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            top_offset: 725.0,
            margin: 25.0,
            leading: 12.5,
            font_size: 10.0,
            image_spacing: 10.0,
            text_overflow: TextOverflow::Ignore,
        }
    }
}

/// Text overflow policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOverflow {
    /// Keep placing lines below the margin; only images start new pages
    #[default]
    Ignore,
    /// Start a new page before a line whose baseline would fall below the margin
    Paginate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .with_margin(36.0)
            .with_leading(14.0)
            .with_font_size(11.0)
            .paginate_text();

        assert_eq!(options.margin, 36.0);
        assert_eq!(options.leading, 14.0);
        assert_eq!(options.font_size, 11.0);
        assert_eq!(options.text_overflow, TextOverflow::Paginate);
    }

    #[test]
    fn test_default_options() {
        let options = LayoutOptions::default();
        assert_eq!(options.top_offset, 725.0);
        assert_eq!(options.margin, 25.0);
        assert_eq!(options.leading, 12.5);
        assert_eq!(options.font_size, 10.0);
        assert_eq!(options.image_spacing, 10.0);
        assert_eq!(options.text_overflow, TextOverflow::Ignore);
        assert!(options.validate(&PageGeometry::letter()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let page = PageGeometry::letter();
        assert!(LayoutOptions::new().with_leading(0.0).validate(&page).is_err());
        assert!(LayoutOptions::new().with_font_size(-1.0).validate(&page).is_err());
        assert!(LayoutOptions::new().with_margin(400.0).validate(&page).is_err());
        assert!(LayoutOptions::new()
            .with_image_spacing(f32::NAN)
            .validate(&page)
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{"margin": 40, "text_overflow": "paginate"}"#).unwrap();
        assert_eq!(options.margin, 40.0);
        assert_eq!(options.leading, 12.5);
        assert_eq!(options.text_overflow, TextOverflow::Paginate);
    }
}
