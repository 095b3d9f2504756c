//! Placement commands and the sinks that consume them.

use serde::{Serialize, Serializer};
use std::convert::Infallible;

use crate::model::Point;

/// One instruction for the PDF emitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlacementCommand {
    /// Draw a line of text with its baseline starting at `at`
    DrawText {
        /// Baseline origin
        at: Point,
        /// Text to show
        text: String,
        /// Font size in points
        font_size: f32,
    },

    /// Draw an image with its lower-left corner at `at`
    DrawImage {
        /// Lower-left corner
        at: Point,
        /// Encoded image bytes
        #[serde(rename = "bytes", serialize_with = "serialize_len")]
        data: Vec<u8>,
        /// Placed width in points
        width: f32,
        /// Placed height in points
        height: f32,
    },

    /// Finish the current page and start a new one
    NewPage,
}

impl PlacementCommand {
    /// Check if this command starts a new page.
    pub fn is_new_page(&self) -> bool {
        matches!(self, PlacementCommand::NewPage)
    }

    /// Position of a draw command.
    pub fn position(&self) -> Option<Point> {
        match self {
            PlacementCommand::DrawText { at, .. } | PlacementCommand::DrawImage { at, .. } => {
                Some(*at)
            }
            PlacementCommand::NewPage => None,
        }
    }
}

fn serialize_len<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(data.len() as u64)
}

/// Receiver of placement commands, one at a time, in document order.
pub trait PlacementSink {
    /// Error raised while applying a command.
    type Error;

    /// Apply one command.
    fn accept(&mut self, command: PlacementCommand) -> Result<(), Self::Error>;
}

impl PlacementSink for Vec<PlacementCommand> {
    type Error = Infallible;

    fn accept(&mut self, command: PlacementCommand) -> Result<(), Infallible> {
        self.push(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_serializes_byte_count() {
        let command = PlacementCommand::DrawImage {
            at: Point::new(25.0, 100.0),
            data: vec![0; 42],
            width: 10.0,
            height: 20.0,
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["op"], "draw_image");
        assert_eq!(json["bytes"], 42);
    }

    #[test]
    fn test_new_page_serializes_tag_only() {
        let json = serde_json::to_string(&PlacementCommand::NewPage).unwrap();
        assert_eq!(json, r#"{"op":"new_page"}"#);
    }

    #[test]
    fn test_position() {
        let command = PlacementCommand::DrawText {
            at: Point::new(25.0, 725.0),
            text: "Hi".into(),
            font_size: 10.0,
        };
        assert_eq!(command.position(), Some(Point::new(25.0, 725.0)));
        assert_eq!(PlacementCommand::NewPage.position(), None);
    }
}
