//! Page flow layout.
//!
//! Turns an ordered sequence of [`ContentBlock`](crate::model::ContentBlock)s
//! into [`PlacementCommand`]s. Text lines are placed verbatim at the left
//! margin, one leading apart, with no measurement or wrapping. Images are
//! shrunk to fit inside the margins and start a new page when they would
//! cross the bottom margin.

mod command;
mod flow;
mod options;

pub use command::{PlacementCommand, PlacementSink};
pub use flow::{layout, PageCursor, PageFlow};
pub use options::{LayoutOptions, TextOverflow};
