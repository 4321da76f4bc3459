//! Markup Reader Module
//!
//! - SliceReader: Zero-copy pull reader over a string slice
//! - Events: markup event types for pull parsing

pub mod events;
pub mod slice;

pub use events::{EndElement, MarkupEvent, RawMarkup, StartElement, TextMode, TextRun};
pub use slice::SliceReader;
