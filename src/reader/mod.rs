//! Pull-parser event layer
//!
//! Wraps the core tokenizer into typed XML events consumed by the DOM
//! builder.

pub mod events;
pub mod slice;

pub use events::XmlEvent;
pub use slice::SliceReader;
