//! Source position utilities for the Ruby AST translation pipeline.
//!
//! This crate provides the span type shared by every stage of translation,
//! the byte-to-character offset resolver used to re-address parser output,
//! and a windowed scanner for locating tokens the surface grammar elides.

pub mod locator;
mod offset_cache;
mod span;

pub use locator::find;
pub use offset_cache::OffsetCache;
pub use span::{CharOffset, Span};
