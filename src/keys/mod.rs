//! Keys module - key layout and per-key style resolution

pub mod layout;
pub mod style;

pub use layout::{KeyLayout, KeyTable, LayoutError, ZoneProbe};
pub use style::{Action, IconRef, KeyStyle, PLACEHOLDER_ICON};
