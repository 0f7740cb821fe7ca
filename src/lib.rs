//! Sonos Deck
//!
//! Drives a Stream Deck as a control surface for a Sonos zone.
//!
//! # Features
//! - Home, item selection and exit confirmation screens driven from a declarative key table
//! - Key tiles rendered from icon and font assets, including a rotating item list
//! - Play/pause, track skip and volume keys for one Sonos zone over UPnP
//! - Clean shutdown or restart from the deck itself

pub mod controller;
pub mod core;
pub mod hid;
pub mod keys;
pub mod render;
pub mod zone;

pub use controller::{run_session, SessionOutcome, ViewController};
pub use core::config::Config;
pub use core::events::DeckEvent;
pub use core::state::ViewState;
pub use keys::KeyTable;
