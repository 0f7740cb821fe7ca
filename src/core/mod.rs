//! Core module - View state, configuration, and deck events

pub mod config;
pub mod events;
pub mod state;
