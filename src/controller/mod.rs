//! Controller module - panel state machine and session dispatch

mod dispatch;
mod view;

pub use dispatch::{run_session, SessionOptions};
pub use view::{Flow, SessionOutcome, ViewController, ZoneOptions};
