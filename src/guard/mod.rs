//! Anti-cheat session guard
//!
//! - `MediaBusyGuard`: suppression flag raised around device requests
//! - `SessionGuard`: fullscreen / tab-visibility state machine for interview pages

mod media_busy;
mod session_guard;

pub use media_busy::MediaBusyGuard;
pub use session_guard::{GuardNotice, GuardStatus, Page, SessionGuard, Viewport};
