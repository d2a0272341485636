//! Mapping a failing example back to its table row.

mod attributor;
mod locator;
mod trace;

pub use attributor::{Attributor, DEFAULT_FRAME_NAME_CAP, DEFAULT_TEST_PREFIX, FailureReport};
pub use locator::{locate, locate_in};
pub use trace::{Frame, FrameLocation, Trace};
