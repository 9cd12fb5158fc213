//! Power control
//!
//! The tick and button handlers only touch [`PowerSignals`]; the
//! [`PowerController`] is the single consumer that turns those signals into
//! output changes.

pub mod controller;
pub mod signals;

pub use controller::{PassEvents, PowerController, PowerOutputs, MAX_EVENTS_PER_PASS};
pub use signals::PowerSignals;
