//! State machine for the power outputs
//!
//! Names the states the controller moves through. The controller decides
//! from the countdown and the button latch; the state machine records where
//! that decision left the outputs.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
