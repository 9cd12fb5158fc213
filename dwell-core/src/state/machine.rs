//! State machine definition
//!
//! Relay and indicator behaviour is a function of the current state and an
//! event.

use super::events::Event;

/// Power states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Outputs off, countdown at zero
    #[default]
    Off,
    /// Outputs on, countdown running
    On,
    /// Press registered while on; a second press within the window
    /// cancels the power-down
    PendingOff,
}

impl State {
    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Off transitions
            (Off, Press) => On,

            // On transitions
            (On, Press) => PendingOff,
            (On, CountdownExpired) => Off,

            // PendingOff transitions
            (PendingOff, Press) => On,
            // The short countdown keeps running; power-off follows from it
            (PendingOff, WindowElapsed) => On,
            (PendingOff, CountdownExpired) => Off,

            // Default: stay in current state
            _ => self,
        }
    }
}
