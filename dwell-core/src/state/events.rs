//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A debounced button press was consumed
    Press,
    /// The double-press window passed without a second press
    WindowElapsed,
    /// The countdown was found at zero
    CountdownExpired,
}

impl Event {
    /// Check if this event comes from elapsed time
    pub fn is_timer_event(&self) -> bool {
        matches!(self, Event::WindowElapsed | Event::CountdownExpired)
    }
}
