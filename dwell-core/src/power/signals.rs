//! Signals shared between the handlers and the controller
//!
//! | Cell        | Set by          | Cleared / armed by | Decremented by |
//! |-------------|-----------------|--------------------|----------------|
//! | `pressed`   | button handler  | controller         | -              |
//! | `countdown` | -               | controller         | tick handler   |
//!
//! Both cells are single words accessed atomically, so the handlers never
//! block. The controller's zero check and the tick handler's decrement are
//! not sequenced with each other; the worst outcome is one tick of jitter
//! on power-off.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Button latch and power-down countdown
#[derive(Debug)]
pub struct PowerSignals {
    pressed: AtomicBool,
    countdown: AtomicU32,
}

impl Default for PowerSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerSignals {
    /// Create signals with the latch clear and the countdown at zero
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
            countdown: AtomicU32::new(0),
        }
    }

    /// Tick handler: decrement the countdown, never below zero
    ///
    /// Returns the remaining ticks.
    pub fn on_tick(&self) -> u32 {
        match self
            .countdown
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1))
        {
            Ok(previous) => previous - 1,
            Err(_) => 0,
        }
    }

    /// Button handler: latch a press when the button reads active
    ///
    /// `active` is the logical button level sampled at the edge. Returns
    /// whether a press was latched.
    pub fn on_button_edge(&self, active: bool) -> bool {
        if active {
            self.pressed.store(true, Ordering::Release);
        }
        active
    }

    /// Arm the countdown
    pub fn arm(&self, ticks: u32) {
        self.countdown.store(ticks, Ordering::Release);
    }

    /// Remaining ticks until power-down
    pub fn remaining(&self) -> u32 {
        self.countdown.load(Ordering::Acquire)
    }

    /// Whether a press is latched
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    /// Clear the press latch
    pub fn clear_press(&self) {
        self.pressed.store(false, Ordering::Release);
    }
}
