//! Tick task
//!
//! Counts the power-down countdown down once per second.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::{SIGNALS, WAKE};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Tick task - decrements the countdown and wakes the controller at zero
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;

        let remaining = SIGNALS.on_tick();
        trace!("Tick, {} s remaining", remaining);

        if remaining == 0 {
            WAKE.signal(());
        }
    }
}
