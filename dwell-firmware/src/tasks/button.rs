//! Button task
//!
//! Waits for a GPIO edge interrupt on the button line and latches a press
//! when the line reads active afterwards. Debouncing is left to the
//! controller, which holds the latch for the configured delay before
//! clearing it.

use defmt::*;
use embassy_rp::gpio;

use dwell_hal_rp2040::{Input, SioBank0};

use crate::channels::{SIGNALS, WAKE};

/// Button task - turns button edges into latched presses
///
/// `edges` is the embassy-rp view of the line, used only for its edge
/// interrupt; `button` reads the line with the configured polarity.
#[embassy_executor::task]
pub async fn button_task(mut edges: gpio::Input<'static>, button: Input<'static, SioBank0>) {
    info!("Button task started on gpio{}", button.pin().index());

    loop {
        edges.wait_for_any_edge().await;

        if SIGNALS.on_button_edge(button.read()) {
            debug!("Button press latched");
            WAKE.signal(());
        }
    }
}
