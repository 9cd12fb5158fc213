//! Main controller task
//!
//! Runs the power controller passes. A pass starts when the button task
//! latches a press or the tick task finds the countdown at zero.

use defmt::*;
use embassy_time::Delay;

use dwell_core::power::PowerController;
use dwell_hal_rp2040::{Output, SioBank0};

use crate::channels::{SIGNALS, WAKE};

/// Controller type driven by this firmware
pub type BoardController = PowerController<'static, Output<'static, SioBank0>>;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut controller: BoardController) {
    info!(
        "Controller task started, hold time {} s",
        controller.config().power_on_time_s
    );

    let mut delay = Delay;

    loop {
        let events = controller.service(&mut delay).await;

        for event in &events {
            if event.is_timer_event() {
                info!("Timer event {:?}", event);
            } else {
                debug!("Button event {:?}", event);
            }
        }
        if !events.is_empty() {
            info!(
                "State {:?}, {} s remaining",
                controller.state(),
                SIGNALS.remaining()
            );
        }

        // A signal raised during the pass is kept, so nothing is lost here
        WAKE.wait().await;
    }
}
