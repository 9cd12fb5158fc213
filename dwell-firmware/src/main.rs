//! Dwell - Relay Hold-Timer Firmware
//!
//! Main firmware binary for RP2040-based boards. A button press switches two
//! relays on and holds them for a configured time; a press while on starts a
//! short power-down countdown that a second press cancels.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{self, Pull};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use dwell_core::config::{BoardConfig, DeviceConfig, PinConfig};
use dwell_core::power::{PowerController, PowerOutputs};
use dwell_hal_rp2040::{
    BankError, Input, Output, Pin, PinBank, PinError, SioBank0, GPIO_COUNT,
};

use crate::channels::SIGNALS;

mod channels;
mod tasks;

/// Embedded board configuration (compiled into firmware)
/// Edit dwell.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../dwell.toml");

// GPIO bank handle shared by every pin (must live forever)
static SIO: StaticCell<SioBank0> = StaticCell::new();

type BoardOutputs = PowerOutputs<Output<'static, SioBank0>>;

/// Board I/O built from the pin assignment
struct Board {
    /// Edge interrupt source on the button line
    edges: gpio::Input<'static>,
    /// Button level with the configured polarity
    button: Input<'static, SioBank0>,
    outputs: BoardOutputs,
}

/// Pin setup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
enum BoardError {
    /// Pin number rejected by the port
    Pin(PinError),
    /// Pin peripheral not available
    Bank(BankError),
}

impl From<PinError> for BoardError {
    fn from(e: PinError) -> Self {
        BoardError::Pin(e)
    }
}

impl From<BankError> for BoardError {
    fn from(e: BankError) -> Self {
        BoardError::Bank(e)
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Dwell firmware starting...");

    // Clocks, time driver and GPIO bank resets
    let p = embassy_rp::init(Default::default());
    let mut bank = PinBank::new(p);
    info!("Peripherals initialized");

    // Fully checked before any pin register is touched
    let config = load_config();

    // SAFETY: output lines are driven only through this port; the button
    // line is shared with an embassy-rp Input used for its edge interrupt
    let sio: &'static SioBank0 = SIO.init(unsafe { SioBank0::steal() });

    // Cannot fail: load_config rejected out-of-range and shared pins
    let board = unwrap!(init_board(&mut bank, sio, &config.board));
    info!(
        "Board initialized: button=gpio{}, relays=gpio{}/gpio{}",
        config.board.button.pin, config.board.relay1.pin, config.board.relay2.pin
    );

    let controller = PowerController::new(&SIGNALS, board.outputs, config.power, config.outputs);

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner
        .spawn(tasks::button_task(board.edges, board.button))
        .unwrap();
    spawner.spawn(tasks::controller_task(controller)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse and check the embedded configuration
///
/// Falls back to the built-in defaults if the embedded TOML is rejected or
/// names a pin this chip does not have.
fn load_config() -> DeviceConfig {
    let config = match DeviceConfig::from_toml(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            // build.rs checks dwell.toml, so this only catches parser drift
            warn!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            return DeviceConfig::default();
        }
    };

    if let Some(pin) = config.board.pin_out_of_range(GPIO_COUNT) {
        warn!("gpio{} does not exist, using default configuration", pin);
        return DeviceConfig::default();
    }

    info!(
        "Configuration loaded: hold={} s, pending-off={} s, window={} ms",
        config.power.power_on_time_s,
        config.power.pending_off_ticks,
        config.power.double_press_window_ms
    );
    config
}

/// Configure the button input and the four outputs
///
/// Outputs start inactive before they are driven.
fn init_board(
    bank: &mut PinBank,
    sio: &'static SioBank0,
    board: &BoardConfig,
) -> Result<Board, BoardError> {
    let output = |cfg: PinConfig| -> Result<Output<'static, SioBank0>, BoardError> {
        let pin = Pin::new(sio, cfg.pin, cfg.inverted)?;
        Ok(Output::with_level(pin, false))
    };

    let pull = if board.button.pull_up {
        Pull::Up
    } else {
        Pull::None
    };
    let edges = gpio::Input::new(bank.take(board.button.pin)?, pull);
    let button = Input::new(
        Pin::new(sio, board.button.pin, board.button.inverted)?,
        board.button.pull_up,
    );

    let outputs = PowerOutputs {
        indicator: output(board.indicator)?,
        relay1: output(board.relay1)?,
        relay2: output(board.relay2)?,
        aux: output(board.aux)?,
    };

    Ok(Board {
        edges,
        button,
        outputs,
    })
}
