//! Power controller
//!
//! One [`PowerController::service`] call is one pass of the main loop:
//!
//! 1. If a press is latched:
//!    - countdown at zero: switch everything on and arm the full hold time
//!    - otherwise: indicator off, arm the short pending-off countdown,
//!      debounce, wait out the double-press window and look at the latch
//!      again; a fresh press re-arms the full hold time
//!    - debounce
//! 2. If the countdown is at zero: switch everything off.
//!
//! A single press while on and a double press while on share the same path
//! and differ only in what the second latch check sees. The waits are
//! awaited, so the tick and button handlers keep running underneath.

use dwell_hal::OutputPin;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::config::{OutputConfig, PowerConfig};
use crate::state::{Event, State};

use super::signals::PowerSignals;

/// Upper bound of state events a single pass can produce
pub const MAX_EVENTS_PER_PASS: usize = 4;

/// State events applied during one pass, in order
pub type PassEvents = Vec<Event, MAX_EVENTS_PER_PASS>;

/// Outputs driven by the controller
#[derive(Debug)]
pub struct PowerOutputs<O> {
    /// Status indicator
    pub indicator: O,
    /// First relay
    pub relay1: O,
    /// Second relay
    pub relay2: O,
    /// Auxiliary output
    pub aux: O,
}

/// Relay hold-timer controller
pub struct PowerController<'s, O> {
    signals: &'s PowerSignals,
    outputs: PowerOutputs<O>,
    config: PowerConfig,
    aux_follows_relays: bool,
    state: State,
}

impl<'s, O: OutputPin> PowerController<'s, O> {
    /// Create a controller with every output switched off
    pub fn new(
        signals: &'s PowerSignals,
        mut outputs: PowerOutputs<O>,
        config: PowerConfig,
        output_config: OutputConfig,
    ) -> Self {
        outputs.indicator.set_low();
        outputs.relay1.set_low();
        outputs.relay2.set_low();
        outputs.aux.set_low();

        Self {
            signals,
            outputs,
            config,
            aux_follows_relays: output_config.aux_follows_relays,
            state: State::Off,
        }
    }

    /// Current power state
    pub fn state(&self) -> State {
        self.state
    }

    /// The driven outputs
    pub fn outputs(&self) -> &PowerOutputs<O> {
        &self.outputs
    }

    /// Active timings
    pub fn config(&self) -> &PowerConfig {
        &self.config
    }

    /// Run one pass of the main loop
    ///
    /// Returns the state events applied during the pass.
    pub async fn service<D: DelayNs>(&mut self, delay: &mut D) -> PassEvents {
        let mut events = PassEvents::new();

        if self.signals.is_pressed() {
            if self.signals.remaining() == 0 {
                // A countdown that ran out since the last pass
                if self.state != State::Off {
                    self.apply(Event::CountdownExpired, &mut events);
                }
                self.switch_on();
                self.apply(Event::Press, &mut events);
            } else {
                // Acknowledge the press right away
                self.outputs.indicator.set_low();
                self.signals.arm(self.config.pending_off_ticks);
                self.apply(Event::Press, &mut events);

                self.debounce(delay).await;

                delay.delay_ms(self.config.double_press_window_ms).await;
                if self.signals.is_pressed() {
                    self.outputs.indicator.set_high();
                    self.signals.arm(self.config.power_on_time_s);
                    self.apply(Event::Press, &mut events);
                } else {
                    self.apply(Event::WindowElapsed, &mut events);
                }
            }

            self.debounce(delay).await;
        }

        if self.signals.remaining() == 0 {
            self.switch_off();
            if self.state != State::Off {
                self.apply(Event::CountdownExpired, &mut events);
            }
        }

        events
    }

    fn switch_on(&mut self) {
        self.outputs.indicator.set_high();
        self.outputs.relay1.set_high();
        self.outputs.relay2.set_high();
        if self.aux_follows_relays {
            self.outputs.aux.set_high();
        }
        self.signals.arm(self.config.power_on_time_s);
    }

    fn switch_off(&mut self) {
        self.outputs.indicator.set_low();
        self.outputs.relay1.set_low();
        self.outputs.relay2.set_low();
        if self.aux_follows_relays {
            self.outputs.aux.set_low();
        }
    }

    /// Hold the latch for the debounce delay, then clear it
    async fn debounce<D: DelayNs>(&mut self, delay: &mut D) {
        delay.delay_ms(self.config.debounce_ms).await;
        self.signals.clear_press();
    }

    fn apply(&mut self, event: Event, events: &mut PassEvents) {
        self.state = self.state.transition(event);
        // Bounded by the pass structure above
        let _ = events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwell_hal::sim::SimPort;
    use dwell_hal::{Output, Pin, PortRegisters};
    use embassy_futures::block_on;

    const TICK_MS: u32 = 1000;

    /// Test clock standing in for the hardware timer and the button
    ///
    /// Time only moves while the controller awaits a delay or the test
    /// calls [`Clock::advance`]. Ticks and scripted presses are delivered to
    /// the signals as time passes, like the interrupt handlers would.
    struct Clock<'a> {
        signals: &'a PowerSignals,
        now_ms: u32,
        next_tick_ms: u32,
        presses_ms: &'a [u32],
        next_press: usize,
    }

    impl<'a> Clock<'a> {
        fn new(signals: &'a PowerSignals, presses_ms: &'a [u32]) -> Self {
            Self {
                signals,
                now_ms: 0,
                next_tick_ms: TICK_MS,
                presses_ms,
                next_press: 0,
            }
        }

        fn advance(&mut self, ms: u32) {
            for _ in 0..ms {
                self.now_ms += 1;
                if self.now_ms >= self.next_tick_ms {
                    self.signals.on_tick();
                    self.next_tick_ms += TICK_MS;
                }
                while self
                    .presses_ms
                    .get(self.next_press)
                    .is_some_and(|&at| at <= self.now_ms)
                {
                    self.signals.on_button_edge(true);
                    self.next_press += 1;
                }
            }
        }
    }

    impl DelayNs for Clock<'_> {
        async fn delay_ns(&mut self, ns: u32) {
            self.advance(ns / 1_000_000);
        }

        async fn delay_us(&mut self, us: u32) {
            self.advance(us / 1000);
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.advance(ms);
        }
    }

    fn test_config() -> PowerConfig {
        PowerConfig {
            power_on_time_s: 10,
            ..PowerConfig::default()
        }
    }

    fn controller<'a>(
        port: &'a SimPort,
        signals: &'a PowerSignals,
        output_config: OutputConfig,
    ) -> PowerController<'a, Output<'a, SimPort>> {
        let outputs = PowerOutputs {
            relay2: Output::new(Pin::active_high(port, 1).unwrap()),
            relay1: Output::new(Pin::active_high(port, 2).unwrap()),
            aux: Output::new(Pin::active_high(port, 3).unwrap()),
            indicator: Output::new(Pin::active_high(port, 4).unwrap()),
        };
        PowerController::new(signals, outputs, test_config(), output_config)
    }

    fn relays_on(ctrl: &PowerController<'_, Output<'_, SimPort>>) -> bool {
        let outputs = ctrl.outputs();
        outputs.relay1.level() && outputs.relay2.level()
    }

    fn relays_off(ctrl: &PowerController<'_, Output<'_, SimPort>>) -> bool {
        let outputs = ctrl.outputs();
        !outputs.relay1.level() && !outputs.relay2.level()
    }

    /// Run the main loop until `until_ms`, one pass every 10 ms
    fn run_until(
        ctrl: &mut PowerController<'_, Output<'_, SimPort>>,
        clock: &mut Clock<'_>,
        until_ms: u32,
    ) -> std::vec::Vec<Event> {
        let mut all = std::vec::Vec::new();
        while clock.now_ms < until_ms {
            all.extend(block_on(ctrl.service(clock)));
            clock.advance(10);
        }
        all
    }

    #[test]
    fn test_starts_with_outputs_off() {
        let port = SimPort::new();
        port.write_driven_level(4, true);
        let signals = PowerSignals::new();
        let ctrl = controller(&port, &signals, OutputConfig::default());

        assert_eq!(ctrl.state(), State::Off);
        assert_eq!(port.output_bits(), 0);
        assert_eq!(port.direction_bits(), 0b0001_1110);
    }

    #[test]
    fn test_ticks_while_off_change_nothing() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[]);

        let events = run_until(&mut ctrl, &mut clock, 30_000);

        assert!(events.is_empty());
        assert_eq!(ctrl.state(), State::Off);
        assert_eq!(signals.remaining(), 0);
        assert_eq!(port.output_bits(), 0);
    }

    #[test]
    fn test_press_while_off_switches_on() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[]);

        signals.on_button_edge(true);
        let events = block_on(ctrl.service(&mut clock));

        assert_eq!(events.as_slice(), &[Event::Press]);
        assert_eq!(ctrl.state(), State::On);
        assert_eq!(signals.remaining(), 10);
        assert!(relays_on(&ctrl));
        assert!(ctrl.outputs().indicator.level());
        // Aux held inactive by default
        assert!(!ctrl.outputs().aux.level());
        // Latch cleared after the debounce delay
        assert!(!signals.is_pressed());
        assert_eq!(clock.now_ms, 100);
    }

    #[test]
    fn test_hold_time_expires() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[500]);

        run_until(&mut ctrl, &mut clock, 9_000);
        assert!(relays_on(&ctrl));

        let events = run_until(&mut ctrl, &mut clock, 12_000);
        assert_eq!(events, [Event::CountdownExpired]);
        assert_eq!(ctrl.state(), State::Off);
        assert!(relays_off(&ctrl));
        assert!(!ctrl.outputs().indicator.level());
    }

    #[test]
    fn test_single_press_while_on_powers_down() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[100, 3_000]);

        run_until(&mut ctrl, &mut clock, 2_900);
        assert!(relays_on(&ctrl));

        // The press at 3000 ms is consumed on the next pass
        run_until(&mut ctrl, &mut clock, 3_001);
        assert!(!ctrl.outputs().indicator.level());
        assert!(relays_on(&ctrl));

        // Off within the pending-off countdown plus one tick of jitter
        let pending = test_config().pending_off_ticks;
        let events = run_until(&mut ctrl, &mut clock, 3_000 + (pending + 1) * TICK_MS);
        assert!(events.contains(&Event::CountdownExpired));
        assert_eq!(ctrl.state(), State::Off);
        assert!(relays_off(&ctrl));
    }

    #[test]
    fn test_double_press_keeps_outputs_on() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        // Second press lands inside the window after the first one
        let mut clock = Clock::new(&signals, &[100, 3_000, 3_600]);

        let events = run_until(&mut ctrl, &mut clock, 6_000);
        assert_eq!(events, [Event::Press, Event::Press, Event::Press]);
        assert_eq!(ctrl.state(), State::On);
        // Re-armed at 4100 ms, ticks at 5000 and 6000 since
        assert_eq!(signals.remaining(), 8);

        // Well past the pending-off countdown
        let events = run_until(&mut ctrl, &mut clock, 8_000);
        assert!(events.is_empty());
        assert!(relays_on(&ctrl));
        assert!(ctrl.outputs().indicator.level());
    }

    #[test]
    fn test_double_press_within_one_pass() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[500]);

        block_on(ctrl.service(&mut clock));
        run_until(&mut ctrl, &mut clock, 2_000);
        assert_eq!(ctrl.state(), State::On);

        signals.on_button_edge(true);
        // Second press arrives while the controller waits in the window
        clock.presses_ms = &[2_600];
        clock.next_press = 0;
        let events = block_on(ctrl.service(&mut clock));

        assert_eq!(events.as_slice(), &[Event::Press, Event::Press]);
        assert_eq!(ctrl.state(), State::On);
        assert!(ctrl.outputs().indicator.level());
        assert_eq!(signals.remaining(), 10);
        assert!(!signals.is_pressed());
    }

    #[test]
    fn test_window_without_second_press() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[]);

        signals.on_button_edge(true);
        block_on(ctrl.service(&mut clock));
        clock.advance(400);

        signals.on_button_edge(true);
        let events = block_on(ctrl.service(&mut clock));

        // 100 + 400 ms before, 1200 ms of waits inside: one tick fell in
        assert_eq!(events.as_slice(), &[Event::Press, Event::WindowElapsed]);
        assert_eq!(signals.remaining(), 1);
        assert_eq!(ctrl.state(), State::On);
        assert!(!ctrl.outputs().indicator.level());
        assert!(relays_on(&ctrl));
    }

    #[test]
    fn test_press_as_latch_clears_is_absorbed() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        // Lands on the millisecond the debounce delay ends
        let mut clock = Clock::new(&signals, &[100]);

        signals.on_button_edge(true);
        let events = block_on(ctrl.service(&mut clock));

        assert_eq!(events.as_slice(), &[Event::Press]);
        assert_eq!(clock.now_ms, 100);
        assert!(!signals.is_pressed());
        assert_eq!(ctrl.state(), State::On);
        assert_eq!(signals.remaining(), 10);
        assert!(relays_on(&ctrl));
        assert!(ctrl.outputs().indicator.level());

        let events = block_on(ctrl.service(&mut clock));
        assert!(events.is_empty());
        assert_eq!(ctrl.state(), State::On);
        assert_eq!(signals.remaining(), 10);
    }

    #[test]
    fn test_press_as_latch_clears_after_window() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[]);

        signals.on_button_edge(true);
        block_on(ctrl.service(&mut clock));
        clock.advance(400);

        // 500 + 100 debounce + 1000 window, then the closing debounce
        // clears the latch at 1700 ms
        signals.on_button_edge(true);
        clock.presses_ms = &[1_700];
        clock.next_press = 0;
        let events = block_on(ctrl.service(&mut clock));

        assert_eq!(events.as_slice(), &[Event::Press, Event::WindowElapsed]);
        assert_eq!(clock.now_ms, 1_700);
        assert!(!signals.is_pressed());
        assert_eq!(ctrl.state(), State::On);
        assert_eq!(signals.remaining(), 1);
        assert!(!ctrl.outputs().indicator.level());
        assert!(relays_on(&ctrl));

        // The absorbed press does not cancel the power-down
        let events = run_until(&mut ctrl, &mut clock, 2_100);
        assert_eq!(events, [Event::CountdownExpired]);
        assert_eq!(ctrl.state(), State::Off);
        assert!(relays_off(&ctrl));
    }

    #[test]
    fn test_press_after_silent_expiry_switches_on() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[]);

        signals.on_button_edge(true);
        block_on(ctrl.service(&mut clock));
        assert_eq!(ctrl.state(), State::On);

        // Countdown runs out and a press is latched before the next pass
        clock.advance(10_000);
        assert_eq!(signals.remaining(), 0);
        signals.on_button_edge(true);

        let events = block_on(ctrl.service(&mut clock));
        assert_eq!(
            events.as_slice(),
            &[Event::CountdownExpired, Event::Press]
        );
        assert_eq!(ctrl.state(), State::On);
        assert_eq!(signals.remaining(), 10);
        assert!(relays_on(&ctrl));
    }

    #[test]
    fn test_aux_follows_relays_when_configured() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let mut ctrl = controller(
            &port,
            &signals,
            OutputConfig {
                aux_follows_relays: true,
            },
        );
        let mut clock = Clock::new(&signals, &[100]);

        run_until(&mut ctrl, &mut clock, 1_000);
        assert!(ctrl.outputs().aux.level());

        run_until(&mut ctrl, &mut clock, 12_000);
        assert!(!ctrl.outputs().aux.level());
    }

    #[test]
    fn test_outputs_leave_other_pins_alone() {
        let port = SimPort::new();
        // Unrelated lines 0 (button) and 7 share the port
        port.write_driven_level(0, true);
        port.write_driven_level(7, true);
        let signals = PowerSignals::new();
        let mut ctrl = controller(&port, &signals, OutputConfig::default());
        let mut clock = Clock::new(&signals, &[100]);

        run_until(&mut ctrl, &mut clock, 1_000);
        assert_eq!(port.output_bits(), 0b1001_0111);

        run_until(&mut ctrl, &mut clock, 12_000);
        assert_eq!(port.output_bits(), 0b1000_0001);
    }

    #[test]
    fn test_active_low_outputs() {
        let port = SimPort::new();
        let signals = PowerSignals::new();
        let outputs = PowerOutputs {
            relay2: Output::new(Pin::active_low(&port, 1).unwrap()),
            relay1: Output::new(Pin::active_low(&port, 2).unwrap()),
            aux: Output::new(Pin::active_low(&port, 3).unwrap()),
            indicator: Output::new(Pin::active_low(&port, 4).unwrap()),
        };
        let mut ctrl =
            PowerController::new(&signals, outputs, test_config(), OutputConfig::default());
        assert_eq!(port.output_bits(), 0b0001_1110);

        let mut clock = Clock::new(&signals, &[]);
        signals.on_button_edge(true);
        block_on(ctrl.service(&mut clock));

        // Indicator and relays pulled low, aux still inactive (high)
        assert_eq!(port.output_bits(), 0b0000_1000);
    }
}
