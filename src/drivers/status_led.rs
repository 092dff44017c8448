//! Single-colour activity LED.
//!
//! Lit while a report is being handed to the radio or a command was just
//! handled; cleared at the start of every scheduling tick, so a busy node
//! flickers and an idle node stays dark.
//!
//! ## Dual-target design
//!
//! Generic over any `embedded_hal` output pin.  On ESP-IDF this is an
//! `esp_idf_hal::gpio::PinDriver`; on host tests, a fake pin.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::IndicatorPort;

pub struct StatusLed<P> {
    pin: P,
    active_low: bool,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap `pin` and switch the LED off.
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut led = Self {
            pin,
            active_low,
            lit: true,
        };
        led.set(false);
        led
    }

    pub fn set(&mut self, on: bool) {
        if on == self.lit {
            return;
        }
        let high = on != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            debug!("status_led: pin write failed");
        }
        self.lit = on;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl<P: OutputPin> IndicatorPort for StatusLed<P> {
    fn set_active(&mut self, on: bool) {
        self.set(on);
    }
}
