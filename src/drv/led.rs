//! LED on a GPIO pin.

use crate::gpio::{GpioPin, PinConfig, PinRole};

/// An LED driven by a pin, lit either by a high level or, when inverted, by
/// a low one.
///
/// Inversion is done by the port, so [`on`](Self::on) always means lit.
pub struct Led<P> {
    pin: P,
    inverted: bool,
}

impl<P: GpioPin> Led<P> {
    /// An LED lit by a high level.
    #[inline]
    pub fn new(pin: P) -> Self {
        Self { pin, inverted: false }
    }

    /// An LED lit by a low level.
    #[inline]
    pub fn inverted(pin: P) -> Self {
        Self { pin, inverted: true }
    }

    /// Returns `true` if the LED is lit by a low level.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Releases the pin.
    #[inline]
    pub fn free(self) -> P {
        self.pin
    }

    /// Makes the pin an output.
    pub fn init(&self) {
        if self.inverted {
            self.pin.set_output();
            self.pin.configure(PinConfig::INVERT | PinConfig::TOTEM);
        } else {
            self.pin.set_role(PinRole::OutputLow);
        }
    }

    /// Lights the LED.
    #[inline]
    pub fn on(&self) {
        self.pin.set_high();
    }

    /// Turns the LED off.
    #[inline]
    pub fn off(&self) {
        self.pin.set_low();
    }

    /// Toggles the LED.
    #[inline]
    pub fn toggle(&self) {
        self.pin.toggle();
    }

    /// Lights the LED if `on` is set, turns it off otherwise.
    #[inline]
    pub fn set(&self, on: bool) {
        self.pin.set_value(on);
    }
}
