use super::{PinConfig, PinRole};
use crate::{
    map::{
        port::{self, DirClr, DirSet, In, IntCtrl, Out, OutClr, OutSet, OutTgl, Port},
        IntLevel,
    },
    reg::Reg,
};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

/// Pin `N` of the port at `PORT`.
///
/// Every access resolves to a constant address and a constant mask.
pub struct Pin<const PORT: usize, const N: u8> {
    _priv: (),
}

/// A pin whose port and number are only known at run time.
///
/// Obtained with [`Pin::degrade`]. The pin configuration register is selected
/// through an offset table instead of a compile-time constant.
#[derive(Debug)]
pub struct AnyPin {
    port: usize,
    number: u8,
}

/// The pins of one port, obtained with [`Port::split`].
#[allow(missing_docs)]
pub struct Pins<const PORT: usize> {
    pub p0: Pin<PORT, 0>,
    pub p1: Pin<PORT, 1>,
    pub p2: Pin<PORT, 2>,
    pub p3: Pin<PORT, 3>,
    pub p4: Pin<PORT, 4>,
    pub p5: Pin<PORT, 5>,
    pub p6: Pin<PORT, 6>,
    pub p7: Pin<PORT, 7>,
}

impl<const BASE: usize> Port<BASE> {
    /// Splits the port into its pins.
    pub fn split(self) -> Pins<BASE> {
        unsafe {
            Pins {
                p0: Pin::steal(),
                p1: Pin::steal(),
                p2: Pin::steal(),
                p3: Pin::steal(),
                p4: Pin::steal(),
                p5: Pin::steal(),
                p6: Pin::steal(),
                p7: Pin::steal(),
            }
        }
    }
}

impl<const PORT: usize, const N: u8> Pin<PORT, N> {
    /// Mask of the pin in the port registers.
    pub const MASK: u8 = {
        assert!(N < 8, "a port has pins 0-7 only");
        1 << N
    };

    /// Creates the pin.
    ///
    /// # Safety
    ///
    /// No other instance of the pin may exist, and nothing else may drive its
    /// bit in the port registers.
    #[inline(always)]
    pub const unsafe fn steal() -> Self {
        const { assert!(N < 8, "a port has pins 0-7 only") };
        Self { _priv: () }
    }

    /// Erases the port and pin number from the type.
    #[inline]
    pub fn degrade(self) -> AnyPin {
        AnyPin { port: PORT, number: N }
    }
}

impl AnyPin {
    /// Creates pin `number` of the port at `port`.
    ///
    /// # Safety
    ///
    /// `port` must be the base address of a PORT block, `number` must be
    /// below 8, and no other instance of the pin may exist.
    #[inline]
    pub const unsafe fn new(port: usize, number: u8) -> Self {
        Self { port, number }
    }
}

#[inline(always)]
fn port_reg(port: usize, offset: usize) -> Reg<u8> {
    unsafe { Reg::at(port + offset) }
}

/// Operations of a single GPIO pin.
///
/// Implemented for [`Pin`] and [`AnyPin`]; everything is derived from
/// [`port`](Self::port) and [`number`](Self::number).
///
/// # Safety
///
/// The provided methods write the port registers at [`port`](Self::port)
/// without further checks. An implementer must guarantee the following:
///
/// 1. `port()` returns the base address of a PORT register block.
/// 2. `number()` returns a value below 8.
/// 3. The implementing value owns the pin: no other instance drives the same
///    bit of the same port.
pub unsafe trait GpioPin {
    /// Base address of the port.
    fn port(&self) -> usize;

    /// Pin number within the port.
    fn number(&self) -> u8;

    /// Mask of the pin in the port registers.
    #[inline(always)]
    fn mask(&self) -> u8 {
        1 << (self.number() & 7)
    }

    /// Makes the pin an output.
    #[inline(always)]
    fn set_output(&self) {
        port_reg(self.port(), DirSet::OFFSET).write(self.mask());
    }

    /// Makes the pin an input.
    #[inline(always)]
    fn set_input(&self) {
        port_reg(self.port(), DirClr::OFFSET).write(self.mask());
    }

    /// Drives the output high.
    #[inline(always)]
    fn set_high(&self) {
        port_reg(self.port(), OutSet::OFFSET).write(self.mask());
    }

    /// Drives the output low.
    #[inline(always)]
    fn set_low(&self) {
        port_reg(self.port(), OutClr::OFFSET).write(self.mask());
    }

    /// Inverts the output.
    #[inline(always)]
    fn toggle(&self) {
        port_reg(self.port(), OutTgl::OFFSET).write(self.mask());
    }

    /// Drives the output high when `high` is `true`, low otherwise.
    #[inline(always)]
    fn set_value(&self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Returns the input level. The digital input buffer must be enabled.
    #[inline(always)]
    fn get_value(&self) -> bool {
        port_reg(self.port(), In::OFFSET).read() & self.mask() != 0
    }

    /// Returns the level the output is driven to.
    #[inline(always)]
    fn get_output(&self) -> bool {
        port_reg(self.port(), Out::OFFSET).read() & self.mask() != 0
    }

    /// Replaces the pin configuration register with `config`.
    #[inline(always)]
    fn configure(&self, config: PinConfig) {
        port::pinctrl_at(self.port(), self.number()).write(config.bits());
    }

    /// Adds the pin to the sources of port interrupt `INT`.
    #[inline(always)]
    fn enable_interrupt<const INT: usize>(&self) {
        port::intmask_at::<INT>(self.port()).set_bits(self.mask());
    }

    /// Removes the pin from the sources of port interrupt `INT`.
    #[inline(always)]
    fn disable_interrupt<const INT: usize>(&self) {
        port::intmask_at::<INT>(self.port()).clear_bits(self.mask());
    }

    /// Sets the level of port interrupt `INT`. The level is shared by all
    /// pins of the port.
    #[inline(always)]
    fn set_interrupt_level<const INT: usize>(&self, level: IntLevel) {
        let intctrl = unsafe { IntCtrl::at(self.port() + IntCtrl::OFFSET) };
        intctrl.intlvl().get::<INT>().write(level);
    }

    /// Parks the pin with its pull-up enabled.
    #[inline(always)]
    fn set_lowpower(&self) {
        self.configure(PinConfig::PULLUP);
    }

    /// Prepares the pin for analog use.
    #[inline(always)]
    fn set_analog(&self) {
        self.configure(PinConfig::TOTEM | PinConfig::INPUT_DISABLE);
    }

    /// Applies the preset of `role`.
    fn set_role(&self, role: PinRole) {
        match role {
            PinRole::NoInit => {}
            PinRole::Unused => self.set_lowpower(),
            PinRole::OutputLow => {
                self.set_output();
                self.configure(PinConfig::TOTEM);
                self.set_low();
            }
            PinRole::OutputHigh => {
                self.set_output();
                self.configure(PinConfig::TOTEM);
                self.set_high();
            }
            PinRole::InputFloating => {
                self.set_input();
                self.configure(PinConfig::TOTEM);
            }
            PinRole::InputBusKeeper => {
                self.set_input();
                self.configure(PinConfig::BUSKEEPER);
            }
            PinRole::InputPullUp => {
                self.set_input();
                self.configure(PinConfig::PULLUP);
            }
            PinRole::InputPullDown => {
                self.set_input();
                self.configure(PinConfig::PULLDOWN);
            }
            PinRole::Analog => {
                self.set_input();
                self.set_analog();
            }
        }
    }
}

unsafe impl<const PORT: usize, const N: u8> GpioPin for Pin<PORT, N> {
    #[inline(always)]
    fn port(&self) -> usize {
        PORT
    }

    #[inline(always)]
    fn number(&self) -> u8 {
        N
    }

    #[inline(always)]
    fn mask(&self) -> u8 {
        Self::MASK
    }
}

unsafe impl GpioPin for AnyPin {
    #[inline(always)]
    fn port(&self) -> usize {
        self.port
    }

    #[inline(always)]
    fn number(&self) -> u8 {
        self.number
    }
}

macro_rules! digital {
    ($({$(const $param:ident: $param_ty:ty),*})? $pin:ty) => {
        impl$(<$(const $param: $param_ty),*>)? ErrorType for $pin {
            type Error = Infallible;
        }

        impl$(<$(const $param: $param_ty),*>)? OutputPin for $pin {
            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                GpioPin::set_low(self);
                Ok(())
            }

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                GpioPin::set_high(self);
                Ok(())
            }
        }

        impl$(<$(const $param: $param_ty),*>)? StatefulOutputPin for $pin {
            #[inline]
            fn is_set_high(&mut self) -> Result<bool, Infallible> {
                Ok(self.get_output())
            }

            #[inline]
            fn is_set_low(&mut self) -> Result<bool, Infallible> {
                Ok(!self.get_output())
            }

            #[inline]
            fn toggle(&mut self) -> Result<(), Infallible> {
                GpioPin::toggle(self);
                Ok(())
            }
        }

        impl$(<$(const $param: $param_ty),*>)? InputPin for $pin {
            #[inline]
            fn is_high(&mut self) -> Result<bool, Infallible> {
                Ok(self.get_value())
            }

            #[inline]
            fn is_low(&mut self) -> Result<bool, Infallible> {
                Ok(!self.get_value())
            }
        }
    };
}

digital!({const PORT: usize, const N: u8} Pin<PORT, N>);
digital!(AnyPin);
