//! Clock system driver.
//!
//! Switching the system clock is a two step affair: enable the oscillator and
//! wait until it is stable, then select it. The selection and the prescalers
//! are written through the configuration change protection.
//!
//! ```
//! use xmega_core::device::Peripherals;
//! use xmega_core::drv::clk::ClockSystem;
//! use xmega_core::map::{clk::{PrescalerA, PrescalerBC, SystemSource}, osc::Oscillator};
//! use xmega_core::sim::{self, models::ClockModel};
//!
//! sim::attach(ClockModel::new(2));
//! let p = Peripherals::take().unwrap();
//! let clock = ClockSystem::new(p.clk, p.osc);
//! clock.enable_oscillator(Oscillator::Rc32M).unwrap();
//! clock.set_system_clock(SystemSource::Rc32M, PrescalerA::Div1, PrescalerBC::Div1x1).unwrap();
//! assert_eq!(clock.system_source(), Some(SystemSource::Rc32M));
//! ```

use crate::map::{
    clk::{Clk, PrescalerA, PrescalerBC, RtcSource, SystemSource, UsbPrescaler, UsbSource},
    cpu::protected_write,
    osc::{Osc, Oscillator, PllSource},
};
use core::fmt;

/// Maximum number of status reads spent waiting for an oscillator.
pub const READY_BUDGET: u32 = 50_000;

/// Clock system failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The oscillator didn't become ready within [`READY_BUDGET`] polls.
    Timeout(Oscillator),
    /// The oscillator isn't running.
    NotReady(Oscillator),
    /// The oscillator clocks the system and can't be stopped.
    InUse(Oscillator),
    /// The PLL runs and can't be reconfigured.
    PllRunning,
    /// The clock system is locked until the next reset.
    Locked,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(osc) => write!(f, "oscillator {osc:?} didn't stabilize"),
            Self::NotReady(osc) => write!(f, "oscillator {osc:?} isn't ready"),
            Self::InUse(osc) => write!(f, "oscillator {osc:?} clocks the system"),
            Self::PllRunning => f.write_str("PLL is running"),
            Self::Locked => f.write_str("clock system is locked"),
        }
    }
}

/// Driver of the clock system at `CLK` and the oscillators at `OSC`.
pub struct ClockSystem<const CLK: usize, const OSC: usize> {
    clk: Clk<CLK>,
    osc: Osc<OSC>,
}

impl<const CLK: usize, const OSC: usize> ClockSystem<CLK, OSC> {
    /// Creates the driver. Nothing is written.
    #[inline]
    pub fn new(clk: Clk<CLK>, osc: Osc<OSC>) -> Self {
        Self { clk, osc }
    }

    /// Releases the peripherals.
    #[inline]
    pub fn free(self) -> (Clk<CLK>, Osc<OSC>) {
        (self.clk, self.osc)
    }

    /// Returns `true` if `osc` is enabled and stable.
    #[inline]
    pub fn is_ready(&self, osc: Oscillator) -> bool {
        self.osc.status().read() & osc.mask() != 0
    }

    /// Enables `osc` and waits until it is stable.
    pub fn enable_oscillator(&self, osc: Oscillator) -> Result<(), ClockError> {
        self.osc.ctrl().set_bits(osc.mask());
        for _ in 0..READY_BUDGET {
            if self.is_ready(osc) {
                debug!("CLK: {} ready", osc);
                return Ok(());
            }
        }
        warn!("CLK: {} timed out", osc);
        Err(ClockError::Timeout(osc))
    }

    /// Stops `osc`. The oscillator clocking the system can't be stopped.
    pub fn disable_oscillator(&self, osc: Oscillator) -> Result<(), ClockError> {
        if self.system_source().map(SystemSource::oscillator) == Some(osc) {
            return Err(ClockError::InUse(osc));
        }
        self.osc.ctrl().clear_bits(osc.mask());
        Ok(())
    }

    /// Sets the PLL reference and multiplication factor. `FACTOR` must be in
    /// `1..=31`.
    pub fn configure_pll<const FACTOR: u8>(
        &self,
        source: PllSource,
        halve: bool,
    ) -> Result<(), ClockError> {
        const { assert!(matches!(FACTOR, 1..=31), "PLL factor out of range") };
        if self.osc.ctrl().pllen().is_set() {
            return Err(ClockError::PllRunning);
        }
        let pllctrl = self.osc.pllctrl();
        pllctrl.store(
            pllctrl.pllsrc().shift(source)
                | pllctrl.plldiv().shift(halve)
                | pllctrl.pllfac().shift(FACTOR),
        );
        Ok(())
    }

    /// Returns the current system clock source.
    #[inline]
    pub fn system_source(&self) -> Option<SystemSource> {
        self.clk.ctrl().sclksel().read()
    }

    /// Returns the current prescaler settings.
    pub fn prescalers(&self) -> (Option<PrescalerA>, Option<PrescalerBC>) {
        let psctrl = self.clk.psctrl();
        let snapshot = psctrl.read();
        (psctrl.psadiv().get(snapshot), psctrl.psbcdiv().get(snapshot))
    }

    /// Sets the prescalers, then switches the system clock to `source`.
    ///
    /// The oscillator behind `source` must be running. The prescalers are
    /// written first, so a faster source never overclocks the peripherals.
    pub fn set_system_clock(
        &self,
        source: SystemSource,
        prescaler_a: PrescalerA,
        prescaler_bc: PrescalerBC,
    ) -> Result<(), ClockError> {
        if self.is_locked() {
            return Err(ClockError::Locked);
        }
        let osc = source.oscillator();
        if !self.is_ready(osc) {
            return Err(ClockError::NotReady(osc));
        }
        let psctrl = self.clk.psctrl();
        let prescalers = psctrl.psadiv().shift(prescaler_a) | psctrl.psbcdiv().shift(prescaler_bc);
        protected_write(*psctrl, prescalers.value());
        let ctrl = self.clk.ctrl();
        protected_write(*ctrl, ctrl.sclksel().shift(source).value());
        debug!("CLK: system clock {}", source);
        Ok(())
    }

    /// Freezes CTRL and PSCTRL until the next reset.
    pub fn lock(&self) {
        let lock = self.clk.lock();
        protected_write(*lock, lock.lock().shift(true).value());
        debug!("CLK: locked");
    }

    /// Returns `true` if the clock system is locked.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.clk.lock().lock().is_set()
    }

    /// Selects the RTC clock and enables it.
    pub fn enable_rtc(&self, source: RtcSource) {
        let rtcctrl = self.clk.rtcctrl();
        rtcctrl.store(rtcctrl.rtcsrc().shift(source) | rtcctrl.rtcen().shift(true));
    }

    /// Disables the RTC clock, keeping the source selection.
    #[inline]
    pub fn disable_rtc(&self) {
        self.clk.rtcctrl().rtcen().clear();
    }

    /// Selects the USB clock and enables it.
    pub fn enable_usb(&self, source: UsbSource, prescaler: UsbPrescaler) {
        let usbctrl = self.clk.usbctrl();
        usbctrl.store(
            usbctrl.usbpsdiv().shift(prescaler)
                | usbctrl.usbsrc().shift(source)
                | usbctrl.usbsen().shift(true),
        );
    }

    /// Disables the USB clock, keeping the source selection.
    #[inline]
    pub fn disable_usb(&self) {
        self.clk.usbctrl().usbsen().clear();
    }
}

mod compile_tests {
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! use xmega_core::drv::clk::ClockSystem;
    //! use xmega_core::map::osc::PllSource;
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     let clock = ClockSystem::new(p.clk, p.osc);
    //!     clock.configure_pll::<32>(PllSource::Rc2M, false).unwrap();
    //! }
    //! ```
}
