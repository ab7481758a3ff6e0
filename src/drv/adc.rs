//! Blocking single-ended ADC driver.
//!
//! Channel indices are const generics; channels above 3 don't compile.
//!
//! ```
//! use xmega_core::device::Peripherals;
//! use xmega_core::drv::adc::{AdcConfig, SingleEndedAdc};
//! use xmega_core::sim::{self, models::AdcModel};
//!
//! sim::attach(AdcModel::new(0x0200, 2).with_input(5, 0x0ABC));
//! let p = Peripherals::take().unwrap();
//! let adc = SingleEndedAdc::new(p.adca);
//! adc.init(AdcConfig::default());
//! adc.start();
//! assert_eq!(adc.read::<1>(5), 0x0ABC);
//! ```

use crate::map::{
    adc::{
        Adc, CurrentLimit, Gain, InputMode, InternalInput, InterruptMode, NegativeInput,
        PositiveInput, Prescaler, Reference, Resolution,
    },
    IntLevel,
};

/// Converter settings applied by [`SingleEndedAdc::init`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// Result resolution and alignment.
    pub resolution: Resolution,
    /// Clock prescaler.
    pub prescaler: Prescaler,
    /// High impedance gain stage.
    pub high_impedance: bool,
    /// Current limitation.
    pub current_limit: CurrentLimit,
    /// Signed conversion mode.
    pub signed: bool,
}

/// ADC driver for the ADC at `BASE`.
pub struct SingleEndedAdc<const BASE: usize> {
    adc: Adc<BASE>,
}

impl<const BASE: usize> SingleEndedAdc<BASE> {
    /// Creates the driver. Nothing is written until [`init`](Self::init).
    #[inline]
    pub fn new(adc: Adc<BASE>) -> Self {
        Self { adc }
    }

    /// Releases the peripheral.
    #[inline]
    pub fn free(self) -> Adc<BASE> {
        self.adc
    }

    /// Writes the converter settings. The converter stays disabled.
    pub fn init(&self, config: AdcConfig) {
        let ctrlb = self.adc.ctrlb();
        ctrlb.store(
            ctrlb.impmode().shift(config.high_impedance)
                | ctrlb.currlimit().shift(config.current_limit)
                | ctrlb.conmode().shift(config.signed)
                | ctrlb.resolution().shift(config.resolution),
        );
        self.adc.prescaler().prescaler().write(config.prescaler);
        debug!("ADC@{=usize:x}: initialized", BASE);
    }

    /// Enables the converter and flushes the pipeline.
    #[inline]
    pub fn start(&self) {
        let ctrla = self.adc.ctrla();
        ctrla.modify(ctrla.enable().shift(true) | ctrla.flush().shift(true));
    }

    /// Disables the converter.
    #[inline]
    pub fn stop(&self) {
        self.adc.ctrla().enable().clear();
    }

    /// Selects the voltage reference.
    #[inline]
    pub fn set_reference(&self, reference: Reference) {
        self.adc.refctrl().refsel().write(reference);
    }

    /// Sets the value the channel compare interrupts test against.
    #[inline]
    pub fn set_compare_value(&self, value: u16) {
        self.adc.cmp().write(value);
    }

    /// Returns the result resolution, or `None` for the reserved encoding.
    #[inline]
    pub fn get_resolution(&self) -> Option<Resolution> {
        self.adc.ctrlb().resolution().read()
    }

    /// Sets the result resolution.
    #[inline]
    pub fn set_resolution(&self, resolution: Resolution) {
        self.adc.ctrlb().resolution().write(resolution);
    }

    /// Sets the input mode and gain of channel `CH`.
    pub fn setup_channel<const CH: usize>(&self, mode: InputMode, gain: Gain) {
        let ctrl = self.adc.ch::<CH>().ctrl();
        ctrl.store(ctrl.gain().shift(gain) | ctrl.inputmode().shift(mode));
    }

    /// Routes pins to the inputs of channel `CH`.
    pub fn setup_channel_inputs<const CH: usize>(
        &self,
        positive: PositiveInput,
        negative: NegativeInput,
    ) {
        let muxctrl = self.adc.ch::<CH>().muxctrl();
        muxctrl.store(muxctrl.muxpos().shift(positive) | muxctrl.muxneg().shift(negative));
    }

    /// Routes an internal signal to the positive input of channel `CH`, and
    /// enables the temperature or bandgap reference it needs. The channel
    /// must be in [`InputMode::Internal`].
    pub fn setup_channel_internal<const CH: usize>(&self, source: InternalInput) {
        let muxctrl = self.adc.ch::<CH>().muxctrl();
        muxctrl.store(muxctrl.muxint().shift(source));
        let refctrl = self.adc.refctrl();
        match source {
            InternalInput::Temp => refctrl.tempref().set(),
            InternalInput::Bandgap => refctrl.bandgap().set(),
            InternalInput::ScaledVcc | InternalInput::Dac => {}
        }
    }

    /// Sets the interrupt condition and level of channel `CH`.
    pub fn setup_channel_interrupts<const CH: usize>(&self, mode: InterruptMode, level: IntLevel) {
        let intctrl = self.adc.ch::<CH>().intctrl();
        intctrl.store(intctrl.intmode().shift(mode) | intctrl.intlvl().shift(level));
    }

    /// Starts a single-ended conversion of input pin `pin & 0x0F` on channel
    /// `CH`.
    pub fn start_conversion<const CH: usize>(&self, pin: u8) {
        let ch = self.adc.ch::<CH>();
        ch.muxctrl().muxpos().write_bits(pin & 0x0F);
        ch.ctrl().inputmode().write(InputMode::SingleEnded);
        ch.ctrl().start().set();
    }

    /// Returns `true` once the conversion of channel `CH` completed.
    #[inline]
    pub fn is_conversion_done<const CH: usize>(&self) -> bool {
        self.adc.intflags().chif().get::<CH>().is_set()
    }

    /// Clears the conversion complete flag of channel `CH`, leaving the
    /// flags of the other channels alone.
    #[inline]
    pub fn clear_interrupt_flag<const CH: usize>(&self) {
        let intflags = self.adc.intflags();
        intflags.write(intflags.chif().get::<CH>().mask());
    }

    /// Returns the last result of channel `CH`.
    #[inline]
    pub fn get_conversion_result<const CH: usize>(&self) -> u16 {
        self.adc.chres::<CH>().read()
    }

    /// Converts input pin `pin` on channel `CH` and returns the result.
    pub fn read<const CH: usize>(&self, pin: u8) -> u16 {
        self.start_conversion::<CH>(pin);
        while !self.is_conversion_done::<CH>() {}
        let result = self.get_conversion_result::<CH>();
        self.clear_interrupt_flag::<CH>();
        trace!("ADC@{=usize:x}: CH{=usize} pin {=u8} = {=u16}", BASE, CH, pin, result);
        result
    }
}

mod compile_tests {
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! use xmega_core::drv::adc::SingleEndedAdc;
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     let adc = SingleEndedAdc::new(p.adca);
    //!     adc.read::<4>(0);
    //! }
    //! ```
}
