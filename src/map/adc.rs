//! Analog-to-digital converter.

use super::IntLevel;
use crate::{
    reg::Reg,
    token::Token,
    FieldValue,
};

periph! {
    /// ADC register block.
    pub struct Adc<const BASE: usize> @ BASE;

    /// Control register A.
    ctrla: CtrlA(u8) @ 0x00 {
        /// DMA request selection.
        dmasel: bits(6..=7);
        /// Per-channel conversion start, channel 0 first.
        chstart: array(2, 1, 4) => bool;
        /// Flush the pipeline.
        flush: bit(1);
        /// ADC enable.
        enable: bit(0);
    }

    /// Control register B.
    ctrlb: CtrlB(u8) @ 0x01 {
        /// Gain stage impedance mode.
        impmode: bit(7);
        /// Current limitation.
        currlimit: bits(5..=6) => CurrentLimit;
        /// Signed conversion mode.
        conmode: bit(4);
        /// Free running mode.
        freerun: bit(3);
        /// Result resolution and alignment.
        resolution: bits(1..=2) => Resolution;
    }

    /// Reference control.
    refctrl: RefCtrl(u8) @ 0x02 {
        /// Reference selection.
        refsel: bits(4..=6) => Reference;
        /// Bandgap enable.
        bandgap: bit(1);
        /// Temperature sensor reference enable.
        tempref: bit(0);
    }

    /// Event control.
    evctrl: EvCtrl(u8) @ 0x03;

    /// Clock prescaler.
    prescaler: PrescalerReg(u8) @ 0x04 {
        /// Prescaler selection.
        prescaler: bits(0..=2) => Prescaler;
    }

    /// Channel interrupt flags.
    intflags: IntFlags(u8) @ 0x06 {
        /// Conversion complete flags, channel 0 first.
        chif: array(0, 1, 4) => bool;
    }

    /// Temporary register.
    temp: Temp(u8) @ 0x07;

    /// Calibration value.
    cal: Cal(u16) @ 0x0C;

    /// Channel 0 result.
    ch0res: Ch0Res(u16) @ 0x10;

    /// Channel 1 result.
    ch1res: Ch1Res(u16) @ 0x12;

    /// Channel 2 result.
    ch2res: Ch2Res(u16) @ 0x14;

    /// Channel 3 result.
    ch3res: Ch3Res(u16) @ 0x16;

    /// Compare value.
    cmp: Cmp(u16) @ 0x18;
}

unsafe impl<const BASE: usize> Token for Adc<BASE> {
    #[inline(always)]
    unsafe fn take() -> Self {
        unsafe { Self::steal() }
    }
}

impl<const BASE: usize> Adc<BASE> {
    /// Returns the register block of channel `CH`.
    #[inline(always)]
    pub const fn ch<const CH: usize>(&self) -> AdcChannel<BASE, CH> {
        const { assert!(CH < 4, "ADC only has channels 0-3") };
        unsafe { AdcChannel::steal() }
    }

    /// Returns the result register of channel `CH`.
    #[inline(always)]
    pub const fn chres<const CH: usize>(&self) -> Reg<u16> {
        const { assert!(CH < 4, "ADC only has channels 0-3") };
        unsafe { Reg::at(Self::ADDRESS + 0x10 + 2 * CH) }
    }
}

periph! {
    /// Register block of one ADC channel, obtained with [`Adc::ch`].
    pub struct AdcChannel<const BASE: usize, const CH: usize> @ BASE + 0x20 + 8 * CH;

    /// Channel control.
    ctrl: ChCtrl(u8) @ 0x00 {
        /// Start conversion.
        start: bit(7);
        /// Gain factor.
        gain: bits(2..=4) => Gain;
        /// Input mode.
        inputmode: bits(0..=1) => InputMode;
    }

    /// Input multiplexer.
    muxctrl: ChMuxCtrl(u8) @ 0x01 {
        /// Positive input pin.
        muxpos: bits(3..=6) => PositiveInput;
        /// Internal positive input, same bits as `muxpos`.
        muxint: bits(3..=6) => InternalInput;
        /// Negative input.
        muxneg: bits(0..=2) => NegativeInput;
    }

    /// Channel interrupt control.
    intctrl: ChIntCtrl(u8) @ 0x02 {
        /// Interrupt mode.
        intmode: bits(2..=3) => InterruptMode;
        /// Interrupt level.
        intlvl: bits(0..=1) => IntLevel;
    }

    /// Channel interrupt flag.
    intflags: ChIntFlags(u8) @ 0x03 {
        /// Conversion complete.
        if_: bit(0);
    }

    /// Channel result.
    res: ChRes(u16) @ 0x04;

    /// Input scan.
    scan: ChScan(u8) @ 0x06;
}

/// Result resolution and alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Resolution {
    /// 12-bit right adjusted.
    #[default]
    Bits12 = 0,
    /// 8-bit right adjusted.
    Bits8 = 2,
    /// 12-bit left adjusted.
    LeftBits12 = 3,
}

/// Current limitation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CurrentLimit {
    /// No limit.
    #[default]
    No = 0,
    /// Low current limit, up to 225 ksps.
    Low = 1,
    /// Medium current limit, up to 150 ksps.
    Med = 2,
    /// High current limit, up to 75 ksps.
    High = 3,
}

/// Voltage reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Reference {
    /// Internal 1.00 V.
    #[default]
    Int1V = 0,
    /// Internal VCC / 1.6.
    IntVcc = 1,
    /// External reference on AREFA.
    ArefA = 2,
    /// External reference on AREFB.
    ArefB = 3,
    /// Internal VCC / 2.
    IntVcc2 = 4,
}

/// ADC clock prescaler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    /// Peripheral clock / 4.
    #[default]
    Div4 = 0,
    /// Peripheral clock / 8.
    Div8 = 1,
    /// Peripheral clock / 16.
    Div16 = 2,
    /// Peripheral clock / 32.
    Div32 = 3,
    /// Peripheral clock / 64.
    Div64 = 4,
    /// Peripheral clock / 128.
    Div128 = 5,
    /// Peripheral clock / 256.
    Div256 = 6,
    /// Peripheral clock / 512.
    Div512 = 7,
}

/// Channel gain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
    /// 1x.
    #[default]
    X1 = 0,
    /// 2x.
    X2 = 1,
    /// 4x.
    X4 = 2,
    /// 8x.
    X8 = 3,
    /// 16x.
    X16 = 4,
    /// 32x.
    X32 = 5,
    /// 64x.
    X64 = 6,
    /// 1/2x.
    Div2 = 7,
}

/// Channel input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InputMode {
    /// Internal positive input.
    Internal = 0,
    /// Single-ended positive input.
    #[default]
    SingleEnded = 1,
    /// Differential input.
    Diff = 2,
    /// Differential input with gain.
    DiffWithGain = 3,
}

/// Positive input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PositiveInput {
    Pin0 = 0,
    Pin1 = 1,
    Pin2 = 2,
    Pin3 = 3,
    Pin4 = 4,
    Pin5 = 5,
    Pin6 = 6,
    Pin7 = 7,
    Pin8 = 8,
    Pin9 = 9,
    Pin10 = 10,
    Pin11 = 11,
    Pin12 = 12,
    Pin13 = 13,
    Pin14 = 14,
    Pin15 = 15,
}

/// Internal positive input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InternalInput {
    /// Temperature sensor.
    Temp = 0,
    /// Bandgap voltage.
    Bandgap = 1,
    /// VCC / 10.
    ScaledVcc = 2,
    /// DAC output.
    Dac = 3,
}

/// Negative input.
///
/// With gain the multiplexer selects the upper pin half, see the
/// `GAIN_PIN*` aliases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum NegativeInput {
    /// Pin 0, or pin 4 with gain.
    #[default]
    Pin0 = 0,
    /// Pin 1, or pin 5 with gain.
    Pin1 = 1,
    /// Pin 2, or pin 6 with gain.
    Pin2 = 2,
    /// Pin 3, or pin 7 with gain.
    Pin3 = 3,
    /// Internal ground with gain.
    IntGndGain = 4,
    /// Pad ground without gain.
    Gnd = 5,
    /// Internal ground without gain, pad ground with gain.
    IntGnd = 7,
}

impl NegativeInput {
    /// Pin 4 in differential mode with gain.
    pub const GAIN_PIN4: Self = Self::Pin0;
    /// Pin 5 in differential mode with gain.
    pub const GAIN_PIN5: Self = Self::Pin1;
    /// Pin 6 in differential mode with gain.
    pub const GAIN_PIN6: Self = Self::Pin2;
    /// Pin 7 in differential mode with gain.
    pub const GAIN_PIN7: Self = Self::Pin3;
}

/// Channel interrupt mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InterruptMode {
    /// Conversion complete.
    #[default]
    Complete = 0,
    /// Result below the compare value.
    Below = 1,
    /// Result above the compare value.
    Above = 3,
}
