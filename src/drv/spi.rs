//! Blocking SPI master driver.

use crate::{
    gpio::{GpioPin, PinRole},
    map::{
        spi::{Mode, Prescaler, Spi},
        IntLevel,
    },
};
use core::fmt;
use embedded_hal::spi::{ErrorKind, ErrorType, SpiBus};

/// SPI clock divider setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiClock {
    /// Prescaler selection.
    pub prescaler: Prescaler,
    /// CLK2X, halves the prescaler division.
    pub double_speed: bool,
}

impl SpiClock {
    /// Returns the CTRL bits of the setting: CLK2X at bit 7, the prescaler
    /// at bits 1:0.
    #[inline]
    pub const fn bits(self) -> u8 {
        (self.double_speed as u8) << 7 | self.prescaler as u8
    }

    /// Returns the resulting division of the CPU clock.
    #[inline]
    pub const fn divisor(self) -> u32 {
        if self.double_speed {
            self.prescaler.divisor() / 2
        } else {
            self.prescaler.divisor()
        }
    }
}

/// Picks the smallest division of `cpu` Hz giving a clock strictly below
/// `max` Hz. Falls back to the largest division, 128, when none does.
///
/// ```
/// use xmega_core::drv::spi::calculate_clock;
/// use xmega_core::map::spi::Prescaler;
///
/// let clock = calculate_clock(2_000_000, 1_000_000);
/// assert_eq!(clock.prescaler, Prescaler::Div4);
/// assert!(!clock.double_speed);
/// ```
pub const fn calculate_clock(cpu: u32, max: u32) -> SpiClock {
    const STEPS: [SpiClock; 7] = [
        SpiClock { prescaler: Prescaler::Div4, double_speed: true },
        SpiClock { prescaler: Prescaler::Div4, double_speed: false },
        SpiClock { prescaler: Prescaler::Div16, double_speed: true },
        SpiClock { prescaler: Prescaler::Div16, double_speed: false },
        SpiClock { prescaler: Prescaler::Div64, double_speed: true },
        SpiClock { prescaler: Prescaler::Div64, double_speed: false },
        SpiClock { prescaler: Prescaler::Div128, double_speed: false },
    ];
    let mut i = 0;
    while i < STEPS.len() {
        if cpu / STEPS[i].divisor() < max {
            return STEPS[i];
        }
        i += 1;
    }
    SpiClock { prescaler: Prescaler::Div128, double_speed: false }
}

/// Transfer settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock polarity and phase.
    pub mode: Mode,
    /// Shift the least significant bit first.
    pub lsb_first: bool,
}

/// Snapshot of the STATUS register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiStatus {
    /// A byte has been shifted completely. Cleared by reading STATUS, then
    /// accessing DATA.
    pub interrupt_flag: bool,
    /// DATA was written during a transfer. Cleared like `interrupt_flag`.
    pub write_collision: bool,
}

/// SPI failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// The transfer didn't complete.
    Timeout,
    /// DATA was written during a transfer.
    Collision,
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("SPI transfer timed out"),
            Self::Collision => f.write_str("SPI write collision"),
        }
    }
}

impl embedded_hal::spi::Error for SpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// SPI master on the SPI at `BASE`, with a software-driven slave select.
pub struct SpiMaster<const BASE: usize, MISO, MOSI, SCK, SS> {
    spi: Spi<BASE>,
    miso: MISO,
    mosi: MOSI,
    sck: SCK,
    ss: SS,
}

impl<const BASE: usize, MISO, MOSI, SCK, SS> SpiMaster<BASE, MISO, MOSI, SCK, SS>
where
    MISO: GpioPin,
    MOSI: GpioPin,
    SCK: GpioPin,
    SS: GpioPin,
{
    /// Creates the driver. Nothing is written until [`init`](Self::init).
    #[inline]
    pub fn new(spi: Spi<BASE>, miso: MISO, mosi: MOSI, sck: SCK, ss: SS) -> Self {
        Self { spi, miso, mosi, sck, ss }
    }

    /// Releases the peripheral and the pins.
    #[inline]
    pub fn free(self) -> (Spi<BASE>, MISO, MOSI, SCK, SS) {
        (self.spi, self.miso, self.mosi, self.sck, self.ss)
    }

    /// Configures the pins. Slave select starts deasserted.
    pub fn init(&self) {
        self.miso.set_role(PinRole::InputFloating);
        self.mosi.set_role(PinRole::OutputLow);
        self.sck.set_role(PinRole::OutputLow);
        self.ss.set_role(PinRole::OutputHigh);
    }

    /// Enables the master with the fastest clock below `MAX` Hz derived from
    /// `CPU` Hz.
    ///
    /// `MAX` must exceed `CPU / 128`, which is checked at compile time.
    pub fn start<const CPU: u32, const MAX: u32>(&self, config: SpiConfig) {
        const { assert!(MAX > CPU / 128, "SPI clock can't get below CPU / 128") };
        let clock = const { calculate_clock(CPU, MAX) };
        let ctrl = self.spi.ctrl();
        ctrl.store(
            ctrl.clk2x().shift(clock.double_speed)
                | ctrl.prescaler().shift(clock.prescaler)
                | ctrl.enable().shift(true)
                | ctrl.dord().shift(config.lsb_first)
                | ctrl.master().shift(true)
                | ctrl.mode().shift(config.mode),
        );
        debug!("SPI@{=usize:x}: clock {=u32} Hz", BASE, CPU / clock.divisor());
    }

    /// Disables the peripheral.
    #[inline]
    pub fn stop(&self) {
        let ctrl = self.spi.ctrl();
        ctrl.store(ctrl.enable().shift(false));
    }

    /// Sets the interrupt level and returns the previous one.
    pub fn enable_interrupt(&self, level: IntLevel) -> IntLevel {
        let intctrl = self.spi.intctrl();
        let previous = intctrl.intlvl().read().unwrap_or(IntLevel::Off);
        intctrl.store(intctrl.intlvl().shift(level));
        previous
    }

    /// Reads the status flags.
    #[inline]
    pub fn get_status(&self) -> SpiStatus {
        let status = self.spi.status();
        let snapshot = status.read();
        SpiStatus {
            interrupt_flag: status.if_().get(snapshot),
            write_collision: status.wrcol().get(snapshot),
        }
    }

    /// Writes DATA without waiting.
    #[inline]
    pub fn write_data(&self, byte: u8) {
        self.spi.data().write(byte);
    }

    /// Reads DATA without waiting.
    #[inline]
    pub fn read_data(&self) -> u8 {
        self.spi.data().read()
    }

    /// Shifts `byte` out, waits for the transfer and returns the byte shifted
    /// in.
    #[inline]
    pub fn transfer(&self, byte: u8) -> u8 {
        self.spi.data().write(byte);
        while self.spi.status().if_().is_clear() {}
        self.spi.data().read()
    }

    /// Replaces every byte of `buf` with the byte received while sending it.
    pub fn transfer_in_place(&self, buf: &mut [u8]) -> Result<usize, SpiError> {
        for byte in buf.iter_mut() {
            *byte = self.transfer(*byte);
        }
        Ok(buf.len())
    }

    /// Sends `data`, discarding the received bytes.
    pub fn write(&self, data: &[u8]) -> Result<usize, SpiError> {
        for &byte in data {
            self.transfer(byte);
        }
        Ok(data.len())
    }

    /// Fills `buf` with the bytes received while sending zeros.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, SpiError> {
        for byte in buf.iter_mut() {
            *byte = self.transfer(0);
        }
        Ok(buf.len())
    }

    /// Asserts slave select.
    #[inline]
    pub fn select(&self) {
        self.ss.set_low();
    }

    /// Deasserts slave select.
    #[inline]
    pub fn deselect(&self) {
        self.ss.set_high();
    }
}

impl<const BASE: usize, MISO, MOSI, SCK, SS> ErrorType for SpiMaster<BASE, MISO, MOSI, SCK, SS> {
    type Error = SpiError;
}

impl<const BASE: usize, MISO, MOSI, SCK, SS> SpiBus<u8> for SpiMaster<BASE, MISO, MOSI, SCK, SS>
where
    MISO: GpioPin,
    MOSI: GpioPin,
    SCK: GpioPin,
    SS: GpioPin,
{
    fn read(&mut self, words: &mut [u8]) -> Result<(), SpiError> {
        SpiMaster::read(self, words).map(drop)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), SpiError> {
        SpiMaster::write(self, words).map(drop)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SpiError> {
        for i in 0..read.len().max(write.len()) {
            let byte = SpiMaster::transfer(self, write.get(i).copied().unwrap_or(0));
            if let Some(slot) = read.get_mut(i) {
                *slot = byte;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SpiError> {
        SpiMaster::transfer_in_place(self, words).map(drop)
    }

    fn flush(&mut self) -> Result<(), SpiError> {
        Ok(())
    }
}

mod compile_tests {
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! use xmega_core::drv::spi::{SpiConfig, SpiMaster};
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     let pins = p.portc.split();
    //!     let spi = SpiMaster::new(p.spic, pins.p6, pins.p5, pins.p7, pins.p4);
    //!     spi.start::<32_000_000, 100_000>(SpiConfig::default());
    //! }
    //! ```
}
