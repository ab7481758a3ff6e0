//! Blocking UART driver.
//!
//! ```
//! use xmega_core::device::Peripherals;
//! use xmega_core::drv::uart::{Uart, UartConfig};
//! use xmega_core::sim::{self, models::UsartLoopback};
//!
//! sim::attach(UsartLoopback::new(0x08A0));
//! let p = Peripherals::take().unwrap();
//! let pins = p.portc.split();
//! let uart = Uart::new(p.usartc0, pins.p2, pins.p3);
//! uart.init::<2_000_000, 9600, true>(UartConfig::default());
//! uart.start();
//! uart.put(b'!');
//! assert_eq!(uart.get(), b'!');
//! ```

use crate::{
    gpio::{GpioPin, PinRole},
    map::{
        usart::{CharSize, CommMode, Parity, Usart},
        IntLevel,
    },
};
use core::fmt;

/// Baud rate register settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Baud {
    /// 12-bit baud selection.
    pub bsel: u16,
    /// Scale exponent, `-7..=7`.
    pub bscale: i8,
}

impl Baud {
    /// Returns the BAUDCTRLA value.
    #[inline]
    pub const fn ctrla(self) -> u8 {
        self.bsel as u8
    }

    /// Returns the BAUDCTRLB value.
    #[inline]
    pub const fn ctrlb(self) -> u8 {
        ((self.bsel >> 8) as u8 & 0x0F) | ((self.bscale as u8) << 4)
    }

    /// Returns the rate these settings produce from `cpu` Hz.
    pub const fn effective_rate(self, cpu: u32, double_speed: bool) -> u32 {
        let cpu = cpu as u64;
        let bsel = self.bsel as u64;
        let rate = if self.bscale < 0 {
            let scale = (-self.bscale) as u32;
            (cpu << scale) / (8 * (bsel + (1_u64 << scale)))
        } else {
            cpu / ((8_u64 << self.bscale) * (bsel + 1))
        };
        if double_speed {
            rate as u32
        } else {
            (rate / 2) as u32
        }
    }
}

/// Returns `true` if `baud` is above what `cpu` Hz can produce.
pub const fn baud_too_high(cpu: u32, baud: u32, double_speed: bool) -> bool {
    if double_speed {
        baud > cpu / 8
    } else {
        baud > cpu / 16
    }
}

/// Returns `true` if `baud` is below what `cpu` Hz can produce.
pub const fn baud_too_low(cpu: u32, baud: u32, double_speed: bool) -> bool {
    let divisor: u64 = if double_speed { 4_194_304 } else { 2_097_152 };
    (baud as u64) * divisor < cpu as u64
}

/// Returns `true` if the BSEL computed for `baud` from `cpu` Hz fits in 12
/// bits, so [`get_baud`] doesn't have to truncate it.
pub const fn bsel_fits(cpu: u32, baud: u32) -> bool {
    scan(cpu, baud).0 <= 0x0FFF
}

/// Computes the baud rate settings for `baud` from `cpu` Hz with double speed
/// (8 samples per bit).
///
/// The smallest scale exponent that keeps BSEL within 12 bits is chosen. For
/// normal speed pass twice the baud rate.
///
/// # Panics
///
/// If `baud` is zero.
///
/// ```
/// use xmega_core::drv::uart::{get_baud, Baud};
///
/// assert_eq!(get_baud(2_000_000, 9600), Baud { bsel: 3205, bscale: -7 });
/// assert_eq!(get_baud(32_000_000, 115_200), Baud { bsel: 2158, bscale: -6 });
/// ```
pub const fn get_baud(cpu: u32, baud: u32) -> Baud {
    let (bsel, bscale) = scan(cpu, baud);
    Baud { bsel: (bsel & 0x0FFF) as u16, bscale }
}

const fn scan(cpu: u32, baud: u32) -> (u64, i8) {
    let ratio = cpu / baud;
    let mut limit: u32 = 0xFFF >> 4;
    let mut exp: i8 = -7;
    while exp < 7 {
        if ratio < limit {
            break;
        }
        limit <<= 1;
        if exp < -3 {
            limit |= 1;
        }
        exp += 1;
    }

    // The final division by 8 is folded into the shifts.
    let cpu = cpu as u64;
    let baud = baud as u64;
    let bsel = if exp < 0 {
        let cpu = cpu.saturating_sub(8 * baud);
        if exp <= -3 {
            ((cpu << (-exp - 3)) + baud / 2) / baud
        } else {
            let baud_shift = baud << (exp + 3);
            (cpu + baud_shift / 2) / baud_shift
        }
    } else {
        let baud_shift = baud << (exp + 3);
        (cpu + baud_shift / 2) / baud_shift - 1
    };

    (bsel, exp)
}

/// Frame format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Character size.
    pub char_size: CharSize,
    /// Parity mode.
    pub parity: Parity,
    /// Two stop bits instead of one.
    pub two_stop_bits: bool,
}

/// Receive line error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// The stop bit of the received frame was zero.
    FrameError,
    /// A frame was lost because the receive buffer was full.
    BufferOverflow,
    /// The received frame had a parity error.
    ParityError,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameError => f.write_str("UART frame error"),
            Self::BufferOverflow => f.write_str("UART receive buffer overflow"),
            Self::ParityError => f.write_str("UART parity error"),
        }
    }
}

impl embedded_io::Error for UartError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::FrameError | Self::ParityError => embedded_io::ErrorKind::InvalidData,
            Self::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
        }
    }
}

/// UART on the USART at `BASE`.
pub struct Uart<const BASE: usize, RX, TX> {
    usart: Usart<BASE>,
    rx: RX,
    tx: TX,
}

impl<const BASE: usize, RX: GpioPin, TX: GpioPin> Uart<BASE, RX, TX> {
    /// Creates the driver. Nothing is written until [`init`](Self::init).
    #[inline]
    pub fn new(usart: Usart<BASE>, rx: RX, tx: TX) -> Self {
        Self { usart, rx, tx }
    }

    /// Releases the peripheral and the pins.
    #[inline]
    pub fn free(self) -> (Usart<BASE>, RX, TX) {
        (self.usart, self.rx, self.tx)
    }

    /// Configures the pins, the baud rate for `CPU` Hz and the frame format.
    ///
    /// Baud rates the clock can't produce are rejected at compile time.
    pub fn init<const CPU: u32, const BAUD: u32, const DOUBLE_SPEED: bool>(
        &self,
        config: UartConfig,
    ) {
        const {
            assert!(!baud_too_high(CPU, BAUD, DOUBLE_SPEED), "baud rate too high for the CPU clock");
            assert!(!baud_too_low(CPU, BAUD, DOUBLE_SPEED), "baud rate too low for the CPU clock");
        };
        let baud = const {
            let rate = if DOUBLE_SPEED { BAUD } else { 2 * BAUD };
            assert!(bsel_fits(CPU, rate), "BSEL out of range");
            get_baud(CPU, rate)
        };
        self.rx.set_role(PinRole::InputFloating);
        self.tx.set_role(PinRole::OutputLow);

        self.usart.baudctrla().write(baud.ctrla());
        self.usart.baudctrlb().write(baud.ctrlb());
        self.usart.ctrlb().clk2x().write(DOUBLE_SPEED);

        let ctrlc = self.usart.ctrlc();
        ctrlc.store(
            ctrlc.pmode().shift(config.parity)
                | ctrlc.sbmode().shift(config.two_stop_bits)
                | ctrlc.chsize().shift(config.char_size)
                | ctrlc.cmode().shift(CommMode::Asynchronous),
        );
        debug!("USART@{=usize:x}: {=u32} baud from {=u32} Hz", BASE, BAUD, CPU);
    }

    /// Enables the transmitter and the receiver.
    #[inline]
    pub fn start(&self) {
        let ctrlb = self.usart.ctrlb();
        ctrlb.modify(ctrlb.txen().shift(true) | ctrlb.rxen().shift(true));
    }

    /// Disables the transmitter and the receiver.
    #[inline]
    pub fn stop(&self) {
        let ctrlb = self.usart.ctrlb();
        ctrlb.modify(ctrlb.txen().shift(false) | ctrlb.rxen().shift(false));
    }

    /// Sets the receive complete, transmit complete and data register empty
    /// interrupt levels with one register write.
    pub fn set_interrupt_levels(&self, rx: IntLevel, tx: IntLevel, dre: IntLevel) {
        let packed = (rx as u8) << 4 | (tx as u8) << 2 | dre as u8;
        self.usart.ctrla().intlvl().write(packed);
    }

    /// Disables all USART interrupts.
    #[inline]
    pub fn disable_interrupts(&self) {
        self.usart.ctrla().intlvl().write_all(IntLevel::Off);
    }

    /// Blocks until the transmit buffer is free, then queues `byte`.
    #[inline]
    pub fn put(&self, byte: u8) {
        let status = self.usart.status();
        while status.dreif().is_clear() {}
        self.usart.data().write(byte);
    }

    /// Blocks until a byte is received and returns it.
    #[inline]
    pub fn get(&self) -> u8 {
        let status = self.usart.status();
        while status.rxcif().is_clear() {}
        self.usart.data().read()
    }

    /// Returns `true` if a received byte is waiting.
    #[inline]
    pub fn is_rx_ready(&self) -> bool {
        self.usart.status().rxcif().is_set()
    }

    /// Transmits all of `data` and returns its length.
    pub fn write(&self, data: &[u8]) -> usize {
        for &byte in data {
            self.put(byte);
        }
        data.len()
    }

    /// Fills `buf` with received bytes and returns its length.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        for byte in buf.iter_mut() {
            *byte = self.get();
        }
        buf.len()
    }

    /// Reports the line error flags of the byte at the head of the receive
    /// buffer. Frame errors take precedence over overflows, overflows over
    /// parity errors.
    pub fn check_errors(&self) -> Result<(), UartError> {
        let status = self.usart.status();
        let snapshot = status.read();
        let error = if status.ferr().get(snapshot) {
            UartError::FrameError
        } else if status.bufovf().get(snapshot) {
            UartError::BufferOverflow
        } else if status.perr().get(snapshot) {
            UartError::ParityError
        } else {
            return Ok(());
        };
        warn!("USART@{=usize:x}: {}", BASE, error);
        Err(error)
    }
}

impl<const BASE: usize, RX: GpioPin, TX: GpioPin> fmt::Write for Uart<BASE, RX, TX> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Uart::write(self, s.as_bytes());
        Ok(())
    }
}

impl<const BASE: usize, RX, TX> embedded_io::ErrorType for Uart<BASE, RX, TX> {
    type Error = UartError;
}

impl<const BASE: usize, RX: GpioPin, TX: GpioPin> embedded_io::Read for Uart<BASE, RX, TX> {
    /// Blocks for the first byte, then takes whatever else is already
    /// received.
    ///
    /// A byte received with a line error ends the read. If it is the first
    /// one it is dropped and the error returned, otherwise it stays in the
    /// buffer for the next call.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        let status = self.usart.status();
        let mut count = 0;
        for byte in buf.iter_mut() {
            if count > 0 && !self.is_rx_ready() {
                break;
            }
            while status.rxcif().is_clear() {}
            if let Err(err) = self.check_errors() {
                if count > 0 {
                    break;
                }
                self.usart.data().read();
                return Err(err);
            }
            *byte = self.usart.data().read();
            count += 1;
        }
        Ok(count)
    }
}

impl<const BASE: usize, RX: GpioPin, TX: GpioPin> embedded_io::Write for Uart<BASE, RX, TX> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, UartError> {
        Ok(Uart::write(self, buf))
    }

    fn flush(&mut self) -> Result<(), UartError> {
        while self.usart.status().dreif().is_clear() {}
        Ok(())
    }
}

mod compile_tests {
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! use xmega_core::drv::uart::{Uart, UartConfig};
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     let pins = p.portc.split();
    //!     let uart = Uart::new(p.usartc0, pins.p2, pins.p3);
    //!     uart.init::<2_000_000, 500_000, true>(UartConfig::default());
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! use xmega_core::drv::uart::{Uart, UartConfig};
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     let pins = p.portc.split();
    //!     let uart = Uart::new(p.usartc0, pins.p2, pins.p3);
    //!     uart.init::<32_000_000, 10, false>(UartConfig::default());
    //! }
    //! ```
}
