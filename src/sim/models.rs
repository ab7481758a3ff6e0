//! Ready-made peripheral models for the simulated memory.

use super::{Device, Image};
use std::{boxed::Box, collections::VecDeque};

const PORT_DIR: usize = 0x00;
const PORT_OUT: usize = 0x04;
const PORT_IN: usize = 0x08;

/// An I/O port with the set/clear/toggle register aliases.
///
/// Writes to DIRSET, DIRCLR and DIRTGL (and the OUT counterparts) update DIR
/// (OUT), and all four registers of a group read back the resulting value.
/// IN reads the driven level of output pins and the external level given to
/// [`PortModel::with_levels`] for input pins.
pub struct PortModel {
    base: usize,
    levels: u8,
}

impl PortModel {
    /// Creates a port at `base` with all external levels low.
    pub fn new(base: usize) -> Self {
        Self { base, levels: 0 }
    }

    /// Sets the external levels seen by input pins.
    #[must_use]
    pub fn with_levels(mut self, levels: u8) -> Self {
        self.levels = levels;
        self
    }
}

impl Device for PortModel {
    fn claims(&self, address: usize) -> bool {
        (self.base..=self.base + PORT_IN).contains(&address)
    }

    fn on_read(&mut self, image: &mut Image, address: usize) {
        if address == self.base + PORT_IN {
            let dir = image.get(self.base + PORT_DIR);
            let out = image.get(self.base + PORT_OUT);
            image.set(address, (out & dir) | (self.levels & !dir));
        }
    }

    fn on_write(&mut self, image: &mut Image, address: usize, _old: u8, value: u8) {
        let offset = address - self.base;
        if offset >= PORT_IN {
            return;
        }
        let group = self.base + (offset & !3);
        let current = image.get(group);
        let current = match offset & 3 {
            0 => value,
            1 => current | value,
            2 => current & !value,
            _ => current ^ value,
        };
        for alias in 0..4 {
            image.set(group + alias, current);
        }
    }
}

const USART_DATA: usize = 0x00;
const USART_STATUS: usize = 0x01;
const USART_RXCIF: u8 = 1 << 7;
const USART_TXCIF: u8 = 1 << 6;
const USART_DREIF: u8 = 1 << 5;

struct InFlight {
    byte: u8,
    remaining: u32,
}

/// A USART with its TX line wired to its RX line.
///
/// Every byte written to DATA is received back. The receive-complete flag of a
/// byte rises after `latency` further STATUS reads, and falls when the byte is
/// read from DATA. The transmitter is always ready.
pub struct UsartLoopback {
    base: usize,
    latency: u32,
    in_flight: VecDeque<InFlight>,
}

impl UsartLoopback {
    /// Creates a loopback for the USART at `base` with immediate reception.
    pub fn new(base: usize) -> Self {
        Self::with_latency(base, 0)
    }

    /// Creates a loopback for the USART at `base`; each byte becomes
    /// available on the `latency + 1`-th STATUS read after it is at the head
    /// of the receive queue.
    pub fn with_latency(base: usize, latency: u32) -> Self {
        Self { base, latency, in_flight: VecDeque::new() }
    }

    fn refresh(&mut self, image: &mut Image) {
        let status = self.base + USART_STATUS;
        match self.in_flight.front_mut() {
            Some(head) if head.remaining == 0 => image.set_bits(status, USART_RXCIF),
            Some(head) => {
                head.remaining -= 1;
                image.clear_bits(status, USART_RXCIF);
            }
            None => image.clear_bits(status, USART_RXCIF),
        }
    }
}

impl Device for UsartLoopback {
    fn claims(&self, address: usize) -> bool {
        (self.base..self.base + 8).contains(&address)
    }

    fn attach(&mut self, image: &mut Image) {
        image.set_bits(self.base + USART_STATUS, USART_DREIF);
    }

    fn on_read(&mut self, image: &mut Image, address: usize) {
        if address == self.base + USART_STATUS {
            self.refresh(image);
        } else if address == self.base + USART_DATA {
            if let Some(head) = self.in_flight.pop_front() {
                image.set(address, head.byte);
            }
            image.clear_bits(self.base + USART_STATUS, USART_RXCIF);
        }
    }

    fn on_write(&mut self, image: &mut Image, address: usize, old: u8, value: u8) {
        if address == self.base + USART_DATA {
            self.in_flight.push_back(InFlight { byte: value, remaining: self.latency });
            image.set_bits(self.base + USART_STATUS, USART_DREIF | USART_TXCIF);
        } else if address == self.base + USART_STATUS {
            // Only TXCIF is writable, and writing one clears it.
            image.set(address, old & !(value & USART_TXCIF));
        }
    }
}

const SPI_STATUS: usize = 0x02;
const SPI_DATA: usize = 0x03;
const SPI_IF: u8 = 1 << 7;
const SPI_WRCOL: u8 = 1 << 6;

/// An SPI master connected to a target that answers every byte through a
/// closure.
///
/// A transfer completes after `latency` STATUS reads; the next STATUS read
/// raises the interrupt flag. Writing DATA while a transfer is in progress
/// raises the write-collision flag and leaves DATA untouched. Accessing DATA
/// clears both flags.
pub struct SpiTarget {
    base: usize,
    latency: u32,
    remaining: Option<u32>,
    respond: Box<dyn FnMut(u8) -> u8>,
}

impl SpiTarget {
    /// Creates a target for the SPI at `base` answering through `respond`.
    pub fn new(base: usize, latency: u32, respond: impl FnMut(u8) -> u8 + 'static) -> Self {
        Self { base, latency, remaining: None, respond: Box::new(respond) }
    }

    /// Creates a target that echoes every byte, as with MISO wired to MOSI.
    pub fn loopback(base: usize, latency: u32) -> Self {
        Self::new(base, latency, |byte| byte)
    }
}

impl Device for SpiTarget {
    fn claims(&self, address: usize) -> bool {
        (self.base..self.base + 4).contains(&address)
    }

    fn on_read(&mut self, image: &mut Image, address: usize) {
        if address == self.base + SPI_STATUS {
            match self.remaining {
                Some(0) => {
                    image.set_bits(address, SPI_IF);
                    self.remaining = None;
                }
                Some(remaining) => self.remaining = Some(remaining - 1),
                None => {}
            }
        } else if address == self.base + SPI_DATA && self.remaining.is_none() {
            image.clear_bits(self.base + SPI_STATUS, SPI_IF | SPI_WRCOL);
        }
    }

    fn on_write(&mut self, image: &mut Image, address: usize, old: u8, value: u8) {
        if address == self.base + SPI_DATA {
            if self.remaining.is_some() {
                image.set(address, old);
                image.set_bits(self.base + SPI_STATUS, SPI_WRCOL);
            } else {
                image.clear_bits(self.base + SPI_STATUS, SPI_IF | SPI_WRCOL);
                image.set(address, (self.respond)(value));
                self.remaining = Some(self.latency);
            }
        } else if address == self.base + SPI_STATUS {
            // Read-only flags.
            image.set(address, old);
        }
    }
}

const ADC_CTRLA: usize = 0x00;
const ADC_INTFLAGS: usize = 0x06;
const ADC_CHRES: usize = 0x10;
const ADC_CH: usize = 0x20;
const ADC_CH_STRIDE: usize = 0x08;
const ADC_CH_CTRL: usize = 0x00;
const ADC_CH_MUXCTRL: usize = 0x01;
const ADC_CH_INTFLAGS: usize = 0x03;
const ADC_CH_RES: usize = 0x04;
const ADC_CH_START: u8 = 1 << 7;

/// An ADC converting the voltages set with [`AdcModel::with_input`].
///
/// A conversion started through a channel START bit (or CTRLA.CHnSTART)
/// samples the pin selected by the channel MUXPOS bits, stores the result and
/// raises the channel flag after `latency` INTFLAGS reads. Flags are cleared
/// by writing one.
pub struct AdcModel {
    base: usize,
    latency: u32,
    inputs: [u16; 16],
    remaining: [Option<u32>; 4],
}

impl AdcModel {
    /// Creates a converter at `base` with all inputs at zero.
    pub fn new(base: usize, latency: u32) -> Self {
        Self { base, latency, inputs: [0; 16], remaining: [None; 4] }
    }

    /// Sets the conversion result of positive input `pin`.
    #[must_use]
    pub fn with_input(mut self, pin: u8, value: u16) -> Self {
        self.inputs[usize::from(pin & 0x0F)] = value;
        self
    }

    fn channel_base(&self, ch: usize) -> usize {
        self.base + ADC_CH + ch * ADC_CH_STRIDE
    }

    fn convert(&mut self, image: &mut Image, ch: usize) {
        let channel = self.channel_base(ch);
        image.clear_bits(channel + ADC_CH_CTRL, ADC_CH_START);
        let pin = (image.get(channel + ADC_CH_MUXCTRL) >> 3) & 0x0F;
        let result = self.inputs[usize::from(pin)];
        image.set_u16(self.base + ADC_CHRES + 2 * ch, result);
        image.set_u16(channel + ADC_CH_RES, result);
        self.remaining[ch] = Some(self.latency);
    }
}

impl Device for AdcModel {
    fn claims(&self, address: usize) -> bool {
        (self.base..self.channel_base(4)).contains(&address)
    }

    fn on_read(&mut self, image: &mut Image, address: usize) {
        if address != self.base + ADC_INTFLAGS {
            return;
        }
        for ch in 0..4 {
            match self.remaining[ch] {
                Some(0) => {
                    image.set_bits(address, 1 << ch);
                    image.set_bits(self.channel_base(ch) + ADC_CH_INTFLAGS, 1);
                    self.remaining[ch] = None;
                }
                Some(remaining) => self.remaining[ch] = Some(remaining - 1),
                None => {}
            }
        }
    }

    fn on_write(&mut self, image: &mut Image, address: usize, old: u8, value: u8) {
        if address == self.base + ADC_CTRLA {
            for ch in 0..4 {
                if value & (1 << (ch + 2)) != 0 {
                    image.clear_bits(address, 1 << (ch + 2));
                    self.convert(image, ch);
                }
            }
        } else if address == self.base + ADC_INTFLAGS {
            image.set(address, old & !value);
            for ch in 0..4 {
                if value & (1 << ch) != 0 {
                    image.clear_bits(self.channel_base(ch) + ADC_CH_INTFLAGS, 1);
                }
            }
        } else {
            for ch in 0..4 {
                let channel = self.channel_base(ch);
                if address == channel + ADC_CH_CTRL && value & ADC_CH_START != 0 {
                    self.convert(image, ch);
                } else if address == channel + ADC_CH_INTFLAGS {
                    image.set(address, old & !value);
                }
            }
        }
    }
}

const TWI_MCTRLC: usize = 0x03;
const TWI_MSTATUS: usize = 0x04;
const TWI_MADDR: usize = 0x06;
const TWI_MDATA: usize = 0x07;
const TWI_RIF: u8 = 1 << 7;
const TWI_WIF: u8 = 1 << 6;
const TWI_RXACK: u8 = 1 << 4;
const TWI_ARBLOST: u8 = 1 << 3;
const TWI_BUSERR: u8 = 1 << 2;
const TWI_FLAGS: u8 = TWI_RIF | TWI_WIF | TWI_ARBLOST | TWI_BUSERR;
const TWI_BUSSTATE: u8 = 0x03;
const TWI_IDLE: u8 = 0x01;
const TWI_OWNER: u8 = 0x02;
const TWI_CMD: u8 = 0x03;
const TWI_RECVTRANS: u8 = 0x02;
const TWI_STOP: u8 = 0x03;

#[derive(Clone, Copy, PartialEq, Eq)]
enum TwiPhase {
    Idle,
    Rejected,
    Pointer,
    Writing,
    Reading,
}

/// A TWI master with one register-file target on the bus.
///
/// The target acknowledges its 7-bit address. The first byte of a write
/// selects a register, further bytes are stored with auto-increment; reads
/// return registers from the current pointer on. Any other address is not
/// acknowledged.
pub struct TwiTarget {
    base: usize,
    address: u8,
    regs: [u8; 256],
    pointer: u8,
    phase: TwiPhase,
}

impl TwiTarget {
    /// Creates a target with the 7-bit `address` on the TWI at `base`.
    pub fn new(base: usize, address: u8) -> Self {
        Self { base, address, regs: [0; 256], pointer: 0, phase: TwiPhase::Idle }
    }

    /// Presets register `reg` of the target.
    #[must_use]
    pub fn with_register(mut self, reg: u8, value: u8) -> Self {
        self.regs[usize::from(reg)] = value;
        self
    }

    fn status(&self) -> usize {
        self.base + TWI_MSTATUS
    }

    fn flag(&self, image: &mut Image, set: u8) {
        let status = self.status();
        let value = (image.get(status) & !(TWI_FLAGS | TWI_RXACK)) | set;
        image.set(status, value);
    }

    fn send_next(&mut self, image: &mut Image) {
        image.set(self.base + TWI_MDATA, self.regs[usize::from(self.pointer)]);
        self.pointer = self.pointer.wrapping_add(1);
        self.flag(image, TWI_RIF);
    }

    fn set_bus_state(&self, image: &mut Image, state: u8) {
        let status = self.status();
        let value = (image.get(status) & !TWI_BUSSTATE) | state;
        image.set(status, value);
    }
}

impl Device for TwiTarget {
    fn claims(&self, address: usize) -> bool {
        (self.base..self.base + 8).contains(&address)
    }

    fn on_read(&mut self, image: &mut Image, address: usize) {
        if address == self.base + TWI_MDATA {
            image.clear_bits(self.status(), TWI_RIF);
        }
    }

    fn on_write(&mut self, image: &mut Image, address: usize, old: u8, value: u8) {
        if address == self.base + TWI_MADDR {
            self.set_bus_state(image, TWI_OWNER);
            if value >> 1 != self.address {
                self.phase = TwiPhase::Rejected;
                self.flag(image, TWI_WIF | TWI_RXACK);
            } else if value & 1 == 0 {
                self.phase = TwiPhase::Pointer;
                self.flag(image, TWI_WIF);
            } else {
                self.phase = TwiPhase::Reading;
                self.send_next(image);
            }
        } else if address == self.base + TWI_MDATA {
            match self.phase {
                TwiPhase::Pointer => {
                    self.pointer = value;
                    self.phase = TwiPhase::Writing;
                    self.flag(image, TWI_WIF);
                }
                TwiPhase::Writing => {
                    self.regs[usize::from(self.pointer)] = value;
                    self.pointer = self.pointer.wrapping_add(1);
                    self.flag(image, TWI_WIF);
                }
                TwiPhase::Idle | TwiPhase::Rejected | TwiPhase::Reading => {
                    self.flag(image, TWI_WIF | TWI_RXACK);
                }
            }
        } else if address == self.base + TWI_MCTRLC {
            // CMD always reads as zero.
            image.set(address, value & !TWI_CMD);
            match value & TWI_CMD {
                TWI_RECVTRANS if self.phase == TwiPhase::Reading => self.send_next(image),
                TWI_STOP => {
                    self.phase = TwiPhase::Idle;
                    self.flag(image, 0);
                    self.set_bus_state(image, TWI_IDLE);
                }
                _ => {}
            }
        } else if address == self.status() {
            let cleared = old & !(value & TWI_FLAGS);
            image.set(address, (cleared & !TWI_BUSSTATE) | (value & TWI_BUSSTATE));
        }
    }
}

const CCP: usize = 0x0034;
const CCP_IOREG: u8 = 0xD8;
const CLK_CTRL: usize = 0x0040;
const CLK_PSCTRL: usize = 0x0041;
const CLK_LOCK: usize = 0x0042;
const CLK_SCLKSEL: u8 = 0x07;
const OSC_CTRL: usize = 0x0050;
const OSC_STATUS: usize = 0x0051;
const OSC_PLLCTRL: usize = 0x0055;
const OSC_PLLEN: u8 = 1 << 4;
const OSC_ALL: u8 = 0x1F;

/// The clock system, the oscillators and the configuration change
/// protection.
///
/// The 2 MHz RC oscillator runs from the start. Any other oscillator reports
/// ready on the `latency + 1`-th STATUS read after it was enabled, and drops
/// out as soon as it is disabled. The oscillator clocking the system can't be
/// disabled, and PLLCTRL is frozen while the PLL runs.
///
/// A write to CLK CTRL, PSCTRL or LOCK only sticks if the previous write to
/// any of the claimed registers put the I/O signature into CCP, the clock
/// system isn't locked, and for CTRL the selected oscillator is ready.
pub struct ClockModel {
    latency: u32,
    starting: [Option<u32>; 5],
    unprotected: bool,
}

impl ClockModel {
    /// Creates the model with oscillators starting after `latency` STATUS
    /// reads.
    pub fn new(latency: u32) -> Self {
        Self { latency, starting: [None; 5], unprotected: false }
    }

    fn accepts(image: &Image, address: usize, old: u8, value: u8) -> bool {
        let lock = if address == CLK_LOCK { old } else { image.get(CLK_LOCK) };
        if lock & 1 != 0 {
            return false;
        }
        address != CLK_CTRL || image.get(OSC_STATUS) & (1 << (value & CLK_SCLKSEL)) != 0
    }
}

impl Device for ClockModel {
    fn claims(&self, address: usize) -> bool {
        address == CCP
            || (CLK_CTRL..CLK_CTRL + 5).contains(&address)
            || (OSC_CTRL..=OSC_PLLCTRL).contains(&address)
    }

    fn attach(&mut self, image: &mut Image) {
        image.set(OSC_CTRL, 1);
        image.set(OSC_STATUS, 1);
    }

    fn on_read(&mut self, image: &mut Image, address: usize) {
        if address == OSC_STATUS {
            for (bit, slot) in self.starting.iter_mut().enumerate() {
                match slot {
                    Some(0) => {
                        image.set_bits(OSC_STATUS, 1 << bit);
                        *slot = None;
                    }
                    Some(remaining) => *remaining -= 1,
                    None => {}
                }
            }
        }
    }

    fn on_write(&mut self, image: &mut Image, address: usize, old: u8, value: u8) {
        let unprotected = core::mem::replace(&mut self.unprotected, false);
        match address {
            CCP => self.unprotected = value == CCP_IOREG,
            CLK_CTRL | CLK_PSCTRL | CLK_LOCK => {
                if !unprotected || !Self::accepts(image, address, old, value) {
                    image.set(address, old);
                }
            }
            OSC_CTRL => {
                let system = 1 << (image.get(CLK_CTRL) & CLK_SCLKSEL);
                let enabled = (value | system) & OSC_ALL;
                image.set(address, enabled);
                for (bit, slot) in self.starting.iter_mut().enumerate() {
                    let mask = 1 << bit;
                    if enabled & mask == 0 {
                        *slot = None;
                        image.clear_bits(OSC_STATUS, mask);
                    } else if old & mask == 0 {
                        *slot = Some(self.latency);
                    }
                }
            }
            OSC_STATUS => image.set(address, old),
            OSC_PLLCTRL if image.get(OSC_CTRL) & OSC_PLLEN != 0 => image.set(address, old),
            _ => {}
        }
    }
}
