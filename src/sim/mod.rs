//! Host-side simulation of the data memory.
//!
//! When the crate is built for anything other than AVR, every register access
//! lands in a 64 KiB memory image owned by the current thread. Tests run on
//! separate threads, so each test sees its own image.
//!
//! Plain memory is enough for most register traffic. Peripherals whose
//! registers have side effects (flags raised by hardware, write-one-to-clear
//! bits, data registers backed by FIFOs) are modelled by [`Device`]s attached
//! with [`attach`]; a few ready-made models live in [`models`].
//!
//! Every access through a register accessor is recorded in a journal, which
//! stands in for a trace of the bus traffic:
//!
//! ```
//! use xmega_core::reg::Reg;
//! use xmega_core::sim::{self, Access};
//!
//! sim::reset();
//! let reg = unsafe { Reg::<u8>::at(0x2000) };
//! reg.write(0x5A);
//! assert_eq!(reg.read(), 0x5A);
//! assert_eq!(sim::journal(), [
//!     Access::Write { address: 0x2000, old: 0x00, value: 0x5A },
//!     Access::Read { address: 0x2000, value: 0x5A },
//! ]);
//! ```

pub mod models;

use core::cell::RefCell;
use std::{boxed::Box, thread_local, vec, vec::Vec};

/// Size of the simulated data memory.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// One recorded register access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// A byte was read.
    Read {
        /// Address of the byte.
        address: usize,
        /// Value returned to the reader.
        value: u8,
    },
    /// A byte was written.
    Write {
        /// Address of the byte.
        address: usize,
        /// Content before the write.
        old: u8,
        /// Value written.
        value: u8,
    },
}

impl Access {
    /// Returns the accessed address.
    pub fn address(&self) -> usize {
        match *self {
            Self::Read { address, .. } | Self::Write { address, .. } => address,
        }
    }

    /// Returns `true` if this is a read of `address`.
    pub fn is_read_of(&self, address: usize) -> bool {
        matches!(*self, Self::Read { address: a, .. } if a == address)
    }

    /// Returns `true` if this is a write to `address`.
    pub fn is_write_to(&self, address: usize) -> bool {
        matches!(*self, Self::Write { address: a, .. } if a == address)
    }
}

/// The simulated memory, as seen by [`Device`] hooks.
pub struct Image {
    bytes: Box<[u8]>,
}

impl Image {
    fn new() -> Self {
        Self { bytes: vec![0; MEMORY_SIZE].into_boxed_slice() }
    }

    /// Returns the byte at `address`.
    ///
    /// # Panics
    ///
    /// If `address` is outside of the simulated memory.
    pub fn get(&self, address: usize) -> u8 {
        self.bytes[checked(address)]
    }

    /// Sets the byte at `address`.
    ///
    /// # Panics
    ///
    /// If `address` is outside of the simulated memory.
    pub fn set(&mut self, address: usize, value: u8) {
        self.bytes[checked(address)] = value;
    }

    /// Sets the bits of `mask` in the byte at `address`.
    pub fn set_bits(&mut self, address: usize, mask: u8) {
        let value = self.get(address) | mask;
        self.set(address, value);
    }

    /// Clears the bits of `mask` in the byte at `address`.
    pub fn clear_bits(&mut self, address: usize, mask: u8) {
        let value = self.get(address) & !mask;
        self.set(address, value);
    }

    /// Returns the little-endian 16-bit value at `address`.
    pub fn get_u16(&self, address: usize) -> u16 {
        u16::from_le_bytes([self.get(address), self.get(address + 1)])
    }

    /// Sets the little-endian 16-bit value at `address`.
    pub fn set_u16(&mut self, address: usize, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.set(address, low);
        self.set(address + 1, high);
    }
}

fn checked(address: usize) -> usize {
    assert!(address < MEMORY_SIZE, "address {address:#x} outside of the simulated memory");
    address
}

/// A model of a peripheral with register side effects.
///
/// Hooks run for every access to an address the device [claims](Self::claims).
/// A read hook runs before the value is fetched from the image, so it can
/// prepare the value. A write hook runs after the value was stored, and gets the
/// previous content so it can implement write-one-to-clear or read-only bits.
pub trait Device {
    /// Returns `true` if the device reacts to accesses of `address`.
    fn claims(&self, address: usize) -> bool;

    /// Called once when the device is attached.
    fn attach(&mut self, _image: &mut Image) {}

    /// Called before `address` is read.
    fn on_read(&mut self, _image: &mut Image, _address: usize) {}

    /// Called after `value` was written to `address`, replacing `old`.
    fn on_write(&mut self, _image: &mut Image, _address: usize, _old: u8, _value: u8) {}
}

struct State {
    image: Image,
    devices: Vec<Box<dyn Device>>,
    journal: Vec<Access>,
}

impl State {
    fn new() -> Self {
        Self { image: Image::new(), devices: Vec::new(), journal: Vec::new() }
    }
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::new());
}

pub(crate) fn read8(address: usize) -> u8 {
    STATE.with(|state| {
        let State { image, devices, journal } = &mut *state.borrow_mut();
        for device in devices.iter_mut().filter(|device| device.claims(address)) {
            device.on_read(image, address);
        }
        let value = image.get(address);
        journal.push(Access::Read { address, value });
        value
    })
}

pub(crate) fn write8(address: usize, value: u8) {
    STATE.with(|state| {
        let State { image, devices, journal } = &mut *state.borrow_mut();
        let old = image.get(address);
        image.set(address, value);
        for device in devices.iter_mut().filter(|device| device.claims(address)) {
            device.on_write(image, address, old, value);
        }
        journal.push(Access::Write { address, old, value });
    })
}

/// Clears the memory image, detaches every device and empties the journal.
pub fn reset() {
    STATE.with(|state| *state.borrow_mut() = State::new());
}

/// Attaches a peripheral model.
pub fn attach<D: Device + 'static>(mut device: D) {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        device.attach(&mut state.image);
        state.devices.push(Box::new(device));
    });
}

/// Returns the byte at `address`, bypassing devices and the journal.
pub fn peek(address: usize) -> u8 {
    STATE.with(|state| state.borrow().image.get(address))
}

/// Sets the byte at `address`, bypassing devices and the journal.
pub fn poke(address: usize, value: u8) {
    STATE.with(|state| state.borrow_mut().image.set(address, value));
}

/// Returns the 16-bit value at `address`, bypassing devices and the journal.
pub fn peek_u16(address: usize) -> u16 {
    STATE.with(|state| state.borrow().image.get_u16(address))
}

/// Sets the 16-bit value at `address`, bypassing devices and the journal.
pub fn poke_u16(address: usize, value: u16) {
    STATE.with(|state| state.borrow_mut().image.set_u16(address, value));
}

/// Returns a copy of the access journal.
pub fn journal() -> Vec<Access> {
    STATE.with(|state| state.borrow().journal.clone())
}

/// Empties the access journal.
pub fn clear_journal() {
    STATE.with(|state| state.borrow_mut().journal.clear());
}

/// Returns the values written to `address`, oldest first.
pub fn writes_to(address: usize) -> Vec<u8> {
    STATE.with(|state| {
        state
            .borrow()
            .journal
            .iter()
            .filter_map(|access| match *access {
                Access::Write { address: a, value, .. } if a == address => Some(value),
                _ => None,
            })
            .collect()
    })
}

/// Returns the number of reads of `address`.
pub fn reads_of(address: usize) -> usize {
    STATE.with(|state| {
        state.borrow().journal.iter().filter(|access| access.is_read_of(address)).count()
    })
}
