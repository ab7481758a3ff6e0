//! Blocking TWI (I²C) master driver.
//!
//! Transactions poll the master status register. Each step, whether the
//! address phase or a single data byte, gives up after [`POLL_BUDGET`] status
//! reads, so a dead bus reports [`TwiError::Timeout`] instead of hanging.
//! Addresses are 7-bit; the R/W bit is appended by the driver.

use crate::map::{
    twi::{BusState, Command, SdaHold, Timeout, Twi},
    IntLevel,
};
use core::fmt;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Maximum number of status reads spent waiting for one bus step.
pub const POLL_BUDGET: u16 = 1000;

/// Computes the MBAUD value for `baud` Hz from `cpu` Hz, with a bus rise time
/// of `t_rise` µs. The result is not range checked.
///
/// ```
/// use xmega_core::drv::twi::get_baud;
///
/// assert_eq!(get_baud(2_000_000, 100_000, 0), 5);
/// assert_eq!(get_baud(32_000_000, 400_000, 0), 35);
/// ```
pub const fn get_baud(cpu: u32, baud: u32, t_rise: u32) -> u8 {
    let scaled = (cpu as i64 * 1_000_000) / baud as i64 - 10_000_000 - cpu as i64 * t_rise as i64;
    let value = scaled / 2_000_000;
    if value < 0 {
        0
    } else if value > u8::MAX as i64 {
        u8::MAX
    } else {
        value as u8
    }
}

/// Snapshot of the master STATUS register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwiStatus {
    /// A byte was received in master read mode.
    pub read_complete: bool,
    /// A byte was transmitted in master write mode.
    pub write_complete: bool,
    /// The master is holding SCL low.
    pub clock_hold: bool,
    /// The last acknowledge received was a NACK.
    pub received_nack: bool,
    /// Arbitration was lost.
    pub arbitration_lost: bool,
    /// An illegal bus condition occurred.
    pub bus_error: bool,
    /// Bus state.
    pub state: BusState,
}

impl TwiStatus {
    /// Returns `true` if a NACK, lost arbitration or a bus error is flagged.
    #[inline]
    pub fn write_error(&self) -> bool {
        self.received_nack || self.arbitration_lost || self.bus_error
    }
}

/// TWI transaction failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiError {
    /// A bus step didn't complete within the poll budget.
    Timeout,
    /// Another master owns the bus.
    BusBusy,
    /// The target didn't acknowledge.
    Nack,
    /// Arbitration was lost to another master.
    ArbitrationLost,
    /// An illegal bus condition occurred.
    BusError,
}

impl fmt::Display for TwiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("TWI bus timeout"),
            Self::BusBusy => f.write_str("TWI bus busy"),
            Self::Nack => f.write_str("TWI target not acknowledging"),
            Self::ArbitrationLost => f.write_str("TWI arbitration lost"),
            Self::BusError => f.write_str("TWI bus error"),
        }
    }
}

impl i2c::Error for TwiError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            Self::ArbitrationLost => ErrorKind::ArbitrationLoss,
            Self::BusError => ErrorKind::Bus,
            Self::Timeout | Self::BusBusy => ErrorKind::Other,
        }
    }
}

/// TWI master on the TWI at `BASE`.
pub struct TwiMaster<const BASE: usize, SDA, SCL> {
    twi: Twi<BASE>,
    sda: SDA,
    scl: SCL,
}

impl<const BASE: usize, SDA, SCL> TwiMaster<BASE, SDA, SCL> {
    /// Creates the driver. The pins are taken over by the peripheral.
    #[inline]
    pub fn new(twi: Twi<BASE>, sda: SDA, scl: SCL) -> Self {
        Self { twi, sda, scl }
    }

    /// Releases the peripheral and the pins.
    #[inline]
    pub fn free(self) -> (Twi<BASE>, SDA, SCL) {
        (self.twi, self.sda, self.scl)
    }

    /// Configures the master for `BAUD` Hz from `CPU` Hz with a rise time of
    /// `T_RISE` µs. The bus state is forced to unknown; the master stays
    /// disabled.
    pub fn init<const CPU: u32, const BAUD: u32, const T_RISE: u32>(&self) {
        let ctrl = self.twi.ctrl();
        ctrl.store(ctrl.sdahold().shift(SdaHold::Off) | ctrl.edien().shift(false));

        let mctrlb = self.twi.mctrlb();
        mctrlb.store(
            mctrlb.timeout().shift(Timeout::Disabled)
                | mctrlb.qcen().shift(false)
                | mctrlb.smen().shift(false),
        );

        let mstatus = self.twi.mstatus();
        mstatus.store(
            mstatus.busstate().shift(BusState::Unknown)
                | mstatus.wif().shift(true)
                | mstatus.rif().shift(true),
        );

        self.twi.mbaud().write(const { get_baud(CPU, BAUD, T_RISE) });
        debug!("TWI@{=usize:x}: {=u32} Hz from {=u32} Hz", BASE, BAUD, CPU);
    }

    /// Enables the master.
    #[inline]
    pub fn start(&self) {
        self.twi.mctrla().enable().set();
    }

    /// Disables the master.
    #[inline]
    pub fn stop(&self) {
        self.twi.mctrla().enable().clear();
    }

    /// Forces the bus state to idle and clears the read and write flags.
    pub fn set_idle(&self) {
        let mstatus = self.twi.mstatus();
        mstatus.store(
            mstatus.busstate().shift(BusState::Idle)
                | mstatus.wif().shift(true)
                | mstatus.rif().shift(true),
        );
    }

    /// Sets the master interrupt level and the read and write interrupt
    /// enables.
    pub fn enable_interrupt(&self, level: IntLevel, read: bool, write: bool) {
        let mctrla = self.twi.mctrla();
        mctrla.modify(
            mctrla.intlvl().shift(level) | mctrla.rien().shift(read) | mctrla.wien().shift(write),
        );
    }

    /// Reads the master status.
    pub fn get_status(&self) -> TwiStatus {
        let mstatus = self.twi.mstatus();
        let snapshot = mstatus.read();
        TwiStatus {
            read_complete: mstatus.rif().get(snapshot),
            write_complete: mstatus.wif().get(snapshot),
            clock_hold: mstatus.clkhold().get(snapshot),
            received_nack: mstatus.rxack().get(snapshot),
            arbitration_lost: mstatus.arblost().get(snapshot),
            bus_error: mstatus.buserr().get(snapshot),
            state: BusState::from_raw(snapshot),
        }
    }

    /// Clears the arbitration lost flag.
    #[inline]
    pub fn clear_arbitration_lost(&self) {
        let mstatus = self.twi.mstatus();
        self.clear_flags(mstatus.arblost().mask());
    }

    /// Clears the bus error flag.
    #[inline]
    pub fn clear_bus_error(&self) {
        let mstatus = self.twi.mstatus();
        self.clear_flags(mstatus.buserr().mask());
    }

    /// Clears the write complete flag.
    #[inline]
    pub fn clear_write_interrupt(&self) {
        let mstatus = self.twi.mstatus();
        self.clear_flags(mstatus.wif().mask());
    }

    /// Clears the read complete flag.
    #[inline]
    pub fn clear_read_interrupt(&self) {
        let mstatus = self.twi.mstatus();
        self.clear_flags(mstatus.rif().mask());
    }

    fn clear_flags(&self, mask: u8) {
        let mstatus = self.twi.mstatus();
        let state = mstatus.read() & mstatus.busstate().mask();
        mstatus.write(mask | state);
    }

    /// Returns the last address written.
    #[inline]
    pub fn read_address(&self) -> u8 {
        self.twi.maddr().read()
    }

    /// Issues a START (or a repeated START when the bus is owned) followed by
    /// the 7-bit `address` and the R/W bit.
    #[inline]
    pub fn write_address(&self, address: u8, read: bool) {
        self.twi.maddr().write(address << 1 | read as u8);
    }

    /// Transmits `byte`.
    #[inline]
    pub fn write_data(&self, byte: u8) {
        self.twi.mdata().write(byte);
    }

    /// Takes the received byte. Unless it is the `last` one, the byte is
    /// acknowledged and the next reception starts.
    pub fn read_data(&self, last: bool) -> u8 {
        let byte = self.twi.mdata().read();
        if !last {
            let mctrlc = self.twi.mctrlc();
            mctrlc.store(mctrlc.cmd().shift(Command::RecvTrans));
        }
        byte
    }

    /// Issues a STOP, preceded by a NACK when `nack` is set.
    pub fn send_stop(&self, nack: bool) {
        let mctrlc = self.twi.mctrlc();
        mctrlc.store(mctrlc.ackact().shift(nack) | mctrlc.cmd().shift(Command::Stop));
    }

    /// Issues a repeated START, preceded by a NACK when `nack` is set.
    pub fn send_restart(&self, nack: bool) {
        let mctrlc = self.twi.mctrlc();
        mctrlc.store(mctrlc.ackact().shift(nack) | mctrlc.cmd().shift(Command::RepStart));
    }

    /// Sends `data` to the target at `address`. The bus is released with a
    /// STOP if `stop` is set, otherwise it stays owned for a repeated START.
    pub fn write(&self, address: u8, data: &[u8], stop: bool) -> Result<usize, TwiError> {
        self.acquire()?;
        self.address_phase(address, false, false)
            .and_then(|()| self.write_bytes(data))
            .map_err(|error| self.abort(error))?;
        if stop {
            self.send_stop(false);
        }
        Ok(data.len())
    }

    /// Fills `buf` from the target at `address`, then releases the bus.
    ///
    /// An empty `buf` doesn't touch the bus: a read can't end before its
    /// first byte.
    pub fn read(&self, address: u8, buf: &mut [u8]) -> Result<usize, TwiError> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.acquire()?;
        self.address_phase(address, true, false)
            .and_then(|()| self.read_bytes(buf, true))
            .map_err(|error| self.abort(error))?;
        self.send_stop(true);
        self.wait_idle()?;
        Ok(buf.len())
    }

    /// Sends `data` and reads `buf` after a repeated START.
    pub fn write_read(&self, address: u8, data: &[u8], buf: &mut [u8]) -> Result<usize, TwiError> {
        if buf.is_empty() {
            self.write(address, data, true)?;
            return Ok(0);
        }
        self.write(address, data, false)?;
        self.read(address, buf)
    }

    /// Reads register `reg` of the target at `address`.
    pub fn read_reg8(&self, address: u8, reg: u8) -> Result<u8, TwiError> {
        let mut value = [0];
        self.write_read(address, &[reg], &mut value)?;
        Ok(value[0])
    }

    /// Writes `value` to register `reg` of the target at `address`.
    pub fn write_reg8(&self, address: u8, reg: u8, value: u8) -> Result<(), TwiError> {
        self.write(address, &[reg, value], true).map(drop)
    }

    fn acquire(&self) -> Result<(), TwiError> {
        match self.get_status().state {
            BusState::Busy => {
                warn!("TWI@{=usize:x}: bus busy", BASE);
                Err(TwiError::BusBusy)
            }
            BusState::Unknown => {
                self.set_idle();
                Ok(())
            }
            BusState::Idle | BusState::Owner => Ok(()),
        }
    }

    fn address_phase(&self, address: u8, read: bool, after_read: bool) -> Result<(), TwiError> {
        if after_read {
            let mctrlc = self.twi.mctrlc();
            mctrlc.store(mctrlc.ackact().shift(true));
        }
        self.write_address(address, read);
        if read {
            Ok(())
        } else {
            self.wait_write()
        }
    }

    fn write_bytes(&self, data: &[u8]) -> Result<(), TwiError> {
        for &byte in data {
            self.write_data(byte);
            self.wait_write()?;
        }
        Ok(())
    }

    fn read_bytes(&self, buf: &mut [u8], nack_last: bool) -> Result<(), TwiError> {
        let last = buf.len().saturating_sub(1);
        for (i, byte) in buf.iter_mut().enumerate() {
            self.wait_read()?;
            *byte = self.read_data(nack_last && i == last);
        }
        Ok(())
    }

    fn wait_write(&self) -> Result<(), TwiError> {
        self.wait(|status| status.write_complete)
    }

    fn wait_read(&self) -> Result<(), TwiError> {
        self.wait(|status| status.read_complete)
    }

    fn wait(&self, done: impl Fn(&TwiStatus) -> bool) -> Result<(), TwiError> {
        for _ in 0..POLL_BUDGET {
            let status = self.get_status();
            if status.arbitration_lost {
                return Err(TwiError::ArbitrationLost);
            }
            if status.bus_error {
                return Err(TwiError::BusError);
            }
            if status.write_complete && status.received_nack {
                return Err(TwiError::Nack);
            }
            if done(&status) {
                return Ok(());
            }
        }
        Err(TwiError::Timeout)
    }

    fn wait_idle(&self) -> Result<(), TwiError> {
        for _ in 0..POLL_BUDGET {
            if self.get_status().state == BusState::Idle {
                return Ok(());
            }
        }
        self.set_idle();
        warn!("TWI@{=usize:x}: {}", BASE, TwiError::Timeout);
        Err(TwiError::Timeout)
    }

    fn abort(&self, error: TwiError) -> TwiError {
        self.send_stop(true);
        warn!("TWI@{=usize:x}: {}", BASE, error);
        error
    }
}

impl<const BASE: usize, SDA, SCL> ErrorType for TwiMaster<BASE, SDA, SCL> {
    type Error = TwiError;
}

impl<const BASE: usize, SDA, SCL> I2c for TwiMaster<BASE, SDA, SCL> {
    /// Adjacent operations of the same direction share one address phase; a
    /// change of direction issues a repeated START.
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), TwiError> {
        self.acquire()?;
        let mut previous_read = None;
        for i in 0..operations.len() {
            let next_read = matches!(operations.get(i + 1), Some(Operation::Read(_)));
            let result = match &mut operations[i] {
                Operation::Write(data) => {
                    let phase = if previous_read == Some(false) {
                        Ok(())
                    } else {
                        self.address_phase(address, false, previous_read == Some(true))
                    };
                    previous_read = Some(false);
                    phase.and_then(|()| self.write_bytes(data))
                }
                Operation::Read(buf) => {
                    let phase = if previous_read == Some(true) {
                        Ok(())
                    } else {
                        self.address_phase(address, true, false)
                    };
                    previous_read = Some(true);
                    phase.and_then(|()| self.read_bytes(buf, !next_read))
                }
            };
            result.map_err(|error| self.abort(error))?;
        }
        match previous_read {
            Some(read) => {
                self.send_stop(read);
                if read {
                    self.wait_idle()?;
                }
            }
            None => self.send_stop(false),
        }
        Ok(())
    }
}
