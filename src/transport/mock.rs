//! Simulated SCL3300 for testing
//!
//! Models the parts of the device the driver depends on: the off-frame
//! pipeline (each response answers the previous command), bank selection,
//! the MODE register with power down and software reset, clear-on-read
//! STATUS, serial number registers visible only in bank 1 and a fake clock.
//! Faults can be injected per exchange to exercise the error paths.

use super::*;
use crate::config::spi::FRAME_LEN;
use crate::protocol::{Frame, ReturnStatus};
use core::cell::{Cell, RefCell};
use heapless::Vec;

/// Register addresses understood by the simulator
mod addr {
    pub const ACC_X: u8 = 0x01;
    pub const ACC_Y: u8 = 0x02;
    pub const ACC_Z: u8 = 0x03;
    pub const STO: u8 = 0x04;
    pub const TEMP: u8 = 0x05;
    pub const STATUS: u8 = 0x06;
    pub const ERR_FLAG1: u8 = 0x07;
    pub const ERR_FLAG2: u8 = 0x08;
    pub const ANG_X: u8 = 0x09;
    pub const ANG_Y: u8 = 0x0A;
    pub const ANG_Z: u8 = 0x0B;
    pub const ANG_CTRL: u8 = 0x0C;
    pub const MODE: u8 = 0x0D;
    pub const WHOAMI: u8 = 0x10;
    pub const SERIAL1: u8 = 0x19;
    pub const SERIAL2: u8 = 0x1A;
    pub const SELBANK: u8 = 0x1F;
}

/// MODE register write values with special meaning
mod mode_value {
    pub const POWER_DOWN: u16 = 0x0004;
    pub const SW_RESET: u16 = 0x0020;
}

/// Fault applied to one exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Flip the lowest CRC bit of the response
    BadChecksum,
    /// Report RS = ERROR with a valid CRC
    ErrorStatus,
    /// Answer from the neighbouring register address
    WrongAddress,
    /// Flip the read/write bit of the response
    WrongDirection,
    /// Report a partial exchange
    ShortExchange,
    /// Fail the exchange before the device sees it
    Bus,
}

/// Simulated device registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub bank: u8,
    /// MODE bits 1..0
    pub mode: u16,
    pub powered_down: bool,
    pub angles_enabled: bool,
    pub acceleration: [i16; 3],
    pub self_test_output: i16,
    pub temperature: i16,
    pub angle: [i16; 3],
    /// Latched STATUS flags, cleared by reading
    pub status: u16,
    /// STATUS flags whose cause persists, read back after every clear
    pub persistent_status: u16,
    pub error_flag1: u16,
    pub error_flag2: u16,
    pub serial: [u16; 2],
    pub who_am_i: u16,
    pub return_status: ReturnStatus,
    pub software_resets: u32,
}

impl Registers {
    fn software_reset(&mut self) {
        self.bank = 0;
        self.mode = 0;
        self.powered_down = false;
        self.angles_enabled = false;
        self.software_resets += 1;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            bank: 0,
            mode: 0,
            powered_down: false,
            angles_enabled: false,
            acceleration: [0; 3],
            self_test_output: 0,
            temperature: 0,
            angle: [0; 3],
            status: 0,
            persistent_status: 0,
            error_flag1: 0,
            error_flag2: 0,
            serial: [0; 2],
            who_am_i: 0x00C1,
            return_status: ReturnStatus::NormalOperation,
            software_resets: 0,
        }
    }
}

/// In-memory SCL3300 implementing [`Transport`]
pub struct SimulatedScl3300 {
    registers: RefCell<Registers>,
    /// Response clocked out by the next exchange
    pending: Cell<Frame>,
    now_us: Cell<u64>,
    /// Exchanges attempted so far
    exchanges: Cell<u32>,
    /// Faults keyed by absolute exchange index
    faults: RefCell<Vec<(u32, Fault), 16>>,
    /// Fault applied to every exchange
    persistent_fault: Cell<Option<Fault>>,
    /// Record of transmitted frames
    tx_history: RefCell<Vec<Frame, 128>>,
    last_exchange_end: Cell<Option<u64>>,
    min_spacing_us: Cell<Option<u64>>,
    delays_ms: RefCell<Vec<u32, 16>>,
}

impl SimulatedScl3300 {
    /// Create a powered-up device in bank 0, mode 1
    pub fn new() -> Self {
        Self {
            registers: RefCell::new(Registers::default()),
            pending: Cell::new(Frame::encode(false, 0, ReturnStatus::StartupInProgress, 0)),
            now_us: Cell::new(0),
            exchanges: Cell::new(0),
            faults: RefCell::new(Vec::new()),
            persistent_fault: Cell::new(None),
            tx_history: RefCell::new(Vec::new()),
            last_exchange_end: Cell::new(None),
            min_spacing_us: Cell::new(None),
            delays_ms: RefCell::new(Vec::new()),
        }
    }

    /// Modify the simulated registers
    pub fn update(&self, f: impl FnOnce(&mut Registers)) {
        f(&mut self.registers.borrow_mut());
    }

    /// Snapshot of the simulated registers
    pub fn registers(&self) -> Registers {
        *self.registers.borrow()
    }

    /// Apply `fault` to the exchange `offset` exchanges from now
    pub fn inject_fault(&self, offset: u32, fault: Fault) {
        let index = self.exchanges.get() + offset;
        let _ = self.faults.borrow_mut().push((index, fault));
    }

    /// Apply `fault` to every exchange until cleared
    pub fn set_persistent_fault(&self, fault: Option<Fault>) {
        self.persistent_fault.set(fault);
    }

    /// Get all transmitted frames, oldest first
    pub fn get_tx_history(&self) -> Vec<Frame, 128> {
        self.tx_history.borrow().clone()
    }

    pub fn clear_tx_history(&self) {
        self.tx_history.borrow_mut().clear();
    }

    pub fn exchange_count(&self) -> u32 {
        self.exchanges.get()
    }

    /// Smallest gap observed between consecutive exchanges
    pub fn min_spacing_us(&self) -> Option<u64> {
        self.min_spacing_us.get()
    }

    /// Every millisecond delay requested, in order
    pub fn get_delays_ms(&self) -> Vec<u32, 16> {
        self.delays_ms.borrow().clone()
    }

    fn take_fault(&self, index: u32) -> Option<Fault> {
        let mut faults = self.faults.borrow_mut();
        if let Some(position) = faults.iter().position(|(i, _)| *i == index) {
            return Some(faults.swap_remove(position).1);
        }
        self.persistent_fault.get()
    }

    /// Act on a received command and build the response for the next exchange
    fn respond(&self, command: Frame) -> Frame {
        let decoded = command.decode();
        let mut regs = self.registers.borrow_mut();

        if !command.has_valid_crc() {
            return Frame::encode(decoded.write, decoded.address, ReturnStatus::Error, 0);
        }

        if decoded.write {
            match decoded.address {
                addr::SELBANK => regs.bank = (decoded.data & 1) as u8,
                addr::MODE => match decoded.data {
                    mode_value::SW_RESET => regs.software_reset(),
                    mode_value::POWER_DOWN => regs.powered_down = true,
                    value => {
                        regs.mode = value & 0b11;
                        regs.powered_down = false;
                    }
                },
                addr::ANG_CTRL => regs.angles_enabled = decoded.data == 0x001F,
                _ => {}
            }
            return Frame::encode(true, decoded.address, regs.return_status, decoded.data);
        }

        let angle = |value: i16, enabled: bool| if enabled { value as u16 } else { 0 };
        let data = match decoded.address {
            addr::ACC_X => regs.acceleration[0] as u16,
            addr::ACC_Y => regs.acceleration[1] as u16,
            addr::ACC_Z => regs.acceleration[2] as u16,
            addr::STO => regs.self_test_output as u16,
            addr::TEMP => regs.temperature as u16,
            addr::STATUS => {
                let value = regs.status | regs.persistent_status;
                regs.status = 0;
                value
            }
            addr::ERR_FLAG1 => regs.error_flag1,
            addr::ERR_FLAG2 => regs.error_flag2,
            addr::ANG_X => angle(regs.angle[0], regs.angles_enabled),
            addr::ANG_Y => angle(regs.angle[1], regs.angles_enabled),
            addr::ANG_Z => angle(regs.angle[2], regs.angles_enabled),
            addr::MODE => regs.mode | ((regs.powered_down as u16) << 2),
            addr::WHOAMI => regs.who_am_i,
            addr::SERIAL1 if regs.bank == 1 => regs.serial[0],
            addr::SERIAL2 if regs.bank == 1 => regs.serial[1],
            addr::SELBANK => regs.bank as u16,
            _ => 0,
        };
        Frame::encode(false, decoded.address, regs.return_status, data)
    }
}

fn apply_fault(response: Frame, fault: Fault) -> Frame {
    let decoded = response.decode();
    match fault {
        Fault::BadChecksum => Frame::from_word(response.word() ^ 0x01),
        Fault::ErrorStatus => {
            Frame::encode(decoded.write, decoded.address, ReturnStatus::Error, decoded.data)
        }
        Fault::WrongAddress => Frame::encode(
            decoded.write,
            decoded.address.wrapping_add(1),
            decoded.return_status,
            decoded.data,
        ),
        Fault::WrongDirection => Frame::encode(
            !decoded.write,
            decoded.address,
            decoded.return_status,
            decoded.data,
        ),
        Fault::ShortExchange | Fault::Bus => response,
    }
}

impl Default for SimulatedScl3300 {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SimulatedScl3300 {
    fn exchange(
        &mut self,
        tx: &[u8; FRAME_LEN],
        rx: &mut [u8; FRAME_LEN],
    ) -> Result<usize, TransportError> {
        let index = self.exchanges.get();
        self.exchanges.set(index + 1);
        let fault = self.take_fault(index);

        let now = self.now_us.get();
        if let Some(end) = self.last_exchange_end.get() {
            let gap = now - end;
            let min = self.min_spacing_us.get().map_or(gap, |m| m.min(gap));
            self.min_spacing_us.set(Some(min));
        }
        let _ = self.tx_history.borrow_mut().push(Frame::from_bytes(*tx));

        // One microsecond on the wire per frame
        self.now_us.set(now + 1);
        self.last_exchange_end.set(Some(now + 1));

        if fault == Some(Fault::Bus) {
            return Err(TransportError::Bus);
        }

        let response = self.pending.get();
        self.pending.set(self.respond(Frame::from_bytes(*tx)));

        let response = match fault {
            Some(fault) => apply_fault(response, fault),
            None => response,
        };
        *rx = *response.as_bytes();

        if fault == Some(Fault::ShortExchange) {
            Ok(FRAME_LEN / 2)
        } else {
            Ok(FRAME_LEN)
        }
    }

    fn now_micros(&self) -> u64 {
        self.now_us.get()
    }

    fn wait_until_micros(&mut self, deadline_us: u64) {
        if self.now_us.get() < deadline_us {
            self.now_us.set(deadline_us);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        let _ = self.delays_ms.borrow_mut().push(ms);
        self.now_us.set(self.now_us.get() + ms as u64 * 1000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn exchange(device: &mut SimulatedScl3300, command: Command) -> Frame {
        let mut rx = [0u8; FRAME_LEN];
        device
            .exchange(command.frame().as_bytes(), &mut rx)
            .expect("exchange");
        Frame::from_bytes(rx)
    }

    #[test]
    fn test_response_answers_previous_command() {
        let mut device = SimulatedScl3300::new();
        device.update(|r| r.temperature = 5481);

        let first = exchange(&mut device, Command::ReadTemperature);
        assert_ne!(first.decode().address, 0x05);

        let second = exchange(&mut device, Command::ReadWhoAmI);
        assert_eq!(second.decode().address, 0x05);
        assert_eq!(second.decode().data, 5481);

        let third = exchange(&mut device, Command::ReadWhoAmI);
        assert_eq!(third.decode().data, 0x00C1);
    }

    #[test]
    fn test_serial_registers_only_in_bank_1() {
        let mut device = SimulatedScl3300::new();
        device.update(|r| r.serial = [0x1234, 0x0001]);

        exchange(&mut device, Command::ReadSerial1);
        assert_eq!(exchange(&mut device, Command::SwitchToBank1).decode().data, 0);

        exchange(&mut device, Command::ReadSerial1);
        assert_eq!(exchange(&mut device, Command::SwitchToBank0).decode().data, 0x1234);
        assert_eq!(device.registers().bank, 0);
    }

    #[test]
    fn test_status_clears_on_read() {
        let mut device = SimulatedScl3300::new();
        device.update(|r| {
            r.status = 0x0012;
            r.persistent_status = 0x0001;
        });
        exchange(&mut device, Command::ReadStatusSummary);
        exchange(&mut device, Command::ReadStatusSummary);
        let second = exchange(&mut device, Command::ReadStatusSummary);
        assert_eq!(second.decode().data, 0x0001);
    }

    #[test]
    fn test_mode_register_writes() {
        let mut device = SimulatedScl3300::new();
        exchange(&mut device, Command::ChangeToMode3);
        assert_eq!(device.registers().mode, 2);

        exchange(&mut device, Command::SetPowerDownMode);
        assert!(device.registers().powered_down);

        exchange(&mut device, Command::SoftwareReset);
        let regs = device.registers();
        assert_eq!(regs.mode, 0);
        assert!(!regs.powered_down);
        assert_eq!(regs.software_resets, 1);
    }

    #[test]
    fn test_injected_faults() {
        let mut device = SimulatedScl3300::new();
        device.inject_fault(1, Fault::BadChecksum);
        device.inject_fault(2, Fault::Bus);

        exchange(&mut device, Command::ReadTemperature);
        let corrupted = exchange(&mut device, Command::ReadTemperature);
        assert!(!corrupted.has_valid_crc());

        let mut rx = [0u8; FRAME_LEN];
        assert_eq!(
            device.exchange(Command::ReadTemperature.frame().as_bytes(), &mut rx),
            Err(TransportError::Bus)
        );
        assert_eq!(device.exchange_count(), 3);
    }

    #[test]
    fn test_clock_and_spacing() {
        let mut device = SimulatedScl3300::new();
        exchange(&mut device, Command::ReadTemperature);
        device.wait_until_micros(20);
        exchange(&mut device, Command::ReadTemperature);
        assert_eq!(device.min_spacing_us(), Some(19));

        device.delay_ms(2);
        assert_eq!(device.now_micros(), 2021);
        assert_eq!(device.get_delays_ms().as_slice(), &[2]);
    }
}
