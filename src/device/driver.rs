//! SCL3300 inclinometer driver
//!
//! # Off-frame protocol
//!
//! The response clocked in during an exchange answers the command sent in the
//! *previous* exchange. Every sequence is therefore built from three or more
//! transfers where only the last response is validated:
//! ```text
//! read:           [SELBANK, CMD, CMD]           last response answers CMD
//! write/confirm:  [BANK_0, WRITE, READ_COMMAND] last response answers WRITE
//! ```
//!
//! # Bank discipline
//!
//! Bank 0 must be selected whenever the driver is idle. Every sequence that
//! selects bank 1 ends with a SWITCH_TO_BANK_0 transfer whether or not an
//! earlier step failed, and the first failure is the one reported.

use core::fmt::Write;

use heapless::String;

use crate::commands::{is_legal, Command, MemoryBank};
use crate::config::device::{SERIAL_NUMBER_LEN, SERIAL_NUMBER_SUFFIX};
use crate::config::spi::FRAME_LEN;
use crate::config::startup::{RESET_SETTLE_MS, STATUS_CLEAR_READS};
use crate::config::DeviceConfig;
use crate::device::readings::{Axis, Channel, ChannelDescriptor, Readings, TemperatureScale, CHANNELS};
use crate::device::self_test::SelfTestMonitor;
use crate::device::state::{DeviceState, OperationMode};
use crate::device::validator::validate_response;
use crate::protocol::Frame;
use crate::status::{
    decode_error_flag1, decode_error_flag2, decode_status_summary, describe_command_register,
    ErrorFlag1Reason, ErrorFlag2Reason, SensorError,
};
use crate::transport::Transport;

/// Serial number text, decimal digits followed by the part suffix
pub type SerialNumber = String<SERIAL_NUMBER_LEN>;

/// Outcome of every step of the normal operation sequence
#[derive(Debug, Clone, PartialEq)]
pub struct NormalOperationReport {
    /// First failure while refreshing the channels
    pub read_all: Result<(), SensorError>,
    pub acceleration_g: [f64; 3],
    pub angle_degrees: [f64; 3],
    pub temperature_celsius: f64,
    pub self_test: Result<(), SensorError>,
    pub status_summary: Result<(), SensorError>,
    pub identity: Result<(), SensorError>,
    pub serial_number: Result<SerialNumber, SensorError>,
    pub current_bank: Result<MemoryBank, SensorError>,
    pub command_register: Result<u16, SensorError>,
    pub error_flag1: Result<(u16, ErrorFlag1Reason), SensorError>,
    pub error_flag2: Result<(u16, ErrorFlag2Reason), SensorError>,
    /// Software resets triggered by the status summary or ERR_FLAG2
    pub resets: u8,
    pub clear_status: Result<(), SensorError>,
}

/// Format the combined serial registers, `(serial2 << 16) | serial1`
pub fn format_serial_number(serial1: u16, serial2: u16) -> SerialNumber {
    let value = ((serial2 as u32) << 16) | serial1 as u32;
    let mut text = SerialNumber::new();
    // Ten digits at most plus the suffix always fits
    let _ = write!(text, "{}{}", value, SERIAL_NUMBER_SUFFIX);
    text
}

/// SCL3300 driver
///
/// Owns the transport exclusively. Callers sharing the driver between tasks
/// must hold a lock around each public operation, since interleaving two
/// multi-transfer sequences corrupts the device's bank selection.
pub struct Scl3300<T: Transport> {
    transport: T,
    state: DeviceState,
    readings: Readings,
    config: DeviceConfig,
}

impl<T: Transport> Scl3300<T> {
    /// Create a driver with the default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, DeviceConfig::default())
    }

    pub fn with_config(transport: T, config: DeviceConfig) -> Self {
        Self {
            transport,
            state: DeviceState::new(),
            readings: Readings::new(),
            config,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Exchange one frame, keeping the minimum spacing from the previous one
    fn transfer(&mut self, command: Command) -> Result<Frame, SensorError> {
        let frame = command.frame();
        debug_assert!(is_legal(&frame), "illegal frame {:02X?}", frame.as_bytes());

        if let Some(last) = self.state.last_transfer_us {
            self.transport
                .wait_until_micros(last + self.config.min_transfer_interval_us);
        }

        let mut rx = [0u8; FRAME_LEN];
        let exchanged = self.transport.exchange(frame.as_bytes(), &mut rx);
        self.state.last_transfer_us = Some(self.transport.now_micros());

        // The device acts on a SELBANK frame once it has been clocked in,
        // even when the exchange came up short
        if let (Some(bank), Ok(_)) = (command.selected_bank(), &exchanged) {
            if bank != self.state.bank {
                log::debug!("Switching to register bank #{}", bank as u8);
            }
            self.state.bank = bank;
        }

        match exchanged {
            Ok(FRAME_LEN) => Ok(Frame::from_bytes(rx)),
            Ok(count) => {
                log::warn!("{}: exchanged {} of {} bytes", command.name(), count, FRAME_LEN);
                Err(SensorError::IncorrectByteCount)
            }
            Err(e) => {
                log::warn!("{}: transport error {:?}", command.name(), e);
                Err(e.into())
            }
        }
    }

    /// Transfer `prefix`, `command` and `follow_up`, validating the response
    /// to `command` that arrives with `follow_up`
    fn sequence(
        &mut self,
        prefix: Command,
        command: Command,
        follow_up: Command,
    ) -> Result<u16, SensorError> {
        self.transfer(prefix)?;
        self.transfer(command)?;
        let response = self.transfer(follow_up)?;
        validate_response(command, &response)
    }

    /// Select bank 0 after a sequence, reporting the sequence's own failure first
    fn restore_bank0<R>(&mut self, result: Result<R, SensorError>) -> Result<R, SensorError> {
        let restored = self.transfer(Command::SwitchToBank0);
        let value = result?;
        restored?;
        Ok(value)
    }

    fn read_register(&mut self, bank: Command, command: Command) -> Result<u16, SensorError> {
        let result = self.sequence(bank, command, command);
        match &result {
            Ok(value) => log::debug!("{} = 0x{:04X}", command.name(), value),
            Err(e) => log::warn!("{}: {}", command.name(), e),
        }
        result
    }

    fn refresh(&mut self, descriptor: &ChannelDescriptor) -> Result<(), SensorError> {
        let value = self.read_register(descriptor.bank_command, descriptor.read_command)?;
        self.readings.store(descriptor.channel, value);
        Ok(())
    }

    /// Refresh one channel and return to bank 0
    pub fn read_channel(&mut self, channel: Channel) -> Result<(), SensorError> {
        let result = match CHANNELS.iter().find(|d| d.channel == channel) {
            Some(descriptor) => self.refresh(descriptor),
            None => Err(SensorError::InvalidCommandFrame),
        };
        self.restore_bank0(result)
    }

    /// Refresh every channel and return to bank 0
    ///
    /// A failed channel keeps its previous value and does not stop the
    /// remaining reads. The first failure is returned.
    pub fn read_all(&mut self) -> Result<(), SensorError> {
        let mut first_error = None;
        for descriptor in CHANNELS.iter() {
            if let Err(e) = self.refresh(descriptor) {
                first_error.get_or_insert(e);
            }
        }
        let result = match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        };
        self.restore_bank0(result)
    }

    /// Write a command and confirm it through the command register
    fn write_command(&mut self, command: Command) -> Result<(), SensorError> {
        self.sequence(Command::SwitchToBank0, command, Command::ReadCommand)
            .map(|_| ())
            .inspect_err(|e| log::warn!("{}: {}", command.name(), e))
    }

    /// Select a measurement mode
    ///
    /// A failed write triggers a software reset, leaving the device in mode 1.
    /// The write failure is returned, not the outcome of the reset.
    pub fn change_mode(&mut self, mode: OperationMode) -> Result<(), SensorError> {
        log::info!("Changing operation mode to MODE_{}", mode.number());
        match self.write_command(mode.command()) {
            Ok(()) => {
                self.state.mode = mode;
                self.state.powered_down = false;
                Ok(())
            }
            Err(e) => {
                if let Err(reset) = self.software_reset() {
                    log::error!("Software reset after failed mode change: {}", reset);
                }
                self.state.mode = OperationMode::Mode1;
                Err(e)
            }
        }
    }

    pub fn power_down(&mut self) -> Result<(), SensorError> {
        log::info!("Entering power down mode");
        self.write_command(Command::SetPowerDownMode)?;
        self.state.powered_down = true;
        Ok(())
    }

    /// Wake from power down, which also selects mode 1
    pub fn wake_up(&mut self) -> Result<(), SensorError> {
        log::info!("Waking up from power down mode");
        self.write_command(Command::WakeUpFromPowerDown)?;
        self.state.powered_down = false;
        self.state.mode = OperationMode::Mode1;
        Ok(())
    }

    pub fn software_reset(&mut self) -> Result<(), SensorError> {
        log::info!("Software resetting the sensor");
        self.write_command(Command::SoftwareReset)?;
        self.state.reset();
        Ok(())
    }

    /// Reset if `error` is one the reset decision table covers
    ///
    /// Returns whether a reset was issued.
    pub fn initiate_reset_if_required(&mut self, error: &SensorError) -> Result<bool, SensorError> {
        if !error.requires_reset() {
            return Ok(false);
        }
        self.software_reset()?;
        Ok(true)
    }

    /// Issue a bank-select round trip through bank 1 and confirm the echo
    pub fn switch_to_bank(&mut self, bank: MemoryBank) -> Result<(), SensorError> {
        let result = self
            .sequence(
                Command::SwitchToBank1,
                bank.select_command(),
                Command::SwitchToBank0,
            )
            .and_then(|echo| {
                if MemoryBank::from_bits(echo) == bank {
                    Ok(())
                } else {
                    Err(SensorError::InvalidResponseFrame)
                }
            });
        self.restore_bank0(result)
    }

    /// Read SELBANK while bank 1 is selected
    pub fn read_current_bank(&mut self) -> Result<MemoryBank, SensorError> {
        let result = self
            .sequence(
                Command::SwitchToBank1,
                Command::ReadCurrentBank,
                Command::SwitchToBank0,
            )
            .map(MemoryBank::from_bits);
        let bank = self.restore_bank0(result)?;
        log::debug!("Current memory bank #{}", bank as u8);
        Ok(bank)
    }

    fn read_serial_words(&mut self) -> Result<(u16, u16), SensorError> {
        self.transfer(Command::SwitchToBank1)?;
        self.transfer(Command::ReadSerial1)?;
        let response = self.transfer(Command::ReadSerial2)?;
        let serial1 = validate_response(Command::ReadSerial1, &response)?;
        let response = self.transfer(Command::SwitchToBank0)?;
        let serial2 = validate_response(Command::ReadSerial2, &response)?;
        Ok((serial1, serial2))
    }

    /// Read the serial number registers from bank 1
    pub fn read_serial_number(&mut self) -> Result<SerialNumber, SensorError> {
        let result = self.read_serial_words();
        let (serial1, serial2) = self.restore_bank0(result)?;
        let serial = format_serial_number(serial1, serial2);
        log::info!("Serial number {}", serial);
        Ok(serial)
    }

    /// Enable the angle outputs, required before angle channels are valid
    pub fn enable_angle_outputs(&mut self) -> Result<(), SensorError> {
        self.read_register(Command::SwitchToBank0, Command::EnableAngleOutputs)?;
        self.state.angles_enabled = true;
        Ok(())
    }

    pub fn read_error_flag1(&mut self) -> Result<(u16, ErrorFlag1Reason), SensorError> {
        let raw = self.read_register(Command::SwitchToBank0, Command::ReadErrorFlag1)?;
        let reason = decode_error_flag1(raw);
        if reason != ErrorFlag1Reason::NoError {
            log::warn!("ERR_FLAG1 0x{:04X}: {}", raw, reason);
        }
        Ok((raw, reason))
    }

    pub fn read_error_flag2(&mut self) -> Result<(u16, ErrorFlag2Reason), SensorError> {
        let raw = self.read_register(Command::SwitchToBank0, Command::ReadErrorFlag2)?;
        let reason = decode_error_flag2(raw);
        if reason != ErrorFlag2Reason::NoError {
            log::warn!("ERR_FLAG2 0x{:04X}: {}", raw, reason);
        }
        Ok((raw, reason))
    }

    /// Read the MODE/command register, logging every set field
    pub fn read_command_register(&mut self) -> Result<u16, SensorError> {
        let raw = self.read_register(Command::SwitchToBank0, Command::ReadCommand)?;
        for field in describe_command_register(raw) {
            log::debug!("Command register: {}", field);
        }
        Ok(raw)
    }

    fn clear_status_in_bank1(&mut self) -> Result<(), SensorError> {
        self.transfer(Command::SwitchToBank1)?;
        // Answers SWITCH_TO_BANK_1
        self.transfer(Command::ReadStatusSummary)?;

        let mut status = Ok(());
        for read in 1..=STATUS_CLEAR_READS {
            let response = self.transfer(Command::ReadStatusSummary)?;
            match validate_response(Command::ReadStatusSummary, &response) {
                Ok(value) => {
                    self.readings.store(Channel::StatusSummary, value);
                    status = decode_status_summary(value);
                }
                // Expected while the start-up flags are still latched
                Err(SensorError::StartupInProgress) if read < STATUS_CLEAR_READS => {
                    status = Err(SensorError::StartupInProgress);
                }
                Err(e) => return Err(e),
            }
        }
        status
    }

    /// Clear STATUS by reading it four times in bank 1
    ///
    /// The first response still holds the latched flags. The result is the
    /// decode of the final read.
    pub fn clear_status_summary(&mut self) -> Result<(), SensorError> {
        let result = self.clear_status_in_bank1();
        let result = self.restore_bank0(result);
        match &result {
            Ok(()) => log::debug!("STATUS summary cleared"),
            Err(e) => log::warn!("Clearing STATUS summary: {}", e),
        }
        result
    }

    /// Acceleration in g from the cache, scaled for the current mode
    pub fn acceleration(&self, axis: Axis) -> f64 {
        self.readings.acceleration(axis, self.state.mode)
    }

    pub fn angle(&self, axis: Axis) -> f64 {
        self.readings.angle(axis)
    }

    pub fn temperature(&self, scale: TemperatureScale) -> f64 {
        self.readings.temperature(scale)
    }

    pub fn self_test_status(&self) -> Result<(), SensorError> {
        self.readings.self_test_status(self.state.mode)
    }

    pub fn status_summary_status(&self) -> Result<(), SensorError> {
        self.readings.status_summary_status()
    }

    pub fn check_identity(&self) -> Result<(), SensorError> {
        let result = self.readings.check_identity();
        if let Err(e) = result {
            log::error!("{}", e);
        }
        result
    }

    /// Start-up sequence
    ///
    /// Wake up if powered down, software reset, select the configured mode,
    /// enable angle outputs, wait for the signal path to settle and clear
    /// the start-up flags from STATUS.
    pub fn startup(&mut self) -> Result<(), SensorError> {
        log::info!("Launching start-up sequence");
        if self.state.powered_down {
            self.wake_up()?;
            self.transport.delay_ms(RESET_SETTLE_MS);
        }

        self.software_reset()?;
        self.transport.delay_ms(RESET_SETTLE_MS);

        self.change_mode(self.config.startup_mode)?;
        self.enable_angle_outputs()?;
        self.transport.delay_ms(self.state.mode.settle_ms());

        self.clear_status_summary()
    }

    /// Normal operation sequence
    ///
    /// Every step runs regardless of earlier failures and its outcome is
    /// recorded in the report.
    pub fn normal_operation(&mut self) -> NormalOperationReport {
        let read_all = self.read_all();
        let mut resets = 0;

        let self_test = self.self_test_status();
        if let Err(e) = self_test {
            log::warn!("{}", e);
        }

        let status_summary = self.status_summary_status();
        if let Err(e) = status_summary {
            log::warn!("STATUS summary: {}", e);
            match self.initiate_reset_if_required(&e) {
                Ok(true) => resets += 1,
                Ok(false) => {}
                Err(reset) => log::error!("Software reset failed: {}", reset),
            }
        }

        let identity = self.check_identity();
        let serial_number = self.read_serial_number();
        let current_bank = self.read_current_bank();
        let command_register = self.read_command_register();
        let error_flag1 = self.read_error_flag1();
        let error_flag2 = self.read_error_flag2();

        if let Ok((_, reason)) = error_flag2 {
            if reason.requires_reset() {
                match self.software_reset() {
                    Ok(()) => resets += 1,
                    Err(reset) => log::error!("Software reset failed: {}", reset),
                }
            }
        }

        let clear_status = self.clear_status_summary();

        NormalOperationReport {
            read_all,
            acceleration_g: [
                self.acceleration(Axis::X),
                self.acceleration(Axis::Y),
                self.acceleration(Axis::Z),
            ],
            angle_degrees: [self.angle(Axis::X), self.angle(Axis::Y), self.angle(Axis::Z)],
            temperature_celsius: self.temperature(TemperatureScale::Celsius),
            self_test,
            status_summary,
            identity,
            serial_number,
            current_bank,
            command_register,
            error_flag1,
            error_flag2,
            resets,
            clear_status,
        }
    }

    /// Self-test monitoring sequence
    ///
    /// Each sample refreshes every channel and classifies the cached self-test
    /// output against the current mode threshold. A failed channel read is
    /// logged and does not hide the classification.
    pub fn self_test_monitoring(&mut self) -> Result<(), SensorError> {
        let monitor = SelfTestMonitor::new(self.config.self_test_runs);
        monitor.run(|| {
            if let Err(e) = self.read_all() {
                log::warn!("Self-test cycle read failure: {}", e);
            }
            self.readings.self_test_status(self.state.mode)
        })
    }
}
