//! Cached sensor channels and unit conversions
//!
//! The cache holds the last successfully validated raw value of each monitored
//! register. It is owned by the driver and only written by its read sequences.

use crate::commands::Command;
use crate::config::device::WHO_AM_I;
use crate::device::state::OperationMode;
use crate::status::{decode_status_summary, SensorError};

/// Monitored registers, in read order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    AccelerationX,
    AccelerationY,
    AccelerationZ,
    SelfTestOutput,
    Temperature,
    AngleX,
    AngleY,
    AngleZ,
    StatusSummary,
    WhoAmI,
}

/// Register read by one channel and the bank frame issued ahead of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub channel: Channel,
    /// SELBANK frame sent before the read
    pub bank_command: Command,
    pub read_command: Command,
    pub label: &'static str,
}

impl ChannelDescriptor {
    const fn new(channel: Channel, bank_command: Command, read_command: Command) -> Self {
        Self {
            channel,
            bank_command,
            read_command,
            label: read_command.name(),
        }
    }
}

/// Every monitored channel, read in this order by a full refresh
pub const CHANNELS: [ChannelDescriptor; 10] = [
    ChannelDescriptor::new(Channel::AccelerationX, Command::SwitchToBank1, Command::ReadAccelerationX),
    ChannelDescriptor::new(Channel::AccelerationY, Command::SwitchToBank1, Command::ReadAccelerationY),
    ChannelDescriptor::new(Channel::AccelerationZ, Command::SwitchToBank1, Command::ReadAccelerationZ),
    ChannelDescriptor::new(Channel::SelfTestOutput, Command::SwitchToBank1, Command::ReadSelfTestOutput),
    ChannelDescriptor::new(Channel::Temperature, Command::SwitchToBank1, Command::ReadTemperature),
    ChannelDescriptor::new(Channel::AngleX, Command::SwitchToBank0, Command::ReadAngleX),
    ChannelDescriptor::new(Channel::AngleY, Command::SwitchToBank0, Command::ReadAngleY),
    ChannelDescriptor::new(Channel::AngleZ, Command::SwitchToBank0, Command::ReadAngleZ),
    ChannelDescriptor::new(Channel::StatusSummary, Command::SwitchToBank1, Command::ReadStatusSummary),
    ChannelDescriptor::new(Channel::WhoAmI, Command::SwitchToBank0, Command::ReadWhoAmI),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

/// Raw register values from the last successful reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readings {
    pub acceleration: [i16; 3],
    pub self_test_output: i16,
    pub temperature: i16,
    pub angle: [i16; 3],
    pub status_summary: u16,
    pub who_am_i: u16,
}

impl Readings {
    pub const fn new() -> Self {
        Self {
            acceleration: [0; 3],
            self_test_output: 0,
            temperature: 0,
            angle: [0; 3],
            status_summary: 0,
            who_am_i: 0,
        }
    }

    /// Store a validated DATA field, signed channels are reinterpreted
    pub fn store(&mut self, channel: Channel, data: u16) {
        let signed = data as i16;
        match channel {
            Channel::AccelerationX => self.acceleration[0] = signed,
            Channel::AccelerationY => self.acceleration[1] = signed,
            Channel::AccelerationZ => self.acceleration[2] = signed,
            Channel::SelfTestOutput => self.self_test_output = signed,
            Channel::Temperature => self.temperature = signed,
            Channel::AngleX => self.angle[0] = signed,
            Channel::AngleY => self.angle[1] = signed,
            Channel::AngleZ => self.angle[2] = signed,
            Channel::StatusSummary => self.status_summary = data,
            Channel::WhoAmI => self.who_am_i = data,
        }
    }

    /// Acceleration in g for the given operation mode
    pub fn acceleration(&self, axis: Axis, mode: OperationMode) -> f64 {
        acceleration_g(self.acceleration[axis.index()], mode)
    }

    /// Angle in degrees, in [0, 360)
    pub fn angle(&self, axis: Axis) -> f64 {
        angle_degrees(self.angle[axis.index()])
    }

    pub fn temperature(&self, scale: TemperatureScale) -> f64 {
        temperature(self.temperature, scale)
    }

    /// Compare the self-test output against the mode threshold
    pub fn self_test_status(&self, mode: OperationMode) -> Result<(), SensorError> {
        check_self_test_output(self.self_test_output, mode)
    }

    /// Highest-priority reason in the cached STATUS summary
    pub fn status_summary_status(&self) -> Result<(), SensorError> {
        decode_status_summary(self.status_summary)
    }

    /// Check the cached WHOAMI value against the component identifier
    pub fn check_identity(&self) -> Result<(), SensorError> {
        let received = (self.who_am_i & 0x00FF) as u8;
        if received == WHO_AM_I {
            Ok(())
        } else {
            Err(SensorError::IdentityMismatch { received })
        }
    }
}

pub fn acceleration_g(raw: i16, mode: OperationMode) -> f64 {
    raw as f64 / mode.sensitivity()
}

pub fn angle_degrees(raw: i16) -> f64 {
    let degrees = raw as f64 / 16384.0 * 90.0;
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

pub fn temperature(raw: i16, scale: TemperatureScale) -> f64 {
    let celsius = -273.0 + raw as f64 / 18.9;
    match scale {
        TemperatureScale::Celsius => celsius,
        TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        TemperatureScale::Kelvin => celsius + 273.0,
    }
}

pub fn check_self_test_output(raw: i16, mode: OperationMode) -> Result<(), SensorError> {
    let threshold = mode.sto_threshold();
    if raw < -threshold || raw > threshold {
        Err(SensorError::StoThresholdExceeded)
    } else {
        Ok(())
    }
}
