//! Sensor polling task
//!
//! Runs the startup sequence until it succeeds, then alternates the normal
//! operation and self-test monitoring sequences with a fixed pause.

use embassy_time::{Duration, Timer};
use esp_hal::gpio::Output;
use esp_hal::spi::master::Spi;
use esp_hal::Blocking;

use crate::config::firmware::SEQUENCE_PAUSE_MS;
use crate::device::{NormalOperationReport, Scl3300};
use crate::tasks::led::{LedSender, LedSignal};
use crate::transport::driver::HalTransport;

/// Driver type wired on the ESP32-S3 board
pub type SensorDriver = Scl3300<HalTransport<Spi<'static, Blocking>, Output<'static>>>;

fn is_clean(report: &NormalOperationReport) -> bool {
    report.read_all.is_ok()
        && report.self_test.is_ok()
        && report.status_summary.is_ok()
        && report.identity.is_ok()
        && report.serial_number.is_ok()
        && report.current_bank.is_ok()
        && report.command_register.is_ok()
        && report.error_flag1.is_ok()
        && report.error_flag2.is_ok()
        && report.clear_status.is_ok()
}

fn log_report(report: &NormalOperationReport) {
    let [x, y, z] = report.acceleration_g;
    log::info!("Acceleration X={:.4} g Y={:.4} g Z={:.4} g", x, y, z);
    let [x, y, z] = report.angle_degrees;
    log::info!("Angle X={:.2} deg Y={:.2} deg Z={:.2} deg", x, y, z);
    log::info!("Temperature {:.2} C", report.temperature_celsius);

    if let Ok(serial) = &report.serial_number {
        log::info!("Serial number {}", serial);
    }
    if let Ok((raw, reason)) = report.error_flag1 {
        log::info!("ERR_FLAG1 0x{:04X}: {}", raw, reason);
    }
    if let Ok((raw, reason)) = report.error_flag2 {
        log::info!("ERR_FLAG2 0x{:04X}: {}", raw, reason);
    }
    if report.resets > 0 {
        log::warn!("{} software reset(s) issued", report.resets);
    }
}

/// Task that owns the sensor and runs its sequences forever
pub async fn sensor_task(mut sensor: SensorDriver, led: LedSender) {
    while let Err(e) = sensor.startup() {
        log::error!("Start-up sequence failed: {}", e);
        let _ = led.try_send(LedSignal::Fault);
        Timer::after(Duration::from_millis(SEQUENCE_PAUSE_MS)).await;
    }
    log::info!("Start-up sequence complete");

    loop {
        let report = sensor.normal_operation();
        log_report(&report);
        let signal = if is_clean(&report) {
            LedSignal::Cycle
        } else {
            LedSignal::Fault
        };
        let _ = led.try_send(signal);
        Timer::after(Duration::from_millis(SEQUENCE_PAUSE_MS)).await;

        let signal = match sensor.self_test_monitoring() {
            Ok(()) => {
                log::info!("Self-test output within threshold");
                LedSignal::Cycle
            }
            Err(_) => LedSignal::Fault,
        };
        let _ = led.try_send(signal);
        Timer::after(Duration::from_millis(SEQUENCE_PAUSE_MS)).await;
    }
}
