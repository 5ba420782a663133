//! LED task for non-blocking status signalling
//!
//! The sensor task reports each completed sequence without waiting for the
//! flash to finish.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use esp_hal::gpio::Output;

use crate::config::firmware::{LED_FAULT_FLASH_MS, LED_FLASH_MS};

/// What a flash reports
#[derive(Clone, Copy)]
pub enum LedSignal {
    /// Sequence completed cleanly
    Cycle,
    /// Sequence reported at least one failure
    Fault,
}

/// Type alias for the LED signal channel sender
pub type LedSender = Sender<'static, CriticalSectionRawMutex, LedSignal, 4>;

/// Type alias for the LED signal channel receiver
pub type LedReceiver = Receiver<'static, CriticalSectionRawMutex, LedSignal, 4>;

/// Channel for LED signals
pub static LED_CHANNEL: embassy_sync::channel::Channel<CriticalSectionRawMutex, LedSignal, 4> =
    embassy_sync::channel::Channel::new();

/// Task that handles LED flashing without blocking the sensor task
pub async fn led_task(mut led: Output<'static>, receiver: LedReceiver) {
    loop {
        let duration_ms = match receiver.receive().await {
            LedSignal::Cycle => LED_FLASH_MS,
            LedSignal::Fault => LED_FAULT_FLASH_MS,
        };

        // Active low
        led.set_high();
        embassy_time::Timer::after(embassy_time::Duration::from_millis(duration_ms)).await;
        led.set_low();
    }
}
