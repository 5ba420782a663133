#![no_std]
#![no_main]

// Required for ESP-IDF bootloader compatibility
// Use explicit parameters to ensure correct efuse block revision values
esp_bootloader_esp_idf::esp_app_desc!(
    env!("CARGO_PKG_VERSION"),  // version
    env!("CARGO_PKG_NAME"),     // project_name
    "00:00:00",                 // build_time
    "2025-01-01",               // build_date
    "0.0.0",                    // idf_ver (not using IDF)
    0x10000,                    // mmu_page_size (64KB)
    0,                          // min_efuse_blk_rev_full (accept all)
    u16::MAX                    // max_efuse_blk_rev_full (accept all)
);

use embassy_executor::Spawner;
use esp_backtrace as _;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode as SpiMode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

use scl3300_spi::config::{spi, DeviceConfig};
use scl3300_spi::tasks::{LedReceiver, LedSender, SensorDriver, LED_CHANNEL};
use scl3300_spi::transport::driver::HalTransport;
use scl3300_spi::{logger, Scl3300};

/// Static executor for embassy
static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

#[esp_hal::main]
fn main() -> ! {
    logger::init(log::LevelFilter::Info);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Turn on LED (active low)
    let led = Output::new(peripherals.GPIO48, Level::Low, OutputConfig::default());

    // Initialise the RTOS scheduler with timer - MUST be done before any async operations
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Configure SPI for the inclinometer
    let sclk = peripherals.GPIO12;
    let miso = peripherals.GPIO13;
    let mosi = peripherals.GPIO11;

    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_hz(spi::FREQUENCY_HZ))
            .with_mode(SpiMode::_0),
    )
    .expect("Failed to configure SPI")
    .with_sck(sclk)
    .with_miso(miso)
    .with_mosi(mosi);

    // Chip select is driven by the transport, idle high
    let csb = Output::new(peripherals.GPIO10, Level::High, OutputConfig::default());

    let transport = HalTransport::new(spi, csb).expect("Failed to drive SCL3300 chip select");
    let sensor = Scl3300::with_config(transport, DeviceConfig::default());

    // Create and run the embassy executor
    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(async_main(spawner, sensor, led));
    })
}

#[embassy_executor::task]
async fn async_main(spawner: Spawner, sensor: SensorDriver, led: Output<'static>) {
    let led_sender = LED_CHANNEL.sender();
    let led_receiver = LED_CHANNEL.receiver();

    spawner.must_spawn(led_task(led, led_receiver));
    spawner.must_spawn(sensor_task(sensor, led_sender));
}

/// Task that handles LED flashing without blocking the sensor
#[embassy_executor::task]
async fn led_task(led: Output<'static>, receiver: LedReceiver) {
    scl3300_spi::tasks::led_task(led, receiver).await;
}

/// Task that owns the inclinometer and runs its sequences
#[embassy_executor::task]
async fn sensor_task(sensor: SensorDriver, led_sender: LedSender) {
    scl3300_spi::tasks::sensor_task(sensor, led_sender).await;
}
