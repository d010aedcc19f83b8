#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{IOPin, OutputPin};
#[cfg(target_os = "espidf")]
use esp_idf_hal::peripherals::Peripherals;
#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::EspDefaultNvsPartition;

#[cfg(target_os = "espidf")]
use ws2812_i2s::config::{self, Ws2812Config};
#[cfg(target_os = "espidf")]
use ws2812_i2s::console::Console;
#[cfg(target_os = "espidf")]
use ws2812_i2s::nvs::NVStore;
#[cfg(target_os = "espidf")]
use ws2812_i2s::ws2812::{I2sPins, I2sTransmitter, Transmitter};

const LED_NUMBER: usize = 3;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    esp_idf_hal::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!(
        "Started: {} ({}/{}) [{}]",
        env!("BUILD_TS"),
        env!("BUILD_BRANCH"),
        env!("BUILD_HASH"),
        env!("BUILD_PROFILE")
    );

    let peripherals = Peripherals::take()?;
    let nvs_default_partition = EspDefaultNvsPartition::take()?;

    NVStore::init(nvs_default_partition, config::NVS_NAMESPACE)?;
    let config = Ws2812Config::load()?;

    // Pin map is for the classic ESP32 (xtensa-esp32-espidf) - GPIO25/26 do
    // not exist on the C3/S3 so pick free pins there.
    // WS2812 data on GPIO18 - BCLK/WS are driven but must be left unconnected
    let pins = I2sPins {
        dout: peripherals.pins.gpio18.downgrade_output(),
        bclk: peripherals.pins.gpio26.downgrade(),
        ws: peripherals.pins.gpio25.downgrade(),
    };
    let i2s = I2sTransmitter::new::<LED_NUMBER>(peripherals.i2s0, pins, &config)?;
    let tx = Transmitter::<_, LED_NUMBER>::new(i2s, &config)?;

    let mut console = Console::new(tx);
    // Start with the strip off
    console.refresh()?;

    let stdin = std::io::stdin();
    match console.run(stdin.lock(), std::io::stdout()) {
        Ok(()) => log::info!("Console closed"),
        Err(e) => {
            // A half sent frame leaves the strip undefined - start again
            log::error!("Fatal error: {e} - Restarting");
            esp_idf_hal::delay::FreeRtos::delay_ms(100);
            esp_idf_hal::reset::restart();
        }
    }

    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(1000);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("ws2812 firmware ({LED_NUMBER} LEDs) must be built for an ESP-IDF target")
}
