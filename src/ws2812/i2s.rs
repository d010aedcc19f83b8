use esp_idf_hal::delay::{TickType, BLOCK};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin};
use esp_idf_hal::i2s::config::{
    Config as ChannelConfig, DataBitWidth, SlotMode, StdClkConfig, StdConfig, StdGpioConfig,
    StdSlotConfig,
};
use esp_idf_hal::i2s::{I2sDriver, I2sTx, I2S0};
use esp_idf_sys::{esp_err_t, EspError, ESP_ERR_TIMEOUT};
use std::time::Duration;

use crate::config::Ws2812Config;
use crate::ws2812::{frame_len, I2sWrite, Ws2812Error};

// Only the data line is connected to the strip - BCLK and WS still need
// pins assigned but should be left unconnected
pub struct I2sPins {
    pub dout: AnyOutputPin,
    pub bclk: AnyIOPin,
    pub ws: AnyIOPin,
}

// WS2812 data output on I2S0 (TX only)
pub struct I2sTransmitter<'a> {
    tx: I2sDriver<'a, I2sTx>,
}

impl I2sTransmitter<'_> {
    /// Install the I2S driver with DMA buffers sized to one N LED frame and
    /// enable the TX channel
    pub fn new<const N: usize>(
        i2s: I2S0,
        pins: I2sPins,
        config: &Ws2812Config,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let frames = config.dma_frames(frame_len(N));
        let channel = ChannelConfig::default()
            .dma_buffer_count(config.dma_buffer_count)
            .frames_per_buffer(frames)
            .auto_clear(true);
        let std_config = StdConfig::new(
            channel,
            StdClkConfig::from_sample_rate_hz(config.sample_rate),
            StdSlotConfig::philips_slot_default(DataBitWidth::Bits16, SlotMode::Stereo),
            StdGpioConfig::default(),
        );
        log::info!(
            "I2S: sample_rate={} bit_clock={}Hz dma_buffers={}x{} frames",
            config.sample_rate,
            config.bit_clock_hz(),
            config.dma_buffer_count,
            frames
        );
        let mut tx = I2sDriver::new_std_tx(
            i2s,
            &std_config,
            pins.bclk,
            pins.dout,
            Option::<AnyIOPin>::None,
            pins.ws,
        )?;
        tx.tx_enable()?;
        Ok(Self { tx })
    }
}

fn map_err(e: EspError, expected: usize) -> Ws2812Error {
    if e.code() == ESP_ERR_TIMEOUT as esp_err_t {
        Ws2812Error::Timeout { expected }
    } else {
        Ws2812Error::Peripheral(e.to_string())
    }
}

impl I2sWrite for I2sTransmitter<'_> {
    fn write(&mut self, data: &[u8], timeout: Option<Duration>) -> Result<usize, Ws2812Error> {
        let ticks = match timeout {
            Some(t) => TickType::new_millis(t.as_millis() as u64).ticks(),
            None => BLOCK,
        };
        self.tx
            .write(data, ticks)
            .map_err(|e| map_err(e, data.len()))
    }

    fn clear(&mut self) -> Result<(), Ws2812Error> {
        // Cycling the channel drops queued DMA descriptors; auto_clear makes
        // the line idle low
        self.tx
            .tx_disable()
            .and_then(|_| self.tx.tx_enable())
            .map_err(|e| map_err(e, 0))
    }
}
