use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ws2812::Ws2812Error;

// WS2812 minimum reset (latch) low time
pub const RESET_MIN: Duration = Duration::from_nanos(50_000);

// Acceptable high time for a 0 bit - this is one I2S bit in our encoding
const T0H_MIN: u64 = 200;
const T0H_MAX: u64 = 500;

// One DMA buffer (4092 bytes) - ~10.9ms low time at 3MHz
pub const RESET_BYTES_MAX: usize = 4092;

// Max bytes per DMA buffer (4092) / 4 bytes per 16-bit stereo frame
const MAX_DMA_FRAMES: u32 = 1023;
const MIN_DMA_FRAMES: u32 = 8;

// 16 bit samples, left + right slot
const BITS_PER_FRAME: u64 = 16 * 2;

pub const NVS_NAMESPACE: &str = "WS2812";
pub const NVS_KEY: &str = "ws2812_cfg";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ws2812Config {
    /// I2S sample rate - bit clock is 32x this
    pub sample_rate: u32,
    pub dma_buffer_count: u32,
    /// Length of the all-zero latch write
    pub reset_bytes: usize,
    /// Delay after the latch before the DMA buffer is cleared
    pub settle_ms: u32,
    /// None blocks until the driver accepts the write
    pub write_timeout_ms: Option<u32>,
}

impl Default for Ws2812Config {
    fn default() -> Self {
        Self {
            sample_rate: 93_750, // 3MHz bit clock
            dma_buffer_count: 4,
            reset_bytes: 48,
            settle_ms: 10,
            write_timeout_ms: Some(1000),
        }
    }
}

impl Ws2812Config {
    pub fn bit_clock_hz(&self) -> u64 {
        self.sample_rate as u64 * BITS_PER_FRAME
    }

    /// Duration of a single I2S bit
    pub fn bit_period(&self) -> Duration {
        match self.bit_clock_hz() {
            0 => Duration::ZERO,
            hz => Duration::from_nanos(1_000_000_000 / hz),
        }
    }

    /// Low time produced by the reset write (saturates at Duration::MAX)
    pub fn reset_duration(&self) -> Duration {
        let hz = self.bit_clock_hz();
        if hz == 0 {
            return Duration::ZERO;
        }
        (self.reset_bytes as u64)
            .checked_mul(8 * 1_000_000_000)
            .map_or(Duration::MAX, |bit_ns| Duration::from_nanos(bit_ns / hz))
    }

    /// DMA frames per buffer needed to hold `frame_len` bytes
    pub fn dma_frames(&self, frame_len: usize) -> u32 {
        u32::try_from(frame_len.div_ceil(4))
            .unwrap_or(MAX_DMA_FRAMES)
            .clamp(MIN_DMA_FRAMES, MAX_DMA_FRAMES)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms as u64)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(|ms| Duration::from_millis(ms as u64))
    }

    pub fn validate(&self) -> Result<(), Ws2812Error> {
        if self.sample_rate == 0 {
            return Err(Ws2812Error::InvalidConfig("sample_rate must be non-zero".into()));
        }
        let t0h = self.bit_period().as_nanos() as u64;
        if !(T0H_MIN..=T0H_MAX).contains(&t0h) {
            return Err(Ws2812Error::InvalidConfig(format!(
                "bit period {t0h}ns outside {T0H_MIN}-{T0H_MAX}ns (sample_rate={})",
                self.sample_rate
            )));
        }
        if self.dma_buffer_count < 2 {
            return Err(Ws2812Error::InvalidConfig(
                "dma_buffer_count must be at least 2".into(),
            ));
        }
        if self.reset_bytes > RESET_BYTES_MAX {
            return Err(Ws2812Error::InvalidConfig(format!(
                "reset_bytes {} larger than {RESET_BYTES_MAX}",
                self.reset_bytes
            )));
        }
        let reset = self.reset_duration();
        if reset < RESET_MIN {
            return Err(Ws2812Error::InvalidConfig(format!(
                "reset gap {}us shorter than {}us (reset_bytes={})",
                reset.as_micros(),
                RESET_MIN.as_micros(),
                self.reset_bytes
            )));
        }
        if self.write_timeout_ms == Some(0) {
            return Err(Ws2812Error::InvalidConfig(
                "write_timeout_ms must be non-zero (use null to block)".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json(data: &[u8]) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(target_os = "espidf")]
impl Ws2812Config {
    /// Load config from NVS - falls back to (and stores) the default if the
    /// key is missing or invalid
    pub fn load() -> anyhow::Result<Self> {
        use crate::nvs::NVStore;

        match NVStore::get::<Self>(NVS_KEY) {
            Ok(Some(config)) => match config.validate() {
                Ok(_) => {
                    log::info!("Loaded config: {config:?}");
                    return Ok(config);
                }
                Err(e) => log::warn!("Stored config rejected: {e}"),
            },
            Ok(None) => log::info!("No stored config - using default"),
            Err(e) => log::warn!("Error reading config: {e}"),
        }
        let config = Self::default();
        NVStore::set(NVS_KEY, &config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Ws2812Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.bit_clock_hz(), 3_000_000);
        assert_eq!(config.bit_period(), Duration::from_nanos(333));
        assert_eq!(config.reset_duration(), Duration::from_nanos(128_000));
        assert_eq!(config.settle(), Duration::from_millis(10));
    }

    #[test]
    fn reset_gap_minimum() {
        // 19 bytes = 152 bits = 50.67us at 3MHz
        let ok = Ws2812Config {
            reset_bytes: 19,
            ..Default::default()
        };
        assert_eq!(ok.validate(), Ok(()));
        let short = Ws2812Config {
            reset_bytes: 18,
            ..Default::default()
        };
        assert!(matches!(short.validate(), Err(Ws2812Error::InvalidConfig(_))));
    }

    #[test]
    fn reset_gap_maximum() {
        let max = Ws2812Config {
            reset_bytes: RESET_BYTES_MAX,
            ..Default::default()
        };
        assert_eq!(max.validate(), Ok(()));
        for reset_bytes in [RESET_BYTES_MAX + 1, 1 << 20, usize::MAX] {
            let config = Ws2812Config {
                reset_bytes,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(Ws2812Error::InvalidConfig(_))),
                "accepted {reset_bytes}"
            );
        }
    }

    #[test]
    fn reset_duration_saturates() {
        let config = Ws2812Config {
            reset_bytes: usize::MAX,
            ..Default::default()
        };
        assert_eq!(config.reset_duration(), Duration::MAX);
    }

    #[test]
    fn huge_reset_bytes_from_json() {
        let err = Ws2812Config::from_json(br#"{"reset_bytes": 3000000000}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Ws2812Error>(),
            Some(Ws2812Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn dma_frames_for_frame_len() {
        let config = Ws2812Config::default();
        // 3 LEDs = 36 bytes
        assert_eq!(config.dma_frames(36), 9);
        assert_eq!(config.dma_frames(12), MIN_DMA_FRAMES);
        assert_eq!(config.dma_frames(150 * 12), 450);
        assert_eq!(config.dma_frames(1000 * 12), MAX_DMA_FRAMES);
    }

    #[test]
    fn bad_sample_rate() {
        for sample_rate in [0, 10_000, 500_000] {
            let config = Ws2812Config {
                sample_rate,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(Ws2812Error::InvalidConfig(_))),
                "accepted {sample_rate}"
            );
        }
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = Ws2812Config {
            write_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = Ws2812Config {
            write_timeout_ms: None,
            ..Default::default()
        };
        assert_eq!(config.write_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json() {
        let config = Ws2812Config::from_json(br#"{"reset_bytes": 64, "write_timeout_ms": null}"#)
            .unwrap();
        assert_eq!(config.reset_bytes, 64);
        assert_eq!(config.write_timeout_ms, None);
        assert_eq!(config.sample_rate, 93_750);

        let err = Ws2812Config::from_json(br#"{"reset_bytes": 4}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Ws2812Error>(),
            Some(Ws2812Error::InvalidConfig(_))
        ));
        assert!(Ws2812Config::from_json(b"not json").is_err());
    }
}
