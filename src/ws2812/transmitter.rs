use std::time::Duration;

use crate::config::Ws2812Config;
use crate::ws2812::{encoder, frame_len, Rgb, Ws2812Error};

/// Blocking byte sink feeding the LED data line
pub trait I2sWrite {
    /// Queue `data` for transmission, blocking until it has been accepted or
    /// `timeout` expires (None waits forever). Returns bytes accepted.
    fn write(&mut self, data: &[u8], timeout: Option<Duration>) -> Result<usize, Ws2812Error>;
    /// Drop anything still held in the peripheral's DMA buffers
    fn clear(&mut self) -> Result<(), Ws2812Error>;
}

impl<T: I2sWrite + ?Sized> I2sWrite for &mut T {
    fn write(&mut self, data: &[u8], timeout: Option<Duration>) -> Result<usize, Ws2812Error> {
        (**self).write(data, timeout)
    }
    fn clear(&mut self) -> Result<(), Ws2812Error> {
        (**self).clear()
    }
}

// Drives a full refresh of an N LED strip:
//   encode -> write frame -> write reset gap -> settle -> clear
pub struct Transmitter<W, const N: usize> {
    tx: W,
    frame: Box<[u8]>,
    reset: Box<[u8]>,
    settle: Duration,
    timeout: Option<Duration>,
}

impl<W: I2sWrite, const N: usize> Transmitter<W, N> {
    /// Frame length in bytes
    pub const FRAME_LEN: usize = frame_len(N);

    pub fn new(tx: W, config: &Ws2812Config) -> Result<Self, Ws2812Error> {
        if N == 0 {
            return Err(Ws2812Error::InvalidConfig("LED count must be non-zero".into()));
        }
        config.validate()?;
        log::info!(
            "WS2812: {} LEDs / frame={} bytes / reset={} bytes ({}us) / settle={}ms",
            N,
            Self::FRAME_LEN,
            config.reset_bytes,
            config.reset_duration().as_micros(),
            config.settle_ms
        );
        Ok(Self {
            tx,
            frame: vec![0_u8; Self::FRAME_LEN].into_boxed_slice(),
            reset: vec![0_u8; config.reset_bytes].into_boxed_slice(),
            settle: config.settle(),
            timeout: config.write_timeout(),
        })
    }

    /// Send `pixels` to the strip
    ///
    /// Any write fault aborts the cycle without sending the reset gap - the
    /// strip is left in an undefined state until the next full update.
    pub fn update(&mut self, pixels: &[Rgb; N]) -> Result<(), Ws2812Error> {
        encoder::encode(pixels, &mut self.frame);

        Self::send(&mut self.tx, &self.frame, self.timeout)?;
        Self::send(&mut self.tx, &self.reset, self.timeout)?;

        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        self.tx.clear()
    }

    fn send(tx: &mut W, data: &[u8], timeout: Option<Duration>) -> Result<(), Ws2812Error> {
        let written = tx.write(data, timeout).inspect_err(|e| {
            log::error!("WS2812 write failed: {e}");
        })?;
        if written != data.len() {
            let e = Ws2812Error::Transmission {
                expected: data.len(),
                written,
            };
            log::error!("{e}");
            return Err(e);
        }
        Ok(())
    }

    /// Last encoded frame
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn reset_len(&self) -> usize {
        self.reset.len()
    }

    pub fn writer(&self) -> &W {
        &self.tx
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.tx
    }

    pub fn into_inner(self) -> W {
        self.tx
    }
}
