mod encoder;
mod error;
mod rgb;
mod strip;
mod transmitter;

#[cfg(target_os = "espidf")]
mod i2s;

pub use encoder::{decode, decode_channel, encode, encode_channel, encode_pixel, SYMBOLS};
pub use error::Ws2812Error;
pub use rgb::{colour, Rgb};
pub use strip::Strip;
pub use transmitter::{I2sWrite, Transmitter};

#[cfg(target_os = "espidf")]
pub use i2s::{I2sPins, I2sTransmitter};

// 4 symbol bytes per 8 bit channel
pub const BYTES_PER_CHANNEL: usize = 4;
// G, R, B
pub const PIXEL_SIZE: usize = 3 * BYTES_PER_CHANNEL;

/// Encoded frame length for a strip of `leds` LEDs
pub const fn frame_len(leds: usize) -> usize {
    leds * PIXEL_SIZE
}
