//! Pixel to I2S bitstream encoding
//!
//! At a 3MHz bit clock every WS2812 bit is sent as 4 I2S bits - `1000` for a
//! zero (~333ns high) and `1110` for a one (~1us high) - so each output byte
//! carries two WS2812 bits.

use crate::ws2812::{Rgb, BYTES_PER_CHANNEL, PIXEL_SIZE};

/// Symbol for each 2-bit group (00, 01, 10, 11)
pub const SYMBOLS: [u8; 4] = [0x88, 0x8e, 0xe8, 0xee];

/// Encodes one channel value, most significant pair first
#[inline]
pub const fn encode_channel(c: u8) -> [u8; BYTES_PER_CHANNEL] {
    [
        SYMBOLS[((c >> 6) & 0x03) as usize],
        SYMBOLS[((c >> 4) & 0x03) as usize],
        SYMBOLS[((c >> 2) & 0x03) as usize],
        SYMBOLS[(c & 0x03) as usize],
    ]
}

/// Inverse of [`encode_channel`] - returns None if any byte is not a symbol
pub fn decode_channel(symbols: &[u8; BYTES_PER_CHANNEL]) -> Option<u8> {
    symbols.iter().try_fold(0_u8, |acc, s| {
        let bits = SYMBOLS.iter().position(|v| v == s)? as u8;
        Some((acc << 2) | bits)
    })
}

/// Encodes a single pixel in wire order (G, R, B)
#[inline]
pub fn encode_pixel(rgb: &Rgb, out: &mut [u8; PIXEL_SIZE]) {
    for (chunk, c) in out.chunks_exact_mut(BYTES_PER_CHANNEL).zip([rgb.g, rgb.r, rgb.b]) {
        chunk.copy_from_slice(&encode_channel(c));
    }
}

/// Encodes `pixels` into `frame`
///
/// Writes stop at whichever of the two runs out first so this never touches
/// anything beyond `frame`; the transmitter sizes `frame` to exactly
/// `pixels.len() * PIXEL_SIZE`.
pub fn encode(pixels: &[Rgb], frame: &mut [u8]) {
    debug_assert_eq!(frame.len(), pixels.len() * PIXEL_SIZE);
    for (out, rgb) in frame.chunks_exact_mut(PIXEL_SIZE).zip(pixels) {
        // chunks_exact_mut always yields PIXEL_SIZE slices
        if let Ok(out) = <&mut [u8; PIXEL_SIZE]>::try_from(out) {
            encode_pixel(rgb, out);
        }
    }
}

/// Decodes a frame back to pixels (diagnostics)
pub fn decode(frame: &[u8]) -> Option<Vec<Rgb>> {
    if frame.len() % PIXEL_SIZE != 0 {
        return None;
    }
    frame
        .chunks_exact(PIXEL_SIZE)
        .map(|p| {
            let channel = |i: usize| -> Option<u8> {
                let s: &[u8; BYTES_PER_CHANNEL] = p[i..i + BYTES_PER_CHANNEL].try_into().ok()?;
                decode_channel(s)
            };
            Some(Rgb {
                g: channel(0)?,
                r: channel(BYTES_PER_CHANNEL)?,
                b: channel(2 * BYTES_PER_CHANNEL)?,
            })
        })
        .collect()
}
