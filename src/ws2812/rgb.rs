use crate::ws2812::Ws2812Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub mod colour {
    use super::Rgb;

    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
    /// Splits a 0xRRGGBB value into channels - bits above 24 are ignored
    #[inline]
    pub const fn from_u32(colour: u32) -> Self {
        Self {
            r: (colour >> 16) as u8,
            g: (colour >> 8) as u8,
            b: colour as u8,
        }
    }
    #[inline]
    pub const fn to_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
    /// Parses a hex colour string (eg. "ff0000")
    ///
    /// An optional `0x` / `#` prefix is accepted. Anything after the hex
    /// digits, an empty string, or a value wider than 24 bits is rejected.
    pub fn from_hex(s: &str) -> Result<Self, Ws2812Error> {
        let invalid = || Ws2812Error::InvalidColour(s.into());
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .or_else(|| s.strip_prefix('#'))
            .unwrap_or(s);
        // from_str_radix also accepts a leading sign which we dont want
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        match u32::from_str_radix(digits, 16) {
            Ok(v) if v <= 0xff_ffff => Ok(Self::from_u32(v)),
            _ => Err(invalid()),
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        colour::OFF
    }
}

impl core::fmt::Display for Rgb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:06x}", self.to_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_primary_colours() {
        assert_eq!(Rgb::from_hex("ff0000").unwrap(), colour::RED);
        assert_eq!(Rgb::from_hex("00ff00").unwrap(), colour::GREEN);
        assert_eq!(Rgb::from_hex("0000ff").unwrap(), colour::BLUE);
        assert_eq!(Rgb::from_hex("FFFFFF").unwrap(), colour::WHITE);
    }

    #[test]
    fn parse_short_and_prefixed() {
        // Short values are zero extended on the left like strtol
        assert_eq!(Rgb::from_hex("ff").unwrap(), Rgb::new(0, 0, 0xff));
        assert_eq!(Rgb::from_hex("0x123456").unwrap(), Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(Rgb::from_hex("#abcdef").unwrap(), Rgb::new(0xab, 0xcd, 0xef));
    }

    #[test]
    fn reject_invalid() {
        for s in ["", "#", "0x", "ff00zz", "ff0000 ", "12g", "-ff", "+ff", "1000000", "red"] {
            assert!(
                matches!(Rgb::from_hex(s), Err(Ws2812Error::InvalidColour(_))),
                "accepted {s:?}"
            );
        }
    }

    #[test]
    fn u32_conversion() {
        let c = Rgb::from_u32(0x00a1b2c3);
        assert_eq!(c, Rgb::new(0xa1, 0xb2, 0xc3));
        assert_eq!(c.to_u32(), 0x00a1b2c3);
        assert_eq!(Rgb::from_u32(0xff00_0001), Rgb::new(0, 0, 1));
        assert_eq!(c.to_string(), "#a1b2c3");
    }
}
