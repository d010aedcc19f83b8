use crate::ws2812::{Rgb, Ws2812Error};

/// Pixel state for a strip of N LEDs - starts all off
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strip<const N: usize> {
    pixels: [Rgb; N],
}

impl<const N: usize> Strip<N> {
    pub const fn new() -> Self {
        Self {
            pixels: [Rgb { r: 0, g: 0, b: 0 }; N],
        }
    }

    pub fn pixels(&self) -> &[Rgb; N] {
        &self.pixels
    }

    pub fn get(&self, pos: usize) -> Option<Rgb> {
        self.pixels.get(pos).copied()
    }

    /// Checks a (possibly negative) position against the strip length
    pub fn check_pos(pos: i64) -> Result<usize, Ws2812Error> {
        usize::try_from(pos)
            .ok()
            .filter(|p| *p < N)
            .ok_or(Ws2812Error::InvalidPosition { pos, len: N })
    }

    pub fn set(&mut self, pos: usize, rgb: Rgb) -> Result<(), Ws2812Error> {
        match self.pixels.get_mut(pos) {
            Some(p) => {
                *p = rgb;
                Ok(())
            }
            None => Err(Ws2812Error::InvalidPosition {
                pos: pos as i64,
                len: N,
            }),
        }
    }
}

impl<const N: usize> Default for Strip<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws2812::colour;

    #[test]
    fn position_bounds() {
        assert!(Strip::<3>::check_pos(-1).is_err());
        assert!(Strip::<3>::check_pos(i64::MIN).is_err());
        assert_eq!(Strip::<3>::check_pos(0), Ok(0));
        assert_eq!(Strip::<3>::check_pos(2), Ok(2));
        assert_eq!(
            Strip::<3>::check_pos(3),
            Err(Ws2812Error::InvalidPosition { pos: 3, len: 3 })
        );
        assert!(Strip::<0>::check_pos(0).is_err());
    }

    #[test]
    fn set_and_get() {
        let mut strip = Strip::<4>::new();
        assert!(strip.pixels().iter().all(|p| *p == colour::OFF));
        strip.set(1, colour::BLUE).unwrap();
        assert_eq!(strip.get(1), Some(colour::BLUE));
        assert_eq!(strip.get(0), Some(colour::OFF));
        assert!(strip.set(4, colour::RED).is_err());
        assert_eq!(strip.get(4), None);
    }
}
