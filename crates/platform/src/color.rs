//! Color sources for solid tile fills.
//!
//! The renderer asks for one [`ColorPair`] per two-tile step. A hardware
//! source splits one 32-bit random word into two 16-bit pixels: the high
//! half colors the left tile, the low half colors the right tile.

use crate::display::RawPixel;

/// Two pixel values consumed by one renderer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorPair {
    /// Color of the left tile.
    pub first: RawPixel,
    /// Color of the right tile.
    pub second: RawPixel,
}

impl ColorPair {
    /// Split a 32-bit word: high half first, low half second.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // each half is masked/shifted into 16 bits
    pub const fn from_word(word: u32) -> Self {
        Self {
            first: (word >> 16) as RawPixel,
            second: (word & 0xFFFF) as RawPixel,
        }
    }
}

/// Supplies color pairs to the renderer.
///
/// No ordering or statistical guarantee beyond "effectively uniform over the
/// 16-bit pixel space" is assumed by callers.
pub trait ColorSource {
    /// Next pair of colors.
    fn next_pair(&mut self) -> ColorPair;
}

impl<T: ColorSource + ?Sized> ColorSource for &mut T {
    fn next_pair(&mut self) -> ColorPair {
        (**self).next_pair()
    }
}

/// Adapts any 32-bit word generator (e.g. a hardware RNG) into a
/// [`ColorSource`].
pub struct WordColorSource<F> {
    next_word: F,
}

impl<F: FnMut() -> u32> WordColorSource<F> {
    /// Wrap a word generator.
    pub fn new(next_word: F) -> Self {
        Self { next_word }
    }
}

impl<F: FnMut() -> u32> ColorSource for WordColorSource<F> {
    fn next_pair(&mut self) -> ColorPair {
        ColorPair::from_word((self.next_word)())
    }
}

/// Xorshift32 software generator.
///
/// Used where no hardware RNG is available (host emulator, tests that need
/// reproducible but well-spread colors). A zero seed is replaced by a fixed
/// non-zero constant since xorshift has an all-zero fixed point.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    const FALLBACK_SEED: u32 = 0x9E37_79B9;

    /// Seeded generator.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Next 32-bit word.
    #[allow(clippy::arithmetic_side_effects)] // constant shifts below the word width
    pub fn next_word(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl ColorSource for Xorshift32 {
    fn next_pair(&mut self) -> ColorPair {
        ColorPair::from_word(self.next_word())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_splits_high_then_low() {
        let pair = ColorPair::from_word(0xF800_07E0);
        assert_eq!(pair.first, 0xF800);
        assert_eq!(pair.second, 0x07E0);
    }

    #[test]
    fn word_source_calls_generator_once_per_pair() {
        let mut calls = 0u32;
        let mut source = WordColorSource::new(|| {
            calls += 1;
            0x1234_5678
        });
        let pair = source.next_pair();
        assert_eq!(pair, ColorPair { first: 0x1234, second: 0x5678 });
        drop(source);
        assert_eq!(calls, 1);
    }

    #[test]
    fn xorshift_zero_seed_is_not_stuck() {
        let mut rng = Xorshift32::new(0);
        let a = rng.next_word();
        let b = rng.next_word();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn xorshift_pairs_vary() {
        let mut rng = Xorshift32::new(1);
        let first = rng.next_pair();
        let second = rng.next_pair();
        assert_ne!(first, second);
    }
}
