//! Radix-2 butterfly plan shared by every line of a transform pass.

use std::f32::consts::TAU;

use crate::core::{Complex32, Result};
use crate::math::validate_size;

/// Sample type a transform can operate on.
///
/// Packed multi-channel cells are transformed together; each channel is
/// independent.
pub trait FftSample: Copy + Default + Send + Sync {
    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn twiddle(self, w: Complex32) -> Self;
}

impl FftSample for Complex32 {
    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn sub(self, other: Self) -> Self {
        self - other
    }

    #[inline]
    fn twiddle(self, w: Complex32) -> Self {
        self * w
    }
}

impl<const C: usize> FftSample for [Complex32; C]
where
    [Complex32; C]: Default,
{
    #[inline]
    fn add(self, other: Self) -> Self {
        std::array::from_fn(|c| self[c] + other[c])
    }

    #[inline]
    fn sub(self, other: Self) -> Self {
        std::array::from_fn(|c| self[c] - other[c])
    }

    #[inline]
    fn twiddle(self, w: Complex32) -> Self {
        self.map(|v| v * w)
    }
}

/// Twiddle factors and bit-reversal table for an inverse FFT of length `size`.
#[derive(Clone, Debug)]
pub struct ButterflyPlan {
    size: usize,
    stage_count: u32,
    /// `e^{+2πi·m/N}` for `m` in `0..N/2`
    twiddles: Vec<Complex32>,
    bit_reverse: Vec<usize>,
}

impl ButterflyPlan {
    pub fn new(size: usize) -> Result<Self> {
        validate_size(size)?;
        let stage_count = size.trailing_zeros();
        let twiddles = (0..size / 2)
            .map(|m| {
                let angle = TAU * m as f32 / size as f32;
                Complex32::new(angle.cos(), angle.sin())
            })
            .collect();
        let bit_reverse = (0..size)
            .map(|i| i.reverse_bits() >> (usize::BITS - stage_count))
            .collect();
        Ok(Self {
            size,
            stage_count,
            twiddles,
            bit_reverse,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of butterfly stages per line, `log2(N)`.
    pub fn stage_count(&self) -> u32 {
        self.stage_count
    }

    /// Source index feeding output `i` of the reorder step.
    #[inline]
    pub fn reorder_source(&self, i: usize) -> usize {
        self.bit_reverse[i]
    }

    /// Output `i` of butterfly `stage`, reading the previous stage through `line`.
    ///
    /// Stage `s` merges pairs of length-`2^s` sub-transforms. Every output
    /// depends only on the previous stage, never on the current one.
    #[inline]
    pub fn butterfly<T: FftSample>(&self, stage: u32, i: usize, line: impl Fn(usize) -> T) -> T {
        let half = 1usize << stage;
        let span = half << 1;
        let start = i & !(span - 1);
        let j = i & (span - 1);
        let (pos, upper) = if j < half { (j, true) } else { (j - half, false) };

        let w = self.twiddles[pos * (self.size / span)];
        let even = line(start + pos);
        let odd = line(start + pos + half).twiddle(w);
        if upper { even.add(odd) } else { even.sub(odd) }
    }
}
