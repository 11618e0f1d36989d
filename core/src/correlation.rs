//! Direct complex convolution / correlation engine.
//!
//! Everything here is exact O(len(a)·len(b)) computation on full buffers;
//! there is no FFT fast path and no normalization. Callers that need an
//! energy-normalized metric divide by the signal energies themselves.

use crate::signal::{ComplexSample, RealSeries, SignalBuffer};
use crate::{AnalysisError, AnalysisResult};
use std::f64::consts::PI;

/// Stateless correlation helper.
pub struct Correlator;

impl Correlator {
    /// Full discrete convolution `c[n] = Σ a[i]·b[n−i]`, windowed back to
    /// `len(a)` samples centered at offset `⌊(full − len(a)) / 2⌋` so the
    /// output aligns sample-for-sample with the first operand.
    pub fn convolve(a: &SignalBuffer, b: &SignalBuffer) -> AnalysisResult<SignalBuffer> {
        Self::require_samples(a, "first convolution operand")?;
        Self::require_samples(b, "second convolution operand")?;

        let xa = a.samples();
        let xb = b.samples();
        let full_len = xa.len() + xb.len() - 1;
        let mut full = vec![ComplexSample::new(0.0, 0.0); full_len];

        for (i, &ai) in xa.iter().enumerate() {
            for (j, &bj) in xb.iter().enumerate() {
                full[i + j] += ai * bj;
            }
        }

        let offset = (full_len - xa.len()) / 2;
        Ok(SignalBuffer::new(full[offset..offset + xa.len()].to_vec()))
    }

    /// Conjugated cross-correlation: convolution with the time-reversed,
    /// conjugated second signal. Unequal operand lengths are legal.
    pub fn correlate(a: &SignalBuffer, b: &SignalBuffer) -> AnalysisResult<SignalBuffer> {
        Self::require_samples(b, "second correlation operand")?;
        let reversed = Self::conjugate_reverse(b);
        Self::convolve(a, &reversed)
    }

    /// Negates imaginary parts and reverses sample order.
    pub fn conjugate_reverse(s: &SignalBuffer) -> SignalBuffer {
        let samples: Vec<ComplexSample> = s.samples().iter().rev().map(|c| c.conj()).collect();
        SignalBuffer::new(samples)
    }

    /// Elementwise modulus.
    pub fn magnitude(s: &SignalBuffer) -> AnalysisResult<RealSeries> {
        Self::require_samples(s, "magnitude input")?;
        Ok(RealSeries::new(
            s.samples().iter().map(|c| c.norm()).collect(),
        ))
    }

    /// Elementwise argument in (−π, π].
    pub fn phase(s: &SignalBuffer) -> AnalysisResult<RealSeries> {
        Self::require_samples(s, "phase input")?;
        let values = s
            .samples()
            .iter()
            .map(|c| {
                let arg = c.im.atan2(c.re);
                // atan2 lands on -π for negative-real inputs with a negative
                // zero imaginary part; fold that endpoint onto +π.
                if arg == -PI {
                    PI
                } else {
                    arg
                }
            })
            .collect();
        Ok(RealSeries::new(values))
    }

    /// First index attaining the maximum, with its value. Ties resolve to
    /// the lowest index; downstream time-offset estimation relies on that
    /// being stable.
    pub fn find_peak(s: &RealSeries) -> AnalysisResult<(usize, f64)> {
        let values = s.values();
        if values.is_empty() {
            return Err(AnalysisError::EmptyInput("peak search input".to_string()));
        }
        let mut peak_index = 0;
        let mut peak_value = values[0];
        for (index, &value) in values.iter().enumerate().skip(1) {
            if value > peak_value {
                peak_index = index;
                peak_value = value;
            }
        }
        Ok((peak_index, peak_value))
    }

    fn require_samples(s: &SignalBuffer, what: &str) -> AnalysisResult<()> {
        if s.is_empty() {
            return Err(AnalysisError::EmptyInput(what.to_string()));
        }
        Ok(())
    }
}
