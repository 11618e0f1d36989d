use num_complex::Complex64;

/// One complex baseband sample; index in a buffer is sample time.
pub type ComplexSample = Complex64;

/// Immutable ordered sequence of complex samples.
///
/// Buffers are produced whole (by the file parser or the correlation
/// engine) and never mutated afterwards; replacement is wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer {
    samples: Vec<ComplexSample>,
}

impl SignalBuffer {
    pub fn new(samples: Vec<ComplexSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[ComplexSample] {
        &self.samples
    }
}

impl From<Vec<ComplexSample>> for SignalBuffer {
    fn from(samples: Vec<ComplexSample>) -> Self {
        Self::new(samples)
    }
}

/// Immutable ordered sequence of real values (correlation magnitude,
/// BER curves).
#[derive(Debug, Clone, PartialEq)]
pub struct RealSeries {
    values: Vec<f64>,
}

impl RealSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for RealSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
