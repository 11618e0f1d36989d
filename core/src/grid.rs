use serde::{Deserialize, Serialize};

/// One parameter set at which the external tool is invoked during a sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepPoint {
    pub index: usize,
    pub snr_variable: f64,
}

/// Even subdivision of `[snr_min, snr_max)` into `n_points` sweep points.
///
/// The interval is half-open: point i sits at
/// `snr_min + i·(snr_max − snr_min)/n_points`, so `snr_max` itself is never
/// sampled. That boundary matches the measurement protocol and is pinned by
/// test. Callers validate `snr_min < snr_max` and `n_points > 0` before
/// building the grid.
pub fn snr_grid(snr_min: f64, snr_max: f64, n_points: usize) -> Vec<SweepPoint> {
    let step = (snr_max - snr_min) / n_points as f64;
    (0..n_points)
        .map(|index| SweepPoint {
            index,
            snr_variable: snr_min + index as f64 * step,
        })
        .collect()
}
