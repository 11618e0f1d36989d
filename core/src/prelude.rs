//! Convenience re-exports for downstream crates.

pub use crate::correlation::Correlator;
pub use crate::grid::{snr_grid, SweepPoint};
pub use crate::modulation::Modulation;
pub use crate::progress::{ProgressPublisher, StatusUpdate};
pub use crate::results::{ModalitySeries, ResultStore};
pub use crate::signal::{RealSeries, SignalBuffer};
pub use crate::{AnalysisError, AnalysisResult};
