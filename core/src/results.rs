//! Per-modality BER results and the result store.

use crate::grid::SweepPoint;
use crate::modulation::Modulation;
use crate::signal::RealSeries;
use crate::{AnalysisError, AnalysisResult};
use std::collections::BTreeMap;

/// BER series for every modulation kind, all of identical length.
///
/// Construction validates the whole set at once; a partially filled or
/// length-mismatched map never becomes a `ModalitySeries`. Missing
/// modalities are an error, never zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalitySeries {
    len: usize,
    am: RealSeries,
    fm: RealSeries,
    pm: RealSeries,
}

impl ModalitySeries {
    pub fn new(
        mut series: BTreeMap<Modulation, RealSeries>,
        expected_len: usize,
    ) -> AnalysisResult<Self> {
        let mut take = |modality: Modulation| -> AnalysisResult<RealSeries> {
            let found = series.remove(&modality).ok_or_else(|| {
                AnalysisError::InconsistentLength(format!("missing {} series", modality))
            })?;
            if found.len() != expected_len {
                return Err(AnalysisError::InconsistentLength(format!(
                    "{} series holds {} values, expected {}",
                    modality,
                    found.len(),
                    expected_len
                )));
            }
            Ok(found)
        };

        Ok(Self {
            len: expected_len,
            am: take(Modulation::Am)?,
            fm: take(Modulation::Fm)?,
            pm: take(Modulation::Pm)?,
        })
    }

    pub fn get(&self, modality: Modulation) -> &RealSeries {
        match modality {
            Modulation::Am => &self.am,
            Modulation::Fm => &self.fm,
            Modulation::Pm => &self.pm,
        }
    }

    /// Shared length of every contained series.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Slot holding the most recently completed workflow's results.
///
/// Reading before a successful `set_modality_series` is a caller
/// programming error surfaced as `NotReady`. A set replaces the whole
/// value; there is no partial update, and a workflow writes at most
/// once.
#[derive(Debug, Default)]
pub struct ResultStore {
    inner: Option<StoredResults>,
}

#[derive(Debug)]
struct StoredResults {
    series: ModalitySeries,
    points: Vec<SweepPoint>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a completed sweep's results. The series length must match
    /// the sweep-point count so the presentation layer can zip them 1:1.
    pub fn set_modality_series(
        &mut self,
        series: ModalitySeries,
        points: Vec<SweepPoint>,
    ) -> AnalysisResult<()> {
        if series.len() != points.len() {
            return Err(AnalysisError::InconsistentLength(format!(
                "series length {} does not match {} sweep points",
                series.len(),
                points.len()
            )));
        }
        self.inner = Some(StoredResults { series, points });
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_some()
    }

    pub fn series(&self) -> AnalysisResult<&ModalitySeries> {
        self.inner
            .as_ref()
            .map(|stored| &stored.series)
            .ok_or_else(|| AnalysisError::NotReady("no sweep results stored".to_string()))
    }

    pub fn points(&self) -> AnalysisResult<&[SweepPoint]> {
        self.inner
            .as_ref()
            .map(|stored| stored.points.as_slice())
            .ok_or_else(|| AnalysisError::NotReady("no sweep results stored".to_string()))
    }
}
