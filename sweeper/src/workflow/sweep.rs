//! BER-vs-SNR sweep orchestration.
//!
//! One controller instance drives one sweep: validate parameters, check
//! the tool environment, clear stale outputs, invoke the external tool
//! once per sweep point (strictly sequentially, the tool writes its
//! output files to one well-known location), then aggregate the BER
//! curves. Any run failure aborts the whole sweep: BER curves are only
//! comparable when every point carries the identical trial count, so a
//! partial curve is never exposed.

use crate::workflow::config::{SweepParams, ToolchainConfig};
use crate::workflow::process::{ExternalRunner, RunOutcome};
use crate::workflow::protocol;
use sigmetcore::grid::{snr_grid, SweepPoint};
use sigmetcore::modulation::Modulation;
use sigmetcore::progress::ProgressPublisher;
use sigmetcore::results::{ModalitySeries, ResultStore};
use sigmetcore::signal::read_real_file;
use sigmetcore::telemetry::{LogManager, RunMetrics};
use sigmetcore::AnalysisError;
use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;

// Share of the progress bar reserved for the run loop; cleanup sits below
// it, aggregation above.
const CLEANUP_FRACTION: f64 = 0.05;
const RUN_BAND: f64 = 0.90;
const AGGREGATE_FRACTION: f64 = 0.95;

/// Controller state, advanced strictly forward; `Failed` is reachable
/// from every other state.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepPhase {
    Idle,
    ValidatingParameters,
    CheckingDirectories,
    CleaningPriorOutputs,
    Running(usize),
    Aggregating,
    Done,
    Failed(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SweepError {
    #[error("invalid sweep parameters: {0}")]
    Parameter(String),
    #[error("environment not ready: {0}")]
    Preflight(String),
    #[error("measurement run failed at point {point}: {outcome}")]
    Run { point: usize, outcome: RunOutcome },
    #[error("aggregation failed: {0}")]
    Aggregation(#[from] AnalysisError),
}

pub struct SweepController {
    toolchain: ToolchainConfig,
    params: SweepParams,
    runner: ExternalRunner,
    progress: ProgressPublisher,
    phase: SweepPhase,
    metrics: RunMetrics,
    logger: LogManager,
}

impl SweepController {
    pub fn new(
        toolchain: ToolchainConfig,
        params: SweepParams,
        progress: ProgressPublisher,
    ) -> Self {
        let runner = ExternalRunner::new(Duration::from_millis(toolchain.timeout_ms));
        Self {
            toolchain,
            params,
            runner,
            progress,
            phase: SweepPhase::Idle,
            metrics: RunMetrics::new(),
            logger: LogManager::new("sweep"),
        }
    }

    pub fn phase(&self) -> &SweepPhase {
        &self.phase
    }

    /// `(completed, failed)` external-run counts so far.
    pub fn run_counts(&self) -> (usize, usize) {
        self.metrics.snapshot()
    }

    /// Executes the whole sweep and installs the results into `store` only
    /// on full success; on failure the store is left untouched.
    pub fn run(&mut self, store: &mut ResultStore) -> Result<(), SweepError> {
        match self.execute(store) {
            Ok(()) => {
                self.enter(SweepPhase::Done, "sweep complete".to_string(), 1.0);
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                self.logger.warn(&reason);
                self.phase = SweepPhase::Failed(reason.clone());
                self.progress.publish(reason, 0.0);
                Err(err)
            }
        }
    }

    fn execute(&mut self, store: &mut ResultStore) -> Result<(), SweepError> {
        self.enter(
            SweepPhase::ValidatingParameters,
            "validating sweep parameters".to_string(),
            0.0,
        );
        self.validate()?;

        self.enter(
            SweepPhase::CheckingDirectories,
            "checking tool environment".to_string(),
            0.02,
        );
        self.toolchain.preflight().map_err(SweepError::Preflight)?;

        self.enter(
            SweepPhase::CleaningPriorOutputs,
            "removing stale BER files".to_string(),
            CLEANUP_FRACTION,
        );
        self.clean_prior_outputs();

        let n_points = self.params.n_points as usize;
        let points = snr_grid(self.params.snr_min, self.params.snr_max, n_points);
        for point in &points {
            self.enter(
                SweepPhase::Running(point.index),
                format!(
                    "point {}/{} at SNR {:.2} dB",
                    point.index + 1,
                    n_points,
                    point.snr_variable
                ),
                run_fraction(point.index, n_points),
            );
            self.run_point(point)?;
        }

        self.enter(
            SweepPhase::Aggregating,
            "aggregating BER curves".to_string(),
            AGGREGATE_FRACTION,
        );
        let series = self.aggregate(points.len())?;
        store.set_modality_series(series, points)?;
        Ok(())
    }

    fn enter(&mut self, phase: SweepPhase, message: String, fraction: f64) {
        self.logger.record(&message);
        self.phase = phase;
        self.progress.publish(message, fraction);
    }

    fn validate(&self) -> Result<(), SweepError> {
        if self.params.n_points <= 0 {
            return Err(SweepError::Parameter(format!(
                "n_points must be positive, got {}",
                self.params.n_points
            )));
        }
        if self.params.n_runs <= 0 {
            return Err(SweepError::Parameter(format!(
                "n_runs must be positive, got {}",
                self.params.n_runs
            )));
        }
        if self.params.snr_min >= self.params.snr_max {
            return Err(SweepError::Parameter(format!(
                "snr_min {} must be below snr_max {}",
                self.params.snr_min, self.params.snr_max
            )));
        }
        Ok(())
    }

    /// Stale curves from a previous sweep must not mix with fresh ones; a
    /// file that cannot be deleted is worth a warning but not an abort.
    fn clean_prior_outputs(&self) {
        for modality in Modulation::ALL {
            let path = self.toolchain.ber_file(modality);
            if path.exists() {
                if let Err(err) = fs::remove_file(&path) {
                    self.logger
                        .warn(&format!("cannot delete {}: {}", path.display(), err));
                }
            }
        }
    }

    fn run_point(&self, point: &SweepPoint) -> Result<(), SweepError> {
        let argv = protocol::sweep_point_argv(
            &self.toolchain.executable_arg(),
            &self.params,
            point.snr_variable,
        );
        let outcome = self.runner.run(&argv, &self.toolchain.build_dir);
        if outcome.is_success() {
            self.metrics.record_completed();
            Ok(())
        } else {
            self.metrics.record_failed();
            Err(SweepError::Run {
                point: point.index,
                outcome,
            })
        }
    }

    /// Reads one BER file per modality; each must hold exactly one value
    /// per sweep point. Nothing is padded, truncated, or interpolated.
    fn aggregate(&self, expected_len: usize) -> Result<ModalitySeries, SweepError> {
        let mut curves = BTreeMap::new();
        for modality in Modulation::ALL {
            let series = read_real_file(self.toolchain.ber_file(modality))?;
            curves.insert(modality, series);
        }
        Ok(ModalitySeries::new(curves, expected_len)?)
    }
}

fn run_fraction(index: usize, n_points: usize) -> f64 {
    CLEANUP_FRACTION + RUN_BAND * (index as f64 / n_points as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::testutil::{tool_fixture, ToolFixture};
    use std::path::PathBuf;

    fn three_point_params() -> SweepParams {
        SweepParams {
            snr_min: 0.0,
            snr_max: 6.0,
            n_points: 3,
            n_runs: 10,
            ..Default::default()
        }
    }

    fn controller(fixture: &ToolFixture, params: SweepParams) -> SweepController {
        let (progress, _rx) = ProgressPublisher::channel();
        SweepController::new(fixture.toolchain.clone(), params, progress)
    }

    const APPEND_ALL: &str = "printf '0.10 ' >> ../data/ber_am.txt\n\
                              printf '0.20 ' >> ../data/ber_fm.txt\n\
                              printf '0.30 ' >> ../data/ber_pm.txt";

    #[test]
    fn sweep_collects_equal_length_curves() {
        let fixture = tool_fixture(APPEND_ALL);
        let mut controller = controller(&fixture, three_point_params());
        let mut store = ResultStore::new();
        controller.run(&mut store).unwrap();

        assert_eq!(*controller.phase(), SweepPhase::Done);
        assert_eq!(controller.run_counts(), (3, 0));
        let series = store.series().unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(Modulation::Fm).values(), &[0.2, 0.2, 0.2]);
        let snrs: Vec<f64> = store
            .points()
            .unwrap()
            .iter()
            .map(|p| p.snr_variable)
            .collect();
        assert_eq!(snrs, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn short_curve_fails_aggregation_and_store_stays_empty() {
        // PM gets a single value on the first run only.
        let body = "printf '0.10 ' >> ../data/ber_am.txt\n\
                    printf '0.20 ' >> ../data/ber_fm.txt\n\
                    if [ ! -f ../data/ber_pm.txt ]; then printf '0.30 ' > ../data/ber_pm.txt; fi";
        let fixture = tool_fixture(body);
        let mut controller = controller(&fixture, three_point_params());
        let mut store = ResultStore::new();
        let err = controller.run(&mut store).unwrap_err();

        assert!(matches!(
            err,
            SweepError::Aggregation(AnalysisError::InconsistentLength(_))
        ));
        assert!(matches!(*controller.phase(), SweepPhase::Failed(_)));
        assert!(!store.is_ready());
    }

    #[test]
    fn failing_run_aborts_the_whole_sweep() {
        // Second invocation exits nonzero with a diagnostic.
        let body = "count=$(cat counter 2>/dev/null || echo 0)\n\
                    count=$((count+1))\n\
                    echo $count > counter\n\
                    if [ $count -ge 2 ]; then echo 'generator blew up' >&2; exit 7; fi\n\
                    printf '0.10 ' >> ../data/ber_am.txt\n\
                    printf '0.20 ' >> ../data/ber_fm.txt\n\
                    printf '0.30 ' >> ../data/ber_pm.txt";
        let fixture = tool_fixture(body);
        let mut controller = controller(&fixture, three_point_params());
        let mut store = ResultStore::new();
        let err = controller.run(&mut store).unwrap_err();

        match err {
            SweepError::Run { point, outcome } => {
                assert_eq!(point, 1);
                match outcome {
                    RunOutcome::NonZeroExit { code, stderr } => {
                        assert_eq!(code, 7);
                        assert!(stderr.contains("generator blew up"));
                    }
                    other => panic!("unexpected outcome: {:?}", other),
                }
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(controller.run_counts(), (1, 1));
        assert!(!store.is_ready());
    }

    #[test]
    fn bad_parameters_fail_before_any_spawn() {
        // Toolchain points nowhere; validation must reject first.
        let toolchain = ToolchainConfig {
            build_dir: PathBuf::from("/nonexistent"),
            ..Default::default()
        };
        for params in [
            SweepParams {
                n_points: 0,
                ..Default::default()
            },
            SweepParams {
                n_runs: -5,
                ..Default::default()
            },
            SweepParams {
                snr_min: 10.0,
                snr_max: 10.0,
                ..Default::default()
            },
        ] {
            let (progress, _rx) = ProgressPublisher::channel();
            let mut controller = SweepController::new(toolchain.clone(), params, progress);
            let mut store = ResultStore::new();
            let err = controller.run(&mut store).unwrap_err();
            assert!(matches!(err, SweepError::Parameter(_)), "{}", err);
        }
    }

    #[test]
    fn stale_ber_files_are_removed_before_running() {
        let fixture = tool_fixture(APPEND_ALL);
        // Leftovers from a previous sweep; without cleanup they would make
        // every curve too long.
        for modality in Modulation::ALL {
            fs::write(fixture.toolchain.ber_file(modality), "9.9 9.9 ").unwrap();
        }
        let mut controller = controller(&fixture, three_point_params());
        let mut store = ResultStore::new();
        controller.run(&mut store).unwrap();
        assert_eq!(
            store.series().unwrap().get(Modulation::Am).values(),
            &[0.1, 0.1, 0.1]
        );
    }

    #[test]
    fn progress_reaches_completion_monotonically() {
        let fixture = tool_fixture(APPEND_ALL);
        let (progress, rx) = ProgressPublisher::channel();
        let mut controller =
            SweepController::new(fixture.toolchain.clone(), three_point_params(), progress);
        let mut store = ResultStore::new();
        controller.run(&mut store).unwrap();
        assert_eq!(rx.borrow().fraction, 1.0);
    }
}
