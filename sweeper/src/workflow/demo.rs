//! Single-shot correlation demo workflow.
//!
//! One external run generates both signals plus the tool's own
//! correlation magnitude; the workflow loads all three files, recomputes
//! the conjugate-reversal correlation with the core engine as a
//! cross-check, and exposes the tool's curve together with its peak.

use crate::workflow::config::{DemoParams, ToolchainConfig};
use crate::workflow::process::{ExternalRunner, RunOutcome};
use crate::workflow::protocol;
use sigmetcore::correlation::Correlator;
use sigmetcore::progress::ProgressPublisher;
use sigmetcore::signal::{read_complex_file, read_real_file, RealSeries, SignalBuffer};
use sigmetcore::telemetry::LogManager;
use sigmetcore::AnalysisError;
use std::time::Duration;

pub const FIRST_SIGNAL_FILE: &str = "first_data.txt";
pub const SECOND_SIGNAL_FILE: &str = "second_data.txt";
pub const CORRELATION_FILE: &str = "correlation.txt";

#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    #[error("environment not ready: {0}")]
    Preflight(String),
    #[error("measurement run failed: {0}")]
    Run(RunOutcome),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Everything the demo exposes to the presentation layer.
#[derive(Debug, Clone)]
pub struct DemoResult {
    pub signal_a: SignalBuffer,
    pub signal_b: SignalBuffer,
    /// Correlation magnitude as written by the external tool.
    pub tool_correlation: RealSeries,
    /// Magnitude of the core engine's own correlation of the two signals.
    pub engine_magnitude: RealSeries,
    /// Peak of the tool's correlation curve (lowest-index tie-break).
    pub peak_index: usize,
    pub peak_value: f64,
}

pub struct DemoWorkflow {
    toolchain: ToolchainConfig,
    params: DemoParams,
    runner: ExternalRunner,
    progress: ProgressPublisher,
    logger: LogManager,
}

impl DemoWorkflow {
    pub fn new(
        toolchain: ToolchainConfig,
        params: DemoParams,
        progress: ProgressPublisher,
    ) -> Self {
        let runner = ExternalRunner::new(Duration::from_millis(toolchain.timeout_ms));
        Self {
            toolchain,
            params,
            runner,
            progress,
            logger: LogManager::new("demo"),
        }
    }

    pub fn run(&mut self) -> Result<DemoResult, DemoError> {
        match self.execute() {
            Ok(result) => {
                self.progress.publish("demo complete", 1.0);
                Ok(result)
            }
            Err(err) => {
                let reason = err.to_string();
                self.logger.warn(&reason);
                self.progress.publish(reason, 0.0);
                Err(err)
            }
        }
    }

    fn execute(&mut self) -> Result<DemoResult, DemoError> {
        self.progress.publish("checking tool environment", 0.0);
        self.toolchain.preflight().map_err(DemoError::Preflight)?;
        self.progress.publish("launching measurement tool", 0.10);

        let argv = protocol::demo_argv(&self.toolchain.executable_arg(), &self.params);
        let outcome = self.runner.run(&argv, &self.toolchain.build_dir);
        if !outcome.is_success() {
            return Err(DemoError::Run(outcome));
        }
        self.progress.publish("loading generated signals", 0.20);

        let signal_a = read_complex_file(self.toolchain.data_dir.join(FIRST_SIGNAL_FILE))?;
        self.progress.publish("loaded first signal", 0.35);
        let signal_b = read_complex_file(self.toolchain.data_dir.join(SECOND_SIGNAL_FILE))?;
        self.progress.publish("loaded second signal", 0.50);
        let tool_correlation = read_real_file(self.toolchain.data_dir.join(CORRELATION_FILE))?;
        self.progress.publish("loaded correlation curve", 0.65);

        let engine_correlation = Correlator::correlate(&signal_a, &signal_b)?;
        let engine_magnitude = Correlator::magnitude(&engine_correlation)?;
        self.progress.publish("correlation cross-check done", 0.85);

        let (peak_index, peak_value) = Correlator::find_peak(&tool_correlation)?;
        let (engine_peak, _) = Correlator::find_peak(&engine_magnitude)?;
        self.logger.record(&format!(
            "tool peak at {} (value {:.4}), engine peak at {}",
            peak_index, peak_value, engine_peak
        ));

        Ok(DemoResult {
            signal_a,
            signal_b,
            tool_correlation,
            engine_magnitude,
            peak_index,
            peak_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::testutil::{tool_fixture, ToolFixture};

    fn workflow(fixture: &ToolFixture) -> DemoWorkflow {
        let (progress, _rx) = ProgressPublisher::channel();
        DemoWorkflow::new(fixture.toolchain.clone(), DemoParams::default(), progress)
    }

    #[test]
    fn demo_end_to_end_finds_the_tool_peak() {
        let body = "printf '(1,0)(0,1)' > ../data/first_data.txt\n\
                    printf '(1,0)(0,1)' > ../data/second_data.txt\n\
                    printf '1.0 2.0 1.0' > ../data/correlation.txt";
        let fixture = tool_fixture(body);
        let result = workflow(&fixture).run().unwrap();

        assert_eq!(result.peak_index, 1);
        assert_eq!(result.peak_value, 2.0);
        assert_eq!(result.signal_a.len(), 2);
        assert_eq!(result.signal_b.len(), 2);
        assert_eq!(result.engine_magnitude.len(), result.signal_a.len());
    }

    #[test]
    fn failing_tool_surfaces_its_outcome() {
        let fixture = tool_fixture("echo 'no carrier' >&2; exit 2");
        let err = workflow(&fixture).run().unwrap_err();
        match err {
            DemoError::Run(RunOutcome::NonZeroExit { code, stderr }) => {
                assert_eq!(code, 2);
                assert!(stderr.contains("no carrier"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_output_file_is_an_analysis_error() {
        // Tool exits cleanly but writes only one of the three files.
        let fixture = tool_fixture("printf '(1,0)' > ../data/first_data.txt");
        let err = workflow(&fixture).run().unwrap_err();
        assert!(matches!(
            err,
            DemoError::Analysis(AnalysisError::FileMissing(_))
        ));
    }

    #[test]
    fn malformed_signal_file_fails_loudly() {
        let body = "printf '(1,0)(zz,1)' > ../data/first_data.txt\n\
                    printf '(1,0)' > ../data/second_data.txt\n\
                    printf '1.0' > ../data/correlation.txt";
        let fixture = tool_fixture(body);
        let err = workflow(&fixture).run().unwrap_err();
        assert!(matches!(
            err,
            DemoError::Analysis(AnalysisError::FileParse { .. })
        ));
    }
}
