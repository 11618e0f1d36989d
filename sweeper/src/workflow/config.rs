use anyhow::Context;
use serde::{Deserialize, Serialize};
use sigmetcore::modulation::Modulation;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the external measurement tool and its data exchange
/// directories.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Working directory the tool is launched from.
    pub build_dir: PathBuf,
    /// Directory the tool writes its output files into.
    pub data_dir: PathBuf,
    /// Tool path, resolved against `build_dir` when relative.
    pub executable: PathBuf,
    /// Hard wall-clock deadline per invocation.
    pub timeout_ms: u64,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            data_dir: PathBuf::from("data"),
            executable: PathBuf::from("./data_processing"),
            timeout_ms: 30_000,
        }
    }
}

impl ToolchainConfig {
    /// First argv element handed to the spawner. Relative paths stay
    /// relative; the child runs with `build_dir` as its working directory.
    pub fn executable_arg(&self) -> String {
        self.executable.display().to_string()
    }

    fn executable_path(&self) -> PathBuf {
        if self.executable.is_absolute() {
            self.executable.clone()
        } else {
            self.build_dir.join(&self.executable)
        }
    }

    /// Checks the tool environment before any process is spawned: the
    /// build directory and the executable must exist, and the data
    /// directory is created if absent.
    pub fn preflight(&self) -> Result<(), String> {
        if !self.build_dir.is_dir() {
            return Err(format!(
                "build directory {} does not exist",
                self.build_dir.display()
            ));
        }
        let exe = self.executable_path();
        if !exe.exists() {
            return Err(format!("measurement tool {} not found", exe.display()));
        }
        fs::create_dir_all(&self.data_dir).map_err(|err| {
            format!(
                "cannot create data directory {}: {}",
                self.data_dir.display(),
                err
            )
        })
    }

    pub fn ber_file(&self, modality: Modulation) -> PathBuf {
        self.data_dir.join(modality.ber_file_name())
    }
}

/// Parameters for the single-shot correlation demo.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoParams {
    /// Sample frequency, Hz.
    pub fd: f64,
    /// Carrier frequency, Hz.
    pub f: f64,
    /// Number of information bits.
    pub n: u32,
    /// Information velocity, bits/s.
    pub vel: f64,
    /// Time offset between the two signals, samples.
    pub dt: f64,
    pub snr1: f64,
    pub snr2: f64,
    pub modulation: Modulation,
    /// Sought-signal size as a percentage of the full signal.
    pub sig_size: f64,
}

impl Default for DemoParams {
    fn default() -> Self {
        Self {
            fd: 20.0,
            f: 10.0,
            n: 100,
            vel: 10.0,
            dt: 10.0,
            snr1: 10.0,
            snr2: 10.0,
            modulation: Modulation::Am,
            sig_size: 30.0,
        }
    }
}

/// Parameters for the BER-vs-SNR sweep.
///
/// `n_points` and `n_runs` are signed so out-of-range CLI/YAML input is
/// representable and rejected by validation rather than by the parser.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepParams {
    pub fd: f64,
    pub f: f64,
    pub n: u32,
    pub vel: f64,
    /// SNR of the static reference signal, dB.
    pub snr_static: f64,
    pub snr_min: f64,
    pub snr_max: f64,
    pub n_points: i64,
    /// Trials per sweep point inside the external tool.
    pub n_runs: i64,
    pub sig_size: f64,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            fd: 20.0,
            f: 10.0,
            n: 100,
            vel: 10.0,
            snr_static: 10.0,
            snr_min: 0.0,
            snr_max: 20.0,
            n_points: 10,
            n_runs: 100,
            sig_size: 30.0,
        }
    }
}

/// Whole application configuration, YAML-loadable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub toolchain: ToolchainConfig,
    pub demo: DemoParams,
    pub sweep: SweepParams,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading config {}", path_ref.display()))?;
        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path_ref.display()))?;
        Ok(config)
    }
}
