use anyhow::Context;
use clap::Parser;
use serde_json::json;
use sigmetcore::prelude::{Modulation, ProgressPublisher, ResultStore, StatusUpdate};
use std::fs;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::sync::watch;
use workflow::config::AppConfig;
use workflow::demo::{DemoResult, DemoWorkflow};
use workflow::sweep::SweepController;
use workflow::worker::WorkerSlot;

mod workflow;

#[derive(Parser)]
#[command(author, version, about = "BER sweep and correlation-demo driver")]
struct Args {
    /// Run the single-shot correlation demo workflow
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Run the BER-vs-SNR sweep workflow
    #[arg(long, default_value_t = false)]
    sweep: bool,
    /// Load workflow configuration from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override: external tool build directory
    #[arg(long)]
    build_dir: Option<PathBuf>,
    /// Override: output data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override: measurement tool path, resolved against the build dir
    /// when relative
    #[arg(long)]
    exe: Option<PathBuf>,
    /// Override: per-invocation timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    snr_min: Option<f64>,
    #[arg(long)]
    snr_max: Option<f64>,
    #[arg(long)]
    n_points: Option<i64>,
    #[arg(long)]
    n_runs: Option<i64>,
    /// Where the sweep summary JSON is written
    #[arg(long, default_value = "sweep_summary.json")]
    summary: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        AppConfig::load(path)?
    } else {
        AppConfig::default()
    };
    apply_overrides(&mut config, &args);

    if !args.demo && !args.sweep {
        anyhow::bail!("nothing to do: pass --demo and/or --sweep");
    }
    if args.demo {
        run_demo(&config)?;
    }
    if args.sweep {
        run_sweep(&config, &args.summary)?;
    }
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(dir) = &args.build_dir {
        config.toolchain.build_dir = dir.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.toolchain.data_dir = dir.clone();
    }
    if let Some(exe) = &args.exe {
        config.toolchain.executable = exe.clone();
    }
    if let Some(ms) = args.timeout_ms {
        config.toolchain.timeout_ms = ms;
    }
    if let Some(v) = args.snr_min {
        config.sweep.snr_min = v;
    }
    if let Some(v) = args.snr_max {
        config.sweep.snr_max = v;
    }
    if let Some(v) = args.n_points {
        config.sweep.n_points = v;
    }
    if let Some(v) = args.n_runs {
        config.sweep.n_runs = v;
    }
}

/// Logs progress updates until the workflow drops its publisher.
fn watch_progress(mut rx: watch::Receiver<StatusUpdate>) -> anyhow::Result<()> {
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for progress updates")?;
    runtime.block_on(async {
        while rx.changed().await.is_ok() {
            let status = rx.borrow_and_update().clone();
            log::info!("[{:>3.0}%] {}", status.fraction * 100.0, status.message);
        }
    });
    Ok(())
}

fn run_demo(config: &AppConfig) -> anyhow::Result<()> {
    let (progress, rx) = ProgressPublisher::channel();
    let toolchain = config.toolchain.clone();
    let params = config.demo.clone();

    let mut slot: WorkerSlot<Result<DemoResult, workflow::demo::DemoError>> = WorkerSlot::new();
    slot.spawn(move || DemoWorkflow::new(toolchain, params, progress).run())
        .map_err(|busy| anyhow::anyhow!("{}", busy))?;
    watch_progress(rx)?;

    let result = slot
        .join()
        .context("demo worker produced no result")?
        .context("demo workflow failed")?;

    println!(
        "Demo run -> signals {}/{} samples, correlation peak at sample {} (value {:.4})",
        result.signal_a.len(),
        result.signal_b.len(),
        result.peak_index,
        result.peak_value,
    );
    Ok(())
}

fn run_sweep(config: &AppConfig, summary_path: &PathBuf) -> anyhow::Result<()> {
    let (progress, rx) = ProgressPublisher::channel();
    let toolchain = config.toolchain.clone();
    let params = config.sweep.clone();

    let mut slot: WorkerSlot<Result<ResultStore, workflow::sweep::SweepError>> = WorkerSlot::new();
    slot.spawn(move || {
        let mut controller = SweepController::new(toolchain, params, progress);
        let mut store = ResultStore::new();
        controller.run(&mut store).map(|()| store)
    })
    .map_err(|busy| anyhow::anyhow!("{}", busy))?;
    watch_progress(rx)?;

    let store = slot
        .join()
        .context("sweep worker produced no result")?
        .context("sweep workflow failed")?;

    let points = store.points()?;
    let series = store.series()?;

    println!("SNR (dB)    BER AM      BER FM      BER PM");
    for point in points {
        println!(
            "{:>8.2}  {:>10.6}  {:>10.6}  {:>10.6}",
            point.snr_variable,
            series.get(Modulation::Am).values()[point.index],
            series.get(Modulation::Fm).values()[point.index],
            series.get(Modulation::Pm).values()[point.index],
        );
    }

    let summary = json!({
        "points": points,
        "ber": {
            "am": series.get(Modulation::Am).values(),
            "fm": series.get(Modulation::Fm).values(),
            "pm": series.get(Modulation::Pm).values(),
        },
    });
    fs::write(summary_path, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("writing sweep summary {}", summary_path.display()))?;
    println!("Sweep summary written to {}", summary_path.display());
    Ok(())
}
