mod config;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use rcb_core::{BackupSupervisor, Shutdown, signals};
use rcb_exec::DockerRuntime;
use rcb_model::{LaunchSpec, Outcome};
use rcb_observe::init_logger;

use crate::config::{RunnerConfig, SpecSource};

fn main() {
    let status = match try_main() {
        Ok(status) => status,
        Err(e) => {
            error!(error = %format!("{e:#}"), "backup runner failed");
            eprintln!("rcb-runner: {e:#}");
            1
        }
    };
    std::process::exit(status);
}

fn try_main() -> anyhow::Result<i32> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = RunnerConfig::from_parts(&args, |k| std::env::var(k).ok())?;

    // Logger first: the timer reads the local UTC offset, which is only safe single-threaded.
    init_logger(&cfg.logger)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let outcome = runtime.block_on(run(cfg))?;
    Ok(outcome.exit_status())
}

async fn run(cfg: RunnerConfig) -> anyhow::Result<Outcome> {
    let shutdown = Shutdown::new();
    let _listener = signals::install(&shutdown).context("install signal handlers")?;

    let spec = load_spec(&cfg.spec).await?;
    let docker = DockerRuntime::connect().await?;

    let supervisor = BackupSupervisor::new(docker, shutdown, cfg.supervisor);
    let outcome = supervisor.run(&spec).await?;

    match outcome {
        Outcome::Completed { exit_code } => info!(exit_code, "backup process finished"),
        Outcome::Signaled => info!(exit_status = outcome.exit_status(), "backup process terminated by signal"),
    }
    Ok(outcome)
}

async fn load_spec(source: &SpecSource) -> anyhow::Result<LaunchSpec> {
    let raw = match source {
        SpecSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read launch spec {}", path.display()))?,
        SpecSource::Stdin => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("read launch spec from stdin")?;
            buf
        }
    };
    let spec: LaunchSpec = serde_json::from_str(&raw).context("parse launch spec")?;
    spec.validate().context("validate launch spec")?;
    Ok(spec)
}
