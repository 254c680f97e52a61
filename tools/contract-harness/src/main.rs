//! Contract harness — runs HTTP golden assertions against live services.
//!
//! # Usage
//!
//! ```bash
//! # Run all fixtures against an already-running service
//! cargo run -p contract-harness -- --base-url http://localhost:3210
//!
//! # Start disposable containers and boot the api service in-process
//! cargo run -p contract-harness --features api -- --docker
//!
//! # Run only api fixtures
//! cargo run -p contract-harness -- --base-url http://localhost:3210 --service api
//! ```
//!
//! Exits 0 when all assertions pass, exits 1 when any fail.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use contract_harness::config::ContractHarnessConfig;
use contract_harness::docker::DockerOrchestrator;
use contract_harness::fixture::{self, Fixture};
use contract_harness::reporter::Reporter;
use contract_harness::runner::Runner;
use contract_harness::services::InfraUrls;

#[derive(Parser)]
#[command(about = "Run HTTP contract assertions against live services")]
struct Args {
    /// Base URL of an already-running service (e.g. http://localhost:3210)
    #[arg(long, conflicts_with = "docker")]
    base_url: Option<String>,

    /// Start disposable containers and boot services in-process
    /// (requires per-service cargo features, e.g. --features api)
    #[arg(long)]
    docker: bool,

    /// Run only fixtures for this service (e.g. api)
    #[arg(long)]
    service: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let workspace_root = workspace_root();

    let all_passed = if args.docker {
        run_docker_mode(args.service.as_deref(), &workspace_root).await?
    } else if let Some(base_url) = args.base_url.as_deref() {
        run_url_mode(base_url, args.service.as_deref(), &workspace_root).await?
    } else {
        eprintln!("Either --base-url or --docker is required.");
        std::process::exit(2);
    };

    if all_passed {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Run all fixtures against a service that is already listening at `base_url`.
async fn run_url_mode(
    base_url: &str,
    service: Option<&str>,
    workspace_root: &Path,
) -> Result<bool> {
    let fixtures: Vec<Fixture> = fixture::load_all(workspace_root, service)?;

    if fixtures.is_empty() {
        eprintln!("No fixtures found.");
        return Ok(true);
    }

    println!("Running {} fixture(s) against {}", fixtures.len(), base_url);
    println!();

    let runner = Runner::new(base_url);
    let mut reporter = Reporter::new();

    for f in &fixtures {
        let result = runner.run(f).await;
        reporter.record(f, result);
    }

    reporter.print_summary();
    Ok(reporter.all_passed())
}

/// Start containers, boot the feature-enabled services in-process, and run
/// their fixtures. Containers are cleaned up afterwards, pass or fail.
async fn run_docker_mode(service: Option<&str>, workspace_root: &Path) -> Result<bool> {
    let config = ContractHarnessConfig::from_env();

    // One docker session at a time; concurrent invocations queue here.
    let lock_path = workspace_root.join("target/contract-harness.lock");
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let lock_file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("cannot open {}", lock_path.display()))?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock.write().context("cannot acquire harness lock")?;

    let mut docker = DockerOrchestrator::connect(&config.docker_host).await?;
    docker.cleanup_stale().await.ok();

    let result = run_services(&mut docker, &config, service, workspace_root).await;
    if config.keep_containers {
        println!("CONTRACT_KEEP_CONTAINERS set; leaving containers running.");
    } else {
        docker.cleanup().await.ok();
    }
    result
}

async fn run_services(
    docker: &mut DockerOrchestrator,
    config: &ContractHarnessConfig,
    service: Option<&str>,
    workspace_root: &Path,
) -> Result<bool> {
    let database_url = docker.start_postgres(&config.postgres_image).await?;
    let infra = InfraUrls { database_url };

    run_enabled_services(&infra, service, workspace_root).await
}

#[cfg(feature = "api")]
async fn run_enabled_services(
    infra: &InfraUrls,
    service: Option<&str>,
    workspace_root: &Path,
) -> Result<bool> {
    let mut all_passed = true;
    if service.is_none() || service == Some("api") {
        all_passed &= contract_harness::services::api::run(infra, workspace_root).await?;
    }
    Ok(all_passed)
}

#[cfg(not(feature = "api"))]
async fn run_enabled_services(
    _infra: &InfraUrls,
    _service: Option<&str>,
    _workspace_root: &Path,
) -> Result<bool> {
    eprintln!("No service features enabled; rebuild with --features api.");
    Ok(true)
}

/// Walk up from the binary's own manifest dir to find the workspace root
/// (the directory containing `Cargo.lock`).
fn workspace_root() -> PathBuf {
    let start = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    start
        .ancestors()
        .find(|p| p.join("Cargo.lock").exists())
        .unwrap_or(&start)
        .to_path_buf()
}
