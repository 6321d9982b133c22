//! Standalone actuator demo server.
//!
//! Serves the actuator endpoints with a couple of sample health checks and
//! an in-memory scheduler so every endpoint has something to show.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use axum_actuator::api::{actuator_router, ActuatorState};
use axum_actuator::config::ActuatorConfig;
use axum_actuator::health::HealthResult;
use axum_actuator::info::BuildInfo;
use axum_actuator::scheduler::{
    mark_job_failed, mark_job_successful, JobKey, MockJobBuilder, MockScheduler,
};
use axum_actuator::utils::shutdown_signal;

/// Actuator endpoints demo server.
#[derive(Parser, Debug)]
#[command(name = "actuator-demo")]
#[command(about = "Diagnostic actuator endpoints demo (health, info, env, quartz)")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the demo server (default).
    Run {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("axum_actuator=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    let config = ActuatorConfig::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("Configuration OK");
    println!("  Port: {}", config.port);
    println!("  IP allowlist enabled: {}", config.ip_allow_list_enabled);
    if let Some(ips) = &config.actuator_allowed_ips {
        println!("  Allowed IPs: {}", ips);
    }

    Ok(())
}

/// Run the demo server.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = ActuatorConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let scheduler = demo_scheduler();
    let job_key = JobKey::new("nightly-import", "demo");

    let info = BuildInfo::new(
        config.app_name.clone().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
        config
            .app_version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
    );

    let state = ActuatorState::new()
        .with_info(info)
        .with_schedulers(vec![Arc::new(scheduler.clone())])
        .with_ip_allow_list(config.ip_allow_list_enabled);

    if let Some(ips) = config.actuator_allowed_ips.as_deref() {
        state.allow_list.set_from_str(ips)?;
        info!("IP allowlist installed with {} range(s)", state.allow_list.len());
    }

    register_demo_checks(&state);

    // Periodically "run" the demo job so /quartz shows changing metadata.
    let job_scheduler = scheduler.clone();
    tokio::spawn(async move {
        let mut runs = 0u64;
        loop {
            tokio::time::sleep(Duration::from_secs(30)).await;
            runs += 1;

            job_scheduler.update_job_data(&job_key, |data| {
                if runs % 5 == 0 {
                    mark_job_failed(data, Some("simulated failure"), None);
                } else {
                    mark_job_successful(data, Some(json!({"imported_rows": runs * 100})));
                }
            });
        }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Actuator endpoints listening on {}", addr);

    let router = actuator_router(state);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Register a couple of sample health checks.
fn register_demo_checks(state: &ActuatorState) {
    state.checks.register("self", || Ok(HealthResult::healthy()));

    state.checks.register("disk_space", || {
        let metadata = std::fs::metadata("/")?;
        Ok(HealthResult::healthy_with(json!({
            "root_readonly": metadata.permissions().readonly(),
        })))
    });
}

/// Build the in-memory scheduler with one triggered demo job.
fn demo_scheduler() -> MockScheduler {
    let scheduler = MockScheduler::new("demo-scheduler").started(true);
    scheduler.add_job(
        MockJobBuilder::new("nightly-import", "demo", "demo::NightlyImportJob")
            .described("Imports the demo dataset")
            .trigger("every-30s", "demo", time::OffsetDateTime::now_utc())
            .build(),
    );
    scheduler
}
