mod cli;
mod replay;

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use axum::{http::StatusCode, routing::get};
use clap::Parser;
use tokio::{net::TcpListener, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use tender_api::{HttpApi, RegistryAdapter};
use tender_core::{DriverStatus, SchedulerDriver, Session, SessionError};
use tender_observe::logger_init;
use tender_prometheus::PrometheusMetrics;

use crate::{cli::Cli, replay::ReplayDriver};

/// Could not build the driver or scheduler.
const EXIT_BOOTSTRAP: u8 = 3;
/// The session ended with an error.
const EXIT_SESSION: u8 = 4;

const EVENT_BUFFER: usize = 64;

enum Failure {
    Bootstrap(anyhow::Error),
    Session(SessionError),
}

impl From<anyhow::Error> for Failure {
    fn from(e: anyhow::Error) -> Self {
        Failure::Bootstrap(e)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger_init(&cli.logger_config()) {
        eprintln!("failed to initialize logger: {e}");
        return ExitCode::from(EXIT_BOOTSTRAP);
    }

    match run(cli).await {
        Ok(status) => {
            info!(status = status.as_str(), "framework stopped");
            ExitCode::SUCCESS
        }
        Err(Failure::Bootstrap(e)) => {
            let error = format!("{e:#}");
            error!(%error, "unable to create a scheduler driver");
            ExitCode::from(EXIT_BOOTSTRAP)
        }
        Err(Failure::Session(e)) => {
            error!(status = e.status().as_str(), error = %e, "framework stopped with error");
            ExitCode::from(EXIT_SESSION)
        }
    }
}

async fn run(cli: Cli) -> Result<DriverStatus, Failure> {
    let config = cli.framework_config().context("invalid framework configuration")?;
    info!(
        master = %config.master,
        framework = %config.name,
        cpus = config.requirement.cpus,
        mem = config.requirement.mem,
        authenticated = config.credential.is_some(),
        "configuration loaded"
    );

    let metrics = PrometheusMetrics::new().context("registering metrics")?;
    let scheduler = Arc::new(
        config
            .build_scheduler()
            .context("building scheduler")?
            .with_metrics(Arc::new(metrics.clone())),
    );

    let cancel = CancellationToken::new();

    if let Some(addr) = cli.http {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding http listener on {addr}"))?;
        let api = HttpApi::new(Arc::new(RegistryAdapter::new(scheduler.registry().clone())));
        let app = api.router().route(
            "/metrics",
            get(move || {
                let metrics = metrics.clone();
                async move {
                    metrics
                        .render()
                        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
                }
            }),
        );

        let shutdown = cancel.clone();
        info!(%addr, "http api listening");
        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = served {
                warn!(error = %e, "http api stopped");
            }
        });
    }

    let source = replay::open(&cli.events).await?;
    let driver = Arc::new(ReplayDriver::new(&config));
    driver.start().context("starting driver")?;

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let reader = tokio::spawn(replay::feed(source, tx, cancel.clone()));

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; stopping");
            interrupt.cancel();
        }
    });

    let session = Session::new(scheduler, Arc::clone(&driver) as Arc<dyn SchedulerDriver>);
    let result = session.run(rx, cancel.clone()).await;
    cancel.cancel();

    match reader.await {
        Ok(Ok(events)) => info!(events, "event replay finished"),
        Ok(Err(e)) => {
            let error = format!("{e:#}");
            warn!(%error, "event replay failed");
        }
        Err(e) => warn!(error = %e, "event reader panicked"),
    }

    result.map_err(Failure::Session)
}
