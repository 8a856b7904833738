mod cli;
mod server;
mod stats;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use raid5_rs::metrics::install_metrics_sink;
use raid5_rs::retention::array::Array;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::server::ServerConfig;
use crate::stats::StatsSink;

fn main() -> anyhow::Result<()> {
    let cli = cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let array = match Array::open(&cli.disks, cli.block_size) {
        Ok(array) => array,
        Err(err) => {
            eprintln!("raid5d: {err}");
            std::process::exit(1);
        }
    };

    let export_size = cli.export_size.unwrap_or_else(|| array.default_export_size());
    info!(
        disks = array.disks(),
        block_size = array.block_size(),
        stripes = array.stripes(),
        capacity = array.capacity_bytes(),
        export_size,
        "array assembled"
    );
    for line in array.status_string().lines() {
        info!("{line}");
    }
    if array.missing().is_none() {
        warn!("no member marked MISSING; serving data disks directly");
    }
    if export_size > array.default_export_size() {
        warn!(
            export_size,
            readable = array.default_export_size(),
            "export size exceeds readable capacity; tail reads will fail"
        );
    }

    let stats = Arc::new(StatsSink::default());
    install_metrics_sink(stats.clone());

    if !cli.foreground {
        // Fork before any runtime threads exist.
        // SAFETY: single-threaded at this point.
        if unsafe { libc::daemon(0, 0) } != 0 {
            return Err(std::io::Error::last_os_error()).context("daemonize");
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let cfg = ServerConfig {
        addr: SocketAddr::new(cli.listen, cli.port),
        cache_slots: cli.cache_slots,
        export_size,
        retry: Duration::from_millis(cli.retry_ms),
    };
    let res = runtime.block_on(server::run(Arc::new(array), cfg));

    // Sessions blocked on a client read are abandoned here.
    runtime.shutdown_timeout(Duration::from_secs(1));
    info!("exit: {}", stats.snapshot());
    res
}
