use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use raid5_rs::nbd::Session;
use raid5_rs::retention::array::Array;
use raid5_rs::retention::volume::Volume;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{info, warn};

pub struct ServerConfig {
    pub addr: SocketAddr,
    pub cache_slots: NonZeroUsize,
    pub export_size: u64,
    pub retry: Duration,
}

/// Serves until SIGINT or SIGTERM.
///
/// # Errors
/// Returns an error if the accept loop fails to start.
pub async fn run(array: Arc<Array>, cfg: ServerConfig) -> anyhow::Result<()> {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = tokio::spawn(async move {
        let Some(listener) = bind_with_retry(cfg.addr, cfg.retry, &mut shutdown_rx).await else {
            return Ok(());
        };
        serve(listener, array, &cfg, shutdown_rx).await
    });

    wait_for_signal().await;
    let _ = shutdown_tx.send(true);

    server.await.context("server task panicked")?
}

/// Binds `addr`, retrying every `retry` until it succeeds or shutdown is requested.
pub async fn bind_with_retry(
    addr: SocketAddr,
    retry: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<TcpListener> {
    loop {
        match TcpListener::bind(addr).await {
            Ok(listener) => return Some(listener),
            Err(err) => warn!("bind {addr} failed: {err}; retry in {retry:?}"),
        }

        tokio::select! {
            _ = tokio::time::sleep(retry) => {},
            _ = shutdown.changed() => return None,
        }
    }
}

/// Accepts clients one at a time and hands each to its own blocking session.
///
/// # Errors
/// Returns an error if the listener's address cannot be read.
pub async fn serve(
    listener: TcpListener,
    array: Arc<Array>,
    cfg: &ServerConfig,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    info!(
        "listening on {}",
        listener.local_addr().context("listener address")?
    );

    loop {
        tokio::select! {
            res = listener.accept() => match res {
                Ok((stream, peer)) => {
                    if let Err(err) = spawn_session(stream, peer, Arc::clone(&array), cfg) {
                        warn!(%peer, "failed to start session: {err:#}");
                    }
                }
                Err(err) => {
                    warn!("accept failed: {err}; retry in {:?}", cfg.retry);
                    tokio::time::sleep(cfg.retry).await;
                }
            },
            _ = shutdown.changed() => {
                info!("server: shutdown");
                break;
            },
        }
    }

    Ok(())
}

fn spawn_session(
    stream: TcpStream,
    peer: SocketAddr,
    array: Arc<Array>,
    cfg: &ServerConfig,
) -> anyhow::Result<()> {
    // Sessions do blocking disk I/O, so they get a plain blocking socket.
    let stream = stream.into_std().context("detach socket")?;
    stream.set_nonblocking(false).context("set blocking")?;
    stream.set_nodelay(true).context("set TCP_NODELAY")?;

    let volume = Volume::new(array, cfg.cache_slots);
    let export_size = cfg.export_size;
    info!(%peer, "client connected");

    tokio::task::spawn_blocking(move || {
        let mut session = Session::new(stream, volume, export_size);
        let res = session.run();
        let stats = session.stats();
        let cache = session.volume().cache_stats();
        match res {
            Ok(()) => info!(
                %peer,
                requests = stats.requests,
                reads = stats.reads,
                failed_reads = stats.failed_reads,
                rejected = stats.rejected,
                bytes_sent = stats.bytes_sent,
                cache_hits = cache.hits,
                cache_misses = cache.misses,
                "client disconnected"
            ),
            Err(err) => warn!(%peer, requests = stats.requests, "session aborted: {err}"),
        }
    });
    Ok(())
}

async fn wait_for_signal() {
    let sigterm_fut = sigterm();
    tokio::pin!(sigterm_fut);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown: ctrl-c");
        },
        _ = &mut sigterm_fut => {
            info!("shutdown: SIGTERM");
        },
    }
}

async fn sigterm() {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
        Ok(mut s) => {
            s.recv().await;
        }
        Err(err) => {
            warn!("cannot install SIGTERM handler: {err}");
            std::future::pending::<()>().await;
        }
    }
}
