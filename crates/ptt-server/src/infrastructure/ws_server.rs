//! WebSocket control channel: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from browsers.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Registering the session with the control service and forwarding its
//!    status frames (greeting and broadcasts) to the browser.
//! 5. Parsing inbound text frames and submitting valid PTT commands.
//! 6. Probing liveness with WebSocket Pings and pruning silent sessions.
//! 7. Gracefully shutting down when the `running` flag is cleared: the
//!    control service releases the key and every session flushes its final
//!    `ptt_off` before this module returns.
//!
//! # Session loop
//!
//! Each browser session runs in its own Tokio task and multiplexes four
//! sources with `tokio::select!`: frames from the browser, status frames from
//! the control service, the ping ticker, and the silence deadline.  Any
//! inbound frame (including a Pong) pushes the deadline back to
//! `last_seen + ping_timeout`.  When it passes, the session ends exactly as
//! if the browser had closed it, so a dropped phone cannot leave the key
//! held.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio::time::{interval_at, sleep_until, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use ptt_core::{parse_client_message, Inbound};

use crate::application::ControlHandle;
use crate::domain::config::ServerConfig;

/// How often the accept loop re-checks the `running` flag when idle.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// How long shutdown waits for sessions to deliver their last frames.
const SESSION_DRAIN: Duration = Duration::from_secs(2);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the control channel listener.
///
/// Kept separate from [`serve_control_channel`] so a bind failure (port in
/// use, no permission) aborts startup before anything else runs.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound.
pub async fn bind_control_listener(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {addr}"))
}

/// Runs the WebSocket accept loop until `running` is set to `false`.
///
/// Each accepted connection is handed off to a dedicated Tokio task so that
/// one slow browser never blocks others.
///
/// On the way out the control service is shut down (releasing the key and
/// queueing `ptt_off` for every browser) and the session tasks are given
/// [`SESSION_DRAIN`] to deliver it and close.
///
/// # Errors
///
/// Returns an error if the listener's local address cannot be read.
pub async fn serve_control_channel(
    listener: TcpListener,
    control: ControlHandle,
    config: Arc<ServerConfig>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let local = listener
        .local_addr()
        .context("failed to read control channel address")?;
    info!("control channel listening on ws://{local}");

    let mut sessions = JoinSet::new();

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping control channel accept loop");
            break;
        }

        // A short timeout lets the loop notice the shutdown flag even when no
        // browser is connecting.
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new TCP connection from {peer_addr}");
                let control = control.clone();
                let cfg = Arc::clone(&config);
                sessions.spawn(handle_browser_session(stream, peer_addr, control, cfg));
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., too many open file descriptors).
                error!("accept error: {e}");
            }
            Err(_) => {}
        }

        // Reap finished sessions so the set does not grow without bound.
        while sessions.try_join_next().is_some() {}
    }

    if control.shutdown().await.is_err() {
        debug!("control service already stopped");
    }
    drain_sessions(&mut sessions).await;

    Ok(())
}

/// Waits for session tasks to finish, aborting any still running after
/// [`SESSION_DRAIN`].
async fn drain_sessions(sessions: &mut JoinSet<()>) {
    let drained = timeout(SESSION_DRAIN, async {
        while sessions.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!("{} session(s) did not close in time; aborting", sessions.len());
        sessions.abort_all();
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Wraps [`run_session`] and logs the outcome.
async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    control: ControlHandle,
    config: Arc<ServerConfig>,
) {
    match run_session(raw_stream, peer_addr, control, config).await {
        Ok(()) => debug!("session {peer_addr} closed normally"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Why a session loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    BrowserClosed,
    TimedOut,
    ServiceStopped,
    SendFailed,
}

/// Runs the complete lifecycle of a single browser WebSocket session.
///
/// The session is always deregistered on the way out, whatever ended it.
///
/// # Errors
///
/// Returns an error if the WebSocket handshake fails or the control service
/// has already stopped.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    control: ControlHandle,
    config: Arc<ServerConfig>,
) -> anyhow::Result<()> {
    let ws_stream = timeout(config.handshake_timeout, accept_async(raw_stream))
        .await
        .map_err(|_| anyhow::anyhow!("WebSocket handshake with {peer_addr} timed out"))?
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let (id, mut outbox) = control
        .connect(peer_addr)
        .await
        .context("control service is not running")?;

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    let mut last_seen = Instant::now();
    let mut ticker = interval_at(Instant::now() + config.ping_interval, config.ping_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let end = loop {
        tokio::select! {
            frame = ws_rx.next() => {
                let msg = match frame {
                    Some(Ok(msg)) => msg,
                    Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) | None => {
                        break SessionEnd::BrowserClosed;
                    }
                    Some(Err(e)) => {
                        warn!("session {id}: browser WebSocket error: {e}");
                        break SessionEnd::BrowserClosed;
                    }
                };
                last_seen = Instant::now();
                debug!("session {id}: received {} frame", frame_kind(&msg));

                match msg {
                    WsMessage::Text(text) => match parse_client_message(&text) {
                        Inbound::Valid(command) => {
                            if control.command(id, command).await.is_err() {
                                break SessionEnd::ServiceStopped;
                            }
                        }
                        Inbound::Rejected(reason) => {
                            // Never log the payload itself; it is untrusted input.
                            warn!(
                                "session {id}: dropped {reason:?} message ({} bytes)",
                                text.len()
                            );
                        }
                    },
                    WsMessage::Binary(data) => {
                        warn!("session {id}: unexpected binary frame ({} bytes, ignored)", data.len());
                    }
                    WsMessage::Close(_) => break SessionEnd::BrowserClosed,
                    WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
                }
            }

            status = outbox.recv() => {
                let Some(status) = status else {
                    break SessionEnd::ServiceStopped;
                };
                if ws_tx.send(WsMessage::Text(status.to_json())).await.is_err() {
                    break SessionEnd::SendFailed;
                }
            }

            _ = sleep_until(last_seen + config.ping_timeout) => {
                break SessionEnd::TimedOut;
            }

            _ = ticker.tick() => {
                if ws_tx.send(WsMessage::Ping(Vec::new())).await.is_err() {
                    break SessionEnd::SendFailed;
                }
            }
        }
    };

    match end {
        SessionEnd::TimedOut => warn!(
            "session {id} ({peer_addr}): no traffic for {:?}, pruning",
            config.ping_timeout
        ),
        other => debug!("session {id} ({peer_addr}) ended: {other:?}"),
    }

    // Deliver anything already queued (e.g. the shutdown ptt_off) before
    // closing; the browser may already be gone, so errors are ignored.
    if end == SessionEnd::ServiceStopped {
        while let Ok(status) = outbox.try_recv() {
            let _ = ws_tx.send(WsMessage::Text(status.to_json())).await;
        }
    }
    let _ = ws_tx.send(WsMessage::Close(None)).await;

    drop(outbox);
    let _ = control.disconnect(id).await;
    Ok(())
}

// ── Helper ────────────────────────────────────────────────────────────────────

/// Returns a short name for a WebSocket frame, for debug logs that must not
/// echo frame contents.
fn frame_kind(msg: &WsMessage) -> &'static str {
    match msg {
        WsMessage::Text(_) => "Text",
        WsMessage::Binary(_) => "Binary",
        WsMessage::Ping(_) => "Ping",
        WsMessage::Pong(_) => "Pong",
        WsMessage::Close(_) => "Close",
        WsMessage::Frame(_) => "Frame",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
