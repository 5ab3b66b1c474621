//! The control service: one task that owns the key and the session list.
//!
//! Every connection task, the host, and the shutdown path talk to it through
//! a cloneable [`ControlHandle`].  Events are handled strictly one at a time,
//! so reading the [`PttState`], calling the actuator, and broadcasting happen
//! as a single step with no lock.  The final state after any interleaving of
//! browser commands is simply the effect of the last command evaluated.
//!
//! ```text
//! session task ─┐
//! session task ─┼─ ControlEvent ─► ControlService ─► KeyActuator ─► OS
//! host / main ──┘      (mpsc)            │
//!                                        ├─► outbox per session (ServerStatus)
//!                                        └─► watch<StatusSnapshot>
//! ```

use std::net::SocketAddr;

use ptt_core::{PttCommand, PttState, ServerStatus};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::actuator::KeyActuator;
use super::registry::{Departure, SessionId, SessionRegistry};

/// Capacity of the event queue feeding the control service.
const EVENT_QUEUE_DEPTH: usize = 256;

/// Error type for requests to the control service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("control service has stopped")]
    Stopped,
}

/// What local control surfaces can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub ptt: PttState,
    pub clients: usize,
}

/// Messages processed by [`ControlService`].
#[derive(Debug)]
pub enum ControlEvent {
    Connect {
        id: SessionId,
        peer: SocketAddr,
        outbox: mpsc::UnboundedSender<ServerStatus>,
    },
    Command {
        id: SessionId,
        command: PttCommand,
    },
    Disconnect {
        id: SessionId,
    },
    Local(PttCommand),
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

/// Cloneable front door to the control service.
#[derive(Clone)]
pub struct ControlHandle {
    events: mpsc::Sender<ControlEvent>,
    status: watch::Receiver<StatusSnapshot>,
}

impl ControlHandle {
    /// Registers a new session.
    ///
    /// Returns its id and the receiver of the status frames it must forward
    /// to the browser, starting with the greeting.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Stopped`] if the service is gone.
    pub async fn connect(
        &self,
        peer: SocketAddr,
    ) -> Result<(SessionId, mpsc::UnboundedReceiver<ServerStatus>), ControlError> {
        let id = SessionId::new();
        let (outbox, inbox) = mpsc::unbounded_channel();
        self.send(ControlEvent::Connect { id, peer, outbox }).await?;
        Ok((id, inbox))
    }

    /// Submits a command received from session `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Stopped`] if the service is gone.
    pub async fn command(&self, id: SessionId, command: PttCommand) -> Result<(), ControlError> {
        self.send(ControlEvent::Command { id, command }).await
    }

    /// Reports that session `id` has ended.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Stopped`] if the service is gone.
    pub async fn disconnect(&self, id: SessionId) -> Result<(), ControlError> {
        self.send(ControlEvent::Disconnect { id }).await
    }

    /// Presses or releases the key from the host itself, with the same
    /// absorption and broadcast rules as a browser command.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Stopped`] if the service is gone.
    pub async fn set_local_ptt(&self, command: PttCommand) -> Result<(), ControlError> {
        self.send(ControlEvent::Local(command)).await
    }

    /// Returns a receiver that always holds the latest [`StatusSnapshot`].
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.clone()
    }

    /// Releases the key if held, tells every browser, drops all sessions,
    /// and stops the service.  Resolves once that has happened.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Stopped`] if the service had already stopped.
    pub async fn shutdown(&self) -> Result<(), ControlError> {
        let (done, wait) = oneshot::channel();
        self.send(ControlEvent::Shutdown { done }).await?;
        wait.await.map_err(|_| ControlError::Stopped)
    }

    async fn send(&self, event: ControlEvent) -> Result<(), ControlError> {
        self.events.send(event).await.map_err(|_| ControlError::Stopped)
    }
}

/// Owner of the [`SessionRegistry`] and the [`KeyActuator`].
pub struct ControlService {
    registry: SessionRegistry,
    actuator: KeyActuator,
    events: mpsc::Receiver<ControlEvent>,
    status: watch::Sender<StatusSnapshot>,
}

impl ControlService {
    /// Creates the service and its first handle without starting it.
    pub fn new(actuator: KeyActuator) -> (Self, ControlHandle) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (status_tx, status_rx) = watch::channel(StatusSnapshot::default());
        let service = Self {
            registry: SessionRegistry::new(),
            actuator,
            events: events_rx,
            status: status_tx,
        };
        let handle = ControlHandle {
            events: events_tx,
            status: status_rx,
        };
        (service, handle)
    }

    /// Spawns the service on the current Tokio runtime.
    pub fn spawn(actuator: KeyActuator) -> (ControlHandle, JoinHandle<()>) {
        let (service, handle) = Self::new(actuator);
        let task = tokio::spawn(service.run());
        (handle, task)
    }

    /// Processes events until shutdown is requested or every handle is
    /// dropped.  The key is always released before this returns.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            match event {
                ControlEvent::Connect { id, peer, outbox } => self.on_connect(id, peer, outbox),
                ControlEvent::Command { id, command } => self.on_command(id, command),
                ControlEvent::Disconnect { id } => self.on_disconnect(id),
                ControlEvent::Local(command) => {
                    info!("local PTT {:?}", command);
                    self.apply(command, None);
                }
                ControlEvent::Shutdown { done } => {
                    self.stop();
                    let _ = done.send(());
                    return;
                }
            }
            self.publish();
        }
        self.stop();
    }

    fn on_connect(&mut self, id: SessionId, peer: SocketAddr, outbox: mpsc::UnboundedSender<ServerStatus>) {
        if self.registry.register(id, peer, outbox) {
            info!(
                "client connected: {peer} (session {id}, {} connected)",
                self.registry.len()
            );
        } else {
            debug!("session {id} from {peer} closed before registration");
        }
    }

    fn on_command(&mut self, id: SessionId, command: PttCommand) {
        // A command can race with the pruning of its own session.
        if !self.registry.contains(id) {
            debug!("ignoring {:?} from unregistered session {id}", command);
            return;
        }
        self.apply(command, Some(id));
    }

    fn on_disconnect(&mut self, id: SessionId) {
        if let Some(departure) = self.registry.deregister(id) {
            self.settle(vec![departure]);
        }
    }

    fn apply(&mut self, command: PttCommand, origin: Option<SessionId>) {
        let Some(next) = self.registry.apply(command, origin) else {
            debug!("{:?} absorbed, key already {}", command, self.registry.state());
            return;
        };
        match origin {
            Some(id) => info!("PTT {next} (session {id})"),
            None => info!("PTT {next} (host)"),
        }
        self.actuate(next);
        let pruned = self.registry.broadcast(ServerStatus::for_state(next.is_pressed()));
        self.settle(pruned);
    }

    /// Handles departures, including any that a forced-release broadcast
    /// uncovers in turn.
    fn settle(&mut self, mut pending: Vec<Departure>) {
        while let Some(departure) = pending.pop() {
            info!(
                "client disconnected: {} (session {}, {} remaining)",
                departure.peer,
                departure.id,
                self.registry.len()
            );
            if departure.forced_release {
                if departure.was_presser {
                    warn!(
                        "session {} left while holding PTT; releasing key",
                        departure.id
                    );
                } else {
                    warn!(
                        "session {} left while PTT was held by another client; releasing key",
                        departure.id
                    );
                }
                self.actuate(PttState::Released);
                pending.extend(self.registry.broadcast(ServerStatus::PttOff));
            }
        }
    }

    fn actuate(&mut self, state: PttState) {
        match state {
            PttState::Pressed => self.actuator.press(),
            PttState::Released => self.actuator.release(),
        }
    }

    fn stop(&mut self) {
        if self.registry.apply(PttCommand::Off, None).is_some() {
            info!("releasing PTT on shutdown");
            self.actuate(PttState::Released);
            // Outboxes are dropped right after, so pruned sessions need no
            // further handling.
            let _ = self.registry.broadcast(ServerStatus::PttOff);
        }
        // Dropping the outboxes tells every session task to close.
        let _ = self.registry.clear();
        self.publish();
        info!("control service stopped");
    }

    fn publish(&self) {
        let snapshot = StatusSnapshot {
            ptt: self.registry.state(),
            clients: self.registry.len(),
        };
        self.status.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::actuator::KeyEmulator;
    use crate::infrastructure::key_emulation::MockKeyEmulator;
    use ptt_core::KeyIdentifier;

    fn start() -> (Arc<MockKeyEmulator>, ControlHandle, JoinHandle<()>) {
        let mock = Arc::new(MockKeyEmulator::new());
        let actuator = KeyActuator::new(Arc::clone(&mock) as Arc<dyn KeyEmulator>, KeyIdentifier::default());
        let (handle, task) = ControlService::spawn(actuator);
        (mock, handle, task)
    }

    fn peer(port: u16) -> SocketAddr {
        SocketAddr::from(([10, 0, 0, 2], port))
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<ServerStatus>) -> ServerStatus {
        tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for status")
            .expect("outbox closed")
    }

    #[tokio::test]
    async fn test_connect_sends_greeting() {
        // Arrange
        let (_mock, handle, _task) = start();

        // Act
        let (_id, mut rx) = handle.connect(peer(1)).await.unwrap();

        // Assert
        assert_eq!(next(&mut rx).await, ServerStatus::Connected);
    }

    #[tokio::test]
    async fn test_on_is_broadcast_to_every_client_and_pressed_once() {
        // Arrange
        let (mock, handle, _task) = start();
        let (a, mut rx_a) = handle.connect(peer(1)).await.unwrap();
        let (_b, mut rx_b) = handle.connect(peer(2)).await.unwrap();
        next(&mut rx_a).await;
        next(&mut rx_b).await;

        // Act
        handle.command(a, PttCommand::On).await.unwrap();
        handle.command(a, PttCommand::On).await.unwrap();
        handle.command(a, PttCommand::Off).await.unwrap();

        // Assert
        assert_eq!(next(&mut rx_a).await, ServerStatus::PttOn);
        assert_eq!(next(&mut rx_a).await, ServerStatus::PttOff);
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOn);
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOff);
        assert_eq!(mock.key_down_count(), 1);
        assert_eq!(mock.key_up_count(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_while_pressed_releases_and_notifies_others() {
        // Arrange
        let (mock, handle, _task) = start();
        let (a, mut rx_a) = handle.connect(peer(1)).await.unwrap();
        let (_b, mut rx_b) = handle.connect(peer(2)).await.unwrap();
        next(&mut rx_a).await;
        next(&mut rx_b).await;
        handle.command(a, PttCommand::On).await.unwrap();
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOn);

        // Act
        handle.disconnect(a).await.unwrap();

        // Assert
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOff);
        assert_eq!(mock.key_up_count(), 1);
    }

    #[tokio::test]
    async fn test_late_joiner_sees_pressed_state() {
        let (_mock, handle, _task) = start();
        handle.set_local_ptt(PttCommand::On).await.unwrap();

        let (_c, mut rx_c) = handle.connect(peer(3)).await.unwrap();

        assert_eq!(next(&mut rx_c).await, ServerStatus::Connected);
        assert_eq!(next(&mut rx_c).await, ServerStatus::PttOn);
    }

    #[tokio::test]
    async fn test_dropped_outbox_is_pruned_and_releases_key() {
        // Arrange: two registered clients; b toggles once so a is idle
        let (mock, handle, _task) = start();
        let (a, mut rx_a) = handle.connect(peer(1)).await.unwrap();
        let (b, mut rx_b) = handle.connect(peer(2)).await.unwrap();
        assert_eq!(next(&mut rx_a).await, ServerStatus::Connected);
        assert_eq!(next(&mut rx_b).await, ServerStatus::Connected);
        handle.command(a, PttCommand::On).await.unwrap();
        assert_eq!(next(&mut rx_a).await, ServerStatus::PttOn);
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOn);
        handle.command(b, PttCommand::Off).await.unwrap();
        assert_eq!(next(&mut rx_a).await, ServerStatus::PttOff);
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOff);

        // a's task vanishes without a Disconnect
        drop(rx_a);

        // Act: b presses; the broadcast finds a's dead outbox while pressed
        handle.command(b, PttCommand::On).await.unwrap();

        // Assert: b sees its press, then the forced release
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOn);
        assert_eq!(next(&mut rx_b).await, ServerStatus::PttOff);
        assert_eq!(mock.key_down_count(), 2);
        assert_eq!(mock.key_up_count(), 2);
        let mut status = handle.subscribe();
        let snapshot = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            status.wait_for(|s| s.ptt == PttState::Released),
        )
        .await
        .expect("timed out waiting for snapshot")
        .map(|s| *s)
        .unwrap();
        // only b remains
        assert_eq!(snapshot.clients, 1);
    }

    #[tokio::test]
    async fn test_subscribe_tracks_clients_and_state() {
        let (_mock, handle, _task) = start();
        let mut status = handle.subscribe();

        let (a, _rx) = handle.connect(peer(1)).await.unwrap();
        handle.command(a, PttCommand::On).await.unwrap();

        let snapshot = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            status.wait_for(|s| s.ptt == PttState::Pressed),
        )
        .await
        .expect("timed out waiting for snapshot")
        .map(|s| *s)
        .unwrap();
        assert_eq!(snapshot.clients, 1);
    }

    #[tokio::test]
    async fn test_shutdown_releases_key_and_closes_sessions() {
        // Arrange
        let (mock, handle, task) = start();
        let (a, mut rx_a) = handle.connect(peer(1)).await.unwrap();
        next(&mut rx_a).await;
        handle.command(a, PttCommand::On).await.unwrap();
        assert_eq!(next(&mut rx_a).await, ServerStatus::PttOn);

        // Act
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        // Assert
        assert_eq!(next(&mut rx_a).await, ServerStatus::PttOff);
        assert_eq!(rx_a.recv().await, None);
        assert_eq!(mock.key_up_count(), 1);
        assert_eq!(handle.command(a, PttCommand::On).await, Err(ControlError::Stopped));
    }
}
