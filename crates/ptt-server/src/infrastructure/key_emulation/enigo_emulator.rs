//! OS key event injection through `enigo`.
//!
//! `enigo` wraps `SendInput` on Windows, `CGEventPost` on macOS and XTest on
//! Linux/X11.  Each of those calls can block briefly (an X round trip, an
//! accessibility check), so the `Enigo` instance lives on its own OS thread
//! and the async side only ever enqueues requests.  Requests are applied in
//! the order they were sent.
//!
//! # Key codes
//!
//! The configured key is resolved to the host's native code through
//! `KeyMapper::hid_to_native` and passed to `enigo` as `Key::Other`:
//!
//! | Platform | `Key::Other` carries     |
//! |----------|--------------------------|
//! | Windows  | Virtual Key code         |
//! | macOS    | `CGKeyCode`              |
//! | Linux    | X11 KeySym               |
//!
//! # Permissions
//!
//! On macOS the process needs the Accessibility permission; on Linux it needs
//! access to the X display named by `DISPLAY`.  Both are checked once in
//! [`EnigoKeyEmulator::spawn`], which fails if `Enigo` cannot be created.

use std::sync::mpsc;
use std::thread::JoinHandle;

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use ptt_core::KeyIdentifier;
use tracing::{debug, error, info};

use crate::application::actuator::{EmulationError, KeyEmulator};

enum KeyRequest {
    Down(u32),
    Up(u32),
}

/// Real key emulator backed by a dedicated `enigo` worker thread.
pub struct EnigoKeyEmulator {
    requests: Option<mpsc::Sender<KeyRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl EnigoKeyEmulator {
    /// Starts the worker thread and checks that key events can be injected
    /// for `key` on this machine.
    ///
    /// # Errors
    ///
    /// - [`EmulationError::UnsupportedKey`] if `key` has no native code here.
    /// - [`EmulationError::Platform`] if the OS refuses to create the
    ///   emulator (missing permission, no display) or the thread cannot start.
    pub fn spawn(key: KeyIdentifier) -> Result<Self, EmulationError> {
        let native = key.native_code()?;
        let (requests, inbox) = mpsc::channel::<KeyRequest>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);

        let worker = std::thread::Builder::new()
            .name("key-emulation".to_string())
            .spawn(move || run_worker(inbox, ready_tx))
            .map_err(|e| EmulationError::Platform(format!("failed to start worker thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("key emulation ready: {key} (native code {native:#x})");
                Ok(Self {
                    requests: Some(requests),
                    worker: Some(worker),
                })
            }
            Ok(Err(msg)) => Err(EmulationError::Platform(format!(
                "cannot simulate key events: {msg}"
            ))),
            Err(_) => Err(EmulationError::WorkerGone),
        }
    }

    fn enqueue(&self, request: KeyRequest) -> Result<(), EmulationError> {
        self.requests
            .as_ref()
            .ok_or(EmulationError::WorkerGone)?
            .send(request)
            .map_err(|_| EmulationError::WorkerGone)
    }
}

impl KeyEmulator for EnigoKeyEmulator {
    fn key_down(&self, key: KeyIdentifier) -> Result<(), EmulationError> {
        self.enqueue(KeyRequest::Down(key.native_code()?))
    }

    fn key_up(&self, key: KeyIdentifier) -> Result<(), EmulationError> {
        self.enqueue(KeyRequest::Up(key.native_code()?))
    }
}

impl Drop for EnigoKeyEmulator {
    /// Closes the queue and waits for the worker to apply what is left in it,
    /// so a release issued during shutdown reaches the OS before exit.
    fn drop(&mut self) {
        drop(self.requests.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("key emulation worker panicked");
            }
        }
    }
}

fn run_worker(inbox: mpsc::Receiver<KeyRequest>, ready: mpsc::SyncSender<Result<(), String>>) {
    let mut enigo = match Enigo::new(&Settings::default()) {
        Ok(enigo) => {
            let _ = ready.send(Ok(()));
            enigo
        }
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    for request in inbox {
        let (code, direction) = match request {
            KeyRequest::Down(code) => (code, Direction::Press),
            KeyRequest::Up(code) => (code, Direction::Release),
        };
        if let Err(e) = enigo.key(Key::Other(code), direction) {
            error!("key event {direction:?} for {code:#x} failed: {e}");
        }
    }
    debug!("key emulation worker exiting");
}
