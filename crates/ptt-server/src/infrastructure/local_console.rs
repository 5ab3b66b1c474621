//! Local PTT test surface on the server's own terminal.
//!
//! Lets the host operator key the radio without a browser, to check that the
//! voice application reacts to the configured key.  Commands are read one
//! line at a time:
//!
//! | Input            | Effect                              |
//! |------------------|-------------------------------------|
//! | *(empty line)*   | toggle PTT                          |
//! | `on` / `off`     | press / release                     |
//! | `status`         | print the current state and clients |
//! | anything else    | print the command list              |
//!
//! Local commands go through [`ControlHandle::set_local_ptt`], so browsers
//! see the same `ptt_on` / `ptt_off` broadcasts as for each other's presses.

use std::io::{self, BufRead, Write};

use ptt_core::PttCommand;
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::{ControlError, ControlHandle};

const USAGE: &str = "local PTT: Enter = toggle, on, off, status";

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Toggle,
    Set(PttCommand),
    Status,
}

/// Parses one line; `None` for anything unrecognised.
pub fn parse_console_line(line: &str) -> Option<ConsoleCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "t" | "toggle" => Some(ConsoleCommand::Toggle),
        "on" => Some(ConsoleCommand::Set(PttCommand::On)),
        "off" => Some(ConsoleCommand::Set(PttCommand::Off)),
        "status" | "s" => Some(ConsoleCommand::Status),
        _ => None,
    }
}

/// Reads stdin on a dedicated thread and forwards each line.
///
/// Blocking terminal reads stay off the runtime, so a pending read never
/// holds up shutdown.  The channel closes when stdin reaches EOF.
///
/// # Errors
///
/// Returns an error if the reader thread cannot be started.
pub fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("local-console".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            debug!("local console input closed");
        })?;
    Ok(rx)
}

/// Applies console lines until the input closes.
///
/// Replies (status, usage) are written to `out`; write failures are ignored.
///
/// # Errors
///
/// Returns [`ControlError::Stopped`] once the control service is gone.
pub async fn run_local_console<W: Write>(
    mut lines: mpsc::Receiver<String>,
    control: ControlHandle,
    mut out: W,
) -> Result<(), ControlError> {
    let status = control.subscribe();
    while let Some(line) = lines.recv().await {
        match parse_console_line(&line) {
            Some(ConsoleCommand::Toggle) => {
                let command = if status.borrow().ptt.is_pressed() {
                    PttCommand::Off
                } else {
                    PttCommand::On
                };
                control.set_local_ptt(command).await?;
            }
            Some(ConsoleCommand::Set(command)) => control.set_local_ptt(command).await?,
            Some(ConsoleCommand::Status) => {
                let snapshot = *status.borrow();
                let _ = writeln!(out, "PTT {} | {} client(s)", snapshot.ptt, snapshot.clients);
            }
            None => {
                let _ = writeln!(out, "{USAGE}");
            }
        }
        let _ = out.flush();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use tokio::sync::watch;

    use crate::application::{ControlService, KeyActuator, KeyEmulator, StatusSnapshot};
    use crate::infrastructure::key_emulation::MockKeyEmulator;
    use ptt_core::{KeyIdentifier, PttState};

    async fn wait_for_state(status: &mut watch::Receiver<StatusSnapshot>, want: PttState) {
        tokio::time::timeout(Duration::from_secs(1), status.wait_for(|s| s.ptt == want))
            .await
            .expect("timed out waiting for snapshot")
            .unwrap();
    }

    #[test]
    fn test_parse_console_line() {
        assert_eq!(parse_console_line(""), Some(ConsoleCommand::Toggle));
        assert_eq!(parse_console_line("  ON "), Some(ConsoleCommand::Set(PttCommand::On)));
        assert_eq!(parse_console_line("off"), Some(ConsoleCommand::Set(PttCommand::Off)));
        assert_eq!(parse_console_line("status"), Some(ConsoleCommand::Status));
        assert_eq!(parse_console_line("transmit"), None);
    }

    #[tokio::test]
    async fn test_console_presses_and_toggles_the_key() {
        // Arrange
        let mock = Arc::new(MockKeyEmulator::new());
        let actuator = KeyActuator::new(Arc::clone(&mock) as Arc<dyn KeyEmulator>, KeyIdentifier::default());
        let (control, _task) = ControlService::spawn(actuator);
        let mut status = control.subscribe();
        let (tx, rx) = mpsc::channel(4);
        let console = tokio::spawn(run_local_console(rx, control.clone(), Vec::new()));

        // Act: explicit press, then toggle back off
        tx.send("on".to_string()).await.unwrap();
        wait_for_state(&mut status, PttState::Pressed).await;
        tx.send(String::new()).await.unwrap();
        wait_for_state(&mut status, PttState::Released).await;
        tx.send("status".to_string()).await.unwrap();
        tx.send("bogus".to_string()).await.unwrap();
        drop(tx);

        // Assert
        console.await.unwrap().unwrap();
        assert_eq!(mock.key_down_count(), 1);
        assert_eq!(mock.key_up_count(), 1);
    }

    #[tokio::test]
    async fn test_console_writes_status_and_usage() {
        // Arrange
        let mock = Arc::new(MockKeyEmulator::new());
        let actuator = KeyActuator::new(mock as Arc<dyn KeyEmulator>, KeyIdentifier::default());
        let (control, _task) = ControlService::spawn(actuator);
        let (tx, rx) = mpsc::channel(4);
        tx.send("status".to_string()).await.unwrap();
        tx.send("bogus".to_string()).await.unwrap();
        drop(tx);
        let mut out = Vec::new();

        // Act
        run_local_console(rx, control, &mut out).await.unwrap();

        // Assert
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("PTT OFF | 0 client(s)"));
        assert!(text.contains(USAGE));
    }
}
