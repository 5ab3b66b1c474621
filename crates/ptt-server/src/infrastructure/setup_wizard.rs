//! Interactive setup: asks for the PTT key and the two ports, then writes
//! `config.json`.
//!
//! The wizard is generic over its input and output streams so the whole
//! conversation can be scripted in tests.  Press Enter at any prompt to take
//! the default shown in brackets.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context};
use ptt_core::{KeyIdentifier, PttConfig};

use super::lan;

/// Keys offered by number, in menu order.
pub const QUICK_KEYS: [(&str, &str); 5] = [
    ("caps_lock", "Caps Lock (recommended, rarely bound elsewhere)"),
    ("scroll_lock", "Scroll Lock"),
    ("pause", "Pause / Break"),
    ("f13", "F13 (if your keyboard has it)"),
    ("insert", "Insert"),
];

/// Lowest port the wizard accepts; lower ports usually need elevated rights.
const MIN_PORT: u16 = 1024;

/// A scripted or interactive setup session.
pub struct SetupWizard<R, W, P> {
    input: R,
    output: W,
    port_in_use: P,
}

impl<R: BufRead, W: Write> SetupWizard<R, W, fn(u16) -> bool> {
    /// Creates a wizard that probes ports on this machine.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            port_in_use: lan::port_in_use,
        }
    }
}

impl<R: BufRead, W: Write, P: Fn(u16) -> bool> SetupWizard<R, W, P> {
    /// Creates a wizard with a custom port probe.
    pub fn with_port_probe(input: R, output: W, port_in_use: P) -> Self {
        Self {
            input,
            output,
            port_in_use,
        }
    }

    /// Runs the full conversation and writes the result to `path`.
    ///
    /// Returns `Ok(None)` if the user declined to overwrite an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the input ends early, the terminal cannot be
    /// written, or the config file cannot be saved.
    pub fn run(&mut self, path: &Path) -> anyhow::Result<Option<PttConfig>> {
        writeln!(self.output, "Remote PTT setup")?;
        writeln!(self.output, "Press Enter to accept the default shown in [brackets].")?;

        let ptt_key = self.ask_key()?;
        let (http_port, ws_port) = self.ask_ports()?;
        let config = PttConfig {
            ptt_key: ptt_key.name().to_string(),
            http_port,
            ws_port,
        };

        writeln!(self.output)?;
        writeln!(self.output, "Summary")?;
        writeln!(self.output, "  PTT key        : {}", config.ptt_key)?;
        writeln!(self.output, "  HTTP port      : {}", config.http_port)?;
        writeln!(self.output, "  WebSocket port : {}", config.ws_port)?;

        if path.exists() && !self.confirm(&format!("Overwrite {}?", path.display()), true)? {
            writeln!(self.output, "Keeping the existing file; nothing was saved.")?;
            return Ok(None);
        }

        config
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        writeln!(self.output, "Configuration written to {}", path.display())?;

        let host = lan::lan_ip().map_or_else(|| "localhost".to_string(), |ip| ip.to_string());
        writeln!(self.output, "Once the server is running, open http://{host}:{http_port}")?;
        writeln!(
            self.output,
            "and set your voice application's PTT key to {}.",
            config.ptt_key
        )?;
        Ok(Some(config))
    }

    fn ask_key(&mut self) -> anyhow::Result<KeyIdentifier> {
        writeln!(self.output)?;
        writeln!(self.output, "Which key should remote users hold?")?;
        for (i, (_, description)) in QUICK_KEYS.iter().enumerate() {
            writeln!(self.output, "  {}. {description}", i + 1)?;
        }
        let custom = QUICK_KEYS.len() + 1;
        writeln!(self.output, "  {custom}. Custom key (type the key name)")?;

        loop {
            let answer = self.prompt("Pick a number or type a key name", Some("1"))?;

            let name = match answer.parse::<usize>() {
                Ok(n) if (1..=QUICK_KEYS.len()).contains(&n) => QUICK_KEYS[n - 1].0.to_string(),
                Ok(n) if n == custom => self.prompt("Key name (e.g. f5, scroll_lock, page_up)", None)?,
                // Digits other than menu numbers are taken as digit keys.
                _ => answer,
            };

            match KeyIdentifier::parse(&name) {
                Ok(key) => {
                    writeln!(self.output, "PTT key set to {key}")?;
                    return Ok(key);
                }
                Err(e) => {
                    writeln!(self.output, "{e}. Supported keys:")?;
                    writeln!(self.output, "  {}", KeyIdentifier::supported_names().join(", "))?;
                }
            }
        }
    }

    fn ask_ports(&mut self) -> anyhow::Result<(u16, u16)> {
        let defaults = PttConfig::default();
        writeln!(self.output)?;
        writeln!(self.output, "The HTTP port serves the web page; the WebSocket port carries PTT.")?;

        let http_port = self.ask_port("HTTP port", defaults.http_port, None)?;
        let ws_port = self.ask_port("WebSocket port", defaults.ws_port, Some(http_port))?;

        for (label, port) in [("HTTP", http_port), ("WebSocket", ws_port)] {
            if (self.port_in_use)(port) {
                writeln!(
                    self.output,
                    "Warning: {label} port {port} appears to be in use by another program."
                )?;
            }
        }
        Ok((http_port, ws_port))
    }

    fn ask_port(&mut self, label: &str, default: u16, taken: Option<u16>) -> anyhow::Result<u16> {
        let default_text = default.to_string();
        loop {
            let answer = self.prompt(label, Some(&default_text))?;
            let Ok(port) = answer.parse::<u16>() else {
                writeln!(self.output, "Please enter a number between {MIN_PORT} and 65535.")?;
                continue;
            };
            if port < MIN_PORT {
                writeln!(self.output, "Port must be between {MIN_PORT} and 65535.")?;
                continue;
            }
            if Some(port) == taken {
                writeln!(self.output, "WebSocket port must differ from the HTTP port.")?;
                continue;
            }
            return Ok(port);
        }
    }

    fn confirm(&mut self, question: &str, default_yes: bool) -> anyhow::Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        write!(self.output, "> {question} ({hint}): ")?;
        self.output.flush()?;
        let answer = self.read_line()?.to_ascii_lowercase();
        Ok(match answer.as_str() {
            "" => default_yes,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn prompt(&mut self, question: &str, default: Option<&str>) -> anyhow::Result<String> {
        match default {
            Some(d) => write!(self.output, "> {question} [{d}]: ")?,
            None => write!(self.output, "> {question}: ")?,
        }
        self.output.flush()?;
        let answer = self.read_line()?;
        Ok(match (answer.is_empty(), default) {
            (true, Some(d)) => d.to_string(),
            _ => answer,
        })
    }

    fn read_line(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("setup aborted: input closed");
        }
        Ok(line.trim().to_string())
    }
}
