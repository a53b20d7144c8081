use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::render::ColorMode;

/// One line of the control channel. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlMessage {
    pub theme: Option<String>,
    pub mode: Option<ColorMode>,
    pub enabled: Option<bool>,
}

impl ControlMessage {
    /// Parse one JSON line. Blank lines yield `None`; bad input is logged and dropped.
    pub fn parse_line(line: &str) -> Option<ControlMessage> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str(line) {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!(error = %e, line, "ignoring malformed control message");
                None
            }
        }
    }

    /// Apply to the controller: theme first, then mode, then enable/disable.
    pub fn apply(&self, controller: &mut Controller) {
        if let Some(theme) = &self.theme {
            controller.set_theme(theme);
        }
        if let Some(mode) = self.mode {
            controller.set_mode(mode);
        }
        match self.enabled {
            Some(true) => controller.enable(),
            Some(false) => controller.disable(),
            None => {}
        }
    }
}

#[derive(Debug, Clone)]
pub enum ControlSource {
    Stdin,
    File(PathBuf),
}

impl std::str::FromStr for ControlSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "-" | "stdin" => ControlSource::Stdin,
            path => ControlSource::File(PathBuf::from(path)),
        })
    }
}

/// Last non-empty line of a control file, parsed.
fn latest_message(path: &std::path::Path) -> Option<ControlMessage> {
    let contents = std::fs::read_to_string(path).ok()?;
    let line = contents.lines().rfind(|l| !l.trim().is_empty())?;
    ControlMessage::parse_line(line)
}

/// Start a background reader for `source`. Messages arrive on the returned
/// channel; the main loop drains it between frames.
pub fn spawn_reader(source: ControlSource) -> Result<Receiver<ControlMessage>> {
    let (tx, rx) = mpsc::channel::<ControlMessage>();

    match source {
        ControlSource::Stdin => {
            std::thread::spawn(move || read_stdin(tx));
        }
        ControlSource::File(path) => {
            let (file_tx, file_rx) = mpsc::channel();
            let mut watcher = notify::recommended_watcher(move |res| {
                let _ = file_tx.send(res);
            })
            .map_err(|source| Error::Watch {
                path: path.clone(),
                source,
            })?;
            notify::Watcher::watch(&mut watcher, &path, notify::RecursiveMode::NonRecursive)
                .map_err(|source| Error::Watch {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), "watching control file");

            std::thread::spawn(move || {
                // The watcher stops when dropped, so it lives in this thread
                let _watcher = watcher;
                if let Some(msg) = latest_message(&path)
                    && tx.send(msg).is_err()
                {
                    return;
                }
                while let Ok(event) = file_rx.recv() {
                    if let Err(e) = event {
                        warn!(error = %e, "control file watch error");
                        continue;
                    }
                    if let Some(msg) = latest_message(&path)
                        && tx.send(msg).is_err()
                    {
                        break;
                    }
                }
            });
        }
    }

    Ok(rx)
}

fn read_stdin(tx: Sender<ControlMessage>) {
    use std::io::BufRead;
    let stdin = std::io::BufReader::new(std::io::stdin());
    for line in stdin.lines() {
        let Ok(line) = line else {
            break;
        };
        if let Some(msg) = ControlMessage::parse_line(&line)
            && tx.send(msg).is_err()
        {
            break;
        }
    }
    debug!("control input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Dimensions;

    #[test]
    fn parses_partial_messages() {
        let msg = ControlMessage::parse_line(r#"{"theme": "neon"}"#).unwrap();
        assert_eq!(msg.theme.as_deref(), Some("neon"));
        assert_eq!(msg.mode, None);

        let msg = ControlMessage::parse_line(r#"{"mode": "light", "enabled": false}"#).unwrap();
        assert_eq!(msg.mode, Some(ColorMode::Light));
        assert_eq!(msg.enabled, Some(false));
    }

    #[test]
    fn rejects_garbage_and_blank_lines() {
        assert!(ControlMessage::parse_line("").is_none());
        assert!(ControlMessage::parse_line("   ").is_none());
        assert!(ControlMessage::parse_line("not json").is_none());
        assert!(ControlMessage::parse_line(r#"{"mode": "sepia"}"#).is_none());
        assert!(ControlMessage::parse_line(r#"{"speed": 2}"#).is_none());
    }

    #[test]
    fn apply_drives_the_controller() {
        let mut c = Controller::new("aurora", ColorMode::Dark, 30, Some(9));
        c.resize(Dimensions::new(120, 80));

        ControlMessage {
            theme: Some("snow".into()),
            mode: Some(ColorMode::Light),
            enabled: Some(true),
        }
        .apply(&mut c);
        assert_eq!(c.simulation_name(), Some("snow"));
        assert_eq!(c.mode(), ColorMode::Light);

        ControlMessage {
            enabled: Some(false),
            ..Default::default()
        }
        .apply(&mut c);
        assert!(!c.is_active());
    }

    #[test]
    fn source_from_str() {
        assert!(matches!("-".parse::<ControlSource>(), Ok(ControlSource::Stdin)));
        assert!(matches!("stdin".parse::<ControlSource>(), Ok(ControlSource::Stdin)));
        assert!(matches!("/tmp/ctl".parse::<ControlSource>(), Ok(ControlSource::File(_))));
    }

    #[test]
    fn latest_message_uses_last_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctl.jsonl");
        std::fs::write(&path, "{\"theme\": \"rain\"}\n{\"theme\": \"ember\"}\n\n").unwrap();
        let msg = latest_message(&path).unwrap();
        assert_eq!(msg.theme.as_deref(), Some("ember"));
    }
}
